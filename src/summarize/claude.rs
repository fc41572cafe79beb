//! Summarizer backed by the Claude CLI in headless mode

use serde::Deserialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{SummaryRequest, Summarizer};
use crate::config::SummarizerConfig;
use crate::error::SummarizerError;
use crate::store::SummaryUpdate;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct ClaudeCliSummarizer {
    command: String,
    model: String,
    timeout: Duration,
    workspace: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CliEnvelope {
    #[serde(default)]
    result: String,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(default)]
    summaries: Vec<SummaryUpdate>,
}

impl ClaudeCliSummarizer {
    pub fn new(config: &SummarizerConfig) -> Self {
        Self {
            command: config.command.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
            workspace: config.workspace_path(),
        }
    }

    fn prompt(requests: &[SummaryRequest]) -> Result<String, SummarizerError> {
        let messages = serde_json::to_string_pretty(requests)
            .map_err(|e| SummarizerError::Malformed(e.to_string()))?;
        Ok(format!(
            r#"Generate concise summaries for conversation messages.

Messages to summarize:
{messages}

For each message, create a 1-2 sentence summary (max 150 characters).
- For user messages: capture the question, request, or action
- For assistant messages: capture the key action, answer, or explanation
- Use active voice and clear language

Output ONLY valid JSON in this exact format:
{{
  "summaries": [
    {{"uuid": "message-uuid", "summary": "Brief summary here"}}
  ]
}}

JSON output:"#
        ))
    }

    fn run(&self, prompt: String) -> Result<String, SummarizerError> {
        std::fs::create_dir_all(&self.workspace)?;

        let mut child = Command::new(&self.command)
            .args(["-p", "--model", &self.model, "--output-format", "json"])
            .current_dir(&self.workspace)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // pipes are serviced on their own threads so a large prompt or reply
        // cannot stall the child while we poll it
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(prompt.as_bytes());
            }
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SummarizerError::Timeout(self.timeout.as_secs()));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let _ = writer.join();
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            return Err(SummarizerError::NonZeroExit {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut out);
        }
        out
    })
}

/// Unwrap the CLI's `{"result": "..."}` envelope and read the outermost JSON
/// object inside the result text
pub(crate) fn parse_response(stdout: &str) -> Result<Vec<SummaryUpdate>, SummarizerError> {
    let envelope: CliEnvelope =
        serde_json::from_str(stdout.trim()).map_err(|e| SummarizerError::Malformed(e.to_string()))?;
    let text = envelope.result;

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(SummarizerError::Malformed("no JSON object in result".to_string()));
    };
    if end < start {
        return Err(SummarizerError::Malformed("no JSON object in result".to_string()));
    }

    let payload: SummaryPayload = serde_json::from_str(&text[start..=end])
        .map_err(|e| SummarizerError::Malformed(e.to_string()))?;
    Ok(payload.summaries)
}

impl Summarizer for ClaudeCliSummarizer {
    fn summarize(&self, requests: &[SummaryRequest]) -> Result<Vec<SummaryUpdate>, SummarizerError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = Self::prompt(requests)?;
        debug!(messages = requests.len(), model = %self.model, "calling summarizer");
        let stdout = self.run(prompt)?;
        parse_response(&stdout)
    }
}

//! Message tree reconstruction
//!
//! Messages are kept as a flat slice; parent links are resolved through an
//! id -> index map, never through owning pointers.

use std::collections::{HashMap, VecDeque};

use crate::probe::MessageRecord;

/// Depth of every message in a session, plus the ids that had to be promoted
/// to roots because their parent could not be resolved.
#[derive(Debug, Clone, Default)]
pub struct DepthMap {
    depths: HashMap<String, u32>,
    pub orphaned: Vec<String>,
}

impl DepthMap {
    pub fn get(&self, id: &str) -> Option<u32> {
        self.depths.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Compute depths with a breadth-first walk seeded from every parentless
/// message at once.
///
/// A message whose parent id is not in `messages` is treated as an extra root
/// and listed in [`DepthMap::orphaned`]. Anything still unreached afterwards
/// sits on a parent cycle; those are seeded in file order so every message
/// ends up with a depth.
pub fn compute_depths(messages: &[MessageRecord]) -> DepthMap {
    let index: HashMap<&str, usize> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.as_str(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); messages.len()];
    let mut roots: Vec<usize> = Vec::new();
    let mut orphaned: Vec<String> = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        match message.parent_id.as_deref() {
            None => roots.push(i),
            Some(parent) => match index.get(parent) {
                Some(&p) if p != i => children[p].push(i),
                _ => {
                    orphaned.push(message.id.clone());
                    roots.push(i);
                }
            },
        }
    }

    let mut depth: Vec<Option<u32>> = vec![None; messages.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &r in &roots {
        depth[r] = Some(0);
        queue.push_back(r);
    }
    walk(&children, &mut depth, &mut queue);

    // cycle members: nothing above them is a root
    for i in 0..messages.len() {
        if depth[i].is_none() {
            depth[i] = Some(0);
            queue.push_back(i);
            walk(&children, &mut depth, &mut queue);
        }
    }

    let depths = messages
        .iter()
        .zip(depth)
        .map(|(m, d)| (m.id.clone(), d.unwrap_or(0)))
        .collect();

    DepthMap { depths, orphaned }
}

fn walk(children: &[Vec<usize>], depth: &mut [Option<u32>], queue: &mut VecDeque<usize>) {
    while let Some(current) = queue.pop_front() {
        let next = depth[current].unwrap_or(0) + 1;
        for &child in &children[current] {
            if depth[child].is_none() {
                depth[child] = Some(next);
                queue.push_back(child);
            }
        }
    }
}

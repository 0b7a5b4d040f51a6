//! Circular transfer detection
//!
//! Finds chains of transfers that lead back to where they started, the
//! signature of round-tripping and layering schemes.
//!
//! # Algorithm
//!
//! A single depth-first pass over the graph with global bookkeeping. Every
//! user is in one of three states: unvisited, on the current DFS path, or
//! done. Following an edge into a node that is on the path closes a cycle,
//! which is reported as the path slice from that node to the current one.
//! Each node becomes a DFS root at most once and each logical edge is
//! followed once, so the pass is O(V + E).
//!
//! Parallel edges between the same pair of users count as one logical edge.
//! A self-loop is reported as a cycle of length one.
//!
//! # Limitation
//!
//! This is not an exhaustive enumeration of simple cycles (that is
//! exponential in the worst case). Edges into nodes that are already done are
//! not followed again, so a strongly connected region yields the cycles that
//! close during this one traversal. Every cyclic region yields at least one
//! cycle, and an acyclic graph yields none.

use crate::core::graph::TransactionGraph;
use crate::types::UserId;
use std::collections::{HashMap, HashSet};

/// A circular chain of users, in transfer order
///
/// The last user sends to the first one.
pub type Cycle = Vec<UserId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    /// On the current DFS path, at this depth
    OnPath(usize),
    Done,
}

/// Depth-first cycle detector over a [`TransactionGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDetector;

impl CycleDetector {
    /// Report the cycles found by one DFS pass over the graph
    ///
    /// Roots are tried in ascending user ID order and successors in the
    /// order their first edge was inserted, so the result is deterministic
    /// for a given graph. Returns an empty vector for an acyclic graph.
    pub fn detect(graph: &TransactionGraph) -> Vec<Cycle> {
        let successors = Self::successors(graph);
        let mut state: HashMap<&str, VisitState> = HashMap::new();
        let mut cycles = Vec::new();

        for root in graph.users() {
            let root = root.as_str();
            if state.contains_key(root) {
                continue;
            }

            // Frames of (node, index of the next successor to follow)
            let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
            state.insert(root, VisitState::OnPath(0));

            while let Some(&(node, next)) = stack.last() {
                let succ = successors.get(node).and_then(|s| s.get(next)).copied();

                let Some(succ) = succ else {
                    state.insert(node, VisitState::Done);
                    stack.pop();
                    continue;
                };

                let top = stack.len() - 1;
                stack[top].1 += 1;

                match state.get(succ) {
                    None => {
                        state.insert(succ, VisitState::OnPath(stack.len()));
                        stack.push((succ, 0));
                    }
                    Some(VisitState::OnPath(depth)) => {
                        let cycle: Cycle = stack[*depth..]
                            .iter()
                            .map(|(user, _)| user.to_string())
                            .collect();
                        tracing::debug!(length = cycle.len(), "cycle detected");
                        cycles.push(cycle);
                    }
                    Some(VisitState::Done) => {}
                }
            }
        }

        cycles
    }

    /// Distinct successors per sender, in first-insertion order
    fn successors(graph: &TransactionGraph) -> HashMap<&str, Vec<&str>> {
        graph
            .adjacency()
            .map(|(sender, edges)| {
                let mut seen = HashSet::new();
                let mut targets = Vec::new();
                for tx in edges {
                    let target = tx.to.id.as_str();
                    if seen.insert(target) {
                        targets.push(target);
                    }
                }
                (sender.as_str(), targets)
            })
            .collect()
    }
}

/// Rotate a cycle so that its smallest element comes first
///
/// Two reports of the same cycle that start at different users compare equal
/// after rotation.
pub fn canonical_rotation<T: Ord + Clone>(cycle: &[T]) -> Vec<T> {
    let Some(start) = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };

    cycle[start..]
        .iter()
        .chain(cycle[..start].iter())
        .cloned()
        .collect()
}

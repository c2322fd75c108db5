//! Path finding over the sentence's dependency forest.
//!
//! The parent links stored on tokens form a forest, so any two tokens in
//! the same tree are connected by exactly one path through their lowest
//! common ancestor. Paths are reported as directed edges whose labels
//! always come from the child token's stored parent-label, regardless of
//! walk direction.

use crate::sentence::{Sentence, Span};

/// One directed step along a tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Token the step leaves from
    pub source: usize,
    /// Token the step arrives at
    pub target: usize,
    /// Label of the tree edge (the child token's parent-label)
    pub label: String,
}

/// Ancestor chain from `i` (inclusive) up to its root.
fn ancestor_chain(sentence: &Sentence, i: usize) -> Vec<usize> {
    let mut chain = vec![i];
    let mut current = sentence.token(i).parent;
    while let Some(next) = current {
        chain.push(next);
        current = sentence.token(next).parent;
    }
    chain
}

/// The unique tree path from token `i` to token `j`.
///
/// Returns an empty path when `i == j`, and `None` when the tokens lie in
/// disjoint trees. Otherwise the path runs from `i` up to the lowest
/// common ancestor, then down to `j`.
pub fn path_between_tokens(sentence: &Sentence, i: usize, j: usize) -> Option<Vec<DependencyEdge>> {
    if i == j {
        return Some(Vec::new());
    }
    let up = ancestor_chain(sentence, i);
    let down = ancestor_chain(sentence, j);

    // Both chains end at their roots. Scan from the root end inward for
    // the deepest node present in both; no shared node means the tokens
    // are in different trees.
    let mut shared = 0;
    while shared < up.len()
        && shared < down.len()
        && up[up.len() - 1 - shared] == down[down.len() - 1 - shared]
    {
        shared += 1;
    }
    if shared == 0 {
        return None;
    }
    let lca_up = up.len() - shared;
    let lca_down = down.len() - shared;

    let mut path = Vec::with_capacity(lca_up + lca_down);
    for t in 0..lca_up {
        path.push(DependencyEdge {
            source: up[t],
            target: up[t + 1],
            label: sentence.token(up[t]).dep_label.clone(),
        });
    }
    for t in (0..lca_down).rev() {
        path.push(DependencyEdge {
            source: down[t + 1],
            target: down[t],
            label: sentence.token(down[t]).dep_label.clone(),
        });
    }
    Some(path)
}

/// Shortest path between any token of `a` and any token of `b`.
///
/// Every (i, j) pair is considered in ascending iteration order; the path
/// with the fewest edges wins and ties keep the earliest pair. Pairs with
/// no path are skipped; `None` only if no pair is connected.
pub fn min_path_between_spans(
    sentence: &Sentence,
    a: Span,
    b: Span,
) -> Option<Vec<DependencyEdge>> {
    let mut best: Option<Vec<DependencyEdge>> = None;
    for i in a.range() {
        for j in b.range() {
            if let Some(path) = path_between_tokens(sentence, i, j) {
                if best.as_ref().map_or(true, |current| path.len() < current.len()) {
                    best = Some(path);
                }
            }
        }
    }
    best
}

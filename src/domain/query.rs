//! Read-only traversals over a built forest.
//!
//! All walks use an explicit stack or queue, so a long parent chain cannot
//! exhaust the call stack.

use std::collections::{BTreeMap, VecDeque};

use tracing::instrument;

use crate::domain::node::TreeNode;

/// Groups records by depth: level 0 holds the roots, level n the children of level n-1.
///
/// Within a level, records appear in breadth-first order. An empty forest gives an empty map.
#[instrument(level = "trace", skip_all)]
pub fn nodes_by_level<N: TreeNode>(roots: &[N]) -> BTreeMap<usize, Vec<&N>> {
    let mut levels = BTreeMap::new();
    let mut current: Vec<&N> = roots.iter().collect();
    let mut level = 0;

    while !current.is_empty() {
        let next: Vec<&N> = current.iter().flat_map(|&n| n.children()).collect();
        levels.insert(level, current);
        current = next;
        level += 1;
    }
    levels
}

/// Greatest depth of any record, roots being level 0. `None` for an empty forest.
#[instrument(level = "trace", skip_all)]
pub fn max_level<N: TreeNode>(roots: &[N]) -> Option<usize> {
    let mut queue: VecDeque<(&N, usize)> = roots.iter().map(|n| (n, 0)).collect();
    let mut max = None;

    while let Some((node, depth)) = queue.pop_front() {
        if max.map_or(true, |m| depth > m) {
            max = Some(depth);
        }
        for child in node.children() {
            queue.push_back((child, depth + 1));
        }
    }
    max
}

/// Total number of records in the forest.
pub fn node_count<N: TreeNode>(roots: &[N]) -> usize {
    iter_preorder(roots).count()
}

/// Records without children, left to right.
pub fn leaves<N: TreeNode>(roots: &[N]) -> Vec<&N> {
    iter_preorder(roots)
        .filter(|(_, node)| node.children().is_empty())
        .map(|(_, node)| node)
        .collect()
}

pub fn iter_preorder<N: TreeNode>(roots: &[N]) -> PreOrder<'_, N> {
    PreOrder::new(roots)
}

pub fn iter_postorder<N: TreeNode>(roots: &[N]) -> PostOrder<'_, N> {
    PostOrder::new(roots)
}

/// Depth-first, parent before children, yielding `(level, record)`.
#[derive(Debug)]
pub struct PreOrder<'a, N> {
    stack: Vec<(usize, &'a N)>,
}

impl<'a, N: TreeNode> PreOrder<'a, N> {
    fn new(roots: &'a [N]) -> Self {
        Self {
            stack: roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }
}

impl<'a, N: TreeNode> Iterator for PreOrder<'a, N> {
    type Item = (usize, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children().iter().rev() {
            self.stack.push((level + 1, child));
        }
        Some((level, node))
    }
}

/// Depth-first, children before parent, yielding `(level, record)`.
#[derive(Debug)]
pub struct PostOrder<'a, N> {
    stack: Vec<(usize, &'a N, bool)>,
}

impl<'a, N: TreeNode> PostOrder<'a, N> {
    fn new(roots: &'a [N]) -> Self {
        Self {
            stack: roots.iter().rev().map(|n| (0, n, false)).collect(),
        }
    }
}

impl<'a, N: TreeNode> Iterator for PostOrder<'a, N> {
    type Item = (usize, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((level, node, visited)) = self.stack.pop() {
            if visited {
                return Some((level, node));
            }
            self.stack.push((level, node, true));
            for child in node.children().iter().rev() {
                self.stack.push((level + 1, child, false));
            }
        }
        None
    }
}

/// Forest queries as methods on a slice of roots.
pub trait ForestExt<N: TreeNode> {
    fn nodes_by_level(&self) -> BTreeMap<usize, Vec<&N>>;
    fn max_level(&self) -> Option<usize>;
    fn node_count(&self) -> usize;
    fn leaves(&self) -> Vec<&N>;
    fn iter_preorder(&self) -> PreOrder<'_, N>;
    fn iter_postorder(&self) -> PostOrder<'_, N>;
}

impl<N: TreeNode> ForestExt<N> for [N] {
    fn nodes_by_level(&self) -> BTreeMap<usize, Vec<&N>> {
        nodes_by_level(self)
    }

    fn max_level(&self) -> Option<usize> {
        max_level(self)
    }

    fn node_count(&self) -> usize {
        node_count(self)
    }

    fn leaves(&self) -> Vec<&N> {
        leaves(self)
    }

    fn iter_preorder(&self) -> PreOrder<'_, N> {
        iter_preorder(self)
    }

    fn iter_postorder(&self) -> PostOrder<'_, N> {
        iter_postorder(self)
    }
}

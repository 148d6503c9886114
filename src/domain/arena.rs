use std::collections::HashMap;
use std::mem;

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::domain::compare::Comparator;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::TreeNode;

/// A record parked in the arena while its links are resolved.
#[derive(Debug)]
pub(crate) struct LinkSlot<N> {
    pub record: N,
    /// Indices of linked child records, in link (later: sorted) order
    pub children: Vec<Index>,
}

/// Arena-based staging area for one build.
///
/// Records are inserted in input order, linked by index, optionally sorted by
/// permuting index lists, and finally moved into their parents' child vectors.
/// Nothing here recurses, so chain depth is bounded only by memory.
#[derive(Debug)]
pub(crate) struct LinkArena<N> {
    arena: Arena<LinkSlot<N>>,
    /// Root indices in forest order
    roots: Vec<Index>,
}

/// Output of [`LinkArena::materialize`].
pub(crate) struct Materialized<N: TreeNode> {
    pub roots: Vec<N>,
    /// Position path of every indexed record that made it into the forest
    pub paths: HashMap<N::Key, Vec<usize>>,
}

impl<N: TreeNode> LinkArena<N> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            roots: Vec::new(),
        }
    }

    pub fn insert(&mut self, record: N) -> Index {
        self.arena.insert(LinkSlot {
            record,
            children: Vec::new(),
        })
    }

    pub fn get(&self, idx: Index) -> Option<&LinkSlot<N>> {
        self.arena.get(idx)
    }

    pub fn push_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    /// Appends `child` to `parent`'s child list.
    pub fn attach(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        let slot = self
            .arena
            .get_mut(parent)
            .ok_or_else(|| TreeError::Internal(format!("parent slot {parent:?} vanished")))?;
        slot.children.push(child);
        Ok(())
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Stable-sorts the roots and every reachable sibling group, top-down.
    #[instrument(level = "trace", skip_all)]
    pub fn sort_by(&mut self, comparator: &dyn Comparator<N>) {
        let arena = &self.arena;
        let by_record = |a: &Index, b: &Index| match (arena.get(*a), arena.get(*b)) {
            (Some(a), Some(b)) => comparator.compare(&a.record, &b.record),
            _ => std::cmp::Ordering::Equal,
        };
        self.roots.sort_by(by_record);

        let mut stack: Vec<Index> = self.roots.clone();
        while let Some(idx) = stack.pop() {
            let Some(slot) = self.arena.get_mut(idx) else {
                continue;
            };
            let mut children = mem::take(&mut slot.children);
            if children.is_empty() {
                continue;
            }
            let arena = &self.arena;
            children.sort_by(|a, b| match (arena.get(*a), arena.get(*b)) {
                (Some(a), Some(b)) => comparator.compare(&a.record, &b.record),
                _ => std::cmp::Ordering::Equal,
            });
            stack.extend(children.iter().copied());
            if let Some(slot) = self.arena.get_mut(idx) {
                slot.children = children;
            }
        }
    }

    /// Pre-order walk over all slots reachable from the roots.
    fn reachable(&self) -> Vec<Index> {
        let mut out = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<Index> = self.roots.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            if let Some(slot) = self.arena.get(idx) {
                stack.extend(slot.children.iter().rev().copied());
            }
            out.push(idx);
        }
        out
    }

    /// Position path of every indexed slot reachable from the roots.
    ///
    /// Paths are rebuilt from `(parent, position)` links, so the map costs the
    /// sum of the indexed records' depths and nothing when no index is wanted.
    fn index_paths(
        &self,
        order: &[Index],
        index: &HashMap<N::Key, Index>,
    ) -> HashMap<N::Key, Vec<usize>> {
        let mut links: HashMap<Index, (Option<Index>, usize)> = HashMap::with_capacity(order.len());
        for (pos, &root) in self.roots.iter().enumerate() {
            links.insert(root, (None, pos));
        }
        for &idx in order {
            if let Some(slot) = self.arena.get(idx) {
                for (pos, &child) in slot.children.iter().enumerate() {
                    links.insert(child, (Some(idx), pos));
                }
            }
        }

        index
            .iter()
            .filter_map(|(key, &idx)| {
                let mut path = Vec::new();
                let mut cursor = Some(idx);
                while let Some(current) = cursor {
                    let &(parent, pos) = links.get(&current)?;
                    path.push(pos);
                    cursor = parent;
                }
                path.reverse();
                Some((key.clone(), path))
            })
            .collect()
    }

    /// Moves every reachable record into its parent, bottom-up.
    ///
    /// `index` decides which record owns a key in the returned path map; pass
    /// `None` to skip building the map.
    #[instrument(level = "trace", skip_all)]
    pub fn materialize(
        mut self,
        index: Option<&HashMap<N::Key, Index>>,
    ) -> TreeResult<Materialized<N>> {
        let order = self.reachable();
        let paths = match index {
            Some(index) => self.index_paths(&order, index),
            None => HashMap::new(),
        };
        let mut built: HashMap<Index, N> = HashMap::with_capacity(order.len());

        for idx in order.into_iter().rev() {
            let LinkSlot {
                mut record,
                children,
            } = self
                .arena
                .remove(idx)
                .ok_or_else(|| TreeError::Internal(format!("slot {idx:?} linked twice")))?;

            let children = children
                .iter()
                .map(|child| {
                    built.remove(child).ok_or_else(|| {
                        TreeError::Internal(format!("child slot {child:?} not materialized"))
                    })
                })
                .collect::<TreeResult<Vec<N>>>()?;
            record.set_children(children);
            built.insert(idx, record);
        }

        let unreachable = self.arena.len();
        if unreachable > 0 {
            let keys: Vec<_> = self.arena.iter().map(|(_, slot)| slot.record.key()).collect();
            warn!(
                count = unreachable,
                ?keys,
                "records left out: parent chain never reaches a root"
            );
        }

        let roots = self
            .roots
            .iter()
            .map(|root| {
                built
                    .remove(root)
                    .ok_or_else(|| TreeError::Internal(format!("root slot {root:?} not materialized")))
            })
            .collect::<TreeResult<Vec<N>>>()?;

        Ok(Materialized { roots, paths })
    }
}

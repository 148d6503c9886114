//! Tree builder: links flat keyed records into an ordered forest.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::{LinkArena, Materialized};
use crate::domain::compare::{BoxedComparator, Comparator};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::TreeNode;

/// What happens to a non-root record whose parent key is not present.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Report, then drop the record from the forest
    #[default]
    Ignore,
    /// Report, then promote the record to a root
    Collect,
    /// Report, then abort the build with [`TreeError::MissingParent`]
    Error,
}

/// What happens when two records share a key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// The later record owns the key for parent lookups
    #[default]
    Replace,
    /// Abort the build with [`TreeError::DuplicateKey`]
    Reject,
}

/// Orphan callback: `(context, node key, missing parent key, error)`.
pub type ErrorHandler<N, C> =
    Box<dyn Fn(&C, &<N as TreeNode>::Key, &<N as TreeNode>::Key, &TreeError) + Send + Sync>;

/// Builds forests from flat record sets.
///
/// The configuration is fixed once the builder is assembled; every call to
/// [`TreeBuilder::build`] works on its own fresh index, so one builder can be
/// shared across threads as long as each call gets its own records.
///
/// ```
/// use rstree::domain::{ByOrder, OrphanPolicy, TreeBuilder};
/// use rstree::record::Record;
///
/// let records = vec![
///     Record::new(1, 0, "Root").with_order(1),
///     Record::new(2, 1, "A").with_order(2),
///     Record::new(3, 1, "B").with_order(1),
/// ];
/// let forest = TreeBuilder::new()
///     .with_comparator(ByOrder)
///     .with_orphan_policy(OrphanPolicy::Collect)
///     .build(records)
///     .unwrap();
///
/// let names: Vec<_> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, ["B", "A"]);
/// ```
pub struct TreeBuilder<N: TreeNode, C = ()> {
    context: C,
    comparator: Option<BoxedComparator<N>>,
    orphan_policy: OrphanPolicy,
    duplicate_keys: DuplicateKeyPolicy,
    error_handler: Option<ErrorHandler<N, C>>,
}

impl<N: TreeNode> Default for TreeBuilder<N, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: TreeNode> TreeBuilder<N, ()> {
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl<N: TreeNode, C> TreeBuilder<N, C> {
    /// Creates a builder whose error handler receives `context` verbatim.
    pub fn with_context(context: C) -> Self {
        Self {
            context,
            comparator: None,
            orphan_policy: OrphanPolicy::default(),
            duplicate_keys: DuplicateKeyPolicy::default(),
            error_handler: None,
        }
    }

    /// Enables recursive sorting of roots and every sibling group.
    pub fn with_comparator<K>(mut self, comparator: K) -> Self
    where
        K: Comparator<N> + Send + Sync + 'static,
    {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Disables sorting; siblings keep input order.
    pub fn without_comparator(mut self) -> Self {
        self.comparator = None;
        self
    }

    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn with_error_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(&C, &N::Key, &N::Key, &TreeError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    pub fn duplicate_keys(&self) -> DuplicateKeyPolicy {
        self.duplicate_keys
    }

    pub fn is_sorting(&self) -> bool {
        self.comparator.is_some()
    }

    /// Links `records` into a forest of root records owning their subtrees.
    ///
    /// Roots (and records promoted under [`OrphanPolicy::Collect`]) keep input
    /// order unless a comparator is configured.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: Vec<N>) -> TreeResult<Vec<N>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let (arena, _) = self.link(records)?;
        Ok(arena.materialize(None)?.roots)
    }

    /// Like [`TreeBuilder::build`], additionally returning a key index over the forest.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build_with_map(&self, records: Vec<N>) -> TreeResult<IndexedForest<N>> {
        if records.is_empty() {
            return Ok(IndexedForest::default());
        }
        let (arena, index) = self.link(records)?;
        let Materialized { roots, paths } = arena.materialize(Some(&index))?;
        Ok(IndexedForest { roots, paths })
    }

    fn link(
        &self,
        records: Vec<N>,
    ) -> TreeResult<(LinkArena<N>, HashMap<N::Key, generational_arena::Index>)> {
        let mut arena = LinkArena::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let key = record.key();
            let idx = arena.insert(record);
            order.push(idx);
            if index.insert(key.clone(), idx).is_some() {
                match self.duplicate_keys {
                    DuplicateKeyPolicy::Replace => {
                        debug!(?key, "duplicate key, later record replaces earlier one")
                    }
                    DuplicateKeyPolicy::Reject => return Err(TreeError::duplicate_key(&key)),
                }
            }
        }

        let mut linked = 0usize;
        let mut orphans = 0usize;
        for idx in order {
            let Some(slot) = arena.get(idx) else {
                continue;
            };
            if slot.record.is_root() {
                arena.push_root(idx);
                continue;
            }

            let parent_key = slot.record.parent_key();
            match index.get(&parent_key) {
                Some(&parent) => {
                    arena.attach(parent, idx)?;
                    linked += 1;
                }
                None => {
                    orphans += 1;
                    let key = slot.record.key();
                    self.handle_orphan(&mut arena, idx, &key, &parent_key)?;
                }
            }
        }

        if let Some(comparator) = &self.comparator {
            arena.sort_by(comparator.as_ref());
        }

        debug!(
            roots = arena.root_count(),
            linked,
            orphans,
            sorted = self.comparator.is_some(),
            "records linked"
        );
        Ok((arena, index))
    }

    fn handle_orphan(
        &self,
        arena: &mut LinkArena<N>,
        idx: generational_arena::Index,
        key: &N::Key,
        parent_key: &N::Key,
    ) -> TreeResult<()> {
        let err = TreeError::missing_parent(key, parent_key);
        match &self.error_handler {
            Some(handler) => handler(&self.context, key, parent_key, &err),
            None => log_orphan(key, parent_key, &err),
        }

        match self.orphan_policy {
            // Never rooted, so the record and anything linked below it stay out of the forest
            OrphanPolicy::Ignore => Ok(()),
            OrphanPolicy::Collect => {
                arena.push_root(idx);
                Ok(())
            }
            OrphanPolicy::Error => Err(err),
        }
    }
}

/// Default orphan handler: a `warn` event for whatever subscriber the caller installed.
fn log_orphan<K: fmt::Debug>(key: &K, parent_key: &K, err: &TreeError) {
    warn!(?key, ?parent_key, %err, "orphan node detected");
}

impl<N: TreeNode, C: fmt::Debug> fmt::Debug for TreeBuilder<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("context", &self.context)
            .field("sorting", &self.comparator.is_some())
            .field("custom_error_handler", &self.error_handler.is_some())
            .field("orphan_policy", &self.orphan_policy)
            .field("duplicate_keys", &self.duplicate_keys)
            .finish_non_exhaustive()
    }
}

/// A built forest together with a key index into it.
///
/// The index stores each record's position path (root position, then child
/// positions), so lookups walk at most the record's depth.
#[derive(Debug)]
pub struct IndexedForest<N: TreeNode> {
    roots: Vec<N>,
    paths: HashMap<N::Key, Vec<usize>>,
}

impl<N: TreeNode> Default for IndexedForest<N> {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            paths: HashMap::new(),
        }
    }
}

impl<N: TreeNode> IndexedForest<N> {
    pub fn roots(&self) -> &[N] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<N> {
        self.roots
    }

    pub fn get(&self, key: &N::Key) -> Option<&N> {
        let (first, rest) = self.paths.get(key)?.split_first()?;
        rest.iter()
            .try_fold(self.roots.get(*first)?, |node, &pos| node.children().get(pos))
    }

    pub fn path(&self, key: &N::Key) -> Option<&[usize]> {
        self.paths.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &N::Key) -> bool {
        self.paths.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &N::Key> {
        self.paths.keys()
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn given_default_builder_then_ignores_orphans_and_does_not_sort() {
        let builder: TreeBuilder<Record> = TreeBuilder::new();
        assert_eq!(builder.orphan_policy(), OrphanPolicy::Ignore);
        assert_eq!(builder.duplicate_keys(), DuplicateKeyPolicy::Replace);
        assert!(!builder.is_sorting());
    }

    #[test]
    fn given_options_when_applied_in_order_then_last_one_wins() {
        let builder: TreeBuilder<Record> = TreeBuilder::new()
            .with_orphan_policy(OrphanPolicy::Error)
            .with_orphan_policy(OrphanPolicy::Collect)
            .with_comparator(crate::domain::ById)
            .without_comparator();

        assert_eq!(builder.orphan_policy(), OrphanPolicy::Collect);
        assert!(!builder.is_sorting());
    }

    #[test]
    fn given_context_then_it_is_kept_verbatim() {
        let builder: TreeBuilder<Record, &str> = TreeBuilder::with_context("import-42");
        assert_eq!(*builder.context(), "import-42");
    }

    #[test]
    fn given_policies_when_deserialized_then_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            orphans: OrphanPolicy,
            duplicates: DuplicateKeyPolicy,
        }
        let w: Wrapper = toml::from_str("orphans = \"collect\"\nduplicates = \"reject\"").unwrap();
        assert_eq!(w.orphans, OrphanPolicy::Collect);
        assert_eq!(w.duplicates, DuplicateKeyPolicy::Reject);
    }
}

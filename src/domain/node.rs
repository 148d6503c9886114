//! Capabilities a record must offer to be linked into a forest.

use std::fmt::Debug;
use std::hash::Hash;

/// A flat record that knows its own key, its parent's key, and owns its children.
///
/// Children are stored in the record's own concrete type, so a built forest is
/// simply `Vec<N>` where every `N` owns its subtree.
pub trait TreeNode: Sized {
    /// Unique identifier. Uniqueness is a caller contract.
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;

    /// Key of the logical parent. Not consulted when [`TreeNode::is_root`] holds.
    fn parent_key(&self) -> Self::Key;

    /// Explicit root test, independent of the key type's zero value.
    fn is_root(&self) -> bool;

    fn children(&self) -> &[Self];

    /// Replaces the children. Called exactly once per linked record during a build.
    fn set_children(&mut self, children: Vec<Self>);
}

/// Numeric identifier, used by [`crate::domain::ById`].
pub trait HasId {
    fn id(&self) -> u64;
}

/// Display name, used by [`crate::domain::ByName`].
pub trait HasName {
    fn name(&self) -> &str;
}

/// Explicit sibling position, used by [`crate::domain::ByOrder`].
pub trait HasOrder {
    fn order(&self) -> i64;
}

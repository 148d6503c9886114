//! Domain layer: the forest construction and query engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

mod arena;
pub mod builder;
pub mod compare;
pub mod error;
pub mod node;
pub mod query;

pub use builder::{DuplicateKeyPolicy, ErrorHandler, IndexedForest, OrphanPolicy, TreeBuilder};
pub use compare::{BoxedComparator, ById, ByName, ByOrder, Comparator, Composite, SortKey};
pub use error::{TreeError, TreeResult};
pub use node::{HasId, HasName, HasOrder, TreeNode};
pub use query::{
    iter_postorder, iter_preorder, leaves, max_level, node_count, nodes_by_level, ForestExt,
    PostOrder, PreOrder,
};

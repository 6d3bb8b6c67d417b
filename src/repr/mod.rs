//! Runtime model representations.
//!
//! - [`Tree`]: SoA regression tree with threshold splits
//! - [`Forest`]: averaging ensemble of trees

mod forest;
mod tree;

pub use forest::{Forest, ForestValidationError};
pub use tree::{MutableTree, Tree, TreeValidationError};

/// Node index within a tree (0 = root).
pub type NodeId = u32;

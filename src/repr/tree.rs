//! Canonical regression tree representation (SoA).
//!
//! This module provides:
//! - [`Tree`]: Immutable SoA tree storage for traversal
//! - [`MutableTree`]: Append-only node storage used while growing
//! - [`TreeValidationError`]: Structural validation errors
//!
//! Internal nodes route a sample left when `value <= threshold`.

use super::NodeId;

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,
    /// Parallel arrays have different lengths.
    #[error("array '{field}' has length {len}, expected {n_nodes}")]
    LenMismatch {
        field: &'static str,
        len: usize,
        n_nodes: usize,
    },
    /// A child pointer references an out-of-bounds node.
    #[error("node {node}: {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    #[error("node {node} references itself")]
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path.
    #[error("node {node} reached more than once")]
    DuplicateVisit { node: NodeId },
    /// A cycle was detected during traversal.
    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },
    /// A split or leaf holds a NaN or infinite value.
    #[error("node {node} has a non-finite value")]
    NonFiniteValue { node: NodeId },
}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays tree storage.
///
/// Child indices are local to this tree (0 = root). For leaves the split
/// fields are unused and the children are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// Create a tree from parallel arrays.
    ///
    /// No checks are performed here; call [`validate`](Self::validate) on
    /// untrusted input.
    pub fn new(
        split_indices: Vec<u32>,
        thresholds: Vec<f64>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f64>,
    ) -> Self {
        Self {
            split_indices: split_indices.into_boxed_slice(),
            thresholds: thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        }
    }

    /// Single-leaf tree.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![0], vec![0.0], vec![0], vec![0], vec![true], vec![value])
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&l| l).count()
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0 as NodeId, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if self.is_leaf(node) {
                max_depth = max_depth.max(depth);
            } else {
                stack.push((self.left_child(node), depth + 1));
                stack.push((self.right_child(node), depth + 1));
            }
        }
        max_depth
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn threshold(&self, node: NodeId) -> f64 {
        self.thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }

    pub fn split_indices(&self) -> &[u32] {
        &self.split_indices
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn left_children(&self) -> &[NodeId] {
        &self.left_children
    }

    pub fn right_children(&self) -> &[NodeId] {
        &self.right_children
    }

    pub fn leaf_values(&self) -> &[f64] {
        &self.leaf_values
    }

    /// Largest feature index used by any split, if the tree has splits.
    pub fn max_split_index(&self) -> Option<u32> {
        (0..self.n_nodes())
            .filter(|&i| !self.is_leaf[i])
            .map(|i| self.split_indices[i])
            .max()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate structural invariants for this tree.
    ///
    /// Used when converting persisted models back into runtime types.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let lens = [
            ("split_indices", self.split_indices.len()),
            ("thresholds", self.thresholds.len()),
            ("left_children", self.left_children.len()),
            ("right_children", self.right_children.len()),
            ("leaf_values", self.leaf_values.len()),
        ];
        for (field, len) in lens {
            if len != n_nodes {
                return Err(TreeValidationError::LenMismatch {
                    field,
                    len,
                    n_nodes,
                });
            }
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;
            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        _ => return Err(TreeValidationError::DuplicateVisit { node }),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if self.is_leaf(node) {
                        if !self.leaf_value(node).is_finite() {
                            return Err(TreeValidationError::NonFiniteValue { node });
                        }
                        continue;
                    }
                    if !self.threshold(node).is_finite() {
                        return Err(TreeValidationError::NonFiniteValue { node });
                    }

                    let left = self.left_child(node);
                    let right = self.right_child(node);
                    if left == node || right == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side,
                                child,
                                n_nodes,
                            });
                        }
                    }

                    stack.push((right, 0));
                    stack.push((left, 0));
                }
                _ => {
                    color[node_usize] = 2;
                }
            }
        }

        if let Some(i) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
        }

        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Traverse from the root to the leaf reached by `features`.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f64]) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let value = features[self.split_index(node) as usize];
            node = if value <= self.threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Leaf value for a single sample.
    #[inline]
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.leaf_value(self.traverse_to_leaf(features))
    }
}

// ============================================================================
// MutableTree
// ============================================================================

/// Append-only tree storage used by the grower.
///
/// Nodes are allocated as leaves and later turned into splits.
#[derive(Debug, Default)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    thresholds: Vec<f64>,
    left_children: Vec<NodeId>,
    right_children: Vec<NodeId>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f64>,
}

impl MutableTree {
    pub fn with_capacity(n_nodes: usize) -> Self {
        Self {
            split_indices: Vec::with_capacity(n_nodes),
            thresholds: Vec::with_capacity(n_nodes),
            left_children: Vec::with_capacity(n_nodes),
            right_children: Vec::with_capacity(n_nodes),
            is_leaf: Vec::with_capacity(n_nodes),
            leaf_values: Vec::with_capacity(n_nodes),
        }
    }

    /// Allocate a new leaf node and return its id.
    pub fn push_leaf(&mut self, value: f64) -> NodeId {
        let id = self.is_leaf.len() as NodeId;
        self.split_indices.push(0);
        self.thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(true);
        self.leaf_values.push(value);
        id
    }

    /// Turn `node` into a split with the given children.
    pub fn make_split(&mut self, node: NodeId, feature: u32, threshold: f64, left: NodeId, right: NodeId) {
        let i = node as usize;
        self.split_indices[i] = feature;
        self.thresholds[i] = threshold;
        self.left_children[i] = left;
        self.right_children[i] = right;
        self.is_leaf[i] = false;
    }

    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn freeze(self) -> Tree {
        Tree::new(
            self.split_indices,
            self.thresholds,
            self.left_children,
            self.right_children,
            self.is_leaf,
            self.leaf_values,
        )
    }
}

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Errors raised while constructing or validating model data.
//!
//! Every constructor in this crate validates its input eagerly and reports the
//! first violation it finds. Nothing is silently repaired: a negative weight
//! or an asymmetric edge is a defect of whatever produced the data.

use crate::index::{BlockIndex, NodeIndex, RankIndex};
use thiserror::Error;

/// Errors from building a `CommGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge or attribute referenced a node outside `0..num_nodes`.
    #[error("node {node} is out of bounds for a graph with {num_nodes} nodes")]
    NodeOutOfBounds { node: NodeIndex, num_nodes: usize },

    /// An edge connects a node with itself.
    #[error("self loop on {0}")]
    SelfLoop(NodeIndex),

    /// An edge carries a negative communication volume.
    #[error("edge {source_node} -> {target} has negative weight {weight}")]
    NegativeEdgeWeight {
        source_node: NodeIndex,
        target: NodeIndex,
        weight: String,
    },

    /// A node carries a negative weight.
    #[error("{node} has negative weight {weight}")]
    NegativeNodeWeight { node: NodeIndex, weight: String },

    /// A node label lies outside `0..num_blocks`.
    #[error("{node} is labelled {block} but the graph has {num_blocks} blocks")]
    BlockOutOfBounds {
        node: NodeIndex,
        block: BlockIndex,
        num_blocks: usize,
    },

    /// The block count must be positive.
    #[error("the number of blocks must be positive")]
    ZeroBlocks,

    /// A directed edge has no reverse edge of the same weight.
    #[error("edge {source_node} -> {target} has no matching reverse edge of equal weight")]
    AsymmetricEdge { source_node: NodeIndex, target: NodeIndex },

    /// The CSR arrays are inconsistent with each other.
    #[error("malformed CSR: {0}")]
    MalformedCsr(String),
}

/// Errors from building a dense matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The value buffer does not hold `rows * cols` entries.
    #[error("expected {expected} values for a {rows}x{cols} matrix, found {found}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors from building a distance provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// Dense distance matrices must be square.
    #[error("distance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// The value buffer has the wrong length.
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// A distance entry is negative.
    #[error("distance between {a} and {b} is negative ({value})")]
    NegativeDistance {
        a: RankIndex,
        b: RankIndex,
        value: String,
    },

    /// `D(a, b) != D(b, a)`.
    #[error("distance matrix is not symmetric at ({a}, {b})")]
    Asymmetric { a: RankIndex, b: RankIndex },

    /// The hierarchy description has no levels.
    #[error("hierarchy must describe at least one level")]
    EmptyHierarchy,

    /// Group sizes and distances must pair up level by level.
    #[error("hierarchy has {group_sizes} group sizes but {distances} distances")]
    HierarchyLengthMismatch { group_sizes: usize, distances: usize },

    /// A hierarchy level with no members.
    #[error("group size at hierarchy level {level} must be positive")]
    ZeroGroupSize { level: usize },

    /// A hierarchy level distance is negative.
    #[error("distance at hierarchy level {level} is negative ({value})")]
    NegativeLevelDistance { level: usize, value: String },

    /// The product of group sizes does not fit in `usize`.
    #[error("the number of ranks described by the hierarchy overflows usize")]
    RankCountOverflow,
}

/// Errors from validating a rank assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// A node is mapped outside `0..num_ranks`.
    #[error("{node} is assigned to {rank} but only {num_ranks} ranks exist")]
    RankOutOfRange {
        node: NodeIndex,
        rank: RankIndex,
        num_ranks: usize,
    },

    /// Two nodes share one rank.
    #[error("{rank} is assigned to both {first} and {second}")]
    DuplicateRank {
        rank: RankIndex,
        first: NodeIndex,
        second: NodeIndex,
    },

    /// The assignment does not cover every rank exactly once.
    #[error("assignment has {len} entries but the topology has {num_ranks} ranks")]
    NotABijection { len: usize, num_ranks: usize },
}

/// Errors in run configuration, detected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Both objective flags were set; the objective must be unique.
    #[error("optimizing communication volume and penalizing disconnected blocks are mutually exclusive")]
    AmbiguousObjective,

    /// A windowed search space needs a positive window.
    #[error("search window must be positive")]
    ZeroWindow,

    /// A communication graph search space needs a positive depth.
    #[error("communication neighborhood depth must be positive")]
    ZeroDepth,

    /// A random search space needs a positive failure budget.
    #[error("the number of unsuccessful attempts before stopping must be positive")]
    ZeroMaxUnsuccessful,

    /// Simulated annealing needs a cooling rate in `(0, 1)` and finite,
    /// non-negative temperatures.
    #[error("invalid annealing schedule: {0}")]
    InvalidAnnealingSchedule(String),
}

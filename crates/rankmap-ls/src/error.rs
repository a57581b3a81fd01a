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

//! Errors reported by a local search run.

use rankmap_model::error::AssignmentError;
use thiserror::Error;

/// Reasons a local search run can fail.
///
/// Every variant except [`LocalSearchError::ObjectiveMismatch`] is detected
/// before the assignment is touched. A mismatch means the incremental
/// bookkeeping diverged from the reference cost; the assignment is still a
/// valid bijection but the reported objective cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalSearchError {
    #[error("the communication graph has no nodes")]
    EmptyGraph,

    #[error("assignment has {assignment} entries but the graph has {nodes} nodes")]
    AssignmentLengthMismatch { nodes: usize, assignment: usize },

    #[error("the topology has {ranks} ranks but the graph has {nodes} nodes")]
    RankCountMismatch { nodes: usize, ranks: usize },

    #[error("search space `{name}` was built for {search_space} nodes but the graph has {nodes}")]
    SearchSpaceSizeMismatch {
        name: String,
        nodes: usize,
        search_space: usize,
    },

    #[error("invalid rank assignment: {0}")]
    InvalidAssignment(#[from] AssignmentError),

    #[error("the distance provider reports a negative distance ({0})")]
    NegativeDistance(String),

    #[error("the objective may exceed the range of the cost type")]
    ObjectiveOverflow,

    #[error("incremental objective {incremental} disagrees with the recomputed objective {reference}")]
    ObjectiveMismatch { incremental: String, reference: String },
}

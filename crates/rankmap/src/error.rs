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

use rankmap_ls::error::LocalSearchError;
use rankmap_model::error::{AssignmentError, ConfigError};
use thiserror::Error;

/// Errors of the mapping entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankmapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("local search failed: {0}")]
    LocalSearch(#[from] LocalSearchError),

    #[error("invalid mapping: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("the hierarchy has {ranks} ranks but the graph has {nodes} nodes")]
    RankCountMismatch { nodes: usize, ranks: usize },

    #[error("the mapping has {assignment} entries but the graph has {nodes} nodes")]
    AssignmentLengthMismatch { nodes: usize, assignment: usize },

    #[error("the QAP cost of the mapping does not fit in the cost type")]
    ObjectiveOverflow,
}

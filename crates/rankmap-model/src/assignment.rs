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

//! Rank assignments.
//!
//! A rank assignment maps node `i` to rank `ranks[i]`. The optimizer requires
//! it to be a bijection between the `N` nodes and the `K == N` ranks.

use crate::{
    error::AssignmentError,
    index::{NodeIndex, RankIndex},
};
use fixedbitset::FixedBitSet;

/// Checks that `ranks` is a bijection onto `0..num_ranks`.
///
/// # Examples
///
/// ```rust
/// # use rankmap_model::assignment::{identity_assignment, validate_rank_assignment};
/// let ranks = identity_assignment(4);
/// assert!(validate_rank_assignment(&ranks, 4).is_ok());
/// assert!(validate_rank_assignment(&ranks, 5).is_err());
/// ```
pub fn validate_rank_assignment(
    ranks: &[RankIndex],
    num_ranks: usize,
) -> Result<(), AssignmentError> {
    if ranks.len() != num_ranks {
        return Err(AssignmentError::NotABijection {
            len: ranks.len(),
            num_ranks,
        });
    }

    let mut seen = FixedBitSet::with_capacity(num_ranks);
    for (node, &rank) in ranks.iter().enumerate() {
        if rank.get() >= num_ranks {
            return Err(AssignmentError::RankOutOfRange {
                node: NodeIndex::new(node),
                rank,
                num_ranks,
            });
        }
        if seen.put(rank.get()) {
            // quadratic, but only on the failure path
            let first = ranks
                .iter()
                .position(|&r| r == rank)
                .unwrap_or(node);
            return Err(AssignmentError::DuplicateRank {
                rank,
                first: NodeIndex::new(first),
                second: NodeIndex::new(node),
            });
        }
    }
    Ok(())
}

/// Returns the assignment `[0, 1, ..., len - 1]`.
pub fn identity_assignment(len: usize) -> Vec<RankIndex> {
    (0..len).map(RankIndex::new).collect()
}

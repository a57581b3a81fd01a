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

//! # Rankmap Metrics
//!
//! Read-only quality measures for partitions and mappings of a
//! communication graph.
//!
//! * **`cut`**: edge cut, directed cut between two blocks, the disconnection
//!   penalized cut and boundary nodes.
//! * **`volume`**: per-block communication volume and its extrema.
//! * **`balance`**: heaviest block relative to the ideal block weight.
//! * **`diameter`**: unweighted diameter, for diagnostics.
//! * **`qap`**: reference QAP cost of a rank assignment.
//! * **`objective`**: dispatch over the partition objectives.
//! * **`report`**: all of the above collected in one printable value.
//!
//! Every metric that reads block labels comes in two flavors: one using the
//! labels stored in the graph, and a `_with_map` variant taking an external
//! label array. Both share one implementation.

pub mod balance;
pub mod cut;
pub mod diameter;
pub mod objective;
pub mod qap;
pub mod report;
pub mod volume;

use rankmap_core::num::CostNumeric;
use rankmap_model::{graph::CommGraph, index::BlockIndex};

#[inline]
pub(crate) fn assert_map_len<T>(graph: &CommGraph<T>, map: &[BlockIndex])
where
    T: CostNumeric,
{
    assert_eq!(
        map.len(),
        graph.num_nodes(),
        "called a metric with a block map of length {} for a graph with {} nodes",
        map.len(),
        graph.num_nodes()
    );
}

/// Returns the block count implied by `graph` and `map`: the graph's own
/// count, widened if the map uses larger labels.
#[inline]
pub(crate) fn effective_num_blocks<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    assert_map_len(graph, map);
    map.iter()
        .map(|b| b.get() + 1)
        .max()
        .unwrap_or(0)
        .max(graph.num_blocks())
}

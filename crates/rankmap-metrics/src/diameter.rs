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

//! Unweighted graph diameter.
//!
//! Runs a breadth-first search from every node, so the cost is
//! `O(N * (N + E))`. Intended for diagnostics on small and medium graphs.

use fixedbitset::FixedBitSet;
use rankmap_core::num::CostNumeric;
use rankmap_model::{graph::CommGraph, index::NodeIndex};
use std::collections::VecDeque;

/// Returns the largest hop distance of `source` to any node reachable from it.
pub fn eccentricity<T>(graph: &CommGraph<T>, source: NodeIndex) -> usize
where
    T: CostNumeric,
{
    let mut visited = FixedBitSet::with_capacity(graph.num_nodes());
    let mut queue = VecDeque::new();
    eccentricity_with_buffers(graph, source, &mut visited, &mut queue)
}

fn eccentricity_with_buffers<T>(
    graph: &CommGraph<T>,
    source: NodeIndex,
    visited: &mut FixedBitSet,
    queue: &mut VecDeque<(NodeIndex, usize)>,
) -> usize
where
    T: CostNumeric,
{
    visited.clear();
    queue.clear();

    visited.insert(source.get());
    queue.push_back((source, 0));
    let mut farthest = 0;

    while let Some((u, depth)) = queue.pop_front() {
        farthest = farthest.max(depth);
        for &v in graph.neighbors(u) {
            if !visited.put(v.get()) {
                queue.push_back((v, depth + 1));
            }
        }
    }
    farthest
}

/// Returns the maximum eccentricity over all nodes.
///
/// Unreachable pairs are ignored, so a disconnected graph reports the largest
/// diameter among its components. The empty graph has diameter 0.
pub fn diameter<T>(graph: &CommGraph<T>) -> usize
where
    T: CostNumeric,
{
    let mut visited = FixedBitSet::with_capacity(graph.num_nodes());
    let mut queue = VecDeque::with_capacity(graph.num_nodes());
    graph
        .nodes()
        .map(|u| eccentricity_with_buffers(graph, u, &mut visited, &mut queue))
        .max()
        .unwrap_or(0)
}

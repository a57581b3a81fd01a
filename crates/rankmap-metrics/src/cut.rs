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

//! Cut based partition metrics.
//!
//! Every undirected link is stored twice, so directed sums over cut edges
//! are halved to report each link once. The one exception is
//! [`edge_cut_between`], which is deliberately directional.
//!
//! Cut weights saturate at `T::max_value()`. A graph whose total directed
//! weight fits in `T` never saturates a plain cut; the disconnection penalty
//! saturates once `total weight * components` leaves the range of `T`.

use crate::assert_map_len;
use rankmap_core::{
    algorithm::union_find::UnionFind,
    num::{saturating_from_usize, CostNumeric},
};
use rankmap_model::{
    graph::CommGraph,
    index::{BlockIndex, NodeIndex},
};

#[inline]
fn directed_cut<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> T
where
    T: CostNumeric,
{
    let mut cut = T::zero();
    for u in graph.nodes() {
        let bu = map[u.get()];
        for (v, w) in graph.out_edges(u) {
            if map[v.get()] != bu {
                cut = cut.saturating_add(w);
            }
        }
    }
    cut
}

/// Returns the total weight of links whose endpoints carry different labels
/// in the graph's own partition.
///
/// # Examples
///
/// ```rust
/// # use rankmap_model::graph::CommGraphBuilder;
/// # use rankmap_model::index::{BlockIndex, NodeIndex};
/// # use rankmap_metrics::cut::edge_cut;
/// let mut b = CommGraphBuilder::<i64>::new(2);
/// b.add_edge(NodeIndex::new(0), NodeIndex::new(1), 5)
///     .with_num_blocks(2)
///     .set_block(NodeIndex::new(1), BlockIndex::new(1));
/// let g = b.build().unwrap();
/// assert_eq!(edge_cut(&g), 5);
/// ```
pub fn edge_cut<T>(graph: &CommGraph<T>) -> T
where
    T: CostNumeric,
{
    edge_cut_with_map(graph, graph.blocks())
}

/// Returns the edge cut under the external labeling `map`.
///
/// # Panics
///
/// Panics if `map.len() != graph.num_nodes()`.
pub fn edge_cut_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> T
where
    T: CostNumeric,
{
    assert_map_len(graph, map);
    directed_cut(graph, map) / (T::one() + T::one())
}

/// Returns the directed weight from block `lhs` into block `rhs`.
///
/// Unlike [`edge_cut`] the result is not halved: it sums the out-edges of
/// `lhs` nodes that land in `rhs`.
pub fn edge_cut_between<T>(graph: &CommGraph<T>, lhs: BlockIndex, rhs: BlockIndex) -> T
where
    T: CostNumeric,
{
    let map = graph.blocks();
    let mut cut = T::zero();
    for u in graph.nodes().filter(|u| map[u.get()] == lhs) {
        for (v, w) in graph.out_edges(u) {
            if map[v.get()] == rhs {
                cut = cut.saturating_add(w);
            }
        }
    }
    cut
}

/// Returns the number of connected components of the subgraph that keeps
/// only edges between equally labelled nodes.
pub fn count_block_components<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    assert_map_len(graph, map);
    let mut uf = UnionFind::new(graph.num_nodes());
    for u in graph.nodes() {
        let bu = map[u.get()];
        for &v in graph.neighbors(u) {
            if map[v.get()] == bu {
                uf.union(u.get(), v.get());
            }
        }
    }
    uf.num_sets()
}

/// Returns the edge cut, penalized when blocks are internally disconnected.
///
/// If the label-induced subgraph has exactly `graph.num_blocks()` components
/// the plain cut is returned. Otherwise the cut is increased by the sum of
/// all directed edge weights times the number of components, which dominates
/// any cut a connected partition could have. The penalized value saturates
/// at `T::max_value()`.
pub fn edge_cut_connected<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> T
where
    T: CostNumeric,
{
    let cut = edge_cut_with_map(graph, map);
    let components = count_block_components(graph, map);
    log::debug!(
        "partition has {} connected components over {} blocks",
        components,
        graph.num_blocks()
    );

    if components == graph.num_blocks() {
        return cut;
    }
    let penalty = graph
        .total_directed_weight()
        .saturating_mul(&saturating_from_usize(components));
    cut.saturating_add(penalty)
}

/// Returns the number of nodes with at least one cut edge.
pub fn boundary_nodes<T>(graph: &CommGraph<T>) -> usize
where
    T: CostNumeric,
{
    boundary_nodes_with_map(graph, graph.blocks())
}

/// Returns the number of boundary nodes under the labeling `map`.
pub fn boundary_nodes_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    assert_map_len(graph, map);
    graph
        .nodes()
        .filter(|&u: &NodeIndex| {
            let bu = map[u.get()];
            graph.neighbors(u).iter().any(|v| map[v.get()] != bu)
        })
        .count()
}

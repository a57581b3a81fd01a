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

//! # Reference QAP Cost
//!
//! The quadratic assignment cost of a rank assignment is
//! `sum over directed edges (u -> v, w) of w * D(rank[u], rank[v])`. Since
//! every link is stored in both directions each link contributes twice; this
//! matches the incremental bookkeeping of the local search, which uses this
//! function as its ground truth.
//!
//! [`total_qap`] and [`node_contribution`] saturate at `T::max_value()`, which
//! is exact whenever `sum of directed weights * max distance` fits in `T`. The
//! `checked_*` variants return `None` instead of clamping.

use rankmap_core::num::CostNumeric;
use rankmap_model::{
    distance::DistanceProvider,
    graph::CommGraph,
    index::{NodeIndex, RankIndex},
    matrix::DenseMatrix,
};

/// Returns the share of the QAP cost carried by the out-edges of `node`,
/// saturating at `T::max_value()`.
///
/// # Panics
///
/// Panics if `node` or any rank is out of bounds.
#[inline]
pub fn node_contribution<T, D>(
    graph: &CommGraph<T>,
    distance: &D,
    ranks: &[RankIndex],
    node: NodeIndex,
) -> T
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    let ru = ranks[node.get()];
    graph.out_edges(node).fold(T::zero(), |acc, (v, w)| {
        acc.saturating_add(w.saturating_mul(&distance.distance(ru, ranks[v.get()])))
    })
}

/// Like [`node_contribution`], but returns `None` if the contribution does
/// not fit in `T`.
///
/// # Panics
///
/// Panics if `node` or any rank is out of bounds.
#[inline]
pub fn checked_node_contribution<T, D>(
    graph: &CommGraph<T>,
    distance: &D,
    ranks: &[RankIndex],
    node: NodeIndex,
) -> Option<T>
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    let ru = ranks[node.get()];
    graph.out_edges(node).try_fold(T::zero(), |acc, (v, w)| {
        acc.checked_add(&w.checked_mul(&distance.distance(ru, ranks[v.get()]))?)
    })
}

/// Recomputes the QAP cost of `ranks` from scratch, saturating at
/// `T::max_value()`.
///
/// # Panics
///
/// Panics if `ranks.len() != graph.num_nodes()` or a rank is out of range
/// for `distance`.
///
/// # Examples
///
/// ```rust
/// # use rankmap_model::graph::CommGraphBuilder;
/// # use rankmap_model::distance::DenseDistanceMatrix;
/// # use rankmap_model::assignment::identity_assignment;
/// # use rankmap_model::index::NodeIndex;
/// # use rankmap_metrics::qap::total_qap;
/// let mut b = CommGraphBuilder::<i64>::new(2);
/// b.add_edge(NodeIndex::new(0), NodeIndex::new(1), 3);
/// let g = b.build().unwrap();
/// let d = DenseDistanceMatrix::new(2, vec![0, 2, 2, 0]).unwrap();
/// // both directions: 3 * 2 + 3 * 2
/// assert_eq!(total_qap(&g, &d, &identity_assignment(2)), 12);
/// ```
pub fn total_qap<T, D>(graph: &CommGraph<T>, distance: &D, ranks: &[RankIndex]) -> T
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    assert_eq!(
        ranks.len(),
        graph.num_nodes(),
        "called `total_qap` with an assignment of length {} for a graph with {} nodes",
        ranks.len(),
        graph.num_nodes()
    );

    graph.nodes().fold(T::zero(), |acc, u| {
        acc.saturating_add(node_contribution(graph, distance, ranks, u))
    })
}

/// Recomputes the QAP cost of `ranks` from scratch, or returns `None` if it
/// does not fit in `T`.
///
/// # Panics
///
/// Panics if `ranks.len() != graph.num_nodes()` or a rank is out of range
/// for `distance`.
///
/// # Examples
///
/// ```rust
/// # use rankmap_model::graph::CommGraphBuilder;
/// # use rankmap_model::distance::DenseDistanceMatrix;
/// # use rankmap_model::assignment::identity_assignment;
/// # use rankmap_model::index::NodeIndex;
/// # use rankmap_metrics::qap::checked_total_qap;
/// let mut b = CommGraphBuilder::<i8>::new(2);
/// b.add_edge(NodeIndex::new(0), NodeIndex::new(1), 100);
/// let g = b.build().unwrap();
/// let d = DenseDistanceMatrix::new(2, vec![0, 2, 2, 0]).unwrap();
/// assert_eq!(checked_total_qap(&g, &d, &identity_assignment(2)), None);
/// ```
pub fn checked_total_qap<T, D>(
    graph: &CommGraph<T>,
    distance: &D,
    ranks: &[RankIndex],
) -> Option<T>
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    assert_eq!(
        ranks.len(),
        graph.num_nodes(),
        "called `checked_total_qap` with an assignment of length {} for a graph with {} nodes",
        ranks.len(),
        graph.num_nodes()
    );

    graph.nodes().try_fold(T::zero(), |acc, u| {
        acc.checked_add(&checked_node_contribution(graph, distance, ranks, u)?)
    })
}

/// Computes `sum_{i,j} C(i, j) * D(rank[i], rank[j])` for a dense
/// communication matrix `C`, saturating at `T::max_value()`.
///
/// # Panics
///
/// Panics if `comm` is not `ranks.len() x ranks.len()` or a rank is out of
/// range for `distance`.
pub fn total_qap_dense<T, D>(comm: &DenseMatrix<T>, distance: &D, ranks: &[RankIndex]) -> T
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    let n = ranks.len();
    assert!(
        comm.rows() == n && comm.cols() == n,
        "called `total_qap_dense` with a {}x{} communication matrix for {} nodes",
        comm.rows(),
        comm.cols(),
        n
    );

    let mut total = T::zero();
    for i in 0..n {
        let ri = ranks[i];
        for (j, &c) in comm.row(i).iter().enumerate() {
            if c != T::zero() {
                total = total.saturating_add(c.saturating_mul(&distance.distance(ri, ranks[j])));
            }
        }
    }
    total
}

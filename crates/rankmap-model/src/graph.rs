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

//! # Communication Graph
//!
//! The communication graph describes which tasks talk to each other and how
//! much. Every undirected link `{u, v}` of volume `w` is stored as the two
//! directed edges `u -> v` and `v -> u`, both carrying `w`. Sums taken over
//! directed edges therefore count every link twice; metrics that report link
//! totals halve them explicitly.
//!
//! Storage follows a compressed sparse row layout. The out-edges of node `u`
//! occupy `targets[offsets[u]..offsets[u + 1]]` and the parallel slice of
//! `weights`, so neighbor scans are linear walks over contiguous memory. The
//! offsets array always has `num_nodes + 1` entries.
//!
//! Graphs are immutable after construction with one exception: partition
//! labels can be rewritten, since quality metrics are evaluated against
//! alternative labelings of the same structure.

use crate::{
    error::GraphError,
    index::{BlockIndex, NodeIndex},
};
use rankmap_core::num::CostNumeric;
use rustc_hash::FxHashMap;

/// An immutable, symmetric communication graph in CSR form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommGraph<T> {
    // Start of each node's out-edge range, `num_nodes + 1` entries.
    offsets: Vec<usize>,
    targets: Vec<NodeIndex>, // len = num_directed_edges
    weights: Vec<T>,         // len = num_directed_edges
    node_weights: Vec<T>,    // len = num_nodes
    blocks: Vec<BlockIndex>, // len = num_nodes
    num_blocks: usize,
}

impl<T> CommGraph<T>
where
    T: CostNumeric,
{
    /// Builds a graph from prebuilt CSR arrays.
    ///
    /// The arrays are verified: offsets must start at zero, be monotone and end
    /// at `targets.len()`; targets must be in range and never equal their
    /// source; weights must be non-negative; and every directed edge must have
    /// a reverse edge of the same weight. All nodes start in block 0 of a
    /// single-block partition; see [`CommGraph::with_blocks`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rankmap_model::graph::CommGraph;
    /// # use rankmap_model::index::NodeIndex;
    /// // a single link 0 <-> 1 of volume 3
    /// let g = CommGraph::<i64>::from_csr(
    ///     vec![0, 1, 2],
    ///     vec![NodeIndex::new(1), NodeIndex::new(0)],
    ///     vec![3, 3],
    ///     vec![1, 1],
    /// )
    /// .unwrap();
    /// assert_eq!(g.num_nodes(), 2);
    /// assert_eq!(g.num_directed_edges(), 2);
    /// ```
    pub fn from_csr(
        offsets: Vec<usize>,
        targets: Vec<NodeIndex>,
        weights: Vec<T>,
        node_weights: Vec<T>,
    ) -> Result<Self, GraphError> {
        if offsets.is_empty() {
            return Err(GraphError::MalformedCsr(
                "offsets must contain at least one entry".to_string(),
            ));
        }
        let num_nodes = offsets.len() - 1;

        if offsets[0] != 0 {
            return Err(GraphError::MalformedCsr(format!(
                "offsets must start at 0, found {}",
                offsets[0]
            )));
        }
        if let Some(w) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(GraphError::MalformedCsr(format!(
                "offsets decrease between node {} and node {}",
                w,
                w + 1
            )));
        }
        if offsets[num_nodes] != targets.len() {
            return Err(GraphError::MalformedCsr(format!(
                "last offset is {} but there are {} targets",
                offsets[num_nodes],
                targets.len()
            )));
        }
        if weights.len() != targets.len() {
            return Err(GraphError::MalformedCsr(format!(
                "{} targets but {} edge weights",
                targets.len(),
                weights.len()
            )));
        }
        if node_weights.len() != num_nodes {
            return Err(GraphError::MalformedCsr(format!(
                "{} nodes but {} node weights",
                num_nodes,
                node_weights.len()
            )));
        }

        for (u, &nw) in node_weights.iter().enumerate() {
            if nw < T::zero() {
                return Err(GraphError::NegativeNodeWeight {
                    node: NodeIndex::new(u),
                    weight: nw.to_string(),
                });
            }
        }

        let mut directed: FxHashMap<(usize, usize), T> = FxHashMap::default();
        directed.reserve(targets.len());
        for u in 0..num_nodes {
            for e in offsets[u]..offsets[u + 1] {
                let v = targets[e].get();
                let w = weights[e];
                if v >= num_nodes {
                    return Err(GraphError::NodeOutOfBounds {
                        node: targets[e],
                        num_nodes,
                    });
                }
                if v == u {
                    return Err(GraphError::SelfLoop(NodeIndex::new(u)));
                }
                if w < T::zero() {
                    return Err(GraphError::NegativeEdgeWeight {
                        source_node: NodeIndex::new(u),
                        target: targets[e],
                        weight: w.to_string(),
                    });
                }
                if directed.insert((u, v), w).is_some() {
                    return Err(GraphError::MalformedCsr(format!(
                        "duplicate edge {} -> {}",
                        u, v
                    )));
                }
            }
        }

        for (&(u, v), &w) in &directed {
            if directed.get(&(v, u)) != Some(&w) {
                return Err(GraphError::AsymmetricEdge {
                    source_node: NodeIndex::new(u),
                    target: NodeIndex::new(v),
                });
            }
        }

        Ok(Self {
            offsets,
            targets,
            weights,
            node_weights,
            blocks: vec![BlockIndex::new(0); num_nodes],
            num_blocks: 1,
        })
    }

    /// Replaces the partition with `blocks` over `num_blocks` blocks.
    pub fn with_blocks(
        mut self,
        blocks: Vec<BlockIndex>,
        num_blocks: usize,
    ) -> Result<Self, GraphError> {
        if num_blocks == 0 {
            return Err(GraphError::ZeroBlocks);
        }
        if blocks.len() != self.num_nodes() {
            return Err(GraphError::MalformedCsr(format!(
                "{} nodes but {} block labels",
                self.num_nodes(),
                blocks.len()
            )));
        }
        if let Some(u) = blocks.iter().position(|b| b.get() >= num_blocks) {
            return Err(GraphError::BlockOutOfBounds {
                node: NodeIndex::new(u),
                block: blocks[u],
                num_blocks,
            });
        }
        self.blocks = blocks;
        self.num_blocks = num_blocks;
        Ok(self)
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the number of directed edges, i.e. twice the number of links.
    #[inline]
    pub fn num_directed_edges(&self) -> usize {
        self.targets.len()
    }

    /// Returns the number of partition blocks `K`.
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_nodes() == 0
    }

    /// Returns an iterator over all node indices in ascending order.
    #[inline]
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeIndex> + Clone + use<T> {
        (0..self.num_nodes()).map(NodeIndex::new)
    }

    /// Returns the out-degree of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn degree(&self, node: NodeIndex) -> usize {
        let u = node.get();
        assert!(
            u < self.num_nodes(),
            "called `CommGraph::degree` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );
        self.offsets[u + 1] - self.offsets[u]
    }

    /// Returns the `(target, weight)` pairs of the out-edges of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn out_edges(&self, node: NodeIndex) -> OutEdges<'_, T> {
        let u = node.get();
        assert!(
            u < self.num_nodes(),
            "called `CommGraph::out_edges` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );
        // SAFETY: bounds checked above.
        unsafe { self.out_edges_unchecked(node) }
    }

    /// Returns the out-edges of `node` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `node.get() < self.num_nodes()`.
    #[inline(always)]
    pub unsafe fn out_edges_unchecked(&self, node: NodeIndex) -> OutEdges<'_, T> {
        let u = node.get();
        debug_assert!(
            u < self.num_nodes(),
            "called `CommGraph::out_edges_unchecked` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );

        // SAFETY: u + 1 < offsets.len() by the caller contract, and every
        // offset is bounded by targets.len() == weights.len().
        unsafe {
            let start = *self.offsets.get_unchecked(u);
            let end = *self.offsets.get_unchecked(u + 1);
            OutEdges {
                targets: self.targets.get_unchecked(start..end).iter(),
                weights: self.weights.get_unchecked(start..end).iter(),
            }
        }
    }

    /// Returns the targets of the out-edges of `node` as a slice.
    #[inline]
    pub fn neighbors(&self, node: NodeIndex) -> &[NodeIndex] {
        let u = node.get();
        assert!(
            u < self.num_nodes(),
            "called `CommGraph::neighbors` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );
        &self.targets[self.offsets[u]..self.offsets[u + 1]]
    }

    /// Returns the weight of `node`.
    #[inline]
    pub fn node_weight(&self, node: NodeIndex) -> T {
        let u = node.get();
        assert!(
            u < self.num_nodes(),
            "called `CommGraph::node_weight` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );
        self.node_weights[u]
    }

    /// Returns the node weights indexed by node.
    #[inline]
    pub fn node_weights(&self) -> &[T] {
        &self.node_weights
    }

    /// Returns the block label of `node`.
    #[inline]
    pub fn block(&self, node: NodeIndex) -> BlockIndex {
        let u = node.get();
        assert!(
            u < self.num_nodes(),
            "called `CommGraph::block` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            u
        );
        self.blocks[u]
    }

    /// Returns the block labels indexed by node.
    #[inline]
    pub fn blocks(&self) -> &[BlockIndex] {
        &self.blocks
    }

    /// Relabels `node` to `block`.
    pub fn set_block(&mut self, node: NodeIndex, block: BlockIndex) -> Result<(), GraphError> {
        let num_nodes = self.num_nodes();
        if node.get() >= num_nodes {
            return Err(GraphError::NodeOutOfBounds { node, num_nodes });
        }
        if block.get() >= self.num_blocks {
            return Err(GraphError::BlockOutOfBounds {
                node,
                block,
                num_blocks: self.num_blocks,
            });
        }
        self.blocks[node.get()] = block;
        Ok(())
    }

    /// Sum of all directed edge weights (twice the total link volume),
    /// saturating at `T::max_value()`.
    pub fn total_directed_weight(&self) -> T {
        self.weights.iter().fold(T::zero(), |acc, &w| acc.saturating_add(w))
    }

    /// Sum of all node weights, saturating at `T::max_value()`.
    pub fn total_node_weight(&self) -> T {
        self.node_weights
            .iter()
            .fold(T::zero(), |acc, &w| acc.saturating_add(w))
    }
}

/// Iterator over the `(target, weight)` pairs of one node's out-edges.
#[derive(Debug, Clone)]
pub struct OutEdges<'a, T> {
    targets: std::slice::Iter<'a, NodeIndex>,
    weights: std::slice::Iter<'a, T>,
}

impl<T> Iterator for OutEdges<'_, T>
where
    T: Copy,
{
    type Item = (NodeIndex, T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match (self.targets.next(), self.weights.next()) {
            (Some(&v), Some(&w)) => Some((v, w)),
            _ => None,
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.targets.size_hint()
    }
}

impl<T> ExactSizeIterator for OutEdges<'_, T> where T: Copy {}

/// Mutable builder for `CommGraph`.
///
/// Edges are added as undirected links and expanded into both directions by
/// [`CommGraphBuilder::build`]. Adding the same link twice sums the volumes.
/// Validation is deferred to `build`, so setters can be chained freely.
#[derive(Debug, Clone)]
pub struct CommGraphBuilder<T> {
    num_nodes: usize,
    links: Vec<(usize, usize, T)>,
    node_weights: Vec<T>,
    blocks: Vec<BlockIndex>,
    num_blocks: usize,
}

impl<T> CommGraphBuilder<T>
where
    T: CostNumeric,
{
    /// Creates a builder for `num_nodes` nodes of weight 1 in a single block.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            links: Vec::new(),
            node_weights: vec![T::one(); num_nodes],
            blocks: vec![BlockIndex::new(0); num_nodes],
            num_blocks: 1,
        }
    }

    /// Returns the number of nodes the graph will have.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Adds the undirected link `{u, v}` with communication volume `weight`.
    pub fn add_edge(&mut self, u: NodeIndex, v: NodeIndex, weight: T) -> &mut Self {
        self.links.push((u.get(), v.get(), weight));
        self
    }

    /// Sets the weight of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    pub fn set_node_weight(&mut self, node: NodeIndex, weight: T) -> &mut Self {
        assert!(
            node.get() < self.num_nodes,
            "called `CommGraphBuilder::set_node_weight` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            node.get()
        );
        self.node_weights[node.get()] = weight;
        self
    }

    /// Sets the block label of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    pub fn set_block(&mut self, node: NodeIndex, block: BlockIndex) -> &mut Self {
        assert!(
            node.get() < self.num_nodes,
            "called `CommGraphBuilder::set_block` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            node.get()
        );
        self.blocks[node.get()] = block;
        self
    }

    /// Sets the number of partition blocks `K`.
    pub fn with_num_blocks(&mut self, num_blocks: usize) -> &mut Self {
        self.num_blocks = num_blocks;
        self
    }

    /// Validates the collected data and produces the CSR graph.
    pub fn build(&self) -> Result<CommGraph<T>, GraphError> {
        let n = self.num_nodes;
        if self.num_blocks == 0 {
            return Err(GraphError::ZeroBlocks);
        }

        for (u, &w) in self.node_weights.iter().enumerate() {
            if w < T::zero() {
                return Err(GraphError::NegativeNodeWeight {
                    node: NodeIndex::new(u),
                    weight: w.to_string(),
                });
            }
        }
        for (u, &b) in self.blocks.iter().enumerate() {
            if b.get() >= self.num_blocks {
                return Err(GraphError::BlockOutOfBounds {
                    node: NodeIndex::new(u),
                    block: b,
                    num_blocks: self.num_blocks,
                });
            }
        }

        let mut directed: Vec<(usize, usize, T)> = Vec::with_capacity(self.links.len() * 2);
        for &(u, v, w) in &self.links {
            for x in [u, v] {
                if x >= n {
                    return Err(GraphError::NodeOutOfBounds {
                        node: NodeIndex::new(x),
                        num_nodes: n,
                    });
                }
            }
            if u == v {
                return Err(GraphError::SelfLoop(NodeIndex::new(u)));
            }
            if w < T::zero() {
                return Err(GraphError::NegativeEdgeWeight {
                    source_node: NodeIndex::new(u),
                    target: NodeIndex::new(v),
                    weight: w.to_string(),
                });
            }
            directed.push((u, v, w));
            directed.push((v, u, w));
        }

        directed.sort_unstable_by_key(|&(u, v, _)| (u, v));

        let mut offsets = vec![0usize; n + 1];
        let mut targets = Vec::with_capacity(directed.len());
        let mut weights: Vec<T> = Vec::with_capacity(directed.len());
        let mut last: Option<(usize, usize)> = None;

        for &(u, v, w) in &directed {
            if last == Some((u, v)) {
                // parallel link, merge into the previous entry
                let merged = weights.last_mut().ok_or_else(|| {
                    GraphError::MalformedCsr("merge without a previous edge".to_string())
                })?;
                *merged = merged.checked_add(&w).ok_or_else(|| {
                    GraphError::MalformedCsr(format!("edge weight overflow on {} -> {}", u, v))
                })?;
                continue;
            }
            last = Some((u, v));
            offsets[u + 1] += 1;
            targets.push(NodeIndex::new(v));
            weights.push(w);
        }

        for u in 0..n {
            offsets[u + 1] += offsets[u];
        }

        Ok(CommGraph {
            offsets,
            targets,
            weights,
            node_weights: self.node_weights.clone(),
            blocks: self.blocks.clone(),
            num_blocks: self.num_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring(len: usize) -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(len);
        for i in 0..len {
            b.add_edge(n(i), n((i + 1) % len), 1);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let g = CommGraphBuilder::<i64>::new(3).build().unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_blocks(), 1);
        assert_eq!(g.num_directed_edges(), 0);
        for u in g.nodes() {
            assert_eq!(g.node_weight(u), 1);
            assert_eq!(g.block(u), BlockIndex::new(0));
        }
    }

    #[test]
    fn test_builder_stores_both_directions() {
        let g = ring(4);
        assert_eq!(g.num_directed_edges(), 8);
        for u in g.nodes() {
            assert_eq!(g.degree(u), 2);
            for (v, w) in g.out_edges(u) {
                assert!(g.out_edges(v).any(|(x, xw)| x == u && xw == w));
            }
        }
        assert_eq!(g.total_directed_weight(), 8);
    }

    #[test]
    fn test_builder_sorts_and_merges_parallel_links() {
        let mut b = CommGraphBuilder::<i64>::new(3);
        b.add_edge(n(0), n(2), 4).add_edge(n(0), n(1), 1).add_edge(n(2), n(0), 3);
        let g = b.build().unwrap();
        let edges: Vec<_> = g.out_edges(n(0)).collect();
        assert_eq!(edges, vec![(n(1), 1), (n(2), 7)]);
        assert_eq!(g.out_edges(n(2)).collect::<Vec<_>>(), vec![(n(0), 7)]);
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let mut b = CommGraphBuilder::<i64>::new(2);
        b.add_edge(n(0), n(0), 1);
        assert_eq!(b.build(), Err(GraphError::SelfLoop(n(0))));

        let mut b = CommGraphBuilder::<i64>::new(2);
        b.add_edge(n(0), n(5), 1);
        assert!(matches!(b.build(), Err(GraphError::NodeOutOfBounds { .. })));

        let mut b = CommGraphBuilder::<i64>::new(2);
        b.add_edge(n(0), n(1), -2);
        assert!(matches!(b.build(), Err(GraphError::NegativeEdgeWeight { .. })));

        let mut b = CommGraphBuilder::<i64>::new(2);
        b.set_node_weight(n(1), -1);
        assert!(matches!(b.build(), Err(GraphError::NegativeNodeWeight { .. })));

        let mut b = CommGraphBuilder::<i64>::new(2);
        b.with_num_blocks(2).set_block(n(1), BlockIndex::new(2));
        assert!(matches!(b.build(), Err(GraphError::BlockOutOfBounds { .. })));

        let mut b = CommGraphBuilder::<i64>::new(2);
        b.with_num_blocks(0);
        assert_eq!(b.build(), Err(GraphError::ZeroBlocks));
    }

    #[test]
    fn test_from_csr_accepts_symmetric_graph() {
        let built = ring(3);
        let g = CommGraph::from_csr(
            vec![0, 2, 4, 6],
            vec![n(1), n(2), n(0), n(2), n(0), n(1)],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 1, 1],
        )
        .unwrap();
        assert_eq!(g, built);
    }

    #[test]
    fn test_from_csr_rejects_asymmetric_weights() {
        let err = CommGraph::<i64>::from_csr(
            vec![0, 1, 2],
            vec![n(1), n(0)],
            vec![2, 3],
            vec![1, 1],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::AsymmetricEdge { .. }));
    }

    #[test]
    fn test_from_csr_rejects_missing_reverse_edge() {
        let err =
            CommGraph::<i64>::from_csr(vec![0, 1, 1], vec![n(1)], vec![2], vec![1, 1]).unwrap_err();
        assert!(matches!(err, GraphError::AsymmetricEdge { .. }));
    }

    #[test]
    fn test_from_csr_rejects_malformed_offsets() {
        let err = CommGraph::<i64>::from_csr(
            vec![0, 2, 1],
            vec![n(1), n(0)],
            vec![1, 1],
            vec![1, 1],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::MalformedCsr(_)));

        let err = CommGraph::<i64>::from_csr(vec![], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, GraphError::MalformedCsr(_)));
    }

    #[test]
    fn test_with_blocks_and_relabel() {
        let g = ring(4)
            .with_blocks(
                vec![
                    BlockIndex::new(0),
                    BlockIndex::new(0),
                    BlockIndex::new(1),
                    BlockIndex::new(1),
                ],
                2,
            )
            .unwrap();
        assert_eq!(g.num_blocks(), 2);
        assert_eq!(g.block(n(2)), BlockIndex::new(1));

        let mut g = g;
        g.set_block(n(2), BlockIndex::new(0)).unwrap();
        assert_eq!(g.block(n(2)), BlockIndex::new(0));
        assert!(g.set_block(n(2), BlockIndex::new(2)).is_err());
        assert!(g.set_block(n(9), BlockIndex::new(0)).is_err());
    }

    #[test]
    fn test_iterators_are_restartable() {
        let g = ring(5);
        let nodes = g.nodes();
        assert_eq!(nodes.clone().count(), 5);
        assert_eq!(nodes.count(), 5);

        let edges = g.out_edges(n(0));
        assert_eq!(edges.len(), 2);
        let first: Vec<_> = edges.clone().collect();
        let second: Vec<_> = edges.collect();
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_edges_out_of_bounds_panics() {
        let g = ring(3);
        let _ = g.out_edges(n(3));
    }
}

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

//! Pairs of nodes that are close in the communication graph.
//!
//! Swapping two tasks that never communicate, directly or through a short
//! chain, rarely pays off. This space restricts candidates to pairs within
//! `depth` hops of each other and visits them in a seeded random order.
//!
//! It is adaptive: after an accepted swap of `(a, b)` every pair around `a`
//! and `b` is queued in a focus list and tried before the main order resumes,
//! since an improvement tends to open further improvements nearby. Focus pairs
//! that get rejected do not count towards termination; the search is done
//! once the focus list is empty and one full pass over the main order was
//! rejected.

use crate::search_space::SearchSpace;
use fixedbitset::FixedBitSet;
use rand::{seq::SliceRandom, Rng};
use rankmap_core::num::CostNumeric;
use rankmap_model::{error::ConfigError, graph::CommGraph, index::NodeIndex};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct CommunicationGraphSearchSpace<R> {
    num_nodes: usize,
    depth: usize,
    // CSR of the nodes within `depth` hops of each node, excluding itself
    reach_offsets: Vec<usize>,
    reach: Vec<NodeIndex>,
    pairs: Vec<(NodeIndex, NodeIndex)>,
    cursor: usize,
    focus: VecDeque<(NodeIndex, NodeIndex)>,
    max_focus: usize,
    last_pair: Option<(NodeIndex, NodeIndex)>,
    last_from_focus: bool,
    unsuccessful: usize,
    rng: R,
}

/// Collects, for every node, the nodes reachable within `depth` hops.
fn build_reach<T>(graph: &CommGraph<T>, depth: usize) -> (Vec<usize>, Vec<NodeIndex>)
where
    T: CostNumeric,
{
    let n = graph.num_nodes();
    let mut offsets = Vec::with_capacity(n + 1);
    let mut reach = Vec::new();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut frontier: Vec<NodeIndex> = Vec::new();
    let mut next: Vec<NodeIndex> = Vec::new();

    offsets.push(0);
    for source in graph.nodes() {
        let start = reach.len();
        visited.insert(source.get());
        frontier.clear();
        frontier.push(source);

        for _ in 0..depth {
            next.clear();
            for &u in &frontier {
                for &v in graph.neighbors(u) {
                    if !visited.put(v.get()) {
                        next.push(v);
                        reach.push(v);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            std::mem::swap(&mut frontier, &mut next);
        }

        // reset only what this search touched
        visited.set(source.get(), false);
        for v in &reach[start..] {
            visited.set(v.get(), false);
        }
        offsets.push(reach.len());
    }
    (offsets, reach)
}

impl<R> CommunicationGraphSearchSpace<R>
where
    R: Rng,
{
    /// Creates the space for `graph`, pairing nodes at most `depth` hops apart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDepth`] if `depth == 0`.
    pub fn new<T>(graph: &CommGraph<T>, depth: usize, mut rng: R) -> Result<Self, ConfigError>
    where
        T: CostNumeric,
    {
        if depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }

        let (reach_offsets, reach) = build_reach(graph, depth);
        let mut pairs = Vec::with_capacity(reach.len() / 2);
        for u in graph.nodes() {
            for &v in &reach[reach_offsets[u.get()]..reach_offsets[u.get() + 1]] {
                if u < v {
                    pairs.push((u, v));
                }
            }
        }
        pairs.shuffle(&mut rng);

        Ok(Self {
            num_nodes: graph.num_nodes(),
            depth,
            reach_offsets,
            reach,
            max_focus: pairs.len(),
            pairs,
            cursor: 0,
            focus: VecDeque::new(),
            last_pair: None,
            last_from_focus: false,
            unsuccessful: 0,
            rng,
        })
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of distinct candidate pairs.
    #[inline]
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Returns the nodes within `depth` hops of `node`.
    #[inline]
    pub fn reachable(&self, node: NodeIndex) -> &[NodeIndex] {
        let u = node.get();
        assert!(
            u < self.num_nodes,
            "called `CommunicationGraphSearchSpace::reachable` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes,
            u
        );
        &self.reach[self.reach_offsets[u]..self.reach_offsets[u + 1]]
    }

    /// Returns the number of pairs waiting in the focus list.
    #[inline]
    pub fn focus_len(&self) -> usize {
        self.focus.len()
    }

    fn enqueue_focus(&mut self, a: NodeIndex, b: NodeIndex) {
        for x in [a, b] {
            let (start, end) = (self.reach_offsets[x.get()], self.reach_offsets[x.get() + 1]);
            for &y in &self.reach[start..end] {
                if self.focus.len() >= self.max_focus {
                    return;
                }
                self.focus.push_back((x, y));
            }
        }
    }
}

impl<R> SearchSpace for CommunicationGraphSearchSpace<R>
where
    R: Rng,
{
    fn name(&self) -> &str {
        "CommunicationGraphSearchSpace"
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Restarts the main order with a fresh shuffle and an empty focus list.
    fn on_start(&mut self) {
        self.pairs.shuffle(&mut self.rng);
        self.cursor = 0;
        self.focus.clear();
        self.last_pair = None;
        self.last_from_focus = false;
        self.unsuccessful = 0;
    }

    #[inline]
    fn done(&self) -> bool {
        self.focus.is_empty() && self.unsuccessful >= self.pairs.len()
    }

    fn next_pair(&mut self) -> (NodeIndex, NodeIndex) {
        if let Some(pair) = self.focus.pop_front() {
            self.last_pair = Some(pair);
            self.last_from_focus = true;
            return pair;
        }

        debug_assert!(
            !self.pairs.is_empty(),
            "called `CommunicationGraphSearchSpace::next_pair` without candidate pairs"
        );
        let pair = self.pairs[self.cursor];
        self.cursor += 1;
        if self.cursor == self.pairs.len() {
            self.cursor = 0;
        }
        self.last_pair = Some(pair);
        self.last_from_focus = false;
        pair
    }

    fn commit_status(&mut self, accepted: bool) {
        if accepted {
            self.unsuccessful = 0;
            if let Some((a, b)) = self.last_pair {
                self.enqueue_focus(a, b);
            }
        } else if !self.last_from_focus {
            self.unsuccessful += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rankmap_model::graph::CommGraphBuilder;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn path(len: usize) -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(len);
        for i in 1..len {
            b.add_edge(n(i - 1), n(i), 1);
        }
        b.build().unwrap()
    }

    fn sorted_pairs<R: Rng>(space: &CommunicationGraphSearchSpace<R>) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = space
            .pairs
            .iter()
            .map(|(a, b)| (a.get(), b.get()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_rejects_zero_depth() {
        assert!(matches!(
            CommunicationGraphSearchSpace::new(&path(3), 0, ChaCha8Rng::seed_from_u64(42)),
            Err(ConfigError::ZeroDepth)
        ));
    }

    #[test]
    fn test_depth_one_pairs_are_edges() {
        let space =
            CommunicationGraphSearchSpace::new(&path(4), 1, ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(sorted_pairs(&space), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_depth_two_adds_two_hop_pairs() {
        let space =
            CommunicationGraphSearchSpace::new(&path(4), 2, ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(
            sorted_pairs(&space),
            vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]
        );
        let mut reach: Vec<_> = space.reachable(n(1)).iter().map(|v| v.get()).collect();
        reach.sort_unstable();
        assert_eq!(reach, vec![0, 2, 3]);
    }

    #[test]
    fn test_terminates_after_full_rejected_pass() {
        let mut space =
            CommunicationGraphSearchSpace::new(&path(5), 1, ChaCha8Rng::seed_from_u64(42)).unwrap();
        space.on_start();
        let mut steps = 0;
        while !space.done() {
            let (a, b) = space.next_pair();
            assert_ne!(a, b);
            space.commit_status(false);
            steps += 1;
        }
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_accepted_swap_focuses_neighborhood() {
        let mut space =
            CommunicationGraphSearchSpace::new(&path(5), 1, ChaCha8Rng::seed_from_u64(42)).unwrap();
        space.on_start();

        let (a, b) = space.next_pair();
        space.commit_status(true);
        let expected = space.reachable(a).len() + space.reachable(b).len();
        assert_eq!(space.focus_len(), expected);

        // focus pairs are served first and their rejections are free
        for _ in 0..expected {
            let (x, _) = space.next_pair();
            assert!(x == a || x == b);
            space.commit_status(false);
            assert!(!space.done());
        }
        assert_eq!(space.focus_len(), 0);

        let mut steps = 0;
        while !space.done() {
            space.next_pair();
            space.commit_status(false);
            steps += 1;
        }
        assert_eq!(steps, space.num_pairs());
    }

    #[test]
    fn test_isolated_nodes_have_no_pairs() {
        let g = CommGraphBuilder::<i64>::new(3).build().unwrap();
        let space = CommunicationGraphSearchSpace::new(&g, 2, ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(space.num_pairs(), 0);
        assert!(space.done());
    }
}

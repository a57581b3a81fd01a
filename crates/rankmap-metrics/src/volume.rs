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

//! Communication volume.
//!
//! The communication volume of a block is the number of *distinct* other
//! blocks it has at least one edge to. It counts neighbors, not weight: a
//! block talking heavily to one other block has volume 1.

use crate::effective_num_blocks;
use rankmap_core::num::CostNumeric;
use rankmap_model::{graph::CommGraph, index::BlockIndex};

/// Returns the communication volume of every block, indexed by block.
///
/// The result has one entry per block, including blocks without nodes. Runs
/// in `O(N + E + K)` by visiting the nodes block by block and stamping each
/// neighboring block once per visit.
pub fn communication_volumes_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> Vec<usize>
where
    T: CostNumeric,
{
    let k = effective_num_blocks(graph, map);

    // counting sort of the nodes by block
    let mut starts = vec![0usize; k + 1];
    for b in map {
        starts[b.get() + 1] += 1;
    }
    for b in 0..k {
        starts[b + 1] += starts[b];
    }
    let mut cursor = starts.clone();
    let mut by_block = vec![0usize; map.len()];
    for (u, b) in map.iter().enumerate() {
        by_block[cursor[b.get()]] = u;
        cursor[b.get()] += 1;
    }

    // stamp[b'] == b + 1 marks b' as already counted for block b
    let mut stamp = vec![0usize; k];
    let mut volumes = vec![0usize; k];
    for b in 0..k {
        for &u in &by_block[starts[b]..starts[b + 1]] {
            for v in graph.neighbors(u.into()) {
                let bv = map[v.get()].get();
                if bv != b && stamp[bv] != b + 1 {
                    stamp[bv] = b + 1;
                    volumes[b] += 1;
                }
            }
        }
    }
    volumes
}

/// Returns the communication volume of every block of the graph's partition.
pub fn communication_volumes<T>(graph: &CommGraph<T>) -> Vec<usize>
where
    T: CostNumeric,
{
    communication_volumes_with_map(graph, graph.blocks())
}

/// Returns the largest communication volume of any block.
pub fn max_communication_volume<T>(graph: &CommGraph<T>) -> usize
where
    T: CostNumeric,
{
    max_communication_volume_with_map(graph, graph.blocks())
}

pub fn max_communication_volume_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    communication_volumes_with_map(graph, map)
        .into_iter()
        .max()
        .unwrap_or(0)
}

/// Returns the smallest communication volume over all blocks.
///
/// Blocks without nodes have volume 0 and take part in the minimum.
pub fn min_communication_volume<T>(graph: &CommGraph<T>) -> usize
where
    T: CostNumeric,
{
    min_communication_volume_with_map(graph, graph.blocks())
}

pub fn min_communication_volume_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    communication_volumes_with_map(graph, map)
        .into_iter()
        .min()
        .unwrap_or(0)
}

/// Returns the sum of the communication volumes of all blocks.
pub fn total_communication_volume<T>(graph: &CommGraph<T>) -> usize
where
    T: CostNumeric,
{
    total_communication_volume_with_map(graph, graph.blocks())
}

pub fn total_communication_volume_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> usize
where
    T: CostNumeric,
{
    communication_volumes_with_map(graph, map).into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmap_core::utils::index::typed_vec;
    use rankmap_model::{graph::CommGraphBuilder, index::NodeIndex};

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn star() -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(4);
        b.add_edge(n(0), n(1), 1)
            .add_edge(n(0), n(2), 1)
            .add_edge(n(0), n(3), 1)
            .with_num_blocks(4)
            .set_block(n(0), BlockIndex::new(3))
            .set_block(n(1), BlockIndex::new(0))
            .set_block(n(2), BlockIndex::new(1))
            .set_block(n(3), BlockIndex::new(2));
        b.build().unwrap()
    }

    #[test]
    fn test_star_volumes() {
        let g = star();
        assert_eq!(communication_volumes(&g), vec![1, 1, 1, 3]);
        assert_eq!(max_communication_volume(&g), 3);
        assert_eq!(min_communication_volume(&g), 1);
        assert_eq!(total_communication_volume(&g), 6);
    }

    #[test]
    fn test_volume_counts_distinct_blocks_not_weight() {
        // block 0 = {0, 1}, block 1 = {2, 3}; three links cross
        let mut b = CommGraphBuilder::<i64>::new(4);
        b.add_edge(n(0), n(2), 7)
            .add_edge(n(1), n(2), 1)
            .add_edge(n(1), n(3), 2)
            .add_edge(n(0), n(1), 1);
        let g = b.build().unwrap();
        let map: Vec<BlockIndex> = typed_vec(&[0, 0, 1, 1]);
        assert_eq!(communication_volumes_with_map(&g, &map), vec![1, 1]);
    }

    #[test]
    fn test_empty_block_takes_part_in_minimum() {
        let mut b = CommGraphBuilder::<i64>::new(2);
        b.add_edge(n(0), n(1), 1)
            .with_num_blocks(3)
            .set_block(n(1), BlockIndex::new(1));
        let g = b.build().unwrap();
        assert_eq!(communication_volumes(&g), vec![1, 1, 0]);
        assert_eq!(min_communication_volume(&g), 0);
        assert_eq!(max_communication_volume(&g), 1);
    }

    #[test]
    fn test_map_variant_matches_graph_labels() {
        let g = star();
        let map = g.blocks().to_vec();
        let unlabelled = {
            let mut b = CommGraphBuilder::<i64>::new(4);
            b.add_edge(n(0), n(1), 1)
                .add_edge(n(0), n(2), 1)
                .add_edge(n(0), n(3), 1);
            b.build().unwrap()
        };
        assert_eq!(
            communication_volumes_with_map(&unlabelled, &map),
            communication_volumes(&g)
        );
    }
}

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

//! Human readable summary of partition and mapping quality.

use crate::{
    balance::balance_with_map,
    cut::{boundary_nodes_with_map, edge_cut_with_map},
    effective_num_blocks,
    volume::communication_volumes_with_map,
};
use rankmap_core::num::CostNumeric;
use rankmap_model::{graph::CommGraph, index::BlockIndex};

/// All partition metrics of one labeling, plus an optional QAP cost.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport<T> {
    pub num_nodes: usize,
    pub num_blocks: usize,
    pub edge_cut: T,
    pub boundary_nodes: usize,
    pub balance: f64,
    pub max_communication_volume: usize,
    pub min_communication_volume: usize,
    pub total_communication_volume: usize,
    pub qap: Option<T>,
}

impl<T> QualityReport<T>
where
    T: CostNumeric,
{
    /// Collects the metrics of the graph's own partition.
    pub fn from_graph(graph: &CommGraph<T>) -> Self {
        Self::with_map(graph, graph.blocks())
    }

    /// Collects the metrics of the labeling `map`.
    pub fn with_map(graph: &CommGraph<T>, map: &[BlockIndex]) -> Self {
        let volumes = communication_volumes_with_map(graph, map);
        Self {
            num_nodes: graph.num_nodes(),
            num_blocks: effective_num_blocks(graph, map),
            edge_cut: edge_cut_with_map(graph, map),
            boundary_nodes: boundary_nodes_with_map(graph, map),
            balance: balance_with_map(graph, map),
            max_communication_volume: volumes.iter().copied().max().unwrap_or(0),
            min_communication_volume: volumes.iter().copied().min().unwrap_or(0),
            total_communication_volume: volumes.iter().sum(),
            qap: None,
        }
    }

    /// Attaches a QAP cost.
    pub fn with_qap(mut self, qap: T) -> Self {
        self.qap = Some(qap);
        self
    }
}

impl<T> std::fmt::Display for QualityReport<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rankmap Quality Report:")?;
        writeln!(f, "   Nodes:                 {}", self.num_nodes)?;
        writeln!(f, "   Blocks:                {}", self.num_blocks)?;
        writeln!(f, "   Edge Cut:              {}", self.edge_cut)?;
        writeln!(f, "   Boundary Nodes:        {}", self.boundary_nodes)?;
        writeln!(f, "   Balance:               {:.4}", self.balance)?;
        writeln!(f, "   Max Comm Volume:       {}", self.max_communication_volume)?;
        writeln!(f, "   Min Comm Volume:       {}", self.min_communication_volume)?;
        writeln!(f, "   Total Comm Volume:     {}", self.total_communication_volume)?;
        if let Some(qap) = self.qap {
            writeln!(f, "   QAP:                   {}", qap)?;
        }
        Ok(())
    }
}

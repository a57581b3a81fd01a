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

//! Scoring of a given mapping.
//!
//! `evaluate_mapping` checks that a mapping fits the graph and the machine,
//! then reports its QAP cost together with the quality of the graph's
//! partition. The partition objective is scored under an [`ObjectiveMode`]
//! chosen by the caller.

use crate::error::RankmapError;
use rankmap_core::num::CostNumeric;
use rankmap_metrics::{
    objective::{ObjectiveMode, objective},
    qap::checked_total_qap,
    report::QualityReport,
};
use rankmap_model::{
    assignment::validate_rank_assignment, distance::DistanceProvider, graph::CommGraph,
    index::RankIndex,
};

/// QAP cost and partition quality of one mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEvaluation<T> {
    /// `sum over directed edges (u -> v, w) of w * D(rank[u], rank[v])`.
    pub qap: T,
    pub objective_mode: ObjectiveMode,
    /// The partition objective under `objective_mode`.
    pub objective: T,
    pub report: QualityReport<T>,
}

impl<T> std::fmt::Display for MappingEvaluation<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report)?;
        writeln!(f, "   Objective ({}): {}", self.objective_mode, self.objective)
    }
}

/// Evaluates `ranks` under the default objective mode.
///
/// # Errors
///
/// See [`evaluate_mapping_with`].
pub fn evaluate_mapping<T, D>(
    graph: &CommGraph<T>,
    distance: &D,
    ranks: &[RankIndex],
) -> Result<MappingEvaluation<T>, RankmapError>
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    evaluate_mapping_with(graph, distance, ranks, ObjectiveMode::default())
}

/// Evaluates `ranks`, scoring the graph's partition under `mode`.
///
/// # Errors
///
/// * [`RankmapError::RankCountMismatch`] if the machine does not have
///   exactly one rank per node.
/// * [`RankmapError::AssignmentLengthMismatch`] if `ranks` does not have one
///   entry per node.
/// * [`RankmapError::Assignment`] if `ranks` is not a bijection.
/// * [`RankmapError::ObjectiveOverflow`] if the QAP cost does not fit in `T`.
pub fn evaluate_mapping_with<T, D>(
    graph: &CommGraph<T>,
    distance: &D,
    ranks: &[RankIndex],
    mode: ObjectiveMode,
) -> Result<MappingEvaluation<T>, RankmapError>
where
    T: CostNumeric,
    D: DistanceProvider<T> + ?Sized,
{
    let num_nodes = graph.num_nodes();
    if distance.num_ranks() != num_nodes {
        return Err(RankmapError::RankCountMismatch {
            nodes: num_nodes,
            ranks: distance.num_ranks(),
        });
    }
    if ranks.len() != num_nodes {
        return Err(RankmapError::AssignmentLengthMismatch {
            nodes: num_nodes,
            assignment: ranks.len(),
        });
    }
    validate_rank_assignment(ranks, distance.num_ranks())?;

    let qap =
        checked_total_qap(graph, distance, ranks).ok_or(RankmapError::ObjectiveOverflow)?;
    let report = QualityReport::from_graph(graph).with_qap(qap);
    log::debug!("evaluated mapping on {}: qap {}", distance.name(), qap);

    Ok(MappingEvaluation {
        qap,
        objective_mode: mode,
        objective: objective(mode, graph, graph.blocks()),
        report,
    })
}

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

//! Partition objective selection.

use crate::{
    cut::{edge_cut_connected, edge_cut_with_map},
    volume::max_communication_volume_with_map,
};
use rankmap_core::num::{saturating_from_usize, CostNumeric};
use rankmap_model::{error::ConfigError, graph::CommGraph, index::BlockIndex};

/// The quantity a partition is scored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectiveMode {
    /// Largest per-block communication volume.
    MaxCommunicationVolume,
    /// Edge cut with a penalty for internally disconnected blocks.
    PenalizeDisconnection,
    /// Plain edge cut.
    #[default]
    EdgeCut,
}

impl ObjectiveMode {
    /// Resolves the two boolean objective switches into one mode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rankmap_metrics::objective::ObjectiveMode;
    /// assert_eq!(ObjectiveMode::from_flags(false, false), Ok(ObjectiveMode::EdgeCut));
    /// assert!(ObjectiveMode::from_flags(true, true).is_err());
    /// ```
    pub fn from_flags(
        optimize_comm_volume: bool,
        penalize_unconnected: bool,
    ) -> Result<Self, ConfigError> {
        match (optimize_comm_volume, penalize_unconnected) {
            (true, true) => Err(ConfigError::AmbiguousObjective),
            (true, false) => Ok(Self::MaxCommunicationVolume),
            (false, true) => Ok(Self::PenalizeDisconnection),
            (false, false) => Ok(Self::EdgeCut),
        }
    }
}

impl std::fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MaxCommunicationVolume => "MaxCommunicationVolume",
            Self::PenalizeDisconnection => "PenalizeDisconnection",
            Self::EdgeCut => "EdgeCut",
        };
        f.write_str(name)
    }
}

/// Scores the labeling `map` of `graph` under `mode`.
///
/// Communication volume is a count; it is converted into `T`, saturating at
/// `T::max_value()`. The cut based modes saturate as described in
/// [`crate::cut`].
pub fn objective<T>(mode: ObjectiveMode, graph: &CommGraph<T>, map: &[BlockIndex]) -> T
where
    T: CostNumeric,
{
    match mode {
        ObjectiveMode::MaxCommunicationVolume => {
            saturating_from_usize(max_communication_volume_with_map(graph, map))
        }
        ObjectiveMode::PenalizeDisconnection => edge_cut_connected(graph, map),
        ObjectiveMode::EdgeCut => edge_cut_with_map(graph, map),
    }
}

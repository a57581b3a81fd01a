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

//! # Rankmap
//!
//! Entry points for mapping communicating tasks onto the ranks of a machine
//! hierarchy.
//!
//! ## Modules
//!
//! - `mapper`: `MappingRefiner`, which turns a `LocalSearchConfig` into a
//!   configured local search run over a rank assignment.
//! - `evaluate`: `evaluate_mapping`, the QAP cost and partition quality of a
//!   given assignment.
//! - `error`: the combined error type of both.
//!
//! ```rust
//! use rankmap::{evaluate::evaluate_mapping, mapper::MappingRefiner};
//! use rankmap_ls::config::{LocalSearchConfig, SearchSpaceKind};
//! use rankmap_model::{
//!     distance::HierarchicalDistance, graph::CommGraphBuilder, index::{NodeIndex, RankIndex},
//! };
//!
//! // a ring of 8 tasks on 2 processors with 4 cores each
//! let mut builder = CommGraphBuilder::<i64>::new(8);
//! for i in 0..8 {
//!     builder.add_edge(NodeIndex::new(i), NodeIndex::new((i + 1) % 8), 10);
//! }
//! let graph = builder.build().unwrap();
//! let machine = HierarchicalDistance::new(vec![4, 2], vec![1, 10]).unwrap();
//!
//! let mut ranks: Vec<RankIndex> = [0, 4, 1, 5, 2, 6, 3, 7].map(RankIndex::new).to_vec();
//! let before = evaluate_mapping(&graph, &machine, &ranks).unwrap().qap;
//!
//! let config = LocalSearchConfig::default()
//!     .with_search_space(SearchSpaceKind::Exhaustive)
//!     .with_log_interval(None);
//! let mut refiner = MappingRefiner::new(config).unwrap();
//! let outcome = refiner.refine(&graph, &machine, &mut ranks).unwrap();
//!
//! assert_eq!(outcome.initial_objective(), before);
//! assert!(outcome.final_objective() < before);
//! ```

pub mod error;
pub mod evaluate;
pub mod mapper;

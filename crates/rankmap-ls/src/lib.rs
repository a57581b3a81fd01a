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

//! # Rankmap Local Search
//!
//! Swap-based refinement of a rank assignment with respect to the quadratic
//! assignment cost `sum over directed edges (u -> v, w) of w * D(rank[u], rank[v])`.
//!
//! The engine keeps one cost contribution per node and a running total, so a
//! candidate swap of nodes `a` and `b` is evaluated in `O(deg(a) + deg(b))`
//! instead of recomputing the whole objective. Rejected swaps are rolled back
//! exactly from an undo log. At the end of a run the running total is checked
//! against a full recomputation.
//!
//! ## Architecture
//!
//! * **`engine`**: the driver, `LocalSearchEngine`.
//! * **`cache`** and **`undo`**: per-node contributions and their rollback log.
//! * **`search_space`**: pluggable candidate pair generators that own
//!   termination (exhaustive, windowed, random, communication graph, budget
//!   and time limit wrappers).
//! * **`acceptance`**: the decision whether a candidate total replaces the
//!   current one (greedy descent, simulated annealing).
//! * **`monitor`**: observation hooks, including a `log` based progress monitor.
//! * **`config`**: declarative configuration that builds the above.
//! * **`stats`**, **`result`**, **`error`**: reporting types.

pub mod acceptance;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod result;
pub mod search_space;
pub mod stats;
pub mod undo;

#[cfg(test)]
mod tests;

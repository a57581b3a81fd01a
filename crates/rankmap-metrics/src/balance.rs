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

//! Block weight balance.

use crate::effective_num_blocks;
use rankmap_core::num::CostNumeric;
use rankmap_model::{graph::CommGraph, index::BlockIndex};

/// Returns the total node weight of every block, indexed by block.
///
/// Block weights saturate at `T::max_value()`.
pub fn block_weights_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> Vec<T>
where
    T: CostNumeric,
{
    let k = effective_num_blocks(graph, map);
    let mut weights = vec![T::zero(); k];
    for (b, &w) in map.iter().zip(graph.node_weights()) {
        weights[b.get()] = weights[b.get()].saturating_add(w);
    }
    weights
}

/// Returns the heaviest block weight divided by the ideal block weight
/// `ceil(total / K)`.
///
/// A perfectly balanced partition scores `1.0`. A graph with zero total node
/// weight is considered balanced.
///
/// # Examples
///
/// ```rust
/// # use rankmap_model::graph::CommGraphBuilder;
/// # use rankmap_model::index::{BlockIndex, NodeIndex};
/// # use rankmap_metrics::balance::balance;
/// let mut b = CommGraphBuilder::<i64>::new(2);
/// b.with_num_blocks(2).set_block(NodeIndex::new(1), BlockIndex::new(1));
/// assert_eq!(balance(&b.build().unwrap()), 1.0);
/// ```
pub fn balance<T>(graph: &CommGraph<T>) -> f64
where
    T: CostNumeric,
{
    balance_with_map(graph, graph.blocks())
}

/// Returns the balance of the labeling `map`.
///
/// Computed exactly in `T` when the total node weight fits; otherwise the
/// block weights are summed in `f64`.
pub fn balance_with_map<T>(graph: &CommGraph<T>, map: &[BlockIndex]) -> f64
where
    T: CostNumeric,
{
    let k = effective_num_blocks(graph, map);
    if k == 0 {
        return 1.0;
    }
    match exact_balance(graph, map, k) {
        Some(value) => value,
        None => approximate_balance(graph, map, k),
    }
}

fn exact_balance<T>(graph: &CommGraph<T>, map: &[BlockIndex], k: usize) -> Option<f64>
where
    T: CostNumeric,
{
    let mut weights = vec![T::zero(); k];
    let mut total = T::zero();
    for (b, &w) in map.iter().zip(graph.node_weights()) {
        weights[b.get()] = weights[b.get()].checked_add(&w)?;
        total = total.checked_add(&w)?;
    }
    if total <= T::zero() {
        return Some(1.0);
    }

    // ceil(total / k) without leaving T; more blocks than T can count
    // means total < k and an ideal of one
    let ideal = match T::from_usize(k) {
        Some(k_t) => {
            let rounded_up = if total % k_t == T::zero() {
                T::zero()
            } else {
                T::one()
            };
            total / k_t + rounded_up
        }
        None => T::one(),
    };
    let heaviest = weights.into_iter().max().unwrap_or_else(T::zero);
    Some(heaviest.to_f64()? / ideal.to_f64()?)
}

fn approximate_balance<T>(graph: &CommGraph<T>, map: &[BlockIndex], k: usize) -> f64
where
    T: CostNumeric,
{
    let mut weights = vec![0.0f64; k];
    for (b, &w) in map.iter().zip(graph.node_weights()) {
        weights[b.get()] += w.to_f64().unwrap_or(0.0);
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 1.0;
    }
    let ideal = (total / k as f64).ceil();
    weights.into_iter().fold(0.0, f64::max) / ideal
}

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

//! # Cost Numeric Trait
//!
//! Edge volumes, node weights, distances and QAP totals are all exact integer
//! quantities. `CostNumeric` collects the bounds the metric and search code
//! needs into one alias so generic signatures stay short.
//!
//! Signed types are required even though every input is non-negative: the
//! local search works with swap deltas, which are naturally negative when a
//! swap improves the mapping. Negative inputs are rejected when graphs and
//! distance providers are constructed.
//!
//! `i128` works but is noticeably slower; `i64` is the intended default.

use num_traits::{FromPrimitive, PrimInt, SaturatingMul, Signed, ToPrimitive};
use std::hash::Hash;

/// Integer type usable as a weight, distance or objective value.
pub trait CostNumeric:
    PrimInt
    + Signed
    + SaturatingMul
    + FromPrimitive
    + ToPrimitive
    + std::iter::Sum
    + std::fmt::Debug
    + std::fmt::Display
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> CostNumeric for T where
    T: PrimInt
        + Signed
        + SaturatingMul
        + FromPrimitive
        + ToPrimitive
        + std::iter::Sum
        + std::fmt::Debug
        + std::fmt::Display
        + Hash
        + Send
        + Sync
        + 'static
{
}

/// Converts a count into `T`, saturating at `T::max_value()`.
///
/// Counting metrics (communication volume, boundary nodes) are reported as
/// `usize`; objective dispatch needs them in the cost type.
#[inline]
pub fn saturating_from_usize<T>(value: usize) -> T
where
    T: CostNumeric,
{
    T::from_usize(value).unwrap_or_else(T::max_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cost_numeric<T: CostNumeric>() {}

    #[test]
    fn test_signed_primitives_are_cost_numeric() {
        assert_cost_numeric::<i16>();
        assert_cost_numeric::<i32>();
        assert_cost_numeric::<i64>();
        assert_cost_numeric::<isize>();
    }

    #[test]
    fn test_saturating_from_usize() {
        assert_eq!(saturating_from_usize::<i64>(42), 42);
        assert_eq!(saturating_from_usize::<i8>(1000), i8::MAX);
    }
}

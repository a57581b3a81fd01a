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

//! # Distance Providers
//!
//! A distance provider answers `D(a, b)`: the cost of sending one unit of
//! data between ranks `a` and `b` of the target machine. Distances are
//! symmetric and non-negative, and queries must be `O(1)` since the local
//! search issues several per edge it touches.
//!
//! Every provider also exposes a *same-location* sentinel. Two ranks whose
//! distance equals the sentinel sit in the same innermost group (for example
//! two cores of one processor); swapping the tasks on such ranks is skipped
//! by the optimizer.
//!
//! Two implementations are provided:
//!
//! * [`DenseDistanceMatrix`] stores all `K x K` values up front.
//! * [`HierarchicalDistance`] derives distances on demand from a machine
//!   hierarchy such as `4:8:8` ranks per processor, processors per node and
//!   nodes per rack.

use crate::{error::DistanceError, index::RankIndex, matrix::DenseMatrix};
use rankmap_core::num::CostNumeric;

/// Symmetric, non-negative rank-to-rank communication costs.
pub trait DistanceProvider<T>
where
    T: CostNumeric,
{
    /// Returns a human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Returns the number of ranks `K`.
    fn num_ranks(&self) -> usize;

    /// Returns the distance between ranks `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either rank is out of bounds.
    #[inline]
    fn distance(&self, a: RankIndex, b: RankIndex) -> T {
        let k = self.num_ranks();
        assert!(
            a.get() < k,
            "called `DistanceProvider::distance` with rank index out of bounds: the len is {} but the index is {}",
            k,
            a.get()
        );
        assert!(
            b.get() < k,
            "called `DistanceProvider::distance` with rank index out of bounds: the len is {} but the index is {}",
            k,
            b.get()
        );
        // SAFETY: both ranks were bounds checked above.
        unsafe { self.distance_unchecked(a, b) }
    }

    /// Returns the distance between ranks `a` and `b` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `a.get() < self.num_ranks()` and
    /// `b.get() < self.num_ranks()`.
    unsafe fn distance_unchecked(&self, a: RankIndex, b: RankIndex) -> T;

    /// Returns the distance value meaning "same innermost location".
    fn same_location_distance(&self) -> T;

    /// Returns the smallest distance between two distinct ranks, or zero if
    /// there are fewer than two ranks.
    fn min_distance(&self) -> T;

    /// Returns the largest distance between any two ranks.
    fn max_distance(&self) -> T;
}

impl<T, P> DistanceProvider<T> for &P
where
    T: CostNumeric,
    P: DistanceProvider<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn num_ranks(&self) -> usize {
        (**self).num_ranks()
    }

    #[inline(always)]
    unsafe fn distance_unchecked(&self, a: RankIndex, b: RankIndex) -> T {
        unsafe { (**self).distance_unchecked(a, b) }
    }

    #[inline]
    fn same_location_distance(&self) -> T {
        (**self).same_location_distance()
    }

    #[inline]
    fn min_distance(&self) -> T {
        (**self).min_distance()
    }

    #[inline]
    fn max_distance(&self) -> T {
        (**self).max_distance()
    }
}

/// A precomputed `K x K` distance matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseDistanceMatrix<T> {
    matrix: DenseMatrix<T>,
    same_location: T,
    min_distance: T,
    max_distance: T,
}

impl<T> DenseDistanceMatrix<T>
where
    T: CostNumeric,
{
    /// Builds a distance matrix over `num_ranks` ranks from row-major values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rankmap_model::distance::{DenseDistanceMatrix, DistanceProvider};
    /// # use rankmap_model::index::RankIndex;
    /// let d = DenseDistanceMatrix::<i64>::new(2, vec![0, 5, 5, 0]).unwrap();
    /// assert_eq!(d.distance(RankIndex::new(0), RankIndex::new(1)), 5);
    /// assert_eq!(d.same_location_distance(), 0);
    /// ```
    pub fn new(num_ranks: usize, values: Vec<T>) -> Result<Self, DistanceError> {
        let matrix = DenseMatrix::new(num_ranks, num_ranks, values)?;
        Self::from_matrix(matrix)
    }

    /// Wraps an existing square matrix, validating it.
    pub fn from_matrix(matrix: DenseMatrix<T>) -> Result<Self, DistanceError> {
        if !matrix.is_square() {
            return Err(DistanceError::NotSquare {
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }

        let k = matrix.rows();
        let mut same_location: Option<T> = None;
        let mut min_distance: Option<T> = None;
        let mut max_distance = T::zero();

        for a in 0..k {
            for b in 0..k {
                let value = matrix.get(a, b);
                if value < T::zero() {
                    return Err(DistanceError::NegativeDistance {
                        a: RankIndex::new(a),
                        b: RankIndex::new(b),
                        value: value.to_string(),
                    });
                }
                if b > a && value != matrix.get(b, a) {
                    return Err(DistanceError::Asymmetric {
                        a: RankIndex::new(a),
                        b: RankIndex::new(b),
                    });
                }
                if a == b {
                    same_location = Some(same_location.map_or(value, |s| s.min(value)));
                } else {
                    min_distance = Some(min_distance.map_or(value, |m| m.min(value)));
                }
                max_distance = max_distance.max(value);
            }
        }

        Ok(Self {
            matrix,
            same_location: same_location.unwrap_or_else(T::zero),
            min_distance: min_distance.unwrap_or_else(T::zero),
            max_distance,
        })
    }

    /// Materializes any provider into a dense matrix, keeping its sentinel.
    pub fn from_provider<P>(provider: &P) -> Self
    where
        P: DistanceProvider<T> + ?Sized,
    {
        let k = provider.num_ranks();
        let matrix = DenseMatrix::from_fn(k, k, |a, b| {
            // SAFETY: a, b < k by construction of `from_fn`.
            unsafe { provider.distance_unchecked(RankIndex::new(a), RankIndex::new(b)) }
        });
        Self {
            matrix,
            same_location: provider.same_location_distance(),
            min_distance: provider.min_distance(),
            max_distance: provider.max_distance(),
        }
    }

    /// Overrides the same-location sentinel.
    pub fn with_same_location_distance(mut self, value: T) -> Self {
        self.same_location = value;
        self
    }

    /// Returns the underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<T> {
        &self.matrix
    }
}

impl<T> DistanceProvider<T> for DenseDistanceMatrix<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "DenseDistanceMatrix"
    }

    #[inline]
    fn num_ranks(&self) -> usize {
        self.matrix.rows()
    }

    #[inline(always)]
    unsafe fn distance_unchecked(&self, a: RankIndex, b: RankIndex) -> T {
        debug_assert!(
            a.get() < self.matrix.rows() && b.get() < self.matrix.rows(),
            "called `DenseDistanceMatrix::distance_unchecked` with rank index out of bounds: the len is {} but the indices are {} and {}",
            self.matrix.rows(),
            a.get(),
            b.get()
        );
        unsafe { self.matrix.get_unchecked(a.get(), b.get()) }
    }

    #[inline]
    fn same_location_distance(&self) -> T {
        self.same_location
    }

    #[inline]
    fn min_distance(&self) -> T {
        self.min_distance
    }

    #[inline]
    fn max_distance(&self) -> T {
        self.max_distance
    }
}

/// Distances derived on demand from a nested machine hierarchy.
///
/// `group_sizes[0]` ranks form a level-0 group, `group_sizes[1]` level-0
/// groups form a level-1 group, and so on. Two distinct ranks are
/// `distances[l]` apart where `l` is the innermost level whose group contains
/// both of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalDistance<T> {
    group_sizes: Vec<usize>,
    distances: Vec<T>,
    num_ranks: usize,
    min_distance: T,
    max_distance: T,
}

impl<T> HierarchicalDistance<T>
where
    T: CostNumeric,
{
    /// Creates a hierarchy from per-level group sizes and distances.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rankmap_model::distance::{DistanceProvider, HierarchicalDistance};
    /// # use rankmap_model::index::RankIndex;
    /// // two ranks per processor, two processors per node
    /// let d = HierarchicalDistance::<i64>::new(vec![2, 2], vec![1, 10]).unwrap();
    /// assert_eq!(d.num_ranks(), 4);
    /// assert_eq!(d.distance(RankIndex::new(0), RankIndex::new(1)), 1);
    /// assert_eq!(d.distance(RankIndex::new(1), RankIndex::new(2)), 10);
    /// ```
    pub fn new(group_sizes: Vec<usize>, distances: Vec<T>) -> Result<Self, DistanceError> {
        if group_sizes.is_empty() {
            return Err(DistanceError::EmptyHierarchy);
        }
        if group_sizes.len() != distances.len() {
            return Err(DistanceError::HierarchyLengthMismatch {
                group_sizes: group_sizes.len(),
                distances: distances.len(),
            });
        }
        if let Some(level) = group_sizes.iter().position(|&s| s == 0) {
            return Err(DistanceError::ZeroGroupSize { level });
        }
        if let Some(level) = distances.iter().position(|&d| d < T::zero()) {
            return Err(DistanceError::NegativeLevelDistance {
                level,
                value: distances[level].to_string(),
            });
        }

        let num_ranks = group_sizes
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or(DistanceError::RankCountOverflow)?;

        // A level contributes a distance only if its groups hold two or more
        // members of the level below.
        let used = || {
            group_sizes
                .iter()
                .zip(distances.iter())
                .filter(|&(&s, _)| s >= 2)
                .map(|(_, &d)| d)
        };
        let min_distance = used().min().unwrap_or_else(T::zero);
        let max_distance = used().max().unwrap_or_else(T::zero);

        Ok(Self {
            group_sizes,
            distances,
            num_ranks,
            min_distance,
            max_distance,
        })
    }

    /// Returns the per-level group sizes.
    #[inline]
    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }

    /// Returns the per-level distances.
    #[inline]
    pub fn level_distances(&self) -> &[T] {
        &self.distances
    }

    /// Returns the number of hierarchy levels.
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.group_sizes.len()
    }
}

impl<T> DistanceProvider<T> for HierarchicalDistance<T>
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "HierarchicalDistance"
    }

    #[inline]
    fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    #[inline]
    unsafe fn distance_unchecked(&self, a: RankIndex, b: RankIndex) -> T {
        debug_assert!(
            a.get() < self.num_ranks && b.get() < self.num_ranks,
            "called `HierarchicalDistance::distance_unchecked` with rank index out of bounds: the len is {} but the indices are {} and {}",
            self.num_ranks,
            a.get(),
            b.get()
        );

        let (mut x, mut y) = (a.get(), b.get());
        if x == y {
            return T::zero();
        }
        for (&size, &distance) in self.group_sizes.iter().zip(self.distances.iter()) {
            x /= size;
            y /= size;
            if x == y {
                return distance;
            }
        }

        // Both quotients reach zero at the outermost level for in-range ranks.
        self.distances[self.distances.len() - 1]
    }

    #[inline]
    fn same_location_distance(&self) -> T {
        self.distances[0]
    }

    #[inline]
    fn min_distance(&self) -> T {
        self.min_distance
    }

    #[inline]
    fn max_distance(&self) -> T {
        self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(i: usize) -> RankIndex {
        RankIndex::new(i)
    }

    #[test]
    fn test_dense_basic_queries() {
        let d = DenseDistanceMatrix::<i64>::new(3, vec![0, 1, 4, 1, 0, 2, 4, 2, 0]).unwrap();
        assert_eq!(d.num_ranks(), 3);
        assert_eq!(d.distance(r(0), r(2)), 4);
        assert_eq!(d.distance(r(2), r(1)), 2);
        assert_eq!(d.same_location_distance(), 0);
        assert_eq!(d.min_distance(), 1);
        assert_eq!(d.max_distance(), 4);
        assert_eq!(d.name(), "DenseDistanceMatrix");
    }

    #[test]
    fn test_dense_rejects_invalid_matrices() {
        assert!(matches!(
            DenseDistanceMatrix::<i64>::new(2, vec![0, 1, 1]),
            Err(DistanceError::Matrix(_))
        ));
        assert!(matches!(
            DenseDistanceMatrix::<i64>::new(2, vec![0, -1, -1, 0]),
            Err(DistanceError::NegativeDistance { .. })
        ));
        assert_eq!(
            DenseDistanceMatrix::<i64>::new(2, vec![0, 1, 2, 0]),
            Err(DistanceError::Asymmetric { a: r(0), b: r(1) })
        );
        let rect = DenseMatrix::filled(2, 3, 0i64);
        assert_eq!(
            DenseDistanceMatrix::from_matrix(rect),
            Err(DistanceError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_dense_sentinel_override() {
        let d = DenseDistanceMatrix::<i64>::new(2, vec![0, 3, 3, 0])
            .unwrap()
            .with_same_location_distance(3);
        assert_eq!(d.same_location_distance(), 3);
    }

    #[test]
    fn test_hierarchical_two_levels() {
        let d = HierarchicalDistance::<i64>::new(vec![2, 2], vec![1, 10]).unwrap();
        assert_eq!(d.num_ranks(), 4);
        assert_eq!(d.distance(r(0), r(0)), 0);
        assert_eq!(d.distance(r(0), r(1)), 1);
        assert_eq!(d.distance(r(2), r(3)), 1);
        assert_eq!(d.distance(r(0), r(2)), 10);
        assert_eq!(d.distance(r(1), r(3)), 10);
        assert_eq!(d.same_location_distance(), 1);
        assert_eq!(d.min_distance(), 1);
        assert_eq!(d.max_distance(), 10);
    }

    #[test]
    fn test_hierarchical_three_levels() {
        let d = HierarchicalDistance::<i64>::new(vec![4, 2, 2], vec![1, 10, 100]).unwrap();
        assert_eq!(d.num_ranks(), 16);
        assert_eq!(d.distance(r(0), r(3)), 1);
        assert_eq!(d.distance(r(0), r(4)), 10);
        assert_eq!(d.distance(r(3), r(7)), 10);
        assert_eq!(d.distance(r(0), r(8)), 100);
        assert_eq!(d.distance(r(7), r(8)), 100);
        assert_eq!(d.distance(r(15), r(12)), 1);
    }

    #[test]
    fn test_hierarchical_symmetric() {
        let d = HierarchicalDistance::<i64>::new(vec![3, 2, 2], vec![2, 5, 9]).unwrap();
        for a in 0..d.num_ranks() {
            for b in 0..d.num_ranks() {
                assert_eq!(d.distance(r(a), r(b)), d.distance(r(b), r(a)));
            }
        }
    }

    #[test]
    fn test_hierarchical_unused_levels_excluded_from_extrema() {
        let d = HierarchicalDistance::<i64>::new(vec![1, 4], vec![7, 3]).unwrap();
        assert_eq!(d.distance(r(0), r(1)), 3);
        assert_eq!(d.min_distance(), 3);
        assert_eq!(d.max_distance(), 3);
    }

    #[test]
    fn test_hierarchical_rejects_invalid_description() {
        assert_eq!(
            HierarchicalDistance::<i64>::new(vec![], vec![]),
            Err(DistanceError::EmptyHierarchy)
        );
        assert_eq!(
            HierarchicalDistance::<i64>::new(vec![2, 2], vec![1]),
            Err(DistanceError::HierarchyLengthMismatch {
                group_sizes: 2,
                distances: 1
            })
        );
        assert_eq!(
            HierarchicalDistance::<i64>::new(vec![2, 0], vec![1, 2]),
            Err(DistanceError::ZeroGroupSize { level: 1 })
        );
        assert!(matches!(
            HierarchicalDistance::<i64>::new(vec![2], vec![-1]),
            Err(DistanceError::NegativeLevelDistance { level: 0, .. })
        ));
        assert_eq!(
            HierarchicalDistance::<i64>::new(vec![usize::MAX, 2], vec![1, 2]),
            Err(DistanceError::RankCountOverflow)
        );
    }

    #[test]
    fn test_from_provider_matches_source() {
        let h = HierarchicalDistance::<i64>::new(vec![2, 3], vec![1, 4]).unwrap();
        let d = DenseDistanceMatrix::from_provider(&h);
        assert_eq!(d.num_ranks(), 6);
        assert_eq!(d.same_location_distance(), h.same_location_distance());
        assert_eq!(d.max_distance(), h.max_distance());
        for a in 0..6 {
            for b in 0..6 {
                assert_eq!(d.distance(r(a), r(b)), h.distance(r(a), r(b)));
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_distance_out_of_bounds_panics() {
        let d = HierarchicalDistance::<i64>::new(vec![2], vec![1]).unwrap();
        d.distance(r(0), r(2));
    }
}

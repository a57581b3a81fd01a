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

//! # Typed Indices
//!
//! A mapping run juggles three index spaces at once: graph nodes (tasks),
//! topology ranks (processors) and partition blocks. All three are plain
//! `usize` values underneath, which makes it far too easy to look up a rank
//! with a node id. `TypedIndex<T>` tags a `usize` with a zero-sized marker so
//! the compiler keeps the spaces apart, while `#[repr(transparent)]` keeps the
//! representation identical to the raw integer.
//!
//! ```rust
//! use rankmap_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct SlotTag;
//! impl TypedIndexTag for SlotTag {
//!     const NAME: &'static str = "SlotIndex";
//! }
//!
//! type SlotIndex = TypedIndex<SlotTag>;
//! let s = SlotIndex::new(4);
//! assert_eq!(s.get(), 4);
//! assert_eq!(format!("{}", s), "SlotIndex(4)");
//! ```

/// Names an index space for `Debug` and `Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index that belongs to the index space described by `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Wraps a raw index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

/// Wraps every raw index of `raw` into a `TypedIndex`.
///
/// Convenient for tests and for callers whose collaborators hand out plain
/// integer arrays (for example a mapping read from disk).
pub fn typed_vec<T>(raw: &[usize]) -> Vec<TypedIndex<T>> {
    raw.iter().copied().map(TypedIndex::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct SlotTag;

    impl TypedIndexTag for SlotTag {
        const NAME: &'static str = "Slot";
    }

    type SlotIndex = TypedIndex<SlotTag>;

    #[test]
    fn test_roundtrip_through_usize() {
        let idx: SlotIndex = 17.into();
        assert_eq!(idx.get(), 17);
        let raw: usize = idx.into();
        assert_eq!(raw, 17);
    }

    #[test]
    fn test_formatting_uses_tag_name() {
        let idx = SlotIndex::new(3);
        assert_eq!(format!("{}", idx), "Slot(3)");
        assert_eq!(format!("{:?}", idx), "Slot(3)");
    }

    #[test]
    fn test_ordering_follows_raw_index() {
        assert!(SlotIndex::new(1) < SlotIndex::new(2));
        assert_eq!(SlotIndex::new(5), SlotIndex::new(5));
    }

    #[test]
    fn test_typed_vec_preserves_order() {
        let v: Vec<SlotIndex> = typed_vec(&[2, 0, 1]);
        assert_eq!(v, vec![SlotIndex::new(2), SlotIndex::new(0), SlotIndex::new(1)]);
    }
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reversible packing of composite keys into SAT variable IDs.
//!
//! A [`Packer`] describes one contiguous block of variable IDs. Each key is a
//! tuple of `N` fields, field `i` ranging over `0..bounds[i]`, and is mapped
//! to an ID by mixed-radix numbering:
//!
//! ```text
//! id = first + ((k0 * b1 + k1) * b2 + k2) ...
//! ```
//!
//! The mapping is a bijection between the key space and
//! `first..first + len()`, for any bounds. Keys with a field outside its
//! bound are rejected instead of being folded onto some other key's ID,
//! so out-of-range coordinates can never alias a real proposition.
//!
//! Several packers laid end to end (see [`Packer::after`]) give disjoint
//! blocks, one per proposition family.

use crate::sat::cnf::Var;

/// A mixed-radix bijection between `N`-field keys and a block of IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packer<const N: usize> {
    bounds: [usize; N],
    first: Var,
    len: usize,
}

impl<const N: usize> Packer<N> {
    /// Creates a packer whose block starts at `first`.
    ///
    /// # Arguments
    ///
    /// * `bounds` - The exclusive upper bound of each key field.
    /// * `first` - The ID assigned to the all-zero key. Must be positive.
    ///
    /// # Returns
    ///
    /// `None` if `first` is zero or the block would run past `i32::MAX`,
    /// the largest ID expressible as a DIMACS literal.
    #[must_use]
    pub fn new(bounds: [usize; N], first: Var) -> Option<Self> {
        if first == 0 {
            return None;
        }
        let len = bounds
            .iter()
            .try_fold(1usize, |acc, &b| acc.checked_mul(b))?;
        let last = usize::try_from(first).ok()?.checked_add(len)?;
        if last > usize::try_from(i32::MAX).ok()? + 1 {
            return None;
        }
        Some(Self { bounds, first, len })
    }

    /// Creates a packer whose block immediately follows `prev`'s.
    #[must_use]
    pub fn after<const M: usize>(prev: &Packer<M>, bounds: [usize; N]) -> Option<Self> {
        Self::new(bounds, prev.end())
    }

    /// Number of IDs in the block.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the block is empty (some bound is zero).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first ID of the block.
    #[must_use]
    pub const fn first(&self) -> Var {
        self.first
    }

    /// One past the last ID of the block.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn end(&self) -> Var {
        // `new` guarantees first + len <= i32::MAX + 1.
        self.first + self.len as Var
    }

    /// The field bounds.
    #[must_use]
    pub const fn bounds(&self) -> &[usize; N] {
        &self.bounds
    }

    /// Maps a key to its ID, or `None` if some field is out of bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pack(&self, key: [usize; N]) -> Option<Var> {
        let mut rel = 0usize;
        for (&k, &b) in key.iter().zip(&self.bounds) {
            if k >= b {
                return None;
            }
            rel = rel * b + k;
        }
        Some(self.first + rel as Var)
    }

    /// Maps an ID back to its key, or `None` if the ID lies outside this
    /// packer's block.
    #[must_use]
    pub fn unpack(&self, id: Var) -> Option<[usize; N]> {
        if id < self.first || id >= self.end() {
            return None;
        }
        let mut rel = usize::try_from(id - self.first).ok()?;
        let mut key = [0usize; N];
        for i in (0..N).rev() {
            key[i] = rel % self.bounds[i];
            rel /= self.bounds[i];
        }
        Some(key)
    }

    /// Whether `id` belongs to this block.
    #[must_use]
    pub const fn contains(&self, id: Var) -> bool {
        id >= self.first && id < self.end()
    }
}

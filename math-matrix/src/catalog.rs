//! Per-matrix memoization store for derived artifacts.
//!
//! Every [`Matrix`](crate::Matrix) owns exactly one `Catalog`, created empty
//! at construction time and dropped with its owner. Each slot holds one
//! derived artifact (transpose, determinant, REF, a factorization, ...) and
//! is write-once: the first computed value wins and later derivations reuse
//! it. Slots are backed by [`OnceLock`], so concurrent population is a benign
//! race — all derivations of a slot are deterministic and equal, and a second
//! write is discarded rather than corrupting the slot.
//!
//! Catalogs are never shared or copied across matrix instances; cloning a
//! matrix starts from an empty catalog.

use std::sync::OnceLock;

use crate::decompose::{
    CholeskyDecomposition, CroutDecomposition, LuDecomposition, QrDecomposition, SvdDecomposition,
};
use crate::matrix::Matrix;
use crate::reduce::RowEchelon;

/// A write-once cell for a single derived artifact.
pub(crate) struct Slot<T>(OnceLock<T>);

impl<T> Slot<T> {
    /// Returns `true` if the slot has been populated.
    pub(crate) fn has(&self) -> bool {
        self.0.get().is_some()
    }

    /// Returns the cached value, if any. Callers check [`Slot::has`] or use
    /// the returned `Option` directly; an empty slot is never dereferenced.
    pub(crate) fn get(&self) -> Option<&T> {
        self.0.get()
    }

    /// Stores `value` if the slot is still empty and returns a reference to
    /// the slot content. The first write wins.
    pub(crate) fn insert(&self, value: T) -> &T {
        self.0.get_or_init(move || value)
    }

    /// Returns the cached value, computing and storing it if absent.
    pub(crate) fn get_or_insert_with(&self, init: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(init)
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot(OnceLock::new())
    }
}

/// The set of derived artifacts a matrix can cache.
///
/// There is no eviction and no capacity bound: one matrix owns at most these
/// ten artifacts, each computed at most once.
#[derive(Default)]
pub(crate) struct Catalog {
    pub(crate) transpose: Slot<Matrix>,
    pub(crate) determinant: Slot<f64>,
    pub(crate) inverse: Slot<Matrix>,
    pub(crate) row_echelon: Slot<RowEchelon>,
    pub(crate) rref: Slot<Matrix>,
    pub(crate) lu: Slot<LuDecomposition>,
    pub(crate) qr: Slot<QrDecomposition>,
    pub(crate) cholesky: Slot<CholeskyDecomposition>,
    pub(crate) crout: Slot<CroutDecomposition>,
    pub(crate) svd: Slot<SvdDecomposition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: Slot<f64> = Slot::default();
        assert!(!slot.has());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_slot_first_write_wins() {
        let slot: Slot<f64> = Slot::default();
        assert_eq!(*slot.insert(1.5), 1.5);
        // A second insert is discarded, the original value survives.
        assert_eq!(*slot.insert(2.5), 1.5);
        assert!(slot.has());
        assert_eq!(slot.get(), Some(&1.5));
    }

    #[test]
    fn test_slot_get_or_insert_with_computes_once() {
        let slot: Slot<usize> = Slot::default();
        let mut calls = 0;
        let first = *slot.get_or_insert_with(|| {
            calls += 1;
            7
        });
        let second = *slot.get_or_insert_with(|| {
            calls += 1;
            9
        });
        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_catalog_slots_independent() {
        let catalog = Catalog::default();
        catalog.determinant.insert(4.0);
        assert!(catalog.determinant.has());
        assert!(!catalog.rref.has());
        assert!(!catalog.lu.has());
    }
}

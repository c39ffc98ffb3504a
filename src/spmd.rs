//! Single-program-multiple-data plumbing.
//!
//! Every core runs the same kernel body. A core only knows its rank and how to
//! wait for its peers; all work assignment is derived from `(fft_len, nPE,
//! rank)` by the functions in [`crate::partition`]. The signal buffer is shared
//! by all cores at once, and the partition guarantees that the write sets of a
//! stage are disjoint. Barriers order one stage's writes before the next
//! stage's reads.

use core::sync::atomic::{AtomicI16, Ordering};

use crate::num::V2s;

/// A contiguous set of ranks `[first, first + len)` that synchronise together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoreGroup {
    pub first: usize,
    pub len: usize,
}

impl CoreGroup {
    pub const fn new(first: usize, len: usize) -> Self {
        Self { first, len }
    }

    /// The group of all `n_pe` cores.
    pub const fn whole(n_pe: usize) -> Self {
        Self { first: 0, len: n_pe }
    }

    pub const fn contains(&self, core_id: usize) -> bool {
        core_id >= self.first && core_id < self.first + self.len
    }

    /// Rank of `core_id` inside this group.
    #[inline]
    pub fn rank(&self, core_id: usize) -> usize {
        debug_assert!(self.contains(core_id), "core {} not in {:?}", core_id, self);
        core_id - self.first
    }

    /// Splits into a low half of `len / 2` ranks and a high half with the rest.
    pub const fn split(&self) -> (Self, Self) {
        let low = self.len / 2;
        (
            Self {
                first: self.first,
                len: low,
            },
            Self {
                first: self.first + low,
                len: self.len - low,
            },
        )
    }
}

/// The two services a core gets from its platform: who am I, and wait for the others.
pub trait Spmd {
    /// Rank of the calling core in the whole cluster.
    fn core_id(&self) -> usize;

    /// Blocks until every member of `group` has called `barrier` with the same group.
    ///
    /// Must be reentrant: the kernel reuses the same group for every stage.
    fn barrier(&self, group: CoreGroup);
}

/// Runs the kernel on the calling thread as the only core.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleCore;

impl Spmd for SingleCore {
    #[inline]
    fn core_id(&self) -> usize {
        0
    }

    #[inline]
    fn barrier(&self, group: CoreGroup) {
        debug_assert!(group.len <= 1, "single core cannot meet {:?}", group);
    }
}

/// The caller's interleaved `i16` buffer, shared by all cores of one transform.
///
/// Indices are complex samples unless a method says otherwise. Accesses are
/// relaxed atomics; ordering between stages comes from the barriers.
#[derive(Clone, Copy, Debug)]
pub struct SharedSignal<'a> {
    lanes: &'a [AtomicI16],
}

impl<'a> SharedSignal<'a> {
    pub fn new(buf: &'a mut [i16]) -> Self {
        let len = buf.len();
        // SAFETY: `AtomicI16` has the same size and alignment as `i16`, and the
        // unique borrow guarantees no non-atomic access for the lifetime `'a`.
        let lanes = unsafe { core::slice::from_raw_parts(buf.as_mut_ptr() as *const AtomicI16, len) };
        Self { lanes }
    }

    /// Number of complex samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.lanes.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lanes.len() < 2
    }

    #[inline(always)]
    pub fn load(&self, k: usize) -> V2s {
        self.load_lanes(2 * k)
    }

    #[inline(always)]
    pub fn store(&self, k: usize, v: V2s) {
        self.store_lanes(2 * k, v)
    }

    /// Loads the lane pair starting at `lane` (an `i16` offset).
    #[inline(always)]
    pub fn load_lanes(&self, lane: usize) -> V2s {
        V2s::new(
            self.lanes[lane].load(Ordering::Relaxed),
            self.lanes[lane + 1].load(Ordering::Relaxed),
        )
    }

    /// Stores a lane pair starting at `lane` (an `i16` offset).
    #[inline(always)]
    pub fn store_lanes(&self, lane: usize, v: V2s) {
        self.lanes[lane].store(v.re, Ordering::Relaxed);
        self.lanes[lane + 1].store(v.im, Ordering::Relaxed);
    }

    /// Splits at complex sample `mid`.
    pub fn split_at(&self, mid: usize) -> (SharedSignal<'a>, SharedSignal<'a>) {
        let (lo, hi) = self.lanes.split_at(2 * mid);
        (SharedSignal { lanes: lo }, SharedSignal { lanes: hi })
    }
}

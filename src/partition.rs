//! Static work partitioning.
//!
//! Each core computes its own share from `(n, n_pe, core_id)`; nothing is
//! exchanged. For every scheme the shares of ranks `0..n_pe` cover the stage's
//! index domain exactly once, for any `n_pe >= 1`. Ranks left without work
//! still take part in the stage barrier.

use core::iter::StepBy;
use core::ops::Range;

/// Block partition of `[0, n)`: rank `core_id` gets `ceil(n / n_pe)` consecutive indices.
#[inline]
pub fn block_range(n: usize, n_pe: usize, core_id: usize) -> Range<usize> {
    let step = n.div_ceil(n_pe);
    let start = (core_id * step).min(n);
    start..(start + step).min(n)
}

/// Butterfly groups `i0` of the first radix-4 stage over `fft_len` samples.
#[inline]
pub fn first_stage(fft_len: usize, n_pe: usize, core_id: usize) -> Range<usize> {
    block_range(fft_len >> 2, n_pe, core_id)
}

/// One core's share of a middle radix-4 stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiddleShare {
    /// Butterfly indices `j` inside a span of `n1` samples.
    pub butterflies: Range<usize>,
    /// Start of the first span this core visits.
    pub offset: usize,
    /// Distance between the spans this core visits.
    pub stride: usize,
}

impl MiddleShare {
    /// Sample indices `i0` of butterfly `j` visited by this share.
    #[inline]
    pub fn repeats(&self, j: usize, fft_len: usize) -> StepBy<Range<usize>> {
        (self.offset + j..fft_len).step_by(self.stride)
    }
}

/// Share of a middle stage whose butterflies span `n1` samples.
///
/// Ranks are packed across butterfly indices first (`core_id mod n2`), then
/// across repeats of the span (`core_id / n2`). When there are more ranks than
/// butterfly indices, only `floor(n_pe / n2)` full rows take part so that the
/// repeat stride is the same for every index; the remaining ranks idle and
/// `None` is returned for them.
pub fn middle_stage(n1: usize, n_pe: usize, core_id: usize) -> Option<MiddleShare> {
    let n2 = n1 >> 2;
    let rows = (n_pe / n2).max(1);
    let row = core_id / n2;
    if row >= rows {
        return None;
    }
    Some(MiddleShare {
        butterflies: block_range(n2, n_pe, core_id % n2),
        offset: row * n1,
        stride: rows * n1,
    })
}

/// Start indices of the blocks of `n1` samples handled in the last stage.
#[inline]
pub fn last_stage(fft_len: usize, n1: usize, n_pe: usize, core_id: usize) -> StepBy<Range<usize>> {
    let blocks = block_range(fft_len / n1, n_pe, core_id);
    (blocks.start * n1..blocks.end * n1).step_by(n1)
}

/// First-half indices `i` of the radix-2 split (partner `i + fft_len/2`).
#[inline]
pub fn radix2_split(fft_len: usize, n_pe: usize, core_id: usize) -> Range<usize> {
    block_range(fft_len >> 1, n_pe, core_id)
}

/// Samples rescaled after the split recursion: pairs `2i, 2i + 1` for each split index `i`.
#[inline]
pub fn rescale(fft_len: usize, n_pe: usize, core_id: usize) -> Range<usize> {
    let r = radix2_split(fft_len, n_pe, core_id);
    2 * r.start..2 * r.end
}

/// Samples whose lanes are exchanged around an inverse transform.
#[inline]
pub fn lane_swap(fft_len: usize, n_pe: usize, core_id: usize) -> Range<usize> {
    block_range(fft_len, n_pe, core_id)
}

/// Offsets `i` into the bit-reversal table; entry `i` pairs with `i + 1`.
#[inline]
pub fn swap_pairs(bit_rev_len: usize, n_pe: usize, core_id: usize) -> StepBy<Range<usize>> {
    let paired = bit_rev_len & !1;
    ((2 * core_id).min(paired)..paired).step_by(2 * n_pe)
}

//! Radix-4 decimation-in-frequency butterfly engine.
//!
//! The transform runs as three kinds of stage over a shrinking butterfly span:
//! a first stage over the whole buffer, middle stages while the quarter span is
//! larger than four, and a twiddle-free last stage. Every stage is split across
//! the cores of a [`CoreGroup`] and closed by a barrier on that group.
//!
//! Output order is bit-reversed. Each butterfly writes the `(R - V)` term (bin
//! 2 of the four-point DFT) to the second slot and bin 1 to the third, which
//! turns radix-4 digit reversal into plain bit reversal.
//!
//! Fixed-point bookkeeping: inputs are Q15. The first stage scales by 1/8 and
//! leaves Q12, each middle stage scales by 1/4 and drops two fractional bits,
//! and the last stage scales by 1/2 and drops one, for a total of
//! `DFT(x) / fft_len`.
//!
//! After the first stage a full-scale input can put two aligned samples at
//! half scale each, so the pair sums `a ± c` and `b ± d` of the later stages
//! saturate instead of wrapping. Below that edge they are exact.

use crate::num::V2s;
use crate::partition;
use crate::spmd::{CoreGroup, SharedSignal, Spmd};

/// Fractional bits lost by the first stage.
pub const FIRST_STAGE_SHIFT: u32 = 3;
/// Fractional bits lost by each middle stage.
pub const MIDDLE_STAGE_SHIFT: u32 = 2;
/// Fractional bits lost by the last stage.
pub const LAST_STAGE_SHIFT: u32 = 1;

/// Q15 `(cos, sin)` pair `k` of an interleaved coefficient table.
#[inline(always)]
pub(crate) fn coef_pair(table: &[i16], k: usize) -> V2s {
    V2s::new(table[2 * k], table[2 * k + 1])
}

/// The three twiddles of butterfly index `ic`: `W^ic`, `W^2ic`, `W^3ic`.
#[inline(always)]
fn cosi(table: &[i16], ic: usize) -> [V2s; 3] {
    [coef_pair(table, ic), coef_pair(table, 2 * ic), coef_pair(table, 3 * ic)]
}

/// First-stage butterfly on `[a, b, c, d]` read at stride `n2`.
///
/// Returns the values for slots `[i0, i1, i2, i3]`.
#[inline(always)]
pub fn butterfly_first(x: [V2s; 4], w: [V2s; 3]) -> [V2s; 4] {
    let [a, b, c, d] = x.map(|v| v.sra(2));
    let r = a.add(c);
    let s = a.sub(c);
    let v = b.add(d);
    let y0 = r.sra(1).add(v.sra(1));
    let y1 = r.sub(v).twiddle(w[1]);
    let t = b.sub(d);
    let r = s.add(t.mul_j());
    let s = s.add(t.mul_neg_j());
    [y0, y1, s.twiddle(w[0]), r.twiddle(w[2])]
}

/// Middle-stage butterfly: like the first stage, with the 1/4 applied inside the combine.
#[inline(always)]
pub fn butterfly_middle(x: [V2s; 4], w: [V2s; 3]) -> [V2s; 4] {
    let [a, b, c, d] = x;
    let r = a.add_sat(c);
    let s = a.sub_sat(c);
    let v = b.add_sat(d);
    let y0 = r.sra(1).add(v.sra(1)).sra(1);
    let y1 = r.sra(1).sub(v.sra(1)).twiddle(w[1]);
    let t = b.sub_sat(d).sra(1);
    let r = s.sra(1).add(t.mul_j());
    let s = s.sra(1).add(t.mul_neg_j());
    [y0, y1, s.twiddle(w[0]), r.twiddle(w[2])]
}

/// Last-stage butterfly: all twiddles are 1, so only adds and subtracts remain.
#[inline(always)]
pub fn butterfly_last(x: [V2s; 4]) -> [V2s; 4] {
    let [a, b, c, d] = x;
    let r = a.add_sat(c);
    let s = a.sub_sat(c).sra(1);
    let v = b.add_sat(d);
    let t = b.sub_sat(d).sra(1);
    [
        r.sra(1).add(v.sra(1)),
        r.sra(1).sub(v.sra(1)),
        s.add(t.mul_neg_j()),
        s.add(t.mul_j()),
    ]
}

#[inline(always)]
fn load4(src: &SharedSignal<'_>, i0: usize, n2: usize) -> [V2s; 4] {
    [
        src.load(i0),
        src.load(i0 + n2),
        src.load(i0 + 2 * n2),
        src.load(i0 + 3 * n2),
    ]
}

#[inline(always)]
fn store4(src: &SharedSignal<'_>, i0: usize, n2: usize, y: [V2s; 4]) {
    src.store(i0, y[0]);
    src.store(i0 + n2, y[1]);
    src.store(i0 + 2 * n2, y[2]);
    src.store(i0 + 3 * n2, y[3]);
}

/// Radix-4 FFT of the first `fft_len` samples of `src`, run by every core of `group`.
///
/// `fft_len` must be a power of four, at least 16. `twid_coef_modifier` is the
/// stride into `coef` for this length: 1 when the table was built for
/// `fft_len`, 2 when it was built for `2 * fft_len`. The table must hold
/// `3 * fft_len / 4` pairs at that stride.
pub fn radix4_butterfly_q16p<S: Spmd>(
    core: &S,
    group: CoreGroup,
    src: SharedSignal<'_>,
    fft_len: usize,
    coef: &[i16],
    twid_coef_modifier: usize,
) {
    let n_pe = group.len;
    let core_id = group.rank(core.core_id());
    debug_assert!(fft_len >= 16 && fft_len.trailing_zeros() % 2 == 0);
    debug_assert!(src.len() >= fft_len);
    debug_assert!(coef.len() >= 2 * (3 * (fft_len / 4 - 1) * twid_coef_modifier + 1));

    let mut twid = twid_coef_modifier;
    let mut n2 = fft_len >> 2;

    for i0 in partition::first_stage(fft_len, n_pe, core_id) {
        let w = cosi(coef, i0 * twid);
        let y = butterfly_first(load4(&src, i0, n2), w);
        store4(&src, i0, n2, y);
    }
    core.barrier(group);
    if core_id == 0 {
        trace_log!(
            "radix4 {}: first stage done on {} cores (rank 0 took {:?}), Q{}",
            fft_len,
            n_pe,
            partition::first_stage(fft_len, n_pe, 0),
            crate::num::INPUT_Q - FIRST_STAGE_SHIFT
        );
    }

    twid <<= 2;
    let mut q = crate::num::INPUT_Q - FIRST_STAGE_SHIFT;
    while n2 > 4 {
        let n1 = n2;
        n2 >>= 2;
        if let Some(share) = partition::middle_stage(n1, n_pe, core_id) {
            for j in share.butterflies.clone() {
                let w = cosi(coef, j * twid);
                for i0 in share.repeats(j, fft_len) {
                    let y = butterfly_middle(load4(&src, i0, n2), w);
                    store4(&src, i0, n2, y);
                }
            }
        }
        twid <<= 2;
        core.barrier(group);
        q -= MIDDLE_STAGE_SHIFT;
        if core_id == 0 {
            trace_log!("radix4 {}: middle stage span {} done, Q{}", fft_len, n1, q);
        }
    }

    let n1 = n2;
    n2 >>= 2;
    for i0 in partition::last_stage(fft_len, n1, n_pe, core_id) {
        let y = butterfly_last(load4(&src, i0, n2));
        store4(&src, i0, n2, y);
    }
    core.barrier(group);
    if core_id == 0 {
        trace_log!("radix4 {}: last stage done, Q{}", fft_len, q - LAST_STAGE_SHIFT);
    }
}

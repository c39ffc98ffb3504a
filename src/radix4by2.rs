//! Radix-4-by-2 splitter for lengths of the form `2 * 4^k`.
//!
//! One radix-2 decimation-in-frequency pass splits the buffer into two
//! independent half-length problems (even bins in the first half, odd bins in
//! the second), each of which is a power of four and goes to the radix-4
//! engine. With more than one core the group is split in two and each half of
//! the buffer is transformed by its own subgroup concurrently.

use crate::partition;
use crate::radix4::{coef_pair, radix4_butterfly_q16p};
use crate::spmd::{CoreGroup, SharedSignal, Spmd};

/// Radix-4-by-2 FFT of `fft_len` samples, run by every core of `group`.
///
/// `coef` is the twiddle table built for `fft_len`. The split pass halves its
/// inputs to make room for the radix-2 gain, and the final rescale doubles
/// every sample back, so the output scaling matches the radix-4 path. A bin
/// that lands on full scale saturates in the rescale.
pub fn cfft_radix4by2_q16p<S: Spmd>(
    core: &S,
    group: CoreGroup,
    src: SharedSignal<'_>,
    fft_len: usize,
    coef_table: &[i16],
) {
    let n_pe = group.len;
    let core_id = group.rank(core.core_id());
    let n2 = fft_len >> 1;

    for i in partition::radix2_split(fft_len, n_pe, core_id) {
        let l = i + n2;
        let a = src.load(i).sra(1);
        let b = src.load(l).sra(1);
        src.store(i, a.add(b).sra(1));
        src.store(l, a.sub(b).twiddle(coef_pair(coef_table, i)));
    }
    core.barrier(group);

    let (first, second) = src.split_at(n2);
    if n_pe > 1 {
        let (low, high) = group.split();
        if low.contains(core.core_id()) {
            radix4_butterfly_q16p(core, low, first, n2, coef_table, 2);
        } else {
            radix4_butterfly_q16p(core, high, second, n2, coef_table, 2);
        }
        // Rescale slices straddle both halves, so both subgroups must be done.
        core.barrier(group);
    } else {
        radix4_butterfly_q16p(core, group, first, n2, coef_table, 2);
        radix4_butterfly_q16p(core, group, second, n2, coef_table, 2);
    }

    for k in partition::rescale(fft_len, n_pe, core_id) {
        src.store(k, src.load(k).sll_sat(1));
    }
    core.barrier(group);
    if core_id == 0 {
        trace_log!("radix4by2 {}: rescaled on {} cores", fft_len, n_pe);
    }
}

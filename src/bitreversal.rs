//! Parallel bit-reversal permutation.

use crate::partition;
use crate::spmd::{CoreGroup, SharedSignal, Spmd};

/// Swaps the sample pairs named by `table[..bit_rev_len]`, run by every core of `group`.
///
/// Each table entry is a lane offset pre-scaled by four (`8 * sample_index`).
/// Entries must name pairwise disjoint samples, which lets the cores swap
/// without coordination; only the closing barrier is needed.
pub fn bitreversal_q16p<S: Spmd>(
    core: &S,
    group: CoreGroup,
    src: SharedSignal<'_>,
    table: &[u16],
    bit_rev_len: usize,
) {
    let core_id = group.rank(core.core_id());
    for i in partition::swap_pairs(bit_rev_len, group.len, core_id) {
        let a = (table[i] >> 2) as usize;
        let b = (table[i + 1] >> 2) as usize;
        let ta = src.load_lanes(a);
        let tb = src.load_lanes(b);
        src.store_lanes(a, tb);
        src.store_lanes(b, ta);
    }
    core.barrier(group);
}

//! Twiddle and bit-reversal tables.
//!
//! The kernel treats both tables as immutable inputs. They are built here once
//! per length and shared through a [`TablePlanner`] cache, the same way the
//! float planners cache their twiddle factors.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::f64::consts::PI;

use hashbrown::HashMap;

/// Converts `x` in `[-1, 1]` to Q15, saturating at the top of the range.
#[inline]
pub fn to_q15(x: f64) -> i16 {
    let v = libm::round(x * 32768.0);
    v.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Twiddle table for `fft_len`: `3 * fft_len / 4` interleaved Q15 pairs
/// `(cos(2πk/N), sin(2πk/N))`.
///
/// Radix-4 stages read index `3 * ic`, so the table reaches three quarters of
/// the circle. Half-length transforms reuse it at stride 2.
pub fn twiddle_q15(fft_len: usize) -> Vec<i16> {
    let pairs = 3 * fft_len / 4;
    let mut table = Vec::with_capacity(2 * pairs);
    for k in 0..pairs {
        let angle = 2.0 * PI * k as f64 / fft_len as f64;
        table.push(to_q15(libm::cos(angle)));
        table.push(to_q15(libm::sin(angle)));
    }
    table
}

/// Reverses the low `bits` bits of `x`.
#[inline]
pub fn bit_reverse(x: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - bits)
}

/// Swap table that puts a bit-reversed `fft_len` output back in natural order.
///
/// Every sample `i` with `i < bitrev(i)` contributes the pair
/// `(8 * i, 8 * bitrev(i))`: its lane offset `2 * i` pre-scaled by four.
pub fn bit_reversal_table(fft_len: usize) -> Vec<u16> {
    let bits = fft_len.trailing_zeros();
    let mut table = Vec::new();
    for i in 0..fft_len {
        let j = bit_reverse(i, bits);
        if i < j {
            table.push((8 * i) as u16);
            table.push((8 * j) as u16);
        }
    }
    table
}

/// Caches tables by transform length.
#[derive(Default)]
pub struct TablePlanner {
    twiddles: HashMap<usize, Arc<[i16]>>,
    bit_reversal: HashMap<usize, Arc<[u16]>>,
}

impl TablePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Twiddle table for `fft_len`, built on first use.
    pub fn get_twiddles(&mut self, fft_len: usize) -> Arc<[i16]> {
        let table = self
            .twiddles
            .entry(fft_len)
            .or_insert_with(|| Arc::from(twiddle_q15(fft_len)));
        Arc::clone(table)
    }

    /// Bit-reversal table for `fft_len`, built on first use.
    pub fn get_bit_reversal(&mut self, fft_len: usize) -> Arc<[u16]> {
        let table = self
            .bit_reversal
            .entry(fft_len)
            .or_insert_with(|| Arc::from(bit_reversal_table(fft_len)));
        Arc::clone(table)
    }
}

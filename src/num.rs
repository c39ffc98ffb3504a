//! Packed two-lane fixed-point arithmetic.
//!
//! A complex sample is two signed 16-bit lanes (real, imaginary) that the
//! kernel treats as one 32-bit register, the way the accelerator's packed-SIMD
//! instructions do. Every operation here is lane-wise and bit-exact with the
//! hardware: adds and subtracts wrap, shifts are arithmetic, and the twiddle
//! multiply keeps the upper 16 bits of a 32-bit dot product.
//!
//! The scaling discipline of the transform keeps every wrapping lane operation
//! inside `i16`, and debug builds assert it. The few sums that a full-scale
//! input can push to the edge of the range use the saturating variants.

/// Number of fractional bits of the transform input.
pub const INPUT_Q: u32 = 15;

/// Two signed 16-bit lanes: lane 0 is the real part, lane 1 the imaginary part.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct V2s {
    pub re: i16,
    pub im: i16,
}

impl V2s {
    pub const ZERO: Self = Self { re: 0, im: 0 };

    #[inline(always)]
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn splat(v: i16) -> Self {
        Self { re: v, im: v }
    }

    /// Packs both lanes into one little-endian 32-bit word (real in the low half).
    #[inline(always)]
    pub const fn to_bits(self) -> u32 {
        (self.re as u16 as u32) | ((self.im as u16 as u32) << 16)
    }

    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            re: bits as u16 as i16,
            im: (bits >> 16) as u16 as i16,
        }
    }

    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        debug_assert!(
            self.re.checked_add(other.re).is_some() && self.im.checked_add(other.im).is_some(),
            "lane overflow in {:?} + {:?}",
            self,
            other
        );
        #[cfg(feature = "simd")]
        {
            Self::from_bits(swar::add2(self.to_bits(), other.to_bits()))
        }
        #[cfg(not(feature = "simd"))]
        {
            self.add_lanes(other)
        }
    }

    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        debug_assert!(
            self.re.checked_sub(other.re).is_some() && self.im.checked_sub(other.im).is_some(),
            "lane overflow in {:?} - {:?}",
            self,
            other
        );
        #[cfg(feature = "simd")]
        {
            Self::from_bits(swar::sub2(self.to_bits(), other.to_bits()))
        }
        #[cfg(not(feature = "simd"))]
        {
            self.sub_lanes(other)
        }
    }

    /// Lane-wise add, clamped to the `i16` range.
    #[inline(always)]
    pub fn add_sat(self, other: Self) -> Self {
        Self {
            re: self.re.saturating_add(other.re),
            im: self.im.saturating_add(other.im),
        }
    }

    /// Lane-wise subtract, clamped to the `i16` range.
    #[inline(always)]
    pub fn sub_sat(self, other: Self) -> Self {
        Self {
            re: self.re.saturating_sub(other.re),
            im: self.im.saturating_sub(other.im),
        }
    }

    /// Scalar wrapping add, one lane at a time.
    #[inline(always)]
    pub fn add_lanes(self, other: Self) -> Self {
        Self {
            re: self.re.wrapping_add(other.re),
            im: self.im.wrapping_add(other.im),
        }
    }

    /// Scalar wrapping subtract, one lane at a time.
    #[inline(always)]
    pub fn sub_lanes(self, other: Self) -> Self {
        Self {
            re: self.re.wrapping_sub(other.re),
            im: self.im.wrapping_sub(other.im),
        }
    }

    /// Arithmetic shift right of both lanes.
    #[inline(always)]
    pub fn sra(self, shift: u32) -> Self {
        Self {
            re: self.re >> shift,
            im: self.im >> shift,
        }
    }

    /// Logical shift left of both lanes.
    #[inline(always)]
    pub fn sll(self, shift: u32) -> Self {
        debug_assert!(
            (self.re << shift) >> shift == self.re && (self.im << shift) >> shift == self.im,
            "lane overflow in {:?} << {}",
            self,
            shift
        );
        Self {
            re: self.re << shift,
            im: self.im << shift,
        }
    }

    /// Shift left of both lanes, clamped to the `i16` range.
    #[inline(always)]
    pub fn sll_sat(self, shift: u32) -> Self {
        debug_assert!(shift < 16);
        let clamp = |v: i16| ((v as i32) << shift).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        Self {
            re: clamp(self.re),
            im: clamp(self.im),
        }
    }

    /// Sum of the lane-wise products, as a wrapping 32-bit accumulator.
    #[inline(always)]
    pub fn dotp(self, other: Self) -> i32 {
        (self.re as i32 * other.re as i32).wrapping_add(self.im as i32 * other.im as i32)
    }

    /// Multiplication by `j`: `(-im, re)`.
    #[inline(always)]
    pub fn mul_j(self) -> Self {
        Self {
            re: self.im.wrapping_neg(),
            im: self.re,
        }
    }

    /// Multiplication by `-j`: `(im, -re)`.
    #[inline(always)]
    pub fn mul_neg_j(self) -> Self {
        Self {
            re: self.im,
            im: self.re.wrapping_neg(),
        }
    }

    /// Rotates `self` by the conjugate of the Q15 coefficient `cosi = (cos, sin)`.
    ///
    /// Each output lane is the upper half of a 32-bit dot product, so the
    /// result is `self * conj(cosi)` scaled by one half.
    #[inline(always)]
    pub fn twiddle(self, cosi: Self) -> Self {
        Self {
            re: (cosi.dotp(self) >> 16) as i16,
            im: (cosi.mul_j().dotp(self) >> 16) as i16,
        }
    }
}

/// Packed-word lane arithmetic.
///
/// Both lanes are processed in a single `u32` with the carry out of the low
/// lane masked off, which is what the accelerator's `pv.add.h`/`pv.sub.h`
/// do in hardware.
pub mod swar {
    const LOW_BITS: u32 = 0x7fff_7fff;
    const SIGN_BITS: u32 = 0x8000_8000;

    /// Lane-wise wrapping add of two packed words.
    #[inline(always)]
    pub fn add2(a: u32, b: u32) -> u32 {
        ((a & LOW_BITS).wrapping_add(b & LOW_BITS)) ^ ((a ^ b) & SIGN_BITS)
    }

    /// Lane-wise wrapping subtract of two packed words.
    #[inline(always)]
    pub fn sub2(a: u32, b: u32) -> u32 {
        ((a | SIGN_BITS).wrapping_sub(b & LOW_BITS)) ^ ((a ^ !b) & SIGN_BITS)
    }
}

/// Fractional bits of the transform output for a supported `fft_len`.
///
/// Every path of the kernel returns `DFT(x) / fft_len` in the input's integer
/// units, so the output format drops one fractional bit per factor of two.
pub const fn output_q(fft_len: usize) -> u32 {
    INPUT_Q - fft_len.trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_roundtrip_keeps_sign() {
        let v = V2s::new(-2, 32767);
        assert_eq!(V2s::from_bits(v.to_bits()), v);
        assert_eq!(V2s::new(-1, 0).to_bits(), 0x0000_ffff);
    }

    #[test]
    fn shifts_are_arithmetic() {
        let v = V2s::new(-5, 5);
        assert_eq!(v.sra(1), V2s::new(-3, 2));
        assert_eq!(v.sll(2), V2s::new(-20, 20));
    }

    #[test]
    fn saturating_ops_clamp_at_the_edges() {
        let big = V2s::new(16384, -16384);
        assert_eq!(big.add_sat(big), V2s::new(i16::MAX, i16::MIN));
        assert_eq!(big.sub_sat(big.mul_j().mul_j()), V2s::new(i16::MAX, i16::MIN));
        assert_eq!(big.sll_sat(1), V2s::new(i16::MAX, i16::MIN));
        let small = V2s::new(-3, 7);
        assert_eq!(small.add_sat(small), small.add(small));
        assert_eq!(small.sub_sat(V2s::new(1, 1)), small.sub(V2s::new(1, 1)));
        assert_eq!(small.sll_sat(2), small.sll(2));
    }

    #[test]
    fn quarter_rotations() {
        let v = V2s::new(3, -7);
        assert_eq!(v.mul_j(), V2s::new(7, 3));
        assert_eq!(v.mul_neg_j(), V2s::new(-7, -3));
        assert_eq!(v.mul_j().mul_neg_j(), v);
    }

    #[test]
    fn twiddle_by_unity_halves() {
        let v = V2s::new(1000, -2000);
        assert_eq!(v.twiddle(V2s::new(32767, 0)), V2s::new(499, -1000));
    }

    #[test]
    fn twiddle_by_quarter_turn_rotates_clockwise() {
        // conj(j) = -j, so (a + jb) * -j = b - ja, halved.
        let v = V2s::new(1000, 400);
        assert_eq!(v.twiddle(V2s::new(0, 32767)), V2s::new(199, -500));
    }

    #[test]
    fn swar_matches_lanes_at_the_edges() {
        let edges = [i16::MIN, -1, 0, 1, i16::MAX, 12345, -12345];
        for &ar in &edges {
            for &ai in &edges {
                for &br in &edges {
                    for &bi in &edges {
                        let a = V2s::new(ar, ai);
                        let b = V2s::new(br, bi);
                        assert_eq!(
                            V2s::from_bits(swar::add2(a.to_bits(), b.to_bits())),
                            a.add_lanes(b)
                        );
                        assert_eq!(
                            V2s::from_bits(swar::sub2(a.to_bits(), b.to_bits())),
                            a.sub_lanes(b)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn output_formats() {
        assert_eq!(output_q(16), 11);
        assert_eq!(output_q(32), 10);
        assert_eq!(output_q(1024), 5);
        assert_eq!(output_q(4096), 3);
    }
}

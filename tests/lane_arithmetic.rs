// Test intent: packed-word lane arithmetic agrees with the scalar lanes, and
// the twiddle multiply matches its complex-arithmetic definition.

use cfft_q16::num::swar::{add2, sub2};
use cfft_q16::V2s;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_swar_add_matches_lanes(ar: i16, ai: i16, br: i16, bi: i16) {
        let a = V2s::new(ar, ai);
        let b = V2s::new(br, bi);
        prop_assert_eq!(V2s::from_bits(add2(a.to_bits(), b.to_bits())), a.add_lanes(b));
    }

    #[test]
    fn prop_swar_sub_matches_lanes(ar: i16, ai: i16, br: i16, bi: i16) {
        let a = V2s::new(ar, ai);
        let b = V2s::new(br, bi);
        prop_assert_eq!(V2s::from_bits(sub2(a.to_bits(), b.to_bits())), a.sub_lanes(b));
    }

    #[test]
    fn prop_checked_add_matches_lanes(ar in -16384i16..16384, ai in -16384i16..16384, br in -16384i16..16384, bi in -16384i16..16384) {
        let a = V2s::new(ar, ai);
        let b = V2s::new(br, bi);
        prop_assert_eq!(a.add(b), a.add_lanes(b));
        prop_assert_eq!(a.sub(b), a.sub_lanes(b));
    }

    #[test]
    fn prop_twiddle_is_half_conjugate_product(re: i16, im: i16, angle in 0.0f64..core::f64::consts::TAU) {
        let w = V2s::new(
            (angle.cos() * 32767.0).round() as i16,
            (angle.sin() * 32767.0).round() as i16,
        );
        let z = V2s::new(re, im);
        let got = z.twiddle(w);
        let (c, s) = (w.re as f64 / 32768.0, w.im as f64 / 32768.0);
        let want_re = (re as f64 * c + im as f64 * s) / 2.0;
        let want_im = (im as f64 * c - re as f64 * s) / 2.0;
        prop_assert!((got.re as f64 - want_re).abs() <= 1.0);
        prop_assert!((got.im as f64 - want_im).abs() <= 1.0);
    }
}

#[test]
fn dotp_wraps() {
    let a = V2s::new(i16::MIN, i16::MIN);
    assert_eq!(a.dotp(a), i32::MIN);
}

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference DFT in `f64` over interleaved `(re, im)` lanes.
pub fn dft(input: &[i16], inverse: bool) -> Vec<(f64, f64)> {
    let n = input.len() / 2;
    let sign = if inverse { 1.0 } else { -1.0 };
    (0..n)
        .map(|k| {
            let mut acc = (0.0, 0.0);
            for t in 0..n {
                let (re, im) = (input[2 * t] as f64, input[2 * t + 1] as f64);
                let angle = sign * 2.0 * core::f64::consts::PI * ((k * t) % n) as f64 / n as f64;
                let (s, c) = angle.sin_cos();
                acc.0 += re * c - im * s;
                acc.1 += re * s + im * c;
            }
            acc
        })
        .collect()
}

/// Interleaved complex samples with both lanes in `[-amp, amp)`.
pub fn random_complex(n: usize, amp: i16, seed: u64) -> Vec<i16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..2 * n).map(|_| rng.gen_range(-amp..amp)).collect()
}

/// Interleaved samples with a full-range real lane and a zero imaginary lane.
pub fn random_real(n: usize, seed: u64) -> Vec<i16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..2 * n)
        .map(|i| if i % 2 == 0 { rng.gen::<i16>() } else { 0 })
        .collect()
}

/// Interleaved samples of `amp * e^{j2π bin t / n}`, rounded per lane.
pub fn tone(n: usize, bin: usize, amp: i16) -> Vec<i16> {
    (0..n)
        .flat_map(|t| {
            let angle = 2.0 * core::f64::consts::PI * ((bin * t) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            [(amp as f64 * c).round() as i16, (amp as f64 * s).round() as i16]
        })
        .collect()
}

/// Largest lane error and RMS lane error of `out` against `expected / scale`.
pub fn errors(out: &[i16], expected: &[(f64, f64)], scale: f64) -> (f64, f64) {
    let mut max: f64 = 0.0;
    let mut sq = 0.0;
    for (k, &(re, im)) in expected.iter().enumerate() {
        let dr = out[2 * k] as f64 - re / scale;
        let di = out[2 * k + 1] as f64 - im / scale;
        max = max.max(dr.abs()).max(di.abs());
        sq += dr * dr + di * di;
    }
    (max, (sq / (2 * expected.len()) as f64).sqrt())
}

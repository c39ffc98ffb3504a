use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Test signals fed to the fixed-point transform.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Impulse,
    Dc,
    Tone,
    Noise,
}

/// Interleaved Q15 samples of `kind`.
///
/// `amplitude` bounds every lane; `bin` is the tone frequency and `seed`
/// drives the noise generator.
pub fn generate(kind: SignalKind, n: usize, amplitude: i16, bin: usize, seed: u64) -> Vec<i16> {
    let mut buf = vec![0i16; 2 * n];
    match kind {
        SignalKind::Impulse => buf[0] = amplitude,
        SignalKind::Dc => {
            for re in buf.iter_mut().step_by(2) {
                *re = amplitude;
            }
        }
        SignalKind::Tone => {
            for k in 0..n {
                let phase = 2.0 * PI * ((bin * k) % n) as f64 / n as f64;
                buf[2 * k] = (phase.cos() * amplitude as f64).round() as i16;
                buf[2 * k + 1] = (phase.sin() * amplitude as f64).round() as i16;
            }
        }
        SignalKind::Noise => {
            let mut rng = StdRng::seed_from_u64(seed);
            let amp = amplitude.max(1);
            for v in buf.iter_mut() {
                *v = rng.gen_range(-amp..amp);
            }
        }
    }
    buf
}

/// `DFT(x) / n` computed by rustfft in `f64`, in natural order.
pub fn reference_spectrum(input: &[i16], inverse: bool) -> Vec<Complex<f64>> {
    let n = input.len() / 2;
    let mut data: Vec<Complex<f64>> = input
        .chunks(2)
        .map(|c| Complex::new(c[0] as f64, c[1] as f64))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = if inverse {
        planner.plan_fft_inverse(n)
    } else {
        planner.plan_fft_forward(n)
    };
    fft.process(&mut data);
    let scale = 1.0 / n as f64;
    data.iter().map(|&c| c * scale).collect()
}

/// How a fixed-point output compares with its float reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub peak_bin: usize,
    pub peak: (i16, i16),
    /// Largest lane error, in output LSB.
    pub max_error: f64,
    pub rms_error: f64,
    /// Reference power over error power, in dB.
    pub snr_db: f64,
}

pub fn compare(output: &[i16], reference: &[Complex<f64>]) -> Report {
    let mut peak_bin = 0;
    let mut peak_power = -1i64;
    let mut max_error: f64 = 0.0;
    let mut signal = 0.0;
    let mut noise = 0.0;
    for (k, r) in reference.iter().enumerate() {
        let (re, im) = (output[2 * k], output[2 * k + 1]);
        let power = (re as i64).pow(2) + (im as i64).pow(2);
        if power > peak_power {
            peak_power = power;
            peak_bin = k;
        }
        let dr = re as f64 - r.re;
        let di = im as f64 - r.im;
        max_error = max_error.max(dr.abs()).max(di.abs());
        signal += r.norm_sqr();
        noise += dr * dr + di * di;
    }
    let snr_db = if noise == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (signal / noise).log10()
    };
    Report {
        peak_bin,
        peak: (output[2 * peak_bin], output[2 * peak_bin + 1]),
        max_error,
        rms_error: (noise / (2 * reference.len()) as f64).sqrt(),
        snr_db,
    }
}

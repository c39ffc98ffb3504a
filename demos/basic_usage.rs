//! Basic usage example for cfft-q16
//!
//! Transforms a Q15 tone at every supported length and prints the peak bin and
//! the output Q-format.

use cfft_q16::{Q16Plan, SUPPORTED_LENGTHS};
use std::f64::consts::PI;

fn main() {
    println!("=== cfft-q16 Basic Usage Example ===\n");

    for &n in SUPPORTED_LENGTHS.iter() {
        let plan = Q16Plan::new(n).unwrap();
        let bin = n / 8;
        let mut buf = vec![0i16; 2 * n];
        for k in 0..n {
            let phase = 2.0 * PI * (bin * k) as f64 / n as f64;
            buf[2 * k] = (phase.cos() * 16000.0).round() as i16;
            buf[2 * k + 1] = (phase.sin() * 16000.0).round() as i16;
        }

        plan.fft(&mut buf).unwrap();

        let (peak, value) = buf
            .chunks(2)
            .enumerate()
            .max_by_key(|(_, c)| (c[0] as i32).abs() + (c[1] as i32).abs())
            .map(|(k, c)| (k, (c[0], c[1])))
            .unwrap();
        println!(
            "   N = {:4}: tone at bin {:3}, peak at bin {:3} = {:?} (Q{})",
            n,
            bin,
            peak,
            value,
            plan.output_q()
        );

        // Going back gives the input divided by N.
        plan.ifft(&mut buf).unwrap();
    }
}

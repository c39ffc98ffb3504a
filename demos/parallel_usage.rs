//! Runs the same transform on clusters of different sizes and checks that
//! the results agree bit for bit.

use cfft_q16::{Cluster, Q16Plan};
use std::time::Instant;

fn main() {
    let n = 4096;
    let plan = Q16Plan::new(n).unwrap();
    let input: Vec<i16> = (0..2 * n)
        .map(|i| if i % 2 == 0 { ((i * 7919) % 32768) as i16 - 16384 } else { 0 })
        .collect();

    let mut reference = input.clone();
    let start = Instant::now();
    plan.fft(&mut reference).unwrap();
    println!("single core: {:?}", start.elapsed());

    for cores in [2, 4, 8] {
        let cluster = Cluster::new(cores).unwrap();
        let mut buf = input.clone();
        let start = Instant::now();
        plan.fft_on(&cluster, &mut buf).unwrap();
        println!(
            "{:2} cores:    {:?}, identical: {}",
            cores,
            start.elapsed(),
            buf == reference
        );
    }
}

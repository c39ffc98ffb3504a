//! Demonstrates enabling verbose logging for cfft-q16.
use cfft_q16::Q16Plan;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let plan = Q16Plan::new(128).unwrap();
    let mut buf = vec![0i16; 256];
    buf[0] = 32767;
    plan.fft(&mut buf).unwrap();
}

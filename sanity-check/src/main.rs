use cfft_q16::{Cluster, Q16Plan};
use clap::Parser;
use log::{info, warn};
use sanity_check::{compare, generate, reference_spectrum, SignalKind};
use std::error::Error;
use std::time::Instant;

/// Compare the fixed-point FFT with rustfft on a generated signal.
#[derive(Parser)]
struct Args {
    /// Transform length
    #[arg(long, default_value_t = 1024)]
    len: usize,

    /// Number of cores; 1 runs on the calling thread
    #[arg(long, default_value_t = 1)]
    cores: usize,

    /// Input signal
    #[arg(long, value_enum, default_value_t = SignalKind::Tone)]
    signal: SignalKind,

    /// Peak lane amplitude
    #[arg(long, default_value_t = 16000)]
    amplitude: i16,

    /// Tone frequency bin
    #[arg(long, default_value_t = 3)]
    bin: usize,

    /// Noise seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run the inverse transform
    #[arg(long)]
    inverse: bool,

    /// Minimum acceptable SNR in dB
    #[arg(long, default_value_t = 30.0)]
    min_snr: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let plan = Q16Plan::new(args.len)?;
    let input = generate(args.signal, args.len, args.amplitude, args.bin, args.seed);
    let reference = reference_spectrum(&input, args.inverse);

    let mut output = input.clone();
    let start = Instant::now();
    if args.cores > 1 {
        let cluster = Cluster::new(args.cores)?;
        info!("running on {} cores", cluster.cores());
        plan.process_on(&cluster, &mut output, args.inverse, true)?;
    } else {
        plan.process(&mut output, args.inverse, true)?;
    }
    let elapsed = start.elapsed();

    let report = compare(&output, &reference);
    println!(
        "N = {} ({:?}), output Q{}, {} core(s), {:?}",
        args.len,
        plan.radix(),
        plan.output_q(),
        args.cores.max(1),
        elapsed
    );
    println!("peak bin {} = {:?}", report.peak_bin, report.peak);
    println!(
        "max error {:.2} LSB, rms error {:.3} LSB, SNR {:.1} dB",
        report.max_error, report.rms_error, report.snr_db
    );
    if report.snr_db < args.min_snr {
        warn!("SNR below {} dB", args.min_snr);
        return Err(format!("SNR {:.1} dB below {} dB", report.snr_db, args.min_snr).into());
    }
    Ok(())
}

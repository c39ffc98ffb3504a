//! # cfft-q16 - parallel fixed-point complex FFT
//!
//! In-place complex FFT over interleaved signed 16-bit samples, written as an
//! SPMD kernel: every core of a cluster runs the same body on the same buffer,
//! takes a statically computed share of each stage and meets the others at a
//! barrier between stages.
//!
//! ## Supported lengths
//!
//! | Length | Path | Output format |
//! |--------|------|---------------|
//! | 16, 64, 256, 1024, 4096 | radix-4 | Q11, Q9, Q7, Q5, Q3 |
//! | 32, 128, 512, 2048 | radix-4-by-2 | Q10, Q8, Q6, Q4 |
//!
//! Inputs are Q15. Every path produces `DFT(x) / fft_len` in the input's integer
//! units. No stage wraps a 16-bit lane for any input: a full-scale complex tone
//! comes out within a few LSB of full scale, with the bins at the edge of the
//! range saturating. The output is bit-reversed unless a reorder pass is
//! requested.
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` for [`FftError`]
//! - `parallel` (default): the rayon-backed [`cluster::Cluster`] executor, sized
//!   by `CFFT_Q16_CORES` or the CPU count
//! - `simd`: packed-word two-lane arithmetic
//! - `verbose-logging`: per-stage diagnostics through the `log` facade
//!
//! ## Example
//!
//! ```
//! use cfft_q16::Q16Plan;
//!
//! let plan = Q16Plan::new(64).unwrap();
//! let mut buf = vec![0i16; 128];
//! buf[0] = 32767;
//! plan.fft(&mut buf).unwrap();
//! assert_eq!(plan.output_q(), 9);
//! ```

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "verbose-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Two-lane fixed-point arithmetic.
pub mod num;

/// Per-core work partitioning for every stage.
pub mod partition;

/// Rank, barrier and shared-buffer plumbing for SPMD kernels.
pub mod spmd;

/// Radix-4 butterfly engine.
pub mod radix4;

/// Radix-4-by-2 splitter for `2 * 4^k` lengths.
pub mod radix4by2;

/// Bit-reversal permutation.
pub mod bitreversal;

/// Q15 twiddle and bit-reversal tables with a per-length cache.
pub mod tables;

/// Dispatcher and validated plans.
pub mod fft;

/// Thread-pool executor running one kernel body per core.
#[cfg(feature = "parallel")]
pub mod cluster;

#[cfg(feature = "parallel")]
pub use cluster::{set_default_cores, Cluster};
pub use fft::{cfft_q16p, CfftQ16, FftError, Q16Plan, SUPPORTED_LENGTHS};
pub use num::V2s;
pub use spmd::{CoreGroup, SharedSignal, SingleCore, Spmd};
pub use tables::TablePlanner;

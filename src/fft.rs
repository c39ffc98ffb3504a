//! Transform dispatch.
//!
//! [`cfft_q16p`] is the per-core kernel entry: a trusted-input body that every
//! core of a group calls with the same arguments. It picks the radix-4 engine
//! or the radix-4-by-2 splitter from the length, optionally wraps the forward
//! transform into an inverse one, and optionally runs the bit-reversal pass.
//! It reports nothing; a length outside [`SUPPORTED_LENGTHS`] leaves the
//! buffer untouched by the transform.
//!
//! [`Q16Plan`] is the validated outer API on top of it. It owns shared tables,
//! checks lengths up front and returns [`FftError`] instead of relying on the
//! caller's contract.

use alloc::sync::Arc;
use core::fmt;

use crate::bitreversal::bitreversal_q16p;
use crate::num::output_q;
use crate::partition;
use crate::radix4::radix4_butterfly_q16p;
use crate::radix4by2::cfft_radix4by2_q16p;
use crate::spmd::{CoreGroup, SharedSignal, SingleCore, Spmd};
use crate::tables::TablePlanner;

#[cfg(feature = "parallel")]
use crate::cluster::Cluster;

/// Every transform length the kernel handles.
pub const SUPPORTED_LENGTHS: [usize; 9] = [16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// Which decomposition a length goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// Powers of four, straight to the butterfly engine.
    Radix4,
    /// `2 * 4^k`, one radix-2 split then two radix-4 halves.
    Radix4By2,
}

impl Radix {
    /// Returns `None` for lengths outside [`SUPPORTED_LENGTHS`].
    pub fn classify(fft_len: usize) -> Option<Self> {
        match fft_len {
            16 | 64 | 256 | 1024 | 4096 => Some(Radix::Radix4),
            32 | 128 | 512 | 2048 => Some(Radix::Radix4By2),
            _ => None,
        }
    }
}

/// Call parameters shared by all cores of one transform.
#[derive(Debug, Clone, Copy)]
pub struct CfftQ16<'t> {
    pub fft_len: usize,
    /// Q15 `(cos, sin)` pairs built for `fft_len`.
    pub twiddle: &'t [i16],
    /// Swap pairs, pre-scaled lane offsets.
    pub bit_rev_table: &'t [u16],
    /// Number of entries of `bit_rev_table` to use.
    pub bit_rev_len: usize,
    pub ifft: bool,
    /// Reorder the bit-reversed output into natural order.
    pub bit_reverse: bool,
}

/// Per-core complex FFT of `params.fft_len` samples in `signal`.
///
/// Every core of `group` must call this with the same `params` and `signal`.
/// The output is `DFT(x) / fft_len` (or the unnormalised inverse divided by
/// `fft_len` when `ifft` is set), bit-reversed unless `bit_reverse` is set.
pub fn cfft_q16p<S: Spmd>(core: &S, group: CoreGroup, params: &CfftQ16<'_>, signal: SharedSignal<'_>) {
    let fft_len = params.fft_len;
    let radix = Radix::classify(fft_len);
    if radix.is_some() {
        debug_assert!(signal.len() >= fft_len, "signal shorter than {}", fft_len);
        debug_assert!(
            params.twiddle.len() >= 3 * fft_len / 2,
            "twiddle table too short for {}",
            fft_len
        );
    }
    debug_assert!(params.bit_rev_len <= params.bit_rev_table.len());

    if let Some(radix) = radix {
        if params.ifft {
            swap_lanes(core, group, signal, fft_len);
        }
        match radix {
            Radix::Radix4 => radix4_butterfly_q16p(core, group, signal, fft_len, params.twiddle, 1),
            Radix::Radix4By2 => cfft_radix4by2_q16p(core, group, signal, fft_len, params.twiddle),
        }
    }
    if params.bit_reverse {
        bitreversal_q16p(core, group, signal, params.bit_rev_table, params.bit_rev_len);
    }
    if radix.is_some() && params.ifft {
        swap_lanes(core, group, signal, fft_len);
    }
}

/// Exchanges the real and imaginary lanes of the first `fft_len` samples.
fn swap_lanes<S: Spmd>(core: &S, group: CoreGroup, signal: SharedSignal<'_>, fft_len: usize) {
    let core_id = group.rank(core.core_id());
    for k in partition::lane_swap(fft_len, group.len, core_id) {
        let v = signal.load(k);
        signal.store(k, crate::num::V2s::new(v.im, v.re));
    }
    core.barrier(group);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// The length is not in [`SUPPORTED_LENGTHS`].
    UnsupportedLength,
    /// The buffer does not hold exactly `2 * fft_len` lanes.
    MismatchedLengths,
    /// A cluster needs at least one core.
    InvalidCoreCount,
    /// The thread pool could not be started.
    ExecutorUnavailable,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::UnsupportedLength => write!(f, "unsupported FFT length"),
            FftError::MismatchedLengths => write!(f, "buffer length does not match the FFT length"),
            FftError::InvalidCoreCount => write!(f, "core count must be at least one"),
            FftError::ExecutorUnavailable => write!(f, "could not start the core executor"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// A validated transform of one length, holding its shared tables.
#[derive(Debug, Clone)]
pub struct Q16Plan {
    fft_len: usize,
    radix: Radix,
    twiddle: Arc<[i16]>,
    bit_rev: Arc<[u16]>,
}

impl Q16Plan {
    pub fn new(fft_len: usize) -> Result<Self, FftError> {
        Self::with_planner(&mut TablePlanner::new(), fft_len)
    }

    /// Builds a plan whose tables come from (and stay in) `planner`.
    pub fn with_planner(planner: &mut TablePlanner, fft_len: usize) -> Result<Self, FftError> {
        let radix = Radix::classify(fft_len).ok_or(FftError::UnsupportedLength)?;
        Ok(Self {
            fft_len,
            radix,
            twiddle: planner.get_twiddles(fft_len),
            bit_rev: planner.get_bit_reversal(fft_len),
        })
    }

    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// Fractional bits of the output.
    pub fn output_q(&self) -> u32 {
        output_q(self.fft_len)
    }

    pub fn twiddles(&self) -> &[i16] {
        &self.twiddle
    }

    pub fn bit_reversal_table(&self) -> &[u16] {
        &self.bit_rev
    }

    fn params(&self, ifft: bool, reorder: bool) -> CfftQ16<'_> {
        CfftQ16 {
            fft_len: self.fft_len,
            twiddle: &self.twiddle,
            bit_rev_table: &self.bit_rev,
            bit_rev_len: self.bit_rev.len(),
            ifft,
            bit_reverse: reorder,
        }
    }

    fn check(&self, buf: &[i16]) -> Result<(), FftError> {
        if buf.len() != 2 * self.fft_len {
            return Err(FftError::MismatchedLengths);
        }
        Ok(())
    }

    /// Forward transform on the calling thread, output in natural order.
    pub fn fft(&self, buf: &mut [i16]) -> Result<(), FftError> {
        self.process(buf, false, true)
    }

    /// Inverse transform on the calling thread, output in natural order.
    pub fn ifft(&self, buf: &mut [i16]) -> Result<(), FftError> {
        self.process(buf, true, true)
    }

    /// Runs the kernel on the calling thread. With `reorder` unset the
    /// output stays in bit-reversed order.
    pub fn process(&self, buf: &mut [i16], ifft: bool, reorder: bool) -> Result<(), FftError> {
        self.check(buf)?;
        let params = self.params(ifft, reorder);
        cfft_q16p(&SingleCore, CoreGroup::whole(1), &params, SharedSignal::new(buf));
        Ok(())
    }

    /// Forward transform on every core of `cluster`.
    #[cfg(feature = "parallel")]
    pub fn fft_on(&self, cluster: &Cluster, buf: &mut [i16]) -> Result<(), FftError> {
        self.process_on(cluster, buf, false, true)
    }

    /// Inverse transform on every core of `cluster`.
    #[cfg(feature = "parallel")]
    pub fn ifft_on(&self, cluster: &Cluster, buf: &mut [i16]) -> Result<(), FftError> {
        self.process_on(cluster, buf, true, true)
    }

    #[cfg(feature = "parallel")]
    pub fn process_on(
        &self,
        cluster: &Cluster,
        buf: &mut [i16],
        ifft: bool,
        reorder: bool,
    ) -> Result<(), FftError> {
        self.check(buf)?;
        let params = self.params(ifft, reorder);
        let signal = SharedSignal::new(buf);
        let group = CoreGroup::whole(cluster.cores());
        cluster.run(|core| cfft_q16p(core, group, &params, signal));
        Ok(())
    }
}

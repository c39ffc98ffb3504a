//! A rayon thread pool standing in for a cluster of cores.
//!
//! [`Cluster::run`] broadcasts one kernel body to every pool thread; the
//! thread index is the core rank. Group barriers are `std::sync::Barrier`s
//! created the first time any member of a group reaches one, so every
//! subgroup the splitter recurses into gets its own.

use alloc::format;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, OnceLock, PoisonError};

use hashbrown::HashMap;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::fft::FftError;
use crate::spmd::{CoreGroup, Spmd};

/// Environment variable read by [`default_cores`].
pub const CORES_ENV: &str = "CFFT_Q16_CORES";

/// `0` means no override.
static DEFAULT_CORES_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
static DEFAULT_CORES_ENV: OnceLock<Option<usize>> = OnceLock::new();

/// Sets the core count used by [`Cluster::with_default_cores`].
///
/// Passing `0` reverts to the environment variable or the number of CPUs.
pub fn set_default_cores(cores: usize) {
    DEFAULT_CORES_OVERRIDE.store(cores, Ordering::Relaxed);
}

fn env_cores() -> Option<usize> {
    *DEFAULT_CORES_ENV.get_or_init(|| {
        std::env::var(CORES_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
    })
}

/// Core count for a default cluster: override, then `CFFT_Q16_CORES`, then
/// the number of logical CPUs.
pub fn default_cores() -> usize {
    match DEFAULT_CORES_OVERRIDE.load(Ordering::Relaxed) {
        0 => env_cores().unwrap_or_else(|| num_cpus::get().max(1)),
        n => n,
    }
}

type BarrierMap = Mutex<HashMap<CoreGroup, Arc<Barrier>>>;

pub struct Cluster {
    pool: ThreadPool,
    n_pe: usize,
    barriers: BarrierMap,
}

impl Cluster {
    /// Starts a pool of exactly `n_pe` threads.
    pub fn new(n_pe: usize) -> Result<Self, FftError> {
        if n_pe == 0 {
            return Err(FftError::InvalidCoreCount);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_pe)
            .thread_name(|i| format!("cfft-core-{i}"))
            .build()
            .map_err(|_| FftError::ExecutorUnavailable)?;
        trace_log!("cluster of {} cores", n_pe);
        Ok(Self {
            pool,
            n_pe,
            barriers: Mutex::new(HashMap::new()),
        })
    }

    /// A cluster sized by [`default_cores`].
    pub fn with_default_cores() -> Result<Self, FftError> {
        Self::new(default_cores())
    }

    pub fn cores(&self) -> usize {
        self.n_pe
    }

    /// Runs `body` once on every core and returns when all of them are done.
    pub fn run<F>(&self, body: F)
    where
        F: Fn(&Core<'_>) + Sync,
    {
        self.pool.broadcast(|ctx| {
            let core = Core {
                rank: ctx.index(),
                n_pe: self.n_pe,
                barriers: &self.barriers,
            };
            body(&core);
        });
    }
}

impl core::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cluster").field("n_pe", &self.n_pe).finish()
    }
}

/// One core's view of a running [`Cluster`].
pub struct Core<'c> {
    rank: usize,
    n_pe: usize,
    barriers: &'c BarrierMap,
}

impl Core<'_> {
    /// The shared barrier of `group`, created by whichever member asks first.
    fn group_barrier(&self, group: CoreGroup) -> Arc<Barrier> {
        // A panic elsewhere cannot leave the map half-updated.
        let mut barriers = self.barriers.lock().unwrap_or_else(PoisonError::into_inner);
        let barrier = barriers
            .entry(group)
            .or_insert_with(|| Arc::new(Barrier::new(group.len)));
        Arc::clone(barrier)
    }
}

impl Spmd for Core<'_> {
    #[inline]
    fn core_id(&self) -> usize {
        self.rank
    }

    fn barrier(&self, group: CoreGroup) {
        if group.len <= 1 {
            return;
        }
        debug_assert!(
            group.first + group.len <= self.n_pe,
            "{:?} reaches past a cluster of {} cores",
            group,
            self.n_pe
        );
        self.group_barrier(group).wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    #[test]
    fn zero_cores_is_rejected() {
        assert_eq!(Cluster::new(0).unwrap_err(), FftError::InvalidCoreCount);
    }

    #[test]
    fn every_rank_runs_once() {
        let cluster = Cluster::new(5).unwrap();
        let seen: Vec<AtomicUsize> = (0..5).map(|_| AtomicUsize::new(0)).collect();
        cluster.run(|core| {
            seen[core.core_id()].fetch_add(1, Ordering::Relaxed);
        });
        assert!(seen.iter().all(|s| s.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn barrier_orders_writes() {
        let cluster = Cluster::new(4).unwrap();
        let slots: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();
        let sums: Vec<AtomicUsize> = (0..4).map(|_| AtomicUsize::new(0)).collect();
        let group = CoreGroup::whole(4);
        cluster.run(|core| {
            let id = core.core_id();
            slots[id].store(id + 1, Ordering::Relaxed);
            core.barrier(group);
            let total = slots.iter().map(|s| s.load(Ordering::Relaxed)).sum();
            sums[id].store(total, Ordering::Relaxed);
        });
        assert!(sums.iter().all(|s| s.load(Ordering::Relaxed) == 10));
    }

    #[test]
    fn half_groups_synchronise_independently() {
        let cluster = Cluster::new(3).unwrap();
        let (low, high) = CoreGroup::whole(3).split();
        cluster.run(|core| {
            let group = if low.contains(core.core_id()) { low } else { high };
            core.barrier(group);
            core.barrier(group);
            core.barrier(CoreGroup::whole(3));
        });
    }

    #[test]
    fn nested_subgroups_get_their_own_barriers() {
        let cluster = Cluster::new(6).unwrap();
        let (_, high) = CoreGroup::whole(6).split();
        let (quarter_low, quarter_high) = high.split();
        let hits: Vec<AtomicUsize> = (0..6).map(|_| AtomicUsize::new(0)).collect();
        cluster.run(|core| {
            let id = core.core_id();
            if !high.contains(id) {
                return;
            }
            let quarter = if quarter_low.contains(id) { quarter_low } else { quarter_high };
            core.barrier(quarter);
            core.barrier(high);
            hits[id].fetch_add(1, Ordering::Relaxed);
        });
        let counts: Vec<usize> = hits.iter().map(|h| h.load(Ordering::Relaxed)).collect();
        assert_eq!(counts, vec![0, 0, 0, 1, 1, 1]);
    }
}

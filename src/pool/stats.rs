//! Array pool statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of an array pool's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Leases handed out
    pub rented: u64,
    /// Leases handed back
    pub returned: u64,
    /// Arrays allocated because no idle array fit
    pub allocated: u64,
    /// Rents served from an idle array
    pub reused: u64,
    /// Returned arrays dropped instead of retained (bucket full or oversize)
    pub discarded: u64,
}

impl PoolStats {
    /// Leases currently outstanding
    pub fn outstanding(&self) -> u64 {
        self.rented.saturating_sub(self.returned)
    }

    /// Fraction of rents served without allocating (0.0 to 1.0)
    pub fn reuse_rate(&self) -> f64 {
        if self.rented == 0 {
            return 0.0;
        }
        self.reused as f64 / self.rented as f64
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "PoolStats {{ rented: {}, returned: {}, outstanding: {}, allocated: {}, \
             discarded: {}, reuse_rate: {:.2}% }}",
            self.rented,
            self.returned,
            self.outstanding(),
            self.allocated,
            self.discarded,
            self.reuse_rate() * 100.0
        )
    }
}

/// Thread-safe counters behind [`PoolStats`]
#[derive(Debug, Default)]
pub struct AtomicPoolStats {
    rented: AtomicU64,
    returned: AtomicU64,
    allocated: AtomicU64,
    reused: AtomicU64,
    discarded: AtomicU64,
}

impl AtomicPoolStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_rent(&self, reused: bool) {
        self.rented.fetch_add(1, Ordering::Relaxed);
        if reused {
            self.reused.fetch_add(1, Ordering::Relaxed);
        } else {
            self.allocated.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_return(&self, retained: bool) {
        self.returned.fetch_add(1, Ordering::Relaxed);
        if !retained {
            self.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Take a consistent-enough snapshot of the counters
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            rented: self.rented.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

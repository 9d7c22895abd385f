//! Call attribution and the environment's notion of time.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::types::Address;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// The authenticated caller of an operation and the time it executes at.
///
/// Every state-changing operation receives one of these instead of reading
/// ambient state. A component calling into another component passes a context
/// naming itself as the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub timestamp: Timestamp,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: Timestamp) -> Self {
        Self { caller, timestamp }
    }

    /// Same instant, different caller.
    pub fn with_caller(&self, caller: Address) -> Self {
        Self {
            caller,
            timestamp: self.timestamp,
        }
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Build a call context for `caller` at the current time.
    fn context(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.now())
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.now.fetch_add(secs, Ordering::SeqCst) + secs
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.now.store(timestamp, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

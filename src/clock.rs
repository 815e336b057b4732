//! Wall-clock source used for credential expiry checks.
//!
//! Expiry is judged against the local clock only; the backend is never asked whether a
//! credential is still accepted. Tests and embedders swap in [`ManualClock`] so expiry can
//! be driven without waiting.

use chrono::Utc;
use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

pub trait Clock: Debug + Send + Sync {
    /// Current time in whole seconds since the Unix epoch.
    fn now_unix(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Settable clock shared between the code under test and the test driving it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(now_unix: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(now_unix),
        })
    }

    pub fn set(&self, now_unix: i64) {
        self.now.store(now_unix, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

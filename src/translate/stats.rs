//! Translation counters
//!
//! Lock-free counters updated on every handled event and reported at shutdown.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// What happened to one inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Translated into a parameter change
    Translated,
    /// Sysex-class event dropped inside the coalescing window
    Coalesced,
    /// Skip-class controller, dropped
    Skipped,
    /// Forwarded unchanged
    Passed,
    /// Unparseable buffer, dropped
    Ignored,
}

#[derive(Debug, Default)]
pub struct TranslationStats {
    received: AtomicU64,
    translated: AtomicU64,
    coalesced: AtomicU64,
    skipped: AtomicU64,
    passed: AtomicU64,
    ignored: AtomicU64,
}

impl TranslationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: Outcome) {
        self.received.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Outcome::Translated => &self.translated,
            Outcome::Coalesced => &self.coalesced,
            Outcome::Skipped => &self.skipped,
            Outcome::Passed => &self.passed,
            Outcome::Ignored => &self.ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            translated: self.translated.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub received: u64,
    pub translated: u64,
    pub coalesced: u64,
    pub skipped: u64,
    pub passed: u64,
    pub ignored: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} received, {} sysex sent, {} coalesced, {} skipped, {} passed through, {} ignored",
            self.received, self.translated, self.coalesced, self.skipped, self.passed, self.ignored
        )
    }
}

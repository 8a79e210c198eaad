//! Sysex coalescing window
//!
//! Slow synth receivers choke on continuous parameter changes, so sysex output
//! is thinned to at most one frame per window. Values arriving inside the
//! window are dropped, not queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::param_map::CcClass;

/// Default coalescing window
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(30);

/// Sentinel for "never emitted"
const NEVER: u64 = 0;

/// Per-class emission timer
///
/// Timestamps are stored as microseconds since `origin`, offset by one so
/// that zero can mean "never emitted".
pub struct RateLimiter {
    /// Monotonic start time for relative timestamp calculation
    origin: Instant,
    window: Duration,
    last_emit: [AtomicU64; 4],
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self::with_origin(Instant::now(), window)
    }

    /// Create a limiter measuring time from `origin`
    ///
    /// Instants earlier than `origin` count as `origin`.
    pub fn with_origin(origin: Instant, window: Duration) -> Self {
        Self {
            origin,
            window,
            last_emit: Default::default(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn stamp(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.origin).as_micros() as u64 + 1
    }

    /// Whether `class` is subject to the coalescing window
    pub fn is_throttled(class: CcClass) -> bool {
        class == CcClass::Sysex
    }

    /// Check whether a message of `class` may be emitted at `now`
    ///
    /// Does not record anything; call [`RateLimiter::record`] after emitting.
    pub fn admit(&self, class: CcClass, now: Instant) -> bool {
        if !Self::is_throttled(class) {
            return true;
        }

        let last = self.last_emit[class.index()].load(Ordering::Acquire);
        if last == NEVER {
            return true;
        }

        let elapsed = self.stamp(now).saturating_sub(last);
        elapsed >= self.window.as_micros() as u64
    }

    /// Record an emission of `class` at `now`
    pub fn record(&self, class: CcClass, now: Instant) {
        self.last_emit[class.index()].store(self.stamp(now), Ordering::Release);
    }

    /// Time of the last recorded emission, if any
    pub fn last_emit(&self, class: CcClass) -> Option<Instant> {
        match self.last_emit[class.index()].load(Ordering::Acquire) {
            NEVER => None,
            stamp => Some(self.origin + Duration::from_micros(stamp - 1)),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_emission_is_admitted() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0, DEFAULT_WINDOW);

        assert!(limiter.admit(CcClass::Sysex, t0));
        assert_eq!(limiter.last_emit(CcClass::Sysex), None);
    }

    #[test]
    fn test_window_blocks_then_reopens() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0, DEFAULT_WINDOW);

        limiter.record(CcClass::Sysex, t0);
        assert!(!limiter.admit(CcClass::Sysex, t0 + ms(10)));
        assert!(!limiter.admit(CcClass::Sysex, t0 + ms(29)));
        assert!(limiter.admit(CcClass::Sysex, t0 + ms(30)));
        assert!(limiter.admit(CcClass::Sysex, t0 + ms(500)));
    }

    #[test]
    fn test_admit_does_not_record() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0, DEFAULT_WINDOW);

        limiter.record(CcClass::Sysex, t0);
        assert!(!limiter.admit(CcClass::Sysex, t0 + ms(20)));
        // a denied check must not push the window forward
        assert!(limiter.admit(CcClass::Sysex, t0 + ms(30)));
        assert_eq!(limiter.last_emit(CcClass::Sysex), Some(t0));
    }

    #[test]
    fn test_passthrough_classes_never_throttled() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0, DEFAULT_WINDOW);

        for class in [CcClass::Cc, CcClass::System, CcClass::Skip] {
            limiter.record(class, t0);
            assert!(limiter.admit(class, t0));
            assert!(limiter.admit(class, t0 + ms(1)));
        }
    }

    #[test]
    fn test_instants_before_origin() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0 + ms(100), DEFAULT_WINDOW);

        limiter.record(CcClass::Sysex, t0);
        assert!(!limiter.admit(CcClass::Sysex, t0 + ms(100)));
        assert!(limiter.admit(CcClass::Sysex, t0 + ms(130)));
    }

    #[test]
    fn test_zero_window_admits_everything() {
        let t0 = Instant::now();
        let limiter = RateLimiter::with_origin(t0, Duration::ZERO);

        limiter.record(CcClass::Sysex, t0);
        assert!(limiter.admit(CcClass::Sysex, t0));
    }
}

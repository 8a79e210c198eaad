//! CC to sysex translation
//!
//! The [`Translator`] takes one inbound MIDI buffer at a time and decides what,
//! if anything, goes out: a parameter-change frame, the original bytes, or
//! nothing. It never blocks and never fails; drops are normal outcomes.

pub mod param_map;
pub mod rate_limit;
pub mod stats;
pub mod sysex;


use std::time::Instant;

use tracing::trace;

use crate::midi::{MidiMessage, CONTROL_CHANGE};
use param_map::CcClass;
use rate_limit::RateLimiter;
use stats::{Outcome, StatsSnapshot, TranslationStats};
use sysex::ParameterChange;

pub use param_map::{lookup, MapEntry, MAP};

/// A message ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Freshly built parameter change
    Sysex(ParameterChange),
    /// Inbound bytes forwarded unchanged
    Passthrough(Vec<u8>),
}

impl Outbound {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Outbound::Sysex(frame) => frame.as_bytes(),
            Outbound::Passthrough(bytes) => bytes,
        }
    }

    pub fn is_sysex(&self) -> bool {
        matches!(self, Outbound::Sysex(_))
    }
}

/// Translation engine
///
/// Holds the target device channel and the shared coalescing timer. All state
/// is atomic, so `handle` takes `&self` and the engine can sit behind an `Arc`.
pub struct Translator {
    channel: u8,
    limiter: RateLimiter,
    stats: TranslationStats,
}

impl Translator {
    /// Create a translator for a synth listening on `channel` (0-15)
    pub fn new(channel: u8, limiter: RateLimiter) -> Self {
        Self {
            channel: channel & 0x0F,
            limiter,
            stats: TranslationStats::new(),
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Handle one inbound event received at `now`
    pub fn handle(&self, data: &[u8], now: Instant) -> Option<Outbound> {
        let (cc, value) = match MidiMessage::parse(data) {
            Some(MidiMessage::ControlChange { cc, value, .. }) => (cc, value),
            // truncated controller message, nothing to translate or forward
            None if data.first().map(|s| s & 0xF0) == Some(CONTROL_CHANGE) => {
                trace!("Ignoring truncated CC: {:02X?}", data);
                return self.finish(Outcome::Ignored, None);
            }
            None if data.is_empty() => return self.finish(Outcome::Ignored, None),
            Some(msg) => {
                trace!("Forwarding {}", msg);
                return self.finish(Outcome::Passed, Some(Outbound::Passthrough(data.to_vec())));
            }
            None => return self.finish(Outcome::Passed, Some(Outbound::Passthrough(data.to_vec()))),
        };

        let entry = lookup(cc);
        match entry.class {
            CcClass::Skip => {
                trace!("CC{} unmapped, dropped", cc);
                self.finish(Outcome::Skipped, None)
            }
            CcClass::System | CcClass::Cc => {
                self.finish(Outcome::Passed, Some(Outbound::Passthrough(data.to_vec())))
            }
            CcClass::Sysex => {
                if !self.limiter.admit(CcClass::Sysex, now) {
                    trace!("CC{}={} coalesced ({})", cc, value, entry.label);
                    return self.finish(Outcome::Coalesced, None);
                }

                let frame = ParameterChange::build(self.channel, entry, value);
                self.limiter.record(CcClass::Sysex, now);
                self.finish(Outcome::Translated, Some(Outbound::Sysex(frame)))
            }
        }
    }

    fn finish(&self, outcome: Outcome, out: Option<Outbound>) -> Option<Outbound> {
        self.stats.record(outcome);
        out
    }
}

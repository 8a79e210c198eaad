//! Hardware port binding state
//!
//! Tracks whether the named destination is bound and decides, from one
//! presence observation, whether to open, close or leave the connection.

use std::time::Instant;

/// What the poller should do after an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindAction {
    /// Port appeared (or was never bound): open it
    Bind,
    /// Port vanished while bound: close it and mute output
    Unbind,
    /// Still absent
    Wait,
    /// Still present and bound
    Keep,
}

#[derive(Debug, Clone)]
pub struct PortBinding {
    target: String,
    bound: bool,
    last_check: Option<Instant>,
}

impl PortBinding {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            bound: false,
            last_check: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn last_check(&self) -> Option<Instant> {
        self.last_check
    }

    /// Fold one presence check into the state
    ///
    /// `Unbind` takes effect immediately; `Bind` only after the caller reports
    /// success through [`PortBinding::mark_bound`].
    pub fn observe(&mut self, present: bool, now: Instant) -> BindAction {
        self.last_check = Some(now);
        match (present, self.bound) {
            (true, false) => BindAction::Bind,
            (true, true) => BindAction::Keep,
            (false, true) => {
                self.bound = false;
                BindAction::Unbind
            }
            (false, false) => BindAction::Wait,
        }
    }

    pub fn mark_bound(&mut self) {
        self.bound = true;
    }

    pub fn mark_unbound(&mut self) {
        self.bound = false;
    }
}

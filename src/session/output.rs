//! Outbound MIDI sinks
//!
//! Two destinations receive every outbound message: a virtual port other
//! software can subscribe to, and optionally a named hardware port that is
//! re-resolved periodically and muted while absent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use midir::{MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::binding::{BindAction, PortBinding};
use super::discovery;
use crate::error::{Result, SessionError};
use crate::midi::format_hex;

/// A destination for outbound bytes
pub trait MidiSink: Send + Sync {
    fn name(&self) -> &str;

    /// Unbound sinks are skipped without error
    fn is_bound(&self) -> bool {
        true
    }

    fn send(&self, data: &[u8]) -> Result<()>;

    fn close(&self);
}

/// Virtual output port, created at startup and kept for the process lifetime
pub struct VirtualOutput {
    name: String,
    conn: Mutex<Option<MidiOutputConnection>>,
}

impl VirtualOutput {
    #[cfg(unix)]
    pub fn create(client_name: &str, port_name: &str) -> Result<Self> {
        use midir::os::unix::VirtualOutput as _;

        let midi_out = MidiOutput::new(client_name)?;
        let conn = midi_out
            .create_virtual(port_name)
            .map_err(|e| SessionError::Connect {
                port: port_name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Created virtual output '{}'", port_name);
        Ok(Self {
            name: port_name.to_string(),
            conn: Mutex::new(Some(conn)),
        })
    }

    #[cfg(not(unix))]
    pub fn create(_client_name: &str, _port_name: &str) -> Result<Self> {
        Err(SessionError::VirtualUnsupported)
    }
}

impl MidiSink for VirtualOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_bound(&self) -> bool {
        self.conn.lock().is_some()
    }

    fn send(&self, data: &[u8]) -> Result<()> {
        match self.conn.lock().as_mut() {
            Some(conn) => conn.send(data).map_err(|e| SessionError::Send {
                port: self.name.clone(),
                reason: e.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn close(&self) {
        if let Some(conn) = self.conn.lock().take() {
            conn.close();
            debug!("Closed virtual output '{}'", self.name);
        }
    }
}

/// Named hardware output
///
/// The hot path only reads `bound`; the connection itself changes hands only
/// inside [`HardwareOutput::poll`].
pub struct HardwareOutput {
    client_name: String,
    connection_name: String,
    binding: Mutex<PortBinding>,
    bound: AtomicBool,
    conn: Mutex<Option<MidiOutputConnection>>,
}

impl HardwareOutput {
    /// `connection_name` is what the connection shows up as in port listings
    pub fn new(client_name: &str, target: &str, connection_name: &str) -> Self {
        Self {
            client_name: client_name.to_string(),
            connection_name: connection_name.to_string(),
            binding: Mutex::new(PortBinding::new(target)),
            bound: AtomicBool::new(false),
            conn: Mutex::new(None),
        }
    }

    pub fn target(&self) -> String {
        self.binding.lock().target().to_string()
    }

    /// Check the target's presence once and bind or unbind accordingly
    pub fn poll(&self, now: Instant) {
        let target = self.target();
        let present = match discovery::output_present(&target) {
            Ok(present) => present,
            Err(e) => {
                warn!("Port scan for '{}' failed: {}", target, e);
                return;
            }
        };

        let action = self.binding.lock().observe(present, now);
        match action {
            BindAction::Bind => match self.open(&target) {
                Ok((conn, name)) => {
                    *self.conn.lock() = Some(conn);
                    self.binding.lock().mark_bound();
                    self.bound.store(true, Ordering::Release);
                    info!("Opened hardware output '{}'", name);
                }
                Err(e) => warn!("{}", e),
            },
            BindAction::Unbind => {
                self.bound.store(false, Ordering::Release);
                if let Some(conn) = self.conn.lock().take() {
                    conn.close();
                }
                warn!("'{}' disappeared, hardware output muted", target);
            }
            BindAction::Wait => debug!("'{}' not available yet", target),
            BindAction::Keep => {}
        }
    }

    fn open(&self, target: &str) -> Result<(MidiOutputConnection, String)> {
        let midi_out = MidiOutput::new(&self.client_name)?;
        let (port, name) =
            discovery::find_port(&midi_out, target).ok_or_else(|| SessionError::PortNotFound {
                direction: "output",
                pattern: target.to_string(),
            })?;

        let conn = midi_out
            .connect(&port, &self.connection_name)
            .map_err(|e| SessionError::Connect {
                port: name.clone(),
                reason: e.to_string(),
            })?;
        Ok((conn, name))
    }
}

impl MidiSink for HardwareOutput {
    fn name(&self) -> &str {
        &self.connection_name
    }

    fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    fn send(&self, data: &[u8]) -> Result<()> {
        if !self.is_bound() {
            return Ok(());
        }
        match self.conn.lock().as_mut() {
            Some(conn) => conn.send(data).map_err(|e| SessionError::Send {
                port: self.connection_name.clone(),
                reason: e.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn close(&self) {
        self.bound.store(false, Ordering::Release);
        self.binding.lock().mark_unbound();
        if let Some(conn) = self.conn.lock().take() {
            conn.close();
            debug!("Closed hardware output '{}'", self.connection_name);
        }
    }
}

/// Re-resolve the hardware port every `every`
///
/// The first check is expected to have happened synchronously at startup.
pub fn spawn_rebind_task(output: Arc<HardwareOutput>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            output.poll(Instant::now());
        }
    })
}

/// Fans each outbound message out to every bound sink
#[derive(Default)]
pub struct Dispatcher {
    sinks: Vec<Arc<dyn MidiSink>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sink: Arc<dyn MidiSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Send to every bound sink; returns how many accepted the bytes
    ///
    /// A failing sink is logged and left connected.
    pub fn deliver(&self, data: &[u8]) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            if !sink.is_bound() {
                trace!("{} unbound, dropping {}", sink.name(), format_hex(data));
                continue;
            }
            match sink.send(data) {
                Ok(()) => {
                    debug!("TX -> {}: {}", sink.name(), format_hex(data));
                    delivered += 1;
                }
                Err(e) => warn!("{}", e),
            }
        }
        delivered
    }

    pub fn close_all(&self) {
        for sink in &self.sinks {
            sink.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        name: String,
        bound: AtomicBool,
        fail: bool,
        sent: Mutex<Vec<Vec<u8>>>,
        closed: AtomicBool,
    }

    impl RecordingSink {
        fn new(name: &str, bound: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                bound: AtomicBool::new(bound),
                fail,
                ..Default::default()
            })
        }
    }

    impl MidiSink for RecordingSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_bound(&self) -> bool {
            self.bound.load(Ordering::Relaxed)
        }

        fn send(&self, data: &[u8]) -> Result<()> {
            if self.fail {
                return Err(SessionError::Send {
                    port: self.name.clone(),
                    reason: "device went away".into(),
                });
            }
            self.sent.lock().push(data.to_vec());
            Ok(())
        }

        fn close(&self) {
            self.closed.store(true, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_deliver_to_all_bound() {
        let virt = RecordingSink::new("DX4OPSYX", true, false);
        let hw = RecordingSink::new("TX81Z", true, false);
        let mut dispatcher = Dispatcher::new();
        dispatcher.add(virt.clone());
        dispatcher.add(hw.clone());

        let frame = [0xF0, 0x43, 0x10, 0x12, 0x3E, 0x30, 0xF7];
        assert_eq!(dispatcher.deliver(&frame), 2);
        assert_eq!(virt.sent.lock().as_slice(), &[frame.to_vec()]);
        assert_eq!(hw.sent.lock().as_slice(), &[frame.to_vec()]);
    }

    #[test]
    fn test_unbound_sink_skipped() {
        let virt = RecordingSink::new("DX4OPSYX", true, false);
        let hw = RecordingSink::new("TX81Z", false, false);
        let mut dispatcher = Dispatcher::new();
        dispatcher.add(virt.clone());
        dispatcher.add(hw.clone());

        assert_eq!(dispatcher.deliver(&[0xB0, 64, 127]), 1);
        assert!(hw.sent.lock().is_empty());

        hw.bound.store(true, Ordering::Relaxed);
        assert_eq!(dispatcher.deliver(&[0xB0, 64, 0]), 2);
        assert_eq!(hw.sent.lock().len(), 1);
    }

    #[test]
    fn test_send_failure_does_not_stop_others() {
        let broken = RecordingSink::new("broken", true, true);
        let virt = RecordingSink::new("DX4OPSYX", true, false);
        let mut dispatcher = Dispatcher::new();
        dispatcher.add(broken.clone());
        dispatcher.add(virt.clone());

        assert_eq!(dispatcher.deliver(&[0xF8]), 1);
        assert_eq!(virt.sent.lock().len(), 1);
        // failing sink stays registered and keeps being tried
        assert_eq!(dispatcher.deliver(&[0xF8]), 1);
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_close_all() {
        let a = RecordingSink::new("a", true, false);
        let b = RecordingSink::new("b", false, false);
        let mut dispatcher = Dispatcher::new();
        dispatcher.add(a.clone());
        dispatcher.add(b.clone());

        dispatcher.close_all();
        assert!(a.closed.load(Ordering::Relaxed));
        assert!(b.closed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_hardware_output_starts_muted() {
        let hw = HardwareOutput::new("dxsex", "no-such-device", "DX4OPSYX");
        assert!(!hw.is_bound());
        assert!(hw.send(&[0xF8]).is_ok());
        assert_eq!(hw.target(), "no-such-device");
    }
}

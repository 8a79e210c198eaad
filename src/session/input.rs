//! Inbound MIDI port
//!
//! The platform callback stamps each buffer with its arrival time and hands
//! it to the async side over a bounded channel. Nothing else runs there.

use std::time::Instant;

use midir::{Ignore, MidiInput, MidiInputConnection};
use tokio::sync::mpsc;
use tracing::{info, trace};

use super::discovery;
use crate::error::{Result, SessionError};

/// One buffer as delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub timestamp: Instant,
    pub data: Vec<u8>,
}

/// Where inbound events come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Create a virtual port with this name
    Virtual(String),
    /// Connect to an existing port matching this pattern
    Named(String),
}

/// Open input connection; dropping it stops the callback
pub struct InputPort {
    name: String,
    _conn: MidiInputConnection<()>,
}

impl InputPort {
    pub fn open(
        client_name: &str,
        source: &InputSource,
        tx: mpsc::Sender<InboundEvent>,
    ) -> Result<Self> {
        let mut midi_in = MidiInput::new(client_name)?;
        midi_in.ignore(Ignore::ActiveSense);

        match source {
            InputSource::Virtual(name) => Self::open_virtual(midi_in, name, tx),
            InputSource::Named(pattern) => {
                let (port, name) = discovery::find_port(&midi_in, pattern).ok_or_else(|| {
                    SessionError::PortNotFound {
                        direction: "input",
                        pattern: pattern.clone(),
                    }
                })?;
                let conn = midi_in
                    .connect(&port, client_name, forwarder(tx), ())
                    .map_err(|e| SessionError::Connect {
                        port: name.clone(),
                        reason: e.to_string(),
                    })?;

                info!("Listening on input '{}'", name);
                Ok(Self { name, _conn: conn })
            }
        }
    }

    #[cfg(unix)]
    fn open_virtual(midi_in: MidiInput, name: &str, tx: mpsc::Sender<InboundEvent>) -> Result<Self> {
        use midir::os::unix::VirtualInput;

        let conn = midi_in
            .create_virtual(name, forwarder(tx), ())
            .map_err(|e| SessionError::Connect {
                port: name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Created virtual input '{}'", name);
        Ok(Self {
            name: name.to_string(),
            _conn: conn,
        })
    }

    #[cfg(not(unix))]
    fn open_virtual(_midi_in: MidiInput, _name: &str, _tx: mpsc::Sender<InboundEvent>) -> Result<Self> {
        Err(SessionError::VirtualUnsupported)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Build the platform callback that forwards buffers into `tx`
fn forwarder(tx: mpsc::Sender<InboundEvent>) -> impl FnMut(u64, &[u8], &mut ()) + Send + 'static {
    move |_stamp, data, _| {
        let event = InboundEvent {
            timestamp: Instant::now(),
            data: data.to_vec(),
        };
        if tx.try_send(event).is_err() {
            trace!("Inbound queue full or closed, dropping {:02X?}", data);
        }
    }
}

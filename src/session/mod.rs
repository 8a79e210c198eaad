//! Port session
//!
//! Owns the platform MIDI connections: one inbound port feeding the
//! translator, and either a virtual output or a hardware output that follows
//! its device in and out of existence.

pub mod binding;
pub mod discovery;
pub mod input;
pub mod output;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::MidiConfig;
pub use input::{InboundEvent, InputPort, InputSource};
pub use output::{Dispatcher, HardwareOutput, MidiSink, VirtualOutput};

/// Platform client name for all connections
pub const CLIENT_NAME: &str = "dxsex";

/// Suffix of the inbound port name
pub const INPUT_SUFFIX: &str = "CC";
/// Suffix of the outbound port and hardware connection name
pub const OUTPUT_SUFFIX: &str = "SYX";

pub struct Session {
    input: Option<InputPort>,
    dispatcher: Dispatcher,
    hardware: Option<Arc<HardwareOutput>>,
    rebind_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Open every port described by `config`, forwarding inbound buffers to `tx`
    ///
    /// Must be called from within a tokio runtime when a hardware port is set.
    pub fn open(config: &MidiConfig, tx: mpsc::Sender<InboundEvent>) -> Result<Self> {
        let output_name = format!("{}{}", config.port_prefix, OUTPUT_SUFFIX);
        let source = match &config.input_port {
            Some(pattern) => InputSource::Named(pattern.clone()),
            None => InputSource::Virtual(format!("{}{}", config.port_prefix, INPUT_SUFFIX)),
        };

        let input = InputPort::open(CLIENT_NAME, &source, tx)
            .with_context(|| format!("Failed to open input {:?}", source))?;

        let mut dispatcher = Dispatcher::new();
        let (hardware, rebind_task) = match &config.output_port {
            Some(target) => {
                let hw = Arc::new(HardwareOutput::new(CLIENT_NAME, target, &output_name));
                hw.poll(Instant::now());
                if !hw.is_bound() {
                    info!("'{}' not available yet, will keep looking", target);
                }
                dispatcher.add(hw.clone());

                let every = Duration::from_secs(config.rebind_interval_secs);
                let task = output::spawn_rebind_task(hw.clone(), every);
                (Some(hw), Some(task))
            }
            None => {
                let virtual_out = VirtualOutput::create(CLIENT_NAME, &output_name)
                    .with_context(|| format!("Failed to create output '{}'", output_name))?;
                dispatcher.add(Arc::new(virtual_out));
                (None, None)
            }
        };

        Ok(Self {
            input: Some(input),
            dispatcher,
            hardware,
            rebind_task,
        })
    }

    pub fn input_name(&self) -> Option<&str> {
        self.input.as_ref().map(|p| p.name())
    }

    pub fn hardware_bound(&self) -> Option<bool> {
        self.hardware.as_ref().map(|hw| hw.is_bound())
    }

    /// Send one outbound message to every bound destination
    pub fn deliver(&self, data: &[u8]) -> usize {
        self.dispatcher.deliver(data)
    }

    /// Stop input first so nothing new arrives, then release outputs
    pub fn shutdown(&mut self) {
        if self.input.take().is_some() {
            info!("Input closed");
        }
        if let Some(task) = self.rebind_task.take() {
            task.abort();
        }
        self.dispatcher.close_all();
        self.hardware = None;
        info!("Outputs closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.input.is_some() {
            self.shutdown();
        }
    }
}

//! Configuration
//!
//! YAML file with every field defaulted, overlaid by command-line flags.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::translate::rate_limit::DEFAULT_WINDOW;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub midi: MidiConfig,
    #[serde(default)]
    pub synth: SynthConfig,
}

/// MIDI port configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MidiConfig {
    /// Virtual ports are named `<prefix>CC` and `<prefix>SYX`
    #[serde(default = "default_port_prefix")]
    pub port_prefix: String,
    /// Existing input to listen on instead of the virtual port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_port: Option<String>,
    /// Destination port, matched by case-insensitive substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_port: Option<String>,
    #[serde(default = "default_rebind_interval")]
    pub rebind_interval_secs: u64,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            port_prefix: default_port_prefix(),
            input_port: None,
            output_port: None,
            rebind_interval_secs: default_rebind_interval(),
        }
    }
}

/// Target synth configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SynthConfig {
    /// Basic receive channel, 1-16 as printed on the front panel
    #[serde(default = "default_device_channel")]
    pub device_channel: u8,
    #[serde(default = "default_coalesce_ms")]
    pub coalesce_ms: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            device_channel: default_device_channel(),
            coalesce_ms: default_coalesce_ms(),
        }
    }
}

impl SynthConfig {
    /// Zero-based channel for the wire
    pub fn channel_index(&self) -> u8 {
        self.device_channel.saturating_sub(1) & 0x0F
    }

    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_ms)
    }
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port_prefix: Option<String>,
    pub input_port: Option<String>,
    pub output_port: Option<String>,
    pub device_channel: Option<u8>,
    pub coalesce_ms: Option<u64>,
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Apply command-line overrides, then re-validate
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(prefix) = &overrides.port_prefix {
            self.midi.port_prefix = prefix.clone();
        }
        if let Some(input) = &overrides.input_port {
            self.midi.input_port = Some(input.clone());
        }
        if let Some(output) = &overrides.output_port {
            self.midi.output_port = Some(output.clone());
        }
        if let Some(channel) = overrides.device_channel {
            self.synth.device_channel = channel;
        }
        if let Some(ms) = overrides.coalesce_ms {
            self.synth.coalesce_ms = ms;
        }

        self.validate().context("Invalid command-line override")
    }

    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        if self.midi.port_prefix.is_empty() {
            anyhow::bail!("MIDI port_prefix cannot be empty");
        }
        if self.midi.input_port.as_deref() == Some("") {
            anyhow::bail!("MIDI input_port cannot be empty");
        }
        if self.midi.output_port.as_deref() == Some("") {
            anyhow::bail!("MIDI output_port cannot be empty");
        }
        if self.midi.rebind_interval_secs == 0 {
            anyhow::bail!("MIDI rebind_interval_secs must be at least 1");
        }
        if !(1..=16).contains(&self.synth.device_channel) {
            anyhow::bail!(
                "Synth device_channel {} is invalid (must be 1-16)",
                self.synth.device_channel
            );
        }

        Ok(())
    }
}

fn default_port_prefix() -> String { "DX4OP".to_string() }
fn default_rebind_interval() -> u64 { 2 }
fn default_device_channel() -> u8 { 1 }
fn default_coalesce_ms() -> u64 { DEFAULT_WINDOW.as_millis() as u64 }

//! Command-line interface

use std::path::PathBuf;

use clap::Parser;
use colored::*;

use crate::config::Overrides;
use crate::translate::param_map::{entries_of, CcClass, MAP};

/// dxsex - translate MIDI CC into Yamaha DX/TX parameter-change sysex
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// List available MIDI ports and exit
    #[arg(long, visible_alias = "ports")]
    pub list_ports: bool,

    /// Print the CC parameter map and exit
    #[arg(long)]
    pub print_map: bool,

    /// Send to this output port as well (substring match)
    #[arg(short, long, value_name = "NAME")]
    pub port: Option<String>,

    /// Listen on this input port instead of the virtual one
    #[arg(long, value_name = "NAME")]
    pub input: Option<String>,

    /// Prefix for virtual port names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Synth receive channel (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub channel: Option<u8>,

    /// Sysex coalescing window in milliseconds
    #[arg(long, value_name = "MS")]
    pub coalesce_ms: Option<u64>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            port_prefix: self.prefix.clone(),
            input_port: self.input.clone(),
            output_port: self.port.clone(),
            device_channel: self.channel,
            coalesce_ms: self.coalesce_ms,
        }
    }
}

/// Dump the 128-entry map as an audit table
pub fn print_map() {
    println!("\n{}", "=== CC Parameter Map ===".bold().cyan());
    println!(
        "  {:>3}  {:<6}  {:>5}  {:>5}  {:>6}  {}",
        "CC".bold(),
        "class".bold(),
        "group".bold(),
        "param".bold(),
        "range".bold(),
        "label".bold()
    );

    for entry in MAP.iter() {
        let class = format!("{:<6}", entry.class.to_string());
        let class = match entry.class {
            CcClass::Sysex => class.green(),
            CcClass::Cc => class.yellow(),
            CcClass::System => class.blue(),
            CcClass::Skip => class.dimmed(),
        };

        if entry.class == CcClass::Sysex {
            println!(
                "  {:>3}  {}  {:>5}  {:>5}  {:>6}  {}",
                entry.cc,
                class,
                format!("0x{:02X}", entry.group),
                entry.parameter,
                format!("{}-{}", entry.range.min, entry.range.max),
                entry.label
            );
        } else {
            println!(
                "  {:>3}  {}  {:>5}  {:>5}  {:>6}  {}",
                entry.cc, class, "-", "-", "-", entry.label.dimmed()
            );
        }
    }

    println!();
    for class in CcClass::ALL {
        println!("  {}: {}", class, entries_of(class).count().to_string().green());
    }
    println!();
}

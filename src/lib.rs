//! dxsex - MIDI CC to Yamaha DX/TX parameter-change translator
//!
//! Exposes a virtual MIDI input that takes controller traffic and a virtual
//! output (plus an optional hardware port) that receives four-operator FM
//! parameter-change sysex, with realtime and native-CC traffic passed through.

pub mod cli;
pub mod config;
pub mod error;
pub mod midi;
pub mod paths;
pub mod session;
pub mod translate;

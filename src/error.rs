//! Port session errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("MIDI backend unavailable: {0}")]
    Backend(#[from] midir::InitError),

    #[error("{direction} port matching '{pattern}' not found")]
    PortNotFound {
        direction: &'static str,
        pattern: String,
    },

    #[error("failed to open '{port}': {reason}")]
    Connect { port: String, reason: String },

    #[error("send to '{port}' failed: {reason}")]
    Send { port: String, reason: String },

    #[error("virtual MIDI ports are not supported on this platform; bind a named port instead")]
    VirtualUnsupported,
}

pub type Result<T> = std::result::Result<T, SessionError>;

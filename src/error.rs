//! Error types for lanlight
//!
//! Provides a unified error type for codec and transport operations.

use thiserror::Error;

/// Result type alias using LanError
pub type Result<T> = std::result::Result<T, LanError>;

/// Unified error type for lanlight operations
#[derive(Debug, Error)]
pub enum LanError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection is not bound to a socket")]
    NotBound,

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Truncated {what}: expected {expected} bytes, got {actual}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed header: {0}")]
    Header(String),

    #[error("Unknown message type: {0}")]
    UnknownType(u16),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Responder Errors
    // -------------------------------------------------------------------------
    /// The reply failed after an acknowledgement was already written.
    #[error("Reply failed after {sent} bytes were sent: {source}")]
    PartialSend {
        sent: usize,
        #[source]
        source: Box<LanError>,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LanError {
    /// True for errors raised while decoding bytes off the wire
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            LanError::Truncated { .. }
                | LanError::Header(_)
                | LanError::UnknownType(_)
                | LanError::Protocol(_)
        )
    }

    /// Bytes already on the wire when the operation failed
    pub fn bytes_sent(&self) -> usize {
        match self {
            LanError::PartialSend { sent, .. } => *sent,
            _ => 0,
        }
    }

    pub(crate) fn truncated(what: &'static str, expected: usize, actual: usize) -> Self {
        LanError::Truncated {
            what,
            expected,
            actual,
        }
    }
}

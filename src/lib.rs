//! # lanlight
//!
//! Protocol engine for impersonating a LAN smart bulb:
//! - Bit-exact codec for the 36-byte header and every payload layout
//! - Type-code registry that routes each code to a bare or payload decoder
//! - Ack/response policy for replies
//! - UDP transport that drops undecodable datagrams and keeps listening
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     UDP Connection                           │
//! │             (receive, discard on decode error)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Message Envelope                           │
//! │          (header → type registry → payload codec)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐        ┌─────────────┐
//!               │    Handler    │ ─────▶ │  Responder  │ ──▶ send
//!               │ (worker pool) │        │ (ack / res) │
//!               └───────────────┘        └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{LanError, Result};
pub use network::{Connection, Handler, Reply, Server};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lanlight
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

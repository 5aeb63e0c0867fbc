//! Protocol Module
//!
//! Binary codec for the LAN bulb protocol.
//!
//! ## Message Format
//! ```text
//! ┌──────────────────────────────┬─────────────────────────────┐
//! │        Header (36)           │     Payload (0..=64)        │
//! └──────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! The header's `type` field selects the payload layout. Bare commands
//! (every `Get*`, `LightGet`, `LightGetPower`, `Acknowledgement`) carry no
//! payload. All integers are little-endian.
//!
//! ## Layers
//! - `primitives`: fixed-width values (color, label, power, timestamp, ...)
//! - `header`: the 36-byte frame / frame address / protocol header
//! - `payload`: one struct per payload layout, and the `Payload` enum
//! - `registry`: type code -> bare, decoder, or unknown
//! - `message`: receivable and sendable envelopes

mod header;
mod message;
mod message_type;
mod payload;
mod primitives;
pub mod registry;

pub use header::{Frame, FrameAddress, Header, ProtocolHeader, HEADER_SIZE, PROTOCOL_NUMBER};
pub use message::{ReceivableMessage, SendableMessage};
pub use message_type::MessageType;
pub use payload::{
    DeviceLabel, Firmware, LightSetColor, LightSetPower, LightState, Membership, NetworkInfo,
    Payload, Power, Service, StateInfo, StateService, StateVersion,
};
pub use primitives::{Color, EchoPayload, Ident, Label, PowerLevel, Timestamp, Wire};
pub use registry::{dispatch, Dispatch};

/// Well-known UDP port devices listen on
pub const DEFAULT_PORT: u16 = 56700;

/// Largest datagram read off the socket: header plus the biggest payload
pub const MAX_DATAGRAM_SIZE: usize = HEADER_SIZE + 64;

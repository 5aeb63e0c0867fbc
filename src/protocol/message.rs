//! Message envelope
//!
//! Header plus optional payload, in both directions.

use bytes::{Bytes, BytesMut};

use super::header::{Header, HEADER_SIZE};
use super::message_type::MessageType;
use super::payload::Payload;
use super::primitives::Wire;
use super::registry::{dispatch, Dispatch};
use crate::error::{LanError, Result};

// =============================================================================
// Receivable Message
// =============================================================================

/// A message decoded from one inbound datagram
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivableMessage {
    header: Header,
    typ: MessageType,
    payload: Option<Payload>,
}

impl ReceivableMessage {
    /// Decode a datagram: header, then type dispatch, then payload
    ///
    /// Any failure aborts the whole decode; no partial message is built.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Header::decode(bytes)?;
        let body = &bytes[HEADER_SIZE..];

        let (typ, payload) = match dispatch(header.protocol_header.typ)? {
            Dispatch::Bare(typ) => (typ, None),
            Dispatch::Decode(typ, decoder) => (typ, Some(decoder(body)?)),
        };

        Ok(Self {
            header,
            typ,
            payload,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn message_type(&self) -> MessageType {
        self.typ
    }

    /// The payload, absent for bare commands
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<Payload> {
        self.payload
    }

    pub fn source(&self) -> u32 {
        self.header.frame.source
    }

    pub fn target(&self) -> u64 {
        self.header.frame_address.target
    }

    pub fn sequence(&self) -> u8 {
        self.header.frame_address.sequence
    }

    pub fn ack_required(&self) -> bool {
        self.header.frame_address.ack_required
    }

    pub fn res_required(&self) -> bool {
        self.header.frame_address.res_required
    }

    /// True if addressed to every device or to `mac` specifically
    pub fn is_for(&self, mac: u64) -> bool {
        self.header.frame.tagged || self.target() == 0 || self.target() == mac
    }
}

// =============================================================================
// Sendable Message
// =============================================================================

/// A message under construction for one outbound transmission
///
/// The header's size field is recomputed on every `encode`.
#[derive(Debug, Clone, PartialEq)]
pub struct SendableMessage {
    pub header: Header,
    pub payload: Option<Payload>,
}

impl SendableMessage {
    /// A message with no body
    pub fn bare(typ: MessageType) -> Self {
        Self {
            header: Header::with_type(typ.code()),
            payload: None,
        }
    }

    /// A message whose type is taken from the payload
    pub fn with_payload(payload: Payload) -> Self {
        Self {
            header: Header::with_type(payload.message_type().code()),
            payload: Some(payload),
        }
    }

    /// A bare reply correlated with `trigger` and claimed by `target`
    ///
    /// Source and sequence are copied from the trigger so the requester can
    /// match the reply. The type is left for the caller to set.
    pub fn reply_to(trigger: &ReceivableMessage, target: u64) -> Self {
        let mut header = Header::default();
        header.frame.source = trigger.source();
        header.frame_address.target = target;
        header.frame_address.sequence = trigger.sequence();
        Self {
            header,
            payload: None,
        }
    }

    pub fn source(mut self, source: u32) -> Self {
        self.header.frame.source = source;
        self
    }

    /// Address one device, or every device when `target` is zero
    pub fn target(mut self, target: u64) -> Self {
        self.header.frame_address.target = target;
        self.header.frame.tagged = target == 0;
        self
    }

    pub fn sequence(mut self, sequence: u8) -> Self {
        self.header.frame_address.sequence = sequence;
        self
    }

    pub fn ack_required(mut self, ack: bool) -> Self {
        self.header.frame_address.ack_required = ack;
        self
    }

    pub fn res_required(mut self, res: bool) -> Self {
        self.header.frame_address.res_required = res;
        self
    }

    /// Replace the type and payload together
    pub fn set_reply(&mut self, typ: MessageType, payload: Option<Payload>) {
        self.header.protocol_header.typ = typ.code();
        self.payload = payload;
    }

    /// Encode payload first, then the header with the matching size
    pub fn encode(&self) -> Result<Bytes> {
        let mut body = BytesMut::new();
        if let Some(payload) = &self.payload {
            payload.write(&mut body)?;
        }

        let total = HEADER_SIZE + body.len();
        let mut header = self.header;
        header.frame.size = u16::try_from(total).map_err(|_| {
            LanError::Encode(format!("message of {} bytes exceeds the size field", total))
        })?;

        let mut buf = BytesMut::with_capacity(total);
        header.write(&mut buf)?;
        buf.extend_from_slice(&body);
        Ok(buf.freeze())
    }
}

//! Message header
//!
//! Every datagram starts with the same 36 bytes:
//!
//! ```text
//! ┌──────────────────────── Frame (8) ────────────────────────┐
//! │ size u16 │ origin:2 tagged:1 addressable:1 protocol:12 │ source u32 │
//! ├──────────────────── Frame Address (16) ───────────────────┤
//! │ target u64 │ reserved [u8; 6] │ flags u8 │ sequence u8     │
//! ├─────────────────── Protocol Header (12) ──────────────────┤
//! │ reserved u64 │ type u16 │ reserved u16                     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Flags byte: bit 0 = res_required, bit 1 = ack_required.

use bytes::{Buf, BufMut, BytesMut};

use super::primitives::{ensure, Wire};
use crate::error::{LanError, Result};

/// Encoded header length in bytes
pub const HEADER_SIZE: usize = Frame::SIZE + FrameAddress::SIZE + ProtocolHeader::SIZE;

/// The only protocol number devices accept
pub const PROTOCOL_NUMBER: u16 = 1024;

const TAGGED_BIT: u16 = 1 << 13;
const ADDRESSABLE_BIT: u16 = 1 << 12;
const PROTOCOL_MASK: u16 = 0x0fff;

const RES_REQUIRED_BIT: u8 = 0b01;
const ACK_REQUIRED_BIT: u8 = 0b10;

// =============================================================================
// Frame
// =============================================================================

/// Size, protocol and source of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Size of the entire message in bytes, header included
    pub size: u16,

    /// 2-bit origin indicator, zero for everything we send
    pub origin: u8,

    /// Set when the target is zero and the message addresses every device
    pub tagged: bool,

    /// Always set: the frame address carries a target
    pub addressable: bool,

    /// 12-bit protocol number, always 1024
    pub protocol: u16,

    /// Chosen by the sender and copied into every reply
    pub source: u32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            size: HEADER_SIZE as u16,
            origin: 0,
            tagged: false,
            addressable: true,
            protocol: PROTOCOL_NUMBER,
            source: 0,
        }
    }
}

impl Wire for Frame {
    const SIZE: usize = 8;
    const NAME: &'static str = "frame";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        if self.origin > 0b11 {
            return Err(LanError::Encode(format!(
                "frame origin {} does not fit in 2 bits",
                self.origin
            )));
        }
        if self.protocol > PROTOCOL_MASK {
            return Err(LanError::Encode(format!(
                "protocol number {} does not fit in 12 bits",
                self.protocol
            )));
        }

        let mut bits = u16::from(self.origin) << 14;
        if self.tagged {
            bits |= TAGGED_BIT;
        }
        if self.addressable {
            bits |= ADDRESSABLE_BIT;
        }
        bits |= self.protocol;

        buf.put_u16_le(self.size);
        buf.put_u16_le(bits);
        buf.put_u32_le(self.source);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let size = buf.get_u16_le();
        let bits = buf.get_u16_le();
        let source = buf.get_u32_le();

        let protocol = bits & PROTOCOL_MASK;
        if protocol != PROTOCOL_NUMBER {
            return Err(LanError::Header(format!(
                "unsupported protocol number {}",
                protocol
            )));
        }

        Ok(Self {
            size,
            origin: (bits >> 14) as u8,
            tagged: bits & TAGGED_BIT != 0,
            addressable: bits & ADDRESSABLE_BIT != 0,
            protocol,
            source,
        })
    }
}

// =============================================================================
// Frame Address
// =============================================================================

/// Routing and correlation fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameAddress {
    /// Device MAC in the low six bytes, or zero for all devices
    pub target: u64,

    /// Must be zero when sending
    pub reserved: [u8; 6],

    /// Upper six bits of the flags byte
    pub reserved2: u8,

    /// Sender wants an Acknowledgement
    pub ack_required: bool,

    /// Sender wants a state reply
    pub res_required: bool,

    /// Wrap-around sequence number copied into replies
    pub sequence: u8,
}

impl Wire for FrameAddress {
    const SIZE: usize = 16;
    const NAME: &'static str = "frame address";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        let mut flags = (self.reserved2 & 0b11_1111) << 2;
        if self.ack_required {
            flags |= ACK_REQUIRED_BIT;
        }
        if self.res_required {
            flags |= RES_REQUIRED_BIT;
        }

        buf.put_u64_le(self.target);
        buf.put_slice(&self.reserved);
        buf.put_u8(flags);
        buf.put_u8(self.sequence);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let target = buf.get_u64_le();
        let mut reserved = [0u8; 6];
        buf.copy_to_slice(&mut reserved);
        let flags = buf.get_u8();
        let sequence = buf.get_u8();

        Ok(Self {
            target,
            reserved,
            reserved2: flags >> 2,
            ack_required: flags & ACK_REQUIRED_BIT != 0,
            res_required: flags & RES_REQUIRED_BIT != 0,
            sequence,
        })
    }
}

// =============================================================================
// Protocol Header
// =============================================================================

/// Message type and reserved padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtocolHeader {
    /// Timestamp-like field that devices ignore
    pub reserved: u64,

    /// Selects the payload layout
    pub typ: u16,

    pub reserved2: u16,
}

impl Wire for ProtocolHeader {
    const SIZE: usize = 12;
    const NAME: &'static str = "protocol header";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u64_le(self.reserved);
        buf.put_u16_le(self.typ);
        buf.put_u16_le(self.reserved2);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            reserved: buf.get_u64_le(),
            typ: buf.get_u16_le(),
            reserved2: buf.get_u16_le(),
        })
    }
}

// =============================================================================
// Header
// =============================================================================

/// The full 36-byte header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub frame: Frame,
    pub frame_address: FrameAddress,
    pub protocol_header: ProtocolHeader,
}

impl Header {
    /// A default header carrying the given type code
    pub fn with_type(typ: u16) -> Self {
        let mut header = Header::default();
        header.protocol_header.typ = typ;
        header
    }

    /// Payload length implied by the size field, if it is consistent
    pub fn payload_len(&self) -> Option<usize> {
        usize::from(self.frame.size).checked_sub(HEADER_SIZE)
    }
}

impl Wire for Header {
    const SIZE: usize = HEADER_SIZE;
    const NAME: &'static str = "header";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.frame.write(buf)?;
        self.frame_address.write(buf)?;
        self.protocol_header.write(buf)
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            frame: Frame::read(buf)?,
            frame_address: FrameAddress::read(buf)?,
            protocol_header: ProtocolHeader::read(buf)?,
        })
    }
}

//! Primitive wire values
//!
//! Fixed-width building blocks shared by the header and every payload.
//! Each type writes exactly `SIZE` bytes and refuses to read from a
//! shorter buffer.

use std::borrow::Cow;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{LanError, Result};

// =============================================================================
// Wire Trait
// =============================================================================

/// A value with a fixed little-endian wire layout
pub trait Wire: Sized {
    /// Exact encoded width in bytes
    const SIZE: usize;

    /// Name used in truncation errors
    const NAME: &'static str;

    /// Append the encoded value to `buf`
    fn write(&self, buf: &mut BytesMut) -> Result<()>;

    /// Read a value from the front of `buf`, advancing it by `SIZE`
    fn read(buf: &mut &[u8]) -> Result<Self>;

    /// Decode from a slice, ignoring anything past `SIZE`
    fn decode(mut bytes: &[u8]) -> Result<Self> {
        Self::read(&mut bytes)
    }

    /// Encode into a fresh buffer of exactly `SIZE` bytes
    fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(Self::SIZE);
        self.write(&mut buf)?;
        if buf.len() != Self::SIZE {
            return Err(LanError::Encode(format!(
                "{} encoded to {} bytes, expected {}",
                Self::NAME,
                buf.len(),
                Self::SIZE
            )));
        }
        Ok(buf.freeze())
    }
}

/// Fail with `Truncated` unless `buf` holds at least `expected` bytes
pub(crate) fn ensure(buf: &[u8], expected: usize, what: &'static str) -> Result<()> {
    if buf.len() < expected {
        return Err(LanError::truncated(what, expected, buf.len()));
    }
    Ok(())
}

// =============================================================================
// Color
// =============================================================================

/// Hue-saturation-brightness-kelvin color, four u16 fields
///
/// Saturation 0 renders a white whose temperature is given by `kelvin`;
/// otherwise `kelvin` is ignored by the bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Color {
    /// A white at the given brightness and temperature
    pub fn white(brightness: u16, kelvin: u16) -> Self {
        Self {
            hue: 0,
            saturation: 0,
            brightness,
            kelvin,
        }
    }
}

impl Wire for Color {
    const SIZE: usize = 8;
    const NAME: &'static str = "color";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u16_le(self.hue);
        buf.put_u16_le(self.saturation);
        buf.put_u16_le(self.brightness);
        buf.put_u16_le(self.kelvin);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            hue: buf.get_u16_le(),
            saturation: buf.get_u16_le(),
            brightness: buf.get_u16_le(),
            kelvin: buf.get_u16_le(),
        })
    }
}

// =============================================================================
// Label
// =============================================================================

/// A device, location, group or owner label
///
/// Stored on the wire as 32 zero-padded bytes. The bytes are kept as
/// received, so a label that is not valid UTF-8 still encodes back to the
/// same 32 bytes. Decoding trims the trailing zeros; encoding fails for
/// more than 32 bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Label(Vec<u8>);

impl Label {
    /// Maximum encoded label length in bytes
    pub const MAX_LEN: usize = 32;

    pub fn new(s: impl Into<String>) -> Self {
        Label(s.into().into_bytes())
    }

    /// A label from raw bytes, which need not be UTF-8
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Label(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The text, with invalid UTF-8 replaced for display
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Label").field(&self.to_string_lossy()).finish()
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl Wire for Label {
    const SIZE: usize = Label::MAX_LEN;
    const NAME: &'static str = "label";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        if self.0.len() > Self::SIZE {
            return Err(LanError::Encode(format!(
                "label is {} bytes, limit is {}",
                self.0.len(),
                Self::SIZE
            )));
        }
        buf.put_slice(&self.0);
        buf.put_bytes(0, Self::SIZE - self.0.len());
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let raw = &buf[..Self::SIZE];
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let label = Label(raw[..end].to_vec());
        buf.advance(Self::SIZE);
        Ok(label)
    }
}

// =============================================================================
// Power Level
// =============================================================================

/// Device or light power level
///
/// The protocol only defines 0 (standby) and 65535 (enabled), but any value
/// is carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PowerLevel(pub u16);

impl PowerLevel {
    pub const STANDBY: PowerLevel = PowerLevel(0);
    pub const ENABLED: PowerLevel = PowerLevel(u16::MAX);

    pub fn is_on(&self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for PowerLevel {
    fn from(on: bool) -> Self {
        if on {
            PowerLevel::ENABLED
        } else {
            PowerLevel::STANDBY
        }
    }
}

impl Wire for PowerLevel {
    const SIZE: usize = 2;
    const NAME: &'static str = "power level";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u16_le(self.0);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(PowerLevel(buf.get_u16_le()))
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Nanoseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Timestamp(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }
}

impl Wire for Timestamp {
    const SIZE: usize = 8;
    const NAME: &'static str = "timestamp";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u64_le(self.0);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Timestamp(buf.get_u64_le()))
    }
}

// =============================================================================
// Identifiers and Opaque Blobs
// =============================================================================

/// 16-byte location, group or owner identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ident(pub [u8; 16]);

impl Wire for Ident {
    const SIZE: usize = 16;
    const NAME: &'static str = "identifier";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_slice(&self.0);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let mut id = [0u8; 16];
        buf.copy_to_slice(&mut id);
        Ok(Ident(id))
    }
}

/// 64 opaque bytes echoed back verbatim
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EchoPayload(pub [u8; 64]);

impl EchoPayload {
    /// Copy up to 64 bytes from `data`, zero filling the rest
    pub fn from_slice(data: &[u8]) -> Self {
        let mut payload = [0u8; 64];
        let n = data.len().min(payload.len());
        payload[..n].copy_from_slice(&data[..n]);
        EchoPayload(payload)
    }
}

impl Default for EchoPayload {
    fn default() -> Self {
        EchoPayload([0u8; 64])
    }
}

impl fmt::Debug for EchoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EchoPayload(")?;
        for b in &self.0[..8] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

impl Wire for EchoPayload {
    const SIZE: usize = 64;
    const NAME: &'static str = "echo payload";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_slice(&self.0);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let mut payload = [0u8; 64];
        buf.copy_to_slice(&mut payload);
        Ok(EchoPayload(payload))
    }
}

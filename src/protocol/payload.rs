//! Payload codec
//!
//! One struct per payload layout. Several message types share a layout
//! (host/wifi info, set/state label, ...); the `Payload` enum names the
//! message type and wraps the shared struct.
//!
//! ## Layouts (little-endian)
//! ```text
//! Power            level u16                                        2
//! DeviceLabel      label [32]                                      32
//! Membership       id [16] + label [32] + updated_at u64           56
//! EchoPayload      opaque [64]                                     64
//! LightSetColor    reserved u8 + color [8] + duration u32          13
//! LightSetPower    level u16 + duration u32                         6
//! StateService     service u8 + port u32                            5
//! NetworkInfo      signal f32 + tx u32 + rx u32                    12
//! Firmware         build u64 + version u32                         12
//! StateVersion     vendor u32 + product u32 + version u32          12
//! StateInfo        time u64 + uptime u64 + downtime u64            24
//! LightState       color [8] + reserved i16 + power u16
//!                  + label [32] + reserved u64                     52
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::message_type::MessageType;
use super::primitives::{ensure, Color, EchoPayload, Ident, Label, PowerLevel, Timestamp, Wire};
use crate::error::{LanError, Result};

// =============================================================================
// Device Payloads
// =============================================================================

/// Transport a device offers in `StateService`
///
/// Only UDP is defined; devices also report reserved ids, which are kept
/// so the message still decodes and re-encodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Udp,
    Reserved(u8),
}

impl Service {
    pub fn id(&self) -> u8 {
        match self {
            Service::Udp => 1,
            Service::Reserved(id) => *id,
        }
    }
}

impl From<u8> for Service {
    fn from(id: u8) -> Self {
        match id {
            1 => Service::Udp,
            other => Service::Reserved(other),
        }
    }
}

/// Reply to `GetService`: which service runs on which port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateService {
    pub service: Service,
    pub port: u32,
}

impl Wire for StateService {
    const SIZE: usize = 5;
    const NAME: &'static str = "StateService";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.service.id());
        buf.put_u32_le(self.port);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        let service = Service::from(buf.get_u8());
        Ok(Self {
            service,
            port: buf.get_u32_le(),
        })
    }
}

/// Radio statistics for `StateHostInfo` and `StateWifiInfo`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkInfo {
    /// Signal strength in milliwatts
    pub signal: f32,
    /// Bytes transmitted since power on
    pub tx: u32,
    /// Bytes received since power on
    pub rx: u32,
}

impl Wire for NetworkInfo {
    const SIZE: usize = 12;
    const NAME: &'static str = "NetworkInfo";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_f32_le(self.signal);
        buf.put_u32_le(self.tx);
        buf.put_u32_le(self.rx);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            signal: buf.get_f32_le(),
            tx: buf.get_u32_le(),
            rx: buf.get_u32_le(),
        })
    }
}

/// Firmware build and version for `StateHostFirmware` and `StateWifiFirmware`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Firmware {
    pub build: Timestamp,
    pub version: u32,
}

impl Wire for Firmware {
    const SIZE: usize = 12;
    const NAME: &'static str = "Firmware";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.build.write(buf)?;
        buf.put_u32_le(self.version);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            build: Timestamp::read(buf)?,
            version: buf.get_u32_le(),
        })
    }
}

/// A bare power level: `SetPower`, `StatePower` and `LightStatePower`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Power {
    pub level: PowerLevel,
}

impl Wire for Power {
    const SIZE: usize = 2;
    const NAME: &'static str = "Power";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.level.write(buf)
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            level: PowerLevel::read(buf)?,
        })
    }
}

/// A bare label: `SetLabel` and `StateLabel`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceLabel {
    pub label: Label,
}

impl Wire for DeviceLabel {
    const SIZE: usize = 32;
    const NAME: &'static str = "DeviceLabel";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.label.write(buf)
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            label: Label::read(buf)?,
        })
    }
}

/// Hardware identity reported in `StateVersion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateVersion {
    pub vendor: u32,
    pub product: u32,
    pub version: u32,
}

impl Wire for StateVersion {
    const SIZE: usize = 12;
    const NAME: &'static str = "StateVersion";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u32_le(self.vendor);
        buf.put_u32_le(self.product);
        buf.put_u32_le(self.version);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            vendor: buf.get_u32_le(),
            product: buf.get_u32_le(),
            version: buf.get_u32_le(),
        })
    }
}

/// Clock and uptime reported in `StateInfo`, all in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateInfo {
    pub time: Timestamp,
    pub uptime: u64,
    pub downtime: u64,
}

impl Wire for StateInfo {
    const SIZE: usize = 24;
    const NAME: &'static str = "StateInfo";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.time.write(buf)?;
        buf.put_u64_le(self.uptime);
        buf.put_u64_le(self.downtime);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            time: Timestamp::read(buf)?,
            uptime: buf.get_u64_le(),
            downtime: buf.get_u64_le(),
        })
    }
}

/// Location, group or owner membership
///
/// Shared by the Set/State pairs for locations, groups and owners.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Membership {
    pub id: Ident,
    pub label: Label,
    pub updated_at: Timestamp,
}

impl Wire for Membership {
    const SIZE: usize = 56;
    const NAME: &'static str = "Membership";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.id.write(buf)?;
        self.label.write(buf)?;
        self.updated_at.write(buf)
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            id: Ident::read(buf)?,
            label: Label::read(buf)?,
            updated_at: Timestamp::read(buf)?,
        })
    }
}

// =============================================================================
// Light Payloads
// =============================================================================

/// Change the light color over `duration` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightSetColor {
    pub reserved: u8,
    pub color: Color,
    pub duration: u32,
}

impl Wire for LightSetColor {
    const SIZE: usize = 13;
    const NAME: &'static str = "LightSetColor";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.reserved);
        self.color.write(buf)?;
        buf.put_u32_le(self.duration);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            reserved: buf.get_u8(),
            color: Color::read(buf)?,
            duration: buf.get_u32_le(),
        })
    }
}

/// Change the light power over `duration` milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightSetPower {
    pub level: PowerLevel,
    pub duration: u32,
}

impl Wire for LightSetPower {
    const SIZE: usize = 6;
    const NAME: &'static str = "LightSetPower";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.level.write(buf)?;
        buf.put_u32_le(self.duration);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            level: PowerLevel::read(buf)?,
            duration: buf.get_u32_le(),
        })
    }
}

/// Full light state: color, power and label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightState {
    pub color: Color,
    pub reserved: i16,
    pub power: PowerLevel,
    pub label: Label,
    pub reserved2: u64,
}

impl Wire for LightState {
    const SIZE: usize = 52;
    const NAME: &'static str = "LightState";

    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.color.write(buf)?;
        buf.put_i16_le(self.reserved);
        self.power.write(buf)?;
        self.label.write(buf)?;
        buf.put_u64_le(self.reserved2);
        Ok(())
    }

    fn read(buf: &mut &[u8]) -> Result<Self> {
        ensure(buf, Self::SIZE, Self::NAME)?;
        Ok(Self {
            color: Color::read(buf)?,
            reserved: buf.get_i16_le(),
            power: PowerLevel::read(buf)?,
            label: Label::read(buf)?,
            reserved2: buf.get_u64_le(),
        })
    }
}

// =============================================================================
// Payload
// =============================================================================

/// A decoded payload, tagged by message type
///
/// Types without a body (every `Get*`, `LightGet`, `LightGetPower` and
/// `Acknowledgement`) have no case here.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    StateService(StateService),
    StateHostInfo(NetworkInfo),
    StateHostFirmware(Firmware),
    StateWifiInfo(NetworkInfo),
    StateWifiFirmware(Firmware),
    SetPower(Power),
    StatePower(Power),
    SetLabel(DeviceLabel),
    StateLabel(DeviceLabel),
    StateVersion(StateVersion),
    StateInfo(StateInfo),
    SetLocation(Membership),
    StateLocation(Membership),
    SetGroup(Membership),
    StateGroup(Membership),
    #[cfg(feature = "owner")]
    SetOwner(Membership),
    #[cfg(feature = "owner")]
    StateOwner(Membership),
    EchoRequest(EchoPayload),
    EchoResponse(EchoPayload),
    LightSetColor(LightSetColor),
    LightState(LightState),
    LightSetPower(LightSetPower),
    LightStatePower(Power),
}

impl Payload {
    /// The type code this payload travels under
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::StateService(_) => MessageType::StateService,
            Payload::StateHostInfo(_) => MessageType::StateHostInfo,
            Payload::StateHostFirmware(_) => MessageType::StateHostFirmware,
            Payload::StateWifiInfo(_) => MessageType::StateWifiInfo,
            Payload::StateWifiFirmware(_) => MessageType::StateWifiFirmware,
            Payload::SetPower(_) => MessageType::SetPower,
            Payload::StatePower(_) => MessageType::StatePower,
            Payload::SetLabel(_) => MessageType::SetLabel,
            Payload::StateLabel(_) => MessageType::StateLabel,
            Payload::StateVersion(_) => MessageType::StateVersion,
            Payload::StateInfo(_) => MessageType::StateInfo,
            Payload::SetLocation(_) => MessageType::SetLocation,
            Payload::StateLocation(_) => MessageType::StateLocation,
            Payload::SetGroup(_) => MessageType::SetGroup,
            Payload::StateGroup(_) => MessageType::StateGroup,
            #[cfg(feature = "owner")]
            Payload::SetOwner(_) => MessageType::SetOwner,
            #[cfg(feature = "owner")]
            Payload::StateOwner(_) => MessageType::StateOwner,
            Payload::EchoRequest(_) => MessageType::EchoRequest,
            Payload::EchoResponse(_) => MessageType::EchoResponse,
            Payload::LightSetColor(_) => MessageType::LightSetColor,
            Payload::LightState(_) => MessageType::LightState,
            Payload::LightSetPower(_) => MessageType::LightSetPower,
            Payload::LightStatePower(_) => MessageType::LightStatePower,
        }
    }

    /// Exact encoded length in bytes
    pub fn wire_size(&self) -> usize {
        match self {
            Payload::StateService(_) => StateService::SIZE,
            Payload::StateHostInfo(_) | Payload::StateWifiInfo(_) => NetworkInfo::SIZE,
            Payload::StateHostFirmware(_) | Payload::StateWifiFirmware(_) => Firmware::SIZE,
            Payload::SetPower(_) | Payload::StatePower(_) | Payload::LightStatePower(_) => {
                Power::SIZE
            }
            Payload::SetLabel(_) | Payload::StateLabel(_) => DeviceLabel::SIZE,
            Payload::StateVersion(_) => StateVersion::SIZE,
            Payload::StateInfo(_) => StateInfo::SIZE,
            Payload::SetLocation(_)
            | Payload::StateLocation(_)
            | Payload::SetGroup(_)
            | Payload::StateGroup(_) => Membership::SIZE,
            #[cfg(feature = "owner")]
            Payload::SetOwner(_) | Payload::StateOwner(_) => Membership::SIZE,
            Payload::EchoRequest(_) | Payload::EchoResponse(_) => EchoPayload::SIZE,
            Payload::LightSetColor(_) => LightSetColor::SIZE,
            Payload::LightState(_) => LightState::SIZE,
            Payload::LightSetPower(_) => LightSetPower::SIZE,
        }
    }

    /// Append the encoded payload to `buf`
    ///
    /// Fails if the variant wrote anything other than `wire_size()` bytes.
    pub fn write(&self, buf: &mut BytesMut) -> Result<()> {
        let start = buf.len();
        match self {
            Payload::StateService(p) => p.write(buf)?,
            Payload::StateHostInfo(p) | Payload::StateWifiInfo(p) => p.write(buf)?,
            Payload::StateHostFirmware(p) | Payload::StateWifiFirmware(p) => p.write(buf)?,
            Payload::SetPower(p) | Payload::StatePower(p) | Payload::LightStatePower(p) => {
                p.write(buf)?
            }
            Payload::SetLabel(p) | Payload::StateLabel(p) => p.write(buf)?,
            Payload::StateVersion(p) => p.write(buf)?,
            Payload::StateInfo(p) => p.write(buf)?,
            Payload::SetLocation(p)
            | Payload::StateLocation(p)
            | Payload::SetGroup(p)
            | Payload::StateGroup(p) => p.write(buf)?,
            #[cfg(feature = "owner")]
            Payload::SetOwner(p) | Payload::StateOwner(p) => p.write(buf)?,
            Payload::EchoRequest(p) | Payload::EchoResponse(p) => p.write(buf)?,
            Payload::LightSetColor(p) => p.write(buf)?,
            Payload::LightState(p) => p.write(buf)?,
            Payload::LightSetPower(p) => p.write(buf)?,
        }

        let written = buf.len() - start;
        if written != self.wire_size() {
            return Err(LanError::Encode(format!(
                "{} payload encoded to {} bytes, expected {}",
                self.message_type(),
                written,
                self.wire_size()
            )));
        }
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.write(&mut buf)?;
        Ok(buf.freeze())
    }
}

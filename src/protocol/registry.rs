//! Type registry
//!
//! Maps a wire type code to what follows the header: nothing, or a payload
//! with a specific decoder. Unknown codes are an error, never a default.

use super::message_type::MessageType;
use super::payload::{
    DeviceLabel, Firmware, LightSetColor, LightSetPower, LightState, Membership, NetworkInfo,
    Payload, Power, StateInfo, StateService, StateVersion,
};
use super::primitives::{EchoPayload, Wire};
use crate::error::Result;

/// Decodes one payload variant from the bytes after the header
pub type Decoder = fn(&[u8]) -> Result<Payload>;

/// Outcome of looking up a type code
#[derive(Clone, Copy)]
pub enum Dispatch {
    /// Recognized type with an empty body
    Bare(MessageType),

    /// Recognized type whose body is decoded by the given function
    Decode(MessageType, Decoder),
}

impl Dispatch {
    pub fn message_type(&self) -> MessageType {
        match self {
            Dispatch::Bare(typ) | Dispatch::Decode(typ, _) => *typ,
        }
    }

    pub fn has_payload(&self) -> bool {
        matches!(self, Dispatch::Decode(..))
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Bare(typ) => write!(f, "Bare({})", typ),
            Dispatch::Decode(typ, _) => write!(f, "Decode({})", typ),
        }
    }
}

/// Look up a type code
///
/// Returns `LanError::UnknownType` carrying the code when it is not known.
pub fn dispatch(code: u16) -> Result<Dispatch> {
    let typ = MessageType::try_from(code)?;
    Ok(route(typ))
}

/// Route a known type; exhaustive over `MessageType`
pub fn route(typ: MessageType) -> Dispatch {
    use MessageType as T;

    match typ {
        T::GetService
        | T::GetHostInfo
        | T::GetHostFirmware
        | T::GetWifiInfo
        | T::GetWifiFirmware
        | T::GetPower
        | T::GetLabel
        | T::GetVersion
        | T::GetInfo
        | T::Acknowledgement
        | T::GetLocation
        | T::GetGroup
        | T::LightGet
        | T::LightGetPower => Dispatch::Bare(typ),
        #[cfg(feature = "owner")]
        T::GetOwner => Dispatch::Bare(typ),

        T::StateService => {
            Dispatch::Decode(typ, |b| StateService::decode(b).map(Payload::StateService))
        }
        T::StateHostInfo => {
            Dispatch::Decode(typ, |b| NetworkInfo::decode(b).map(Payload::StateHostInfo))
        }
        T::StateHostFirmware => {
            Dispatch::Decode(typ, |b| Firmware::decode(b).map(Payload::StateHostFirmware))
        }
        T::StateWifiInfo => {
            Dispatch::Decode(typ, |b| NetworkInfo::decode(b).map(Payload::StateWifiInfo))
        }
        T::StateWifiFirmware => {
            Dispatch::Decode(typ, |b| Firmware::decode(b).map(Payload::StateWifiFirmware))
        }
        T::SetPower => Dispatch::Decode(typ, |b| Power::decode(b).map(Payload::SetPower)),
        T::StatePower => Dispatch::Decode(typ, |b| Power::decode(b).map(Payload::StatePower)),
        T::SetLabel => Dispatch::Decode(typ, |b| DeviceLabel::decode(b).map(Payload::SetLabel)),
        T::StateLabel => Dispatch::Decode(typ, |b| DeviceLabel::decode(b).map(Payload::StateLabel)),
        T::StateVersion => {
            Dispatch::Decode(typ, |b| StateVersion::decode(b).map(Payload::StateVersion))
        }
        T::StateInfo => Dispatch::Decode(typ, |b| StateInfo::decode(b).map(Payload::StateInfo)),
        T::SetLocation => {
            Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::SetLocation))
        }
        T::StateLocation => {
            Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::StateLocation))
        }
        T::SetGroup => Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::SetGroup)),
        T::StateGroup => Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::StateGroup)),
        #[cfg(feature = "owner")]
        T::SetOwner => Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::SetOwner)),
        #[cfg(feature = "owner")]
        T::StateOwner => Dispatch::Decode(typ, |b| Membership::decode(b).map(Payload::StateOwner)),
        T::EchoRequest => {
            Dispatch::Decode(typ, |b| EchoPayload::decode(b).map(Payload::EchoRequest))
        }
        T::EchoResponse => {
            Dispatch::Decode(typ, |b| EchoPayload::decode(b).map(Payload::EchoResponse))
        }
        T::LightSetColor => {
            Dispatch::Decode(typ, |b| LightSetColor::decode(b).map(Payload::LightSetColor))
        }
        T::LightState => Dispatch::Decode(typ, |b| LightState::decode(b).map(Payload::LightState)),
        T::LightSetPower => {
            Dispatch::Decode(typ, |b| LightSetPower::decode(b).map(Payload::LightSetPower))
        }
        T::LightStatePower => {
            Dispatch::Decode(typ, |b| Power::decode(b).map(Payload::LightStatePower))
        }
    }
}

//! Message type codes
//!
//! The 16-bit `type` field of the protocol header.

use std::fmt;

use crate::error::LanError;

/// Every message type this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    // Device messages
    GetService = 2,
    StateService = 3,
    GetHostInfo = 12,
    StateHostInfo = 13,
    GetHostFirmware = 14,
    StateHostFirmware = 15,
    GetWifiInfo = 16,
    StateWifiInfo = 17,
    GetWifiFirmware = 18,
    StateWifiFirmware = 19,
    GetPower = 20,
    SetPower = 21,
    StatePower = 22,
    GetLabel = 23,
    SetLabel = 24,
    StateLabel = 25,
    GetVersion = 32,
    StateVersion = 33,
    GetInfo = 34,
    StateInfo = 35,
    Acknowledgement = 45,
    GetLocation = 48,
    SetLocation = 49,
    StateLocation = 50,
    GetGroup = 51,
    SetGroup = 52,
    StateGroup = 53,
    #[cfg(feature = "owner")]
    GetOwner = 54,
    #[cfg(feature = "owner")]
    SetOwner = 55,
    #[cfg(feature = "owner")]
    StateOwner = 56,
    EchoRequest = 58,
    EchoResponse = 59,

    // Light messages
    LightGet = 101,
    LightSetColor = 102,
    LightState = 107,
    LightGetPower = 116,
    LightSetPower = 117,
    LightStatePower = 118,
}

impl MessageType {
    /// All known types, in code order
    pub const ALL: &'static [MessageType] = &[
        MessageType::GetService,
        MessageType::StateService,
        MessageType::GetHostInfo,
        MessageType::StateHostInfo,
        MessageType::GetHostFirmware,
        MessageType::StateHostFirmware,
        MessageType::GetWifiInfo,
        MessageType::StateWifiInfo,
        MessageType::GetWifiFirmware,
        MessageType::StateWifiFirmware,
        MessageType::GetPower,
        MessageType::SetPower,
        MessageType::StatePower,
        MessageType::GetLabel,
        MessageType::SetLabel,
        MessageType::StateLabel,
        MessageType::GetVersion,
        MessageType::StateVersion,
        MessageType::GetInfo,
        MessageType::StateInfo,
        MessageType::Acknowledgement,
        MessageType::GetLocation,
        MessageType::SetLocation,
        MessageType::StateLocation,
        MessageType::GetGroup,
        MessageType::SetGroup,
        MessageType::StateGroup,
        #[cfg(feature = "owner")]
        MessageType::GetOwner,
        #[cfg(feature = "owner")]
        MessageType::SetOwner,
        #[cfg(feature = "owner")]
        MessageType::StateOwner,
        MessageType::EchoRequest,
        MessageType::EchoResponse,
        MessageType::LightGet,
        MessageType::LightSetColor,
        MessageType::LightState,
        MessageType::LightGetPower,
        MessageType::LightSetPower,
        MessageType::LightStatePower,
    ];

    /// The wire code
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for MessageType {
    type Error = LanError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        let typ = match code {
            2 => MessageType::GetService,
            3 => MessageType::StateService,
            12 => MessageType::GetHostInfo,
            13 => MessageType::StateHostInfo,
            14 => MessageType::GetHostFirmware,
            15 => MessageType::StateHostFirmware,
            16 => MessageType::GetWifiInfo,
            17 => MessageType::StateWifiInfo,
            18 => MessageType::GetWifiFirmware,
            19 => MessageType::StateWifiFirmware,
            20 => MessageType::GetPower,
            21 => MessageType::SetPower,
            22 => MessageType::StatePower,
            23 => MessageType::GetLabel,
            24 => MessageType::SetLabel,
            25 => MessageType::StateLabel,
            32 => MessageType::GetVersion,
            33 => MessageType::StateVersion,
            34 => MessageType::GetInfo,
            35 => MessageType::StateInfo,
            45 => MessageType::Acknowledgement,
            48 => MessageType::GetLocation,
            49 => MessageType::SetLocation,
            50 => MessageType::StateLocation,
            51 => MessageType::GetGroup,
            52 => MessageType::SetGroup,
            53 => MessageType::StateGroup,
            #[cfg(feature = "owner")]
            54 => MessageType::GetOwner,
            #[cfg(feature = "owner")]
            55 => MessageType::SetOwner,
            #[cfg(feature = "owner")]
            56 => MessageType::StateOwner,
            58 => MessageType::EchoRequest,
            59 => MessageType::EchoResponse,
            101 => MessageType::LightGet,
            102 => MessageType::LightSetColor,
            107 => MessageType::LightState,
            116 => MessageType::LightGetPower,
            117 => MessageType::LightSetPower,
            118 => MessageType::LightStatePower,
            _ => return Err(LanError::UnknownType(code)),
        };
        Ok(typ)
    }
}

impl From<MessageType> for u16 {
    fn from(typ: MessageType) -> u16 {
        typ.code()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

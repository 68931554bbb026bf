//! Q.931 Information Elements
//!
//! Codeset 0 information elements (ITU-T Q.931 Section 4.5, Table 4-3).
//!
//! # IE formats
//!
//! - Single octet type 1: `1 | iii | vvvv` (Shift, Congestion level, Repeat indicator)
//! - Single octet type 2: `1 | 010 | iiii` (More data, Sending complete)
//! - Variable length: `0 | iiiiiii`, length, contents
//!
//! Decoded IEs are held in the closed [`Ie`] enum. IEs the registry knows
//! but has no codec for are kept as [`Ie::Raw`].

use std::fmt;

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub mod bearer_capability;
pub mod cause;
pub mod channel_identification;
pub mod indicators;
pub mod party_number;
pub mod registry;
pub mod single_octet;
pub mod text;

pub use bearer_capability::{BearerCapabilityIe, Layer1Info, TransferCapability, TransferMode};
pub use cause::{derive_location, CauseIe, Location};
pub use channel_identification::{ChannelIdentificationIe, ChannelSelection, InterfaceType};
pub use indicators::{
    CallStateIe, NotificationIndicatorIe, ProgressIndicatorIe, RestartClass, RestartIndicatorIe,
    SignalIe,
};
pub use party_number::{
    CalledPartyNumberIe, CallingPartyNumberIe, ConnectedNumberIe, NumberingPlan, PartyNumber,
    Presentation, Screening, TypeOfNumber,
};
pub use registry::{lookup, IeCodec, IeType, IE_TYPES};
pub use single_octet::{CongestionLevel, CongestionLevelIe, RepeatIndicatorIe, ShiftIe};
pub use text::{CallIdentityIe, DateTimeIe, DisplayIe, KeypadFacilityIe};

/// Codeset 0 information element identifiers (ITU-T Q.931 Table 4-3)
///
/// Type 1 single octet IEs are identified by their upper nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum IeId {
    // Variable length
    SegmentedMessage = 0x00,
    BearerCapability = 0x04,
    Cause = 0x08,
    CallIdentity = 0x10,
    CallState = 0x14,
    ChannelIdentification = 0x18,
    Facility = 0x1C,
    ProgressIndicator = 0x1E,
    NetworkSpecificFacilities = 0x20,
    NotificationIndicator = 0x27,
    Display = 0x28,
    DateTime = 0x29,
    KeypadFacility = 0x2C,
    Signal = 0x34,
    InformationRate = 0x40,
    EndToEndTransitDelay = 0x42,
    TransitDelaySelection = 0x43,
    PacketLayerBinaryParameters = 0x44,
    PacketLayerWindowSize = 0x45,
    PacketSize = 0x46,
    ClosedUserGroup = 0x47,
    ReverseChargingIndication = 0x4A,
    ConnectedNumber = 0x4C,
    ConnectedSubaddress = 0x4D,
    CallingPartyNumber = 0x6C,
    CallingPartySubaddress = 0x6D,
    CalledPartyNumber = 0x70,
    CalledPartySubaddress = 0x71,
    RedirectingNumber = 0x74,
    TransitNetworkSelection = 0x78,
    RestartIndicator = 0x79,
    LowLayerCompatibility = 0x7C,
    HighLayerCompatibility = 0x7D,
    UserUser = 0x7E,
    EscapeForExtension = 0x7F,

    // Single octet
    Shift = 0x90,
    MoreData = 0xA0,
    SendingComplete = 0xA1,
    CongestionLevel = 0xB0,
    RepeatIndicator = 0xD0,
}

impl fmt::Display for IeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(u8::from(*self)) {
            Some(ie_type) => f.write_str(ie_type.name),
            None => write!(f, "IE 0x{:02X}", u8::from(*self)),
        }
    }
}

/// Returns true if the identifier octet denotes a single octet IE.
#[inline]
pub fn is_single_octet(octet: u8) -> bool {
    octet & 0x80 != 0
}

/// Splits a single octet IE into its registry identifier and 4-bit value.
///
/// Type 2 IEs (`1010 xxxx`) are identified by the whole octet and carry no
/// value. Type 1 IEs are identified by the upper nibble.
pub fn split_single_octet(octet: u8) -> (u8, Option<u8>) {
    if octet & 0xF0 == 0xA0 {
        (octet, None)
    } else {
        (octet & 0xF0, Some(octet & 0x0F))
    }
}

/// Comprehension required (ITU-T Q.931 Section 4.5.1): variable length IEs
/// whose identifier bits 8-5 are `0000`.
#[inline]
pub fn comprehension_required(id: u8) -> bool {
    id & 0xF0 == 0
}

/// Coding standard, shared by several IEs (octet 3 bits 7-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CodingStandard {
    /// ITU-T standardized coding
    #[default]
    Ccitt = 0,
    /// ISO/IEC standard
    OtherInternational = 1,
    /// National standard
    National = 2,
    /// Standard defined for the network
    NetworkSpecific = 3,
}

impl CodingStandard {
    /// Extracts the coding standard from bits 7-6 of an octet
    pub fn from_octet(octet: u8) -> Self {
        match (octet >> 5) & 0x03 {
            0 => CodingStandard::Ccitt,
            1 => CodingStandard::OtherInternational,
            2 => CodingStandard::National,
            _ => CodingStandard::NetworkSpecific,
        }
    }

    /// Bits 7-6 of an octet
    pub fn to_bits(self) -> u8 {
        u8::from(self) << 5
    }
}

impl fmt::Display for CodingStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodingStandard::Ccitt => "CCITT",
            CodingStandard::OtherInternational => "ISO/IEC",
            CodingStandard::National => "national",
            CodingStandard::NetworkSpecific => "network-specific",
        };
        f.write_str(name)
    }
}

/// A decoded codeset 0 information element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ie {
    BearerCapability(BearerCapabilityIe),
    Cause(CauseIe),
    CallIdentity(CallIdentityIe),
    CallState(CallStateIe),
    ChannelIdentification(ChannelIdentificationIe),
    ProgressIndicator(ProgressIndicatorIe),
    NotificationIndicator(NotificationIndicatorIe),
    Display(DisplayIe),
    DateTime(DateTimeIe),
    KeypadFacility(KeypadFacilityIe),
    Signal(SignalIe),
    ConnectedNumber(ConnectedNumberIe),
    CallingPartyNumber(CallingPartyNumberIe),
    CalledPartyNumber(CalledPartyNumberIe),
    RestartIndicator(RestartIndicatorIe),
    MoreData,
    SendingComplete,
    CongestionLevel(CongestionLevelIe),
    RepeatIndicator(RepeatIndicatorIe),
    /// Known IE without a codec; contents kept verbatim
    Raw { id: u8, data: Bytes },
}

impl Ie {
    /// Registry identifier of this IE
    pub fn id(&self) -> u8 {
        let id = match self {
            Ie::BearerCapability(_) => IeId::BearerCapability,
            Ie::Cause(_) => IeId::Cause,
            Ie::CallIdentity(_) => IeId::CallIdentity,
            Ie::CallState(_) => IeId::CallState,
            Ie::ChannelIdentification(_) => IeId::ChannelIdentification,
            Ie::ProgressIndicator(_) => IeId::ProgressIndicator,
            Ie::NotificationIndicator(_) => IeId::NotificationIndicator,
            Ie::Display(_) => IeId::Display,
            Ie::DateTime(_) => IeId::DateTime,
            Ie::KeypadFacility(_) => IeId::KeypadFacility,
            Ie::Signal(_) => IeId::Signal,
            Ie::ConnectedNumber(_) => IeId::ConnectedNumber,
            Ie::CallingPartyNumber(_) => IeId::CallingPartyNumber,
            Ie::CalledPartyNumber(_) => IeId::CalledPartyNumber,
            Ie::RestartIndicator(_) => IeId::RestartIndicator,
            Ie::MoreData => IeId::MoreData,
            Ie::SendingComplete => IeId::SendingComplete,
            Ie::CongestionLevel(_) => IeId::CongestionLevel,
            Ie::RepeatIndicator(_) => IeId::RepeatIndicator,
            Ie::Raw { id, .. } => return *id,
        };
        id.into()
    }

    /// Registry name of this IE
    pub fn name(&self) -> &'static str {
        lookup(self.id()).map_or("Unknown", |ie_type| ie_type.name)
    }
}

impl fmt::Display for Ie {
    /// Formats the IE through its registry dump callback
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(self.id()).and_then(|ie_type| ie_type.codec) {
            Some(codec) if !matches!(self, Ie::Raw { .. }) => (codec.dump)(self, f),
            _ => match self {
                Ie::Raw { id, data } => write!(
                    f,
                    "{} (0x{:02X}): {}",
                    self.name(),
                    id,
                    dchan_common::HexDump(data)
                ),
                other => f.write_str(other.name()),
            },
        }
    }
}

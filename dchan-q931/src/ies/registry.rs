//! Information element type registry
//!
//! A static table of every codeset 0 IE, sorted by identifier, holding the
//! limits the message decoder enforces and the codec callbacks for the IEs
//! that are interpreted. IEs without a codec are "known but opaque": they
//! are checked for legality and length, and kept as [`Ie::Raw`].
//!
//! Limits follow ITU-T Q.931 Table 4-3. `max_len` counts the whole IE,
//! identifier and length octets included.

use std::fmt::{self, Write as _};

use bytes::BytesMut;
use dchan_common::NetworkType::{self, Ccitt, Etsi};

use crate::codec::{CodecError, CodecResult, InformationElement};
use crate::ies::{
    BearerCapabilityIe, CallIdentityIe, CallStateIe, CalledPartyNumberIe, CallingPartyNumberIe,
    CauseIe, ChannelIdentificationIe, CongestionLevelIe, ConnectedNumberIe, DateTimeIe, DisplayIe,
    Ie, IeId, KeypadFacilityIe, NotificationIndicatorIe, ProgressIndicatorIe, RepeatIndicatorIe,
    RestartIndicatorIe, SignalIe,
};

/// Codec callbacks of an IE type
#[derive(Debug, Clone, Copy)]
pub struct IeCodec {
    /// Decode IE contents
    pub decode: fn(&[u8]) -> CodecResult<Ie>,
    /// Encode IE contents (identifier and length octets excluded)
    pub encode: fn(&Ie, &mut BytesMut) -> CodecResult<()>,
    /// Human readable dump
    pub dump: fn(&Ie, &mut dyn fmt::Write) -> fmt::Result,
}

/// IE type descriptor
#[derive(Debug, Clone, Copy)]
pub struct IeType {
    /// Identifier (upper nibble for type 1 single octet IEs)
    pub id: u8,
    /// Display name
    pub name: &'static str,
    /// Longest allowed IE in octets, `None` if unbounded
    pub max_len: Option<usize>,
    /// Most occurrences allowed in one message, `None` if unbounded
    pub max_occur: Option<usize>,
    /// Network type that defines the IE
    pub network_type: NetworkType,
    /// Codec callbacks, `None` for opaque IEs
    pub codec: Option<IeCodec>,
}

impl IeType {
    /// Returns true if the IE fits one octet
    pub fn is_single_octet(&self) -> bool {
        self.id & 0x80 != 0
    }

    /// Returns true if an IE with `contents_len` octets of contents exceeds
    /// `max_len`
    pub fn exceeds_max_len(&self, contents_len: usize) -> bool {
        match self.max_len {
            Some(max) if self.is_single_octet() => max < 1,
            Some(max) => contents_len + 2 > max,
            None => false,
        }
    }
}

macro_rules! codec {
    ($variant:ident, $ty:ty) => {
        Some(IeCodec {
            decode: |contents| <$ty as InformationElement>::decode(contents).map(Ie::$variant),
            encode: |ie, buf| match ie {
                Ie::$variant(value) => value.encode(buf),
                other => Err(CodecError::IeMismatch {
                    expected: stringify!($variant),
                    actual: other.name(),
                }),
            },
            dump: |ie, out| match ie {
                Ie::$variant(value) => write!(out, "{value}"),
                other => out.write_str(other.name()),
            },
        })
    };
    ($variant:ident) => {
        Some(IeCodec {
            decode: |_| Ok(Ie::$variant),
            encode: |_, _| Ok(()),
            dump: |ie, out| out.write_str(ie.name()),
        })
    };
}

const fn ie(
    id: IeId,
    name: &'static str,
    max_len: Option<usize>,
    max_occur: Option<usize>,
    network_type: NetworkType,
    codec: Option<IeCodec>,
) -> IeType {
    IeType {
        id: id as u8,
        name,
        max_len,
        max_occur,
        network_type,
        codec,
    }
}

/// All codeset 0 IE types, sorted by identifier
pub static IE_TYPES: &[IeType] = &[
    ie(IeId::SegmentedMessage, "Segmented Message", Some(4), Some(1), Ccitt, None),
    ie(IeId::BearerCapability, "Bearer Capability", Some(12), Some(2), Ccitt, codec!(BearerCapability, BearerCapabilityIe)),
    ie(IeId::Cause, "Cause", Some(32), Some(2), Ccitt, codec!(Cause, CauseIe)),
    ie(IeId::CallIdentity, "Call Identity", Some(10), Some(1), Ccitt, codec!(CallIdentity, CallIdentityIe)),
    ie(IeId::CallState, "Call State", Some(3), Some(1), Ccitt, codec!(CallState, CallStateIe)),
    ie(IeId::ChannelIdentification, "Channel Identification", None, Some(1), Ccitt, codec!(ChannelIdentification, ChannelIdentificationIe)),
    ie(IeId::Facility, "Facility", None, None, Ccitt, None),
    ie(IeId::ProgressIndicator, "Progress Indicator", Some(4), Some(2), Ccitt, codec!(ProgressIndicator, ProgressIndicatorIe)),
    ie(IeId::NetworkSpecificFacilities, "Network-Specific Facilities", None, Some(4), Ccitt, None),
    ie(IeId::NotificationIndicator, "Notification Indicator", None, None, Ccitt, codec!(NotificationIndicator, NotificationIndicatorIe)),
    ie(IeId::Display, "Display", Some(82), Some(1), Ccitt, codec!(Display, DisplayIe)),
    ie(IeId::DateTime, "Date/Time", Some(8), Some(1), Ccitt, codec!(DateTime, DateTimeIe)),
    ie(IeId::KeypadFacility, "Keypad Facility", Some(34), Some(1), Ccitt, codec!(KeypadFacility, KeypadFacilityIe)),
    ie(IeId::Signal, "Signal", Some(3), Some(1), Ccitt, codec!(Signal, SignalIe)),
    ie(IeId::InformationRate, "Information Rate", Some(6), Some(1), Ccitt, None),
    ie(IeId::EndToEndTransitDelay, "End-to-End Transit Delay", Some(11), Some(1), Ccitt, None),
    ie(IeId::TransitDelaySelection, "Transit Delay Selection and Indication", Some(5), Some(1), Ccitt, None),
    ie(IeId::PacketLayerBinaryParameters, "Packet Layer Binary Parameters", Some(3), Some(1), Ccitt, None),
    ie(IeId::PacketLayerWindowSize, "Packet Layer Window Size", Some(4), Some(1), Ccitt, None),
    ie(IeId::PacketSize, "Packet Size", Some(4), Some(1), Ccitt, None),
    ie(IeId::ClosedUserGroup, "Closed User Group", Some(7), Some(1), Ccitt, None),
    ie(IeId::ReverseChargingIndication, "Reverse Charging Indication", Some(3), Some(1), Ccitt, None),
    ie(IeId::ConnectedNumber, "Connected Number", None, Some(1), Etsi, codec!(ConnectedNumber, ConnectedNumberIe)),
    ie(IeId::ConnectedSubaddress, "Connected Subaddress", Some(23), Some(1), Etsi, None),
    ie(IeId::CallingPartyNumber, "Calling Party Number", None, Some(2), Ccitt, codec!(CallingPartyNumber, CallingPartyNumberIe)),
    ie(IeId::CallingPartySubaddress, "Calling Party Subaddress", Some(23), Some(1), Ccitt, None),
    ie(IeId::CalledPartyNumber, "Called Party Number", None, Some(1), Ccitt, codec!(CalledPartyNumber, CalledPartyNumberIe)),
    ie(IeId::CalledPartySubaddress, "Called Party Subaddress", Some(23), Some(1), Ccitt, None),
    ie(IeId::RedirectingNumber, "Redirecting Number", None, Some(1), Ccitt, None),
    ie(IeId::TransitNetworkSelection, "Transit Network Selection", None, Some(4), Ccitt, None),
    ie(IeId::RestartIndicator, "Restart Indicator", Some(3), Some(1), Ccitt, codec!(RestartIndicator, RestartIndicatorIe)),
    ie(IeId::LowLayerCompatibility, "Low Layer Compatibility", Some(18), Some(2), Ccitt, None),
    ie(IeId::HighLayerCompatibility, "High Layer Compatibility", Some(5), Some(2), Ccitt, None),
    ie(IeId::UserUser, "User-User", Some(131), Some(1), Ccitt, None),
    ie(IeId::EscapeForExtension, "Escape for Extension", None, None, Ccitt, None),
    ie(IeId::Shift, "Shift", Some(1), None, Ccitt, None),
    ie(IeId::MoreData, "More Data", Some(1), Some(1), Ccitt, codec!(MoreData)),
    ie(IeId::SendingComplete, "Sending Complete", Some(1), Some(1), Ccitt, codec!(SendingComplete)),
    ie(IeId::CongestionLevel, "Congestion Level", Some(1), Some(1), Ccitt, codec!(CongestionLevel, CongestionLevelIe)),
    ie(IeId::RepeatIndicator, "Repeat Indicator", Some(1), Some(3), Ccitt, codec!(RepeatIndicator, RepeatIndicatorIe)),
];

/// Looks up an IE type by identifier
///
/// # Example
///
/// ```
/// use dchan_q931::ies::registry::lookup;
///
/// assert_eq!(lookup(0x08).map(|t| t.name), Some("Cause"));
/// assert!(lookup(0x03).is_none());
/// ```
pub fn lookup(id: u8) -> Option<&'static IeType> {
    IE_TYPES
        .binary_search_by_key(&id, |ie_type| ie_type.id)
        .ok()
        .map(|idx| &IE_TYPES[idx])
}

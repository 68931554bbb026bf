//! Indicator IEs
//!
//! Short fixed-layout IEs (ITU-T Q.931 Sections 4.5.7, 4.5.22, 4.5.23,
//! 4.5.25 and 4.5.28).

use std::fmt;

use bytes::BufMut;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{ensure_len, is_last_octet, CodecError, CodecResult, InformationElement, EXT_BIT};
use crate::ies::{CodingStandard, Location};

// ============================================================================
// Call State IE (ITU-T Q.931 Section 4.5.7)
// ============================================================================

/// Call State IE
///
/// `value` is the 6-bit call state (U0-U25 / N0-N22, REST 1/2 as 61/62).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStateIe {
    pub coding_standard: CodingStandard,
    pub value: u8,
}

impl CallStateIe {
    /// Create a CCITT call state
    pub fn new(value: u8) -> Self {
        Self {
            coding_standard: CodingStandard::Ccitt,
            value: value & 0x3F,
        }
    }
}

impl InformationElement for CallStateIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        Ok(Self {
            coding_standard: CodingStandard::from_octet(contents[0] >> 1),
            value: contents[0] & 0x3F,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8((self.coding_standard.to_bits() << 1) | (self.value & 0x3F));
        Ok(())
    }
}

impl fmt::Display for CallStateIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call State: {}", self.value)
    }
}

// ============================================================================
// Progress Indicator IE (ITU-T Q.931 Section 4.5.23)
// ============================================================================

/// Progress description: call is not end-to-end ISDN
pub const PROGRESS_NOT_END_TO_END_ISDN: u8 = 0x01;
/// Progress description: destination address is non-ISDN
pub const PROGRESS_DESTINATION_NON_ISDN: u8 = 0x02;
/// Progress description: origination address is non-ISDN
pub const PROGRESS_ORIGINATION_NON_ISDN: u8 = 0x03;
/// Progress description: call has returned to the ISDN
pub const PROGRESS_RETURNED_TO_ISDN: u8 = 0x04;
/// Progress description: in-band information now available
pub const PROGRESS_INBAND_AVAILABLE: u8 = 0x08;

/// Progress Indicator IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIndicatorIe {
    pub coding_standard: CodingStandard,
    pub location: Location,
    /// Progress description (7 bits)
    pub description: u8,
}

impl ProgressIndicatorIe {
    /// Create a CCITT progress indicator
    pub fn new(location: Location, description: u8) -> Self {
        Self {
            coding_standard: CodingStandard::Ccitt,
            location,
            description: description & 0x7F,
        }
    }
}

impl InformationElement for ProgressIndicatorIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 2)?;
        if !is_last_octet(contents[0]) {
            return Err(CodecError::InvalidExtension(3));
        }
        let location = Location::from(contents[0]);
        Ok(Self {
            coding_standard: CodingStandard::from_octet(contents[0]),
            location,
            description: contents[1] & 0x7F,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(EXT_BIT | self.coding_standard.to_bits() | u8::from(self.location));
        buf.put_u8(EXT_BIT | self.description);
        Ok(())
    }
}

impl fmt::Display for ProgressIndicatorIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self.description {
            PROGRESS_NOT_END_TO_END_ISDN => "call is not end-to-end ISDN",
            PROGRESS_DESTINATION_NON_ISDN => "destination address is non-ISDN",
            PROGRESS_ORIGINATION_NON_ISDN => "origination address is non-ISDN",
            PROGRESS_RETURNED_TO_ISDN => "call has returned to the ISDN",
            PROGRESS_INBAND_AVAILABLE => "in-band information available",
            _ => "unknown",
        };
        write!(
            f,
            "Progress Indicator: {} ({}) location={}",
            self.description,
            text,
            self.location.abbreviation()
        )
    }
}

// ============================================================================
// Restart Indicator IE (ITU-T Q.931 Section 4.5.25)
// ============================================================================

/// Restart class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum RestartClass {
    /// Channels indicated in the Channel Identification IE
    Indicated = 0x0,
    /// Single interface
    SingleInterface = 0x6,
    /// All interfaces
    AllInterfaces = 0x7,
}

/// Restart Indicator IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartIndicatorIe {
    pub class: RestartClass,
}

impl InformationElement for RestartIndicatorIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        let class = contents[0] & 0x07;
        Ok(Self {
            class: RestartClass::try_from(class).map_err(|_| CodecError::InvalidValue {
                field: "restart class",
                value: class,
            })?,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(EXT_BIT | u8::from(self.class));
        Ok(())
    }
}

impl fmt::Display for RestartIndicatorIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Restart Indicator: {:?}", self.class)
    }
}

// ============================================================================
// Notification Indicator IE (ITU-T Q.931 Section 4.5.22)
// ============================================================================

/// Notification description: user suspended
pub const NOTIFY_USER_SUSPENDED: u8 = 0x00;
/// Notification description: user resumed
pub const NOTIFY_USER_RESUMED: u8 = 0x01;
/// Notification description: bearer service change
pub const NOTIFY_BEARER_CHANGE: u8 = 0x02;

/// Notification Indicator IE
///
/// Supplementary-service notifications append further octets, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIndicatorIe {
    pub description: u8,
    pub extra: Vec<u8>,
}

impl InformationElement for NotificationIndicatorIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        Ok(Self {
            description: contents[0] & 0x7F,
            extra: contents[1..].to_vec(),
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(EXT_BIT | (self.description & 0x7F));
        buf.put_slice(&self.extra);
        Ok(())
    }
}

impl fmt::Display for NotificationIndicatorIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self.description {
            NOTIFY_USER_SUSPENDED => "user suspended",
            NOTIFY_USER_RESUMED => "user resumed",
            NOTIFY_BEARER_CHANGE => "bearer service change",
            _ => "other",
        };
        write!(f, "Notification Indicator: {} ({text})", self.description)
    }
}

// ============================================================================
// Signal IE (ITU-T Q.931 Section 4.5.28)
// ============================================================================

/// Signal value: dial tone on
pub const SIGNAL_DIAL_TONE_ON: u8 = 0x00;
/// Signal value: ringback tone on
pub const SIGNAL_RINGBACK_TONE_ON: u8 = 0x01;
/// Signal value: busy tone on
pub const SIGNAL_BUSY_TONE_ON: u8 = 0x04;
/// Signal value: tones off
pub const SIGNAL_TONES_OFF: u8 = 0x3F;
/// Signal value: alerting off
pub const SIGNAL_ALERTING_OFF: u8 = 0x4F;

/// Signal IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalIe {
    pub value: u8,
}

impl InformationElement for SignalIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        Ok(Self { value: contents[0] })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.value);
        Ok(())
    }
}

impl fmt::Display for SignalIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal: 0x{:02X}", self.value)
    }
}

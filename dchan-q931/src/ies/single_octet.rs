//! Single octet IEs (ITU-T Q.931 Sections 4.5.3, 4.5.14, 4.5.19, 4.5.24, 4.5.27)
//!
//! Type 1 IEs carry a 4-bit value in the identifier octet. Their codecs see
//! that value as a one-octet slice. Type 2 IEs (More data, Sending complete)
//! have no contents at all and decode to unit variants of
//! [`Ie`](crate::ies::Ie).

use std::fmt;

use bytes::BufMut;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{ensure_len, CodecError, CodecResult, InformationElement};

/// Bit 4 of the shift octet: set for a locking shift
pub const SHIFT_LOCKING: u8 = 0x08;

/// Shift IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftIe {
    /// Codeset shifted to (0-7)
    pub codeset: u8,
    /// Locking shifts stay in effect, non-locking shifts apply to the next IE only
    pub locking: bool,
}

impl ShiftIe {
    /// Parse the 4-bit value of a shift octet
    pub fn from_value(value: u8) -> Self {
        Self {
            codeset: value & 0x07,
            locking: value & SHIFT_LOCKING != 0,
        }
    }

    /// The 4-bit value of the shift octet
    pub fn value(&self) -> u8 {
        let flag = if self.locking { SHIFT_LOCKING } else { 0 };
        flag | (self.codeset & 0x07)
    }
}

impl fmt::Display for ShiftIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.locking { "locking" } else { "non-locking" };
        write!(f, "Shift: codeset {} ({kind})", self.codeset)
    }
}

/// Congestion level values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CongestionLevel {
    ReceiverReady = 0x0,
    ReceiverNotReady = 0xF,
}

/// Congestion Level IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionLevelIe {
    pub level: CongestionLevel,
}

impl InformationElement for CongestionLevelIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        let value = contents[0] & 0x0F;
        let level = CongestionLevel::try_from(value).map_err(|_| CodecError::InvalidValue {
            field: "congestion level",
            value,
        })?;
        Ok(Self { level })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.level.into());
        Ok(())
    }
}

impl fmt::Display for CongestionLevelIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Congestion Level: {:?}", self.level)
    }
}

/// Repeat indication: prioritized list for selecting one possibility
pub const REPEAT_PRIORITIZED_LIST: u8 = 0x2;

/// Repeat Indicator IE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatIndicatorIe {
    pub indication: u8,
}

impl InformationElement for RepeatIndicatorIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        Ok(Self {
            indication: contents[0] & 0x0F,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.indication & 0x0F);
        Ok(())
    }
}

impl fmt::Display for RepeatIndicatorIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Repeat Indicator: {}", self.indication)
    }
}

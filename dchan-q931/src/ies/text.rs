//! Text and identity IEs
//!
//! Display (4.5.16), Keypad facility (4.5.18), Call identity (4.5.6) and
//! Date/time (4.5.15) of ITU-T Q.931.

use std::fmt;

use bytes::BufMut;

use crate::codec::{decode_ia5, encode_ia5, ensure_len, CodecError, CodecResult, InformationElement};

/// Display IE: IA5 text for the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayIe {
    pub text: String,
}

impl InformationElement for DisplayIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            text: decode_ia5(contents)?,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        encode_ia5(&self.text, buf)
    }
}

impl fmt::Display for DisplayIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Display: '{}'", self.text)
    }
}

/// Keypad Facility IE: IA5 digits entered by the user (overlap sending)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeypadFacilityIe {
    pub digits: String,
}

impl InformationElement for KeypadFacilityIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        Ok(Self {
            digits: decode_ia5(contents)?,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        encode_ia5(&self.digits, buf)
    }
}

impl fmt::Display for KeypadFacilityIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypad Facility: '{}'", self.digits)
    }
}

/// Call Identity IE: opaque identity of a suspended call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallIdentityIe {
    pub identity: Vec<u8>,
}

impl InformationElement for CallIdentityIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            identity: contents.to_vec(),
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_slice(&self.identity);
        Ok(())
    }
}

impl fmt::Display for CallIdentityIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call Identity: {}", dchan_common::HexDump(&self.identity))
    }
}

/// Date/Time IE
///
/// Year is the last two digits. Hour, minute and second are optional
/// trailing octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeIe {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl DateTimeIe {
    fn check(field: &'static str, value: u8, range: std::ops::RangeInclusive<u8>) -> CodecResult<u8> {
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(CodecError::InvalidValue { field, value })
        }
    }
}

impl InformationElement for DateTimeIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 3)?;
        let opt = |idx: usize, field, range| {
            contents
                .get(idx)
                .map(|&v| Self::check(field, v, range))
                .transpose()
        };
        Ok(Self {
            year: Self::check("year", contents[0], 0..=99)?,
            month: Self::check("month", contents[1], 1..=12)?,
            day: Self::check("day", contents[2], 1..=31)?,
            hour: opt(3, "hour", 0..=23)?,
            minute: opt(4, "minute", 0..=59)?,
            second: opt(5, "second", 0..=59)?,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.year);
        buf.put_u8(self.month);
        buf.put_u8(self.day);
        // optional octets stop at the first absent field
        for value in [self.hour, self.minute, self.second].into_iter().map_while(|v| v) {
            buf.put_u8(value);
        }
        Ok(())
    }
}

impl fmt::Display for DateTimeIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date/Time: {:02}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(hour) = self.hour {
            write!(f, " {hour:02}:{:02}", self.minute.unwrap_or(0))?;
            if let Some(second) = self.second {
                write!(f, ":{second:02}")?;
            }
        }
        Ok(())
    }
}

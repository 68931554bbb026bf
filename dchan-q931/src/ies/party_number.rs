//! Party number IEs (ITU-T Q.931 Sections 4.5.8 and 4.5.10, Q.951 Section 4)
//!
//! Called party number, calling party number and connected number share one
//! layout. Octet 3a is only allowed on the calling and connected numbers.
//!
//! ```text
//! oct 3   ext | type of number | numbering plan identification
//! oct 3a  1 | presentation | 0 0 0 | screening   (if oct 3 ext = 0)
//! oct 4*  number digits (IA5)
//! ```

use std::fmt;

use bytes::BufMut;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{
    decode_ia5, encode_ia5, ensure_len, is_last_octet, CodecError, CodecResult,
    InformationElement, EXT_BIT,
};

/// Type of number (octet 3 bits 7-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TypeOfNumber {
    #[default]
    Unknown = 0,
    International = 1,
    National = 2,
    NetworkSpecific = 3,
    Subscriber = 4,
    Abbreviated = 6,
    Reserved = 7,
}

/// Numbering plan identification (octet 3 bits 4-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum NumberingPlan {
    #[default]
    Unknown = 0x0,
    Isdn = 0x1,
    Data = 0x3,
    Telex = 0x4,
    National = 0x8,
    Private = 0x9,
    Reserved = 0xF,
}

/// Presentation indicator (octet 3a bits 7-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Presentation {
    Allowed = 0,
    Restricted = 1,
    NotAvailable = 2,
}

/// Screening indicator (octet 3a bits 2-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Screening {
    UserProvidedNotScreened = 0,
    UserProvidedVerifiedPassed = 1,
    UserProvidedVerifiedFailed = 2,
    NetworkProvided = 3,
}

/// Contents shared by the party number IEs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartyNumber {
    pub type_of_number: TypeOfNumber,
    pub numbering_plan: NumberingPlan,
    /// Presentation and screening (octet 3a)
    pub presentation: Option<(Presentation, Screening)>,
    pub digits: String,
}

impl PartyNumber {
    /// Unknown type and plan, no octet 3a
    pub fn new(digits: impl Into<String>) -> Self {
        Self {
            digits: digits.into(),
            ..Default::default()
        }
    }

    /// Set type of number and numbering plan
    pub fn with_plan(mut self, type_of_number: TypeOfNumber, numbering_plan: NumberingPlan) -> Self {
        self.type_of_number = type_of_number;
        self.numbering_plan = numbering_plan;
        self
    }

    fn decode(contents: &[u8], allow_octet3a: bool) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        let octet3 = contents[0];

        let ton = (octet3 >> 4) & 0x07;
        let type_of_number = TypeOfNumber::try_from(ton).map_err(|_| CodecError::InvalidValue {
            field: "type of number",
            value: ton,
        })?;
        let npi = octet3 & 0x0F;
        let numbering_plan =
            NumberingPlan::try_from(npi).map_err(|_| CodecError::InvalidValue {
                field: "numbering plan",
                value: npi,
            })?;

        let mut pos = 1;
        let presentation = if is_last_octet(octet3) {
            None
        } else {
            if !allow_octet3a {
                return Err(CodecError::InvalidExtension(3));
            }
            ensure_len(contents, 2)?;
            let octet3a = contents[pos];
            pos += 1;
            let pi = (octet3a >> 5) & 0x03;
            let presentation =
                Presentation::try_from(pi).map_err(|_| CodecError::InvalidValue {
                    field: "presentation indicator",
                    value: pi,
                })?;
            // 2-bit field, every value defined
            let screening = Screening::try_from(octet3a & 0x03)
                .unwrap_or(Screening::UserProvidedNotScreened);
            Some((presentation, screening))
        };

        Ok(Self {
            type_of_number,
            numbering_plan,
            presentation,
            digits: decode_ia5(&contents[pos..])?,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B, allow_octet3a: bool) -> CodecResult<()> {
        let octet3 = (u8::from(self.type_of_number) << 4) | u8::from(self.numbering_plan);
        match self.presentation {
            Some((pi, si)) if allow_octet3a => {
                buf.put_u8(octet3);
                buf.put_u8(EXT_BIT | (u8::from(pi) << 5) | u8::from(si));
            }
            Some(_) => return Err(CodecError::Unsupported("presentation on called party number")),
            None => buf.put_u8(EXT_BIT | octet3),
        }
        encode_ia5(&self.digits, buf)
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        write!(
            f,
            "{name}: '{}' ton={:?} npi={:?}",
            self.digits, self.type_of_number, self.numbering_plan
        )?;
        if let Some((pi, si)) = self.presentation {
            write!(f, " presentation={pi:?} screening={si:?}")?;
        }
        Ok(())
    }
}

macro_rules! party_number_ie {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $octet3a:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $ty(pub PartyNumber);

        impl InformationElement for $ty {
            fn decode(contents: &[u8]) -> CodecResult<Self> {
                PartyNumber::decode(contents, $octet3a).map($ty)
            }

            fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
                self.0.encode(buf, $octet3a)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_with(f, $name)
            }
        }
    };
}

party_number_ie!(
    /// Called Party Number IE (ITU-T Q.931 Section 4.5.8)
    CalledPartyNumberIe,
    "Called Party Number",
    false
);
party_number_ie!(
    /// Calling Party Number IE (ITU-T Q.931 Section 4.5.10)
    CallingPartyNumberIe,
    "Calling Party Number",
    true
);
party_number_ie!(
    /// Connected Number IE (ITU-T Q.951 Section 4)
    ConnectedNumberIe,
    "Connected Number",
    true
);

//! Cause IE (ITU-T Q.931 Section 4.5.12, ITU-T Q.850 Section 2)
//!
//! ```text
//!         8   7   6   5   4   3   2   1
//! oct 3   ext | cod.std | 0 | location
//! oct 3a  1   | recommendation            (present if oct 3 ext = 0)
//! oct 4   1   | cause value
//! oct 5*  diagnostics
//! ```

use std::fmt;

use bytes::BufMut;
use dchan_common::{DatalinkRole, NetworkRole};
use tracing::warn;

use crate::cause::{cause_name, CauseValue};
use crate::codec::{ensure_len, is_last_octet, CodecResult, InformationElement, EXT_BIT};
use crate::enums::CallDirection;
use crate::ies::CodingStandard;

/// Recommendation value for Q.931 in octet 3a
pub const RECOMMENDATION_Q931: u8 = 0x00;

/// Cause location (ITU-T Q.850 Section 2.2.5.3)
///
/// Converts from and to the 4-bit location field. Code points Q.850 reserves
/// are kept as [`Location::Reserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    /// User
    #[default]
    User,
    /// Private network serving the local user
    PrivateNetworkLocalUser,
    /// Public network serving the local user
    PublicNetworkLocalUser,
    /// Transit network
    TransitNetwork,
    /// Public network serving the remote user
    PublicNetworkRemoteUser,
    /// Private network serving the remote user
    PrivateNetworkRemoteUser,
    /// International network
    InternationalNetwork,
    /// Network beyond interworking point
    NetworkBeyondInterworking,
    /// Reserved code point (6, 8, 9, 0xB-0xF)
    Reserved(u8),
}

impl Location {
    /// Short mnemonic as printed in Q.850
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Location::User => "U",
            Location::PrivateNetworkLocalUser => "LPN",
            Location::PublicNetworkLocalUser => "LN",
            Location::TransitNetwork => "TN",
            Location::PublicNetworkRemoteUser => "RLN",
            Location::PrivateNetworkRemoteUser => "RPN",
            Location::InternationalNetwork => "INTL",
            Location::NetworkBeyondInterworking => "BI",
            Location::Reserved(_) => "RSV",
        }
    }
}

impl From<u8> for Location {
    /// Location of the low nibble of `octet`
    fn from(octet: u8) -> Self {
        match octet & 0x0F {
            0x0 => Location::User,
            0x1 => Location::PrivateNetworkLocalUser,
            0x2 => Location::PublicNetworkLocalUser,
            0x3 => Location::TransitNetwork,
            0x4 => Location::PublicNetworkRemoteUser,
            0x5 => Location::PrivateNetworkRemoteUser,
            0x7 => Location::InternationalNetwork,
            0xA => Location::NetworkBeyondInterworking,
            other => Location::Reserved(other),
        }
    }
}

impl From<Location> for u8 {
    fn from(location: Location) -> u8 {
        match location {
            Location::User => 0x0,
            Location::PrivateNetworkLocalUser => 0x1,
            Location::PublicNetworkLocalUser => 0x2,
            Location::TransitNetwork => 0x3,
            Location::PublicNetworkRemoteUser => 0x4,
            Location::PrivateNetworkRemoteUser => 0x5,
            Location::InternationalNetwork => 0x7,
            Location::NetworkBeyondInterworking => 0xA,
            Location::Reserved(nibble) => nibble & 0x0F,
        }
    }
}

/// Location to put in a locally generated Cause IE.
///
/// Network interfaces report the private or public network serving the local
/// user when exactly one of "this side is NT" and "the call is inbound"
/// holds, and the one serving the remote user otherwise.
pub fn derive_location(
    direction: CallDirection,
    network_role: NetworkRole,
    datalink_role: DatalinkRole,
) -> Location {
    let local = datalink_role.is_nt() ^ direction.is_inbound();
    match network_role {
        NetworkRole::User => Location::User,
        NetworkRole::PrivateNetwork if local => Location::PrivateNetworkLocalUser,
        NetworkRole::PrivateNetwork => Location::PrivateNetworkRemoteUser,
        NetworkRole::PublicNetwork if local => Location::PublicNetworkLocalUser,
        NetworkRole::PublicNetwork => Location::PublicNetworkRemoteUser,
        NetworkRole::TransitNetwork => Location::TransitNetwork,
        NetworkRole::InternationalNetwork => Location::InternationalNetwork,
    }
}

/// Cause IE
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CauseIe {
    /// Coding standard
    pub coding_standard: CodingStandard,
    /// Where the cause was generated
    pub location: Location,
    /// Recommendation (octet 3a), absent on most traffic
    pub recommendation: Option<u8>,
    /// Cause value (7 bits)
    pub value: u8,
    /// Diagnostics, copied verbatim
    pub diagnostics: Vec<u8>,
}

impl CauseIe {
    /// Longest diagnostics field that keeps the IE within 32 octets
    pub const MAX_DIAGNOSTICS_LEN: usize = 28;

    /// Create a CCITT cause without diagnostics
    pub fn new(value: CauseValue, location: Location) -> Self {
        Self {
            coding_standard: CodingStandard::Ccitt,
            location,
            recommendation: None,
            value: value.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Create a CCITT cause with diagnostics, truncated to
    /// [`Self::MAX_DIAGNOSTICS_LEN`] octets
    pub fn with_diagnostics(value: CauseValue, location: Location, diagnostics: &[u8]) -> Self {
        let keep = diagnostics.len().min(Self::MAX_DIAGNOSTICS_LEN);
        if keep < diagnostics.len() {
            warn!(
                cause = u8::from(value),
                dropped = diagnostics.len() - keep,
                "Cause diagnostics truncated"
            );
        }
        Self {
            diagnostics: diagnostics[..keep].to_vec(),
            ..Self::new(value, location)
        }
    }

    /// The cause value as a catalogued [`CauseValue`], if it is one
    pub fn cause_value(&self) -> Option<CauseValue> {
        CauseValue::try_from(self.value).ok()
    }
}

impl InformationElement for CauseIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 2)?;

        let octet3 = contents[0];
        let coding_standard = CodingStandard::from_octet(octet3);
        let location = Location::from(octet3);

        let mut pos = 1;
        let recommendation = if is_last_octet(octet3) {
            None
        } else {
            ensure_len(contents, 3)?;
            let rec = contents[pos] & 0x7F;
            if rec != RECOMMENDATION_Q931 {
                warn!(recommendation = rec, "Cause IE recommendation is not Q.931");
            }
            pos += 1;
            Some(rec)
        };

        let value = contents[pos] & 0x7F;
        pos += 1;

        Ok(Self {
            coding_standard,
            location,
            recommendation,
            value,
            diagnostics: contents[pos..].to_vec(),
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let octet3 = self.coding_standard.to_bits() | u8::from(self.location);
        match self.recommendation {
            Some(rec) => {
                buf.put_u8(octet3);
                buf.put_u8(EXT_BIT | (rec & 0x7F));
            }
            None => buf.put_u8(EXT_BIT | octet3),
        }
        buf.put_u8(EXT_BIT | (self.value & 0x7F));
        buf.put_slice(&self.diagnostics);
        Ok(())
    }
}

impl fmt::Display for CauseIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cause: {} ({}) location={} coding={}",
            self.value,
            cause_name(self.value as u16).unwrap_or("unknown"),
            self.location.abbreviation(),
            self.coding_standard
        )?;
        if let Some(rec) = self.recommendation {
            write!(f, " recommendation={rec}")?;
        }
        if !self.diagnostics.is_empty() {
            write!(f, " diagnostics={}", dchan_common::HexDump(&self.diagnostics))?;
        }
        Ok(())
    }
}

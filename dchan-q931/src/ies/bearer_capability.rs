//! Bearer Capability IE (ITU-T Q.931 Section 4.5.5)
//!
//! ```text
//! oct 3     1 | coding std | information transfer capability
//! oct 4     1 | transfer mode | information transfer rate
//! oct 4.1   1 | rate multiplier           (transfer rate = multirate)
//! oct 5     e | 0 1 | user info layer 1 protocol
//! oct 5a-d  layer 1 parameters            (while ext = 0)
//! oct 6     1 | 1 0 | user info layer 2 protocol
//! oct 7     1 | 1 1 | user info layer 3 protocol
//! ```

use std::fmt;

use bytes::BufMut;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{
    ensure_len, is_last_octet, take_ext_group, CodecError, CodecResult, InformationElement, EXT_BIT,
};
use crate::ies::CodingStandard;

/// Information transfer rate: packet mode
pub const RATE_PACKET: u8 = 0x00;
/// Information transfer rate: 64 kbit/s
pub const RATE_64K: u8 = 0x10;
/// Information transfer rate: multirate (64 kbit/s base rate)
pub const RATE_MULTIRATE: u8 = 0x18;

/// User information layer 1 protocol: G.711 mu-law
pub const LAYER1_G711_ULAW: u8 = 0x02;
/// User information layer 1 protocol: G.711 A-law
pub const LAYER1_G711_ALAW: u8 = 0x03;

/// Information transfer capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TransferCapability {
    Speech = 0x00,
    UnrestrictedDigital = 0x08,
    RestrictedDigital = 0x09,
    Audio3_1kHz = 0x10,
    UnrestrictedDigitalWithTones = 0x11,
    Video = 0x18,
}

/// Transfer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TransferMode {
    Circuit = 0x0,
    Packet = 0x2,
}

/// Layer 1 protocol and its parameter octets (5a-5d, ext bits kept)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer1Info {
    /// User information layer 1 protocol
    pub protocol: u8,
    /// Octets 5a-5d as received
    pub params: Vec<u8>,
}

/// Bearer Capability IE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCapabilityIe {
    pub coding_standard: CodingStandard,
    pub transfer_capability: TransferCapability,
    pub transfer_mode: TransferMode,
    /// Information transfer rate (5 bits)
    pub transfer_rate: u8,
    /// Present only for multirate
    pub rate_multiplier: Option<u8>,
    pub layer1: Option<Layer1Info>,
    pub layer2_protocol: Option<u8>,
    pub layer3_protocol: Option<u8>,
}

impl BearerCapabilityIe {
    /// Circuit-mode 64 kbit/s speech with the given G.711 law
    pub fn speech(layer1_protocol: u8) -> Self {
        Self {
            coding_standard: CodingStandard::Ccitt,
            transfer_capability: TransferCapability::Speech,
            transfer_mode: TransferMode::Circuit,
            transfer_rate: RATE_64K,
            rate_multiplier: None,
            layer1: Some(Layer1Info {
                protocol: layer1_protocol,
                params: Vec::new(),
            }),
            layer2_protocol: None,
            layer3_protocol: None,
        }
    }

    /// Circuit-mode 64 kbit/s unrestricted digital information
    pub fn unrestricted_digital() -> Self {
        Self {
            transfer_capability: TransferCapability::UnrestrictedDigital,
            layer1: None,
            ..Self::speech(0)
        }
    }
}

impl InformationElement for BearerCapabilityIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 2)?;

        let octet3 = contents[0];
        if !is_last_octet(octet3) {
            return Err(CodecError::InvalidExtension(3));
        }
        let transfer_capability =
            TransferCapability::try_from(octet3 & 0x1F).map_err(|_| CodecError::InvalidValue {
                field: "transfer capability",
                value: octet3 & 0x1F,
            })?;

        let octet4 = contents[1];
        if !is_last_octet(octet4) {
            return Err(CodecError::InvalidExtension(4));
        }
        let mode = (octet4 >> 5) & 0x03;
        let transfer_mode = TransferMode::try_from(mode).map_err(|_| CodecError::InvalidValue {
            field: "transfer mode",
            value: mode,
        })?;
        let transfer_rate = octet4 & 0x1F;

        let mut pos = 2;
        let mut rate_multiplier = None;
        if transfer_rate == RATE_MULTIRATE {
            ensure_len(contents, 3)?;
            rate_multiplier = Some(contents[pos] & 0x7F);
            pos += 1;
        }

        let mut ie = Self {
            coding_standard: CodingStandard::from_octet(octet3),
            transfer_capability,
            transfer_mode,
            transfer_rate,
            rate_multiplier,
            layer1: None,
            layer2_protocol: None,
            layer3_protocol: None,
        };

        while pos < contents.len() {
            let octet = contents[pos];
            match (octet >> 5) & 0x03 {
                0b01 if ie.layer1.is_none() => {
                    let group = take_ext_group(contents, pos)?;
                    ie.layer1 = Some(Layer1Info {
                        protocol: octet & 0x1F,
                        params: group[1..].to_vec(),
                    });
                    pos += group.len();
                }
                0b10 if ie.layer2_protocol.is_none() => {
                    ie.layer2_protocol = Some(octet & 0x1F);
                    pos += take_ext_group(contents, pos)?.len();
                }
                0b11 if ie.layer3_protocol.is_none() => {
                    ie.layer3_protocol = Some(octet & 0x1F);
                    pos += take_ext_group(contents, pos)?.len();
                }
                layer => {
                    return Err(CodecError::InvalidValue {
                        field: "layer identification",
                        value: layer,
                    })
                }
            }
        }

        Ok(ie)
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(EXT_BIT | self.coding_standard.to_bits() | u8::from(self.transfer_capability));
        buf.put_u8(EXT_BIT | (u8::from(self.transfer_mode) << 5) | (self.transfer_rate & 0x1F));
        if let Some(multiplier) = self.rate_multiplier {
            buf.put_u8(EXT_BIT | (multiplier & 0x7F));
        }
        if let Some(layer1) = &self.layer1 {
            let ext = if layer1.params.is_empty() { EXT_BIT } else { 0 };
            buf.put_u8(ext | 0x20 | (layer1.protocol & 0x1F));
            buf.put_slice(&layer1.params);
        }
        if let Some(protocol) = self.layer2_protocol {
            buf.put_u8(EXT_BIT | 0x40 | (protocol & 0x1F));
        }
        if let Some(protocol) = self.layer3_protocol {
            buf.put_u8(EXT_BIT | 0x60 | (protocol & 0x1F));
        }
        Ok(())
    }
}

impl fmt::Display for BearerCapabilityIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bearer Capability: {:?} {:?} rate=0x{:02X}",
            self.transfer_capability, self.transfer_mode, self.transfer_rate
        )?;
        if let Some(multiplier) = self.rate_multiplier {
            write!(f, "x{multiplier}")?;
        }
        if let Some(layer1) = &self.layer1 {
            match layer1.protocol {
                LAYER1_G711_ULAW => f.write_str(" layer1=G.711 mu-law")?,
                LAYER1_G711_ALAW => f.write_str(" layer1=G.711 A-law")?,
                other => write!(f, " layer1=0x{other:02X}")?,
            }
        }
        if let Some(protocol) = self.layer2_protocol {
            write!(f, " layer2=0x{protocol:02X}")?;
        }
        if let Some(protocol) = self.layer3_protocol {
            write!(f, " layer3=0x{protocol:02X}")?;
        }
        Ok(())
    }
}

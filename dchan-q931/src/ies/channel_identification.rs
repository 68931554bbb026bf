//! Channel Identification IE (ITU-T Q.931 Section 4.5.13)
//!
//! ```text
//! oct 3    1 | int id present | int type | 0 | pref/excl | D-chan | chan sel
//! oct 3.1  interface identifier            (if int id present, ext group)
//! oct 3.2  1 | coding std | number/map | channel type   (primary rate)
//! oct 3.3  e | channel number              (repeated, last has ext = 1)
//! ```
//!
//! The selected channels are exposed as a [`ChannelSet`].

use std::fmt;

use bytes::BufMut;

use crate::chanset::{ChannelHandle, ChannelSet};
use crate::codec::{
    ensure_len, is_last_octet, take_ext_group, CodecError, CodecResult, InformationElement, EXT_BIT,
};
use crate::ies::CodingStandard;

/// Channel type "B-channel units" in octet 3.2
const CHANNEL_TYPE_B: u8 = 0x03;

/// Interface type (octet 3 bit 6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    /// Basic rate interface
    Basic,
    /// Primary rate (or other) interface
    Primary,
}

/// Information channel selection (octet 3 bits 2-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelSelection {
    /// No channel
    NoChannel,
    /// The channels in [`ChannelIdentificationIe::channels`]
    Indicated,
    /// Any channel
    Any,
}

/// Channel Identification IE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentificationIe {
    pub interface_type: InterfaceType,
    /// Interface identifier octets (ext bits kept)
    pub interface_id: Option<Vec<u8>>,
    /// Only the indicated channel is acceptable
    pub exclusive: bool,
    /// The D-channel is indicated
    pub d_channel: bool,
    pub selection: ChannelSelection,
    /// Coding standard of octet 3.2 (primary rate only)
    pub coding_standard: CodingStandard,
    /// Indicated channels, numbered as on the wire
    pub channels: ChannelSet,
}

impl ChannelIdentificationIe {
    /// Basic rate, B1 or B2
    pub fn basic(channel: u16, exclusive: bool) -> CodecResult<Self> {
        if !(1..=2).contains(&channel) {
            return Err(CodecError::InvalidValue {
                field: "basic rate channel",
                value: channel as u8,
            });
        }
        let channels = ChannelSet::try_from(&[ChannelHandle(channel)][..])?;
        Ok(Self {
            interface_type: InterfaceType::Basic,
            interface_id: None,
            exclusive,
            d_channel: false,
            selection: ChannelSelection::Indicated,
            coding_standard: CodingStandard::Ccitt,
            channels,
        })
    }

    /// Primary rate, the given channel numbers
    pub fn primary(channels: ChannelSet, exclusive: bool) -> Self {
        Self {
            interface_type: InterfaceType::Primary,
            interface_id: None,
            exclusive,
            d_channel: false,
            selection: ChannelSelection::Indicated,
            coding_standard: CodingStandard::Ccitt,
            channels,
        }
    }

    /// Any channel on the given interface type
    pub fn any(interface_type: InterfaceType) -> Self {
        Self {
            interface_type,
            interface_id: None,
            exclusive: false,
            d_channel: false,
            selection: ChannelSelection::Any,
            coding_standard: CodingStandard::Ccitt,
            channels: ChannelSet::new(),
        }
    }

    fn decode_channel_list(&mut self, octets: &[u8]) -> CodecResult<()> {
        ensure_len(octets, 2)?;
        let octet32 = octets[0];
        if !is_last_octet(octet32) {
            return Err(CodecError::InvalidExtension(2));
        }
        if octet32 & 0x10 != 0 {
            return Err(CodecError::Unsupported("channel map"));
        }
        if octet32 & 0x0F != CHANNEL_TYPE_B {
            return Err(CodecError::InvalidValue {
                field: "channel type",
                value: octet32 & 0x0F,
            });
        }
        self.coding_standard = CodingStandard::from_octet(octet32);

        let numbers = take_ext_group(octets, 1)?;
        for &octet in numbers {
            self.channels.add(ChannelHandle((octet & 0x7F) as u16))?;
        }
        Ok(())
    }
}

impl InformationElement for ChannelIdentificationIe {
    fn decode(contents: &[u8]) -> CodecResult<Self> {
        ensure_len(contents, 1)?;
        let octet3 = contents[0];
        if !is_last_octet(octet3) {
            return Err(CodecError::InvalidExtension(3));
        }

        let interface_type = if octet3 & 0x20 != 0 {
            InterfaceType::Primary
        } else {
            InterfaceType::Basic
        };

        let mut pos = 1;
        let interface_id = if octet3 & 0x40 != 0 {
            let group = take_ext_group(contents, pos)?;
            pos += group.len();
            Some(group.to_vec())
        } else {
            None
        };

        let mut ie = Self {
            interface_type,
            interface_id,
            exclusive: octet3 & 0x08 != 0,
            d_channel: octet3 & 0x04 != 0,
            selection: ChannelSelection::NoChannel,
            coding_standard: CodingStandard::Ccitt,
            channels: ChannelSet::new(),
        };

        let sel = octet3 & 0x03;
        match (interface_type, sel) {
            (_, 0b00) => {}
            (_, 0b11) => ie.selection = ChannelSelection::Any,
            (InterfaceType::Basic, chan) => {
                ie.selection = ChannelSelection::Indicated;
                ie.channels = ChannelSet::try_from(&[ChannelHandle(chan as u16)][..])?;
            }
            (InterfaceType::Primary, 0b01) => {
                ie.selection = ChannelSelection::Indicated;
                // an interface identifier may stand without a channel list
                if ie.interface_id.is_none() || pos < contents.len() {
                    ie.decode_channel_list(&contents[pos..])?;
                }
            }
            (InterfaceType::Primary, other) => {
                return Err(CodecError::InvalidValue {
                    field: "channel selection",
                    value: other,
                })
            }
        }

        Ok(ie)
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let mut octet3 = EXT_BIT;
        if self.interface_id.is_some() {
            octet3 |= 0x40;
        }
        if self.interface_type == InterfaceType::Primary {
            octet3 |= 0x20;
        }
        if self.exclusive {
            octet3 |= 0x08;
        }
        if self.d_channel {
            octet3 |= 0x04;
        }

        let sel = match (self.selection, self.interface_type) {
            (ChannelSelection::NoChannel, _) => 0b00,
            (ChannelSelection::Any, _) => 0b11,
            (ChannelSelection::Indicated, InterfaceType::Primary) => 0b01,
            (ChannelSelection::Indicated, InterfaceType::Basic) => match self.channels.first() {
                Some(ChannelHandle(chan @ 1..=2)) => chan as u8,
                other => {
                    return Err(CodecError::InvalidValue {
                        field: "basic rate channel",
                        value: other.map_or(0, |c| c.0 as u8),
                    })
                }
            },
        };
        buf.put_u8(octet3 | sel);

        if let Some(id) = &self.interface_id {
            buf.put_slice(id);
        }

        if self.interface_type == InterfaceType::Primary
            && self.selection == ChannelSelection::Indicated
        {
            if self.channels.is_empty() {
                return Err(CodecError::Unsupported("primary rate selection without channels"));
            }
            buf.put_u8(EXT_BIT | self.coding_standard.to_bits() | CHANNEL_TYPE_B);
            let last = self.channels.len() - 1;
            for (i, chan) in self.channels.iter().enumerate() {
                let ext = if i == last { EXT_BIT } else { 0 };
                buf.put_u8(ext | (chan.0 as u8 & 0x7F));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ChannelIdentificationIe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iface = match self.interface_type {
            InterfaceType::Basic => "BRI",
            InterfaceType::Primary => "PRI",
        };
        let pref = if self.exclusive { "exclusive" } else { "preferred" };
        write!(f, "Channel Identification: {iface} {pref}")?;
        match self.selection {
            ChannelSelection::NoChannel => f.write_str(" no channel")?,
            ChannelSelection::Any => f.write_str(" any channel")?,
            ChannelSelection::Indicated => write!(f, " channels={}", self.channels)?,
        }
        if self.d_channel {
            f.write_str(" D-channel")?;
        }
        Ok(())
    }
}

//! Q.931 message header
//!
//! Implements the common message header according to ITU-T Q.931 Section 4.2-4.4
//!
//! ```text
//! +------------------+------------------------------------+
//! | octet 1          | Protocol discriminator (0x08)      |
//! +------------------+------------------------------------+
//! | octet 2          | 0 0 0 0 | call reference length    |
//! +------------------+------------------------------------+
//! | octet 3          | F | call reference value (MSBs)    |
//! | octets 4..       | call reference value (cont.)       |
//! +------------------+------------------------------------+
//! | next octet       | 0 | message type                   |
//! +------------------+------------------------------------+
//! ```
//!
//! `F` is the call reference flag: 0 on messages sent by the side that
//! allocated the call reference, 1 on messages sent to it.

use std::fmt;

use bytes::{Buf, BufMut};
use thiserror::Error;

use crate::enums::{CallDirection, MessageType, ProtocolDiscriminator};

/// Smallest valid frame: discriminator, length, one callref octet, message type
pub const MIN_FRAME_LEN: usize = 4;

/// Largest call reference length accepted on receive
pub const MAX_CALL_REF_LEN: u8 = 4;

/// Q.931 header decoding/encoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Invalid protocol discriminator: 0x{0:02X}")]
    InvalidProtocolDiscriminator(u8),

    #[error("Invalid call reference length: {0}")]
    InvalidCallRefLength(u8),

    #[error("Dummy call reference not supported")]
    DummyCallRef,

    #[error("Call reference value 0x{value:X} does not fit {len} octets")]
    CallRefOverflow { value: u32, len: u8 },
}

/// Call reference: value, length in octets and flag (ITU-T Q.931 Section 4.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallReference {
    /// Call reference value without the flag bit
    pub value: u32,
    /// Encoded length in octets (1..=4)
    pub len: u8,
    /// Call reference flag (bit 8 of the first value octet)
    pub flag: bool,
}

impl CallReference {
    /// Create a call reference
    pub fn new(value: u32, len: u8, flag: bool) -> Self {
        Self { value, len, flag }
    }

    /// The global call reference (value 0) of the given length
    pub fn global(len: u8) -> Self {
        Self::new(0, len, false)
    }

    /// Returns true for the global call reference
    pub fn is_global(&self) -> bool {
        self.value == 0
    }

    /// Direction of the call this reference belongs to, for a received message.
    ///
    /// Flag 0 is sent by the side that allocated the reference, so a received
    /// flag 0 belongs to a call the remote side originated.
    pub fn direction(&self) -> CallDirection {
        if self.flag {
            CallDirection::Outbound
        } else {
            CallDirection::Inbound
        }
    }

    /// The same call reference as it must appear in a reply
    pub fn reply(&self) -> Self {
        Self {
            flag: !self.flag,
            ..*self
        }
    }

    /// Largest value representable in `len` octets (flag bit excluded)
    fn max_value(len: u8) -> u32 {
        match len {
            0 => 0,
            1..=3 => (1u32 << (len as u32 * 8 - 1)) - 1,
            _ => 0x7FFF_FFFF,
        }
    }
}

impl fmt::Display for CallReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0width$X}", self.value, width = self.len as usize * 2)?;
        if self.flag {
            f.write_str("/to-orig")
        } else {
            f.write_str("/from-orig")
        }
    }
}

/// Decoded Q.931 message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Protocol discriminator
    pub protocol_discriminator: ProtocolDiscriminator,
    /// Call reference
    pub call_ref: CallReference,
    /// Message type octet as received
    pub message_type_raw: u8,
}

impl MessageHeader {
    /// Create a header for a known message type
    pub fn new(call_ref: CallReference, message_type: MessageType) -> Self {
        Self {
            protocol_discriminator: ProtocolDiscriminator::Q931,
            call_ref,
            message_type_raw: message_type.into(),
        }
    }

    /// Parsed message type, `None` for types Q.931 does not define
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.message_type_raw).ok()
    }

    /// Header length in octets
    pub fn encoded_len(&self) -> usize {
        3 + self.call_ref.len as usize
    }

    /// Decode a header, leaving `buf` positioned at the first IE octet.
    ///
    /// Checks are applied in wire order: minimum frame length, protocol
    /// discriminator, call reference length, dummy call reference.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, HeaderError> {
        let total = buf.remaining();
        if total < MIN_FRAME_LEN {
            return Err(HeaderError::BufferTooShort {
                expected: MIN_FRAME_LEN,
                actual: total,
            });
        }

        let pd = buf.get_u8();
        let protocol_discriminator = ProtocolDiscriminator::try_from(pd)
            .map_err(|_| HeaderError::InvalidProtocolDiscriminator(pd))?;

        let len = buf.get_u8() & 0x0F;
        if len > MAX_CALL_REF_LEN {
            return Err(HeaderError::InvalidCallRefLength(len));
        }
        if len == 0 {
            return Err(HeaderError::DummyCallRef);
        }

        // call reference octets plus message type
        let needed = 2 + len as usize + 1;
        if total < needed {
            return Err(HeaderError::BufferTooShort {
                expected: needed,
                actual: total,
            });
        }

        let first = buf.get_u8();
        let flag = first & 0x80 != 0;
        let mut value = (first & 0x7F) as u32;
        for _ in 1..len {
            value = (value << 8) | buf.get_u8() as u32;
        }

        let message_type_raw = buf.get_u8();

        Ok(Self {
            protocol_discriminator,
            call_ref: CallReference::new(value, len, flag),
            message_type_raw,
        })
    }

    /// Encode the header
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), HeaderError> {
        let CallReference { value, len, flag } = self.call_ref;
        if len == 0 || len > MAX_CALL_REF_LEN {
            return Err(HeaderError::InvalidCallRefLength(len));
        }
        if value > CallReference::max_value(len) {
            return Err(HeaderError::CallRefOverflow { value, len });
        }

        buf.put_u8(self.protocol_discriminator.into());
        buf.put_u8(len);
        for i in (0..len).rev() {
            let mut octet = (value >> (i as u32 * 8)) as u8;
            if i == len - 1 && flag {
                octet |= 0x80;
            }
            buf.put_u8(octet);
        }
        buf.put_u8(self.message_type_raw);
        Ok(())
    }
}

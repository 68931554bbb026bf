//! Information element encoding/decoding traits and helpers
//!
//! Q.931 information elements come in two formats (ITU-T Q.931 Section 4.5.1):
//! - Single octet: bit 8 of the identifier octet set, no length octet. Type 1
//!   carries a 4-bit value in bits 4-1, type 2 is the identifier alone.
//! - Variable length: identifier octet, length octet, then `length` octets
//!   of contents.
//!
//! Codecs in [`crate::ies`] only see the contents of an IE. The identifier
//! and length octets are handled by the message decoder and encoder.
//!
//! # Example
//!
//! ```rust
//! use dchan_q931::codec::InformationElement;
//! use dchan_q931::ies::cause::CauseIe;
//!
//! let cause = CauseIe::decode(&[0x80, 0x90]).unwrap();
//! assert_eq!(cause.value, 16);
//!
//! let mut buf = Vec::new();
//! cause.encode(&mut buf).unwrap();
//! assert_eq!(buf, vec![0x80, 0x90]);
//! ```

use std::fmt;

use bytes::BufMut;
use thiserror::Error;

use crate::chanset::ChannelSetError;

/// Errors that can occur during IE encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// IE contents shorter than the format requires
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum bytes
        expected: usize,
        /// Actual bytes available
        actual: usize,
    },

    /// A field carries a value the codec does not accept
    #[error("Invalid value for {field}: 0x{value:02X}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: u8,
    },

    /// An extension bit has the wrong polarity for its octet
    #[error("Unexpected extension bit in octet {0}")]
    InvalidExtension(usize),

    /// Text field contains a non-IA5 character
    #[error("Non-IA5 character 0x{0:02X} in text field")]
    InvalidCharacter(u8),

    /// Encoded contents would not fit the IE length octet
    #[error("IE contents too long: {0} octets")]
    TooLong(usize),

    /// Channels that do not fit a [`ChannelSet`](crate::chanset::ChannelSet)
    #[error("Channel set: {0}")]
    ChannelSet(#[from] ChannelSetError),

    /// A feature of the IE that is not implemented
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    /// Codec invoked with an IE of another kind
    #[error("IE mismatch: codec for {expected} called with {actual}")]
    IeMismatch {
        /// Name of the IE the codec handles
        expected: &'static str,
        /// Name of the IE it was given
        actual: &'static str,
    },
}

/// Result type for IE codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// A typed information element.
///
/// `decode` receives the IE contents (the octets following the length octet,
/// or the 4-bit value of a type 1 single octet IE as a one-octet slice).
/// `encode` writes the same representation back.
pub trait InformationElement: Sized + fmt::Display {
    /// Decode from IE contents
    fn decode(contents: &[u8]) -> CodecResult<Self>;

    /// Encode IE contents to the provided buffer
    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()>;
}

// ============================================================================
// Helpers
// ============================================================================

/// Bit 8 of an octet: the extension bit. Set means "last octet of the group".
pub const EXT_BIT: u8 = 0x80;

/// Returns true if bit 8 of `octet` is set.
#[inline]
pub fn is_last_octet(octet: u8) -> bool {
    octet & EXT_BIT != 0
}

/// Fails with [`CodecError::BufferTooShort`] unless `contents` has at least
/// `min` octets.
pub fn ensure_len(contents: &[u8], min: usize) -> CodecResult<()> {
    if contents.len() < min {
        return Err(CodecError::BufferTooShort {
            expected: min,
            actual: contents.len(),
        });
    }
    Ok(())
}

/// Decodes IA5 text, rejecting octets with bit 8 set.
pub fn decode_ia5(octets: &[u8]) -> CodecResult<String> {
    if let Some(&bad) = octets.iter().find(|b| !b.is_ascii()) {
        return Err(CodecError::InvalidCharacter(bad));
    }
    Ok(octets.iter().map(|&b| b as char).collect())
}

/// Encodes IA5 text.
pub fn encode_ia5<B: BufMut>(text: &str, buf: &mut B) -> CodecResult<()> {
    if let Some(bad) = text.bytes().find(|b| !b.is_ascii()) {
        return Err(CodecError::InvalidCharacter(bad));
    }
    buf.put_slice(text.as_bytes());
    Ok(())
}

/// Collects an octet group that ends at the first octet with bit 8 set.
///
/// The group keeps its extension bits. An unterminated group fails with
/// [`CodecError::InvalidExtension`].
pub fn take_ext_group(octets: &[u8], start: usize) -> CodecResult<&[u8]> {
    let rest = octets.get(start..).unwrap_or_default();
    let end = rest
        .iter()
        .position(|&b| is_last_octet(b))
        .ok_or(CodecError::InvalidExtension(start))?;
    Ok(&rest[..=end])
}

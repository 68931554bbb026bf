//! Q.931 (ISDN D-channel call control) protocol library
//!
//! Decodes, validates and dispatches ITU-T Q.931 messages:
//! - IE codec registry and per-message-type IE legality table
//! - Q.850 cause catalog and the Cause IE
//! - Message decoder with codeset shifts and the error recovery policy
//! - Frame dispatcher routing messages by call reference
//! - Channel sets for B-channel negotiation
//!
//! # Message Structure
//!
//! A Q.931 message is a header (protocol discriminator, call reference,
//! message type) followed by information elements, see [`header`] and
//! [`ies`].
//!
//! # Example
//!
//! ```rust
//! use dchan_q931::decoder::{decode_ies, Recovery};
//! use dchan_q931::header::MessageHeader;
//! use dchan_q931::ies::Location;
//! use dchan_q931::legality::IeDirection;
//! use dchan_q931::MessageType;
//!
//! // DISCONNECT, call reference 0x07, cause #16
//! let frame = [0x08, 0x01, 0x07, 0x45, 0x08, 0x02, 0x80, 0x90];
//! let mut buf = &frame[..];
//! let header = MessageHeader::decode(&mut buf).unwrap();
//! assert_eq!(header.message_type(), Some(MessageType::Disconnect));
//!
//! let decoded = decode_ies(MessageType::Disconnect, IeDirection::NetworkToUser, buf).unwrap();
//! assert_eq!(decoded.ies.len(), 1);
//! assert_eq!(
//!     decoded.status.recovery(MessageType::Disconnect, Location::User),
//!     Recovery::Proceed
//! );
//! ```

pub mod cause;
pub mod chanset;
pub mod codec;
pub mod decoder;
pub mod dispatcher;
pub mod enums;
pub mod header;
pub mod ies;
pub mod legality;
pub mod message;


// Re-export commonly used types
pub use cause::{cause_name, is_fatal, CauseValue};
pub use chanset::{ChannelHandle, ChannelSet, ChannelSetError};
pub use codec::{CodecError, CodecResult, InformationElement};
pub use decoder::{decode_ies, DecodeError, DecodeStatus, DecodedIes, Recovery, Response};
pub use dispatcher::{
    CallControl, DatalinkError, DispatchOutcome, DlEvent, FrameDispatcher, ReceiveError,
};
pub use enums::{CallDirection, MessageType, ProtocolDiscriminator};
pub use header::{CallReference, HeaderError, MessageHeader};
pub use ies::{CauseIe, Ie, IeId, Location};
pub use legality::{IeDirection, Presence};
pub use message::{encode_message, EncodeError, Message};

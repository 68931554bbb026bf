//! Q.931 message envelope and encoder
//!
//! [`Message`] is what the dispatcher hands to the call layer: the header,
//! where the frame came from, the raw IE octets and the decoded IEs.
//! [`encode_message`] is the reverse path used to put responses on the wire.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use dchan_common::DlcId;

use crate::codec::CodecError;
use crate::decoder::{CodesetIe, DecodedIes};
use crate::enums::MessageType;
use crate::header::{HeaderError, MessageHeader};
use crate::ies::registry;
use crate::ies::{CauseIe, Ie, IeId};

/// Message encoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Header: {0}")]
    Header(#[from] HeaderError),

    #[error("{ie}: {source}")]
    Codec {
        ie: &'static str,
        #[source]
        source: CodecError,
    },

    #[error("IE 0x{0:02X} is not registered")]
    UnknownIe(u8),

    #[error("{ie} contents are {len} octets, at most 255 fit")]
    TooLong { ie: &'static str, len: usize },
}

/// A received Q.931 message
#[derive(Debug, Clone)]
pub struct Message {
    pub header: MessageHeader,
    /// Datalink connection the frame arrived on
    pub dlc: DlcId,
    /// Frame was delivered as unacknowledged broadcast
    pub broadcast: bool,
    /// IE octets following the message type
    pub raw_ies: Bytes,
    /// Accepted codeset 0 IEs
    pub ies: Vec<Ie>,
    /// Uninterpreted IEs of codesets 1-7
    pub other_codesets: Vec<CodesetIe>,
}

impl Message {
    /// Parse the header of `frame`, leaving the IEs undecoded
    pub fn parse(frame: &Bytes, dlc: DlcId, broadcast: bool) -> Result<Self, HeaderError> {
        let mut buf = &frame[..];
        let header = MessageHeader::decode(&mut buf)?;
        let raw_ies = frame.slice(header.encoded_len()..);
        Ok(Self {
            header,
            dlc,
            broadcast,
            raw_ies,
            ies: Vec::new(),
            other_codesets: Vec::new(),
        })
    }

    /// Message type, `None` if Q.931 does not define it
    pub fn message_type(&self) -> Option<MessageType> {
        self.header.message_type()
    }

    /// Attach the result of decoding [`raw_ies`](Self::raw_ies)
    pub fn set_decoded(&mut self, decoded: DecodedIes) {
        self.ies = decoded.ies;
        self.other_codesets = decoded.other_codesets;
    }

    /// First IE with identifier `id`
    pub fn find(&self, id: IeId) -> Option<&Ie> {
        let id = u8::from(id);
        self.ies.iter().find(|ie| ie.id() == id)
    }

    /// First Cause IE, if any
    pub fn cause(&self) -> Option<&CauseIe> {
        self.ies.iter().find_map(|ie| match ie {
            Ie::Cause(cause) => Some(cause),
            _ => None,
        })
    }
}

/// Encode a message: header, then every IE in ascending identifier order.
///
/// # Example
///
/// ```
/// use dchan_q931::cause::CauseValue;
/// use dchan_q931::enums::MessageType;
/// use dchan_q931::header::{CallReference, MessageHeader};
/// use dchan_q931::ies::{CauseIe, Ie, Location};
/// use dchan_q931::message::encode_message;
///
/// let header = MessageHeader::new(CallReference::new(7, 1, true), MessageType::ReleaseComplete);
/// let cause = CauseIe::new(CauseValue::InvalidCallReferenceValue, Location::User);
/// let frame = encode_message(&header, &[Ie::Cause(cause)]).unwrap();
/// assert_eq!(&frame[..], &[0x08, 0x01, 0x87, 0x5A, 0x08, 0x02, 0x80, 0xD1]);
/// ```
pub fn encode_message(header: &MessageHeader, ies: &[Ie]) -> Result<BytesMut, EncodeError> {
    let mut buf = BytesMut::with_capacity(header.encoded_len() + ies.len() * 4);
    header.encode(&mut buf)?;

    let mut ordered: Vec<&Ie> = ies.iter().collect();
    ordered.sort_by_key(|ie| ie.id());

    let mut contents = BytesMut::new();
    for ie in ordered {
        let id = ie.id();
        let ie_type = registry::lookup(id).ok_or(EncodeError::UnknownIe(id))?;

        contents.clear();
        match (ie, ie_type.codec) {
            (Ie::Raw { data, .. }, _) => contents.extend_from_slice(data),
            (_, Some(codec)) => (codec.encode)(ie, &mut contents).map_err(|source| {
                EncodeError::Codec {
                    ie: ie_type.name,
                    source,
                }
            })?,
            (_, None) => return Err(EncodeError::UnknownIe(id)),
        }

        if ie_type.is_single_octet() {
            // type 1 carries its value in the low nibble, type 2 has none
            let value = contents.first().map_or(0, |v| v & 0x0F);
            buf.put_u8(id | value);
        } else {
            let len = u8::try_from(contents.len()).map_err(|_| EncodeError::TooLong {
                ie: ie_type.name,
                len: contents.len(),
            })?;
            buf.put_u8(id);
            buf.put_u8(len);
            buf.put_slice(&contents);
        }
    }

    Ok(buf)
}

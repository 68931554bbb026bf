//! Q.931 message decoder
//!
//! Walks the IE stream of one message (everything after the message type
//! octet), tracks the codeset shift state, interprets codeset 0 IEs through
//! the [registry](crate::ies::registry) and checks them against the
//! [legality table](crate::legality). IE-level problems never fail the
//! decode: they are collected in three bounded lists on [`DecodeStatus`] and
//! turned into a [`Recovery`] verdict once the whole stream has been read.
//! Only a stream that runs past its end is an error ([`DecodeError`]).
//!
//! # Codeset shifts (ITU-T Q.931 Section 4.5.2-4.5.4)
//!
//! ```text
//!   8   7   6   5   4   3   2   1
//!   1 | 0   0   1 | L | codeset
//! ```
//!
//! `L` = 1 is a locking shift: the codeset stays in effect until the next
//! locking shift, to a higher or a lower codeset alike. `L` = 0 is a
//! non-locking shift: the codeset applies to the next IE only, after which
//! the locked codeset (0 unless a locking shift set another) is restored.
//! Only codeset 0
//! IEs are interpreted; IEs of other codesets are passed through as
//! [`CodesetIe`].

use arrayvec::ArrayVec;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, trace, warn};

use dchan_common::HexDump;

use crate::cause::CauseValue;
use crate::enums::MessageType;
use crate::ies::cause::{CauseIe, Location};
use crate::ies::registry;
use crate::ies::{comprehension_required, is_single_octet, split_single_octet, Ie, IeId, ShiftIe};
use crate::legality::{self, IeDirection};

/// Capacity of each IE error list
pub const MAX_IE_ERRORS: usize = 32;

/// Fatal IE stream errors. The frame must be dropped without a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("IE 0x{id:02X} at offset {offset} has no length octet")]
    MissingLength { id: u8, offset: usize },

    #[error("IE 0x{id:02X} at offset {offset} declares {declared} octets, {available} left")]
    TruncatedIe {
        id: u8,
        offset: usize,
        declared: usize,
        available: usize,
    },
}

/// Returned when an [`IeIdList`] is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("IE list full")]
pub struct IeListFull;

/// Bounded list of IE identifiers
///
/// Holds at most [`MAX_IE_ERRORS`] identifiers. Further pushes fail and are
/// counted in [`overflow`](Self::overflow).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IeIdList {
    ids: ArrayVec<u8, MAX_IE_ERRORS>,
    overflow: usize,
}

impl IeIdList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier
    pub fn push(&mut self, id: u8) -> Result<(), IeListFull> {
        self.ids.try_push(id).map_err(|_| {
            self.overflow += 1;
            IeListFull
        })
    }

    /// Identifiers recorded so far
    pub fn as_slice(&self) -> &[u8] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u8) -> bool {
        self.ids.contains(&id)
    }

    /// Number of identifiers that did not fit
    pub fn overflow(&self) -> usize {
        self.overflow
    }
}

/// State of one message decode
#[derive(Debug, Clone, Default)]
pub struct DecodeStatus {
    /// Offset of the next unread octet of the IE stream
    pub cursor: usize,
    /// Number of IEs read, shifts excluded
    pub ie_index: usize,
    /// Codeset applying to the next IE
    pub codeset: u8,
    /// Codeset set by the last locking shift
    pub locked_codeset: u8,
    /// True while a non-locking shift is pending
    pub non_locking: bool,
    /// Identifier of the IE being processed
    pub current_ie: Option<u8>,
    /// Mandatory IEs that are missing or carry invalid contents
    pub invalid_mandatory: IeIdList,
    /// Optional IEs with invalid contents
    pub invalid_optional: IeIdList,
    /// Unknown comprehension-required IEs
    pub unrecognized: IeIdList,
}

impl DecodeStatus {
    /// Returns true if no IE error was recorded
    pub fn is_clean(&self) -> bool {
        self.invalid_mandatory.is_empty()
            && self.invalid_optional.is_empty()
            && self.unrecognized.is_empty()
    }

    fn apply_shift(&mut self, shift: ShiftIe) {
        self.codeset = shift.codeset;
        if shift.locking {
            self.locked_codeset = shift.codeset;
            self.non_locking = false;
        } else {
            self.non_locking = true;
        }
    }

    /// Restores the locked codeset once the IE after a non-locking shift is done
    fn end_ie(&mut self) {
        self.ie_index += 1;
        self.current_ie = None;
        if self.non_locking {
            self.codeset = self.locked_codeset;
            self.non_locking = false;
        }
    }

    /// Records an IE whose contents could not be accepted
    fn record_invalid(&mut self, id: u8, mandatory: bool) {
        let (list, kind) = if mandatory || comprehension_required(id) {
            (&mut self.invalid_mandatory, "mandatory")
        } else {
            (&mut self.invalid_optional, "optional")
        };
        debug!(ie_id = id, kind, "Invalid IE");
        if list.push(id).is_err() {
            warn!(ie_id = id, kind, "Invalid IE list full, IE not recorded");
        }
    }

    fn record_unrecognized(&mut self, id: u8) {
        debug!(ie_id = id, "Unrecognized comprehension-required IE");
        if self.unrecognized.push(id).is_err() {
            warn!(ie_id = id, "Unrecognized IE list full, IE not recorded");
        }
    }

    /// Decides what to do with the message, in priority order: invalid
    /// mandatory IEs, then unrecognized IEs, then invalid optional IEs.
    ///
    /// `location` goes into any Cause IE built here.
    pub fn recovery(&self, message_type: MessageType, location: Location) -> Recovery {
        use MessageType::{Disconnect, Release, ReleaseComplete, Setup};

        if !self.invalid_mandatory.is_empty() {
            let cause = CauseIe::with_diagnostics(
                CauseValue::InvalidInformationElementContents,
                location,
                self.invalid_mandatory.as_slice(),
            );
            return match message_type {
                Setup | Release => Recovery::Respond(Response::ReleaseComplete(cause)),
                Disconnect => Recovery::Stash(cause),
                ReleaseComplete => Recovery::Proceed,
                _ => Recovery::Respond(Response::Status(cause)),
            };
        }

        if !self.unrecognized.is_empty() {
            let cause = CauseIe::with_diagnostics(
                CauseValue::InformationElementNonExistent,
                location,
                self.unrecognized.as_slice(),
            );
            return match message_type {
                Disconnect => Recovery::Stash(cause),
                Release => Recovery::Respond(Response::ReleaseComplete(cause)),
                ReleaseComplete => Recovery::Proceed,
                _ => Recovery::Respond(Response::Status(cause)),
            };
        }

        if !self.invalid_optional.is_empty() {
            let ids = self.invalid_optional.as_slice();
            return match message_type {
                Disconnect => Recovery::Stash(CauseIe::with_diagnostics(
                    CauseValue::InformationElementNonExistent,
                    location,
                    ids,
                )),
                Release => Recovery::AbortSilently,
                ReleaseComplete => Recovery::Proceed,
                _ => Recovery::Respond(Response::Status(CauseIe::with_diagnostics(
                    CauseValue::InvalidInformationElementContents,
                    location,
                    ids,
                ))),
            };
        }

        Recovery::Proceed
    }
}

/// Message the call layer must send in reply to a rejected message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ReleaseComplete(CauseIe),
    Status(CauseIe),
}

impl Response {
    /// Message type of the response
    pub fn message_type(&self) -> MessageType {
        match self {
            Response::ReleaseComplete(_) => MessageType::ReleaseComplete,
            Response::Status(_) => MessageType::Status,
        }
    }

    /// Cause carried by the response
    pub fn cause(&self) -> &CauseIe {
        match self {
            Response::ReleaseComplete(cause) | Response::Status(cause) => cause,
        }
    }
}

/// Outcome of the post-scan recovery policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Deliver the message
    Proceed,
    /// Deliver the message and keep the cause for the RELEASE that follows
    Stash(CauseIe),
    /// Drop the message and send a response
    Respond(Response),
    /// Drop the message without a response
    AbortSilently,
}

impl Recovery {
    /// Returns true if the message is delivered to the call layer
    pub fn delivers(&self) -> bool {
        matches!(self, Recovery::Proceed | Recovery::Stash(_))
    }
}

/// IE of a codeset other than 0, kept uninterpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodesetIe {
    pub codeset: u8,
    /// Identifier octet as received
    pub id: u8,
    /// Contents (the 4-bit value for single octet IEs)
    pub data: Bytes,
}

/// Result of decoding the IE stream of one message
#[derive(Debug, Clone)]
pub struct DecodedIes {
    /// Accepted codeset 0 IEs, in stream order
    pub ies: Vec<Ie>,
    /// IEs of codesets 1-7
    pub other_codesets: Vec<CodesetIe>,
    pub status: DecodeStatus,
}

impl DecodedIes {
    /// First IE with identifier `id`
    pub fn find(&self, id: IeId) -> Option<&Ie> {
        let id = u8::from(id);
        self.ies.iter().find(|ie| ie.id() == id)
    }
}

/// Decodes the IE stream of one message
pub struct MessageDecoder {
    message_type: MessageType,
    direction: IeDirection,
    status: DecodeStatus,
    ies: Vec<Ie>,
    other_codesets: Vec<CodesetIe>,
    /// Codeset 0 identifiers that passed the legality check
    seen: [bool; 256],
}

impl MessageDecoder {
    /// Create a decoder for a message of `message_type` travelling in
    /// `direction`
    pub fn new(message_type: MessageType, direction: IeDirection) -> Self {
        Self {
            message_type,
            direction,
            status: DecodeStatus::default(),
            ies: Vec::new(),
            other_codesets: Vec::new(),
            seen: [false; 256],
        }
    }

    /// Decode `data`, the octets following the message type
    pub fn decode(mut self, data: &[u8]) -> Result<DecodedIes, DecodeError> {
        while let Some(&octet) = data.get(self.status.cursor) {
            let offset = self.status.cursor;

            if is_single_octet(octet) {
                self.status.cursor += 1;
                let (id, value) = split_single_octet(octet);
                if id == u8::from(IeId::Shift) {
                    let shift = ShiftIe::from_value(value.unwrap_or_default());
                    trace!(codeset = shift.codeset, locking = shift.locking, "Shift");
                    self.status.apply_shift(shift);
                    continue;
                }
                let contents = value.map(|v| [v]);
                self.process(id, contents.as_ref().map_or(&[][..], |v| &v[..]));
            } else {
                let declared = *data
                    .get(offset + 1)
                    .ok_or(DecodeError::MissingLength { id: octet, offset })?
                    as usize;
                let start = offset + 2;
                let contents = data
                    .get(start..start + declared)
                    .ok_or(DecodeError::TruncatedIe {
                        id: octet,
                        offset,
                        declared,
                        available: data.len() - start,
                    })?;
                self.status.cursor = start + declared;
                self.process(octet, contents);
            }

            self.status.end_ie();
        }

        self.check_missing_mandatory();

        Ok(DecodedIes {
            ies: self.ies,
            other_codesets: self.other_codesets,
            status: self.status,
        })
    }

    fn process(&mut self, id: u8, contents: &[u8]) {
        let codeset = self.status.codeset;
        if codeset != 0 {
            trace!(codeset, ie_id = id, data = %HexDump(contents), "IE of another codeset");
            self.other_codesets.push(CodesetIe {
                codeset,
                id,
                data: Bytes::copy_from_slice(contents),
            });
            return;
        }

        self.status.current_ie = Some(id);

        let Some(ie_type) = registry::lookup(id) else {
            if comprehension_required(id) {
                self.status.record_unrecognized(id);
            } else {
                debug!(ie_id = id, "Unknown IE skipped");
            }
            return;
        };

        let Some(entry) = legality::legality(self.message_type, id)
            .filter(|entry| entry.direction.allows(self.direction))
        else {
            debug!(
                ie = ie_type.name,
                message_type = %self.message_type,
                "Unexpected IE skipped"
            );
            return;
        };
        self.seen[usize::from(id)] = true;

        if let Some(max) = ie_type.max_occur {
            let count = self.ies.iter().filter(|ie| ie.id() == id).count();
            if count >= max {
                debug!(ie = ie_type.name, max, "Repeated IE beyond maximum ignored");
                return;
            }
        }

        if ie_type.exceeds_max_len(contents.len()) {
            debug!(ie = ie_type.name, len = contents.len(), "IE too long");
            self.status.record_invalid(id, entry.is_mandatory_in(self.direction));
            return;
        }

        let ie = match ie_type.codec {
            Some(codec) => match (codec.decode)(contents) {
                Ok(ie) => ie,
                Err(e) => {
                    debug!(ie = ie_type.name, error = %e, data = %HexDump(contents), "IE decode failed");
                    self.status.record_invalid(id, entry.is_mandatory_in(self.direction));
                    return;
                }
            },
            None => Ie::Raw {
                id,
                data: Bytes::copy_from_slice(contents),
            },
        };
        trace!(ie = %ie, "IE decoded");
        self.ies.push(ie);
    }

    fn check_missing_mandatory(&mut self) {
        for id in legality::mandatory_ies(self.message_type, self.direction) {
            if !self.seen[usize::from(id)] {
                debug!(ie_id = id, message_type = %self.message_type, "Mandatory IE missing");
                self.status.record_invalid(id, true);
            }
        }
    }
}

/// Decode the IE stream of a `message_type` message received in `direction`
pub fn decode_ies(
    message_type: MessageType,
    direction: IeDirection,
    data: &[u8],
) -> Result<DecodedIes, DecodeError> {
    MessageDecoder::new(message_type, direction).decode(data)
}

//! Q.931 frame dispatcher
//!
//! Takes one frame from the datalink, parses the header, finds or creates the
//! call it belongs to, runs the [message decoder](crate::decoder) and routes
//! the result to the call layer through the [`CallControl`] trait:
//!
//! ```text
//!   frame ──> header ──> callref 0 ──────────────> decode ──> dispatch_global
//!                  │
//!                  └──> call found ──────────────> decode ──> CES or call
//!                  │
//!                  └──> unknown callref ─ SETUP/RESUME/STATUS: decode, then
//!                                       │   create the call unless rejected
//!                                       │   with RELEASE COMPLETE
//!                                       ├ RELEASE: RELEASE COMPLETE #81
//!                                       ├ RELEASE COMPLETE: discard
//!                                       └ other: RELEASE COMPLETE #81, T308,
//!                                                release request state
//! ```
//!
//! Datalink receive errors are not protocol errors: they are turned into
//! DL primitives and given to every call on the datalink and to the global
//! call.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

use dchan_common::{log_q931_message, DatalinkRole, Direction, DlcId, InterfaceConfig, Timer};

use crate::cause::CauseValue;
use crate::decoder::{decode_ies, DecodeError, Recovery, Response};
use crate::enums::MessageType;
use crate::header::{CallReference, HeaderError};
use crate::ies::cause::{derive_location, CauseIe, Location};
use crate::legality::IeDirection;
use crate::message::Message;

/// Call state value of Release Request (U19 / N19)
pub const STATE_RELEASE_REQUEST: u8 = 19;

/// Datalink primitives delivered to the call layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DlEvent {
    EstablishIndication,
    EstablishConfirm,
    ReleaseIndication,
    ReleaseConfirm,
}

impl fmt::Display for DlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DlEvent::EstablishIndication => "DL-ESTABLISH-INDICATION",
            DlEvent::EstablishConfirm => "DL-ESTABLISH-CONFIRM",
            DlEvent::ReleaseIndication => "DL-RELEASE-INDICATION",
            DlEvent::ReleaseConfirm => "DL-RELEASE-CONFIRM",
        };
        f.write_str(name)
    }
}

/// Conditions reported by the datalink instead of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DatalinkError {
    #[error("Connection reset")]
    ConnectionReset,
    #[error("Not connected")]
    NotConnected,
    #[error("Already connected")]
    AlreadyConnected,
    #[error("Establishment in progress")]
    EstablishInProgress,
}

impl DatalinkError {
    /// DL primitive this condition stands for
    pub fn dl_event(&self) -> DlEvent {
        match self {
            DatalinkError::ConnectionReset => DlEvent::ReleaseIndication,
            DatalinkError::NotConnected => DlEvent::ReleaseConfirm,
            DatalinkError::AlreadyConnected => DlEvent::EstablishConfirm,
            DatalinkError::EstablishInProgress => DlEvent::EstablishIndication,
        }
    }
}

/// Errors surfaced to the caller of the dispatcher. No response is sent for
/// any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("Malformed header: {0}")]
    Header(#[from] HeaderError),

    #[error("Malformed IE stream on {call_ref}: {source}")]
    Decode {
        call_ref: CallReference,
        #[source]
        source: DecodeError,
    },

    #[error("Datalink: {0}")]
    Datalink(#[from] DatalinkError),
}

/// What the dispatcher did with a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered to the global call
    Global,
    /// Delivered to the call
    Call,
    /// Delivered to the call establishment instance of the datalink
    Ces,
    /// Rejected by the recovery policy
    Rejected(Recovery),
    /// Unknown call reference answered with RELEASE COMPLETE
    CallRefRejected,
    /// Dropped without any action
    Discarded,
}

/// Operations of the call layer used by the dispatcher
///
/// `Call` and `Ces` are opaque handles. The dispatcher never looks inside
/// them.
pub trait CallControl {
    type Call;
    type Ces;

    /// Call owning `call_ref` on `dlc`
    fn find_call(&mut self, dlc: DlcId, call_ref: CallReference) -> Option<Self::Call>;

    /// Allocate a call for an incoming `call_ref`
    fn create_call(&mut self, dlc: DlcId, call_ref: CallReference) -> Self::Call;

    /// Call establishment instance of `call` bound to `dlc`, if one is selected
    fn find_ces(&mut self, call: &Self::Call, dlc: DlcId) -> Option<Self::Ces>;

    fn dispatch_message(&mut self, call: &Self::Call, message: &Message);

    fn dispatch_ces_message(&mut self, ces: &Self::Ces, message: &Message);

    /// Deliver a global call reference message
    fn dispatch_global(&mut self, message: &Message);

    fn set_state(&mut self, call: &Self::Call, state: u8);

    fn start_timer(&mut self, call: &Self::Call, timer: Timer, duration: std::time::Duration);

    fn send_status(&mut self, call: &Self::Call, cause: CauseIe);

    /// STATUS on the global call reference
    fn send_global_status(&mut self, dlc: DlcId, call_ref: CallReference, cause: CauseIe);

    /// RELEASE COMPLETE on `call_ref`, which need not belong to a call
    fn send_release_complete(&mut self, dlc: DlcId, call_ref: CallReference, cause: CauseIe);

    /// Keep `cause` for the RELEASE that will answer a DISCONNECT
    fn stash_release_cause(&mut self, call: &Self::Call, cause: CauseIe);

    /// Every call using `dlc`
    fn calls_on_dlc(&mut self, dlc: DlcId) -> Vec<Self::Call>;

    /// Deliver a DL primitive to `call`, or to the global call when `None`
    fn dispatch_dl_event(&mut self, call: Option<&Self::Call>, dlc: DlcId, event: DlEvent);
}

/// Frame dispatcher of one interface
#[derive(Debug, Clone)]
pub struct FrameDispatcher {
    config: InterfaceConfig,
}

impl FrameDispatcher {
    pub fn new(config: InterfaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Direction of received messages: a TE receives from the network
    pub fn inbound_direction(&self) -> IeDirection {
        match self.config.role {
            DatalinkRole::Te => IeDirection::NetworkToUser,
            DatalinkRole::Nt => IeDirection::UserToNetwork,
        }
    }

    /// Location for causes generated about `call_ref`
    pub fn cause_location(&self, call_ref: CallReference) -> Location {
        derive_location(call_ref.direction(), self.config.network_role, self.config.role)
    }

    /// Handle what the datalink delivered: a frame with its broadcast flag,
    /// or an error
    pub fn receive<C: CallControl>(
        &self,
        cc: &mut C,
        dlc: DlcId,
        received: Result<(Bytes, bool), DatalinkError>,
    ) -> Result<DispatchOutcome, ReceiveError> {
        match received {
            Ok((frame, broadcast)) => self.receive_frame(cc, dlc, frame, broadcast),
            Err(e) => {
                self.datalink_error(cc, dlc, e);
                Err(e.into())
            }
        }
    }

    /// Map a datalink error to its DL primitive and deliver it to every call
    /// on `dlc` and to the global call
    pub fn datalink_error<C: CallControl>(&self, cc: &mut C, dlc: DlcId, error: DatalinkError) -> DlEvent {
        let event = error.dl_event();
        info!(dlc = %dlc, error = %error, event = %event, "Datalink condition");
        for call in cc.calls_on_dlc(dlc) {
            cc.dispatch_dl_event(Some(&call), dlc, event);
        }
        cc.dispatch_dl_event(None, dlc, event);
        event
    }

    /// Decode and route one frame
    pub fn receive_frame<C: CallControl>(
        &self,
        cc: &mut C,
        dlc: DlcId,
        frame: Bytes,
        broadcast: bool,
    ) -> Result<DispatchOutcome, ReceiveError> {
        let mut message = Message::parse(&frame, dlc, broadcast).map_err(|e| {
            warn!(dlc = %dlc, len = frame.len(), error = %e, "Malformed frame dropped");
            e
        })?;
        let call_ref = message.header.call_ref;

        let Some(message_type) = message.message_type() else {
            return Ok(self.unknown_message_type(cc, &message));
        };
        log_q931_message(Direction::Rx, message_type.name(), &frame);

        if call_ref.is_global() {
            return self.receive_global(cc, message, message_type);
        }

        let existing = cc.find_call(dlc, call_ref);
        if existing.is_none() {
            if let Some(outcome) = self.unknown_call_ref(cc, dlc, call_ref, message_type) {
                return Ok(outcome);
            }
        }

        let decoded = decode_ies(message_type, self.inbound_direction(), &message.raw_ies)
            .map_err(|source| {
                warn!(call_ref = %call_ref, error = %source, "Malformed IE stream");
                ReceiveError::Decode { call_ref, source }
            })?;
        let recovery = decoded
            .status
            .recovery(message_type, self.cause_location(call_ref));
        message.set_decoded(decoded);

        // verdicts that need no call handle
        let recovery = match recovery {
            Recovery::Respond(Response::ReleaseComplete(cause)) => {
                debug!(call_ref = %call_ref, cause = cause.value, "Message rejected with RELEASE COMPLETE");
                cc.send_release_complete(dlc, call_ref.reply(), cause.clone());
                return Ok(DispatchOutcome::Rejected(Recovery::Respond(
                    Response::ReleaseComplete(cause),
                )));
            }
            Recovery::AbortSilently => {
                debug!(call_ref = %call_ref, message_type = %message_type, "Message dropped");
                return Ok(DispatchOutcome::Rejected(Recovery::AbortSilently));
            }
            other => other,
        };

        let call = match existing {
            Some(call) => call,
            None => {
                debug!(call_ref = %call_ref, message_type = %message_type, "New call");
                cc.create_call(dlc, call_ref)
            }
        };

        match recovery {
            Recovery::Stash(cause) => {
                debug!(call_ref = %call_ref, cause = cause.value, "Release cause stashed");
                cc.stash_release_cause(&call, cause);
            }
            Recovery::Respond(Response::Status(cause)) => {
                debug!(call_ref = %call_ref, cause = cause.value, "Message rejected with STATUS");
                cc.send_status(&call, cause.clone());
                return Ok(DispatchOutcome::Rejected(Recovery::Respond(Response::Status(
                    cause,
                ))));
            }
            _ => {}
        }

        match cc.find_ces(&call, dlc) {
            Some(ces) => {
                cc.dispatch_ces_message(&ces, &message);
                Ok(DispatchOutcome::Ces)
            }
            None => {
                cc.dispatch_message(&call, &message);
                Ok(DispatchOutcome::Call)
            }
        }
    }

    fn receive_global<C: CallControl>(
        &self,
        cc: &mut C,
        mut message: Message,
        message_type: MessageType,
    ) -> Result<DispatchOutcome, ReceiveError> {
        let call_ref = message.header.call_ref;
        let decoded = decode_ies(message_type, self.inbound_direction(), &message.raw_ies)
            .map_err(|source| {
                warn!(call_ref = %call_ref, error = %source, "Malformed IE stream");
                ReceiveError::Decode { call_ref, source }
            })?;
        let recovery = decoded
            .status
            .recovery(message_type, self.cause_location(call_ref));
        message.set_decoded(decoded);

        match recovery {
            Recovery::Proceed | Recovery::Stash(_) => {
                cc.dispatch_global(&message);
                Ok(DispatchOutcome::Global)
            }
            Recovery::Respond(response) => {
                let cause = response.cause().clone();
                match response {
                    Response::ReleaseComplete(_) => {
                        cc.send_release_complete(message.dlc, call_ref.reply(), cause)
                    }
                    Response::Status(_) => {
                        cc.send_global_status(message.dlc, call_ref.reply(), cause)
                    }
                }
                Ok(DispatchOutcome::Rejected(Recovery::Respond(response)))
            }
            Recovery::AbortSilently => Ok(DispatchOutcome::Rejected(Recovery::AbortSilently)),
        }
    }

    /// Message types Q.931 does not define get STATUS #97 on an existing
    /// call and are dropped otherwise
    fn unknown_message_type<C: CallControl>(&self, cc: &mut C, message: &Message) -> DispatchOutcome {
        let call_ref = message.header.call_ref;
        let raw = message.header.message_type_raw;
        if call_ref.is_global() {
            debug!(message_type = raw, "Unknown message type on global call reference");
            return DispatchOutcome::Discarded;
        }
        match cc.find_call(message.dlc, call_ref) {
            Some(call) => {
                debug!(call_ref = %call_ref, message_type = raw, "Unknown message type");
                let cause = CauseIe::new(CauseValue::MessageTypeNonExistent, self.cause_location(call_ref));
                cc.send_status(&call, cause.clone());
                DispatchOutcome::Rejected(Recovery::Respond(Response::Status(cause)))
            }
            None => {
                debug!(call_ref = %call_ref, message_type = raw, "Unknown message type for unknown call");
                DispatchOutcome::Discarded
            }
        }
    }

    /// Handles a call reference no call owns. SETUP, RESUME and STATUS
    /// return `None` and go on to be decoded; everything else is settled here.
    fn unknown_call_ref<C: CallControl>(
        &self,
        cc: &mut C,
        dlc: DlcId,
        call_ref: CallReference,
        message_type: MessageType,
    ) -> Option<DispatchOutcome> {
        match message_type {
            MessageType::Setup | MessageType::Resume | MessageType::Status => None,
            MessageType::Release => {
                self.reject_call_ref(cc, dlc, call_ref);
                Some(DispatchOutcome::CallRefRejected)
            }
            MessageType::ReleaseComplete => {
                debug!(call_ref = %call_ref, "RELEASE COMPLETE for unknown call discarded");
                Some(DispatchOutcome::Discarded)
            }
            _ => {
                let call = cc.create_call(dlc, call_ref);
                self.reject_call_ref(cc, dlc, call_ref);
                let t308 = self.config.timers.duration(Timer::T308);
                cc.start_timer(&call, Timer::T308, t308);
                cc.set_state(&call, STATE_RELEASE_REQUEST);
                Some(DispatchOutcome::CallRefRejected)
            }
        }
    }

    fn reject_call_ref<C: CallControl>(&self, cc: &mut C, dlc: DlcId, call_ref: CallReference) {
        debug!(call_ref = %call_ref, "Unknown call reference");
        let cause = CauseIe::new(CauseValue::InvalidCallReferenceValue, self.cause_location(call_ref));
        cc.send_release_complete(dlc, call_ref.reply(), cause);
    }
}

//! Mock call layer for integration testing
//!
//! Implements [`CallControl`] by recording every operation the frame
//! dispatcher performs, so tests can check what was delivered, sent, stashed
//! and started for each frame.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use dchan_common::{DlcId, Timer};
use dchan_q931::{CallControl, CallReference, CauseIe, DlEvent, Ie, Message, MessageType};
use tracing::trace;

/// Handle of a call in the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u32);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// Handle of a call establishment instance in the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CesId(pub u32);

/// Operations recorded by the mock, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    /// A call was allocated for an unknown call reference
    CallCreated {
        call: CallId,
        dlc: DlcId,
        call_ref: CallReference,
    },
    /// Message delivered to a call
    CallMessage {
        call: CallId,
        message_type: MessageType,
        ies: Vec<Ie>,
    },
    /// Message delivered to a call establishment instance
    CesMessage {
        ces: CesId,
        message_type: MessageType,
    },
    /// Global call reference message delivered
    GlobalMessage {
        dlc: DlcId,
        message_type: MessageType,
    },
    StateChanged {
        call: CallId,
        state: u8,
    },
    TimerStarted {
        call: CallId,
        timer: Timer,
        duration: Duration,
    },
    StatusSent {
        call: CallId,
        cause: CauseIe,
    },
    GlobalStatusSent {
        dlc: DlcId,
        call_ref: CallReference,
        cause: CauseIe,
    },
    ReleaseCompleteSent {
        dlc: DlcId,
        call_ref: CallReference,
        cause: CauseIe,
    },
    ReleaseCauseStashed {
        call: CallId,
        cause: CauseIe,
    },
    /// DL primitive delivered to a call, or to the global call when `None`
    DlEvent {
        call: Option<CallId>,
        dlc: DlcId,
        event: DlEvent,
    },
}

/// Call as the mock knows it
#[derive(Debug, Clone)]
struct MockCall {
    dlc: DlcId,
    call_ref: CallReference,
    state: u8,
    stashed_cause: Option<CauseIe>,
}

/// Recording call layer
#[derive(Debug, Default)]
pub struct MockCallControl {
    calls: HashMap<CallId, MockCall>,
    /// Calls by datalink, call reference value and flag as received
    index: HashMap<(DlcId, u32, bool), CallId>,
    ces: HashMap<(CallId, DlcId), CesId>,
    events: Vec<MockEvent>,
    next_call_id: u32,
    next_ces_id: u32,
}

impl MockCallControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing call that owns `call_ref` on `dlc`
    pub fn add_call(&mut self, dlc: DlcId, call_ref: CallReference) -> CallId {
        self.next_call_id += 1;
        let id = CallId(self.next_call_id);
        self.calls.insert(
            id,
            MockCall {
                dlc,
                call_ref,
                state: 0,
                stashed_cause: None,
            },
        );
        self.index.insert((dlc, call_ref.value, call_ref.flag), id);
        id
    }

    /// Select a call establishment instance for `call` on `dlc`
    pub fn bind_ces(&mut self, call: CallId, dlc: DlcId) -> CesId {
        self.next_ces_id += 1;
        let id = CesId(self.next_ces_id);
        self.ces.insert((call, dlc), id);
        id
    }

    pub fn events(&self) -> &[MockEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take_events(&mut self) -> Vec<MockEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn state(&self, call: CallId) -> Option<u8> {
        self.calls.get(&call).map(|c| c.state)
    }

    pub fn stashed_cause(&self, call: CallId) -> Option<&CauseIe> {
        self.calls.get(&call).and_then(|c| c.stashed_cause.as_ref())
    }

    /// Call owning `call_ref` on `dlc`, without recording anything
    pub fn lookup(&self, dlc: DlcId, call_ref: CallReference) -> Option<CallId> {
        self.index.get(&(dlc, call_ref.value, call_ref.flag)).copied()
    }

    fn record(&mut self, event: MockEvent) {
        trace!(?event, "Call layer");
        self.events.push(event);
    }
}

impl CallControl for MockCallControl {
    type Call = CallId;
    type Ces = CesId;

    fn find_call(&mut self, dlc: DlcId, call_ref: CallReference) -> Option<CallId> {
        self.lookup(dlc, call_ref)
    }

    fn create_call(&mut self, dlc: DlcId, call_ref: CallReference) -> CallId {
        let call = self.add_call(dlc, call_ref);
        self.record(MockEvent::CallCreated { call, dlc, call_ref });
        call
    }

    fn find_ces(&mut self, call: &CallId, dlc: DlcId) -> Option<CesId> {
        self.ces.get(&(*call, dlc)).copied()
    }

    fn dispatch_message(&mut self, call: &CallId, message: &Message) {
        if let Some(message_type) = message.message_type() {
            self.record(MockEvent::CallMessage {
                call: *call,
                message_type,
                ies: message.ies.clone(),
            });
        }
    }

    fn dispatch_ces_message(&mut self, ces: &CesId, message: &Message) {
        if let Some(message_type) = message.message_type() {
            self.record(MockEvent::CesMessage {
                ces: *ces,
                message_type,
            });
        }
    }

    fn dispatch_global(&mut self, message: &Message) {
        if let Some(message_type) = message.message_type() {
            self.record(MockEvent::GlobalMessage {
                dlc: message.dlc,
                message_type,
            });
        }
    }

    fn set_state(&mut self, call: &CallId, state: u8) {
        if let Some(c) = self.calls.get_mut(call) {
            c.state = state;
        }
        self.record(MockEvent::StateChanged { call: *call, state });
    }

    fn start_timer(&mut self, call: &CallId, timer: Timer, duration: Duration) {
        self.record(MockEvent::TimerStarted {
            call: *call,
            timer,
            duration,
        });
    }

    fn send_status(&mut self, call: &CallId, cause: CauseIe) {
        self.record(MockEvent::StatusSent { call: *call, cause });
    }

    fn send_global_status(&mut self, dlc: DlcId, call_ref: CallReference, cause: CauseIe) {
        self.record(MockEvent::GlobalStatusSent { dlc, call_ref, cause });
    }

    fn send_release_complete(&mut self, dlc: DlcId, call_ref: CallReference, cause: CauseIe) {
        self.record(MockEvent::ReleaseCompleteSent { dlc, call_ref, cause });
    }

    fn stash_release_cause(&mut self, call: &CallId, cause: CauseIe) {
        if let Some(c) = self.calls.get_mut(call) {
            c.stashed_cause = Some(cause.clone());
        }
        self.record(MockEvent::ReleaseCauseStashed { call: *call, cause });
    }

    fn calls_on_dlc(&mut self, dlc: DlcId) -> Vec<CallId> {
        let mut calls: Vec<CallId> = self
            .calls
            .iter()
            .filter(|(_, c)| c.dlc == dlc)
            .map(|(id, _)| *id)
            .collect();
        calls.sort();
        calls
    }

    fn dispatch_dl_event(&mut self, call: Option<&CallId>, dlc: DlcId, event: DlEvent) {
        self.record(MockEvent::DlEvent {
            call: call.copied(),
            dlc,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup_call() {
        let mut cc = MockCallControl::new();
        let call_ref = CallReference::new(5, 1, false);
        let call = cc.add_call(DlcId(1), call_ref);

        assert_eq!(cc.lookup(DlcId(1), call_ref), Some(call));
        assert_eq!(cc.lookup(DlcId(2), call_ref), None);
        assert_eq!(cc.lookup(DlcId(1), call_ref.reply()), None);
        assert!(cc.events().is_empty());
    }

    #[test]
    fn test_calls_on_dlc_sorted() {
        let mut cc = MockCallControl::new();
        let a = cc.add_call(DlcId(1), CallReference::new(1, 1, false));
        let _ = cc.add_call(DlcId(2), CallReference::new(2, 1, false));
        let c = cc.add_call(DlcId(1), CallReference::new(3, 1, true));

        assert_eq!(cc.calls_on_dlc(DlcId(1)), vec![a, c]);
    }

    #[test]
    fn test_state_tracked() {
        let mut cc = MockCallControl::new();
        let call = cc.add_call(DlcId(0), CallReference::new(1, 1, false));
        cc.set_state(&call, 10);
        assert_eq!(cc.state(call), Some(10));
        assert_eq!(
            cc.take_events(),
            vec![MockEvent::StateChanged { call, state: 10 }]
        );
        assert!(cc.events().is_empty());
    }
}

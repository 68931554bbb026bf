//! Test utility functions for integration tests
//!
//! Provides logging setup and assertions over recorded call-layer events.

use dchan_q931::CauseIe;
use tracing_subscriber::{fmt, EnvFilter};

use crate::mock_call_control::MockEvent;

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "debug"
/// so decoder decisions show up in failing test output.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Cause of the only RELEASE COMPLETE in `events`
///
/// Panics unless exactly one RELEASE COMPLETE was sent.
pub fn single_release_complete(events: &[MockEvent]) -> &CauseIe {
    let sent: Vec<&CauseIe> = events
        .iter()
        .filter_map(|e| match e {
            MockEvent::ReleaseCompleteSent { cause, .. } => Some(cause),
            _ => None,
        })
        .collect();
    assert_eq!(sent.len(), 1, "expected one RELEASE COMPLETE in {events:#?}");
    sent[0]
}

/// Cause of the only STATUS in `events`, on a call or on the global call
/// reference
pub fn single_status(events: &[MockEvent]) -> &CauseIe {
    let sent: Vec<&CauseIe> = events
        .iter()
        .filter_map(|e| match e {
            MockEvent::StatusSent { cause, .. } | MockEvent::GlobalStatusSent { cause, .. } => {
                Some(cause)
            }
            _ => None,
        })
        .collect();
    assert_eq!(sent.len(), 1, "expected one STATUS in {events:#?}");
    sent[0]
}

/// Number of messages that reached the call layer
pub fn delivered_count(events: &[MockEvent]) -> usize {
    events
        .iter()
        .filter(|e| {
            matches!(
                e,
                MockEvent::CallMessage { .. }
                    | MockEvent::CesMessage { .. }
                    | MockEvent::GlobalMessage { .. }
            )
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_call_control::CallId;
    use dchan_common::DlcId;
    use dchan_q931::{CallReference, CauseValue, Location, MessageType};

    #[test]
    fn test_single_release_complete() {
        let cause = CauseIe::new(CauseValue::InvalidCallReferenceValue, Location::User);
        let events = vec![
            MockEvent::CallCreated {
                call: CallId(1),
                dlc: DlcId(0),
                call_ref: CallReference::new(1, 1, false),
            },
            MockEvent::ReleaseCompleteSent {
                dlc: DlcId(0),
                call_ref: CallReference::new(1, 1, true),
                cause: cause.clone(),
            },
        ];
        assert_eq!(single_release_complete(&events), &cause);
        assert_eq!(delivered_count(&events), 0);
    }

    #[test]
    fn test_delivered_count() {
        let events = vec![
            MockEvent::GlobalMessage {
                dlc: DlcId(0),
                message_type: MessageType::Restart,
            },
            MockEvent::CallMessage {
                call: CallId(1),
                message_type: MessageType::Connect,
                ies: Vec::new(),
            },
        ];
        assert_eq!(delivered_count(&events), 2);
    }
}

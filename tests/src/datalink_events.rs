//! Datalink event integration tests
//!
//! Datalink conditions reported instead of a frame become DL primitives for
//! every call on the link and for the global call.

use bytes::Bytes;
use dchan_common::DlcId;
use dchan_q931::{DatalinkError, DispatchOutcome, DlEvent, MessageType, ReceiveError};
use integration_tests::*;

#[test]
fn test_connection_reset_reaches_all_calls() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let first = cc.add_call(TEST_DLC, call_ref(1));
    let second = cc.add_call(TEST_DLC, call_ref(2));
    let elsewhere = cc.add_call(DlcId(7), call_ref(3));

    let err = dispatcher
        .receive(&mut cc, TEST_DLC, Err(DatalinkError::ConnectionReset))
        .unwrap_err();
    assert_eq!(err, ReceiveError::Datalink(DatalinkError::ConnectionReset));

    assert_eq!(
        cc.events(),
        &[
            MockEvent::DlEvent {
                call: Some(first),
                dlc: TEST_DLC,
                event: DlEvent::ReleaseIndication
            },
            MockEvent::DlEvent {
                call: Some(second),
                dlc: TEST_DLC,
                event: DlEvent::ReleaseIndication
            },
            MockEvent::DlEvent {
                call: None,
                dlc: TEST_DLC,
                event: DlEvent::ReleaseIndication
            },
        ]
    );
    assert!(!cc.events().iter().any(|e| matches!(
        e,
        MockEvent::DlEvent { call: Some(call), .. } if *call == elsewhere
    )));
}

#[test]
fn test_datalink_error_mapping() {
    let dispatcher = te_dispatcher();
    let cases = [
        (DatalinkError::ConnectionReset, DlEvent::ReleaseIndication),
        (DatalinkError::NotConnected, DlEvent::ReleaseConfirm),
        (DatalinkError::AlreadyConnected, DlEvent::EstablishConfirm),
        (DatalinkError::EstablishInProgress, DlEvent::EstablishIndication),
    ];

    for (error, expected) in cases {
        let mut cc = MockCallControl::new();
        assert_eq!(dispatcher.datalink_error(&mut cc, TEST_DLC, error), expected);
        // no calls: only the global call hears about it
        assert_eq!(
            cc.events(),
            &[MockEvent::DlEvent {
                call: None,
                dlc: TEST_DLC,
                event: expected
            }]
        );
    }
}

/// A received frame goes through the normal dispatch path
#[test]
fn test_receive_frame_ok() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(1));

    let alerting = frame(call_ref(1), MessageType::Alerting, &[]);
    let outcome = dispatcher
        .receive(&mut cc, TEST_DLC, Ok((alerting, false)))
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
}

/// An empty frame is a header error, not a datalink event
#[test]
fn test_empty_frame_is_not_a_datalink_event() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(1));

    let err = dispatcher
        .receive(&mut cc, TEST_DLC, Ok((Bytes::new(), false)))
        .unwrap_err();
    assert!(matches!(err, ReceiveError::Header(_)));
    assert!(cc.events().is_empty());
}

//! Frame dispatch integration tests
//!
//! Routing of well-formed frames by call reference.

use dchan_common::{DlcId, Timer};
use dchan_q931::dispatcher::STATE_RELEASE_REQUEST;
use dchan_q931::{
    CallReference, CauseValue, DispatchOutcome, HeaderError, Ie, IeId, MessageType, ReceiveError,
};
use integration_tests::*;

/// SETUP for an unknown call reference creates the call and reaches it
#[test]
fn test_setup_creates_call() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, setup_frame(call_ref(2)), false)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(cc.call_count(), 1);

    let call = cc.lookup(TEST_DLC, call_ref(2)).unwrap();
    match cc.events() {
        [MockEvent::CallCreated { call: created, .. }, MockEvent::CallMessage { call: target, message_type, ies }] =>
        {
            assert_eq!(*created, call);
            assert_eq!(*target, call);
            assert_eq!(*message_type, MessageType::Setup);
            assert_eq!(ies.len(), 3);
            assert_eq!(ies[0].id(), u8::from(IeId::BearerCapability));
        }
        other => panic!("unexpected events {other:#?}"),
    }
}

/// Messages for an existing call are decoded and delivered
#[test]
fn test_existing_call_receives_disconnect() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(4));

    let frame = disconnect_frame(call_ref(4), CauseValue::NormalCallClearing);
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, frame, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);

    match cc.events() {
        [MockEvent::CallMessage { call: target, message_type, ies }] => {
            assert_eq!(*target, call);
            assert_eq!(*message_type, MessageType::Disconnect);
            match ies.as_slice() {
                [Ie::Cause(cause)] => assert_eq!(cause.value, 16),
                other => panic!("unexpected IEs {other:?}"),
            }
        }
        other => panic!("unexpected events {other:#?}"),
    }
}

/// The same call reference value with the other flag is another call
#[test]
fn test_call_reference_flag_distinguishes_calls() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let ours = cc.add_call(TEST_DLC, CallReference::new(4, 1, true));

    let outcome = dispatcher
        .receive_frame(
            &mut cc,
            TEST_DLC,
            frame(CallReference::new(4, 1, true), MessageType::Connect, &CHAN_ID_B1),
            false,
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert!(matches!(
        cc.events(),
        [MockEvent::CallMessage { call, message_type: MessageType::Connect, .. }] if *call == ours
    ));
}

/// A call with a selected CES gets its messages through the CES
#[test]
fn test_ces_routing() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(9));
    let ces = cc.bind_ces(call, TEST_DLC);

    let outcome = dispatcher
        .receive_frame(
            &mut cc,
            TEST_DLC,
            frame(call_ref(9), MessageType::Alerting, &[]),
            false,
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Ces);
    assert_eq!(
        cc.events(),
        &[MockEvent::CesMessage {
            ces,
            message_type: MessageType::Alerting
        }]
    );

    // the binding is per datalink
    let other_dlc = DlcId(2);
    cc.add_call(other_dlc, call_ref(9));
    cc.take_events();
    let outcome = dispatcher
        .receive_frame(
            &mut cc,
            other_dlc,
            frame(call_ref(9), MessageType::Alerting, &[]),
            false,
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
}

/// RESTART on the global call reference goes to the global call
#[test]
fn test_global_restart() {
    init_test_logging();
    let dispatcher = nt_dispatcher();
    let mut cc = MockCallControl::new();

    let restart = frame(
        CallReference::global(2),
        MessageType::Restart,
        &[0x79, 0x01, 0x87],
    );
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, restart, true).unwrap();
    assert_eq!(outcome, DispatchOutcome::Global);
    assert_eq!(cc.call_count(), 0);
    assert_eq!(
        cc.events(),
        &[MockEvent::GlobalMessage {
            dlc: TEST_DLC,
            message_type: MessageType::Restart
        }]
    );
}

/// RESTART without its restart indicator is answered with STATUS on the
/// global call reference
#[test]
fn test_global_restart_missing_indicator() {
    let dispatcher = nt_dispatcher();
    let mut cc = MockCallControl::new();

    let restart = frame(CallReference::global(2), MessageType::Restart, &[]);
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, restart, false).unwrap();
    assert!(matches!(outcome, DispatchOutcome::Rejected(_)));

    let cause = single_status(cc.events());
    assert_eq!(cause.value, 100);
    assert_eq!(cause.diagnostics, vec![0x79]);
    match cc.events() {
        [MockEvent::GlobalStatusSent { call_ref, .. }] => {
            assert!(call_ref.is_global());
            assert!(call_ref.flag);
        }
        other => panic!("unexpected events {other:#?}"),
    }
}

/// A frame shorter than a header is dropped without any action
#[test]
fn test_short_frame_dropped() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let err = dispatcher
        .receive_frame(&mut cc, TEST_DLC, bytes::Bytes::from_static(&[0x08, 0x01, 0x07]), false)
        .unwrap_err();
    assert_eq!(
        err,
        ReceiveError::Header(HeaderError::BufferTooShort {
            expected: 4,
            actual: 3
        })
    );
    assert!(cc.events().is_empty());
}

/// RELEASE for an unknown call reference: one RELEASE COMPLETE #81, no call
#[test]
fn test_release_unknown_call_reference() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, frame(call_ref(7), MessageType::Release, &[]), false)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::CallRefRejected);
    assert_eq!(cc.call_count(), 0);

    let cause = single_release_complete(cc.events());
    assert_eq!(cause.value, 81);
    match cc.events() {
        [MockEvent::ReleaseCompleteSent { call_ref, .. }] => {
            assert_eq!(*call_ref, CallReference::new(7, 1, true))
        }
        other => panic!("unexpected events {other:#?}"),
    }
}

/// RELEASE COMPLETE for an unknown call reference is discarded
#[test]
fn test_release_complete_unknown_call_reference() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let outcome = dispatcher
        .receive_frame(
            &mut cc,
            TEST_DLC,
            frame(call_ref(7), MessageType::ReleaseComplete, &CAUSE_NORMAL),
            false,
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Discarded);
    assert!(cc.events().is_empty());
}

/// Other messages for an unknown call reference: RELEASE COMPLETE #81,
/// T308 and release request state on a fresh call
#[test]
fn test_other_message_unknown_call_reference() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let outcome = dispatcher
        .receive_frame(
            &mut cc,
            TEST_DLC,
            frame(call_ref(12), MessageType::Connect, &CHAN_ID_B1),
            false,
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::CallRefRejected);
    assert_eq!(cc.call_count(), 1);

    let call = cc.lookup(TEST_DLC, call_ref(12)).unwrap();
    assert_eq!(single_release_complete(cc.events()).value, 81);
    assert!(cc.events().contains(&MockEvent::TimerStarted {
        call,
        timer: Timer::T308,
        duration: te_config().timers.duration(Timer::T308),
    }));
    assert_eq!(cc.state(call), Some(STATE_RELEASE_REQUEST));
    assert_eq!(delivered_count(cc.events()), 0);
}

/// STATUS for an unknown call reference creates the call like SETUP does
#[test]
fn test_status_unknown_call_reference() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let status = frame(
        call_ref(3),
        MessageType::Status,
        &ies(&[&CAUSE_NORMAL, &CALL_STATE_ACTIVE]),
    );
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, status, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(cc.call_count(), 1);
}

/// Unknown message type: STATUS #97 on an existing call, dropped otherwise
#[test]
fn test_unknown_message_type() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(5));

    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, frame_raw(call_ref(5), 0x7F, &[]), false)
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Rejected(_)));
    match cc.events() {
        [MockEvent::StatusSent { call: target, cause }] => {
            assert_eq!(*target, call);
            assert_eq!(cause.value, 97);
        }
        other => panic!("unexpected events {other:#?}"),
    }

    cc.take_events();
    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, frame_raw(call_ref(6), 0x7F, &[]), false)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Discarded);
    assert!(cc.events().is_empty());
    assert_eq!(cc.call_count(), 1);
}

/// Same frames on the network side of a primary rate interface
#[test]
fn test_nt_setup_two_octet_callref() {
    let dispatcher = nt_dispatcher();
    let mut cc = MockCallControl::new();
    let cr = CallReference::new(0x0101, 2, false);

    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, setup_frame(cr), false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert!(cc.lookup(TEST_DLC, cr).is_some());
}

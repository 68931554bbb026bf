//! Error recovery integration tests
//!
//! Malformed, missing and unknown IEs on received messages, and what the
//! dispatcher answers for each.

use dchan_q931::decoder::MAX_IE_ERRORS;
use dchan_q931::{
    decode_ies, CallReference, CauseIe, CauseValue, DispatchOutcome, IeDirection, MessageType,
    ReceiveError, Recovery, Response,
};
use integration_tests::*;

/// SETUP without bearer capability: RELEASE COMPLETE #100 naming IE 0x04
#[test]
fn test_setup_missing_bearer_capability() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let setup = frame(call_ref(2), MessageType::Setup, &ies(&[&CHAN_ID_B1, &CALLED_1234]));
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, setup, false).unwrap();
    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(Recovery::Respond(Response::ReleaseComplete(_)))
    ));

    let cause = single_release_complete(cc.events());
    assert_eq!(cause.value, 100);
    assert!(cause.diagnostics.contains(&0x04));
    assert_eq!(delivered_count(cc.events()), 0);
}

/// DISCONNECT with an unrecognized comprehension-required IE is still
/// delivered, with cause #99 kept for the RELEASE
#[test]
fn test_disconnect_unrecognized_ie_stashes_cause() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(4));

    let disconnect = frame(
        call_ref(4),
        MessageType::Disconnect,
        &ies(&[&CAUSE_NORMAL, &[0x0F, 0x01, 0x00]]),
    );
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, disconnect, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);

    let stashed = cc.stashed_cause(call).unwrap();
    assert_eq!(stashed.value, 99);
    assert_eq!(stashed.diagnostics, vec![0x0F]);
    assert!(matches!(
        cc.events(),
        [
            MockEvent::ReleaseCauseStashed { .. },
            MockEvent::CallMessage { message_type: MessageType::Disconnect, .. },
        ]
    ));
}

/// An unknown IE that is not comprehension-required is skipped silently
#[test]
fn test_unknown_optional_ie_ignored() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(4));

    let disconnect = frame(
        call_ref(4),
        MessageType::Disconnect,
        &ies(&[&CAUSE_NORMAL, &[0x3F, 0x01, 0x00]]),
    );
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, disconnect, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(cc.events().len(), 1);
}

/// CONNECT with a malformed optional IE: STATUS #100
#[test]
fn test_invalid_optional_ie_answered_with_status() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(8).reply());

    // progress indicator one octet short
    let connect = frame(call_ref(8).reply(), MessageType::Connect, &[0x1E, 0x01, 0x82]);
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, connect, false).unwrap();
    assert!(!matches!(outcome, DispatchOutcome::Call));

    match cc.events() {
        [MockEvent::StatusSent { call: target, cause }] => {
            assert_eq!(*target, call);
            assert_eq!(cause.value, 100);
            assert_eq!(cause.diagnostics, vec![0x1E]);
        }
        other => panic!("unexpected events {other:#?}"),
    }
}

/// RELEASE with an oversized optional IE is dropped without an answer
#[test]
fn test_release_invalid_optional_aborts() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(8));

    let release = frame(
        call_ref(8),
        MessageType::Release,
        &ies(&[&CAUSE_NORMAL, &[0x34, 0x02, 0x01, 0x02]]),
    );
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, release, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected(Recovery::AbortSilently));
    assert!(cc.events().is_empty());
}

/// RELEASE COMPLETE is delivered whatever is wrong with it
#[test]
fn test_release_complete_always_delivered() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(8));

    let release_complete = frame(
        call_ref(8),
        MessageType::ReleaseComplete,
        &[0x08, 0x01, 0x80, 0x0F, 0x01, 0x00],
    );
    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, release_complete, false)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(delivered_count(cc.events()), 1);
}

/// Forty broken Cause IEs in a STATUS: the invalid list stops at its
/// capacity and counts the rest
#[test]
fn test_invalid_ie_list_capacity() {
    let mut data = Vec::new();
    for _ in 0..40 {
        data.extend_from_slice(&[0x08, 0x01, 0x80]);
    }
    data.extend_from_slice(&CALL_STATE_ACTIVE);

    let decoded = decode_ies(MessageType::Status, IeDirection::NetworkToUser, &data).unwrap();
    assert_eq!(decoded.status.invalid_mandatory.len(), MAX_IE_ERRORS);
    assert_eq!(decoded.status.invalid_mandatory.overflow(), 40 - MAX_IE_ERRORS);

    // the dispatcher still answers with a single STATUS
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(1));
    dispatcher
        .receive_frame(&mut cc, TEST_DLC, frame(call_ref(1), MessageType::Status, &data), false)
        .unwrap();
    let cause = single_status(cc.events());
    assert_eq!(cause.value, 100);
    assert!(cause.diagnostics.len() <= 28);
}

/// Non-locking shift: only the next IE belongs to codeset 5
#[test]
fn test_non_locking_shift_routing() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(3));

    // non-locking shift to 5, IE 0x28 in codeset 5, Display in codeset 0
    let info = frame(
        call_ref(3),
        MessageType::Information,
        &[0x95, 0x28, 0x01, b'x', 0x28, 0x02, b'h', b'i'],
    );
    let display = decode_ies(
        MessageType::Information,
        IeDirection::NetworkToUser,
        &[0x28, 0x02, b'h', b'i'],
    )
    .unwrap()
    .ies;
    assert_eq!(display.len(), 1);

    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, info, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(
        cc.events(),
        &[MockEvent::CallMessage {
            call,
            message_type: MessageType::Information,
            ies: display,
        }]
    );
}

/// Locking shift: every following IE belongs to codeset 5
#[test]
fn test_locking_shift_routing() {
    let data = [0x9D, 0x28, 0x01, b'x', 0x28, 0x02, b'h', b'i'];
    let decoded = decode_ies(MessageType::Information, IeDirection::NetworkToUser, &data).unwrap();

    assert!(decoded.ies.is_empty());
    assert_eq!(decoded.other_codesets.len(), 2);
    assert!(decoded.other_codesets.iter().all(|ie| ie.codeset == 5));
    assert_eq!(decoded.status.codeset, 5);
    assert!(decoded.status.is_clean());

    // the call gets the message with no codeset 0 IEs and nothing else happens
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    let call = cc.add_call(TEST_DLC, call_ref(3));
    let outcome = dispatcher
        .receive_frame(&mut cc, TEST_DLC, frame(call_ref(3), MessageType::Information, &data), false)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
    assert_eq!(
        cc.events(),
        &[MockEvent::CallMessage {
            call,
            message_type: MessageType::Information,
            ies: Vec::new(),
        }]
    );
}

/// Undecodable SETUP for an unknown call reference: no call, nothing sent
#[test]
fn test_malformed_setup_creates_no_call() {
    init_test_logging();
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    // bearer capability declares 5 octets, 1 follows
    let setup_ref = call_ref(9);
    let setup = frame(setup_ref, MessageType::Setup, &[0x04, 0x05, 0x80]);
    let err = dispatcher.receive_frame(&mut cc, TEST_DLC, setup, false).unwrap_err();
    assert!(matches!(err, ReceiveError::Decode { call_ref, .. } if call_ref == setup_ref));
    assert!(cc.events().is_empty());
    assert_eq!(cc.call_count(), 0);
    assert!(cc.lookup(TEST_DLC, call_ref(9)).is_none());
}

/// SETUP rejected with RELEASE COMPLETE leaves no call behind
#[test]
fn test_rejected_setup_creates_no_call() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let setup = frame(call_ref(2), MessageType::Setup, &ies(&[&CHAN_ID_B1, &CALLED_1234]));
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, setup, false).unwrap();

    let expected = CauseIe::with_diagnostics(
        CauseValue::InvalidInformationElementContents,
        dispatcher.cause_location(call_ref(2)),
        &[0x04],
    );
    assert_eq!(
        outcome,
        DispatchOutcome::Rejected(Recovery::Respond(Response::ReleaseComplete(expected.clone())))
    );
    assert_eq!(
        cc.events(),
        &[MockEvent::ReleaseCompleteSent {
            dlc: TEST_DLC,
            call_ref: call_ref(2).reply(),
            cause: expected,
        }]
    );
    assert_eq!(cc.call_count(), 0);
}

/// SETUP towards the user without channel identification is rejected
#[test]
fn test_setup_missing_channel_identification() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let setup = frame(call_ref(2), MessageType::Setup, &ies(&[&BEARER_SPEECH, &CALLED_1234]));
    dispatcher.receive_frame(&mut cc, TEST_DLC, setup, false).unwrap();
    let cause = single_release_complete(cc.events());
    assert_eq!(cause.value, 100);
    assert_eq!(cause.diagnostics, vec![0x18]);
    assert_eq!(cc.call_count(), 0);

    // the same SETUP towards the network is fine
    let dispatcher = nt_dispatcher();
    let mut cc = MockCallControl::new();
    let cr = CallReference::new(0x0102, 2, false);
    let setup = frame(cr, MessageType::Setup, &ies(&[&BEARER_SPEECH, &CALLED_1234]));
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, setup, false).unwrap();
    assert_eq!(outcome, DispatchOutcome::Call);
}

/// STATUS without call state for an unknown call reference: the call is
/// created after decoding and answered with STATUS #100
#[test]
fn test_status_missing_call_state_unknown_call_reference() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();

    let status = frame(call_ref(6), MessageType::Status, &CAUSE_NORMAL);
    let outcome = dispatcher.receive_frame(&mut cc, TEST_DLC, status, false).unwrap();

    let call = cc.lookup(TEST_DLC, call_ref(6)).unwrap();
    let expected = CauseIe::with_diagnostics(
        CauseValue::InvalidInformationElementContents,
        dispatcher.cause_location(call_ref(6)),
        &[0x14],
    );
    assert_eq!(
        outcome,
        DispatchOutcome::Rejected(Recovery::Respond(Response::Status(expected.clone())))
    );
    assert_eq!(
        cc.events(),
        &[
            MockEvent::CallCreated {
                call,
                dlc: TEST_DLC,
                call_ref: call_ref(6),
            },
            MockEvent::StatusSent {
                call,
                cause: expected,
            },
        ]
    );
}

/// A truncated IE makes the whole frame undecodable; nothing is sent
#[test]
fn test_truncated_ie_dropped() {
    let dispatcher = te_dispatcher();
    let mut cc = MockCallControl::new();
    cc.add_call(TEST_DLC, call_ref(4));

    let disconnect = frame(call_ref(4), MessageType::Disconnect, &[0x08, 0x05, 0x80, 0x90]);
    let err = dispatcher
        .receive_frame(&mut cc, TEST_DLC, disconnect, false)
        .unwrap_err();
    assert!(matches!(err, ReceiveError::Decode { .. }));
    assert!(cc.events().is_empty());
}

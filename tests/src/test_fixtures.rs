//! Test fixtures and frame builders
//!
//! Interface configurations for both datalink roles and helpers that build
//! Q.931 frames from a call reference, a message type and raw IE octets.

use bytes::Bytes;
use dchan_common::{DatalinkRole, DlcId, InterfaceConfig, NetworkRole};
use dchan_q931::{
    encode_message, CallReference, CauseIe, CauseValue, FrameDispatcher, Ie, Location,
    MessageHeader, MessageType,
};

/// Datalink used by single-link tests
pub const TEST_DLC: DlcId = DlcId(1);

/// Bearer capability: speech, 64 kbit/s circuit mode, G.711 A-law
pub const BEARER_SPEECH: [u8; 5] = [0x04, 0x03, 0x80, 0x90, 0xA3];

/// Channel identification: basic rate, B1 exclusive
pub const CHAN_ID_B1: [u8; 3] = [0x18, 0x01, 0x89];

/// Called party number "1234", unknown type, ISDN plan
pub const CALLED_1234: [u8; 7] = [0x70, 0x05, 0x81, b'1', b'2', b'3', b'4'];

/// Cause #16 normal call clearing, location user
pub const CAUSE_NORMAL: [u8; 4] = [0x08, 0x02, 0x80, 0x90];

/// Call state U10 active
pub const CALL_STATE_ACTIVE: [u8; 3] = [0x14, 0x01, 0x0A];

/// Basic rate terminal side
pub fn te_config() -> InterfaceConfig {
    InterfaceConfig::new("bri-te", DatalinkRole::Te, NetworkRole::User)
}

/// Primary rate network side
pub fn nt_config() -> InterfaceConfig {
    let mut config = InterfaceConfig::new("pri-nt", DatalinkRole::Nt, NetworkRole::PublicNetwork);
    config.call_reference_len = 2;
    config
}

pub fn te_dispatcher() -> FrameDispatcher {
    FrameDispatcher::new(te_config())
}

pub fn nt_dispatcher() -> FrameDispatcher {
    FrameDispatcher::new(nt_config())
}

/// One-octet call reference as sent by the side that allocated it
pub fn call_ref(value: u32) -> CallReference {
    CallReference::new(value, 1, false)
}

/// Frame with a one-octet call reference and the given IE octets
pub fn frame(call_ref: CallReference, message_type: MessageType, ies: &[u8]) -> Bytes {
    frame_raw(call_ref, u8::from(message_type), ies)
}

/// Frame with an arbitrary message type octet
pub fn frame_raw(call_ref: CallReference, message_type: u8, ies: &[u8]) -> Bytes {
    let mut data = vec![0x08, call_ref.len];
    let value = call_ref.value.to_be_bytes();
    data.extend_from_slice(&value[value.len() - usize::from(call_ref.len)..]);
    if call_ref.flag {
        data[2] |= 0x80;
    }
    data.push(message_type);
    data.extend_from_slice(ies);
    Bytes::from(data)
}

/// Concatenate IE octet strings
pub fn ies(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Well-formed SETUP with bearer capability, B1 and called number "1234"
pub fn setup_frame(call_ref: CallReference) -> Bytes {
    frame(
        call_ref,
        MessageType::Setup,
        &ies(&[&BEARER_SPEECH, &CHAN_ID_B1, &CALLED_1234]),
    )
}

/// DISCONNECT encoded through the message encoder
pub fn disconnect_frame(call_ref: CallReference, cause: CauseValue) -> Bytes {
    let header = MessageHeader::new(call_ref, MessageType::Disconnect);
    let cause = CauseIe::new(cause, Location::User);
    match encode_message(&header, &[Ie::Cause(cause)]) {
        Ok(buf) => buf.freeze(),
        Err(e) => panic!("DISCONNECT fixture failed to encode: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_builder_sets_flag() {
        let data = frame(CallReference::new(7, 1, true), MessageType::Connect, &[]);
        assert_eq!(data.as_ref(), &[0x08, 0x01, 0x87, 0x07]);
    }

    #[test]
    fn test_frame_builder_two_octet_callref() {
        let data = frame(CallReference::new(0x0102, 2, false), MessageType::Alerting, &[]);
        assert_eq!(data.as_ref(), &[0x08, 0x02, 0x01, 0x02, 0x01]);
    }

    #[test]
    fn test_disconnect_fixture() {
        let data = disconnect_frame(call_ref(3), CauseValue::NormalCallClearing);
        assert_eq!(data.as_ref(), &[0x08, 0x01, 0x03, 0x45, 0x08, 0x02, 0x80, 0x90]);
    }

    #[test]
    fn test_configs_validate() {
        assert!(te_config().validate().is_ok());
        assert!(nt_config().validate().is_ok());
    }
}

//! Cause value catalog (ITU-T Q.850 Table 1)
//!
//! Maps cause values to their display text and to the fatal/retryable
//! classification the call layer uses when deciding whether a failed call
//! attempt may be repeated (on another channel, route or after a delay).

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Standardized cause values (ITU-T Q.850)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CauseValue {
    // Normal class
    UnallocatedNumber = 1,
    NoRouteToTransitNetwork = 2,
    NoRouteToDestination = 3,
    SendSpecialInformationTone = 4,
    MisdialledTrunkPrefix = 5,
    ChannelUnacceptable = 6,
    CallAwardedInEstablishedChannel = 7,
    Preemption = 8,
    PreemptionCircuitReserved = 9,
    NormalCallClearing = 16,
    UserBusy = 17,
    NoUserResponding = 18,
    NoAnswerFromUser = 19,
    SubscriberAbsent = 20,
    CallRejected = 21,
    NumberChanged = 22,
    NonSelectedUserClearing = 26,
    DestinationOutOfOrder = 27,
    InvalidNumberFormat = 28,
    FacilityRejected = 29,
    ResponseToStatusEnquiry = 30,
    NormalUnspecified = 31,

    // Resource unavailable class
    NoCircuitChannelAvailable = 34,
    NetworkOutOfOrder = 38,
    PermanentFrameModeOutOfService = 39,
    PermanentFrameModeOperational = 40,
    TemporaryFailure = 41,
    SwitchingEquipmentCongestion = 42,
    AccessInformationDiscarded = 43,
    RequestedChannelNotAvailable = 44,
    PrecedenceCallBlocked = 46,
    ResourceUnavailableUnspecified = 47,

    // Service or option not available class
    QualityOfServiceNotAvailable = 49,
    RequestedFacilityNotSubscribed = 50,
    OutgoingCallsBarredWithinCug = 53,
    IncomingCallsBarredWithinCug = 55,
    BearerCapabilityNotAuthorized = 57,
    BearerCapabilityNotPresentlyAvailable = 58,
    InconsistentOutgoingAccessInformation = 62,
    ServiceOrOptionNotAvailable = 63,

    // Service or option not implemented class
    BearerCapabilityNotImplemented = 65,
    ChannelTypeNotImplemented = 66,
    RequestedFacilityNotImplemented = 69,
    OnlyRestrictedDigitalAvailable = 70,
    ServiceOrOptionNotImplemented = 79,

    // Invalid message class
    InvalidCallReferenceValue = 81,
    IdentifiedChannelDoesNotExist = 82,
    SuspendedCallExistsButNotThisIdentity = 83,
    CallIdentityInUse = 84,
    NoCallSuspended = 85,
    CallIdentityCleared = 86,
    UserNotMemberOfCug = 87,
    IncompatibleDestination = 88,
    NonExistentCug = 90,
    InvalidTransitNetworkSelection = 91,
    InvalidMessageUnspecified = 95,

    // Protocol error class
    MandatoryInformationElementMissing = 96,
    MessageTypeNonExistent = 97,
    MessageNotCompatibleWithCallStateOrNonExistent = 98,
    InformationElementNonExistent = 99,
    InvalidInformationElementContents = 100,
    MessageNotCompatibleWithCallState = 101,
    RecoveryOnTimerExpiry = 102,
    ParameterNonExistentPassedOn = 103,
    MessageWithUnrecognizedParameterDiscarded = 110,
    ProtocolErrorUnspecified = 111,

    // Interworking class
    InterworkingUnspecified = 127,
}

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CauseInfo {
    /// Cause value
    pub value: CauseValue,
    /// Display text
    pub name: &'static str,
    /// Retrying the call cannot succeed
    pub fatal: bool,
}

const fn entry(value: CauseValue, name: &'static str, fatal: bool) -> CauseInfo {
    CauseInfo { value, name, fatal }
}

/// Cause catalog, sorted by value
pub static CAUSES: &[CauseInfo] = &[
    entry(CauseValue::UnallocatedNumber, "Unallocated (unassigned) number", true),
    entry(CauseValue::NoRouteToTransitNetwork, "No route to specified transit network", true),
    entry(CauseValue::NoRouteToDestination, "No route to destination", true),
    entry(CauseValue::SendSpecialInformationTone, "Send special information tone", true),
    entry(CauseValue::MisdialledTrunkPrefix, "Misdialled trunk prefix", true),
    entry(CauseValue::ChannelUnacceptable, "Channel unacceptable", false),
    entry(CauseValue::CallAwardedInEstablishedChannel, "Call awarded and being delivered in an established channel", true),
    entry(CauseValue::Preemption, "Preemption", true),
    entry(CauseValue::PreemptionCircuitReserved, "Preemption - circuit reserved for reuse", true),
    entry(CauseValue::NormalCallClearing, "Normal call clearing", true),
    entry(CauseValue::UserBusy, "User busy", true),
    entry(CauseValue::NoUserResponding, "No user responding", true),
    entry(CauseValue::NoAnswerFromUser, "No answer from user (user alerted)", true),
    entry(CauseValue::SubscriberAbsent, "Subscriber absent", true),
    entry(CauseValue::CallRejected, "Call rejected", true),
    entry(CauseValue::NumberChanged, "Number changed", true),
    entry(CauseValue::NonSelectedUserClearing, "Non-selected user clearing", true),
    entry(CauseValue::DestinationOutOfOrder, "Destination out of order", true),
    entry(CauseValue::InvalidNumberFormat, "Invalid number format (address incomplete)", true),
    entry(CauseValue::FacilityRejected, "Facility rejected", true),
    entry(CauseValue::ResponseToStatusEnquiry, "Response to STATUS ENQUIRY", true),
    entry(CauseValue::NormalUnspecified, "Normal, unspecified", true),
    entry(CauseValue::NoCircuitChannelAvailable, "No circuit/channel available", false),
    entry(CauseValue::NetworkOutOfOrder, "Network out of order", false),
    entry(CauseValue::PermanentFrameModeOutOfService, "Permanent frame mode connection out of service", true),
    entry(CauseValue::PermanentFrameModeOperational, "Permanent frame mode connection operational", true),
    entry(CauseValue::TemporaryFailure, "Temporary failure", false),
    entry(CauseValue::SwitchingEquipmentCongestion, "Switching equipment congestion", false),
    entry(CauseValue::AccessInformationDiscarded, "Access information discarded", true),
    entry(CauseValue::RequestedChannelNotAvailable, "Requested circuit/channel not available", false),
    entry(CauseValue::PrecedenceCallBlocked, "Precedence call blocked", true),
    entry(CauseValue::ResourceUnavailableUnspecified, "Resource unavailable, unspecified", false),
    entry(CauseValue::QualityOfServiceNotAvailable, "Quality of service not available", true),
    entry(CauseValue::RequestedFacilityNotSubscribed, "Requested facility not subscribed", true),
    entry(CauseValue::OutgoingCallsBarredWithinCug, "Outgoing calls barred within CUG", true),
    entry(CauseValue::IncomingCallsBarredWithinCug, "Incoming calls barred within CUG", true),
    entry(CauseValue::BearerCapabilityNotAuthorized, "Bearer capability not authorized", true),
    entry(CauseValue::BearerCapabilityNotPresentlyAvailable, "Bearer capability not presently available", false),
    entry(CauseValue::InconsistentOutgoingAccessInformation, "Inconsistency in designated outgoing access information and subscriber class", true),
    entry(CauseValue::ServiceOrOptionNotAvailable, "Service or option not available, unspecified", false),
    entry(CauseValue::BearerCapabilityNotImplemented, "Bearer capability not implemented", true),
    entry(CauseValue::ChannelTypeNotImplemented, "Channel type not implemented", true),
    entry(CauseValue::RequestedFacilityNotImplemented, "Requested facility not implemented", true),
    entry(CauseValue::OnlyRestrictedDigitalAvailable, "Only restricted digital information bearer capability is available", true),
    entry(CauseValue::ServiceOrOptionNotImplemented, "Service or option not implemented, unspecified", true),
    entry(CauseValue::InvalidCallReferenceValue, "Invalid call reference value", true),
    entry(CauseValue::IdentifiedChannelDoesNotExist, "Identified channel does not exist", true),
    entry(CauseValue::SuspendedCallExistsButNotThisIdentity, "A suspended call exists, but this call identity does not", true),
    entry(CauseValue::CallIdentityInUse, "Call identity in use", true),
    entry(CauseValue::NoCallSuspended, "No call suspended", true),
    entry(CauseValue::CallIdentityCleared, "Call having the requested call identity has been cleared", true),
    entry(CauseValue::UserNotMemberOfCug, "User not member of CUG", true),
    entry(CauseValue::IncompatibleDestination, "Incompatible destination", true),
    entry(CauseValue::NonExistentCug, "Non-existent CUG", true),
    entry(CauseValue::InvalidTransitNetworkSelection, "Invalid transit network selection", true),
    entry(CauseValue::InvalidMessageUnspecified, "Invalid message, unspecified", true),
    entry(CauseValue::MandatoryInformationElementMissing, "Mandatory information element is missing", true),
    entry(CauseValue::MessageTypeNonExistent, "Message type non-existent or not implemented", true),
    entry(CauseValue::MessageNotCompatibleWithCallStateOrNonExistent, "Message not compatible with call state or message type non-existent or not implemented", true),
    entry(CauseValue::InformationElementNonExistent, "Information element/parameter non-existent or not implemented", true),
    entry(CauseValue::InvalidInformationElementContents, "Invalid information element contents", true),
    entry(CauseValue::MessageNotCompatibleWithCallState, "Message not compatible with call state", true),
    entry(CauseValue::RecoveryOnTimerExpiry, "Recovery on timer expiry", false),
    entry(CauseValue::ParameterNonExistentPassedOn, "Parameter non-existent or not implemented, passed on", true),
    entry(CauseValue::MessageWithUnrecognizedParameterDiscarded, "Message with unrecognized parameter, discarded", true),
    entry(CauseValue::ProtocolErrorUnspecified, "Protocol error, unspecified", true),
    entry(CauseValue::InterworkingUnspecified, "Interworking, unspecified", true),
];

/// Highest cause value representable in the Cause IE (7 bits)
pub const MAX_CAUSE_VALUE: u16 = 127;

/// Looks up a catalog entry by numeric value.
pub fn lookup(code: u16) -> Option<&'static CauseInfo> {
    if code > MAX_CAUSE_VALUE {
        return None;
    }
    let code = code as u8;
    CAUSES
        .binary_search_by_key(&code, |info| info.value.into())
        .ok()
        .map(|idx| &CAUSES[idx])
}

/// Display text of a cause value, `None` if the value is not in the catalog.
pub fn cause_name(code: u16) -> Option<&'static str> {
    lookup(code).map(|info| info.name)
}

/// Returns true if `code` is a catalogued cause after which the call must not
/// be retried. Values outside the cause range or not catalogued are not fatal.
pub fn is_fatal(code: u16) -> bool {
    lookup(code).is_some_and(|info| info.fatal)
}

impl CauseValue {
    /// Display text from the catalog
    pub fn name(&self) -> &'static str {
        cause_name(u8::from(*self) as u16).unwrap_or("Unknown cause")
    }

    /// Fatal/retryable classification from the catalog
    pub fn is_fatal(&self) -> bool {
        is_fatal(u8::from(*self) as u16)
    }
}

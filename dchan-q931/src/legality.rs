//! Information element legality per message type
//!
//! For every message type, the IEs it may carry, in which direction and
//! whether they are mandatory (ITU-T Q.931 Section 3.1 and 3.4). The table is
//! sorted by (message type, IE identifier) and searched by bisection.

use crate::enums::MessageType;
use crate::ies::IeId;

/// Direction in which an IE may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IeDirection {
    /// Network to user only
    NetworkToUser,
    /// User to network only
    UserToNetwork,
    /// Both directions
    Both,
}

impl IeDirection {
    /// Returns true if an IE legal in `self` may appear in a message
    /// travelling in `direction`
    pub fn allows(&self, direction: IeDirection) -> bool {
        *self == IeDirection::Both || *self == direction
    }
}

/// Whether an IE must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Mandatory,
    /// Mandatory from the network to the user, optional the other way
    MandatoryNetworkToUser,
    Optional,
}

/// One legality table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IeLegality {
    pub message_type: MessageType,
    pub ie_id: u8,
    pub direction: IeDirection,
    pub presence: Presence,
}

impl IeLegality {
    /// Returns true if the IE is mandatory in messages travelling in
    /// `direction`
    pub fn is_mandatory_in(&self, direction: IeDirection) -> bool {
        match self.presence {
            Presence::Mandatory => true,
            Presence::MandatoryNetworkToUser => direction == IeDirection::NetworkToUser,
            Presence::Optional => false,
        }
    }

    fn key(&self) -> (u8, u8) {
        (self.message_type.into(), self.ie_id)
    }
}

const fn entry(
    message_type: MessageType,
    ie: IeId,
    direction: IeDirection,
    presence: Presence,
) -> IeLegality {
    IeLegality {
        message_type,
        ie_id: ie as u8,
        direction,
        presence,
    }
}

use IeDirection::{Both, NetworkToUser as NtoU, UserToNetwork as UtoN};
use MessageType as Mt;
use Presence::{Mandatory as M, MandatoryNetworkToUser as MNtoU, Optional as O};

/// Legality table, sorted by (message type, IE identifier)
pub static IE_LEGALITY: &[IeLegality] = &[
    // ALERTING
    entry(Mt::Alerting, IeId::BearerCapability, Both, O),
    entry(Mt::Alerting, IeId::ChannelIdentification, Both, O),
    entry(Mt::Alerting, IeId::Facility, Both, O),
    entry(Mt::Alerting, IeId::ProgressIndicator, Both, O),
    entry(Mt::Alerting, IeId::Display, NtoU, O),
    entry(Mt::Alerting, IeId::Signal, NtoU, O),
    entry(Mt::Alerting, IeId::HighLayerCompatibility, Both, O),
    entry(Mt::Alerting, IeId::UserUser, Both, O),
    // CALL PROCEEDING
    entry(Mt::CallProceeding, IeId::BearerCapability, Both, O),
    entry(Mt::CallProceeding, IeId::ChannelIdentification, Both, O),
    entry(Mt::CallProceeding, IeId::Facility, Both, O),
    entry(Mt::CallProceeding, IeId::ProgressIndicator, Both, O),
    entry(Mt::CallProceeding, IeId::Display, NtoU, O),
    entry(Mt::CallProceeding, IeId::HighLayerCompatibility, NtoU, O),
    // PROGRESS
    entry(Mt::Progress, IeId::BearerCapability, Both, O),
    entry(Mt::Progress, IeId::Cause, Both, O),
    entry(Mt::Progress, IeId::Facility, Both, O),
    entry(Mt::Progress, IeId::ProgressIndicator, Both, M),
    entry(Mt::Progress, IeId::Display, NtoU, O),
    entry(Mt::Progress, IeId::HighLayerCompatibility, NtoU, O),
    entry(Mt::Progress, IeId::UserUser, NtoU, O),
    // SETUP
    entry(Mt::Setup, IeId::BearerCapability, Both, M),
    entry(Mt::Setup, IeId::ChannelIdentification, Both, MNtoU),
    entry(Mt::Setup, IeId::Facility, Both, O),
    entry(Mt::Setup, IeId::ProgressIndicator, Both, O),
    entry(Mt::Setup, IeId::NetworkSpecificFacilities, Both, O),
    entry(Mt::Setup, IeId::Display, NtoU, O),
    entry(Mt::Setup, IeId::KeypadFacility, UtoN, O),
    entry(Mt::Setup, IeId::Signal, NtoU, O),
    entry(Mt::Setup, IeId::CallingPartyNumber, Both, O),
    entry(Mt::Setup, IeId::CallingPartySubaddress, Both, O),
    entry(Mt::Setup, IeId::CalledPartyNumber, Both, O),
    entry(Mt::Setup, IeId::CalledPartySubaddress, Both, O),
    entry(Mt::Setup, IeId::RedirectingNumber, NtoU, O),
    entry(Mt::Setup, IeId::TransitNetworkSelection, UtoN, O),
    entry(Mt::Setup, IeId::LowLayerCompatibility, Both, O),
    entry(Mt::Setup, IeId::HighLayerCompatibility, Both, O),
    entry(Mt::Setup, IeId::UserUser, Both, O),
    entry(Mt::Setup, IeId::SendingComplete, Both, O),
    entry(Mt::Setup, IeId::RepeatIndicator, Both, O),
    // CONNECT
    entry(Mt::Connect, IeId::BearerCapability, Both, O),
    entry(Mt::Connect, IeId::ChannelIdentification, Both, O),
    entry(Mt::Connect, IeId::Facility, Both, O),
    entry(Mt::Connect, IeId::ProgressIndicator, Both, O),
    entry(Mt::Connect, IeId::Display, NtoU, O),
    entry(Mt::Connect, IeId::DateTime, NtoU, O),
    entry(Mt::Connect, IeId::Signal, NtoU, O),
    entry(Mt::Connect, IeId::ConnectedNumber, Both, O),
    entry(Mt::Connect, IeId::ConnectedSubaddress, Both, O),
    entry(Mt::Connect, IeId::LowLayerCompatibility, Both, O),
    entry(Mt::Connect, IeId::UserUser, Both, O),
    // SETUP ACKNOWLEDGE
    entry(Mt::SetupAcknowledge, IeId::ChannelIdentification, Both, O),
    entry(Mt::SetupAcknowledge, IeId::Facility, Both, O),
    entry(Mt::SetupAcknowledge, IeId::ProgressIndicator, Both, O),
    entry(Mt::SetupAcknowledge, IeId::Display, NtoU, O),
    entry(Mt::SetupAcknowledge, IeId::Signal, NtoU, O),
    // CONNECT ACKNOWLEDGE
    entry(Mt::ConnectAcknowledge, IeId::Facility, Both, O),
    entry(Mt::ConnectAcknowledge, IeId::Display, NtoU, O),
    entry(Mt::ConnectAcknowledge, IeId::Signal, NtoU, O),
    // USER INFORMATION
    entry(Mt::UserInformation, IeId::UserUser, Both, M),
    entry(Mt::UserInformation, IeId::MoreData, Both, O),
    // SUSPEND REJECT
    entry(Mt::SuspendReject, IeId::Cause, NtoU, M),
    entry(Mt::SuspendReject, IeId::Display, NtoU, O),
    // RESUME REJECT
    entry(Mt::ResumeReject, IeId::Cause, NtoU, M),
    entry(Mt::ResumeReject, IeId::Display, NtoU, O),
    // HOLD
    entry(Mt::Hold, IeId::Display, NtoU, O),
    // SUSPEND
    entry(Mt::Suspend, IeId::CallIdentity, UtoN, O),
    // RESUME
    entry(Mt::Resume, IeId::CallIdentity, UtoN, O),
    // HOLD ACKNOWLEDGE
    entry(Mt::HoldAcknowledge, IeId::Display, NtoU, O),
    // SUSPEND ACKNOWLEDGE
    entry(Mt::SuspendAcknowledge, IeId::Display, NtoU, O),
    // RESUME ACKNOWLEDGE
    entry(Mt::ResumeAcknowledge, IeId::ChannelIdentification, NtoU, M),
    entry(Mt::ResumeAcknowledge, IeId::Display, NtoU, O),
    // HOLD REJECT
    entry(Mt::HoldReject, IeId::Cause, Both, M),
    entry(Mt::HoldReject, IeId::Display, NtoU, O),
    // RETRIEVE
    entry(Mt::Retrieve, IeId::ChannelIdentification, Both, O),
    entry(Mt::Retrieve, IeId::Display, NtoU, O),
    // RETRIEVE ACKNOWLEDGE
    entry(Mt::RetrieveAcknowledge, IeId::ChannelIdentification, Both, O),
    entry(Mt::RetrieveAcknowledge, IeId::Display, NtoU, O),
    // RETRIEVE REJECT
    entry(Mt::RetrieveReject, IeId::Cause, Both, M),
    entry(Mt::RetrieveReject, IeId::Display, NtoU, O),
    // DISCONNECT
    entry(Mt::Disconnect, IeId::Cause, Both, M),
    entry(Mt::Disconnect, IeId::Facility, Both, O),
    entry(Mt::Disconnect, IeId::ProgressIndicator, Both, O),
    entry(Mt::Disconnect, IeId::Display, NtoU, O),
    entry(Mt::Disconnect, IeId::Signal, NtoU, O),
    entry(Mt::Disconnect, IeId::UserUser, Both, O),
    // RESTART
    entry(Mt::Restart, IeId::ChannelIdentification, Both, O),
    entry(Mt::Restart, IeId::Display, NtoU, O),
    entry(Mt::Restart, IeId::RestartIndicator, Both, M),
    // RELEASE
    entry(Mt::Release, IeId::Cause, Both, O),
    entry(Mt::Release, IeId::Facility, Both, O),
    entry(Mt::Release, IeId::Display, NtoU, O),
    entry(Mt::Release, IeId::Signal, NtoU, O),
    entry(Mt::Release, IeId::UserUser, Both, O),
    // RESTART ACKNOWLEDGE
    entry(Mt::RestartAcknowledge, IeId::ChannelIdentification, Both, O),
    entry(Mt::RestartAcknowledge, IeId::Display, NtoU, O),
    entry(Mt::RestartAcknowledge, IeId::RestartIndicator, Both, M),
    // RELEASE COMPLETE
    entry(Mt::ReleaseComplete, IeId::Cause, Both, O),
    entry(Mt::ReleaseComplete, IeId::Facility, Both, O),
    entry(Mt::ReleaseComplete, IeId::Display, NtoU, O),
    entry(Mt::ReleaseComplete, IeId::Signal, NtoU, O),
    entry(Mt::ReleaseComplete, IeId::UserUser, Both, O),
    // SEGMENT
    entry(Mt::Segment, IeId::SegmentedMessage, Both, M),
    // FACILITY
    entry(Mt::Facility, IeId::Facility, Both, M),
    entry(Mt::Facility, IeId::Display, NtoU, O),
    // NOTIFY
    entry(Mt::Notify, IeId::BearerCapability, NtoU, O),
    entry(Mt::Notify, IeId::NotificationIndicator, Both, M),
    entry(Mt::Notify, IeId::Display, NtoU, O),
    // STATUS ENQUIRY
    entry(Mt::StatusEnquiry, IeId::Display, NtoU, O),
    // CONGESTION CONTROL
    entry(Mt::CongestionControl, IeId::Cause, Both, M),
    entry(Mt::CongestionControl, IeId::Display, NtoU, O),
    entry(Mt::CongestionControl, IeId::CongestionLevel, Both, M),
    // INFORMATION
    entry(Mt::Information, IeId::Cause, NtoU, O),
    entry(Mt::Information, IeId::Display, NtoU, O),
    entry(Mt::Information, IeId::KeypadFacility, UtoN, O),
    entry(Mt::Information, IeId::Signal, NtoU, O),
    entry(Mt::Information, IeId::CalledPartyNumber, Both, O),
    entry(Mt::Information, IeId::SendingComplete, Both, O),
    // STATUS
    entry(Mt::Status, IeId::Cause, Both, M),
    entry(Mt::Status, IeId::CallState, Both, M),
    entry(Mt::Status, IeId::Display, NtoU, O),
];

/// Looks up the legality of `ie_id` in `message_type`
///
/// # Example
///
/// ```
/// use dchan_q931::enums::MessageType;
/// use dchan_q931::legality::{legality, Presence};
///
/// let entry = legality(MessageType::Setup, 0x04).unwrap();
/// assert_eq!(entry.presence, Presence::Mandatory);
/// assert!(legality(MessageType::Setup, 0x14).is_none());
/// ```
pub fn legality(message_type: MessageType, ie_id: u8) -> Option<&'static IeLegality> {
    let key = (u8::from(message_type), ie_id);
    IE_LEGALITY
        .binary_search_by_key(&key, IeLegality::key)
        .ok()
        .map(|idx| &IE_LEGALITY[idx])
}

/// Every entry of `message_type`, in IE identifier order
pub fn entries(message_type: MessageType) -> &'static [IeLegality] {
    let mt = u8::from(message_type);
    let start = IE_LEGALITY.partition_point(|e| u8::from(e.message_type) < mt);
    let end = IE_LEGALITY.partition_point(|e| u8::from(e.message_type) <= mt);
    &IE_LEGALITY[start..end]
}

/// Identifiers of the IEs mandatory in `message_type` travelling in
/// `direction`
pub fn mandatory_ies(
    message_type: MessageType,
    direction: IeDirection,
) -> impl Iterator<Item = u8> {
    entries(message_type)
        .iter()
        .filter(move |e| e.direction.allows(direction) && e.is_mandatory_in(direction))
        .map(|e| e.ie_id)
}

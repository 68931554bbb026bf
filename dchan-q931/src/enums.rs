//! Q.931 protocol enumerations
//!
//! Based on ITU-T Q.931 Section 4

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Protocol discriminator (ITU-T Q.931 Section 4.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ProtocolDiscriminator {
    /// Q.931/I.451 user-network call control messages
    Q931 = 0x08,
}

/// Q.931 message type (ITU-T Q.931 Section 4.4, Table 4-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    // Call establishment messages
    Alerting = 0x01,
    CallProceeding = 0x02,
    Progress = 0x03,
    Setup = 0x05,
    Connect = 0x07,
    SetupAcknowledge = 0x0D,
    ConnectAcknowledge = 0x0F,

    // Call information phase messages
    UserInformation = 0x20,
    SuspendReject = 0x21,
    ResumeReject = 0x22,
    Hold = 0x24,
    Suspend = 0x25,
    Resume = 0x26,
    HoldAcknowledge = 0x28,
    SuspendAcknowledge = 0x2D,
    ResumeAcknowledge = 0x2E,
    HoldReject = 0x30,
    Retrieve = 0x31,
    RetrieveAcknowledge = 0x33,
    RetrieveReject = 0x37,

    // Call clearing messages
    Disconnect = 0x45,
    Restart = 0x46,
    Release = 0x4D,
    RestartAcknowledge = 0x4E,
    ReleaseComplete = 0x5A,

    // Miscellaneous messages
    Segment = 0x60,
    Facility = 0x62,
    Notify = 0x6E,
    StatusEnquiry = 0x75,
    CongestionControl = 0x79,
    Information = 0x7B,
    Status = 0x7D,
}

impl MessageType {
    /// Upper-case name as used in ITU-T Q.931 and in traces.
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Alerting => "ALERTING",
            MessageType::CallProceeding => "CALL PROCEEDING",
            MessageType::Progress => "PROGRESS",
            MessageType::Setup => "SETUP",
            MessageType::Connect => "CONNECT",
            MessageType::SetupAcknowledge => "SETUP ACKNOWLEDGE",
            MessageType::ConnectAcknowledge => "CONNECT ACKNOWLEDGE",
            MessageType::UserInformation => "USER INFORMATION",
            MessageType::SuspendReject => "SUSPEND REJECT",
            MessageType::ResumeReject => "RESUME REJECT",
            MessageType::Hold => "HOLD",
            MessageType::Suspend => "SUSPEND",
            MessageType::Resume => "RESUME",
            MessageType::HoldAcknowledge => "HOLD ACKNOWLEDGE",
            MessageType::SuspendAcknowledge => "SUSPEND ACKNOWLEDGE",
            MessageType::ResumeAcknowledge => "RESUME ACKNOWLEDGE",
            MessageType::HoldReject => "HOLD REJECT",
            MessageType::Retrieve => "RETRIEVE",
            MessageType::RetrieveAcknowledge => "RETRIEVE ACKNOWLEDGE",
            MessageType::RetrieveReject => "RETRIEVE REJECT",
            MessageType::Disconnect => "DISCONNECT",
            MessageType::Restart => "RESTART",
            MessageType::Release => "RELEASE",
            MessageType::RestartAcknowledge => "RESTART ACKNOWLEDGE",
            MessageType::ReleaseComplete => "RELEASE COMPLETE",
            MessageType::Segment => "SEGMENT",
            MessageType::Facility => "FACILITY",
            MessageType::Notify => "NOTIFY",
            MessageType::StatusEnquiry => "STATUS ENQUIRY",
            MessageType::CongestionControl => "CONGESTION CONTROL",
            MessageType::Information => "INFORMATION",
            MessageType::Status => "STATUS",
        }
    }

    /// Messages that may create a call when received on an unknown call
    /// reference.
    pub fn creates_call(&self) -> bool {
        matches!(
            self,
            MessageType::Setup | MessageType::Resume | MessageType::Status
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side originated the call, seen from the local interface.
///
/// Derived from the call reference flag of a received message: flag 0 means
/// the remote side allocated the call reference (an inbound call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallDirection {
    /// Call originated by the remote side
    Inbound,
    /// Call originated locally
    Outbound,
}

impl CallDirection {
    /// Returns true for inbound calls.
    pub fn is_inbound(&self) -> bool {
        matches!(self, CallDirection::Inbound)
    }
}

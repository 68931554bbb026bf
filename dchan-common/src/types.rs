//! Interface role types shared by the datalink and call-control layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the local side of the D-channel datalink.
///
/// A TE (terminal equipment) interface talks to the network and therefore
/// receives network-to-user messages; an NT (network termination) interface
/// receives user-to-network messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatalinkRole {
    /// Terminal equipment (user side)
    #[default]
    Te,
    /// Network termination (network side)
    Nt,
}

impl DatalinkRole {
    /// Returns true for the network-termination role.
    pub fn is_nt(&self) -> bool {
        matches!(self, DatalinkRole::Nt)
    }
}

impl fmt::Display for DatalinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatalinkRole::Te => write!(f, "TE"),
            DatalinkRole::Nt => write!(f, "NT"),
        }
    }
}

/// Position of this interface in the ISDN network, used to fill the
/// location field of locally generated Cause IEs (ITU-T Q.850 §2.2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRole {
    /// The interface is a user (terminal, PBX line side)
    #[default]
    User,
    /// Private network (PBX)
    PrivateNetwork,
    /// Public network exchange
    PublicNetwork,
    /// Transit network
    TransitNetwork,
    /// International network
    InternationalNetwork,
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkRole::User => write!(f, "user"),
            NetworkRole::PrivateNetwork => write!(f, "private network"),
            NetworkRole::PublicNetwork => write!(f, "public network"),
            NetworkRole::TransitNetwork => write!(f, "transit network"),
            NetworkRole::InternationalNetwork => write!(f, "international network"),
        }
    }
}

/// Signaling variant spoken on the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Plain ITU-T (CCITT) Q.931
    Ccitt,
    /// ETSI EN 300 403 (Euro-ISDN)
    #[default]
    Etsi,
    /// Variant not known
    Unknown,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Ccitt => write!(f, "CCITT"),
            NetworkType::Etsi => write!(f, "ETSI"),
            NetworkType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identifier of a datalink connection (one LAPD TEI/SAPI endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DlcId(pub u16);

impl fmt::Display for DlcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dlc-{}", self.0)
    }
}

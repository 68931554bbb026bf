//! Interface configuration
//!
//! One [`InterfaceConfig`] describes a D-channel interface: which side of the
//! datalink it sits on, its position in the network (used for Cause
//! locations), the signaling variant, the call reference length and the
//! Q.931 timer values handed to the call layer.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{DatalinkRole, NetworkRole, NetworkType};

/// Q.931 call-control timers (ITU-T Q.931 Table 9-1 / 9-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// SETUP sent, waiting for a response
    T303,
    /// DISCONNECT sent, waiting for RELEASE
    T305,
    /// RELEASE sent, waiting for RELEASE COMPLETE (release collision guard)
    T308,
    /// Datalink lost while a call is active
    T309,
    /// CALL PROCEEDING received, waiting for the next message
    T310,
    /// CONNECT sent, waiting for CONNECT ACKNOWLEDGE
    T313,
    /// RESTART sent, waiting for RESTART ACKNOWLEDGE
    T316,
}

/// Timer values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// T303 (default 4 s)
    #[serde(default = "default_t303")]
    pub t303_ms: u64,
    /// T305 (default 30 s)
    #[serde(default = "default_t305")]
    pub t305_ms: u64,
    /// T308 (default 4 s)
    #[serde(default = "default_t308")]
    pub t308_ms: u64,
    /// T309 (default 6 s)
    #[serde(default = "default_t309")]
    pub t309_ms: u64,
    /// T310 (default 30 s)
    #[serde(default = "default_t310")]
    pub t310_ms: u64,
    /// T313 (default 4 s)
    #[serde(default = "default_t313")]
    pub t313_ms: u64,
    /// T316 (default 120 s)
    #[serde(default = "default_t316")]
    pub t316_ms: u64,
}

fn default_t303() -> u64 {
    4_000
}

fn default_t305() -> u64 {
    30_000
}

fn default_t308() -> u64 {
    4_000
}

fn default_t309() -> u64 {
    6_000
}

fn default_t310() -> u64 {
    30_000
}

fn default_t313() -> u64 {
    4_000
}

fn default_t316() -> u64 {
    120_000
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            t303_ms: default_t303(),
            t305_ms: default_t305(),
            t308_ms: default_t308(),
            t309_ms: default_t309(),
            t310_ms: default_t310(),
            t313_ms: default_t313(),
            t316_ms: default_t316(),
        }
    }
}

impl TimerConfig {
    /// Returns the configured duration of a timer.
    pub fn duration(&self, timer: Timer) -> Duration {
        let ms = match timer {
            Timer::T303 => self.t303_ms,
            Timer::T305 => self.t305_ms,
            Timer::T308 => self.t308_ms,
            Timer::T309 => self.t309_ms,
            Timer::T310 => self.t310_ms,
            Timer::T313 => self.t313_ms,
            Timer::T316 => self.t316_ms,
        };
        Duration::from_millis(ms)
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> {
        [
            ("t303", self.t303_ms),
            ("t305", self.t305_ms),
            ("t308", self.t308_ms),
            ("t309", self.t309_ms),
            ("t310", self.t310_ms),
            ("t313", self.t313_ms),
            ("t316", self.t316_ms),
        ]
        .into_iter()
    }
}

/// D-channel interface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Interface name, used in log output
    pub name: String,
    /// Datalink role of the local side
    #[serde(default)]
    pub role: DatalinkRole,
    /// Position of the interface in the network
    #[serde(default)]
    pub network_role: NetworkRole,
    /// Signaling variant
    #[serde(default)]
    pub network_type: NetworkType,
    /// Call reference length in octets (1 on basic rate, 2 on primary rate)
    #[serde(default = "default_call_reference_len")]
    pub call_reference_len: u8,
    /// Call-control timers
    #[serde(default)]
    pub timers: TimerConfig,
}

fn default_call_reference_len() -> u8 {
    1
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            name: String::from("isdn0"),
            role: DatalinkRole::default(),
            network_role: NetworkRole::default(),
            network_type: NetworkType::default(),
            call_reference_len: default_call_reference_len(),
            timers: TimerConfig::default(),
        }
    }
}

impl InterfaceConfig {
    /// Largest call reference length Q.931 allows.
    pub const MAX_CALL_REFERENCE_LEN: u8 = 4;

    /// Creates a configuration with default timers.
    pub fn new(name: impl Into<String>, role: DatalinkRole, network_role: NetworkRole) -> Self {
        Self {
            name: name.into(),
            role,
            network_role,
            ..Default::default()
        }
    }

    /// Checks value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.call_reference_len == 0 || self.call_reference_len > Self::MAX_CALL_REFERENCE_LEN {
            return Err(Error::Config(format!(
                "call_reference_len must be 1..={}, got {}",
                Self::MAX_CALL_REFERENCE_LEN,
                self.call_reference_len
            )));
        }
        if let Some((name, _)) = self.timers.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::Config(format!("timer {name} must be non-zero")));
        }
        Ok(())
    }

    /// Parses and validates an interface configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use dchan_common::InterfaceConfig;
    ///
    /// let yaml = r#"
    /// name: bri0
    /// role: nt
    /// network_role: private_network
    /// "#;
    ///
    /// let config = InterfaceConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.name, "bri0");
    /// assert_eq!(config.call_reference_len, 1);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads an interface configuration from a YAML file.
    ///
    /// # Example
    /// ```no_run
    /// use dchan_common::InterfaceConfig;
    ///
    /// let config = InterfaceConfig::from_yaml_file("config/pri0.yaml").unwrap();
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}

//! Common types and utilities for dchan
//!
//! This crate provides the interface configuration, logging helpers and
//! role types shared by the Q.931 protocol crate and the tools built on it.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{InterfaceConfig, Timer, TimerConfig};
pub use error::Error;
pub use logging::{
    format_hex_compact, format_hex_dump, init_logging, init_logging_with_filter, log_q931_message,
    Direction, HexDump, LogLevel,
};
pub use types::{DatalinkRole, DlcId, NetworkRole, NetworkType};

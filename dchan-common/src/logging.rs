//! Logging setup and D-channel message tracing
//!
//! Log output goes through `tracing`. Frames are logged at debug level as a
//! one-line summary; their raw octets follow at trace level.

use std::fmt::{self, Write as _};

use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level - includes frame hex dumps
    Trace,
    /// Debug level - per-IE decode decisions
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level - malformed frames
    Warn,
    /// Error level
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// Installs the global subscriber at `level`. `RUST_LOG` takes precedence.
///
/// Calling it a second time is harmless: the later call is ignored.
pub fn init_logging(level: LogLevel) {
    init_logging_with_filter(level.as_str());
}

/// Installs the global subscriber with an `EnvFilter` directive string,
/// e.g. `"info,dchan_q931::decoder=debug"`. `RUST_LOG` takes precedence.
pub fn init_logging_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .try_init();
}

/// Direction of a logged frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Received from the datalink
    Rx,
    /// Handed to the datalink
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rx => f.write_str("RX"),
            Direction::Tx => f.write_str("TX"),
        }
    }
}

/// Logs a Q.931 frame summary at debug level and its octets at trace level.
///
/// # Example
///
/// ```
/// use dchan_common::logging::{log_q931_message, Direction};
///
/// let frame = [0x08, 0x01, 0x07, 0x4d];
/// log_q931_message(Direction::Rx, "RELEASE", &frame);
/// ```
pub fn log_q931_message(direction: Direction, msg_type: &str, data: &[u8]) {
    tracing::debug!(
        direction = %direction,
        msg_type = msg_type,
        len = data.len(),
        "{} Q.931 {}",
        direction,
        msg_type
    );
    tracing::trace!(hex = %HexDump(data), "Q.931 frame");
}

/// Formats a byte slice as contiguous lowercase hex.
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Formats bytes as offset / hex / ASCII rows of 16 octets.
///
/// ```
/// use dchan_common::logging::format_hex_dump;
///
/// let dump = format_hex_dump(&[0x08, 0x01, 0x81, 0x45]);
/// assert!(dump.starts_with("00000000  08 01 81 45"));
/// ```
pub fn format_hex_dump(data: &[u8]) -> String {
    if data.is_empty() {
        return String::from("(empty)");
    }

    let mut rows = Vec::with_capacity(data.len().div_ceil(16));
    for (row, chunk) in data.chunks(16).enumerate() {
        let mut line = String::with_capacity(78);
        let _ = write!(line, "{:08x}  ", row * 16);

        for col in 0..16 {
            if col == 8 {
                line.push(' ');
            }
            match chunk.get(col) {
                Some(byte) => {
                    let _ = write!(line, "{byte:02x} ");
                }
                None => line.push_str("   "),
            }
        }

        line.push_str(" |");
        line.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        line.push('|');
        rows.push(line);
    }
    rows.join("\n")
}

/// Formats bytes as hex, optionally grouped by `group_size` octets.
///
/// ```
/// use dchan_common::logging::format_hex_compact;
///
/// assert_eq!(format_hex_compact(&[0x08, 0x02, 0x80, 0x01], 0), "08028001");
/// assert_eq!(format_hex_compact(&[0x08, 0x02, 0x80, 0x01], 1), "08 02 80 01");
/// ```
pub fn format_hex_compact(data: &[u8], group_size: usize) -> String {
    if group_size == 0 {
        return hex::encode(data);
    }
    data.chunks(group_size)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}

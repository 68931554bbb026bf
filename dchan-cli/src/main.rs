//! q931-dump: decode Q.931 frames given as hex
//!
//! Frames come from the command line or, one per line, from a file or
//! standard input. Each frame is decoded the way the frame dispatcher of the
//! configured interface would decode it, and printed with its IEs and the
//! recovery verdict.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use dchan_common::{format_hex_dump, init_logging, DatalinkRole, InterfaceConfig, LogLevel, NetworkRole};
use dchan_q931::decoder::{decode_ies, Recovery};
use dchan_q931::header::MessageHeader;
use dchan_q931::FrameDispatcher;

#[derive(Parser, Debug)]
#[command(name = "q931-dump")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Hex encoded frames, e.g. 0801074d
    #[arg(value_name = "FRAME")]
    pub frames: Vec<String>,

    /// Read frames from a file, one per line ("-" for stdin)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Interface configuration (YAML)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Datalink role of the receiving side, overrides the configuration
    #[arg(short = 'r', long = "role", value_parser = parse_role)]
    pub role: Option<DatalinkRole>,

    /// Print the raw octets of every frame
    #[arg(short = 'x', long = "hex")]
    pub hex: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    pub log_level: LogLevel,
}

fn parse_role(s: &str) -> Result<DatalinkRole, String> {
    match s.to_ascii_lowercase().as_str() {
        "te" | "user" => Ok(DatalinkRole::Te),
        "nt" | "network" => Ok(DatalinkRole::Nt),
        _ => Err(format!("unknown role '{s}', expected te or nt")),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false if any frame failed to decode
fn run() -> Result<bool> {
    let args = Args::parse();
    init_logging(args.log_level);

    let mut config = match &args.config {
        Some(path) => InterfaceConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => InterfaceConfig::new("dump", DatalinkRole::Te, NetworkRole::User),
    };
    if let Some(role) = args.role {
        config.role = role;
    }
    debug!(interface = %config.name, role = %config.role, "Decoding frames");
    let dispatcher = FrameDispatcher::new(config);

    let mut frames = args.frames.clone();
    if let Some(path) = &args.file {
        frames.extend(read_frames(path)?);
    }
    if frames.is_empty() {
        bail!("No frames given. Pass hex frames as arguments or use --file.");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_ok = true;
    for (idx, frame) in frames.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        if let Err(e) = dump_frame(&mut out, &dispatcher, frame, args.hex) {
            writeln!(out, "  error: {:#}", e)?;
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn read_frames(path: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut frames = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read frame")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        frames.push(line.to_string());
    }
    Ok(frames)
}

fn dump_frame<W: Write>(out: &mut W, dispatcher: &FrameDispatcher, frame: &str, show_hex: bool) -> Result<()> {
    let cleaned: String = frame.chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
    let bytes = hex::decode(&cleaned).with_context(|| format!("Invalid hex '{frame}'"))?;

    if show_hex {
        for line in format_hex_dump(&bytes).lines() {
            writeln!(out, "  {line}")?;
        }
    }

    let mut buf = &bytes[..];
    let header = MessageHeader::decode(&mut buf).context("Malformed header")?;
    let Some(message_type) = header.message_type() else {
        writeln!(
            out,
            "UNKNOWN (0x{:02X}) callref={}",
            header.message_type_raw, header.call_ref
        )?;
        return Ok(());
    };
    writeln!(out, "{} callref={}", message_type, header.call_ref)?;

    let decoded = decode_ies(message_type, dispatcher.inbound_direction(), buf)
        .context("Malformed IE stream")?;
    for ie in &decoded.ies {
        writeln!(out, "  {ie}")?;
    }
    for other in &decoded.other_codesets {
        writeln!(
            out,
            "  [codeset {}] IE 0x{:02X}: {}",
            other.codeset,
            other.id,
            hex::encode(&other.data)
        )?;
    }

    let status = &decoded.status;
    for (label, list) in [
        ("invalid mandatory", &status.invalid_mandatory),
        ("invalid optional", &status.invalid_optional),
        ("unrecognized", &status.unrecognized),
    ] {
        if !list.is_empty() {
            writeln!(out, "  {label}: {}", hex::encode(list.as_slice()))?;
        }
    }

    let verdict = match status.recovery(message_type, dispatcher.cause_location(header.call_ref)) {
        Recovery::Proceed => "deliver".to_string(),
        Recovery::Stash(cause) => format!("deliver, stash {cause}"),
        Recovery::Respond(response) => {
            format!("reject with {} ({})", response.message_type(), response.cause())
        }
        Recovery::AbortSilently => "drop".to_string(),
    };
    writeln!(out, "  => {verdict}")?;
    Ok(())
}

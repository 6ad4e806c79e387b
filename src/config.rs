//! Command-line flags and the server configuration built from them.

use std::fmt;

use clap::{Parser, ValueEnum};
use jiff::tz::TimeZone;

use crate::clock::{self, RFC3339, TimeFormatter};
use crate::error::Result;

/// Which protocols the listener accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ServeMode {
    /// Listen for gRPC traffic only (HTTP/2 transport server).
    Grpc,
    /// Listen for both gRPC and plain HTTP traffic on the same port.
    #[default]
    Hybrid,
}

impl fmt::Display for ServeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grpc => f.write_str("grpc"),
            Self::Hybrid => f.write_str("hybrid"),
        }
    }
}

/// Time server
#[derive(Debug, Parser)]
#[command(name = "local-time", version, about = "time server")]
pub struct Args {
    /// Address to listen on
    #[arg(short = 'l', long)]
    pub listen_addr: String,

    /// Time zone of the server
    #[arg(short = 't', long)]
    pub time_zone: String,

    /// grpc: listen for grpc traffic only. hybrid: listen for both grpc and
    /// http traffic on the same port
    #[arg(short = 'm', long, value_enum, default_value_t = ServeMode::Hybrid)]
    pub mode: ServeMode,
}

/// Immutable settings shared by every request handler.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub time_zone: TimeZone,
    pub format: &'static str,
    pub mode: ServeMode,
    pub hostname: String,
}

impl ServerConfig {
    /// Validate parsed flags, resolving the time zone.
    pub fn from_args(args: Args) -> Result<Self> {
        let time_zone = clock::parse_time_zone(&args.time_zone)?;

        Ok(Self {
            listen_addr: args.listen_addr,
            time_zone,
            format: RFC3339,
            mode: args.mode,
            hostname: system_hostname(),
        })
    }

    /// A formatter for this configuration's zone and layout.
    pub fn formatter(&self) -> TimeFormatter {
        TimeFormatter::new(self.time_zone.clone(), self.format)
    }
}

fn system_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

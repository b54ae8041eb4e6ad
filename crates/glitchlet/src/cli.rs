use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "glitchlet", version, about = "Publish uploaded zip archives as static projects")]
pub struct Cli {
    /// TOML settings file. Defaults to ./glitchlet.toml when present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to listen on, overriding server.bind.
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

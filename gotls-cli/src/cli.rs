use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gotls")]
#[command(about = "Decode Go TLS plaintext captured by eBPF uprobes")]
#[command(version)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode raw ring buffer records (one record per file) and print them
    Decode(DecodeArgs),
}

#[derive(Debug, Parser)]
pub struct DecodeArgs {
    /// Files holding one raw record each; reads a single record from stdin when omitted
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Event kind discriminator to decode as
    #[arg(short, long, default_value_t = gotls_event::KIND_GOTLS)]
    pub kind: u32,

    /// Disable ANSI colors in hex dumps
    #[arg(long)]
    pub no_color: bool,

    /// Timestamps were taken with CLOCK_BOOTTIME instead of CLOCK_MONOTONIC
    #[arg(long)]
    pub boot_clock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One summary line per event
    Text,
    /// Summary line followed by a hex/ASCII dump of the payload
    Hex,
    /// Structured JSON record
    Json,
}

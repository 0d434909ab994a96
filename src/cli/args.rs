//! Command-line argument definitions.

use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use netprofile_core::{RateSemantics, TransportKind};

use crate::capture::DEFAULT_FILTERS;
use crate::pipeline::RunOptions;

/// How `avg_pps` is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateArg {
    /// duration / packets (historical output)
    SecondsPerPacket,
    /// packets / duration
    PacketsPerSecond,
}

impl From<RateArg> for RateSemantics {
    fn from(arg: RateArg) -> Self {
        match arg {
            RateArg::SecondsPerPacket => RateSemantics::SecondsPerPacket,
            RateArg::PacketsPerSecond => RateSemantics::PacketsPerSecond,
        }
    }
}

/// Transport the profile is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Tcp,
    Udp,
    Icmp,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Tcp => TransportKind::Tcp,
            TransportArg::Udp => TransportKind::Udp,
            TransportArg::Icmp => TransportKind::Icmp,
        }
    }
}

/// This application calculates a network traffic profile for a specific
/// host from a provided PCAP file.
#[derive(Parser, Debug)]
#[command(name = "netprofile")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PCAP file to read packets from
    #[arg(value_name = "PCAP_FILE")]
    pub pcap_file: PathBuf,

    /// IP address to filter packets for (source or destination)
    #[arg(short = 'i', long = "ip", value_name = "HOST")]
    pub ip: String,

    /// Application to filter packets for
    #[arg(
        short = 'a',
        long = "application",
        value_name = "APP",
        value_parser = PossibleValuesParser::new(DEFAULT_FILTERS.map(|(tag, _)| tag))
    )]
    pub application: Option<String>,

    /// Output file to write to (stdout if omitted)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Program used to narrow the capture
    #[arg(long = "tcpdump", value_name = "PROGRAM", default_value = "tcpdump")]
    pub tcpdump: String,

    /// Meaning of avg_pps. The default reports seconds per packet
    #[arg(long = "rate", value_enum, default_value = "seconds-per-packet")]
    pub rate: RateArg,

    /// Transport the profile counts
    #[arg(long = "transport", value_enum, default_value = "tcp")]
    pub transport: TransportArg,

    /// Count HTTP requests with this method (repeatable)
    #[arg(long = "http-method", value_name = "METHOD")]
    pub http_methods: Vec<String>,

    /// Count DNS queries with this query type number (repeatable)
    #[arg(long = "dns-qtype", value_name = "QTYPE")]
    pub dns_qtypes: Vec<u16>,

    /// Count ICMP messages with this type number (repeatable)
    #[arg(long = "icmp-type", value_name = "TYPE")]
    pub icmp_types: Vec<u8>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Settings for the run.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            transport: self.transport.into(),
            rate: self.rate.into(),
            http_methods: self.http_methods.clone(),
            dns_qtypes: self.dns_qtypes.clone(),
            icmp_types: self.icmp_types.clone(),
        }
    }

    /// Default log filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

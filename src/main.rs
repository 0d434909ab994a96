//! netprofile CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use netprofile_core::RateSemantics;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use netprofile::capture::{FilterTable, TcpdumpSource};
use netprofile::cli::{write_profile, Args, OutputTarget};
use netprofile::pipeline;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let table = FilterTable::default();
    let expression = table
        .build_expression(args.application.as_deref(), &args.ip)
        .context("Failed to build capture filter")?;

    let options = args.run_options();
    if options.rate == RateSemantics::SecondsPerPacket {
        warn!("avg_pps is reported as seconds per packet (duration / packets); use --rate packets-per-second for a true rate");
    }

    let mut source = TcpdumpSource::new(&args.tcpdump, &args.pcap_file, expression);
    let report = pipeline::run(&mut source, &options).with_context(|| {
        format!(
            "Failed to profile {} for host {}",
            args.pcap_file.display(),
            args.ip
        )
    })?;

    let target = OutputTarget::from(args.output.clone());
    write_profile(&report.profile, &target).context("Failed to write profile")?;

    Ok(())
}

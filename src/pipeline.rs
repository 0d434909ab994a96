//! One profiling run: read the narrowed capture, decode it, run the
//! optional application filters and summarise the result.

use netprofile_core::{
    filter_dns, filter_http, filter_icmp, profile, CaptureSource, Frame, FrameDecoder, Profile,
    ProfileConfig, RateSemantics, TransportKind,
};
use tracing::{info, warn};

use crate::error::Result;

/// Settings for a run, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Transport the profile is restricted to.
    pub transport: TransportKind,
    pub rate: RateSemantics,
    /// HTTP request methods to count. Empty disables the filter.
    pub http_methods: Vec<String>,
    /// DNS query types to count. Empty disables the filter.
    pub dns_qtypes: Vec<u16>,
    /// ICMP types to count. Empty disables the filter.
    pub icmp_types: Vec<u8>,
}

impl RunOptions {
    /// The part of the options the profile aggregation needs.
    pub fn profile_config(&self) -> ProfileConfig {
        ProfileConfig {
            transport: self.transport,
            rate: self.rate,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            transport: TransportKind::Tcp,
            rate: RateSemantics::default(),
            http_methods: Vec::new(),
            dns_qtypes: Vec::new(),
            icmp_types: Vec::new(),
        }
    }
}

/// Match counts for the application filters that were enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub http: Option<usize>,
    pub dns: Option<usize>,
    pub icmp: Option<usize>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub profile: Profile,
    pub filters: FilterCounts,
}

/// Read every frame the source produces, then check how the source ended.
///
/// A failed producer wins over a decode error, since a process that died
/// mid-stream usually leaves a truncated capture behind.
pub fn read_frames<S: CaptureSource>(source: &mut S) -> Result<Vec<Frame>> {
    info!(source = %source.describe(), "Starting to read packets.");
    let decoded = source
        .open()
        .and_then(FrameDecoder::open)
        .and_then(|decoder| decoder.collect::<netprofile_core::Result<Vec<_>>>());
    let finished = source.finish();

    match (decoded, finished) {
        (Ok(frames), Ok(())) => Ok(frames),
        (Ok(_), Err(upstream)) => Err(upstream.into()),
        (Err(decode), Err(upstream)) => {
            warn!(error = %decode, "decoding failed before the capture source reported an error");
            Err(upstream.into())
        }
        (Err(decode), Ok(())) => Err(decode.into()),
    }
}

/// Run the enabled application filters over the full frame sequence.
pub fn apply_filters(frames: &[Frame], options: &RunOptions) -> FilterCounts {
    info!("Getting details from packets.");
    let mut counts = FilterCounts::default();

    if !options.http_methods.is_empty() {
        let matched = filter_http(frames, &options.http_methods).len();
        info!(methods = ?options.http_methods, matched, "HTTP request filter");
        counts.http = Some(matched);
    }
    if !options.dns_qtypes.is_empty() {
        let matched = filter_dns(frames, &options.dns_qtypes).len();
        info!(qtypes = ?options.dns_qtypes, matched, "DNS query filter");
        counts.dns = Some(matched);
    }
    if !options.icmp_types.is_empty() {
        let matched = filter_icmp(frames, &options.icmp_types).len();
        info!(types = ?options.icmp_types, matched, "ICMP type filter");
        counts.icmp = Some(matched);
    }

    counts
}

/// Restrict, group into sessions and aggregate.
pub fn summarise(frames: &[Frame], options: &RunOptions) -> Result<Profile> {
    info!(transport = %options.transport, rate = %options.rate, "Analyzing sessions.");
    Ok(profile(frames, &options.profile_config())?)
}

/// Full run over one capture source.
pub fn run<S: CaptureSource>(source: &mut S, options: &RunOptions) -> Result<RunReport> {
    let frames = read_frames(source)?;
    let filters = apply_filters(&frames, options);
    let profile = summarise(&frames, options)?;
    Ok(RunReport { profile, filters })
}

//! Profile aggregation.
//!
//! A [`Profile`] summarises one run: the time span of the restricted frame
//! sequence, how many frames and sessions it holds, and two derived ratios.
//! Timestamps are not assumed to be sorted.

use std::fmt;

use serde::Serialize;

use crate::error::ProfileError;
use crate::frame::{Frame, TransportKind};
use crate::session::SessionTable;

/// Aggregate traffic statistics for one run.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Profile {
    pub start_timestamp: f64,
    pub end_timestamp: f64,
    pub duration_secs: f64,
    pub total_packets: u64,
    pub total_sessions: u64,
    /// Per-packet rate; see [`RateSemantics`] for which way round.
    pub avg_pps: f64,
    pub packets_to_sessions_ratio: f64,
}

impl Profile {
    /// Build a profile from already aggregated values.
    pub fn from_counts(
        start_timestamp: f64,
        end_timestamp: f64,
        total_packets: u64,
        total_sessions: u64,
        rate: RateSemantics,
    ) -> Result<Self, ProfileError> {
        if total_packets == 0 {
            return Err(ProfileError::DivisionByZero { what: "avg_pps" });
        }
        if total_sessions == 0 {
            return Err(ProfileError::DivisionByZero {
                what: "packets_to_sessions_ratio",
            });
        }

        let duration_secs = (end_timestamp - start_timestamp).max(0.0);
        let avg_pps = rate.compute(duration_secs, total_packets)?;

        Ok(Self {
            start_timestamp,
            end_timestamp,
            duration_secs,
            total_packets,
            total_sessions,
            avg_pps,
            packets_to_sessions_ratio: total_packets as f64 / total_sessions as f64,
        })
    }
}

/// How `avg_pps` is computed.
///
/// The historical output divides duration by packet count, which is seconds
/// per packet despite the field name. That stays the default so existing
/// consumers see the same numbers; `PacketsPerSecond` gives the rate the name
/// promises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateSemantics {
    /// `duration_secs / total_packets`.
    #[default]
    SecondsPerPacket,
    /// `total_packets / duration_secs`; a zero duration is an error.
    PacketsPerSecond,
}

impl RateSemantics {
    /// Return a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSemantics::SecondsPerPacket => "seconds-per-packet",
            RateSemantics::PacketsPerSecond => "packets-per-second",
        }
    }

    fn compute(&self, duration_secs: f64, total_packets: u64) -> Result<f64, ProfileError> {
        match self {
            RateSemantics::SecondsPerPacket => Ok(duration_secs / total_packets as f64),
            RateSemantics::PacketsPerSecond if duration_secs == 0.0 => {
                Err(ProfileError::DivisionByZero { what: "avg_pps" })
            }
            RateSemantics::PacketsPerSecond => Ok(total_packets as f64 / duration_secs),
        }
    }
}

impl fmt::Display for RateSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which frames are profiled and how the rate is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Only frames with an IP header and this transport are counted.
    pub transport: TransportKind,
    pub rate: RateSemantics,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Tcp,
            rate: RateSemantics::default(),
        }
    }
}

/// Streaming min/max/count over frame timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAccumulator {
    bounds: Option<(f64, f64)>,
    packets: u64,
}

impl ProfileAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame at `timestamp`.
    pub fn add(&mut self, timestamp: f64) {
        self.bounds = Some(match self.bounds {
            None => (timestamp, timestamp),
            Some((start, end)) => (start.min(timestamp), end.max(timestamp)),
        });
        self.packets += 1;
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    /// Earliest and latest timestamps seen, if any frame was added.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Produce the profile given the number of distinct sessions.
    pub fn finish(&self, total_sessions: u64, rate: RateSemantics) -> Result<Profile, ProfileError> {
        let (start, end) = self.bounds.ok_or(ProfileError::EmptyInput)?;
        Profile::from_counts(start, end, self.packets, total_sessions, rate)
    }
}

impl<'a> Extend<&'a Frame> for ProfileAccumulator {
    fn extend<I: IntoIterator<Item = &'a Frame>>(&mut self, frames: I) {
        for frame in frames {
            self.add(frame.timestamp);
        }
    }
}

/// Frames with an IP header and the given transport, in capture order.
pub fn restrict<'a, I>(frames: I, transport: TransportKind) -> Vec<&'a Frame>
where
    I: IntoIterator<Item = &'a Frame>,
{
    frames
        .into_iter()
        .filter(|frame| frame.is_ip_with(transport))
        .collect()
}

/// Profile an already restricted frame sequence and its session table.
pub fn profile_frames(
    restricted: &[&Frame],
    sessions: &SessionTable<'_>,
    rate: RateSemantics,
) -> Result<Profile, ProfileError> {
    let mut acc = ProfileAccumulator::new();
    acc.extend(restricted.iter().copied());
    acc.finish(sessions.len() as u64, rate)
}

/// Restrict, group into sessions and profile in one call.
pub fn profile(frames: &[Frame], config: &ProfileConfig) -> Result<Profile, ProfileError> {
    let restricted = restrict(frames, config.transport);
    if restricted.is_empty() {
        tracing::debug!(
            frames = frames.len(),
            transport = %config.transport,
            "no frames survive the transport restriction"
        );
        return Err(ProfileError::EmptyInput);
    }

    let sessions = SessionTable::from_frames(restricted.iter().copied());
    profile_frames(&restricted, &sessions, config.rate)
}

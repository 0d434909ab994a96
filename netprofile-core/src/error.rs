//! Error types for netprofile-core.
//!
//! This module provides structured error types for all netprofile-core operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`PcapError`] - Errors from reading the capture container
//! - [`DecodeError`] - Per-frame protocol decoding errors (recoverable)
//! - [`ProfileError`] - Errors from the profile aggregation step
//! - [`SourceError`] - Errors from the process or file feeding the decoder
//!
//! All errors implement `std::error::Error` and can be converted to `anyhow::Error`.

use thiserror::Error;

/// Main error type for netprofile-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing the capture container
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// Error computing the profile
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Error from the capture source
    #[error("Capture source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PCAP file reading.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Invalid PCAP format
    #[error("Invalid PCAP format: {reason}")]
    InvalidFormat { reason: String },
}

/// Errors raised while decoding the layers of a single frame.
///
/// These never abort the frame stream. The decoder keeps the layers it
/// managed to decode and records the error on the frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Packet too short for protocol header
    #[error("{protocol}: packet too short (need {needed} bytes, have {have})")]
    PacketTooShort {
        protocol: &'static str,
        needed: usize,
        have: usize,
    },

    /// Header could not be parsed
    #[error("{protocol}: invalid header: {reason}")]
    InvalidHeader {
        protocol: &'static str,
        reason: String,
    },

    /// Link layer this decoder does not understand
    #[error("Unsupported link type: {link_type}")]
    UnsupportedLinkType { link_type: u16 },
}

/// Errors from the profile aggregation step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// No frame carried a network-layer header (or none survived the
    /// transport restriction), so there are no timestamps to bound.
    #[error("no frames with a network-layer header to profile")]
    EmptyInput,

    /// A ratio had a zero denominator.
    #[error("division by zero computing {what}")]
    DivisionByZero { what: &'static str },
}

/// Errors from the collaborator producing the capture byte stream.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The filtering process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The filtering process exited abnormally.
    #[error("{program} failed ({status}): {diagnostic}")]
    UpstreamProcessFailure {
        program: String,
        status: String,
        diagnostic: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! # netprofile-core
//!
//! Capture decoding, session reconstruction and traffic profiling.
//!
//! This crate turns a pcap or pcapng byte stream into typed frames, groups
//! them into bidirectional sessions and summarises them as a [`Profile`].
//! It never filters captures itself: the byte stream arrives through a
//! [`CaptureSource`], which may already have been narrowed by an external
//! tool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netprofile_core::prelude::*;
//!
//! let mut source = FileCaptureSource::new("capture.pcap");
//! let frames = decode_all(source.open()?)?;
//! source.finish()?;
//!
//! let profile = profile(&frames, &ProfileConfig::default())?;
//! println!("{} packets in {} sessions", profile.total_packets, profile.total_sessions);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        netprofile-core                              |
//! +---------------------------------------------------------------------+
//! |  io/        - CaptureSource, PCAP/PCAPNG stream, gzip               |
//! |  protocol/  - link, IPv4/IPv6, TCP/UDP/ICMP, HTTP, DNS parsers      |
//! |  frame      - typed Frame with optional layers                      |
//! |  decoder    - lazy FrameDecoder iterator                            |
//! |  session    - SessionKey, SessionTable                              |
//! |  filter     - HTTP/DNS/ICMP filters over the Accept trait           |
//! |  profile    - Profile, ProfileAccumulator, RateSemantics            |
//! |  error      - Error types                                           |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Supported Protocols
//!
//! | Layer | Protocols |
//! |-------|-----------|
//! | Link | Ethernet, VLAN (802.1Q/802.1ad), Linux SLL, BSD loopback, raw IP |
//! | Network | IPv4, IPv6 |
//! | Transport | TCP, UDP, ICMP |
//! | Application | HTTP request line, DNS header and questions |

pub mod decoder;
pub mod error;
pub mod filter;
pub mod frame;
pub mod io;
pub mod prelude;
pub mod profile;
pub mod protocol;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use decoder::{decode_all, FrameDecoder};
pub use error::{DecodeError, Error, PcapError, ProfileError, Result, SourceError};
pub use filter::{filter_dns, filter_http, filter_icmp, Accept};
pub use frame::{Endpoint, Frame, Payload, Transport, TransportKind};
pub use io::{CaptureSource, FileCaptureSource, PcapStream, RawPacket, ReaderCaptureSource};
pub use profile::{
    profile, profile_frames, restrict, Profile, ProfileAccumulator, ProfileConfig, RateSemantics,
};
pub use session::{Session, SessionKey, SessionTable};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

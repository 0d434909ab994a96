//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```rust,no_run
//! use netprofile_core::prelude::*;
//!
//! let frames = decode_all(std::fs::File::open("capture.pcap")?)?;
//! let methods = ["GET", "POST"];
//! let requests = filter_http(&frames, &methods);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Frame types
pub use crate::frame::{Endpoint, Frame, Payload, Transport, TransportKind};

// Decoding
pub use crate::decoder::{decode_all, FrameDecoder};

// I/O types
pub use crate::io::{CaptureSource, FileCaptureSource, ReaderCaptureSource};

// Sessions, filters and profiles
pub use crate::filter::{filter_dns, filter_http, filter_icmp, Accept};
pub use crate::profile::{profile, Profile, ProfileConfig, RateSemantics};
pub use crate::session::{SessionKey, SessionTable};

// Error types
pub use crate::error::{Error, Result};

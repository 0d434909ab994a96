//! # netprofile
//!
//! Traffic profile for one host, computed from a capture file.
//!
//! The capture is first narrowed by `tcpdump` to the host (and optionally an
//! application port), then decoded, grouped into sessions and summarised
//! with [`netprofile_core`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use netprofile::capture::{FilterTable, TcpdumpSource};
//! use netprofile::pipeline::{run, RunOptions};
//!
//! let table = FilterTable::default();
//! let expression = table.build_expression(Some("http"), "10.0.0.5")?;
//! let mut source = TcpdumpSource::new("tcpdump", "capture.pcap", expression);
//!
//! let report = run(&mut source, &RunOptions::default())?;
//! println!("{}", netprofile::cli::profile_json(&report.profile)?);
//! # Ok::<(), netprofile::Error>(())
//! ```

pub mod capture;
pub mod cli;
pub mod error;
pub mod pipeline;

pub use error::{Error, FilterError, Result};

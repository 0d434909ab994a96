//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Writing the profile as JSON

mod args;
mod output;

pub use args::{Args, RateArg, TransportArg};
pub use output::{profile_json, write_profile, OutputTarget};

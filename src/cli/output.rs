//! JSON output for a finished profile.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use netprofile_core::Profile;

use crate::error::Result;

/// Where the report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputTarget::Stdout, OutputTarget::File)
    }
}

/// The profile as a two-space indented JSON object, fields in declaration
/// order, without a trailing newline.
pub fn profile_json(profile: &Profile) -> Result<String> {
    let mut buf = Vec::new();
    serde_json::to_writer_pretty(&mut buf, profile)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the profile to a file (no trailing newline) or stdout (with one).
pub fn write_profile(profile: &Profile, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::File(path) => write_file(profile, path),
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, profile)?;
            writeln!(stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn write_file(profile: &Profile, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, profile)?;
    file.flush()?;
    Ok(())
}

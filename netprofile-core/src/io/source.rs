//! Capture source abstraction.
//!
//! A capture source hands out one sequential byte stream holding a pcap or
//! pcapng capture, then reports whether whatever produced those bytes
//! succeeded. The split matters for process-backed sources: the stream can
//! end cleanly even though the producer exited with an error.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, PcapError};

/// Sequential provider of capture bytes.
///
/// Call [`open`](CaptureSource::open) once, read the stream to the end (or
/// drop it), then call [`finish`](CaptureSource::finish).
pub trait CaptureSource {
    /// The byte stream this source produces.
    type Reader: Read + Send + 'static;

    /// Short label for logs and error messages.
    fn describe(&self) -> String;

    /// Start producing bytes.
    fn open(&mut self) -> Result<Self::Reader, Error>;

    /// Wait for the producer and report its outcome.
    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Capture source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileCaptureSource {
    path: PathBuf,
}

impl FileCaptureSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the file.
    pub fn file_path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for FileCaptureSource {
    type Reader = File;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&mut self) -> Result<Self::Reader, Error> {
        File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::Pcap(PcapError::FileNotFound {
                path: self.path.display().to_string(),
            }),
            _ => Error::Io(e),
        })
    }
}

/// Capture source wrapping an existing reader, such as an in-memory buffer.
#[derive(Debug)]
pub struct ReaderCaptureSource<R> {
    reader: Option<R>,
}

impl<R> ReaderCaptureSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: Read + Send + 'static> CaptureSource for ReaderCaptureSource<R> {
    type Reader = R;

    fn describe(&self) -> String {
        "in-memory reader".to_string()
    }

    fn open(&mut self) -> Result<Self::Reader, Error> {
        self.reader
            .take()
            .ok_or_else(|| Error::Io(io::Error::other("capture reader already taken")))
    }
}

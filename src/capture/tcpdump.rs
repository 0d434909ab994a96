//! Capture source that narrows a file through `tcpdump`.
//!
//! The process runs as `tcpdump -r <file> -w - <expression>` and its stdout
//! is the capture stream. Stderr is drained on a helper thread so a chatty
//! process cannot stall on a full pipe; it becomes the diagnostic if the
//! process fails. Whatever the decoder left unread on stdout is discarded
//! before waiting, so a reader that stops early does not kill the process
//! with `SIGPIPE`.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use netprofile_core::{CaptureSource, Error, SourceError};
use tracing::{debug, warn};

/// Runs an external filter program over a capture file.
#[derive(Debug)]
pub struct TcpdumpSource {
    program: String,
    pcap_file: PathBuf,
    expression: String,
    running: Option<Running>,
}

type SharedStdout = Arc<Mutex<ChildStdout>>;

#[derive(Debug)]
struct Running {
    child: Child,
    stdout: SharedStdout,
    stderr: Option<JoinHandle<io::Result<Vec<u8>>>>,
    bytes_read: Arc<AtomicU64>,
}

/// Child stdout that counts the bytes handed to the decoder.
#[derive(Debug)]
pub struct TcpdumpOutput {
    inner: SharedStdout,
    bytes_read: Arc<AtomicU64>,
}

impl Read for TcpdumpOutput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read(buf)?;
        self.bytes_read.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

impl TcpdumpSource {
    pub fn new<P: AsRef<Path>>(
        program: impl Into<String>,
        pcap_file: P,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            pcap_file: pcap_file.as_ref().to_path_buf(),
            expression: expression.into(),
            running: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The command line this source runs.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-r")
            .arg(&self.pcap_file)
            .arg("-w")
            .arg("-")
            .arg(&self.expression);
        cmd
    }

    fn failure(&self, status: String, diagnostic: String) -> Error {
        SourceError::UpstreamProcessFailure {
            program: self.program.clone(),
            status,
            diagnostic,
        }
        .into()
    }
}

impl CaptureSource for TcpdumpSource {
    type Reader = TcpdumpOutput;

    fn describe(&self) -> String {
        format!(
            "{} -r {} -w - {}",
            self.program,
            self.pcap_file.display(),
            self.expression
        )
    }

    fn open(&mut self) -> Result<Self::Reader, Error> {
        if self.running.is_some() {
            return Err(Error::Io(io::Error::other(format!(
                "{} is already running",
                self.program
            ))));
        }

        debug!(command = %self.describe(), "spawning capture filter");
        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });

        let stdout = Arc::new(Mutex::new(stdout));
        let bytes_read = Arc::new(AtomicU64::new(0));
        self.running = Some(Running {
            child,
            stdout: Arc::clone(&stdout),
            stderr,
            bytes_read: Arc::clone(&bytes_read),
        });

        Ok(TcpdumpOutput {
            inner: stdout,
            bytes_read,
        })
    }

    fn finish(&mut self) -> Result<(), Error> {
        let Some(mut running) = self.running.take() else {
            return Ok(());
        };

        let drained = {
            let mut stdout = running
                .stdout
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            io::copy(&mut *stdout, &mut io::sink())
        };
        match drained {
            Ok(0) => {}
            Ok(n) => {
                debug!(bytes = n, "discarded unread capture data");
                running.bytes_read.fetch_add(n, Ordering::Relaxed);
            }
            Err(e) => warn!(error = %e, "failed to drain {} stdout", self.program),
        }

        let status = running.child.wait()?;
        let stderr = match running.stderr.take().map(JoinHandle::join) {
            Some(Ok(Ok(buf))) => buf,
            Some(Ok(Err(e))) => {
                warn!(error = %e, "failed to read {} stderr", self.program);
                Vec::new()
            }
            Some(Err(_)) => {
                warn!("{} stderr reader panicked", self.program);
                Vec::new()
            }
            None => Vec::new(),
        };
        let diagnostic = String::from_utf8_lossy(&stderr).trim().to_string();
        let bytes = running.bytes_read.load(Ordering::Relaxed);
        debug!(%status, bytes, "capture filter exited");

        if !status.success() {
            return Err(self.failure(status.to_string(), diagnostic));
        }
        if bytes == 0 {
            let diagnostic = if diagnostic.is_empty() {
                "no capture data on stdout".to_string()
            } else {
                diagnostic
            };
            return Err(self.failure(status.to_string(), diagnostic));
        }
        Ok(())
    }
}

//! Capture input: container parsing, compression, and byte sources.

mod decompress;
mod pcap_stream;
mod source;

pub use decompress::{Compression, GZIP_MAGIC};
pub use pcap_stream::{PcapFormat, PcapStream, RawPacket};
pub use source::{CaptureSource, FileCaptureSource, ReaderCaptureSource};

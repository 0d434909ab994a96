//! Frame decoder: capture bytes in, typed frames out.
//!
//! [`FrameDecoder`] is a lazy iterator. Each call pulls one record from the
//! container and decodes it, so memory use does not depend on capture size
//! until the caller decides to collect.

use std::io::Read;

use crate::error::Result;
use crate::frame::Frame;
use crate::io::{PcapFormat, PcapStream};
use crate::protocol;

/// Lazy iterator of decoded frames in capture order.
pub struct FrameDecoder {
    stream: PcapStream,
    frames: u64,
    decode_errors: u64,
    network_frames: u64,
}

impl FrameDecoder {
    /// Wrap an already opened capture stream.
    pub fn new(stream: PcapStream) -> Self {
        Self {
            stream,
            frames: 0,
            decode_errors: 0,
            network_frames: 0,
        }
    }

    /// Open a capture from any byte stream.
    pub fn open<R: Read + Send + 'static>(reader: R) -> Result<Self> {
        Ok(Self::new(PcapStream::open(reader)?))
    }

    /// Container format of the underlying capture.
    pub fn format(&self) -> PcapFormat {
        self.stream.format()
    }

    /// Frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames produced so far that carried an IP header.
    pub fn network_frames(&self) -> u64 {
        self.network_frames
    }

    /// Frames produced so far whose decoding stopped early.
    pub fn decode_errors(&self) -> u64 {
        self.decode_errors
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` at end of capture. Only container-level corruption
    /// is an error; malformed layers are recorded on the frame.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(packet) = self.stream.next_packet()? else {
            tracing::debug!(
                frames = self.frames,
                network_frames = self.network_frames,
                decode_errors = self.decode_errors,
                "end of capture"
            );
            return Ok(None);
        };

        if packet.is_truncated() {
            tracing::trace!(
                frame = packet.frame_number,
                captured = packet.captured_len,
                original = packet.original_len,
                "frame truncated by snaplen"
            );
        }

        let frame = protocol::decode_packet(&packet);
        self.frames += 1;
        if frame.has_network() {
            self.network_frames += 1;
        }
        if frame.decode_error.is_some() {
            self.decode_errors += 1;
        }
        Ok(Some(frame))
    }
}

impl Iterator for FrameDecoder {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

/// Decode a whole capture into memory.
pub fn decode_all<R: Read + Send + 'static>(reader: R) -> Result<Vec<Frame>> {
    FrameDecoder::open(reader)?.collect()
}

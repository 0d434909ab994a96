//! PCAP/PCAPNG reader over any `Read` source.
//!
//! The capture usually arrives through a pipe from the filtering process, so
//! the reader never seeks: it sniffs the first four bytes for compression and
//! format, then stitches them back in front of the remaining stream.
//!
//! ## Usage
//!
//! ```ignore
//! let file = File::open("capture.pcap")?;
//! let mut reader = PcapStream::open(file)?;
//! while let Some(packet) = reader.next_packet()? {
//!     println!("frame {} at {}", packet.frame_number, packet.timestamp);
//! }
//! ```

use std::io::{BufReader, Cursor, Read};

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError as ParserError, PcapNGReader};

use super::decompress::Compression;
use crate::error::{Error, PcapError};

/// Buffer size for pcap_parser readers. Must hold the largest record, and
/// tcpdump's default snaplen is 262144.
const BUFFER_SIZE: usize = 524288;

/// Link type assumed until a header says otherwise.
const DEFAULT_LINK_TYPE: u16 = 1;

type BoxedRead = Box<dyn Read + Send>;

/// A raw frame from the capture container.
#[derive(Debug, Clone)]
pub struct RawPacket {
    /// Frame number (1-indexed).
    pub frame_number: u64,
    /// Timestamp in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Captured length (may be less than original).
    pub captured_len: u32,
    /// Original packet length on the wire.
    pub original_len: u32,
    /// Link layer type (e.g., 1 = Ethernet).
    pub link_type: u16,
    /// Packet data.
    pub data: Vec<u8>,
}

impl RawPacket {
    /// Check if the packet was truncated during capture.
    pub fn is_truncated(&self) -> bool {
        self.captured_len < self.original_len
    }
}

/// Format of the PCAP stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcapFormat {
    /// Classic PCAP (little-endian, microseconds)
    LegacyLeMicro,
    /// Classic PCAP (big-endian, microseconds)
    LegacyBeMicro,
    /// Classic PCAP (little-endian, nanoseconds)
    LegacyLeNano,
    /// Classic PCAP (big-endian, nanoseconds)
    LegacyBeNano,
    /// PCAPNG format
    PcapNg,
}

impl PcapFormat {
    /// Detect PCAP format from magic bytes.
    pub fn detect(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::Pcap(PcapError::InvalidFormat {
                reason: "Data too small for PCAP magic".into(),
            }));
        }

        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

        match magic {
            0xa1b2c3d4 => Ok(PcapFormat::LegacyLeMicro),
            0xd4c3b2a1 => Ok(PcapFormat::LegacyBeMicro),
            0xa1b23c4d => Ok(PcapFormat::LegacyLeNano),
            0x4d3cb2a1 => Ok(PcapFormat::LegacyBeNano),
            0x0a0d0d0a => Ok(PcapFormat::PcapNg),
            _ => Err(Error::Pcap(PcapError::InvalidFormat {
                reason: format!("Unknown PCAP magic: 0x{magic:08x}"),
            })),
        }
    }

    /// Whether this is a PCAPNG format.
    pub fn is_pcapng(&self) -> bool {
        matches!(self, PcapFormat::PcapNg)
    }

    /// Fractional-second units per second for legacy records.
    fn legacy_units(&self) -> f64 {
        match self {
            PcapFormat::LegacyLeNano | PcapFormat::LegacyBeNano => 1e9,
            _ => 1e6,
        }
    }
}

/// Per-interface state from a PCAPNG Interface Description Block.
#[derive(Debug, Clone, Copy)]
struct Interface {
    link_type: u16,
    units_per_sec: u64,
    ts_offset: i64,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            link_type: DEFAULT_LINK_TYPE,
            units_per_sec: 1_000_000,
            ts_offset: 0,
        }
    }
}

impl Interface {
    fn timestamp(&self, ts_high: u32, ts_low: u32) -> f64 {
        let ts = ((ts_high as u64) << 32) | (ts_low as u64);
        let secs = ((ts / self.units_per_sec) as i64).saturating_add(self.ts_offset);
        let frac = (ts % self.units_per_sec) as f64 / self.units_per_sec as f64;
        secs as f64 + frac
    }
}

/// Decode `if_tsresol`: MSB clear means a power of ten, set means a power of two.
fn ts_resolution(if_tsresol: u8) -> u64 {
    let exp = (if_tsresol & 0x7f) as u32;
    let units = if if_tsresol & 0x80 == 0 {
        10u64.checked_pow(exp)
    } else {
        2u64.checked_pow(exp)
    };
    units.filter(|u| *u > 0).unwrap_or(1_000_000)
}

enum ReaderInner {
    Legacy(LegacyPcapReader<BufReader<BoxedRead>>),
    Ng(PcapNGReader<BufReader<BoxedRead>>),
}

/// Streaming PCAP/PCAPNG reader with transparent gzip support.
pub struct PcapStream {
    inner: ReaderInner,
    format: PcapFormat,
    compression: Compression,
    frame_number: u64,
    link_type: u16,
    interfaces: Vec<Interface>,
}

impl PcapStream {
    /// Open a capture stream, detecting compression and format.
    pub fn open<R: Read + Send + 'static>(source: R) -> Result<Self, Error> {
        let (magic, source) = sniff(Box::new(source))?;
        let compression = Compression::detect(&magic);

        let (magic, source) = if compression.is_compressed() {
            sniff(compression.decoder(source))?
        } else {
            (magic, source)
        };

        let format = PcapFormat::detect(&magic)?;
        let buf_reader = BufReader::with_capacity(BUFFER_SIZE, source);

        let inner = if format.is_pcapng() {
            let reader = PcapNGReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse PCAPNG: {e}"),
                })
            })?;
            ReaderInner::Ng(reader)
        } else {
            let reader = LegacyPcapReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse legacy PCAP: {e}"),
                })
            })?;
            ReaderInner::Legacy(reader)
        };

        tracing::debug!(?format, %compression, "opened capture stream");

        Ok(Self {
            inner,
            format,
            compression,
            frame_number: 0,
            link_type: DEFAULT_LINK_TYPE,
            interfaces: Vec::new(),
        })
    }

    /// Get the detected container format.
    pub fn format(&self) -> PcapFormat {
        self.format
    }

    /// Get the detected compression.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` at end of stream. A record cut short by the end of
    /// the stream is logged and treated as end of stream.
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        match &mut self.inner {
            ReaderInner::Legacy(reader) => read_legacy_packet(
                reader,
                self.format,
                &mut self.frame_number,
                &mut self.link_type,
            ),
            ReaderInner::Ng(reader) => {
                read_pcapng_packet(reader, &mut self.frame_number, &mut self.interfaces)
            }
        }
    }
}

impl Iterator for PcapStream {
    type Item = Result<RawPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

/// Read the first four bytes and chain them back in front of the stream.
fn sniff(mut source: BoxedRead) -> Result<([u8; 4], BoxedRead), Error> {
    let mut magic = [0u8; 4];
    source.read_exact(&mut magic).map_err(|e| {
        Error::Pcap(PcapError::InvalidFormat {
            reason: format!("Capture stream too short to read magic number: {e}"),
        })
    })?;
    let rejoined: BoxedRead = Box::new(Cursor::new(magic).chain(source));
    Ok((magic, rejoined))
}

fn parse_error(e: impl std::fmt::Display) -> Error {
    Error::Pcap(PcapError::InvalidFormat {
        reason: format!("Parse error: {e}"),
    })
}

fn refill_error(e: impl std::fmt::Display) -> Error {
    Error::Pcap(PcapError::InvalidFormat {
        reason: format!("Refill error: {e}"),
    })
}

/// Read next packet from a legacy PCAP reader.
fn read_legacy_packet<S: Read>(
    reader: &mut LegacyPcapReader<S>,
    format: PcapFormat,
    frame_number: &mut u64,
    link_type: &mut u16,
) -> Result<Option<RawPacket>, Error> {
    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::Legacy(packet) => {
                    *frame_number += 1;

                    let timestamp =
                        packet.ts_sec as f64 + packet.ts_usec as f64 / format.legacy_units();

                    let raw = RawPacket {
                        frame_number: *frame_number,
                        timestamp,
                        captured_len: packet.caplen,
                        original_len: packet.origlen,
                        link_type: *link_type,
                        data: packet.data.to_vec(),
                    };

                    reader.consume(offset);
                    return Ok(Some(raw));
                }
                PcapBlockOwned::LegacyHeader(header) => {
                    *link_type = header.network.0 as u16;
                    reader.consume(offset);
                }
                _ => reader.consume(offset),
            },
            Err(ParserError::Eof) => return Ok(None),
            Err(ParserError::UnexpectedEof) => {
                tracing::warn!(frame = *frame_number + 1, "capture ends mid-record, stopping");
                return Ok(None);
            }
            Err(ParserError::Incomplete(_)) => {
                reader.refill().map_err(refill_error)?;
            }
            Err(e) => return Err(parse_error(e)),
        }
    }
}

/// Read next packet from a PCAPNG reader.
fn read_pcapng_packet<S: Read>(
    reader: &mut PcapNGReader<S>,
    frame_number: &mut u64,
    interfaces: &mut Vec<Interface>,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::pcapng::Block;

    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                    // Interface ids are scoped to their section.
                    interfaces.clear();
                    reader.consume(offset);
                }
                PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                    interfaces.push(Interface {
                        link_type: idb.linktype.0 as u16,
                        units_per_sec: ts_resolution(idb.if_tsresol),
                        ts_offset: idb.if_tsoffset as i64,
                    });
                    reader.consume(offset);
                }
                PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => {
                    *frame_number += 1;

                    let iface = interfaces
                        .get(epb.if_id as usize)
                        .copied()
                        .unwrap_or_default();

                    let raw = RawPacket {
                        frame_number: *frame_number,
                        timestamp: iface.timestamp(epb.ts_high, epb.ts_low),
                        captured_len: epb.caplen,
                        original_len: epb.origlen,
                        link_type: iface.link_type,
                        data: epb.data.to_vec(),
                    };

                    reader.consume(offset);
                    return Ok(Some(raw));
                }
                PcapBlockOwned::NG(Block::SimplePacket(spb)) => {
                    *frame_number += 1;

                    let iface = interfaces.first().copied().unwrap_or_default();

                    let raw = RawPacket {
                        frame_number: *frame_number,
                        timestamp: 0.0, // No timestamp in simple packets
                        captured_len: spb.data.len() as u32,
                        original_len: spb.origlen,
                        link_type: iface.link_type,
                        data: spb.data.to_vec(),
                    };

                    reader.consume(offset);
                    return Ok(Some(raw));
                }
                _ => reader.consume(offset),
            },
            Err(ParserError::Eof) => return Ok(None),
            Err(ParserError::UnexpectedEof) => {
                tracing::warn!(frame = *frame_number + 1, "capture ends mid-block, stopping");
                return Ok(None);
            }
            Err(ParserError::Incomplete(_)) => {
                reader.refill().map_err(refill_error)?;
            }
            Err(e) => return Err(parse_error(e)),
        }
    }
}

//! DNS protocol parser.
//!
//! Decodes the fixed header and as many question records as the payload
//! holds. Answer, authority and additional sections are not decoded.

use smallvec::SmallVec;

use crate::error::DecodeError;
use crate::frame::{DnsMessage, DnsQuestion};

/// DNS well-known port.
pub const DNS_PORT: u16 = 53;

/// DNS header is 12 bytes.
const DNS_HEADER_LEN: usize = 12;

/// Longest label allowed by RFC 1035.
const MAX_LABEL_LEN: usize = 63;

/// Query type constants.
pub mod qtype {
    pub const A: u16 = 1;
    pub const NS: u16 = 2;
    pub const CNAME: u16 = 5;
    pub const SOA: u16 = 6;
    pub const PTR: u16 = 12;
    pub const MX: u16 = 15;
    pub const TXT: u16 = 16;
    pub const AAAA: u16 = 28;
    pub const SRV: u16 = 33;
    pub const ANY: u16 = 255;
}

/// Check whether either port is the DNS port.
pub fn is_dns_port(src_port: u16, dst_port: u16) -> bool {
    src_port == DNS_PORT || dst_port == DNS_PORT
}

/// Parse a DNS message header and its question section.
///
/// A question that runs past the end of the payload stops question decoding
/// without failing the message; the header fields are still returned.
pub fn parse(data: &[u8]) -> Result<DnsMessage, DecodeError> {
    if data.len() < DNS_HEADER_LEN {
        return Err(DecodeError::PacketTooShort {
            protocol: "dns",
            needed: DNS_HEADER_LEN,
            have: data.len(),
        });
    }

    let id = u16::from_be_bytes([data[0], data[1]]);
    let flags = u16::from_be_bytes([data[2], data[3]]);
    let query_count = u16::from_be_bytes([data[4], data[5]]);

    let mut questions = SmallVec::new();
    let mut offset = DNS_HEADER_LEN;
    for _ in 0..query_count {
        match parse_question(&data[offset..]) {
            Ok((question, consumed)) => {
                questions.push(question);
                offset += consumed;
            }
            Err(reason) => {
                tracing::trace!(id, %reason, "stopping DNS question decoding");
                break;
            }
        }
    }

    Ok(DnsMessage {
        id,
        qr: (flags >> 15) as u8,
        opcode: ((flags >> 11) & 0x0F) as u8,
        rcode: (flags & 0x000F) as u8,
        questions,
    })
}

/// Parse one question record. Returns the record and the bytes consumed.
fn parse_question(data: &[u8]) -> Result<(DnsQuestion, usize), String> {
    let (name, name_len) = parse_domain_name(data)?;

    if data.len() < name_len + 4 {
        return Err("question section too short for QTYPE/QCLASS".to_string());
    }

    let qtype = u16::from_be_bytes([data[name_len], data[name_len + 1]]);
    let qclass = u16::from_be_bytes([data[name_len + 2], data[name_len + 3]]);

    Ok((DnsQuestion { name, qtype, qclass }, name_len + 4))
}

/// Parse a domain name. Returns the dotted name and the bytes consumed.
///
/// Compression pointers end the name; the pointed-to suffix is not followed.
fn parse_domain_name(data: &[u8]) -> Result<(String, usize), String> {
    let mut labels: SmallVec<[String; 4]> = SmallVec::new();
    let mut pos = 0;

    loop {
        let len = *data
            .get(pos)
            .ok_or_else(|| "unexpected end of data in domain name".to_string())?
            as usize;

        if len == 0 {
            pos += 1;
            break;
        }

        if len & 0xC0 == 0xC0 {
            if pos + 2 > data.len() {
                return Err("truncated compression pointer".to_string());
            }
            pos += 2;
            break;
        }

        if len > MAX_LABEL_LEN {
            return Err(format!("invalid label length: {len}"));
        }

        let label = data
            .get(pos + 1..pos + 1 + len)
            .ok_or_else(|| "label extends beyond data".to_string())?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += 1 + len;
    }

    Ok((labels.join("."), pos))
}

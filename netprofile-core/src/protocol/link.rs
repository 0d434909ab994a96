//! Link-layer dispatch.
//!
//! Maps a capture link type to the EtherType of the network layer and the
//! bytes that follow the link header. Ethernet lives in its own module; the
//! small headers (Linux cooked, BSD loopback, raw IP) are handled here.

use super::ethernet::{self, ethertype, LINKTYPE_ETHERNET};
use crate::error::DecodeError;

/// BSD loopback encapsulation (4-byte address family, host byte order).
pub const LINKTYPE_NULL: u16 = 0;
/// Raw IP, BSD/OpenBSD numbering.
pub const LINKTYPE_RAW_BSD: u16 = 12;
/// Raw IP, alternate BSD numbering.
pub const LINKTYPE_RAW_ALT: u16 = 14;
/// Raw IPv4 or IPv6 without a link header.
pub const LINKTYPE_RAW: u16 = 101;
/// Linux cooked capture ("any" interface).
pub const LINKTYPE_LINUX_SLL: u16 = 113;
/// Raw IPv4 only.
pub const LINKTYPE_IPV4: u16 = 228;
/// Raw IPv6 only.
pub const LINKTYPE_IPV6: u16 = 229;

/// Linux SLL header length in bytes.
pub const LINUX_SLL_HEADER_LEN: usize = 16;

/// BSD loopback header length in bytes.
const NULL_HEADER_LEN: usize = 4;

/// Address family values seen in BSD loopback headers.
mod af {
    pub const INET: u32 = 2;
    /// AF_INET6 differs between BSD flavours.
    pub const INET6: [u32; 3] = [10, 24, 28];
    pub const INET6_DARWIN: u32 = 30;
}

/// Strip the link header for `link_type` and report the network EtherType.
pub fn parse(link_type: u16, data: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    match link_type {
        LINKTYPE_ETHERNET => ethernet::parse(data),
        LINKTYPE_LINUX_SLL => parse_linux_sll(data),
        LINKTYPE_NULL => parse_null(data),
        LINKTYPE_RAW | LINKTYPE_RAW_BSD | LINKTYPE_RAW_ALT => Ok((raw_ip_ethertype(data)?, data)),
        LINKTYPE_IPV4 => Ok((ethertype::IPV4, data)),
        LINKTYPE_IPV6 => Ok((ethertype::IPV6, data)),
        other => Err(DecodeError::UnsupportedLinkType { link_type: other }),
    }
}

/// Linux cooked capture: the protocol field at offset 14 is an EtherType.
fn parse_linux_sll(data: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    if data.len() < LINUX_SLL_HEADER_LEN {
        return Err(DecodeError::PacketTooShort {
            protocol: "linux_sll",
            needed: LINUX_SLL_HEADER_LEN,
            have: data.len(),
        });
    }
    let protocol = u16::from_be_bytes([data[14], data[15]]);
    Ok((protocol, &data[LINUX_SLL_HEADER_LEN..]))
}

/// BSD loopback: the family is in the capturing host's byte order.
fn parse_null(data: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    if data.len() < NULL_HEADER_LEN {
        return Err(DecodeError::PacketTooShort {
            protocol: "null",
            needed: NULL_HEADER_LEN,
            have: data.len(),
        });
    }
    let bytes = [data[0], data[1], data[2], data[3]];
    let le = u32::from_le_bytes(bytes);
    let family = if le > 0xffff { u32::from_be_bytes(bytes) } else { le };

    let ether_type = match family {
        af::INET => ethertype::IPV4,
        f if af::INET6.contains(&f) || f == af::INET6_DARWIN => ethertype::IPV6,
        _ => 0,
    };
    Ok((ether_type, &data[NULL_HEADER_LEN..]))
}

/// Raw IP: the version nibble decides between IPv4 and IPv6.
fn raw_ip_ethertype(data: &[u8]) -> Result<u16, DecodeError> {
    match data.first().map(|b| b >> 4) {
        Some(4) => Ok(ethertype::IPV4),
        Some(6) => Ok(ethertype::IPV6),
        Some(v) => Err(DecodeError::InvalidHeader {
            protocol: "raw_ip",
            reason: format!("unknown IP version {v}"),
        }),
        None => Err(DecodeError::PacketTooShort {
            protocol: "raw_ip",
            needed: 1,
            have: 0,
        }),
    }
}

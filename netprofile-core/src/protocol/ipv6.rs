//! IPv6 protocol parser.
//!
//! Only the fixed header is decoded. Packets whose next header is an
//! extension header report that header's number as the protocol, so they
//! carry a network layer but no transport.

use std::net::IpAddr;

use etherparse::Ipv6HeaderSlice;

use super::IpPacket;
use crate::error::DecodeError;
use crate::frame::NetworkHeader;

/// IPv6 fixed header length.
pub const IPV6_HEADER_LEN: usize = 40;

/// Parse an IPv6 fixed header.
pub fn parse(data: &[u8]) -> Result<IpPacket<'_>, DecodeError> {
    let ipv6 = Ipv6HeaderSlice::from_slice(data).map_err(|e| DecodeError::InvalidHeader {
        protocol: "ipv6",
        reason: e.to_string(),
    })?;

    let end = (IPV6_HEADER_LEN + ipv6.payload_length() as usize).min(data.len());

    Ok(IpPacket {
        header: NetworkHeader {
            src: IpAddr::V6(ipv6.source_addr()),
            dst: IpAddr::V6(ipv6.destination_addr()),
            protocol: ipv6.next_header().0,
        },
        payload: &data[IPV6_HEADER_LEN..end],
        is_later_fragment: false,
    })
}

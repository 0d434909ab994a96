//! IPv4 protocol parser.

use std::net::IpAddr;

use etherparse::Ipv4HeaderSlice;

use super::IpPacket;
use crate::error::DecodeError;
use crate::frame::NetworkHeader;

/// Parse an IPv4 header.
///
/// The payload is trimmed to the header's total length so that Ethernet
/// padding never reaches the transport parsers. Snaplen truncation is
/// tolerated: the payload then ends where the captured bytes end.
pub fn parse(data: &[u8]) -> Result<IpPacket<'_>, DecodeError> {
    let ipv4 = Ipv4HeaderSlice::from_slice(data).map_err(|e| DecodeError::InvalidHeader {
        protocol: "ipv4",
        reason: e.to_string(),
    })?;

    let header_len = ipv4.slice().len();
    let end = (ipv4.total_len() as usize).clamp(header_len, data.len());

    Ok(IpPacket {
        header: NetworkHeader {
            src: IpAddr::V4(ipv4.source_addr()),
            dst: IpAddr::V4(ipv4.destination_addr()),
            protocol: ipv4.protocol().0,
        },
        payload: &data[header_len..end],
        is_later_fragment: ipv4.fragments_offset().value() != 0,
    })
}

//! UDP protocol parser.

use etherparse::UdpHeaderSlice;

use crate::error::DecodeError;
use crate::frame::Ports;

/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// UDP header is always 8 bytes.
const UDP_HEADER_LEN: usize = 8;

/// Parse a UDP header, returning the ports and the datagram payload.
pub fn parse(data: &[u8]) -> Result<(Ports, &[u8]), DecodeError> {
    let udp = UdpHeaderSlice::from_slice(data).map_err(|e| DecodeError::InvalidHeader {
        protocol: "udp",
        reason: e.to_string(),
    })?;

    let ports = Ports {
        src: udp.source_port(),
        dst: udp.destination_port(),
    };

    // Honour the length field when it is sane; fall back to the captured bytes.
    let end = match udp.length() as usize {
        len if len >= UDP_HEADER_LEN && len <= data.len() => len,
        _ => data.len(),
    };
    Ok((ports, &data[UDP_HEADER_LEN..end]))
}

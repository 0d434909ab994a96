//! TCP protocol parser.

use etherparse::TcpHeaderSlice;

use crate::error::DecodeError;
use crate::frame::Ports;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// Parse a TCP header, returning the ports and the segment payload.
pub fn parse(data: &[u8]) -> Result<(Ports, &[u8]), DecodeError> {
    let tcp = TcpHeaderSlice::from_slice(data).map_err(|e| DecodeError::InvalidHeader {
        protocol: "tcp",
        reason: e.to_string(),
    })?;

    let ports = Ports {
        src: tcp.source_port(),
        dst: tcp.destination_port(),
    };
    let header_len = tcp.slice().len();
    Ok((ports, &data[header_len..]))
}

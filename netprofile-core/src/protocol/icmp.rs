//! ICMP protocol parser.

use crate::error::DecodeError;
use crate::frame::IcmpMessage;

/// IP protocol number for ICMP.
pub const IP_PROTO_ICMP: u8 = 1;

/// ICMP header is at least 8 bytes.
const ICMP_HEADER_LEN: usize = 8;

/// ICMP type constants.
pub mod icmp_type {
    pub const ECHO_REPLY: u8 = 0;
    pub const DESTINATION_UNREACHABLE: u8 = 3;
    pub const SOURCE_QUENCH: u8 = 4;
    pub const REDIRECT: u8 = 5;
    pub const ECHO_REQUEST: u8 = 8;
    pub const TIME_EXCEEDED: u8 = 11;
    pub const PARAMETER_PROBLEM: u8 = 12;
    pub const TIMESTAMP_REQUEST: u8 = 13;
    pub const TIMESTAMP_REPLY: u8 = 14;
}

/// Parse the ICMP type and code.
pub fn parse(data: &[u8]) -> Result<IcmpMessage, DecodeError> {
    if data.len() < ICMP_HEADER_LEN {
        return Err(DecodeError::PacketTooShort {
            protocol: "icmp",
            needed: ICMP_HEADER_LEN,
            have: data.len(),
        });
    }

    Ok(IcmpMessage {
        icmp_type: data[0],
        code: data[1],
    })
}

/// Human-readable name for an ICMP type.
pub fn type_name(icmp_type: u8) -> &'static str {
    match icmp_type {
        icmp_type::ECHO_REPLY => "Echo Reply",
        icmp_type::DESTINATION_UNREACHABLE => "Destination Unreachable",
        icmp_type::SOURCE_QUENCH => "Source Quench",
        icmp_type::REDIRECT => "Redirect",
        icmp_type::ECHO_REQUEST => "Echo Request",
        icmp_type::TIME_EXCEEDED => "Time Exceeded",
        icmp_type::PARAMETER_PROBLEM => "Parameter Problem",
        icmp_type::TIMESTAMP_REQUEST => "Timestamp Request",
        icmp_type::TIMESTAMP_REPLY => "Timestamp Reply",
        _ => "Unknown",
    }
}

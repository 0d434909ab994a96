//! Protocol parsers and the layer-by-layer frame decoder.
//!
//! Each submodule parses exactly one header and hands back the bytes that
//! follow it. [`decode`] chains them from the link layer up to the
//! application payload and stores the result in a typed [`Frame`].
//!
//! Decoding stops at the first layer that fails. The frame keeps whatever
//! was decoded before that point, and the failure is recorded in
//! [`Frame::decode_error`].

pub mod dns;
pub mod ethernet;
pub mod http;
pub mod icmp;
pub mod ipv4;
pub mod ipv6;
pub mod link;
pub mod tcp;
pub mod udp;

#[cfg(test)]
pub mod test_utils;

pub use dns::qtype;
pub use ethernet::ethertype;
pub use icmp::icmp_type;

use crate::error::DecodeError;
use crate::frame::{Frame, NetworkHeader, Payload, Transport};
use crate::io::RawPacket;

use icmp::IP_PROTO_ICMP;
use tcp::IP_PROTO_TCP;
use udp::IP_PROTO_UDP;

/// An IP header together with the bytes it carries.
#[derive(Debug, Clone, Copy)]
pub struct IpPacket<'a> {
    pub header: NetworkHeader,
    /// Transport bytes, already trimmed to the IP length.
    pub payload: &'a [u8],
    /// Non-first IPv4 fragment: the payload does not start with a
    /// transport header.
    pub is_later_fragment: bool,
}

/// Decode a raw captured packet into a [`Frame`].
pub fn decode_packet(packet: &RawPacket) -> Frame {
    decode(
        packet.frame_number,
        packet.timestamp,
        packet.link_type,
        &packet.data,
    )
}

/// Decode the layers of one captured frame.
///
/// Never fails: a malformed layer leaves the frame partially decoded with
/// `decode_error` set.
pub fn decode(number: u64, timestamp: f64, link_type: u16, data: &[u8]) -> Frame {
    let mut frame = Frame::new(number, timestamp);

    if let Err(err) = decode_layers(&mut frame, link_type, data) {
        tracing::debug!(frame = number, error = %err, "stopped decoding frame");
        frame.decode_error = Some(err);
    }

    frame
}

fn decode_layers(frame: &mut Frame, link_type: u16, data: &[u8]) -> Result<(), DecodeError> {
    let (ether_type, network) = link::parse(link_type, data)?;

    let ip = match ether_type {
        ethertype::IPV4 => ipv4::parse(network)?,
        ethertype::IPV6 => ipv6::parse(network)?,
        // ARP, LLDP and friends carry no IP layer.
        _ => return Ok(()),
    };
    frame.network = Some(ip.header);

    if ip.is_later_fragment {
        return Ok(());
    }

    match ip.header.protocol {
        IP_PROTO_TCP => {
            let (ports, payload) = tcp::parse(ip.payload)?;
            frame.transport = Some(Transport::Tcp(ports));

            if http::is_http_port(ports.src, ports.dst) {
                if let Some(request) = http::parse(payload) {
                    frame.payload = Payload::Http(request);
                }
            }
        }
        IP_PROTO_UDP => {
            let (ports, payload) = udp::parse(ip.payload)?;
            frame.transport = Some(Transport::Udp(ports));

            if dns::is_dns_port(ports.src, ports.dst) {
                frame.payload = Payload::Dns(dns::parse(payload)?);
            }
        }
        IP_PROTO_ICMP => {
            frame.transport = Some(Transport::Icmp);
            frame.payload = Payload::Icmp(icmp::parse(ip.payload)?);
        }
        _ => {}
    }

    Ok(())
}

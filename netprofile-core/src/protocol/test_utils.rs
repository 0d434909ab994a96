//! Test utilities for protocol decoding.
//!
//! Builders for constructing test packets layer by layer, plus capture
//! container builders that wrap finished frames in pcap or pcapng bytes.

use super::{ethernet::ethertype, icmp::IP_PROTO_ICMP, tcp::IP_PROTO_TCP, udp::IP_PROTO_UDP};

/// Builder for constructing Ethernet frames.
#[derive(Debug, Clone)]
pub struct EthernetBuilder {
    src_mac: [u8; 6],
    dst_mac: [u8; 6],
    vlan_ids: Vec<u16>,
    ethertype: u16,
    payload: Vec<u8>,
}

impl Default for EthernetBuilder {
    fn default() -> Self {
        Self {
            src_mac: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
            dst_mac: [0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb],
            vlan_ids: Vec::new(),
            ethertype: ethertype::IPV4,
            payload: Vec::new(),
        }
    }
}

impl EthernetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ethertype(mut self, ethertype: u16) -> Self {
        self.ethertype = ethertype;
        self
    }

    pub fn ipv6(self) -> Self {
        self.ethertype(ethertype::IPV6)
    }

    pub fn arp(self) -> Self {
        self.ethertype(ethertype::ARP)
    }

    /// Push an 802.1Q tag. Repeated calls stack tags outermost first.
    pub fn vlan(mut self, id: u16) -> Self {
        self.vlan_ids.push(id);
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(14 + 4 * self.vlan_ids.len() + self.payload.len());
        frame.extend_from_slice(&self.dst_mac);
        frame.extend_from_slice(&self.src_mac);
        for id in &self.vlan_ids {
            frame.extend_from_slice(&ethertype::VLAN.to_be_bytes());
            frame.extend_from_slice(&(id & 0x0fff).to_be_bytes());
        }
        frame.extend_from_slice(&self.ethertype.to_be_bytes());
        frame.extend_from_slice(&self.payload);
        frame
    }
}

/// Builder for Linux cooked capture (SLL) headers.
#[derive(Debug, Clone)]
pub struct LinuxSllBuilder {
    protocol: u16,
    payload: Vec<u8>,
}

impl Default for LinuxSllBuilder {
    fn default() -> Self {
        Self {
            protocol: ethertype::IPV4,
            payload: Vec::new(),
        }
    }
}

impl LinuxSllBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol(mut self, protocol: u16) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(16 + self.payload.len());
        frame.extend_from_slice(&0u16.to_be_bytes()); // Packet type: to us
        frame.extend_from_slice(&1u16.to_be_bytes()); // ARPHRD_ETHER
        frame.extend_from_slice(&6u16.to_be_bytes()); // Address length
        frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x00, 0x00]);
        frame.extend_from_slice(&self.protocol.to_be_bytes());
        frame.extend_from_slice(&self.payload);
        frame
    }
}

/// Builder for constructing IPv4 headers.
#[derive(Debug, Clone)]
pub struct Ipv4Builder {
    identification: u16,
    fragment_offset: u16,
    ttl: u8,
    protocol: u8,
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    payload: Vec<u8>,
}

impl Default for Ipv4Builder {
    fn default() -> Self {
        Self {
            identification: 0x0001,
            fragment_offset: 0,
            ttl: 64,
            protocol: IP_PROTO_TCP,
            src_ip: [192, 168, 1, 1],
            dst_ip: [192, 168, 1, 2],
            payload: Vec::new(),
        }
    }
}

impl Ipv4Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn tcp(self) -> Self {
        self.protocol(IP_PROTO_TCP)
    }

    pub fn udp(self) -> Self {
        self.protocol(IP_PROTO_UDP)
    }

    pub fn icmp(self) -> Self {
        self.protocol(IP_PROTO_ICMP)
    }

    pub fn src_ip(mut self, ip: [u8; 4]) -> Self {
        self.src_ip = ip;
        self
    }

    pub fn dst_ip(mut self, ip: [u8; 4]) -> Self {
        self.dst_ip = ip;
        self
    }

    /// Fragment offset in 8-byte units.
    pub fn fragment_offset(mut self, offset: u16) -> Self {
        self.fragment_offset = offset & 0x1fff;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let total_length = 20 + self.payload.len() as u16;
        let mut header = Vec::with_capacity(total_length as usize);

        header.push(0x45); // Version 4, IHL 5
        header.push(0x00); // DSCP + ECN
        header.extend_from_slice(&total_length.to_be_bytes());
        header.extend_from_slice(&self.identification.to_be_bytes());
        header.extend_from_slice(&self.fragment_offset.to_be_bytes());
        header.push(self.ttl);
        header.push(self.protocol);
        header.extend_from_slice(&[0x00, 0x00]); // Checksum (not calculated)
        header.extend_from_slice(&self.src_ip);
        header.extend_from_slice(&self.dst_ip);
        header.extend_from_slice(&self.payload);

        header
    }
}

/// Builder for constructing IPv6 fixed headers.
#[derive(Debug, Clone)]
pub struct Ipv6Builder {
    next_header: u8,
    src_ip: [u8; 16],
    dst_ip: [u8; 16],
    payload: Vec<u8>,
}

impl Default for Ipv6Builder {
    fn default() -> Self {
        Self {
            next_header: IP_PROTO_TCP,
            src_ip: [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01],
            dst_ip: [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x02],
            payload: Vec::new(),
        }
    }
}

impl Ipv6Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_header(mut self, next_header: u8) -> Self {
        self.next_header = next_header;
        self
    }

    pub fn tcp(self) -> Self {
        self.next_header(IP_PROTO_TCP)
    }

    pub fn udp(self) -> Self {
        self.next_header(IP_PROTO_UDP)
    }

    pub fn src_ip(mut self, ip: [u8; 16]) -> Self {
        self.src_ip = ip;
        self
    }

    pub fn dst_ip(mut self, ip: [u8; 16]) -> Self {
        self.dst_ip = ip;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(40 + self.payload.len());
        packet.extend_from_slice(&[0x60, 0x00, 0x00, 0x00]); // Version 6
        packet.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());
        packet.push(self.next_header);
        packet.push(64); // Hop limit
        packet.extend_from_slice(&self.src_ip);
        packet.extend_from_slice(&self.dst_ip);
        packet.extend_from_slice(&self.payload);
        packet
    }
}

/// Builder for constructing TCP headers.
#[derive(Debug, Clone)]
pub struct TcpBuilder {
    src_port: u16,
    dst_port: u16,
    seq: u32,
    ack: u32,
    flags: u8,
    window: u16,
    payload: Vec<u8>,
}

impl Default for TcpBuilder {
    fn default() -> Self {
        Self {
            src_port: 12345,
            dst_port: 80,
            seq: 1,
            ack: 0,
            flags: 0x02, // SYN
            window: 65535,
            payload: Vec::new(),
        }
    }
}

impl TcpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_port(mut self, port: u16) -> Self {
        self.src_port = port;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut segment = Vec::with_capacity(20 + self.payload.len());
        segment.extend_from_slice(&self.src_port.to_be_bytes());
        segment.extend_from_slice(&self.dst_port.to_be_bytes());
        segment.extend_from_slice(&self.seq.to_be_bytes());
        segment.extend_from_slice(&self.ack.to_be_bytes());
        segment.push(0x50); // Data offset 5 (20 bytes)
        segment.push(self.flags);
        segment.extend_from_slice(&self.window.to_be_bytes());
        segment.extend_from_slice(&[0x00, 0x00]); // Checksum
        segment.extend_from_slice(&[0x00, 0x00]); // Urgent pointer
        segment.extend_from_slice(&self.payload);
        segment
    }
}

/// Builder for constructing UDP headers.
#[derive(Debug, Clone)]
pub struct UdpBuilder {
    src_port: u16,
    dst_port: u16,
    payload: Vec<u8>,
}

impl Default for UdpBuilder {
    fn default() -> Self {
        Self {
            src_port: 12345,
            dst_port: 5000,
            payload: Vec::new(),
        }
    }
}

impl UdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_port(mut self, port: u16) -> Self {
        self.src_port = port;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let length = 8 + self.payload.len() as u16;
        let mut datagram = Vec::with_capacity(length as usize);
        datagram.extend_from_slice(&self.src_port.to_be_bytes());
        datagram.extend_from_slice(&self.dst_port.to_be_bytes());
        datagram.extend_from_slice(&length.to_be_bytes());
        datagram.extend_from_slice(&[0x00, 0x00]); // Checksum
        datagram.extend_from_slice(&self.payload);
        datagram
    }
}

/// Builder for ICMP messages.
#[derive(Debug, Clone)]
pub struct IcmpBuilder {
    icmp_type: u8,
    code: u8,
}

impl IcmpBuilder {
    pub fn new(icmp_type: u8, code: u8) -> Self {
        Self { icmp_type, code }
    }

    pub fn build(self) -> Vec<u8> {
        vec![
            self.icmp_type,
            self.code,
            0x00, 0x00, // Checksum
            0x00, 0x01, // Identifier
            0x00, 0x01, // Sequence
        ]
    }
}

/// Builder for DNS messages with a question section only.
#[derive(Debug, Clone)]
pub struct DnsBuilder {
    id: u16,
    flags: u16,
    questions: Vec<(String, u16)>,
}

impl DnsBuilder {
    /// A standard query with one question.
    pub fn query(id: u16, name: &str, qtype: u16) -> Self {
        Self {
            id,
            flags: 0x0100, // RD
            questions: vec![(name.to_string(), qtype)],
        }
    }

    /// Turn the message into a response (QR = 1).
    pub fn response(mut self) -> Self {
        self.flags |= 0x8000;
        self
    }

    pub fn question(mut self, name: &str, qtype: u16) -> Self {
        self.questions.push((name.to_string(), qtype));
        self
    }

    pub fn no_questions(mut self) -> Self {
        self.questions.clear();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut msg = Vec::new();
        msg.extend_from_slice(&self.id.to_be_bytes());
        msg.extend_from_slice(&self.flags.to_be_bytes());
        msg.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        msg.extend_from_slice(&[0x00; 6]); // AN/NS/AR counts
        for (name, qtype) in &self.questions {
            for label in name.split('.').filter(|l| !l.is_empty()) {
                msg.push(label.len() as u8);
                msg.extend_from_slice(label.as_bytes());
            }
            msg.push(0);
            msg.extend_from_slice(&qtype.to_be_bytes());
            msg.extend_from_slice(&1u16.to_be_bytes()); // Class IN
        }
        msg
    }
}

/// Ethernet + IPv4 + TCP frame.
pub fn tcp_frame(src: [u8; 4], dst: [u8; 4], src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let tcp = TcpBuilder::new()
        .src_port(src_port)
        .dst_port(dst_port)
        .flags(0x18) // PSH + ACK
        .payload(payload.to_vec())
        .build();
    let ip = Ipv4Builder::new().src_ip(src).dst_ip(dst).tcp().payload(tcp).build();
    EthernetBuilder::new().payload(ip).build()
}

/// Ethernet + IPv4 + UDP frame.
pub fn udp_frame(src: [u8; 4], dst: [u8; 4], src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp = UdpBuilder::new()
        .src_port(src_port)
        .dst_port(dst_port)
        .payload(payload.to_vec())
        .build();
    let ip = Ipv4Builder::new().src_ip(src).dst_ip(dst).udp().payload(udp).build();
    EthernetBuilder::new().payload(ip).build()
}

/// Ethernet + IPv4 + ICMP frame.
pub fn icmp_frame(src: [u8; 4], dst: [u8; 4], icmp_type: u8, code: u8) -> Vec<u8> {
    let icmp = IcmpBuilder::new(icmp_type, code).build();
    let ip = Ipv4Builder::new().src_ip(src).dst_ip(dst).icmp().payload(icmp).build();
    EthernetBuilder::new().payload(ip).build()
}

/// Split a timestamp into whole seconds and a fraction scaled by `units`.
fn split_timestamp(ts: f64, units: f64) -> (u32, u32) {
    let secs = ts.trunc();
    let frac = ((ts - secs) * units).round();
    (secs as u32, frac as u32)
}

/// Builder for classic little-endian pcap files.
#[derive(Debug, Clone)]
pub struct PcapBuilder {
    nanosecond: bool,
    link_type: u16,
    packets: Vec<(f64, Vec<u8>)>,
}

impl Default for PcapBuilder {
    fn default() -> Self {
        Self {
            nanosecond: false,
            link_type: 1,
            packets: Vec::new(),
        }
    }
}

impl PcapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the nanosecond-resolution magic.
    pub fn nanosecond(mut self) -> Self {
        self.nanosecond = true;
        self
    }

    pub fn link_type(mut self, link_type: u16) -> Self {
        self.link_type = link_type;
        self
    }

    pub fn packet(mut self, timestamp: f64, data: Vec<u8>) -> Self {
        self.packets.push((timestamp, data));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let (magic, units) = if self.nanosecond {
            (0xa1b2_3c4d_u32, 1e9)
        } else {
            (0xa1b2_c3d4_u32, 1e6)
        };

        let mut out = Vec::new();
        out.extend_from_slice(&magic.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes()); // Version major
        out.extend_from_slice(&4u16.to_le_bytes()); // Version minor
        out.extend_from_slice(&0i32.to_le_bytes()); // Timezone
        out.extend_from_slice(&0u32.to_le_bytes()); // Sigfigs
        out.extend_from_slice(&65535u32.to_le_bytes()); // Snaplen
        out.extend_from_slice(&(self.link_type as u32).to_le_bytes());

        for (timestamp, data) in self.packets {
            let (secs, frac) = split_timestamp(timestamp, units);
            out.extend_from_slice(&secs.to_le_bytes());
            out.extend_from_slice(&frac.to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&data);
        }
        out
    }
}

/// Builder for little-endian pcapng files with one Ethernet interface and
/// microsecond timestamps.
#[derive(Debug, Clone, Default)]
pub struct PcapNgBuilder {
    packets: Vec<(f64, Vec<u8>)>,
}

impl PcapNgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packet(mut self, timestamp: f64, data: Vec<u8>) -> Self {
        self.packets.push((timestamp, data));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();

        // Section Header Block
        out.extend_from_slice(&0x0A0D_0D0A_u32.to_le_bytes());
        out.extend_from_slice(&28u32.to_le_bytes());
        out.extend_from_slice(&0x1A2B_3C4D_u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(-1i64).to_le_bytes());
        out.extend_from_slice(&28u32.to_le_bytes());

        // Interface Description Block
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&20u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // Ethernet
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&65535u32.to_le_bytes());
        out.extend_from_slice(&20u32.to_le_bytes());

        // Enhanced Packet Blocks
        for (timestamp, data) in self.packets {
            let padded = (data.len() + 3) & !3;
            let block_len = (32 + padded) as u32;
            let micros = (timestamp * 1e6).round() as u64;

            out.extend_from_slice(&6u32.to_le_bytes());
            out.extend_from_slice(&block_len.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes()); // Interface ID
            out.extend_from_slice(&((micros >> 32) as u32).to_le_bytes());
            out.extend_from_slice(&(micros as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&data);
            out.resize(out.len() + padded - data.len(), 0);
            out.extend_from_slice(&block_len.to_le_bytes());
        }
        out
    }
}

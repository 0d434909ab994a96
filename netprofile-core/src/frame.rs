//! Decoded frame representation.
//!
//! A [`Frame`] holds only the fields the rest of the crate needs: the
//! timestamp, the IP endpoints, the transport kind and ports, and at most one
//! decoded application payload. Every layer is optional so that partially
//! decoded frames can still flow through the pipeline.

use std::fmt;
use std::net::IpAddr;

use smallvec::SmallVec;

use crate::error::DecodeError;

/// A single captured frame, decoded as far as its layers allow.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame number (1-indexed, matching Wireshark).
    pub number: u64,

    /// Capture timestamp in seconds since the Unix epoch.
    pub timestamp: f64,

    /// IP-layer header, absent for ARP, STP and other non-IP traffic.
    pub network: Option<NetworkHeader>,

    /// Transport-layer header.
    pub transport: Option<Transport>,

    /// Decoded application payload.
    pub payload: Payload,

    /// Why decoding stopped before the last layer, if it did.
    pub decode_error: Option<DecodeError>,
}

impl Frame {
    /// Create a frame with no decoded layers.
    pub fn new(number: u64, timestamp: f64) -> Self {
        Self {
            number,
            timestamp,
            network: None,
            transport: None,
            payload: Payload::None,
            decode_error: None,
        }
    }

    /// Check whether this frame carries an IP header.
    pub fn has_network(&self) -> bool {
        self.network.is_some()
    }

    /// Transport kind, if a transport header was decoded.
    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.transport.as_ref().map(Transport::kind)
    }

    /// Check whether this frame has both an IP header and the given transport.
    pub fn is_ip_with(&self, kind: TransportKind) -> bool {
        self.has_network() && self.transport_kind() == Some(kind)
    }

    /// The source endpoint (address and port, if the transport has ports).
    pub fn source(&self) -> Option<Endpoint> {
        let network = self.network.as_ref()?;
        let port = self.transport.as_ref().and_then(Transport::ports).map(|p| p.src);
        Some(Endpoint::new(network.src, port))
    }

    /// The destination endpoint (address and port, if the transport has ports).
    pub fn destination(&self) -> Option<Endpoint> {
        let network = self.network.as_ref()?;
        let port = self.transport.as_ref().and_then(Transport::ports).map(|p| p.dst);
        Some(Endpoint::new(network.dst, port))
    }

    /// HTTP request method, if this frame starts an HTTP request.
    pub fn http_method(&self) -> Option<&str> {
        match &self.payload {
            Payload::Http(req) => Some(req.method.as_str()),
            _ => None,
        }
    }

    /// Decoded DNS message, if any.
    pub fn dns(&self) -> Option<&DnsMessage> {
        match &self.payload {
            Payload::Dns(msg) => Some(msg),
            _ => None,
        }
    }

    /// Decoded ICMP message, if any.
    pub fn icmp(&self) -> Option<&IcmpMessage> {
        match &self.payload {
            Payload::Icmp(msg) => Some(msg),
            _ => None,
        }
    }
}

/// IP-layer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkHeader {
    pub src: IpAddr,
    pub dst: IpAddr,
    /// IP protocol number (IPv4) or next header (IPv6).
    pub protocol: u8,
}

/// Source and destination ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ports {
    pub src: u16,
    pub dst: u16,
}

/// Transport-layer header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp(Ports),
    Udp(Ports),
    Icmp,
}

impl Transport {
    /// The kind tag of this transport.
    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Tcp(_) => TransportKind::Tcp,
            Transport::Udp(_) => TransportKind::Udp,
            Transport::Icmp => TransportKind::Icmp,
        }
    }

    /// Ports, for the transports that have them.
    pub fn ports(&self) -> Option<Ports> {
        match self {
            Transport::Tcp(p) | Transport::Udp(p) => Some(*p),
            Transport::Icmp => None,
        }
    }
}

/// Transport protocol tag, used in session keys and restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportKind {
    Tcp,
    Udp,
    Icmp,
}

impl TransportKind {
    /// Return a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Tcp => "tcp",
            TransportKind::Udp => "udp",
            TransportKind::Icmp => "icmp",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub addr: IpAddr,
    pub port: Option<u16>,
}

impl Endpoint {
    pub fn new(addr: IpAddr, port: Option<u16>) -> Self {
        Self { addr, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.addr, self.port) {
            (IpAddr::V6(addr), Some(port)) => write!(f, "[{addr}]:{port}"),
            (addr, Some(port)) => write!(f, "{addr}:{port}"),
            (addr, None) => write!(f, "{addr}"),
        }
    }
}

/// Application payload decoded from the transport payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    None,
    Http(HttpRequest),
    Dns(DnsMessage),
    Icmp(IcmpMessage),
}

/// HTTP request line fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method token exactly as it appeared on the wire.
    pub method: String,
    pub path: Option<String>,
}

/// DNS header flags and question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub id: u16,
    /// 0 for a query, 1 for a response.
    pub qr: u8,
    pub opcode: u8,
    pub rcode: u8,
    /// Question records that could be decoded, in wire order.
    pub questions: SmallVec<[DnsQuestion; 1]>,
}

impl DnsMessage {
    /// Check whether this message is a query (`qr == 0`).
    pub fn is_query(&self) -> bool {
        self.qr == 0
    }

    /// The first question record, if any.
    pub fn first_question(&self) -> Option<&DnsQuestion> {
        self.questions.first()
    }
}

/// A DNS question record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

/// ICMP type and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpMessage {
    pub icmp_type: u8,
    pub code: u8,
}

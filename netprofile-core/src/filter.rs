//! Application-layer frame filters.
//!
//! Each filter is a pure selection over a frame sequence: it returns the
//! matching frames as a new list in their original order and never looks at
//! session grouping. What counts as a match is supplied through [`Accept`],
//! so callers can pass a concrete set of values or a predicate.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

use crate::frame::{Frame, TransportKind};

/// Membership test used by the filters.
///
/// Implemented for hash sets, B-tree sets, slices, arrays, vectors, and any
/// `Fn(&T) -> bool` closure. Collections accept borrowed forms of their
/// elements, so a `HashSet<String>` accepts `str`.
pub trait Accept<T: ?Sized> {
    fn accepts(&self, value: &T) -> bool;
}

impl<T, Q, S> Accept<Q> for HashSet<T, S>
where
    T: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    fn accepts(&self, value: &Q) -> bool {
        self.contains(value)
    }
}

impl<T, Q> Accept<Q> for BTreeSet<T>
where
    T: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    fn accepts(&self, value: &Q) -> bool {
        self.contains(value)
    }
}

impl<T, Q> Accept<Q> for [T]
where
    T: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    fn accepts(&self, value: &Q) -> bool {
        self.iter().any(|item| item.borrow() == value)
    }
}

impl<T, Q, const N: usize> Accept<Q> for [T; N]
where
    T: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    fn accepts(&self, value: &Q) -> bool {
        <[T] as Accept<Q>>::accepts(self.as_slice(), value)
    }
}

impl<T, Q> Accept<Q> for Vec<T>
where
    T: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    fn accepts(&self, value: &Q) -> bool {
        <[T] as Accept<Q>>::accepts(self.as_slice(), value)
    }
}

impl<T: ?Sized, F> Accept<T> for F
where
    F: Fn(&T) -> bool,
{
    fn accepts(&self, value: &T) -> bool {
        self(value)
    }
}

/// Check one frame against the HTTP method filter.
pub fn is_http_match<A: Accept<str> + ?Sized>(frame: &Frame, methods: &A) -> bool {
    frame.transport_kind() == Some(TransportKind::Tcp)
        && frame.http_method().is_some_and(|method| methods.accepts(method))
}

/// Check one frame against the DNS query type filter.
///
/// Only queries (`qr == 0`) match, and only the first question is inspected.
pub fn is_dns_match<A: Accept<u16> + ?Sized>(frame: &Frame, qtypes: &A) -> bool {
    if frame.transport_kind() != Some(TransportKind::Udp) {
        return false;
    }
    let Some(msg) = frame.dns() else {
        return false;
    };
    msg.is_query()
        && msg
            .first_question()
            .is_some_and(|question| qtypes.accepts(&question.qtype))
}

/// Check one frame against the ICMP type filter.
pub fn is_icmp_match<A: Accept<u8> + ?Sized>(frame: &Frame, types: &A) -> bool {
    frame.has_network()
        && frame
            .icmp()
            .is_some_and(|msg| types.accepts(&msg.icmp_type))
}

/// Frames whose TCP payload starts an HTTP request with an accepted method.
///
/// Methods compare exactly as decoded, so `"get"` and `"GET"` differ.
pub fn filter_http<'a, I, A>(frames: I, methods: &A) -> Vec<&'a Frame>
where
    I: IntoIterator<Item = &'a Frame>,
    A: Accept<str> + ?Sized,
{
    frames
        .into_iter()
        .filter(|frame| is_http_match(frame, methods))
        .collect()
}

/// UDP DNS queries whose first question has an accepted query type.
pub fn filter_dns<'a, I, A>(frames: I, qtypes: &A) -> Vec<&'a Frame>
where
    I: IntoIterator<Item = &'a Frame>,
    A: Accept<u16> + ?Sized,
{
    frames
        .into_iter()
        .filter(|frame| is_dns_match(frame, qtypes))
        .collect()
}

/// IP frames carrying an ICMP message of an accepted type.
pub fn filter_icmp<'a, I, A>(frames: I, types: &A) -> Vec<&'a Frame>
where
    I: IntoIterator<Item = &'a Frame>,
    A: Accept<u8> + ?Sized,
{
    frames
        .into_iter()
        .filter(|frame| is_icmp_match(frame, types))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{
        DnsMessage, DnsQuestion, HttpRequest, IcmpMessage, NetworkHeader, Payload, Ports,
        Transport,
    };
    use std::net::{IpAddr, Ipv4Addr};

    fn ip_frame(number: u64, transport: Transport, payload: Payload) -> Frame {
        let mut frame = Frame::new(number, number as f64);
        frame.network = Some(NetworkHeader {
            src: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            dst: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            protocol: 0,
        });
        frame.transport = Some(transport);
        frame.payload = payload;
        frame
    }

    fn http(number: u64, method: &str) -> Frame {
        ip_frame(
            number,
            Transport::Tcp(Ports { src: 40000, dst: 80 }),
            Payload::Http(HttpRequest {
                method: method.to_string(),
                path: Some("/".to_string()),
            }),
        )
    }

    fn dns(number: u64, qr: u8, qtypes: &[u16]) -> Frame {
        let questions = qtypes
            .iter()
            .map(|&qtype| DnsQuestion {
                name: "example.com".to_string(),
                qtype,
                qclass: 1,
            })
            .collect();
        ip_frame(
            number,
            Transport::Udp(Ports { src: 40000, dst: 53 }),
            Payload::Dns(DnsMessage {
                id: 1,
                qr,
                opcode: 0,
                rcode: 0,
                questions,
            }),
        )
    }

    fn icmp(number: u64, icmp_type: u8) -> Frame {
        ip_frame(
            number,
            Transport::Icmp,
            Payload::Icmp(IcmpMessage { icmp_type, code: 0 }),
        )
    }

    fn numbers(frames: &[&Frame]) -> Vec<u64> {
        frames.iter().map(|f| f.number).collect()
    }

    #[test]
    fn test_http_filter_keeps_order() {
        let frames = vec![http(0, "GET"), http(1, "POST"), http(2, "GET")];
        let methods: HashSet<String> = ["GET".to_string()].into_iter().collect();

        let matched = filter_http(&frames, &methods);
        assert_eq!(numbers(&matched), vec![0, 2]);
    }

    #[test]
    fn test_http_filter_is_case_sensitive() {
        let frames = vec![http(0, "get"), http(1, "GET")];
        assert_eq!(numbers(&filter_http(&frames, &["GET"])), vec![1]);
    }

    #[test]
    fn test_http_filter_with_predicate() {
        let frames = vec![http(0, "GET"), http(1, "POST"), http(2, "PUT")];
        let starts_with_p = |method: &str| method.starts_with('P');

        assert_eq!(numbers(&filter_http(&frames, &starts_with_p)), vec![1, 2]);
    }

    #[test]
    fn test_http_filter_requires_tcp() {
        let mut frame = http(0, "GET");
        frame.transport = Some(Transport::Udp(Ports { src: 1, dst: 80 }));
        let frames = vec![frame];

        assert!(filter_http(&frames, &["GET"]).is_empty());
    }

    #[test]
    fn test_dns_filter_excludes_responses() {
        let frames = vec![dns(0, 1, &[1]), dns(1, 0, &[1])];
        let qtypes: HashSet<u16> = [1].into_iter().collect();

        assert_eq!(numbers(&filter_dns(&frames, &qtypes)), vec![1]);
    }

    #[test]
    fn test_dns_filter_inspects_first_question_only() {
        let frames = vec![dns(0, 0, &[28, 1]), dns(1, 0, &[1, 28]), dns(2, 0, &[])];

        assert_eq!(numbers(&filter_dns(&frames, &vec![1u16])), vec![1]);
    }

    #[test]
    fn test_dns_filter_requires_udp() {
        let mut frame = dns(0, 0, &[1]);
        frame.transport = Some(Transport::Tcp(Ports { src: 40000, dst: 53 }));
        let frames = vec![frame];

        assert!(filter_dns(&frames, &[1u16]).is_empty());
    }

    #[test]
    fn test_icmp_filter() {
        let frames = vec![icmp(0, 8), icmp(1, 0), icmp(2, 3), http(3, "GET")];
        let types: BTreeSet<u8> = [0, 8].into_iter().collect();

        assert_eq!(numbers(&filter_icmp(&frames, &types)), vec![0, 1]);
    }

    #[test]
    fn test_icmp_filter_requires_network() {
        let mut frame = icmp(0, 8);
        frame.network = None;
        let frames = vec![frame];

        assert!(filter_icmp(&frames, &[8u8]).is_empty());
    }

    #[test]
    fn test_filters_return_subsequences() {
        let frames = vec![
            http(0, "GET"),
            dns(1, 0, &[1]),
            icmp(2, 8),
            http(3, "DELETE"),
            dns(4, 0, &[15]),
            icmp(5, 11),
        ];

        let all_types = |_: &u8| true;
        let http_out = filter_http(&frames, &|_: &str| true);
        let dns_out = filter_dns(&frames, &|_: &u16| true);
        let icmp_out = filter_icmp(&frames, &all_types);

        assert_eq!(numbers(&http_out), vec![0, 3]);
        assert_eq!(numbers(&dns_out), vec![1, 4]);
        assert_eq!(numbers(&icmp_out), vec![2, 5]);
    }

    #[test]
    fn test_filter_over_borrowed_frames() {
        let frames = vec![http(0, "GET"), http(1, "POST")];
        let refs: Vec<&Frame> = frames.iter().collect();

        let matched = filter_http(refs.iter().copied(), &["POST"]);
        assert_eq!(numbers(&matched), vec![1]);
    }

    #[test]
    fn test_accept_impls() {
        let set: HashSet<&str> = ["GET"].into_iter().collect();
        assert!(set.accepts("GET"));
        assert!(!set.accepts("POST"));

        let slice: &[u16] = &[1, 28];
        assert!(Accept::accepts(slice, &28));
        assert!(!Accept::accepts(slice, &15));

        let even = |n: &u8| n % 2 == 0;
        assert!(even.accepts(&4));
        assert!(!even.accepts(&3));
    }
}

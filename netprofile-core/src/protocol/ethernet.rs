//! Ethernet II and 802.1Q VLAN parsing.

use etherparse::Ethernet2HeaderSlice;

use crate::error::DecodeError;

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// Well-known EtherTypes.
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const QINQ: u16 = 0x88A8;
    pub const IPV6: u16 = 0x86DD;
}

/// 802.1Q tag length (TCI + inner EtherType).
const VLAN_TAG_LEN: usize = 4;

/// Parse an Ethernet II header, skipping any stacked VLAN tags.
///
/// Returns the innermost EtherType and the bytes that follow it.
pub fn parse(data: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    let eth = Ethernet2HeaderSlice::from_slice(data).map_err(|e| DecodeError::InvalidHeader {
        protocol: "ethernet",
        reason: e.to_string(),
    })?;

    let header_len = eth.slice().len();
    skip_vlan_tags(eth.ether_type().0, &data[header_len..])
}

/// Walk 802.1Q / 802.1ad tags until a non-VLAN EtherType is found.
fn skip_vlan_tags(mut ether_type: u16, mut rest: &[u8]) -> Result<(u16, &[u8]), DecodeError> {
    while ether_type == ethertype::VLAN || ether_type == ethertype::QINQ {
        if rest.len() < VLAN_TAG_LEN {
            return Err(DecodeError::PacketTooShort {
                protocol: "vlan",
                needed: VLAN_TAG_LEN,
                have: rest.len(),
            });
        }
        ether_type = u16::from_be_bytes([rest[2], rest[3]]);
        rest = &rest[VLAN_TAG_LEN..];
    }
    Ok((ether_type, rest))
}

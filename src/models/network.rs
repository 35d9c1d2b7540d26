//! Subnet calculation result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Classful range of an address, with loopback and RFC 1918 split out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    A,
    B,
    C,
    D,
    E,
    Private,
    Loopback,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
            AddressClass::Private => "Private",
            AddressClass::Loopback => "Loopback",
        };
        f.write_str(s)
    }
}

/// Bit view of a network address split at the prefix length.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BinaryLayout {
    /// Leading `prefix_length` bits.
    pub network_bits: String,
    /// Remaining `32 - prefix_length` bits.
    pub host_bits: String,
    /// All 32 bits.
    pub full: String,
    /// The 32 bits in four groups of eight.
    pub octets: [String; 4],
}

/// Full description of an IPv4 network.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub network_address: Ipv4Addr,
    pub broadcast_address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    /// Same as the network address for /31 and /32.
    pub first_usable_host: Ipv4Addr,
    /// Same as the broadcast address for /31 and /32.
    pub last_usable_host: Ipv4Addr,
    /// `2^(32 - prefix_length)`; up to 2^32 for /0.
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub prefix_length: u8,
    pub address_class: AddressClass,
    pub is_private: bool,
    pub is_loopback: bool,
    pub binary_layout: BinaryLayout,
}

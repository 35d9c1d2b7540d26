//! IPv4 address arithmetic and CIDR notation utilities.
//!
//! Addresses are handled as `u32` in host order. All mask and shift
//! arithmetic goes through `u64` so that `/0` and `/32` never overflow.

use super::{AddressClass, BinaryLayout};
use crate::error::{NetCalcError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Parse dotted-decimal text into a `u32`.
///
/// Exactly four parts, each 0-255 with no sign, whitespace or leading zero
/// (a part may only start with `0` if it is exactly `"0"`).
///
/// # Examples
/// ```
/// use netcalc::models::parse_address;
/// assert_eq!(parse_address("192.168.1.1").unwrap(), 0xC0A80101);
/// assert!(parse_address("192.168.01.1").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u32> {
    let invalid = || NetCalcError::InvalidAddress(text.to_string());
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(invalid());
    }
    let mut value: u32 = 0;
    for part in parts {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if part.len() > 1 && part.starts_with('0') {
            return Err(invalid());
        }
        let octet: u32 = part.parse().map_err(|_| invalid())?;
        if octet > 255 {
            return Err(invalid());
        }
        value = (value << 8) | octet;
    }
    Ok(value)
}

/// Format a `u32` as four dotted octets.
pub fn format_address(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use netcalc::models::mask_for_prefix;
/// assert_eq!(mask_for_prefix(24).unwrap(), 0xFFFFFF00);
/// assert_eq!(mask_for_prefix(0).unwrap(), 0);
/// ```
pub fn mask_for_prefix(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(NetCalcError::InvalidPrefixLength(len as i64))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Network address: `addr AND mask`.
pub fn network_of(addr: u32, mask: u32) -> u32 {
    addr & mask
}

/// Broadcast address: `network OR NOT mask`.
pub fn broadcast_of(network: u32, mask: u32) -> u32 {
    network | !mask
}

fn first_octet(addr: u32) -> u8 {
    (addr >> 24) as u8
}

/// 127.0.0.0/8
pub fn is_loopback(addr: u32) -> bool {
    first_octet(addr) == 127
}

/// RFC 1918 ranges: 10/8, 172.16/12 and 192.168/16.
pub fn is_private(addr: u32) -> bool {
    let [a, b, _, _] = addr.to_be_bytes();
    a == 10 || (a == 172 && (16..=31).contains(&b)) || (a == 192 && b == 168)
}

/// Classify an address. Loopback wins over private, private over the
/// classful ranges.
pub fn classify(addr: u32) -> AddressClass {
    if is_loopback(addr) {
        return AddressClass::Loopback;
    }
    if is_private(addr) {
        return AddressClass::Private;
    }
    match first_octet(addr) {
        1..=126 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        _ => AddressClass::E,
    }
}

/// Split the 32-bit string of `network` at `len`.
pub fn to_binary_layout(network: u32, len: u8) -> Result<BinaryLayout> {
    if len > MAX_LENGTH {
        return Err(NetCalcError::InvalidPrefixLength(len as i64));
    }
    let full = format!("{network:032b}");
    let (network_bits, host_bits) = full.split_at(len as usize);
    let octets = [0, 8, 16, 24].map(|i| full[i..i + 8].to_string());
    Ok(BinaryLayout {
        network_bits: network_bits.to_string(),
        host_bits: host_bits.to_string(),
        full: full.clone(),
        octets,
    })
}

/// Dotted form of the mask for `len`.
pub fn prefix_to_mask_string(len: u8) -> Result<String> {
    Ok(format_address(mask_for_prefix(len)?))
}

/// Prefix length of a dotted subnet mask, e.g. `255.255.255.0` -> 24.
pub fn mask_to_prefix(mask: &str) -> Result<u8> {
    let bits = parse_address(mask)?;
    let len = bits.count_ones() as u8;
    if bits != mask_for_prefix(len)? {
        return Err(NetCalcError::InvalidMask(mask.to_string()));
    }
    Ok(len)
}

/// Network addresses of every `/new_len` subnet inside `network/len`.
pub fn subnets_of(network: &str, len: u8, new_len: u8) -> Result<Vec<Ipv4Addr>> {
    if new_len > MAX_LENGTH {
        return Err(NetCalcError::InvalidPrefixLength(new_len as i64));
    }
    if new_len <= len {
        return Err(NetCalcError::InvalidPrefixLength(new_len as i64));
    }
    let base = network_of(parse_address(network)?, mask_for_prefix(len)?) as u64;
    let count = 1u64 << (new_len - len);
    let size = 1u64 << (MAX_LENGTH - new_len);
    Ok((0..count)
        .map(|i| Ipv4Addr::from((base + i * size) as u32))
        .collect())
}

/// True when `addr` falls inside `network/len`.
pub fn is_address_in_network(addr: &str, network: &str, len: u8) -> Result<bool> {
    let mask = mask_for_prefix(len)?;
    Ok(network_of(parse_address(addr)?, mask) == network_of(parse_address(network)?, mask))
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(de::Error::custom)
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| NetCalcError::InvalidCidrNotation(addr_cidr.to_string()))?;
        let addr = Ipv4Addr::from(parse_address(addr)?);
        if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NetCalcError::InvalidCidrNotation(addr_cidr.to_string()));
        }
        let mask: i64 = mask
            .parse()
            .map_err(|_| NetCalcError::InvalidCidrNotation(addr_cidr.to_string()))?;
        if mask > MAX_LENGTH as i64 {
            return Err(NetCalcError::InvalidPrefixLength(mask));
        }
        Ok(Ipv4 {
            addr,
            mask: mask as u8,
        })
    }

    /// Get the broadcast address for this subnet.
    pub fn broadcast(&self) -> Ipv4 {
        Ipv4 {
            addr: self.hi(),
            mask: self.mask,
        }
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        let mask = self.mask_bits();
        Ipv4Addr::from(broadcast_of(network_of(u32::from(self.addr), mask), mask))
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(network_of(u32::from(self.addr), self.mask_bits()))
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.lo() <= ip && ip <= self.hi()
    }

    pub fn overlaps(&self, other: &Ipv4) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }

    // `mask` is public, so clamp rather than trust it.
    fn mask_bits(&self) -> u32 {
        mask_for_prefix(self.mask.min(MAX_LENGTH)).unwrap_or(u32::MAX)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

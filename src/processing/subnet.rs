//! Subnet calculation.
//!
//! Builds a [`NetworkDescriptor`] from an address and prefix length.

use crate::error::{NetCalcError, Result};
use crate::models::{
    broadcast_of, classify, is_loopback, is_private, mask_for_prefix, network_of, parse_address,
    to_binary_layout, NetworkDescriptor, MAX_LENGTH,
};
use std::net::Ipv4Addr;

/// Total addresses in a `/len` block.
pub fn total_hosts(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Usable host addresses in a `/len` block.
///
/// /31 point-to-point links and /32 host routes have no network or
/// broadcast overhead.
pub fn usable_hosts(len: u8) -> u64 {
    match len.min(MAX_LENGTH) {
        32 => 1,
        31 => 2,
        len => total_hosts(len) - 2,
    }
}

/// Describe the network containing `address` with prefix `prefix_length`.
///
/// # Examples
/// ```
/// use netcalc::processing::describe;
/// let net = describe("192.168.1.77", 24).unwrap();
/// assert_eq!(net.network_address.to_string(), "192.168.1.0");
/// assert_eq!(net.usable_hosts, 254);
/// ```
pub fn describe(address: &str, prefix_length: u8) -> Result<NetworkDescriptor> {
    let addr = parse_address(address)?;
    if prefix_length > MAX_LENGTH {
        return Err(NetCalcError::InvalidPrefixLength(prefix_length as i64));
    }
    let mask = mask_for_prefix(prefix_length)?;
    let network = network_of(addr, mask);
    let broadcast = broadcast_of(network, mask);

    let (first, last) = if prefix_length >= 31 {
        (network, broadcast)
    } else {
        (network + 1, broadcast - 1)
    };

    let descriptor = NetworkDescriptor {
        network_address: Ipv4Addr::from(network),
        broadcast_address: Ipv4Addr::from(broadcast),
        subnet_mask: Ipv4Addr::from(mask),
        wildcard_mask: Ipv4Addr::from(!mask),
        first_usable_host: Ipv4Addr::from(first),
        last_usable_host: Ipv4Addr::from(last),
        total_hosts: total_hosts(prefix_length),
        usable_hosts: usable_hosts(prefix_length),
        prefix_length,
        address_class: classify(addr),
        is_private: is_private(addr),
        is_loopback: is_loopback(addr),
        binary_layout: to_binary_layout(network, prefix_length)?,
    };
    log::debug!(
        "describe({address}/{prefix_length}) -> {}/{} usable={}",
        descriptor.network_address,
        prefix_length,
        descriptor.usable_hosts
    );
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressClass;

    #[test]
    fn test_describe_slash_24() {
        let net = describe("192.168.1.0", 24).unwrap();
        assert_eq!(net.network_address.to_string(), "192.168.1.0");
        assert_eq!(net.broadcast_address.to_string(), "192.168.1.255");
        assert_eq!(net.subnet_mask.to_string(), "255.255.255.0");
        assert_eq!(net.wildcard_mask.to_string(), "0.0.0.255");
        assert_eq!(net.first_usable_host.to_string(), "192.168.1.1");
        assert_eq!(net.last_usable_host.to_string(), "192.168.1.254");
        assert_eq!(net.total_hosts, 256);
        assert_eq!(net.usable_hosts, 254);
        assert_eq!(net.address_class, AddressClass::Private);
        assert!(net.is_private);
        assert!(!net.is_loopback);
    }

    #[test]
    fn test_describe_masks_host_bits() {
        let net = describe("10.20.30.40", 12).unwrap();
        assert_eq!(net.network_address.to_string(), "10.16.0.0");
        assert_eq!(net.broadcast_address.to_string(), "10.31.255.255");
        assert_eq!(net.binary_layout.network_bits.len(), 12);
    }

    #[test]
    fn test_describe_slash_0() {
        let net = describe("203.0.113.9", 0).unwrap();
        assert_eq!(net.network_address.to_string(), "0.0.0.0");
        assert_eq!(net.broadcast_address.to_string(), "255.255.255.255");
        assert_eq!(net.subnet_mask.to_string(), "0.0.0.0");
        assert_eq!(net.total_hosts, 4_294_967_296);
        assert_eq!(net.usable_hosts, 4_294_967_294);
        assert_eq!(net.first_usable_host.to_string(), "0.0.0.1");
        assert_eq!(net.last_usable_host.to_string(), "255.255.255.254");
        assert_eq!(net.address_class, AddressClass::C);
    }

    #[test]
    fn test_describe_slash_31_and_32() {
        let p2p = describe("10.0.0.1", 31).unwrap();
        assert_eq!(p2p.network_address.to_string(), "10.0.0.0");
        assert_eq!(p2p.first_usable_host, p2p.network_address);
        assert_eq!(p2p.last_usable_host, p2p.broadcast_address);
        assert_eq!(p2p.total_hosts, 2);
        assert_eq!(p2p.usable_hosts, 2);

        let host = describe("127.0.0.1", 32).unwrap();
        assert_eq!(host.network_address.to_string(), "127.0.0.1");
        assert_eq!(host.broadcast_address, host.network_address);
        assert_eq!(host.total_hosts, 1);
        assert_eq!(host.usable_hosts, 1);
        assert_eq!(host.address_class, AddressClass::Loopback);
        assert!(host.is_loopback);
        assert!(host.binary_layout.host_bits.is_empty());
    }

    #[test]
    fn test_describe_errors() {
        assert!(matches!(
            describe("192.168.1", 24),
            Err(NetCalcError::InvalidAddress(_))
        ));
        assert!(matches!(
            describe("192.168.1.0", 33),
            Err(NetCalcError::InvalidPrefixLength(33))
        ));
    }

    #[test]
    fn test_usable_hosts() {
        assert_eq!(usable_hosts(32), 1);
        assert_eq!(usable_hosts(31), 2);
        assert_eq!(usable_hosts(30), 2);
        assert_eq!(usable_hosts(29), 6);
        assert_eq!(usable_hosts(24), 254);
        assert_eq!(usable_hosts(16), 65534);
        for len in 0..=30 {
            assert_eq!(usable_hosts(len), (1u64 << (32 - len)) - 2);
        }
    }

    #[test]
    fn test_host_counts_clamp_long_prefixes() {
        assert_eq!(total_hosts(33), 1);
        assert_eq!(usable_hosts(33), 1);
        assert_eq!(usable_hosts(u8::MAX), 1);
    }
}

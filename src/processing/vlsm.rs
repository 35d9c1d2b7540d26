//! VLSM allocation.
//!
//! Packs named host-count requests into one base network, largest first.

use crate::error::Result;
use crate::models::{
    format_address, mask_for_prefix, Allocation, AllocationResult, RequestValidation,
    SubnetRequest, MAX_LENGTH,
};
use crate::processing::subnet::describe;
use std::collections::HashSet;

/// Largest host count a single request may ask for.
pub const MAX_REQUIRED_HOSTS: u64 = (1 << 30) - 2;

/// Smallest subnet (largest prefix) that holds `hosts` usable addresses.
///
/// Returns `None` when no IPv4 prefix is big enough.
pub fn required_prefix_length(hosts: u64) -> Option<u8> {
    match hosts {
        0 | 1 => Some(32),
        2 => Some(31),
        _ => {
            let bits = hosts.checked_add(2)?.checked_next_power_of_two()?.trailing_zeros();
            if bits > MAX_LENGTH as u32 {
                None
            } else {
                Some(MAX_LENGTH - bits as u8)
            }
        }
    }
}

/// Round `address` down to its enclosing `/len` block.
pub fn align_to_boundary(address: u64, len: u8) -> Result<u64> {
    Ok(address & mask_for_prefix(len)? as u64)
}

fn block_size(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len)
}

/// Allocate `requests` out of `base_network/base_prefix_length`.
///
/// Requests are placed largest first (ties keep their input order). A
/// request that does not fit adds a warning and is skipped; the remaining
/// requests are still placed. The returned allocations are sorted by
/// network address.
pub fn allocate(
    base_network: &str,
    base_prefix_length: u8,
    requests: &[SubnetRequest],
) -> Result<AllocationResult> {
    let base = describe(base_network, base_prefix_length)?;
    let total_available = base.usable_hosts;

    log::info!(
        "#Start allocate() {} requests into {}/{}",
        requests.len(),
        base.network_address,
        base_prefix_length
    );

    // sort_by is stable: equal sizes stay in insertion order.
    let mut sorted: Vec<&SubnetRequest> = requests.iter().collect();
    sorted.sort_by(|a, b| b.required_hosts.cmp(&a.required_hosts));

    let mut cursor = u32::from(base.network_address) as u64;
    let ceiling = u32::from(base.broadcast_address) as u64;
    let mut allocations = Vec::new();
    let mut warnings = Vec::new();

    for request in sorted {
        let no_space = format!(
            "Not enough space for \"{}\" (needs {} hosts)",
            request.name, request.required_hosts
        );
        let Some(len) = required_prefix_length(request.required_hosts) else {
            log::warn!("{no_space}");
            warnings.push(no_space);
            continue;
        };
        let size = block_size(len);

        if cursor + size - 1 > ceiling {
            log::warn!("{no_space}");
            warnings.push(no_space);
            continue;
        }

        let aligned = align_to_boundary(cursor, len)?;
        if aligned + size - 1 > ceiling {
            let msg = format!("Not enough space for \"{}\" after alignment", request.name);
            log::warn!("{msg}");
            warnings.push(msg);
            continue;
        }

        let info = describe(&format_address(aligned as u32), len)?;
        let allocation = Allocation {
            name: request.name.clone(),
            network_address: info.network_address,
            prefix_length: info.prefix_length,
            first_host: info.first_usable_host,
            last_host: info.last_usable_host,
            broadcast_address: info.broadcast_address,
            usable_hosts: info.usable_hosts,
        };
        log::debug!(
            "allocated \"{}\" {}/{} ({} usable)",
            allocation.name,
            allocation.network_address,
            allocation.prefix_length,
            allocation.usable_hosts
        );
        allocations.push(allocation);

        cursor = aligned + size;
    }

    allocations.sort_by_key(|a| a.network_address);

    let total_used: u64 = allocations.iter().map(|a| a.usable_hosts).sum();
    let utilization_percent = if total_available > 0 {
        (total_used as f64 / total_available as f64 * 100.0).round() as u32
    } else {
        0
    };

    Ok(AllocationResult {
        allocations,
        total_used_hosts: total_used,
        total_available_hosts: total_available,
        utilization_percent,
        warnings,
        base_network: base.network_address,
        base_prefix_length,
    })
}

/// Check names and host counts of `requests`, collecting every problem.
pub fn validate_requests(requests: &[SubnetRequest]) -> RequestValidation {
    let mut errors = Vec::new();

    if requests.is_empty() {
        errors.push("At least one subnet request is required".to_string());
    }

    let mut names = HashSet::new();
    for request in requests {
        if request.name.trim().is_empty() {
            errors.push("All subnets must have a name".to_string());
        }
        if !names.insert(request.name.as_str()) {
            errors.push(format!("Duplicate subnet name: \"{}\"", request.name));
        }
        if request.required_hosts < 1 {
            errors.push(format!(
                "\"{}\": Required hosts must be at least 1",
                request.name
            ));
        }
        if request.required_hosts > MAX_REQUIRED_HOSTS {
            errors.push(format!("\"{}\": Required hosts exceeds maximum", request.name));
        }
    }

    RequestValidation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Sum of the block sizes every request needs.
///
/// Requests no IPv4 prefix can hold count as a full /0 block.
pub fn total_needed(requests: &[SubnetRequest]) -> u64 {
    requests
        .iter()
        .map(|r| required_prefix_length(r.required_hosts).map_or(1u64 << 32, block_size))
        .sum()
}

/// True when the raw block sizes fit in `base_network/base_prefix_length`.
///
/// Ignores alignment, so `allocate` may still warn.
pub fn can_fit(
    base_network: &str,
    base_prefix_length: u8,
    requests: &[SubnetRequest],
) -> Result<bool> {
    let base = describe(base_network, base_prefix_length)?;
    Ok(total_needed(requests) <= base.total_hosts)
}

/// Smallest base prefix able to hold `requests`, never shorter than /8.
pub fn suggest_base_prefix(requests: &[SubnetRequest]) -> u8 {
    let needed = total_needed(requests);
    if needed <= 1 {
        return MAX_LENGTH;
    }
    // ceil(log2(needed))
    let bits = u64::BITS - (needed - 1).leading_zeros();
    let len = (MAX_LENGTH as u32).saturating_sub(bits) as u8;
    len.max(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ipv4;
    use std::net::Ipv4Addr;

    fn req(name: &str, hosts: u64) -> SubnetRequest {
        SubnetRequest::new(name, hosts)
    }

    #[test]
    fn test_required_prefix_length() {
        assert_eq!(required_prefix_length(0), Some(32));
        assert_eq!(required_prefix_length(1), Some(32));
        assert_eq!(required_prefix_length(2), Some(31));
        assert_eq!(required_prefix_length(3), Some(29));
        assert_eq!(required_prefix_length(6), Some(29));
        assert_eq!(required_prefix_length(7), Some(28));
        assert_eq!(required_prefix_length(25), Some(27));
        assert_eq!(required_prefix_length(30), Some(27));
        assert_eq!(required_prefix_length(50), Some(26));
        assert_eq!(required_prefix_length(254), Some(24));
        assert_eq!(required_prefix_length(255), Some(23));
        assert_eq!(required_prefix_length((1 << 32) - 2), Some(0));
        assert_eq!(required_prefix_length((1 << 32) - 1), None);
        assert_eq!(required_prefix_length(u64::MAX), None);
    }

    #[test]
    fn test_required_prefix_is_minimal() {
        for hosts in 3..5000u64 {
            let len = required_prefix_length(hosts).unwrap();
            assert!((1u64 << (32 - len)) - 2 >= hosts, "{hosts} fits /{len}");
            assert!((1u64 << (31 - len)) - 2 < hosts, "{hosts} needs /{len}");
        }
    }

    #[test]
    fn test_align_to_boundary() {
        let addr = u32::from(Ipv4Addr::new(10, 0, 0, 70)) as u64;
        assert_eq!(
            align_to_boundary(addr, 26).unwrap(),
            u32::from(Ipv4Addr::new(10, 0, 0, 64)) as u64
        );
        assert_eq!(align_to_boundary(addr, 0).unwrap(), 0);
        assert_eq!(align_to_boundary(addr, 32).unwrap(), addr);
    }

    #[test]
    fn test_allocate_example() {
        let requests = vec![req("LAN1", 50), req("LAN2", 25), req("WAN", 2)];
        let result = allocate("10.0.0.0", 24, &requests).unwrap();
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.allocations.len(), 3);

        let lan1 = &result.allocations[0];
        assert_eq!(lan1.name, "LAN1");
        assert_eq!(lan1.network_address, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(lan1.prefix_length, 26);
        assert_eq!(lan1.usable_hosts, 62);
        assert_eq!(lan1.first_host, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(lan1.last_host, Ipv4Addr::new(10, 0, 0, 62));
        assert_eq!(lan1.broadcast_address, Ipv4Addr::new(10, 0, 0, 63));

        let lan2 = &result.allocations[1];
        assert_eq!(lan2.name, "LAN2");
        assert_eq!(lan2.network_address, Ipv4Addr::new(10, 0, 0, 64));
        assert_eq!(lan2.prefix_length, 27);
        assert_eq!(lan2.usable_hosts, 30);

        let wan = &result.allocations[2];
        assert_eq!(wan.name, "WAN");
        assert_eq!(wan.network_address, Ipv4Addr::new(10, 0, 0, 96));
        assert_eq!(wan.prefix_length, 31);
        assert_eq!(wan.usable_hosts, 2);

        assert_eq!(result.total_used_hosts, 94);
        assert_eq!(result.total_available_hosts, 254);
        assert_eq!(result.utilization_percent, 37);
        assert_eq!(result.base_network, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(result.base_prefix_length, 24);
    }

    #[test]
    fn test_allocate_sorted_by_address_not_size() {
        // Smaller request listed first still lands after the larger one.
        let requests = vec![req("small", 10), req("big", 100)];
        let result = allocate("192.168.0.0", 24, &requests).unwrap();
        let names: Vec<&str> = result.allocations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small"]);
        assert_eq!(
            result.allocations[1].network_address,
            Ipv4Addr::new(192, 168, 0, 128)
        );
    }

    #[test]
    fn test_allocate_ties_keep_input_order() {
        let requests = vec![req("b", 20), req("a", 20), req("c", 20)];
        let result = allocate("10.1.0.0", 24, &requests).unwrap();
        let names: Vec<&str> = result.allocations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_allocate_warns_and_continues() {
        let requests = vec![
            req("huge", 500),
            req("fits", 100),
            req("also", 100),
            req("late", 60),
        ];
        let result = allocate("10.0.0.0", 24, &requests).unwrap();
        assert_eq!(
            result.warnings,
            vec![
                "Not enough space for \"huge\" (needs 500 hosts)".to_string(),
                "Not enough space for \"late\" (needs 60 hosts)".to_string(),
            ]
        );
        let names: Vec<&str> = result.allocations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["fits", "also"]);
        assert_eq!(result.utilization_percent, 99);
    }

    #[test]
    fn test_allocate_unplaceable_request() {
        let result = allocate("0.0.0.0", 0, &[req("world", u64::MAX)]).unwrap();
        assert!(result.allocations.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.utilization_percent, 0);
    }

    #[test]
    fn test_allocate_whole_space() {
        let result = allocate("0.0.0.0", 0, &[req("all", (1 << 32) - 2)]).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.allocations[0].prefix_length, 0);
        assert_eq!(result.utilization_percent, 100);
    }

    #[test]
    fn test_allocate_host_routes() {
        let requests: Vec<SubnetRequest> = (1..=5).map(|i| req(&format!("h{i}"), 1)).collect();
        let result = allocate("10.9.9.8", 30, &requests).unwrap();
        assert_eq!(result.allocations.len(), 4);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.total_available_hosts, 2);
        // Host routes count one usable address each, so utilization can exceed 100.
        assert_eq!(result.total_used_hosts, 4);
        assert_eq!(result.utilization_percent, 200);
    }

    #[test]
    fn test_allocate_no_overlap() {
        let requests: Vec<SubnetRequest> = [120u64, 3, 60, 14, 2, 1, 29, 6, 9]
            .iter()
            .enumerate()
            .map(|(i, h)| req(&format!("net{i}"), *h))
            .collect();
        let result = allocate("172.16.4.0", 22, &requests).unwrap();
        assert!(result.warnings.is_empty());
        let base = Ipv4::new("172.16.4.0/22").unwrap();
        let nets: Vec<Ipv4> = result
            .allocations
            .iter()
            .map(|a| Ipv4 {
                addr: a.network_address,
                mask: a.prefix_length,
            })
            .collect();
        for (i, a) in nets.iter().enumerate() {
            assert!(base.contains(a.lo()) && base.contains(a.hi()), "{a} outside {base}");
            assert_eq!(a.lo(), a.addr, "{a} not aligned");
            for b in nets.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
        for (alloc, request) in result.allocations.iter().filter_map(|a| {
            requests.iter().find(|r| r.name == a.name).map(|r| (a, r))
        }) {
            assert_eq!(
                Some(alloc.prefix_length),
                required_prefix_length(request.required_hosts)
            );
        }
    }

    #[test]
    fn test_allocate_invalid_base() {
        assert!(allocate("10.0.0", 24, &[req("a", 1)]).is_err());
        assert!(allocate("10.0.0.0", 40, &[req("a", 1)]).is_err());
    }

    #[test]
    fn test_validate_requests() {
        let ok = validate_requests(&[req("a", 1), req("b", 10)]);
        assert!(ok.valid);
        assert!(ok.errors.is_empty());

        let empty = validate_requests(&[]);
        assert!(!empty.valid);
        assert_eq!(empty.errors, vec!["At least one subnet request is required"]);

        let bad = validate_requests(&[
            req("", 5),
            req("dup", 0),
            req("dup", MAX_REQUIRED_HOSTS + 1),
            req("Dup", 3),
        ]);
        assert!(!bad.valid);
        assert_eq!(
            bad.errors,
            vec![
                "All subnets must have a name".to_string(),
                "\"dup\": Required hosts must be at least 1".to_string(),
                "Duplicate subnet name: \"dup\"".to_string(),
                "\"dup\": Required hosts exceeds maximum".to_string(),
            ]
        );
        assert!(validate_requests(&[req("max", MAX_REQUIRED_HOSTS)]).valid);
    }

    #[test]
    fn test_total_needed_and_fit() {
        let requests = vec![req("LAN1", 50), req("LAN2", 25), req("WAN", 2)];
        assert_eq!(total_needed(&requests), 64 + 32 + 2);
        assert!(can_fit("10.0.0.0", 24, &requests).unwrap());
        assert!(!can_fit("10.0.0.0", 26, &requests).unwrap());
        assert_eq!(suggest_base_prefix(&requests), 25);
        assert_eq!(suggest_base_prefix(&[req("x", 1)]), 32);
        assert_eq!(suggest_base_prefix(&[req("x", 100_000_000)]), 8);
    }
}

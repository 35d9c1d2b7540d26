//! Terminal output utilities.
//!
//! Renders calculator results as colored text blocks.

use crate::models::{AllocationResult, NetworkDescriptor, PathAnalysis, SegmentKind};
use crate::processing::{classify_asn, is_well_known_asn, to_asdot};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("{:>20}: {}\n", label, value));
}

/// Multi-line summary of a subnet calculation.
pub fn render_descriptor(net: &NetworkDescriptor) -> String {
    let mut out = String::new();
    let cidr = format!("{}/{}", net.network_address, net.prefix_length);
    out.push_str(&format!("{}\n", cidr.bold()));
    line(&mut out, "Network", net.network_address.to_string().green());
    line(&mut out, "Broadcast", net.broadcast_address.to_string().red());
    line(&mut out, "Subnet mask", net.subnet_mask);
    line(&mut out, "Wildcard mask", net.wildcard_mask);
    line(
        &mut out,
        "Host range",
        format!("{} - {}", net.first_usable_host, net.last_usable_host),
    );
    line(&mut out, "Total addresses", net.total_hosts);
    line(&mut out, "Usable hosts", net.usable_hosts);
    line(&mut out, "Class", net.address_class);
    line(&mut out, "Private", net.is_private);
    line(&mut out, "Loopback", net.is_loopback);
    line(
        &mut out,
        "Binary",
        format!(
            "{}{}",
            net.binary_layout.network_bits.blue(),
            net.binary_layout.host_bits.yellow()
        ),
    );
    line(&mut out, "Octets", net.binary_layout.octets.join("."));
    out
}

/// Table of allocations followed by totals and warnings.
pub fn render_allocation(result: &AllocationResult) -> String {
    let mut out = String::new();
    let base = format!("{}/{}", result.base_network, result.base_prefix_length);
    out.push_str(&format!("VLSM allocation of {}\n", base.bold()));
    for a in &result.allocations {
        out.push_str(&format!(
            "{name},{cidr},{range},{broadcast},{hosts}\n",
            name = format_field(&a.name, 16),
            cidr = format_field(format!("{}/{}", a.network_address, a.prefix_length), 20),
            range = format_field(format!("{} - {}", a.first_host, a.last_host), 33),
            broadcast = format_field(format!("{}_br", a.broadcast_address), 19),
            hosts = format_field(format!("{}_hosts", a.usable_hosts), 14),
        ));
    }
    out.push_str(&format!(
        "Used {} of {} usable hosts ({}%)\n",
        result.total_used_hosts, result.total_available_hosts, result.utilization_percent
    ));
    for warning in &result.warnings {
        out.push_str(&format!("{} {}\n", "WARNING".on_red(), warning));
    }
    out
}

/// Path, origin/neighbor and any issues.
pub fn render_path_analysis(analysis: &PathAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", analysis.as_path.to_string().bold()));
    line(&mut out, "Family", if analysis.is_ipv4 { "IPv4" } else { "IPv6" });
    line(&mut out, "Path length", analysis.path_length);
    line(&mut out, "Unique ASNs", analysis.unique_count);
    let describe_as = |asn: Option<u32>| match asn {
        Some(asn) => format!("AS{} ({}, {})", asn, to_asdot(asn), classify_asn(asn)),
        None => "None".to_string(),
    };
    line(&mut out, "Origin AS", describe_as(analysis.origin_as));
    line(&mut out, "Neighbor AS", describe_as(analysis.neighbor_as));
    for (i, segment) in analysis.segments.iter().enumerate() {
        let kind = match segment.kind {
            SegmentKind::Sequence => "AS_SEQUENCE",
            SegmentKind::Set => "AS_SET",
        };
        let asns: Vec<String> = segment
            .asns
            .iter()
            .map(|asn| {
                if is_well_known_asn(*asn) {
                    asn.to_string().magenta().to_string()
                } else {
                    asn.to_string()
                }
            })
            .collect();
        line(&mut out, &format!("Segment {} {}", i + 1, kind), asns.join(" "));
    }
    for issue in &analysis.issues {
        out.push_str(&format!("{} {}\n", "ISSUE".yellow(), issue));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubnetRequest;
    use crate::processing::{allocate, analyze_path, describe};

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("test", 6), "\"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 6), "  \"42\"");
    }

    #[test]
    fn test_render_descriptor() {
        let text = render_descriptor(&describe("192.168.1.0", 24).unwrap());
        assert!(text.contains("192.168.1.255"));
        assert!(text.contains("192.168.1.1 - 192.168.1.254"));
        assert!(text.contains("11000000.10101000.00000001.00000000"));
        assert!(text.contains("Private"));
        assert_eq!(text.lines().count(), 13);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_allocation() {
        let requests = vec![
            SubnetRequest::new("LAN1", 50),
            SubnetRequest::new("BIG", 5000),
        ];
        let text = render_allocation(&allocate("10.0.0.0", 24, &requests).unwrap());
        assert!(text.contains("\"10.0.0.0/26\""));
        assert!(text.contains("\"62_hosts\""));
        assert!(text.contains("Not enough space for \"BIG\""));
    }

    #[test]
    fn test_render_path_analysis() {
        let analysis = analyze_path("100 100 {200 300} 66536", true).unwrap();
        let text = render_path_analysis(&analysis);
        assert!(text.contains("100 100 { 200 300 } 66536"));
        assert!(text.contains("AS66536 (1.1000, 32-bit)"));
        assert!(text.contains("AS100 appears 2 times"));
        assert!(text.contains("AS_SET"));
    }
}

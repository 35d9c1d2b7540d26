//! Network calculations.
//!
//! This module contains the calculators:
//! - [`subnet`] - Subnet description from address and prefix length
//! - [`vlsm`] - Variable length subnet allocation
//! - [`bgp`] - AS_PATH parsing and analysis

mod bgp;
mod subnet;
mod vlsm;

// Re-export public functions
pub use bgp::{
    analyze_path, analyze_path_with, classify_asn, format_path, is_private_asn,
    is_well_known_asn, parse_asn, parse_path, to_asdot, WELL_KNOWN_ASNS,
};
pub use subnet::{describe, total_hosts, usable_hosts};
pub use vlsm::{
    align_to_boundary, allocate, can_fit, required_prefix_length, suggest_base_prefix,
    total_needed, validate_requests, MAX_REQUIRED_HOSTS,
};

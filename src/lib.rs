//! Network calculators: IPv4 subnetting, VLSM allocation and BGP AS_PATH
//! analysis.
//!
//! # Module Structure
//!
//! - [`models`] - Data structures and IPv4 address arithmetic
//! - [`processing`] - Subnet, VLSM and AS_PATH calculations
//! - [`validators`] - Shape checks for raw input
//! - [`history`] - JSON history of past calculations
//! - [`output`] - Terminal and CSV rendering
//! - [`config`] - Runtime settings
//!
//! All calculations are pure functions over plain values.

pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod output;
pub mod processing;
pub mod validators;

// Re-export commonly used items at crate root
pub use config::Config;
pub use error::{NetCalcError, Result};
pub use models::{
    AddressClass, Allocation, AllocationResult, AsPath, AsnKind, Ipv4, NetworkDescriptor,
    PathAnalysis, PathSegment, SegmentKind, SubnetRequest,
};
pub use processing::{allocate, analyze_path, describe, parse_asn, parse_path, validate_requests};

/// Parse a `name:hosts` request as given on the command line.
pub fn parse_request(text: &str) -> Result<SubnetRequest> {
    let invalid = || {
        NetCalcError::AllocationRequestInvalid(vec![format!(
            "Expected name:hosts, got \"{text}\""
        )])
    };
    let (name, hosts) = text.rsplit_once(':').ok_or_else(invalid)?;
    let hosts: u64 = hosts.trim().parse().map_err(|_| invalid())?;
    Ok(SubnetRequest::new(name.trim(), hosts))
}

/// Validate `requests` and allocate them, failing on any invalid request.
pub fn validate_and_allocate(
    base: &Ipv4,
    requests: &[SubnetRequest],
) -> Result<AllocationResult> {
    let report = validate_requests(requests);
    if !report.valid {
        return Err(NetCalcError::AllocationRequestInvalid(report.errors));
    }
    allocate(&base.addr.to_string(), base.mask, requests)
}

//! Domain models for the network calculators.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] and the address arithmetic helpers
//! - [`NetworkDescriptor`] - Result of a subnet calculation
//! - [`SubnetRequest`], [`Allocation`] and [`AllocationResult`] - VLSM input/output
//! - [`AsPath`] and [`PathAnalysis`] - BGP AS_PATH structures

mod as_path;
mod ipv4;
mod network;
mod vlsm;

// Re-export public types
pub use as_path::{AsPath, AsnKind, PathAnalysis, PathSegment, SegmentKind};
pub use ipv4::{
    broadcast_of, classify, format_address, is_address_in_network, is_loopback, is_private,
    mask_for_prefix, mask_to_prefix, network_of, parse_address, prefix_to_mask_string,
    subnets_of, to_binary_layout, Ipv4, MAX_LENGTH,
};
pub use network::{AddressClass, BinaryLayout, NetworkDescriptor};
pub use vlsm::{Allocation, AllocationResult, RequestValidation, SubnetRequest};

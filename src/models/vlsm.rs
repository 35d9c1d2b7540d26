//! VLSM request and allocation models.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A named subnet and the number of hosts it must hold.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetRequest {
    pub name: String,
    pub required_hosts: u64,
}

impl SubnetRequest {
    pub fn new(name: impl Into<String>, required_hosts: u64) -> Self {
        SubnetRequest {
            name: name.into(),
            required_hosts,
        }
    }
}

/// One subnet carved out of the base network.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub name: String,
    pub network_address: Ipv4Addr,
    pub prefix_length: u8,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    pub broadcast_address: Ipv4Addr,
    pub usable_hosts: u64,
}

/// Outcome of a VLSM run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    /// Sorted by network address.
    pub allocations: Vec<Allocation>,
    pub total_used_hosts: u64,
    pub total_available_hosts: u64,
    /// Rounded percentage. Host routes can push it past 100.
    pub utilization_percent: u32,
    /// One entry per request that could not be placed, in processing order.
    pub warnings: Vec<String>,
    pub base_network: Ipv4Addr,
    pub base_prefix_length: u8,
}

/// All problems found in a request list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

//! Error type shared by every calculator.

use thiserror::Error;

/// Errors returned by the address, allocation and path operations.
#[derive(Debug, Error)]
pub enum NetCalcError {
    /// Malformed dotted-decimal IPv4 text.
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),
    /// Prefix length outside 0-32.
    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(i64),
    /// Malformed or out-of-range ASN token.
    #[error("Invalid ASN: {0}")]
    InvalidAsn(String),
    /// Blank AS_PATH input.
    #[error("AS_PATH cannot be empty")]
    EmptyPath,
    /// One or more subnet requests failed validation.
    #[error("Invalid subnet requests: {}", .0.join("; "))]
    AllocationRequestInvalid(Vec<String>),
    /// Subnet mask text that is not a contiguous run of one-bits.
    #[error("Invalid subnet mask: {0}")]
    InvalidMask(String),
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidrNotation(String),
    #[error("History error: {0}")]
    History(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetCalcError>;

//! Shape checks for raw user input.
//!
//! These run before the calculators so a form or CLI can report bad input
//! early. The calculators re-validate on their own.

use crate::error::{NetCalcError, Result};
use crate::models::{parse_address, MAX_LENGTH};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_IPV6_LENGTH: u8 = 128;

static IPV6_SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv6_segment_regex() -> &'static Regex {
    IPV6_SEGMENT_REGEX.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{1,4}$").expect("Invalid Regex"))
}

/// Four octets 0-255, no leading zeros.
pub fn is_valid_ipv4(text: &str) -> bool {
    parse_address(text).is_ok()
}

fn is_valid_ipv6_segment(segment: &str) -> bool {
    get_ipv6_segment_regex().is_match(segment)
}

/// IPv6 syntax only: eight groups, or fewer around a single `::`.
///
/// IPv4-mapped forms such as `::ffff:1.2.3.4` are not accepted.
pub fn is_valid_ipv6(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text == "::" {
        return true;
    }
    let compressions = text.matches("::").count();
    if compressions > 1 || text.contains(":::") {
        return false;
    }
    if compressions == 1 {
        let (head, tail) = match text.split_once("::") {
            Some(parts) => parts,
            None => return false,
        };
        let groups: Vec<&str> = head
            .split(':')
            .chain(tail.split(':'))
            .filter(|g| !g.is_empty())
            .collect();
        // no empty groups besides the compression itself
        let stray_empty = (!head.is_empty() && head.split(':').any(str::is_empty))
            || (!tail.is_empty() && tail.split(':').any(str::is_empty));
        return !stray_empty
            && groups.len() <= 7
            && groups.iter().all(|g| is_valid_ipv6_segment(g));
    }
    let groups: Vec<&str> = text.split(':').collect();
    groups.len() == 8 && groups.iter().all(|g| is_valid_ipv6_segment(g))
}

pub fn is_valid_prefix_v4(len: i64) -> bool {
    (0..=MAX_LENGTH as i64).contains(&len)
}

pub fn is_valid_prefix_v6(len: i64) -> bool {
    (0..=MAX_IPV6_LENGTH as i64).contains(&len)
}

/// Split `addr/len` into its address text and prefix length.
///
/// Only the shape is checked here; see [`is_valid_cidr_notation`].
pub fn parse_cidr_notation(text: &str) -> Result<(String, u8)> {
    let invalid = || NetCalcError::InvalidCidrNotation(text.to_string());
    let (addr, len) = text.trim().split_once('/').ok_or_else(invalid)?;
    if addr.is_empty() || len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let len: u8 = len.parse().map_err(|_| invalid())?;
    Ok((addr.to_string(), len))
}

/// `addr/len` with a valid IPv4 (len 0-32) or IPv6 (len 0-128) address.
pub fn is_valid_cidr_notation(text: &str) -> bool {
    let Ok((addr, len)) = parse_cidr_notation(text) else {
        return false;
    };
    if is_valid_ipv4(&addr) {
        return is_valid_prefix_v4(len as i64);
    }
    is_valid_ipv6(&addr) && is_valid_prefix_v6(len as i64)
}

/// ASDOT (`high.low`, each 0-65535) or a plain ASN 1-4294967295.
pub fn is_valid_asn_token(text: &str) -> bool {
    match crate::processing::parse_asn(text) {
        Ok(asn) => text.contains('.') || asn >= 1,
        Err(_) => false,
    }
}

/// Non-empty, whitespace separated list of tokens accepted by
/// [`is_valid_asn_token`]. AS_SET braces are not accepted.
pub fn is_valid_as_path(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.split_whitespace().all(is_valid_asn_token)
}

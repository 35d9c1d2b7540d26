//! BGP AS_PATH parsing and analysis.
//!
//! Input is usually pasted from router output, so the path parser skips
//! tokens it cannot read instead of failing. [`parse_asn`] on its own is
//! strict.

use crate::config::DEFAULT_LONG_PATH_THRESHOLD;
use crate::error::{NetCalcError, Result};
use crate::models::{AsPath, AsnKind, PathAnalysis, PathSegment, SegmentKind};
use itertools::Itertools;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Reserved and special-purpose ASNs.
pub const WELL_KNOWN_ASNS: [u32; 7] = [0, 23456, 65535, 65536, 65551, 131072, 4294967295];

/// Regex matching one `{...}` AS_SET span.
static AS_SET_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_as_set_regex() -> &'static Regex {
    AS_SET_REGEX.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid Regex"))
}

fn parse_decimal(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse one ASN token, plain (`64512`) or ASDOT (`1.1000`).
///
/// # Examples
/// ```
/// use netcalc::processing::parse_asn;
/// assert_eq!(parse_asn("1.1000").unwrap(), 66536);
/// assert!(parse_asn("4294967296").is_err());
/// ```
pub fn parse_asn(token: &str) -> Result<u32> {
    let trimmed = token.trim();
    let invalid = || NetCalcError::InvalidAsn(token.to_string());

    if trimmed.contains('.') {
        let (high, low) = trimmed.split_once('.').ok_or_else(invalid)?;
        let high = parse_decimal(high).filter(|v| *v <= 65535).ok_or_else(invalid)?;
        let low = parse_decimal(low).filter(|v| *v <= 65535).ok_or_else(invalid)?;
        return Ok((high * 65536 + low) as u32);
    }

    parse_decimal(trimmed)
        .filter(|v| *v <= u32::MAX as u64)
        .map(|v| v as u32)
        .ok_or_else(invalid)
}

/// Whitespace-separated ASNs; unreadable tokens are logged and dropped.
fn parse_asn_list(text: &str) -> Vec<u32> {
    text.split_whitespace()
        .filter_map(|token| match parse_asn(token) {
            Ok(asn) => Some(asn),
            Err(_) => {
                log::warn!("Invalid ASN: {token}");
                None
            }
        })
        .collect()
}

fn push_segment(segments: &mut Vec<PathSegment>, kind: SegmentKind, text: &str) {
    let asns = parse_asn_list(text);
    if !asns.is_empty() {
        segments.push(PathSegment { kind, asns });
    }
}

/// Parse an AS_PATH such as `100 200 {300 400} 500`.
///
/// Text outside braces becomes AS_SEQUENCE segments, each `{...}` span an
/// AS_SET. A path made only of invalid tokens parses to an empty path.
pub fn parse_path(text: &str) -> Result<AsPath> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NetCalcError::EmptyPath);
    }

    let mut segments = Vec::new();
    let mut last_index = 0;
    for caps in get_as_set_regex().captures_iter(trimmed) {
        // group 0 always exists; group 1 is required by the pattern
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_segment(
            &mut segments,
            SegmentKind::Sequence,
            &trimmed[last_index..whole.start()],
        );
        push_segment(&mut segments, SegmentKind::Set, inner.as_str());
        last_index = whole.end();
    }
    push_segment(&mut segments, SegmentKind::Sequence, &trimmed[last_index..]);

    let asns: Vec<u32> = segments
        .iter()
        .flat_map(|s| s.asns.iter().copied())
        .collect();
    Ok(AsPath {
        length: asns.len(),
        segments,
        asns,
    })
}

/// Render a path back to text, sets as `{ a b }`.
pub fn format_path(path: &AsPath) -> String {
    path.to_string()
}

/// `asn` in ASDOT if it does not fit 16 bits, plain otherwise.
pub fn to_asdot(asn: u32) -> String {
    if asn <= 65535 {
        asn.to_string()
    } else {
        format!("{}.{}", asn / 65536, asn % 65536)
    }
}

/// RFC 6996 private ranges.
pub fn is_private_asn(asn: u32) -> bool {
    (64512..=65534).contains(&asn) || (4_200_000_000..=4_294_967_294).contains(&asn)
}

pub fn is_well_known_asn(asn: u32) -> bool {
    WELL_KNOWN_ASNS.contains(&asn)
}

/// Classify an ASN. Private and reserved ranges win over width.
pub fn classify_asn(asn: u32) -> AsnKind {
    if is_private_asn(asn) {
        AsnKind::Private
    } else if matches!(asn, 0 | 65535 | 4_294_967_295) {
        AsnKind::Reserved
    } else if asn <= 65535 {
        AsnKind::SixteenBit
    } else {
        AsnKind::ThirtyTwoBit
    }
}

/// Parse and analyze `text` with the default long-path threshold.
pub fn analyze_path(text: &str, is_ipv4: bool) -> Result<PathAnalysis> {
    analyze_path_with(text, is_ipv4, DEFAULT_LONG_PATH_THRESHOLD)
}

/// Parse and analyze `text`; paths longer than `long_path_threshold`
/// get an "unusually long" issue.
pub fn analyze_path_with(
    text: &str,
    is_ipv4: bool,
    long_path_threshold: usize,
) -> Result<PathAnalysis> {
    let as_path = parse_path(text)?;
    let unique_asns: Vec<u32> = as_path.asns.iter().copied().unique().collect();
    let mut issues = Vec::new();

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for asn in &as_path.asns {
        *counts.entry(*asn).or_default() += 1;
    }
    let mut prepended_asns = Vec::new();
    for asn in &unique_asns {
        let count = counts.get(asn).copied().unwrap_or(0);
        if count > 1 {
            prepended_asns.push(*asn);
            issues.push(format!("AS{asn} appears {count} times (possible prepending)"));
        }
    }

    for asn in as_path.asns.iter().filter(|a| is_private_asn(**a)) {
        issues.push(format!(
            "AS{asn} is a private ASN (64512-65534 or 4200000000-4294967294)"
        ));
    }

    if as_path.asns.len() > long_path_threshold {
        issues.push(format!(
            "AS path is unusually long ({} ASNs)",
            as_path.asns.len()
        ));
    }

    log::debug!(
        "analyze_path({text:?}) length={} unique={} issues={}",
        as_path.length,
        unique_asns.len(),
        issues.len()
    );

    Ok(PathAnalysis {
        path_length: as_path.length,
        unique_count: unique_asns.len(),
        segments: as_path.segments.clone(),
        original_text: text.to_string(),
        is_ipv4,
        origin_as: as_path.asns.last().copied(),
        neighbor_as: as_path.asns.first().copied(),
        unique_asns,
        prepended_asns,
        issues,
        as_path,
    })
}

//! BGP AS_PATH models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment type of an AS_PATH.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Ordered traversal.
    #[serde(rename = "AS_SEQUENCE")]
    Sequence,
    /// Unordered aggregate, written `{a b}`.
    #[serde(rename = "AS_SET")]
    Set,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub asns: Vec<u32>,
}

/// Parsed AS_PATH.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AsPath {
    pub segments: Vec<PathSegment>,
    /// Every ASN in textual order across all segments.
    pub asns: Vec<u32>,
    pub length: usize,
}

impl fmt::Display for AsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| {
                let asns: Vec<String> = segment.asns.iter().map(|a| a.to_string()).collect();
                match segment.kind {
                    SegmentKind::Set => format!("{{ {} }}", asns.join(" ")),
                    SegmentKind::Sequence => asns.join(" "),
                }
            })
            .collect();
        f.write_str(&parts.join(" "))
    }
}

/// Width/range class of an ASN.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsnKind {
    #[serde(rename = "16-bit")]
    SixteenBit,
    #[serde(rename = "32-bit")]
    ThirtyTwoBit,
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "reserved")]
    Reserved,
}

impl fmt::Display for AsnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AsnKind::SixteenBit => "16-bit",
            AsnKind::ThirtyTwoBit => "32-bit",
            AsnKind::Private => "private",
            AsnKind::Reserved => "reserved",
        };
        f.write_str(s)
    }
}

/// Statistics and diagnostics for one AS_PATH.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PathAnalysis {
    pub as_path: AsPath,
    pub path_length: usize,
    /// First-seen order, not sorted.
    pub unique_asns: Vec<u32>,
    pub unique_count: usize,
    pub segments: Vec<PathSegment>,
    pub original_text: String,
    pub is_ipv4: bool,
    /// Last ASN of the path.
    pub origin_as: Option<u32>,
    /// First ASN of the path.
    pub neighbor_as: Option<u32>,
    /// ASNs seen more than once, first-seen order.
    pub prepended_asns: Vec<u32>,
    pub issues: Vec<String>,
}

//! FORMAT key indexing and evidence extraction.
//!
//! A record's FORMAT column (e.g. `GT:DP:AO`) defines the layout of every
//! sample column on that line. Only the five evidence codes this tool
//! understands are indexed; any other key just occupies a position.

use std::borrow::Cow;
use std::fmt;

/// The evidence codes read from sample columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceCode {
    /// Total read depth.
    Dp,
    /// Alternate allele observation count.
    Ao,
    /// Total supporting reads for a structural variant.
    Su,
    /// Discordant paired-end reads.
    Pe,
    /// Split reads.
    Sr,
}

impl EvidenceCode {
    /// All codes, in array slot order.
    pub const ALL: [EvidenceCode; 5] = [
        EvidenceCode::Dp,
        EvidenceCode::Ao,
        EvidenceCode::Su,
        EvidenceCode::Pe,
        EvidenceCode::Sr,
    ];

    /// Map a FORMAT key onto a known evidence code.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "DP" => Some(EvidenceCode::Dp),
            "AO" => Some(EvidenceCode::Ao),
            "SU" => Some(EvidenceCode::Su),
            "PE" => Some(EvidenceCode::Pe),
            "SR" => Some(EvidenceCode::Sr),
            _ => None,
        }
    }

    /// The FORMAT key as it appears in a VCF file.
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceCode::Dp => "DP",
            EvidenceCode::Ao => "AO",
            EvidenceCode::Su => "SU",
            EvidenceCode::Pe => "PE",
            EvidenceCode::Sr => "SR",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EvidenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positions of the known evidence codes within one record's FORMAT field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatKeyIndex {
    slots: [Option<usize>; 5],
    key_count: usize,
}

impl FormatKeyIndex {
    /// Build the index from a colon-delimited FORMAT field.
    ///
    /// A repeated key keeps its last position.
    pub fn build(format_field: &str) -> Self {
        let mut index = FormatKeyIndex::default();
        for (position, key) in format_field.split(':').enumerate() {
            if let Some(code) = EvidenceCode::from_key(key) {
                index.slots[code.slot()] = Some(position);
            }
            index.key_count = position + 1;
        }
        index
    }

    /// Position of `code`, if the FORMAT field declares it.
    pub fn position(&self, code: EvidenceCode) -> Option<usize> {
        self.slots[code.slot()]
    }

    /// Returns true if the FORMAT field declares `code`.
    pub fn contains(&self, code: EvidenceCode) -> bool {
        self.position(code).is_some()
    }

    /// Number of keys in the FORMAT field, known or not.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Read the value for `code` from a sample column.
    ///
    /// Multi-allelic values (`3,7`) reduce to their maximum. Unparsable or
    /// absent sub-values count as zero. Returns `None` only when the FORMAT
    /// field does not declare `code`.
    pub fn extract(&self, sample_field: &str, code: EvidenceCode) -> Option<u64> {
        let position = self.position(code)?;
        let value = sample_field
            .split(':')
            .nth(position)
            .map(max_of_alleles)
            .unwrap_or(0);
        Some(value)
    }
}

/// Largest integer among comma-delimited sub-values.
fn max_of_alleles(raw: &str) -> u64 {
    raw.split(',')
        .filter_map(|v| v.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// Expand the missing-sample marker `.` into one zero per FORMAT key.
///
/// Any other sample field is returned as-is.
pub fn expand_missing<'a>(sample_field: &'a str, index: &FormatKeyIndex) -> Cow<'a, str> {
    if sample_field == "." {
        let zeros = vec!["0"; index.key_count().max(1)];
        Cow::Owned(zeros.join(":"))
    } else {
        Cow::Borrowed(sample_field)
    }
}

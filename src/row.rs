//! VCF data row parser.
//!
//! Splits a data line into its FORMAT and sample columns and resolves each
//! sample's numeric evidence for the record's mode.

use crate::error::{Result, VcfCompareError};
use crate::format::{EvidenceCode, FormatKeyIndex, expand_missing};
use crate::header::ColumnLayout;
use crate::mode::{VariantMode, classify, require_keys};

/// Numeric evidence for one sample on one record.
///
/// Codes not read by the record's mode stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleEvidence {
    pub dp: u64,
    pub ao: u64,
    pub su: u64,
    pub pe: u64,
    pub sr: u64,
}

impl SampleEvidence {
    /// Resolve the evidence in a sample column.
    ///
    /// The missing marker `.` yields all-zero evidence.
    pub fn extract(sample_field: &str, index: &FormatKeyIndex, mode: VariantMode) -> Self {
        let field = expand_missing(sample_field, index);
        let get = |code| index.extract(&field, code).unwrap_or(0);

        let mut evidence = SampleEvidence::default();
        if mode.uses_snp() {
            evidence.dp = get(EvidenceCode::Dp);
            evidence.ao = get(EvidenceCode::Ao);
        }
        if mode.uses_sv() {
            evidence.su = get(EvidenceCode::Su);
            evidence.pe = get(EvidenceCode::Pe);
            evidence.sr = get(EvidenceCode::Sr);
        }
        evidence
    }
}

/// A classified data line with per-sample evidence.
#[derive(Debug, Clone)]
pub struct DataRow<'a> {
    /// The original line, without its line terminator.
    pub line: &'a str,
    pub format: &'a str,
    pub mode: VariantMode,
    /// Evidence in the same order as the layout's samples.
    pub samples: Vec<SampleEvidence>,
}

/// Parse a data line against the file's column layout.
pub fn parse_row<'a>(line: &'a str, layout: &ColumnLayout) -> Result<DataRow<'a>> {
    let fields: Vec<&str> = line.split('\t').collect();

    let expected = layout.expected_columns();
    if fields.len() < expected {
        return Err(VcfCompareError::MissingSampleColumns {
            expected,
            found: fields.len(),
        });
    }

    let format = fields[layout.format_column];
    let index = FormatKeyIndex::build(format);
    let mode = classify(&index, format)?;
    require_keys(mode, &index, format)?;

    let samples = fields[layout.format_column + 1..expected]
        .iter()
        .map(|field| SampleEvidence::extract(field, &index, mode))
        .collect();

    Ok(DataRow {
        line,
        format,
        mode,
        samples,
    })
}

//! Evidence mode classification.
//!
//! Each record is classified by which evidence keys its FORMAT field
//! declares. A file-wide accumulator tracks the modes seen so far.

use std::fmt;

use crate::error::{Result, VcfCompareError};
use crate::format::{EvidenceCode, FormatKeyIndex};

/// The kind of evidence a single record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantMode {
    /// Point mutation evidence (DP and AO).
    Snp,
    /// Structural variant evidence (SU, PE and SR).
    Sv,
    /// Both kinds of evidence.
    Both,
}

impl VariantMode {
    /// Returns true if the mode reads DP/AO evidence.
    pub fn uses_snp(self) -> bool {
        matches!(self, VariantMode::Snp | VariantMode::Both)
    }

    /// Returns true if the mode reads SU/PE/SR evidence.
    pub fn uses_sv(self) -> bool {
        matches!(self, VariantMode::Sv | VariantMode::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariantMode::Snp => "SNP",
            VariantMode::Sv => "SV",
            VariantMode::Both => "BOTH",
        }
    }
}

impl fmt::Display for VariantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a record from the evidence keys its FORMAT field declares.
pub fn classify(index: &FormatKeyIndex, format_field: &str) -> Result<VariantMode> {
    let snp = index.contains(EvidenceCode::Dp) || index.contains(EvidenceCode::Ao);
    let sv = index.contains(EvidenceCode::Su)
        || index.contains(EvidenceCode::Pe)
        || index.contains(EvidenceCode::Sr);

    match (snp, sv) {
        (true, true) => Ok(VariantMode::Both),
        (true, false) => Ok(VariantMode::Snp),
        (false, true) => Ok(VariantMode::Sv),
        (false, false) => Err(VcfCompareError::Unclassifiable(format_field.to_string())),
    }
}

/// Check that every key the mode's tests read is present.
pub fn require_keys(mode: VariantMode, index: &FormatKeyIndex, format_field: &str) -> Result<()> {
    let mut required: Vec<EvidenceCode> = Vec::with_capacity(5);
    if mode.uses_snp() {
        required.extend([EvidenceCode::Dp, EvidenceCode::Ao]);
    }
    if mode.uses_sv() {
        required.extend([EvidenceCode::Su, EvidenceCode::Pe, EvidenceCode::Sr]);
    }

    match required.into_iter().find(|code| !index.contains(*code)) {
        Some(code) => Err(VcfCompareError::MissingKey {
            key: code.as_str(),
            mode: mode.as_str(),
            format: format_field.to_string(),
        }),
        None => Ok(()),
    }
}

/// The evidence modes observed across a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalMode {
    /// No record classified yet.
    #[default]
    Unset,
    Snp,
    Sv,
    Both,
    /// SNP-only and SV-only records were both seen.
    Mixed,
}

impl GlobalMode {
    /// Fold one record's mode into the accumulator.
    ///
    /// `Mixed` is absorbing. `Both` overrides any single concrete mode.
    pub fn next(self, observed: VariantMode) -> GlobalMode {
        match (self, observed) {
            (GlobalMode::Mixed, _) => GlobalMode::Mixed,
            (_, VariantMode::Both) => GlobalMode::Both,
            (GlobalMode::Both, _) => GlobalMode::Both,
            (GlobalMode::Unset, VariantMode::Snp) => GlobalMode::Snp,
            (GlobalMode::Unset, VariantMode::Sv) => GlobalMode::Sv,
            (GlobalMode::Snp, VariantMode::Snp) => GlobalMode::Snp,
            (GlobalMode::Sv, VariantMode::Sv) => GlobalMode::Sv,
            (GlobalMode::Snp, VariantMode::Sv) | (GlobalMode::Sv, VariantMode::Snp) => {
                GlobalMode::Mixed
            }
        }
    }

    /// Returns true if SNP criteria describe some record in the file.
    pub fn uses_snp(self) -> bool {
        matches!(self, GlobalMode::Snp | GlobalMode::Both | GlobalMode::Mixed)
    }

    /// Returns true if SV criteria describe some record in the file.
    pub fn uses_sv(self) -> bool {
        matches!(self, GlobalMode::Sv | GlobalMode::Both | GlobalMode::Mixed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlobalMode::Unset => "UNSET",
            GlobalMode::Snp => "SNP",
            GlobalMode::Sv => "SV",
            GlobalMode::Both => "BOTH",
            GlobalMode::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for GlobalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Per-record filtering.
//!
//! Decides which samples are hits on a record and whether the record as a
//! whole discriminates between samples:
//! - SNP samples need `DP >= min depth`, `DP > 0` and `AO/DP >= min ratio`
//! - SV samples need SU, PE and SR at or above their minimums
//! - BOTH samples need all of the above
//!
//! A record passes when some but not all samples are hits and, if sample
//! groups are configured, at least one group pair differs.

use std::collections::HashSet;

use log::debug;

use crate::criteria::Criteria;
use crate::error::Result;
use crate::header::ColumnLayout;
use crate::mode::VariantMode;
use crate::rank::{EvidenceKind, HitSupport, RankedRecord};
use crate::row::{SampleEvidence, parse_row};

/// Outcome of filtering one data line.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub mode: VariantMode,
    /// Present when the record passed.
    pub ranked: Option<RankedRecord>,
}

/// Applies the configured criteria to data lines.
#[derive(Debug, Clone, Copy)]
pub struct RecordFilter<'a> {
    criteria: &'a Criteria,
}

impl<'a> RecordFilter<'a> {
    pub fn new(criteria: &'a Criteria) -> Self {
        Self { criteria }
    }

    /// Returns true if the sample shows the variant.
    pub fn sample_passes(&self, mode: VariantMode, evidence: &SampleEvidence) -> bool {
        let c = self.criteria;
        let snp_ok = || {
            evidence.dp >= c.min_read_depth
                && evidence.dp > 0
                && evidence.ao as f64 / evidence.dp as f64 >= c.min_support_ratio
        };
        let sv_ok = || {
            evidence.su >= c.min_sv_reads
                && evidence.pe >= c.min_discordants
                && evidence.sr >= c.min_splits
        };

        match mode {
            VariantMode::Snp => snp_ok(),
            VariantMode::Sv => sv_ok(),
            VariantMode::Both => snp_ok() && sv_ok(),
        }
    }

    /// Returns true if a non-hit on this sample can be trusted.
    ///
    /// SV-only records carry no depth, so every sample qualifies.
    pub fn is_adequate(&self, mode: VariantMode, evidence: &SampleEvidence) -> bool {
        !mode.uses_snp() || evidence.dp >= self.criteria.min_read_depth
    }

    /// The support shown for a hit sample.
    pub fn hit_support(&self, mode: VariantMode, evidence: &SampleEvidence) -> HitSupport {
        if mode.uses_snp() {
            return HitSupport::Ratio {
                alt: evidence.ao,
                depth: evidence.dp,
            };
        }

        let c = self.criteria;
        let keep = |threshold: u64, value: u64| (threshold > 0).then_some(value);
        HitSupport::Coded {
            su: keep(c.min_sv_reads, evidence.su),
            pe: keep(c.min_discordants, evidence.pe),
            sr: keep(c.min_splits, evidence.sr),
        }
    }

    /// Filter one data line.
    ///
    /// Errors only for lines that cannot be classified; a record that
    /// simply fails the criteria yields an `Evaluation` without a record.
    pub fn evaluate(&self, line: &str, layout: &ColumnLayout) -> Result<Evaluation> {
        let row = parse_row(line, layout)?;
        let mode = row.mode;

        let mut hits: Vec<&str> = Vec::new();
        let mut support: Vec<HitSupport> = Vec::new();
        let mut adequate: HashSet<&str> = HashSet::new();
        for (name, evidence) in layout.samples.iter().zip(row.samples.iter()) {
            if self.is_adequate(mode, evidence) {
                adequate.insert(name);
            }
            if self.sample_passes(mode, evidence) {
                hits.push(name);
                support.push(self.hit_support(mode, evidence));
            }
        }

        let got = hits.len();
        let total = layout.samples.len();
        if got == 0 || got >= total {
            debug!("Dropping record with {got} of {total} samples as hits: {}", first_columns(line));
            return Ok(Evaluation { mode, ranked: None });
        }

        let mut summary = format!("{},{}", got, self.criteria.describe(mode));
        if self.criteria.has_groups() {
            let hit_set: HashSet<&str> = hits.iter().copied().collect();
            let notes: Vec<String> = self
                .criteria
                .group_pairs
                .iter()
                .enumerate()
                .filter_map(|(i, pair)| pair.evaluate(i + 1, &hit_set, &adequate))
                .map(|note| note.to_string())
                .collect();
            if notes.is_empty() {
                debug!("No group pair differs: {}", first_columns(line));
                return Ok(Evaluation { mode, ranked: None });
            }
            for note in notes {
                summary.push(',');
                summary.push_str(&note);
            }
        }

        let kind = if mode.uses_snp() {
            EvidenceKind::Ratio
        } else {
            EvidenceKind::Coded
        };
        let ranked = RankedRecord::new(
            got,
            summary,
            hits.into_iter().map(str::to_string).collect(),
            support,
            kind,
            line.to_string(),
        );
        Ok(Evaluation {
            mode,
            ranked: Some(ranked),
        })
    }
}

/// CHROM and POS of a line, for diagnostics.
pub(crate) fn first_columns(line: &str) -> String {
    line.split('\t').take(2).collect::<Vec<_>>().join(":")
}

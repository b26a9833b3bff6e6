//! Filtering thresholds and sample group configuration.
//!
//! Values arrive already parsed from the command line as `CriteriaOptions`
//! and are validated once, before any file is read.

use crate::error::{Result, VcfCompareError};
use crate::group::{GroupPair, SampleGroup};
use crate::mode::{GlobalMode, VariantMode};

/// Default minimum alternate/depth ratio for SNP evidence.
pub const DEFAULT_MIN_SUPPORT_RATIO: f64 = 0.7;

/// Default minimum read depth for SNP evidence.
pub const DEFAULT_MIN_READ_DEPTH: u64 = 2;

/// Unvalidated threshold and group settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaOptions {
    pub min_support_ratio: f64,
    pub min_read_depth: u64,
    pub min_discordants: Option<u64>,
    pub min_splits: Option<u64>,
    /// Defaults to discordants plus splits when unset.
    pub min_sv_reads: Option<u64>,
    /// Sample groups, compared pairwise in order.
    pub sample_groups: Vec<Vec<String>>,
    /// One minimum per group; empty means each group's size.
    pub group_diff_mins: Vec<usize>,
}

impl Default for CriteriaOptions {
    fn default() -> Self {
        Self {
            min_support_ratio: DEFAULT_MIN_SUPPORT_RATIO,
            min_read_depth: DEFAULT_MIN_READ_DEPTH,
            min_discordants: None,
            min_splits: None,
            min_sv_reads: None,
            sample_groups: Vec::new(),
            group_diff_mins: Vec::new(),
        }
    }
}

/// Validated filtering criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub min_support_ratio: f64,
    pub min_read_depth: u64,
    pub min_discordants: u64,
    pub min_splits: u64,
    pub min_sv_reads: u64,
    pub group_pairs: Vec<GroupPair>,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            min_support_ratio: DEFAULT_MIN_SUPPORT_RATIO,
            min_read_depth: DEFAULT_MIN_READ_DEPTH,
            min_discordants: 0,
            min_splits: 0,
            min_sv_reads: 0,
            group_pairs: Vec::new(),
        }
    }
}

impl Criteria {
    /// Validate options and resolve defaults.
    pub fn from_options(options: CriteriaOptions) -> Result<Self> {
        let ratio = options.min_support_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(VcfCompareError::InvalidSupportRatio(ratio));
        }

        let min_discordants = options.min_discordants.unwrap_or(0);
        let min_splits = options.min_splits.unwrap_or(0);
        let sum = min_discordants.checked_add(min_splits).ok_or(
            VcfCompareError::SvThresholdOverflow {
                discordants: min_discordants,
                splits: min_splits,
            },
        )?;
        let min_sv_reads = match options.min_sv_reads {
            Some(sv_reads) if sv_reads < sum => {
                return Err(VcfCompareError::SvReadsBelowSum { sv_reads, sum });
            }
            Some(sv_reads) => sv_reads,
            None => sum,
        };

        let group_pairs = build_group_pairs(options.sample_groups, options.group_diff_mins)?;

        Ok(Self {
            min_support_ratio: ratio,
            min_read_depth: options.min_read_depth,
            min_discordants,
            min_splits,
            min_sv_reads,
            group_pairs,
        })
    }

    /// Returns true if group difference rules decide which records pass.
    pub fn has_groups(&self) -> bool {
        !self.group_pairs.is_empty()
    }

    /// Criteria text for a record of the given mode.
    pub fn describe(&self, mode: VariantMode) -> String {
        self.describe_parts(mode.uses_snp(), mode.uses_sv())
    }

    /// Criteria text for the modes seen across a file, if any were seen.
    pub fn describe_global(&self, mode: GlobalMode) -> Option<String> {
        match mode {
            GlobalMode::Unset => None,
            _ => Some(self.describe_parts(mode.uses_snp(), mode.uses_sv())),
        }
    }

    fn describe_parts(&self, snp: bool, sv: bool) -> String {
        let mut parts = Vec::with_capacity(5);
        if snp {
            parts.push(format!("MINDEPTH>={}", self.min_read_depth));
            parts.push(format!("MINSUPPORTRATIO>={}", self.min_support_ratio));
        }
        if sv {
            parts.push(format!("MINSVREADS>={}", self.min_sv_reads));
            parts.push(format!("MINDISCORDANTS>={}", self.min_discordants));
            parts.push(format!("MINSPLITS>={}", self.min_splits));
        }
        parts.join(",")
    }
}

/// Pair up groups and check the majority reference requirement.
fn build_group_pairs(groups: Vec<Vec<String>>, mins: Vec<usize>) -> Result<Vec<GroupPair>> {
    if groups.len() % 2 != 0 {
        return Err(VcfCompareError::OddGroupCount(groups.len()));
    }
    if !mins.is_empty() && mins.len() != groups.len() {
        return Err(VcfCompareError::GroupDiffMinCount {
            groups: groups.len(),
            mins: mins.len(),
        });
    }

    let mut sample_groups = Vec::with_capacity(groups.len());
    for (i, names) in groups.into_iter().enumerate() {
        if names.is_empty() {
            return Err(VcfCompareError::EmptyGroup(i + 1));
        }
        let size = names.len();
        let min = mins.get(i).copied().unwrap_or(size);
        if min == 0 || min > size {
            return Err(VcfCompareError::GroupDiffMinRange {
                group: i + 1,
                min,
                size,
            });
        }
        sample_groups.push(SampleGroup::new(names, min));
    }

    let mut pairs = Vec::with_capacity(sample_groups.len() / 2);
    let mut iter = sample_groups.into_iter();
    while let (Some(first), Some(second)) = (iter.next(), iter.next()) {
        if !first.is_majority() && !second.is_majority() {
            return Err(VcfCompareError::NoMajorityGroup {
                pair: pairs.len() + 1,
            });
        }
        pairs.push(GroupPair::new(first, second));
    }

    Ok(pairs)
}

//! Error types for the sample comparison library.

use thiserror::Error;

/// Errors that can occur while configuring, filtering or ranking.
#[derive(Error, Debug)]
pub enum VcfCompareError {
    /// Sample groups must be supplied in pairs.
    #[error("Sample groups must be supplied in pairs, got {0} group(s)")]
    OddGroupCount(usize),

    /// A sample group had no members.
    #[error("Sample group {0} is empty")]
    EmptyGroup(usize),

    /// The number of group difference minimums does not match the groups.
    #[error("Expected {groups} group difference minimum(s), got {mins}")]
    GroupDiffMinCount { groups: usize, mins: usize },

    /// A group difference minimum is outside `1..=group size`.
    #[error("Group difference minimum {min} for group {group} must be between 1 and {size}")]
    GroupDiffMinRange { group: usize, min: usize, size: usize },

    /// Neither group in a pair requires a majority of its members.
    #[error(
        "Group pair {pair} has no majority reference group: at least one group's \
         minimum must exceed half of its size"
    )]
    NoMajorityGroup { pair: usize },

    /// The minimum SV read count cannot be less than splits plus discordants.
    #[error("Minimum SV reads ({sv_reads}) is less than minimum splits plus discordants ({sum})")]
    SvReadsBelowSum { sv_reads: u64, sum: u64 },

    /// Minimum splits plus discordants does not fit in a read count.
    #[error("Minimum splits ({splits}) plus discordants ({discordants}) is too large")]
    SvThresholdOverflow { discordants: u64, splits: u64 },

    /// The minimum support ratio is negative, above one, or not a number.
    #[error("Minimum support ratio must be between 0 and 1, got {0}")]
    InvalidSupportRatio(f64),

    /// A data line has fewer sample columns than the header declares.
    #[error("Expected {expected} columns, got {found}")]
    MissingSampleColumns { expected: usize, found: usize },

    /// A FORMAT key required by the record's evidence mode is absent.
    #[error("FORMAT field {format:?} is missing required key {key} for {mode} evidence")]
    MissingKey {
        key: &'static str,
        mode: &'static str,
        format: String,
    },

    /// The FORMAT field holds none of the known evidence keys.
    #[error("FORMAT field {0:?} has none of the evidence keys DP, AO, SU, PE, SR")]
    Unclassifiable(String),

    /// A previously ranked line could not be read back.
    #[error("Ranked line parse error: {0}")]
    SummaryParseError(String),

    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VcfCompareError {
    /// Returns true for errors that only invalidate a single record.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            VcfCompareError::MissingSampleColumns { .. }
                | VcfCompareError::MissingKey { .. }
                | VcfCompareError::Unclassifiable(_)
                | VcfCompareError::SummaryParseError(_)
        )
    }

    /// Returns true for errors raised while validating the configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            VcfCompareError::OddGroupCount(_)
                | VcfCompareError::EmptyGroup(_)
                | VcfCompareError::GroupDiffMinCount { .. }
                | VcfCompareError::GroupDiffMinRange { .. }
                | VcfCompareError::NoMajorityGroup { .. }
                | VcfCompareError::SvReadsBelowSum { .. }
                | VcfCompareError::SvThresholdOverflow { .. }
                | VcfCompareError::InvalidSupportRatio(_)
        )
    }
}

/// Result type alias for sample comparison operations.
pub type Result<T> = std::result::Result<T, VcfCompareError>;

//! VCF column header handling.
//!
//! Locates the FORMAT column in the `#CHROM` header line and names the
//! sample columns that follow it.

use log::warn;

/// Column index of FORMAT in a standard VCF.
pub const DEFAULT_FORMAT_COLUMN: usize = 8;

/// Prefix added to the column header of ranked output.
pub const RANKED_HEADER_PREFIX: &str = "#NUMHITS,SEARCHCRITERIA\tSNPREAD/DEPTH\tSNPSAMPLES\t";

/// Where the FORMAT and sample columns sit in each data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Zero-based index of the FORMAT column.
    pub format_column: usize,
    /// Sample names, in column order after FORMAT.
    pub samples: Vec<String>,
}

impl ColumnLayout {
    /// Build the layout from a `#`-prefixed column header line.
    ///
    /// Falls back to the standard FORMAT position with a warning when no
    /// column is named exactly `FORMAT`.
    pub fn from_header_line(line: &str) -> Self {
        let columns: Vec<&str> = line.trim_start_matches('#').split('\t').collect();

        let format_column = match columns.iter().position(|c| *c == "FORMAT") {
            Some(i) => i,
            None => {
                warn!(
                    "No FORMAT column found in header, assuming column {}",
                    DEFAULT_FORMAT_COLUMN + 1
                );
                DEFAULT_FORMAT_COLUMN
            }
        };

        let samples = columns
            .iter()
            .skip(format_column + 1)
            .map(|s| s.to_string())
            .collect();

        Self {
            format_column,
            samples,
        }
    }

    /// Layout for a file without a column header, inferred from a data line.
    ///
    /// Samples are named `SAMPLE1`, `SAMPLE2`, ... by position.
    pub fn positional(data_line: &str) -> Self {
        warn!(
            "No column header line found, assuming FORMAT is column {}",
            DEFAULT_FORMAT_COLUMN + 1
        );
        let column_count = data_line.split('\t').count();
        let sample_count = column_count.saturating_sub(DEFAULT_FORMAT_COLUMN + 1);
        Self {
            format_column: DEFAULT_FORMAT_COLUMN,
            samples: (1..=sample_count).map(|n| format!("SAMPLE{n}")).collect(),
        }
    }

    /// Total columns a data line needs.
    pub fn expected_columns(&self) -> usize {
        self.format_column + 1 + self.samples.len()
    }
}

/// Build the output header from an original `#CHROM` line.
pub fn ranked_header_line(line: &str) -> String {
    format!("{}{}", RANKED_HEADER_PREFIX, line.trim_start_matches('#'))
}

/// Returns true for lines passed through untouched ahead of the header.
pub fn is_passthrough(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with("##")
}

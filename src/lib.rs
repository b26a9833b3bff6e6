//! # VCF Sample Compare Library
//!
//! Ranks and filters VCF records by per-sample evidence of a variant, to find
//! variants with strong, asymmetric support between samples or groups of
//! samples (e.g. wildtype vs. mutant).
//!
//! ## Features
//!
//! - Reads point mutation evidence (`AO`/`DP`) and structural variant
//!   evidence (`SU`/`PE`/`SR`) from each sample column
//! - Keeps records where some, but not all, samples show the variant
//! - Optional paired sample group rules requiring a group majority to differ
//! - Sorts passing records by hit count and evidence strength
//! - Re-sorts previously ranked output
//!
//! ## Example
//!
//! ```rust
//! use vcf_sample_compare::{Criteria, CriteriaOptions, RankEngine};
//!
//! let criteria = Criteria::from_options(CriteriaOptions {
//!     min_support_ratio: 0.5,
//!     ..Default::default()
//! })
//! .unwrap();
//! let engine = RankEngine::new(criteria);
//!
//! let vcf = "##fileformat=VCFv4.2\n\
//!            #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\tS3\n\
//!            chr1\t100\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:8\t10:1\t.\n";
//!
//! let ranked = engine.rank(vcf.lines());
//! assert_eq!(ranked.records().len(), 1);
//! assert_eq!(ranked.records()[0].sample_list(), "S1");
//! assert_eq!(ranked.records()[0].support_list(), "8/10");
//! ```
//!
//! ## Output
//!
//! Each passing record gains three leading columns:
//!
//! - `NUMHITS,SEARCHCRITERIA` - hit count, criteria, and any group rules met
//! - `SNPREAD/DEPTH` - per-hit support, `AO/DP` or `SUx/PEy/SRz`
//! - `SNPSAMPLES` - hit sample names

/// Embedded README.md documentation
const README: &str = include_str!("../README.md");

/// Returns the embedded README.md documentation.
pub fn docs() -> &'static str {
    README
}

pub mod criteria;
pub mod error;
pub mod filter;
pub mod format;
pub mod group;
pub mod header;
pub mod mode;
pub mod rank;
pub mod row;
pub mod summary;

pub use criteria::{Criteria, CriteriaOptions};
pub use error::{Result, VcfCompareError};
pub use filter::{Evaluation, RecordFilter};
pub use format::{EvidenceCode, FormatKeyIndex};
pub use group::{GroupPair, GroupRuleNote, SampleGroup};
pub use header::ColumnLayout;
pub use mode::{GlobalMode, VariantMode};
pub use rank::{EvidenceKind, HitSupport, RankedRecord, compare_ranked, sort_ranked};

use std::io::{BufRead, Write};

use log::{debug, info, warn};

use crate::filter::first_columns;
use crate::header::{is_passthrough, ranked_header_line};

/// Per-file counts, logged once the file is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Data lines seen.
    pub records: usize,
    /// Data lines skipped as malformed.
    pub skipped: usize,
    /// Data lines that passed filtering.
    pub passed: usize,
}

/// A fully ranked file, ready to write.
#[derive(Debug, Clone, Default)]
pub struct RankedFile {
    preamble: Vec<String>,
    header: Option<String>,
    records: Vec<RankedRecord>,
    global_mode: GlobalMode,
    stats: FileStats,
}

impl RankedFile {
    /// Metadata and blank lines, in input order, plus the criteria line.
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    /// The output column header line, if the input had one.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Passing records in ranked order.
    pub fn records(&self) -> &[RankedRecord] {
        &self.records
    }

    pub fn global_mode(&self) -> GlobalMode {
        self.global_mode
    }

    pub fn stats(&self) -> FileStats {
        self.stats
    }

    /// Write the ranked file.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for line in &self.preamble {
            writeln!(out, "{line}")?;
        }
        if let Some(header) = &self.header {
            writeln!(out, "{header}")?;
        }
        for record in &self.records {
            writeln!(out, "{}", record.to_line())?;
        }
        Ok(())
    }
}

/// The main engine: filters and ranks whole files.
///
/// Create an instance with `RankEngine::new(criteria)`, then call `rank`
/// once per input file. Files share no state.
#[derive(Debug, Clone)]
pub struct RankEngine {
    criteria: Criteria,
}

impl RankEngine {
    pub fn new(criteria: Criteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Filter and rank the lines of one VCF file.
    ///
    /// Malformed records are skipped with a warning.
    pub fn rank<I, S>(&self, lines: I) -> RankedFile
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = RecordFilter::new(&self.criteria);
        let mut ranked = RankedFile::default();
        let mut layout: Option<ColumnLayout> = None;

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim_end_matches(['\r', '\n']);
            let line_number = i + 1;

            if is_passthrough(line) {
                ranked.preamble.push(line.to_string());
                continue;
            }
            if line.starts_with('#') {
                if layout.is_some() {
                    warn!("Ignoring extra header line {line_number}");
                    continue;
                }
                let header_layout = ColumnLayout::from_header_line(line);
                self.check_group_names(&header_layout);
                layout = Some(header_layout);
                ranked.header = Some(ranked_header_line(line));
                continue;
            }

            let layout = layout.get_or_insert_with(|| {
                let positional = ColumnLayout::positional(line);
                self.check_group_names(&positional);
                positional
            });

            ranked.stats.records += 1;
            match filter.evaluate(line, layout) {
                Ok(evaluation) => {
                    ranked.global_mode = ranked.global_mode.next(evaluation.mode);
                    if let Some(record) = evaluation.ranked {
                        debug!(
                            "Line {line_number} ({}) passed with {} hit(s)",
                            first_columns(line),
                            record.hit_count()
                        );
                        ranked.stats.passed += 1;
                        ranked.records.push(record);
                    }
                }
                Err(e) => {
                    warn!("Skipping line {line_number} ({}): {e}", first_columns(line));
                    ranked.stats.skipped += 1;
                }
            }
        }

        if let Some(criteria) = self.criteria.describe_global(ranked.global_mode) {
            ranked.preamble.push(format!(
                "##SEARCHCRITERIA=<Mode={},Criteria=\"{}\">",
                ranked.global_mode, criteria
            ));
        }

        sort_ranked(&mut ranked.records);
        info!(
            "Ranked {} of {} record(s) ({} skipped, {} evidence)",
            ranked.stats.passed, ranked.stats.records, ranked.stats.skipped, ranked.global_mode
        );
        ranked
    }

    /// Filter and rank a VCF file from a reader.
    pub fn rank_reader<R: BufRead>(&self, reader: R) -> Result<RankedFile> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(self.rank(lines))
    }

    /// Re-sort lines of previously ranked output.
    ///
    /// Records are not filtered again; lines that cannot be read back are
    /// skipped with a warning.
    pub fn rerank<I, S>(&self, lines: I) -> RankedFile
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranked = RankedFile::default();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim_end_matches(['\r', '\n']);
            if is_passthrough(line) {
                ranked.preamble.push(line.to_string());
                continue;
            }
            if line.starts_with('#') {
                ranked.header = Some(line.to_string());
                continue;
            }

            ranked.stats.records += 1;
            match RankedRecord::from_ranked_line(line) {
                Ok(record) => {
                    ranked.stats.passed += 1;
                    ranked.records.push(record);
                }
                Err(e) => {
                    warn!("Skipping line {}: {e}", i + 1);
                    ranked.stats.skipped += 1;
                }
            }
        }

        sort_ranked(&mut ranked.records);
        info!(
            "Re-ranked {} record(s) ({} skipped)",
            ranked.stats.passed, ranked.stats.skipped
        );
        ranked
    }

    /// Re-sort previously ranked output from a reader.
    pub fn rerank_reader<R: BufRead>(&self, reader: R) -> Result<RankedFile> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(self.rerank(lines))
    }

    fn check_group_names(&self, layout: &ColumnLayout) {
        for pair in &self.criteria.group_pairs {
            for name in pair.names() {
                if !layout.samples.iter().any(|s| s == name) {
                    warn!("Sample group member {name:?} is not a sample column in this file");
                }
            }
        }
    }
}

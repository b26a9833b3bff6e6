//! Command line front end for vcf-sample-compare.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use log::{LevelFilter, error, info};

use vcf_sample_compare::{Criteria, CriteriaOptions, RankEngine, RankedFile};

/// Rank VCF records by asymmetric per-sample variant evidence.
///
/// Records where some, but not all, samples show the variant are kept and
/// sorted by hit count and evidence strength. Three columns are prepended:
/// hit count with search criteria, per-hit support, and hit sample names.
#[derive(Parser, Debug)]
#[command(name = "vcf-sample-compare", version, about)]
struct Cli {
    /// Input VCF file(s); "-" reads standard input
    #[arg(required = true, value_name = "VCF")]
    #[arg(help_heading = Some("Input/Output"))]
    inputs: Vec<PathBuf>,

    /// Write each result to <input><SUFFIX> instead of standard output
    #[arg(short = 'o', long = "outfile-suffix", value_name = "SUFFIX")]
    #[arg(help_heading = Some("Input/Output"))]
    outfile_suffix: Option<String>,

    /// Replace existing output files
    #[arg(long)]
    #[arg(help_heading = Some("Input/Output"))]
    overwrite: bool,

    /// Inputs are previously ranked output to re-sort without filtering
    #[arg(long)]
    #[arg(help_heading = Some("Input/Output"))]
    rerank: bool,

    /// Minimum AO/DP ratio for a sample to count as a hit
    #[arg(short = 'r', long = "min-support-ratio", value_name = "FLOAT")]
    #[arg(default_value_t = vcf_sample_compare::criteria::DEFAULT_MIN_SUPPORT_RATIO)]
    #[arg(help_heading = Some("SNP evidence"))]
    min_support_ratio: f64,

    /// Minimum DP for a sample to count as a hit, or as a trusted non-hit
    #[arg(short = 'd', long = "min-read-depth", value_name = "INT")]
    #[arg(default_value_t = vcf_sample_compare::criteria::DEFAULT_MIN_READ_DEPTH)]
    #[arg(help_heading = Some("SNP evidence"))]
    min_read_depth: u64,

    /// Minimum discordant read pairs (PE)
    #[arg(short = 'l', long = "min-discordants", value_name = "INT")]
    #[arg(help_heading = Some("SV evidence"))]
    min_discordants: Option<u64>,

    /// Minimum split reads (SR)
    #[arg(short = 'p', long = "min-splits", value_name = "INT")]
    #[arg(help_heading = Some("SV evidence"))]
    min_splits: Option<u64>,

    /// Minimum supporting reads (SU) [default: discordants + splits]
    #[arg(short = 'u', long = "min-sv-reads", value_name = "INT")]
    #[arg(help_heading = Some("SV evidence"))]
    min_sv_reads: Option<u64>,

    /// Comma-separated sample group; repeat for each group, groups pair up in order
    #[arg(short = 's', long = "sample-group", value_name = "NAMES")]
    #[arg(help_heading = Some("Sample groups"))]
    sample_groups: Vec<String>,

    /// Minimum members of a group that must differ; one per group [default: group size]
    #[arg(short = 'a', long = "group-diff-min", value_name = "INT")]
    #[arg(help_heading = Some("Sample groups"))]
    group_diff_mins: Vec<usize>,

    /// Enable verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbosity")]
    quiet: bool,
}

impl Cli {
    fn criteria_options(&self) -> CriteriaOptions {
        CriteriaOptions {
            min_support_ratio: self.min_support_ratio,
            min_read_depth: self.min_read_depth,
            min_discordants: self.min_discordants,
            min_splits: self.min_splits,
            min_sv_reads: self.min_sv_reads,
            sample_groups: self
                .sample_groups
                .iter()
                .map(|group| {
                    group
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .collect(),
            group_diff_mins: self.group_diff_mins.clone(),
        }
    }
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn output_path(input: &Path, suffix: &str, overwrite: bool) -> anyhow::Result<PathBuf> {
    if input.as_os_str() == "-" {
        bail!("An outfile suffix cannot be applied to standard input");
    }
    let mut name = input.as_os_str().to_owned();
    name.push(suffix);
    let path = PathBuf::from(name);
    if path.exists() && !overwrite {
        bail!(
            "Output file exists, use --overwrite to replace it: \"{}\"",
            path.display()
        );
    }
    Ok(path)
}

fn write_ranked(ranked: &RankedFile, out_path: Option<&Path>) -> anyhow::Result<()> {
    match out_path {
        Some(path) => {
            info!("Writing {}...", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            ranked.write_to(&mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            ranked.write_to(&mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn run_file(engine: &RankEngine, cli: &Cli, input: &Path) -> anyhow::Result<()> {
    let out_path = cli
        .outfile_suffix
        .as_deref()
        .map(|suffix| output_path(input, suffix, cli.overwrite))
        .transpose()?;

    info!("Reading {}...", input.display());
    let reader = open_input(input)?;
    let ranked = if cli.rerank {
        engine.rerank_reader(reader)
    } else {
        engine.rank_reader(reader)
    }
    .with_context(|| format!("Failed to read {}", input.display()))?;

    write_ranked(&ranked, out_path.as_deref())
}

fn main() {
    let cli = Cli::parse();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = if cli.quiet {
        LevelFilter::Warn
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let criteria = match Criteria::from_options(cli.criteria_options()) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    let engine = RankEngine::new(criteria);

    let mut failures = 0;
    for input in &cli.inputs {
        if let Err(e) = run_file(&engine, &cli, input) {
            error!("Error while processing {}: {e:#}", input.display());
            failures += 1;
        }
    }

    if failures > 0 {
        std::process::exit(exitcode::IOERR);
    }
    info!("Process finished successfully.");
}

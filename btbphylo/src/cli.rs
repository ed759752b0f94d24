// btbphylo/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use btbphylo_core::domain::dedup::TieBreak;
use btbphylo_core::domain::filter::FilterSpec;
use btbphylo_core::domain::table::{FLAG, GROUP, N_COUNT, OUTCOME, PC_MAPPED, SAMPLE};

#[derive(Parser)]
#[command(name = "btbphylo")]
#[command(about = "Reconciles WGS, cattle and movement samples for bTB phylogenetics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📥 Appends new sequencing batches to the WGS sample summary
    UpdateSamples {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Directory holding `*FinalOut*.csv` batch summaries (default: `batches-path`)
        #[arg(long)]
        batches: Option<PathBuf>,
    },

    /// 🔎 Filters the WGS summary on quality criteria
    Filter {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Input table (default: the project summary)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output table (default: `<results>/passed_samples.csv`)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Accept fewer than two surviving samples
        #[arg(long)]
        allow_wipe_out: bool,
    },

    /// 🧬 Keeps one row per submission using ordered tie-break rules
    DeDuplicate {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long)]
        input: Option<PathBuf>,

        /// Output table (default: `<results>/deduped_wgs.csv`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Tie-break rule, repeatable and applied in order (ex: "pcMapped=max")
        #[arg(long = "rule", value_name = "COLUMN=TARGET")]
        rules: Vec<TieBreak>,
    },

    /// 🔗 Restricts WGS, cattle and movement tables to their shared samples
    Consistify {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// WGS table (default: `<results>/passed_samples.csv`)
        #[arg(long)]
        wgs: Option<PathBuf>,
    },

    /// 📋 Reports samples excluded from the final dataset
    Report {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Pre-filter table (default: `<results>/deduped_wgs.csv`)
        #[arg(long)]
        deduped: Option<PathBuf>,
    },

    /// 📏 Derives the per-clade `maxN` table from passing samples
    Thresholds {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Output table (default: `<results>/CladeInfo.csv`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Ncount quantile (default: `quantile` from the project config)
        #[arg(long)]
        quantile: Option<f64>,
    },

    /// 🐄 Runs de-duplication, clade filters, consistify and the exclusion report
    ViewBovine {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

/// Inline filter criteria. Mutually exclusive with `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only these sample names
    #[arg(long, short = 's', num_args = 1..)]
    pub sample: Vec<String>,

    /// Keep only these clades
    #[arg(long, short = 'c', num_args = 1..)]
    pub clade: Vec<String>,

    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub pcmapped: Option<Vec<f64>>,

    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub genomecov: Option<Vec<f64>>,

    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub n_count: Option<Vec<f64>>,

    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub meandepth: Option<Vec<f64>>,

    #[arg(long, num_args = 1..)]
    pub flag: Vec<String>,

    /// Keep only these outcomes (default: Pass)
    #[arg(long, num_args = 1..)]
    pub outcome: Vec<String>,

    /// Drop rows whose column holds one of these values (ex: "flag=nonbTB,MicPin")
    #[arg(long, value_name = "COLUMN=VALUES")]
    pub exclude: Vec<String>,

    /// JSON or YAML filter file mapping columns to criteria
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl FilterArgs {
    /// Criteria given as flags, in flag order.
    pub fn inline_spec(&self) -> anyhow::Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        if !self.sample.is_empty() {
            spec = spec.include(SAMPLE, &self.sample);
        }
        if !self.clade.is_empty() {
            spec = spec.include(GROUP, &self.clade);
        }
        for (column, bounds) in [
            (PC_MAPPED, &self.pcmapped),
            ("GenomeCov", &self.genomecov),
            (N_COUNT, &self.n_count),
            ("MeanDepth", &self.meandepth),
        ] {
            if let Some([min, max]) = bounds.as_deref() {
                spec = spec.range(column, *min, *max);
            }
        }
        if !self.flag.is_empty() {
            spec = spec.include(FLAG, &self.flag);
        }
        if !self.outcome.is_empty() {
            spec = spec.include(OUTCOME, &self.outcome);
        }
        for raw in &self.exclude {
            let (column, values) = raw
                .split_once('=')
                .with_context(|| format!("--exclude expects COLUMN=VALUES, got '{raw}'"))?;
            spec = spec.exclude(column, values.split(',').map(str::trim));
        }
        Ok(spec)
    }
}

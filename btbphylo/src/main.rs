// btbphylo/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing), on stderr so stdout stays readable
    // RUST_LOG=debug btbphylo view-bovine ... to see every clade pass
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::UpdateSamples {
            project_dir,
            batches,
        } => commands::update::execute(project_dir, batches),

        Commands::Filter {
            project_dir,
            input,
            output,
            filters,
            allow_wipe_out,
        } => commands::filter::execute(project_dir, input, output, filters, allow_wipe_out),

        Commands::DeDuplicate {
            project_dir,
            input,
            output,
            rules,
        } => commands::dedup::execute(project_dir, input, output, rules),

        Commands::Consistify { project_dir, wgs } => commands::consistify::execute(project_dir, wgs),

        Commands::Report {
            project_dir,
            deduped,
        } => commands::report::execute(project_dir, deduped),

        Commands::Thresholds {
            project_dir,
            output,
            quantile,
        } => commands::thresholds::execute(project_dir, output, quantile),

        Commands::ViewBovine { project_dir } => commands::view_bovine::execute(project_dir).await,
    }
}

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leadflow_pipeline::{Pipeline, PipelineConfig};
use leadflow_store::ListStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadflow")]
#[command(about = "Leadflow list-processing command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load raw-list CSVs, diff them against the master list, store the uniques
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        source_name: String,
        #[arg(long)]
        list_name: String,
        #[arg(long, default_value = "default")]
        owner: String,
    },
    /// Merge skip-traced CSVs into the master list
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Vendor trace date stamped onto every row (YYYY-MM-DD)
        #[arg(long)]
        skiptraced_date: NaiveDate,
    },
    /// Export the stored uniques result for an owner as CSV
    Download {
        #[arg(long, default_value = "default")]
        owner: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Apply the database schema
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env();
    let store = ListStore::connect(&config.database_url).await?;

    match cli.command {
        Commands::Process {
            files,
            source_name,
            list_name,
            owner,
        } => {
            let pipeline = Pipeline::new(config, store);
            let summary = pipeline
                .process(&files, &source_name, &list_name, &owner)
                .await?;
            println!(
                "process complete: run_id={} files={} rows={} uniques={} reports={}",
                summary.run_id,
                summary.files,
                summary.rows_loaded,
                summary.unique_count,
                summary.reports_dir
            );
        }
        Commands::Merge {
            files,
            skiptraced_date,
        } => {
            let pipeline = Pipeline::new(config, store);
            let summary = pipeline.merge(&files, skiptraced_date).await?;
            println!(
                "merge complete: run_id={} rows={} inserted={} updated={} skipped={}",
                summary.run_id,
                summary.rows,
                summary.report.inserted,
                summary.report.updated,
                summary.report.skipped
            );
        }
        Commands::Download { owner, out } => {
            let pipeline = Pipeline::new(config, store);
            match pipeline.export_uniques(&owner, &out).await? {
                Some(result) => println!(
                    "download complete: rows={} written to {}",
                    result.row_count,
                    out.display()
                ),
                None => println!("no uniques result available for owner `{owner}`"),
            }
        }
        Commands::Migrate => {
            store.migrate().await?;
            println!("schema applied");
        }
    }

    Ok(())
}

//! corpusmill — brat corpus conversion and NER anonymization.
//! Entry point for the CLI binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use corpusmill_anonymize::clean::clean_text;
use corpusmill_anonymize::client::{GateClient, DEFAULT_ENDPOINT};
use corpusmill_anonymize::export::{read_rows, write_outputs};
use corpusmill_anonymize::pipeline::run_anonymization;
use corpusmill_ingestion::aligner::ErrorCheck;
use corpusmill_ingestion::export::{write_csv, write_json};
use corpusmill_ingestion::pipeline::load_corpus;

#[derive(Parser)]
#[command(
    name = "corpusmill",
    version,
    about = "Convert brat Q&A corpora and anonymize them via an NER web service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert paired .ann/.txt files into CSV and JSON record sets
    Convert {
        /// Directory holding the paired .ann/.txt dataset
        #[arg(long)]
        dataset_path: PathBuf,
        /// Output path prefix; writes {prefix}.csv and {prefix}.json
        #[arg(long)]
        storage_path: PathBuf,
        /// Emit every matched label in the CSV label column, not just the first
        #[arg(long)]
        all_labels: bool,
        /// Annotation-text containment check mode
        #[arg(long, value_enum, default_value_t = CheckMode::Off)]
        error_check: CheckMode,
    },
    /// Anonymize the converted CSV against the NER service
    Anonymize {
        /// Converted CSV (output of `convert`)
        #[arg(long)]
        csv_path: PathBuf,
        /// NER service endpoint
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        /// NER service username
        #[arg(long, env = "CORPUSMILL_NER_USERNAME")]
        username: String,
        /// NER service password
        #[arg(long, env = "CORPUSMILL_NER_PASSWORD", hide_env_values = true)]
        password: String,
        /// Directory for gate_processed.csv and hashed.json
        #[arg(long)]
        storage_path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CheckMode {
    Off,
    Catch,
    Strict,
}

impl From<CheckMode> for ErrorCheck {
    fn from(mode: CheckMode) -> Self {
        match mode {
            CheckMode::Off => ErrorCheck::Off,
            CheckMode::Catch => ErrorCheck::Catch,
            CheckMode::Strict => ErrorCheck::Strict,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("corpusmill=debug,info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Convert {
            dataset_path,
            storage_path,
            all_labels,
            error_check,
        } => {
            info!("Converting dataset at {}", dataset_path.display());
            let (corpus, stats) = load_corpus(&dataset_path, error_check.into())
                .with_context(|| format!("converting {}", dataset_path.display()))?;
            info!(
                "Found {} errors while reading {} files",
                stats.errors, stats.loaded
            );

            let json_path = PathBuf::from(format!("{}.json", storage_path.display()));
            let csv_path = PathBuf::from(format!("{}.csv", storage_path.display()));
            write_json(&corpus, &json_path)?;
            write_csv(&corpus, &csv_path, !all_labels)?;
            info!(
                "Wrote {} and {}",
                csv_path.display(),
                json_path.display()
            );
        }
        Command::Anonymize {
            csv_path,
            endpoint,
            username,
            password,
            storage_path,
        } => {
            let rows = read_rows(&csv_path)
                .with_context(|| format!("reading {}", csv_path.display()))?;
            info!("Anonymizing {} rows from {}", rows.len(), csv_path.display());

            let cleaned: Vec<String> = rows.iter().map(|r| clean_text(&r.text)).collect();
            let client = GateClient::new(endpoint, username, password)?;
            let outcome = run_anonymization(&client, &cleaned).await;
            if outcome.truncated {
                warn!("Run truncated after a sub-batch failure, writing partial results");
            }

            write_outputs(&rows, &cleaned, &outcome, &storage_path)?;
            info!(
                "Anonymization complete: {} sentences, {} placeholder mappings",
                outcome.sentences.len(),
                outcome.placeholders.len()
            );
        }
    }

    Ok(())
}

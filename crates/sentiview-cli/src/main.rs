mod commands;
mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use sentiview_client::types::ExportFormat;
use sentiview_client::{ApiClient, ApiClientError};

use crate::history::HistoryStore;

#[derive(Debug, Parser)]
#[command(name = "sentiview")]
#[command(about = "University sentiment analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a single comment
    Analyze {
        text: String,
        /// Also save the result to the local analysis history
        #[arg(long)]
        save: bool,
    },
    /// Classify every non-empty line of a text file as one batch
    Batch { file: PathBuf },
    /// Show the combined dashboard metrics
    Dashboard,
    /// Show aggregate corpus statistics
    Stats,
    /// Generate an executive report
    Report {
        /// Reporting period, e.g. weekly or monthly
        #[arg(long, default_value = "monthly")]
        period: String,
        /// Also export the report as a file in this format
        #[arg(long, value_enum)]
        export: Option<ExportArg>,
        /// Where to write the exported file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect or replace the loaded dataset
    Dataset {
        #[command(subcommand)]
        action: DatasetAction,
    },
    /// Trigger a model training run
    Train,
    /// Probe the backend health endpoint
    Health,
    /// Manage the local analysis history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Subcommand)]
enum DatasetAction {
    /// Show metadata about the loaded dataset
    Info,
    /// Upload a CSV file as the new dataset
    Upload { file: PathBuf },
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// List saved analyses, newest first
    List,
    /// Delete the entry at the given index
    Delete { index: usize },
    /// Delete all saved analyses
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    Pdf,
    Xlsx,
    Csv,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Pdf => ExportFormat::Pdf,
            ExportArg::Xlsx => ExportFormat::Xlsx,
            ExportArg::Csv => ExportFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        // API failures get the human-readable message the dashboard shows.
        if let Some(api_err) = err.downcast_ref::<ApiClientError>() {
            eprintln!("error: {}", api_err.user_message());
        } else {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = sentiview_core::load_app_config()?;
    let client = ApiClient::from_app_config(&config)?;
    let history = HistoryStore::new(&config.history_path);

    match cli.command {
        Commands::Analyze { text, save } => commands::analyze(&client, &history, &text, save).await,
        Commands::Batch { file } => commands::batch(&client, &file).await,
        Commands::Dashboard => commands::dashboard(&client).await,
        Commands::Stats => commands::statistics(&client).await,
        Commands::Report {
            period,
            export,
            out,
        } => commands::report(&client, &period, export.map(ExportFormat::from), out).await,
        Commands::Dataset { action } => match action {
            DatasetAction::Info => commands::dataset(&client).await,
            DatasetAction::Upload { file } => commands::upload(&client, &file).await,
        },
        Commands::Train => commands::train(&client).await,
        Commands::Health => commands::health(&client).await,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history_list(&history),
            HistoryAction::Delete { index } => commands::history_delete(&history, index),
            HistoryAction::Clear => commands::history_clear(&history),
        },
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use yt_comment_lang::config::{default_config_path, load_config};
use yt_comment_lang::report::{render_pie_svg, render_table, to_csv};
use yt_comment_lang::server::{start_server, AppState};
use yt_comment_lang::{analyze, AnalysisError, SortOrder, WhatlangDetector, YoutubeExtractor};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the analyzer web page
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyze one video and print the language table
    Analyze {
        /// Video URL or id
        url: String,

        /// Stop after this many non-empty comments
        #[arg(long)]
        max_comments: Option<usize>,

        #[arg(long, value_enum)]
        sort: Option<SortOrder>,

        /// Write the CSV report here
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the pie chart SVG here
        #[arg(long)]
        chart: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yt_comment_lang=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_config(&config_path)?;
    let mut options = config.analysis_options();

    let extractor = YoutubeExtractor::with_options(config.client_options())
        .context("Failed to build HTTP client")?;
    let detector = WhatlangDetector::with_min_confidence(options.min_confidence);

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_addr());
            let state = AppState::new(Arc::new(extractor), Arc::new(detector), options);
            info!("Starting comment language analyzer");
            start_server(&addr, state)
                .await
                .with_context(|| format!("Server on {addr} failed"))?;
        }
        Command::Analyze {
            url,
            max_comments,
            sort,
            csv,
            chart,
        } => {
            if let Some(max_comments) = max_comments {
                options.max_comments = max_comments;
            }
            if let Some(sort) = sort {
                options.sort_order = sort;
            }

            let analysis = match analyze(&extractor, &detector, &url, &options).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    if let AnalysisError::NoComments {
                        collection_error: Some(cause),
                    } = &e
                    {
                        eprintln!("Error while collecting comments: {cause}");
                    }
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            };

            println!(
                "{} of {} comments classified\n",
                analysis.classified, analysis.collected
            );
            print!("{}", render_table(&analysis.report));

            if let Some(path) = csv {
                std::fs::write(&path, to_csv(&analysis.report)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote CSV report");
            }
            if let Some(path) = chart {
                std::fs::write(&path, render_pie_svg(&analysis.report)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote pie chart");
            }
        }
    }

    Ok(())
}

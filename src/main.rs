use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use got_deaths::config::AppConfig;
use got_deaths::export::{self, ExportFormat};
use got_deaths::services::{self, Dataset, DatasetSummary, RecordFilter};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML config file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the processed dataset over HTTP
    #[cfg(feature = "server")]
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        data: Option<PathBuf>,
        #[clap(long)]
        delimiter: Option<char>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Print the death statistics as JSON
    Stats {
        #[clap(short, long)]
        data: Option<PathBuf>,
        #[clap(long)]
        delimiter: Option<char>,
    },
    /// Print the headline metrics
    Summary {
        #[clap(short, long)]
        data: Option<PathBuf>,
        #[clap(long)]
        delimiter: Option<char>,
    },
    /// Write filtered records to stdout
    Records {
        #[clap(short, long)]
        data: Option<PathBuf>,
        #[clap(long)]
        delimiter: Option<char>,
        /// Comma-separated gender labels, e.g. Male,Female
        #[clap(short, long)]
        gender: Option<String>,
        /// all, alive or dead
        #[clap(short, long, default_value = "all")]
        status: String,
        /// all, noble or common
        #[clap(short, long, default_value = "all")]
        nobility: String,
        /// Comma-separated column names
        #[clap(long)]
        columns: Option<String>,
        #[clap(long)]
        limit: Option<usize>,
        /// csv or json
        #[clap(short, long, default_value = "csv")]
        format: ExportFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            port,
            data,
            delimiter,
            cors_origin,
        } => {
            let config = config.with_overrides(data, delimiter, port, cors_origin);
            info!("Starting server on port {}", config.port);
            got_deaths::server::start_server(&config).await?;
        }
        Commands::Stats { data, delimiter } => {
            let dataset = load(config.with_overrides(data, delimiter, None, None))?;
            let stats = dataset.statistics();
            println!("{}", serde_json::to_string_pretty(&stats)?);
            println!("Total deaths: {}", dataset.count_deaths());
        }
        Commands::Summary { data, delimiter } => {
            let dataset = load(config.with_overrides(data, delimiter, None, None))?;
            print_summary(&services::summarize(&dataset));
        }
        Commands::Records {
            data,
            delimiter,
            gender,
            status,
            nobility,
            columns,
            limit,
            format,
        } => {
            let config = config.with_overrides(data, delimiter, None, None);
            let dataset = load(config.clone())?;
            let filter = RecordFilter {
                genders: gender
                    .as_deref()
                    .map(RecordFilter::parse_list)
                    .unwrap_or_default(),
                status: status.parse()?,
                nobility: nobility.parse()?,
                columns: columns
                    .as_deref()
                    .map(RecordFilter::parse_list)
                    .unwrap_or_default(),
                limit,
            };
            let view = filter.apply(dataset.table())?;
            info!(
                "Writing {} of {} records from {}",
                view.len(),
                dataset.len(),
                dataset.source()
            );
            print!(
                "{}",
                export::render(&view, format, config.delimiter_byte()?)?
            );
        }
    }

    Ok(())
}

fn load(config: AppConfig) -> Result<Dataset> {
    info!("Loading dataset from {}", config.data_path.display());
    Ok(services::load_dataset(
        &config.data_path,
        config.delimiter_byte()?,
    )?)
}

fn print_summary(summary: &DatasetSummary) {
    println!("{}", "Game of Thrones character deaths".bold());
    println!(
        "  {:<20} {}",
        "Characters:",
        summary.total_characters.to_string().cyan()
    );
    println!(
        "  {:<20} {}",
        "Deaths:",
        summary.total_deaths.to_string().red()
    );
    println!(
        "  {:<20} {}",
        "Predominant gender:",
        summary.predominant_gender.as_deref().unwrap_or("N/A").yellow()
    );
    println!(
        "  {:<20} {}",
        "Deadliest year:",
        summary
            .deadliest_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "N/A".to_string())
            .red()
    );

    if !summary.gender_share.is_empty() {
        println!("{}", "Gender distribution".bold());
        for (label, share) in &summary.gender_share {
            println!("  {:<20} {:.1}%", format!("{}:", label), share);
        }
    }

    if !summary.deaths_by_year.is_empty() {
        println!("{}", "Deaths per year".bold());
        for (year, count) in &summary.deaths_by_year {
            println!("  {:<20} {}", year, count);
        }
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

mod appids;
mod client;
mod details;
mod error;
mod export;
mod histogram;
mod pipeline;
mod rows;
mod search;
mod settings;
mod throttle;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use client::SteamClient;
use pipeline::{CatalogPipeline, HistoryPipeline};
use settings::Settings;
use throttle::RandomDelay;

#[derive(Parser)]
#[command(name = "steam_scraper", about = "Steam store catalog and review history scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the store search, fetch app details, save a spreadsheet and the app id list
    Catalog {
        /// Max search pages to walk (default: all)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,
    },
    /// Fetch the review histogram of every app in the id list, one spreadsheet per app
    History {
        /// App id list (default: steam_appids.txt)
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let client = SteamClient::new(&settings)?;

    let result = match cli.command {
        Commands::Catalog { pages } => {
            let output = PathBuf::from(export::catalog_filename(chrono::Local::now()));
            let pipeline = CatalogPipeline::new(
                &client,
                &settings,
                RandomDelay::new(settings.detail_delay),
                RandomDelay::new(settings.page_delay),
            );
            let stats = pipeline.run(pages, &output).await?;
            println!(
                "Done: {} pages, {} apps found, {} saved ({} without details, {} errors).",
                stats.pages, stats.ids_found, stats.entries, stats.not_found, stats.failed
            );
            println!("Data saved to {}", output.display());
            Ok(())
        }
        Commands::History { input } => {
            let input = input.unwrap_or_else(|| settings.appid_file.clone());
            let pipeline =
                HistoryPipeline::new(&client, &settings, RandomDelay::new(settings.histogram_delay));
            let stats = pipeline.run(&input).await?;
            println!(
                "Done: {} apps, {} files written, {} without history, {} errors, {} invalid lines.",
                stats.ids,
                stats.written.len(),
                stats.empty,
                stats.failed,
                stats.rejected_lines
            );
            if !stats.written.is_empty() {
                println!("Output folder: {}", settings.history_dir.display());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

mod config;
mod harvest;
mod models;
mod pipeline;
mod session;
mod sink;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::sink::OutputFormat;

#[derive(Parser)]
#[command(name = "bs-etl", about = "Best-seller listing harvester", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and harvest every configured category into one output file
    Scrape {
        /// Output file path (default: data/best_sellers.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Page cap per category
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// List the configured category entry URLs
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "bestseller_etl=info,bs_etl=info,warn",
        1 => "bestseller_etl=debug,bs_etl=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Scrape {
            output,
            format,
            max_pages,
        } => {
            if let Some(path) = output {
                config.output.path = Some(path);
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(max_pages) = max_pages {
                config.scraper.max_pages = max_pages;
            }

            let _t = utils::Timer::start("Best-seller scrape");
            let stats = Pipeline::new(config).run().await?;

            println!("─────────────────────────────────");
            println!("  bs-etl — Run Summary");
            println!("─────────────────────────────────");
            println!("  Categories : {}", utils::fmt_number(stats.categories as i64));
            println!("  Pages      : {}", utils::fmt_number(stats.pages_visited as i64));
            println!("  Records    : {}", utils::fmt_number(stats.records as i64));
            println!("  Skipped    : {}", utils::fmt_number(stats.skipped_items as i64));
            println!("─────────────────────────────────");
        }

        Command::Categories => {
            if config.scraper.categories.is_empty() {
                println!("No categories configured — add [scraper] categories to config/default.toml.");
            } else {
                println!("{} categories:", config.scraper.categories.len());
                for url in &config.scraper.categories {
                    println!("  {}", url);
                }
            }
        }
    }

    Ok(())
}

//! Restaurant Ratings CLI - compare restaurant ratings by price level
//!
//! Prompts for a U.S. city, pulls restaurant listings from Google Places and
//! Yelp (through an on-disk response cache), stores them in SQLite and charts
//! average ratings per price level in the terminal.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use clap::Parser;
use crossterm::style::Stylize;
use tracing::info;

use restaurant_ratings::app::{Action, App};
use restaurant_ratings::cache::CacheStore;
use restaurant_ratings::cli::{log_level, Cli, StartupConfig};
use restaurant_ratings::data::{GoogleClient, Provider, SearchTerm, YelpClient};
use restaurant_ratings::db::Database;
use restaurant_ratings::search::Searcher;
use restaurant_ratings::stats::{aggregate, Metric};
use restaurant_ratings::ui::{self, ChartSpec};

/// Reads one line from stdin; `None` on end of input
fn read_line(stdin: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Prints a fatal error in red and ends the process with a failure status
fn exit_with_error(error: impl Display, code: i32) -> ! {
    eprintln!("{}", format!("Error: {}", error).red());
    std::process::exit(code);
}

/// Aggregates the stored listings of a search and shows the chart
fn chart_search(
    db: &Database,
    search: &SearchTerm,
    provider: Provider,
    metric: Metric,
) -> Result<(), Box<dyn std::error::Error>> {
    let listings = db.listings(provider, search)?;
    let stats = aggregate(&listings, metric, provider.price_buckets());
    info!(provider = %provider, listings = listings.len(), "Charting statistics");

    ui::show_chart(&ChartSpec::from_stats(provider, metric, search, &stats))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // API keys may live in a .env file next to the working directory
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => exit_with_error(e, 2),
    };

    // Set up panic hook to restore terminal if a chart crashes
    ui::install_panic_hook();

    let searcher = Searcher::new(
        CacheStore::with_dir(config.cache_dir.clone()),
        GoogleClient::with_base_url(&config.google_api_key, &config.google_base_url),
        YelpClient::with_base_url(&config.yelp_api_key, &config.yelp_base_url),
    );
    let mut db = match Database::open(&config.database_path) {
        Ok(db) => db,
        Err(e) => exit_with_error(e, 1),
    };

    let mut app = App::new();
    let mut stdin = io::stdin().lock();

    while !app.should_quit() {
        print!("\n{}", app.prompt());
        io::stdout().flush()?;

        let action = match read_line(&mut stdin)? {
            Some(line) => app.handle_input(&line),
            None => app.handle_eof(),
        };

        if let Some(error) = app.take_error() {
            println!("\n{}", format!("[Error] {}", error).red());
        }

        match action {
            Action::None => {}
            Action::Search(search) => {
                println!("\nSearching restaurants in {}...", search);
                let summary = match searcher.run(&mut db, &search).await {
                    Ok(summary) => summary,
                    Err(e) => exit_with_error(e, 1),
                };
                println!(
                    "Stored {} Google and {} Yelp listings.",
                    summary.google, summary.yelp
                );
            }
            Action::ShowChart {
                search,
                provider,
                metric,
            } => {
                if let Err(e) = chart_search(&db, &search, provider, metric) {
                    exit_with_error(e, 1);
                }
            }
            Action::Quit => {}
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

//! market-db CLI - query the daily bar store from the command line
//!
//! ## Example Usage
//!
//! ```bash
//! # Create the tables in a new database
//! market-db init
//!
//! # All stocks in January
//! market-db query stock all --start 2024-01-01 --end 2024-01-31
//!
//! # Two stocks, written to CSV
//! market-db query stock 600519 000001 -s 20240101 -e 20240131 -o out.csv
//!
//! # Show configuration and table sizes
//! market-db info
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use market_db::prelude::*;
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::File;
use std::path::PathBuf;
use std::process;

/// market-db: read daily stock, index and concept-board bars
#[derive(Parser)]
#[command(name = "market-db")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read daily stock, index and concept-board bars", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing tables
    Init,

    /// Read rows for a type, symbols and date range
    Query {
        /// Entity type (stock, index, concept, temp)
        #[arg(value_name = "TYPE")]
        entity_type: String,

        /// Symbols to read, or `all`
        #[arg(value_name = "SYMBOL", required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD or YYYYMMDD)
        #[arg(short = 's', long)]
        start: String,

        /// End date (YYYY-MM-DD or YYYYMMDD)
        #[arg(short = 'e', long)]
        end: String,

        /// Write the result to a CSV file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and table sizes
    Info,
}

fn selector_from_args(mut symbols: Vec<String>) -> SymbolSelector {
    if symbols.len() == 1 {
        SymbolSelector::from(symbols.remove(0))
    } else {
        SymbolSelector::Many(symbols)
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };
    init_logging(&config, cli.verbose);

    let result = match cli.command {
        Commands::Init => init_tables(&config),
        Commands::Query {
            entity_type,
            symbols,
            start,
            end,
            output,
        } => run_query(&config, &entity_type, symbols, &start, &end, output),
        Commands::Info => show_info(&config),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_tables(config: &Config) -> anyhow::Result<()> {
    let db = Database::from_url(&config.database_url)?;
    db.create_tables()
        .with_context(|| format!("initialising {}", db.path().display()))?;

    println!(
        "{} Tables ready in {}",
        "✓".green().bold(),
        db.path().display()
    );
    Ok(())
}

fn run_query(
    config: &Config,
    entity_type: &str,
    symbols: Vec<String>,
    start: &str,
    end: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let reader = DataReader::from_config(config)?;
    let selector = selector_from_args(symbols);
    let mut df = reader.try_get_data(entity_type, selector, start, end)?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} Wrote {} rows to {}",
                "✓".green().bold(),
                df.height(),
                path.display()
            );
        }
        None => {
            if df.height() == 0 {
                println!("{}", "No rows matched".yellow());
            } else {
                println!("{}", df);
            }
        }
    }

    Ok(())
}

fn show_info(config: &Config) -> anyhow::Result<()> {
    println!("{}", "market-db".cyan().bold());
    println!("Version:      {}", env!("CARGO_PKG_VERSION"));
    println!("Database URL: {}", config.database_url);
    println!("Log level:    {}", config.log_level);

    let db = Database::from_url(&config.database_url)?;
    let session = match db.session() {
        Ok(session) => session,
        Err(e) => {
            println!("{} {}", "Database unavailable:".yellow(), e);
            return Ok(());
        }
    };

    println!("\n{}", "Tables:".bold());
    for entity in EntityType::ALL {
        let shape = RecordShape::for_entity(entity);
        match session.row_count(shape) {
            Ok(count) => println!("  {:<8} {:<20} {} rows", entity, shape.table, count),
            Err(_) => println!("  {:<8} {:<20} {}", entity, shape.table, "missing".red()),
        }
    }

    Ok(())
}

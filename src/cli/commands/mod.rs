//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod describe;
mod import;
mod products;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "catalog-scout")]
#[command(about = "Keyword search over product documents with LLM enrichment")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the product database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search a spreadsheet, PDF or Word document for keywords
    Search(search::SearchArgs),

    /// Export stored products to a spreadsheet
    Export {
        /// Comma-separated search terms
        #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
        terms: Option<String>,
        /// Export every stored product
        #[arg(long)]
        all: bool,
        /// Output .xlsx file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge products from a spreadsheet into the store, keyed by search term
    Import {
        /// Input .xlsx file with a search term column
        file: PathBuf,
    },

    /// Browse the product store
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },

    /// Generate marketing texts for a stored product
    Describe {
        /// Keyword contained in the product's search term
        keyword: String,
    },

    /// Check availability of external PDF tools and LLM settings
    Check,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List stored products
    List,
    /// Show one stored product
    Show {
        /// Exact search term the product was stored under
        term: String,
    },
    /// Find products with a keyword in any field
    Search {
        keyword: String,
    },
    /// Edit fields of a product, creating it if needed
    Set(products::SetArgs),
}

/// Run the CLI.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (settings, config) = load_settings(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Commands::Search(args) => search::cmd_search(&settings, &config, args),
        Commands::Export { terms, all, output } => match terms {
            Some(terms) if !all => products::cmd_export(&settings, &terms, &output),
            _ => products::cmd_export_all(&settings, &output),
        },
        Commands::Import { file } => import::cmd_import(&settings, &file),
        Commands::Products { command } => match command {
            ProductCommands::List => products::cmd_products_list(&settings),
            ProductCommands::Show { term } => products::cmd_products_show(&settings, &term),
            ProductCommands::Search { keyword } => {
                products::cmd_products_search(&settings, &keyword)
            }
            ProductCommands::Set(args) => products::cmd_products_set(&settings, args),
        },
        Commands::Describe { keyword } => describe::cmd_describe(&settings, &config, &keyword),
        Commands::Check => check::cmd_check(&config),
    }
}

//! Command line definition

use catalog_client::StatusLabel;
use catalog_client::filter::RatingThreshold;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "Catalog admin client")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "BACKEND_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the persisted session
    #[arg(long, global = true, env = "CATALOG_STATE_DIR", default_value = ".catalog")]
    pub state_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an access token
    Login {
        #[arg(long, env = "CATALOG_TOKEN")]
        token: String,
    },
    /// Forget the stored access token
    Logout,
    /// Show the display claims of the stored token
    Whoami,
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Gallery(GalleryCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products matching the search term and filters
    List(ProductFilterArgs),
    /// Show the filter options derived from the loaded products
    Facets,
    /// Delete products concurrently and print the summary
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct ProductFilterArgs {
    #[arg(long, default_value = "")]
    pub search: String,
    /// Category name (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Active, Low Stock, Out of Stock, Inactive (repeatable)
    #[arg(long = "status")]
    pub statuses: Vec<StatusLabel>,
    /// Brand (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    #[arg(long)]
    pub min_stock: Option<i64>,
    #[arg(long)]
    pub max_stock: Option<i64>,
    /// Minimum average rating, e.g. "4+"
    #[arg(long)]
    pub rating: Option<RatingThreshold>,
    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum GalleryCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Upload files as one batch
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Display name for the INDEX-th file argument (0-based)
        #[arg(long = "name", value_name = "INDEX=NAME", value_parser = parse_indexed_name)]
        names: Vec<(usize, String)>,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    Toggle {
        id: String,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

fn parse_indexed_name(raw: &str) -> Result<(usize, String), String> {
    let (index, name) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=NAME, got {raw}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid index: {index}"))?;
    Ok((index, name.to_string()))
}

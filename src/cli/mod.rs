pub mod commands;

use clap::{Parser, Subcommand};

use crate::strategy::{Preset, DEFAULT_ITEM_KIND, DEFAULT_SEGMENT};

#[derive(Parser)]
#[command(name = "gleaner")]
#[command(about = "Collect recent articles from feeds, sitemaps and item APIs", long_about = None)]
pub struct Cli {
    /// Trailing window in days (overrides the config file)
    #[arg(short, long, global = true)]
    pub days: Option<i64>,

    /// Number of concurrent requests (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Bypass the on-disk page cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect a built-in source
    Site {
        #[arg(value_enum)]
        preset: Preset,
    },
    /// Collect an RSS/Atom feed
    Feed {
        url: String,
        /// Source label for the documents (default: feed host)
        #[arg(long)]
        name: Option<String>,
    },
    /// Collect a two-level sitemap
    Sitemap {
        /// URL of the sitemap index
        url: String,
        /// Only follow child sitemaps containing this path segment
        #[arg(long, default_value = DEFAULT_SEGMENT)]
        segment: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Collect an id-list + item-record API
    Api {
        /// URL returning a JSON array of item ids
        ids_url: String,
        /// Item URL template with an `{id}` placeholder
        #[arg(long)]
        item_url: String,
        /// Item `type` to keep
        #[arg(long, default_value = DEFAULT_ITEM_KIND)]
        kind: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Extract individual pages
    Page {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

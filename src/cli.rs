//! Command-line interface parsing for pokestats
//!
//! Running with no arguments answers every question against the public API
//! using `cache.json` in the working directory. The flags only relocate those
//! two endpoints.

use std::path::PathBuf;

use clap::Parser;

use crate::cache::DEFAULT_FLUSH_EVERY;

/// Base URL of the public PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Default cache file, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Entries requested per listing page
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Creature documents fetched concurrently while walking the catalog
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Pokestats - answers questions about the PokeAPI catalog
#[derive(Parser, Debug)]
#[command(name = "pokestats")]
#[command(about = "Answers questions about the PokeAPI catalog, caching every response")]
#[command(version)]
pub struct Cli {
    /// File used to persist API responses between runs
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CACHE_FILE)]
    pub cache: PathBuf,

    /// Root of the API; every request URL is built from it
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Runtime settings for a run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the response cache is persisted
    pub cache_path: PathBuf,
    /// API root, always ending in '/'
    pub base_url: String,
    /// Listing page size
    pub page_size: usize,
    /// Concurrent fetches per batch
    pub batch_size: usize,
    /// Cache insertions between automatic flushes
    pub flush_every: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// A Config with the CLI's cache path and base URL and default tuning
    /// for everything else
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            cache_path: cli.cache.clone(),
            base_url: normalize_base_url(&cli.base_url),
            ..Self::default()
        }
    }

    /// Sets the API root
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// URL of the given endpoint path under the API root
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of a creature document
    pub fn pokemon_url(&self, name: &str) -> String {
        self.endpoint(&format!("pokemon/{name}"))
    }

    /// URL of the first page of the full catalog listing
    pub fn catalog_url(&self) -> String {
        self.endpoint(&format!("pokemon?limit={}&offset=0", self.page_size))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

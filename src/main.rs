//! Pokestats - answers questions about the PokeAPI catalog
//!
//! Prints each question and its answer to stdout, keeping every API response
//! in a cache file so later runs need little or no network access.

use clap::Parser;

use pokestats::cache::{FileStorage, PersistentCache};
use pokestats::{logging, Cli, Config, FetchClient, HttpTransport, Questions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    let cache = PersistentCache::load(FileStorage::new(&config.cache_path), config.flush_every);
    let client = FetchClient::new(HttpTransport::new(), cache);

    let result = Questions::new(&client, &config)
        .run_all(|answer| println!("{answer}"))
        .await;

    // The final flush runs even when a question failed
    let flushed = client.flush();
    result?;
    flushed?;

    Ok(())
}

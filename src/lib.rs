//! Pokestats Library
//!
//! Answers a fixed set of questions about the PokeAPI catalog. Every response
//! is memoized in a persistent cache so repeated runs stay off the network.

pub mod aggregate;
pub mod batch;
pub mod cache;
pub mod cli;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod pages;
pub mod questions;

pub use cache::{PersistentCache, DEFAULT_FLUSH_EVERY};
pub use cli::{Cli, Config};
pub use fetch::{FetchClient, FetchError, HttpTransport, Transport};
pub use questions::{Answer, Questions};

//! The fixed set of catalog questions
//!
//! Each question is an independent read-only traversal through the shared
//! `FetchClient`. Questions that need every creature walk the paginated catalog
//! and fetch creature documents in bounded batches; the rest read a single
//! membership listing and fetch its members one by one.

use std::cell::RefCell;
use std::fmt;
use std::future;
use std::time::Instant;

use tracing::info;

use crate::aggregate::{Best, Tied};
use crate::batch::run_batches;
use crate::cache::CacheStorage;
use crate::cli::Config;
use crate::data::{Generation, Membership, Pokemon};
use crate::fetch::{FetchClient, FetchError, Transport};
use crate::pages::walk_pages;

/// Weight limit for the speed question, in hectograms (10 kg)
const LIGHT_WEIGHT_LIMIT: u32 = 100;

/// Sentinel for the shortest-height search, in decimeters
const HEIGHT_SENTINEL: i64 = 999_999;

/// A question and its rendered answer
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub question: &'static str,
    pub answer: String,
}

impl Answer {
    fn new(question: &'static str, answer: impl Into<String>) -> Self {
        Self {
            question,
            answer: answer.into(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Question: {}", self.question)?;
        writeln!(f, "Answer: {}", self.answer)
    }
}

/// Converts an API tenth-unit (decimeters, hectograms) to whole units
fn tenths(value: i64) -> f64 {
    value as f64 / 10.0
}

/// Answers catalog questions through a cached client
#[derive(Debug)]
pub struct Questions<'a, T, S> {
    client: &'a FetchClient<T, S>,
    config: &'a Config,
}

impl<'a, T: Transport, S: CacheStorage> Questions<'a, T, S> {
    pub fn new(client: &'a FetchClient<T, S>, config: &'a Config) -> Self {
        Self { client, config }
    }

    /// Answers every question in order, handing each answer to `emit` as soon
    /// as it is known
    ///
    /// The first failing question ends the run; later questions are not asked.
    pub async fn run_all(&self, mut emit: impl FnMut(&Answer)) -> Result<(), FetchError> {
        let mut ask = |number: usize, answer: Answer, started: Instant| {
            info!(
                question = number,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Answered"
            );
            emit(&answer);
        };

        let started = Instant::now();
        ask(1, self.average_height_gen1().await?, started);
        let started = Instant::now();
        ask(2, self.highest_base_exp_fire().await?, started);
        let started = Instant::now();
        ask(3, self.count_levitate().await?, started);
        let started = Instant::now();
        ask(4, self.fastest_under_10kg().await?, started);
        let started = Instant::now();
        ask(5, self.shortest_electric().await?, started);
        let started = Instant::now();
        ask(6, self.heaviest().await?, started);
        let started = Instant::now();
        ask(7, self.longest_names().await?, started);

        Ok(())
    }

    async fn pokemon(&self, name: &str) -> Result<Pokemon, FetchError> {
        self.client.fetch_as(&self.config.pokemon_url(name)).await
    }

    /// Fetches every creature in the catalog and passes it to `visit`
    ///
    /// Pages are processed one after another; within a page creatures are
    /// fetched `batch_size` at a time. `visit` runs synchronously between
    /// fetches, so it can update shared state without it changing underneath.
    async fn visit_catalog(&self, visit: impl Fn(&str, &Pokemon)) -> Result<(), FetchError> {
        let client = self.client;
        let config = self.config;
        let visit = &visit;

        walk_pages(client, &config.catalog_url(), |page| async move {
            run_batches(page.results, config.batch_size, |entry| async move {
                let pokemon: Pokemon = client.fetch_as(&config.pokemon_url(&entry.name)).await?;
                visit(&entry.name, &pokemon);
                Ok::<(), FetchError>(())
            })
            .await
        })
        .await
    }

    /// Mean height in meters of the first-generation species
    pub async fn average_height_gen1(&self) -> Result<Answer, FetchError> {
        let gen1: Generation = self
            .client
            .fetch_as(&self.config.endpoint("generation/1"))
            .await?;

        let mut total_height = 0.0;
        let mut count = 0u32;
        for species in &gen1.pokemon_species {
            let pokemon = self.pokemon(&species.name).await?;
            total_height += pokemon.height_m();
            count += 1;
        }

        let average = total_height / f64::from(count);
        Ok(Answer::new(
            "What is the average height of all Pokemon in the first generation?",
            format!("{average:.2} m"),
        ))
    }

    /// Fire-type creature with the highest base experience
    pub async fn highest_base_exp_fire(&self) -> Result<Answer, FetchError> {
        let fire: Membership = self.client.fetch_as(&self.config.endpoint("type/fire")).await?;

        let mut best = Best::seeded(-1i64);
        // A null experience competes as 0 but is reported as null
        let mut shown = best.value().to_string();
        for name in fire.names() {
            let pokemon = self.pokemon(name).await?;
            let experience = pokemon.base_experience;
            if best.offer_max(name, experience.map_or(0, i64::from)) {
                shown = experience.map_or_else(|| "null".to_string(), |e| e.to_string());
            }
        }

        Ok(Answer::new(
            "Which Pokemon has the highest \"Base Experience\" among all Fire type Pokemon?",
            format!("{} ({shown})", best.name()),
        ))
    }

    /// Number of creatures with the Levitate ability
    pub async fn count_levitate(&self) -> Result<Answer, FetchError> {
        let levitate: Membership = self
            .client
            .fetch_as(&self.config.endpoint("ability/levitate"))
            .await?;

        Ok(Answer::new(
            "How many different Pokemon possess the \"Levitate\" ability?",
            levitate.pokemon.len().to_string(),
        ))
    }

    /// Fastest creature lighter than 10 kg
    pub async fn fastest_under_10kg(&self) -> Result<Answer, FetchError> {
        let fastest = RefCell::new(Best::seeded(-1i64));

        self.visit_catalog(|name, pokemon| {
            if pokemon.weight < LIGHT_WEIGHT_LIMIT {
                fastest
                    .borrow_mut()
                    .offer_max(name, i64::from(pokemon.speed()));
            }
        })
        .await?;

        let fastest = fastest.into_inner();
        Ok(Answer::new(
            "Which Pokemon has the highest \"Speed\" stat among those that weigh less than 10kg?",
            format!("{} (Speed: {})", fastest.name(), fastest.value()),
        ))
    }

    /// Shortest electric-type creature
    pub async fn shortest_electric(&self) -> Result<Answer, FetchError> {
        let electric: Membership = self
            .client
            .fetch_as(&self.config.endpoint("type/electric"))
            .await?;

        let mut shortest = Best::seeded(HEIGHT_SENTINEL);
        for name in electric.names() {
            let pokemon = self.pokemon(name).await?;
            shortest.offer_min(name, i64::from(pokemon.height));
        }

        Ok(Answer::new(
            "Which \"Electric\" type Pokemon has the shortest height?",
            format!("{} ({} m)", shortest.name(), tenths(shortest.value())),
        ))
    }

    /// Heaviest creatures, all of them when several share the top weight
    pub async fn heaviest(&self) -> Result<Answer, FetchError> {
        let heaviest = RefCell::new(Tied::seeded(-1i64));

        self.visit_catalog(|name, pokemon| {
            heaviest
                .borrow_mut()
                .offer_max(name, i64::from(pokemon.weight));
        })
        .await?;

        let heaviest = heaviest.into_inner();
        Ok(Answer::new(
            "What is the heaviest Pokemon?",
            format!("{} ({} kg)", heaviest.joined(), tenths(heaviest.value())),
        ))
    }

    /// Creatures with the longest names, read from the listing alone
    pub async fn longest_names(&self) -> Result<Answer, FetchError> {
        let mut longest = Tied::seeded(0usize);

        walk_pages(self.client, &self.config.catalog_url(), |page| {
            for entry in &page.results {
                longest.offer_max(&entry.name, entry.name.chars().count());
            }
            future::ready(Ok(()))
        })
        .await?;

        Ok(Answer::new(
            "What are the Pokemons with the longest names?",
            format!("{} ({} characters)", longest.joined(), longest.value()),
        ))
    }
}

//! Typed views over PokeAPI documents
//!
//! Only the fields the questions read are modelled; everything else in the
//! cached documents is ignored on deserialization.

use serde::Deserialize;

use crate::pages::NamedResource;

/// A single creature (`pokemon/{name}`)
#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    /// Height in decimeters
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Experience gained for defeating it; null for some alternate forms
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Base stats
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
}

impl Pokemon {
    /// Base value of the named stat, if present
    pub fn base_stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .rev()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
    }

    /// Speed stat, zero when the document doesn't list one
    pub fn speed(&self) -> u32 {
        self.base_stat("speed").unwrap_or(0)
    }

    /// Height in meters
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }
}

/// One entry of a creature's stat list
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// A generation (`generation/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct Generation {
    /// Species introduced in this generation
    pub pokemon_species: Vec<NamedResource>,
}

/// A type (`type/{name}`) or ability (`ability/{name}`) membership listing
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub pokemon: Vec<MemberSlot>,
}

impl Membership {
    /// Names of the members in listing order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pokemon.iter().map(|slot| slot.pokemon.name.as_str())
    }
}

/// A creature's slot within a type or ability listing
#[derive(Debug, Clone, Deserialize)]
pub struct MemberSlot {
    pub pokemon: NamedResource,
}

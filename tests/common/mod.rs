//! Small fixed catalog shared by the integration tests
//!
//! Every document the seven questions need, keyed by the URL the client will
//! request when configured with `BASE`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;

/// API root used by the fixtures; nothing listens on it
pub const BASE: &str = "http://127.0.0.1:9/api/v2/";

/// (name, height, weight, base experience, speed) in catalog order
const CREATURES: &[(&str, u32, u32, u32, u32)] = &[
    ("bulbasaur", 7, 69, 64, 45),
    ("charmander", 6, 85, 62, 65),
    ("charmeleon", 11, 190, 142, 80),
    ("charizard", 17, 905, 267, 100),
    ("pikachu", 4, 60, 112, 90),
    ("raichu", 8, 300, 218, 110),
    ("gastly", 13, 1, 62, 80),
    ("snorlax", 21, 4600, 189, 30),
    ("cosmoem", 1, 9999, 140, 37),
    ("celesteela", 92, 9999, 257, 61),
];

/// Expected answers, in question order
pub const ANSWERS: [&str; 7] = [
    "0.57 m",
    "charizard (267)",
    "3",
    "pikachu (Speed: 90)",
    "pikachu (0.4 m)",
    "cosmoem, celesteela (999.9 kg)",
    "charmander, charmeleon, celesteela (10 characters)",
];

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn named(kind: &str, name: &str) -> Value {
    json!({"name": name, "url": url(&format!("{kind}/{name}/"))})
}

fn members(names: &[&str]) -> Value {
    let slots: Vec<Value> = names
        .iter()
        .map(|n| json!({"slot": 1, "pokemon": named("pokemon", n)}))
        .collect();
    json!({ "pokemon": slots })
}

/// All fixture documents keyed by request URL
pub fn documents() -> HashMap<String, Value> {
    let mut docs = HashMap::new();

    for &(name, height, weight, base_experience, speed) in CREATURES {
        docs.insert(
            url(&format!("pokemon/{name}")),
            json!({
                "name": name,
                "height": height,
                "weight": weight,
                "base_experience": base_experience,
                "stats": [
                    {"base_stat": 50, "effort": 0, "stat": named("stat", "hp")},
                    {"base_stat": speed, "effort": 1, "stat": named("stat", "speed")}
                ]
            }),
        );
    }

    let (first, second) = CREATURES.split_at(5);
    let second_page = url("pokemon?offset=5&limit=5");
    let listing = |entries: &[(&str, u32, u32, u32, u32)]| -> Vec<Value> {
        entries.iter().map(|c| named("pokemon", c.0)).collect()
    };
    docs.insert(
        url("pokemon?limit=200&offset=0"),
        json!({"count": 10, "next": second_page, "previous": null, "results": listing(first)}),
    );
    docs.insert(
        second_page,
        json!({"count": 10, "next": null, "previous": null, "results": listing(second)}),
    );

    docs.insert(
        url("generation/1"),
        json!({"id": 1, "pokemon_species": [
            named("pokemon-species", "bulbasaur"),
            named("pokemon-species", "charmander"),
            named("pokemon-species", "pikachu")
        ]}),
    );
    docs.insert(url("type/fire"), members(&["charmander", "charmeleon", "charizard"]));
    docs.insert(url("type/electric"), members(&["pikachu", "raichu"]));
    docs.insert(url("ability/levitate"), members(&["gastly", "haunter", "gengar"]));

    docs
}

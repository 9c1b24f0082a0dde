//! In-memory pools shared by unit tests.

use crate::generator::{Pool, WeightedPool, WordSource};
use crate::groups::GroupDefinition;
use crate::sources::Sources;

fn pool(origin: &str, values: &[&str]) -> Pool {
    Pool::new(origin, values.iter().map(|value| (*value).to_owned()).collect())
        .expect("non-empty test pool")
}

fn weighted(origin: &str, values: &[(&str, u64)]) -> WeightedPool {
    WeightedPool::new(
        origin,
        values
            .iter()
            .map(|(value, weight)| ((*value).to_owned(), *weight))
            .collect(),
    )
    .expect("valid weighted test pool")
}

/// Small, fixed pools without photos or a system word list.
pub(crate) fn sample_sources() -> Sources {
    Sources {
        first_names: pool("first_names", &["Ada", "Grace", "Zoë", "Linus"]),
        last_names: pool("last_names", &["Lovelace", "Hopper", "Ñúñez", "Torvalds"]),
        streets: pool("streets", &["Main St", "Elm Ave"]),
        states: pool("states", &["NC", "MA"]),
        cities: pool("cities", &["Raleigh", "Boston"]),
        employee_types: weighted("employee_types", &[("Employee", 8), ("Contractor", 2)]),
        shells: weighted("shells", &[("/bin/bash", 9), ("/bin/zsh", 1)]),
        groups: vec![
            GroupDefinition::new("staff", 0.5, "groups", 1).expect("definition"),
            GroupDefinition::new("admins", 0.1, "groups", 2).expect("definition"),
        ],
        words: WordSource::Pool(pool(
            "words",
            &[
                "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
                "india", "juliet", "kilo", "lima", "mike", "november", "oscar", "papa",
                "quebec", "romeo", "sierra", "tango", "uniform", "victor",
            ],
        )),
        photos: None,
    }
}

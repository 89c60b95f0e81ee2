// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn uuid_ids_are_unique_and_flagged() {
    let id_gen = UuidIdGen;
    let a = id_gen.next();
    let b = id_gen.next();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
    assert!(id_gen.is_unique());
}

#[test]
fn random_names_are_lowercase_of_requested_size() {
    let id_gen = RandomNameGen::new(12);
    let id = id_gen.next();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|c| c.is_ascii_lowercase()));
    assert!(!id_gen.is_unique());
}

#[test]
fn random_name_size_is_at_least_one() {
    assert_eq!(RandomNameGen::new(0).size(), 1);
}

#[parameterized(
    uuid = { IdGeneration::Uuid, true },
    random_name = { IdGeneration::RandomName, false },
)]
fn configured_generator_reports_uniqueness(generation: IdGeneration, unique: bool) {
    let id_gen = SessionIdGen::new(generation, 8);
    assert_eq!(id_gen.is_unique(), unique);
    assert!(!id_gen.next().is_empty());
}

#[test]
fn id_generation_parses_kebab_case() {
    let parsed: IdGeneration = serde_json::from_str("\"random-name\"").unwrap();
    assert_eq!(parsed, IdGeneration::RandomName);
    let parsed: IdGeneration = serde_json::from_str("\"uuid\"").unwrap();
    assert_eq!(parsed, IdGeneration::Uuid);
}

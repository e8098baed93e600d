//! Shared test utilities for the simple-folio test suite.
//!
//! Provides registry builders, rank extractors, and invariant assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut registry = registry_with(&[("home", "Home", 0), ("a", "A", 1)]);
//! rank::insert_at_rank(&mut registry, "b", Project::new("B", ""), 1);
//! assert_ranks(&registry, &[("home", 0), ("b", 1), ("a", 2)]);
//! ```

use std::collections::BTreeMap;
use tempfile::TempDir;

use crate::store::RegistryStore;
use crate::types::{HOME_SLUG, Project, Registry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a registry from `(slug, title, rank)` triples exactly as given.
///
/// No normalization is applied, so tests can construct dirty states
/// (duplicate ranks, gaps, `home` out of place).
pub fn registry_with(entries: &[(&str, &str, u32)]) -> Registry {
    let projects: BTreeMap<String, Project> = entries
        .iter()
        .map(|(slug, title, rank)| {
            let mut project = Project::new(*title, format!("About {title}."));
            project.rank = *rank;
            (slug.to_string(), project)
        })
        .collect();
    Registry {
        portfolio_title: "Test Portfolio".to_string(),
        projects,
    }
}

/// A store pointing at `projects.json` inside a fresh temp directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn temp_store() -> (TempDir, RegistryStore) {
    let tmp = TempDir::new().unwrap();
    let store = RegistryStore::new(tmp.path().join("projects.json"));
    (tmp, store)
}

// =========================================================================
// Extractors
// =========================================================================

/// `(slug, rank)` pairs ordered by rank.
pub fn ranks(registry: &Registry) -> Vec<(String, u32)> {
    let mut pairs: Vec<(String, u32)> = registry
        .projects
        .iter()
        .map(|(slug, p)| (slug.clone(), p.rank))
        .collect();
    pairs.sort_by_key(|(_, rank)| *rank);
    pairs
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert the registry holds exactly these `(slug, rank)` pairs.
pub fn assert_ranks(registry: &Registry, expected: &[(&str, u32)]) {
    let actual = ranks(registry);
    let expected: Vec<(String, u32)> = expected
        .iter()
        .map(|(slug, rank)| (slug.to_string(), *rank))
        .collect();
    assert_eq!(actual, expected, "ranks mismatch");
    assert_contiguous(registry);
}

/// Assert ranks are `0..n` and `home` is at 0.
pub fn assert_contiguous(registry: &Registry) {
    let mut seen: Vec<u32> = registry.projects.values().map(|p| p.rank).collect();
    seen.sort_unstable();
    let expected: Vec<u32> = (0..registry.len() as u32).collect();
    assert_eq!(seen, expected, "ranks are not contiguous from 0");

    let home = registry
        .get(HOME_SLUG)
        .unwrap_or_else(|| panic!("'{HOME_SLUG}' missing from registry"));
    assert_eq!(home.rank, 0, "'{HOME_SLUG}' is not at rank 0");
}

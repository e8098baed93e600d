//! Rank engine: keeps every project in a gap-free total order.
//!
//! After any mutating call in this module the registry satisfies:
//!
//! - ranks are exactly `{0, 1, ..., n-1}`, no gaps and no duplicates
//! - the `home` project holds rank 0
//!
//! None of these operations fail. Out-of-range or nonsensical positions are
//! clamped, unknown slugs in a reorder request are skipped, and dirty input
//! (duplicate ranks, gaps) is normalized on the next renumbering.
//!
//! ## Ordering
//!
//! Display order is `(rank ascending, title ascending ignoring case)`, with
//! the slug as a last resort so equal titles still sort deterministically.
//! Ties only exist transiently, e.g. in a hand-edited registry file.

use crate::types::{HOME_SLUG, Project, Registry};
use log::debug;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Compare two `(slug, project)` entries in display order.
fn display_order(a: (&str, &Project), b: (&str, &Project)) -> Ordering {
    a.1.rank
        .cmp(&b.1.rank)
        .then_with(|| a.1.title.to_lowercase().cmp(&b.1.title.to_lowercase()))
        .then_with(|| a.0.cmp(b.0))
}

/// All projects in display order.
pub fn sorted_projects(registry: &Registry) -> Vec<(&str, &Project)> {
    let mut entries: Vec<(&str, &Project)> = registry
        .projects
        .iter()
        .map(|(slug, project)| (slug.as_str(), project))
        .collect();
    entries.sort_by(|a, b| display_order(*a, *b));
    entries
}

fn sorted_slugs(registry: &Registry) -> Vec<String> {
    sorted_projects(registry)
        .into_iter()
        .map(|(slug, _)| slug.to_string())
        .collect()
}

/// Assign ranks `0..n` following `order`, with `home` pinned to the front.
fn renumber(registry: &mut Registry, mut order: Vec<String>) {
    if let Some(pos) = order.iter().position(|s| s == HOME_SLUG) {
        let home = order.remove(pos);
        order.insert(0, home);
    }
    for (position, slug) in order.iter().enumerate() {
        if let Some(project) = registry.projects.get_mut(slug) {
            project.rank = u32::try_from(position).unwrap_or(u32::MAX);
        }
    }
    debug!("renumbered {} projects: {:?}", order.len(), order);
}

/// Clamp a requested position into `[0, len]`.
fn clamp_position(target: i64, len: usize) -> usize {
    if target <= 0 {
        0
    } else {
        usize::try_from(target).unwrap_or(usize::MAX).min(len)
    }
}

/// Place `project` under `slug` at position `target`, shifting the rest.
///
/// If `slug` already exists it is taken out first, so this doubles as
/// "move". The position is clamped into `[0, N]` where `N` is the number
/// of other projects; `home` always lands at 0.
pub fn insert_at_rank(registry: &mut Registry, slug: &str, project: Project, target: i64) {
    registry.projects.remove(slug);
    let mut order = sorted_slugs(registry);
    let position = if slug == HOME_SLUG {
        0
    } else {
        clamp_position(target, order.len())
    };
    order.insert(position, slug.to_string());
    registry.projects.insert(slug.to_string(), project);
    renumber(registry, order);
}

/// Reorder projects front-to-back following `desired`.
///
/// Unknown slugs and repeats are ignored. Projects not mentioned keep their
/// relative order and go after the mentioned ones. The set of projects
/// never changes.
pub fn reorder<S: AsRef<str>>(registry: &mut Registry, desired: &[S]) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<String> = Vec::with_capacity(registry.len());

    for slug in desired {
        let slug = slug.as_ref();
        if registry.contains(slug) && seen.insert(slug) {
            order.push(slug.to_string());
        }
    }
    for slug in sorted_slugs(registry) {
        if !seen.contains(slug.as_str()) {
            order.push(slug);
        }
    }
    renumber(registry, order);
}

/// Re-number ranks from 0 in display order, closing any gaps.
///
/// Used after a delete and when normalizing a freshly loaded registry.
/// Idempotent.
pub fn compact_after_delete(registry: &mut Registry) {
    let order = sorted_slugs(registry);
    renumber(registry, order);
}

/// Turn a user-supplied rank string into a target position.
///
/// Missing or unparsable input means "append to the end"; the result is
/// meant to be passed straight to [`insert_at_rank`], which clamps it.
pub fn parse_rank_input(raw: Option<&str>) -> i64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return i64::MAX;
    };
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
        .unwrap_or(i64::MAX)
}

/// Projects split for site navigation.
#[derive(Debug)]
pub struct Navigation<'a> {
    /// `home` followed by the next `featured_count` projects by rank.
    pub featured: Vec<(&'a str, &'a Project)>,
    /// Everything after the featured head.
    pub other: Vec<(&'a str, &'a Project)>,
}

/// Split the display order into a bounded featured head and the rest.
pub fn split_navigation(registry: &Registry, featured_count: usize) -> Navigation<'_> {
    let mut featured = sorted_projects(registry);
    let head = featured_count.saturating_add(1).min(featured.len());
    let other = featured.split_off(head);
    Navigation { featured, other }
}

//! URL slugs for projects.
//!
//! A slug is derived from the project title and then made unique against
//! the registry:
//!
//! - `"My Project!"` → `my-project`
//! - `"Data/Models"` → `data-models`
//! - `"!!!"` → `project-3` (placeholder from the current project count)
//! - `"My Project"` when `my-project` exists → `my-project-1`
//!
//! No randomness is involved: the same title against the same set of
//! existing slugs always yields the same result.
//!
//! Slugs become directory names in the built site, so names the site
//! itself uses (`assets`) are never handed out.

use crate::types::Registry;

/// Output directories the site generator writes besides project pages.
pub const RESERVED_SLUGS: &[&str] = &["assets"];

pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Whether `slug` is already in canonical form: non-empty, unchanged by
/// [`slugify`], and not reserved.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !is_reserved(slug) && slugify(slug) == slug
}

/// Lowercase `title`, turn spaces and path separators into dashes, and drop
/// everything that is not a letter, digit, `_`, or `-`.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '/' | '\\' => Some('-'),
            c if c.is_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}

/// Derive a slug from `title` that is not yet a key in `registry`.
///
/// Collisions, with existing or reserved slugs, get `-1`, `-2`, … appended.
/// The loop ends because only finitely many slugs can be taken.
pub fn generate_slug(title: &str, registry: &Registry) -> String {
    let taken = |slug: &str| registry.contains(slug) || is_reserved(slug);

    let mut base = slugify(title);
    if base.is_empty() {
        base = format!("project-{}", registry.len());
    }
    if !taken(&base) {
        return base;
    }

    let mut suffix: usize = 1;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

//! Registry data model shared by the store, the rank engine, and the site
//! generator.
//!
//! The registry file is hand-editable JSON, so values read from disk are
//! loosely typed. All coercion happens here, once, while deserializing:
//! a [`Project`] handed to the rest of the crate always has a concrete
//! `u32` rank, and a [`Registry`] always contains the `home` project with
//! ranks compacted to `0..n`. Keys that are not canonical slugs (`"../x"`,
//! `""`, `"Has Space"`, a reserved name) are re-keyed the way new projects
//! are named, so every slug is safe to use as a directory name.
//!
//! ## On-disk shape
//!
//! ```json
//! {
//!   "portfolio_title": "Jane Doe: Selected Work",
//!   "projects": {
//!     "home": { "title": "Home", "content": "Welcome!", "rank": 0 },
//!     "tiny-unet": {
//!       "title": "Tiny UNet",
//!       "content": "## Results\n\n[TABLE:unet-results.xlsx]",
//!       "rank": 1,
//!       "table_filename": "unet-appendix.xlsx"
//!     }
//!   }
//! }
//! ```

use crate::{rank, slug};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slug of the mandatory landing project. Always present, always rank 0.
pub const HOME_SLUG: &str = "home";

/// Portfolio title used when the registry file is missing or has none.
pub const DEFAULT_PORTFOLIO_TITLE: &str = "My Portfolio";

const DEFAULT_HOME_TITLE: &str = "Home";
const DEFAULT_HOME_CONTENT: &str = "Welcome to my portfolio.";

/// One entry in the portfolio. The slug is the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    /// Raw markdown body; may contain `[TABLE:file]` markers.
    pub content: String,
    pub rank: u32,
    /// Spreadsheet rendered below the content, relative to the tables dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_filename: Option<String>,
}

impl Project {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            rank: 0,
            table_filename: None,
        }
    }

    fn default_home() -> Self {
        Self::new(DEFAULT_HOME_TITLE, DEFAULT_HOME_CONTENT)
    }
}

/// The complete portfolio state: title plus every project keyed by slug.
///
/// Map order is storage order only. Display order comes from `rank`, see
/// [`rank::sorted_projects`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRegistry")]
pub struct Registry {
    pub portfolio_title: String,
    pub projects: BTreeMap<String, Project>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_PORTFOLIO_TITLE)
    }
}

impl Registry {
    /// A registry holding only the default `home` project.
    pub fn new(portfolio_title: impl Into<String>) -> Self {
        let mut projects = BTreeMap::new();
        projects.insert(HOME_SLUG.to_string(), Project::default_home());
        Self {
            portfolio_title: portfolio_title.into(),
            projects,
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.projects.contains_key(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&Project> {
        self.projects.get(slug)
    }
}

// =============================================================================
// Ingestion
// =============================================================================

/// Registry as it appears on disk, before coercion.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRegistry {
    portfolio_title: Option<String>,
    projects: BTreeMap<String, RawProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProject {
    title: Option<String>,
    content: Option<String>,
    rank: Option<serde_json::Value>,
    table_filename: Option<String>,
}

impl From<RawRegistry> for Registry {
    fn from(raw: RawRegistry) -> Self {
        let projects: Vec<(String, Project)> = raw
            .projects
            .into_iter()
            .map(|(slug, p)| {
                let project = Project {
                    title: p.title.unwrap_or_else(|| slug.clone()),
                    content: p.content.unwrap_or_default(),
                    // Unusable ranks sort after every valid one.
                    rank: p.rank.as_ref().and_then(coerce_rank).unwrap_or(u32::MAX),
                    table_filename: p.table_filename.filter(|f| !f.trim().is_empty()),
                };
                (slug, project)
            })
            .collect();

        let mut registry = Registry {
            portfolio_title: raw
                .portfolio_title
                .unwrap_or_else(|| DEFAULT_PORTFOLIO_TITLE.to_string()),
            projects: BTreeMap::new(),
        };

        // Canonical keys first so they keep their slug; the rest are
        // re-keyed around them.
        let (canonical, rekeyed): (Vec<_>, Vec<_>) = projects
            .into_iter()
            .partition(|(key, _)| slug::is_valid_slug(key));
        for (slug, project) in canonical {
            registry.projects.insert(slug, project);
        }
        for (key, project) in rekeyed {
            let new_slug = slug::generate_slug(&key, &registry);
            warn!("registry key {key:?} is not a valid slug; using '{new_slug}'");
            registry.projects.insert(new_slug, project);
        }

        if !registry.contains(HOME_SLUG) {
            rank::insert_at_rank(&mut registry, HOME_SLUG, Project::default_home(), 0);
        }
        rank::compact_after_delete(&mut registry);
        registry
    }
}

/// Coerce a loosely typed JSON rank into a `u32`.
///
/// Integers, integral-looking strings, and finite floats are accepted;
/// negatives clamp to 0. Anything else is `None`.
fn coerce_rank(value: &serde_json::Value) -> Option<u32> {
    let n = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?,
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })?
        }
        _ => return None,
    };
    Some(u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}

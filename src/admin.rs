//! Admin operations on the portfolio.
//!
//! Every operation is a single load → mutate → save unit run through
//! [`transact`]. The mutations themselves are plain functions on a
//! [`Registry`] so they can be exercised without touching the filesystem.
//!
//! The rank engine and slug allocator never reject input. Errors here are
//! limited to conditions the caller has to act on: an unknown slug, an
//! attempt to remove or rename `home`, a rename onto a taken slug, and a
//! failed save.

use crate::rank;
use crate::slug::{generate_slug, is_reserved, slugify};
use crate::store::{RegistryStore, StoreError};
use crate::types::{HOME_SLUG, Project, Registry};
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("No project with slug '{0}'")]
    NotFound(String),
    #[error("The 'home' project cannot be deleted or renamed")]
    HomeProtected,
    #[error("Slug '{0}' is already in use")]
    SlugTaken(String),
    #[error("'{0}' does not contain any usable slug characters")]
    InvalidSlug(String),
    /// The mutation was applied in memory but could not be written out.
    /// The mutated registry is handed back so the caller can retry.
    #[error("Saving the registry failed: {source}")]
    SaveFailed {
        registry: Box<Registry>,
        #[source]
        source: StoreError,
    },
}

/// Fields for a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub content: String,
    pub table_filename: Option<String>,
}

/// A partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProjectEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Target position, already coerced with [`rank::parse_rank_input`].
    pub rank: Option<i64>,
    /// `Some(None)` clears the table.
    pub table_filename: Option<Option<String>>,
}

/// Load the registry, apply `op`, and save the result.
///
/// Nothing is saved when `op` fails.
pub fn transact<T>(
    store: &RegistryStore,
    op: impl FnOnce(&mut Registry) -> Result<T, AdminError>,
) -> Result<T, AdminError> {
    let mut registry = store.load();
    let out = op(&mut registry)?;
    store
        .save(&registry)
        .map_err(|source| AdminError::SaveFailed {
            registry: Box::new(registry),
            source,
        })?;
    Ok(out)
}

// =============================================================================
// Mutations
// =============================================================================

/// Add a project at `rank` and return its generated slug.
pub fn add_project(registry: &mut Registry, new: NewProject, rank: i64) -> String {
    let slug = generate_slug(&new.title, registry);
    let project = Project {
        title: new.title,
        content: new.content,
        rank: 0,
        table_filename: new.table_filename,
    };
    rank::insert_at_rank(registry, &slug, project, rank);
    info!(
        "added project '{slug}' at rank {}",
        registry.get(&slug).map_or(0, |p| p.rank)
    );
    slug
}

/// Apply `edit` to the project under `slug`.
pub fn edit_project(
    registry: &mut Registry,
    slug: &str,
    edit: ProjectEdit,
) -> Result<(), AdminError> {
    let mut project = registry
        .get(slug)
        .cloned()
        .ok_or_else(|| AdminError::NotFound(slug.to_string()))?;

    if let Some(title) = edit.title {
        project.title = title;
    }
    if let Some(content) = edit.content {
        project.content = content;
    }
    if let Some(table) = edit.table_filename {
        project.table_filename = table;
    }

    match edit.rank {
        Some(target) => rank::insert_at_rank(registry, slug, project, target),
        None => {
            registry.projects.insert(slug.to_string(), project);
            // A title change can reorder entries that share a rank.
            rank::compact_after_delete(registry);
        }
    }
    info!("edited project '{slug}'");
    Ok(())
}

/// Move the project under `slug` to `new_slug`, keeping its position.
///
/// `new_slug` is normalized the same way titles are. Returns the slug
/// actually used.
pub fn rename_project(
    registry: &mut Registry,
    slug: &str,
    new_slug: &str,
) -> Result<String, AdminError> {
    if slug == HOME_SLUG {
        return Err(AdminError::HomeProtected);
    }
    if !registry.contains(slug) {
        return Err(AdminError::NotFound(slug.to_string()));
    }
    let target = slugify(new_slug);
    if target.is_empty() {
        return Err(AdminError::InvalidSlug(new_slug.to_string()));
    }
    if target == slug {
        return Ok(target);
    }
    if registry.contains(&target) || is_reserved(&target) {
        return Err(AdminError::SlugTaken(target));
    }

    if let Some(project) = registry.projects.remove(slug) {
        registry.projects.insert(target.clone(), project);
    }
    info!("renamed project '{slug}' to '{target}'");
    Ok(target)
}

/// Remove the project under `slug` and close the rank gap.
pub fn delete_project(registry: &mut Registry, slug: &str) -> Result<Project, AdminError> {
    if slug == HOME_SLUG {
        return Err(AdminError::HomeProtected);
    }
    let removed = registry
        .projects
        .remove(slug)
        .ok_or_else(|| AdminError::NotFound(slug.to_string()))?;
    rank::compact_after_delete(registry);
    info!("deleted project '{slug}'");
    Ok(removed)
}

/// Reorder projects to follow `order`; see [`rank::reorder`].
pub fn reorder_projects<S: AsRef<str>>(registry: &mut Registry, order: &[S]) {
    rank::reorder(registry, order);
    info!("reordered {} projects", registry.len());
}

pub fn set_portfolio_title(registry: &mut Registry, title: &str) {
    registry.portfolio_title = title.trim().to_string();
    info!("portfolio title set to '{}'", registry.portfolio_title);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;

    fn sample() -> Registry {
        registry_with(&[("home", "Home", 0), ("a", "A", 1), ("b", "B", 2)])
    }

    // =========================================================================
    // add
    // =========================================================================

    #[test]
    fn add_project_generates_slug_and_inserts() {
        let mut registry = sample();
        let slug = add_project(
            &mut registry,
            NewProject {
                title: "Tiny UNet".to_string(),
                content: "small".to_string(),
                table_filename: Some("unet.xlsx".to_string()),
            },
            1,
        );
        assert_eq!(slug, "tiny-unet");
        assert_ranks(&registry, &[("home", 0), ("tiny-unet", 1), ("a", 2), ("b", 3)]);
        assert_eq!(
            registry.get("tiny-unet").unwrap().table_filename.as_deref(),
            Some("unet.xlsx")
        );
    }

    #[test]
    fn add_project_with_default_rank_appends() {
        let mut registry = sample();
        let slug = add_project(
            &mut registry,
            NewProject {
                title: "Last".to_string(),
                ..Default::default()
            },
            rank::parse_rank_input(Some("not a number")),
        );
        assert_eq!(registry.get(&slug).unwrap().rank, 3);
    }

    #[test]
    fn add_duplicate_title_gets_distinct_slug() {
        let mut registry = sample();
        let slug = add_project(
            &mut registry,
            NewProject {
                title: "A".to_string(),
                ..Default::default()
            },
            9,
        );
        assert_eq!(slug, "a-1");
        assert_contiguous(&registry);
    }

    // =========================================================================
    // edit
    // =========================================================================

    #[test]
    fn edit_updates_fields_in_place() {
        let mut registry = sample();
        edit_project(
            &mut registry,
            "a",
            ProjectEdit {
                title: Some("Alpha".to_string()),
                content: Some("new body".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let a = registry.get("a").unwrap();
        assert_eq!(a.title, "Alpha");
        assert_eq!(a.content, "new body");
        assert_ranks(&registry, &[("home", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn edit_with_rank_moves_project() {
        let mut registry = sample();
        edit_project(
            &mut registry,
            "b",
            ProjectEdit {
                rank: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_ranks(&registry, &[("home", 0), ("b", 1), ("a", 2)]);
    }

    #[test]
    fn edit_home_rank_is_ignored() {
        let mut registry = sample();
        edit_project(
            &mut registry,
            "home",
            ProjectEdit {
                rank: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_ranks(&registry, &[("home", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn edit_can_clear_table() {
        let mut registry = sample();
        registry.projects.get_mut("a").unwrap().table_filename = Some("t.xlsx".to_string());
        edit_project(
            &mut registry,
            "a",
            ProjectEdit {
                table_filename: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(registry.get("a").unwrap().table_filename, None);
    }

    #[test]
    fn edit_unknown_slug_is_not_found() {
        let mut registry = sample();
        let err = edit_project(&mut registry, "ghost", ProjectEdit::default()).unwrap_err();
        assert!(matches!(err, AdminError::NotFound(s) if s == "ghost"));
    }

    // =========================================================================
    // rename
    // =========================================================================

    #[test]
    fn rename_keeps_rank_and_content() {
        let mut registry = sample();
        let new = rename_project(&mut registry, "a", "Alpha Project").unwrap();
        assert_eq!(new, "alpha-project");
        assert!(!registry.contains("a"));
        assert_ranks(&registry, &[("home", 0), ("alpha-project", 1), ("b", 2)]);
        assert_eq!(registry.get("alpha-project").unwrap().content, "About A.");
    }

    #[test]
    fn rename_home_is_refused() {
        let mut registry = sample();
        assert!(matches!(
            rename_project(&mut registry, "home", "landing"),
            Err(AdminError::HomeProtected)
        ));
    }

    #[test]
    fn rename_onto_existing_slug_is_refused() {
        let mut registry = sample();
        assert!(matches!(
            rename_project(&mut registry, "a", "B"),
            Err(AdminError::SlugTaken(s)) if s == "b"
        ));
        assert!(registry.contains("a"));
    }

    #[test]
    fn rename_onto_reserved_slug_is_refused() {
        let mut registry = sample();
        assert!(matches!(
            rename_project(&mut registry, "a", "Assets"),
            Err(AdminError::SlugTaken(s)) if s == "assets"
        ));
        assert!(registry.contains("a"));
    }

    #[test]
    fn rename_to_garbage_is_refused() {
        let mut registry = sample();
        assert!(matches!(
            rename_project(&mut registry, "a", "!!!"),
            Err(AdminError::InvalidSlug(_))
        ));
    }

    #[test]
    fn rename_to_same_slug_is_noop() {
        let mut registry = sample();
        assert_eq!(rename_project(&mut registry, "a", "A").unwrap(), "a");
        assert_eq!(registry, sample());
    }

    // =========================================================================
    // delete / reorder / title
    // =========================================================================

    #[test]
    fn delete_compacts_survivors() {
        let mut registry = registry_with(&[
            ("home", "Home", 0),
            ("a", "A", 1),
            ("b", "B", 2),
            ("c", "C", 3),
        ]);
        let removed = delete_project(&mut registry, "a").unwrap();
        assert_eq!(removed.title, "A");
        assert_ranks(&registry, &[("home", 0), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn delete_home_is_refused() {
        let mut registry = sample();
        assert!(matches!(
            delete_project(&mut registry, "home"),
            Err(AdminError::HomeProtected)
        ));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut registry = sample();
        assert!(matches!(
            delete_project(&mut registry, "ghost"),
            Err(AdminError::NotFound(_))
        ));
    }

    #[test]
    fn reorder_projects_delegates_to_rank_engine() {
        let mut registry = sample();
        reorder_projects(&mut registry, &["b", "a"]);
        assert_ranks(&registry, &[("home", 0), ("b", 1), ("a", 2)]);
    }

    #[test]
    fn set_portfolio_title_trims() {
        let mut registry = sample();
        set_portfolio_title(&mut registry, "  ML Portfolio  ");
        assert_eq!(registry.portfolio_title, "ML Portfolio");
    }

    // =========================================================================
    // transact
    // =========================================================================

    #[test]
    fn transact_persists_successful_mutation() {
        let (_tmp, store) = temp_store();
        let slug = transact(&store, |r| {
            Ok(add_project(
                r,
                NewProject {
                    title: "Persisted".to_string(),
                    ..Default::default()
                },
                1,
            ))
        })
        .unwrap();

        assert!(store.load().contains(&slug));
    }

    #[test]
    fn transact_does_not_save_on_error() {
        let (_tmp, store) = temp_store();
        store.save(&sample()).unwrap();

        let result = transact(&store, |r| {
            r.portfolio_title = "changed".to_string();
            delete_project(r, "ghost")
        });
        assert!(result.is_err());
        assert_eq!(store.load().portfolio_title, "Test Portfolio");
    }

    #[test]
    fn transact_returns_mutated_registry_on_save_failure() {
        let (tmp, _store) = temp_store();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let store = RegistryStore::new(blocker.join("projects.json"));

        let err = transact(&store, |r| {
            set_portfolio_title(r, "Unsaved");
            Ok(())
        })
        .unwrap_err();

        match err {
            AdminError::SaveFailed { registry, .. } => {
                assert_eq!(registry.portfolio_title, "Unsaved");
            }
            other => panic!("expected SaveFailed, got {other:?}"),
        }
    }
}

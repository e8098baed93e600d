//! Static HTML site generation.
//!
//! Turns the registry into a browsable site. Each project becomes one page;
//! `home` is the site index.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # home project
//! ├── tiny-unet/
//! │   └── index.html             # one directory per project slug
//! ├── schizophrenia-detection/
//! │   └── index.html
//! └── assets/                    # copied from the site's assets_dir
//!     └── model.png
//! ```
//!
//! ## Navigation
//!
//! Every page carries the same nav bar: Home plus the next
//! `navigation.featured_count` projects by rank, followed by a collapsible
//! group holding everything else. The current page is marked with the
//! `current` class.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Titles and labels are escaped; project content is rendered from markdown
//! by [`crate::render`] and inserted as-is.

use crate::config::{self, SiteConfig};
use crate::rank::{self, Navigation};
use crate::render::render_content;
use crate::table::TableSource;
use crate::types::{HOME_SLUG, Project, Registry};
use log::info;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not copy assets: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One page written during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub slug: String,
    pub title: String,
    pub rank: u32,
    /// Output path relative to the output directory.
    pub path: String,
}

/// Summary of a build, consumed by [`crate::output`].
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Public URL of a project page.
pub fn page_url(slug: &str) -> String {
    if slug == HOME_SLUG {
        "/".to_string()
    } else {
        format!("/{slug}/")
    }
}

/// Output path of a project page, relative to the output directory.
pub fn page_path(slug: &str) -> String {
    if slug == HOME_SLUG {
        "index.html".to_string()
    } else {
        format!("{slug}/index.html")
    }
}

/// Write the whole site for `registry` into `output_dir`.
pub fn generate(
    registry: &Registry,
    config: &SiteConfig,
    tables: &dyn TableSource,
    assets_dir: &Path,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let navigation = rank::split_navigation(registry, config.navigation.featured_count);

    fs::create_dir_all(output_dir)?;

    let mut report = BuildReport::default();
    for (slug, project) in rank::sorted_projects(registry) {
        let page = render_project_page(
            registry,
            slug,
            project,
            &navigation,
            &config.navigation.other_label,
            tables,
            &css,
        );
        let rel_path = page_path(slug);
        let out_path = output_dir.join(&rel_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, page.into_string())?;

        report.pages.push(GeneratedPage {
            slug: slug.to_string(),
            title: project.title.clone(),
            rank: project.rank,
            path: rel_path,
        });
    }

    if assets_dir.is_dir() {
        report.assets_copied = copy_assets(assets_dir, &output_dir.join("assets"))?;
    }

    info!(
        "generated {} pages and {} assets in {}",
        report.pages.len(),
        report.assets_copied,
        output_dir.display()
    );
    Ok(report)
}

/// Copy every file under `src` into `dst`, preserving the tree.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target: PathBuf = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header: portfolio title and nav bar
fn site_header(portfolio_title: &str, nav: Markup) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (portfolio_title) }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the nav bar: featured links, then a collapsible group for the rest
pub fn render_nav(navigation: &Navigation<'_>, current_slug: &str, other_label: &str) -> Markup {
    let other_is_current = navigation.other.iter().any(|(s, _)| *s == current_slug);
    html! {
        ul.nav-featured {
            @for (slug, project) in &navigation.featured {
                (nav_link(slug, project, current_slug))
            }
        }
        @if !navigation.other.is_empty() {
            details.nav-other open[other_is_current] {
                summary { (other_label) }
                ul {
                    @for (slug, project) in &navigation.other {
                        (nav_link(slug, project, current_slug))
                    }
                }
            }
        }
    }
}

fn nav_link(slug: &str, project: &Project, current_slug: &str) -> Markup {
    let is_current = slug == current_slug;
    html! {
        li class=[is_current.then_some("current")] {
            a href=(page_url(slug)) { (project.title) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one project page
fn render_project_page(
    registry: &Registry,
    slug: &str,
    project: &Project,
    navigation: &Navigation<'_>,
    other_label: &str,
    tables: &dyn TableSource,
    css: &str,
) -> Markup {
    let nav = render_nav(navigation, slug, other_label);
    let body_html = render_content(&project.content, tables);
    let appendix = project
        .table_filename
        .as_deref()
        .map(|name| tables.load_table(name));

    let page_title = if slug == HOME_SLUG {
        registry.portfolio_title.clone()
    } else {
        format!("{} | {}", project.title, registry.portfolio_title)
    };

    let content = html! {
        (site_header(&registry.portfolio_title, nav))
        main.project-page {
            article.project-content {
                @if slug != HOME_SLUG {
                    h1.project-title { (project.title) }
                }
                (PreEscaped(body_html))
                @if let Some(table) = appendix {
                    section.project-table {
                        (PreEscaped(table))
                    }
                }
            }
        }
        footer.site-footer {
            (registry.portfolio_title)
        }
    };

    base_document(&page_title, css, content)
}

// ============================================================================
// Tests
// ============================================================================

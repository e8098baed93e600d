//! CLI output formatting.
//!
//! Output is **project-centric**: each line leads with the project's rank and
//! title, with its slug and attachments as secondary context. Paths are only
//! shown where a command wrote files.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! My Portfolio (4 projects)
//! 000 Home [home]
//! 001 Tiny UNet [tiny-unet]
//!     Table: results.xlsx
//!     Summary of the segmentation work...
//!
//! More projects
//! 002 Old Thing [old-thing]
//! ```
//!
//! ## Build
//!
//! ```text
//! 000 Home → index.html
//! 001 Tiny UNet → tiny-unet/index.html
//! Generated 2 pages, 3 assets
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::BuildReport;
use crate::rank;
use crate::types::{Project, Registry};

const SUMMARY_CHARS: usize = 60;

/// Format a 0-based rank as 3-digit zero-padded.
fn format_index(rank: u32) -> String {
    format!("{:0>3}", rank)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// First non-empty line of the content, truncated on a char boundary.
fn content_summary(content: &str) -> Option<String> {
    let line = content.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.chars().count() <= SUMMARY_CHARS {
        Some(line.to_string())
    } else {
        let head: String = line.chars().take(SUMMARY_CHARS).collect();
        Some(format!("{}...", head.trim_end()))
    }
}

/// One project entry: header line plus indented context lines.
fn project_lines(slug: &str, project: &Project) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} [{}]",
        format_index(project.rank),
        project.title,
        slug
    )];
    if let Some(table) = &project.table_filename {
        lines.push(format!("{}Table: {}", indent(1), table));
    }
    if let Some(summary) = content_summary(&project.content) {
        lines.push(format!("{}{}", indent(1), summary));
    }
    lines
}

// ============================================================================
// List
// ============================================================================

/// Format the registry in rank order, split the way the site nav splits it.
pub fn format_project_list(
    registry: &Registry,
    featured_count: usize,
    other_label: &str,
) -> Vec<String> {
    let navigation = rank::split_navigation(registry, featured_count);
    let noun = if registry.len() == 1 {
        "project"
    } else {
        "projects"
    };

    let mut lines = vec![format!(
        "{} ({} {})",
        registry.portfolio_title,
        registry.len(),
        noun
    )];
    for (slug, project) in &navigation.featured {
        lines.extend(project_lines(slug, project));
    }
    if !navigation.other.is_empty() {
        lines.push(String::new());
        lines.push(other_label.to_string());
        for (slug, project) in &navigation.other {
            lines.extend(project_lines(slug, project));
        }
    }
    lines
}

pub fn print_project_list(registry: &Registry, featured_count: usize, other_label: &str) {
    for line in format_project_list(registry, featured_count, other_label) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the pages written by a build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| {
            format!(
                "{} {} \u{2192} {}",
                format_index(page.rank),
                page.title,
                page.path
            )
        })
        .collect();
    lines.push(format!(
        "Generated {} pages, {} assets",
        report.pages.len(),
        report.assets_copied
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GeneratedPage;
    use crate::test_helpers::*;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(0), "000");
        assert_eq!(format_index(12), "012");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn summary_takes_first_non_empty_line() {
        assert_eq!(
            content_summary("\n\n  ## Results  \nmore"),
            Some("## Results".to_string())
        );
        assert_eq!(content_summary("   \n"), None);
    }

    #[test]
    fn summary_truncates_on_char_boundary() {
        let text = "é".repeat(80);
        let expected = format!("{}...", "é".repeat(SUMMARY_CHARS));
        assert_eq!(content_summary(&text), Some(expected));
    }

    #[test]
    fn list_shows_rank_title_and_slug() {
        let registry = registry_with(&[("home", "Home", 0), ("tiny-unet", "Tiny UNet", 1)]);
        let lines = format_project_list(&registry, 5, "More projects");

        assert_eq!(lines[0], "Test Portfolio (2 projects)");
        assert_eq!(lines[1], "000 Home [home]");
        assert_eq!(lines[2], "    About Home.");
        assert_eq!(lines[3], "001 Tiny UNet [tiny-unet]");
        assert!(!lines.contains(&"More projects".to_string()));
    }

    #[test]
    fn list_shows_table_attachment() {
        let mut registry = registry_with(&[("home", "Home", 0), ("a", "A", 1)]);
        registry.projects.get_mut("a").unwrap().table_filename = Some("results.xlsx".into());
        let lines = format_project_list(&registry, 5, "More");
        assert!(lines.contains(&"    Table: results.xlsx".to_string()));
    }

    #[test]
    fn list_splits_other_projects() {
        let registry = registry_with(&[
            ("home", "Home", 0),
            ("a", "A", 1),
            ("b", "B", 2),
            ("c", "C", 3),
        ]);
        let lines = format_project_list(&registry, 1, "Archive");

        let label = lines.iter().position(|l| l == "Archive").unwrap();
        let a = lines.iter().position(|l| l == "001 A [a]").unwrap();
        let b = lines.iter().position(|l| l == "002 B [b]").unwrap();
        assert!(a < label && label < b);
        assert_eq!(lines[label - 1], "");
    }

    #[test]
    fn list_singular_noun() {
        let registry = registry_with(&[("home", "Home", 0)]);
        assert_eq!(
            format_project_list(&registry, 5, "More")[0],
            "Test Portfolio (1 project)"
        );
    }

    #[test]
    fn build_output_lists_pages_and_totals() {
        let report = BuildReport {
            pages: vec![
                GeneratedPage {
                    slug: "home".into(),
                    title: "Home".into(),
                    rank: 0,
                    path: "index.html".into(),
                },
                GeneratedPage {
                    slug: "tiny-unet".into(),
                    title: "Tiny UNet".into(),
                    rank: 1,
                    path: "tiny-unet/index.html".into(),
                },
            ],
            assets_copied: 3,
        };
        assert_eq!(
            format_build_output(&report),
            vec![
                "000 Home \u{2192} index.html",
                "001 Tiny UNet \u{2192} tiny-unet/index.html",
                "Generated 2 pages, 3 assets",
            ]
        );
    }
}

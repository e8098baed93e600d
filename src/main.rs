use clap::{Args, Parser, Subcommand};
use log::error;
use simple_folio::admin::{self, AdminError, NewProject, ProjectEdit};
use simple_folio::config::{self, SiteConfig};
use simple_folio::store::RegistryStore;
use simple_folio::table::SpreadsheetTables;
use simple_folio::types::{DEFAULT_PORTFOLIO_TITLE, Registry};
use simple_folio::{generate, logging, output, rank};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Manage a rank-ordered project portfolio and build it into a static site")]
#[command(long_about = "\
Manage a rank-ordered project portfolio and build it into a static site

The site root holds a JSON registry of projects, each with a title, a
markdown body, and a rank. Ranks are always 0..n-1 with no gaps, and the
'home' project always sits at rank 0.

Site structure:

  site/
  ├── config.toml        # Optional, see 'simple-folio gen-config'
  ├── projects.json      # The registry, managed by this tool
  ├── tables/            # Spreadsheets for [TABLE:name.xlsx] markers
  └── assets/            # Copied into the built site under /assets/

Ranks passed with --rank are positions: 0 is the front, anything past the
end appends, and values that are not numbers also append.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log registry changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where a project body comes from.
#[derive(Args)]
struct ContentArgs {
    /// Markdown body
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the markdown body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
}

impl ContentArgs {
    fn read(&self) -> std::io::Result<Option<String>> {
        match (&self.content, &self.content_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty registry with only the home project
    Init {
        /// Portfolio title
        #[arg(long)]
        title: Option<String>,
    },
    /// List projects in rank order
    List,
    /// Add a project
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        content: ContentArgs,
        /// Position to insert at (default: end)
        #[arg(long, allow_hyphen_values = true)]
        rank: Option<String>,
        /// Spreadsheet rendered below the content
        #[arg(long)]
        table: Option<String>,
    },
    /// Change a project's fields or position
    Edit {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
        /// New position
        #[arg(long, allow_hyphen_values = true)]
        rank: Option<String>,
        /// Spreadsheet rendered below the content
        #[arg(long, conflicts_with = "no_table")]
        table: Option<String>,
        /// Remove the attached spreadsheet
        #[arg(long)]
        no_table: bool,
    },
    /// Give a project a new slug
    Rename { slug: String, new_slug: String },
    /// Delete a project
    Delete { slug: String },
    /// Put the listed projects first, in the given order
    Reorder {
        #[arg(required = true)]
        slugs: Vec<String>,
    },
    /// Set the portfolio title
    SetTitle { title: String },
    /// Build the static site
    Build {
        /// Output directory, relative to the site root unless absolute
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.verbose)?;

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.root)?;
    let store = RegistryStore::new(site_config.registry_path(&cli.root));

    match cli.command {
        Command::Init { title } => {
            if store.exists() {
                println!("Registry already exists: {}", store.path().display());
            } else {
                let title = title.unwrap_or_else(|| DEFAULT_PORTFOLIO_TITLE.to_string());
                store.save(&Registry::new(title.trim()))?;
                println!("Created {}", store.path().display());
            }
        }
        Command::List => {
            let registry = store.load();
            output::print_project_list(
                &registry,
                site_config.navigation.featured_count,
                &site_config.navigation.other_label,
            );
        }
        Command::Add {
            title,
            content,
            rank: position,
            table,
        } => {
            let new = NewProject {
                title,
                content: content.read()?.unwrap_or_default(),
                table_filename: table,
            };
            let target = rank::parse_rank_input(position.as_deref());
            let slug = commit(&store, |registry| {
                Ok(admin::add_project(registry, new, target))
            })?;
            println!("Added {slug}");
        }
        Command::Edit {
            slug,
            title,
            content,
            rank: position,
            table,
            no_table,
        } => {
            let table_filename = if no_table {
                Some(None)
            } else {
                table.map(Some)
            };
            let edit = ProjectEdit {
                title,
                content: content.read()?,
                rank: position.as_deref().map(|r| rank::parse_rank_input(Some(r))),
                table_filename,
            };
            commit(&store, |registry| admin::edit_project(registry, &slug, edit))?;
            println!("Updated {slug}");
        }
        Command::Rename { slug, new_slug } => {
            let renamed = commit(&store, |registry| {
                admin::rename_project(registry, &slug, &new_slug)
            })?;
            println!("Renamed {slug} to {renamed}");
        }
        Command::Delete { slug } => {
            let removed = commit(&store, |registry| admin::delete_project(registry, &slug))?;
            println!("Deleted {slug} ({})", removed.title);
        }
        Command::Reorder { slugs } => {
            commit(&store, |registry| {
                admin::reorder_projects(registry, slugs.as_slice());
                Ok(())
            })?;
            output::print_project_list(
                &store.load(),
                site_config.navigation.featured_count,
                &site_config.navigation.other_label,
            );
        }
        Command::SetTitle { title } => {
            commit(&store, |registry| {
                admin::set_portfolio_title(registry, &title);
                Ok(())
            })?;
            println!("Portfolio title set");
        }
        Command::Build { output: out } => {
            build(&cli.root, &site_config, &store, &out)?;
        }
        // Printed before the config was loaded.
        Command::GenConfig => {}
    }

    Ok(())
}

/// Run one admin transaction, logging a failed save before reporting it.
fn commit<T>(
    store: &RegistryStore,
    op: impl FnOnce(&mut Registry) -> Result<T, AdminError>,
) -> Result<T, AdminError> {
    admin::transact(store, op).inspect_err(|e| {
        if let AdminError::SaveFailed { .. } = e {
            error!("changes were not written to {}", store.path().display());
        }
    })
}

fn build(
    root: &Path,
    site_config: &SiteConfig,
    store: &RegistryStore,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = root.join(out);
    let registry = store.load();
    let tables = SpreadsheetTables::new(site_config.tables_path(root));

    println!("==> Building {} → {}", registry.portfolio_title, output_dir.display());
    let report = generate::generate(
        &registry,
        site_config,
        &tables,
        &site_config.assets_path(root),
        &output_dir,
    )?;
    output::print_build_output(&report);
    Ok(())
}

//! # Simple Folio
//!
//! A single-admin portfolio manager. Projects live in one JSON registry, each
//! with a title, a markdown body, and a rank. The crate keeps that registry in
//! a consistent order and turns it into a static site.
//!
//! # Architecture
//!
//! ```text
//! projects.json ──load──▶ Registry ──admin op──▶ Registry ──save──▶ projects.json
//!                             │
//!                             └──generate──▶ dist/  (one page per project)
//! ```
//!
//! Every admin command is one load → mutate → save transaction
//! ([`admin::transact`]). Mutations never reach into the filesystem, so the
//! ordering rules are tested on plain values.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Project` and `Registry`, plus coercion of hand-edited JSON on load |
//! | [`rank`] | Rank engine: insert, reorder, compact, display order, nav split |
//! | [`slug`] | URL-safe, collision-free slugs from titles |
//! | [`store`] | Registry persistence: lenient load, atomic save |
//! | [`admin`] | Admin operations built on the three modules above |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS color generation |
//! | [`table`] | Spreadsheet files rendered as HTML tables |
//! | [`render`] | Project markdown to HTML, with `[TABLE:...]` markers expanded |
//! | [`generate`] | Static HTML site built with Maud |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | stderr logger setup |
//!
//! # Invariants
//!
//! After any load or admin operation:
//!
//! - ranks are exactly `0..n-1`, with no gaps and no duplicates
//! - the `home` project exists and holds rank 0
//! - slugs are unique, since they are the registry's map keys
//!
//! Nothing in [`rank`] or [`slug`] fails. Bad positions are clamped and
//! colliding slugs get a numeric suffix. Loading a missing or corrupt registry
//! yields the default one.
//!
//! # Design Decisions
//!
//! ## Coerce Once, at the Edge
//!
//! The registry file is meant to be hand-editable, so ranks may show up as
//! strings, floats, or negatives. [`types`] converts them while
//! deserializing; everything downstream sees a `u32`.
//!
//! ## Atomic Saves
//!
//! [`store::RegistryStore::save`] writes a temp file next to the registry and
//! renames it into place. A crash mid-write leaves the previous registry
//! intact.

pub mod admin;
pub mod config;
pub mod generate;
pub mod logging;
pub mod output;
pub mod rank;
pub mod render;
pub mod slug;
pub mod store;
pub mod table;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

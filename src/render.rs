//! Project content → HTML.
//!
//! Content is markdown with two additions:
//!
//! - `[TABLE:results.xlsx]` markers are replaced by the table's HTML before
//!   markdown conversion. Each table is emitted as its own raw HTML block,
//!   so markers belong on a line of their own.
//! - `<img>` tags without a `class` get `class="img-fluid"` so images scale
//!   with the content column.
//!
//! Raw HTML in content passes through unchanged: the content is authored by
//! the site's single admin, not by visitors.

use crate::table::TableSource;
use pulldown_cmark::{Options, Parser, html as md_html};

const TABLE_MARKER_OPEN: &str = "[TABLE:";
const IMAGE_CLASS: &str = "img-fluid";

/// Render project content to an HTML fragment.
pub fn render_content(raw: &str, tables: &dyn TableSource) -> String {
    let expanded = expand_table_markers(raw, tables);
    style_images(&markdown_to_html(&expanded))
}

/// Markdown to HTML with tables, strikethrough, and footnotes enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Replace every `[TABLE:name]` marker with `tables.load_table(name)`.
///
/// An unterminated marker is left as literal text.
pub fn expand_table_markers(raw: &str, tables: &dyn TableSource) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find(TABLE_MARKER_OPEN) {
        let after_open = &rest[start + TABLE_MARKER_OPEN.len()..];
        let Some(end) = after_open.find(']') else {
            break;
        };
        out.push_str(&rest[..start]);
        let filename = after_open[..end].trim();
        // Blank lines on both sides make the fragment an HTML block.
        out.push_str("\n\n");
        out.push_str(&tables.load_table(filename));
        out.push_str("\n\n");
        rest = &after_open[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Add `class="img-fluid"` to every `<img>` tag that has no class.
pub fn style_images(html: &str) -> String {
    const OPEN: &str = "<img";
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find(OPEN) {
        let after_name = &rest[start + OPEN.len()..];
        let is_img = after_name
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '/' || c == '>');
        if !is_img {
            out.push_str(&rest[..start + OPEN.len()]);
            rest = after_name;
            continue;
        }

        let tag_end = after_name
            .find('>')
            .map_or(rest.len(), |i| start + OPEN.len() + i + 1);
        let tag = &rest[start..tag_end];

        out.push_str(&rest[..start]);
        if has_class_attribute(tag) {
            out.push_str(tag);
        } else {
            out.push_str(OPEN);
            out.push_str(" class=\"");
            out.push_str(IMAGE_CLASS);
            out.push('"');
            out.push_str(&tag[OPEN.len()..]);
        }
        rest = &rest[tag_end..];
    }
    out.push_str(rest);
    out
}

/// A `class=` that starts an attribute, not the tail of `data-class=`.
fn has_class_attribute(tag: &str) -> bool {
    tag.match_indices("class=")
        .any(|(i, _)| tag[..i].ends_with(char::is_whitespace))
}

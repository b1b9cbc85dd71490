// ABOUTME: Main library entry point for webtools-page: selection, text extraction, and diffing.
// ABOUTME: Re-exports the public API: Document, select, normalize, TextNormalizer, diff helpers.

//! webtools-page - normalized text extraction and change metrics for HTML pages.
//!
//! Everything in this crate is a pure function over in-memory strings: each
//! call parses its own document and nothing is shared between calls. Parsing
//! never fails and selector misses come back as empty results.
//!
//! # Example
//!
//! ```
//! use webtools_page::{normalize, percent_changed};
//!
//! let text = normalize("<p>Colorless <em>green</em> ideas</p>", Some("p"));
//! assert_eq!(text, "Colorless green ideas");
//!
//! let before = "<div>a\nb</div>";
//! let after = "<div>a\nc</div>";
//! assert_eq!(percent_changed(before, after, "div"), 0.5);
//! ```

pub mod diff;
pub mod options;
pub mod select;
pub mod text;
pub mod tree;

pub use crate::diff::{
    breaks_ratio, change_metrics, changes_only, diff, percent_changed, selected_changes,
    selected_diff, selected_diff_textual, split_lines, unified, ChangeMetrics, ChangeType,
    DiffRecord,
};
pub use crate::options::{NormalizerBuilder, Options, DEFAULT_IGNORED_TAGS};
pub use crate::select::{first_match_html, select, selected_extract, Selection};
pub use crate::text::{collapse_whitespace, normalize, TextNormalizer};
pub use crate::tree::{Document, Node, NodeId, NodeKind, NodePath, PathStep};

// ABOUTME: Normalized text extraction for a selected region of a markup document.
// ABOUTME: Drops script/style text, skips nested matches of the first hit, collapses whitespace.

//! Text normalization.
//!
//! Extraction steps:
//! 1. Put a space in front of every `<` so sibling text runs keep a word boundary.
//! 2. Parse and select.
//! 3. Clear the text of ignored elements (`script`, `noscript`, `style` by default)
//!    inside every selected subtree.
//! 4. Concatenate the text of each selected node, skipping nodes that sit below
//!    the *first* selected node (they are already part of its text).
//! 5. Collapse whitespace runs to one space and trim.
//!
//! Only the first match anchors the skip rule. When a selector matches several
//! disjoint subtrees, nested matches inside the later subtrees are emitted again
//! after their ancestor's text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::{NormalizerBuilder, Options};
use crate::select::select;
use crate::tree::{Document, NodeId};

// ASCII whitespace only; non-breaking spaces survive.
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\r\x0B\x0C]+").unwrap());

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim_matches(' ').to_string()
}

/// Extracts normalized text using the default options.
pub fn normalize(markup: &str, selector: Option<&str>) -> String {
    TextNormalizer::default().normalize(markup, selector)
}

/// Produces deduplicated, whitespace-collapsed text for a selection.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    opts: Options,
}

impl TextNormalizer {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Returns the normalized text of the nodes matching `selector`.
    ///
    /// `None` extracts the whole document. A selector that matches nothing
    /// yields an empty string.
    pub fn normalize(&self, markup: &str, selector: Option<&str>) -> String {
        let prepared = if self.opts.separate_tags {
            markup.replace('<', " <")
        } else {
            markup.to_string()
        };

        let mut doc = Document::parse(&prepared);
        let selection = select(&doc, selector);
        let Some(first) = selection.first() else {
            return String::new();
        };

        for id in self.ignored_nodes(&doc, selection.as_slice()) {
            doc.clear_text(id);
        }

        let mut out = String::new();
        for id in &selection {
            if doc.is_strict_descendant(id, first) {
                continue;
            }
            out.push_str(&doc.text_content(id));
        }

        let text = collapse_whitespace(&out);
        tracing::debug!(
            selected = selection.len(),
            chars = text.len(),
            "normalized text"
        );
        text
    }

    fn ignored_nodes(&self, doc: &Document, selected: &[NodeId]) -> Vec<NodeId> {
        // Selections are in document order, so a node nested in an earlier
        // top-level match is covered by that match's walk.
        let mut tops: Vec<NodeId> = Vec::new();
        for &id in selected {
            match tops.last() {
                Some(&top) if doc.is_strict_descendant(id, top) => {}
                _ => tops.push(id),
            }
        }

        tops.into_iter()
            .flat_map(|top| doc.descendants(top))
            .filter(|&id| {
                let node = doc.node(id);
                node.is_element() && self.opts.is_ignored(node.tag())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  hello   world  "), "hello world");
        assert_eq!(collapse_whitespace("no\textra\nspaces\r\n"), "no extra spaces");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_collapse_keeps_nbsp() {
        assert_eq!(collapse_whitespace("a\u{a0} b"), "a\u{a0} b");
    }

    #[test]
    fn test_adjacent_text_gets_word_boundary() {
        assert_eq!(normalize("<p>a<em>b</em>c</p>", Some("p")), "a b c");
    }

    #[test]
    fn test_without_tag_separation() {
        let normalizer = TextNormalizer::builder().separate_tags(false).build();
        assert_eq!(normalizer.normalize("<p>a<em>b</em>c</p>", Some("p")), "abc");
    }

    #[test]
    fn test_ignored_text_removed() {
        let html = "<div>keep<script>var x = 1;</script><style>p{}</style><noscript>no</noscript>this</div>";
        assert_eq!(normalize(html, Some("div")), "keep this");
    }

    #[test]
    fn test_selected_script_is_empty() {
        assert_eq!(normalize("<p>x</p><script>run()</script>", Some("script")), "");
    }

    #[test]
    fn test_custom_ignored_tag() {
        let normalizer = TextNormalizer::builder().ignore_tag("aside").build();
        let html = "<main>story<aside>advert</aside>end</main>";
        assert_eq!(normalizer.normalize(html, Some("main")), "story end");
    }

    #[test]
    fn test_miss_is_empty() {
        assert_eq!(normalize("<p>text</p>", Some("article")), "");
        assert_eq!(normalize("", Some("p")), "");
        assert_eq!(normalize("", None), "");
    }

    #[test]
    fn test_nested_matches_skipped() {
        let html = "<div>outer<div>inner<div>child</div></div>after</div><div>sibling</div>";
        assert_eq!(normalize(html, Some("div")), "outer inner child after sibling");
    }

    #[test]
    fn test_only_first_match_anchors_skip() {
        // The nested div inside the second subtree is not recognised as
        // already covered, so its text appears twice.
        let html = "<div>a<div>b</div></div><div>c<div>d</div></div>";
        assert_eq!(normalize(html, Some("div")), "a b c d d");
    }

    #[test]
    fn test_deeply_nested_selection() {
        let depth = 5_000;
        let html = format!(
            "{}x<script>hidden()</script>{}",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        assert_eq!(normalize(&html, Some("div")), "x");
    }
}

// ABOUTME: CSS selector matching over a parsed Document, returning nodes in document order.
// ABOUTME: Absent selectors select the whole document; misses and bad selectors are empty.

//! Selector-based node selection.
//!
//! Key behaviors:
//! - No selector (or a blank one) selects the document root only.
//! - Matches come back in document order, each node at most once.
//! - A selector that fails to parse selects nothing; it is not an error.

use scraper::Selector;

use crate::tree::{Document, NodeId};

/// Ordered set of nodes matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(err) => {
            tracing::debug!(selector = css, error = ?err, "ignoring invalid selector");
            None
        }
    }
}

/// Selects the nodes of `doc` matching `selector`.
pub fn select(doc: &Document, selector: Option<&str>) -> Selection {
    let css = match selector.map(str::trim) {
        Some(css) if !css.is_empty() => css,
        _ => {
            return Selection {
                nodes: vec![doc.root()],
            }
        }
    };

    let Some(compiled) = compile(css) else {
        return Selection::default();
    };

    let nodes: Vec<NodeId> = doc
        .html()
        .select(&compiled)
        .filter_map(|el| doc.lookup(el.id()))
        .collect();

    tracing::debug!(selector = css, matched = nodes.len(), "selected nodes");
    Selection { nodes }
}

/// Inner markup of the first node matching `selector`, or `None` when nothing matches.
pub fn first_match_html(doc: &Document, selector: &str) -> Option<String> {
    let compiled = compile(selector.trim())?;
    doc.html().select(&compiled).next().map(|el| el.inner_html())
}

/// Parses `markup` and returns the first match's inner markup, `""` when absent.
pub fn selected_extract(markup: &str, selector: &str) -> String {
    let doc = Document::parse(markup);
    first_match_html(&doc, selector).unwrap_or_default()
}

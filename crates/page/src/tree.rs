// ABOUTME: Arena-backed tree model built from a leniently parsed HTML document.
// ABOUTME: Nodes carry a tag, ordered children, a structural path, and their text runs.

//! Tree model for parsed markup.
//!
//! Parsing goes through `scraper` (html5ever), which never rejects input. The
//! resulting ego-tree is flattened into an arena of [`Node`]s in document
//! order, so node handles are plain indices and a node's position can be
//! compared through its [`NodePath`].

use std::collections::HashMap;

use scraper::Html;

/// Handle to a node inside a [`Document`].
///
/// Handles are assigned in document order (pre-order), so comparing two
/// handles from the same document compares their document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One step of a structural path: the child position and tag of a node.
///
/// `index` is declared before `tag` so the derived `Ord` compares sibling
/// positions first, which is what makes paths sort in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathStep {
    pub index: usize,
    pub tag: String,
}

/// Sequence of steps from the document root down to a node.
///
/// Paths only serve ancestor/descendant comparisons. They order the same way
/// nodes appear in the document. Nodes do not store them; [`Document::path`]
/// builds one on request from the parent links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True when `self` lies strictly below `ancestor`.
    pub fn is_strict_descendant_of(&self, ancestor: &NodePath) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The conceptual document root.
    Document,
    /// An element with its lowercase tag name.
    Element(String),
    /// A run of character data.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    position: usize,
    // One past the last arena index of this node's subtree.
    subtree_end: usize,
}

impl Node {
    /// Tag name: the element name, `#document` for the root, `#text` for text runs.
    pub fn tag(&self) -> &str {
        match &self.kind {
            NodeKind::Document => "#document",
            NodeKind::Element(name) => name,
            NodeKind::Text(_) => "#text",
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of steps from the root; the root itself is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Index among the parent's element and text children.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A parsed markup document.
///
/// Owns both the `scraper` tree (used for CSS matching and serialization) and
/// the flattened arena. Built once per call and dropped afterwards.
///
/// The arena is in pre-order, so every subtree occupies a contiguous index
/// range. Ancestor checks and subtree walks use that range instead of paths.
pub struct Document {
    html: Html,
    nodes: Vec<Node>,
    index: HashMap<ego_tree::NodeId, NodeId>,
}

impl Document {
    /// Parses markup leniently.
    ///
    /// Empty or whitespace-only input produces a document holding only the
    /// root, rather than the `html`/`head`/`body` skeleton html5ever would
    /// synthesize.
    pub fn parse(markup: &str) -> Self {
        let html = if markup.trim().is_empty() {
            Html::new_document()
        } else {
            Html::parse_document(markup)
        };
        Self::from_html(html)
    }

    fn from_html(html: Html) -> Self {
        let (nodes, index) = flatten(&html);
        tracing::trace!(nodes = nodes.len(), "built document arena");
        Self { html, nodes, index }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn html(&self) -> &Html {
        &self.html
    }

    pub(crate) fn lookup(&self, id: ego_tree::NodeId) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    /// Structural path of `id`, built by walking up the parent links.
    pub fn path(&self, id: NodeId) -> NodePath {
        let mut steps = Vec::with_capacity(self.nodes[id.0].depth);
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            let node = &self.nodes[current.0];
            steps.push(PathStep {
                index: node.position,
                tag: node.tag().to_string(),
            });
            current = parent;
        }
        steps.reverse();
        NodePath(steps)
    }

    /// True when `id` lies strictly below `ancestor`.
    ///
    /// Same answer as comparing [`Document::path`]s, in constant time.
    pub fn is_strict_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        id.0 > ancestor.0 && id.0 < self.nodes[ancestor.0].subtree_end
    }

    /// The node and everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        (id.0..self.nodes[id.0].subtree_end).map(NodeId)
    }

    /// Concatenation of every text run below `id`, markup excluded.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in &self.nodes[id.0..self.nodes[id.0].subtree_end] {
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Empties every text run below `id`. The elements themselves stay in place.
    pub fn clear_text(&mut self, id: NodeId) {
        let end = self.nodes[id.0].subtree_end;
        for node in &mut self.nodes[id.0..end] {
            if let NodeKind::Text(text) = &mut node.kind {
                text.clear();
            }
        }
    }
}

fn classify(node: &scraper::Node) -> Option<NodeKind> {
    match node {
        scraper::Node::Document | scraper::Node::Fragment => Some(NodeKind::Document),
        scraper::Node::Element(element) => {
            Some(NodeKind::Element(element.name().to_ascii_lowercase()))
        }
        scraper::Node::Text(text) => Some(NodeKind::Text((**text).to_owned())),
        // Comments, doctypes and processing instructions carry no text.
        _ => None,
    }
}

/// Pre-order walk of the scraper tree into a flat arena.
fn flatten(html: &Html) -> (Vec<Node>, HashMap<ego_tree::NodeId, NodeId>) {
    let mut nodes: Vec<Node> = Vec::new();
    let mut index = HashMap::new();

    let root = html.tree.root();
    let mut stack = vec![(root, NodeKind::Document, None::<NodeId>, 0usize)];

    while let Some((source, kind, parent, position)) = stack.pop() {
        let id = NodeId(nodes.len());
        let depth = match parent {
            Some(parent) => {
                nodes[parent.0].children.push(id);
                nodes[parent.0].depth + 1
            }
            None => 0,
        };
        index.insert(source.id(), id);

        let mut pending = Vec::new();
        for child in source.children() {
            let Some(child_kind) = classify(child.value()) else {
                continue;
            };
            pending.push((child, child_kind, Some(id), pending.len()));
        }

        nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            depth,
            position,
            subtree_end: id.0 + 1,
        });
        stack.extend(pending.into_iter().rev());
    }

    // Children sit after their parent, so a reverse sweep sees every child's
    // final extent before the parent needs it.
    for i in (0..nodes.len()).rev() {
        if let Some(&last) = nodes[i].children.last() {
            nodes[i].subtree_end = nodes[last.0].subtree_end;
        }
    }

    (nodes, index)
}

//! DocumentTree - a small arena-backed element/text tree
//!
//! Stands in for a rendered reading surface: the one-shot transformer
//! mutates it through `ContentTree`, and `to_html` renders it back out with
//! reveal units expanded into per-letter spans.

use rand::Rng;

use super::session::{RevealSession, UnitId};
use super::transform::{ContentTree, Fragment};

/// CSS class marking a reveal unit's outer element
pub const UNIT_CLASS: &str = "reveal-unit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String, classes: Vec<String> },
    Text(String),
    Unit(UnitId),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DocumentTree {
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            kind: NodeKind::Element {
                tag: root_tag.to_string(),
                classes: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        self.push(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                classes: classes.iter().map(|c| c.to_string()).collect(),
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Unit ids in document order
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids = Vec::new();
        self.walk(self.root, &mut |node: &Node| {
            if let NodeKind::Unit(id) = node.kind {
                ids.push(id);
            }
        });
        ids
    }

    /// Render as HTML, expanding unit nodes from `session`
    pub fn to_html<R: Rng>(&self, session: &RevealSession<R>) -> String {
        let mut out = String::new();
        self.render(self.root, session, &mut out);
        out
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    fn walk<F: FnMut(&Node)>(&self, id: NodeId, visit: &mut F) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        visit(node);
        for &child in &node.children {
            self.walk(child, visit);
        }
    }

    fn render<R: Rng>(&self, id: NodeId, session: &RevealSession<R>, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Element { tag, classes } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&escape_html(&classes.join(" ")));
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.render(child, session, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Text(text) => out.push_str(&escape_html(text)),
            NodeKind::Unit(unit_id) => render_unit(*unit_id, session, out),
        }
    }
}

fn render_unit<R: Rng>(id: UnitId, session: &RevealSession<R>, out: &mut String) {
    let Some(unit) = session.unit(id) else {
        out.push_str(&format!("<span class=\"{}\" data-reveal-id=\"{}\"></span>", UNIT_CLASS, id.0));
        return;
    };
    let view = unit.view();
    out.push_str(&format!(
        "<span class=\"{}\" data-reveal-id=\"{}\">",
        view.classes, id.0
    ));
    for cell in &view.cells {
        out.push_str(&format!(
            "<span class=\"{}\">{}</span>",
            cell.classes,
            escape_html(&cell.ch)
        ));
    }
    out.push_str("</span>");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// =============================================================================
// ContentTree
// =============================================================================

impl ContentTree for DocumentTree {
    type Leaf = NodeId;

    fn text_leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            if matches!(node.kind, NodeKind::Text(_)) {
                leaves.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        leaves
    }

    fn leaf_text(&self, leaf: NodeId) -> Option<&str> {
        match self.kind(leaf)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    fn is_within_unit(&self, leaf: NodeId) -> bool {
        let mut current = self.nodes.get(leaf.0).and_then(|n| n.parent);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id.0) else {
                return false;
            };
            match &node.kind {
                NodeKind::Unit(_) => return true,
                NodeKind::Element { classes, .. } if classes.iter().any(|c| c == UNIT_CLASS) => {
                    return true
                }
                _ => {}
            }
            current = node.parent;
        }
        false
    }

    fn replace_leaf(&mut self, leaf: NodeId, fragments: Vec<Fragment>) {
        let Some(parent) = self.nodes.get(leaf.0).and_then(|n| n.parent) else {
            return;
        };
        let Some(position) = self.nodes[parent.0].children.iter().position(|&c| c == leaf) else {
            return;
        };

        let mut replacement = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let kind = match fragment {
                Fragment::Text { text } => NodeKind::Text(text),
                Fragment::Unit { id } => NodeKind::Unit(id),
            };
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                kind,
                parent: Some(parent),
                children: Vec::new(),
            });
            replacement.push(id);
        }

        self.nodes[parent.0]
            .children
            .splice(position..=position, replacement);
        self.nodes[leaf.0].parent = None;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;
    use crate::reveal::session::RegionId;
    use crate::reveal::transform::materialize;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> RevealSession<StdRng> {
        RevealSession::with_rng(RevealConfig::default(), StdRng::seed_from_u64(2)).unwrap()
    }

    #[test]
    fn test_text_leaves_in_document_order() {
        let mut tree = DocumentTree::default();
        let p = tree.append_element(tree.root(), "p", &[]);
        let a = tree.append_text(p, "a");
        let em = tree.append_element(p, "em", &[]);
        let b = tree.append_text(em, "b");
        let c = tree.append_text(tree.root(), "c");
        assert_eq!(tree.text_leaves(), vec![a, b, c]);
    }

    #[test]
    fn test_materialize_renders_letters() {
        let mut tree = DocumentTree::default();
        let p = tree.append_element(tree.root(), "p", &[]);
        tree.append_text(p, "Say re:hi & go");

        let mut session = session();
        let report = materialize(&mut tree, &mut session, RegionId::SHARED);
        assert_eq!(report.units_created, 1);
        assert_eq!(report.leaves_replaced, 1);

        assert_eq!(
            tree.to_html(&session),
            "<div><p>Say <span class=\"reveal-unit reveal-blur\" data-reveal-id=\"0\">\
             <span class=\"reveal-letter\">h</span><span class=\"reveal-letter\">i</span>\
             </span> &amp; go</p></div>"
        );
    }

    #[test]
    fn test_non_matching_structure_untouched() {
        let mut tree = DocumentTree::default();
        let p = tree.append_element(tree.root(), "p", &["note"]);
        tree.append_text(p, "nothing <here>");

        let mut session = session();
        let before = tree.to_html(&session);
        let report = materialize(&mut tree, &mut session, RegionId::SHARED);

        assert_eq!(report.units_created, 0);
        assert_eq!(report.leaves_scanned, 1);
        assert_eq!(tree.to_html(&session), before);
    }

    #[test]
    fn test_prerendered_unit_element_is_skipped() {
        let mut tree = DocumentTree::default();
        let span = tree.append_element(tree.root(), "span", &[UNIT_CLASS, "reveal-blur"]);
        tree.append_text(span, "re:already");

        let mut session = session();
        let report = materialize(&mut tree, &mut session, RegionId::SHARED);
        assert_eq!(report.leaves_skipped, 1);
        assert_eq!(report.units_created, 0);
    }

    #[test]
    fn test_unit_ids_follow_document_order() {
        let mut tree = DocumentTree::default();
        tree.append_text(tree.root(), "re:one and re:two");
        let p = tree.append_element(tree.root(), "p", &[]);
        tree.append_text(p, "then re:three");

        let mut session = session();
        materialize(&mut tree, &mut session, RegionId::SHARED);
        assert_eq!(tree.unit_ids(), vec![UnitId(0), UnitId(1), UnitId(2)]);
        assert_eq!(session.unit(UnitId(2)).unwrap().token(), "three");
    }
}

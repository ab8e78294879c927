//! Owned element tree for the font configuration document

use std::fs;
use std::path::Path;

use log::{debug, warn};
use roxmltree::ParsingOptions;

/// Index of an element inside a [`FontsDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position of this element in its parent's `children`.
    slot: usize,
}

/// Immutable arena of the elements of a parsed configuration document.
///
/// Only element nodes are kept. Each element carries the concatenation of
/// its direct text children, which is all the font configuration needs.
/// A document that could not be read or parsed has no root element.
#[derive(Debug, Clone, Default)]
pub struct FontsDocument {
    nodes: Vec<Element>,
}

impl FontsDocument {
    /// A document without a root element.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse XML text. Malformed input yields an empty document.
    pub fn parse(xml: &str) -> Self {
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;

        match roxmltree::Document::parse_with_options(xml, options) {
            Ok(doc) => Self::from_roxmltree(&doc),
            Err(err) => {
                warn!("font configuration is not well-formed XML: {err}");
                Self::empty()
            }
        }
    }

    /// Read and parse the document at `path`. Unreadable files yield an empty document.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("cannot read font configuration {}: {err}", path.display());
                return Self::empty();
            }
        };

        match String::from_utf8(bytes) {
            Ok(text) => {
                let doc = Self::parse(&text);
                debug!(
                    "loaded {} with {} elements",
                    path.display(),
                    doc.nodes.len()
                );
                doc
            }
            Err(err) => {
                warn!(
                    "font configuration {} is not valid UTF-8: {err}",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    fn from_roxmltree(doc: &roxmltree::Document<'_>) -> Self {
        let mut out = Self::default();
        out.push_element(doc.root_element(), None, 0);
        out
    }

    fn push_element(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>, slot: usize) {
        let id = NodeId(self.nodes.len());
        let text: String = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect();

        self.nodes.push(Element {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            text,
            parent,
            children: Vec::new(),
            slot,
        });

        for (slot, child) in node.children().filter(|n| n.is_element()).enumerate() {
            let child_id = NodeId(self.nodes.len());
            self.nodes[id.0].children.push(child_id);
            self.push_element(child, Some(id), slot);
        }
    }

    fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    /// The root element ("family set"), if the document has one.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.element(node).name
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated direct text content of `node`, untrimmed.
    pub fn text(&self, node: NodeId) -> &str {
        &self.element(node).text
    }

    /// First child element of `node` named `tag`.
    pub fn first_child(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.element(node)
            .children
            .iter()
            .copied()
            .find(|&child| self.name(child) == tag)
    }

    /// Next element named `tag` among the following siblings of `node`.
    pub fn next_sibling(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let element = self.element(node);
        let parent = element.parent?;
        self.element(parent).children[element.slot + 1..]
            .iter()
            .copied()
            .find(|&sibling| self.name(sibling) == tag)
    }

    /// Iterate the child elements of `node` named `tag`, in document order.
    pub fn children_named<'a>(
        &'a self,
        node: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        let mut next = self.first_child(node, tag);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_sibling(current, tag);
            Some(current)
        })
    }
}

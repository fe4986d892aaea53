//! Markup nodes and raw serialization.
//!
//! Report content can be handed over as an already-built DOM node instead of
//! a string. Parsing and serialization are delegated to `html5ever` with the
//! `markup5ever_rcdom` tree; this module only wraps the handles and picks the
//! serializer options.
//!
//! Serialization is raw: the node is written exactly as it sits in the tree,
//! with no indentation or whitespace normalization, so the client receives
//! the same structure the server built.

use std::fmt;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, local_name, namespace_url, ns};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::ReportError;

/// A reference to a node inside a parsed markup document.
///
/// Cloning is cheap (reference-counted handle). The node stays serializable
/// only while its [`MarkupDocument`] is alive and the node is still attached
/// to the document tree.
#[derive(Clone)]
pub struct MarkupNode {
    handle: Handle,
}

impl MarkupNode {
    /// The underlying DOM handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Local tag name when this node is an element.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.handle.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Whether walking the parent chain reaches a document root.
    pub fn is_attached(&self) -> bool {
        let mut current = self.handle.clone();
        loop {
            if matches!(current.data, NodeData::Document) {
                return true;
            }
            match parent_of(&current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

impl From<Handle> for MarkupNode {
    fn from(handle: Handle) -> Self {
        Self { handle }
    }
}

impl fmt::Debug for MarkupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.handle.data {
            NodeData::Document => "document",
            NodeData::Doctype { .. } => "doctype",
            NodeData::Text { .. } => "text",
            NodeData::Comment { .. } => "comment",
            NodeData::Element { .. } => "element",
            NodeData::ProcessingInstruction { .. } => "processing-instruction",
        };
        f.debug_struct("MarkupNode")
            .field("kind", &kind)
            .field("tag", &self.tag_name())
            .finish()
    }
}

/// An owned markup tree produced by the HTML parser.
pub struct MarkupDocument {
    dom: RcDom,
}

impl MarkupDocument {
    /// The document node itself. Serializing it writes all of its children.
    pub fn root(&self) -> MarkupNode {
        MarkupNode::from(self.dom.document.clone())
    }

    /// First element (depth-first, document order) whose local name is `tag`.
    pub fn select_first(&self, tag: &str) -> Option<MarkupNode> {
        find_element(&self.dom.document, tag).map(MarkupNode::from)
    }
}

/// Parse a complete HTML document.
///
/// The parser is error-tolerant: missing `<html>`, `<head>` and `<body>`
/// elements are synthesized as a browser would.
pub fn parse_document(html: &str) -> MarkupDocument {
    let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default()).one(html);
    MarkupDocument { dom }
}

/// Parse an HTML fragment in a `<body>` context.
///
/// The fragment's nodes end up under a synthetic `<html>` element below the
/// document root, so they count as attached.
pub fn parse_fragment(html: &str) -> MarkupDocument {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom =
        html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
            .one(html);
    MarkupDocument { dom }
}

/// Serialize a node to its exact markup form.
///
/// Elements, text and comments are written including the node itself; a
/// document node writes its children. No pretty-printing is applied.
pub fn serialize_to_string(node: &MarkupNode) -> Result<String, ReportError> {
    if !node.is_attached() {
        return Err(ReportError::DetachedNode);
    }

    let traversal_scope = if matches!(node.handle.data, NodeData::Document) {
        TraversalScope::ChildrenOnly(None)
    } else {
        TraversalScope::IncludeNode
    };
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };

    let serializable: SerializableHandle = node.handle.clone().into();
    let mut out = Vec::new();
    serialize(&mut out, &serializable, opts).map_err(ReportError::Serialize)?;
    String::from_utf8(out).map_err(ReportError::InvalidUtf8)
}

fn parent_of(node: &Handle) -> Option<Handle> {
    // The parent link lives in a `Cell`, so take it out and put it back.
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data
        && &*name.local == tag
    {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

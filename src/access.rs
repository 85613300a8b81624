//! Node accessor: one node of a [`Document`] as a typed value.

use crate::arena::{Document, NodeData, NodeId, NodeKind};
use crate::options::{NullRepr, ParseOptions};

/// A single node, with text borrowed from its document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeView<'a> {
    Null,
    Missing,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(&'a str),
    RawNumber(&'a str),
    Object(NodeId),
    Array(NodeId),
}

/// Classify node `id`. Never fails: every node the engine produces has a kind.
pub fn node_view<'a>(doc: &'a Document, id: NodeId, options: &ParseOptions) -> NodeView<'a> {
    let node = doc.node(id);
    match (node.kind, node.data) {
        (NodeKind::Object, _) => NodeView::Object(id),
        (NodeKind::Array, _) => NodeView::Array(id),
        (_, NodeData::Bool(value)) => NodeView::Bool(value),
        (_, NodeData::Int(value)) => NodeView::Int(value),
        (_, NodeData::UInt(value)) => NodeView::UInt(value),
        (_, NodeData::Float(value)) => NodeView::Float(value),
        (_, NodeData::String(index)) => NodeView::String(doc.str_at(index)),
        (_, NodeData::Raw(index)) => NodeView::RawNumber(doc.get_num_str(index).unwrap_or_default()),
        (_, NodeData::None) => match options.null {
            NullRepr::Null => NodeView::Null,
            NullRepr::Missing => NodeView::Missing,
        },
    }
}

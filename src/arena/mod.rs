//! Immutable node arena produced by the document engine.
//!
//! A [`Document`] owns the input buffer it was parsed from together with every
//! node, string, key and child table. Nodes are addressed by [`NodeId`]
//! indices, so handles into a document are plain integers and the document is
//! the only owner of parsed memory.

mod alloc;

pub use alloc::Allocator;

use smol_str::SmolStr;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Raw,
    String,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeData {
    None,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Index into the raw-number span table.
    Raw(usize),
    /// Index into the string table.
    String(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringRef {
    Span(Span),
    Owned(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub key: usize,
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub kind: NodeKind,
    pub first_child: usize,
    pub child_len: usize,
    pub data: NodeData,
}

impl Node {
    pub fn scalar(kind: NodeKind, data: NodeData) -> Self {
        Self {
            kind,
            first_child: 0,
            child_len: 0,
            data,
        }
    }
}

/// Growable tables backing a document; recycled through an [`Allocator`] or
/// the thread-local decode pool.
#[derive(Debug, Default)]
pub struct ArenaParts {
    pub nodes: Vec<Node>,
    pub strings: Vec<StringRef>,
    pub numbers: Vec<Span>,
    pub children: Vec<NodeId>,
    pub pairs: Vec<Pair>,
    pub keys: Vec<SmolStr>,
}

impl ArenaParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.strings.clear();
        self.numbers.clear();
        self.children.clear();
        self.pairs.clear();
        self.keys.clear();
    }
}

/// A parsed JSON document: the input buffer plus its node arena.
///
/// Dropping a document releases its tables; when it was parsed with an
/// [`Allocator`] the cleared tables go back to that allocator's pool.
#[derive(Debug)]
pub struct Document {
    buffer: Vec<u8>,
    parts: ArenaParts,
    root: NodeId,
    allocator: Option<Allocator>,
}

impl Document {
    pub(crate) fn new(
        buffer: Vec<u8>,
        parts: ArenaParts,
        root: NodeId,
        allocator: Option<Allocator>,
    ) -> Self {
        Self {
            buffer,
            parts,
            root,
            allocator,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.parts.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.parts.nodes.len()
    }

    /// The input buffer, including any strings unescaped in place.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn get_str(&self, index: usize) -> Option<&str> {
        match self.parts.strings.get(index)? {
            StringRef::Span(span) => self
                .buffer
                .get(span.start..span.end)
                .and_then(|bytes| std::str::from_utf8(bytes).ok()),
            StringRef::Owned(value) => Some(value.as_str()),
        }
    }

    /// String table entry; spans are UTF-8 checked when the document is built.
    pub fn str_at(&self, index: usize) -> &str {
        self.get_str(index).unwrap_or_default()
    }

    pub fn get_num_str(&self, index: usize) -> Option<&str> {
        let span = self.parts.numbers.get(index)?;
        self.buffer
            .get(span.start..span.end)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn get_key(&self, index: usize) -> Option<&str> {
        self.parts.keys.get(index).map(|key| key.as_str())
    }

    pub fn key_at(&self, index: usize) -> &str {
        self.get_key(index).unwrap_or_default()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        if node.kind != NodeKind::Array {
            return &[];
        }
        let start = node.first_child;
        let end = start.saturating_add(node.child_len);
        self.parts.children.get(start..end).unwrap_or(&[])
    }

    pub fn pairs(&self, id: NodeId) -> &[Pair] {
        let node = self.node(id);
        if node.kind != NodeKind::Object {
            return &[];
        }
        let start = node.first_child;
        let end = start.saturating_add(node.child_len);
        self.parts.pairs.get(start..end).unwrap_or(&[])
    }

    pub fn has_allocator(&self) -> bool {
        self.allocator.is_some()
    }

    /// Take the arena tables out, leaving an empty document behind.
    pub(crate) fn into_parts(mut self) -> ArenaParts {
        self.allocator = None;
        std::mem::take(&mut self.parts)
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        if let Some(allocator) = self.allocator.take() {
            allocator.put(std::mem::take(&mut self.parts));
        }
    }
}

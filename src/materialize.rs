//! Materializer: one-shot conversion of a document into owned [`Value`]s.

use std::time::Instant;

use crate::access::{node_view, NodeView};
use crate::arena::{Document, NodeId};
use crate::decode::{self, Mode};
use crate::options::{MapKind, ParseOptions};
use crate::value::{Map, Value};
use crate::{Error, Result};

/// Convert the whole document.
pub fn materialize(doc: &Document, options: &ParseOptions) -> Result<Value> {
    materialize_node(doc, doc.root(), options)
}

/// Convert the subtree rooted at `id`.
///
/// Container nesting is counted from 1 at `id`; going past
/// `options.max_depth` fails with [`ErrorKind::DepthExceeded`](crate::ErrorKind).
pub fn materialize_node(doc: &Document, id: NodeId, options: &ParseOptions) -> Result<Value> {
    let started = Instant::now();
    let value = Materializer { doc, options }.build(id, 0)?;
    tracing::debug!(
        nodes = doc.node_count(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "materialized document"
    );
    Ok(value)
}

/// Parse, convert and release in one step.
pub(crate) fn parse_eager(input: Vec<u8>, options: &ParseOptions) -> Result<Value> {
    options.validate()?;
    let document = decode::build(input, options, Mode::Eager)?;
    let result = materialize(&document, options);
    decode::release(document);
    result
}

struct Materializer<'a> {
    doc: &'a Document,
    options: &'a ParseOptions,
}

impl Materializer<'_> {
    fn build(&self, id: NodeId, depth: usize) -> Result<Value> {
        let value = match node_view(self.doc, id, self.options) {
            NodeView::Null => Value::Null,
            NodeView::Missing => Value::Missing,
            NodeView::Bool(value) => Value::Bool(value),
            NodeView::Int(value) => Value::Int(value),
            NodeView::UInt(value) => Value::UInt(value),
            NodeView::Float(value) => Value::Float(value),
            NodeView::String(text) => Value::String(text.to_string()),
            NodeView::RawNumber(text) => Value::RawNumber(text.to_string()),
            NodeView::Array(id) => {
                let depth = self.enter(depth)?;
                let children = self.doc.children(id);
                let mut items = Vec::with_capacity(children.len());
                for &child in children {
                    items.push(self.build(child, depth)?);
                }
                Value::Array(items)
            }
            NodeView::Object(id) => {
                let depth = self.enter(depth)?;
                let pairs = self.doc.pairs(id);
                let mut map = Map::with_capacity(pairs.len());
                for pair in pairs {
                    let value = self.build(pair.value, depth)?;
                    map.insert(self.doc.key_at(pair.key).to_string(), value);
                }
                if self.options.map_kind == MapKind::Sorted {
                    map.sort_keys();
                }
                Value::Object(map)
            }
        };
        Ok(value)
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(Error::depth_exceeded(self.options.max_depth));
        }
        Ok(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse_document;
    use crate::ErrorKind;

    fn eager(input: &str, options: &ParseOptions) -> Result<Value> {
        parse_eager(input.as_bytes().to_vec(), options)
    }

    #[rstest::rstest]
    fn duplicate_keys_last_wins_first_position() {
        let value = eager(r#"{"a":1,"b":2,"a":3}"#, &ParseOptions::new()).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::UInt(3)));
    }

    #[rstest::rstest]
    fn sorted_maps_sort_every_level() {
        let options = ParseOptions::new().with_map_kind(MapKind::Sorted);
        let value = eager(r#"{"b":{"z":1,"y":2},"a":0}"#, &options).unwrap();
        assert_eq!(value.to_string(), r#"{"a":0,"b":{"y":2,"z":1}}"#);
    }

    #[rstest::rstest]
    #[case(3, true)]
    #[case(2, false)]
    fn depth_limit_counts_containers(#[case] max_depth: usize, #[case] ok: bool) {
        let options = ParseOptions::new().with_max_depth(max_depth);
        let result = eager("[[[1]]]", &options);
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err.kind, ErrorKind::DepthExceeded);
        }
    }

    #[rstest::rstest]
    fn subtree_materializes_alone() {
        let options = ParseOptions::new();
        let doc = parse_document(br#"{"outer":{"inner":[true]}}"#.to_vec(), &options).unwrap();
        let outer = doc.pairs(doc.root())[0].value;
        let value = materialize_node(&doc, outer, &options).unwrap();
        assert_eq!(value.to_string(), r#"{"inner":[true]}"#);
    }

    #[rstest::rstest]
    fn scalars_ignore_depth() {
        let options = ParseOptions::new().with_max_depth(1);
        assert_eq!(eager("\"x\"", &options).unwrap(), Value::from("x"));
    }
}

//! Lazy views: mapping and sequence access over a live document.
//!
//! A lazy parse keeps the [`Document`] alive behind an `Arc` shared by every
//! view derived from it. Scalars are converted to owned values on each
//! access; containers come back as new views over the same document. Closing
//! any view releases the document for all of them, and later reads fail with
//! [`ErrorKind::ViewClosed`](crate::ErrorKind::ViewClosed).

mod array;
mod object;

pub use array::{ArrayIter, ArrayView};
pub use object::{ObjectIter, ObjectView};

use std::sync::Arc;

use crate::access::{node_view, NodeView};
use crate::arena::{Document, NodeId};
use crate::lifecycle::Lifecycle;
use crate::options::ParseOptions;
use crate::value::{parse_index, pointer_tokens, Value};
use crate::Result;

/// Result of a lazy lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LazyValue {
    Null,
    Missing,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    RawNumber(String),
    Object(ObjectView),
    Array(ArrayView),
}

impl LazyValue {
    pub(crate) fn from_node(
        shared: &Arc<Lifecycle>,
        doc: &Document,
        options: &ParseOptions,
        id: NodeId,
    ) -> Self {
        match node_view(doc, id, options) {
            NodeView::Null => LazyValue::Null,
            NodeView::Missing => LazyValue::Missing,
            NodeView::Bool(value) => LazyValue::Bool(value),
            NodeView::Int(value) => LazyValue::Int(value),
            NodeView::UInt(value) => LazyValue::UInt(value),
            NodeView::Float(value) => LazyValue::Float(value),
            NodeView::String(text) => LazyValue::String(text.to_string()),
            NodeView::RawNumber(text) => LazyValue::RawNumber(text.to_string()),
            NodeView::Object(id) => LazyValue::Object(ObjectView::new(Arc::clone(shared), id)),
            NodeView::Array(id) => LazyValue::Array(ArrayView::new(Arc::clone(shared), id)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LazyValue::Null | LazyValue::Missing)
    }

    pub fn as_object(&self) -> Option<&ObjectView> {
        match self {
            LazyValue::Object(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayView> {
        match self {
            LazyValue::Array(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LazyValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_raw_number(&self) -> Option<&str> {
        match self {
            LazyValue::RawNumber(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LazyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LazyValue::Int(value) => Some(*value),
            LazyValue::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            LazyValue::UInt(value) => Some(*value),
            LazyValue::Int(value) => u64::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LazyValue::Int(value) => Some(*value as f64),
            LazyValue::UInt(value) => Some(*value as f64),
            LazyValue::Float(value) => Some(*value),
            LazyValue::RawNumber(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// Walk an RFC 6901 pointer one view at a time. `Ok(None)` when the path
    /// does not exist.
    ///
    /// ```
    /// let root = jsonview::parse_lazy_str(r#"{"users":[{"name":"Ada"}]}"#).unwrap();
    /// let name = root.pointer("/users/0/name").unwrap().unwrap();
    /// assert_eq!(name.as_str(), Some("Ada"));
    /// assert!(root.pointer("/users/3").unwrap().is_none());
    /// ```
    pub fn pointer(&self, pointer: &str) -> Result<Option<LazyValue>> {
        let Some(tokens) = pointer_tokens(pointer) else {
            return Ok(None);
        };
        let mut target = self.clone();
        for token in tokens {
            let next = match &target {
                LazyValue::Object(view) => view.find(&token)?,
                LazyValue::Array(view) => match parse_index(&token) {
                    Some(index) => view.nth(index)?,
                    None => None,
                },
                _ => None,
            };
            match next {
                Some(value) => target = value,
                None => return Ok(None),
            }
        }
        Ok(Some(target))
    }

    /// Materialize the value; containers convert their whole subtree.
    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            LazyValue::Null => Value::Null,
            LazyValue::Missing => Value::Missing,
            LazyValue::Bool(value) => Value::Bool(*value),
            LazyValue::Int(value) => Value::Int(*value),
            LazyValue::UInt(value) => Value::UInt(*value),
            LazyValue::Float(value) => Value::Float(*value),
            LazyValue::String(text) => Value::String(text.clone()),
            LazyValue::RawNumber(text) => Value::RawNumber(text.clone()),
            LazyValue::Object(view) => view.to_value()?,
            LazyValue::Array(view) => view.to_value()?,
        })
    }

    /// Release the document behind a container; scalars own nothing.
    pub fn close(&self) {
        match self {
            LazyValue::Object(view) => view.close(),
            LazyValue::Array(view) => view.close(),
            _ => {}
        }
    }

    /// Scalars are never closed.
    pub fn is_closed(&self) -> bool {
        match self {
            LazyValue::Object(view) => view.is_closed(),
            LazyValue::Array(view) => view.is_closed(),
            _ => false,
        }
    }
}

/// Wrap a freshly parsed document. A scalar root is returned as an owned
/// value and the document released right away.
pub(crate) fn open_document(document: Document, options: ParseOptions) -> Result<LazyValue> {
    let shared = Lifecycle::new(document, options);
    let root = shared.read(|doc, options| Ok(LazyValue::from_node(&shared, doc, options, doc.root())))?;
    if !matches!(root, LazyValue::Object(_) | LazyValue::Array(_)) {
        tracing::debug!("scalar root, releasing document");
        shared.close();
    }
    Ok(root)
}

/// Closes the wrapped view when dropped, including during unwinding.
struct CloseGuard(LazyValue);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

pub(crate) fn scoped<T, E, F>(root: LazyValue, body: F) -> std::result::Result<T, E>
where
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let guard = CloseGuard(root);
    body(&guard.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse_document;
    use crate::ErrorKind;

    fn lazy(input: &str) -> LazyValue {
        let options = ParseOptions::new();
        let document = parse_document(input.as_bytes().to_vec(), &options).unwrap();
        open_document(document, options).unwrap()
    }

    #[rstest::rstest]
    fn scalar_root_is_plain_value() {
        assert_eq!(lazy("42"), LazyValue::UInt(42));
        assert_eq!(lazy("\"hi\""), LazyValue::String("hi".into()));
        assert!(!lazy("null").is_closed());
    }

    #[rstest::rstest]
    fn scalar_root_releases_its_document() {
        let allocator = crate::Allocator::new();
        let options = ParseOptions::new().with_allocator(allocator.clone());
        let document = parse_document(b"\"x\"".to_vec(), &options).unwrap();
        assert_eq!(allocator.retained(), 0);
        let root = open_document(document, options).unwrap();
        assert_eq!(root, LazyValue::String("x".into()));
        assert_eq!(allocator.retained(), 1);
    }

    #[rstest::rstest]
    #[case(ParseOptions::new(), "[null, true, -1, 2, 0.5, \"s\"]", vec![
        LazyValue::Null,
        LazyValue::Bool(true),
        LazyValue::Int(-1),
        LazyValue::UInt(2),
        LazyValue::Float(0.5),
        LazyValue::String("s".into()),
    ])]
    #[case(
        ParseOptions::new().with_null(crate::NullRepr::Missing).with_number_as_raw(true),
        "[null, 1.50]",
        vec![LazyValue::Missing, LazyValue::RawNumber("1.50".into())]
    )]
    fn every_scalar_kind_maps(
        #[case] options: ParseOptions,
        #[case] input: &str,
        #[case] expected: Vec<LazyValue>,
    ) {
        let document = parse_document(input.as_bytes().to_vec(), &options).unwrap();
        let root = open_document(document, options).unwrap();
        let items: Vec<LazyValue> = root
            .as_array()
            .unwrap()
            .iter()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(items, expected);
    }

    #[rstest::rstest]
    fn views_share_one_lifecycle() {
        let root = lazy(r#"{"list":[1,2],"nested":{"k":true}}"#);
        let list = root.as_object().unwrap().get("list").unwrap();
        assert_eq!(list.as_array().unwrap().len().unwrap(), 2);

        root.close();
        assert!(list.is_closed());
        let err = list.as_array().unwrap().get(0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ViewClosed);
    }

    #[rstest::rstest]
    fn debug_does_not_materialize() {
        let root = lazy(r#"{"a":1,"b":[1,2,3]}"#);
        let object = root.as_object().unwrap();
        assert_eq!(format!("{object:?}"), "ObjectView(2 entries)");
        let array = object.get("b").unwrap();
        assert_eq!(format!("{:?}", array.as_array().unwrap()), "ArrayView(3 items)");
        root.close();
        assert_eq!(format!("{object:?}"), "ObjectView(closed)");
    }

    #[rstest::rstest]
    fn scoped_closes_on_error() {
        let root = lazy("[1]");
        let escaped = root.clone();
        let result: std::result::Result<(), &str> = scoped(root, |_| Err("stop"));
        assert_eq!(result, Err("stop"));
        assert!(escaped.is_closed());
    }

    #[rstest::rstest]
    fn views_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LazyValue>();
        assert_send_sync::<ObjectView>();
        assert_send_sync::<ArrayView>();
    }
}

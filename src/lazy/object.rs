use std::fmt;
use std::sync::Arc;

use super::LazyValue;
use crate::arena::NodeId;
use crate::lifecycle::Lifecycle;
use crate::materialize::materialize_node;
use crate::value::Value;
use crate::{Error, Result};

/// Read-only mapping over a JSON object that is still inside its document.
///
/// Clones share the document; closing any of them closes all.
#[derive(Clone)]
pub struct ObjectView {
    shared: Arc<Lifecycle>,
    node: NodeId,
}

impl ObjectView {
    pub(crate) fn new(shared: Arc<Lifecycle>, node: NodeId) -> Self {
        Self { shared, node }
    }

    /// Value stored under `key`. With duplicate keys the last one wins.
    pub fn get(&self, key: &str) -> Result<LazyValue> {
        self.find(key)?.ok_or_else(|| Error::key_not_found(key))
    }

    /// Like [`get`](Self::get), but a missing key is `Ok(None)`.
    pub fn find(&self, key: &str) -> Result<Option<LazyValue>> {
        self.shared.read(|doc, options| {
            let found = doc
                .pairs(self.node)
                .iter()
                .rev()
                .find(|pair| doc.key_at(pair.key) == key);
            Ok(found.map(|pair| LazyValue::from_node(&self.shared, doc, options, pair.value)))
        })
    }

    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.shared.read(|doc, _| {
            Ok(doc
                .pairs(self.node)
                .iter()
                .any(|pair| doc.key_at(pair.key) == key))
        })
    }

    /// Entry count as written in the source, duplicates included.
    pub fn len(&self) -> Result<usize> {
        self.shared.read(|doc, _| Ok(doc.node(self.node).child_len))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Keys in source order.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.shared.read(|doc, _| {
            Ok(doc
                .pairs(self.node)
                .iter()
                .map(|pair| doc.key_at(pair.key).to_string())
                .collect())
        })
    }

    /// Entries in source order. Each step re-checks that the document is
    /// open; after a `ViewClosed` item the iterator ends.
    pub fn iter(&self) -> ObjectIter {
        ObjectIter {
            view: self.clone(),
            index: 0,
            done: false,
        }
    }

    /// Materialize this object and everything below it.
    pub fn to_value(&self) -> Result<Value> {
        self.shared
            .read(|doc, options| materialize_node(doc, self.node, options))
    }

    /// Release the underlying document for every view that shares it.
    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}

/// Views are equal when they point at the same node of the same document.
impl PartialEq for ObjectView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared) && self.node == other.node
    }
}

impl fmt::Debug for ObjectView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            Ok(len) => write!(f, "ObjectView({len} entries)"),
            Err(_) => f.write_str("ObjectView(closed)"),
        }
    }
}

impl IntoIterator for &ObjectView {
    type Item = Result<(String, LazyValue)>;
    type IntoIter = ObjectIter;

    fn into_iter(self) -> ObjectIter {
        self.iter()
    }
}

pub struct ObjectIter {
    view: ObjectView,
    index: usize,
    done: bool,
}

impl Iterator for ObjectIter {
    type Item = Result<(String, LazyValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.index;
        let view = &self.view;
        let entry = view.shared.read(|doc, options| {
            Ok(doc.pairs(view.node).get(index).map(|pair| {
                (
                    doc.key_at(pair.key).to_string(),
                    LazyValue::from_node(&view.shared, doc, options, pair.value),
                )
            }))
        });
        match entry {
            Ok(Some(entry)) => {
                self.index += 1;
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

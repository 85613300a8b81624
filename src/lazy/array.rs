use std::fmt;
use std::sync::Arc;

use super::LazyValue;
use crate::arena::NodeId;
use crate::lifecycle::Lifecycle;
use crate::materialize::materialize_node;
use crate::value::Value;
use crate::{Error, Result};

/// Read-only sequence over a JSON array that is still inside its document.
#[derive(Clone)]
pub struct ArrayView {
    shared: Arc<Lifecycle>,
    node: NodeId,
}

impl ArrayView {
    pub(crate) fn new(shared: Arc<Lifecycle>, node: NodeId) -> Self {
        Self { shared, node }
    }

    /// Element at `index`, or `IndexOutOfRange`.
    pub fn get(&self, index: usize) -> Result<LazyValue> {
        self.shared.read(|doc, options| {
            let children = doc.children(self.node);
            match children.get(index) {
                Some(&child) => Ok(LazyValue::from_node(&self.shared, doc, options, child)),
                None => Err(Error::index_out_of_range(index, children.len())),
            }
        })
    }

    /// Like [`get`](Self::get), but out of range is `Ok(None)`.
    pub fn nth(&self, index: usize) -> Result<Option<LazyValue>> {
        self.shared.read(|doc, options| {
            Ok(doc
                .children(self.node)
                .get(index)
                .map(|&child| LazyValue::from_node(&self.shared, doc, options, child)))
        })
    }

    pub fn first(&self) -> Result<Option<LazyValue>> {
        self.nth(0)
    }

    pub fn last(&self) -> Result<Option<LazyValue>> {
        self.shared.read(|doc, options| {
            Ok(doc
                .children(self.node)
                .last()
                .map(|&child| LazyValue::from_node(&self.shared, doc, options, child)))
        })
    }

    pub fn len(&self) -> Result<usize> {
        self.shared.read(|doc, _| Ok(doc.node(self.node).child_len))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Elements in order; stops after yielding a `ViewClosed` error.
    pub fn iter(&self) -> ArrayIter {
        ArrayIter {
            view: self.clone(),
            index: 0,
            done: false,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        self.shared
            .read(|doc, options| materialize_node(doc, self.node, options))
    }

    pub fn close(&self) {
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}

/// Views are equal when they point at the same node of the same document.
impl PartialEq for ArrayView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared) && self.node == other.node
    }
}

impl fmt::Debug for ArrayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            Ok(len) => write!(f, "ArrayView({len} items)"),
            Err(_) => f.write_str("ArrayView(closed)"),
        }
    }
}

impl IntoIterator for &ArrayView {
    type Item = Result<LazyValue>;
    type IntoIter = ArrayIter;

    fn into_iter(self) -> ArrayIter {
        self.iter()
    }
}

pub struct ArrayIter {
    view: ArrayView,
    index: usize,
    done: bool,
}

impl Iterator for ArrayIter {
    type Item = Result<LazyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.view.nth(self.index) {
            Ok(Some(item)) => {
                self.index += 1;
                Some(Ok(item))
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

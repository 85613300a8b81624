use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::arena::Document;
use crate::options::ParseOptions;
use crate::{Error, Result};

/// Open/closed state shared by every view derived from one document.
///
/// `Some` is open. Reads hold the read lock for their whole duration, so
/// [`close`](Lifecycle::close) waits for them and the document is released
/// exactly once.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    document: RwLock<Option<Document>>,
    options: ParseOptions,
}

impl Lifecycle {
    pub fn new(document: Document, options: ParseOptions) -> Arc<Self> {
        Arc::new(Self {
            document: RwLock::new(Some(document)),
            options,
        })
    }

    /// Run `f` against the open document, or fail with `ViewClosed`.
    pub fn read<T>(&self, f: impl FnOnce(&Document, &ParseOptions) -> Result<T>) -> Result<T> {
        let guard = self.guard();
        match guard.as_ref() {
            Some(document) => f(document, &self.options),
            None => Err(Error::view_closed()),
        }
    }

    /// Release the document. Returns `false` if it was already released.
    pub fn close(&self) -> bool {
        let document = self
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match document {
            Some(document) => {
                tracing::debug!(nodes = document.node_count(), "closed document");
                drop(document);
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.guard().is_none()
    }

    fn guard(&self) -> RwLockReadGuard<'_, Option<Document>> {
        self.document.read().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::ArenaParts;

const DEFAULT_POOL_LIMIT: usize = 4;

#[derive(Default)]
struct Pool {
    parts: Vec<ArenaParts>,
    limit: usize,
}

/// Shared pool of arena tables.
///
/// A document parsed with an allocator takes its tables from the pool and
/// returns them, cleared, when the document is released. Clones share the
/// same pool.
///
/// # Examples
/// ```
/// use jsonview::{Allocator, ParseOptions};
///
/// let allocator = Allocator::new();
/// let options = ParseOptions::new().with_allocator(allocator.clone());
/// let root = jsonview::parse_lazy_str_with_options(r#"{"a":1}"#, &options).unwrap();
/// root.close();
/// assert_eq!(allocator.retained(), 1);
/// ```
#[derive(Clone)]
pub struct Allocator {
    pool: Arc<Mutex<Pool>>,
}

impl Allocator {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_POOL_LIMIT)
    }

    /// Keep at most `limit` released table sets for reuse.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            pool: Arc::new(Mutex::new(Pool {
                parts: Vec::new(),
                limit,
            })),
        }
    }

    /// Number of table sets currently pooled.
    pub fn retained(&self) -> usize {
        self.lock().parts.len()
    }

    pub(crate) fn take(&self) -> ArenaParts {
        let parts = self.lock().parts.pop();
        match parts {
            Some(parts) => {
                tracing::trace!(nodes = parts.nodes.capacity(), "reusing pooled arena");
                parts
            }
            None => ArenaParts::new(),
        }
    }

    pub(crate) fn put(&self, mut parts: ArenaParts) {
        parts.clear();
        let mut pool = self.lock();
        if pool.parts.len() < pool.limit {
            pool.parts.push(parts);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.lock();
        f.debug_struct("Allocator")
            .field("retained", &pool.parts.len())
            .field("limit", &pool.limit)
            .finish()
    }
}

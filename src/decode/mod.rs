//! Document engine: turns an input buffer into a [`Document`].

mod parser;
mod pool;
mod scanner;

use crate::arena::{ArenaParts, Document};
use crate::options::ParseOptions;
use crate::Result;

use pool::{put_arena_parts, take_arena_parts};

/// Who will own the finished document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Materialized and released right away; tables may come from the
    /// thread-local pool.
    Eager,
    /// Kept alive behind lazy views, possibly on another thread.
    Lazy,
}

/// Parse `input` into a standalone [`Document`].
///
/// The document owns `input`; with `in_place` set, escaped strings are
/// rewritten inside it.
pub fn parse_document(input: Vec<u8>, options: &ParseOptions) -> Result<Document> {
    options.validate()?;
    build(input, options, Mode::Lazy)
}

pub(crate) fn build(mut input: Vec<u8>, options: &ParseOptions, mode: Mode) -> Result<Document> {
    let allocator = options.allocator.clone();
    let mut parts = match (&allocator, mode) {
        (Some(allocator), _) => allocator.take(),
        (None, Mode::Eager) => take_arena_parts(),
        (None, Mode::Lazy) => ArenaParts::new(),
    };
    match parser::parse_into(&mut input, &mut parts, options) {
        Ok(root) => {
            tracing::debug!(
                bytes = input.len(),
                nodes = parts.nodes.len(),
                ?mode,
                "parsed document"
            );
            Ok(Document::new(input, parts, root, allocator))
        }
        Err(err) => {
            match (&allocator, mode) {
                (Some(allocator), _) => allocator.put(parts),
                (None, Mode::Eager) => put_arena_parts(parts),
                (None, Mode::Lazy) => {}
            }
            let err = err.into_error(&input);
            tracing::debug!(error = %err, "parse failed");
            Err(err)
        }
    }
}

/// Release a document built in [`Mode::Eager`].
pub(crate) fn release(document: Document) {
    if document.has_allocator() {
        drop(document);
    } else {
        put_arena_parts(document.into_parts());
    }
}

//! Parse JSON either into owned [`Value`]s or into lazy views that read
//! straight from the parsed document.
//!
//! ```
//! let value = jsonview::parse_str(r#"{"id": 7, "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(value["tags"][1].as_str(), Some("b"));
//!
//! let root = jsonview::parse_lazy_str(r#"{"id": 7, "tags": ["a", "b"]}"#).unwrap();
//! let id = root.as_object().unwrap().get("id").unwrap();
//! assert_eq!(id.as_u64(), Some(7));
//! root.close();
//! ```

pub mod access;
pub mod arena;
pub mod decode;
pub mod error;
pub mod lazy;
mod lifecycle;
pub mod materialize;
pub mod num;
pub mod options;
mod text;
pub mod value;

use std::io::Read;
use std::path::Path;

use crate::decode::Mode;

pub use crate::access::NodeView;
pub use crate::arena::{Allocator, Document};
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::lazy::{ArrayView, LazyValue, ObjectView};
pub use crate::options::{MapKind, NullRepr, ParseOptions};
pub use crate::value::{Map, Value};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse_str(input: &str) -> Result<Value> {
    parse_str_with_options(input, &ParseOptions::default())
}

pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Value> {
    parse_vec_with_options(input.as_bytes().to_vec(), options)
}

pub fn parse_slice(input: &[u8]) -> Result<Value> {
    parse_slice_with_options(input, &ParseOptions::default())
}

pub fn parse_slice_with_options(input: &[u8], options: &ParseOptions) -> Result<Value> {
    parse_vec_with_options(input.to_vec(), options)
}

/// Parse an owned buffer. With `in_place` the buffer is reused for unescaped
/// strings instead of copying them.
pub fn parse_vec(input: Vec<u8>) -> Result<Value> {
    parse_vec_with_options(input, &ParseOptions::default())
}

pub fn parse_vec_with_options(input: Vec<u8>, options: &ParseOptions) -> Result<Value> {
    materialize::parse_eager(input, options)
}

pub fn open_path(path: impl AsRef<Path>) -> Result<Value> {
    open_path_with_options(path, &ParseOptions::default())
}

pub fn open_path_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Value> {
    options.validate()?;
    parse_vec_with_options(std::fs::read(path)?, options)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Value> {
    from_reader_with_options(reader, &ParseOptions::default())
}

pub fn from_reader_with_options<R: Read>(reader: R, options: &ParseOptions) -> Result<Value> {
    options.validate()?;
    parse_vec_with_options(read_all(reader)?, options)
}

pub fn parse_lazy_str(input: &str) -> Result<LazyValue> {
    parse_lazy_str_with_options(input, &ParseOptions::default())
}

pub fn parse_lazy_str_with_options(input: &str, options: &ParseOptions) -> Result<LazyValue> {
    parse_lazy_vec_with_options(input.as_bytes().to_vec(), options)
}

pub fn parse_lazy_slice(input: &[u8]) -> Result<LazyValue> {
    parse_lazy_slice_with_options(input, &ParseOptions::default())
}

pub fn parse_lazy_slice_with_options(input: &[u8], options: &ParseOptions) -> Result<LazyValue> {
    parse_lazy_vec_with_options(input.to_vec(), options)
}

pub fn parse_lazy_vec(input: Vec<u8>) -> Result<LazyValue> {
    parse_lazy_vec_with_options(input, &ParseOptions::default())
}

/// Parse into a lazy view. The document stays alive until the view (and
/// every view derived from it) is closed or dropped.
pub fn parse_lazy_vec_with_options(input: Vec<u8>, options: &ParseOptions) -> Result<LazyValue> {
    options.validate()?;
    let document = decode::build(input, options, Mode::Lazy)?;
    lazy::open_document(document, options.clone())
}

pub fn open_lazy_path(path: impl AsRef<Path>, options: &ParseOptions) -> Result<LazyValue> {
    options.validate()?;
    parse_lazy_vec_with_options(std::fs::read(path)?, options)
}

pub fn lazy_from_reader<R: Read>(reader: R, options: &ParseOptions) -> Result<LazyValue> {
    options.validate()?;
    parse_lazy_vec_with_options(read_all(reader)?, options)
}

/// Parse lazily, run `body`, then close the view on every exit path.
///
/// Views cloned out of `body` outlive the scope but report `ViewClosed`.
///
/// ```
/// use jsonview::{Error, ParseOptions};
///
/// let total = jsonview::with_lazy_str("[1, 2, 3]", &ParseOptions::new(), |root| {
///     let mut sum = 0;
///     for item in root.as_array().unwrap() {
///         sum += item?.as_u64().unwrap_or(0);
///     }
///     Ok::<_, Error>(sum)
/// })
/// .unwrap();
/// assert_eq!(total, 6);
/// ```
pub fn with_lazy_str<T, E, F>(input: &str, options: &ParseOptions, body: F) -> std::result::Result<T, E>
where
    E: From<Error>,
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let root = parse_lazy_str_with_options(input, options)?;
    lazy::scoped(root, body)
}

pub fn with_lazy_slice<T, E, F>(
    input: &[u8],
    options: &ParseOptions,
    body: F,
) -> std::result::Result<T, E>
where
    E: From<Error>,
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let root = parse_lazy_slice_with_options(input, options)?;
    lazy::scoped(root, body)
}

/// Like [`with_lazy_slice`], but takes the buffer by value so `in_place`
/// parsing can reuse it.
pub fn with_lazy_vec<T, E, F>(
    input: Vec<u8>,
    options: &ParseOptions,
    body: F,
) -> std::result::Result<T, E>
where
    E: From<Error>,
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let root = parse_lazy_vec_with_options(input, options)?;
    lazy::scoped(root, body)
}

pub fn with_lazy_path<T, E, F>(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    body: F,
) -> std::result::Result<T, E>
where
    E: From<Error>,
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let root = open_lazy_path(path, options)?;
    lazy::scoped(root, body)
}

pub fn with_lazy_reader<T, E, F, R>(
    reader: R,
    options: &ParseOptions,
    body: F,
) -> std::result::Result<T, E>
where
    R: Read,
    E: From<Error>,
    F: FnOnce(&LazyValue) -> std::result::Result<T, E>,
{
    let root = lazy_from_reader(reader, options)?;
    lazy::scoped(root, body)
}

fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

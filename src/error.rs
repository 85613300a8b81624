#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input rejected by the document engine.
    Parse,
    /// Contradictory or invalid [`ParseOptions`](crate::ParseOptions).
    Config,
    KeyNotFound,
    IndexOutOfRange,
    /// A view was read after its document was released.
    ViewClosed,
    DepthExceeded,
    Io,
}

/// Position of a parse failure. `line` and `column` are 1-based; `column`
/// counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let head = &input[..offset];
        let line = memchr::memchr_iter(b'\n', head).count() + 1;
        let line_start = memchr::memrchr(b'\n', head).map_or(0, |idx| idx + 1);
        Self {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn parse(reason: &str, location: Location) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: format!(
                "{reason} at line {} column {}",
                location.line, location.column
            ),
            location: Some(location),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: format!("invalid options: {}", message.into()),
            location: None,
        }
    }

    pub fn key_not_found(key: &str) -> Self {
        Self {
            kind: ErrorKind::KeyNotFound,
            message: format!("key not found: {key:?}"),
            location: None,
        }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::IndexOutOfRange,
            message: format!("index {index} out of range for array of length {len}"),
            location: None,
        }
    }

    pub fn view_closed() -> Self {
        Self {
            kind: ErrorKind::ViewClosed,
            message: "document is closed".to_string(),
            location: None,
        }
    }

    pub fn depth_exceeded(limit: usize) -> Self {
        Self {
            kind: ErrorKind::DepthExceeded,
            message: format!("nesting depth exceeds limit of {limit}"),
            location: None,
        }
    }

    pub fn io(err: &std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: format!("read failed: {err}"),
            location: None,
        }
    }

    /// Byte offset of a parse failure.
    pub fn offset(&self) -> Option<usize> {
        self.location.map(|location| location.offset)
    }
}

/// Scanner-level failure; turned into an [`Error`] once, at the engine
/// boundary, where the input is available to compute a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub offset: usize,
    pub reason: &'static str,
}

impl SyntaxError {
    pub fn new(offset: usize, reason: &'static str) -> Self {
        Self { offset, reason }
    }

    pub fn into_error(self, input: &[u8]) -> Error {
        Error::parse(self.reason, Location::from_offset(input, self.offset))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err)
    }
}

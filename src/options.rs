use crate::arena::Allocator;
use crate::{Error, Result};

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Mapping container produced for JSON objects by the materializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapKind {
    /// Keys in source order.
    #[default]
    Ordered,
    /// Keys sorted lexicographically once the object is built.
    Sorted,
}

/// Value substituted for JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullRepr {
    #[default]
    Null,
    Missing,
}

/// Options for parsing and converting JSON documents.
///
/// # Examples
/// ```
/// use jsonview::{MapKind, ParseOptions};
///
/// let opts = ParseOptions::new()
///     .with_allow_comments(true)
///     .with_map_kind(MapKind::Sorted);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub map_kind: MapKind,
    pub null: NullRepr,
    pub in_place: bool,
    pub number_as_raw: bool,
    pub bignum_as_raw: bool,
    pub stop_at_first_value: bool,
    pub allow_comments: bool,
    pub allow_nan_inf: bool,
    pub allow_invalid_unicode: bool,
    pub allow_trailing_commas: bool,
    pub max_depth: usize,
    pub allocator: Option<Allocator>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            map_kind: MapKind::default(),
            null: NullRepr::default(),
            in_place: false,
            number_as_raw: false,
            bignum_as_raw: false,
            stop_at_first_value: false,
            allow_comments: false,
            allow_nan_inf: false,
            allow_invalid_unicode: false,
            allow_trailing_commas: false,
            max_depth: DEFAULT_MAX_DEPTH,
            allocator: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept every syntax extension: comments, trailing commas, NaN/Inf
    /// literals and invalid UTF-8 inside strings.
    ///
    /// # Examples
    /// ```
    /// use jsonview::ParseOptions;
    ///
    /// let value = jsonview::parse_str_with_options("[1, /* two */ 2,]", &ParseOptions::permissive());
    /// assert!(value.is_ok());
    /// ```
    pub fn permissive() -> Self {
        Self::default()
            .with_allow_comments(true)
            .with_allow_trailing_commas(true)
            .with_allow_nan_inf(true)
            .with_allow_invalid_unicode(true)
    }

    pub fn with_map_kind(mut self, map_kind: MapKind) -> Self {
        self.map_kind = map_kind;
        self
    }

    pub fn with_null(mut self, null: NullRepr) -> Self {
        self.null = null;
        self
    }

    /// Let the engine unescape strings inside the input buffer it owns.
    pub fn with_in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn with_number_as_raw(mut self, number_as_raw: bool) -> Self {
        self.number_as_raw = number_as_raw;
        self
    }

    /// Keep integers outside `i64`/`u64` and floats outside finite `f64` as
    /// raw text.
    pub fn with_bignum_as_raw(mut self, bignum_as_raw: bool) -> Self {
        self.bignum_as_raw = bignum_as_raw;
        self
    }

    pub fn with_stop_at_first_value(mut self, stop: bool) -> Self {
        self.stop_at_first_value = stop;
        self
    }

    pub fn with_allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }

    pub fn with_allow_nan_inf(mut self, allow: bool) -> Self {
        self.allow_nan_inf = allow;
        self
    }

    pub fn with_allow_invalid_unicode(mut self, allow: bool) -> Self {
        self.allow_invalid_unicode = allow;
        self
    }

    pub fn with_allow_trailing_commas(mut self, allow: bool) -> Self {
        self.allow_trailing_commas = allow;
        self
    }

    /// Deepest container nesting the materializer will follow.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Draw arena buffers from `allocator` and hand them back on release.
    pub fn with_allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_as_raw && self.bignum_as_raw {
            return Err(Error::config(
                "number_as_raw and bignum_as_raw are mutually exclusive",
            ));
        }
        if self.max_depth == 0 {
            return Err(Error::config("max_depth must be greater than zero"));
        }
        Ok(())
    }
}

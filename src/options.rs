/// The minimum nesting depth the parser and generator ever enforce. A
/// configured depth below this is floored up to it rather than honored
/// verbatim, so a small `with_max_depth` call can't make ordinary documents
/// fail with `StackOverflow`.
pub const MIN_MAX_DEPTH: usize = 1024;

/// Options for [`JsonParser`](super::JsonParser). Use [`JsonParserOptionsBuilder`]
/// to create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonParserOptions {
    /// The maximum stack depth
    pub(super) max_depth: usize,

    /// `true` if streaming mode should be enabled, which means that the parser
    /// will be able to handle a stream of multiple JSON values
    pub(super) streaming: bool,

    /// `// line` and `/* block */` comments
    pub(super) comments: bool,

    /// A comma before a closing `}`/`]` is tolerated
    pub(super) trailing_commas: bool,

    /// Items may be separated by whitespace alone, without a comma
    pub(super) optional_commas: bool,

    /// Strings and keys may be quoted with `'` instead of `"`
    pub(super) single_quotes: bool,

    /// Object keys may be bare identifiers, unquoted
    pub(super) unquoted_keys: bool,

    /// Values may be bare identifiers, unquoted
    pub(super) unquoted_strings: bool,

    /// Any `\x` inside a string is accepted and `x` is emitted verbatim,
    /// instead of only the fixed set of JSON escapes
    pub(super) escape_characters: bool,
}

/// A builder for [`JsonParserOptions`]
///
/// ```rust
/// use actson::feeder::PushJsonFeeder;
/// use actson::options::JsonParserOptionsBuilder;
/// use actson::JsonParser;
///
/// let feeder = PushJsonFeeder::new();
/// let mut parser = JsonParser::new_with_options(
///     feeder,
///     JsonParserOptionsBuilder::default()
///         .with_max_depth(4096)
///         .build(),
/// );
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonParserOptionsBuilder {
    options: JsonParserOptions,
}

impl Default for JsonParserOptions {
    /// Returns default JSON parser options (strict RFC 8259, no extensions)
    fn default() -> Self {
        Self {
            max_depth: MIN_MAX_DEPTH,
            streaming: false,
            comments: false,
            trailing_commas: false,
            optional_commas: false,
            single_quotes: false,
            unquoted_keys: false,
            unquoted_strings: false,
            escape_characters: false,
        }
    }
}

impl JsonParserOptions {
    /// Returns the maximum stack depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if streaming mode should be enabled, which means that
    /// the parser will be able to handle a stream of multiple JSON values
    pub fn streaming(&self) -> bool {
        self.streaming
    }

    /// Returns `true` if `// line` and `/* block */` comments are accepted
    pub fn comments(&self) -> bool {
        self.comments
    }

    /// Returns `true` if a trailing comma before a closing `}`/`]` is
    /// tolerated
    pub fn trailing_commas(&self) -> bool {
        self.trailing_commas
    }

    /// Returns `true` if items may be separated by whitespace alone,
    /// without a comma
    pub fn optional_commas(&self) -> bool {
        self.optional_commas
    }

    /// Returns `true` if strings and keys may be quoted with `'`
    pub fn single_quotes(&self) -> bool {
        self.single_quotes
    }

    /// Returns `true` if object keys may be bare, unquoted identifiers
    pub fn unquoted_keys(&self) -> bool {
        self.unquoted_keys
    }

    /// Returns `true` if values may be bare, unquoted identifiers
    pub fn unquoted_strings(&self) -> bool {
        self.unquoted_strings
    }

    /// Returns `true` if any `\x` inside a string is accepted
    pub fn escape_characters(&self) -> bool {
        self.escape_characters
    }
}

impl JsonParserOptionsBuilder {
    /// Set the maximum stack depth. Values below [`MIN_MAX_DEPTH`] are
    /// floored up to it.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth.max(MIN_MAX_DEPTH);
        self
    }

    /// Enable streaming mode, which means that the parser will be able to
    /// handle a stream of multiple JSON values. Values must be clearly
    /// separable. They must either be self-delineating values (i.e. arrays,
    /// objects, strings) or keywords (i.e. `true`, `false`, `null`), or they
    /// must be separated either by white space, at least one self-delineating
    /// value, or at least one keyword.
    ///
    /// ## Example streams
    ///
    /// `1 2 3 4 5`
    ///
    /// `[1,2,3][4,5,6]{"key": "value"} 7 8 9`
    ///
    /// `"a""b"[1, 2, 3] {"key": "value"}`
    ///
    /// ## Example:
    ///
    /// ```rust
    /// use actson::feeder::SliceJsonFeeder;
    /// use actson::options::JsonParserOptionsBuilder;
    /// use actson::{JsonEvent, JsonParser};
    ///
    /// let json = r#"1 2""{"key":"value"}
    /// ["a","b"]4true"#.as_bytes();
    ///
    /// let feeder = SliceJsonFeeder::new(json);
    /// let mut parser = JsonParser::new_with_options(
    ///     feeder,
    ///     JsonParserOptionsBuilder::default()
    ///         .with_streaming(true)
    ///         .build(),
    /// );
    ///
    /// let mut events = Vec::new();
    /// while let Some(e) = parser.next_event().unwrap() {
    ///     events.push(e);
    /// }
    ///
    /// assert_eq!(events, vec![
    ///     JsonEvent::ValueInt,
    ///     JsonEvent::ValueInt,
    ///     JsonEvent::ValueString,
    ///     JsonEvent::StartObject,
    ///     JsonEvent::FieldName,
    ///     JsonEvent::ValueString,
    ///     JsonEvent::EndObject,
    ///     JsonEvent::StartArray,
    ///     JsonEvent::ValueString,
    ///     JsonEvent::ValueString,
    ///     JsonEvent::EndArray,
    ///     JsonEvent::ValueInt,
    ///     JsonEvent::ValueTrue,
    /// ]);
    /// ```
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.options.streaming = streaming;
        self
    }

    /// Accept `// line` and `/* block */` comments anywhere whitespace is
    /// allowed
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.options.comments = comments;
        self
    }

    /// Tolerate a trailing comma before a closing `}`/`]`
    pub fn with_trailing_commas(mut self, trailing_commas: bool) -> Self {
        self.options.trailing_commas = trailing_commas;
        self
    }

    /// Allow array/object items to be separated by whitespace alone
    pub fn with_optional_commas(mut self, optional_commas: bool) -> Self {
        self.options.optional_commas = optional_commas;
        self
    }

    /// Accept `'single quoted'` strings and keys
    pub fn with_single_quotes(mut self, single_quotes: bool) -> Self {
        self.options.single_quotes = single_quotes;
        self
    }

    /// Accept bare, unquoted identifiers as object keys
    pub fn with_unquoted_keys(mut self, unquoted_keys: bool) -> Self {
        self.options.unquoted_keys = unquoted_keys;
        self
    }

    /// Accept bare, unquoted identifiers as values
    pub fn with_unquoted_strings(mut self, unquoted_strings: bool) -> Self {
        self.options.unquoted_strings = unquoted_strings;
        self
    }

    /// Accept any `\x` escape sequence inside a string, emitting `x`
    /// verbatim instead of rejecting everything but the fixed JSON escapes
    pub fn with_escape_characters(mut self, escape_characters: bool) -> Self {
        self.options.escape_characters = escape_characters;
        self
    }

    /// Create a new [`JsonParserOptions`] object
    pub fn build(self) -> JsonParserOptions {
        self.options
    }
}

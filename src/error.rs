use std::str::Utf8Error;

use thiserror::Error;

/// Every error this crate can produce, carrying the absolute byte position
/// (bytes retired before the current buffer view, plus the offset into it)
/// wherever a position is meaningful.
///
/// Once a parser or generator returns one of these, the instance is
/// considered *fused*: every further call returns the same error again
/// rather than resuming in the middle of a now-undefined state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input contains a byte that is illegal at the current position
    /// (e.g. a bare control character outside of an escape sequence).
    #[error("illegal byte `{byte:#04x}' at position {position}")]
    IllegalInput { byte: u8, position: usize },

    /// The input is not valid JSON (and, if extensions are enabled, not
    /// valid extended JSON either).
    #[error("syntax error at position {position}")]
    Syntax { position: usize },

    /// A number's digits did not form a valid `i64`/`f64`, or a parsed
    /// `f64` was not finite.
    #[error("invalid number at position {position}")]
    Number { position: usize },

    /// A string contained invalid UTF-8, or a `\uXXXX` escape decoded to
    /// something that isn't a valid Unicode scalar value.
    #[error("invalid UTF-8 at position {position}: {source}")]
    Utf8 {
        position: usize,
        #[source]
        source: Utf8InvalidityError,
    },

    /// The nesting stack would have grown past its configured bound.
    #[error("nesting stack overflow (max depth {max_depth}) at position {position}")]
    StackOverflow { max_depth: usize, position: usize },

    /// A pop was attempted on an empty nesting stack, or the popped frame
    /// did not match what the caller expected.
    #[error("nesting stack underflow at position {position}")]
    StackUnderflow { position: usize },

    /// Reading from the underlying source failed.
    #[error("I/O error while reading input: {0}")]
    FileRead(String),

    /// Writing to the underlying sink failed.
    #[error("I/O error while writing output: {0}")]
    FileWrite(String),

    /// A value was emitted while the generator expected a key (inside an
    /// object, immediately after `{` or a comma).
    #[error("expected a key at event #{event_index}")]
    ExpectedKey { event_index: usize },

    /// A key was emitted outside an object, or a value was emitted where
    /// a key was still pending.
    #[error("expected a value at event #{event_index}")]
    ExpectedValue { event_index: usize },

    /// `end_array` was called while the innermost open container is an
    /// object.
    #[error("no array to close at event #{event_index}")]
    NoArray { event_index: usize },

    /// `end_object` was called while the innermost open container is an
    /// array.
    #[error("no object to close at event #{event_index}")]
    NoObject { event_index: usize },

    /// A malformed combination of one-shot convenience options was
    /// supplied (e.g. zero or more than one input source).
    #[error("invalid combination of options: {0}")]
    Opt(&'static str),

    /// A back-end callback returned "abort" without recording its own
    /// error.
    #[error("back-end callback aborted the generator")]
    Abort,

    /// There is nothing more to parse: the feeder is done and the JSON
    /// text ended prematurely, or `next_event` was called again after a
    /// complete document (and non-streaming) parse already finished.
    #[error("nothing more to parse")]
    NoMoreInput,
}

/// Why a UTF-8 validation failed; kept separate from [`std::str::Utf8Error`]
/// so it can also describe failures that never touch `str::from_utf8`
/// (invalid surrogate pairs, code points decoded from `\uXXXX` escapes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8InvalidityError {
    /// `std::str::from_utf8` rejected the byte sequence.
    Malformed,
    /// A `\uXXXX` escape decoded to an unpaired UTF-16 surrogate.
    UnpairedSurrogate,
    /// A decoded code point is outside the Unicode scalar value range.
    InvalidCodePoint,
}

impl std::fmt::Display for Utf8InvalidityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Utf8InvalidityError::Malformed => write!(f, "malformed byte sequence"),
            Utf8InvalidityError::UnpairedSurrogate => write!(f, "unpaired UTF-16 surrogate"),
            Utf8InvalidityError::InvalidCodePoint => write!(f, "invalid code point"),
        }
    }
}

impl From<Utf8Error> for Utf8InvalidityError {
    fn from(_: Utf8Error) -> Self {
        Utf8InvalidityError::Malformed
    }
}

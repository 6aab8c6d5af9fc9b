use std::{
    collections::VecDeque,
    num::ParseFloatError,
    str::from_utf8,
};

use crate::{
    codec,
    error::{Error, Utf8InvalidityError},
    feeder::JsonFeeder,
    options::JsonParserOptions,
    JsonEvent,
};
use btoi::ParseIntegerError;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, FromPrimitive, Zero};

// The byte-class table and the `[state][class] -> entry` transition table
// are generated at build time from `gen/grammar.json` by `actson-gen-table`
// (see `build.rs`). Wrapping the include in its own module keeps the
// generated file's leading `#![allow(dead_code)]` valid (inner attributes
// must be the first thing in their enclosing module) and keeps every
// generated name out of this module's public surface.
#[allow(dead_code)]
mod state_table {
    include!(concat!(env!("OUT_DIR"), "/state_table.rs"));
}
use state_table::*;

/// Sentinel transition value meaning "try to recover, either because
/// streaming mode allows another top-level value here, or because
/// `optional_commas` allows an implicit separator". Must match
/// `actson_gen_table::RECOVER_SENTINEL` - the build dependency that
/// produces this number isn't visible to this crate's own runtime code, so
/// the value is hardcoded on both sides and kept in sync by convention.
const RC: i16 = 999;

/// These modes can be pushed on the stack.
const MODE_ARRAY: i8 = 0;
const MODE_DONE: i8 = 1;
const MODE_KEY: i8 = 2;
const MODE_OBJECT: i8 = 3;

/// An error that can happen when trying to parse the current value to a float
#[derive(thiserror::Error, Debug)]
pub enum InvalidFloatValueError {
    #[error("unable to convert current value to a string: {0}")]
    String(#[from] std::str::Utf8Error),

    #[error("unable to parse current value as a float: {0}")]
    Float(#[from] ParseFloatError),
}

/// A non-blocking, event-based JSON parser.
pub struct JsonParser<T> {
    pub feeder: T,

    options: JsonParserOptions,

    /// The stack containing the current modes (object/array/key/done). A
    /// private implementation detail of the DFA's comma/colon/bracket
    /// dispatch - not the public `NestingStack` (`crate::stack`), which the
    /// structural generator uses instead. See `DESIGN.md`, Open Question 2.
    stack: VecDeque<i8>,

    /// The current state
    state: i16,

    /// A single-slot "return to this state" register, used by states that
    /// are shared across multiple callers: the escape-sequence reader
    /// (`ES`/`U1`..`U4`) needs to know whether to resume a double- or a
    /// single-quoted string, and the comment skipper (`CMS`/`CML`/`CMB`/
    /// `CMBS`) needs to know which state invoked it.
    return_state: Option<i16>,

    /// Collects the bytes of the value currently being scanned (string,
    /// number, unquoted identifier).
    current_buffer: Vec<u8>,

    /// The first event returned by [`Self::parse()`]
    event1: JsonEvent,

    /// The second event returned by [`Self::parse()`]
    event2: JsonEvent,

    /// Tracks the total number of bytes that have been processed - this
    /// already is an absolute position across refills, not a buffer-local
    /// one, so it is used directly when reporting error positions.
    parsed_bytes: usize,

    /// A character that has been put back to be parsed at the next call
    /// of [`Self::next_event()`]
    putback_character: Option<u8>,

    /// `false` until the first up-to-3 bytes of input have been checked for
    /// a UTF-8 BOM. A feeder delivers bytes one at a time, possibly across
    /// several refills, so this can't be resolved in one shot the way
    /// `codec::strip_bom` settles a complete in-memory buffer - the scan has
    /// to be resumable.
    bom_checked: bool,

    /// Bytes read while `bom_checked` is still `false`, pending a decision
    /// on whether they're a BOM to discard or ordinary input to replay.
    bom_scan: Vec<u8>,

    /// Bytes [`Self::check_bom()`] read but turned out not to be part of a
    /// BOM; drained by [`Self::get_next_input()`] before pulling fresh
    /// bytes from the feeder, so they re-enter the DFA exactly once, in
    /// order, with normal `parsed_bytes` accounting.
    bom_replay: VecDeque<u8>,

    /// Tracks if a UTF-16 high surrogate has been encountered
    high_surrogate_pair: bool,

    /// Once a pull has returned an error, or a non-streaming parse has
    /// reached its final `Ok(None)`, every further call returns the same
    /// result again. See spec's "errors are sticky" invariant.
    fused: Option<Result<Option<JsonEvent>, Error>>,
}

impl<T> JsonParser<T>
where
    T: JsonFeeder,
{
    /// Create a new JSON parser using the given [`JsonFeeder`]
    pub fn new(feeder: T) -> Self {
        Self::new_with_options(feeder, JsonParserOptions::default())
    }

    /// Create a new JSON parser using the given [`JsonFeeder`] and
    /// [`JsonParserOptions`]
    pub fn new_with_options(feeder: T, options: JsonParserOptions) -> Self {
        JsonParser {
            feeder,
            options,
            stack: VecDeque::from([MODE_DONE]),
            state: GO,
            return_state: None,
            current_buffer: vec![],
            event1: JsonEvent::NeedMoreInput,
            event2: JsonEvent::NeedMoreInput,
            parsed_bytes: 0,
            putback_character: None,
            bom_checked: false,
            bom_scan: Vec::with_capacity(3),
            bom_replay: VecDeque::new(),
            high_surrogate_pair: false,
            fused: None,
        }
    }

    /// Returns the options this parser was constructed with.
    pub fn options(&self) -> &JsonParserOptions {
        &self.options
    }

    fn push_mode(&mut self, mode: i8) -> Result<(), Error> {
        if self.stack.len() >= self.options.max_depth() {
            return Err(Error::StackOverflow {
                max_depth: self.options.max_depth(),
                position: self.parsed_bytes,
            });
        }
        self.stack.push_back(mode);
        Ok(())
    }

    fn pop_mode(&mut self, expected: i8) -> Result<(), Error> {
        if self.stack.is_empty() {
            return Err(Error::StackUnderflow {
                position: self.parsed_bytes,
            });
        }
        if *self.stack.back().unwrap() != expected {
            return Err(Error::Syntax {
                position: self.parsed_bytes,
            });
        }
        self.stack.pop_back();
        Ok(())
    }

    /// Get the next input character, preferring a replayed BOM-scan byte
    /// (see [`Self::check_bom()`]), then [`Self::putback_character`], then
    /// [`Self::feeder`].
    fn get_next_input(&mut self) -> Option<u8> {
        if let Some(b) = self.bom_replay.pop_front() {
            return Some(b);
        }
        self.putback_character
            .take()
            .or_else(|| self.feeder.next_input())
    }

    /// Resolves the leading UTF-8 BOM check, buffering up to 3 bytes across
    /// as many calls as the feeder needs to deliver them. Returns `true`
    /// once resolved (whether or not a BOM was actually found); `false`
    /// means the feeder has no more bytes right now but isn't done either,
    /// so the caller should ask again later. Matches
    /// `original_source/src/parse.c`'s `parser_set_bytes`/
    /// `parser_set_reader`, which skip a leading BOM once via
    /// `utf8_bom_bytes` before the DFA ever sees the buffer - except here
    /// the lookahead has to be resumable instead of a single pointer
    /// offset, since the bytes may not all be available yet.
    fn check_bom(&mut self) -> bool {
        while self.bom_scan.len() < 3 {
            match self.get_next_input() {
                Some(b) => self.bom_scan.push(b),
                None => {
                    if self.feeder.is_done() {
                        break;
                    }
                    return false;
                }
            }
        }
        self.bom_checked = true;
        let remainder = codec::strip_bom(&self.bom_scan);
        self.bom_replay.extend(remainder.iter().copied());
        self.bom_scan.clear();
        true
    }

    /// Put back the given character to be parsed at the next call of
    /// [`Self::next_event()`]
    fn put_back(&mut self, c: u8) {
        assert!(
            self.putback_character.is_none(),
            "only one character can be put back"
        );
        self.putback_character = Some(c);
        self.parsed_bytes -= 1;
    }

    /// Call this method to proceed parsing the JSON text and to get the next
    /// event. The method returns `Ok(Some(JsonEvent::NeedMoreInput))` if it
    /// needs more input data from the feeder, or `Ok(None)` if the end of
    /// the JSON text has been reached. Once this returns `Err(_)` or
    /// `Ok(None)`, every subsequent call returns the same result again.
    pub fn next_event(&mut self) -> Result<Option<JsonEvent>, Error> {
        if let Some(result) = &self.fused {
            return result.clone();
        }
        let result = self.next_event_inner();
        if !matches!(result, Ok(Some(JsonEvent::NeedMoreInput))) {
            self.fused = Some(result.clone());
        }
        result
    }

    fn next_event_inner(&mut self) -> Result<Option<JsonEvent>, Error> {
        while self.event1 == JsonEvent::NeedMoreInput {
            if !self.bom_checked && !self.check_bom() {
                return Ok(Some(JsonEvent::NeedMoreInput));
            }
            if let Some(b) = self.get_next_input() {
                self.parsed_bytes += 1;
                if self.state == ST && (32..=127).contains(&b) && b != b'\\' && b != b'"' {
                    // shortcut: a plain ASCII byte inside a double-quoted
                    // string never needs the table.
                    self.current_buffer.push(b);
                } else {
                    self.parse(b)?;
                }
            } else {
                if self.feeder.is_done() {
                    if self.state != OK {
                        let r = self.state_to_event()?;
                        if r != JsonEvent::NeedMoreInput {
                            self.state = OK;
                            return Ok(Some(r));
                        }
                    }
                    return if self.state == OK && self.pop_mode(MODE_DONE).is_ok() {
                        Ok(None)
                    } else {
                        Err(Error::NoMoreInput)
                    };
                }
                return Ok(Some(JsonEvent::NeedMoreInput));
            }
        }

        let r = self.event1;
        self.event1 = self.event2;
        self.event2 = JsonEvent::NeedMoreInput;

        Ok(Some(r))
    }

    /// `true` for the states that collect bytes into [`Self::current_buffer`]:
    /// strings (double- and single-quoted), escape decoding, and numbers.
    fn is_accumulating_state(s: i16) -> bool {
        (ST..=E3).contains(&s) || s == SQ || s == UQ || s == UQK
    }

    /// This function is called for each character (or partial character) in
    /// the JSON text. It sets [`Self::event1`] and [`Self::event2`]
    /// accordingly. As a precondition, these fields must be
    /// [`JsonEvent::NeedMoreInput`].
    fn parse(&mut self, next_char: u8) -> Result<(), Error> {
        let next_class = BYTE_CLASS[next_char as usize];
        if next_class < 0 {
            return Err(Error::IllegalInput {
                byte: next_char,
                position: self.parsed_bytes.saturating_sub(1),
            });
        }

        let mut next_state = TRANSITIONS[(self.state as usize) * N_CLASSES + next_class as usize];

        if next_state == RC {
            let top = *self.stack.back().unwrap();
            let stream_recover =
                self.options.streaming() && self.stack.len() == 1 && top == MODE_DONE;
            let comma_recover =
                self.options.optional_commas() && matches!(top, MODE_ARRAY | MODE_OBJECT);

            if stream_recover || comma_recover {
                if self.state == OK {
                    let lookup_state = if stream_recover {
                        GO
                    } else if top == MODE_ARRAY {
                        VA
                    } else {
                        KE
                    };
                    next_state =
                        TRANSITIONS[(lookup_state as usize) * N_CLASSES + next_class as usize];
                } else {
                    // Switch to OK to finalize the pending value first; put
                    // the byte back so it is reprocessed from OK.
                    next_state = OK;
                    self.put_back(next_char);
                }
            } else {
                next_state = -1;
            }
        }

        if next_state >= 0 {
            if Self::is_accumulating_state(next_state) {
                if next_state == SQ && !self.options.single_quotes() {
                    return Err(self.syntax_error());
                }
                if next_state == UQ && !self.options.unquoted_strings() {
                    return Err(self.syntax_error());
                }
                if next_state == UQK && !self.options.unquoted_keys() {
                    return Err(self.syntax_error());
                }

                if Self::is_accumulating_state(self.state) {
                    if next_state == ES {
                        self.return_state = Some(self.state);
                        self.current_buffer.push(next_char);
                    } else if self.state == ES && next_state != U1 {
                        // A single-char escape (`\n`, `\"`, ...) resolves
                        // immediately; `\u` (next_state == U1) instead opens
                        // a 4-hex-digit sub-scan and is handled below once
                        // U4 completes it.
                        self.accumulate_escape(next_char)?;
                        next_state = self.return_state.take().unwrap_or(ST);
                    } else if self.state == U4 {
                        self.accumulate_hex_digit(next_char)?;
                        next_state = self.return_state.take().unwrap_or(ST);
                    } else {
                        self.current_buffer.push(next_char);
                    }
                } else {
                    self.current_buffer.clear();
                    if next_state != ST && next_state != SQ {
                        self.current_buffer.push(next_char);
                    }
                }
            } else if next_state == OK {
                self.event1 = self.state_to_event()?;
            } else if next_state == CMS {
                if !self.options.comments() {
                    return Err(self.syntax_error());
                }
                self.return_state = Some(self.state);
            }

            self.state = next_state;
        } else {
            self.perform_action(next_state, next_char)?;
        }

        Ok(())
    }

    fn syntax_error(&self) -> Error {
        Error::Syntax {
            position: self.parsed_bytes.saturating_sub(1),
        }
    }

    /// Decode one byte following a backslash inside `ES`.
    fn accumulate_escape(&mut self, next_char: u8) -> Result<(), Error> {
        match next_char {
            b'\\' => self.replace_last(0x5C),
            b'n' => self.replace_last(0x0A),
            b'r' => self.replace_last(0x0D),
            b't' => self.replace_last(0x09),
            b'b' => self.replace_last(0x08),
            b'f' => self.replace_last(0x0C),
            b'/' => self.replace_last(0x2F),
            b'"' => self.replace_last(0x22),
            b'\'' if self.options.single_quotes() => self.replace_last(0x27),
            _ => {
                if self.options.escape_characters() {
                    self.replace_last(next_char);
                } else {
                    return Err(self.syntax_error());
                }
            }
        }
        Ok(())
    }

    fn replace_last(&mut self, byte: u8) {
        self.current_buffer.pop();
        self.current_buffer.push(byte);
    }

    /// Consume the final hex digit of a `\uXXXX` escape (`U4`), decoding the
    /// code point and, if it's a surrogate, combining it with a
    /// previously-seen high surrogate.
    fn accumulate_hex_digit(&mut self, next_char: u8) -> Result<(), Error> {
        self.current_buffer.push(next_char);

        // The last 6 bytes in the buffer are now `\uXXXX`.
        if self.current_buffer.len() < 6 {
            return Err(self.syntax_error());
        }

        let unicode_in_hex = from_utf8(&self.current_buffer[self.current_buffer.len() - 4..])
            .map_err(|_| self.syntax_error())?;
        let unicode =
            u32::from_str_radix(unicode_in_hex, 16).map_err(|_| self.syntax_error())?;

        if (0xD800..=0xDBFF).contains(&unicode) {
            if self.high_surrogate_pair {
                return Err(self.syntax_error());
            }
            self.high_surrogate_pair = true;
        } else if (0xDC00..=0xDFFF).contains(&unicode) {
            if !self.high_surrogate_pair {
                return Err(self.syntax_error());
            }
            self.high_surrogate_pair = false;

            if self.current_buffer.len() < 12 {
                return Err(self.syntax_error());
            }

            let high = u16::from_str_radix(
                from_utf8(
                    &self.current_buffer
                        [self.current_buffer.len() - 10..self.current_buffer.len() - 6],
                )
                .map_err(|_| self.syntax_error())?,
                16,
            )
            .map_err(|_| self.syntax_error())?;
            let low = u16::from_str_radix(
                from_utf8(&self.current_buffer[self.current_buffer.len() - 4..])
                    .map_err(|_| self.syntax_error())?,
                16,
            )
            .map_err(|_| self.syntax_error())?;

            let code_point = codec::combine_surrogates(high, low).map_err(|source| {
                Error::Utf8 {
                    position: self.parsed_bytes,
                    source,
                }
            })?;
            let mut encoded = Vec::new();
            codec::encode_utf8(code_point, &mut encoded).map_err(|source| Error::Utf8 {
                position: self.parsed_bytes,
                source,
            })?;

            self.current_buffer.truncate(self.current_buffer.len() - 12);
            self.current_buffer.extend_from_slice(&encoded);
        } else {
            let unicode_char = char::from_u32(unicode).ok_or(Error::Utf8 {
                position: self.parsed_bytes,
                source: Utf8InvalidityError::InvalidCodePoint,
            })?;
            let mut encoded = [0u8; 4];
            let encoded = unicode_char.encode_utf8(&mut encoded);

            self.current_buffer.truncate(self.current_buffer.len() - 6);
            self.current_buffer.extend_from_slice(encoded.as_bytes());
        }

        Ok(())
    }

    /// Perform an action that changes the parser state. `next_char` is the
    /// byte that triggered the action; only `uq_end` needs it (to put it
    /// back and reprocess it under the new state).
    fn perform_action(&mut self, action: i16, next_char: u8) -> Result<(), Error> {
        match action {
            a if a == ACT_END_OBJECT_EMPTY => {
                if self.state == KE && !self.options.trailing_commas() {
                    return Err(self.syntax_error());
                }
                self.pop_mode(MODE_KEY)?;
                self.state = OK;
                self.event1 = JsonEvent::EndObject;
            }

            a if a == ACT_END_OBJECT => {
                self.pop_mode(MODE_OBJECT)?;
                match self.state_to_event()? {
                    JsonEvent::NeedMoreInput => self.event1 = JsonEvent::EndObject,
                    e => {
                        self.event1 = e;
                        self.event2 = JsonEvent::EndObject;
                    }
                }
                self.state = OK;
            }

            a if a == ACT_END_ARRAY => {
                if self.state == VA && !self.options.trailing_commas() {
                    return Err(self.syntax_error());
                }
                self.pop_mode(MODE_ARRAY)?;
                match self.state_to_event()? {
                    JsonEvent::NeedMoreInput => self.event1 = JsonEvent::EndArray,
                    e => {
                        self.event1 = e;
                        self.event2 = JsonEvent::EndArray;
                    }
                }
                self.state = OK;
            }

            a if a == ACT_BEGIN_OBJECT => {
                self.push_mode(MODE_KEY)?;
                self.state = OB;
                self.event1 = JsonEvent::StartObject;
            }

            a if a == ACT_BEGIN_ARRAY => {
                self.push_mode(MODE_ARRAY)?;
                self.state = AR;
                self.event1 = JsonEvent::StartArray;
            }

            a if a == ACT_QUOTE_CLOSE => {
                if *self.stack.back().unwrap() == MODE_KEY {
                    self.state = CO;
                    self.event1 = JsonEvent::FieldName;
                } else {
                    self.state = OK;
                    self.event1 = JsonEvent::ValueString;
                }
            }

            a if a == ACT_COMMA => match *self.stack.back().unwrap() {
                MODE_OBJECT => {
                    self.pop_mode(MODE_OBJECT)?;
                    self.push_mode(MODE_KEY)?;
                    self.event1 = self.state_to_event()?;
                    self.state = KE;
                }
                MODE_ARRAY => {
                    self.event1 = self.state_to_event()?;
                    self.state = VA;
                }
                _ => return Err(self.syntax_error()),
            },

            a if a == ACT_COLON => {
                self.pop_mode(MODE_KEY)?;
                self.push_mode(MODE_OBJECT)?;
                self.state = VA;
            }

            a if a == ACT_COMMENT_LINE_END || a == ACT_COMMENT_BLOCK_END => {
                self.state = self.return_state.take().unwrap_or(GO);
            }

            a if a == ACT_UQ_END => {
                let is_key = self.state == UQK;
                self.event1 = if is_key {
                    JsonEvent::FieldName
                } else {
                    JsonEvent::ValueString
                };
                self.state = if is_key { CO } else { OK };
                self.put_back(next_char);
            }

            _ => return Err(self.syntax_error()),
        }

        Ok(())
    }

    /// Converts the current parser state to a JSON event. Returns the event
    /// or [`JsonEvent::NeedMoreInput`] if the current state does not
    /// produce one on its own. A completed number is validated here, by
    /// strict `strtol`/`strtod`-equivalent parsing of the accumulated
    /// digits, so that an out-of-range or non-finite number fails the parse
    /// itself rather than only the later `current_int`/`current_float` call.
    fn state_to_event(&self) -> Result<JsonEvent, Error> {
        match self.state {
            s if s == IN || s == ZE => {
                self.validate_integer()?;
                Ok(JsonEvent::ValueInt)
            }
            s if (FR..=E3).contains(&s) => {
                self.validate_real()?;
                Ok(JsonEvent::ValueFloat)
            }
            s if s == T3 => Ok(JsonEvent::ValueTrue),
            s if s == F4 => Ok(JsonEvent::ValueFalse),
            s if s == N3 => Ok(JsonEvent::ValueNull),
            _ => Ok(JsonEvent::NeedMoreInput),
        }
    }

    /// Strict `strtol`-equivalent validation: the accumulated digits must
    /// fit in an `i64`, matching the `current_int::<i64>()` range that
    /// [`Self::current_int()`] itself uses for the default integer type.
    fn number_error(&self) -> Error {
        Error::Number {
            position: self.parsed_bytes,
        }
    }

    fn validate_integer(&self) -> Result<(), Error> {
        btoi::btoi::<i64>(&self.current_buffer)
            .map(|_| ())
            .map_err(|_| self.number_error())
    }

    /// Strict `strtod`-equivalent validation: the accumulated digits must
    /// parse as a finite `f64`, and must be either zero or a normal number
    /// (`isnormal`), so a value that underflows to a subnormal or overflows
    /// to infinity is rejected just as the original does.
    fn validate_real(&self) -> Result<(), Error> {
        let s = from_utf8(&self.current_buffer).map_err(|_| self.number_error())?;
        let value: f64 = s.parse().map_err(|_| self.number_error())?;
        if value == 0.0 || value.is_normal() {
            Ok(())
        } else {
            Err(self.number_error())
        }
    }

    /// Get the value of the string that has just been parsed. Call this
    /// after receiving [`JsonEvent::FieldName`] or [`JsonEvent::ValueString`].
    pub fn current_str(&self) -> Result<&str, Error> {
        codec::validate_str(&self.current_buffer, self.parsed_bytes)
    }

    /// Get the value of the integer that has just been parsed. Call this
    /// after receiving [`JsonEvent::ValueInt`].
    pub fn current_int<I>(&self) -> Result<I, ParseIntegerError>
    where
        I: FromPrimitive + Zero + CheckedAdd + CheckedSub + CheckedMul,
    {
        btoi::btoi(&self.current_buffer)
    }

    /// Get the value of the float that has just been parsed. Call this
    /// after receiving [`JsonEvent::ValueFloat`].
    pub fn current_float(&self) -> Result<f64, InvalidFloatValueError> {
        Ok(from_utf8(&self.current_buffer)?.parse()?)
    }

    /// Return the number of bytes parsed so far
    pub fn parsed_bytes(&self) -> usize {
        self.parsed_bytes
    }
}

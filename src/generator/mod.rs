//! Structural validator-generator, grounded on `original_source/src/generate.c`
//! (`cannot_value`/`cannot_key`/`cannot_push`/`cannot_pop`).
//!
//! A [`Generator`] wraps any [`GeneratorSink`] - a pretty/compact text
//! writer ([`printer`]), a DOM builder ([`dom`]), or any user type that
//! implements the trait directly (the role `jsonpg`'s `callback_generator`
//! plays) - and validates that the sequence of calls it receives forms a
//! well-formed JSON document before forwarding each call to the sink: keys
//! only inside objects and only where a key is expected, values only where
//! a value is expected, and `end_array`/`end_object` matched against the
//! container that is actually open.

pub mod dom;
pub mod printer;

use crate::error::Error;
use crate::stack::{Frame, NestingStack};

/// The back-end a [`Generator`] drives. Every method corresponds to one
/// JSON event; a back-end only needs to record or write it, since
/// [`Generator`] has already checked it is legal to emit.
pub trait GeneratorSink {
    fn null(&mut self) -> Result<(), Error>;
    fn boolean(&mut self, value: bool) -> Result<(), Error>;
    fn integer(&mut self, value: i64) -> Result<(), Error>;
    fn real(&mut self, value: f64) -> Result<(), Error>;
    fn string(&mut self, value: &str) -> Result<(), Error>;
    fn key(&mut self, value: &str) -> Result<(), Error>;
    fn begin_array(&mut self) -> Result<(), Error>;
    fn end_array(&mut self) -> Result<(), Error>;
    fn begin_object(&mut self) -> Result<(), Error>;
    fn end_object(&mut self) -> Result<(), Error>;
}

/// Validates a stream of generator calls against nesting and key/value
/// alternation invariants, then forwards each to a [`GeneratorSink`].
pub struct Generator<S> {
    sink: S,
    stack: NestingStack,
    /// `true` exactly when the next call, if it's inside an object, must be
    /// [`Self::key`] rather than a value.
    key_next: bool,
    /// Number of generator calls made so far; used as the error position.
    count: usize,
    /// `max_depth == 0` disables validation entirely (raw pass-through), per
    /// spec's "stack absent" escape hatch.
    validate: bool,
}

impl<S> Generator<S>
where
    S: GeneratorSink,
{
    /// Create a generator bounded to `max_depth` levels of nesting.
    /// `max_depth` is floored up to [`crate::options::MIN_MAX_DEPTH`] (see
    /// [`NestingStack::new`]), except that passing `0` disables structural
    /// validation entirely: every call is forwarded to the sink unchecked.
    pub fn new(sink: S, max_depth: usize) -> Self {
        Generator {
            sink,
            stack: NestingStack::new(max_depth),
            key_next: false,
            count: 0,
            validate: max_depth > 0,
        }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// `true` once every opened container has been closed again.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    fn cannot_value(&self) -> Result<(), Error> {
        if self.validate && self.stack.peek() == Some(Frame::Object) && self.key_next {
            return Err(Error::ExpectedKey {
                event_index: self.count,
            });
        }
        Ok(())
    }

    /// Called after any non-key value (scalar, or a just-closed container)
    /// was accepted: if we're directly inside an object, the next call must
    /// be a key again.
    fn value_emitted(&mut self) {
        if self.stack.peek() == Some(Frame::Object) {
            self.key_next = true;
        }
    }

    pub fn null(&mut self) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        self.sink.null()?;
        self.value_emitted();
        Ok(())
    }

    pub fn boolean(&mut self, value: bool) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        self.sink.boolean(value)?;
        self.value_emitted();
        Ok(())
    }

    pub fn integer(&mut self, value: i64) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        self.sink.integer(value)?;
        self.value_emitted();
        Ok(())
    }

    pub fn real(&mut self, value: f64) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        self.sink.real(value)?;
        self.value_emitted();
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        self.sink.string(value)?;
        self.value_emitted();
        Ok(())
    }

    pub fn key(&mut self, value: &str) -> Result<(), Error> {
        self.count += 1;
        if self.validate && (self.stack.peek() != Some(Frame::Object) || !self.key_next) {
            return Err(Error::ExpectedValue {
                event_index: self.count,
            });
        }
        self.key_next = false;
        self.sink.key(value)
    }

    pub fn begin_array(&mut self) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        if self.validate {
            self.stack.push(Frame::Array, self.count)?;
        }
        self.key_next = false;
        self.sink.begin_array()
    }

    pub fn begin_object(&mut self) -> Result<(), Error> {
        self.count += 1;
        self.cannot_value()?;
        if self.validate {
            self.stack.push(Frame::Object, self.count)?;
        }
        self.key_next = true;
        self.sink.begin_object()
    }

    pub fn end_array(&mut self) -> Result<(), Error> {
        self.count += 1;
        self.close_container(Frame::Array)?;
        self.sink.end_array()?;
        self.value_emitted();
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), Error> {
        self.count += 1;
        self.close_container(Frame::Object)?;
        self.sink.end_object()?;
        self.value_emitted();
        Ok(())
    }

    fn close_container(&mut self, expected: Frame) -> Result<(), Error> {
        if !self.validate {
            return Ok(());
        }
        match self.stack.peek() {
            None => {
                return Err(Error::StackUnderflow {
                    position: self.count,
                })
            }
            Some(top) if top != expected => {
                return Err(if expected == Frame::Array {
                    Error::NoArray {
                        event_index: self.count,
                    }
                } else {
                    Error::NoObject {
                        event_index: self.count,
                    }
                });
            }
            Some(Frame::Object) if !self.key_next => {
                return Err(Error::ExpectedValue {
                    event_index: self.count,
                });
            }
            _ => {}
        }
        self.stack.pop(self.count)?;
        Ok(())
    }
}

//! Arena-backed DOM back-end, grounded on `original_source/src/dom.c`.
//!
//! [`DomBuilder`] implements [`GeneratorSink`] by recording each call into a
//! [`bumpalo::Bump`] arena rather than the heap: values never move once
//! allocated, so string slices borrowed from the arena stay valid for the
//! arena's whole lifetime, matching `dom.c`'s append-only chunk allocator.
//! [`replay`] walks a built [`Value`] back through any other
//! [`GeneratorSink`], e.g. to re-print a DOM or re-validate it through a
//! fresh [`super::Generator`].

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;

use crate::error::Error;
use crate::generator::GeneratorSink;

/// A JSON value tree allocated entirely out of a [`Bump`] arena.
#[derive(Debug)]
pub enum Value<'bump> {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(&'bump str),
    Array(BumpVec<'bump, Value<'bump>>),
    Object(BumpVec<'bump, (&'bump str, Value<'bump>)>),
}

enum Frame<'bump> {
    Array(BumpVec<'bump, Value<'bump>>),
    Object(BumpVec<'bump, (&'bump str, Value<'bump>)>),
}

/// Builds a [`Value`] tree from a stream of generator calls. The calls are
/// assumed to already be validated (normally by routing them through a
/// [`super::Generator`] first), so this type does no structural checking of
/// its own - it just records what it's told.
pub struct DomBuilder<'bump> {
    bump: &'bump Bump,
    stack: Vec<Frame<'bump>>,
    pending_key: Option<&'bump str>,
    root: Option<Value<'bump>>,
}

impl<'bump> DomBuilder<'bump> {
    pub fn new(bump: &'bump Bump) -> Self {
        DomBuilder {
            bump,
            stack: Vec::new(),
            pending_key: None,
            root: None,
        }
    }

    /// Take the finished tree. `None` if no top-level value was ever
    /// emitted, or if a container is still open.
    pub fn finish(self) -> Option<Value<'bump>> {
        self.root
    }

    fn push_value(&mut self, value: Value<'bump>) {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(items)) => {
                let key = self
                    .pending_key
                    .take()
                    .expect("generator validation guarantees a key precedes every object value");
                items.push((key, value));
            }
            None => self.root = Some(value),
        }
    }
}

impl<'bump> GeneratorSink for DomBuilder<'bump> {
    fn null(&mut self) -> Result<(), Error> {
        self.push_value(Value::Null);
        Ok(())
    }

    fn boolean(&mut self, value: bool) -> Result<(), Error> {
        self.push_value(Value::Boolean(value));
        Ok(())
    }

    fn integer(&mut self, value: i64) -> Result<(), Error> {
        self.push_value(Value::Integer(value));
        Ok(())
    }

    fn real(&mut self, value: f64) -> Result<(), Error> {
        self.push_value(Value::Real(value));
        Ok(())
    }

    fn string(&mut self, value: &str) -> Result<(), Error> {
        let s = self.bump.alloc_str(value);
        self.push_value(Value::String(s));
        Ok(())
    }

    fn key(&mut self, value: &str) -> Result<(), Error> {
        self.pending_key = Some(self.bump.alloc_str(value));
        Ok(())
    }

    fn begin_array(&mut self) -> Result<(), Error> {
        self.stack.push(Frame::Array(BumpVec::new_in(self.bump)));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.push_value(Value::Array(items));
        }
        Ok(())
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.stack.push(Frame::Object(BumpVec::new_in(self.bump)));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        if let Some(Frame::Object(items)) = self.stack.pop() {
            self.push_value(Value::Object(items));
        }
        Ok(())
    }
}

/// Replay a built [`Value`] tree into any [`GeneratorSink`] - a printer, or
/// a fresh [`super::Generator`] wrapping one, to re-validate and re-emit it.
pub fn replay<S: GeneratorSink>(value: &Value, sink: &mut S) -> Result<(), Error> {
    match value {
        Value::Null => sink.null(),
        Value::Boolean(b) => sink.boolean(*b),
        Value::Integer(i) => sink.integer(*i),
        Value::Real(r) => sink.real(*r),
        Value::String(s) => sink.string(s),
        Value::Array(items) => {
            sink.begin_array()?;
            for item in items {
                replay(item, sink)?;
            }
            sink.end_array()
        }
        Value::Object(entries) => {
            sink.begin_object()?;
            for (key, value) in entries {
                sink.key(key)?;
                replay(value, sink)?;
            }
            sink.end_object()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::printer::Printer;
    use crate::generator::Generator;

    #[test]
    fn builds_nested_tree() {
        let bump = Bump::new();
        let mut gen = Generator::new(DomBuilder::new(&bump), 32);
        gen.begin_object().unwrap();
        gen.key("name").unwrap();
        gen.string("Elvis").unwrap();
        gen.key("tags").unwrap();
        gen.begin_array().unwrap();
        gen.integer(1).unwrap();
        gen.integer(2).unwrap();
        gen.end_array().unwrap();
        gen.end_object().unwrap();

        let root = gen.into_inner().finish().unwrap();
        match root {
            Value::Object(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, "name");
                assert!(matches!(entries[0].1, Value::String("Elvis")));
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn replay_round_trips_through_printer() {
        let bump = Bump::new();
        let mut gen = Generator::new(DomBuilder::new(&bump), 32);
        gen.begin_array().unwrap();
        gen.string("a").unwrap();
        gen.boolean(false).unwrap();
        gen.null().unwrap();
        gen.end_array().unwrap();
        let root = gen.into_inner().finish().unwrap();

        let mut printer = Printer::compact(Vec::new());
        replay(&root, &mut printer).unwrap();
        assert_eq!(
            String::from_utf8(printer.into_inner()).unwrap(),
            r#"["a",false,null]"#
        );
    }
}

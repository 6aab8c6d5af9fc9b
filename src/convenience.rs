//! One-shot entry points for the common case of "parse this, validate it,
//! hand me the result", grounded on `original_source/src/parse.c`'s
//! `jsonpg_parse_opt`, which takes a variadic bag of options and requires
//! exactly one input source (`fd`/`bytes+count`/`string`/`reader`/`dom`) and
//! exactly one output sink (`callbacks+ctx`/`generator`).
//!
//! That bag doesn't translate directly: Rust has no variadic arguments, and
//! an `Option`-per-field struct would let a caller leave every field `None`
//! or fill in three at once without the type system ever noticing. Instead
//! the input side is an enum ([`ParseInput`]) - exactly one variant is
//! always selected, by construction - and the output side is two separate
//! functions, [`parse_into`] (the `generator` case) and [`run`] (the
//! `callbacks+ctx` case), since they return different things and there's
//! nothing to gain from unifying them behind one signature. The only
//! combination that's still a genuine runtime error rather than something
//! the type system already rules out is [`run`] called with
//! [`ParseInput::Dom`]: a DOM has no underlying [`JsonParser`] to hand to a
//! per-event callback, so that combination reports [`Error::Opt`].

use std::io::Read;

use crate::error::Error;
use crate::event::JsonEvent;
use crate::feeder::SliceJsonFeeder;
use crate::generator::{dom, Generator, GeneratorSink};
use crate::options::JsonParserOptions;
use crate::parser::JsonParser;

/// The one input source a one-shot parse reads from.
pub enum ParseInput<'a> {
    /// A complete in-memory buffer.
    Bytes(&'a [u8]),
    /// A complete in-memory string, known in advance to be valid UTF-8.
    Str(&'a str),
    /// Anything implementing [`Read`]; read to completion before parsing
    /// starts, since a one-shot call has nowhere to suspend to.
    Reader(&'a mut dyn Read),
    /// An already-built DOM tree, replayed as if it had just been parsed.
    /// Only meaningful with [`parse_into`] - see the module docs for why
    /// [`run`] rejects it.
    Dom(&'a dom::Value<'a>),
}

fn read_all(input: ParseInput) -> Result<Vec<u8>, Error> {
    match input {
        ParseInput::Bytes(bytes) => Ok(bytes.to_vec()),
        ParseInput::Str(s) => Ok(s.as_bytes().to_vec()),
        ParseInput::Reader(reader) => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|e| Error::FileRead(e.to_string()))?;
            Ok(buf)
        }
        ParseInput::Dom(_) => unreachable!("callers handle ParseInput::Dom before read_all"),
    }
}

fn forward_event<S: GeneratorSink>(
    parser: &JsonParser<SliceJsonFeeder>,
    generator: &mut Generator<S>,
    event: JsonEvent,
) -> Result<(), Error> {
    match event {
        JsonEvent::NeedMoreInput => Ok(()),
        JsonEvent::StartObject => generator.begin_object(),
        JsonEvent::EndObject => generator.end_object(),
        JsonEvent::StartArray => generator.begin_array(),
        JsonEvent::EndArray => generator.end_array(),
        JsonEvent::FieldName => generator.key(parser.current_str()?),
        JsonEvent::ValueString => generator.string(parser.current_str()?),
        JsonEvent::ValueInt => generator.integer(
            parser
                .current_int::<i64>()
                .map_err(|_| Error::Number {
                    position: parser.parsed_bytes(),
                })?,
        ),
        JsonEvent::ValueFloat => generator.real(
            parser
                .current_float()
                .map_err(|_| Error::Number {
                    position: parser.parsed_bytes(),
                })?,
        ),
        JsonEvent::ValueTrue => generator.boolean(true),
        JsonEvent::ValueFalse => generator.boolean(false),
        JsonEvent::ValueNull => generator.null(),
    }
}

/// Parse `input` in one shot and forward every event through a validating
/// [`Generator`] into `sink`, returning the sink back once the document (or,
/// in streaming mode, the whole input) is exhausted.
///
/// ```
/// use actson::convenience::{parse_into, ParseInput};
/// use actson::generator::printer::Printer;
/// use actson::options::JsonParserOptions;
///
/// let sink = Printer::compact(Vec::new());
/// let sink = parse_into(
///     ParseInput::Str(r#"{"name": "Elvis"}"#),
///     JsonParserOptions::default(),
///     sink,
/// )
/// .unwrap();
/// assert_eq!(sink.into_inner(), br#"{"name":"Elvis"}"#);
/// ```
pub fn parse_into<S: GeneratorSink>(
    input: ParseInput,
    options: JsonParserOptions,
    sink: S,
) -> Result<S, Error> {
    match input {
        ParseInput::Dom(value) => {
            let mut sink = sink;
            dom::replay(value, &mut sink)?;
            Ok(sink)
        }
        other => {
            let bytes = read_all(other)?;
            let mut parser = JsonParser::new_with_options(SliceJsonFeeder::new(&bytes), options);
            let mut generator = Generator::new(sink, options.max_depth());
            while let Some(event) = parser.next_event()? {
                forward_event(&parser, &mut generator, event)?;
            }
            Ok(generator.into_inner())
        }
    }
}

/// Parse `input` in one shot, calling `on_event` for every event with a
/// reference to the parser so the callback can pull out the current string,
/// number, and so on. `on_event` plays the role of the C original's
/// `ctx`-carrying callback: whatever state it needs to accumulate, it
/// captures itself as a closure.
///
/// Returns [`Error::Opt`] if `input` is [`ParseInput::Dom`] - there is no
/// [`JsonParser`] behind a DOM to pass to the callback.
pub fn run(
    input: ParseInput,
    options: JsonParserOptions,
    mut on_event: impl FnMut(&JsonParser<SliceJsonFeeder>, JsonEvent) -> Result<(), Error>,
) -> Result<(), Error> {
    let bytes = match input {
        ParseInput::Dom(_) => {
            return Err(Error::Opt(
                "a DOM input has no underlying parser to pass to a per-event callback; use parse_into instead",
            ))
        }
        other => read_all(other)?,
    };
    let mut parser = JsonParser::new_with_options(SliceJsonFeeder::new(&bytes), options);
    while let Some(event) = parser.next_event()? {
        on_event(&parser, event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::dom::DomBuilder;
    use crate::generator::printer::Printer;
    use bumpalo::Bump;

    #[test]
    fn parse_into_prints_compact_json() {
        let sink = Printer::compact(Vec::new());
        let sink = parse_into(
            ParseInput::Str(r#"{"a": [1, 2, true]}"#),
            JsonParserOptions::default(),
            sink,
        )
        .unwrap();
        assert_eq!(sink.into_inner(), br#"{"a":[1,2,true]}"#);
    }

    #[test]
    fn parse_into_builds_a_dom() {
        let bump = Bump::new();
        let sink = DomBuilder::new(&bump);
        let sink = parse_into(
            ParseInput::Bytes(br#"{"a":1}"#),
            JsonParserOptions::default(),
            sink,
        )
        .unwrap();
        let value = sink.finish().unwrap();
        assert!(matches!(value, dom::Value::Object(_)));
    }

    #[test]
    fn parse_into_reads_from_a_reader() {
        let mut reader: &[u8] = br#"[1,2,3]"#;
        let sink = Printer::compact(Vec::new());
        let sink = parse_into(
            ParseInput::Reader(&mut reader),
            JsonParserOptions::default(),
            sink,
        )
        .unwrap();
        assert_eq!(sink.into_inner(), b"[1,2,3]");
    }

    #[test]
    fn parse_into_replays_a_dom_input() {
        let bump = Bump::new();
        let mut builder = DomBuilder::new(&bump);
        builder.boolean(true).unwrap();
        let value = builder.finish().unwrap();

        let sink = Printer::compact(Vec::new());
        let sink = parse_into(ParseInput::Dom(&value), JsonParserOptions::default(), sink).unwrap();
        assert_eq!(sink.into_inner(), b"true");
    }

    #[test]
    fn run_invokes_the_callback_for_every_event() {
        let mut events = Vec::new();
        run(
            ParseInput::Str(r#"[1,"x"]"#),
            JsonParserOptions::default(),
            |_parser, event| {
                events.push(event);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                JsonEvent::StartArray,
                JsonEvent::ValueInt,
                JsonEvent::ValueString,
                JsonEvent::EndArray,
            ]
        );
    }

    #[test]
    fn run_rejects_a_dom_input() {
        let bump = Bump::new();
        let mut builder = DomBuilder::new(&bump);
        builder.null().unwrap();
        let value = builder.finish().unwrap();

        let result = run(
            ParseInput::Dom(&value),
            JsonParserOptions::default(),
            |_, _| Ok(()),
        );
        assert!(matches!(result, Err(Error::Opt(_))));
    }
}

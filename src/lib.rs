//! # Actson
//!
//! A non-blocking, event-based JSON parser, plus a validating structural
//! generator for writing JSON back out.
//!
//! ## Examples
//!
//! ### Push-based parsing
//!
//! Push-based parsing is the most flexible way of using Actson. Push new bytes
//! into a [`PushJsonFeeder`](crate::feeder::PushJsonFeeder) and then let the
//! parser consume them until it returns
//! `Ok(Some(JsonEvent::NeedMoreInput))`. Repeat this process until you
//! receive `Ok(None)` (end of input) or `Err(_)`.
//!
//! This approach is very low-level but gives you the freedom to provide new
//! bytes to the parser whenever they are available and to generate new JSON
//! events whenever you need them.
//!
//! ```
//! use actson::{JsonParser, JsonEvent};
//! use actson::feeder::{PushJsonFeeder, JsonFeeder};
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//!
//! let mut feeder = PushJsonFeeder::new();
//! let mut parser = JsonParser::new(&mut feeder);
//! let mut i: usize = 0;
//! 'outer: loop {
//!     // feed as many bytes as possible to the parser
//!     loop {
//!         let event = parser.next_event().unwrap();
//!         if event != Some(JsonEvent::NeedMoreInput) {
//!             if event.is_none() {
//!                 break 'outer;
//!             }
//!             // do something useful with `event`
//!             // match event.unwrap() {
//!             //     ...
//!             // }
//!             break;
//!         }
//!         i += parser.feeder.push_bytes(&json[i..]);
//!         if i == json.len() {
//!             parser.feeder.done();
//!         }
//!     }
//! }
//! ```
//!
//! ### Parsing from a `BufReader`
//!
//! [`BufReaderJsonFeeder`](crate::feeder::BufReaderJsonFeeder) allows you to
//! feed the parser from a [`BufReader`](std::io::BufReader). This is useful if
//! you want to parse JSON from a file or a network connection.
//!
//! ```
//! use actson::{JsonParser, JsonEvent};
//!
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("tests/fixtures/pass1.txt").unwrap();
//! let mut reader = BufReader::new(file);
//!
//! let mut feeder = actson::feeder::BufReaderJsonFeeder::new(reader);
//! let mut parser = JsonParser::new(&mut feeder);
//! loop {
//!     let mut event = parser.next_event().unwrap();
//!     if event == Some(JsonEvent::NeedMoreInput) {
//!         parser.feeder.fill_buf().unwrap();
//!         event = parser.next_event().unwrap();
//!     }
//!
//!     // do something useful with `event`
//!     // match event {
//!     //     ...
//!     // }
//!
//!     if event.is_none() {
//!         break;
//!     }
//! }
//! ```
//!
//! ### Parsing a slice of bytes
//!
//! For convenience, [`SliceJsonFeeder`](crate::feeder::SliceJsonFeeder) allows
//! you to feed the parser from a slice of bytes.
//!
//! ```
//! use actson::{JsonParser, JsonEvent};
//! use actson::feeder::SliceJsonFeeder;
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//!
//! let mut feeder = SliceJsonFeeder::new(json);
//! let mut parser = JsonParser::new(&mut feeder);
//! loop {
//!     let event = parser.next_event().unwrap();
//!
//!     // do something useful with `event`
//!     // match event {
//!     //     ...
//!     // }
//!
//!     if event.is_none() {
//!         break;
//!     }
//! }
//! ```
//!
//! ### Accepting non-standard JSON
//!
//! [`JsonParserOptionsBuilder`](crate::options::JsonParserOptionsBuilder) lets
//! you relax the grammar: comments, trailing commas, single-quoted strings,
//! unquoted identifiers, and more. See [`options`] for the full list.
//!
//! ### Parsing into a Serde JSON Value
//!
//! For testing and compatibility reasons, Actson is able to parse a byte slice
//! into a [Serde JSON](https://github.com/serde-rs/json) Value.
//!
//! Heads up: You need to enable the `serde_json` feature for this.
//!
//! ```
//! use actson::serde_json::from_slice;
//!
//! let json = r#"{"name": "Elvis"}"#.as_bytes();
//! let value = from_slice(json).unwrap();
//!
//! assert!(value.is_object());
//! assert_eq!(value["name"], "Elvis");
//! ```
//!
//! However, if you find yourself doing this, you probably don't need the
//! reactive features of Actson and your data seems to completely fit into
//! memory. In this case, you're most likely better off using Serde JSON
//! directly.
mod codec;
pub mod convenience;
mod error;
mod event;
pub mod feeder;
pub mod generator;
pub mod options;
mod parser;
mod reset;
mod stack;
mod token;

#[cfg(feature = "serde_json")]
pub mod serde_json;

#[cfg(feature = "tokio")]
pub mod tokio;

pub use convenience::{parse_into, run, ParseInput};
pub use error::{Error, Utf8InvalidityError};
pub use event::JsonEvent;
pub use parser::JsonParser;

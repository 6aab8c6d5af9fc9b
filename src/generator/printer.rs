//! Compact/pretty JSON text back-end, grounded on
//! `original_source/src/print.c` (`write_utf8`, `print_prefix`,
//! `print_indent`, `print_real`).
//!
//! A single `comma`/`key` pair of flags is enough to track separator state
//! across arbitrarily deep nesting, because [`crate::generator::Generator`]
//! only ever calls a back-end in a strictly nested, single-pass order:
//! `begin_*` resets the flags for the container's first child and `end_*`
//! restores them for whatever comes after, so there is never a need to save
//! and restore per-level state explicitly.

use std::io::Write;

use crate::codec;
use crate::error::Error;
use crate::generator::GeneratorSink;

/// Writes JSON text to any [`Write`] sink, either compact (no extraneous
/// whitespace) or pretty-printed with a configurable indent string.
pub struct Printer<W> {
    writer: W,
    level: usize,
    comma: bool,
    key: bool,
    pretty: bool,
    indent: String,
    /// Suppresses the leading newline before the very first indented line.
    nl: bool,
}

impl<W: Write> Printer<W> {
    /// Compact output: no whitespace beyond what a key's trailing `:`
    /// requires.
    pub fn compact(writer: W) -> Self {
        Printer {
            writer,
            level: 0,
            comma: false,
            key: false,
            pretty: false,
            indent: String::new(),
            nl: false,
        }
    }

    /// Pretty-printed output, indenting nested levels with `indent_width`
    /// spaces.
    pub fn pretty(writer: W, indent_width: usize) -> Self {
        Printer {
            writer,
            level: 0,
            comma: false,
            key: false,
            pretty: true,
            indent: " ".repeat(indent_width),
            nl: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.writer
            .write_all(bytes)
            .map_err(|e| Error::FileWrite(e.to_string()))
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write_bytes(&[byte])
    }

    fn print_indent(&mut self) -> Result<(), Error> {
        if self.nl {
            self.write_byte(b'\n')?;
        } else {
            self.nl = true;
        }
        for _ in 0..self.level {
            self.write_bytes(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn print_prefix(&mut self) -> Result<(), Error> {
        if !self.key {
            if self.comma {
                self.write_byte(b',')?;
            }
            if self.pretty {
                self.print_indent()?;
            }
        }
        self.comma = true;
        self.key = false;
        Ok(())
    }

    fn print_begin_prefix(&mut self) -> Result<(), Error> {
        self.print_prefix()?;
        self.comma = false;
        self.level += 1;
        Ok(())
    }

    fn print_end_prefix(&mut self) -> Result<(), Error> {
        self.level -= 1;
        if self.comma {
            self.comma = false;
            self.print_prefix()?;
        }
        self.comma = true;
        Ok(())
    }

    fn write_escaped_string(&mut self, value: &str) -> Result<(), Error> {
        let bytes = value.as_bytes();
        let mut i = 0;
        let mut last = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b < 0x20 {
                let (rep, len): ([u8; 6], usize) = match b {
                    0x08 => (*b"\\b\0\0\0\0", 2),
                    0x09 => (*b"\\t\0\0\0\0", 2),
                    0x0a => (*b"\\n\0\0\0\0", 2),
                    0x0c => (*b"\\f\0\0\0\0", 2),
                    0x0d => (*b"\\r\0\0\0\0", 2),
                    _ => {
                        let hex = format!("\\u{:04x}", b);
                        let mut buf = [0u8; 6];
                        buf.copy_from_slice(hex.as_bytes());
                        (buf, 6)
                    }
                };
                self.write_bytes(&bytes[last..i])?;
                self.write_bytes(&rep[..len])?;
                i += 1;
                last = i;
            } else if b < 0x80 {
                if b == b'"' || b == b'\\' {
                    self.write_bytes(&bytes[last..i])?;
                    self.write_bytes(&[b'\\', b])?;
                    last = i + 1;
                }
                i += 1;
            } else {
                let seq_len = codec::validate_utf8_sequence(&bytes[i..])
                    .expect("value is a valid &str; multi-byte sequences are well-formed");
                i += seq_len;
            }
        }
        self.write_bytes(&bytes[last..])
    }
}

impl<W: Write> GeneratorSink for Printer<W> {
    fn null(&mut self) -> Result<(), Error> {
        self.print_prefix()?;
        self.write_bytes(b"null")
    }

    fn boolean(&mut self, value: bool) -> Result<(), Error> {
        self.print_prefix()?;
        self.write_bytes(if value { b"true" } else { b"false" })
    }

    fn integer(&mut self, value: i64) -> Result<(), Error> {
        self.print_prefix()?;
        self.write_bytes(value.to_string().as_bytes())
    }

    fn real(&mut self, value: f64) -> Result<(), Error> {
        if !(value == 0.0 || value.is_normal()) {
            return Err(Error::Number {
                position: self.level,
            });
        }
        self.print_prefix()?;
        self.write_bytes(format_real(value).as_bytes())
    }

    fn string(&mut self, value: &str) -> Result<(), Error> {
        self.print_prefix()?;
        self.write_byte(b'"')?;
        self.write_escaped_string(value)?;
        self.write_byte(b'"')
    }

    fn key(&mut self, value: &str) -> Result<(), Error> {
        self.string(value)?;
        self.write_byte(b':')?;
        if self.pretty {
            self.write_byte(b' ')?;
        }
        self.key = true;
        Ok(())
    }

    fn begin_array(&mut self) -> Result<(), Error> {
        self.print_begin_prefix()?;
        self.write_byte(b'[')
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.print_end_prefix()?;
        self.write_byte(b']')
    }

    fn begin_object(&mut self) -> Result<(), Error> {
        self.print_begin_prefix()?;
        self.write_byte(b'{')
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.print_end_prefix()?;
        self.write_byte(b'}')
    }
}

/// Format a real number the way `%.16g` would. Rust's `Display` for `f64`
/// already produces the shortest round-trip-exact decimal digits (at least
/// as precise as 16 significant digits), but it only ever renders fixed
/// notation, whereas `%g` switches to scientific notation once the decimal
/// exponent falls outside `[-4, 16)`. Reuse `{:e}`'s own exponent (rather
/// than computing one with `log10`, which can be off by one right at a
/// power of ten) to decide which of the two Rust already knows how to
/// render is the right one, then append the trailing `.0` that marks a
/// whole-numbered value as a float when neither form already has a `.` or
/// an `e`.
pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        // `{}` alone already renders -0.0 as "-0"; only the trailing ".0"
        // is missing.
        let s = format!("{value}");
        return if s.contains('.') { s } else { format!("{s}.0") };
    }

    let scientific = format!("{value:e}");
    let exponent: i32 = scientific
        .rsplit('e')
        .next()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0);

    let mut s = if (-4..16).contains(&exponent) {
        format!("{value}")
    } else {
        scientific
    };

    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

/// All possible JSON events returned by
/// [`JsonParser::next_event()`](crate::JsonParser::next_event()) or produced
/// for the [structural generator](crate::generator).
///
/// This is the wire vocabulary shared by the parser, the generator, and the
/// DOM replay cursor. Errors and end-of-input are *not* part of this enum:
/// they're carried by `next_event`'s `Result<Option<JsonEvent>, Error>`
/// return type instead (`Ok(None)` is EOF, `Err(_)` is an error), so that a
/// `JsonEvent` value always denotes an actual token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsonEvent {
    /// The parser needs more input before the next event can be produced.
    /// Feed more bytes and call `next_event` again.
    NeedMoreInput,

    /// The start of a JSON object (`{`).
    StartObject,

    /// The end of a JSON object (`}`).
    EndObject,

    /// The start of a JSON array (`[`).
    StartArray,

    /// The end of a JSON array (`]`).
    EndArray,

    /// A field name. Call
    /// [`JsonParser::current_str()`](crate::JsonParser::current_str()) to
    /// get the name.
    FieldName,

    /// A string value. Call
    /// [`JsonParser::current_str()`](crate::JsonParser::current_str()) to
    /// get the value.
    ValueString,

    /// An integer value. Call
    /// [`JsonParser::current_int()`](crate::JsonParser::current_int()) to
    /// get the value.
    ValueInt,

    /// A floating point value. Call
    /// [`JsonParser::current_float()`](crate::JsonParser::current_float())
    /// to get the value.
    ValueFloat,

    /// The boolean value `true`.
    ValueTrue,

    /// The boolean value `false`.
    ValueFalse,

    /// A `null` value.
    ValueNull,
}

use serde_json::{Map, Number, Value};

use crate::feeder::{JsonFeeder, PushJsonFeeder};
use crate::{Error, JsonEvent, JsonParser};

fn to_value<T>(event: JsonEvent, parser: &JsonParser<T>) -> Result<Option<Value>, Error>
where
    T: JsonFeeder,
{
    Ok(match event {
        JsonEvent::ValueString => Some(Value::String(parser.current_str()?.to_string())),

        JsonEvent::ValueInt => Some(Value::Number(
            parser
                .current_int::<i64>()
                .map(Number::from)
                .map_err(|_| Error::Number {
                    position: parser.parsed_bytes(),
                })?,
        )),

        JsonEvent::ValueFloat => Some(Value::Number(
            Number::from_f64(parser.current_float().map_err(|_| Error::Number {
                position: parser.parsed_bytes(),
            })?)
            .ok_or(Error::Number {
                position: parser.parsed_bytes(),
            })?,
        )),

        JsonEvent::ValueTrue => Some(Value::Bool(true)),
        JsonEvent::ValueFalse => Some(Value::Bool(false)),
        JsonEvent::ValueNull => Some(Value::Null),

        _ => None,
    })
}

/// Parse a byte slice into a Serde JSON [Value]
///
/// ```
/// use serde_json::json;
/// use actson::serde_json::from_slice;
///
/// let json = r#"{"name": "Elvis"}"#.as_bytes();
/// let expected = json!({
///     "name": "Elvis"
/// });
/// let actual = from_slice(&json).unwrap();
/// assert_eq!(expected, actual);
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, Error> {
    let mut feeder = PushJsonFeeder::new();
    let mut parser = JsonParser::new(&mut feeder);

    let mut stack: Vec<(Option<String>, Value)> = vec![];
    let mut result = None;
    let mut current_key: Option<String> = None;

    let mut i: usize = 0;
    loop {
        let mut event = parser.next_event()?;
        while event == Some(JsonEvent::NeedMoreInput) {
            i += parser.feeder.push_bytes(&v[i..]);
            if i == v.len() {
                parser.feeder.done();
            }
            event = parser.next_event()?;
        }

        let Some(event) = event else {
            break;
        };

        match event {
            JsonEvent::NeedMoreInput => unreachable!("consumed by the inner loop above"),

            JsonEvent::StartObject | JsonEvent::StartArray => {
                let v = if event == JsonEvent::StartObject {
                    Value::Object(Map::new())
                } else {
                    Value::Array(vec![])
                };
                stack.push((current_key.take(), v));
            }

            JsonEvent::EndObject | JsonEvent::EndArray => {
                let v = stack.pop().expect("generator never unbalances brackets");
                if let Some((_, top)) = stack.last_mut() {
                    if let Some(m) = top.as_object_mut() {
                        m.insert(v.0.expect("object entries always have a key"), v.1);
                    } else if let Some(a) = top.as_array_mut() {
                        a.push(v.1);
                    }
                } else {
                    result = Some(v.1);
                }
            }

            JsonEvent::FieldName => current_key = Some(parser.current_str()?.to_string()),

            JsonEvent::ValueString
            | JsonEvent::ValueInt
            | JsonEvent::ValueFloat
            | JsonEvent::ValueTrue
            | JsonEvent::ValueFalse
            | JsonEvent::ValueNull => {
                let value = to_value(event, &parser)?.expect("matched arm always yields a value");
                if let Some((_, top)) = stack.last_mut() {
                    if let Some(m) = top.as_object_mut() {
                        m.insert(
                            current_key.take().expect("object values follow a key"),
                            value,
                        );
                    } else if let Some(a) = top.as_array_mut() {
                        a.push(value);
                    }
                } else {
                    result = Some(value);
                }
            }
        }
    }

    result.ok_or(Error::NoMoreInput)
}

#[cfg(test)]
mod test {
    use crate::serde_json::from_slice;
    use serde_json::{from_slice as serde_from_slice, Value};

    /// Test that an empty object is parsed correctly
    #[test]
    fn empty_object() {
        let json = r#"{}"#.as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that a simple object is parsed correctly
    #[test]
    fn simple_object() {
        let json = r#"{"name": "Elvis"}"#.as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that an empty array is parsed correctly
    #[test]
    fn empty_array() {
        let json = r#"[]"#.as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that a simple array is parsed correctly
    #[test]
    fn simple_array() {
        let json = r#"["Elvis", "Max"]"#.as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that an array with mixed values is parsed correctly
    #[test]
    fn mixed_array() {
        let json = r#"["Elvis", 132, "Max", 80.67]"#.as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that embedded objects is parsed correctly
    #[test]
    fn embedded_objects() {
        let json = r#"{
            "name": "Elvis",
            "address": {"street": "Graceland", "city": "Memphis"},
            "albums": [
                "Elvis Presley",
                "Elvis",
                "Elvis' Christmas Album",
                "Elvis Is Back!",
                {
                    "title": "His Hand in Mine",
                    "year": 1960
                },
                "... any many others :)"
            ]
        }"#
        .as_bytes();
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap()
        );
    }

    /// Test that a syntax error is reported instead of panicking
    #[test]
    fn syntax_error_is_reported() {
        let json = r#"{"name": }"#.as_bytes();
        assert!(from_slice(json).is_err());
    }
}

use actson::feeder::PushJsonFeeder;
use actson::{JsonEvent, JsonParser};

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let feeder = PushJsonFeeder::new();
        let mut parser = JsonParser::new(feeder);
        let mut i: usize = 0;
        'outer: loop {
            let mut e = match parser.next_event() {
                Ok(e) => e,
                Err(_) => break,
            };

            while e == Some(JsonEvent::NeedMoreInput) {
                i += parser.feeder.push_bytes(&data[i..]);
                if i == data.len() {
                    parser.feeder.done();
                }
                e = match parser.next_event() {
                    Ok(e) => e,
                    Err(_) => break 'outer,
                };
            }

            if e.is_none() {
                break;
            }
        }
    });
}

// Request body templates
//
// Create/delete bodies start from the schema's XML example and have a
// single element's text replaced. Everything else in the example is passed
// through untouched, so richer templates from a custom RAML file survive.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesText, Event};

use crate::error::Error;

/// Replace the text of the element at `path` (root first) with `value`.
///
/// Fails if the template is not well-formed XML or never contains `path`.
pub fn populate(template: &str, path: &[&str], value: &str) -> Result<String, Error> {
    let mut reader = Reader::from_str(template);
    let mut writer = Writer::new(Vec::with_capacity(template.len() + value.len()));

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut in_target = false;
    let mut wrote_value = false;
    let mut found = false;

    let at_target = |stack: &[Vec<u8>]| {
        stack.len() == path.len()
            && stack
                .iter()
                .zip(path)
                .all(|(have, want)| have.as_slice() == want.as_bytes())
    };

    loop {
        let event = reader.read_event().map_err(|e| template_error(&e))?;
        match event {
            Event::Eof => break,
            Event::Start(start) => {
                stack.push(start.local_name().as_ref().to_vec());
                if at_target(&stack) {
                    in_target = true;
                    wrote_value = false;
                    found = true;
                }
                write(&mut writer, Event::Start(start))?;
            }
            Event::End(end) => {
                if in_target && at_target(&stack) {
                    if !wrote_value {
                        write(&mut writer, Event::Text(BytesText::new(value)))?;
                    }
                    in_target = false;
                }
                stack.pop();
                write(&mut writer, Event::End(end))?;
            }
            Event::Empty(start) => {
                stack.push(start.local_name().as_ref().to_vec());
                if at_target(&stack) {
                    found = true;
                    let end = start.to_end().into_owned();
                    write(&mut writer, Event::Start(start))?;
                    write(&mut writer, Event::Text(BytesText::new(value)))?;
                    write(&mut writer, Event::End(end))?;
                } else {
                    write(&mut writer, Event::Empty(start))?;
                }
                stack.pop();
            }
            Event::Text(_) | Event::CData(_) if in_target => {
                if !wrote_value {
                    write(&mut writer, Event::Text(BytesText::new(value)))?;
                    wrote_value = true;
                }
            }
            other => write(&mut writer, other)?,
        }
    }

    if !found {
        return Err(Error::Schema {
            message: format!("request template has no <{}> element", path.join("/")),
        });
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Schema {
        message: format!("request template is not UTF-8: {e}"),
    })
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), Error> {
    writer.write_event(event).map_err(|e| template_error(&e))
}

fn template_error(e: &impl std::fmt::Display) -> Error {
    Error::Schema {
        message: format!("malformed request template: {e}"),
    }
}

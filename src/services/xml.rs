// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! XML to generic tree conversion for fantasy API responses.
//!
//! Conversion rules:
//! - an element with only text becomes a string (empty element: `""`)
//! - attributes become `-name` keys
//! - text next to attributes or children goes under `#content`
//! - repeated sibling elements collapse into an array, in document order

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Envelope element wrapping every fantasy API response.
pub const ENVELOPE: &str = "fantasy_content";

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, AppError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| invalid(format!("bad attribute in <{}>: {}", name, e)))?;
            let key = format!("-{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr
                .unescape_value()
                .map_err(|e| invalid(format!("bad attribute value in <{}>: {}", name, e)))?;
            fields.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim().to_string();
        if self.fields.is_empty() {
            return (self.name, Value::String(text));
        }
        let mut fields = self.fields;
        if !text.is_empty() {
            fields.insert("#content".to_string(), Value::String(text));
        }
        (self.name, Value::Object(fields))
    }

    fn attach(&mut self, name: String, value: Value) {
        match self.fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::Mapping(format!("invalid XML: {}", msg.into()))
}

fn finish(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    frame: Frame,
) -> Result<(), AppError> {
    let (name, value) = frame.close();
    match stack.last_mut() {
        Some(parent) => parent.attach(name, value),
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(invalid("multiple root elements")),
    }
    Ok(())
}

/// Convert an XML document into `{root_name: tree}`.
pub fn xml_to_tree(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(invalid("empty XML input"));
    }

    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(invalid("multiple root elements"));
                }
                stack.push(Frame::open(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let frame = Frame::open(&start)?;
                finish(&mut stack, &mut root, frame)?;
            }
            Ok(Event::End(_)) => {
                let frame = stack.pop().ok_or_else(|| invalid("unexpected end tag"))?;
                finish(&mut stack, &mut root, frame)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| invalid(format!("bad text: {}", e)))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(invalid("text outside root element")),
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, processing instructions
            Err(e) => {
                return Err(invalid(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(invalid(format!("unclosed element <{}>", open.name)));
    }

    let (name, value) = root.ok_or_else(|| invalid("no root element"))?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

/// Strip the `fantasy_content` envelope.
pub fn unwrap_envelope(doc: Value) -> Result<Value, AppError> {
    match doc {
        Value::Object(mut map) => match map.remove(ENVELOPE) {
            Some(inner @ Value::Object(_)) => Ok(inner),
            _ => Err(AppError::Mapping(format!("missing or invalid '{}'", ENVELOPE))),
        },
        _ => Err(AppError::Mapping(format!("missing or invalid '{}'", ENVELOPE))),
    }
}

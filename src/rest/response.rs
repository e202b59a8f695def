/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Decodes the REST response body into a generic [`serde_json::Value`] tree.
//!
//! Attributes and child elements both become keys of the element's map. Repeated
//! children become an array, a single child stays a bare value. Text of an element
//! without attributes or children collapses to a string, otherwise it is kept
//! under the `content` key. The root `<rsp>` element is dropped, so the top level
//! map holds `stat` plus the method specific payload.
//!
//! Because a single child is never forced into an array, anything reading a list
//! field must go through [`as_list`].

use crate::rest::errors::FlickrError;
use quick_xml::{Reader, events::BytesStart, events::Event};
use serde_json::{Map, Value};

pub type ApiResponse = Map<String, Value>;

// Key used for element text that sits next to attributes
pub const CONTENT_KEY: &str = "content";

/// Parses the body and fails with [`FlickrError::ApiResponse`] unless `stat` is `ok`.
pub fn decode(body: &str) -> Result<ApiResponse, FlickrError> {
    let response = xml_to_map(body)?;
    match response.get("stat").and_then(Value::as_str) {
        Some("ok") => Ok(response),
        Some(_) => {
            let err = response.get("err");
            let code: u32 = err
                .and_then(|e| e.get("code"))
                .and_then(text_of)
                .and_then(|c| c.parse().ok())
                .unwrap_or_default();
            let msg = err
                .and_then(|e| e.get("msg"))
                .and_then(text_of)
                .unwrap_or_default();
            Err(FlickrError::ApiResponse(code, msg))
        }
        None => Err(FlickrError::ApiResponseMalformed(
            "missing stat attribute".to_string(),
        )),
    }
}

/// Normalizes a possibly single valued field into a list.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(v) => vec![v],
    }
}

/// Owned flavour of [`as_list`], used when the children are handed to entities.
pub fn into_list(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(v) => vec![v],
    }
}

/// Scalar text of a value, reading through `{"content": ...}` wrappers.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get(CONTENT_KEY).and_then(text_of),
        _ => None,
    }
}

/// Looks up a nested path below a value
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |v, k| v.get(*k))
}

/// Looks up a nested path in a response, e.g. `["photo", "owner", "nsid"]`.
pub fn field<'a>(response: &'a ApiResponse, keys: &[&str]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    path(response.get(*first)?, rest)
}

/// Like [`field`] but the path must be present
pub fn require<'a>(response: &'a ApiResponse, keys: &[&str]) -> Result<&'a Value, FlickrError> {
    field(response, keys).ok_or_else(|| FlickrError::ResponseMissing(keys.join(".")))
}

/// Moves the map at the given path out of the response
pub fn take_map(
    response: &mut ApiResponse,
    keys: &[&str],
) -> Result<Map<String, Value>, FlickrError> {
    let missing = || FlickrError::ResponseMissing(keys.join("."));
    let (first, rest) = keys.split_first().ok_or_else(missing)?;
    let mut value = response.get_mut(*first).ok_or_else(missing)?;
    for key in rest {
        value = value.get_mut(*key).ok_or_else(missing)?;
    }
    match value.take() {
        Value::Object(map) => Ok(map),
        _ => Err(missing()),
    }
}

/// Text of every entry of a possibly single valued list field
pub fn texts(value: Option<&Value>) -> Vec<String> {
    as_list(value).into_iter().filter_map(text_of).collect()
}

struct Element {
    name: String,
    map: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart) -> Result<Self, FlickrError> {
        let mut map = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                FlickrError::ApiResponseMalformed(format!("Failed to parse XML attribute: {e}"))
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| {
                    FlickrError::ApiResponseMalformed(format!("Failed to decode XML value: {e}"))
                })?
                .into_owned();
            map.insert(key, Value::String(value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            map,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.map.is_empty() {
            if text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut map = self.map;
            if !text.is_empty() {
                map.insert(CONTENT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(map)
        };
        (self.name, value)
    }
}

fn attach(parent: &mut Element, name: String, value: Value) {
    match parent.map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.map.insert(name, value);
        }
    }
}

fn xml_to_map(xml: &str) -> Result<ApiResponse, FlickrError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(Element::open(&e)?),
            Ok(Event::Empty(e)) => {
                let (name, value) = Element::open(&e)?.close();
                match stack.last_mut() {
                    Some(parent) => attach(parent, name, value),
                    None => return root_map(value),
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape().map_err(|e| {
                        FlickrError::ApiResponseMalformed(format!("Failed to decode XML text: {e}"))
                    })?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    FlickrError::ApiResponseMalformed("unbalanced closing tag".to_string())
                })?;
                let (name, value) = element.close();
                match stack.last_mut() {
                    Some(parent) => attach(parent, name, value),
                    None => return root_map(value),
                }
            }
            Ok(Event::Eof) => {
                return Err(FlickrError::ApiResponseMalformed(
                    "No root element found in response".to_string(),
                ));
            }
            Err(e) => {
                return Err(FlickrError::ApiResponseMalformed(format!(
                    "Failed to read response XML: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn root_map(value: Value) -> Result<ApiResponse, FlickrError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(FlickrError::ApiResponseMalformed(
            "root element has no attributes".to_string(),
        )),
    }
}

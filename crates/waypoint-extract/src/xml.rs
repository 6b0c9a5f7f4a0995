//! XML bodies decoded into `serde_json::Value` trees.
//!
//! The document element becomes an object: child elements are keyed by tag
//! name (repeated tags collect into an array), attributes sit under
//! `"@attributes"`, and an element holding only text becomes a string.
//! Text next to child elements or attributes is kept under `"#text"`.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::{ExtractionError, ExtractionSource};

const ATTRIBUTES_KEY: &str = "@attributes";
const TEXT_KEY: &str = "#text";

struct Element {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, ExtractionError> {
        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(malformed)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(malformed)?;
            attributes.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(self.text)
            };
        }

        let mut object = Map::new();
        if !self.attributes.is_empty() {
            object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        object.extend(self.children);
        if !self.text.is_empty() {
            object.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        Value::Object(object)
    }
}

fn malformed(err: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::deserialization_failed(ExtractionSource::Body, format!("invalid XML: {err}"))
}

/// Closes `element`; returns the document value once the root closes.
fn close(stack: &mut Vec<Element>, element: Element) -> Option<Value> {
    let name = element.name.clone();
    let value = element.into_value();
    match stack.last_mut() {
        Some(parent) => {
            parent.add_child(name, value);
            None
        }
        None => Some(value),
    }
}

/// Parses an XML document into its root element's value.
pub(crate) fn parse(text: &str) -> Result<Value, ExtractionError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                if let Some(root) = close(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| malformed("unexpected closing tag"))?;
                if let Some(root) = close(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::Text(content) => {
                if let Some(element) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&content);
                    let decoded = unescape(&raw).map_err(malformed)?;
                    element.text.push_str(decoded.trim());
                }
            }
            Event::CData(content) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::Eof if stack.is_empty() => return Err(malformed("no root element")),
            Event::Eof => return Err(malformed("unclosed element")),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only_children_become_strings() {
        let value = parse("<note><to>Ana</to><from>Bo</from></note>").unwrap();
        assert_eq!(value, json!({"to": "Ana", "from": "Bo"}));
    }

    #[test]
    fn test_repeated_children_collect_into_array() {
        let value = parse("<cart><item>1</item><item>2</item><item>3</item></cart>").unwrap();
        assert_eq!(value, json!({"item": ["1", "2", "3"]}));
    }

    #[test]
    fn test_attributes_and_entities() {
        let value = parse(r#"<user id="7" role="a&amp;b"><name>Tom &lt;3</name><flag/></user>"#).unwrap();
        assert_eq!(
            value,
            json!({
                "@attributes": {"id": "7", "role": "a&b"},
                "name": "Tom <3",
                "flag": {}
            })
        );
    }

    #[test]
    fn test_prolog_whitespace_and_cdata() {
        let text = "<?xml version=\"1.0\"?>\n<doc>\n  <body><![CDATA[<b>raw</b>]]></body>\n</doc>\n";
        assert_eq!(parse(text).unwrap(), json!({"body": "<b>raw</b>"}));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(parse("").is_err());
        assert!(parse("just text").is_err());
        assert!(parse("<a><b></a>").is_err());
    }
}

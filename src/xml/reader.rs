// SPDX-License-Identifier: MIT
//! Parse XML documents into [`Element`] trees

use std::io::Read;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Element, XmlError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode document bytes as UTF-8, dropping a leading byte-order mark
pub fn decode_document(bytes: Vec<u8>) -> Result<String, XmlError> {
    let bytes = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_vec(),
        None => bytes,
    };
    Ok(String::from_utf8(bytes)?)
}

/// Parse raw document bytes (BOM tolerant)
pub fn parse_bytes(bytes: &[u8]) -> Result<Element, XmlError> {
    parse_str(&decode_document(bytes.to_vec())?)
}

/// Read a whole stream and parse it (BOM tolerant)
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Element, XmlError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_str(&decode_document(buf)?)
}

/// Parse document text and return its root element
///
/// Comments inside the root are preserved as comment nodes; declarations,
/// processing instructions and anything outside the root are dropped.
pub fn parse_str(text: &str) -> Result<Element, XmlError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(open_element(&e)?),
            Event::Empty(e) => {
                let element = open_element(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml checks end-tag names, so the stack is balanced here
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_text(&mut stack, &text);
            }
            Event::Comment(c) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push(Element::comment(String::from_utf8_lossy(&c).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(XmlError::NoRoot)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let tag = String::from_utf8(start.name().as_ref().to_vec())?;
    let mut element = Element::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr.unescape_value()?;
        element.set(key, value.into_owned());
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Route character data to the open element's text, or to the tail of its
/// most recent child
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };

    let slot = match parent.nodes().len() {
        0 => parent.text_slot(),
        n => parent.nodes_mut()[n - 1].tail_slot(),
    };

    match slot {
        Some(existing) => existing.push_str(text),
        None => *slot = Some(text.to_string()),
    }
}

// SPDX-License-Identifier: MIT
//! Render [`Element`] trees and pretty-print them

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{Element, NodeKind, XmlError};

/// Write `root` as a complete UTF-8 document with an XML declaration
pub fn write_document<W: Write>(root: &Element, out: W) -> Result<(), XmlError> {
    let mut writer = Writer::new(out);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    write_node(&mut writer, root)?;
    Ok(())
}

/// Render `root` as a document string
pub fn render_to_string(root: &Element) -> Result<String, XmlError> {
    let mut buffer = Vec::new();
    write_document(root, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Element) -> Result<(), XmlError> {
    match node.kind() {
        NodeKind::Comment => {
            let body = node.text().unwrap_or_default();
            writer.write_event(Event::Comment(BytesText::from_escaped(body)))?;
        }
        NodeKind::Element => {
            let mut start = BytesStart::new(node.tag());
            for (key, value) in node.attributes() {
                start.push_attribute((key, value));
            }

            let text = node.text().filter(|t| !t.is_empty());
            if node.nodes().is_empty() && text.is_none() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                if let Some(text) = text {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
                for child in node.nodes() {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(node.tag())))?;
            }
        }
    }

    if let Some(tail) = node.tail().filter(|t| !t.is_empty()) {
        writer.write_event(Event::Text(BytesText::new(tail)))?;
    }

    Ok(())
}

/// Inject two-space indentation into blank `text`/`tail` slots
///
/// Slots holding non-whitespace character data are never touched.
pub fn indent(root: &mut Element) {
    indent_at(root, 0);
}

fn is_blank(slot: Option<&str>) -> bool {
    slot.map_or(true, |s| s.trim().is_empty())
}

fn indent_at(element: &mut Element, level: usize) {
    let pad = format!("\n{}", "  ".repeat(level));

    if element.nodes().is_empty() {
        if level > 0 && is_blank(element.tail()) {
            element.set_tail(pad);
        }
        return;
    }

    if is_blank(element.text()) {
        element.set_text(format!("{pad}  "));
    }
    if is_blank(element.tail()) {
        element.set_tail(pad.clone());
    }

    for child in element.nodes_mut().iter_mut() {
        indent_at(child, level + 1);
    }

    if let Some(last) = element.nodes_mut().last_mut() {
        if is_blank(last.tail()) {
            last.set_tail(pad);
        }
    }
}

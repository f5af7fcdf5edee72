// SPDX-License-Identifier: MIT
//! Directive-driven serialization, merge and deserialization

use tracing::trace;

use super::directive::{DirectiveMode, FieldDirective};
use super::record::{ListSlot, Slot, SlotMut, XmlRecord, XmlUnion};
use super::value::XmlValue;
use crate::xml::{Element, XmlError};

/// Directives of `R` in lexicographic field-name order
///
/// This order decides the order in which new child elements are appended.
pub fn ordered_directives<R: XmlRecord>() -> Vec<&'static FieldDirective> {
    let mut directives: Vec<&'static FieldDirective> = R::directives().iter().collect();
    directives.sort_by_key(|d| d.field);
    directives
}

/// Serialize `record` into `element`, merging with whatever it already holds
pub fn serialize_into<R: XmlRecord>(record: &R, element: &mut Element) -> Result<(), XmlError> {
    let directives = ordered_directives::<R>();

    for directive in &directives {
        let slot = record
            .field(directive.field)
            .ok_or(XmlError::FieldAccess(directive.field))?;

        match (directive.mode, slot) {
            (_, Slot::Value(value)) => write_value(element, directive, value)?,

            (DirectiveMode::InnerOf(tag), Slot::Inner(inner)) => {
                if let Some(nested) = inner.record() {
                    match element.find_mut(tag) {
                        Some(child) => nested.serialize_into(child)?,
                        None => element.push(nested.build_element()?),
                    }
                }
            }

            (DirectiveMode::WrappedInnerOf(tag), Slot::Inner(inner)) => {
                if let Some(nested) = inner.record() {
                    let wrapper = element.find_or_insert(tag);
                    match wrapper.first_child_mut() {
                        Some(child) => nested.serialize_into(child)?,
                        None => wrapper.push(nested.build_element()?),
                    }
                }
            }

            (DirectiveMode::NamespaceToAttributes(prefix), Slot::Namespace(map)) => {
                for (key, value) in map.iter() {
                    element.set(format!("{prefix}{key}"), value);
                }
            }

            (DirectiveMode::InnerList, Slot::List(list)) => merge_list(element, list)?,

            (DirectiveMode::WrappedInnerList(tag), Slot::List(list)) => {
                if !list.is_empty() || directive.emit_even_if_empty || element.find(tag).is_some() {
                    let wrapper = element.find_or_insert(tag);
                    merge_list(wrapper, list)?;
                }
            }

            _ => return Err(XmlError::FieldAccess(directive.field)),
        }
    }

    Ok(())
}

fn write_value(
    element: &mut Element,
    directive: &FieldDirective,
    value: &dyn XmlValue,
) -> Result<(), XmlError> {
    let Some(text) = value.to_xml_text() else {
        return Ok(());
    };
    if text.is_empty() && !directive.emit_even_if_empty {
        return Ok(());
    }
    if directive.omit_if_zero && value.is_zero() {
        return Ok(());
    }

    match directive.mode {
        DirectiveMode::AttributeOf(name) => element.set(name, text),
        DirectiveMode::TextElementOf(tag) => element.find_or_insert(tag).set_text(text),
        _ => return Err(XmlError::FieldAccess(directive.field)),
    }
    Ok(())
}

/// Serialize list entries into `container`
///
/// Only children the list's candidate types claim count as list elements.
/// With none present the entries are appended. Otherwise the counts must agree
/// and entries are merged positionally; there is no way to align insertions or
/// deletions against a foreign tree.
fn merge_list(container: &mut Element, list: &dyn ListSlot) -> Result<(), XmlError> {
    let existing = container.children().filter(|c| list.claims(c)).count();

    if existing == 0 {
        for index in 0..list.len() {
            if let Some(entry) = list.entry(index) {
                container.push(entry.build_element()?);
            }
        }
        return Ok(());
    }

    if existing != list.len() {
        return Err(XmlError::MergeMismatch(format!(
            "<{}> holds {} list elements but the list has {} entries",
            container.tag(),
            existing,
            list.len()
        )));
    }

    for (index, child) in container.children_mut().filter(|c| list.claims(c)).enumerate() {
        let entry = list
            .entry(index)
            .ok_or_else(|| XmlError::MergeMismatch(format!("list entry {index} vanished")))?;

        if child.tag() != entry.xml_tag() {
            return Err(XmlError::MergeMismatch(format!(
                "expected <{}> at list position {}, found <{}>",
                entry.xml_tag(),
                index,
                child.tag()
            )));
        }
        entry.serialize_into(child)?;
    }

    Ok(())
}

/// Build a fresh `R` from `element`
pub fn from_element<R: XmlRecord>(element: &Element) -> Result<R, XmlError> {
    if element.tag() != R::TAG {
        return Err(XmlError::TypeMismatch {
            expected: R::TAG.to_string(),
            found: element.tag().to_string(),
        });
    }

    let mut record = R::default();

    for directive in ordered_directives::<R>() {
        let slot = record
            .field_mut(directive.field)
            .ok_or(XmlError::FieldAccess(directive.field))?;

        match (directive.mode, slot) {
            (DirectiveMode::AttributeOf(name), SlotMut::Value(value)) => {
                if let Some(text) = element.get(name) {
                    value.set_from_xml_text(text)?;
                }
            }

            (DirectiveMode::TextElementOf(tag), SlotMut::Value(value)) => {
                let text = element.find(tag).and_then(Element::text);
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    value.set_from_xml_text(text)?;
                }
            }

            (DirectiveMode::InnerOf(tag), SlotMut::Inner(inner)) => {
                if let Some(child) = element.find(tag) {
                    inner.load(child)?;
                }
            }

            (DirectiveMode::WrappedInnerOf(tag), SlotMut::Inner(inner)) => {
                if let Some(child) = element.find(tag).and_then(Element::first_child) {
                    inner.load(child)?;
                }
            }

            (DirectiveMode::NamespaceToAttributes(prefix), SlotMut::Namespace(map)) => {
                for (key, value) in element.attributes() {
                    if let Some(key) = key.strip_prefix(prefix).filter(|k| !k.is_empty()) {
                        map.set(key, value);
                    }
                }
            }

            (DirectiveMode::InnerList, SlotMut::List(list)) => {
                for child in element.children() {
                    list.load_child(child)?;
                }
            }

            (DirectiveMode::WrappedInnerList(tag), SlotMut::List(list)) => {
                if let Some(wrapper) = element.find(tag) {
                    for child in wrapper.children() {
                        list.load_child(child)?;
                    }
                }
            }

            _ => return Err(XmlError::FieldAccess(directive.field)),
        }
    }

    Ok(record)
}

/// Resolve one child element against a union's candidate table
///
/// Candidates are keyed by tag and refined by their `matches` predicate, in
/// declaration order. An element no candidate claims yields `Ok(None)`; an
/// element claimed by candidates that all fail to parse is an error.
pub(crate) fn parse_union_child<U: XmlUnion>(element: &Element) -> Result<Option<U>, XmlError> {
    let mut failure: Option<XmlError> = None;

    for candidate in U::candidates().iter().filter(|c| c.accepts(element)) {
        match (candidate.parse)(element) {
            Ok(item) => return Ok(Some(item)),
            Err(e) => failure = Some(e),
        }
    }

    match failure {
        Some(e) => Err(XmlError::PolymorphicMatch {
            tag: element.tag().to_string(),
            reason: e.to_string(),
        }),
        None => {
            trace!("Skipping unrecognized list element <{}>", element.tag());
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NamespaceMap;
    use crate::xml::parse_str;

    #[derive(Debug, Default, PartialEq)]
    struct Leaf {
        name: String,
        size: i32,
    }

    crate::xml_record! {
        Leaf, tag = "Leaf";
        name: Value => attr("Name"),
        size: Value => attr("Size").omit_zero(),
    }

    #[derive(Debug, Default, PartialEq)]
    struct Branch {
        name: String,
    }

    crate::xml_record! {
        Branch, tag = "Branch";
        name: Value => attr("Name"),
    }

    #[derive(Debug, Default, PartialEq)]
    struct Anchor {
        label: String,
    }

    crate::xml_record! {
        Anchor, tag = "Anchor";
        label: Value => text_elem("Label"),
    }

    crate::xml_union! {
        #[derive(Debug, PartialEq)]
        enum Node {
            Leaf(Leaf),
            Branch(Branch),
        }
    }

    #[derive(Debug, Default)]
    struct Tree {
        title: String,
        note: String,
        visible: bool,
        extra: NamespaceMap,
        nodes: Vec<Node>,
        anchor: Option<Anchor>,
        boxed: Option<Leaf>,
        group: Vec<Node>,
    }

    crate::xml_record! {
        Tree, tag = "Tree";
        title: Value => attr("Title"),
        note: Value => text_elem("Note"),
        visible: Value => attr("Visible"),
        extra: Namespace => ns_to_attr("X"),
        nodes: List => inner_list(),
        anchor: Inner => inner("Anchor"),
        boxed: Inner => wrapped_inner("Wrapper"),
        group: List => wrapped_inner_list("Group"),
    }

    fn leaf(name: &str, size: i32) -> Node {
        Leaf {
            name: name.to_string(),
            size,
        }
        .into()
    }

    fn sample_tree() -> Tree {
        let mut tree = Tree {
            title: "Sky".to_string(),
            note: "hello".to_string(),
            visible: true,
            nodes: vec![leaf("a", 3), Branch { name: "b".to_string() }.into()],
            anchor: Some(Anchor {
                label: "top".to_string(),
            }),
            boxed: Some(Leaf {
                name: "inside".to_string(),
                size: 1,
            }),
            group: vec![leaf("g", 0)],
            ..Default::default()
        };
        tree.extra.set("Custom", "42");
        tree
    }

    #[test]
    fn test_round_trip() {
        let tree = sample_tree();
        let element = tree.to_element().unwrap();
        let back = Tree::from_element(&element).unwrap();

        assert_eq!(back.title, "Sky");
        assert_eq!(back.note, "hello");
        assert!(back.visible);
        assert_eq!(back.extra.get("Custom"), Some("42"));
        assert_eq!(back.nodes, tree.nodes);
        assert_eq!(back.anchor, tree.anchor);
        assert_eq!(back.boxed, tree.boxed);
        assert_eq!(back.group, tree.group);
    }

    #[test]
    fn test_child_order_follows_field_names() {
        let element = sample_tree().to_element().unwrap();
        let tags: Vec<_> = element.children().map(Element::tag).collect();
        // anchor, boxed, group, note, nodes
        assert_eq!(tags, vec!["Anchor", "Wrapper", "Group", "Note", "Leaf", "Branch"]);
        assert_eq!(element.get("XCustom"), Some("42"));
        assert_eq!(element.get("Visible"), Some("True"));
    }

    #[test]
    fn test_omit_zero_and_empty() {
        let element = Leaf::default().to_element().unwrap();
        assert_eq!(element.get("Size"), None);
        assert_eq!(element.get("Name"), None);

        let element = Tree::default().to_element().unwrap();
        assert!(element.find("Note").is_none());
        assert!(element.find("Group").is_none());
        assert_eq!(element.get("Visible"), Some("False"));
    }

    #[test]
    fn test_merge_preserves_foreign_content() {
        let text = r#"<Tree Title="Old" Foreign="keep"><!-- hand edited --><Leaf Name="a"/><Unknown/><Branch Name="b"/></Tree>"#;
        let mut element = parse_str(text).unwrap();
        let mut tree = Tree::from_element(&element).unwrap();
        assert_eq!(tree.nodes.len(), 2);

        tree.title = "New".to_string();
        if let Node::Leaf(first) = &mut tree.nodes[0] {
            first.size = 9;
        }
        tree.apply_to(&mut element).unwrap();

        assert_eq!(element.get("Foreign"), Some("keep"));
        assert_eq!(element.get("Title"), Some("New"));
        assert!(element.nodes()[0].is_comment());
        assert_eq!(element.find("Leaf").unwrap().get("Size"), Some("9"));
    }

    #[test]
    fn test_merge_rejects_changed_length() {
        let mut element = sample_tree().to_element().unwrap();
        let mut tree = Tree::from_element(&element).unwrap();
        tree.nodes.push(leaf("extra", 1));

        assert!(matches!(
            tree.apply_to(&mut element),
            Err(XmlError::MergeMismatch(_))
        ));
    }

    #[test]
    fn test_merge_rejects_reordered_types() {
        let mut element = sample_tree().to_element().unwrap();
        let mut tree = Tree::from_element(&element).unwrap();
        tree.nodes.reverse();

        assert!(matches!(
            tree.apply_to(&mut element),
            Err(XmlError::MergeMismatch(_))
        ));
    }

    #[test]
    fn test_root_tag_mismatch() {
        let element = parse_str(r#"<Forest Title="x"/>"#).unwrap();
        assert!(matches!(
            Tree::from_element(&element),
            Err(XmlError::TypeMismatch { .. })
        ));

        let mut element = Element::new("Forest");
        assert!(matches!(
            Tree::default().apply_to(&mut element),
            Err(XmlError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_numeric_text_fails() {
        let element = parse_str(r#"<Leaf Name="a" Size="many"/>"#).unwrap();
        assert!(matches!(
            Leaf::from_element(&element),
            Err(XmlError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_claimed_child_that_fails_to_parse() {
        let element = parse_str(r#"<Tree><Leaf Size="many"/></Tree>"#).unwrap();
        assert!(matches!(
            Tree::from_element(&element),
            Err(XmlError::PolymorphicMatch { .. })
        ));
    }

    #[test]
    fn test_ordered_directives_sorted() {
        let names: Vec<_> = ordered_directives::<Tree>().iter().map(|d| d.field).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}

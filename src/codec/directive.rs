// SPDX-License-Identifier: MIT
//! Per-field XML mapping directives

/// How a field maps onto the XML tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveMode {
    /// `element.attributes[name]`
    AttributeOf(&'static str),

    /// Text content of a child element
    TextElementOf(&'static str),

    /// A nested record serialized as a child element
    InnerOf(&'static str),

    /// A nested record serialized inside a wrapper child
    WrappedInnerOf(&'static str),

    /// A dynamic map flattened to `prefix + key` attributes
    NamespaceToAttributes(&'static str),

    /// A record list serialized as direct children
    InnerList,

    /// A record list serialized inside a wrapper child
    WrappedInnerList(&'static str),
}

impl DirectiveMode {
    /// The child tag this mode claims inside the parent element, if any
    pub fn claimed_tag(&self) -> Option<&'static str> {
        match *self {
            DirectiveMode::TextElementOf(tag)
            | DirectiveMode::InnerOf(tag)
            | DirectiveMode::WrappedInnerOf(tag)
            | DirectiveMode::WrappedInnerList(tag) => Some(tag),
            DirectiveMode::AttributeOf(_)
            | DirectiveMode::NamespaceToAttributes(_)
            | DirectiveMode::InnerList => None,
        }
    }
}

/// Directive attached to one named field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDirective {
    /// Rust field name; the engine visits fields in lexicographic order of this
    pub field: &'static str,
    pub mode: DirectiveMode,
    pub emit_even_if_empty: bool,
    pub omit_if_zero: bool,
}

impl FieldDirective {
    pub const fn new(field: &'static str, mode: DirectiveMode) -> Self {
        Self {
            field,
            mode,
            emit_even_if_empty: false,
            omit_if_zero: false,
        }
    }

    pub const fn attr(field: &'static str, name: &'static str) -> Self {
        Self::new(field, DirectiveMode::AttributeOf(name))
    }

    pub const fn text_elem(field: &'static str, tag: &'static str) -> Self {
        Self::new(field, DirectiveMode::TextElementOf(tag))
    }

    pub const fn inner(field: &'static str, tag: &'static str) -> Self {
        Self::new(field, DirectiveMode::InnerOf(tag))
    }

    pub const fn wrapped_inner(field: &'static str, tag: &'static str) -> Self {
        Self::new(field, DirectiveMode::WrappedInnerOf(tag))
    }

    pub const fn ns_to_attr(field: &'static str, prefix: &'static str) -> Self {
        Self::new(field, DirectiveMode::NamespaceToAttributes(prefix))
    }

    pub const fn inner_list(field: &'static str) -> Self {
        Self::new(field, DirectiveMode::InnerList)
    }

    pub const fn wrapped_inner_list(field: &'static str, tag: &'static str) -> Self {
        Self::new(field, DirectiveMode::WrappedInnerList(tag))
    }

    /// Serialize the field even when its text form is empty
    pub const fn emit_empty(mut self) -> Self {
        self.emit_even_if_empty = true;
        self
    }

    /// Skip the field when it holds its type's zero value
    pub const fn omit_zero(mut self) -> Self {
        self.omit_if_zero = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let d = FieldDirective::attr("msr_community_id", "MSRCommunityId").omit_zero();
        assert!(d.omit_if_zero);
        assert!(!d.emit_even_if_empty);

        let d = FieldDirective::text_elem("description", "Description").emit_empty();
        assert!(d.emit_even_if_empty);
    }

    #[test]
    fn test_claimed_tag() {
        assert_eq!(FieldDirective::inner_list("children").mode.claimed_tag(), None);
        assert_eq!(
            FieldDirective::wrapped_inner("foreground", "ForegroundImageSet")
                .mode
                .claimed_tag(),
            Some("ForegroundImageSet")
        );
    }
}

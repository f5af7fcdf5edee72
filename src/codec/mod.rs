// SPDX-License-Identifier: MIT
//! Metadata-directed XML codec
//!
//! Record types describe each serializable field with a [`FieldDirective`];
//! the engine walks that table to turn a record into an element tree (or merge
//! it into an existing one) and to rebuild a record from a tree.
//!
//! ## Directive modes
//!
//! | Mode | XML construct |
//! |------|---------------|
//! | `AttributeOf(name)` | `name="value"` on the record's element |
//! | `TextElementOf(tag)` | `<tag>value</tag>` child |
//! | `InnerOf(tag)` | nested record as a child |
//! | `WrappedInnerOf(tag)` | nested record inside `<tag>` |
//! | `NamespaceToAttributes(prefix)` | map entries as `prefix+key` attributes |
//! | `InnerList` | record list as direct children |
//! | `WrappedInnerList(tag)` | record list inside `<tag>` |
//!
//! Record types are declared with [`xml_record!`](crate::xml_record), list
//! unions with [`xml_union!`](crate::xml_union) and text enumerations with
//! [`ser_enum!`](crate::ser_enum).

pub mod directive;
pub mod engine;
pub mod enumeration;
pub mod record;
pub mod value;

pub use directive::{DirectiveMode, FieldDirective};
pub use engine::{from_element, ordered_directives, serialize_into};
pub use record::{Candidate, DynRecord, InnerSlot, ListSlot, Slot, SlotMut, XmlRecord, XmlUnion};
pub use value::{format_float, parse_bool, NamespaceMap, XmlValue};

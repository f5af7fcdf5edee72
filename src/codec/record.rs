// SPDX-License-Identifier: MIT
//! Record descriptors: traits and macros that expose a type's fields to the
//! codec engine
//!
//! A record type declares a static directive table plus two accessors that
//! hand out a [`Slot`] for each directive's field. The [`xml_record!`]
//! macro writes all three from one field list.
//!
//! [`xml_record!`]: crate::xml_record

use std::io::{Read, Write};
use std::path::Path;

use super::directive::FieldDirective;
use super::engine;
use super::value::{NamespaceMap, XmlValue};
use crate::xml::{self, Element, XmlError};

/// Read-only view of one record field
pub enum Slot<'a> {
    Value(&'a dyn XmlValue),
    Inner(&'a dyn InnerSlot),
    List(&'a dyn ListSlot),
    Namespace(&'a NamespaceMap),
}

/// Mutable view of one record field
pub enum SlotMut<'a> {
    Value(&'a mut dyn XmlValue),
    Inner(&'a mut dyn InnerSlot),
    List(&'a mut dyn ListSlot),
    Namespace(&'a mut NamespaceMap),
}

/// Object-safe face of a record, used for nested and listed values
pub trait DynRecord {
    fn xml_tag(&self) -> &'static str;

    fn serialize_into(&self, element: &mut Element) -> Result<(), XmlError>;

    fn build_element(&self) -> Result<Element, XmlError> {
        let mut element = Element::new(self.xml_tag());
        self.serialize_into(&mut element)?;
        Ok(element)
    }
}

/// An optional nested record field
pub trait InnerSlot {
    fn record(&self) -> Option<&dyn DynRecord>;

    fn load(&mut self, element: &Element) -> Result<(), XmlError>;
}

/// A list-of-records field
pub trait ListSlot {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, index: usize) -> Option<&dyn DynRecord>;

    /// Whether one of the list's element types claims `element`
    fn claims(&self, element: &Element) -> bool;

    /// Offer one child element to the list; unknown element types are skipped
    fn load_child(&mut self, element: &Element) -> Result<(), XmlError>;
}

/// A record type with a fixed directive table
pub trait XmlRecord: Default + 'static {
    /// Tag name of the element this record serializes to
    const TAG: &'static str;

    fn directives() -> &'static [FieldDirective];

    fn field(&self, name: &str) -> Option<Slot<'_>>;

    fn field_mut(&mut self, name: &str) -> Option<SlotMut<'_>>;

    /// Does `element` look like a serialized instance of this type?
    fn matches(element: &Element) -> bool {
        element.tag() == Self::TAG
    }

    fn from_element(element: &Element) -> Result<Self, XmlError> {
        engine::from_element(element)
    }

    fn from_text(text: &str) -> Result<Self, XmlError> {
        Self::from_element(&xml::parse_str(text)?)
    }

    /// Load from a file; a UTF-8 byte-order mark is tolerated
    fn from_file(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        let bytes = std::fs::read(path)?;
        Self::from_text(&xml::decode_document(bytes)?)
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, XmlError> {
        Self::from_element(&xml::parse_reader(reader)?)
    }

    /// Fetch and load a remote document; a UTF-8 byte-order mark is tolerated
    #[cfg(feature = "fetch")]
    fn from_url(url: &str) -> Result<Self, XmlError> {
        Self::from_url_with(url, &crate::config::Config::from_env())
    }

    /// [`XmlRecord::from_url`] with explicit settings
    #[cfg(feature = "fetch")]
    fn from_url_with(url: &str, config: &crate::config::Config) -> Result<Self, XmlError> {
        config.validate()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        tracing::debug!("Fetching XML document: {}", url);
        let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
        Self::from_text(&xml::decode_document(bytes.to_vec())?)
    }

    fn to_element(&self) -> Result<Element, XmlError> {
        let mut element = Element::new(Self::TAG);
        engine::serialize_into(self, &mut element)?;
        Ok(element)
    }

    /// Merge this record into an existing tree, keeping unmodeled content
    fn apply_to(&self, element: &mut Element) -> Result<(), XmlError> {
        if element.tag() != Self::TAG {
            return Err(XmlError::TypeMismatch {
                expected: Self::TAG.to_string(),
                found: element.tag().to_string(),
            });
        }
        engine::serialize_into(self, element)
    }

    /// Render as an indented document
    fn to_text(&self) -> Result<String, XmlError> {
        let mut element = self.to_element()?;
        xml::indent(&mut element);
        xml::render_to_string(&element)
    }

    /// Write as an indented document
    fn write_xml<W: Write>(&self, out: W) -> Result<(), XmlError> {
        let mut element = self.to_element()?;
        xml::indent(&mut element);
        xml::write_document(&element, out)
    }
}

impl<T: XmlRecord> DynRecord for T {
    fn xml_tag(&self) -> &'static str {
        T::TAG
    }

    fn serialize_into(&self, element: &mut Element) -> Result<(), XmlError> {
        engine::serialize_into(self, element)
    }
}

impl<T: XmlRecord> InnerSlot for Option<T> {
    fn record(&self) -> Option<&dyn DynRecord> {
        self.as_ref().map(|r| r as &dyn DynRecord)
    }

    fn load(&mut self, element: &Element) -> Result<(), XmlError> {
        *self = Some(engine::from_element(element)?);
        Ok(())
    }
}

/// One candidate type of a polymorphic list
pub struct Candidate<U> {
    pub tag: &'static str,
    pub matches: fn(&Element) -> bool,
    pub parse: fn(&Element) -> Result<U, XmlError>,
}

impl<U> Candidate<U> {
    pub fn accepts(&self, element: &Element) -> bool {
        self.tag == element.tag() && (self.matches)(element)
    }
}

/// A closed set of record types that may appear in one list
///
/// Each child element is offered to the candidates in order. A child no
/// candidate claims is skipped. A child that some candidate claims by tag and
/// predicate but that no claiming candidate can parse fails the whole load
/// with [`XmlError::PolymorphicMatch`], so a malformed known element is never
/// dropped silently.
pub trait XmlUnion: Sized + 'static {
    /// Candidate types in declaration order
    fn candidates() -> &'static [Candidate<Self>];

    fn record(&self) -> &dyn DynRecord;
}

impl<U: XmlUnion> ListSlot for Vec<U> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn entry(&self, index: usize) -> Option<&dyn DynRecord> {
        self.get(index).map(XmlUnion::record)
    }

    fn claims(&self, element: &Element) -> bool {
        !element.is_comment() && U::candidates().iter().any(|c| c.accepts(element))
    }

    fn load_child(&mut self, element: &Element) -> Result<(), XmlError> {
        if let Some(item) = engine::parse_union_child::<U>(element)? {
            self.push(item);
        }
        Ok(())
    }
}

/// Implement [`XmlRecord`] from a field list
///
/// ```
/// use wwt_data_formats::codec::XmlRecord;
///
/// #[derive(Debug, Default)]
/// pub struct Marker {
///     pub name: String,
///     pub opacity: f64,
/// }
///
/// wwt_data_formats::xml_record! {
///     Marker, tag = "Marker";
///     name: Value => attr("Name"),
///     opacity: Value => attr("Opacity").omit_zero(),
/// }
///
/// let m = Marker::from_text(r#"<Marker Name="m1" Opacity="0.5"/>"#).unwrap();
/// assert_eq!(m.name, "m1");
/// ```
#[macro_export]
macro_rules! xml_record {
    (
        $ty:ty, tag = $tag:literal $(, matches = $pred:expr)? ;
        $( $field:ident : $kind:ident => $ctor:ident ( $($arg:expr),* ) $( . $flag:ident () )* ),* $(,)?
    ) => {
        impl $crate::codec::XmlRecord for $ty {
            const TAG: &'static str = $tag;

            fn directives() -> &'static [$crate::codec::FieldDirective] {
                const DIRECTIVES: &[$crate::codec::FieldDirective] = &[
                    $( $crate::codec::FieldDirective::$ctor(stringify!($field) $(, $arg)*) $( .$flag() )* ),*
                ];
                DIRECTIVES
            }

            fn field(&self, name: &str) -> ::core::option::Option<$crate::codec::Slot<'_>> {
                match name {
                    $( stringify!($field) => ::core::option::Option::Some($crate::codec::Slot::$kind(&self.$field)), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<$crate::codec::SlotMut<'_>> {
                match name {
                    $( stringify!($field) => ::core::option::Option::Some($crate::codec::SlotMut::$kind(&mut self.$field)), )*
                    _ => ::core::option::Option::None,
                }
            }

            $(
                fn matches(element: &$crate::xml::Element) -> bool {
                    ($pred)(element)
                }
            )?
        }
    };
}

/// Declare a polymorphic list element type over record types
#[macro_export]
macro_rules! xml_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $( $variant:ident ( $ty:ty ) ),* $(,)? }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $variant($ty) ),*
        }

        impl $crate::codec::XmlUnion for $name {
            fn candidates() -> &'static [$crate::codec::Candidate<Self>] {
                static CANDIDATES: &[$crate::codec::Candidate<$name>] = &[
                    $(
                        $crate::codec::Candidate {
                            tag: <$ty as $crate::codec::XmlRecord>::TAG,
                            matches: <$ty as $crate::codec::XmlRecord>::matches,
                            parse: |e| {
                                <$ty as $crate::codec::XmlRecord>::from_element(e).map($name::$variant)
                            },
                        }
                    ),*
                ];
                CANDIDATES
            }

            fn record(&self) -> &dyn $crate::codec::DynRecord {
                match self {
                    $( $name::$variant(v) => v, )*
                }
            }
        }

        $(
            impl ::core::convert::From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    $name::$variant(v)
                }
            }
        )*
    };
}

// SPDX-License-Identifier: MIT
//! Enumerations serialized by their text value

/// Declare an enumeration whose XML form is a fixed text per variant
///
/// Parsing is an exact match against the variant texts, plus an optional
/// alias table for legacy spellings. One variant must carry `#[default]`.
///
/// ```
/// wwt_data_formats::ser_enum! {
///     pub enum Shade {
///         #[default]
///         Light = "Light",
///         Dark = "Dark",
///     }
///     aliases { "Black" => Dark }
/// }
///
/// assert_eq!(Shade::from_text("Black").unwrap(), Shade::Dark);
/// assert_eq!(Shade::Light.as_text(), "Light");
/// ```
#[macro_export]
macro_rules! ser_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),* $(,)?
        }
        $( aliases { $( $alias:literal => $target:ident ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),* ];

            pub fn as_text(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),*
                }
            }

            pub fn from_text(text: &str) -> ::core::result::Result<Self, $crate::xml::XmlError> {
                match text {
                    $( $text => ::core::result::Result::Ok($name::$variant), )*
                    $( $( $alias => ::core::result::Result::Ok($name::$target), )* )?
                    _ => ::core::result::Result::Err($crate::xml::XmlError::InvalidValue {
                        kind: stringify!($name),
                        text: text.to_string(),
                    }),
                }
            }
        }

        impl $crate::codec::XmlValue for $name {
            fn to_xml_text(&self) -> ::core::option::Option<String> {
                ::core::option::Option::Some(self.as_text().to_string())
            }

            fn is_zero(&self) -> bool {
                false
            }

            fn set_from_xml_text(&mut self, text: &str) -> ::core::result::Result<(), $crate::xml::XmlError> {
                *self = $name::from_text(text)?;
                ::core::result::Result::Ok(())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_text())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::xml::XmlError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $name::from_text(s)
            }
        }
    };
}

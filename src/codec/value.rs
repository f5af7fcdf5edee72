// SPDX-License-Identifier: MIT
//! Primitive value conversion to and from XML text

use std::collections::BTreeMap;

use crate::xml::XmlError;

/// A primitive field value that round-trips through XML text
pub trait XmlValue {
    /// Text form of the value, or `None` when the value is absent
    fn to_xml_text(&self) -> Option<String>;

    /// Whether the value is its type's zero
    fn is_zero(&self) -> bool;

    /// Replace the value with one parsed from `text`
    fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError>;
}

/// Parse boolean text: `0`/`1` or case-insensitive `true`/`false`
pub fn parse_bool(text: &str) -> Result<bool, XmlError> {
    let trimmed = text.trim();
    match trimmed {
        "1" => Ok(true),
        "0" => Ok(false),
        _ if trimmed.eq_ignore_ascii_case("true") => Ok(true),
        _ if trimmed.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(XmlError::invalid_value("boolean", text)),
    }
}

/// Format a float the way the legacy tooling does (`100.0`, `1e-7`)
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

impl XmlValue for String {
    fn to_xml_text(&self) -> Option<String> {
        Some(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError> {
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

impl XmlValue for bool {
    fn to_xml_text(&self) -> Option<String> {
        Some(if *self { "True" } else { "False" }.to_string())
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError> {
        *self = parse_bool(text)?;
        Ok(())
    }
}

macro_rules! float_value {
    ($($t:ty),*) => {$(
        impl XmlValue for $t {
            fn to_xml_text(&self) -> Option<String> {
                Some(format!("{self:?}"))
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError> {
                *self = text
                    .trim()
                    .parse()
                    .map_err(|_| XmlError::invalid_value("float", text))?;
                Ok(())
            }
        }
    )*};
}

macro_rules! int_value {
    ($($t:ty),*) => {$(
        impl XmlValue for $t {
            fn to_xml_text(&self) -> Option<String> {
                Some(self.to_string())
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError> {
                *self = text
                    .trim()
                    .parse()
                    .map_err(|_| XmlError::invalid_value("integer", text))?;
                Ok(())
            }
        }
    )*};
}

float_value!(f32, f64);
int_value!(i32, i64, u32, u64);

impl<T: XmlValue + Default> XmlValue for Option<T> {
    fn to_xml_text(&self) -> Option<String> {
        self.as_ref().and_then(XmlValue::to_xml_text)
    }

    fn is_zero(&self) -> bool {
        self.as_ref().is_some_and(XmlValue::is_zero)
    }

    fn set_from_xml_text(&mut self, text: &str) -> Result<(), XmlError> {
        let mut value = T::default();
        value.set_from_xml_text(text)?;
        *self = Some(value);
        Ok(())
    }
}

/// Ordered string map flattened into prefixed attributes
///
/// Used for free-form metadata such as `X`-prefixed attributes on imagesets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: BTreeMap<String, String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("True").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(matches!(
            parse_bool("yes"),
            Err(XmlError::InvalidValue { kind: "boolean", .. })
        ));
    }

    #[test]
    fn test_float_text() {
        assert_eq!(100.0f64.to_xml_text().as_deref(), Some("100.0"));
        assert_eq!(0.0f64.to_xml_text().as_deref(), Some("0.0"));
        assert_eq!(format_float(1.5), "1.5");

        let mut v = 0.0f64;
        v.set_from_xml_text(" 12.25 ").unwrap();
        assert_eq!(v, 12.25);
        assert!(v.set_from_xml_text("twelve").is_err());
    }

    #[test]
    fn test_int_text() {
        let mut v = 0i32;
        v.set_from_xml_text("-42").unwrap();
        assert_eq!(v, -42);
        assert!(!v.is_zero());
        assert!(matches!(
            v.set_from_xml_text("4.5"),
            Err(XmlError::InvalidValue { kind: "integer", .. })
        ));
    }

    #[test]
    fn test_option_absent() {
        let mut v: Option<u64> = None;
        assert!(v.to_xml_text().is_none());
        assert!(!v.is_zero());

        v.set_from_xml_text("7").unwrap();
        assert_eq!(v, Some(7));
        assert_eq!(v.to_xml_text().as_deref(), Some("7"));
    }

    #[test]
    fn test_namespace_map_ordered() {
        let mut map = NamespaceMap::new();
        map.set("zeta", "1");
        map.set("alpha", "2");

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
        assert_eq!(map.remove("zeta").as_deref(), Some("1"));
        assert_eq!(map.len(), 1);
    }
}

// SPDX-License-Identifier: MIT
//! XML element tree, parser and renderer
//!
//! Everything in this crate that speaks XML goes through this module: the
//! record codec serializes into [`Element`] trees, and the cabinet format
//! builds its header index with the same primitives.

pub mod element;
pub mod reader;
pub mod writer;

pub use element::{Element, NodeKind};
pub use reader::{decode_document, parse_bytes, parse_reader, parse_str};
pub use writer::{indent, render_to_string, write_document};

/// Errors raised while parsing, rendering or mapping XML
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Invalid UTF-8 in XML document: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Expected <{expected}> element, found <{found}>")]
    TypeMismatch { expected: String, found: String },

    #[error("Cannot parse {text:?} as {kind}")]
    InvalidValue { kind: &'static str, text: String },

    #[error("Data changed beneath us: {0}")]
    MergeMismatch(String),

    #[error("No candidate type accepted <{tag}>: {reason}")]
    PolymorphicMatch { tag: String, reason: String },

    #[error("Record field {0} has no accessor matching its directive")]
    FieldAccess(&'static str),

    #[cfg(feature = "fetch")]
    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[cfg(feature = "fetch")]
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl XmlError {
    pub(crate) fn invalid_value(kind: &'static str, text: &str) -> Self {
        XmlError::InvalidValue {
            kind,
            text: text.to_string(),
        }
    }
}

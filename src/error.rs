// SPDX-License-Identifier: MIT
//! Crate-wide error type

use crate::cabinet::CabinetError;
use crate::config::ConfigError;
use crate::constellations::CatalogError;
use crate::layers::LayerError;
use crate::plate::PlateError;
use crate::xml::XmlError;

/// Broad classification of a failure, independent of the module raising it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    MalformedHeader,
    DuplicateName,
    UnknownName,
    ClosedHandleUse,
    NumericParseFailure,
    StructuralMergeMismatch,
    UnsupportedFormatVersion,
    AddressSpaceExceeded,
    CoordinateOutOfRange,
    AmbiguousOrMissingPolymorphicMatch,
    TypeMismatch,
    Syntax,
    InvalidPath,
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Cabinet(#[from] CabinetError),

    #[error(transparent)]
    Plate(#[from] PlateError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Xml(e) => xml_kind(e),
            Error::Cabinet(e) => cabinet_kind(e),
            Error::Plate(e) => match e {
                PlateError::Io(_) => ErrorKind::Io,
                PlateError::MalformedHeader(_) => ErrorKind::MalformedHeader,
                PlateError::UnsupportedVersion { .. } => ErrorKind::UnsupportedFormatVersion,
                PlateError::AddressSpaceExceeded(_) => ErrorKind::AddressSpaceExceeded,
                PlateError::CoordinateOutOfRange { .. } => ErrorKind::CoordinateOutOfRange,
                PlateError::Closed => ErrorKind::ClosedHandleUse,
            },
            Error::Layer(e) => match e {
                LayerError::Cabinet(e) => cabinet_kind(e),
                LayerError::Xml(e) => xml_kind(e),
                LayerError::MissingContainer => ErrorKind::UnknownName,
            },
            Error::Catalog(e) => match e {
                CatalogError::Io(_) => ErrorKind::Io,
                CatalogError::BadLine { .. } => ErrorKind::NumericParseFailure,
                CatalogError::UnknownCode { .. } => ErrorKind::UnknownName,
                CatalogError::Config(_) => ErrorKind::Config,
            },
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

fn xml_kind(e: &XmlError) -> ErrorKind {
    match e {
        XmlError::Io(_) => ErrorKind::Io,
        XmlError::Syntax(_) | XmlError::Encoding(_) | XmlError::NoRoot => ErrorKind::Syntax,
        XmlError::TypeMismatch { .. } | XmlError::FieldAccess(_) => ErrorKind::TypeMismatch,
        XmlError::InvalidValue { .. } => ErrorKind::NumericParseFailure,
        XmlError::MergeMismatch(_) => ErrorKind::StructuralMergeMismatch,
        XmlError::PolymorphicMatch { .. } => ErrorKind::AmbiguousOrMissingPolymorphicMatch,
        #[cfg(feature = "fetch")]
        XmlError::Fetch(_) => ErrorKind::Io,
        #[cfg(feature = "fetch")]
        XmlError::Config(_) => ErrorKind::Config,
    }
}

fn cabinet_kind(e: &CabinetError) -> ErrorKind {
    match e {
        CabinetError::Io(_) => ErrorKind::Io,
        CabinetError::Xml(e) => xml_kind(e),
        CabinetError::MalformedHeader(_) => ErrorKind::MalformedHeader,
        CabinetError::DuplicateName(_) => ErrorKind::DuplicateName,
        CabinetError::UnknownName(_) => ErrorKind::UnknownName,
        CabinetError::Closed => ErrorKind::ClosedHandleUse,
        CabinetError::InvalidPath(_) => ErrorKind::InvalidPath,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let e: Error = PlateError::CoordinateOutOfRange { level: 2, x: 0, y: 0 }.into();
        assert_eq!(e.kind(), ErrorKind::CoordinateOutOfRange);

        let e: Error = CabinetError::Closed.into();
        assert_eq!(e.kind(), ErrorKind::ClosedHandleUse);

        let e: Error = LayerError::Cabinet(CabinetError::UnknownName("x".into())).into();
        assert_eq!(e.kind(), ErrorKind::UnknownName);

        let e: Error = XmlError::MergeMismatch("grew".into()).into();
        assert_eq!(e.kind(), ErrorKind::StructuralMergeMismatch);
        assert_eq!(e.to_string(), "Data changed beneath us: grew");
    }

    #[test]
    fn test_config_kinds() {
        let e: Error = ConfigError::Invalid("bad".into()).into();
        assert_eq!(e.kind(), ErrorKind::Config);

        let config = crate::config::Config {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        let e: Error = crate::ConstellationTable::load_configured(&config)
            .unwrap_err()
            .into();
        assert_eq!(e.kind(), ErrorKind::Config);
    }
}

// SPDX-License-Identifier: MIT
//! Layer collections and their `.wwtl` cabinet packaging
//!
//! A layer collection is a cabinet holding one top-level `.wwtxml` document
//! (a [`LayerContainerXml`]) plus data files named after the layers they
//! belong to.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::cabinet::{CabinetError, CabinetReader};
use crate::codec::XmlRecord;
use crate::imageset::ImageSet;
use crate::xml::{self, Element, XmlError};
use crate::{xml_record, xml_union};

/// `Type` attribute value of image set layers
pub const IMAGESET_LAYER_TYPE: &str = "TerraViewer.ImageSetLayer";

/// Extension of the container document inside a layer cabinet
pub const CONTAINER_EXTENSION: &str = ".wwtxml";

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error(transparent)]
    Cabinet(#[from] CabinetError),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("Found no top-level \"{CONTAINER_EXTENSION}\" file in layer cabinet")]
    MissingContainer,
}

/// The `LayerContainer` document of a layer collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerContainerXml {
    /// UUID naming the cabinet directory that holds layer data files
    pub id: String,
    pub layers: Vec<LayerKind>,
}

xml_record! {
    LayerContainerXml, tag = "LayerContainer";
    id: Value => attr("ID"),
    layers: List => wrapped_inner_list("Layers"),
}

impl LayerContainerXml {
    /// An empty container with a fresh random id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            layers: Vec::new(),
        }
    }
}

/// A layer that displays an image set
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSetLayer {
    pub extension: String,
    pub id: String,
    pub image_set: Option<ImageSet>,
    pub layer_type: String,
    pub name: String,
    pub opacity: f64,
    pub override_default: bool,
    pub reference_frame: String,
}

impl Default for ImageSetLayer {
    fn default() -> Self {
        Self {
            extension: String::new(),
            id: String::new(),
            image_set: None,
            layer_type: IMAGESET_LAYER_TYPE.to_string(),
            name: String::new(),
            opacity: 1.0,
            override_default: false,
            reference_frame: String::new(),
        }
    }
}

fn is_imageset_layer(element: &Element) -> bool {
    element.get("Type") == Some(IMAGESET_LAYER_TYPE)
}

xml_record! {
    ImageSetLayer, tag = "Layer", matches = is_imageset_layer;
    extension: Value => attr("Extension"),
    id: Value => attr("Id"),
    image_set: Inner => inner("ImageSet"),
    layer_type: Value => attr("Type"),
    name: Value => attr("Name"),
    opacity: Value => attr("Opacity"),
    override_default: Value => attr("OverrideDefault"),
    reference_frame: Value => attr("ReferenceFrame"),
}

xml_union! {
    /// Layer types understood in a container; other `Layer` elements are skipped
    #[derive(Debug, Clone, PartialEq)]
    pub enum LayerKind {
        ImageSet(ImageSetLayer),
    }
}

impl LayerKind {
    pub fn id(&self) -> &str {
        match self {
            LayerKind::ImageSet(layer) => &layer.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LayerKind::ImageSet(layer) => &layer.name,
        }
    }
}

/// Reader for `.wwtl` layer cabinets
pub struct LayerContainerReader<R> {
    cabinet: CabinetReader<R>,
    info: LayerContainerXml,
}

impl LayerContainerReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LayerError> {
        Self::from_cabinet(CabinetReader::open(path)?)
    }
}

impl<R: Read + Seek> LayerContainerReader<R> {
    pub fn new(stream: R) -> Result<Self, LayerError> {
        Self::from_cabinet(CabinetReader::new(stream)?)
    }

    /// Load the container document of an already opened cabinet
    pub fn from_cabinet(mut cabinet: CabinetReader<R>) -> Result<Self, LayerError> {
        let name = cabinet
            .filenames()
            .find(|n| n.ends_with(CONTAINER_EXTENSION) && !n.contains('\\'))
            .map(str::to_string)
            .ok_or(LayerError::MissingContainer)?;

        let bytes = cabinet.read_file(&name)?;
        let info = LayerContainerXml::from_text(&xml::decode_document(bytes)?)?;
        debug!("Loaded layer container {:?}: {} layers", info.id, info.layers.len());

        Ok(Self { cabinet, info })
    }

    /// Read the data file of `layer` with the given extension (e.g. `".tif"`)
    ///
    /// Files normally live under the container id directory; some producers
    /// put them at the top level instead.
    pub fn read_layer_file(&mut self, layer: &LayerKind, extension: &str) -> Result<Vec<u8>, LayerError> {
        let nested = format!("{}\\{}{}", self.info.id, layer.id(), extension);
        if self.cabinet.contains(&nested) {
            return Ok(self.cabinet.read_file(&nested)?);
        }
        Ok(self.cabinet.read_file(&format!("{}{}", layer.id(), extension))?)
    }

    pub fn close(&mut self) {
        self.cabinet.close();
    }
}

impl<R> LayerContainerReader<R> {
    pub fn layers(&self) -> &[LayerKind] {
        &self.info.layers
    }

    pub fn container(&self) -> &LayerContainerXml {
        &self.info
    }
}

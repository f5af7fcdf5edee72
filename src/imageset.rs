// SPDX-License-Identifier: MIT
//! An image, possibly tiled, for display in the sky viewer

use crate::codec::NamespaceMap;
use crate::enums::{Bandpass, DataSetType, ProjectionType};
use crate::xml_record;

/// An `ImageSet` record
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    pub band_pass: Bandpass,

    /// Angular height of the base tile, or the pixel scale for untiled images
    pub base_degrees_per_tile: f64,
    pub base_tile_level: u32,
    pub bottoms_up: bool,

    /// Projection center; right ascension degrees for sky images
    pub center_x: f64,
    pub center_y: f64,

    pub credits: String,
    pub credits_url: String,
    pub data_set_type: DataSetType,
    pub description: String,

    /// Extension of the image files, with a leading period
    pub file_type: String,

    /// Community identifier; never written when zero
    pub msr_community_id: u32,
    pub name: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub projection: ProjectionType,
    pub rotation_deg: f64,
    pub sparse: bool,
    pub thumbnail_url: String,

    /// Number of tiling levels; zero for untiled images
    pub tile_levels: u32,

    /// URL or URL template of the image data
    pub url: String,
    pub width_factor: i32,

    /// Free-form `X`-prefixed attributes
    pub xmeta: NamespaceMap,
}

impl Default for ImageSet {
    fn default() -> Self {
        Self {
            band_pass: Bandpass::Visible,
            base_degrees_per_tile: 0.0,
            base_tile_level: 0,
            bottoms_up: false,
            center_x: 0.0,
            center_y: 0.0,
            credits: String::new(),
            credits_url: String::new(),
            data_set_type: DataSetType::Sky,
            description: String::new(),
            file_type: ".png".to_string(),
            msr_community_id: 0,
            name: String::new(),
            offset_x: 0.0,
            offset_y: 0.0,
            projection: ProjectionType::SkyImage,
            rotation_deg: 0.0,
            sparse: true,
            thumbnail_url: String::new(),
            tile_levels: 0,
            url: String::new(),
            width_factor: 2,
            xmeta: NamespaceMap::new(),
        }
    }
}

xml_record! {
    ImageSet, tag = "ImageSet";
    band_pass: Value => attr("BandPass"),
    base_degrees_per_tile: Value => attr("BaseDegreesPerTile"),
    base_tile_level: Value => attr("BaseTileLevel"),
    bottoms_up: Value => attr("BottomsUp"),
    center_x: Value => attr("CenterX"),
    center_y: Value => attr("CenterY"),
    credits: Value => text_elem("Credits"),
    credits_url: Value => text_elem("CreditsUrl"),
    data_set_type: Value => attr("DataSetType"),
    description: Value => text_elem("Description"),
    file_type: Value => attr("FileType"),
    msr_community_id: Value => attr("MSRCommunityId").omit_zero(),
    name: Value => attr("Name"),
    offset_x: Value => attr("OffsetX"),
    offset_y: Value => attr("OffsetY"),
    projection: Value => attr("Projection"),
    rotation_deg: Value => attr("Rotation"),
    sparse: Value => attr("Sparse"),
    thumbnail_url: Value => text_elem("ThumbnailUrl"),
    tile_levels: Value => attr("TileLevels"),
    url: Value => attr("Url"),
    width_factor: Value => attr("WidthFactor"),
    xmeta: Namespace => ns_to_attr("X"),
}

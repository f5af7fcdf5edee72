// SPDX-License-Identifier: MIT
//! Document-level codec behavior through the public API

use approx::assert_relative_eq;
use tempfile::NamedTempFile;
use wwt_data_formats::codec::XmlRecord;
use wwt_data_formats::xml::{self, XmlError};
use wwt_data_formats::{Bandpass, DataSetType, ImageSet, ProjectionType};

fn populated_imageset() -> ImageSet {
    let mut imgset = ImageSet {
        band_pass: Bandpass::HydrogenAlpha,
        base_degrees_per_tile: 0.0273,
        base_tile_level: 1,
        bottoms_up: true,
        center_x: 202.469_575,
        center_y: 47.195_258,
        credits: "Hubble Heritage".to_string(),
        credits_url: "https://example.org/credits".to_string(),
        data_set_type: DataSetType::Panorama,
        description: "Whirlpool galaxy & companion".to_string(),
        file_type: ".jpg".to_string(),
        msr_community_id: 42,
        name: "M51".to_string(),
        offset_x: 1.5e-7,
        offset_y: -3.25,
        projection: ProjectionType::Toast,
        rotation_deg: 12.5,
        sparse: false,
        thumbnail_url: "https://example.org/thumb.jpg".to_string(),
        tile_levels: 6,
        url: "https://example.org/{1}/{3}/{3}_{2}.png".to_string(),
        width_factor: 1,
        ..ImageSet::default()
    };
    imgset.xmeta.set("SourceName", "hst");
    imgset
}

fn assert_same(a: &ImageSet, b: &ImageSet) {
    assert_eq!(a.name, b.name);
    assert_eq!(a.url, b.url);
    assert_eq!(a.band_pass, b.band_pass);
    assert_eq!(a.data_set_type, b.data_set_type);
    assert_eq!(a.projection, b.projection);
    assert_eq!(a.tile_levels, b.tile_levels);
    assert_eq!(a.base_tile_level, b.base_tile_level);
    assert_eq!(a.bottoms_up, b.bottoms_up);
    assert_eq!(a.sparse, b.sparse);
    assert_eq!(a.width_factor, b.width_factor);
    assert_eq!(a.msr_community_id, b.msr_community_id);
    assert_eq!(a.credits, b.credits);
    assert_eq!(a.credits_url, b.credits_url);
    assert_eq!(a.description, b.description);
    assert_eq!(a.thumbnail_url, b.thumbnail_url);
    assert_eq!(a.file_type, b.file_type);
    assert_eq!(a.xmeta, b.xmeta);
    assert_relative_eq!(a.base_degrees_per_tile, b.base_degrees_per_tile);
    assert_relative_eq!(a.center_x, b.center_x);
    assert_relative_eq!(a.center_y, b.center_y);
    assert_relative_eq!(a.offset_x, b.offset_x);
    assert_relative_eq!(a.offset_y, b.offset_y);
    assert_relative_eq!(a.rotation_deg, b.rotation_deg);
}

#[test]
fn test_text_round_trip() {
    let original = populated_imageset();
    let text = original.to_text().unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("&amp; companion"));

    let back = ImageSet::from_text(&text).unwrap();
    assert_same(&original, &back);
}

#[test]
fn test_file_round_trip_with_bom() {
    let original = populated_imageset();

    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    original.write_xml(&mut bytes).unwrap();

    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), &bytes).unwrap();

    let back = ImageSet::from_file(file.path()).unwrap();
    assert_same(&original, &back);

    let back = ImageSet::from_reader(&bytes[..]).unwrap();
    assert_same(&original, &back);
}

#[test]
fn test_pretty_printing_layout() {
    let imgset = ImageSet {
        credits: "c".to_string(),
        ..ImageSet::default()
    };
    let text = imgset.to_text().unwrap();
    assert!(text.contains("\n  <Credits>c</Credits>\n"));
    assert!(text.trim_end().ends_with("</ImageSet>"));
}

#[test]
fn test_merge_into_loaded_document() {
    let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<ImageSet Name="old" Generator="toasty 0.9">
  <!-- produced by a pipeline -->
  <Credits>someone</Credits>
  <Extra/>
</ImageSet>"#;

    let mut root = xml::parse_str(source).unwrap();
    let mut imgset = ImageSet::from_element(&root).unwrap();
    imgset.name = "new".to_string();
    imgset.credits = "someone else".to_string();
    imgset.apply_to(&mut root).unwrap();

    let text = xml::render_to_string(&root).unwrap();
    assert!(text.contains("Generator=\"toasty 0.9\""));
    assert!(text.contains("<!-- produced by a pipeline -->"));
    assert!(text.contains("<Credits>someone else</Credits>"));
    assert!(text.contains("<Extra/>"));
    assert_eq!(root.get("Name"), Some("new"));
}

#[test]
fn test_wrong_root_and_syntax_errors() {
    assert!(matches!(
        ImageSet::from_text("<Place/>"),
        Err(XmlError::TypeMismatch { .. })
    ));
    assert!(matches!(
        ImageSet::from_text("<ImageSet><Credits></ImageSet>"),
        Err(XmlError::Syntax(_))
    ));
    assert!(matches!(
        ImageSet::from_text(r#"<ImageSet BottomsUp="maybe"/>"#),
        Err(XmlError::InvalidValue { .. })
    ));
}

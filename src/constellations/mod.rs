// SPDX-License-Identifier: MIT
//! Classify sky positions by constellation
//!
//! Boundaries come from a fixed-width catalog, one vertex per line:
//!
//! ```text
//! columns [0, 10)   right ascension, hours
//! columns [11, 22)  declination, degrees
//! columns [23, 27)  constellation code, space padded
//! ```
//!
//! Consecutive lines with the same code form one polygon. The embedded
//! catalog holds the IAU boundaries (Serpens split into `SER1` and `SER2`),
//! precessed to J2000 with long edges subdivided. Ursa Minor and Octans
//! close over their pole along declination ±90. Another catalog can be
//! supplied through [`ConstellationTable::from_path`] or the
//! `WWT_CONSTELLATIONS_PATH` variable read by [`ConstellationTable::shared`].

use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::enums::Constellation;

const EMBEDDED_CATALOG: &str = include_str!("../../data/constellations.txt");

/// Declination above which every point belongs to Ursa Minor
pub const POLE_CAP_DEC: f64 = 88.402;

/// Declination beyond which an unmatched point falls back to a polar
/// constellation
pub const POLAR_FALLBACK_DEC: f64 = 65.5;

static SHARED: OnceCell<ConstellationTable> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog line {line}: {reason}")]
    BadLine { line: usize, reason: String },

    #[error("Catalog line {line}: unknown constellation code {code:?}")]
    UnknownCode { line: usize, code: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One boundary vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

#[derive(Debug, Clone)]
struct Boundary {
    constellation: Constellation,
    vertices: Vec<Vertex>,
}

/// Immutable set of constellation boundary polygons
#[derive(Debug, Clone)]
pub struct ConstellationTable {
    boundaries: Vec<Boundary>,
}

impl ConstellationTable {
    /// Parse catalog text
    ///
    /// Within a polygon, a vertex whose right ascension jumps more than 12h
    /// from the previous (already corrected) vertex is shifted by 24h, so no
    /// edge wraps around the sky.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut boundaries: Vec<Boundary> = Vec::new();

        for (number, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l)) {
            if line.trim().is_empty() {
                continue;
            }

            let (mut vertex, code) = parse_line(number, line)?;
            let constellation =
                Constellation::from_code(code).ok_or_else(|| CatalogError::UnknownCode {
                    line: number,
                    code: code.trim().to_string(),
                })?;

            match boundaries.last_mut() {
                Some(current) if current.constellation == constellation => {
                    if let Some(prev) = current.vertices.last() {
                        vertex.ra_hours = unwrap_ra(vertex.ra_hours, prev.ra_hours);
                    }
                    current.vertices.push(vertex);
                }
                _ => boundaries.push(Boundary {
                    constellation,
                    vertices: vec![vertex],
                }),
            }
        }

        debug!("Parsed constellation catalog: {} polygons", boundaries.len());
        Ok(Self { boundaries })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!("Loading constellation catalog: {:?}", path);
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// The catalog compiled into the crate
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(EMBEDDED_CATALOG)
    }

    /// Load the catalog `config` names, or the embedded one
    pub fn load_configured(config: &Config) -> Result<Self, CatalogError> {
        config.validate()?;
        match &config.constellations_path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// Process-wide table, loaded on first use
    ///
    /// Honors `WWT_CONSTELLATIONS_PATH`. A failed load is not cached; the
    /// next call tries again.
    pub fn shared() -> Result<&'static ConstellationTable, CatalogError> {
        SHARED.get_or_try_init(|| Self::load_configured(&Config::from_env()))
    }

    /// Number of polygons
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Vertices of the first polygon belonging to `constellation`
    pub fn polygon(&self, constellation: Constellation) -> Option<&[Vertex]> {
        self.boundaries
            .iter()
            .find(|b| b.constellation == constellation)
            .map(|b| b.vertices.as_slice())
    }

    /// Constellation containing the point, or [`Constellation::Unspecified`]
    pub fn find(&self, ra_hours: f64, dec_degrees: f64) -> Constellation {
        if dec_degrees > POLE_CAP_DEC {
            return Constellation::UrsaMinor;
        }

        if let Some(found) = self.find_in_polygons(ra_hours, dec_degrees) {
            return found;
        }

        // polygons may be stored with negative-wrapped right ascensions
        if ra_hours > 0.0 {
            if let Some(found) = self.find_in_polygons(ra_hours - 24.0, dec_degrees) {
                return found;
            }
        }

        if dec_degrees > POLAR_FALLBACK_DEC {
            Constellation::UrsaMinor
        } else if dec_degrees < -POLAR_FALLBACK_DEC {
            Constellation::Octans
        } else {
            Constellation::Unspecified
        }
    }

    fn find_in_polygons(&self, ra: f64, dec: f64) -> Option<Constellation> {
        self.boundaries
            .iter()
            .find(|b| contains(&b.vertices, ra, dec))
            .map(|b| b.constellation)
    }
}

/// Look up a point in the shared table
pub fn find_constellation(ra_hours: f64, dec_degrees: f64) -> Result<Constellation, CatalogError> {
    Ok(ConstellationTable::shared()?.find(ra_hours, dec_degrees))
}

fn parse_line(number: usize, line: &str) -> Result<(Vertex, &str), CatalogError> {
    let bad = |reason: &str| CatalogError::BadLine {
        line: number,
        reason: reason.to_string(),
    };

    let ra_text = line.get(0..10).ok_or_else(|| bad("line too short"))?;
    let dec_text = line.get(11..22).ok_or_else(|| bad("line too short"))?;
    let code = line
        .get(23..line.len().min(27))
        .ok_or_else(|| bad("missing constellation code"))?;

    let ra_hours = ra_text
        .trim()
        .parse()
        .map_err(|_| bad(&format!("bad right ascension {ra_text:?}")))?;
    let dec_degrees = dec_text
        .trim()
        .parse()
        .map_err(|_| bad(&format!("bad declination {dec_text:?}")))?;

    Ok((
        Vertex {
            ra_hours,
            dec_degrees,
        },
        code,
    ))
}

fn unwrap_ra(ra: f64, prev: f64) -> f64 {
    if ra - prev > 12.0 {
        ra - 24.0
    } else if ra - prev < -12.0 {
        ra + 24.0
    } else {
        ra
    }
}

/// Even-odd test with declination as the scan axis
///
/// An edge counts when the query declination lies in `[min, max)` of its
/// endpoints' declinations and the query lies west of the crossing point.
fn contains(vertices: &[Vertex], ra: f64, dec: f64) -> bool {
    let mut inside = false;
    let mut j = match vertices.len() {
        0 => return false,
        n => n - 1,
    };

    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        j = i;

        if (a.dec_degrees > dec) == (b.dec_degrees > dec) {
            continue;
        }

        let b_ra = unwrap_ra(b.ra_hours, a.ra_hours);
        let crossing = (b_ra - a.ra_hours) * (dec - a.dec_degrees)
            / (b.dec_degrees - a.dec_degrees)
            + a.ra_hours;
        if ra < crossing {
            inside = !inside;
        }
    }

    inside
}

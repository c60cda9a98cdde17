//! TileJSON 3.0.0 synthesis from container metadata.
//!
//! A TileJSON document is rebuilt from the metadata snapshot on every
//! request; nothing is persisted. Synthesis is a pure function of the
//! metadata and the tile URL template, so identical inputs serialize to
//! identical bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SynthesisError;
use crate::mbtiles::Metadata;

/// Zoom used when deriving a center from bounds.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Minimum zoom assumed when the container does not declare one.
pub const DEFAULT_MINZOOM: u8 = 7;

/// Maximum zoom assumed when the container does not declare one.
pub const DEFAULT_MAXZOOM: u8 = 15;

/// Whole-world bounds in the Web Mercator latitude range.
pub const WORLD_BOUNDS: [f64; 4] = [-180.0, -85.05112877980659, 180.0, 85.0511287798066];

/// A synthesized TileJSON 3.0.0 document.
///
/// Field order is fixed by the struct; optional fields absent from the
/// container metadata are omitted from the output rather than serialized as
/// null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub format: String,
    pub bounds: [f64; 4],
    pub center: [f64; 3],
    pub minzoom: u8,
    pub maxzoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub vector_layers: Value,
    pub scheme: String,
    pub tiles: Vec<String>,
    pub tilejson: String,
}

impl TileJson {
    /// Synthesize a TileJSON document from container metadata and an
    /// absolute tile URL template with `{z}`, `{x}`, `{y}` placeholders.
    ///
    /// Defaulting rules:
    /// - `scheme` defaults to `"xyz"`
    /// - `bounds` defaults to [`WORLD_BOUNDS`]
    /// - `minzoom`/`maxzoom` default to [`DEFAULT_MINZOOM`]/[`DEFAULT_MAXZOOM`]
    /// - `center` is derived from the already-defaulted bounds at
    ///   [`DEFAULT_ZOOM`]
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::MalformedMetadata`] when `format` is absent
    /// or when a pbf container has no `json.vector_layers`, and
    /// [`SynthesisError::UnsupportedFormat`] when `format` is not `"pbf"`.
    pub fn from_metadata(
        metadata: &Metadata,
        tile_url_template: String,
    ) -> Result<TileJson, SynthesisError> {
        let format = metadata
            .string("format")
            .ok_or_else(|| {
                SynthesisError::MalformedMetadata("container declares no format".to_string())
            })?
            .to_string();

        if format != "pbf" {
            return Err(SynthesisError::UnsupportedFormat { format });
        }

        let vector_layers = metadata
            .vector_layers()
            .ok_or_else(|| {
                SynthesisError::MalformedMetadata(
                    "pbf container has no json.vector_layers".to_string(),
                )
            })?
            .clone();

        let bounds = metadata.bounds().unwrap_or(WORLD_BOUNDS);
        let center = metadata
            .center()
            .unwrap_or_else(|| center_from_bounds(&bounds, DEFAULT_ZOOM));

        Ok(TileJson {
            name: metadata.string("name").map(str::to_string),
            format,
            bounds,
            center,
            minzoom: metadata.zoom("minzoom").unwrap_or(DEFAULT_MINZOOM),
            maxzoom: metadata.zoom("maxzoom").unwrap_or(DEFAULT_MAXZOOM),
            attribution: metadata.string("attribution").map(str::to_string),
            description: metadata.string("description").map(str::to_string),
            kind: metadata.string("type").map(str::to_string),
            version: metadata.string("version").map(str::to_string),
            vector_layers,
            scheme: metadata.string("scheme").unwrap_or("xyz").to_string(),
            tiles: vec![tile_url_template],
            tilejson: "3.0.0".to_string(),
        })
    }
}

/// Center of a bounding box at the given zoom: `[lon, lat, zoom]`.
pub fn center_from_bounds(bounds: &[f64; 4], zoom: f64) -> [f64; 3] {
    let [west, south, east, north] = bounds;
    [(west + east) / 2.0, (south + north) / 2.0, zoom]
}

//! MapLibre style synthesis.
//!
//! The served style is an embedded base template with the position, asset
//! URLs and the single vector source filled in per request. Like TileJSON
//! synthesis this is a pure function of its inputs; nothing is persisted.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::mbtiles::Metadata;
use crate::tilejson::{center_from_bounds, DEFAULT_ZOOM, WORLD_BOUNDS};

/// Base style document shipped with the server.
const BASE_STYLE: &str = include_str!("../assets/style.json");

/// A pre-configured initial map position.
///
/// When configured, it takes precedence over the container metadata and the
/// store is not consulted for the style's center at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOverride {
    pub lon: f64,
    pub lat: f64,
    pub zoom: f64,
}

impl CenterOverride {
    pub fn as_array(&self) -> [f64; 3] {
        [self.lon, self.lat, self.zoom]
    }
}

impl FromStr for CenterOverride {
    type Err = String;

    /// Parse `"lon,lat,zoom"` as given on the CLI or in the environment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!("expected \"lon,lat,zoom\", got {s:?}"));
        }
        let mut values = [0.0f64; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| format!("expected a number, got {part:?}"))?;
        }
        let [lon, lat, zoom] = values;
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("longitude {lon} is out of range [-180, 180]"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {lat} is out of range [-90, 90]"));
        }
        Ok(CenterOverride { lon, lat, zoom })
    }
}

impl fmt::Display for CenterOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.lon, self.lat, self.zoom)
    }
}

/// Initial position from container metadata: the declared center, or the
/// bounds centroid at [`DEFAULT_ZOOM`] (bounds themselves defaulting to
/// [`WORLD_BOUNDS`]).
pub fn center_from_metadata(metadata: &Metadata) -> [f64; 3] {
    metadata.center().unwrap_or_else(|| {
        let bounds = metadata.bounds().unwrap_or(WORLD_BOUNDS);
        center_from_bounds(&bounds, DEFAULT_ZOOM)
    })
}

/// Populate the base template with the resolved position, asset URLs and
/// the TileJSON source. `asset_base_url` must already be absolute.
pub fn build_style(center: [f64; 3], asset_base_url: &str, tilejson_url: &str) -> Value {
    let mut style: Value =
        serde_json::from_str(BASE_STYLE).expect("embedded style template is valid JSON");

    style["center"] = json!([center[0], center[1]]);
    style["zoom"] = json!(center[2]);
    style["sprite"] = json!(format!("{asset_base_url}/sprites/sprite"));
    style["glyphs"] = json!(format!("{asset_base_url}/fonts/{{fontstack}}/{{range}}.pbf"));
    style["sources"] = json!({
        "openmaptiles": {
            "type": "vector",
            "url": tilejson_url,
        }
    });
    style
}

//! Tile source URLs and the tile layer handle each controller owns.

use crate::selection::{InterpolationOptions, LayerSelection, MapView};
use nav_core::endpoints::API_PREFIX;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl LayerId {
    pub fn next() -> Self {
        LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An XYZ tile source: a URL template plus what the map needs to draw it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TileSource {
    pub url: String,
    pub projection: String,
    pub attributions: Vec<String>,
}

/// The renderable layer a controller creates once and then re-points.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TileLayer {
    pub id: LayerId,
    /// Layer type name, used by the map to find the layer
    pub name: String,
    /// 0.0-1.0
    pub opacity: f64,
    pub source: Option<TileSource>,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, opacity_percent: u8) -> Self {
        Self {
            id: LayerId::next(),
            name: name.into(),
            opacity: f64::from(opacity_percent.min(100)) / 100.0,
            source: None,
        }
    }

    /// Swap in a new source, returning the one it replaces.
    pub fn set_source(&mut self, source: TileSource) -> Option<TileSource> {
        self.source.replace(source)
    }

    pub fn set_opacity(&mut self, opacity_percent: u8) {
        self.opacity = f64::from(opacity_percent.min(100)) / 100.0;
    }

    pub fn url(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.url.as_str())
    }
}

/// Build the tile URL template for a layer.
///
/// Path order: interpolation type, radius, neighbours, projection, dataset,
/// variable, time, depth, scale, land mask flag, "display,colourmap", then
/// `{z}/{x}/{y}.png`. Returns `None` until a dataset and variable are chosen.
pub fn build_tile_url(
    selection: &LayerSelection,
    iso_time: &str,
    projection: &str,
    options: &InterpolationOptions,
) -> Option<String> {
    let (dataset, variable) = selection.pair()?;
    let masked = if selection.layer_type.is_meteorological() { 1 } else { 0 };
    Some(format!(
        "{}/tiles/{}/{}/{}/{}/{}/{}/{}/{}/{}/{}/{},{}/{{z}}/{{x}}/{{y}}.png",
        API_PREFIX,
        options.interp_type,
        options.interp_radius,
        options.interp_neighbours,
        projection,
        dataset,
        variable,
        iso_time,
        selection.depth,
        selection.scale,
        masked,
        selection.display,
        selection.colourmap,
    ))
}

/// URL the scale control queries to compute an automatic colour range.
pub fn range_url(
    selection: &LayerSelection,
    iso_time: &str,
    view: &MapView,
    options: &InterpolationOptions,
) -> Option<String> {
    let (dataset, variable) = selection.pair()?;
    let extent = view
        .extent
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Some(format!(
        "{}/range/{}/{}/{}/{}/{}/{}/{}/{}/{}.json",
        API_PREFIX,
        dataset,
        variable,
        options.interp_type,
        options.interp_radius,
        options.interp_neighbours,
        view.projection,
        extent,
        selection.depth,
        iso_time,
    ))
}

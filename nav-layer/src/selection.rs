//! Selection state owned by a single layer, and the map-wide settings it reads.

use nav_core::map::{LayerType, MapSide, Quantum};
use nav_core::metadata::{DatasetDescriptor, DepthDescriptor, VariableDescriptor};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE: &str = "-5,30";
pub const DEFAULT_DISPLAY: &str = "contours";
pub const DEFAULT_COLOURMAP: &str = "default";
pub const DEFAULT_OPACITY: u8 = 50;

/// Current choices of one layer panel.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LayerSelection {
    pub map_side: MapSide,
    pub layer_type: LayerType,
    pub dataset: Option<String>,
    pub variable: Option<String>,
    pub depth: u32,
    pub quantum: Quantum,
    pub colourmap: String,
    pub display: String,
    pub scale: String,
    /// 0-100
    pub opacity: u8,
}

impl LayerSelection {
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            map_side: MapSide::Left,
            layer_type,
            dataset: None,
            variable: None,
            depth: 0,
            quantum: Quantum::None,
            colourmap: DEFAULT_COLOURMAP.to_string(),
            display: DEFAULT_DISPLAY.to_string(),
            scale: DEFAULT_SCALE.to_string(),
            opacity: DEFAULT_OPACITY,
        }
    }

    /// The (dataset, variable) pair once both are chosen.
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.dataset.as_deref()?, self.variable.as_deref()?))
    }
}

/// Metadata lists backing the selectors. Each list is replaced wholesale.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MetadataCollections {
    pub datasets: Vec<DatasetDescriptor>,
    pub variables: Vec<VariableDescriptor>,
    pub depths: Vec<DepthDescriptor>,
}

impl MetadataCollections {
    pub fn dataset(&self, id: &str) -> Option<&DatasetDescriptor> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn variable(&self, id: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|v| v.id == id)
    }
}

/// Server-side interpolation settings shared by every layer.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterpolationOptions {
    pub interp_type: String,
    pub interp_radius: u32,
    pub interp_neighbours: u32,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            interp_type: "gaussian".to_string(),
            interp_radius: 25,
            interp_neighbours: 10,
        }
    }
}

/// Projection and visible extent of the map views.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MapView {
    pub projection: String,
    /// [min_x, min_y, max_x, max_y] in projection units
    pub extent: [f64; 4],
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            projection: "EPSG:3857".to_string(),
            extent: [-20037508.34, -20048966.1, 20037508.34, 20048966.1],
        }
    }
}

/// Key under which the parent stores the selected time of a layer.
pub fn time_key(layer_type: &LayerType, dataset: &str, index: usize) -> String {
    format!("{}{}{}", layer_type, dataset, index + 1)
}

/// Key of the time shared by every layer of one map.
pub fn global_time_key(side: MapSide) -> String {
    format!("{}Map", side)
}

//! The seam between a layer and the container that owns shared state.
//!
//! Layers read shared values through the getters and hand back whole
//! replacements through `global_update`; they never edit shared state in place.

use crate::selection::{InterpolationOptions, MapView};
use crate::tile::{LayerId, TileLayer};
use chrono::{DateTime, Utc};
use nav_core::map::MapSide;
use nav_registry::{RequestDataRegistry, TimeSourceRegistry};
use serde::{Deserialize, Serialize};

/// A tile layer currently drawn on one of the maps.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ActiveLayer {
    pub side: MapSide,
    pub id: LayerId,
    pub name: String,
}

/// Replacement for one named shared slot.
#[derive(Debug, PartialEq, Clone)]
pub enum GlobalUpdate {
    Data(RequestDataRegistry),
    TimeSources(TimeSourceRegistry),
    Layers(Vec<ActiveLayer>),
}

impl GlobalUpdate {
    /// Slot name as the container knows it.
    pub fn key(&self) -> &'static str {
        match self {
            GlobalUpdate::Data(_) => "data",
            GlobalUpdate::TimeSources(_) => "timeSources",
            GlobalUpdate::Layers(_) => "layers",
        }
    }
}

pub trait LayerHost {
    fn time_sources(&self) -> TimeSourceRegistry;
    fn request_data(&self) -> RequestDataRegistry;
    fn active_layers(&self) -> Vec<ActiveLayer>;
    /// Selected time, by `selection::time_key` or `selection::global_time_key`.
    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>>;
    fn map_view(&self) -> MapView;
    fn interpolation(&self) -> InterpolationOptions;

    /// Replace one shared slot.
    fn global_update(&mut self, update: GlobalUpdate);
    /// Ask the map on `side` to redraw its layers.
    fn reload_map(&mut self, side: MapSide);
    /// Add or remove a tile layer on the map on `side`.
    fn toggle_map_layer(&mut self, side: MapSide, layer: &TileLayer, active: bool);
    /// Drop a layer panel and its request data. The controller has already
    /// released its time-source use.
    fn remove_layer(&mut self, side: MapSide, dataset: Option<&str>, variable: Option<&str>, index: usize);
}

//! In-memory parent for layer controllers.
//!
//! Holds the shared registries, the per-layer timestamps and the map
//! settings, and records what it was asked to do to the maps so a caller
//! (the CLI, or a test) can replay or inspect it.

use crate::host::{ActiveLayer, GlobalUpdate, LayerHost};
use crate::selection::{InterpolationOptions, MapView};
use crate::tile::{LayerId, TileLayer};
use chrono::{DateTime, Utc};
use log::{debug, info};
use nav_core::map::{LayerType, MapSide};
use nav_registry::{RequestDataRegistry, TimeSourceRegistry};
use std::collections::{BTreeMap, HashMap};

/// A request a layer made of one of the maps.
#[derive(Debug, PartialEq, Clone)]
pub enum MapEvent {
    Reload(MapSide),
    Added(MapSide, LayerId),
    Removed(MapSide, LayerId),
}

#[derive(Debug, Default)]
pub struct Container {
    pub time_sources: TimeSourceRegistry,
    pub data: RequestDataRegistry,
    pub layers: Vec<ActiveLayer>,
    pub timestamps: HashMap<String, DateTime<Utc>>,
    pub map_view: MapView,
    pub interpolation: InterpolationOptions,
    panels: BTreeMap<usize, LayerType>,
    next_panel: usize,
    events: Vec<MapEvent>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a layer panel and return the index its controller should use.
    pub fn add_panel(&mut self, layer_type: LayerType) -> usize {
        let index = self.next_panel;
        self.next_panel += 1;
        info!("Adding {} panel {}", layer_type, index);
        self.panels.insert(index, layer_type);
        index
    }

    pub fn panels(&self) -> impl Iterator<Item = (usize, &LayerType)> {
        self.panels.iter().map(|(i, t)| (*i, t))
    }

    pub fn set_timestamp(&mut self, key: impl Into<String>, time: DateTime<Utc>) {
        self.timestamps.insert(key.into(), time);
    }

    /// Retire `(dataset, variable)` from the request data of `side`, under
    /// whatever layer type it was recorded.
    pub fn remove_data(&mut self, side: MapSide, dataset: &str, variable: &str) {
        self.data = self.data.remove_everywhere(side, dataset, variable);
    }

    pub fn events(&self) -> &[MapEvent] {
        &self.events
    }

    /// Hand over the recorded map events, leaving the log empty.
    pub fn take_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }
}

impl LayerHost for Container {
    fn time_sources(&self) -> TimeSourceRegistry {
        self.time_sources.clone()
    }

    fn request_data(&self) -> RequestDataRegistry {
        self.data.clone()
    }

    fn active_layers(&self) -> Vec<ActiveLayer> {
        self.layers.clone()
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(key).copied()
    }

    fn map_view(&self) -> MapView {
        self.map_view.clone()
    }

    fn interpolation(&self) -> InterpolationOptions {
        self.interpolation.clone()
    }

    fn global_update(&mut self, update: GlobalUpdate) {
        debug!("global update: {}", update.key());
        match update {
            GlobalUpdate::Data(data) => self.data = data,
            GlobalUpdate::TimeSources(time_sources) => self.time_sources = time_sources,
            GlobalUpdate::Layers(layers) => self.layers = layers,
        }
    }

    fn reload_map(&mut self, side: MapSide) {
        self.events.push(MapEvent::Reload(side));
    }

    fn toggle_map_layer(&mut self, side: MapSide, layer: &TileLayer, active: bool) {
        let event = if active {
            MapEvent::Added(side, layer.id)
        } else {
            MapEvent::Removed(side, layer.id)
        };
        self.events.push(event);
    }

    fn remove_layer(&mut self, side: MapSide, dataset: Option<&str>, variable: Option<&str>, index: usize) {
        let Some(layer_type) = self.panels.remove(&index) else {
            debug!("No panel {}", index);
            return;
        };
        info!("Removing {} panel {}", layer_type, index);
        if let (Some(dataset), Some(variable)) = (dataset, variable) {
            self.remove_data(side, dataset, variable);
        }
    }
}

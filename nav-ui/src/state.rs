//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.
//! Layer controllers reach it through `PanelHost`, which implements `LayerHost`.

use crate::map_bridge;
use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use log::{debug, info};
use nav_core::api::ApiClient;
use nav_core::config::ClientConfig;
use nav_core::error::ApiError;
use nav_core::map::{LayerType, MapSide};
use nav_core::metadata::{Colourmap, Timestamp};
use nav_layer::host::{ActiveLayer, GlobalUpdate, LayerHost};
use nav_layer::selection::{InterpolationOptions, MapView};
use nav_layer::tile::TileLayer;
use nav_registry::{RequestDataRegistry, TimeSourceRegistry};
use std::collections::HashMap;

/// Shared application state for the navigator map.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Where metadata requests go
    pub config: Signal<ClientConfig>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    /// Open layer panels as (index, layer type)
    pub panels: Signal<Vec<(usize, LayerType)>>,
    pub next_panel: Signal<usize>,
    /// Whether the right-hand map is shown
    pub compare: Signal<bool>,
    pub time_sources: Signal<TimeSourceRegistry>,
    pub data: Signal<RequestDataRegistry>,
    pub layers: Signal<Vec<ActiveLayer>>,
    /// Selected times, keyed by `selection::time_key` for a layer's own time
    /// and `selection::global_time_key` for a map's shared time
    pub timestamps: Signal<HashMap<String, DateTime<Utc>>>,
    /// Available times per dataset
    pub timelines: Signal<HashMap<String, Vec<Timestamp>>>,
    pub colourmaps: Signal<Vec<Colourmap>>,
    pub map_view: Signal<MapView>,
    pub interpolation: Signal<InterpolationOptions>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            config: Signal::new(ClientConfig::same_origin()),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            panels: Signal::new(Vec::new()),
            next_panel: Signal::new(0),
            compare: Signal::new(false),
            time_sources: Signal::new(TimeSourceRegistry::new()),
            data: Signal::new(RequestDataRegistry::new()),
            layers: Signal::new(Vec::new()),
            timestamps: Signal::new(HashMap::new()),
            timelines: Signal::new(HashMap::new()),
            colourmaps: Signal::new(Vec::new()),
            map_view: Signal::new(MapView::default()),
            interpolation: Signal::new(InterpolationOptions::default()),
        }
    }

    /// Open a layer panel and return its index. Indices are never reused.
    pub fn add_panel(&mut self, layer_type: LayerType) -> usize {
        let index = (self.next_panel)();
        self.next_panel.set(index + 1);
        info!("Adding {} panel {}", layer_type, index);
        self.panels.write().push((index, layer_type));
        index
    }

    pub fn client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(&self.config.read())
    }
}

/// `LayerHost` over the app signals for the duration of one controller call.
///
/// Reload requests are collected and sent to the map once the call returns,
/// so the bridge sees the layer's new tile source. Reads peek, so effects
/// driving a controller do not subscribe to the slots it writes.
pub struct PanelHost {
    state: AppState,
    reloads: Vec<MapSide>,
}

impl PanelHost {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            reloads: Vec::new(),
        }
    }

    /// Push pending reloads for `tile_layer` to the maps.
    pub fn finish(self, tile_layer: &TileLayer) {
        if self.reloads.is_empty() {
            return;
        }
        let mut reloads = self.reloads;
        reloads.dedup();
        for side in reloads {
            map_bridge::reload_map(side, std::slice::from_ref(tile_layer));
        }
    }
}

impl LayerHost for PanelHost {
    fn time_sources(&self) -> TimeSourceRegistry {
        self.state.time_sources.peek().clone()
    }

    fn request_data(&self) -> RequestDataRegistry {
        self.state.data.peek().clone()
    }

    fn active_layers(&self) -> Vec<ActiveLayer> {
        self.state.layers.peek().clone()
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.state.timestamps.peek().get(key).copied()
    }

    fn map_view(&self) -> MapView {
        self.state.map_view.peek().clone()
    }

    fn interpolation(&self) -> InterpolationOptions {
        self.state.interpolation.peek().clone()
    }

    fn global_update(&mut self, update: GlobalUpdate) {
        debug!("global update: {}", update.key());
        match update {
            GlobalUpdate::Data(data) => self.state.data.set(data),
            GlobalUpdate::TimeSources(time_sources) => self.state.time_sources.set(time_sources),
            GlobalUpdate::Layers(layers) => self.state.layers.set(layers),
        }
    }

    fn reload_map(&mut self, side: MapSide) {
        self.reloads.push(side);
    }

    fn toggle_map_layer(&mut self, side: MapSide, layer: &TileLayer, active: bool) {
        if active {
            map_bridge::add_layer(side, layer);
        } else {
            map_bridge::remove_layer(side, layer.id);
        }
    }

    fn remove_layer(&mut self, side: MapSide, dataset: Option<&str>, variable: Option<&str>, index: usize) {
        let layer_type = {
            let mut panels = self.state.panels.write();
            let Some(position) = panels.iter().position(|(i, _)| *i == index) else {
                return;
            };
            panels.remove(position).1
        };
        info!("Removing {} panel {}", layer_type, index);
        if let (Some(dataset), Some(variable)) = (dataset, variable) {
            let data = self.state.data.peek().remove_everywhere(side, dataset, variable);
            self.state.data.set(data);
        }
    }
}

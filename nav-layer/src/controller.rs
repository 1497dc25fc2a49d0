//! Selection cascade for one map layer.
//!
//! Choosing a dataset triggers a chain of dependent fetches (variables, then
//! depths). The controller never performs I/O itself: each step hands back a
//! `Ticket` describing the fetch to run, and the caller feeds the outcome into
//! `resolve`. A reply whose ticket is not the one the cascade is waiting for
//! belongs to a superseded selection and is dropped.

use crate::error::{LayerError, Result};
use crate::host::{ActiveLayer, GlobalUpdate, LayerHost};
use crate::selection::{global_time_key, time_key, LayerSelection, MetadataCollections, DEFAULT_OPACITY};
use crate::tile::{build_tile_url, range_url, TileLayer, TileSource};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use nav_core::error::ApiError;
use nav_core::map::{LayerType, MapSide, Quantum};
use nav_core::metadata::{ScaleRange, DEFAULT_ATTRIBUTION};
use nav_core::request::{MetadataReply, MetadataRequest, Ticket};
use nav_registry::{DisplayMetadata, RecordMode};
use nav_utils::dates::date_to_iso;

/// Where the cascade stands. Waiting states carry the ticket they wait for.
#[derive(Debug, PartialEq, Clone)]
pub enum Cascade {
    Idle,
    LoadingDatasets {
        ticket: Ticket,
    },
    LoadingVariables {
        ticket: Ticket,
        dataset: String,
        quantum: Quantum,
    },
    LoadingDepths {
        ticket: Ticket,
        dataset: String,
        variable: String,
    },
    Ready,
}

impl Cascade {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Cascade::LoadingDatasets { ticket }
            | Cascade::LoadingVariables { ticket, .. }
            | Cascade::LoadingDepths { ticket, .. } => Some(ticket),
            Cascade::Idle | Cascade::Ready => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.ticket().is_some()
    }
}

/// Outcome of feeding a reply into the cascade.
#[derive(Debug, PartialEq, Clone)]
pub enum Resolution {
    /// Run this fetch next.
    Next(Ticket),
    /// The cascade settled; registries and tiles are up to date.
    Ready,
    /// The reply belonged to a superseded request and was ignored.
    Stale,
}

/// Whether the layer can follow the shared timeline of its map.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TimeSourceMode {
    Global,
    Own,
}

#[derive(Debug, PartialEq, Clone)]
struct Registration {
    side: MapSide,
    dataset: String,
    variable: String,
}

pub struct LayerController {
    index: usize,
    selection: LayerSelection,
    collections: MetadataCollections,
    cascade: Cascade,
    seq: u64,
    /// The pair currently recorded in the shared registries, if any.
    registered: Option<Registration>,
    /// Lists of the last good selection while a change is in flight.
    previous: Option<MetadataCollections>,
    tile_layer: TileLayer,
    visible: bool,
    compare: bool,
}

impl LayerController {
    /// A controller for the layer panel at `index`. Call `initialize` next.
    pub fn new(layer_type: LayerType, index: usize) -> Self {
        let tile_layer = TileLayer::new(layer_type.as_str(), DEFAULT_OPACITY);
        Self {
            index,
            selection: LayerSelection::new(layer_type),
            collections: MetadataCollections::default(),
            cascade: Cascade::Idle,
            seq: 0,
            registered: None,
            previous: None,
            tile_layer,
            visible: false,
            compare: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layer_type(&self) -> &LayerType {
        &self.selection.layer_type
    }

    pub fn selection(&self) -> &LayerSelection {
        &self.selection
    }

    pub fn collections(&self) -> &MetadataCollections {
        &self.collections
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_compare(&self) -> bool {
        self.compare
    }

    /// Whether the layer follows its map's shared time, read from the
    /// registry as it stands now.
    pub fn time_source(&self, host: &impl LayerHost) -> TimeSourceMode {
        let Some(dataset) = self.selection.dataset.as_deref() else {
            return TimeSourceMode::Global;
        };
        if host
            .time_sources()
            .shares_timeline(self.selection.map_side, &self.selection.layer_type, dataset)
        {
            TimeSourceMode::Global
        } else {
            TimeSourceMode::Own
        }
    }

    /// Key of the timestamp this layer draws at: the map's shared time in
    /// global mode, the layer's own otherwise.
    pub fn time_key(&self, host: &impl LayerHost) -> Option<String> {
        let dataset = self.selection.dataset.as_deref()?;
        Some(match self.time_source(host) {
            TimeSourceMode::Global => global_time_key(self.selection.map_side),
            TimeSourceMode::Own => time_key(&self.selection.layer_type, dataset, self.index),
        })
    }

    /// Keep the lists of the shown selection until the change lands.
    fn stash_collections(&mut self) {
        if self.previous.is_none() {
            self.previous = Some(self.collections.clone());
        }
    }

    fn issue(&mut self, request: MetadataRequest) -> Ticket {
        self.seq += 1;
        Ticket {
            seq: self.seq,
            request,
        }
    }

    /// The dataset the layer shows or is switching to.
    fn target_dataset(&self) -> Option<&str> {
        match &self.cascade {
            Cascade::LoadingVariables { dataset, .. } | Cascade::LoadingDepths { dataset, .. } => {
                Some(dataset)
            }
            _ => self.selection.dataset.as_deref(),
        }
    }

    /// The variable the layer shows or is switching to.
    fn target_variable(&self) -> Option<&str> {
        match &self.cascade {
            Cascade::LoadingDepths { variable, .. } => Some(variable),
            Cascade::LoadingVariables { .. } => None,
            _ => self.selection.variable.as_deref(),
        }
    }

    /// Start (or restart) the cascade by fetching the dataset list.
    pub fn initialize(&mut self) -> Ticket {
        let ticket = self.issue(MetadataRequest::Datasets {
            layer_type: self.selection.layer_type.clone(),
        });
        info!("Initializing {} layer {}", self.selection.layer_type, self.index);
        self.cascade = Cascade::LoadingDatasets {
            ticket: ticket.clone(),
        };
        ticket
    }

    /// Switch to another dataset from the loaded list.
    ///
    /// Returns `Ok(None)` when `dataset` is already selected (or being
    /// switched to); nothing is fetched or deregistered in that case.
    pub fn change_dataset(&mut self, dataset: &str, host: &mut impl LayerHost) -> Result<Option<Ticket>> {
        if self.target_dataset() == Some(dataset) {
            debug!("Dataset {} already selected", dataset);
            return Ok(None);
        }
        let quantum = self
            .collections
            .dataset(dataset)
            .map(|d| d.quantum)
            .ok_or_else(|| LayerError::UnknownDataset(dataset.to_string()))?;

        self.deregister(host);
        self.stash_collections();
        self.collections.variables.clear();
        self.collections.depths.clear();
        let ticket = self.issue(MetadataRequest::Variables {
            layer_type: self.selection.layer_type.clone(),
            dataset: dataset.to_string(),
        });
        info!("Changing dataset to {} ({})", dataset, ticket);
        self.cascade = Cascade::LoadingVariables {
            ticket: ticket.clone(),
            dataset: dataset.to_string(),
            quantum,
        };
        Ok(Some(ticket))
    }

    /// Switch variable within the current dataset. Only depths are refetched.
    pub fn change_variable(&mut self, variable: &str, host: &mut impl LayerHost) -> Result<Option<Ticket>> {
        if self.target_variable() == Some(variable) {
            debug!("Variable {} already selected", variable);
            return Ok(None);
        }
        if self.collections.variable(variable).is_none() {
            return Err(LayerError::UnknownVariable(variable.to_string()));
        }
        let dataset = self
            .selection
            .dataset
            .clone()
            .ok_or_else(|| LayerError::UnknownVariable(variable.to_string()))?;

        self.deregister(host);
        self.stash_collections();
        self.collections.depths.clear();
        let ticket = self.issue(MetadataRequest::Depths {
            dataset: dataset.clone(),
            variable: variable.to_string(),
        });
        info!("Changing variable to {} ({})", variable, ticket);
        self.cascade = Cascade::LoadingDepths {
            ticket: ticket.clone(),
            dataset,
            variable: variable.to_string(),
        };
        Ok(Some(ticket))
    }

    /// Feed the outcome of the fetch described by `ticket`.
    pub fn resolve(
        &mut self,
        ticket: &Ticket,
        outcome: std::result::Result<MetadataReply, ApiError>,
        host: &mut impl LayerHost,
    ) -> Result<Resolution> {
        if self.cascade.ticket() != Some(ticket) {
            debug!("Discarding stale reply {}", ticket);
            return Ok(Resolution::Stale);
        }
        let reply = match outcome {
            Ok(reply) if !reply.is_empty() => reply,
            Ok(_) => return Err(self.fail(ticket, "empty response".to_string(), host)),
            Err(e) => return Err(self.fail(ticket, e.to_string(), host)),
        };

        let state = std::mem::replace(&mut self.cascade, Cascade::Idle);
        match (state, reply) {
            (Cascade::LoadingDatasets { .. }, MetadataReply::Datasets(datasets)) => {
                let first = datasets[0].clone();
                debug!("{} datasets, selecting {}", datasets.len(), first.id);
                self.collections.datasets = datasets;
                self.collections.variables.clear();
                self.collections.depths.clear();
                self.previous = None;
                let next = self.issue(MetadataRequest::Variables {
                    layer_type: self.selection.layer_type.clone(),
                    dataset: first.id.clone(),
                });
                self.cascade = Cascade::LoadingVariables {
                    ticket: next.clone(),
                    dataset: first.id,
                    quantum: first.quantum,
                };
                Ok(Resolution::Next(next))
            }
            (Cascade::LoadingVariables { dataset, quantum, .. }, MetadataReply::Variables(variables)) => {
                let first = variables[0].id.clone();
                debug!("{} variables for {}, selecting {}", variables.len(), dataset, first);
                self.selection.dataset = Some(dataset.clone());
                self.selection.quantum = quantum;
                self.selection.variable = Some(first.clone());
                self.selection.depth = 0;
                self.collections.variables = variables;
                self.collections.depths.clear();
                self.previous = None;
                let next = self.issue(MetadataRequest::Depths {
                    dataset: dataset.clone(),
                    variable: first.clone(),
                });
                self.cascade = Cascade::LoadingDepths {
                    ticket: next.clone(),
                    dataset,
                    variable: first,
                };
                Ok(Resolution::Next(next))
            }
            (Cascade::LoadingDepths { dataset, variable, .. }, MetadataReply::Depths(depths)) => {
                if let Some(scale) = self.collections.variable(&variable).and_then(|v| v.scale_range()) {
                    self.selection.scale = scale;
                }
                self.selection.dataset = Some(dataset);
                self.selection.variable = Some(variable);
                self.selection.depth = 0;
                self.collections.depths = depths;
                self.previous = None;
                self.cascade = Cascade::Ready;
                self.register(host);
                self.refresh(host);
                info!("Layer {} ready: {:?}", self.index, self.selection.pair());
                Ok(Resolution::Ready)
            }
            (state, _) => {
                self.cascade = state;
                Err(self.fail(ticket, "reply does not match request".to_string(), host))
            }
        }
    }

    /// Settle after a failed fetch, keeping the last good selection and making
    /// sure the registries still describe it.
    fn fail(&mut self, ticket: &Ticket, reason: String, host: &mut impl LayerHost) -> LayerError {
        warn!("Metadata fetch {} failed: {}", ticket, reason);
        if let Some(previous) = self.previous.take() {
            debug!("Restoring lists of {:?}", self.selection.pair());
            self.collections = previous;
        }
        self.cascade = if self.selection.pair().is_some() {
            Cascade::Ready
        } else {
            Cascade::Idle
        };
        if self.registered.is_none() && self.selection.pair().is_some() {
            self.register(host);
            self.refresh(host);
        }
        LayerError::MetadataUnavailable {
            request: ticket.request.to_string(),
            reason,
        }
    }

    pub fn change_depth(&mut self, depth: u32, host: &mut impl LayerHost) {
        debug!("Changing depth to {}", depth);
        self.selection.depth = depth;
        self.update_request_data(host);
        self.refresh(host);
    }

    pub fn set_scale(&mut self, scale: &str, host: &mut impl LayerHost) {
        self.selection.scale = scale.to_string();
        self.update_request_data(host);
        self.refresh(host);
    }

    /// Apply a range fetched from `range_url`.
    pub fn apply_range(&mut self, range: &ScaleRange, host: &mut impl LayerHost) {
        info!("Layer {} auto scale {}", self.index, range.to_scale());
        self.set_scale(&range.to_scale(), host);
    }

    pub fn set_display(&mut self, display: &str, host: &mut impl LayerHost) {
        self.selection.display = display.to_string();
        self.update_request_data(host);
        self.refresh(host);
    }

    pub fn set_colourmap(&mut self, colourmap: &str, host: &mut impl LayerHost) {
        self.selection.colourmap = colourmap.to_string();
        self.update_request_data(host);
        self.refresh(host);
    }

    /// Opacity is a layer property; the tile source is left alone.
    pub fn set_opacity(&mut self, opacity: u8, host: &mut impl LayerHost) {
        self.selection.opacity = opacity.min(100);
        self.tile_layer.set_opacity(self.selection.opacity);
        if self.visible {
            host.reload_map(self.selection.map_side);
        }
    }

    /// Re-point the tile layer after the parent's timestamps changed.
    pub fn on_timestamps_changed(&mut self, host: &mut impl LayerHost) {
        self.update_request_data(host);
        self.refresh(host);
    }

    /// The shared time falls back to the layer's own until one is set.
    pub fn current_time(&self, host: &impl LayerHost) -> Option<DateTime<Utc>> {
        let dataset = self.selection.dataset.as_deref()?;
        let own = time_key(&self.selection.layer_type, dataset, self.index);
        match self.time_source(host) {
            TimeSourceMode::Global => host
                .timestamp(&global_time_key(self.selection.map_side))
                .or_else(|| host.timestamp(&own)),
            TimeSourceMode::Own => host.timestamp(&own),
        }
    }

    /// Selected time rendered at the dataset's quantum.
    pub fn iso_time(&self, host: &impl LayerHost) -> Option<String> {
        self.current_time(host)
            .map(|t| date_to_iso(&t, self.selection.quantum))
    }

    /// Auto-scale URL for the current selection, once a time is known.
    pub fn range_url(&self, host: &impl LayerHost) -> Option<String> {
        let iso = self.iso_time(host)?;
        range_url(&self.selection, &iso, &host.map_view(), &host.interpolation())
    }

    /// Build a new tile source from the current selection, swap it into the
    /// layer and ask the owning map to reload. Returns false when there is
    /// nothing to draw yet.
    pub fn refresh(&mut self, host: &mut impl LayerHost) -> bool {
        let Some(iso) = self.iso_time(&*host) else {
            debug!("Layer {} has no timestamp yet", self.index);
            return false;
        };
        let view = host.map_view();
        let Some(url) = build_tile_url(&self.selection, &iso, &view.projection, &host.interpolation()) else {
            return false;
        };
        let attribution = self
            .selection
            .dataset
            .as_deref()
            .and_then(|d| self.collections.dataset(d))
            .map(|d| d.attribution().to_string())
            .unwrap_or_else(|| DEFAULT_ATTRIBUTION.to_string());
        debug!("Layer {} tiles: {}", self.index, url);
        self.tile_layer.set_source(TileSource {
            url,
            projection: view.projection,
            attributions: vec![attribution],
        });
        host.reload_map(self.selection.map_side);
        true
    }

    /// Add the tile layer to its map, or take it off.
    pub fn toggle_layer_visibility(&mut self, host: &mut impl LayerHost) {
        let side = self.selection.map_side;
        let mut layers = host.active_layers();
        if self.visible {
            layers.retain(|l| l.id != self.tile_layer.id);
            host.global_update(GlobalUpdate::Layers(layers));
            host.toggle_map_layer(side, &self.tile_layer, false);
            self.visible = false;
        } else {
            self.refresh(host);
            layers.push(ActiveLayer {
                side,
                id: self.tile_layer.id,
                name: self.tile_layer.name.clone(),
            });
            host.global_update(GlobalUpdate::Layers(layers));
            host.toggle_map_layer(side, &self.tile_layer, true);
            self.visible = true;
        }
    }

    /// Move the layer to the other map, carrying its registrations along.
    pub fn toggle_compare_map_side(&mut self, host: &mut impl LayerHost) {
        let was_visible = self.visible;
        if was_visible {
            self.toggle_layer_visibility(host);
        }
        let was_registered = self.registered.is_some();
        self.deregister(host);
        self.selection.map_side = self.selection.map_side.opposite();
        self.compare = !self.compare;
        info!("Layer {} now on {} map", self.index, self.selection.map_side);
        if was_registered {
            self.register(host);
        }
        if was_visible {
            self.toggle_layer_visibility(host);
        }
    }

    /// Bring the layer back to the left map when the right one goes away.
    pub fn leave_compare(&mut self, host: &mut impl LayerHost) {
        if self.selection.map_side == MapSide::Right {
            self.toggle_compare_map_side(host);
        }
    }

    /// Retire the layer: drop its registrations, take it off the map and
    /// tell the parent to remove the panel.
    pub fn remove(&mut self, host: &mut impl LayerHost) {
        if self.visible {
            self.toggle_layer_visibility(host);
        }
        let side = self.selection.map_side;
        self.deregister(host);
        host.remove_layer(
            side,
            self.selection.dataset.as_deref(),
            self.selection.variable.as_deref(),
            self.index,
        );
    }

    fn display_metadata(&self, host: &impl LayerHost) -> DisplayMetadata {
        DisplayMetadata {
            quantum: self.selection.quantum,
            time: self.current_time(host),
            scale: self.selection.scale.clone(),
            display: self.selection.display.clone(),
            colourmap: self.selection.colourmap.clone(),
            depth: self.selection.depth,
        }
    }

    /// Record the selected pair in both shared registries.
    fn register(&mut self, host: &mut impl LayerHost) {
        let (dataset, variable) = match self.selection.pair() {
            Some((d, v)) => (d.to_string(), v.to_string()),
            None => return,
        };
        let side = self.selection.map_side;
        let registration = Registration {
            side,
            dataset: dataset.clone(),
            variable: variable.clone(),
        };
        if self.registered.as_ref() == Some(&registration) {
            return;
        }
        self.deregister(host);

        let layer_type = self.selection.layer_type.clone();
        let time_sources = host
            .time_sources()
            .register(side, &layer_type, &dataset, &variable, self.selection.quantum);
        host.global_update(GlobalUpdate::TimeSources(time_sources));

        let metadata = self.display_metadata(&*host);
        let data = host
            .request_data()
            .record_use(side, &layer_type, &dataset, &variable, &metadata, RecordMode::Count);
        host.global_update(GlobalUpdate::Data(data));
        self.registered = Some(registration);
    }

    fn deregister(&mut self, host: &mut impl LayerHost) {
        let Some(registration) = self.registered.take() else {
            return;
        };
        let layer_type = &self.selection.layer_type;
        let time_sources = host.time_sources().deregister(
            registration.side,
            layer_type,
            &registration.dataset,
            &registration.variable,
        );
        host.global_update(GlobalUpdate::TimeSources(time_sources));
        let data = host.request_data().remove_use(
            registration.side,
            layer_type,
            &registration.dataset,
            &registration.variable,
        );
        host.global_update(GlobalUpdate::Data(data));
    }

    /// Push changed display parameters into the existing request-data entry.
    fn update_request_data(&self, host: &mut impl LayerHost) {
        let Some(registration) = &self.registered else {
            return;
        };
        let metadata = self.display_metadata(&*host);
        let data = host.request_data().record_use(
            registration.side,
            &self.selection.layer_type,
            &registration.dataset,
            &registration.variable,
            &metadata,
            RecordMode::Update,
        );
        host.global_update(GlobalUpdate::Data(data));
    }
}

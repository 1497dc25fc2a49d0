//! What each map side is showing, for the modal report windows.
//!
//! Layout: `map side -> layer type -> dataset -> variable -> RequestData`.

use chrono::{DateTime, Utc};
use log::debug;
use nav_core::map::{LayerType, MapSide, Quantum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display parameters last used for a (dataset, variable) pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DisplayMetadata {
    pub quantum: Quantum,
    pub time: Option<DateTime<Utc>>,
    pub scale: String,
    pub display: String,
    pub colourmap: String,
    pub depth: u32,
}

/// One registry entry. `frequency` counts the views referencing the tuple.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequestData {
    pub frequency: u32,
    #[serde(flatten)]
    pub metadata: DisplayMetadata,
}

/// How `record_use` treats an entry that already exists.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecordMode {
    /// Another use of the tuple: bump the frequency, keep the stored metadata.
    Count,
    /// Same use, new display parameters: overwrite metadata, keep the frequency.
    Update,
}

type VariableData = BTreeMap<String, RequestData>;
type DatasetData = BTreeMap<String, VariableData>;
type LayerData = BTreeMap<LayerType, DatasetData>;

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestDataRegistry(BTreeMap<MapSide, LayerData>);

impl RequestDataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_use(
        &self,
        side: MapSide,
        layer_type: &LayerType,
        dataset: &str,
        variable: &str,
        metadata: &DisplayMetadata,
        mode: RecordMode,
    ) -> Self {
        let mut next = self.clone();
        let variables = next
            .0
            .entry(side)
            .or_default()
            .entry(layer_type.clone())
            .or_default()
            .entry(dataset.to_string())
            .or_default();
        match variables.get_mut(variable) {
            Some(entry) => match mode {
                RecordMode::Count => entry.frequency += 1,
                RecordMode::Update => entry.metadata = metadata.clone(),
            },
            None => {
                variables.insert(
                    variable.to_string(),
                    RequestData {
                        frequency: 1,
                        metadata: metadata.clone(),
                    },
                );
            }
        }
        debug!("request data {:?} {}/{}/{}/{}", mode, side, layer_type, dataset, variable);
        next
    }

    /// Retire the tuple entirely (regardless of frequency) and drop emptied
    /// dataset, layer type and map side levels. Missing tuples are ignored.
    pub fn remove_use(&self, side: MapSide, layer_type: &LayerType, dataset: &str, variable: &str) -> Self {
        if self.get(side, layer_type, dataset, variable).is_none() {
            return self.clone();
        }
        let mut next = self.clone();
        next.remove_in_place(side, layer_type, dataset, variable);
        debug!("request data - {}/{}/{}/{}", side, layer_type, dataset, variable);
        next
    }

    /// Retire `(dataset, variable)` under every layer type of `side`.
    pub fn remove_everywhere(&self, side: MapSide, dataset: &str, variable: &str) -> Self {
        let layer_types: Vec<LayerType> = match self.0.get(&side) {
            Some(layers) => layers.keys().cloned().collect(),
            None => return self.clone(),
        };
        let mut next = self.clone();
        for layer_type in &layer_types {
            next.remove_in_place(side, layer_type, dataset, variable);
        }
        next
    }

    fn remove_in_place(&mut self, side: MapSide, layer_type: &LayerType, dataset: &str, variable: &str) {
        let Some(layers) = self.0.get_mut(&side) else {
            return;
        };
        if let Some(datasets) = layers.get_mut(layer_type) {
            if let Some(variables) = datasets.get_mut(dataset) {
                variables.remove(variable);
                if variables.is_empty() {
                    datasets.remove(dataset);
                }
            }
            if datasets.is_empty() {
                layers.remove(layer_type);
            }
        }
        if layers.is_empty() {
            self.0.remove(&side);
        }
    }

    pub fn get(&self, side: MapSide, layer_type: &LayerType, dataset: &str, variable: &str) -> Option<&RequestData> {
        self.0.get(&side)?.get(layer_type)?.get(dataset)?.get(variable)
    }

    /// Flattened view of every entry on one side, in key order.
    pub fn entries(&self, side: MapSide) -> Vec<(&LayerType, &str, &str, &RequestData)> {
        let Some(layers) = self.0.get(&side) else {
            return Vec::new();
        };
        layers
            .iter()
            .flat_map(|(layer_type, datasets)| {
                datasets.iter().flat_map(move |(dataset, variables)| {
                    variables
                        .iter()
                        .map(move |(variable, data)| (layer_type, dataset.as_str(), variable.as_str(), data))
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

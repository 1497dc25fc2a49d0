//! Which datasets drive the timeline of each map side.
//!
//! Layout: `map side -> layer type -> dataset -> { variables, quantum }`.
//! A dataset entry exists exactly while at least one layer shows one of its
//! variables; emptied levels are removed on the way out. Each variable keeps
//! a count of the layers showing it, so one layer switching away does not
//! pull the entry from under another.

use log::debug;
use nav_core::map::{LayerType, MapSide, Quantum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variables of one dataset currently in use, and the dataset's quantum.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct TimeSource {
    /// Layers using each variable. Serialized as the set of variable ids.
    #[serde(with = "variable_set")]
    pub variables: BTreeMap<String, u32>,
    pub quantum: Quantum,
}

impl TimeSource {
    pub fn contains(&self, variable: &str) -> bool {
        self.variables.contains_key(variable)
    }

    /// Number of layers showing `variable`.
    pub fn uses(&self, variable: &str) -> u32 {
        self.variables.get(variable).copied().unwrap_or(0)
    }
}

/// Counts stay in memory; the wire form is a sorted list of ids, read back
/// with one use each.
mod variable_set {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(variables: &BTreeMap<String, u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(variables.keys())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error> {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().map(|id| (id, 1)).collect())
    }
}

type DatasetSources = BTreeMap<String, TimeSource>;
type LayerSources = BTreeMap<LayerType, DatasetSources>;

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSourceRegistry(BTreeMap<MapSide, LayerSources>);

impl TimeSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one use of `variable` to the dataset entry, creating it if needed.
    /// The visible variable set only changes on the first use.
    pub fn register(
        &self,
        side: MapSide,
        layer_type: &LayerType,
        dataset: &str,
        variable: &str,
        quantum: Quantum,
    ) -> Self {
        let mut next = self.clone();
        let source = next
            .0
            .entry(side)
            .or_default()
            .entry(layer_type.clone())
            .or_default()
            .entry(dataset.to_string())
            .or_insert_with(|| TimeSource {
                variables: BTreeMap::new(),
                quantum,
            });
        let uses = source.variables.entry(variable.to_string()).or_insert(0);
        *uses += 1;
        debug!(
            "time source + {}/{}/{}/{} ({} uses)",
            side, layer_type, dataset, variable, uses
        );
        next
    }

    /// Drop one use of `variable`. The variable goes at its last use, and the
    /// dataset, layer type and map side entries go as they become empty.
    /// Missing tuples are ignored.
    pub fn deregister(
        &self,
        side: MapSide,
        layer_type: &LayerType,
        dataset: &str,
        variable: &str,
    ) -> Self {
        if self.get(side, layer_type, dataset).is_none() {
            return self.clone();
        }
        let mut next = self.clone();
        if let Some(layers) = next.0.get_mut(&side) {
            if let Some(datasets) = layers.get_mut(layer_type) {
                if let Some(source) = datasets.get_mut(dataset) {
                    match source.variables.get_mut(variable) {
                        Some(uses) if *uses > 1 => *uses -= 1,
                        _ => {
                            source.variables.remove(variable);
                        }
                    }
                    if source.variables.is_empty() {
                        datasets.remove(dataset);
                    }
                }
                if datasets.is_empty() {
                    layers.remove(layer_type);
                }
            }
            if layers.is_empty() {
                next.0.remove(&side);
            }
        }
        debug!("time source - {}/{}/{}/{}", side, layer_type, dataset, variable);
        next
    }

    pub fn get(&self, side: MapSide, layer_type: &LayerType, dataset: &str) -> Option<&TimeSource> {
        self.0.get(&side)?.get(layer_type)?.get(dataset)
    }

    /// All datasets registered for a layer type on one map side.
    pub fn datasets(&self, side: MapSide, layer_type: &LayerType) -> Option<&BTreeMap<String, TimeSource>> {
        self.0.get(&side)?.get(layer_type)
    }

    /// True when no dataset on `side` runs on a different quantum than
    /// `dataset`, so a single global timeline can drive them all.
    pub fn shares_timeline(&self, side: MapSide, layer_type: &LayerType, dataset: &str) -> bool {
        let quantum = match self.get(side, layer_type, dataset) {
            Some(source) => source.quantum,
            None => return true,
        };
        self.0
            .get(&side)
            .map(|layers| {
                layers
                    .values()
                    .flat_map(|datasets| datasets.values())
                    .all(|source| source.quantum == quantum)
            })
            .unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// No empty variable set, dataset map, layer-type map or side map is stored.
    pub fn is_well_formed(&self) -> bool {
        self.0.values().all(|layers| {
            !layers.is_empty()
                && layers.values().all(|datasets| {
                    !datasets.is_empty() && datasets.values().all(|s| !s.variables.is_empty())
                })
        })
    }
}

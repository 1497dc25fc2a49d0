//! Descriptors returned by the metadata endpoints.

use crate::map::Quantum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribution used when a dataset does not carry its own.
pub const DEFAULT_ATTRIBUTION: &str = "CONCEPTS";

/// One entry of `GET /api/v1.0/datasets/`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub id: String,
    #[serde(default)]
    pub quantum: Quantum,
    /// Human-readable name
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
}

impl DatasetDescriptor {
    pub fn new(id: impl Into<String>, quantum: Quantum) -> Self {
        Self {
            id: id.into(),
            quantum,
            value: None,
            attribution: None,
        }
    }

    pub fn attribution(&self) -> &str {
        self.attribution.as_deref().unwrap_or(DEFAULT_ATTRIBUTION)
    }
}

/// One entry of `GET /api/v1.0/variables/`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub id: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Default colour scale as `[min, max]`
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl VariableDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: None,
            scale: None,
        }
    }

    /// The default scale formatted the way the tile endpoint expects ("min,max").
    pub fn scale_range(&self) -> Option<String> {
        match self.scale.as_deref() {
            Some([min, max, ..]) => Some(format!("{},{}", min, max)),
            _ => None,
        }
    }
}

/// One entry of `GET /api/v1.0/depth/`.
///
/// The server answers either with bare numbers (`[0, 10, 50]`) or with
/// `{ "id": .., "value": .. }` objects; both forms are accepted.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DepthDescriptor {
    pub id: u32,
    pub value: String,
}

impl DepthDescriptor {
    pub fn new(id: u32, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

fn depth_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| {
                n.as_f64()
                    .map(|v| v.max(0.0).round())
                    .filter(|v| *v <= f64::from(u32::MAX))
                    .map(|v| v as u32)
            }),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn depth_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TryFrom<Value> for DepthDescriptor {
    type Error = String;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        match &raw {
            Value::Object(map) => {
                let id = map
                    .get("id")
                    .and_then(depth_id)
                    .ok_or_else(|| format!("depth entry without usable id: {}", raw))?;
                let value = map
                    .get("value")
                    .map(depth_label)
                    .unwrap_or_else(|| id.to_string());
                Ok(DepthDescriptor { id, value })
            }
            other => depth_id(other)
                .map(|id| DepthDescriptor {
                    id,
                    value: depth_label(other),
                })
                .ok_or_else(|| format!("unrecognised depth entry: {}", raw)),
        }
    }
}

/// Answer of `GET /api/v1.0/range/...json`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    /// "min,max" as the tile endpoint expects it.
    pub fn to_scale(&self) -> String {
        format!("{},{}", self.min, self.max)
    }
}

/// One entry of `GET /api/v1.0/colormaps/`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Colourmap {
    pub id: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// One entry of `GET /api/v1.0/timestamps/`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Timestamp {
    pub id: i64,
    pub value: DateTime<Utc>,
}

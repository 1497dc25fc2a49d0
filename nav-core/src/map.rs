use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two side-by-side map panels a layer renders on.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSide {
    Left,
    Right,
}

impl MapSide {
    /// The panel on the other side, used when a layer becomes the comparison layer.
    pub fn opposite(self) -> MapSide {
        match self {
            MapSide::Left => MapSide::Right,
            MapSide::Right => MapSide::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapSide::Left => "left",
            MapSide::Right => "right",
        }
    }
}

impl Default for MapSide {
    fn default() -> Self {
        MapSide::Left
    }
}

impl fmt::Display for MapSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The category of data a layer displays, sent to the API as `envType`.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerType(pub String);

impl LayerType {
    pub const OCEAN: &'static str = "ocean";
    /// Meteorological layers are drawn with land left unmasked.
    pub const MET: &'static str = "met";
    pub const ICE: &'static str = "ice";

    pub fn new(name: impl Into<String>) -> Self {
        LayerType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_meteorological(&self) -> bool {
        self.0 == Self::MET
    }
}

impl From<&str> for LayerType {
    fn from(value: &str) -> Self {
        LayerType(value.to_string())
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time granularity of a dataset's timestamps.
///
/// Unrecognised strings from the server map to `Quantum::None`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quantum {
    Min,
    Hour,
    Day,
    Month,
    Year,
    None,
}

impl Quantum {
    pub fn as_str(self) -> &'static str {
        match self {
            Quantum::Min => "min",
            Quantum::Hour => "hour",
            Quantum::Day => "day",
            Quantum::Month => "month",
            Quantum::Year => "year",
            Quantum::None => "none",
        }
    }
}

impl Default for Quantum {
    fn default() -> Self {
        Quantum::None
    }
}

impl From<&str> for Quantum {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "min" | "minute" => Quantum::Min,
            "hour" => Quantum::Hour,
            "day" => Quantum::Day,
            "month" => Quantum::Month,
            "year" => Quantum::Year,
            _ => Quantum::None,
        }
    }
}

impl From<String> for Quantum {
    fn from(value: String) -> Self {
        Quantum::from(value.as_str())
    }
}

impl From<Quantum> for String {
    fn from(value: Quantum) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Quantum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

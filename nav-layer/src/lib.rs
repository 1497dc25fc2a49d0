//! Per-layer selection cascade for the ocean navigator map.
//!
//! This crate provides:
//! - `controller`: the dataset → variable → depth state machine for one layer
//! - `tile`: tile URL construction and the owned tile layer handle
//! - `host`: the seam through which a layer reaches its parent container
//! - `container`: an in-memory parent owning the shared registries
//! - `driver`: async loop feeding a `MetadataSource` into a controller

pub mod container;
pub mod controller;
pub mod driver;
pub mod error;
pub mod host;
pub mod selection;
pub mod tile;

pub use container::{Container, MapEvent};
pub use controller::{Cascade, LayerController, Resolution, TimeSourceMode};
pub use driver::run_cascade;
pub use error::LayerError;
pub use host::{ActiveLayer, GlobalUpdate, LayerHost};

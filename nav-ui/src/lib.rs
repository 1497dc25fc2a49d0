//! Shared Dioxus components and OpenLayers bridge for the ocean navigator map.
//!
//! This crate provides:
//! - `map_bridge`: Rust wrappers for the OpenLayers map functions via `js_sys::eval()`
//! - `state`: Reactive AppState with Dioxus Signals, acting as the layers' host
//! - `components`: Reusable RSX components (layer panels, selectors, map containers)

pub mod components;
pub mod map_bridge;
pub mod state;

//! Core types and REST metadata client for the ocean navigator.
//!
//! - `map`: map sides, layer types and time quanta
//! - `metadata`: dataset/variable/depth descriptors returned by the API
//! - `request`: tagged metadata requests and their replies
//! - `endpoints`: URL builders for the `/api/v1.0` surface
//! - `api`: `reqwest` client (feature `api`)

pub mod config;
pub mod endpoints;
pub mod error;
pub mod map;
pub mod metadata;
pub mod request;
#[cfg(feature = "api")]
pub mod api;

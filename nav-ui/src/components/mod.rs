//! Reusable Dioxus RSX components for the navigator map.

mod error_display;
mod layer_panel;
mod layer_toolbar;
mod loading_spinner;
mod map_container;
mod metadata_selector;

pub use error_display::ErrorDisplay;
pub use layer_panel::LayerPanel;
pub use layer_toolbar::LayerToolbar;
pub use loading_spinner::LoadingSpinner;
pub use map_container::MapContainer;
pub use metadata_selector::{MetadataSelector, SelectOption};

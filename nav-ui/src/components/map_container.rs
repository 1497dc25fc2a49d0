//! Map container component.

use dioxus::prelude::*;
use nav_core::map::MapSide;

#[derive(Props, Clone, PartialEq)]
pub struct MapContainerProps {
    pub side: MapSide,
    /// Minimum height in pixels
    #[props(default = 500)]
    pub min_height: u32,
}

/// A container div for one OpenLayers map. The map renders into `map-{side}`.
#[component]
pub fn MapContainer(props: MapContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; flex: 1; border: 1px solid #ddd;",
        props.min_height
    );

    rsx! {
        div {
            style: "{style}",
            div {
                id: "map-{props.side}",
                style: "width: 100%; height: {props.min_height}px;",
            }
        }
    }
}

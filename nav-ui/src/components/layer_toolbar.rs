//! Buttons for opening layer panels and switching compare mode.

use crate::map_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use nav_core::map::{LayerType, MapSide};

#[component]
pub fn LayerToolbar() -> Element {
    let mut state = use_context::<AppState>();
    let compare = (state.compare)();

    // Leaving compare mode sends right-hand layers back to the left map;
    // each panel does its own move when it sees the flag drop.
    let on_compare = move |_: Event<FormData>| {
        let enabled = !(state.compare)();
        if enabled {
            map_bridge::create_map(MapSide::Right, &state.map_view.read().projection);
        } else {
            map_bridge::destroy_map(MapSide::Right);
        }
        state.compare.set(enabled);
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 8px; align-items: center;",
            for name in [LayerType::OCEAN, LayerType::MET, LayerType::ICE] {
                button {
                    onclick: move |_| {
                        state.add_panel(LayerType::from(name));
                    },
                    "Add {name} layer"
                }
            }
            label {
                style: "margin-left: 16px;",
                input {
                    r#type: "checkbox",
                    checked: compare,
                    onchange: on_compare,
                }
                " Compare"
            }
        }
    }
}

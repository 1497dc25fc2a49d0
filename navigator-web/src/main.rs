//! Ocean navigator map layers
//!
//! Shows one or two OpenLayers maps with any number of layer panels. Each
//! panel walks its own dataset → variable → depth cascade against the
//! navigator REST API of the serving origin and draws its tiles on the map
//! it belongs to.
//!
//! Data flow:
//! 1. On mount, colourmaps are fetched once and the left map is created.
//! 2. A panel fetches datasets, then variables, then depths, selecting the
//!    first of each, and registers its pair in the shared registries.
//! 3. Once settled, the panel loads the dataset's timestamps and points its
//!    tile layer at the latest one.

use dioxus::prelude::*;
use nav_core::map::{LayerType, MapSide};
use nav_ui::components::{ErrorDisplay, LayerPanel, LayerToolbar, LoadingSpinner, MapContainer};
use nav_ui::map_bridge;
use nav_ui::state::AppState;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("navigator-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // Load colourmaps and the first ocean layer on mount
    use_hook(move || {
        map_bridge::init_maps();
        map_bridge::create_map(MapSide::Left, &state.map_view.peek().projection);
        state.add_panel(LayerType::from(LayerType::OCEAN));
        spawn(async move {
            let client = match state.client() {
                Ok(client) => client,
                Err(e) => {
                    log::error!("Failed to create API client: {}", e);
                    state.error_msg.set(Some(format!("Failed to create API client: {}", e)));
                    state.loading.set(false);
                    return;
                }
            };
            match client.colourmaps().await {
                Ok(colourmaps) => {
                    log::info!("Loaded {} colourmaps", colourmaps.len());
                    state.colourmaps.set(colourmaps);
                }
                Err(e) => {
                    log::error!("Failed to load colourmaps: {}", e);
                    state.error_msg.set(Some(format!("Failed to load colourmaps: {}", e)));
                }
            }
            state.loading.set(false);
        });
    });

    let panels = state.panels.read().clone();
    let compare = (state.compare)();

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            h3 { style: "margin: 0 0 8px 0; font-size: 16px;", "Ocean Navigator" }

            if let Some(err) = (state.error_msg)() {
                ErrorDisplay {
                    message: err,
                    on_dismiss: move |_| state.error_msg.set(None),
                }
            }
            if (state.loading)() {
                LoadingSpinner {}
            }

            div {
                style: "display: flex; gap: 12px;",
                div {
                    style: "width: 360px; flex-shrink: 0;",
                    LayerToolbar {}
                    for (index, layer_type) in panels {
                        LayerPanel { key: "{index}", index, layer_type }
                    }
                }
                div {
                    style: "display: flex; flex: 1; gap: 8px;",
                    MapContainer { side: MapSide::Left }
                    if compare {
                        MapContainer { side: MapSide::Right }
                    }
                }
            }
        }
    }
}

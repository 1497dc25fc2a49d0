//! One layer panel: dataset, variable and depth selectors plus display
//! controls, driving a `LayerController`.

use crate::components::{ErrorDisplay, MetadataSelector, SelectOption};
use crate::state::{AppState, PanelHost};
use dioxus::prelude::*;
use log::{info, warn};
use nav_core::map::LayerType;
use nav_core::request::{MetadataSource, Ticket};
use nav_layer::selection::{global_time_key, time_key};
use nav_layer::{LayerController, Resolution, TimeSourceMode};
use nav_utils::dates::{date_to_iso, parse_timestamp};

const DISPLAY_OPTIONS: [(&str, &str); 2] = [("contours", "Contours"), ("colour", "Colour")];

#[derive(Props, Clone, PartialEq)]
pub struct LayerPanelProps {
    pub index: usize,
    pub layer_type: LayerType,
}

/// Run one controller call against the app state and flush map reloads.
fn apply<R>(
    state: AppState,
    mut controller: Signal<LayerController>,
    f: impl FnOnce(&mut LayerController, &mut PanelHost) -> R,
) -> R {
    let mut host = PanelHost::new(state);
    let result = f(&mut controller.write(), &mut host);
    host.finish(controller.peek().tile_layer());
    result
}

/// Fetch and resolve tickets until the cascade settles.
///
/// The controller is only borrowed between fetches, so a newer selection made
/// while a fetch is in flight wins and this loop ends on the stale reply.
async fn drive(
    state: AppState,
    controller: Signal<LayerController>,
    mut error: Signal<Option<String>>,
    first: Ticket,
) {
    let client = match state.client() {
        Ok(client) => client,
        Err(e) => {
            error.set(Some(e.to_string()));
            return;
        }
    };
    let mut ticket = first;
    loop {
        let outcome = client.fetch(&ticket.request).await;
        let resolution = apply(state, controller, |c, host| c.resolve(&ticket, outcome, host));
        match resolution {
            Ok(Resolution::Next(next)) => ticket = next,
            Ok(Resolution::Ready) => {
                error.set(None);
                load_timeline(state, controller, error).await;
                return;
            }
            Ok(Resolution::Stale) => return,
            Err(e) => {
                warn!("Layer cascade failed: {}", e);
                error.set(Some(e.to_string()));
                return;
            }
        }
    }
}

/// Fetch available times for the selected dataset and default the layer to
/// the latest one. A shared map time already set by another layer is kept.
async fn load_timeline(mut state: AppState, controller: Signal<LayerController>, mut error: Signal<Option<String>>) {
    let (own_key, global_key, dataset, quantum) = {
        let c = controller.peek();
        let Some(dataset) = c.selection().dataset.clone() else {
            return;
        };
        let global_key = match c.time_source(&PanelHost::new(state)) {
            TimeSourceMode::Global => Some(global_time_key(c.selection().map_side)),
            TimeSourceMode::Own => None,
        };
        (
            time_key(c.layer_type(), &dataset, c.index()),
            global_key,
            dataset,
            c.selection().quantum,
        )
    };
    let client = match state.client() {
        Ok(client) => client,
        Err(e) => {
            error.set(Some(e.to_string()));
            return;
        }
    };
    match client.timestamps(&dataset, quantum).await {
        Ok(timestamps) => {
            let latest = timestamps.iter().map(|t| t.value).max();
            state.timelines.write().insert(dataset, timestamps);
            if let Some(latest) = latest {
                let mut timestamps = state.timestamps.write();
                timestamps.entry(own_key).or_insert(latest);
                if let Some(global_key) = global_key {
                    timestamps.entry(global_key).or_insert(latest);
                }
            }
        }
        Err(e) => {
            warn!("Failed to load timestamps for {}: {}", dataset, e);
            error.set(Some(e.to_string()));
        }
    }
}

#[component]
pub fn LayerPanel(props: LayerPanelProps) -> Element {
    let mut state = use_context::<AppState>();
    let index = props.index;
    let layer_type = props.layer_type.clone();
    let controller = use_signal(move || LayerController::new(layer_type, index));
    let mut error = use_signal(|| None::<String>);

    use_hook(move || {
        let ticket = apply(state, controller, |c, _| c.initialize());
        spawn(drive(state, controller, error, ticket));
    });

    // Follow time changes and other panels' registrations, which can move
    // this layer between the shared and its own timeline.
    use_effect(move || {
        let _ = state.timestamps.read();
        let _ = state.time_sources.read();
        apply(state, controller, |c, host| c.on_timestamps_changed(host));
    });

    use_effect(move || {
        if !(state.compare)() {
            apply(state, controller, |c, host| c.leave_compare(host));
        }
    });

    let on_dataset = move |id: String| {
        match apply(state, controller, |c, host| c.change_dataset(&id, host)) {
            Ok(Some(ticket)) => {
                info!("Panel {} switching dataset to {}", index, id);
                spawn(drive(state, controller, error, ticket));
            }
            Ok(None) => {}
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let on_variable = move |id: String| match apply(state, controller, |c, host| c.change_variable(&id, host)) {
        Ok(Some(ticket)) => {
            spawn(drive(state, controller, error, ticket));
        }
        Ok(None) => {}
        Err(e) => error.set(Some(e.to_string())),
    };

    let on_depth = move |value: String| {
        if let Ok(depth) = value.parse::<u32>() {
            apply(state, controller, |c, host| c.change_depth(depth, host));
        }
    };

    let on_time = move |value: String| {
        let Some(key) = controller.peek().time_key(&PanelHost::new(state)) else {
            return;
        };
        match parse_timestamp(&value) {
            Ok(time) => {
                state.timestamps.write().insert(key, time);
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let on_display = move |value: String| {
        apply(state, controller, |c, host| c.set_display(&value, host));
    };

    let on_colourmap = move |value: String| {
        apply(state, controller, |c, host| c.set_colourmap(&value, host));
    };

    let on_scale = move |evt: Event<FormData>| {
        apply(state, controller, |c, host| c.set_scale(&evt.value(), host));
    };

    let on_auto_scale = move |_: Event<MouseData>| {
        let Some(path) = apply(state, controller, |c, host| c.range_url(&*host)) else {
            error.set(Some("No time selected for the auto scale".to_string()));
            return;
        };
        spawn(async move {
            let client = match state.client() {
                Ok(client) => client,
                Err(e) => {
                    error.set(Some(e.to_string()));
                    return;
                }
            };
            match client.range(&path).await {
                Ok(range) => {
                    apply(state, controller, |c, host| c.apply_range(&range, host));
                }
                Err(e) => {
                    warn!("Auto scale failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_opacity = move |evt: Event<FormData>| {
        if let Ok(opacity) = evt.value().parse::<u8>() {
            apply(state, controller, |c, host| c.set_opacity(opacity, host));
        }
    };

    // Subscribe so the mode and time follow other panels.
    let _ = state.time_sources.read();
    let _ = state.timestamps.read();
    let c = controller.read();
    let selection = c.selection().clone();
    let collections = c.collections().clone();
    let visible = c.is_visible();
    let loading = c.cascade().is_loading();
    let mode = c.time_source(&PanelHost::new(state));
    let current_time = c.current_time(&PanelHost::new(state));
    drop(c);

    let dataset_options: Vec<SelectOption> = collections
        .datasets
        .iter()
        .map(|d| SelectOption::new(d.id.clone(), d.value.clone().unwrap_or_else(|| d.id.clone())))
        .collect();
    let variable_options: Vec<SelectOption> = collections
        .variables
        .iter()
        .map(|v| SelectOption::new(v.id.clone(), v.value.clone().unwrap_or_else(|| v.id.clone())))
        .collect();
    let depth_options: Vec<SelectOption> = collections
        .depths
        .iter()
        .map(|d| SelectOption::new(d.id.to_string(), d.value.clone()))
        .collect();
    let colourmap_options: Vec<SelectOption> = state
        .colourmaps
        .read()
        .iter()
        .map(|m| SelectOption::new(m.id.clone(), m.value.clone().unwrap_or_else(|| m.id.clone())))
        .collect();
    let display_options: Vec<SelectOption> = DISPLAY_OPTIONS
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    let selected_time = current_time.map(|t| t.to_rfc3339()).unwrap_or_default();
    let time_options: Vec<SelectOption> = match selection.dataset.as_deref() {
        Some(dataset) => state
            .timelines
            .read()
            .get(dataset)
            .map(|times| {
                times
                    .iter()
                    .rev()
                    .map(|t| SelectOption::new(t.value.to_rfc3339(), date_to_iso(&t.value, selection.quantum)))
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let time_label = match mode {
        TimeSourceMode::Global => format!("Time ({} map)", selection.map_side),
        TimeSourceMode::Own => "Time (own)".to_string(),
    };

    let compare = (state.compare)();
    let id_prefix = format!("layer-{}", index);

    rsx! {
        div {
            style: "padding: 8px 12px; margin: 8px 0; border: 1px solid #ccc; border-radius: 4px;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                h4 {
                    style: "margin: 0;",
                    "{selection.layer_type} layer ({selection.map_side} map)"
                }
                div {
                    style: "display: flex; gap: 8px;",
                    label {
                        input {
                            r#type: "checkbox",
                            checked: visible,
                            onchange: move |_| {
                                apply(state, controller, |c, host| c.toggle_layer_visibility(host));
                            },
                        }
                        " Show"
                    }
                    if compare {
                        button {
                            onclick: move |_| {
                                apply(state, controller, |c, host| c.toggle_compare_map_side(host));
                            },
                            "Switch map"
                        }
                    }
                    button {
                        onclick: move |_| {
                            apply(state, controller, |c, host| c.remove(host));
                        },
                        "Remove"
                    }
                }
            }

            if let Some(err) = error() {
                ErrorDisplay {
                    message: err,
                    on_dismiss: move |_| error.set(None),
                }
            }
            if loading {
                span { style: "color: #666; font-size: 12px;", "Updating..." }
            }

            MetadataSelector {
                id: format!("{}-dataset", id_prefix),
                label: "Dataset".to_string(),
                options: dataset_options,
                selected: selection.dataset.clone().unwrap_or_default(),
                onchange: on_dataset,
            }
            MetadataSelector {
                id: format!("{}-variable", id_prefix),
                label: "Variable".to_string(),
                options: variable_options,
                selected: selection.variable.clone().unwrap_or_default(),
                onchange: on_variable,
            }
            MetadataSelector {
                id: format!("{}-depth", id_prefix),
                label: "Depth".to_string(),
                options: depth_options,
                selected: selection.depth.to_string(),
                onchange: on_depth,
            }
            MetadataSelector {
                id: format!("{}-time", id_prefix),
                label: time_label,
                options: time_options,
                selected: selected_time,
                onchange: on_time,
            }
            MetadataSelector {
                id: format!("{}-display", id_prefix),
                label: "Display".to_string(),
                options: display_options,
                selected: selection.display.clone(),
                onchange: on_display,
            }
            MetadataSelector {
                id: format!("{}-colourmap", id_prefix),
                label: "Colourmap".to_string(),
                options: colourmap_options,
                selected: selection.colourmap.clone(),
                onchange: on_colourmap,
            }
            div {
                style: "margin: 4px 0; display: flex; gap: 12px; align-items: center;",
                label {
                    style: "font-weight: bold;",
                    "Scale: "
                    input {
                        r#type: "text",
                        value: "{selection.scale}",
                        style: "width: 90px;",
                        onchange: on_scale,
                    }
                }
                button {
                    onclick: on_auto_scale,
                    "Auto"
                }
                label {
                    style: "font-weight: bold;",
                    "Opacity: "
                    input {
                        r#type: "range",
                        min: "0",
                        max: "100",
                        value: "{selection.opacity}",
                        onchange: on_opacity,
                    }
                }
            }
        }
    }
}

//! Headless run of one layer's selection cascade against a live server.

use log::info;
use nav_core::api::ApiClient;
use nav_core::config::ClientConfig;
use nav_core::map::LayerType;
use nav_layer::selection::{time_key, LayerSelection};
use nav_layer::{run_cascade, Container, LayerController};
use nav_registry::{RequestDataRegistry, TimeSourceRegistry};
use nav_utils::dates::{date_to_iso, parse_timestamp};
use serde::Serialize;

pub struct LayerOptions {
    pub layer_type: String,
    pub dataset: Option<String>,
    pub variable: Option<String>,
    pub depth: Option<u32>,
    pub time: Option<String>,
    pub auto_scale: bool,
}

#[derive(Serialize)]
struct LayerReport<'a> {
    selection: &'a LayerSelection,
    time: Option<String>,
    tile_url: Option<&'a str>,
    range_url: Option<String>,
    time_sources: &'a TimeSourceRegistry,
    data: &'a RequestDataRegistry,
}

pub async fn run_layer(config: &ClientConfig, options: LayerOptions) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let layer_type = LayerType::from(options.layer_type.as_str());
    let mut container = Container::new();
    let index = container.add_panel(layer_type.clone());
    let mut controller = LayerController::new(layer_type, index);

    let first = controller.initialize();
    run_cascade(&mut controller, &client, &mut container, first).await?;

    if let Some(dataset) = options.dataset.as_deref() {
        if let Some(ticket) = controller.change_dataset(dataset, &mut container)? {
            run_cascade(&mut controller, &client, &mut container, ticket).await?;
        }
    }
    if let Some(variable) = options.variable.as_deref() {
        if let Some(ticket) = controller.change_variable(variable, &mut container)? {
            run_cascade(&mut controller, &client, &mut container, ticket).await?;
        }
    }

    let selection = controller.selection();
    let dataset = selection
        .dataset
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No dataset selected"))?;
    let quantum = selection.quantum;
    let time = match options.time.as_deref() {
        Some(time) => parse_timestamp(time)?,
        None => client
            .timestamps(&dataset, quantum)
            .await?
            .into_iter()
            .map(|t| t.value)
            .max()
            .ok_or_else(|| anyhow::anyhow!("No timestamps for {}", dataset))?,
    };
    info!("Rendering {} at {}", dataset, date_to_iso(&time, quantum));
    container.set_timestamp(time_key(controller.layer_type(), &dataset, index), time);
    controller.on_timestamps_changed(&mut container);

    if let Some(depth) = options.depth {
        controller.change_depth(depth, &mut container);
    }
    if options.auto_scale {
        let path = controller
            .range_url(&container)
            .ok_or_else(|| anyhow::anyhow!("No range URL for the selection"))?;
        let range = client.range(&path).await?;
        controller.apply_range(&range, &mut container);
    }
    controller.toggle_layer_visibility(&mut container);

    let report = LayerReport {
        selection: controller.selection(),
        time: controller.iso_time(&container),
        tile_url: controller.tile_layer().url(),
        range_url: controller.range_url(&container),
        time_sources: &container.time_sources,
        data: &container.data,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

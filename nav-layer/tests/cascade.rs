use chrono::{TimeZone, Utc};
use nav_core::error::ApiError;
use nav_core::map::{LayerType, MapSide, Quantum};
use nav_core::metadata::{DatasetDescriptor, DepthDescriptor, ScaleRange, VariableDescriptor};
use nav_core::request::{MetadataReply, MetadataRequest, MetadataSource};
use nav_layer::selection::global_time_key;
use nav_layer::{
    run_cascade, Cascade, Container, LayerController, LayerError, LayerHost, MapEvent, Resolution, TimeSourceMode,
};
use std::collections::HashMap;

/// Answers from a fixed table; anything else is a 404.
#[derive(Default)]
struct ScriptedSource {
    replies: HashMap<MetadataRequest, MetadataReply>,
}

impl ScriptedSource {
    fn with(mut self, request: MetadataRequest, reply: MetadataReply) -> Self {
        self.replies.insert(request, reply);
        self
    }
}

impl MetadataSource for ScriptedSource {
    async fn fetch(&self, request: &MetadataRequest) -> Result<MetadataReply, ApiError> {
        self.replies.get(request).cloned().ok_or_else(|| ApiError::Status {
            url: request.to_string(),
            status: 404,
        })
    }
}

fn ocean() -> LayerType {
    LayerType::from("ocean")
}

fn datasets_req() -> MetadataRequest {
    MetadataRequest::Datasets { layer_type: ocean() }
}

fn variables_req(dataset: &str) -> MetadataRequest {
    MetadataRequest::Variables {
        layer_type: ocean(),
        dataset: dataset.to_string(),
    }
}

fn depths_req(dataset: &str, variable: &str) -> MetadataRequest {
    MetadataRequest::Depths {
        dataset: dataset.to_string(),
        variable: variable.to_string(),
    }
}

fn variables(ids: &[&str]) -> MetadataReply {
    MetadataReply::Variables(ids.iter().map(|id| VariableDescriptor::new(*id)).collect())
}

fn depths(ids: &[u32]) -> MetadataReply {
    MetadataReply::Depths(ids.iter().map(|id| DepthDescriptor::new(*id, id.to_string())).collect())
}

/// giops (daily) with two variables, plus riops and ciops (hourly).
fn ocean_source() -> ScriptedSource {
    ScriptedSource::default()
        .with(
            datasets_req(),
            MetadataReply::Datasets(vec![
                DatasetDescriptor::new("giops", Quantum::Day),
                DatasetDescriptor::new("riops", Quantum::Hour),
                DatasetDescriptor::new("ciops", Quantum::Hour),
            ]),
        )
        .with(variables_req("giops"), variables(&["votemper", "vosaline"]))
        .with(depths_req("giops", "votemper"), depths(&[0, 10, 50]))
        .with(depths_req("giops", "vosaline"), depths(&[0, 5]))
        .with(variables_req("riops"), variables(&["vozocrtx"]))
        .with(depths_req("riops", "vozocrtx"), depths(&[0]))
        .with(variables_req("ciops"), variables(&["sossheig"]))
        .with(depths_req("ciops", "sossheig"), depths(&[0]))
}

fn container() -> Container {
    let mut container = Container::new();
    let time = Utc.with_ymd_and_hms(2023, 6, 5, 12, 30, 0).unwrap();
    for dataset in ["giops", "riops", "ciops"] {
        container.set_timestamp(format!("ocean{}1", dataset), time);
    }
    container
}

async fn ready_layer(source: &ScriptedSource, container: &mut Container) -> LayerController {
    let index = container.add_panel(ocean());
    let mut controller = LayerController::new(ocean(), index);
    let first = controller.initialize();
    let settled = run_cascade(&mut controller, source, container, first).await.unwrap();
    assert_eq!(settled, Resolution::Ready);
    controller
}

#[tokio::test]
async fn test_initialize_selects_first_of_each_list() {
    let source = ocean_source();
    let mut container = container();
    let controller = ready_layer(&source, &mut container).await;

    let selection = controller.selection();
    assert_eq!(selection.pair(), Some(("giops", "votemper")));
    assert_eq!(selection.depth, 0);
    assert_eq!(selection.quantum, Quantum::Day);
    assert_eq!(controller.cascade(), &Cascade::Ready);
    assert_eq!(controller.collections().depths.len(), 3);

    let source_entry = container.time_sources.get(MapSide::Left, &ocean(), "giops").unwrap();
    assert_eq!(source_entry.variables.len(), 1);
    assert!(source_entry.contains("votemper"));
    let data = container.data.get(MapSide::Left, &ocean(), "giops", "votemper").unwrap();
    assert_eq!(data.frequency, 1);
    assert_eq!(data.metadata.quantum, Quantum::Day);
}

#[tokio::test]
async fn test_ready_layer_points_tiles_at_selection() {
    let source = ocean_source();
    let mut container = container();
    let controller = ready_layer(&source, &mut container).await;

    let url = controller.tile_layer().url().unwrap();
    assert!(url.starts_with("/api/v1.0/tiles/gaussian/25/10/EPSG:3857/giops/votemper/"));
    assert!(url.contains("/2023-06-05T00:00:00+00:00/0/-5,30/0/contours,default/"));
    assert_eq!(container.events(), &[MapEvent::Reload(MapSide::Left)]);
}

#[tokio::test]
async fn test_superseded_dataset_reply_is_dropped() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let to_riops = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    let to_ciops = controller.change_dataset("ciops", &mut container).unwrap().unwrap();

    // riops answers late, after ciops was chosen.
    let late = controller
        .resolve(&to_riops, Ok(variables(&["vozocrtx"])), &mut container)
        .unwrap();
    assert_eq!(late, Resolution::Stale);
    assert!(controller.collections().variables.is_empty());

    let settled = run_cascade(&mut controller, &source, &mut container, to_ciops).await.unwrap();
    assert_eq!(settled, Resolution::Ready);
    assert_eq!(controller.selection().pair(), Some(("ciops", "sossheig")));
    assert_eq!(controller.selection().quantum, Quantum::Hour);

    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_none());
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "riops").is_none());
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "ciops").is_some());
    assert_eq!(container.data.entries(MapSide::Left).len(), 1);
}

#[tokio::test]
async fn test_stale_depths_reply_after_dataset_change() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let to_vosaline = controller.change_variable("vosaline", &mut container).unwrap().unwrap();
    let to_riops = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    let late = controller
        .resolve(&to_vosaline, Ok(depths(&[0, 5])), &mut container)
        .unwrap();
    assert_eq!(late, Resolution::Stale);

    run_cascade(&mut controller, &source, &mut container, to_riops).await.unwrap();
    assert_eq!(controller.selection().pair(), Some(("riops", "vozocrtx")));
    assert!(container.data.get(MapSide::Left, &ocean(), "giops", "vosaline").is_none());
}

#[tokio::test]
async fn test_reselecting_current_dataset_is_noop() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    let before = container.data.clone();

    assert_eq!(controller.change_dataset("giops", &mut container), Ok(None));
    assert_eq!(controller.change_variable("votemper", &mut container), Ok(None));
    assert_eq!(container.data, before);
    assert_eq!(controller.cascade(), &Cascade::Ready);
}

#[tokio::test]
async fn test_unknown_selections_are_rejected() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    assert_eq!(
        controller.change_dataset("nemo", &mut container),
        Err(LayerError::UnknownDataset("nemo".to_string()))
    );
    assert_eq!(
        controller.change_variable("vozocrtx", &mut container),
        Err(LayerError::UnknownVariable("vozocrtx".to_string()))
    );
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_some());
}

#[tokio::test]
async fn test_change_variable_fetches_depths_only() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let ticket = controller.change_variable("vosaline", &mut container).unwrap().unwrap();
    assert_eq!(ticket.request, depths_req("giops", "vosaline"));
    // Variables stay selectable while depths load.
    assert_eq!(controller.collections().variables.len(), 2);

    run_cascade(&mut controller, &source, &mut container, ticket).await.unwrap();
    let entry = container.time_sources.get(MapSide::Left, &ocean(), "giops").unwrap();
    assert!(entry.contains("vosaline"));
    assert!(!entry.contains("votemper"));
    assert_eq!(controller.collections().depths.len(), 2);
}

#[tokio::test]
async fn test_failed_variables_fetch_keeps_previous_selection() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let ticket = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    // Deregistered while the switch is in flight.
    assert!(container.time_sources.is_empty());

    let failed = controller.resolve(
        &ticket,
        Err(ApiError::Status {
            url: "/api/v1.0/variables/".to_string(),
            status: 500,
        }),
        &mut container,
    );
    assert!(matches!(failed, Err(LayerError::MetadataUnavailable { .. })));
    assert_eq!(controller.cascade(), &Cascade::Ready);
    assert_eq!(controller.selection().pair(), Some(("giops", "votemper")));
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_some());
    assert_eq!(
        container.data.get(MapSide::Left, &ocean(), "giops", "votemper").unwrap().frequency,
        1
    );
}

#[tokio::test]
async fn test_empty_dataset_list_leaves_layer_idle() {
    let source = ScriptedSource::default().with(datasets_req(), MetadataReply::Datasets(vec![]));
    let mut container = container();
    let mut controller = LayerController::new(ocean(), container.add_panel(ocean()));
    let first = controller.initialize();

    let result = run_cascade(&mut controller, &source, &mut container, first).await;
    assert!(matches!(result, Err(LayerError::MetadataUnavailable { .. })));
    assert_eq!(controller.cascade(), &Cascade::Idle);
    assert!(container.time_sources.is_empty());
    assert!(container.data.is_empty());
}

#[tokio::test]
async fn test_change_depth_updates_request_data_in_place() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    controller.change_depth(50, &mut container);
    let data = container.data.get(MapSide::Left, &ocean(), "giops", "votemper").unwrap();
    assert_eq!(data.metadata.depth, 50);
    assert_eq!(data.frequency, 1);
    assert!(controller.tile_layer().url().unwrap().contains("/50/-5,30/"));
}

#[tokio::test]
async fn test_toggle_compare_moves_registrations() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    controller.toggle_layer_visibility(&mut container);
    container.take_events();

    controller.toggle_compare_map_side(&mut container);
    let id = controller.tile_layer().id;
    assert!(controller.is_compare());
    assert_eq!(controller.selection().map_side, MapSide::Right);
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_none());
    assert!(container.time_sources.get(MapSide::Right, &ocean(), "giops").is_some());
    assert!(container.data.get(MapSide::Right, &ocean(), "giops", "votemper").is_some());
    assert_eq!(container.layers.len(), 1);
    assert_eq!(container.layers[0].side, MapSide::Right);

    let events = container.take_events();
    assert_eq!(events.first(), Some(&MapEvent::Removed(MapSide::Left, id)));
    assert_eq!(events.last(), Some(&MapEvent::Added(MapSide::Right, id)));
}

#[tokio::test]
async fn test_visibility_toggles_active_layers() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    controller.toggle_layer_visibility(&mut container);
    assert!(controller.is_visible());
    assert_eq!(container.active_layers().len(), 1);

    controller.toggle_layer_visibility(&mut container);
    assert!(!controller.is_visible());
    assert!(container.active_layers().is_empty());
}

#[tokio::test]
async fn test_remove_clears_everything() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    controller.toggle_layer_visibility(&mut container);

    controller.remove(&mut container);
    assert!(container.time_sources.is_empty());
    assert!(container.data.is_empty());
    assert!(container.layers.is_empty());
    assert_eq!(container.panels().count(), 0);
}

#[tokio::test]
async fn test_no_tiles_without_timestamp() {
    let source = ocean_source();
    let mut container = Container::new();
    let controller = ready_layer(&source, &mut container).await;

    assert_eq!(controller.selection().pair(), Some(("giops", "votemper")));
    assert!(controller.tile_layer().url().is_none());
    assert!(container.events().is_empty());
    assert!(controller.range_url(&container).is_none());
}

#[tokio::test]
async fn test_failed_depths_fetch_keeps_new_pair_registered() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let to_riops = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    let next = match controller
        .resolve(&to_riops, Ok(variables(&["vozocrtx"])), &mut container)
        .unwrap()
    {
        Resolution::Next(next) => next,
        other => panic!("expected depths ticket, got {:?}", other),
    };
    let failed = controller.resolve(&next, Ok(depths(&[])), &mut container);
    assert!(matches!(failed, Err(LayerError::MetadataUnavailable { .. })));

    assert_eq!(controller.selection().pair(), Some(("riops", "vozocrtx")));
    assert_eq!(controller.selection().depth, 0);
    assert!(controller.collections().depths.is_empty());
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "riops").is_some());
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_none());
}

#[tokio::test]
async fn test_failed_dataset_switch_restores_lists() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let ticket = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    assert!(controller.collections().variables.is_empty());
    let failed = controller.resolve(
        &ticket,
        Err(ApiError::Status {
            url: "/api/v1.0/variables/".to_string(),
            status: 500,
        }),
        &mut container,
    );
    assert!(failed.is_err());

    assert_eq!(controller.selection().pair(), Some(("giops", "votemper")));
    assert_eq!(controller.collections().variables.len(), 2);
    assert_eq!(controller.collections().depths.len(), 3);

    let ticket = controller.change_variable("vosaline", &mut container).unwrap().unwrap();
    run_cascade(&mut controller, &source, &mut container, ticket).await.unwrap();
    assert_eq!(controller.selection().pair(), Some(("giops", "vosaline")));
}

#[tokio::test]
async fn test_failed_variable_switch_restores_depths() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let ticket = controller.change_variable("vosaline", &mut container).unwrap().unwrap();
    assert!(controller.collections().depths.is_empty());
    let failed = controller.resolve(
        &ticket,
        Err(ApiError::Status {
            url: "/api/v1.0/depth/".to_string(),
            status: 500,
        }),
        &mut container,
    );
    assert!(matches!(failed, Err(LayerError::MetadataUnavailable { .. })));

    assert_eq!(controller.cascade(), &Cascade::Ready);
    assert_eq!(controller.selection().pair(), Some(("giops", "votemper")));
    assert_eq!(controller.collections().depths.len(), 3);
    let entry = container.time_sources.get(MapSide::Left, &ocean(), "giops").unwrap();
    assert!(entry.contains("votemper"));
    assert!(!entry.contains("vosaline"));
    assert!(container.data.get(MapSide::Left, &ocean(), "giops", "votemper").is_some());
}

#[tokio::test]
async fn test_display_settings_update_request_data() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    controller.set_scale("0,20", &mut container);
    controller.set_display("colour", &mut container);
    controller.set_colourmap("thermal", &mut container);

    let data = container.data.get(MapSide::Left, &ocean(), "giops", "votemper").unwrap();
    assert_eq!(data.frequency, 1);
    assert_eq!(data.metadata.scale, "0,20");
    assert_eq!(data.metadata.display, "colour");
    assert_eq!(data.metadata.colourmap, "thermal");
    assert!(controller.tile_layer().url().unwrap().contains("/0/0,20/0/colour,thermal/"));
}

#[tokio::test]
async fn test_applied_range_becomes_scale() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    assert!(controller.range_url(&container).unwrap().starts_with("/api/v1.0/range/giops/votemper/"));

    controller.apply_range(&ScaleRange { min: -1.5, max: 28.0 }, &mut container);
    assert_eq!(controller.selection().scale, "-1.5,28");
    let data = container.data.get(MapSide::Left, &ocean(), "giops", "votemper").unwrap();
    assert_eq!(data.metadata.scale, "-1.5,28");
    assert!(controller.tile_layer().url().unwrap().contains("/-1.5,28/"));
}

#[tokio::test]
async fn test_opacity_is_clamped_and_keeps_source() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    controller.toggle_layer_visibility(&mut container);
    let url = controller.tile_layer().url().map(str::to_string);
    let data = container.data.clone();
    container.take_events();

    controller.set_opacity(150, &mut container);
    assert_eq!(controller.selection().opacity, 100);
    assert_eq!(controller.tile_layer().opacity, 1.0);
    assert_eq!(controller.tile_layer().url().map(str::to_string), url);
    assert_eq!(container.data, data);
    assert_eq!(container.events(), &[MapEvent::Reload(MapSide::Left)]);
}

#[tokio::test]
async fn test_toggle_compare_mid_cascade_registers_on_arrival() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;

    let ticket = controller.change_dataset("riops", &mut container).unwrap().unwrap();
    controller.toggle_compare_map_side(&mut container);
    assert_eq!(controller.selection().map_side, MapSide::Right);
    assert!(container.time_sources.is_empty());
    assert!(container.data.is_empty());

    run_cascade(&mut controller, &source, &mut container, ticket).await.unwrap();
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "riops").is_none());
    assert!(container.time_sources.get(MapSide::Right, &ocean(), "riops").is_some());
    assert!(container.data.get(MapSide::Right, &ocean(), "riops", "vozocrtx").is_some());
}

#[tokio::test]
async fn test_leave_compare_returns_layer_to_left_map() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    controller.toggle_layer_visibility(&mut container);
    controller.toggle_compare_map_side(&mut container);
    assert_eq!(container.layers[0].side, MapSide::Right);

    controller.leave_compare(&mut container);
    assert_eq!(controller.selection().map_side, MapSide::Left);
    assert!(!controller.is_compare());
    assert!(container.time_sources.get(MapSide::Right, &ocean(), "giops").is_none());
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "giops").is_some());
    assert_eq!(container.layers.len(), 1);
    assert_eq!(container.layers[0].side, MapSide::Left);

    // Already on the left: nothing moves.
    container.take_events();
    controller.leave_compare(&mut container);
    assert!(container.events().is_empty());
}

#[tokio::test]
async fn test_shared_pair_survives_one_layer_leaving() {
    let source = ocean_source();
    let mut container = container();
    let first = ready_layer(&source, &mut container).await;
    let mut second = ready_layer(&source, &mut container).await;
    assert_eq!(first.selection().pair(), second.selection().pair());

    let ticket = second.change_dataset("riops", &mut container).unwrap().unwrap();
    run_cascade(&mut second, &source, &mut container, ticket).await.unwrap();

    let giops = container.time_sources.get(MapSide::Left, &ocean(), "giops").unwrap();
    assert!(giops.contains("votemper"));
    assert_eq!(giops.uses("votemper"), 1);
    assert!(container.time_sources.get(MapSide::Left, &ocean(), "riops").is_some());
}

#[tokio::test]
async fn test_other_layer_flips_timeline_mode() {
    let source = ocean_source();
    let mut container = container();
    let first = ready_layer(&source, &mut container).await;
    let mut second = ready_layer(&source, &mut container).await;
    assert_eq!(first.time_source(&container), TimeSourceMode::Global);
    assert_eq!(second.time_source(&container), TimeSourceMode::Global);

    let ticket = second.change_dataset("riops", &mut container).unwrap().unwrap();
    run_cascade(&mut second, &source, &mut container, ticket).await.unwrap();
    assert_eq!(first.time_source(&container), TimeSourceMode::Own);
    assert_eq!(second.time_source(&container), TimeSourceMode::Own);

    second.remove(&mut container);
    assert_eq!(first.time_source(&container), TimeSourceMode::Global);
}

#[tokio::test]
async fn test_global_mode_draws_at_shared_map_time() {
    let source = ocean_source();
    let mut container = container();
    let mut controller = ready_layer(&source, &mut container).await;
    assert_eq!(controller.time_key(&container), Some(global_time_key(MapSide::Left)));
    // Own time until the map has a shared one.
    assert_eq!(controller.iso_time(&container).as_deref(), Some("2023-06-05T00:00:00+00:00"));

    let shared = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
    container.set_timestamp(global_time_key(MapSide::Left), shared);
    controller.on_timestamps_changed(&mut container);
    assert!(controller.tile_layer().url().unwrap().contains("/2023-07-01T00:00:00+00:00/"));
}

//! Typed wrappers around OpenLayers interop via `js_sys::eval()`.
//!
//! The map functions live in `assets/js/navigator-map.js` and are exposed as
//! `window.navigatorMaps`. Each map side gets its own OpenLayers `Map`; tile
//! layers are tracked by their `LayerId` so a layer can be re-pointed or
//! removed without the JS side knowing anything about selections.

use nav_core::map::MapSide;
use nav_layer::tile::{LayerId, TileLayer};

static NAVIGATOR_MAP_JS: &str = include_str!("../assets/js/navigator-map.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('Navigator JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Evaluate the map script once OpenLayers has loaded.
pub fn init_maps() {
    let store_js = format!(
        "window.__navigatorMapScript = {};",
        serde_json::to_string(NAVIGATOR_MAP_JS).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            var waitForOl = setInterval(function() {
                if (typeof ol !== 'undefined') {
                    clearInterval(waitForOl);
                    (0, eval)(window.__navigatorMapScript);
                    delete window.__navigatorMapScript;
                    window.__navigatorMapsReady = true;
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// Run `body` once the map script is ready and the target element exists.
fn when_ready(side: MapSide, body: &str) {
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__navigatorMapsReady && document.getElementById('map-{side}')) {{
                    clearInterval(poll);
                    try {{ {body} }} catch(e) {{ console.error('[Navigator] map call failed:', e); }}
                }}
            }}, 100);
        }})();
        "#,
        side = side.as_str(),
        body = body,
    ));
}

/// Create the OpenLayers map for `side` inside `map-{side}`.
pub fn create_map(side: MapSide, projection: &str) {
    when_ready(
        side,
        &format!(
            "window.navigatorMaps.create('{}', 'map-{}', '{}');",
            side.as_str(),
            side.as_str(),
            projection
        ),
    );
}

/// Ask the map on `side` to re-read the sources of its tile layers.
pub fn reload_map(side: MapSide, layers: &[TileLayer]) {
    let layers_json = serde_json::to_string(layers).unwrap_or_default();
    let escaped = layers_json.replace('\'', "\\'").replace('\n', "");
    when_ready(
        side,
        &format!("window.navigatorMaps.reload('{}', '{}');", side.as_str(), escaped),
    );
}

pub fn add_layer(side: MapSide, layer: &TileLayer) {
    let layer_json = serde_json::to_string(layer).unwrap_or_default();
    let escaped = layer_json.replace('\'', "\\'").replace('\n', "");
    when_ready(
        side,
        &format!("window.navigatorMaps.addLayer('{}', '{}');", side.as_str(), escaped),
    );
}

/// Runs at once: the map may already be gone when compare mode ends.
pub fn remove_layer(side: MapSide, id: LayerId) {
    call_js(&format!(
        "if (window.navigatorMaps) window.navigatorMaps.removeLayer('{}', {});",
        side.as_str(),
        id.0
    ));
}

/// Tear down the map on `side`, e.g. when leaving compare mode.
pub fn destroy_map(side: MapSide) {
    call_js(&format!(
        "if (window.navigatorMaps) window.navigatorMaps.destroy('{}');",
        side.as_str()
    ));
}

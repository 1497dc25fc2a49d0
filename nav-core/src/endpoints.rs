//! Paths of the `/api/v1.0` endpoints consumed by the map layers.

use crate::map::{LayerType, Quantum};

pub const API_PREFIX: &str = "/api/v1.0";

pub fn datasets(layer_type: &LayerType) -> String {
    format!("{}/datasets/?envType={}", API_PREFIX, layer_type)
}

pub fn variables(dataset: &str, layer_type: &LayerType) -> String {
    format!(
        "{}/variables/?dataset={}&envType={}",
        API_PREFIX, dataset, layer_type
    )
}

pub fn depths(dataset: &str, variable: &str) -> String {
    format!("{}/depth/?dataset={}&variable={}", API_PREFIX, dataset, variable)
}

pub fn colourmaps() -> String {
    format!("{}/colormaps/", API_PREFIX)
}

pub fn timestamps(dataset: &str, quantum: Quantum) -> String {
    format!(
        "{}/timestamps/?dataset={}&quantum={}",
        API_PREFIX, dataset, quantum
    )
}

/// Join an endpoint path onto a server base URL ("" keeps it relative).
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_paths() {
        let ocean = LayerType::from("ocean");
        assert_eq!(datasets(&ocean), "/api/v1.0/datasets/?envType=ocean");
        assert_eq!(
            variables("giops", &ocean),
            "/api/v1.0/variables/?dataset=giops&envType=ocean"
        );
        assert_eq!(
            depths("giops", "votemper"),
            "/api/v1.0/depth/?dataset=giops&variable=votemper"
        );
        assert_eq!(
            timestamps("giops", Quantum::Day),
            "/api/v1.0/timestamps/?dataset=giops&quantum=day"
        );
    }

    #[test]
    fn test_join_trims_trailing_slash() {
        assert_eq!(
            join("http://localhost:5000/", &colourmaps()),
            "http://localhost:5000/api/v1.0/colormaps/"
        );
        assert_eq!(join("", "/api/v1.0/colormaps/"), "/api/v1.0/colormaps/");
    }
}

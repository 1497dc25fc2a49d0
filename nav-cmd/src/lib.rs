//! Command implementations for the navigator CLI.
//!
//! Provides subcommands for listing the metadata the map layers select from,
//! and for running a layer's selection cascade headlessly.

use clap::Subcommand;
use nav_core::config::ClientConfig;
use std::path::Path;

pub mod layer;
pub mod metadata;

#[derive(Subcommand)]
pub enum Command {
    /// List datasets offered for a layer type
    Datasets {
        /// Layer type (ocean, met, ice)
        #[arg(short = 't', long, default_value = "ocean")]
        layer_type: String,
    },

    /// List variables of a dataset
    Variables {
        #[arg(short = 't', long, default_value = "ocean")]
        layer_type: String,

        #[arg(short, long)]
        dataset: String,
    },

    /// List depths of a dataset variable
    Depths {
        #[arg(short, long)]
        dataset: String,

        #[arg(short, long)]
        variable: String,
    },

    /// List colourmaps
    Colourmaps,

    /// List timestamps of a dataset, formatted at the dataset's quantum
    Timestamps {
        #[arg(short = 't', long, default_value = "ocean")]
        layer_type: String,

        #[arg(short, long)]
        dataset: String,
    },

    /// Run the selection cascade for one layer and print the resulting
    /// selection, registries and tile URL as JSON
    Layer {
        #[arg(short = 't', long, default_value = "ocean")]
        layer_type: String,

        /// Switch to this dataset after the initial selection settles
        #[arg(short, long)]
        dataset: Option<String>,

        /// Switch to this variable once the dataset is selected
        #[arg(short, long)]
        variable: Option<String>,

        /// Select this depth last
        #[arg(long)]
        depth: Option<u32>,

        /// Time to render, RFC 3339; defaults to the dataset's latest
        #[arg(long)]
        time: Option<String>,

        /// Fetch the data range over the map extent and use it as the scale
        #[arg(long)]
        auto_scale: bool,
    },
}

/// Read a JSON client config, falling back to defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
        }
        None => Ok(ClientConfig::default()),
    }
}

pub async fn run(config: ClientConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Datasets { layer_type } => metadata::list_datasets(&config, &layer_type).await,
        Command::Variables {
            layer_type,
            dataset,
        } => metadata::list_variables(&config, &layer_type, &dataset).await,
        Command::Depths { dataset, variable } => {
            metadata::list_depths(&config, &dataset, &variable).await
        }
        Command::Colourmaps => metadata::list_colourmaps(&config).await,
        Command::Timestamps {
            layer_type,
            dataset,
        } => metadata::list_timestamps(&config, &layer_type, &dataset).await,
        Command::Layer {
            layer_type,
            dataset,
            variable,
            depth,
            time,
            auto_scale,
        } => {
            let options = layer::LayerOptions {
                layer_type,
                dataset,
                variable,
                depth,
                time,
                auto_scale,
            };
            layer::run_layer(&config, options).await
        }
    }
}

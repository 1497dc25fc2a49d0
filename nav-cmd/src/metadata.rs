//! Metadata listings, one entry per line.

use nav_core::api::ApiClient;
use nav_core::config::ClientConfig;
use nav_core::map::LayerType;
use nav_utils::dates::date_to_iso;
use log::info;

fn label<'a>(id: &'a str, value: Option<&'a str>) -> &'a str {
    value.unwrap_or(id)
}

pub async fn list_datasets(config: &ClientConfig, layer_type: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let datasets = client.datasets(&LayerType::from(layer_type)).await?;
    info!("{} {} datasets", datasets.len(), layer_type);
    for dataset in &datasets {
        println!(
            "{}\t{}\t{}",
            dataset.id,
            dataset.quantum,
            label(&dataset.id, dataset.value.as_deref())
        );
    }
    Ok(())
}

pub async fn list_variables(config: &ClientConfig, layer_type: &str, dataset: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let variables = client.variables(dataset, &LayerType::from(layer_type)).await?;
    info!("{} variables in {}", variables.len(), dataset);
    for variable in &variables {
        println!(
            "{}\t{}\t{}",
            variable.id,
            variable.scale_range().unwrap_or_default(),
            label(&variable.id, variable.value.as_deref())
        );
    }
    Ok(())
}

pub async fn list_depths(config: &ClientConfig, dataset: &str, variable: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    for depth in client.depths(dataset, variable).await? {
        println!("{}\t{}", depth.id, depth.value);
    }
    Ok(())
}

pub async fn list_colourmaps(config: &ClientConfig) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    for colourmap in client.colourmaps().await? {
        println!("{}\t{}", colourmap.id, label(&colourmap.id, colourmap.value.as_deref()));
    }
    Ok(())
}

pub async fn list_timestamps(config: &ClientConfig, layer_type: &str, dataset: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let quantum = client
        .datasets(&LayerType::from(layer_type))
        .await?
        .into_iter()
        .find(|d| d.id == dataset)
        .map(|d| d.quantum)
        .ok_or_else(|| anyhow::anyhow!("Unknown {} dataset: {}", layer_type, dataset))?;
    for timestamp in client.timestamps(dataset, quantum).await? {
        println!("{}\t{}", timestamp.id, date_to_iso(&timestamp.value, quantum));
    }
    Ok(())
}

//! `reqwest` client for the metadata endpoints.

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ApiError, Result};
use crate::map::{LayerType, Quantum};
use crate::metadata::{Colourmap, DatasetDescriptor, DepthDescriptor, ScaleRange, Timestamp, VariableDescriptor};
use crate::request::{MetadataReply, MetadataRequest, MetadataSource};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Read-only client for the ocean navigator REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = endpoints::join(&self.base_url, path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Request failed for {}: {}", url, e);
            ApiError::HttpRequest(e)
        })?;
        if response.status() != StatusCode::OK {
            warn!("Bad response status for {}: {}", url, response.status());
            return Err(ApiError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    pub async fn datasets(&self, layer_type: &LayerType) -> Result<Vec<DatasetDescriptor>> {
        self.get_json(&endpoints::datasets(layer_type)).await
    }

    pub async fn variables(
        &self,
        dataset: &str,
        layer_type: &LayerType,
    ) -> Result<Vec<VariableDescriptor>> {
        self.get_json(&endpoints::variables(dataset, layer_type)).await
    }

    pub async fn depths(&self, dataset: &str, variable: &str) -> Result<Vec<DepthDescriptor>> {
        self.get_json(&endpoints::depths(dataset, variable)).await
    }

    pub async fn colourmaps(&self) -> Result<Vec<Colourmap>> {
        self.get_json(&endpoints::colourmaps()).await
    }

    pub async fn timestamps(&self, dataset: &str, quantum: Quantum) -> Result<Vec<Timestamp>> {
        self.get_json(&endpoints::timestamps(dataset, quantum)).await
    }

    /// Data range over the visible extent; `path` comes from the layer's
    /// range URL builder.
    pub async fn range(&self, path: &str) -> Result<ScaleRange> {
        self.get_json(path).await
    }
}

/// The cascade cannot select a first entry from an empty list.
fn non_empty(request: &MetadataRequest, reply: MetadataReply) -> Result<MetadataReply> {
    if reply.is_empty() {
        warn!("Empty reply for {}", request);
        return Err(ApiError::Empty(request.to_string()));
    }
    Ok(reply)
}

impl MetadataSource for ApiClient {
    async fn fetch(&self, request: &MetadataRequest) -> Result<MetadataReply> {
        let reply = match request {
            MetadataRequest::Datasets { layer_type } => {
                MetadataReply::Datasets(self.datasets(layer_type).await?)
            }
            MetadataRequest::Variables {
                layer_type,
                dataset,
            } => MetadataReply::Variables(self.variables(dataset, layer_type).await?),
            MetadataRequest::Depths { dataset, variable } => {
                MetadataReply::Depths(self.depths(dataset, variable).await?)
            }
        };
        non_empty(request, reply)
    }
}

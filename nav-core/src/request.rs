//! Metadata requests tagged with the key they were issued for.
//!
//! A layer never cancels an in-flight request. Instead every request carries a
//! `Ticket`; when the reply comes back it is compared against the ticket the
//! layer is still waiting for and dropped on mismatch.

use crate::error::ApiError;
use crate::map::LayerType;
use crate::metadata::{DatasetDescriptor, DepthDescriptor, VariableDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A read-only metadata fetch, keyed by the selection it depends on.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum MetadataRequest {
    Datasets {
        layer_type: LayerType,
    },
    Variables {
        layer_type: LayerType,
        dataset: String,
    },
    Depths {
        dataset: String,
        variable: String,
    },
}

impl fmt::Display for MetadataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataRequest::Datasets { layer_type } => write!(f, "datasets[{}]", layer_type),
            MetadataRequest::Variables {
                layer_type,
                dataset,
            } => write!(f, "variables[{}/{}]", layer_type, dataset),
            MetadataRequest::Depths { dataset, variable } => {
                write!(f, "depths[{}/{}]", dataset, variable)
            }
        }
    }
}

/// The decoded body of a metadata reply.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum MetadataReply {
    Datasets(Vec<DatasetDescriptor>),
    Variables(Vec<VariableDescriptor>),
    Depths(Vec<DepthDescriptor>),
}

impl MetadataReply {
    pub fn is_empty(&self) -> bool {
        match self {
            MetadataReply::Datasets(d) => d.is_empty(),
            MetadataReply::Variables(v) => v.is_empty(),
            MetadataReply::Depths(d) => d.is_empty(),
        }
    }
}

/// Identifies one issued request: a per-layer sequence number plus the key.
///
/// Two tickets are equal only if both match, so re-selecting a dataset that
/// was superseded earlier cannot revive the earlier reply.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub seq: u64,
    pub request: MetadataRequest,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seq, self.request)
    }
}

/// Anything that can answer metadata requests: the HTTP client, or a
/// scripted source in tests.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    async fn fetch(&self, request: &MetadataRequest) -> Result<MetadataReply, ApiError>;
}

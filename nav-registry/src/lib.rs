//! Shared registries coordinating otherwise independent map layers.
//!
//! Both registries are values: every operation takes `&self` and returns the
//! replacement, which the owning container swaps in.

pub mod request_data;
pub mod time_source;

pub use request_data::{DisplayMetadata, RecordMode, RequestData, RequestDataRegistry};
pub use time_source::{TimeSource, TimeSourceRegistry};

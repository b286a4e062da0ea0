pub mod activation;
pub mod api;
pub mod config;
pub mod data;
pub mod model;
pub mod shape;
pub mod state;

// Convenience re-exports
pub use activation::Activation;
pub use api::{
    ApiError, ApiResult, FieldError, HttpRepository, InMemoryRepository, NetworkDetails, NetworkId,
    NetworkRepository, NetworkSummary, NewNetwork, Sample, Split, INPUT_SIZE, NETWORK_FIELD,
    OUTPUT_SIZE,
};
pub use config::{Config, ConfigError};
pub use data::SampleSet;
pub use state::{FetchStatus, NetworkDetail, NetworkList, Prediction, PredictionResult};

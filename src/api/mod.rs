pub mod error;
pub mod http;
pub mod memory;
pub mod repository;
pub mod types;

pub use error::{ApiError, ApiResult, FieldError, NETWORK_FIELD};
pub use http::HttpRepository;
pub use memory::InMemoryRepository;
pub use repository::NetworkRepository;
pub use types::{
    NetworkDetails, NetworkId, NetworkSummary, NewNetwork, Sample, Split, INPUT_SIZE, OUTPUT_SIZE,
};

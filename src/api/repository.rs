use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::types::{NetworkDetails, NetworkId, NetworkSummary, NewNetwork, Sample, Split};

/// The remote network collection, as seen by the state layer.
///
/// Every call is a single best-effort attempt: no retries, no batching. The
/// outcome is always reported back to the caller.
pub trait NetworkRepository: Send + Sync {
    fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>>;

    fn get_network(&self, id: NetworkId) -> ApiResult<NetworkDetails>;

    fn create_network(&self, network: &NewNetwork) -> ApiResult<()>;

    fn delete_network(&self, id: NetworkId) -> ApiResult<()>;

    /// Runs `input` through the network and returns the raw output scores.
    fn predict(&self, id: NetworkId, input: &[f64]) -> ApiResult<Vec<f64>>;

    fn get_sample(&self, split: Split, index: usize) -> ApiResult<Sample>;
}

impl<R: NetworkRepository + ?Sized> NetworkRepository for Arc<R> {
    fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>> {
        (**self).list_networks()
    }

    fn get_network(&self, id: NetworkId) -> ApiResult<NetworkDetails> {
        (**self).get_network(id)
    }

    fn create_network(&self, network: &NewNetwork) -> ApiResult<()> {
        (**self).create_network(network)
    }

    fn delete_network(&self, id: NetworkId) -> ApiResult<()> {
        (**self).delete_network(id)
    }

    fn predict(&self, id: NetworkId, input: &[f64]) -> ApiResult<Vec<f64>> {
        (**self).predict(id, input)
    }

    fn get_sample(&self, split: Split, index: usize) -> ApiResult<Sample> {
        (**self).get_sample(split, index)
    }
}

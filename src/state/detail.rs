use log::warn;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::repository::NetworkRepository;
use crate::api::types::{NetworkDetails, NetworkId};
use crate::state::observable::{Observable, Subscription};
use crate::state::FetchStatus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailSnapshot {
    pub network: Option<NetworkDetails>,
    pub status: FetchStatus,
    /// Human-readable reason the record could not be loaded.
    pub error: Option<String>,
}

/// One network's full record, fetched on construction.
pub struct NetworkDetail {
    id: NetworkId,
    repo: Arc<dyn NetworkRepository>,
    snapshot: Observable<DetailSnapshot>,
}

impl NetworkDetail {
    pub fn new(repo: Arc<dyn NetworkRepository>, id: NetworkId) -> Self {
        let detail = NetworkDetail { id, repo, snapshot: Observable::new(DetailSnapshot::default()) };
        detail.refresh();
        detail
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.snapshot.get()
    }

    pub fn subscribe(&self, callback: impl Fn(&DetailSnapshot) + Send + Sync + 'static) -> Subscription {
        self.snapshot.subscribe(callback)
    }

    /// Fetches the record again; on failure the record is cleared.
    pub fn refresh(&self) {
        self.snapshot.update(|s| {
            s.status = FetchStatus::Loading;
            s.error = None;
        });
        let result = self.repo.get_network(self.id);
        self.snapshot.update(|s| match result {
            Ok(network) => {
                s.network = Some(network);
                s.status = FetchStatus::Settled;
            }
            Err(e) => {
                warn!("could not load network {}: {e}", self.id);
                s.network = None;
                s.status = FetchStatus::Errored;
                s.error = Some(describe(e));
            }
        });
    }
}

fn describe(error: ApiError) -> String {
    match error {
        ApiError::NotFound => "Network not found".to_owned(),
        ApiError::Field(e) => e.error,
        other => format!("Failed to load network: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::api::memory::InMemoryRepository;
    use crate::api::error::ApiResult;
    use crate::api::types::{NetworkSummary, NewNetwork, Sample, Split};

    /// Backend that answers every record request with a server error.
    struct Broken;

    impl NetworkRepository for Broken {
        fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>> {
            Ok(Vec::new())
        }
        fn get_network(&self, _: NetworkId) -> ApiResult<NetworkDetails> {
            Err(ApiError::Status { status: 500, body: "db locked".into() })
        }
        fn create_network(&self, _: &NewNetwork) -> ApiResult<()> {
            Ok(())
        }
        fn delete_network(&self, _: NetworkId) -> ApiResult<()> {
            Ok(())
        }
        fn predict(&self, _: NetworkId, _: &[f64]) -> ApiResult<Vec<f64>> {
            Ok(Vec::new())
        }
        fn get_sample(&self, _: Split, _: usize) -> ApiResult<Sample> {
            Err(ApiError::NotFound)
        }
    }

    #[test]
    fn loads_the_record_on_construction() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.create_network(&NewNetwork {
            name: "detail".into(),
            layer_sizes: vec![784, 32, 10],
            activations: vec![Activation::Relu, Activation::None],
        })
        .unwrap();

        let detail = NetworkDetail::new(repo, NetworkId(1));
        let snap = detail.snapshot();
        assert_eq!(snap.status, FetchStatus::Settled);
        let network = snap.network.unwrap();
        assert_eq!(network.summary.name, "detail");
        assert_eq!(network.activations, vec![Activation::Relu, Activation::None]);
        assert!(!network.created_at.is_empty());
    }

    #[test]
    fn missing_network_becomes_a_message() {
        let detail = NetworkDetail::new(Arc::new(InMemoryRepository::new()), NetworkId(7));
        let snap = detail.snapshot();
        assert_eq!(snap.status, FetchStatus::Errored);
        assert!(snap.network.is_none());
        assert_eq!(snap.error.as_deref(), Some("Network not found"));
    }

    #[test]
    fn refresh_clears_a_deleted_record() {
        let repo = Arc::new(InMemoryRepository::with_demo_networks());
        let detail = NetworkDetail::new(repo.clone(), NetworkId(2));
        assert!(detail.snapshot().network.is_some());
        repo.delete_network(NetworkId(2)).unwrap();
        detail.refresh();
        assert!(detail.snapshot().network.is_none());
    }

    #[test]
    fn other_failures_become_a_load_message() {
        let detail = NetworkDetail::new(Arc::new(Broken), NetworkId(1));
        let snap = detail.snapshot();
        assert_eq!(snap.status, FetchStatus::Errored);
        assert!(snap.network.is_none());
        assert_eq!(
            snap.error.as_deref(),
            Some("Failed to load network: unexpected status 500: db locked")
        );
    }
}

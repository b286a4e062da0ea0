use log::{debug, warn};
use std::sync::Arc;

use crate::activation::Activation;
use crate::api::error::FieldError;
use crate::api::repository::NetworkRepository;
use crate::api::types::{NetworkId, NetworkSummary, NewNetwork};
use crate::shape::NAME_FIELD;
use crate::state::observable::{Observable, Subscription};
use crate::state::FetchStatus;

/// What the list view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSnapshot {
    pub networks: Vec<NetworkSummary>,
    pub status: FetchStatus,
    /// Error of the most recent failed fetch; cleared by the next success.
    pub error: Option<FieldError>,
}

/// The cached network collection.
///
/// The snapshot lock is never held across a request: concurrent fetches are
/// not coordinated and the last response to arrive wins.
pub struct NetworkList {
    repo: Arc<dyn NetworkRepository>,
    snapshot: Observable<ListSnapshot>,
}

impl NetworkList {
    pub fn new(repo: Arc<dyn NetworkRepository>) -> Self {
        NetworkList { repo, snapshot: Observable::new(ListSnapshot::default()) }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshot.get()
    }

    pub fn subscribe(&self, callback: impl Fn(&ListSnapshot) + Send + Sync + 'static) -> Subscription {
        self.snapshot.subscribe(callback)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.snapshot.unsubscribe(subscription)
    }

    pub fn find(&self, id: NetworkId) -> Option<NetworkSummary> {
        self.snapshot.with(|s| s.networks.iter().find(|n| n.id == id).cloned())
    }

    /// Replaces the cached collection with the backend's.
    ///
    /// On failure the previous collection is kept and the error retained in
    /// the snapshot until the next successful fetch.
    pub fn fetch(&self) -> Result<(), FieldError> {
        self.snapshot.update(|s| s.status = FetchStatus::Loading);
        match self.repo.list_networks() {
            Ok(networks) => {
                debug!("fetched {} networks", networks.len());
                self.snapshot.update(|s| {
                    s.networks = networks;
                    s.status = FetchStatus::Settled;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!("network list fetch failed: {e}");
                let error = e.into_field_error("Failed to load networks");
                self.snapshot.update(|s| {
                    s.status = FetchStatus::Errored;
                    s.error = Some(error.clone());
                });
                Err(error)
            }
        }
    }

    /// Creates a network and refreshes the collection on success.
    ///
    /// A name already present in the cached collection is rejected without a
    /// request. Errors are returned for the caller to show next to the form.
    pub fn add(
        &self,
        name: &str,
        layer_sizes: Vec<usize>,
        activations: Vec<Activation>,
    ) -> Result<(), FieldError> {
        let name = name.trim();
        let taken = self.snapshot.with(|s| s.networks.iter().any(|n| n.name == name));
        if taken {
            return Err(FieldError::new(NAME_FIELD, "Network with this name already exists"));
        }

        let network = NewNetwork { name: name.to_owned(), layer_sizes, activations };
        self.repo
            .create_network(&network)
            .map_err(|e| e.into_field_error("Failed to add network"))?;
        // A failed refresh is recorded in the snapshot; the create itself succeeded.
        let _ = self.fetch();
        Ok(())
    }

    /// Deletes a network and refreshes the collection on success.
    pub fn delete(&self, id: NetworkId) -> Result<(), FieldError> {
        self.repo
            .delete_network(id)
            .map_err(|e| e.into_field_error("Failed to delete network"))?;
        let _ = self.fetch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{ApiError, ApiResult, NETWORK_FIELD};
    use crate::api::memory::InMemoryRepository;
    use crate::api::types::{NetworkDetails, Sample, Split};
    use std::sync::Mutex;

    /// Repository whose list call always fails.
    struct Unreachable;

    impl NetworkRepository for Unreachable {
        fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>> {
            Err(ApiError::Status { status: 502, body: "bad gateway".into() })
        }
        fn get_network(&self, _: NetworkId) -> ApiResult<NetworkDetails> {
            Err(ApiError::NotFound)
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

    fn list() -> NetworkList {
        NetworkList::new(Arc::new(InMemoryRepository::new()))
    }

    #[test]
    fn fetch_settles_with_the_collection() {
        let list = NetworkList::new(Arc::new(InMemoryRepository::with_demo_networks()));
        assert_eq!(list.snapshot().status, FetchStatus::Idle);
        list.fetch().unwrap();
        let snap = list.snapshot();
        assert_eq!(snap.status, FetchStatus::Settled);
        assert_eq!(snap.networks.len(), 10);
        assert!(snap.error.is_none());
    }

    #[test]
    fn fetch_errors_are_retained() {
        let list = NetworkList::new(Arc::new(Unreachable));
        let err = list.fetch().unwrap_err();
        assert_eq!(err.field, NETWORK_FIELD);
        let snap = list.snapshot();
        assert_eq!(snap.status, FetchStatus::Errored);
        assert_eq!(snap.error, Some(err));
    }

    #[test]
    fn add_refetches_instead_of_inserting() {
        let list = list();
        list.add("Net A", vec![784, 16, 10], Activation::defaults_for(3)).unwrap();
        let snap = list.snapshot();
        assert_eq!(snap.networks.len(), 1);
        assert_eq!(snap.networks[0].name, "Net A");
        assert_eq!(snap.networks[0].layer_sizes, vec![784, 16, 10]);
    }

    #[test]
    fn add_rejects_names_in_the_cached_collection() {
        let list = list();
        list.add("Net A", vec![784, 10], Activation::defaults_for(2)).unwrap();
        let err = list.add("  Net A", vec![784, 10], Activation::defaults_for(2)).unwrap_err();
        assert_eq!(err.field, NAME_FIELD);
    }

    #[test]
    fn add_surfaces_repository_errors_untouched() {
        let list = list();
        let err = list.add("bad", vec![784, 11], Activation::defaults_for(2)).unwrap_err();
        assert_eq!(err.field, "shape");
        assert_eq!(err.error, "Output layer must have 10 neurons");
    }

    #[test]
    fn delete_removes_and_refreshes() {
        let list = list();
        list.add("gone", vec![784, 10], Activation::defaults_for(2)).unwrap();
        let id = list.snapshot().networks[0].id;
        assert!(list.find(id).is_some());
        list.delete(id).unwrap();
        assert!(list.find(id).is_none());
        // Unknown ids are a no-op against the in-memory repository.
        list.delete(NetworkId(42)).unwrap();
    }

    #[test]
    fn subscribers_observe_loading_then_settled() {
        let list = list();
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&statuses);
        let sub = list.subscribe(move |s| sink.lock().unwrap().push(s.status));
        list.fetch().unwrap();
        assert_eq!(*statuses.lock().unwrap(), vec![FetchStatus::Loading, FetchStatus::Settled]);
        assert!(list.unsubscribe(sub));
    }
}

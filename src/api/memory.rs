use log::{debug, info};
use std::sync::{Mutex, MutexGuard};

use crate::activation::Activation;
use crate::api::error::{ApiError, ApiResult, FieldError};
use crate::api::repository::NetworkRepository;
use crate::api::types::{NetworkDetails, NetworkId, NetworkSummary, NewNetwork, Sample, Split, INPUT_SIZE};
use crate::data::SampleSet;
use crate::model::DenseNetwork;
use crate::shape::{validate_activation_count, validate_layers, validate_name, NAME_FIELD};

/// Shapes and metrics of the demo collection.
const DEMO_NETWORKS: [(&[usize], u64, f64); 10] = [
    (&[784, 16, 16, 10], 1000, 0.2),
    (&[784, 12, 13, 14, 10], 2000, 0.15),
    (&[784, 32, 16, 10], 1500, 0.1),
    (&[784, 64, 32, 16, 10], 3000, 0.05),
    (&[784, 128, 64, 32, 16, 10], 5000, 0.03),
    (&[784, 256, 128, 64, 32, 16, 10], 8000, 0.02),
    (&[784, 12, 12, 10], 1200, 0.18),
    (&[784, 20, 15, 10], 2500, 0.12),
    (&[784, 40, 20, 10], 3500, 0.08),
    (&[784, 80, 40, 20, 10], 6000, 0.04),
];

struct StoredNetwork {
    details: NetworkDetails,
    model: DenseNetwork,
}

#[derive(Default)]
struct Store {
    next_id: u64,
    networks: Vec<StoredNetwork>,
}

/// In-process stand-in for the backend.
///
/// Applies the backend's rules on create (shape, activations, unique
/// names), gives every network random weights and answers predictions with a
/// forward pass. Samples come from an optional MNIST dataset.
pub struct InMemoryRepository {
    store: Mutex<Store>,
    samples: Option<SampleSet>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository {
            store: Mutex::new(Store { next_id: 1, networks: Vec::new() }),
            samples: None,
        }
    }

    /// A repository pre-filled with ten untrained demo networks.
    pub fn with_demo_networks() -> Self {
        let repo = Self::new();
        {
            let mut store = repo.lock();
            for (i, (layers, epochs, cost)) in DEMO_NETWORKS.iter().enumerate() {
                let network = NewNetwork {
                    name: format!("Demo {}", i + 1),
                    layer_sizes: layers.to_vec(),
                    activations: Activation::defaults_for(layers.len()),
                };
                let id = insert(&mut store, &network);
                if let Some(stored) = store.networks.iter_mut().find(|n| n.details.summary.id == id) {
                    stored.details.summary.training_epochs = *epochs;
                    stored.details.summary.cost = Some(*cost);
                }
            }
        }
        repo
    }

    pub fn with_samples(mut self, samples: SampleSet) -> Self {
        info!("serving {} train / {} test samples", samples.train.len(), samples.test.len());
        self.samples = Some(samples);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn insert(store: &mut Store, network: &NewNetwork) -> NetworkId {
    let id = NetworkId(store.next_id);
    store.next_id += 1;
    let model = DenseNetwork::new_random(&mut rand::thread_rng(), &network.layer_sizes, &network.activations);
    store.networks.push(StoredNetwork {
        details: NetworkDetails {
            summary: NetworkSummary {
                id,
                name: network.name.clone(),
                layer_sizes: network.layer_sizes.clone(),
                correct_predictions: 0,
                training_epochs: 0,
                cost: None,
            },
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            activations: network.activations.clone(),
        },
        model,
    });
    id
}

impl NetworkRepository for InMemoryRepository {
    fn list_networks(&self) -> ApiResult<Vec<NetworkSummary>> {
        Ok(self.lock().networks.iter().map(|n| n.details.summary.clone()).collect())
    }

    fn get_network(&self, id: NetworkId) -> ApiResult<NetworkDetails> {
        self.lock()
            .networks
            .iter()
            .find(|n| n.details.summary.id == id)
            .map(|n| n.details.clone())
            .ok_or(ApiError::NotFound)
    }

    fn create_network(&self, network: &NewNetwork) -> ApiResult<()> {
        let name = validate_name(&network.name)?;
        validate_layers(&network.layer_sizes)?;
        validate_activation_count(&network.activations, network.layer_sizes.len())?;

        let mut store = self.lock();
        if store.networks.iter().any(|n| n.details.summary.name == name) {
            return Err(FieldError::new(NAME_FIELD, "Network with this name already exists").into());
        }
        let network = NewNetwork { name, ..network.clone() };
        let id = insert(&mut store, &network);
        debug!("created network {id} '{}'", network.name);
        Ok(())
    }

    fn delete_network(&self, id: NetworkId) -> ApiResult<()> {
        let mut store = self.lock();
        let before = store.networks.len();
        store.networks.retain(|n| n.details.summary.id != id);
        if store.networks.len() == before {
            debug!("delete of unknown network {id} ignored");
        }
        Ok(())
    }

    fn predict(&self, id: NetworkId, input: &[f64]) -> ApiResult<Vec<f64>> {
        if input.len() != INPUT_SIZE {
            return Err(FieldError::new(
                "input",
                format!("Input must have {INPUT_SIZE} values, got {}", input.len()),
            )
            .into());
        }
        let store = self.lock();
        let stored = store
            .networks
            .iter()
            .find(|n| n.details.summary.id == id)
            .ok_or(ApiError::NotFound)?;
        Ok(stored.model.forward(input))
    }

    fn get_sample(&self, split: Split, index: usize) -> ApiResult<Sample> {
        let samples = self
            .samples
            .as_ref()
            .ok_or_else(|| FieldError::new("sample", "No sample data is loaded"))?;
        samples
            .get(split, index)
            .cloned()
            .ok_or_else(|| FieldError::new("index", format!("No {split} sample at index {index}")).into())
    }
}

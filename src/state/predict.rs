use log::debug;
use std::sync::Arc;

use crate::api::error::{ApiResult, FieldError, NETWORK_FIELD};
use crate::api::repository::NetworkRepository;
use crate::api::types::{NetworkId, Sample, Split};
use crate::state::observable::{Observable, Subscription};

/// Scores for one input and the digit they point at.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Backend output scaled by 100 for display.
    pub scores: Vec<f64>,
    /// Index of the highest score.
    pub prediction: usize,
}

impl PredictionResult {
    /// Returns `None` for an empty output vector.
    pub fn from_output(output: &[f64]) -> Option<PredictionResult> {
        let scores: Vec<f64> = output.iter().map(|x| x * 100.0).collect();
        let prediction = best_guess(&scores)?;
        Some(PredictionResult { scores, prediction })
    }
}

/// Arg-max with ties going to the lowest index.
pub fn best_guess(scores: &[f64]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best = (0, *first);
    for (i, &score) in rest.iter().enumerate() {
        if score > best.1 {
            best = (i + 1, score);
        }
    }
    Some(best.0)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSnapshot {
    pub output: Option<PredictionResult>,
    pub loading: bool,
}

/// Predictions against one network.
pub struct Prediction {
    network_id: NetworkId,
    repo: Arc<dyn NetworkRepository>,
    snapshot: Observable<PredictionSnapshot>,
}

impl Prediction {
    pub fn new(repo: Arc<dyn NetworkRepository>, network_id: NetworkId) -> Self {
        Prediction { network_id, repo, snapshot: Observable::new(PredictionSnapshot::default()) }
    }

    pub fn snapshot(&self) -> PredictionSnapshot {
        self.snapshot.get()
    }

    pub fn subscribe(&self, callback: impl Fn(&PredictionSnapshot) + Send + Sync + 'static) -> Subscription {
        self.snapshot.subscribe(callback)
    }

    /// Posts `input` to the network and derives the predicted digit.
    ///
    /// The loading flag is cleared whatever the outcome; the last good result
    /// stays in the snapshot when a request fails.
    pub fn predict(&self, input: &[f64]) -> ApiResult<PredictionResult> {
        self.snapshot.update(|s| s.loading = true);
        let result = self.repo.predict(self.network_id, input).and_then(|output| {
            PredictionResult::from_output(&output)
                .ok_or_else(|| FieldError::new(NETWORK_FIELD, "Prediction returned no scores").into())
        });
        self.snapshot.update(|s| {
            s.loading = false;
            if let Ok(r) = &result {
                s.output = Some(r.clone());
            }
        });
        if let Ok(r) = &result {
            debug!("network {} predicts {}", self.network_id, r.prediction);
        }
        result
    }

    pub fn load_sample(&self, split: Split, index: usize) -> ApiResult<Sample> {
        self.repo.get_sample(split, index)
    }

    /// Fetches a sample and predicts it.
    pub fn predict_sample(&self, split: Split, index: usize) -> ApiResult<(Sample, PredictionResult)> {
        let sample = self.load_sample(split, index)?;
        let result = self.predict(&sample.input)?;
        Ok((sample, result))
    }
}

//! Client-side state: cached snapshots of remote data plus the status of the
//! request that produced them.

pub mod detail;
pub mod list;
pub mod observable;
pub mod predict;

pub use detail::{DetailSnapshot, NetworkDetail};
pub use list::{ListSnapshot, NetworkList};
pub use observable::{Observable, Subscription};
pub use predict::{best_guess, Prediction, PredictionResult, PredictionSnapshot};

/// Lifecycle of one fetch: `Idle -> Loading -> {Settled, Errored}`.
///
/// A new request moves any status back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Settled,
    Errored,
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        *self == FetchStatus::Loading
    }
}

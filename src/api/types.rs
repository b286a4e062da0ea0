use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::activation::Activation;

/// Input dimensionality of every network (28×28 grayscale digits).
pub const INPUT_SIZE: usize = 784;
/// Output dimensionality of every network (digits 0-9).
pub const OUTPUT_SIZE: usize = 10;

/// Stable identifier of a network on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NetworkId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(NetworkId)
    }
}

/// One entry of the network collection, as returned by `GET /api/networks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub id: NetworkId,
    pub name: String,
    pub layer_sizes: Vec<usize>,
    #[serde(default)]
    pub correct_predictions: u64,
    #[serde(default)]
    pub training_epochs: u64,
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Full record of a single network, as returned by `GET /api/networks/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDetails {
    #[serde(flatten)]
    pub summary: NetworkSummary,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub activations: Vec<Activation>,
}

/// Body of `POST /api/networks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNetwork {
    pub name: String,
    pub layer_sizes: Vec<usize>,
    pub activations: Vec<Activation>,
}

/// Which half of the dataset a sample is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Test,
    Train,
}

impl Split {
    /// Number of samples the MNIST split holds.
    pub fn sample_count(&self) -> usize {
        match self {
            Split::Test => 10_000,
            Split::Train => 60_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Test => "test",
            Split::Train => "train",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "test" => Ok(Split::Test),
            "train" => Ok(Split::Train),
            other => Err(format!("unknown split '{other}'")),
        }
    }
}

/// An input vector paired with the digit it depicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub expected_output: u8,
}

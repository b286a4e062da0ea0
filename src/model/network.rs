use rand::Rng;

use crate::activation::Activation;
use crate::model::dense::DenseLayer;

/// An untrained feed-forward network, as the backend creates one.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Builds one layer per consecutive pair in `layer_sizes`.
    ///
    /// `activations` must hold `layer_sizes.len() - 1` entries; extra entries
    /// are ignored and missing ones yield fewer layers.
    pub fn new_random<R: Rng + ?Sized>(
        rng: &mut R,
        layer_sizes: &[usize],
        activations: &[Activation],
    ) -> DenseNetwork {
        let layers = layer_sizes
            .windows(2)
            .zip(activations)
            .map(|(pair, &activation)| DenseLayer::random(rng, pair[0], pair[1], activation))
            .collect();
        DenseNetwork { layers }
    }

    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.feed_from(&current);
        }
        current
    }
}

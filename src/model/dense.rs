use rand::Rng;

use crate::activation::Activation;

/// A fully connected layer: `a = f(x·W + b)`.
///
/// `weights[i][j]` connects input `i` to neuron `j`.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    /// Uniform random weights in `[-1, 1)`, scaled by `1/sqrt(input_size)` so
    /// a 784-wide input does not saturate the first activation.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        input_size: usize,
        size: usize,
        activation: Activation,
    ) -> DenseLayer {
        let scale = 1.0 / (input_size.max(1) as f64).sqrt();
        let weights = (0..input_size)
            .map(|_| (0..size).map(|_| (rng.gen::<f64>() * 2.0 - 1.0) * scale).collect())
            .collect();
        let biases = (0..size).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        DenseLayer { weights, biases, activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn size(&self) -> usize {
        self.biases.len()
    }

    pub fn feed_from(&self, input: &[f64]) -> Vec<f64> {
        let mut z = self.biases.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (acc, w) in z.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        z.into_iter().map(|v| self.activation.function(v)).collect()
    }
}

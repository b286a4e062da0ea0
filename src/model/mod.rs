pub mod dense;
pub mod network;

pub use dense::DenseLayer;
pub use network::DenseNetwork;

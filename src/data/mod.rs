pub mod idx;

pub use idx::{parse_idx_pair, IdxError, SampleSet};

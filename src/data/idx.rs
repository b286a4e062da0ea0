//! Parsing of the IDX binary files MNIST is distributed in.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a digit in [0, 10)
//! ```
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::types::{Sample, Split, INPUT_SIZE, OUTPUT_SIZE};

#[derive(Debug, Error)]
pub enum IdxError {
    #[error("{kind} file too short: need {needed} bytes, got {actual}")]
    TooShort { kind: &'static str, needed: usize, actual: usize },

    #[error("{kind} file has a bad header: {detail}")]
    BadHeader { kind: &'static str, detail: String },

    #[error("image file declares {images} items but label file declares {labels}")]
    CountMismatch { images: usize, labels: usize },

    #[error("images are {rows}x{cols}, expected 784 pixels")]
    WrongImageSize { rows: usize, cols: usize },

    #[error("label {label} at index {index} is not a digit")]
    LabelOutOfRange { index: usize, label: u8 },

    #[error("could not read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn check_header(kind: &'static str, bytes: &[u8], dims: u8, header_len: usize) -> Result<(), IdxError> {
    if bytes.len() < header_len {
        return Err(IdxError::TooShort { kind, needed: header_len, actual: bytes.len() });
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(IdxError::BadHeader {
            kind,
            detail: format!("reserved bytes are 0x{:02X} 0x{:02X}", bytes[0], bytes[1]),
        });
    }
    if bytes[2] != 0x08 {
        return Err(IdxError::BadHeader { kind, detail: format!("dtype 0x{:02X} is not uint8", bytes[2]) });
    }
    if bytes[3] != dims {
        return Err(IdxError::BadHeader {
            kind,
            detail: format!("{} dimensions, expected {}", bytes[3], dims),
        });
    }
    Ok(())
}

/// Parses an IDX3 image file and its IDX1 label file into samples with
/// pixels scaled to `[0, 1]`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Vec<Sample>, IdxError> {
    check_header("image", image_bytes, 0x03, 16)?;
    check_header("label", label_bytes, 0x01, 8)?;

    let n_items = be_u32(image_bytes, 4);
    let rows = be_u32(image_bytes, 8);
    let cols = be_u32(image_bytes, 12);
    if rows.checked_mul(cols) != Some(INPUT_SIZE) {
        return Err(IdxError::WrongImageSize { rows, cols });
    }

    let label_count = be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(IdxError::CountMismatch { images: n_items, labels: label_count });
    }

    let needed = n_items
        .checked_mul(INPUT_SIZE)
        .and_then(|n| n.checked_add(16))
        .unwrap_or(usize::MAX);
    if image_bytes.len() < needed {
        return Err(IdxError::TooShort { kind: "image", needed, actual: image_bytes.len() });
    }
    if label_bytes.len() < 8 + n_items {
        return Err(IdxError::TooShort { kind: "label", needed: 8 + n_items, actual: label_bytes.len() });
    }

    image_bytes[16..16 + n_items * INPUT_SIZE]
        .chunks_exact(INPUT_SIZE)
        .zip(&label_bytes[8..8 + n_items])
        .enumerate()
        .map(|(index, (pixels, &label))| {
            if label as usize >= OUTPUT_SIZE {
                return Err(IdxError::LabelOutOfRange { index, label });
            }
            Ok(Sample {
                input: pixels.iter().map(|&px| px as f64 / 255.0).collect(),
                expected_output: label,
            })
        })
        .collect()
}

/// Both MNIST splits held in memory.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl SampleSet {
    /// Loads the four standard MNIST files from `dir`.
    pub fn load_dir(dir: &Path) -> Result<SampleSet, IdxError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read(&path).map_err(|source| IdxError::Io { path, source })
        };
        let train = parse_idx_pair(&read("train-images-idx3-ubyte")?, &read("train-labels-idx1-ubyte")?)?;
        let test = parse_idx_pair(&read("t10k-images-idx3-ubyte")?, &read("t10k-labels-idx1-ubyte")?)?;
        Ok(SampleSet { train, test })
    }

    pub fn get(&self, split: Split, index: usize) -> Option<&Sample> {
        match split {
            Split::Train => self.train.get(index),
            Split::Test => self.test.get(index),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds an IDX pair holding one image per label, every pixel set to
    /// `fill`.
    pub(crate) fn idx_pair(labels: &[u8], fill: u8) -> (Vec<u8>, Vec<u8>) {
        let mut images = vec![0x00, 0x00, 0x08, 0x03];
        images.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        images.extend_from_slice(&28u32.to_be_bytes());
        images.extend_from_slice(&28u32.to_be_bytes());
        images.extend(std::iter::repeat(fill).take(labels.len() * INPUT_SIZE));

        let mut label_bytes = vec![0x00, 0x00, 0x08, 0x01];
        label_bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        label_bytes.extend_from_slice(labels);
        (images, label_bytes)
    }

    #[test]
    fn parses_images_and_labels() {
        let (images, labels) = idx_pair(&[7, 2], 255);
        let samples = parse_idx_pair(&images, &labels).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].expected_output, 7);
        assert_eq!(samples[1].expected_output, 2);
        assert_eq!(samples[0].input.len(), INPUT_SIZE);
        assert!(samples[0].input.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rejects_count_mismatch() {
        let (images, _) = idx_pair(&[1, 2], 0);
        let (_, labels) = idx_pair(&[1], 0);
        assert!(matches!(
            parse_idx_pair(&images, &labels),
            Err(IdxError::CountMismatch { images: 2, labels: 1 })
        ));
    }

    #[test]
    fn rejects_truncated_and_malformed_files() {
        let (mut images, labels) = idx_pair(&[1], 0);
        images.truncate(100);
        assert!(matches!(parse_idx_pair(&images, &labels), Err(IdxError::TooShort { .. })));

        let (mut images, labels) = idx_pair(&[1], 0);
        images[2] = 0x09;
        assert!(matches!(parse_idx_pair(&images, &labels), Err(IdxError::BadHeader { .. })));
    }

    #[test]
    fn rejects_labels_that_are_not_digits() {
        let (images, labels) = idx_pair(&[3, 12], 0);
        assert!(matches!(
            parse_idx_pair(&images, &labels),
            Err(IdxError::LabelOutOfRange { index: 1, label: 12 })
        ));
    }
}

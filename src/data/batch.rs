use crate::data::SignalTensor;
use anyhow::{bail, Result};

/// Materialize a fixed-size batch by cycling over the dataset.
///
/// Row `i` of the batch is source row `((step - 1) * batch_size + i) mod N`,
/// with `step` 1-based. The extractor never mutates its input and is
/// deterministic, so training can run for more epochs than one pass over the
/// data simply by letting the step counter keep climbing. `batch_size` may
/// exceed the dataset length; rows just wrap around.
pub fn extract_batch(source: &SignalTensor, step: usize, batch_size: usize) -> SignalTensor {
    let n = source.samples();
    let mut data = Vec::with_capacity(batch_size * source.timesteps() * source.channels());

    for i in 0..batch_size {
        let index = ((step - 1) * batch_size + i) % n;
        data.extend_from_slice(source.sample(index));
    }

    SignalTensor::from_parts(data, batch_size, source.timesteps(), source.channels())
}

/// Labels for the batch produced by [`extract_batch`] at the same step.
pub fn extract_batch_labels(labels: &[i64], step: usize, batch_size: usize) -> Vec<i64> {
    let n = labels.len();
    (0..batch_size)
        .map(|i| labels[((step - 1) * batch_size + i) % n])
        .collect()
}

/// One-hot encode 0-based labels into a flat row-major [N, n_classes] matrix.
///
/// Each row carries a single 1.0 at its label's column. A label outside
/// [0, n_classes) is an error rather than a silently corrupt row.
pub fn one_hot(labels: &[i64], n_classes: usize) -> Result<Vec<f32>> {
    let mut encoded = vec![0.0f32; labels.len() * n_classes];

    for (row, &label) in labels.iter().enumerate() {
        if label < 0 || label as usize >= n_classes {
            bail!("Label {} outside [0, {})", label, n_classes);
        }
        encoded[row * n_classes + label as usize] = 1.0;
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(n: usize) -> SignalTensor {
        // One value per sample keeps row identity easy to assert.
        let data: Vec<f32> = (0..n).map(|v| v as f32).collect();
        SignalTensor::new(data, n, 1, 1).unwrap()
    }

    #[test]
    fn test_extract_batch_indices() {
        let source = tensor(10);

        let batch = extract_batch(&source, 1, 4);
        assert_eq!(batch.as_slice(), &[0.0, 1.0, 2.0, 3.0]);

        let batch = extract_batch(&source, 2, 4);
        assert_eq!(batch.as_slice(), &[4.0, 5.0, 6.0, 7.0]);

        // Third batch wraps around the end of the dataset.
        let batch = extract_batch(&source, 3, 4);
        assert_eq!(batch.as_slice(), &[8.0, 9.0, 0.0, 1.0]);
    }

    #[test]
    fn test_extract_batch_beyond_one_epoch() {
        let source = tensor(5);
        // step 100 with batch 4: index = 99 * 4 mod 5 = 396 mod 5 = 1
        let batch = extract_batch(&source, 100, 4);
        assert_eq!(batch.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_batch_size_exceeds_dataset() {
        let source = tensor(3);
        let batch = extract_batch(&source, 1, 7);
        assert_eq!(batch.samples(), 7);
        assert_eq!(batch.as_slice(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_extract_batch_idempotent() {
        let source = tensor(10);
        let first = extract_batch(&source, 4, 3);
        let second = extract_batch(&source, 4, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_batch_labels_match_rows() {
        let labels = vec![0, 1, 2, 3, 4];
        assert_eq!(extract_batch_labels(&labels, 2, 3), vec![3, 4, 0]);
    }

    #[test]
    fn test_one_hot_rows() {
        let encoded = one_hot(&[2, 0, 5], 6).unwrap();
        assert_eq!(&encoded[0..6], &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&encoded[6..12], &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(&encoded[12..18], &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_round_trip() {
        let labels: Vec<i64> = vec![0, 3, 5, 1, 1, 4, 2];
        let encoded = one_hot(&labels, 6).unwrap();

        for (row, &label) in labels.iter().enumerate() {
            let slice = &encoded[row * 6..(row + 1) * 6];
            let argmax = slice
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap()
                .0;
            assert_eq!(argmax as i64, label);
            assert_eq!(slice.iter().sum::<f32>(), 1.0);
        }
    }

    #[test]
    fn test_one_hot_out_of_range() {
        assert!(one_hot(&[6], 6).is_err());
        assert!(one_hot(&[-1], 6).is_err());
    }
}

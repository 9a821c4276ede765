//! Classification metrics over predicted / target class-index vectors.

/// Fraction of positions where prediction equals target.
pub fn accuracy(predictions: &[usize], targets: &[usize]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(targets)
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / predictions.len() as f64
}

/// F1 score averaged unweighted across all classes.
///
/// A class with no predicted and no actual members contributes 0 to the
/// average.
pub fn macro_f1(predictions: &[usize], targets: &[usize], n_classes: usize) -> f64 {
    if n_classes == 0 {
        return 0.0;
    }

    let mut sum = 0.0;
    for class in 0..n_classes {
        let tp = predictions
            .iter()
            .zip(targets)
            .filter(|(p, t)| **p == class && **t == class)
            .count() as f64;
        let fp = predictions
            .iter()
            .zip(targets)
            .filter(|(p, t)| **p == class && **t != class)
            .count() as f64;
        let fn_ = predictions
            .iter()
            .zip(targets)
            .filter(|(p, t)| **p != class && **t == class)
            .count() as f64;

        let denom = 2.0 * tp + fp + fn_;
        if denom > 0.0 {
            sum += 2.0 * tp / denom;
        }
    }

    sum / n_classes as f64
}

/// Unnormalized confusion matrix; rows are true classes, columns predicted.
///
/// Out-of-range indices are ignored rather than counted.
pub fn confusion_matrix(
    predictions: &[usize],
    targets: &[usize],
    n_classes: usize,
) -> Vec<Vec<u64>> {
    let mut matrix = vec![vec![0u64; n_classes]; n_classes];
    for (&p, &t) in predictions.iter().zip(targets) {
        if p < n_classes && t < n_classes {
            matrix[t][p] += 1;
        }
    }
    matrix
}

/// Scale a confusion matrix so its entries sum to 100 (percent of total).
pub fn normalize_percent(matrix: &[Vec<u64>]) -> Vec<Vec<f64>> {
    let total: u64 = matrix.iter().flatten().sum();
    if total == 0 {
        return matrix.iter().map(|row| vec![0.0; row.len()]).collect();
    }
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| v as f64 / total as f64 * 100.0)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 2, 1], &[0, 1, 1, 1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_macro_f1_perfect() {
        let labels = [0, 1, 2, 0, 1, 2];
        assert_eq!(macro_f1(&labels, &labels, 3), 1.0);
    }

    #[test]
    fn test_macro_f1_partial() {
        // Class 0: tp=1 fp=1 fn=0 -> f1 = 2/3
        // Class 1: tp=1 fp=0 fn=1 -> f1 = 2/3
        // Class 2: never seen -> 0
        let predictions = [0, 0, 1];
        let targets = [0, 1, 1];
        let expected = (2.0 / 3.0 + 2.0 / 3.0) / 3.0;
        assert!((macro_f1(&predictions, &targets, 3) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_confusion_matrix() {
        let predictions = [0, 1, 1, 2];
        let targets = [0, 1, 2, 2];
        let matrix = confusion_matrix(&predictions, &targets, 3);

        assert_eq!(matrix[0], vec![1, 0, 0]);
        assert_eq!(matrix[1], vec![0, 1, 0]);
        assert_eq!(matrix[2], vec![0, 1, 1]);
    }

    #[test]
    fn test_normalize_percent_sums_to_100() {
        let matrix = vec![vec![3, 1], vec![2, 4]];
        let normalized = normalize_percent(&matrix);

        let sum: f64 = normalized.iter().flatten().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((normalized[0][0] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_percent_empty_matrix() {
        let matrix = vec![vec![0, 0], vec![0, 0]];
        let normalized = normalize_percent(&matrix);
        assert_eq!(normalized, vec![vec![0.0, 0.0], vec![0.0, 0.0]]);
    }
}

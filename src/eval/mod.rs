pub mod metrics;

use crate::config::Preset;
use crate::data::{SignalDataset, SignalTensor};
use crate::model::architecture::HarModel;
use crate::plot;
use anyhow::{Context, Result};
use burn::nn::loss::CrossEntropyLossConfig;
use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Int, Tensor, TensorData};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build a [batch, timesteps, channels] float tensor from loaded signals.
pub fn signals_to_tensor<B: Backend>(
    signals: &SignalTensor,
    device: &B::Device,
) -> Tensor<B, 3> {
    let shape = [signals.samples(), signals.timesteps(), signals.channels()];
    Tensor::from_data(TensorData::new(signals.as_slice().to_vec(), shape), device)
}

/// Build a [batch] integer tensor from 0-based labels.
pub fn labels_to_tensor<B: Backend>(labels: &[i64], device: &B::Device) -> Tensor<B, 1, Int> {
    Tensor::from_data(TensorData::new(labels.to_vec(), [labels.len()]), device)
}

/// Extract class indices from a 1-D integer tensor.
pub fn to_class_indices<B: Backend>(tensor: Tensor<B, 1, Int>) -> Vec<usize> {
    let data = tensor.into_data();
    data.iter::<i64>().map(|v| v as usize).collect()
}

/// Final evaluation over the held-out test set.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Cross-entropy loss over the full test set
    pub loss: f64,
    /// Top-1 accuracy
    pub accuracy: f64,
    /// Macro-averaged F1 score
    pub macro_f1: f64,
    /// Raw confusion matrix, rows = true class
    pub confusion: Vec<Vec<u64>>,
}

impl Evaluation {
    /// Print the final metrics and the raw confusion matrix
    pub fn print(&self) {
        println!("Final loss is: {}", self.loss);
        println!("Final accuracy is: {}", self.accuracy);
        println!("Final f1 score is: {}", self.macro_f1);
        println!("---------Confusion Matrix--------");
        for row in &self.confusion {
            println!("{:?}", row);
        }
    }
}

/// Run a single forward pass over the entire test set and score it.
///
/// Evaluation-only: the model is taken on a non-autodiff backend, so no
/// gradients are tracked and no parameters can move. Side effects are the
/// printed metrics and the confusion-matrix image in `run_dir`.
pub fn evaluate<B: Backend>(
    model: &HarModel<B>,
    test: &SignalDataset,
    n_classes: usize,
    run_dir: &Path,
    device: &B::Device,
) -> Result<Evaluation> {
    // One batch spanning the whole test set.
    let inputs = signals_to_tensor::<B>(&test.signals, device);
    let targets = labels_to_tensor::<B>(&test.labels, device);

    let logits = model.forward(inputs);
    let loss = CrossEntropyLossConfig::new()
        .init(device)
        .forward(logits.clone(), targets.clone())
        .into_scalar()
        .elem::<f64>();

    let predictions_tensor: Tensor<B, 1, Int> = logits.argmax(1).squeeze(1);
    let predictions = to_class_indices(predictions_tensor);
    let actual = to_class_indices(targets);

    let accuracy = metrics::accuracy(&predictions, &actual);
    let macro_f1 = metrics::macro_f1(&predictions, &actual, n_classes);
    let confusion = metrics::confusion_matrix(&predictions, &actual, n_classes);

    let evaluation = Evaluation { loss, accuracy, macro_f1, confusion };
    evaluation.print();

    let normalized = metrics::normalize_percent(&evaluation.confusion);
    plot::plot_confusion_matrix(&normalized, run_dir)
        .context("Failed to render confusion matrix")?;

    Ok(evaluation)
}

/// Write the per-run results summary named by the preset's save file.
pub fn write_report(
    evaluation: &Evaluation,
    preset: &Preset,
    run_dir: &Path,
) -> Result<PathBuf> {
    #[derive(Serialize)]
    struct Report<'a> {
        preset: &'a Preset,
        evaluation: &'a Evaluation,
    }

    let path = run_dir.join(preset.save_file);
    let report = serde_json::to_string_pretty(&Report { preset, evaluation })
        .context("Failed to serialize evaluation report")?;
    std::fs::write(&path, report)
        .with_context(|| format!("Failed to write report to {:?}", path))?;

    info!("Evaluation report saved to: {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_tensor_round_trip() {
        let device = <TestBackend as Backend>::Device::default();

        let signals = SignalTensor::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, 1).unwrap();
        let tensor = signals_to_tensor::<TestBackend>(&signals, &device);
        assert_eq!(tensor.dims(), [2, 2, 1]);

        let labels = labels_to_tensor::<TestBackend>(&[0, 5, 2], &device);
        assert_eq!(to_class_indices(labels), vec![0, 5, 2]);
    }
}

use crate::config::{self, Preset};
use crate::data::batch::{extract_batch, extract_batch_labels};
use crate::data::SignalDataset;
use crate::eval::{labels_to_tensor, signals_to_tensor, to_class_indices};
use crate::model::architecture::{init_model, HarModel};
use crate::model::ModelConfig;
use crate::training::scheduler::HoldDecaySchedule;
use crate::training::{TrainingRun, TrainingState};
use anyhow::{bail, Result};
use burn::grad_clipping::GradientClippingConfig;
use burn::module::AutodiffModule;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::decay::WeightDecayConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Int, Tensor};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info};

/// Trainer for the activity-recognition model.
///
/// Single-threaded and batch-sequential: batches are materialized by cycling
/// over the training set with a climbing step counter, never by shuffling.
pub struct Trainer<'a, B: AutodiffBackend> {
    preset: &'a Preset,
    model_config: ModelConfig,
    device: B::Device,
    epochs: usize,
    batch_size: usize,
}

/// A trained model together with its per-epoch history.
pub struct TrainOutcome<B: AutodiffBackend> {
    /// Model trained at the run's learning rate
    pub model: HarModel<B::InnerBackend>,
    /// History for the curve plots
    pub run: TrainingRun,
}

impl<'a, B: AutodiffBackend> Trainer<'a, B> {
    /// Create a trainer for a preset
    pub fn new(preset: &'a Preset, device: B::Device) -> Self {
        Self {
            preset,
            model_config: ModelConfig::from_preset(preset),
            device,
            epochs: config::N_EPOCHS,
            batch_size: config::BATCH_SIZE,
        }
    }

    /// Override the epoch count (quick runs)
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Train once per learning rate in the preset, in order.
    pub fn train_all(
        &self,
        train: &SignalDataset,
        test: &SignalDataset,
    ) -> Result<Vec<TrainOutcome<B>>> {
        self.preset
            .learning_rates
            .iter()
            .map(|&lr| self.train(train, test, lr))
            .collect()
    }

    /// Run the full training loop at one base learning rate.
    pub fn train(
        &self,
        train: &SignalDataset,
        test: &SignalDataset,
        base_lr: f64,
    ) -> Result<TrainOutcome<B>> {
        if train.is_empty() || test.is_empty() {
            bail!("Cannot train on an empty dataset");
        }

        info!("{}", self.preset.diag);
        info!(
            "Training {} epochs at lr {} on {} windows ({} test)",
            self.epochs,
            base_lr,
            train.len(),
            test.len()
        );

        let start_time = Instant::now();
        let schedule = HoldDecaySchedule::from_preset(self.preset);
        let loss_fn = CrossEntropyLossConfig::new().init(&self.device);

        let mut model = init_model::<B>(&self.model_config, &self.device);
        let mut optim = AdamConfig::new()
            .with_weight_decay(Some(WeightDecayConfig::new(self.preset.weight_decay)))
            .with_grad_clipping(Some(GradientClippingConfig::Value(self.preset.clip_val)))
            .init();

        // Test tensors are built once; only the model changes between epochs.
        let test_inputs = signals_to_tensor::<B::InnerBackend>(&test.signals, &self.device);
        let test_targets = labels_to_tensor::<B::InnerBackend>(&test.labels, &self.device);

        let steps_per_epoch = (train.len() / self.batch_size).max(1);
        let mut state = TrainingState::new();

        let progress = ProgressBar::new(self.epochs as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} epochs [{elapsed_precise}] {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for epoch in 1..=self.epochs {
            let lr = schedule.lr_for_epoch(base_lr, epoch - 1);

            let mut epoch_loss = 0.0;
            let mut epoch_correct = 0usize;

            for step in 1..=steps_per_epoch {
                // The step counter keeps climbing across epochs so batch
                // extraction cycles through the data indefinitely.
                let global_step = state.global_step + 1;
                let batch = extract_batch(&train.signals, global_step, self.batch_size);
                let labels = extract_batch_labels(&train.labels, global_step, self.batch_size);

                let inputs = signals_to_tensor::<B>(&batch, &self.device);
                let targets = labels_to_tensor::<B>(&labels, &self.device);

                let logits = model.forward(inputs);
                let loss = loss_fn.forward(logits.clone(), targets.clone());

                epoch_loss += loss.clone().into_scalar().elem::<f64>();
                epoch_correct += correct_count(logits, targets);

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optim.step(lr, model, grads);
                state.global_step = global_step;

                debug!("epoch {} step {}/{}", epoch, step, steps_per_epoch);
            }

            let train_loss = epoch_loss / steps_per_epoch as f64;
            let train_accuracy =
                epoch_correct as f64 / (steps_per_epoch * self.batch_size) as f64;

            // Full-test-set forward on the inner backend: no gradient
            // tracking, no parameter movement.
            let valid_model = model.valid();
            let test_logits = valid_model.forward(test_inputs.clone());
            let test_loss = CrossEntropyLossConfig::new()
                .init(&self.device)
                .forward(test_logits.clone(), test_targets.clone())
                .into_scalar()
                .elem::<f64>();
            let test_accuracy = correct_count(test_logits, test_targets.clone()) as f64
                / test.len() as f64;

            state.update_epoch(train_loss, train_accuracy, test_loss, test_accuracy, lr);
            progress.set_message(format!(
                "loss {:.4} acc {:.3} test_acc {:.3}",
                train_loss, train_accuracy, test_accuracy
            ));
            progress.inc(1);
        }
        progress.finish();

        let duration_secs = start_time.elapsed().as_secs_f64();
        info!(
            "Finished training at lr {} in {:.1}s (final test accuracy {:.3})",
            base_lr,
            duration_secs,
            state.test_accuracy_history.last().copied().unwrap_or(0.0)
        );

        Ok(TrainOutcome {
            model: model.valid(),
            run: TrainingRun { learning_rate: base_lr, state, duration_secs },
        })
    }
}

/// Count top-1 predictions matching the targets.
fn correct_count<B: burn::tensor::backend::Backend>(
    logits: Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
) -> usize {
    let predictions: Tensor<B, 1, Int> = logits.argmax(1).squeeze(1);
    to_class_indices(predictions)
        .into_iter()
        .zip(to_class_indices(targets))
        .filter(|(p, t)| p == t)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SignalTensor;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray<f32>>;

    fn tiny_dataset(n: usize) -> SignalDataset {
        let data: Vec<f32> = (0..n * 4 * 9).map(|v| (v % 7) as f32 / 7.0).collect();
        let signals = SignalTensor::new(data, n, 4, 9).unwrap();
        let labels: Vec<i64> = (0..n as i64).map(|v| v % 6).collect();
        SignalDataset::new(signals, labels).unwrap()
    }

    #[test]
    fn test_train_records_history() {
        let device = Default::default();
        let preset = Preset::lstm1();
        let trainer = Trainer::<TestBackend>::new(&preset, device).with_epochs(2);

        let train = tiny_dataset(8);
        let test = tiny_dataset(4);

        let outcome = trainer.train(&train, &test, 0.01).unwrap();
        assert_eq!(outcome.run.state.epoch, 2);
        assert_eq!(outcome.run.state.train_loss_history.len(), 2);
        assert_eq!(outcome.run.state.test_accuracy_history.len(), 2);
        assert_eq!(outcome.run.state.lr_history.len(), 2);
    }

    #[test]
    fn test_train_rejects_empty_dataset() {
        let device = Default::default();
        let preset = Preset::lstm1();
        let trainer = Trainer::<TestBackend>::new(&preset, device).with_epochs(1);

        let train = tiny_dataset(4);
        let empty = SignalDataset::new(
            SignalTensor::new(vec![], 0, 4, 9).unwrap(),
            vec![],
        )
        .unwrap();

        assert!(trainer.train(&empty, &train, 0.01).is_err());
    }
}

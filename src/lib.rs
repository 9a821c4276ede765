//! # harnet: Human Activity Recognition Trainer
//!
//! harnet trains an LSTM classifier over fixed-length windows of smartphone
//! inertial-sensor signals and scores it on a held-out test split.
//!
//! ## Features
//!
//! - Named architecture presets (baseline LSTM, highway LSTM)
//! - Whitespace-delimited signal/label loading (plain or gzipped)
//! - Deterministic cycling batch extraction, no shuffling
//! - Hold-then-linear-decay learning-rate schedule
//! - Accuracy / macro F1 / confusion-matrix evaluation with chart output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use harnet::config::Preset;
//! use harnet::data::{loader, SignalDataset};
//! use harnet::training::trainer::Trainer;
//!
//! type Backend = burn::backend::Autodiff<harnet::DefaultBackend>;
//!
//! let preset = Preset::by_name("LSTM2").unwrap();
//!
//! let (signal_paths, label_path) = loader::dataset_paths("UCI_HAR", "train");
//! let signals = loader::load_signals(&signal_paths).unwrap();
//! let labels = loader::load_labels(&label_path).unwrap();
//! let train = SignalDataset::new(signals, labels).unwrap();
//!
//! let (signal_paths, label_path) = loader::dataset_paths("UCI_HAR", "test");
//! let signals = loader::load_signals(&signal_paths).unwrap();
//! let labels = loader::load_labels(&label_path).unwrap();
//! let test = SignalDataset::new(signals, labels).unwrap();
//!
//! let device = Default::default();
//! let trainer = Trainer::<Backend>::new(&preset, device);
//! let outcomes = trainer.train_all(&train, &test).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod eval;
pub mod model;
pub mod plot;
pub mod training;
pub mod utils;

use burn_ndarray::NdArray;

/// Default backend type
pub type DefaultBackend = NdArray<f32>;

/// Re-export commonly used types
pub use config::Preset;
pub use data::{SignalDataset, SignalTensor};
pub use eval::Evaluation;
pub use model::{architecture::HarModel, ModelConfig};
pub use training::{TrainingRun, TrainingState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!(
        "{} v{} - human activity recognition trainer",
        NAME, VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_info() {
        let info_str = info();
        assert!(info_str.contains("harnet"));
        assert!(info_str.contains(VERSION));
    }
}

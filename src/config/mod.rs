use anyhow::{bail, Result};
use serde::Serialize;

/// Number of activity classes
pub const N_CLASSES: usize = 6;

/// Number of input signal channels
pub const N_INPUT: usize = 9;

/// Number of hidden units per recurrent layer
pub const N_HIDDEN: usize = 32;

/// Training batch size
pub const BATCH_SIZE: usize = 64;

/// Total number of training epochs
pub const N_EPOCHS: usize = 650;

/// Named hyperparameter bundle selecting one model configuration.
///
/// Constructed once at startup and passed by reference to every consumer;
/// nothing reads preset values from ambient state.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    /// Preset name
    pub name: &'static str,
    /// Use bidirectional recurrent layers
    pub bidir: bool,
    /// Gradient clipping threshold
    pub clip_val: f32,
    /// Dropout probability between recurrent layers
    pub drop_prob: f64,
    /// Epochs to hold the learning rate before linear decay
    pub n_epochs_hold: usize,
    /// Number of stacked recurrent layers
    pub n_layers: usize,
    /// Learning rates to train with, one full run each
    pub learning_rates: Vec<f64>,
    /// L2 weight decay
    pub weight_decay: f32,
    /// Number of layers with residual connections
    pub n_residual_layers: usize,
    /// Number of layers with highway gating
    pub n_highway_layers: usize,
    /// Human-readable architecture description
    pub diag: &'static str,
    /// File name for the per-run results summary
    pub save_file: &'static str,
}

impl Preset {
    /// Baseline LSTM architecture
    pub fn lstm1() -> Self {
        Self {
            name: "LSTM1",
            bidir: false,
            clip_val: 10.0,
            drop_prob: 0.5,
            n_epochs_hold: 200,
            n_layers: 2,
            learning_rates: vec![0.0015],
            weight_decay: 0.001,
            n_residual_layers: 0,
            n_highway_layers: 0,
            diag: "Architecture chosen is baseline LSTM with 1 layer",
            save_file: "results_lstm1.txt",
        }
    }

    /// Baseline LSTM with a highway layer
    pub fn lstm2() -> Self {
        Self {
            name: "LSTM2",
            n_highway_layers: 1,
            diag: "Architecture chosen is baseline LSTM with 2 layers",
            save_file: "results_lstm2.txt",
            ..Self::lstm1()
        }
    }

    /// Look up a preset by name
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "LSTM1" => Ok(Self::lstm1()),
            "LSTM2" => Ok(Self::lstm2()),
            other => bail!("Unknown architecture preset: {}", other),
        }
    }

    /// Names of all known presets
    pub fn names() -> &'static [&'static str] {
        &["LSTM1", "LSTM2"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_constants() {
        assert_eq!(N_CLASSES, 6);
        assert_eq!(N_INPUT, 9);
        assert_eq!(N_HIDDEN, 32);
        assert_eq!(BATCH_SIZE, 64);
        assert_eq!(N_EPOCHS, 650);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Preset::by_name("LSTM1").unwrap().name, "LSTM1");
        assert_eq!(Preset::by_name("LSTM2").unwrap().name, "LSTM2");
        assert!(Preset::by_name("GRU1").is_err());
    }

    #[test]
    fn test_presets_differ_only_in_documented_fields() {
        let a = Preset::lstm1();
        let b = Preset::lstm2();

        assert_ne!(a.name, b.name);
        assert_ne!(a.n_highway_layers, b.n_highway_layers);
        assert_ne!(a.diag, b.diag);
        assert_ne!(a.save_file, b.save_file);

        assert_eq!(a.bidir, b.bidir);
        assert_eq!(a.clip_val, b.clip_val);
        assert_eq!(a.drop_prob, b.drop_prob);
        assert_eq!(a.n_epochs_hold, b.n_epochs_hold);
        assert_eq!(a.n_layers, b.n_layers);
        assert_eq!(a.learning_rates, b.learning_rates);
        assert_eq!(a.weight_decay, b.weight_decay);
        assert_eq!(a.n_residual_layers, b.n_residual_layers);
    }

    #[test]
    fn test_lstm2_values() {
        let p = Preset::lstm2();
        assert_eq!(p.name, "LSTM2");
        assert_eq!(p.n_highway_layers, 1);
        assert_eq!(p.n_layers, 2);
        assert_eq!(p.learning_rates, vec![0.0015]);
        assert_eq!(p.save_file, "results_lstm2.txt");
    }
}

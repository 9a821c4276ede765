pub mod architecture;

use crate::config::{self, Preset};
use burn::prelude::*;

/// Model configuration
#[derive(Config, Debug)]
pub struct ModelConfig {
    /// Number of input signal channels
    #[config(default = "9")]
    pub n_input: usize,

    /// Number of hidden units per recurrent layer
    #[config(default = "32")]
    pub n_hidden: usize,

    /// Number of output classes
    #[config(default = "6")]
    pub n_classes: usize,

    /// Number of stacked recurrent layers
    #[config(default = "2")]
    pub n_layers: usize,

    /// Dropout rate between recurrent layers
    #[config(default = "0.5")]
    pub dropout: f64,

    /// Use bidirectional recurrent layers
    #[config(default = "false")]
    pub bidir: bool,

    /// Number of layers with highway gating, counted from the top
    #[config(default = "0")]
    pub n_highway_layers: usize,

    /// Number of layers with residual connections, counted from the top
    #[config(default = "0")]
    pub n_residual_layers: usize,
}

impl ModelConfig {
    /// Build the model configuration selected by a preset
    pub fn from_preset(preset: &Preset) -> Self {
        Self::new()
            .with_n_input(config::N_INPUT)
            .with_n_hidden(config::N_HIDDEN)
            .with_n_classes(config::N_CLASSES)
            .with_n_layers(preset.n_layers)
            .with_dropout(preset.drop_prob)
            .with_bidir(preset.bidir)
            .with_n_highway_layers(preset.n_highway_layers)
            .with_n_residual_layers(preset.n_residual_layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_preset() {
        let cfg = ModelConfig::from_preset(&Preset::lstm2());
        assert_eq!(cfg.n_input, 9);
        assert_eq!(cfg.n_hidden, 32);
        assert_eq!(cfg.n_classes, 6);
        assert_eq!(cfg.n_layers, 2);
        assert_eq!(cfg.n_highway_layers, 1);
        assert!(!cfg.bidir);
    }
}

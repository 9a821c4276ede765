use crate::model::ModelConfig;
use burn::module::Module;
use burn::nn::{
    BiLstm, BiLstmConfig, Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig,
};
use burn::tensor::activation::sigmoid;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// One recurrent cell, unidirectional or bidirectional.
#[derive(Module, Debug)]
pub enum Recurrent<B: Backend> {
    Uni(Lstm<B>),
    Bi(BiLstm<B>),
}

impl<B: Backend> Recurrent<B> {
    fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        // Hidden state starts fresh on every forward; nothing is threaded
        // across batches.
        match self {
            Recurrent::Uni(lstm) => lstm.forward(input, None).0,
            Recurrent::Bi(lstm) => lstm.forward(input, None).0,
        }
    }
}

/// Highway gating over a recurrent layer: a sigmoid gate blends the layer's
/// hidden sequence with a linear projection of the layer's input.
#[derive(Module, Debug)]
pub struct HighwayGate<B: Backend> {
    gate: Linear<B>,
    carry: Linear<B>,
}

impl<B: Backend> HighwayGate<B> {
    fn forward(&self, input: Tensor<B, 3>, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        let gate = sigmoid(self.gate.forward(input.clone()));
        let carry = self.carry.forward(input);
        gate.clone() * hidden + gate.neg().add_scalar(1.0) * carry
    }
}

/// One stacked layer: cell plus optional highway gate and residual shortcut.
#[derive(Module, Debug)]
pub struct RecurrentLayer<B: Backend> {
    cell: Recurrent<B>,
    highway: Option<HighwayGate<B>>,
    residual: Option<Linear<B>>,
}

impl<B: Backend> RecurrentLayer<B> {
    fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        let hidden = self.cell.forward(input.clone());

        let out = match &self.highway {
            Some(gate) => gate.forward(input.clone(), hidden),
            None => hidden,
        };

        match &self.residual {
            Some(proj) => out + proj.forward(input),
            None => out,
        }
    }
}

/// Activity classifier: stacked (bi)LSTM over the signal window, classifying
/// from the last timestep's hidden state.
#[derive(Module, Debug)]
pub struct HarModel<B: Backend> {
    layers: Vec<RecurrentLayer<B>>,
    dropout: Dropout,
    output: Linear<B>,
}

impl<B: Backend> HarModel<B> {
    /// Forward pass: [batch, timesteps, channels] -> logits [batch, n_classes]
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, timesteps, _] = input.dims();

        let mut x = input;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);
            if i + 1 < self.layers.len() {
                x = self.dropout.forward(x);
            }
        }

        let hidden = x.dims()[2];
        let last: Tensor<B, 2> = x
            .slice([0..batch, timesteps - 1..timesteps, 0..hidden])
            .squeeze(1);

        self.output.forward(last)
    }
}

/// Initialize the activity model from configuration
pub fn init_model<B: Backend>(config: &ModelConfig, device: &B::Device) -> HarModel<B> {
    let d_out = if config.bidir { 2 * config.n_hidden } else { config.n_hidden };

    let mut layers = Vec::with_capacity(config.n_layers);
    let mut d_in = config.n_input;

    for i in 0..config.n_layers {
        let cell = if config.bidir {
            Recurrent::Bi(BiLstmConfig::new(d_in, config.n_hidden, true).init(device))
        } else {
            Recurrent::Uni(LstmConfig::new(d_in, config.n_hidden, true).init(device))
        };

        // Highway and residual counts apply to the top-most layers.
        let from_top = config.n_layers - 1 - i;
        let highway = (from_top < config.n_highway_layers).then(|| HighwayGate {
            gate: LinearConfig::new(d_in, d_out).init(device),
            carry: LinearConfig::new(d_in, d_out).init(device),
        });
        let residual =
            (from_top < config.n_residual_layers).then(|| LinearConfig::new(d_in, d_out).init(device));

        layers.push(RecurrentLayer { cell, highway, residual });
        d_in = d_out;
    }

    let output = LinearConfig::new(d_out, config.n_classes).init(device);
    let dropout = DropoutConfig::new(config.dropout).init();

    HarModel { layers, dropout, output }
}

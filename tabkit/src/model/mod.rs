//! Feed-forward neural network trained on [`TrainingData`].
//!
//! A fully connected network: one layer per hidden size plus an output layer
//! with one neuron per output column. Every layer uses the same activation.
//! Training is per-sample gradient descent on the half mean squared error,
//! visiting the samples in a freshly shuffled order each epoch.
//!
//! ```rust,no_run
//! use tabkit::{load_training_data, Model, ModelOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let data = load_training_data("sin.csv")?;
//!     let mut model = Model::new(&data, &ModelOptions::default())?;
//!     let report = model.train()?;
//!     println!("final loss: {:?}", report.final_loss);
//!     Ok(())
//! }
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::dataset::{load_training_data, ColumnRole, TrainingData};
use crate::error::{ModelError, ModelResult, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, LogCapture, LogEntry};

/// Activation applied by every neuron
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Relu => z.max(0.0),
            Activation::Sigmoid => sigmoid(z),
            Activation::Tanh => z.tanh(),
            Activation::Linear => z,
        }
    }

    /// Derivative with respect to the pre-activation value `z`
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            Activation::Linear => 1.0,
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Linear => "linear",
        };
        write!(f, "{}", name)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Network shape and training settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Neurons per hidden layer, input side first
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub epochs: usize,
    #[serde(default)]
    pub activation: Activation,
    /// Fixed seed for weight initialisation and shuffling
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            hidden_layers: vec![4, 4],
            learning_rate: 0.01,
            epochs: 100,
            activation: Activation::Relu,
            seed: None,
        }
    }
}

/// One neuron with the values from its latest forward/backward pass
#[derive(Debug, Clone, Serialize)]
pub struct Neuron {
    pub bias: f64,
    pub weights: Vec<f64>,
    /// Inputs that produced `z` and `output`
    pub inputs: Vec<f64>,
    /// Weighted sum plus bias
    pub z: f64,
    pub output: f64,
    /// Error term from backpropagation
    pub delta: f64,
}

impl Neuron {
    fn new(weights: Vec<f64>) -> Self {
        Self {
            bias: 0.0,
            weights,
            inputs: Vec::new(),
            z: 0.0,
            output: 0.0,
            delta: 0.0,
        }
    }

    fn weighted_sum(&self, inputs: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone)]
struct Sample {
    inputs: Vec<f64>,
    targets: Vec<f64>,
}

/// Loss and accuracy of one completed epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// Outcome of a full training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub activation: Activation,
    pub learning_rate: f64,
    pub input_columns: Vec<String>,
    pub output_columns: Vec<String>,
    pub loss: Vec<f64>,
    pub accuracy: Vec<f64>,
    pub final_loss: Option<f64>,
    pub network: Vec<Vec<Neuron>>,
    /// Log entries emitted during the run
    pub log: Vec<LogEntry>,
}

/// A trainable network bound to a data set
#[derive(Debug)]
pub struct Model {
    layers: Vec<Vec<Neuron>>,
    activation: Activation,
    learning_rate: f64,
    total_epochs: usize,
    input_columns: Vec<String>,
    output_columns: Vec<String>,
    samples: Vec<Sample>,
    loss: Vec<f64>,
    accuracy: Vec<f64>,
    rng: StdRng,
}

impl Model {
    /// Build a network sized for `data`'s input and output columns.
    ///
    /// Weights start uniformly in `[-1, 1)`, biases at 0.
    pub fn new(data: &TrainingData, options: &ModelOptions) -> ModelResult<Self> {
        if !(options.learning_rate.is_finite() && options.learning_rate > 0.0) {
            return Err(ModelError::InvalidLearningRate(options.learning_rate));
        }
        if let Some(i) = options.hidden_layers.iter().position(|&n| n == 0) {
            return Err(ModelError::EmptyLayer(i));
        }

        let input_idx = data.indices(ColumnRole::Input);
        let output_idx = data.indices(ColumnRole::Output);
        if input_idx.is_empty() {
            return Err(ModelError::NoInputs);
        }
        if output_idx.is_empty() {
            return Err(ModelError::NoOutputs);
        }

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sizes = options.hidden_layers.clone();
        sizes.push(output_idx.len());
        let mut fan_in = input_idx.len();
        let mut layers = Vec::with_capacity(sizes.len());
        for size in sizes {
            let layer = (0..size)
                .map(|_| Neuron::new((0..fan_in).map(|_| rng.gen_range(-1.0..1.0)).collect()))
                .collect();
            layers.push(layer);
            fan_in = size;
        }

        let samples = (0..data.len())
            .filter_map(|row| {
                Some(Sample {
                    inputs: data.inputs(row)?,
                    targets: data.targets(row)?,
                })
            })
            .collect();

        let names = |idx: &[usize]| -> Vec<String> {
            idx.iter().map(|&i| data.columns[i].name.clone()).collect()
        };

        Ok(Self {
            layers,
            activation: options.activation,
            learning_rate: options.learning_rate,
            total_epochs: options.epochs,
            input_columns: names(&input_idx),
            output_columns: names(&output_idx),
            samples,
            loss: Vec::new(),
            accuracy: Vec::new(),
            rng,
        })
    }

    /// Number of values the input layer takes
    pub fn input_width(&self) -> usize {
        self.input_columns.len()
    }

    pub fn network(&self) -> &[Vec<Neuron>] {
        &self.layers
    }

    pub fn loss_history(&self) -> &[f64] {
        &self.loss
    }

    pub fn accuracy_history(&self) -> &[f64] {
        &self.accuracy
    }

    pub fn epochs_completed(&self) -> usize {
        self.loss.len()
    }

    fn check_width(&self, inputs: &[f64]) -> ModelResult<()> {
        if inputs.len() != self.input_width() {
            return Err(ModelError::InputMismatch {
                expected: self.input_width(),
                got: inputs.len(),
            });
        }
        Ok(())
    }

    /// Run the network on `inputs` without touching its recorded state.
    pub fn predict(&self, inputs: &[f64]) -> ModelResult<Vec<f64>> {
        self.check_width(inputs)?;
        let mut current = inputs.to_vec();
        for layer in &self.layers {
            current = layer
                .iter()
                .map(|n| self.activation.apply(n.weighted_sum(&current)))
                .collect();
        }
        Ok(current)
    }

    /// Run the network on `inputs`, recording each neuron's inputs, `z` and output.
    pub fn forward(&mut self, inputs: &[f64]) -> ModelResult<Vec<f64>> {
        self.check_width(inputs)?;
        let activation = self.activation;
        let mut current = inputs.to_vec();
        for layer in &mut self.layers {
            let mut outputs = Vec::with_capacity(layer.len());
            for neuron in layer.iter_mut() {
                neuron.inputs = current.clone();
                neuron.z = neuron.weighted_sum(&current);
                neuron.output = activation.apply(neuron.z);
                outputs.push(neuron.output);
            }
            current = outputs;
        }
        Ok(current)
    }

    /// Backpropagate the error against `targets` from the last forward pass,
    /// then apply one gradient step to every weight and bias.
    fn backward(&mut self, targets: &[f64]) {
        let activation = self.activation;
        let last = self.layers.len() - 1;

        for (neuron, target) in self.layers[last].iter_mut().zip(targets) {
            neuron.delta = (neuron.output - target) * activation.derivative(neuron.z);
        }
        for l in (0..last).rev() {
            let (head, tail) = self.layers.split_at_mut(l + 1);
            let next = &tail[0];
            for (i, neuron) in head[l].iter_mut().enumerate() {
                let error: f64 = next.iter().map(|n| n.delta * n.weights[i]).sum();
                neuron.delta = error * activation.derivative(neuron.z);
            }
        }

        let rate = self.learning_rate;
        for neuron in self.layers.iter_mut().flatten() {
            let delta = neuron.delta;
            for (w, x) in neuron.weights.iter_mut().zip(&neuron.inputs) {
                *w -= rate * delta * x;
            }
            neuron.bias -= rate * delta;
        }
    }

    /// One pass over every sample in shuffled order.
    pub fn train_epoch(&mut self) -> ModelResult<EpochMetrics> {
        if self.samples.is_empty() {
            return Err(ModelError::NoSamples);
        }

        let mut order: Vec<usize> = (0..self.samples.len()).collect();
        order.shuffle(&mut self.rng);

        let mut total_loss = 0.0;
        let mut total_accuracy = 0.0;
        for idx in order {
            let sample = self.samples[idx].clone();
            let predictions = self.forward(&sample.inputs)?;
            total_loss += half_mse(&predictions, &sample.targets);
            total_accuracy += threshold_accuracy(&predictions, &sample.targets);
            self.backward(&sample.targets);
        }

        let n = self.samples.len() as f64;
        let metrics = EpochMetrics {
            epoch: self.loss.len() + 1,
            loss: total_loss / n,
            accuracy: total_accuracy / n,
        };
        self.loss.push(metrics.loss);
        self.accuracy.push(metrics.accuracy);
        Ok(metrics)
    }

    /// Train for the configured number of epochs.
    pub fn train(&mut self) -> ModelResult<TrainingReport> {
        log_info(format!(
            "🧠 Training {} epochs ({}, learning rate {})...",
            self.total_epochs, self.activation, self.learning_rate
        ));

        let every = (self.total_epochs / 10).max(1);
        for _ in 0..self.total_epochs {
            let m = self.train_epoch()?;
            if m.epoch == 1 || m.epoch % every == 0 || m.epoch == self.total_epochs {
                log_info_indent(
                    format!(
                        "Epoch {}/{}: loss {:.6}, accuracy {:.1}%",
                        m.epoch,
                        self.total_epochs,
                        m.loss,
                        m.accuracy * 100.0
                    ),
                    1,
                );
            }
        }

        if let Some(loss) = self.loss.last() {
            log_success(format!("Final loss: {:.6}", loss));
        }

        Ok(TrainingReport {
            epochs: self.epochs_completed(),
            activation: self.activation,
            learning_rate: self.learning_rate,
            input_columns: self.input_columns.clone(),
            output_columns: self.output_columns.clone(),
            loss: self.loss.clone(),
            accuracy: self.accuracy.clone(),
            final_loss: self.loss.last().copied(),
            network: self.layers.clone(),
            log: Vec::new(),
        })
    }
}

/// Half mean squared error of one sample
fn half_mse(predictions: &[f64], targets: &[f64]) -> f64 {
    let sum: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    sum / (2.0 * predictions.len() as f64)
}

/// Share of outputs on the same side of 0.5 as their target
fn threshold_accuracy(predictions: &[f64], targets: &[f64]) -> f64 {
    let correct = predictions
        .iter()
        .zip(targets)
        .filter(|(p, t)| (**p > 0.5) == (**t > 0.5))
        .count();
    correct as f64 / predictions.len() as f64
}

/// Load a CSV, apply role overrides and train a network on it.
///
/// The returned report carries the log entries emitted during the run.
pub fn train_csv(
    path: &Path,
    inputs: &[String],
    outputs: &[String],
    options: &ModelOptions,
) -> PipelineResult<TrainingReport> {
    let capture = LogCapture::start();

    let mut data = load_training_data(path)?;
    data.assign_roles(inputs, outputs)?;
    let mut model = Model::new(&data, options)?;
    let mut report = model.train()?;

    report.log = capture.finish();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_training_data;
    use crate::error::{DatasetError, PipelineError};
    use crate::generate::{write_sine, write_sine_csv, Domain, GeneratorOptions};
    use tempfile::tempdir;

    fn sine_data(rows: usize) -> TrainingData {
        let mut bytes = Vec::new();
        let options = GeneratorOptions {
            rows,
            domain: Domain::Period,
        };
        write_sine(&mut bytes, &options).unwrap();
        parse_training_data(&bytes).unwrap()
    }

    fn sine_options() -> ModelOptions {
        ModelOptions {
            hidden_layers: vec![8],
            learning_rate: 0.05,
            epochs: 300,
            activation: Activation::Tanh,
            seed: Some(7),
        }
    }

    #[test]
    fn test_activations() {
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Relu.derivative(3.0), 1.0);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
        assert!((Activation::Sigmoid.derivative(0.0) - 0.25).abs() < 1e-12);
        assert!((Activation::Tanh.derivative(0.0) - 1.0).abs() < 1e-12);
        assert_eq!(Activation::Linear.apply(-1.5), -1.5);
    }

    #[test]
    fn test_shape_follows_roles() {
        let data = parse_training_data(b"a,b,c\n1,2,3\n").unwrap();
        let model = Model::new(&data, &ModelOptions::default()).unwrap();

        let shape: Vec<usize> = model.network().iter().map(Vec::len).collect();
        assert_eq!(shape, vec![4, 4, 2]);
        assert_eq!(model.network()[0][0].weights.len(), 1);
        assert_eq!(model.network()[2][0].weights.len(), 4);
        assert!(model
            .network()
            .iter()
            .flatten()
            .flat_map(|n| n.weights.iter())
            .all(|w| (-1.0..1.0).contains(w)));
    }

    #[test]
    fn test_single_step_by_hand() {
        let data = parse_training_data(b"x,y\n3,6\n").unwrap();
        let options = ModelOptions {
            hidden_layers: vec![],
            learning_rate: 0.1,
            epochs: 1,
            activation: Activation::Linear,
            seed: Some(1),
        };
        let mut model = Model::new(&data, &options).unwrap();
        model.layers[0][0].weights = vec![2.0];
        model.layers[0][0].bias = 0.5;

        let m = model.train_epoch().unwrap();

        // prediction 6.5, error 0.5
        assert!((m.loss - 0.125).abs() < 1e-12);
        assert_eq!(m.accuracy, 1.0);
        let neuron = &model.network()[0][0];
        assert!((neuron.weights[0] - 1.85).abs() < 1e-12);
        assert!((neuron.bias - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_layer_gradient_uses_pre_update_weights() {
        let data = parse_training_data(b"x,y\n1,0\n").unwrap();
        let options = ModelOptions {
            hidden_layers: vec![1],
            learning_rate: 1.0,
            epochs: 1,
            activation: Activation::Linear,
            seed: Some(1),
        };
        let mut model = Model::new(&data, &options).unwrap();
        model.layers[0][0].weights = vec![1.0];
        model.layers[1][0].weights = vec![2.0];

        model.train_epoch().unwrap();

        // output 2, output delta 2, hidden delta 2 * 2 = 4
        assert!((model.network()[1][0].delta - 2.0).abs() < 1e-12);
        assert!((model.network()[0][0].delta - 4.0).abs() < 1e-12);
        assert!((model.network()[0][0].weights[0] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_loss_decreases_on_sine_table() {
        let data = sine_data(20);
        let mut model = Model::new(&data, &sine_options()).unwrap();
        let report = model.train().unwrap();

        assert_eq!(report.loss.len(), 300);
        assert_eq!(report.accuracy.len(), 300);
        let first = report.loss[0];
        let last = report.final_loss.unwrap();
        assert!(last < first, "loss went from {} to {}", first, last);
    }

    #[test]
    fn test_seed_makes_training_repeatable() {
        let data = sine_data(10);
        let mut options = sine_options();
        options.epochs = 20;

        let mut a = Model::new(&data, &options).unwrap();
        let mut b = Model::new(&data, &options).unwrap();
        a.train().unwrap();
        b.train().unwrap();

        assert_eq!(a.loss_history(), b.loss_history());
    }

    #[test]
    fn test_predict_does_not_record_state() {
        let data = sine_data(5);
        let mut model = Model::new(&data, &sine_options()).unwrap();

        let predicted = model.predict(&[1.0]).unwrap();
        assert!(model.network()[0][0].inputs.is_empty());

        let forwarded = model.forward(&[1.0]).unwrap();
        assert_eq!(predicted, forwarded);
        assert_eq!(model.network()[0][0].inputs, vec![1.0]);
    }

    #[test]
    fn test_input_mismatch() {
        let model = Model::new(&sine_data(5), &sine_options()).unwrap();
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::InputMismatch { expected: 1, got: 2 }));
    }

    #[test]
    fn test_construction_errors() {
        let single = parse_training_data(b"x\n1\n").unwrap();
        let err = Model::new(&single, &ModelOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::NoOutputs));

        let data = sine_data(5);
        let options = ModelOptions {
            hidden_layers: vec![4, 0],
            ..ModelOptions::default()
        };
        assert!(matches!(Model::new(&data, &options), Err(ModelError::EmptyLayer(1))));

        let options = ModelOptions {
            learning_rate: 0.0,
            ..ModelOptions::default()
        };
        assert!(matches!(
            Model::new(&data, &options),
            Err(ModelError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn test_no_samples() {
        let data = parse_training_data(b"x,y\n").unwrap();
        let mut model = Model::new(&data, &ModelOptions::default()).unwrap();
        assert!(matches!(model.train_epoch(), Err(ModelError::NoSamples)));
    }

    #[test]
    fn test_train_csv_with_role_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sin.csv");
        let gen = GeneratorOptions {
            rows: 8,
            domain: Domain::Period,
        };
        write_sine_csv(&path, &gen).unwrap();

        // Predict x from y instead of the default y from x
        let mut options = sine_options();
        options.epochs = 5;
        let report = train_csv(&path, &["y".to_string()], &[], &options).unwrap();

        assert_eq!(report.input_columns, vec!["y"]);
        assert_eq!(report.output_columns, vec!["x"]);
        assert_eq!(report.epochs, 5);
        assert!(report.log.iter().any(|e| e.message.starts_with("Epoch 5/5")));
    }

    #[test]
    fn test_train_csv_unknown_role_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sin.csv");
        write_sine_csv(&path, &GeneratorOptions::default()).unwrap();

        let err = train_csv(&path, &["z".to_string()], &[], &sine_options()).unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(DatasetError::UnknownColumn(_))));
    }
}

use serde::{Serialize, Deserialize};

use crate::activation::Activation;
use crate::error::{EngineError, Result};
use crate::init::InitMethod;
use crate::loss::LossFunction;

/// Architecture and hyperparameters of an `Engine`.
///
/// # Fields
/// - `input_size`    — features per sample
/// - `hidden_size`   — units in the single hidden layer
/// - `output_size`   — sigmoid output units; 1 means binary classification
/// - `activation`    — hidden-layer activation
/// - `learning_rate` — gradient-descent step size, must be positive
/// - `loss_function` — `mse` or `binary_crossentropy`
/// - `init`          — weight init; `None` picks the one recommended for `activation`
/// - `seed`          — fixes the initializer RNG for reproducible runs
///
/// The config is copied into the engine at construction and never changes
/// afterwards; a different architecture needs a new engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub activation: Activation,
    pub learning_rate: f64,
    pub loss_function: LossFunction,
    #[serde(default)]
    pub init: Option<InitMethod>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Sigmoid hidden layer, learning rate 0.1, MSE, recommended init, unseeded.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        TrainingConfig {
            input_size,
            hidden_size,
            output_size,
            activation: Activation::Sigmoid,
            learning_rate: 0.1,
            loss_function: LossFunction::Mse,
            init: None,
            seed: None,
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_loss(mut self, loss_function: LossFunction) -> Self {
        self.loss_function = loss_function;
        self
    }

    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The init method actually used: the explicit one, or the activation's default.
    pub fn init_method(&self) -> InitMethod {
        self.init.unwrap_or_else(|| InitMethod::recommended_for(self.activation))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if size == 0 {
                return Err(EngineError::config(format!("{name} must be at least 1")));
            }
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(EngineError::config(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if let Activation::LeakyReLU { alpha } = self.activation {
            if !alpha.is_finite() {
                return Err(EngineError::config(format!(
                    "leaky_relu alpha must be finite, got {alpha}"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<TrainingConfig> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file written by `save_json`.
    pub fn load_json(path: &str) -> Result<TrainingConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainingConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_snake_case_names() {
        let json = r#"{
            "input_size": 2,
            "hidden_size": 4,
            "output_size": 1,
            "activation": "relu",
            "learning_rate": 0.05,
            "loss_function": "binary_crossentropy",
            "init": "he"
        }"#;
        let config = TrainingConfig::from_json_str(json).unwrap();
        assert_eq!(config.activation, Activation::ReLU);
        assert_eq!(config.loss_function, LossFunction::BinaryCrossEntropy);
        assert_eq!(config.init_method(), InitMethod::He);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn bare_leaky_relu_name_uses_the_default_slope() {
        let json = r#"{
            "input_size": 2, "hidden_size": 3, "output_size": 1,
            "activation": "leaky_relu", "learning_rate": 0.1, "loss_function": "mse"
        }"#;
        let config = TrainingConfig::from_json_str(json).unwrap();
        assert_eq!(config.activation, Activation::leaky_relu());
        assert_eq!(config.init_method(), InitMethod::He);
    }

    #[test]
    fn loaded_config_is_validated() {
        let json = r#"{
            "input_size": 2, "hidden_size": 0, "output_size": 1,
            "activation": "sigmoid", "learning_rate": 0.1, "loss_function": "mse"
        }"#;
        assert!(matches!(
            TrainingConfig::from_json_str(json),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn save_then_load_preserves_every_field() {
        let config = TrainingConfig::new(3, 5, 2)
            .with_activation(Activation::leaky_relu())
            .with_loss(LossFunction::BinaryCrossEntropy)
            .with_seed(99);
        let path = std::env::temp_dir().join(format!("training-config-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        config.save_json(path).unwrap();
        let loaded = TrainingConfig::load_json(path).unwrap();
        std::fs::remove_file(path).ok();
        assert_eq!(loaded, config);
    }
}

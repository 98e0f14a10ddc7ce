use serde::{Serialize, Deserialize};

/// Pre-activations at or beyond this magnitude saturate the sigmoid to exactly 0 or 1.
const SIGMOID_CLAMP: f64 = 500.0;
/// Pre-activations beyond this magnitude saturate tanh to exactly ±1.
const TANH_CLAMP: f64 = 20.0;

pub const DEFAULT_LEAKY_ALPHA: f64 = 0.01;

pub fn sigmoid(z: f64) -> f64 {
    if z <= -SIGMOID_CLAMP {
        0.0
    } else if z >= SIGMOID_CLAMP {
        1.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

/// σ(z)·(1 − σ(z)); peaks at 0.25 for z = 0.
pub fn sigmoid_derivative(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

pub fn tanh(z: f64) -> f64 {
    if z > TANH_CLAMP {
        1.0
    } else if z < -TANH_CLAMP {
        -1.0
    } else {
        z.tanh()
    }
}

pub fn tanh_derivative(z: f64) -> f64 {
    let t = tanh(z);
    1.0 - t * t
}

pub fn relu(z: f64) -> f64 {
    if z > 0.0 { z } else { 0.0 }
}

/// Subgradient convention: 0 at z = 0.
pub fn relu_derivative(z: f64) -> f64 {
    if z > 0.0 { 1.0 } else { 0.0 }
}

pub fn leaky_relu(z: f64, alpha: f64) -> f64 {
    if z > 0.0 { z } else { alpha * z }
}

pub fn leaky_relu_derivative(z: f64, alpha: f64) -> f64 {
    if z > 0.0 { 1.0 } else { alpha }
}

/// Hidden-layer activation choice.
///
/// The output layer of the engine is always sigmoid; this enum only selects
/// what is applied to `z1`. In JSON it is a bare name (`"leaky_relu"` uses
/// the default slope) or, for leaky relu, `{"leaky_relu": {"alpha": ...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "ActivationRepr")]
pub enum Activation {
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky_relu")]
    LeakyReLU {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
}

fn default_alpha() -> f64 {
    DEFAULT_LEAKY_ALPHA
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActivationRepr {
    Name(ActivationName),
    Parameterized(ParameterizedActivation),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ActivationName {
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ParameterizedActivation {
    LeakyRelu {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
}

impl From<ActivationRepr> for Activation {
    fn from(repr: ActivationRepr) -> Self {
        match repr {
            ActivationRepr::Name(ActivationName::Sigmoid) => Activation::Sigmoid,
            ActivationRepr::Name(ActivationName::Tanh) => Activation::Tanh,
            ActivationRepr::Name(ActivationName::Relu) => Activation::ReLU,
            ActivationRepr::Name(ActivationName::LeakyRelu) => Activation::leaky_relu(),
            ActivationRepr::Parameterized(ParameterizedActivation::LeakyRelu { alpha }) => {
                Activation::LeakyReLU { alpha }
            }
        }
    }
}

impl Activation {
    /// `LeakyReLU` with the conventional slope of 0.01.
    pub fn leaky_relu() -> Activation {
        Activation::LeakyReLU { alpha: DEFAULT_LEAKY_ALPHA }
    }

    pub fn function(&self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(z),
            Activation::Tanh => tanh(z),
            Activation::ReLU => relu(z),
            Activation::LeakyReLU { alpha } => leaky_relu(z, *alpha),
        }
    }

    /// Derivative with respect to the pre-activation `z`.
    pub fn derivative(&self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_derivative(z),
            Activation::Tanh => tanh_derivative(z),
            Activation::ReLU => relu_derivative(z),
            Activation::LeakyReLU { alpha } => leaky_relu_derivative(z, *alpha),
        }
    }

    /// Element-wise [`Activation::function`] over a slice.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&x| self.function(x)).collect()
    }

    /// Element-wise [`Activation::derivative`] over a slice.
    pub fn apply_derivative(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&x| self.derivative(x)).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::ReLU => "relu",
            Activation::LeakyReLU { .. } => "leaky_relu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid_derivative(1000.0), 0.0);
    }

    #[test]
    fn tanh_clamps_past_twenty() {
        assert_eq!(tanh(25.0), 1.0);
        assert_eq!(tanh(-25.0), -1.0);
    }

    #[test]
    fn leaky_relu_alpha_defaults_when_missing_from_json() {
        let act: Activation = serde_json::from_str(r#"{"leaky_relu":{}}"#).unwrap();
        assert_eq!(act, Activation::leaky_relu());
        let act: Activation = serde_json::from_str(r#""tanh""#).unwrap();
        assert_eq!(act, Activation::Tanh);
    }

    #[test]
    fn leaky_relu_accepts_a_bare_name_or_an_explicit_alpha() {
        let act: Activation = serde_json::from_str(r#""leaky_relu""#).unwrap();
        assert_eq!(act, Activation::leaky_relu());
        let act: Activation = serde_json::from_str(r#"{"leaky_relu":{"alpha":0.2}}"#).unwrap();
        assert_eq!(act, Activation::LeakyReLU { alpha: 0.2 });
        assert!(serde_json::from_str::<Activation>(r#""softmax""#).is_err());
    }
}

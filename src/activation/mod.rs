//! Stateless activation functions, each paired with its derivative.
//!
//! Nothing here depends on the engine, so any other trainer can reuse it.

pub mod activation;

pub use activation::{
    Activation, DEFAULT_LEAKY_ALPHA,
    sigmoid, sigmoid_derivative,
    tanh, tanh_derivative,
    relu, relu_derivative,
    leaky_relu, leaky_relu_derivative,
};

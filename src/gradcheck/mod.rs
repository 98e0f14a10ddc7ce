//! Finite-difference oracle for validating backpropagation. Not used during training.

pub mod checker;

pub use checker::{
    check_gradients, gradient_difference, numerical_gradient, try_numerical_gradient,
    GradientCheckReport, GradientVerdict, ParameterId, DEFAULT_EPSILON,
};

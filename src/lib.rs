//! A from-scratch feed-forward network with one hidden layer: forward and
//! backward passes, gradient-descent training and a finite-difference
//! gradient checker.

pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod init;
pub mod network;
pub mod train;
pub mod gradcheck;

// Convenience re-exports
pub use error::{EngineError, Result};
pub use math::matrix::Matrix;
pub use activation::Activation;
pub use loss::LossFunction;
pub use init::InitMethod;
pub use network::{Engine, ForwardCache, Gradients, NetworkParameters};
pub use train::{EpochRecord, TrainingConfig, TrainingHistory};
pub use gradcheck::{check_gradients, GradientCheckReport, GradientVerdict};

pub mod mse;
pub mod bce;
pub mod loss_type;

pub use mse::{MseLoss, mean_squared_error, mean_squared_error_derivative};
pub use bce::{BceLoss, binary_cross_entropy, binary_cross_entropy_derivative};
pub use loss_type::LossFunction;

pub mod weight_init;

pub use weight_init::{InitMethod, initialize_weights, sample_standard_normal};

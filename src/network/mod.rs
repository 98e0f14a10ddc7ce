pub mod engine;
pub mod params;

pub use engine::{Engine, forward_pass, batch_loss};
pub use params::{NetworkParameters, ForwardCache, Gradients};

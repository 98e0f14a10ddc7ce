pub mod train_config;
pub mod history;
pub mod loop_fn;
pub mod evaluate;

pub use train_config::TrainingConfig;
pub use history::{EpochRecord, TrainingHistory};

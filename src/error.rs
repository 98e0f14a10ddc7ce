use thiserror::Error;

/// Every failure the engine can report.
///
/// Numeric instability is not represented here: extreme pre-activations are
/// clamped inside the activation and loss functions instead of surfacing as
/// `NaN` or an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid architecture or hyperparameters, detected before any engine exists.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Dimension mismatch between matrices, vectors or a forward cache.
    /// Always raised before any parameter is touched.
    #[error("shape mismatch in {op}: {detail}")]
    Shape { op: &'static str, detail: String },

    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn shape(op: &'static str, detail: impl Into<String>) -> Self {
        EngineError::Shape { op, detail: detail.into() }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EngineError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

use thiserror::Error;

/// Everything that can go wrong between a form submission and its
/// prediction line. Per-request variants surface to the caller and are
/// never retried; `ModelLoad` is fatal at startup — a process that fails
/// to load its artifact must not serve requests.
#[derive(Debug, Error)]
pub enum CoverError {
    /// The category label carries no parseable trailing index,
    /// e.g. "Wilderness Area" or "Soil".
    #[error("malformed category choice {choice:?}: expected a trailing 1-based index")]
    InvalidChoiceFormat { choice: String },

    /// The parsed index falls outside the indicator group.
    #[error("{group} index {index} outside 1..={len}")]
    IndexOutOfRange {
        group: &'static str,
        index: usize,
        len: usize,
    },

    /// Assembled row length does not match the model's feature count.
    #[error("feature vector has {got} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    /// The classifier emitted a class code with no label mapping.
    /// Indicates a model/label mismatch, not a normal runtime path.
    #[error("classifier returned unmapped class code {0}")]
    UnknownClassCode(u8),

    /// The model artifact could not be read, parsed, or validated.
    #[error("cannot load model artifact {path}: {reason}")]
    ModelLoad { path: String, reason: String },
}

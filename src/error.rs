use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid stroke: {0}")]
    InvalidStroke(String),

    #[error("Snapshot too large ({0} bytes)")]
    SnapshotTooLarge(usize),

    #[error("Word list has no usable entries")]
    EmptyWordList,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

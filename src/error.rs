use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A structurally required field (full name, gender) is absent.
    #[error("invalid biodata record: {0}")]
    InvalidRecord(String),
    /// The drawing or rasterization machinery of a renderer failed.
    #[error("render backend failure: {0}")]
    Backend(String),
    /// A requested font family was found but could not be read or embedded.
    #[error("font error: {0}")]
    Font(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that a caller may answer by retrying with the other renderer.
    /// Record problems are the caller's contract violation, and font problems come from the
    /// font registration both renderers share, so either would fail again.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}

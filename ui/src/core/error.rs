use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

/// Failure taxonomy for a render pass. Every variant is surfaced to the user
/// as a single message; none of them poison the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("corrupt settings: {0}")]
    CorruptSettings(String),

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The rendering capability itself failed mid-export.
    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl PlotError {
    pub fn missing_field(field: &str) -> Self {
        Self::MalformedInput(format!("record is missing the `{field}` field"))
    }
}

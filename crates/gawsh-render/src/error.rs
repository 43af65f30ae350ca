/// Errors from rendering a blob.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Reading the blob or writing the fragment failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob is larger than the renderer accepts.
    #[error("blob is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The highlighter gave up on the blob or the theme.
    #[error("highlighting failed: {0}")]
    Highlight(String),

    #[error("unknown theme {name:?}; available: {available}")]
    UnknownTheme { name: String, available: String },
}

/// Result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

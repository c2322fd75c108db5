use thiserror::Error;

/// Main error type for featgen
#[derive(Error, Debug)]
pub enum FeatgenError {
    /// Malformed sentence input: bad dependency descriptor, mismatched
    /// token text, out-of-range index, or inconsistent annotation arrays
    #[error("Format error: {0}")]
    Format(String),

    /// Span falls outside its sentence
    #[error("Bounds error: {0}")]
    Bounds(String),

    /// File system I/O errors (dictionary sources)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient Result type using FeatgenError
pub type Result<T> = std::result::Result<T, FeatgenError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InteropError {
    #[error("Missing required value: {name}")]
    MissingRequiredValue { name: &'static str },

    #[error("Unsupported implementation: value was not produced by a wrapper over {native}")]
    UnsupportedImplementation { native: &'static str },

    #[error("Null element at index {index} in a non-nullable sequence")]
    NullElementInNonNullableSequence { index: usize },

    #[error("Object disposed: {type_name}")]
    ObjectDisposed { type_name: &'static str },

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InteropError>;

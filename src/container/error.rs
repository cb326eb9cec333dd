use thiserror::Error;

/// Broad category of a [`ResourceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a bad value (empty, malformed or out of order)
    InvalidArgument,
    /// The call violates the builder protocol (capacity, one-shot build)
    IllegalState,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource count must be positive, got {0}")]
    InvalidCount(usize),

    #[error("Resource path must not be empty or whitespace")]
    EmptyPath,

    #[error("Invalid resource path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Added path must be sorted: previous '{previous}' is not lower than '{path}'")]
    OutOfOrder { previous: String, path: String },

    #[error("Display name must not be empty or whitespace")]
    EmptyDisplayName,

    #[error("The planned number of resources ({capacity}) must not be exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Planned number of resources must have been added: {added} of {expected}")]
    Incomplete { added: usize, expected: usize },

    #[error("Build must be called only once")]
    AlreadyBuilt,
}

impl ResourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::InvalidCount(_)
            | ResourceError::EmptyPath
            | ResourceError::InvalidPath { .. }
            | ResourceError::OutOfOrder { .. }
            | ResourceError::EmptyDisplayName => ErrorKind::InvalidArgument,
            ResourceError::CapacityExceeded { .. }
            | ResourceError::Incomplete { .. }
            | ResourceError::AlreadyBuilt => ErrorKind::IllegalState,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_illegal_state(&self) -> bool {
        self.kind() == ErrorKind::IllegalState
    }
}

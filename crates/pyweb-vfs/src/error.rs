use thiserror::Error;

/// Virtual filesystem errors.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Path escapes the filesystem root.
    #[error("Path resolves outside sandbox boundaries: {0}")]
    SandboxViolation(String),

    /// Native IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing directory or file.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path is already taken.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A file was used where a directory was expected, or the reverse.
    #[error("Wrong entry type at {0}")]
    WrongType(String),
}

/// Convenience result type for VFS operations.
pub type VfsResult<T> = Result<T, VfsError>;

//! Error types for symtrans operations.
//!
//! Kernels themselves never fail; errors come from allocating the matrices,
//! parsing the invocation, building worker pools and writing result artifacts.

use std::fmt;
use std::path::Path;

/// Errors that can occur while preparing or recording a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymtransError {
    /// A matrix buffer could not be obtained.
    AllocationError {
        /// Number of `f64` elements that were requested.
        requested_elements: usize,
        /// Human-readable error message.
        message: String,
    },
    /// The program was invoked with missing or invalid arguments.
    InvalidInvocation {
        /// Human-readable error message.
        message: String,
    },
    /// A result artifact could not be opened or appended to.
    ArtifactWriteError {
        /// Path of the artifact.
        path: String,
        /// Human-readable error message.
        message: String,
    },
    /// A worker pool of the requested size could not be built.
    ThreadPoolError {
        /// Requested number of workers.
        threads: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for SymtransError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymtransError::AllocationError {
                requested_elements,
                message,
            } => write!(
                f,
                "Matrix allocation failed: {} (requested {} f64 elements)",
                message, requested_elements
            ),
            SymtransError::InvalidInvocation { message } => {
                write!(f, "Invalid invocation: {}", message)
            }
            SymtransError::ArtifactWriteError { path, message } => {
                write!(f, "Cannot write results to {}: {}", path, message)
            }
            SymtransError::ThreadPoolError { threads, message } => write!(
                f,
                "Cannot build a pool of {} worker threads: {}",
                threads, message
            ),
        }
    }
}

impl std::error::Error for SymtransError {}

/// Result type alias for symtrans operations.
pub type Result<T> = std::result::Result<T, SymtransError>;

/// Creates an allocation error.
pub fn allocation_error(requested_elements: usize, message: impl Into<String>) -> SymtransError {
    SymtransError::AllocationError {
        requested_elements,
        message: message.into(),
    }
}

/// Creates an invalid invocation error.
pub fn invocation_error(message: impl Into<String>) -> SymtransError {
    SymtransError::InvalidInvocation {
        message: message.into(),
    }
}

/// Creates an artifact write error.
pub fn artifact_error(path: &Path, message: impl Into<String>) -> SymtransError {
    SymtransError::ArtifactWriteError {
        path: path.display().to_string(),
        message: message.into(),
    }
}

/// Creates a thread pool error.
pub fn thread_pool_error(threads: usize, message: impl Into<String>) -> SymtransError {
    SymtransError::ThreadPoolError {
        threads,
        message: message.into(),
    }
}

//! Error types and exit codes for specguard

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for specguard operations
#[derive(Error, Debug)]
pub enum SpecGuardError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Configuration error in {path}: {message}")]
    ConfigError { path: PathBuf, message: String },

    #[error("Serialization failed: {message}")]
    SerializationFailure { message: String },

    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecGuardError {
    /// Convert error to the process exit code:
    /// - 0: Success
    /// - 1: File not found / IO error / worker pool
    /// - 2: Configuration error
    /// - 3: Serialization failure
    ///
    /// Exit code 10 (blocking audit errors) is not an error of the tool
    /// itself and is produced by the binary, see `main.rs`.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(1),
            Self::NotADirectory { .. } => ExitCode::from(1),
            Self::ConfigError { .. } => ExitCode::from(2),
            Self::SerializationFailure { .. } => ExitCode::from(3),
            Self::WorkerPool { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
        }
    }
}

impl From<serde_json::Error> for SpecGuardError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationFailure {
            message: e.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for SpecGuardError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool {
            message: e.to_string(),
        }
    }
}

/// Result type alias for specguard operations
pub type Result<T> = std::result::Result<T, SpecGuardError>;

//! Error handling utilities for the Shard compiler

use thiserror::Error;

/// The main error type for the Shard compiler
#[derive(Error, Debug, Clone)]
pub enum ShardError {
    #[error("Construction error: {message}")]
    ConstructionError { message: String },

    #[error("Analysis error: {message}")]
    AnalysisError { message: String },

    #[error("Codec error: {message}")]
    CodecError { message: String },

    #[error("Runtime error: {message}")]
    RuntimeError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Result type alias for Shard compiler operations
pub type ShardResult<T> = Result<T, ShardError>;

impl ShardError {
    pub fn construction_error(message: impl Into<String>) -> Self {
        Self::ConstructionError { message: message.into() }
    }

    pub fn analysis_error(message: impl Into<String>) -> Self {
        Self::AnalysisError { message: message.into() }
    }

    pub fn codec_error(message: impl Into<String>) -> Self {
        Self::CodecError { message: message.into() }
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::RuntimeError { message: message.into() }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError { message: message.into() }
    }
}

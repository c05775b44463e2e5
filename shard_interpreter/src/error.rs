//! Interpreter runtime errors

use shard_common::ShardError;
use thiserror::Error;

/// An error raised while executing IR. The failing call is aborted and its
/// frames unwound.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("call to unresolved function '{0}'")]
    UnresolvedCall(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("invalid memory access")]
    InvalidAccess,

    #[error("read of uninitialized memory")]
    UninitializedRead,

    #[error("use of undefined value")]
    UndefinedValue,

    #[error("block ended without a terminator")]
    MissingTerminator,

    #[error("function '{0}' has no entry block")]
    NoEntryBlock(String),
}

impl From<RuntimeError> for ShardError {
    fn from(err: RuntimeError) -> Self {
        ShardError::runtime_error(err.to_string())
    }
}

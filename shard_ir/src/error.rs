//! IR construction errors

use crate::function::BlockId;
use crate::types::Type;
use crate::value::ValueId;
use shard_common::ShardError;
use thiserror::Error;

/// A builder was asked to create an instruction violating an IR invariant.
/// Raised eagerly at the call site; the builder is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("operand type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Type, found: Type },

    #[error("expected a pointer operand, found {found}")]
    NotAPointer { found: Type },

    #[error("{op} requires an integer type, found {found}")]
    NonIntegerOperand { op: &'static str, found: Type },

    #[error("allocation count must be at least 1")]
    ZeroCount,

    #[error("operand must be a virtual value, not a constant")]
    ConstantOperand,

    #[error("call to '{name}' does not match any function signature")]
    CalleeSignatureMismatch { name: String },

    #[error("unknown value id {0}")]
    UnknownValue(ValueId),

    #[error("unknown block id {0}")]
    UnknownBlock(BlockId),
}

impl From<IrError> for ShardError {
    fn from(err: IrError) -> Self {
        ShardError::construction_error(err.to_string())
    }
}

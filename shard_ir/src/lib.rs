//! Intermediate representation for the Shard language
//!
//! An SSA-style linear IR: a [`Module`] owns types, a constant pool and
//! [`Function`]s; each function owns basic [`Block`]s of typed
//! [`Instruction`]s. Virtual values are identified by function-local
//! [`ValueId`] handles, constants are inlined into operands. The [`codec`]
//! module implements the bit-exact binary wire format.

pub mod codec;
pub mod error;
pub mod function;
pub mod instruction;
pub mod module;
pub mod types;
pub mod value;

pub use error::IrError;
pub use function::{Block, BlockId, Function};
pub use instruction::{BinaryOp, CmpOp, Instruction};
pub use module::Module;
pub use types::Type;
pub use value::{Constant, Operand, ValueId};

//! Functions and basic blocks

use crate::error::IrError;
use crate::instruction::{BinaryOp, CmpOp, Instruction};
use crate::types::Type;
use crate::value::{Operand, ValueId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a block of its owning function, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of instructions with a single entry. Control leaves
/// only through the trailing terminator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    instructions: Vec<Instruction>,
}

impl Block {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// The trailing instruction, if it is a terminator.
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.is_terminator())
    }
}

/// A function: signature, argument values, and the owned block graph.
///
/// One virtual value per parameter is created at construction; results of
/// instructions allocate the ids that follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    name: String,
    return_type: Option<Type>,
    parameter_types: Vec<Type>,
    /// Type of every virtual value, indexed by [`ValueId`].
    values: Vec<Type>,
    blocks: Vec<Block>,
}

impl Function {
    pub(crate) fn new(
        name: impl Into<String>,
        return_type: Option<Type>,
        parameter_types: Vec<Type>,
    ) -> Self {
        let values = parameter_types.clone();
        Self {
            name: name.into(),
            return_type,
            parameter_types,
            values,
            blocks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` means a void-returning function.
    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    pub fn parameter_types(&self) -> &[Type] {
        &self.parameter_types
    }

    /// Argument value for parameter `pos`.
    pub fn arg(&self, pos: usize) -> ValueId {
        assert!(pos < self.parameter_types.len(), "argument out of range");
        ValueId(pos as u32)
    }

    /// Argument values in parameter order.
    pub fn args(&self) -> impl Iterator<Item = ValueId> + '_ {
        (0..self.parameter_types.len() as u32).map(ValueId)
    }

    /// Number of virtual values created so far (arguments included).
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn value_type(&self, id: ValueId) -> Option<&Type> {
        self.values.get(id.0 as usize)
    }

    /// Type of an operand, resolving value handles through this function.
    pub fn operand_type(&self, op: &Operand) -> Result<Type, IrError> {
        match op {
            Operand::Value(id) => self
                .value_type(*id)
                .cloned()
                .ok_or(IrError::UnknownValue(*id)),
            Operand::Const(c) => Ok(c.ty()),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    /// The entry block, when one exists.
    pub fn entry_block(&self) -> Option<BlockId> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(BlockId(0))
        }
    }

    /// Append a new, empty block.
    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block::default());
        id
    }

    fn check_block(&self, block: BlockId) -> Result<(), IrError> {
        if (block.0 as usize) < self.blocks.len() {
            Ok(())
        } else {
            Err(IrError::UnknownBlock(block))
        }
    }

    fn new_value(&mut self, ty: Type) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ty);
        id
    }

    fn push(&mut self, block: BlockId, instruction: Instruction) {
        self.blocks[block.0 as usize].instructions.push(instruction);
    }

    /// Require a virtual-value operand of pointer type; returns the pointee.
    fn check_pointer(&self, pointer: &Operand) -> Result<Type, IrError> {
        if pointer.is_const() {
            return Err(IrError::ConstantOperand);
        }
        let ty = self.operand_type(pointer)?;
        match ty.pointee() {
            Some(pointee) => Ok(pointee.clone()),
            None => Err(IrError::NotAPointer { found: ty }),
        }
    }

    fn check_operand(&self, op: &Operand, expected: &Type) -> Result<(), IrError> {
        let found = self.operand_type(op)?;
        if &found != expected {
            return Err(IrError::TypeMismatch {
                expected: expected.clone(),
                found,
            });
        }
        Ok(())
    }

    /// Reserve storage for `count` elements of `ty`; the result value has
    /// type `ty*`.
    pub fn alloc(&mut self, block: BlockId, ty: Type, count: u32) -> Result<ValueId, IrError> {
        self.check_block(block)?;
        if count == 0 {
            return Err(IrError::ZeroCount);
        }
        let result = self.new_value(Type::pointer(ty.clone()));
        self.push(block, Instruction::Alloc { ty, count, result });
        Ok(result)
    }

    /// Write `value` through `pointer` at element `index`. The value type
    /// must equal the pointee.
    pub fn store(
        &mut self,
        block: BlockId,
        pointer: Operand,
        value: Operand,
        index: u32,
    ) -> Result<(), IrError> {
        self.check_block(block)?;
        let pointee = self.check_pointer(&pointer)?;
        self.check_operand(&value, &pointee)?;
        self.push(
            block,
            Instruction::Store {
                pointer,
                value,
                index,
            },
        );
        Ok(())
    }

    /// Read the element at `index` through `pointer`; the result type is the
    /// pointee.
    pub fn load(
        &mut self,
        block: BlockId,
        pointer: Operand,
        index: u32,
    ) -> Result<ValueId, IrError> {
        self.check_block(block)?;
        let pointee = self.check_pointer(&pointer)?;
        let result = self.new_value(pointee);
        self.push(
            block,
            Instruction::Load {
                pointer,
                index,
                result,
            },
        );
        Ok(result)
    }

    /// Two-operand operation on `ty`. Operand types must both equal `ty`,
    /// which is also the result type; bitwise operations require an integer
    /// type.
    pub fn binary(
        &mut self,
        block: BlockId,
        op: BinaryOp,
        ty: Type,
        lhs: Operand,
        rhs: Operand,
    ) -> Result<ValueId, IrError> {
        self.check_block(block)?;
        if op.is_bitwise() && !ty.is_integer() {
            return Err(IrError::NonIntegerOperand {
                op: op.mnemonic(),
                found: ty,
            });
        }
        self.check_operand(&lhs, &ty)?;
        self.check_operand(&rhs, &ty)?;
        let result = self.new_value(ty.clone());
        self.push(
            block,
            Instruction::Binary {
                op,
                ty,
                lhs,
                rhs,
                result,
            },
        );
        Ok(result)
    }

    /// Compare two operands of `ty`; the result is an `Int1`.
    pub fn cmp(
        &mut self,
        block: BlockId,
        op: CmpOp,
        ty: Type,
        lhs: Operand,
        rhs: Operand,
    ) -> Result<ValueId, IrError> {
        self.check_block(block)?;
        self.check_operand(&lhs, &ty)?;
        self.check_operand(&rhs, &ty)?;
        let result = self.new_value(Type::Int1);
        self.push(
            block,
            Instruction::Cmp {
                op,
                ty,
                lhs,
                rhs,
                result,
            },
        );
        Ok(result)
    }

    /// Unconditional jump. The target must be a block of this function.
    pub fn branch(&mut self, block: BlockId, target: BlockId) -> Result<(), IrError> {
        self.check_block(block)?;
        self.check_block(target)?;
        self.push(block, Instruction::Branch { target });
        Ok(())
    }

    /// Conditional jump on an `Int1` condition.
    pub fn branch_if(
        &mut self,
        block: BlockId,
        condition: Operand,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<(), IrError> {
        self.check_block(block)?;
        self.check_block(then_block)?;
        self.check_block(else_block)?;
        self.check_operand(&condition, &Type::Int1)?;
        self.push(
            block,
            Instruction::BranchIf {
                condition,
                then_block,
                else_block,
            },
        );
        Ok(())
    }

    /// Call `name` with `args`. A non-void `ret_ty` produces a result value.
    pub fn call(
        &mut self,
        block: BlockId,
        name: impl Into<String>,
        ret_ty: Option<Type>,
        args: Vec<Operand>,
    ) -> Result<Option<ValueId>, IrError> {
        self.check_block(block)?;
        for arg in &args {
            self.operand_type(arg)?;
        }
        let result = match &ret_ty {
            Some(ty) => Some(self.new_value(ty.clone())),
            None => None,
        };
        self.push(
            block,
            Instruction::Call {
                name: name.into(),
                ret_ty,
                args,
                result,
            },
        );
        Ok(result)
    }

    /// Return `value` of type `ty`.
    pub fn ret(&mut self, block: BlockId, ty: Type, value: Operand) -> Result<(), IrError> {
        self.check_block(block)?;
        self.check_operand(&value, &ty)?;
        self.push(block, Instruction::Return { ty, value });
        Ok(())
    }

    /// Return from a void function.
    pub fn ret_void(&mut self, block: BlockId) -> Result<(), IrError> {
        self.check_block(block)?;
        self.push(block, Instruction::ReturnVoid);
        Ok(())
    }
}

//! Binary writer for IR modules

use super::{CodecError, MAGIC, VERSION_MAJOR, VERSION_MINOR};
use crate::function::{Block, BlockId, Function};
use crate::instruction::{BinaryOp, Instruction};
use crate::module::Module;
use crate::types::Type;
use crate::value::{Constant, Operand, ValueId};
use hashbrown::HashMap;
use log::debug;
use std::io::Write;

fn write_u8<W: Write>(out: &mut W, value: u8) -> Result<(), CodecError> {
    out.write_all(&[value])?;
    Ok(())
}

fn write_u16<W: Write>(out: &mut W, value: u16) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_i16<W: Write>(out: &mut W, value: i16) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_u32<W: Write>(out: &mut W, value: u32) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_string<W: Write>(out: &mut W, value: &str) -> Result<(), CodecError> {
    let len = u16::try_from(value.len())
        .map_err(|_| CodecError::Unencodable(format!("string '{}' is too long", value)))?;
    write_u16(out, len)?;
    out.write_all(value.as_bytes())?;
    Ok(())
}

fn list_len(len: usize, what: &str) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| CodecError::Unencodable(format!("too many {}", what)))
}

fn write_type<W: Write>(out: &mut W, ty: &Type) -> Result<(), CodecError> {
    match ty {
        Type::Int1 => write_u8(out, 0x01),
        Type::Int8 => write_u8(out, 0x02),
        Type::Int16 => write_u8(out, 0x03),
        Type::Int32 => write_u8(out, 0x04),
        Type::Int64 => write_u8(out, 0x05),
        Type::Float32 => write_u8(out, 0x06),
        Type::Float64 => write_u8(out, 0x07),
        Type::Pointer(pointee) => {
            write_u8(out, 0xE0)?;
            write_type(out, pointee)
        }
        Type::Struct(_) => {
            // The struct table is reserved and empty in version 0.1.
            write_u8(out, 0xF0)?;
            write_i16(out, 0)
        }
    }
}

fn write_const<W: Write>(out: &mut W, constant: &Constant) -> Result<(), CodecError> {
    match constant {
        Constant::Int1(v) => write_u8(out, u8::from(*v)),
        Constant::Int8(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
        Constant::Int16(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
        Constant::Int32(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
        Constant::Int64(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
        Constant::Float32(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
        Constant::Float64(v) => {
            out.write_all(&v.to_le_bytes())?;
            Ok(())
        }
    }
}

/// Function-local wire ids, assigned in first-write order: arguments first,
/// then each produced result.
struct Mapping {
    values: HashMap<ValueId, u16>,
}

impl Mapping {
    fn new(function: &Function) -> Self {
        let mut values = HashMap::new();
        for (index, arg) in function.args().enumerate() {
            values.insert(arg, index as u16);
        }
        Self { values }
    }

    fn lookup(&self, id: ValueId) -> Result<u16, CodecError> {
        self.values.get(&id).copied().ok_or_else(|| {
            CodecError::Unencodable(format!("operand references undefined value {}", id))
        })
    }

    fn define(&mut self, id: ValueId) -> Result<u16, CodecError> {
        let next = list_len(self.values.len(), "values in one function")?;
        if self.values.insert(id, next).is_some() {
            return Err(CodecError::Unencodable(format!(
                "value {} is defined twice",
                id
            )));
        }
        Ok(next)
    }
}

fn write_value<W: Write>(out: &mut W, mapping: &Mapping, op: &Operand) -> Result<(), CodecError> {
    match op {
        Operand::Value(id) => write_u16(out, mapping.lookup(*id)?),
        Operand::Const(_) => Err(CodecError::Unencodable(
            "no opcode variant accepts a constant in this operand position".into(),
        )),
    }
}

fn write_result<W: Write>(
    out: &mut W,
    mapping: &mut Mapping,
    result: ValueId,
) -> Result<(), CodecError> {
    let id = mapping.define(result)?;
    write_u16(out, id)
}

fn write_block_ref<W: Write>(
    out: &mut W,
    function: &Function,
    target: BlockId,
) -> Result<(), CodecError> {
    if (target.0 as usize) >= function.blocks().len() {
        return Err(CodecError::Unencodable(format!(
            "branch to unknown block {}",
            target
        )));
    }
    write_u16(out, target.0 as u16)
}

/// Base opcode per binary family; `true` when the family has a
/// constant-lhs variant.
fn binary_opcode(op: BinaryOp) -> (u8, bool) {
    match op {
        BinaryOp::Add => (0x30, false),
        BinaryOp::Sub => (0x40, true),
        BinaryOp::Mul => (0x50, false),
        BinaryOp::Div => (0x60, true),
        BinaryOp::Rem => (0x70, true),
        BinaryOp::And => (0x90, true),
        BinaryOp::Or => (0xA0, true),
        BinaryOp::Xor => (0xB0, true),
    }
}

fn write_instruction<W: Write>(
    out: &mut W,
    function: &Function,
    mapping: &mut Mapping,
    instruction: &Instruction,
) -> Result<(), CodecError> {
    match instruction {
        Instruction::Alloc { ty, count, result } => {
            if *count == 1 {
                write_u8(out, 0x00)?;
                write_type(out, ty)?;
            } else {
                write_u8(out, 0x01)?;
                write_type(out, ty)?;
                write_u32(out, *count)?;
            }
            write_result(out, mapping, *result)
        }
        Instruction::Store {
            pointer,
            value,
            index,
        } => {
            let ty = function
                .operand_type(value)
                .map_err(|e| CodecError::Unencodable(e.to_string()))?;
            let code = match (value.is_const(), *index == 0) {
                (false, true) => 0x10,
                (true, true) => 0x11,
                (false, false) => 0x12,
                (true, false) => 0x13,
            };
            write_u8(out, code)?;
            write_type(out, &ty)?;
            write_value(out, mapping, pointer)?;
            match value {
                Operand::Value(_) => write_value(out, mapping, value)?,
                Operand::Const(c) => write_const(out, c)?,
            }
            if *index != 0 {
                write_u32(out, *index)?;
            }
            Ok(())
        }
        Instruction::Load {
            pointer,
            index,
            result,
        } => {
            let ty = function
                .value_type(*result)
                .cloned()
                .ok_or_else(|| CodecError::Unencodable("load result has no type".into()))?;
            write_u8(out, if *index == 0 { 0x20 } else { 0x21 })?;
            write_type(out, &ty)?;
            write_value(out, mapping, pointer)?;
            write_result(out, mapping, *result)?;
            if *index != 0 {
                write_u32(out, *index)?;
            }
            Ok(())
        }
        Instruction::Binary {
            op,
            ty,
            lhs,
            rhs,
            result,
        } => {
            let (base, has_const_lhs) = binary_opcode(*op);
            // Prefer all-values, then constant rhs, then constant lhs.
            match (lhs, rhs) {
                (Operand::Value(_), Operand::Value(_)) => {
                    write_u8(out, base)?;
                    write_type(out, ty)?;
                    write_value(out, mapping, lhs)?;
                    write_value(out, mapping, rhs)?;
                }
                (Operand::Value(_), Operand::Const(c)) => {
                    write_u8(out, base + 1)?;
                    write_type(out, ty)?;
                    write_value(out, mapping, lhs)?;
                    write_const(out, c)?;
                }
                (Operand::Const(c), Operand::Value(_)) if has_const_lhs => {
                    write_u8(out, base + 2)?;
                    write_type(out, ty)?;
                    write_const(out, c)?;
                    write_value(out, mapping, rhs)?;
                }
                _ => {
                    return Err(CodecError::Unencodable(format!(
                        "no {} opcode matches the operand kinds",
                        op
                    )))
                }
            }
            write_result(out, mapping, *result)
        }
        Instruction::Cmp {
            op,
            ty,
            lhs,
            rhs,
            result,
        } => {
            match rhs {
                Operand::Value(_) => {
                    write_u8(out, 0x80)?;
                    write_u8(out, *op as u8)?;
                    write_type(out, ty)?;
                    write_value(out, mapping, lhs)?;
                    write_value(out, mapping, rhs)?;
                }
                Operand::Const(c) => {
                    write_u8(out, 0x81)?;
                    write_u8(out, *op as u8)?;
                    write_type(out, ty)?;
                    write_value(out, mapping, lhs)?;
                    write_const(out, c)?;
                }
            }
            write_result(out, mapping, *result)
        }
        Instruction::Branch { target } => {
            write_u8(out, 0xC0)?;
            write_block_ref(out, function, *target)
        }
        Instruction::BranchIf {
            condition,
            then_block,
            else_block,
        } => {
            write_u8(out, 0xC1)?;
            write_value(out, mapping, condition)?;
            write_block_ref(out, function, *then_block)?;
            write_block_ref(out, function, *else_block)
        }
        Instruction::Call {
            name,
            ret_ty,
            args,
            result,
        } => {
            if let Some(ty) = ret_ty {
                write_u8(out, 0xD1)?;
                write_type(out, ty)?;
            } else {
                write_u8(out, 0xD0)?;
            }

            write_u16(out, list_len(args.len(), "call arguments")?)?;
            for arg in args {
                let ty = function
                    .operand_type(arg)
                    .map_err(|e| CodecError::Unencodable(e.to_string()))?;
                write_type(out, &ty)?;
            }

            write_string(out, name)?;

            write_u16(out, list_len(args.len(), "call arguments")?)?;
            for arg in args {
                match arg {
                    Operand::Value(_) => {
                        write_u8(out, 0x00)?;
                        write_value(out, mapping, arg)?;
                    }
                    Operand::Const(c) => {
                        write_u8(out, 0x01)?;
                        write_const(out, c)?;
                    }
                }
            }

            if let Some(result) = result {
                write_result(out, mapping, *result)?;
            }
            Ok(())
        }
        Instruction::Return { ty, value } => {
            write_u8(out, 0xE1)?;
            write_type(out, ty)?;
            write_value(out, mapping, value)
        }
        Instruction::ReturnVoid => write_u8(out, 0xE0),
    }
}

fn write_block<W: Write>(
    out: &mut W,
    function: &Function,
    mapping: &mut Mapping,
    block: &Block,
) -> Result<(), CodecError> {
    write_u16(out, list_len(block.len(), "instructions in one block")?)?;
    for instruction in block.instructions() {
        write_instruction(out, function, mapping, instruction)?;
    }
    Ok(())
}

fn write_function<W: Write>(out: &mut W, function: &Function) -> Result<(), CodecError> {
    debug!(
        "writing function '{}' ({} blocks)",
        function.name(),
        function.blocks().len()
    );

    write_string(out, function.name())?;

    match function.return_type() {
        Some(ty) => write_type(out, ty)?,
        None => write_u8(out, 0x00)?,
    }

    write_u16(out, list_len(function.parameter_types().len(), "parameters")?)?;
    for ty in function.parameter_types() {
        write_type(out, ty)?;
    }

    let mut mapping = Mapping::new(function);
    write_u16(out, list_len(function.blocks().len(), "blocks in one function")?)?;
    for block in function.blocks() {
        write_block(out, function, &mut mapping, block)?;
    }

    Ok(())
}

/// Serialize a module to the binary wire format.
pub fn serialize<W: Write>(output: &mut W, module: &Module) -> Result<(), CodecError> {
    module
        .verify()
        .map_err(|e| CodecError::Unencodable(e.to_string()))?;

    output.write_all(&MAGIC)?;
    write_u8(output, VERSION_MAJOR)?;
    write_u8(output, VERSION_MINOR)?;

    // Struct table: reserved, always empty.
    write_u16(output, 0)?;

    write_u16(output, list_len(module.functions().len(), "functions")?)?;
    for function in module.functions() {
        write_function(output, function)?;
    }

    Ok(())
}

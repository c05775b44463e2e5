//! Textual module dump
//!
//! Format: functions as `@name = function ret(params) { ... }`, blocks as
//! `@L_n` labels, virtual values as `%n`, constants inline.

use shard_ir::{Block, BlockId, Function, Instruction, Module, Operand, Type};
use std::io::{self, Write};

fn type_name(ty: Option<&Type>) -> String {
    match ty {
        None => "void".to_string(),
        Some(ty) => ty.to_string(),
    }
}

fn operand_type_name(function: &Function, operand: &Operand) -> String {
    match function.operand_type(operand) {
        Ok(ty) => ty.to_string(),
        Err(_) => "?".to_string(),
    }
}

fn dump_instruction<W: Write>(
    out: &mut W,
    function: &Function,
    instruction: &Instruction,
) -> io::Result<()> {
    write!(out, "    ")?;

    match instruction {
        Instruction::Alloc { ty, count, result } => {
            write!(out, "{} = alloc {}", result, ty)?;
            if *count != 1 {
                write!(out, ", {}", count)?;
            }
        }
        Instruction::Store {
            pointer,
            value,
            index,
        } => {
            write!(
                out,
                "store {} {}, {}",
                operand_type_name(function, value),
                pointer,
                value
            )?;
            if *index != 0 {
                write!(out, ", {}", index)?;
            }
        }
        Instruction::Load {
            pointer,
            index,
            result,
        } => {
            write!(
                out,
                "{} = load {} {}",
                result,
                type_name(function.value_type(*result)),
                pointer
            )?;
            if *index != 0 {
                write!(out, ", {}", index)?;
            }
        }
        Instruction::Binary {
            op,
            ty,
            lhs,
            rhs,
            result,
        } => {
            write!(out, "{} = {} {} {}, {}", result, op, ty, lhs, rhs)?;
        }
        Instruction::Cmp {
            op,
            ty,
            lhs,
            rhs,
            result,
        } => {
            write!(out, "{} = cmp {} {} {}, {}", result, op, ty, lhs, rhs)?;
        }
        Instruction::Branch { target } => {
            write!(out, "branch @L_{}", target)?;
        }
        Instruction::BranchIf {
            condition,
            then_block,
            else_block,
        } => {
            write!(
                out,
                "branch {}, @L_{}, @L_{}",
                condition, then_block, else_block
            )?;
        }
        Instruction::Call {
            name,
            ret_ty,
            args,
            result,
        } => {
            if let Some(result) = result {
                write!(out, "{} = call {}(", result, type_name(ret_ty.as_ref()))?;
            } else {
                write!(out, "call void(")?;
            }
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}", operand_type_name(function, arg))?;
            }
            write!(out, ") @{} (", name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}", arg)?;
            }
            write!(out, ")")?;
        }
        Instruction::Return { ty, value } => {
            write!(out, "return {} {}", ty, value)?;
        }
        Instruction::ReturnVoid => {
            write!(out, "return void")?;
        }
    }

    writeln!(out)
}

fn dump_block<W: Write>(
    out: &mut W,
    function: &Function,
    id: BlockId,
    block: &Block,
) -> io::Result<()> {
    writeln!(out, "  @L_{}:", id)?;
    for instruction in block.instructions() {
        dump_instruction(out, function, instruction)?;
    }
    Ok(())
}

fn dump_function<W: Write>(out: &mut W, function: &Function) -> io::Result<()> {
    write!(
        out,
        "@{} = function {}(",
        function.name(),
        type_name(function.return_type())
    )?;
    for (i, ty) in function.parameter_types().iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", ty)?;
    }
    write!(out, ") {{")?;

    for (index, block) in function.blocks().iter().enumerate() {
        writeln!(out)?;
        dump_block(out, function, BlockId(index as u32), block)?;
    }

    writeln!(out, "}}")?;
    writeln!(out)
}

/// Dump every function of a module in textual form.
pub fn dump_module<W: Write>(out: &mut W, module: &Module) -> io::Result<()> {
    for function in module.functions() {
        dump_function(out, function)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::example_module;
    use pretty_assertions::assert_eq;
    use shard_ir::{BinaryOp, CmpOp, Constant, Module};

    fn dump_to_string(module: &Module) -> String {
        let mut out = Vec::new();
        dump_module(&mut out, module).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_function_dump() {
        let mut module = Module::new();
        let add = module.create_function("add", Some(Type::Int32), vec![Type::Int32, Type::Int32]);
        let block = add.create_block();
        let sum = add
            .binary(
                block,
                BinaryOp::Add,
                Type::Int32,
                Operand::Value(add.arg(0)),
                Operand::Value(add.arg(1)),
            )
            .unwrap();
        add.ret(block, Type::Int32, Operand::Value(sum)).unwrap();

        assert_eq!(
            dump_to_string(&module),
            "@add = function int32(int32, int32) {\n  \
             @L_0:\n    \
             %2 = add int32 %0, %1\n    \
             return int32 %2\n\
             }\n\n"
        );
    }

    #[test]
    fn control_flow_dump() {
        let mut module = Module::new();
        let f = module.create_function("positive", Some(Type::Int1), vec![Type::Int32]);
        let entry = f.create_block();
        let done = f.create_block();
        let is_pos = f
            .cmp(
                entry,
                CmpOp::GreaterThan,
                Type::Int32,
                Operand::Value(f.arg(0)),
                Operand::Const(Constant::Int32(0)),
            )
            .unwrap();
        f.branch(entry, done).unwrap();
        f.ret(done, Type::Int1, Operand::Value(is_pos)).unwrap();

        let text = dump_to_string(&module);
        assert!(text.contains("%1 = cmp gt int32 %0, 0"));
        assert!(text.contains("branch @L_1"));
        assert!(text.contains("  @L_1:\n    return int1 %1"));
    }

    #[test]
    fn example_module_dump_covers_every_shape() {
        let text = dump_to_string(&example_module());

        assert!(text.contains("@add = function int32(int32, int32) {"));
        assert!(text.contains("@main = function void() {"));
        assert!(text.contains("%0 = alloc int32"));
        assert!(text.contains("store int32 %0, 1"));
        assert!(text.contains("= call int32(int32, int32) @add ("));
        assert!(text.contains("= call int8*(int32) @toString ("));
        assert!(text.contains("call void(int8*) @print ("));
        assert!(text.contains("return void"));
    }
}

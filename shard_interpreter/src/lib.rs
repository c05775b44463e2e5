//! IR interpreter for the Shard language
//!
//! Executes a loaded [`Module`] by simulating a stack of frames binding IR
//! values to runtime [`Value`]s. Execution is sequential; each call gets a
//! fresh frame with its own allocation arena, released when the call
//! returns or unwinds on error.

pub mod error;
pub mod frame;
pub mod value;

pub use error::RuntimeError;
pub use frame::Frame;
pub use value::{Pointer, Value};

use hashbrown::HashMap;
use log::debug;
use shard_ir::{BinaryOp, CmpOp, Function, Instruction, Module, Operand};
use smallvec::SmallVec;

/// A host function callable by name when the module has no matching
/// function.
pub type ExtrinsicFn = Box<dyn Fn(&[Value]) -> Result<Option<Value>, RuntimeError>>;

macro_rules! int_arith {
    ($op:expr, $l:expr, $r:expr, $variant:ident) => {
        match $op {
            BinaryOp::Add => Ok(Value::$variant($l.wrapping_add($r))),
            BinaryOp::Sub => Ok(Value::$variant($l.wrapping_sub($r))),
            BinaryOp::Mul => Ok(Value::$variant($l.wrapping_mul($r))),
            BinaryOp::Div => {
                if $r == 0 {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    // Truncating division; MIN / -1 wraps.
                    Ok(Value::$variant($l.wrapping_div($r)))
                }
            }
            BinaryOp::Rem => {
                if $r == 0 {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(Value::$variant($l.wrapping_rem($r)))
                }
            }
            BinaryOp::And => Ok(Value::$variant($l & $r)),
            BinaryOp::Or => Ok(Value::$variant($l | $r)),
            BinaryOp::Xor => Ok(Value::$variant($l ^ $r)),
        }
    };
}

macro_rules! float_arith {
    ($op:expr, $l:expr, $r:expr, $variant:ident) => {
        match $op {
            BinaryOp::Add => Ok(Value::$variant($l + $r)),
            BinaryOp::Sub => Ok(Value::$variant($l - $r)),
            BinaryOp::Mul => Ok(Value::$variant($l * $r)),
            BinaryOp::Div => {
                if $r == 0.0 {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(Value::$variant($l / $r))
                }
            }
            BinaryOp::Rem => {
                if $r == 0.0 {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(Value::$variant($l % $r))
                }
            }
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => Err(RuntimeError::TypeMismatch(
                "bitwise operation on a float type".into(),
            )),
        }
    };
}

fn binary_value(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int1(l), Value::Int1(r)) => match op {
            BinaryOp::And => Ok(Value::Int1(l & r)),
            BinaryOp::Or => Ok(Value::Int1(l | r)),
            BinaryOp::Xor => Ok(Value::Int1(l ^ r)),
            _ => Err(RuntimeError::TypeMismatch(
                "arithmetic on an int1 operand".into(),
            )),
        },
        (Value::Int8(l), Value::Int8(r)) => int_arith!(op, l, r, Int8),
        (Value::Int16(l), Value::Int16(r)) => int_arith!(op, l, r, Int16),
        (Value::Int32(l), Value::Int32(r)) => int_arith!(op, l, r, Int32),
        (Value::Int64(l), Value::Int64(r)) => int_arith!(op, l, r, Int64),
        (Value::Float32(l), Value::Float32(r)) => float_arith!(op, l, r, Float32),
        (Value::Float64(l), Value::Float64(r)) => float_arith!(op, l, r, Float64),
        (l, r) => Err(RuntimeError::TypeMismatch(format!(
            "{} on mismatched operands {} and {}",
            op, l, r
        ))),
    }
}

macro_rules! do_cmp {
    ($op:expr, $l:expr, $r:expr) => {
        match $op {
            CmpOp::Equal => $l == $r,
            CmpOp::NotEqual => $l != $r,
            CmpOp::GreaterThan => $l > $r,
            CmpOp::GreaterEqual => $l >= $r,
            CmpOp::LessThan => $l < $r,
            CmpOp::LessEqual => $l <= $r,
        }
    };
}

fn cmp_value(op: CmpOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    let result = match (lhs, rhs) {
        (Value::Int1(l), Value::Int1(r)) => do_cmp!(op, l, r),
        (Value::Int8(l), Value::Int8(r)) => do_cmp!(op, l, r),
        (Value::Int16(l), Value::Int16(r)) => do_cmp!(op, l, r),
        (Value::Int32(l), Value::Int32(r)) => do_cmp!(op, l, r),
        (Value::Int64(l), Value::Int64(r)) => do_cmp!(op, l, r),
        (Value::Float32(l), Value::Float32(r)) => do_cmp!(op, l, r),
        (Value::Float64(l), Value::Float64(r)) => do_cmp!(op, l, r),
        (l, r) => {
            return Err(RuntimeError::TypeMismatch(format!(
                "cmp on mismatched operands {} and {}",
                l, r
            )))
        }
    };
    Ok(Value::Int1(result))
}

fn operand_value(frame: &Frame, operand: &Operand) -> Result<Value, RuntimeError> {
    match operand {
        Operand::Const(c) => Ok(Value::from_constant(*c)),
        Operand::Value(id) => frame.get(*id),
    }
}

fn expect_pointer(value: Value) -> Result<Pointer, RuntimeError> {
    match value {
        Value::Pointer(p) => Ok(p),
        other => Err(RuntimeError::TypeMismatch(format!(
            "expected a pointer, found {}",
            other
        ))),
    }
}

/// A tree-walking evaluator over one loaded module.
#[derive(Default)]
pub struct Interpreter {
    module: Option<Module>,
    /// Function indices per name, in module order.
    symbols: HashMap<String, Vec<usize>>,
    extrinsics: HashMap<String, ExtrinsicFn>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, building the symbol table. Replaces any module
    /// loaded before.
    pub fn load(&mut self, module: Module) {
        let mut symbols: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, function) in module.functions().iter().enumerate() {
            symbols
                .entry(function.name().to_string())
                .or_default()
                .push(index);
        }
        debug!(
            "loaded module: {} functions, {} names",
            module.functions().len(),
            symbols.len()
        );
        self.symbols = symbols;
        self.module = Some(module);
    }

    /// Register a host function consulted when the module has no matching
    /// function of that name.
    pub fn register_extrinsic(&mut self, name: impl Into<String>, f: ExtrinsicFn) {
        self.extrinsics.insert(name.into(), f);
    }

    /// Resolve a function against the loaded module: exact parameter types
    /// first, then the first candidate with a matching arity.
    fn resolve(&self, name: &str, args: &[Value]) -> Option<&Function> {
        let module = self.module.as_ref()?;
        let candidates = self.symbols.get(name)?;

        let exact = candidates.iter().find(|&&index| {
            let params = module.functions()[index].parameter_types();
            params.len() == args.len()
                && args.iter().zip(params).all(|(value, ty)| value.matches(ty))
        });
        let chosen = exact.or_else(|| {
            candidates
                .iter()
                .find(|&&index| module.functions()[index].parameter_types().len() == args.len())
        })?;

        Some(&module.functions()[*chosen])
    }

    /// Call a function by name. Returns the callee's result, `None` for
    /// void.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        match self.resolve(name, args) {
            Some(function) => self.execute(function, args),
            None => match self.extrinsics.get(name) {
                Some(f) => f(args),
                None => Err(RuntimeError::UnresolvedCall(name.to_string())),
            },
        }
    }

    fn execute(&self, function: &Function, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        if args.len() != function.parameter_types().len() {
            return Err(RuntimeError::TypeMismatch(format!(
                "'{}' expects {} arguments, got {}",
                function.name(),
                function.parameter_types().len(),
                args.len()
            )));
        }

        let mut frame = Frame::new(function.value_count());
        for (pos, (value, ty)) in args.iter().zip(function.parameter_types()).enumerate() {
            if !value.matches(ty) {
                return Err(RuntimeError::TypeMismatch(format!(
                    "argument {} of '{}' expects {}, got {}",
                    pos,
                    function.name(),
                    ty,
                    value
                )));
            }
            frame.bind(function.arg(pos), *value)?;
        }

        let mut block_id = function
            .entry_block()
            .ok_or_else(|| RuntimeError::NoEntryBlock(function.name().to_string()))?;

        'blocks: loop {
            let block = function
                .block(block_id)
                .ok_or(RuntimeError::MissingTerminator)?;

            for instruction in block.instructions() {
                match instruction {
                    Instruction::Alloc { count, result, .. } => {
                        let pointer = frame.alloc(*count);
                        frame.bind(*result, Value::Pointer(pointer))?;
                    }
                    Instruction::Store {
                        pointer,
                        value,
                        index,
                    } => {
                        let pointer = expect_pointer(operand_value(&frame, pointer)?)?;
                        let value = operand_value(&frame, value)?;
                        frame.store(pointer, *index, value)?;
                    }
                    Instruction::Load {
                        pointer,
                        index,
                        result,
                    } => {
                        let pointer = expect_pointer(operand_value(&frame, pointer)?)?;
                        let value = frame.load(pointer, *index)?;
                        frame.bind(*result, value)?;
                    }
                    Instruction::Binary {
                        op,
                        lhs,
                        rhs,
                        result,
                        ..
                    } => {
                        let lhs = operand_value(&frame, lhs)?;
                        let rhs = operand_value(&frame, rhs)?;
                        frame.bind(*result, binary_value(*op, lhs, rhs)?)?;
                    }
                    Instruction::Cmp {
                        op,
                        lhs,
                        rhs,
                        result,
                        ..
                    } => {
                        let lhs = operand_value(&frame, lhs)?;
                        let rhs = operand_value(&frame, rhs)?;
                        frame.bind(*result, cmp_value(*op, lhs, rhs)?)?;
                    }
                    Instruction::Branch { target } => {
                        block_id = *target;
                        continue 'blocks;
                    }
                    Instruction::BranchIf {
                        condition,
                        then_block,
                        else_block,
                    } => {
                        let condition = operand_value(&frame, condition)?
                            .as_bool()
                            .ok_or_else(|| {
                                RuntimeError::TypeMismatch(
                                    "branch condition must be an int1".into(),
                                )
                            })?;
                        block_id = if condition { *then_block } else { *else_block };
                        continue 'blocks;
                    }
                    Instruction::Call {
                        name,
                        args: call_args,
                        result,
                        ..
                    } => {
                        let mut values: SmallVec<[Value; 8]> = SmallVec::new();
                        for arg in call_args {
                            values.push(operand_value(&frame, arg)?);
                        }
                        let returned = self.call(name, &values)?;
                        if let Some(result) = result {
                            let value = returned.ok_or_else(|| {
                                RuntimeError::TypeMismatch(format!(
                                    "call to '{}' produced no value",
                                    name
                                ))
                            })?;
                            frame.bind(*result, value)?;
                        }
                    }
                    Instruction::Return { value, .. } => {
                        return Ok(Some(operand_value(&frame, value)?));
                    }
                    Instruction::ReturnVoid => return Ok(None),
                }
            }

            return Err(RuntimeError::MissingTerminator);
        }
    }
}

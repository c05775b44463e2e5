//! Binary reader for IR modules

use super::{CodecError, MAGIC, VERSION_MAJOR, VERSION_MINOR};
use crate::function::{BlockId, Function};
use crate::instruction::{BinaryOp, CmpOp};
use crate::module::Module;
use crate::types::Type;
use crate::value::{Constant, Operand, ValueId};
use hashbrown::HashMap;
use log::debug;
use std::io::Read;

/// A byte reader that tracks its offset for error reporting.
struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    fn malformed(&self, message: impl Into<String>) -> CodecError {
        CodecError::Malformed {
            offset: self.offset,
            message: message.into(),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(CodecError::Truncated { offset: self.offset })
            }
            Err(e) => Err(CodecError::Io(e)),
        }
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn i8(&mut self) -> Result<i8, CodecError> {
        Ok(self.u8()? as i8)
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn i16(&mut self) -> Result<i16, CodecError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn i32(&mut self) -> Result<i32, CodecError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn i64(&mut self) -> Result<i64, CodecError> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    fn f32(&mut self) -> Result<f32, CodecError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn f64(&mut self) -> Result<f64, CodecError> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    fn string(&mut self) -> Result<String, CodecError> {
        let len = self.u16()? as usize;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|_| self.malformed("string is not valid UTF-8"))
    }
}

/// Wire id to handle translation built while reading one function.
struct Mapping {
    values: HashMap<u16, ValueId>,
}

impl Mapping {
    fn new(function: &Function) -> Self {
        let mut values = HashMap::new();
        for (index, arg) in function.args().enumerate() {
            values.insert(index as u16, arg);
        }
        Self { values }
    }

    fn lookup<R: Read>(&self, r: &ByteReader<R>, wire: u16) -> Result<ValueId, CodecError> {
        self.values
            .get(&wire)
            .copied()
            .ok_or_else(|| r.malformed(format!("unresolved value id {}", wire)))
    }

    fn define<R: Read>(
        &mut self,
        r: &ByteReader<R>,
        wire: u16,
        id: ValueId,
    ) -> Result<(), CodecError> {
        if self.values.insert(wire, id).is_some() {
            return Err(r.malformed(format!("value id {} is defined twice", wire)));
        }
        Ok(())
    }
}

/// Read a type encoding; `None` is the `0x00` void marker.
fn read_type<R: Read>(r: &mut ByteReader<R>) -> Result<Option<Type>, CodecError> {
    let code = r.u8()?;
    match code {
        0x00 => Ok(None),
        0x01 => Ok(Some(Type::Int1)),
        0x02 => Ok(Some(Type::Int8)),
        0x03 => Ok(Some(Type::Int16)),
        0x04 => Ok(Some(Type::Int32)),
        0x05 => Ok(Some(Type::Int64)),
        0x06 => Ok(Some(Type::Float32)),
        0x07 => Ok(Some(Type::Float64)),
        0xE0 => {
            let pointee = required_type(r)?;
            Ok(Some(Type::pointer(pointee)))
        }
        0xF0 => {
            let _index = r.i16()?;
            // The struct table is always empty in version 0.1.
            Err(r.malformed("struct types are reserved in this format version"))
        }
        _ => Err(r.malformed(format!("unknown type tag 0x{:02X}", code))),
    }
}

fn required_type<R: Read>(r: &mut ByteReader<R>) -> Result<Type, CodecError> {
    read_type(r)?.ok_or_else(|| r.malformed("void is not allowed here"))
}

fn read_const<R: Read>(r: &mut ByteReader<R>, ty: &Type) -> Result<Constant, CodecError> {
    match ty {
        Type::Int1 => Ok(Constant::Int1(r.u8()? != 0)),
        Type::Int8 => Ok(Constant::Int8(r.i8()?)),
        Type::Int16 => Ok(Constant::Int16(r.i16()?)),
        Type::Int32 => Ok(Constant::Int32(r.i32()?)),
        Type::Int64 => Ok(Constant::Int64(r.i64()?)),
        Type::Float32 => Ok(Constant::Float32(r.f32()?)),
        Type::Float64 => Ok(Constant::Float64(r.f64()?)),
        _ => Err(r.malformed(format!("type {} has no constant encoding", ty))),
    }
}

fn read_value<R: Read>(r: &mut ByteReader<R>, mapping: &Mapping) -> Result<Operand, CodecError> {
    let wire = r.u16()?;
    Ok(Operand::Value(mapping.lookup(r, wire)?))
}

fn read_block_ref<R: Read>(r: &mut ByteReader<R>, block_count: usize) -> Result<BlockId, CodecError> {
    let wire = r.u16()?;
    if (wire as usize) >= block_count {
        return Err(r.malformed(format!("unresolved block id {}", wire)));
    }
    Ok(BlockId(wire as u32))
}

fn binary_op(code: u8) -> Option<(BinaryOp, u8)> {
    let op = match code & 0xF0 {
        0x30 => BinaryOp::Add,
        0x40 => BinaryOp::Sub,
        0x50 => BinaryOp::Mul,
        0x60 => BinaryOp::Div,
        0x70 => BinaryOp::Rem,
        0x90 => BinaryOp::And,
        0xA0 => BinaryOp::Or,
        0xB0 => BinaryOp::Xor,
        _ => return None,
    };
    Some((op, code & 0x0F))
}

fn read_instruction<R: Read>(
    r: &mut ByteReader<R>,
    function: &mut Function,
    mapping: &mut Mapping,
    block: BlockId,
) -> Result<(), CodecError> {
    let code = r.u8()?;

    // Binary families share one decoding path.
    if let Some((op, variant)) = binary_op(code) {
        let has_const_lhs = !matches!(op, BinaryOp::Add | BinaryOp::Mul);
        let ty = required_type(r)?;
        let (lhs, rhs) = match variant {
            0x00 => (read_value(r, mapping)?, read_value(r, mapping)?),
            0x01 => {
                let lhs = read_value(r, mapping)?;
                let rhs = Operand::Const(read_const(r, &ty)?);
                (lhs, rhs)
            }
            0x02 if has_const_lhs => {
                let lhs = Operand::Const(read_const(r, &ty)?);
                let rhs = read_value(r, mapping)?;
                (lhs, rhs)
            }
            _ => return Err(r.malformed(format!("unknown opcode 0x{:02X}", code))),
        };
        let wire = r.u16()?;
        let result = function
            .binary(block, op, ty, lhs, rhs)
            .map_err(|e| r.malformed(e.to_string()))?;
        return mapping.define(r, wire, result);
    }

    match code {
        // alloc
        0x00 | 0x01 => {
            let ty = required_type(r)?;
            let count = if code == 0x01 { r.u32()? } else { 1 };
            let wire = r.u16()?;
            let result = function
                .alloc(block, ty, count)
                .map_err(|e| r.malformed(e.to_string()))?;
            mapping.define(r, wire, result)
        }
        // store
        0x10 | 0x11 | 0x12 | 0x13 => {
            let ty = required_type(r)?;
            let pointer = read_value(r, mapping)?;
            let value = if code == 0x11 || code == 0x13 {
                Operand::Const(read_const(r, &ty)?)
            } else {
                read_value(r, mapping)?
            };
            let index = if code == 0x12 || code == 0x13 { r.u32()? } else { 0 };
            function
                .store(block, pointer, value, index)
                .map_err(|e| r.malformed(e.to_string()))
        }
        // load
        0x20 | 0x21 => {
            let ty = required_type(r)?;
            let pointer = read_value(r, mapping)?;
            let wire = r.u16()?;
            let index = if code == 0x21 { r.u32()? } else { 0 };
            let result = function
                .load(block, pointer, index)
                .map_err(|e| r.malformed(e.to_string()))?;
            if function.value_type(result) != Some(&ty) {
                return Err(r.malformed("load type does not match the pointee"));
            }
            mapping.define(r, wire, result)
        }
        // cmp
        0x80 | 0x81 => {
            let op_code = r.u8()?;
            let op = CmpOp::from_u8(op_code)
                .ok_or_else(|| r.malformed(format!("unknown cmp operation {}", op_code)))?;
            let ty = required_type(r)?;
            let lhs = read_value(r, mapping)?;
            let rhs = if code == 0x81 {
                Operand::Const(read_const(r, &ty)?)
            } else {
                read_value(r, mapping)?
            };
            let wire = r.u16()?;
            let result = function
                .cmp(block, op, ty, lhs, rhs)
                .map_err(|e| r.malformed(e.to_string()))?;
            mapping.define(r, wire, result)
        }
        // branch
        0xC0 => {
            let target = read_block_ref(r, function.blocks().len())?;
            function
                .branch(block, target)
                .map_err(|e| r.malformed(e.to_string()))
        }
        // conditional branch
        0xC1 => {
            let condition = read_value(r, mapping)?;
            let then_block = read_block_ref(r, function.blocks().len())?;
            let else_block = read_block_ref(r, function.blocks().len())?;
            function
                .branch_if(block, condition, then_block, else_block)
                .map_err(|e| r.malformed(e.to_string()))
        }
        // call
        0xD0 | 0xD1 => {
            let ret_ty = if code == 0xD1 {
                Some(required_type(r)?)
            } else {
                None
            };

            let type_count = r.u16()? as usize;
            let mut arg_types = Vec::with_capacity(type_count);
            for _ in 0..type_count {
                arg_types.push(required_type(r)?);
            }

            let name = r.string()?;

            let arg_count = r.u16()? as usize;
            if arg_count != type_count {
                return Err(r.malformed("call argument count does not match its type list"));
            }
            let mut args = Vec::with_capacity(arg_count);
            for ty in &arg_types {
                match r.u8()? {
                    0x00 => args.push(read_value(r, mapping)?),
                    0x01 => args.push(Operand::Const(read_const(r, ty)?)),
                    tag => return Err(r.malformed(format!("unknown argument tag 0x{:02X}", tag))),
                }
            }

            let wire = if ret_ty.is_some() { Some(r.u16()?) } else { None };
            let result = function
                .call(block, name, ret_ty, args)
                .map_err(|e| r.malformed(e.to_string()))?;
            if let (Some(wire), Some(result)) = (wire, result) {
                mapping.define(r, wire, result)?;
            }
            Ok(())
        }
        // return
        0xE1 => {
            let ty = required_type(r)?;
            let value = read_value(r, mapping)?;
            function
                .ret(block, ty, value)
                .map_err(|e| r.malformed(e.to_string()))
        }
        0xE0 => function
            .ret_void(block)
            .map_err(|e| r.malformed(e.to_string())),
        _ => Err(r.malformed(format!("unknown opcode 0x{:02X}", code))),
    }
}

fn read_function<R: Read>(r: &mut ByteReader<R>) -> Result<Function, CodecError> {
    let name = r.string()?;
    let return_type = read_type(r)?;

    let param_count = r.u16()? as usize;
    let mut parameter_types = Vec::with_capacity(param_count);
    for _ in 0..param_count {
        parameter_types.push(required_type(r)?);
    }

    debug!("reading function '{}' ({} parameters)", name, param_count);

    let mut function = Function::new(name, return_type, parameter_types);
    let mut mapping = Mapping::new(&function);

    // All blocks are created up front so forward branches resolve.
    let block_count = r.u16()? as usize;
    for _ in 0..block_count {
        function.create_block();
    }

    for index in 0..block_count {
        let block = BlockId(index as u32);
        let instruction_count = r.u16()? as usize;
        for _ in 0..instruction_count {
            read_instruction(r, &mut function, &mut mapping, block)?;
        }
    }

    Ok(function)
}

/// Deserialize a module from the binary wire format.
pub fn deserialize<R: Read>(input: &mut R) -> Result<Module, CodecError> {
    let mut r = ByteReader::new(input);

    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(CodecError::InvalidFormat);
    }

    let major = r.u8()?;
    let minor = r.u8()?;
    if major != VERSION_MAJOR || minor != VERSION_MINOR {
        return Err(CodecError::UnsupportedVersion { major, minor });
    }

    let struct_count = r.u16()?;
    if struct_count != 0 {
        return Err(r.malformed("struct table must be empty in this format version"));
    }

    let mut module = Module::new();
    let function_count = r.u16()? as usize;
    for _ in 0..function_count {
        let function = read_function(&mut r)?;
        module.add_function(function);
    }

    module.verify().map_err(|e| r.malformed(e.to_string()))?;

    Ok(module)
}

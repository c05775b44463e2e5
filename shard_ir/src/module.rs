//! The IR module container

use crate::error::IrError;
use crate::function::Function;
use crate::instruction::Instruction;
use crate::types::Type;
use crate::value::{Constant, Operand};
use serde::{Deserialize, Serialize};

/// The top-level IR container owning types, a constant pool and functions.
///
/// A module is built incrementally through the `create_*` factories and then
/// treated as immutable during serialization and interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    types: Vec<Type>,
    constants: Vec<Constant>,
    functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complex types registered with this module.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Register a pointer type owned by this module.
    pub fn create_pointer_type(&mut self, pointee: Type) -> Type {
        let ty = Type::pointer(pointee);
        self.types.push(ty.clone());
        ty
    }

    /// Register a struct type owned by this module.
    pub fn create_struct_type(&mut self, fields: Vec<Type>) -> Type {
        let ty = Type::Struct(fields);
        self.types.push(ty.clone());
        ty
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Add a constant to the pool. De-duplication is the caller's business.
    pub fn create_constant(&mut self, constant: Constant) -> Constant {
        self.constants.push(constant);
        constant
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut [Function] {
        &mut self.functions
    }

    /// Create a function and return a handle for building its body.
    pub fn create_function(
        &mut self,
        name: impl Into<String>,
        return_type: Option<Type>,
        parameter_types: Vec<Type>,
    ) -> &mut Function {
        self.add_function(Function::new(name, return_type, parameter_types))
    }

    /// Take ownership of an already built function.
    pub fn add_function(&mut self, function: Function) -> &mut Function {
        self.functions.push(function);
        self.functions.last_mut().expect("just pushed")
    }

    /// Find a function by name and exact parameter type list.
    pub fn find_function(&self, name: &str, parameter_types: &[Type]) -> Option<&Function> {
        self.functions
            .iter()
            .find(|f| f.name() == name && f.parameter_types() == parameter_types)
    }

    /// Functions sharing `name`, in module order.
    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Function> {
        self.functions.iter().filter(move |f| f.name() == name)
    }

    /// Check the cross-function invariants a single function builder cannot
    /// see: every `Call` whose name the module defines must match one of the
    /// callee signatures in argument count, argument types and return type.
    ///
    /// Names the module does not define are left to host extrinsics and are
    /// resolved at run time.
    pub fn verify(&self) -> Result<(), IrError> {
        for function in &self.functions {
            for block in function.blocks() {
                for instruction in block.instructions() {
                    if let Instruction::Call {
                        name,
                        ret_ty,
                        args,
                        ..
                    } = instruction
                    {
                        self.verify_call(function, name, ret_ty.as_ref(), args)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn verify_call(
        &self,
        caller: &Function,
        name: &str,
        ret_ty: Option<&Type>,
        args: &[Operand],
    ) -> Result<(), IrError> {
        if self.functions_named(name).next().is_none() {
            return Ok(());
        }

        let mut arg_types = Vec::with_capacity(args.len());
        for arg in args {
            arg_types.push(caller.operand_type(arg)?);
        }

        let matched = self
            .functions_named(name)
            .find(|callee| callee.parameter_types() == arg_types.as_slice());
        match matched {
            Some(callee) if callee.return_type() == ret_ty => Ok(()),
            _ => Err(IrError::CalleeSignatureMismatch {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_function_distinguishes_overloads() {
        let mut module = Module::new();
        module.create_function("add", Some(Type::Int32), vec![Type::Int32, Type::Int32]);
        module.create_function("add", Some(Type::Float32), vec![Type::Float32, Type::Float32]);

        let int_add = module
            .find_function("add", &[Type::Int32, Type::Int32])
            .unwrap();
        assert_eq!(int_add.return_type(), Some(&Type::Int32));

        let float_add = module
            .find_function("add", &[Type::Float32, Type::Float32])
            .unwrap();
        assert_eq!(float_add.return_type(), Some(&Type::Float32));

        assert!(module.find_function("add", &[Type::Int64, Type::Int64]).is_none());
        assert!(module.find_function("sub", &[]).is_none());
    }

    #[test]
    fn created_types_are_owned_by_the_module() {
        let mut module = Module::new();
        let ptr = module.create_pointer_type(Type::Int8);
        assert_eq!(ptr, Type::pointer(Type::Int8));
        assert_eq!(module.types(), &[Type::pointer(Type::Int8)]);
    }

    #[test]
    fn constant_pool_keeps_creation_order() {
        let mut module = Module::new();
        module.create_constant(Constant::Int32(1));
        module.create_constant(Constant::Int32(2));
        assert_eq!(
            module.constants(),
            &[Constant::Int32(1), Constant::Int32(2)]
        );
    }
}

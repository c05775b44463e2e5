//! IR type system

use serde::{Deserialize, Serialize};
use std::fmt;

/// An IR type. Primitive kinds are plain variants; pointer and struct types
/// nest their component types and are registered in the owning module when
/// created through its factories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int1,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Pointer(Box<Type>),
    Struct(Vec<Type>),
}

impl Type {
    pub fn pointer(pointee: Type) -> Type {
        Type::Pointer(Box::new(pointee))
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Pointer(_) | Type::Struct(_))
    }

    /// Integer types, `Int1` included.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Int1 | Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float32 | Type::Float64)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    /// The pointee for pointer types.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int1 => write!(f, "int1"),
            Type::Int8 => write!(f, "int8"),
            Type::Int16 => write!(f, "int16"),
            Type::Int32 => write!(f, "int32"),
            Type::Int64 => write!(f, "int64"),
            Type::Float32 => write!(f, "float32"),
            Type::Float64 => write!(f, "float64"),
            Type::Pointer(inner) => write!(f, "{}*", inner),
            Type::Struct(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_equality_is_by_kind() {
        assert_eq!(Type::Int32, Type::Int32);
        assert_ne!(Type::Int32, Type::Int64);
    }

    #[test]
    fn pointer_equality_is_structural() {
        assert_eq!(Type::pointer(Type::Int8), Type::pointer(Type::Int8));
        assert_ne!(Type::pointer(Type::Int8), Type::pointer(Type::Int16));
    }

    #[test]
    fn display_names() {
        assert_eq!(Type::Int1.to_string(), "int1");
        assert_eq!(Type::pointer(Type::Float64).to_string(), "float64*");
        assert_eq!(
            Type::Struct(vec![Type::Int32, Type::Int8]).to_string(),
            "{int32, int8}"
        );
    }

    #[test]
    fn pointee_access() {
        let ptr = Type::pointer(Type::Int32);
        assert_eq!(ptr.pointee(), Some(&Type::Int32));
        assert_eq!(Type::Int32.pointee(), None);
    }
}

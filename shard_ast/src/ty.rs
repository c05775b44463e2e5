//! AST type references

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a type as written in source code.
///
/// Two references compare equal iff both are the same built-in kind, or both
/// name the same user-defined type; the derived equality gives exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Void,
    Int,
    Float,
    Char,
    String,
    Var,
    Bool,
    Auto,
    Any,
    /// A user-defined type referenced by name.
    Typename(String),
}

impl TypeRef {
    pub fn is_builtin(&self) -> bool {
        !matches!(self, TypeRef::Typename(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Int => write!(f, "int"),
            TypeRef::Float => write!(f, "float"),
            TypeRef::Char => write!(f, "char"),
            TypeRef::String => write!(f, "string"),
            TypeRef::Var => write!(f, "var"),
            TypeRef::Bool => write!(f, "bool"),
            TypeRef::Auto => write!(f, "auto"),
            TypeRef::Any => write!(f, "any"),
            TypeRef::Typename(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_equality_is_by_kind() {
        assert_eq!(TypeRef::Int, TypeRef::Int);
        assert_ne!(TypeRef::Int, TypeRef::Float);
    }

    #[test]
    fn typename_equality_is_by_name() {
        assert_eq!(
            TypeRef::Typename("Point".into()),
            TypeRef::Typename("Point".into())
        );
        assert_ne!(
            TypeRef::Typename("Point".into()),
            TypeRef::Typename("Rect".into())
        );
        assert_ne!(TypeRef::Typename("int".into()), TypeRef::Int);
    }
}

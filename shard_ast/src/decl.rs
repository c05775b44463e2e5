//! Declaration nodes

use crate::expr::Expr;
use crate::stmt::CompoundStmt;
use crate::ty::TypeRef;
use serde::{Deserialize, Serialize};
use shard_common::{Range, ShardError, ShardResult};

/// A declaration node: a kind tag plus the source range it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    kind: DeclKind,
    range: Range,
}

impl Decl {
    pub fn new(kind: DeclKind, range: Range) -> Self {
        Self { kind, range }
    }

    pub fn kind(&self) -> &DeclKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut DeclKind {
        &mut self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    /// The declared name, common to every declaration kind.
    pub fn name(&self) -> &str {
        match &self.kind {
            DeclKind::Variable(v) => v.name(),
            DeclKind::Function(f) => f.name(),
            DeclKind::Class(c) => c.name(),
        }
    }

    pub fn variable(
        ty: TypeRef,
        name: impl Into<String>,
        init: Option<Expr>,
        range: Range,
    ) -> ShardResult<Self> {
        Ok(Self::new(
            DeclKind::Variable(VariableDecl::new(ty, name, init)?),
            range,
        ))
    }

    pub fn function(
        ret_type: TypeRef,
        name: impl Into<String>,
        params: Vec<VariableDecl>,
        body: CompoundStmt,
        range: Range,
    ) -> ShardResult<Self> {
        Ok(Self::new(
            DeclKind::Function(FunctionDecl::new(ret_type, name, params, body)?),
            range,
        ))
    }

    pub fn class(name: impl Into<String>, decls: Vec<Decl>, range: Range) -> ShardResult<Self> {
        Ok(Self::new(DeclKind::Class(ClassDecl::new(name, decls)?), range))
    }
}

/// Declaration kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    Variable(VariableDecl),
    Function(FunctionDecl),
    Class(ClassDecl),
}

fn checked_name(name: impl Into<String>, what: &str) -> ShardResult<String> {
    let name = name.into();
    if name.is_empty() {
        return Err(ShardError::construction_error(format!("{} name is empty", what)));
    }
    Ok(name)
}

/// A variable declaration with an optional initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    ty: TypeRef,
    name: String,
    init: Option<Box<Expr>>,
}

impl VariableDecl {
    pub fn new(ty: TypeRef, name: impl Into<String>, init: Option<Expr>) -> ShardResult<Self> {
        Ok(Self {
            ty,
            name: checked_name(name, "variable")?,
            init: init.map(Box::new),
        })
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn set_ty(&mut self, ty: TypeRef) {
        self.ty = ty;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ShardResult<()> {
        self.name = checked_name(name, "variable")?;
        Ok(())
    }

    pub fn init(&self) -> Option<&Expr> {
        self.init.as_deref()
    }

    pub fn set_init(&mut self, init: Option<Expr>) {
        self.init = init.map(Box::new);
    }
}

/// A function declaration: return type, name, parameters and a compound body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    ret_type: TypeRef,
    name: String,
    params: Vec<VariableDecl>,
    body: CompoundStmt,
}

impl FunctionDecl {
    pub fn new(
        ret_type: TypeRef,
        name: impl Into<String>,
        params: Vec<VariableDecl>,
        body: CompoundStmt,
    ) -> ShardResult<Self> {
        Ok(Self {
            ret_type,
            name: checked_name(name, "function")?,
            params,
            body,
        })
    }

    pub fn ret_type(&self) -> &TypeRef {
        &self.ret_type
    }

    pub fn set_ret_type(&mut self, ty: TypeRef) {
        self.ret_type = ty;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ShardResult<()> {
        self.name = checked_name(name, "function")?;
        Ok(())
    }

    pub fn params(&self) -> &[VariableDecl] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Vec<VariableDecl> {
        &mut self.params
    }

    pub fn body(&self) -> &CompoundStmt {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut CompoundStmt {
        &mut self.body
    }

    pub fn set_body(&mut self, body: CompoundStmt) {
        self.body = body;
    }
}

/// A class declaration owning its member declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    name: String,
    decls: Vec<Decl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, decls: Vec<Decl>) -> ShardResult<Self> {
        Ok(Self {
            name: checked_name(name, "class")?,
            decls,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ShardResult<()> {
        self.name = checked_name(name, "class")?;
        Ok(())
    }

    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    pub fn decls_mut(&mut self) -> &mut Vec<Decl> {
        &mut self.decls
    }

    pub fn add_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }
}

//! Expression nodes

use serde::{Deserialize, Serialize};
use shard_common::{Range, ShardError, ShardResult};
use std::fmt;

/// An expression node: a kind tag plus the source range it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    kind: ExprKind,
    range: Range,
}

impl Expr {
    pub fn new(kind: ExprKind, range: Range) -> Self {
        Self { kind, range }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ExprKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> ExprKind {
        self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    pub fn int_literal(value: i64, range: Range) -> Self {
        Self::new(ExprKind::IntLiteral(value), range)
    }

    pub fn float_literal(value: f64, range: Range) -> Self {
        Self::new(ExprKind::FloatLiteral(value), range)
    }

    pub fn bool_literal(value: bool, range: Range) -> Self {
        Self::new(ExprKind::BoolLiteral(value), range)
    }

    pub fn char_literal(value: char, range: Range) -> Self {
        Self::new(ExprKind::CharLiteral(value), range)
    }

    pub fn string_literal(value: impl Into<String>, range: Range) -> Self {
        Self::new(ExprKind::StringLiteral(value.into()), range)
    }

    pub fn null_literal(range: Range) -> Self {
        Self::new(ExprKind::NullLiteral, range)
    }

    pub fn identifier(name: impl Into<String>, range: Range) -> ShardResult<Self> {
        Ok(Self::new(
            ExprKind::Identifier(IdentifierExpr::new(name)?),
            range,
        ))
    }

    pub fn paren(expr: Expr, range: Range) -> Self {
        Self::new(ExprKind::Paren(ParenExpr::new(expr)), range)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, range: Range) -> Self {
        Self::new(ExprKind::Binary(BinaryExpr::new(op, lhs, rhs)), range)
    }

    pub fn unary(op: UnaryOp, operand: Expr, range: Range) -> Self {
        Self::new(ExprKind::Unary(UnaryExpr::new(op, operand)), range)
    }

    pub fn ternary(condition: Expr, then_expr: Expr, else_expr: Expr, range: Range) -> Self {
        Self::new(
            ExprKind::Ternary(TernaryExpr::new(condition, then_expr, else_expr)),
            range,
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>, range: Range) -> Self {
        Self::new(ExprKind::Call(CallExpr::new(callee, args)), range)
    }

    pub fn subscript(callee: Expr, args: Vec<Expr>, range: Range) -> Self {
        Self::new(ExprKind::Subscript(SubscriptExpr::new(callee, args)), range)
    }

    pub fn member(base: Expr, name: impl Into<String>, range: Range) -> ShardResult<Self> {
        Ok(Self::new(
            ExprKind::Member(MemberAccessExpr::new(base, name)?),
            range,
        ))
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    CharLiteral(char),
    StringLiteral(String),
    NullLiteral,
    Identifier(IdentifierExpr),
    Paren(ParenExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
    Call(CallExpr),
    Subscript(SubscriptExpr),
    Member(MemberAccessExpr),
}

/// A named reference to a declaration. The name is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpr {
    name: String,
}

impl IdentifierExpr {
    pub fn new(name: impl Into<String>) -> ShardResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShardError::construction_error("identifier name is empty"));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ShardResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShardError::construction_error("identifier name is empty"));
        }
        self.name = name;
        Ok(())
    }
}

/// A parenthesized expression. The inner expression is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenExpr {
    expr: Box<Expr>,
}

impl ParenExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr: Box::new(expr) }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn expr_mut(&mut self) -> &mut Expr {
        &mut self.expr
    }

    pub fn set_expr(&mut self, expr: Expr) {
        self.expr = Box::new(expr);
    }

    pub fn into_expr(self) -> Expr {
        *self.expr
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Assignment
    Assign,
    MulAssign,
    DivAssign,
    RemAssign,
    AddAssign,
    SubAssign,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Assign => "=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
        };
        write!(f, "{}", op)
    }
}

/// A binary operation with two owned operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    op: BinaryOp,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
}

impl BinaryExpr {
    pub fn new(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn set_op(&mut self, op: BinaryOp) {
        self.op = op;
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    pub fn set_lhs(&mut self, expr: Expr) {
        self.lhs = Box::new(expr);
    }

    pub fn set_rhs(&mut self, expr: Expr) {
        self.rhs = Box::new(expr);
    }
}

/// Unary operators. Increment and decrement encode prefix/postfix in the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    PostInc,
    PostDec,
    PreInc,
    PreDec,
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    pub fn is_prefix(&self) -> bool {
        !self.is_postfix()
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            UnaryOp::PostInc | UnaryOp::PreInc => "++",
            UnaryOp::PostDec | UnaryOp::PreDec => "--",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", op)
    }
}

/// A unary operation with one owned operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    op: UnaryOp,
    operand: Box<Expr>,
}

impl UnaryExpr {
    pub fn new(op: UnaryOp, operand: Expr) -> Self {
        Self {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn op(&self) -> UnaryOp {
        self.op
    }

    pub fn set_op(&mut self, op: UnaryOp) {
        self.op = op;
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }

    pub fn set_operand(&mut self, expr: Expr) {
        self.operand = Box::new(expr);
    }
}

/// The conditional `?:` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TernaryExpr {
    condition: Box<Expr>,
    then_expr: Box<Expr>,
    else_expr: Box<Expr>,
}

impl TernaryExpr {
    pub fn new(condition: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Self {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn then_expr(&self) -> &Expr {
        &self.then_expr
    }

    pub fn else_expr(&self) -> &Expr {
        &self.else_expr
    }

    pub fn set_condition(&mut self, expr: Expr) {
        self.condition = Box::new(expr);
    }

    pub fn set_then_expr(&mut self, expr: Expr) {
        self.then_expr = Box::new(expr);
    }

    pub fn set_else_expr(&mut self, expr: Expr) {
        self.else_expr = Box::new(expr);
    }
}

/// A function call: callee expression plus argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    callee: Box<Expr>,
    args: Vec<Expr>,
}

impl CallExpr {
    pub fn new(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn callee(&self) -> &Expr {
        &self.callee
    }

    pub fn set_callee(&mut self, expr: Expr) {
        self.callee = Box::new(expr);
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Vec<Expr> {
        &mut self.args
    }
}

/// A subscript access: callee expression plus argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptExpr {
    callee: Box<Expr>,
    args: Vec<Expr>,
}

impl SubscriptExpr {
    pub fn new(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn callee(&self) -> &Expr {
        &self.callee
    }

    pub fn set_callee(&mut self, expr: Expr) {
        self.callee = Box::new(expr);
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Vec<Expr> {
        &mut self.args
    }
}

/// A member access. The member name is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccessExpr {
    base: Box<Expr>,
    name: String,
}

impl MemberAccessExpr {
    pub fn new(base: Expr, name: impl Into<String>) -> ShardResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShardError::construction_error("member name is empty"));
        }
        Ok(Self {
            base: Box::new(base),
            name,
        })
    }

    pub fn base(&self) -> &Expr {
        &self.base
    }

    pub fn set_base(&mut self, expr: Expr) {
        self.base = Box::new(expr);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ShardResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShardError::construction_error("member name is empty"));
        }
        self.name = name;
        Ok(())
    }
}

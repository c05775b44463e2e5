//! Statement nodes

use crate::decl::Decl;
use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use shard_common::Range;

/// A statement node: a kind tag plus the source range it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    kind: StmtKind,
    range: Range,
}

impl Stmt {
    pub fn new(kind: StmtKind, range: Range) -> Self {
        Self { kind, range }
    }

    pub fn kind(&self) -> &StmtKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut StmtKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> StmtKind {
        self.kind
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    pub fn expr(expr: Option<Expr>, range: Range) -> Self {
        Self::new(StmtKind::Expr(ExprStmt::new(expr)), range)
    }

    pub fn decl(decl: Decl, range: Range) -> Self {
        Self::new(StmtKind::Decl(DeclStmt::new(decl)), range)
    }

    pub fn compound(stmts: Vec<Stmt>, range: Range) -> Self {
        Self::new(StmtKind::Compound(CompoundStmt::new(stmts)), range)
    }

    pub fn if_stmt(condition: Expr, then_stmt: Stmt, else_stmt: Option<Stmt>, range: Range) -> Self {
        Self::new(StmtKind::If(IfStmt::new(condition, then_stmt, else_stmt)), range)
    }

    pub fn while_stmt(condition: Expr, body: Stmt, range: Range) -> Self {
        Self::new(StmtKind::While(WhileStmt::new(condition, body)), range)
    }

    pub fn do_while(body: CompoundStmt, condition: Expr, range: Range) -> Self {
        Self::new(StmtKind::DoWhile(DoWhileStmt::new(body, condition)), range)
    }

    pub fn for_stmt(
        init: Stmt,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Stmt,
        range: Range,
    ) -> Self {
        Self::new(
            StmtKind::For(ForStmt::new(init, condition, increment, body)),
            range,
        )
    }

    pub fn switch(condition: Expr, body: CompoundStmt, range: Range) -> Self {
        Self::new(StmtKind::Switch(SwitchStmt::new(condition, body)), range)
    }

    pub fn case(expr: Expr, stmts: Vec<Stmt>, range: Range) -> Self {
        Self::new(StmtKind::Case(CaseStmt::new(expr, stmts)), range)
    }

    pub fn default(stmts: Vec<Stmt>, range: Range) -> Self {
        Self::new(StmtKind::Default(DefaultStmt::new(stmts)), range)
    }

    pub fn continue_stmt(range: Range) -> Self {
        Self::new(StmtKind::Continue, range)
    }

    pub fn break_stmt(range: Range) -> Self {
        Self::new(StmtKind::Break, range)
    }

    pub fn return_stmt(expr: Option<Expr>, range: Range) -> Self {
        Self::new(StmtKind::Return(ReturnStmt::new(expr)), range)
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Expr(ExprStmt),
    Decl(DeclStmt),
    Compound(CompoundStmt),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Case(CaseStmt),
    Default(DefaultStmt),
    Continue,
    Break,
    Return(ReturnStmt),
}

/// An expression evaluated for its effects. A missing expression is the
/// empty statement `;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    expr: Option<Box<Expr>>,
}

impl ExprStmt {
    pub fn new(expr: Option<Expr>) -> Self {
        Self { expr: expr.map(Box::new) }
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_deref()
    }

    pub fn set_expr(&mut self, expr: Option<Expr>) {
        self.expr = expr.map(Box::new);
    }
}

/// A declaration in statement position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclStmt {
    decl: Box<Decl>,
}

impl DeclStmt {
    pub fn new(decl: Decl) -> Self {
        Self { decl: Box::new(decl) }
    }

    pub fn decl(&self) -> &Decl {
        &self.decl
    }

    pub fn decl_mut(&mut self) -> &mut Decl {
        &mut self.decl
    }

    pub fn set_decl(&mut self, decl: Decl) {
        self.decl = Box::new(decl);
    }
}

/// An ordered list of statements in its own scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundStmt {
    stmts: Vec<Stmt>,
}

impl CompoundStmt {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmts_mut(&mut self) -> &mut Vec<Stmt> {
        &mut self.stmts
    }

    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }
}

/// `if (cond) then else`. Condition and then-branch are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    condition: Box<Expr>,
    then_stmt: Box<Stmt>,
    else_stmt: Option<Box<Stmt>>,
}

impl IfStmt {
    pub fn new(condition: Expr, then_stmt: Stmt, else_stmt: Option<Stmt>) -> Self {
        Self {
            condition: Box::new(condition),
            then_stmt: Box::new(then_stmt),
            else_stmt: else_stmt.map(Box::new),
        }
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn then_stmt(&self) -> &Stmt {
        &self.then_stmt
    }

    pub fn else_stmt(&self) -> Option<&Stmt> {
        self.else_stmt.as_deref()
    }

    pub fn set_condition(&mut self, expr: Expr) {
        self.condition = Box::new(expr);
    }

    pub fn set_then_stmt(&mut self, stmt: Stmt) {
        self.then_stmt = Box::new(stmt);
    }

    pub fn set_else_stmt(&mut self, stmt: Option<Stmt>) {
        self.else_stmt = stmt.map(Box::new);
    }
}

/// `while (cond) body`. Both slots are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    condition: Box<Expr>,
    body: Box<Stmt>,
}

impl WhileStmt {
    pub fn new(condition: Expr, body: Stmt) -> Self {
        Self {
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn body(&self) -> &Stmt {
        &self.body
    }

    pub fn set_condition(&mut self, expr: Expr) {
        self.condition = Box::new(expr);
    }

    pub fn set_body(&mut self, stmt: Stmt) {
        self.body = Box::new(stmt);
    }
}

/// `do body while (cond)`. The body is always a compound statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileStmt {
    body: CompoundStmt,
    condition: Box<Expr>,
}

impl DoWhileStmt {
    pub fn new(body: CompoundStmt, condition: Expr) -> Self {
        Self {
            body,
            condition: Box::new(condition),
        }
    }

    pub fn body(&self) -> &CompoundStmt {
        &self.body
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn set_body(&mut self, body: CompoundStmt) {
        self.body = body;
    }

    pub fn set_condition(&mut self, expr: Expr) {
        self.condition = Box::new(expr);
    }
}

/// C-style `for`. Init and body are required, condition and increment may be
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    init: Box<Stmt>,
    condition: Option<Box<Expr>>,
    increment: Option<Box<Expr>>,
    body: Box<Stmt>,
}

impl ForStmt {
    pub fn new(init: Stmt, condition: Option<Expr>, increment: Option<Expr>, body: Stmt) -> Self {
        Self {
            init: Box::new(init),
            condition: condition.map(Box::new),
            increment: increment.map(Box::new),
            body: Box::new(body),
        }
    }

    pub fn init(&self) -> &Stmt {
        &self.init
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_deref()
    }

    pub fn increment(&self) -> Option<&Expr> {
        self.increment.as_deref()
    }

    pub fn body(&self) -> &Stmt {
        &self.body
    }

    pub fn set_init(&mut self, stmt: Stmt) {
        self.init = Box::new(stmt);
    }

    pub fn set_condition(&mut self, expr: Option<Expr>) {
        self.condition = expr.map(Box::new);
    }

    pub fn set_increment(&mut self, expr: Option<Expr>) {
        self.increment = expr.map(Box::new);
    }

    pub fn set_body(&mut self, stmt: Stmt) {
        self.body = Box::new(stmt);
    }
}

/// `switch (cond) { ... }`. The body compound holds case and default
/// statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    condition: Box<Expr>,
    body: CompoundStmt,
}

impl SwitchStmt {
    pub fn new(condition: Expr, body: CompoundStmt) -> Self {
        Self {
            condition: Box::new(condition),
            body,
        }
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn body(&self) -> &CompoundStmt {
        &self.body
    }

    pub fn set_condition(&mut self, expr: Expr) {
        self.condition = Box::new(expr);
    }

    pub fn set_body(&mut self, body: CompoundStmt) {
        self.body = body;
    }
}

/// A `case expr:` label owning the statements that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStmt {
    expr: Box<Expr>,
    stmts: Vec<Stmt>,
}

impl CaseStmt {
    pub fn new(expr: Expr, stmts: Vec<Stmt>) -> Self {
        Self {
            expr: Box::new(expr),
            stmts,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn set_expr(&mut self, expr: Expr) {
        self.expr = Box::new(expr);
    }

    pub fn stmts_mut(&mut self) -> &mut Vec<Stmt> {
        &mut self.stmts
    }

    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }
}

/// A `default:` label owning the statements that follow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultStmt {
    stmts: Vec<Stmt>,
}

impl DefaultStmt {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn stmts_mut(&mut self) -> &mut Vec<Stmt> {
        &mut self.stmts
    }

    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }
}

/// `return expr;` or plain `return;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    expr: Option<Box<Expr>>,
}

impl ReturnStmt {
    pub fn new(expr: Option<Expr>) -> Self {
        Self { expr: expr.map(Box::new) }
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_deref()
    }

    pub fn set_expr(&mut self, expr: Option<Expr>) {
        self.expr = expr.map(Box::new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_stmt_allows_missing_expression() {
        let stmt = Stmt::expr(None, Range::invalid());
        match stmt.kind() {
            StmtKind::Expr(e) => assert!(e.expr().is_none()),
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn return_stmt_allows_missing_result() {
        let stmt = Stmt::return_stmt(None, Range::invalid());
        match stmt.kind() {
            StmtKind::Return(r) => assert!(r.expr().is_none()),
            _ => panic!("expected return statement"),
        }
    }

    #[test]
    fn compound_keeps_order() {
        let mut body = CompoundStmt::default();
        body.add_stmt(Stmt::continue_stmt(Range::invalid()));
        body.add_stmt(Stmt::break_stmt(Range::invalid()));
        assert_eq!(body.len(), 2);
        assert!(matches!(body.stmts()[0].kind(), StmtKind::Continue));
        assert!(matches!(body.stmts()[1].kind(), StmtKind::Break));
    }
}

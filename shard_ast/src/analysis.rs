//! Semantic analysis scaffolding
//!
//! Scopes form a singly linked chain oriented toward the root: each context
//! owns the declarations of one lexical scope and borrows its parent. Lookup
//! walks outward, first match wins.

use crate::decl::{ClassDecl, Decl, DeclKind, FunctionDecl, VariableDecl};
use crate::expr::{Expr, ExprKind};
use crate::source::Source;
use crate::stmt::{Stmt, StmtKind};
use hashbrown::HashMap;
use shard_common::{Diagnostics, Range, ShardError, ShardResult};

/// A borrowed handle to a declaration visible in some scope.
#[derive(Debug, Clone, Copy)]
pub enum DeclRef<'ast> {
    Variable(&'ast VariableDecl),
    Function(&'ast FunctionDecl),
    Class(&'ast ClassDecl),
}

impl<'ast> DeclRef<'ast> {
    pub fn name(&self) -> &'ast str {
        match *self {
            DeclRef::Variable(v) => v.name(),
            DeclRef::Function(f) => f.name(),
            DeclRef::Class(c) => c.name(),
        }
    }
}

impl<'ast> From<&'ast Decl> for DeclRef<'ast> {
    fn from(decl: &'ast Decl) -> Self {
        match decl.kind() {
            DeclKind::Variable(v) => DeclRef::Variable(v),
            DeclKind::Function(f) => DeclRef::Function(f),
            DeclKind::Class(c) => DeclRef::Class(c),
        }
    }
}

// Handles compare by referent identity, not by structure.
impl PartialEq for DeclRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DeclRef::Variable(a), DeclRef::Variable(b)) => std::ptr::eq(*a, *b),
            (DeclRef::Function(a), DeclRef::Function(b)) => std::ptr::eq(*a, *b),
            (DeclRef::Class(a), DeclRef::Class(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl Eq for DeclRef<'_> {}

/// One lexical scope in the analysis scope chain.
#[derive(Debug, Default)]
pub struct AnalysisContext<'ast, 'p> {
    parent: Option<&'p AnalysisContext<'ast, 'p>>,
    decls: HashMap<String, DeclRef<'ast>>,
}

impl<'ast, 'p> AnalysisContext<'ast, 'p> {
    pub fn new() -> Self {
        Self {
            parent: None,
            decls: HashMap::new(),
        }
    }

    /// Create a child context chained to this one.
    pub fn push<'s>(&'s self) -> AnalysisContext<'ast, 's> {
        AnalysisContext {
            parent: Some(self),
            decls: HashMap::new(),
        }
    }

    /// Record a declaration under its name in the current scope.
    ///
    /// A duplicate name in the same scope is a semantic error; the existing
    /// entry is kept.
    pub fn add_decl(&mut self, decl: impl Into<DeclRef<'ast>>) -> ShardResult<()> {
        let decl = decl.into();
        let name = decl.name();
        if self.decls.contains_key(name) {
            return Err(ShardError::analysis_error(format!(
                "redeclaration of '{}' in the same scope",
                name
            )));
        }
        self.decls.insert(name.to_string(), decl);
        Ok(())
    }

    /// Search the current scope, then each enclosing scope in turn.
    pub fn find_decl(&self, name: &str) -> Option<DeclRef<'ast>> {
        if let Some(decl) = self.decls.get(name) {
            return Some(*decl);
        }
        self.parent.and_then(|parent| parent.find_decl(name))
    }
}

/// Walks a [`Source`] and checks its semantic rules, accumulating
/// diagnostics. Analysis continues past recoverable errors.
#[derive(Debug, Default)]
pub struct Analyzer {
    diagnostics: Diagnostics,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Check the source; `true` when no errors were found.
    pub fn analyze<'ast>(&mut self, source: &'ast Source) -> bool {
        let mut root = AnalysisContext::new();
        self.analyze_stmts(&mut root, source.stmts());
        !self.diagnostics.has_errors()
    }

    fn analyze_stmts<'ast>(&mut self, ctx: &mut AnalysisContext<'ast, '_>, stmts: &'ast [Stmt]) {
        for stmt in stmts {
            self.analyze_stmt(ctx, stmt);
        }
    }

    fn analyze_stmt<'ast>(&mut self, ctx: &mut AnalysisContext<'ast, '_>, stmt: &'ast Stmt) {
        match stmt.kind() {
            StmtKind::Expr(e) => {
                if let Some(expr) = e.expr() {
                    self.analyze_expr(ctx, expr);
                }
            }
            StmtKind::Decl(d) => self.analyze_decl(ctx, d.decl()),
            StmtKind::Compound(c) => {
                let mut child = ctx.push();
                self.analyze_stmts(&mut child, c.stmts());
            }
            StmtKind::If(i) => {
                self.analyze_expr(ctx, i.condition());
                self.analyze_stmt(ctx, i.then_stmt());
                if let Some(else_stmt) = i.else_stmt() {
                    self.analyze_stmt(ctx, else_stmt);
                }
            }
            StmtKind::While(w) => {
                self.analyze_expr(ctx, w.condition());
                self.analyze_stmt(ctx, w.body());
            }
            StmtKind::DoWhile(d) => {
                let mut child = ctx.push();
                self.analyze_stmts(&mut child, d.body().stmts());
                self.analyze_expr(&child, d.condition());
            }
            StmtKind::For(f) => {
                // The init declaration scopes over condition, increment and body.
                let mut child = ctx.push();
                self.analyze_stmt(&mut child, f.init());
                if let Some(cond) = f.condition() {
                    self.analyze_expr(&child, cond);
                }
                if let Some(inc) = f.increment() {
                    self.analyze_expr(&child, inc);
                }
                self.analyze_stmt(&mut child, f.body());
            }
            StmtKind::Switch(s) => {
                self.analyze_expr(ctx, s.condition());
                let mut child = ctx.push();
                self.analyze_stmts(&mut child, s.body().stmts());
            }
            StmtKind::Case(c) => {
                self.analyze_expr(ctx, c.expr());
                self.analyze_stmts(ctx, c.stmts());
            }
            StmtKind::Default(d) => {
                self.analyze_stmts(ctx, d.stmts());
            }
            StmtKind::Continue | StmtKind::Break => {}
            StmtKind::Return(r) => {
                if let Some(expr) = r.expr() {
                    self.analyze_expr(ctx, expr);
                }
            }
        }
    }

    fn analyze_decl<'ast>(&mut self, ctx: &mut AnalysisContext<'ast, '_>, decl: &'ast Decl) {
        self.record(ctx, decl.into(), decl.range());

        match decl.kind() {
            DeclKind::Variable(v) => {
                if let Some(init) = v.init() {
                    self.analyze_expr(ctx, init);
                }
            }
            DeclKind::Function(f) => {
                let mut params_ctx = ctx.push();
                for param in f.params() {
                    self.record(&mut params_ctx, DeclRef::Variable(param), decl.range());
                    if let Some(init) = param.init() {
                        self.analyze_expr(&params_ctx, init);
                    }
                }
                let mut body_ctx = params_ctx.push();
                self.analyze_stmts(&mut body_ctx, f.body().stmts());
            }
            DeclKind::Class(c) => {
                let mut member_ctx = ctx.push();
                for member in c.decls() {
                    self.analyze_decl(&mut member_ctx, member);
                }
            }
        }
    }

    fn analyze_expr<'ast>(&mut self, ctx: &AnalysisContext<'ast, '_>, expr: &'ast Expr) {
        match expr.kind() {
            ExprKind::IntLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::CharLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::NullLiteral => {}
            ExprKind::Identifier(ident) => {
                if ctx.find_decl(ident.name()).is_none() {
                    self.diagnostics.error(
                        format!("unknown identifier '{}'", ident.name()),
                        expr.range(),
                    );
                }
            }
            ExprKind::Paren(p) => self.analyze_expr(ctx, p.expr()),
            ExprKind::Binary(b) => {
                self.analyze_expr(ctx, b.lhs());
                self.analyze_expr(ctx, b.rhs());
            }
            ExprKind::Unary(u) => self.analyze_expr(ctx, u.operand()),
            ExprKind::Ternary(t) => {
                self.analyze_expr(ctx, t.condition());
                self.analyze_expr(ctx, t.then_expr());
                self.analyze_expr(ctx, t.else_expr());
            }
            ExprKind::Call(c) => {
                self.analyze_expr(ctx, c.callee());
                for arg in c.args() {
                    self.analyze_expr(ctx, arg);
                }
            }
            ExprKind::Subscript(s) => {
                self.analyze_expr(ctx, s.callee());
                for arg in s.args() {
                    self.analyze_expr(ctx, arg);
                }
            }
            // Member names are resolved against the base's type, which needs
            // type information this pass does not compute.
            ExprKind::Member(m) => self.analyze_expr(ctx, m.base()),
        }
    }

    fn record<'ast>(
        &mut self,
        ctx: &mut AnalysisContext<'ast, '_>,
        decl: DeclRef<'ast>,
        range: Range,
    ) {
        if let Err(err) = ctx.add_decl(decl) {
            self.diagnostics.error(err.to_string(), range);
        }
    }
}

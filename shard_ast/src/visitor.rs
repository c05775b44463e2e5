//! AST visitor pattern implementation for traversal

use crate::decl::*;
use crate::expr::*;
use crate::source::Source;
use crate::stmt::*;
use crate::ty::TypeRef;

/// Trait for immutable AST visitors
pub trait Visitor: Sized {
    fn visit_source(&mut self, source: &Source) {
        walk_source(self, source);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    fn visit_type_ref(&mut self, _ty: &TypeRef) {}
}

pub fn walk_source<V: Visitor>(visitor: &mut V, source: &Source) {
    for stmt in source.stmts() {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt.kind() {
        StmtKind::Expr(e) => {
            if let Some(expr) = e.expr() {
                visitor.visit_expr(expr);
            }
        }
        StmtKind::Decl(d) => visitor.visit_decl(d.decl()),
        StmtKind::Compound(c) => {
            for stmt in c.stmts() {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::If(i) => {
            visitor.visit_expr(i.condition());
            visitor.visit_stmt(i.then_stmt());
            if let Some(else_stmt) = i.else_stmt() {
                visitor.visit_stmt(else_stmt);
            }
        }
        StmtKind::While(w) => {
            visitor.visit_expr(w.condition());
            visitor.visit_stmt(w.body());
        }
        StmtKind::DoWhile(d) => {
            for stmt in d.body().stmts() {
                visitor.visit_stmt(stmt);
            }
            visitor.visit_expr(d.condition());
        }
        StmtKind::For(f) => {
            visitor.visit_stmt(f.init());
            if let Some(cond) = f.condition() {
                visitor.visit_expr(cond);
            }
            if let Some(inc) = f.increment() {
                visitor.visit_expr(inc);
            }
            visitor.visit_stmt(f.body());
        }
        StmtKind::Switch(s) => {
            visitor.visit_expr(s.condition());
            for stmt in s.body().stmts() {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::Case(c) => {
            visitor.visit_expr(c.expr());
            for stmt in c.stmts() {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::Default(d) => {
            for stmt in d.stmts() {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::Continue | StmtKind::Break => {}
        StmtKind::Return(r) => {
            if let Some(expr) = r.expr() {
                visitor.visit_expr(expr);
            }
        }
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr.kind() {
        ExprKind::IntLiteral(_)
        | ExprKind::FloatLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::CharLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::NullLiteral
        | ExprKind::Identifier(_) => {}
        ExprKind::Paren(p) => visitor.visit_expr(p.expr()),
        ExprKind::Binary(b) => {
            visitor.visit_expr(b.lhs());
            visitor.visit_expr(b.rhs());
        }
        ExprKind::Unary(u) => visitor.visit_expr(u.operand()),
        ExprKind::Ternary(t) => {
            visitor.visit_expr(t.condition());
            visitor.visit_expr(t.then_expr());
            visitor.visit_expr(t.else_expr());
        }
        ExprKind::Call(c) => {
            visitor.visit_expr(c.callee());
            for arg in c.args() {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Subscript(s) => {
            visitor.visit_expr(s.callee());
            for arg in s.args() {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Member(m) => visitor.visit_expr(m.base()),
    }
}

pub fn walk_decl<V: Visitor>(visitor: &mut V, decl: &Decl) {
    match decl.kind() {
        DeclKind::Variable(v) => {
            visitor.visit_type_ref(v.ty());
            if let Some(init) = v.init() {
                visitor.visit_expr(init);
            }
        }
        DeclKind::Function(f) => {
            visitor.visit_type_ref(f.ret_type());
            for param in f.params() {
                visitor.visit_type_ref(param.ty());
                if let Some(init) = param.init() {
                    visitor.visit_expr(init);
                }
            }
            for stmt in f.body().stmts() {
                visitor.visit_stmt(stmt);
            }
        }
        DeclKind::Class(c) => {
            for member in c.decls() {
                visitor.visit_decl(member);
            }
        }
    }
}

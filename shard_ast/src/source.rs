//! The root node of a parsed source file

use crate::stmt::Stmt;
use serde::{Deserialize, Serialize};
use shard_common::Range;

/// The root of an AST, owning the top-level statements of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    stmts: Vec<Stmt>,
    range: Range,
}

impl Source {
    pub fn new(stmts: Vec<Stmt>, range: Range) -> Self {
        Self { stmts, range }
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

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }
}

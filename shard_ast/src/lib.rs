//! Abstract syntax tree for the Shard language
//!
//! The AST is made of three disjoint node families: expressions, statements
//! and declarations. Every node carries a source [`Range`]. Parents own their
//! children exclusively; cross-cutting observation happens through borrowed
//! handles only.
//!
//! [`Range`]: shard_common::Range

pub mod analysis;
pub mod decl;
pub mod expr;
pub mod source;
pub mod stmt;
pub mod ty;
pub mod visitor;

pub use analysis::{AnalysisContext, Analyzer};
pub use decl::*;
pub use expr::*;
pub use source::Source;
pub use stmt::*;
pub use ty::TypeRef;

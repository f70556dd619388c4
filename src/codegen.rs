//! Source emission: statement-tree builders plus one renderer.
//!
//! The builders (`decode`, `encode`, `emit`) assemble a `Stmt` tree and the
//! printer renders it with indentation derived from block depth, so no
//! generator ever tracks indentation state of its own.
pub mod ast;
pub mod decode;
pub mod emit;
pub mod encode;
pub mod printer;

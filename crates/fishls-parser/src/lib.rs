//! Fish syntax tree producer and node classification.
//!
//! This crate owns the parsing side of the engine:
//! - a tokenizer and error-tolerant structure parser for the fish dialect
//! - the `NodeArena`/`NodeIndex` tree storage with parent/child/sibling
//!   navigation
//! - the closed `NodeKind` classification every downstream component
//!   dispatches on
//! - pure classifier predicates (`is_function_definition`,
//!   `is_command_with_name`, ...)
//! - short/long flag matching (`Opt`) for command options

pub mod node;
pub use node::{Node, NodeArena, NodeIndex, NodeKind, SyntaxTree};

pub mod lexer;

pub mod parser;
pub use parser::parse;

pub mod classify;

pub mod options;
pub use options::Opt;

//! Command language for the hosting shell.
//!
//! This crate owns the textual side of the shell: the object/action
//! vocabulary ([`TypeName`], [`Catalog`]), the parsed command AST
//! ([`Command`]), and the parser itself ([`parse`]). It is deliberately
//! pure: no I/O, no remote calls, no knowledge of what an action *does*.
//! The application crate builds a [`Catalog`] from its handler registry
//! and feeds every input line through [`parse`]; whatever comes back is
//! either a well-formed [`Command`] or a [`SyntaxError`] with a position
//! and a human-readable message.
//!
//! The grammar is small and deliberately rigid:
//!
//! ```text
//! command  ::= TYPE '.' ACTION params?            (type-level)
//!            | TYPE '(' ID ')' '.' ACTION params? (instance-level)
//! params   ::= '(' ')' | '(' WORD (',' WORD)* ')'
//! ```
//!
//! Keywords are matched case-insensitively and legality of each
//! `(type, action)` pair is checked against the catalog during the
//! parse, so a command that names an action the type does not support
//! never reaches the dispatcher.

pub mod ast;
pub mod catalog;
pub mod diagnostics;
pub mod parser;

pub use ast::{ClassCommand, Command, InstanceCommand, TypeName};
pub use catalog::{ActionSet, Catalog};
pub use diagnostics::SyntaxError;
pub use parser::parse;

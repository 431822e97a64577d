//! The Meta-AST (MAST): the closed node taxonomy shared by both supported
//! language families, and the visitor contract used to walk it.
//!
//! This crate owns component A of the pipeline. The Translator
//! (`parity-translate`) builds a MAST forest from a CST; the Symbolicator
//! (`parity-symbols`), Renamer (`parity-transform`) and Checker
//! (`parity-check`) all walk it using [`visitor::walk`]/[`visitor::inspect`]
//! rather than hand-rolling recursion over [`node::Node`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod kinds;
pub mod node;
pub mod visitor;

pub use error::MastError;
pub use kinds::set_java_expr_type_kinds;
pub use node::ident_key;
pub use node::node_key;
pub use node::IdentKey;
pub use node::Node;
pub use node::NodeKey;
pub use node::NodeRef;
pub use visitor::children;
pub use visitor::inspect;
pub use visitor::walk;
pub use visitor::Visitor;

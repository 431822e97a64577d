//! The Renamer: component D of the pipeline (spec 2, 4.D).
//!
//! Given a forest and the [`SymbolTable`](parity_symbols::SymbolTable) the
//! Symbolicator produced for it, [`rename`] rewrites every private
//! identifier occurrence to a canonical, positional name and leaves every
//! other occurrence untouched. The rewrite is a pure function over MAST —
//! it returns a new forest and never mutates its input — and is idempotent:
//! symbolicating and renaming its own output a second time yields the same
//! names. When renaming is disabled this component is simply absent from
//! the pipeline; callers that don't want it just skip calling [`rename`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod rename;

pub use error::TransformError;
pub use rename::rename;

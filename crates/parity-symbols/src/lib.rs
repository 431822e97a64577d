//! The Symbolicator: component C of the pipeline (spec 2, 4.C).
//!
//! A single generic [`driver::Symbolicator`] walks a forest and defers every
//! language-sensitive decision to a [`driver::LanguageHooks`] implementation;
//! [`go::GoHooks`] and [`java::JavaHooks`] are the two implementations this
//! engine ships. The result is a [`SymbolTable`] mapping every identifier
//! occurrence the walk encountered to the [`entry::SymbolTableEntry`] it
//! resolves to (or to nothing, if deliberately left unresolved), plus the
//! insertion order the Renamer and Checker's constant-inlining relaxations
//! need for determinism.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

pub mod driver;
pub mod entry;
pub mod error;
pub mod go;
pub mod java;
pub mod scope;

pub use driver::Cx;
pub use driver::LanguageHooks;
pub use driver::Symbolicator;
pub use entry::Link;
pub use entry::SymbolTable;
pub use entry::SymbolTableEntry;
pub use error::SymbolError;
pub use scope::Scope;
pub use scope::ScopeManager;

use parity_cst::LanguageFamily;
use parity_mast::NodeRef;

/// Symbolicates a forest of roots for the given language family, dispatching
/// to the matching [`LanguageHooks`] implementation.
///
/// This mirrors [`parity_translate::translate_root`]'s "total function
/// dispatched by family" shape: a caller with a mixed-family batch picks the
/// family once up front (spec 6's `buildIR` refuses to mix them) and every
/// downstream stage, this one included, is handed a single, known family.
pub fn symbolicate(family: LanguageFamily, roots: &[NodeRef]) -> Result<SymbolTable, SymbolError> {
    match family {
        LanguageFamily::Go => Symbolicator::new(go::GoHooks::new()).run(roots),
        LanguageFamily::Java => Symbolicator::new(java::JavaHooks::new()).run(roots),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parity_translate::translate_root;

    #[test]
    fn dispatches_by_language_family() {
        let cst = parity_cst::SimpleNodeBuilder::new("source_file", parity_cst::Span::new(0, 0)).build();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root]).unwrap();
        assert!(table.is_empty());
    }
}

//! The Translator: converts a surface CST into a MAST forest.
//!
//! Component B of the pipeline (spec 2, 4.B). Dispatch is by
//! [`parity_cst::LanguageFamily`]; each family gets its own module sharing
//! the [`common`] helpers for the grouping/wrapping rules that do not vary
//! across languages.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

mod common;
pub mod error;
pub mod go;
pub mod java;

use parity_cst::CstNode;
use parity_cst::LanguageFamily;
use parity_mast::NodeRef;

pub use error::TranslateError;

/// Translates a single file's CST into a MAST [`NodeRef::Root`](parity_mast::Node::Root),
/// dispatched by language family.
///
/// This is the total function spec 4.B calls for: "deterministic total
/// function from a CST to a MAST node, dispatched by file extension". The
/// extension-to-family mapping itself lives in [`parity_cst::LanguageFamily`];
/// callers needing to refuse mixed-extension input do that before calling
/// this function (spec 6's `buildIR` contract), since a single call here
/// only ever sees one file.
pub fn translate_root<N: CstNode>(family: LanguageFamily, cst: &N) -> Result<NodeRef, TranslateError> {
    match family {
        LanguageFamily::Go => go::translate_root(cst),
        LanguageFamily::Java => java::translate_root(cst),
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::Span;
    use parity_cst::SimpleNodeBuilder;

    use super::*;

    #[test]
    fn dispatches_by_language_family() {
        let cst = SimpleNodeBuilder::new("source_file", Span::new(0, 0)).build();
        let node = translate_root(LanguageFamily::Go, &cst).unwrap();
        assert!(matches!(node.as_ref(), parity_mast::Node::Root(_)));
    }
}

//! The concrete syntax tree (CST) contract consumed by the Translator.
//!
//! The concrete tree-sitter-style surface parser that produces this tree is
//! out of scope for this crate (and for the engine as a whole): parsing is
//! owned by an external collaborator. What lives here is the *shape* of what
//! that collaborator hands over, modeled after a tree-sitter [`Node`] rather
//! than after any one concrete grammar, since the engine must accept CSTs
//! from more than one language family.
//!
//! [`Node`]: https://docs.rs/tree-sitter/latest/tree_sitter/struct.Node.html

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

mod simple;
mod span;

pub use simple::SimpleNode;
pub use simple::SimpleNodeBuilder;
pub use span::Span;

use std::fmt;
use std::str::FromStr;

/// The language families the engine is able to analyze.
///
/// A third family can be registered by extending this enum and
/// [`LanguageFamily::from_extension`]; no other component needs to change,
/// since the Translator, Symbolicator and Checker are all dispatched
/// generically over [`LanguageFamily`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFamily {
    /// The Go-like language family.
    Go,
    /// The Java-like language family.
    Java,
}

impl LanguageFamily {
    /// Determines the language family for a file extension.
    ///
    /// Returns `None` if the extension is not analyzable by the engine (the
    /// caller should dispatch such files to a simpler, single-file analyzer
    /// instead, per the driver contract).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Gets the file extension canonically associated with the family.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Java => "java",
        }
    }
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Go => write!(f, "go"),
            Self::Java => write!(f, "java"),
        }
    }
}

impl FromStr for LanguageFamily {
    type Err = UnsupportedExtension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| UnsupportedExtension(s.to_string()))
    }
}

/// An error produced when a file extension names no known language family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not an analyzable file extension")]
pub struct UnsupportedExtension(pub String);

/// A node (or token-as-leaf-node) of a concrete syntax tree.
///
/// Tree-sitter does not distinguish nodes from tokens at the API level: a
/// token is simply a node with no children. This trait follows that model so
/// that a real tree-sitter-backed CST can implement it directly.
///
/// Implementations are expected to be cheap to clone (a tree-sitter `Node` is
/// a lightweight cursor into a shared tree; [`SimpleNode`] uses reference
/// counting to get the same property for tests and fixtures).
pub trait CstNode: Clone + fmt::Debug {
    /// Gets the grammar-defined kind of the node (e.g. `"binary_expression"`,
    /// `"identifier"`).
    fn kind(&self) -> &str;

    /// Determines whether the node is a named node (as opposed to an
    /// anonymous node representing literal syntax such as a keyword or
    /// punctuation).
    fn is_named(&self) -> bool;

    /// Gets the source text spanned by the node.
    ///
    /// For a leaf this is the lexeme; for an interior node this is the
    /// concatenation of all descendant lexemes, exactly as they appeared in
    /// the source (whitespace and comments included).
    fn text(&self) -> &str;

    /// Gets the span of source covered by the node.
    fn span(&self) -> Span;

    /// Gets the node's immediate named children, in source order.
    fn children(&self) -> Vec<Self>;

    /// Gets the node's immediate children regardless of whether they are
    /// named, in source order.
    ///
    /// This is needed to recover punctuation-bearing shapes (e.g. "does this
    /// `if` have an `else`") that named-only traversal would hide.
    fn children_with_anonymous(&self) -> Vec<Self>;

    /// Gets the first immediate child associated with the given grammar
    /// field name, if any.
    fn child_by_field_name(&self, name: &str) -> Option<Self>;

    /// Gets every immediate child associated with the given grammar field
    /// name, in source order.
    fn children_by_field_name(&self, name: &str) -> Vec<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_family_round_trips_through_extension() {
        assert_eq!(LanguageFamily::from_extension("go"), Some(LanguageFamily::Go));
        assert_eq!(LanguageFamily::from_extension("java"), Some(LanguageFamily::Java));
        assert_eq!(LanguageFamily::from_extension("py"), None);
        assert_eq!(LanguageFamily::Go.extension(), "go");
    }

    #[test]
    fn language_family_parses_from_str() {
        assert_eq!("go".parse::<LanguageFamily>().unwrap(), LanguageFamily::Go);
        assert!("rb".parse::<LanguageFamily>().is_err());
    }
}

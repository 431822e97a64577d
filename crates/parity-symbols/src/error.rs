//! Errors produced while symbolicating a MAST forest.

/// A failure to symbolicate a MAST forest.
///
/// Per spec 4.C ("Failure semantics: All errors are plumbed back to the
/// driver as errors; the symbolicator never partially succeeds") every
/// variant here aborts the whole symbolication pass, not just the node
/// being visited.
#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    /// An invariant violation surfaced while walking the MAST.
    #[error(transparent)]
    Mast(#[from] parity_mast::MastError),

    /// A required field was unexpectedly absent (spec 7: "an unexpected nil
    /// in a required field").
    #[error("required field `{field}` on `{node}` was not set during symbolication")]
    UnexpectedNil {
        /// The node kind missing the field.
        node: &'static str,
        /// The missing field's name.
        field: &'static str,
    },

    /// Two incompatible declarations of the same name collided in a scope
    /// (spec 7: "an attempt to re-declare an incompatible symbol in the
    /// same scope").
    #[error("`{name}` is already declared in this scope with an incompatible declaration")]
    IncompatibleRedeclaration {
        /// The colliding name.
        name: String,
    },

    /// An unexpected declaration node was reached while determining
    /// Java-like visibility (spec 7: an input-refusal error).
    #[error("unexpected declaration node encountered while determining Java-like visibility")]
    UnexpectedDeclarationForPrivacy,

    /// An access-path prefix contained non-identifier syntax before a
    /// type-context keyword (spec 7).
    #[error("access path prefix is not pure name syntax before a type-context keyword")]
    MalformedAccessPathPrefix,
}

//! Errors produced while comparing two MAST forests.

use parity_mast::MastError;

/// An error raised while checking two forests for equivalence.
///
/// Spec 7 separates three failure kinds; only two of them are errors here —
/// a structural mismatch is not an error, it is a `reject`, represented by
/// `Ok(false)` from [`crate::run`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The forest was not well-formed — a programmer/invariant failure
    /// (spec 7): a surviving `TempGroup`, an unexpected missing child, or
    /// an access-path prefix containing a non-identifier before a
    /// type-context keyword.
    #[error(transparent)]
    Mast(#[from] MastError),

    /// A required declaration entry was missing where the relaxation rules
    /// need one (e.g. a struct type's field list, a constant's bound
    /// value).
    #[error("missing {what} required to decide equivalence")]
    MissingEntry {
        /// What was being looked up.
        what: &'static str,
    },

    /// The checker was asked to compare nodes from two different language
    /// families, or was handed a node shape its language layer does not
    /// recognize (input refusal, spec 7).
    #[error("unsupported node kind `{kind}` for this checker")]
    UnsupportedNodeKind {
        /// The node kind that could not be checked.
        kind: &'static str,
    },
}

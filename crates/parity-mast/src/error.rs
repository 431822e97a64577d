//! Errors produced while building or walking a MAST.

/// An invariant violation in the MAST data model or traversal.
///
/// Every variant here corresponds to a state that later pipeline stages are
/// entitled to assume never happens (translation finished cleanly, a
/// required field was filled in, an access-path prefix was well-formed); a
/// `MastError` surfacing means an earlier component has a bug, not that the
/// analyzed source was unusual.
#[derive(Debug, thiserror::Error)]
pub enum MastError {
    /// A [`crate::node::Node::TempGroup`] survived past translation.
    #[error("a temporary group node survived translation; the CST node it came from should have been expanded before the forest was handed off")]
    TempGroupSurvived,

    /// A field that the data model requires to be present was `None` where
    /// a caller needed it filled in.
    #[error("required field `{field}` on `{node}` was not set")]
    UnexpectedNil {
        /// The node kind that was missing the field.
        node: &'static str,
        /// The field name that was missing.
        field: &'static str,
    },

    /// An access-path chain passed to [`crate::kinds::set_java_expr_type_kinds`]
    /// contained a non-identifier node before reaching the end of the
    /// chain.
    #[error("access path contains a non-identifier node before its type-context suffix")]
    NonIdentifierInTypeContextPrefix,
}

//! Errors produced while translating a CST into a MAST.

/// A failure to translate a CST node.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The CST contained a grammar node kind the translator does not
    /// recognize.
    ///
    /// This is an input-refusal error (spec 7): the translator is a total
    /// function over the CST shapes it knows, not a best-effort one.
    #[error("`{family}` translator does not recognize CST node kind `{kind}`")]
    UnsupportedNodeKind {
        /// The language family that was asked to translate the node.
        family: &'static str,
        /// The unrecognized grammar node kind.
        kind: String,
    },

    /// A CST node was missing a child the grammar guarantees is present.
    #[error("CST node `{node}` is missing its `{field}` child")]
    MissingChild {
        /// The CST node kind that was missing a child.
        node: &'static str,
        /// The grammar field name that was missing.
        field: &'static str,
    },

    /// An invariant violation surfaced while assembling MAST nodes.
    #[error(transparent)]
    Mast(#[from] parity_mast::MastError),
}

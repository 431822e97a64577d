//! Errors produced while rewriting a MAST forest.

use parity_mast::MastError;

/// An error raised while renaming a forest.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The forest being renamed was not well-formed (spec 7's "programmer /
    /// invariant failure" class, e.g. a surviving `TempGroup`).
    #[error(transparent)]
    Mast(#[from] MastError),
}

//! The composed top-level error (spec §7: every component's error type is
//! distinguishable and composes without loss).

use std::path::PathBuf;

use parity_check::CheckError;
use parity_cst::LanguageFamily;
use parity_mast::MastError;
use parity_symbols::SymbolError;
use parity_transform::TransformError;
use parity_translate::TranslateError;
use thiserror::Error;

/// Everything that can go wrong building or deciding an analysis.
///
/// Each inner variant wraps one component's own error type untouched
/// (spec §7's "every component's error type is distinguishable"); the three
/// remaining variants belong to this crate's own driver logic ([`crate::build_ir`]
/// and [`crate::Analysis::new`]).
#[derive(Debug, Error)]
pub enum ParityError {
    /// CST → MAST translation failed (component B).
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// Symbolication failed (component C).
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    /// Renaming failed (component D).
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// Checking failed (component E).
    #[error(transparent)]
    Check(#[from] CheckError),
    /// A MAST invariant was violated outside any one component's own error
    /// path.
    #[error(transparent)]
    Mast(#[from] MastError),
    /// A file's extension did not resolve to any supported [`LanguageFamily`].
    #[error("{path}: unsupported extension {extension:?}")]
    UnsupportedExtension {
        /// The offending file's path.
        path: PathBuf,
        /// The extension that failed to resolve.
        extension: String,
    },
    /// A batch handed to [`crate::build_ir`] (or a base/last pair handed to
    /// [`crate::Analysis::new`]) mixed more than one [`LanguageFamily`]
    /// (spec §6: "refuse mixing incompatible languages in one call").
    #[error("{path}: expected language family {expected}, found {found}")]
    MixedLanguageFamilies {
        /// The offending file's path, or empty when the mismatch was
        /// detected between whole forests rather than a single file.
        path: PathBuf,
        /// The family the batch had already committed to.
        expected: LanguageFamily,
        /// The family this file (or forest) resolved to instead.
        found: LanguageFamily,
    },
    /// [`crate::build_ir`] was called with zero files, so no language
    /// family could be resolved.
    #[error("no files to analyze")]
    EmptyBatch,
}

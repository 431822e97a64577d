//! Decides whether two revisions of a source tree represent the same
//! observable behavior.
//!
//! This is the root crate of the engine: it wires together the five
//! components spec.md §2 describes — [`parity_mast`] (MAST + visitor),
//! [`parity_translate`] (CST → MAST), [`parity_symbols`] (symbolication),
//! [`parity_transform`] (the renamer), and [`parity_check`] (the
//! structural-equivalence checker) — behind the two driver operations §6
//! names: [`build_ir`] and [`Analysis::changes_eq`].
//!
//! Everything upstream of a built [`parity_cst::CstNode`] forest (the
//! concrete tree-sitter-style parser, the diff-partitioning stage that
//! decides which files need this engine at all, dispatch to the simpler
//! single-file analyzers for non-core formats) is an external collaborator
//! this crate never constructs — matching spec.md §1's scope boundary.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod outcome;

use std::path::Path;
use std::path::PathBuf;

use parity_cst::CstNode;
use parity_cst::LanguageFamily;
use parity_mast::NodeRef;
use parity_symbols::SymbolTable;
use tracing::instrument;

pub use config::EngineConfig;
pub use error::ParityError;
pub use outcome::Outcome;
pub use parity_check::MismatchReason;
pub use parity_check::MismatchTag;

/// A single input file handed to [`build_ir`]: its path (relative to the
/// analysis root, used only for diagnostics and the extension lookup) and
/// its already-parsed CST.
#[derive(Debug, Clone)]
pub struct SourceFile<N> {
    /// The file's path, relative to the `root_dir` the caller passed to
    /// [`build_ir`].
    pub path: PathBuf,
    /// The file's parsed concrete syntax tree.
    pub cst: N,
}

impl<N> SourceFile<N> {
    /// Pairs a path with its parsed CST.
    pub fn new(path: impl Into<PathBuf>, cst: N) -> Self {
        Self { path: path.into(), cst }
    }
}

/// A translated MAST forest for one side (`base` or `last`) of an analysis,
/// all belonging to the single [`LanguageFamily`] `build_ir` resolved the
/// batch to.
#[derive(Debug)]
pub struct Forest {
    /// The language family every root in this forest was translated from.
    pub family: LanguageFamily,
    /// One [`parity_mast::Node::Root`] per input file, in the order
    /// `build_ir` received them.
    pub roots: Vec<NodeRef>,
}

/// Builds a MAST forest from a batch of already-parsed source files (spec
/// §6's `buildIR(filesToAnalyze[], rootDir) → forest | err`).
///
/// `root_dir` is used only to resolve each file's extension for language-
/// family dispatch and to make path-based error messages relative; no
/// filesystem I/O happens here (parsing is an external collaborator's
/// responsibility — spec.md §1's "CLI, I/O, packaging" non-goal).
///
/// Refuses to mix language families in one call: every file in
/// `files_to_analyze` must resolve to the same [`LanguageFamily`], or an
/// extension that resolves to none at all, per spec §6's "refuse mixing
/// incompatible languages in one call".
#[instrument(level = "debug", skip_all, fields(file_count = files_to_analyze.len()))]
pub fn build_ir<N: CstNode>(files_to_analyze: &[SourceFile<N>], root_dir: &Path) -> Result<Forest, ParityError> {
    let mut family: Option<LanguageFamily> = None;
    let mut roots = Vec::with_capacity(files_to_analyze.len());

    for file in files_to_analyze {
        let extension = file.path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let this_family = LanguageFamily::from_extension(extension).ok_or_else(|| ParityError::UnsupportedExtension {
            path: root_dir.join(&file.path),
            extension: extension.to_string(),
        })?;
        match family {
            None => family = Some(this_family),
            Some(existing) if existing == this_family => {}
            Some(existing) => {
                return Err(ParityError::MixedLanguageFamilies {
                    path: root_dir.join(&file.path),
                    expected: existing,
                    found: this_family,
                });
            }
        }
        let root = parity_translate::translate_root(this_family, &file.cst)?;
        roots.push(root);
        tracing::debug!(path = %file.path.display(), "translated file to MAST");
    }

    let Some(family) = family else {
        return Err(ParityError::EmptyBatch);
    };
    Ok(Forest { family, roots })
}

/// A paired base/last analysis ready to be decided by [`Analysis::changes_eq`]
/// (spec §2's flow, steps 3-5: symbolicate, optionally rename, check).
#[derive(Debug)]
pub struct Analysis {
    config: EngineConfig,
    family: LanguageFamily,
    base_roots: Vec<NodeRef>,
    last_roots: Vec<NodeRef>,
}

impl Analysis {
    /// Pairs a base and last forest under one configuration.
    ///
    /// Both forests must share the same [`LanguageFamily`] — they came from
    /// two revisions of the same files, so a mismatch here means the
    /// caller built the two sides from different file sets.
    pub fn new(base: Forest, last: Forest, config: EngineConfig) -> Result<Self, ParityError> {
        if base.family != last.family {
            return Err(ParityError::MixedLanguageFamilies {
                path: PathBuf::new(),
                expected: base.family,
                found: last.family,
            });
        }
        Ok(Self {
            config,
            family: base.family,
            base_roots: base.roots,
            last_roots: last.roots,
        })
    }

    /// Runs the four inner stages — symbolicate both sides, optionally
    /// rename, then check — and decides whether `base` and `last` are
    /// equivalent (spec §6's `changesEq() → (bool, err)`, generalized to
    /// carry a best-effort [`MismatchReason`] on reject per SPEC_FULL's
    /// supplemented feature 1).
    #[instrument(level = "debug", skip_all, fields(family = %self.family, renaming_on = self.config.renaming_on, logging_on = self.config.logging_on))]
    pub fn changes_eq(&self) -> Result<(bool, Option<MismatchReason>), ParityError> {
        let base_symbols = parity_symbols::symbolicate(self.family, &self.base_roots)?;
        let last_symbols = parity_symbols::symbolicate(self.family, &self.last_roots)?;

        let (base_roots, last_roots, base_symbols, last_symbols) = if self.config.renaming_on {
            let base_renamed = parity_transform::rename(&self.base_roots, &base_symbols)?;
            let last_renamed = parity_transform::rename(&self.last_roots, &last_symbols)?;
            // Renaming produces a fresh forest, so the symbol tables built
            // against the original identifiers no longer describe it;
            // re-symbolicate the renamed forest before checking (spec
            // 4.D/5: the renamer returns a new forest, the original is
            // dropped once checking begins).
            let base_symbols = parity_symbols::symbolicate(self.family, &base_renamed)?;
            let last_symbols = parity_symbols::symbolicate(self.family, &last_renamed)?;
            (base_renamed, last_renamed, base_symbols, last_symbols)
        } else {
            (self.base_roots.clone(), self.last_roots.clone(), base_symbols, last_symbols)
        };

        let symbols: Option<(&SymbolTable, &SymbolTable)> = Some((&base_symbols, &last_symbols));
        let (equal, reason) = parity_check::run(self.family, &base_roots, &last_roots, symbols, self.config.logging_on)?;
        if equal {
            tracing::info!("approve");
        } else {
            tracing::info!(?reason, "reject");
        }
        Ok((equal, reason))
    }
}

/// A one-shot convenience wrapping [`build_ir`] and [`Analysis::changes_eq`]
/// into the three-outcome shape spec §6 describes at the top level (exit
/// codes 0/1/-1 for Approve/Reject/Failure).
pub fn analyze<N: CstNode>(base_files: &[SourceFile<N>], last_files: &[SourceFile<N>], root_dir: &Path, config: EngineConfig) -> Outcome {
    let result = (|| -> Result<(bool, Option<MismatchReason>), ParityError> {
        let base = build_ir(base_files, root_dir)?;
        let last = build_ir(last_files, root_dir)?;
        Analysis::new(base, last, config)?.changes_eq()
    })();

    match result {
        Ok((true, _)) => Outcome::Approve,
        Ok((false, reason)) => Outcome::Reject(reason),
        Err(err) => Outcome::Failure(err),
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::SimpleNode;
    use parity_cst::SimpleNodeBuilder;
    use parity_cst::Span;

    use super::*;

    fn leaf(kind: &str, text: &str) -> SimpleNode {
        SimpleNode::leaf(kind, text, Span::new(0, text.len()))
    }

    fn go_source_file() -> SimpleNode {
        let package = SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
            .field("name", leaf("package_identifier", "p"))
            .build();
        let ret = SimpleNodeBuilder::new("return_statement", Span::new(0, 1))
            .child(leaf("int_literal", "1"))
            .build();
        let body = SimpleNodeBuilder::new("block", Span::new(0, 1)).child(ret).build();
        let func = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "F"))
            .field("result", leaf("type_identifier", "int"))
            .field("body", body)
            .build();
        SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(package).child(func).build()
    }

    #[test]
    fn build_ir_refuses_mixed_extensions() {
        let files = vec![
            SourceFile::new("a.go", go_source_file()),
            SourceFile::new("b.java", go_source_file()),
        ];
        let err = build_ir(&files, Path::new("/repo")).unwrap_err();
        assert!(matches!(err, ParityError::MixedLanguageFamilies { .. }));
    }

    #[test]
    fn build_ir_refuses_unsupported_extension() {
        let files = vec![SourceFile::new("a.py", go_source_file())];
        let err = build_ir(&files, Path::new("/repo")).unwrap_err();
        assert!(matches!(err, ParityError::UnsupportedExtension { .. }));
    }

    #[test]
    fn end_to_end_approves_identical_files() {
        let base = vec![SourceFile::new("a.go", go_source_file())];
        let last = vec![SourceFile::new("a.go", go_source_file())];
        let outcome = analyze(&base, &last, Path::new("/repo"), EngineConfig::default());
        assert!(matches!(outcome, Outcome::Approve));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn end_to_end_rejects_on_structural_divergence() {
        let base = vec![SourceFile::new("a.go", go_source_file())];
        let mut other = go_source_file();
        // Swap in a body that returns a different literal so the two sides
        // genuinely diverge.
        other = {
            let package = SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
                .field("name", leaf("package_identifier", "p"))
                .build();
            let ret = SimpleNodeBuilder::new("return_statement", Span::new(0, 1))
                .child(leaf("int_literal", "2"))
                .build();
            let body = SimpleNodeBuilder::new("block", Span::new(0, 1)).child(ret).build();
            let func = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
                .field("name", leaf("identifier", "F"))
                .field("result", leaf("type_identifier", "int"))
                .field("body", body)
                .build();
            SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(package).child(func).build()
        };
        let last = vec![SourceFile::new("a.go", other)];
        let outcome = analyze(&base, &last, Path::new("/repo"), EngineConfig::default());
        assert!(matches!(outcome, Outcome::Reject(_)));
        assert_eq!(outcome.exit_code(), 1);
    }
}

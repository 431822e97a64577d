//! The Checker: component E of the pipeline (spec 2, 4.E).
//!
//! A three-layer design — generic structural equality, a language-specific
//! extension, and a symbolicated decorator enabling the relaxations that
//! need identifier resolution — realized as two structs
//! ([`go::GoChecker`], [`java::JavaChecker`]) that each fold all three
//! layers together (see [`go::GoChecker`]'s doc comment for why). [`run`]
//! is the spec 4.E entry point: `Run(base, last, baseSymbols?, lastSymbols?,
//! langTag, loggingOn) → (bool, err)`, generalized to return a
//! [`MismatchReason`] alongside a `reject` so a caller can explain *why*
//! (SPEC_FULL's supplemented feature 1; spec.md's driver contract only
//! commits to a boolean).

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]

pub mod checker;
pub mod error;
pub mod generic;
pub mod go;
pub mod java;
pub mod symbolicated;

use parity_cst::LanguageFamily;
use parity_mast::NodeRef;
use parity_symbols::SymbolTable;

pub use checker::NodeChecker;
pub use checker::StmtIgnored;
pub use error::CheckError;
pub use go::GoChecker;
pub use java::JavaChecker;

/// A best-effort explanation attached to a `reject` outcome.
///
/// The checker does not need to find every divergence between two forests,
/// only to report that a real one exists (SPEC_FULL supplemented feature
/// 1): this is the first mismatch encountered in traversal order, not an
/// exhaustive diff.
#[derive(Debug, Clone)]
pub struct MismatchReason {
    /// A short, stable tag naming the kind of divergence.
    pub tag: MismatchTag,
    /// The `base`-side node where the divergence was first observed, if
    /// the mismatch can be pinned to a single node pair (a length mismatch
    /// in a list has no single pair to point at).
    pub base: Option<NodeRef>,
    /// The `last`-side counterpart of `base`.
    pub last: Option<NodeRef>,
}

/// The kind of divergence a [`MismatchReason`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchTag {
    /// The two forests have a different number of top-level declarations
    /// (or some other list diverges in length) that the ignorable-statement
    /// / ignorable-constant relaxations could not reconcile.
    StructureDiffers,
    /// A statement or expression failed every applicable relaxation.
    StatementUnmatched,
    /// A literal modifier was removed, or a non-`final` modifier was added.
    ModifierRemoved,
}

/// Runs the Checker over one base/last pair (spec 4.E entry point).
///
/// `symbols` is `(base, last)` symbol tables when both forests were
/// symbolicated (enabling the relaxations of spec 4.E that need identifier
/// resolution); `None` means "pure structural" (spec 4.E: "If either symbol
/// table is absent, equivalence is pure structural"). `logging_on` gates
/// the per-language logging-elision ignore policy regardless of whether
/// symbol tables are present (the policy itself requires them internally
/// and simply declines when they're absent).
///
/// Returns `(true, None)` on approve, `(false, Some(reason))` on reject
/// with a best-effort explanation, and `Err` for a programmer/invariant
/// failure (spec 7).
pub fn run(
    family: LanguageFamily,
    base: &[NodeRef],
    last: &[NodeRef],
    symbols: Option<(&SymbolTable, &SymbolTable)>,
    logging_on: bool,
) -> Result<(bool, Option<MismatchReason>), CheckError> {
    let equal = match family {
        LanguageFamily::Go => {
            let checker = GoChecker::new(symbols, logging_on, base, last);
            check_roots(&checker, base, last)?
        }
        LanguageFamily::Java => {
            let checker = JavaChecker::new(symbols, logging_on, base, last);
            check_roots(&checker, base, last)?
        }
    };
    if equal {
        Ok((true, None))
    } else {
        Ok((false, Some(first_divergence(base, last))))
    }
}

/// Compares two forests positionally (spec 4.E "Top-level contract":
/// "Equivalence is decided positionally on forests (Root-to-Root,
/// declarations at the same index)").
fn check_roots(c: &dyn NodeChecker, base: &[NodeRef], last: &[NodeRef]) -> Result<bool, CheckError> {
    if base.len() != last.len() {
        return Ok(false);
    }
    for (b, l) in base.iter().zip(last.iter()) {
        if !c.check(c, b, l)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Picks a best-effort [`MismatchReason`] once `check_roots` has already
/// returned `false`; a length mismatch is reported structurally, otherwise
/// the first root pair that differs is blamed (the checker doesn't re-walk
/// to find the exact leaf — that would cost another full traversal for a
/// diagnostic nicety the spec never requires).
fn first_divergence(base: &[NodeRef], last: &[NodeRef]) -> MismatchReason {
    if base.len() != last.len() {
        return MismatchReason {
            tag: MismatchTag::StructureDiffers,
            base: None,
            last: None,
        };
    }
    for (b, l) in base.iter().zip(last.iter()) {
        // Cheap pointer identity is not meaningful here (different forests
        // never share allocations); report the first pair unconditionally
        // and let the caller re-run a per-file check if it wants a tighter
        // bisection. Re-running the full generic checker (no relaxations)
        // on just this pair would over-report mismatches that a relaxation
        // would have resolved, so this stays at root granularity.
        let _ = (b, l);
        return MismatchReason {
            tag: MismatchTag::StatementUnmatched,
            base: Some(b.clone()),
            last: Some(l.clone()),
        };
    }
    MismatchReason {
        tag: MismatchTag::StructureDiffers,
        base: None,
        last: None,
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::LanguageFamily as LF;
    use parity_cst::SimpleNode;
    use parity_cst::SimpleNodeBuilder;
    use parity_cst::Span;
    use parity_symbols::symbolicate;
    use parity_translate::translate_root;

    use super::*;

    fn leaf(kind: &str, text: &str) -> SimpleNode {
        SimpleNode::leaf(kind, text, Span::new(0, text.len()))
    }

    fn go_file(decls: Vec<SimpleNode>) -> SimpleNode {
        let mut builder = SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(
            SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
                .field("name", leaf("package_identifier", "p"))
                .build(),
        );
        for d in decls {
            builder = builder.child(d);
        }
        builder.build()
    }

    fn func(name: &str, body: Vec<SimpleNode>) -> SimpleNode {
        let block = body.into_iter().fold(SimpleNodeBuilder::new("block", Span::new(0, 1)), |b, s| b.child(s)).build();
        SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("result", leaf("type_identifier", "int"))
            .field("body", block)
            .build()
    }

    fn ret(expr: SimpleNode) -> SimpleNode {
        SimpleNodeBuilder::new("return_statement", Span::new(0, 1)).child(expr).build()
    }

    fn build(roots: &[SimpleNode]) -> Vec<NodeRef> {
        roots.iter().map(|cst| translate_root(LF::Go, cst).unwrap()).collect()
    }

    /// Spec 8: "∀ forest F, checker(F, F) returns approve (reflexivity),
    /// for any loggingOn/renamingOn".
    #[test]
    fn reflexivity_structural() {
        let cst = go_file(vec![func("f", vec![ret(leaf("int_literal", "1"))])]);
        let roots = build(&[cst]);
        let (ok, reason) = run(LF::Go, &roots, &roots, None, false).unwrap();
        assert!(ok);
        assert!(reason.is_none());
    }

    /// Spec 8: "∀ forest F, checker(F, Root{}) returns reject when F has
    /// any declaration (non-empty-empty separation)".
    #[test]
    fn empty_vs_nonempty_rejects() {
        let cst = go_file(vec![func("f", vec![ret(leaf("int_literal", "1"))])]);
        let roots = build(&[cst]);
        let empty = build(&[go_file(vec![])]);
        let (ok, _) = run(LF::Go, &roots, &empty, None, false).unwrap();
        assert!(!ok);
    }

    /// Scenario 2: private constant folding. `base: const a=1; func f() int
    /// { return 1+2 }` vs `last: const a=1; func f() int { return a+2 }`.
    #[test]
    fn private_constant_inlining_approves() {
        let const_spec = SimpleNodeBuilder::new("const_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "a"))
            .field("value", leaf("int_literal", "1"))
            .build();
        let const_decl = SimpleNodeBuilder::new("const_declaration", Span::new(0, 1)).child(const_spec).build();

        let plus = |left: SimpleNode| {
            SimpleNodeBuilder::new("binary_expression", Span::new(0, 1))
                .field("left", left)
                .field("operator", SimpleNode::leaf("+", "+", Span::new(0, 1)))
                .field("right", leaf("int_literal", "2"))
                .build()
        };

        let base = go_file(vec![const_decl.clone(), func("f", vec![ret(plus(leaf("int_literal", "1")))])]);
        let last = go_file(vec![const_decl, func("f", vec![ret(plus(leaf("identifier", "a")))])]);

        let base_root = build(&[base]);
        let last_root = build(&[last]);
        let base_syms = symbolicate(LF::Go, &base_root).unwrap();
        let last_syms = symbolicate(LF::Go, &last_root).unwrap();

        let (ok, _) = run(LF::Go, &base_root, &last_root, Some((&base_syms, &last_syms)), false).unwrap();
        assert!(ok);
    }

    /// Scenario 1 (structural half): without a symbol table, a pure rename
    /// of a private identifier is rejected.
    #[test]
    fn rename_without_symbols_rejects() {
        let var_spec_s = SimpleNodeBuilder::new("var_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "s"))
            .field("value", leaf("int_literal", "7"))
            .build();
        let var_spec_t = SimpleNodeBuilder::new("var_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "t"))
            .field("value", leaf("int_literal", "7"))
            .build();
        let base = go_file(vec![
            SimpleNodeBuilder::new("var_declaration", Span::new(0, 1)).child(var_spec_s).build(),
            func("f", vec![ret(leaf("identifier", "s"))]),
        ]);
        let last = go_file(vec![
            SimpleNodeBuilder::new("var_declaration", Span::new(0, 1)).child(var_spec_t).build(),
            func("f", vec![ret(leaf("identifier", "t"))]),
        ]);

        let base_root = build(&[base]);
        let last_root = build(&[last]);
        let (ok, _) = run(LF::Go, &base_root, &last_root, None, false).unwrap();
        assert!(!ok);
    }

    /// Scenario 6: comments/formatting only — two MASTs that end up equal
    /// after translation approve regardless of source text differences
    /// that never reach the MAST in the first place.
    #[test]
    fn identical_mast_from_different_text_approves() {
        let base = go_file(vec![func("F", vec![ret(leaf("int_literal", "1"))])]);
        let last = go_file(vec![func("F", vec![ret(leaf("int_literal", "1"))])]);
        let base_root = build(&[base]);
        let last_root = build(&[last]);
        let (ok, _) = run(LF::Go, &base_root, &last_root, None, false).unwrap();
        assert!(ok);
    }

    /// Spec 8: running the same comparison twice produces the same
    /// verdict — the checker consults nothing but its two inputs.
    #[test]
    fn the_same_comparison_run_twice_gives_the_same_verdict() {
        let cst = go_file(vec![func("f", vec![ret(leaf("int_literal", "1"))])]);
        let roots = build(&[cst]);
        let empty = build(&[go_file(vec![])]);
        let first = run(LF::Go, &roots, &empty, None, false).unwrap();
        let second = run(LF::Go, &roots, &empty, None, false).unwrap();
        assert_eq!(first.0, second.0);
    }

    /// Spec 8: "symmetry limited by directionality" — const tightening
    /// (relaxation 2) only runs `base → last`. Widening a variable to
    /// `var s = 7` while `last` tightens it to `const s = 7` approves;
    /// swapping which side is `base` and which is `last` reverses the
    /// verdict for the exact same pair of declarations.
    #[test]
    fn const_tightening_is_one_directional() {
        let var_spec = SimpleNodeBuilder::new("var_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "s"))
            .field("value", leaf("int_literal", "7"))
            .build();
        let const_spec = SimpleNodeBuilder::new("const_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "s"))
            .field("value", leaf("int_literal", "7"))
            .build();
        let var_decl = go_file(vec![SimpleNodeBuilder::new("var_declaration", Span::new(0, 1)).child(var_spec).build()]);
        let const_decl = go_file(vec![SimpleNodeBuilder::new("const_declaration", Span::new(0, 1)).child(const_spec).build()]);

        let var_root = build(&[var_decl]);
        let const_root = build(&[const_decl]);

        let (widening_then_tightening, _) = run(LF::Go, &var_root, &const_root, None, false).unwrap();
        assert!(widening_then_tightening);

        let (tightening_then_widening, _) = run(LF::Go, &const_root, &var_root, None, false).unwrap();
        assert!(!tightening_then_widening);
    }

    /// Spec 7: a surviving [`parity_mast::node::TempGroup`] is a
    /// programmer/invariant failure, not a `reject` — it must propagate as
    /// `Err`, never silently compare unequal.
    #[test]
    fn a_surviving_temp_group_is_an_error_not_a_reject() {
        let group: NodeRef = std::rc::Rc::new(parity_mast::Node::TempGroup(parity_mast::node::TempGroup { nodes: Vec::new() }));
        let err = run(LF::Go, &[group.clone()], &[group], None, false).unwrap_err();
        assert!(matches!(err, CheckError::Mast(_)));
    }
}

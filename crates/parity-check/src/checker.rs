//! The checker trait and the shared list/statement-sequence algorithms every
//! layer recurses through (spec 4.E, 9: "recursion via polymorphism").
//!
//! A [`NodeChecker`] is handed the outermost checker `c` on every call so a
//! language-specific or symbolicated layer can override one node shape and
//! still have its override picked up when a generic helper recurses into a
//! child — the same trick the Symbolicator's `LanguageHooks` dispatch uses.

use parity_mast::NodeRef;

use crate::error::CheckError;

/// The outcome of offering a statement to a language's ignorability policy
/// (spec 4.E relaxation 5).
#[derive(Debug, Clone)]
pub enum StmtIgnored {
    /// The statement is elided unconditionally; only this side advances.
    Elide,
    /// The statement is elided iff the other side's statement also elides
    /// to an equal, non-empty list of subexpressions.
    ConditionalOn(Vec<NodeRef>),
    /// The statement cannot be elided; it must match the other side
    /// structurally.
    Required,
}

/// A composable layer of the structural-equivalence checker.
///
/// `check` decides whether `a` and `b` are equivalent; `stmt_ignored` and
/// `decl_ignorable` are the two policy hooks the ignorable-statement and
/// constant-skipping relaxations consult. Every method takes the top of the
/// checker stack (`c`) so recursive calls dispatch back through any
/// override rather than back into `self`.
pub trait NodeChecker {
    /// Decides whether two nodes are equivalent.
    fn check(&self, c: &dyn NodeChecker, a: &NodeRef, b: &NodeRef) -> Result<bool, CheckError>;

    /// Decides whether a single statement may be elided from comparison
    /// (spec 4.E relaxation 5). The default never elides anything; only the
    /// symbolicated, logging-aware layers override this.
    fn stmt_ignored(&self, _c: &dyn NodeChecker, _stmt: &NodeRef) -> Result<StmtIgnored, CheckError> {
        Ok(StmtIgnored::Required)
    }

    /// Decides whether a declaration may be skipped from a declaration-list
    /// comparison because it is an ignorable private constant (spec 4.E
    /// relaxation 3's list form). The default never skips anything.
    fn decl_ignorable(&self, _c: &dyn NodeChecker, _decl: &NodeRef) -> Result<bool, CheckError> {
        Ok(false)
    }
}

/// Whether a `VariableDeclaration.is_const` transition from `base` to
/// `last` is admissible (spec 4.E relaxation 2): non-const may tighten to
/// const, never the reverse.
pub(crate) fn const_tightening_ok(base_is_const: bool, last_is_const: bool) -> bool {
    !base_is_const || last_is_const
}

/// Compares two optional children: both absent is equivalent, one absent is
/// not, both present recurses.
pub(crate) fn check_opt(c: &dyn NodeChecker, a: &Option<NodeRef>, b: &Option<NodeRef>) -> Result<bool, CheckError> {
    match (a, b) {
        (None, None) => Ok(true),
        (Some(x), Some(y)) => c.check(c, x, y),
        _ => Ok(false),
    }
}

/// Compares two sequences positionally (spec 3.1: "equivalence checks are
/// positional"), with no elision.
pub(crate) fn check_seq(c: &dyn NodeChecker, a: &[NodeRef], b: &[NodeRef]) -> Result<bool, CheckError> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b.iter()) {
        if !c.check(c, x, y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Compares two statement lists, consulting `c.stmt_ignored` for the
/// ignorable-statement relaxation (spec 4.E relaxation 5).
///
/// A two-pointer walk: at each step, if the base statement is
/// unconditionally ignorable it is skipped and only the base pointer
/// advances (symmetrically for last). Otherwise both statements are
/// compared directly, falling back to the "equal subexpression list"
/// contract when exactly one side offers a conditional elision.
pub(crate) fn check_statement_list(c: &dyn NodeChecker, base: &[NodeRef], last: &[NodeRef]) -> Result<bool, CheckError> {
    let mut i = 0;
    let mut j = 0;
    while i < base.len() || j < last.len() {
        let base_stmt = base.get(i);
        let last_stmt = last.get(j);

        let base_ignored = match base_stmt {
            Some(s) => c.stmt_ignored(c, s)?,
            None => StmtIgnored::Required,
        };
        let last_ignored = match last_stmt {
            Some(s) => c.stmt_ignored(c, s)?,
            None => StmtIgnored::Required,
        };

        match (base_stmt, last_stmt, base_ignored, last_ignored) {
            (Some(_), _, StmtIgnored::Elide, _) => {
                i += 1;
            }
            (_, Some(_), _, StmtIgnored::Elide) => {
                j += 1;
            }
            (Some(_), Some(_), StmtIgnored::ConditionalOn(bx), StmtIgnored::ConditionalOn(lx)) => {
                if !check_seq(c, &bx, &lx)? {
                    return Ok(false);
                }
                i += 1;
                j += 1;
            }
            (Some(bs), Some(ls), _, _) => {
                if !c.check(c, bs, ls)? {
                    return Ok(false);
                }
                i += 1;
                j += 1;
            }
            // One side ran out of statements while the other has a
            // non-elidable remainder: the lists diverge.
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Compares two declaration lists, consulting `c.decl_ignorable` for the
/// private-constant-skipping relaxation (spec 4.E relaxation 3's list
/// form): a declaration present only on one side may be dropped from the
/// comparison so long as it is itself an ignorable constant.
pub(crate) fn check_declaration_list(c: &dyn NodeChecker, base: &[NodeRef], last: &[NodeRef]) -> Result<bool, CheckError> {
    let mut i = 0;
    let mut j = 0;
    while i < base.len() || j < last.len() {
        match (base.get(i), last.get(j)) {
            (Some(bd), Some(ld)) => {
                if c.check(c, bd, ld)? {
                    i += 1;
                    j += 1;
                    continue;
                }
                if c.decl_ignorable(c, bd)? {
                    i += 1;
                    continue;
                }
                if c.decl_ignorable(c, ld)? {
                    j += 1;
                    continue;
                }
                return Ok(false);
            }
            (Some(bd), None) => {
                if !c.decl_ignorable(c, bd)? {
                    return Ok(false);
                }
                i += 1;
            }
            (None, Some(ld)) => {
                if !c.decl_ignorable(c, ld)? {
                    return Ok(false);
                }
                j += 1;
            }
            (None, None) => unreachable!(),
        }
    }
    Ok(true)
}

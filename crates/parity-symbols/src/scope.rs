//! The scope manager: a stack of name tables plus the package- and
//! `this`-scope side tables the spec calls for (3.3).

use std::rc::Rc;

use indexmap::IndexMap;
use parity_mast::node::IdentifierKind;

use crate::entry::SymbolTableEntry;
use crate::error::SymbolError;

/// A single lexical scope: a name table keyed by `(name, kind)`, plus the
/// scope's privacy.
///
/// `is_private` is decided once, at scope creation, and never re-evaluated
/// per identifier (spec 9, "Scope private-ness inheritance ... do not
/// re-evaluate per identifier").
#[derive(Debug)]
pub struct Scope {
    /// Whether declarations introduced directly in this scope are private
    /// by default (inherited from an enclosing private declaration, unless
    /// the declaration kind overrides it — see [`crate::entry`] callers).
    pub is_private: bool,
    names: IndexMap<String, IndexMap<IdentifierKind, Rc<SymbolTableEntry>>>,
}

impl Scope {
    /// Creates an empty scope with the given privacy.
    pub fn new(is_private: bool) -> Self {
        Self {
            is_private,
            names: IndexMap::new(),
        }
    }

    /// Declares a name of the given kind in this scope, returning the
    /// canonical entry now on record for it.
    ///
    /// Per spec 3.3, "at most one `Label` entry [may] coexist in a scope
    /// with one non-label entry of the same name" — any other same-name,
    /// same-kind redeclaration with a *different* declaration node is an
    /// [`SymbolError::IncompatibleRedeclaration`]; redeclaring the exact
    /// same declaration node (idempotent re-registration, e.g. package- or
    /// class-level pre-registration revisited during the normal walk) is a
    /// no-op that hands back the *existing* entry rather than `entry` —
    /// callers must link the declaring occurrence to the returned entry,
    /// not to `entry`, or the same declaration ends up split across two
    /// non-`Rc::ptr_eq` entries.
    pub fn declare(&mut self, name: &str, kind: IdentifierKind, entry: Rc<SymbolTableEntry>) -> Result<Rc<SymbolTableEntry>, SymbolError> {
        let by_kind = self.names.entry(name.to_string()).or_default();
        if let Some(existing) = by_kind.get(&kind) {
            if Rc::ptr_eq(existing, &entry) || std::ptr::eq(existing.declaration_node.as_ref(), entry.declaration_node.as_ref()) {
                return Ok(existing.clone());
            }
            return Err(SymbolError::IncompatibleRedeclaration { name: name.to_string() });
        }
        by_kind.insert(kind, entry.clone());
        Ok(entry)
    }

    /// Looks up a name of the given kind declared directly in this scope.
    pub fn lookup_here(&self, name: &str, kind: IdentifierKind) -> Option<&Rc<SymbolTableEntry>> {
        self.names.get(name).and_then(|by_kind| by_kind.get(&kind))
    }

    /// Looks up a name declared directly in this scope under any kind,
    /// preferring an exact kind match, then falling back to `Blanket`, then
    /// to whatever kind the name was actually declared under.
    ///
    /// A use-site identifier starts `Blanket` and is only narrowed to
    /// `Typ`/`Method`/`Function`/`Label` once translation or symbolication
    /// has enough context (spec 3.1's `IdentifierKind`); its declaration,
    /// meanwhile, is registered under whatever kind the declaring hook
    /// used, which will not always match. Falling through to "any kind
    /// under this name" keeps the two independent narrowing schedules from
    /// ever hiding an otherwise-unambiguous declaration from a use.
    pub fn lookup_here_any(&self, name: &str, kind: IdentifierKind) -> Option<&Rc<SymbolTableEntry>> {
        let by_kind = self.names.get(name)?;
        by_kind
            .get(&kind)
            .or_else(|| by_kind.get(&IdentifierKind::Blanket))
            .or_else(|| by_kind.values().next())
    }
}

/// The stack of scopes active during a single symbolication pass, plus the
/// cross-file package scope table and the Java-like `this`-scope stack
/// (spec 3.3).
#[derive(Debug, Default)]
pub struct ScopeManager {
    stack: Vec<Rc<std::cell::RefCell<Scope>>>,
    /// Package-level scopes, shared across every file of the same package
    /// so that package-level declarations are cross-file visible.
    package_scopes: IndexMap<String, Rc<std::cell::RefCell<Scope>>>,
    /// The innermost-class-body-first stack used to resolve `this.X` and
    /// `Y.this.X` in the Java-like language, each frame tagged with the
    /// simple name of the class body it belongs to so a qualified
    /// `Y.this` can find the enclosing class named `Y` rather than just
    /// the innermost one.
    this_scopes: Vec<(String, Rc<std::cell::RefCell<Scope>>)>,
}

impl ScopeManager {
    /// Creates an empty scope manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a fresh scope and returns it.
    pub fn push(&mut self, is_private: bool) -> Rc<std::cell::RefCell<Scope>> {
        let scope = Rc::new(std::cell::RefCell::new(Scope::new(is_private)));
        self.stack.push(scope.clone());
        scope
    }

    /// Pushes an existing (shared) scope, e.g. a package scope reused
    /// across files.
    pub fn push_shared(&mut self, scope: Rc<std::cell::RefCell<Scope>>) {
        self.stack.push(scope);
    }

    /// Pops the innermost scope.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Gets the innermost scope.
    pub fn current(&self) -> &Rc<std::cell::RefCell<Scope>> {
        self.stack.last().expect("scope stack is never empty during a walk")
    }

    /// Gets or creates the shared package-level scope for a package name.
    pub fn package_scope(&mut self, package: &str, is_private: bool) -> Rc<std::cell::RefCell<Scope>> {
        self.package_scopes
            .entry(package.to_string())
            .or_insert_with(|| Rc::new(std::cell::RefCell::new(Scope::new(is_private))))
            .clone()
    }

    /// Resolves a name by walking the scope stack from innermost to
    /// outermost, trying every kind before moving to the next scope (so
    /// that a locally-shadowing `Blanket` use resolves to the nearest
    /// enclosing declaration regardless of which kind it was registered
    /// under).
    pub fn resolve(&self, name: &str, kind: IdentifierKind) -> Option<Rc<SymbolTableEntry>> {
        for scope in self.stack.iter().rev() {
            let scope = scope.borrow();
            if let Some(entry) = scope.lookup_here_any(name, kind) {
                if entry.is_active.get() {
                    return Some(entry.clone());
                }
            }
        }
        None
    }

    /// Declares a name in the innermost scope, returning the canonical
    /// entry now on record for it (see [`Scope::declare`]).
    pub fn declare(&mut self, name: &str, kind: IdentifierKind, entry: Rc<SymbolTableEntry>) -> Result<Rc<SymbolTableEntry>, SymbolError> {
        self.current().borrow_mut().declare(name, kind, entry)
    }

    /// Pushes a Java-like `this` scope (a class body's scope, reused as the
    /// lexical scope already on the stack) tagged with the class's simple
    /// name.
    pub fn push_this_scope(&mut self, class_name: &str, scope: Rc<std::cell::RefCell<Scope>>) {
        self.this_scopes.push((class_name.to_string(), scope));
    }

    /// Pops the innermost `this` scope.
    pub fn pop_this_scope(&mut self) {
        self.this_scopes.pop();
    }

    /// Gets the innermost `this` scope, if any — the binding for a bare
    /// `this.X`.
    pub fn current_this_scope(&self) -> Option<&Rc<std::cell::RefCell<Scope>>> {
        self.this_scopes.last().map(|(_, scope)| scope)
    }

    /// Gets the `this` scope belonging to the nearest enclosing class body
    /// named `class_name`, innermost first — the binding for a qualified
    /// `Y.this.X` where `Y` is `class_name`.
    ///
    /// A nested class can shadow an outer class's simple name, so this
    /// must search innermost-first rather than assume names are unique
    /// across the enclosing chain.
    pub fn this_scope_named(&self, class_name: &str) -> Option<Rc<std::cell::RefCell<Scope>>> {
        self.this_scopes
            .iter()
            .rev()
            .find(|(name, _)| name == class_name)
            .map(|(_, scope)| scope.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SymbolTableEntry;
    use parity_cst::Span;
    use parity_mast::node::{Block, Identifier};
    use parity_mast::Node;
    use std::rc::Rc as StdRc;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name, IdentifierKind::Blanket, Span::new(0, name.len()))
    }

    fn dummy_decl() -> parity_mast::NodeRef {
        StdRc::new(Node::Block(Block { statements: Vec::new() }))
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut mgr = ScopeManager::new();
        mgr.push(false);
        let outer_id = ident("x");
        mgr.declare("x", IdentifierKind::Blanket, SymbolTableEntry::new(&outer_id, dummy_decl(), false))
            .unwrap();

        mgr.push(false);
        let inner_id = ident("x");
        let inner_entry = SymbolTableEntry::new(&inner_id, dummy_decl(), false);
        mgr.declare("x", IdentifierKind::Blanket, inner_entry.clone()).unwrap();

        let resolved = mgr.resolve("x", IdentifierKind::Blanket).unwrap();
        assert!(Rc::ptr_eq(&resolved, &inner_entry));
    }

    #[test]
    fn inactive_entries_are_invisible_to_resolve() {
        let mut mgr = ScopeManager::new();
        mgr.push(false);
        let id = ident("x");
        let entry = SymbolTableEntry::new_inactive(&id, dummy_decl(), false);
        mgr.declare("x", IdentifierKind::Blanket, entry.clone()).unwrap();
        assert!(mgr.resolve("x", IdentifierKind::Blanket).is_none());
        entry.is_active.set(true);
        assert!(mgr.resolve("x", IdentifierKind::Blanket).is_some());
    }

    #[test]
    fn package_scope_is_shared_across_calls() {
        let mut mgr = ScopeManager::new();
        let a = mgr.package_scope("p", false);
        let b = mgr.package_scope("p", false);
        assert!(Rc::ptr_eq(&a, &b));
    }
}

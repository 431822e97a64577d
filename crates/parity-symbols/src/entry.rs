//! The symbol table: a mapping from identifier occurrences to the
//! declaration entries they resolve to (spec 3.2).

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use parity_mast::ident_key;
use parity_mast::node::Identifier;
use parity_mast::IdentKey;
use parity_mast::NodeRef;

/// A single resolved declaration.
///
/// One `SymbolTableEntry` is created per declaring occurrence (a variable
/// name, a function name, a struct field, ...); every identifier
/// *occurrence* that resolves to that declaration — including the
/// declaring occurrence itself — links to the same, shared entry (hence
/// `Rc`: spec 3.4 calls for "logical pointers / arena indices, not owning
/// copies").
#[derive(Debug)]
pub struct SymbolTableEntry {
    /// The stable identity of the identifier that introduced this entry.
    pub identifier: IdentKey,
    /// The name, captured at creation time for diagnostics and for the
    /// Renamer's reporting (it does not need to re-walk to the declaration
    /// node just to print a name).
    pub name: String,
    /// The declaration node that owns this entry (a `Declaration`-kind
    /// [`parity_mast::Node`], or occasionally a `Statement`/support node
    /// for a Go-like label).
    pub declaration_node: NodeRef,
    /// Whether this declaration is private under the owning language's
    /// visibility rule (spec 3.2).
    pub is_private: Cell<bool>,
    /// Whether the entry is visible to active (non-speculative) lookups.
    ///
    /// An entry starts inactive when its own right-hand side may reference
    /// its own left-hand side (`x := &x{}`) and is flipped active once the
    /// declaration's traversal completes (spec 3.2, 4.C).
    pub is_active: Cell<bool>,
    /// Whether this declaration is a genuine compile-time constant eligible
    /// for the checker's constant-inlining relaxations (spec 4.E items 3,
    /// 4).
    ///
    /// Set directly at creation for a Go-like `const`; for the Java-like
    /// language the full rule ("final" *and* a primitive/String type *and*
    /// a constant-expression initializer) is only decidable once every
    /// declaration is visible, so it is set during
    /// [`crate::LanguageHooks::post_symbolication_fixup`] instead (spec
    /// 4.C's driver algorithm step 3).
    pub is_constant: Cell<bool>,
}

impl SymbolTableEntry {
    /// Creates a new entry, active by default.
    pub fn new(identifier: &Identifier, declaration_node: NodeRef, is_private: bool) -> Rc<Self> {
        Rc::new(Self {
            identifier: ident_key(identifier),
            name: identifier.name.clone(),
            declaration_node,
            is_private: Cell::new(is_private),
            is_active: Cell::new(true),
            is_constant: Cell::new(false),
        })
    }

    /// Creates a new entry that starts out inactive.
    pub fn new_inactive(identifier: &Identifier, declaration_node: NodeRef, is_private: bool) -> Rc<Self> {
        let entry = Self::new(identifier, declaration_node, is_private);
        entry.is_active.set(false);
        entry
    }
}

/// The result of linking an identifier occurrence.
///
/// An occurrence the symbolicator has looked at is always a key of the
/// table (spec 8's totality property), but not every occurrence resolves
/// to a declaration — an access path's non-leading field, for instance, is
/// deliberately linked to nothing (spec 4.C: "subsequent fields in the
/// path are linked to nil").
#[derive(Debug, Clone)]
pub enum Link {
    /// The occurrence resolved to a declaration.
    Resolved(Rc<SymbolTableEntry>),
    /// The occurrence was considered and deliberately left unresolved.
    Unresolved,
}

impl Link {
    /// Views the link as an `Option`, collapsing [`Link::Unresolved`] to
    /// `None`.
    pub fn entry(&self) -> Option<&Rc<SymbolTableEntry>> {
        match self {
            Link::Resolved(e) => Some(e),
            Link::Unresolved => None,
        }
    }
}

/// A mapping from identifier occurrences to the [`Link`] they resolve to,
/// plus the insertion order needed for deterministic iteration (spec 3.2,
/// 8: "symbolicate(F) is deterministic: running twice yields identical
/// (key, entry) pairs in the same insertion order").
#[derive(Debug, Default)]
pub struct SymbolTable {
    links: IndexMap<IdentKey, Link>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links an identifier occurrence to a declaration entry.
    ///
    /// At most one entry exists per occurrence (spec 3.2); calling this
    /// again for the same occurrence replaces the previous link rather than
    /// keeping both, matching `replaceLink`.
    pub fn add_link(&mut self, occurrence: &Identifier, entry: Rc<SymbolTableEntry>) {
        self.links.insert(ident_key(occurrence), Link::Resolved(entry));
    }

    /// Links an identifier occurrence directly by its stable key (used when
    /// the occurrence is not conveniently at hand).
    pub fn add_link_by_key(&mut self, key: IdentKey, entry: Rc<SymbolTableEntry>) {
        self.links.insert(key, Link::Resolved(entry));
    }

    /// Marks an identifier occurrence as deliberately unresolved (an access
    /// path's non-leading field, a map-constructor key, ...), satisfying
    /// the totality property without claiming a declaration.
    pub fn mark_unresolved(&mut self, occurrence: &Identifier) {
        self.links.insert(ident_key(occurrence), Link::Unresolved);
    }

    /// Removes the link for an occurrence, if any.
    pub fn remove_link(&mut self, occurrence: &Identifier) {
        self.links.shift_remove(&ident_key(occurrence));
    }

    /// Replaces the link for an occurrence.
    ///
    /// Identical to [`Self::add_link`]; kept as a separate name to mirror
    /// the data model's explicit `replaceLink` operation.
    pub fn replace_link(&mut self, occurrence: &Identifier, entry: Rc<SymbolTableEntry>) {
        self.add_link(occurrence, entry);
    }

    /// Looks up the declaration entry linked to an identifier occurrence.
    ///
    /// Returns `None` both when the occurrence was never linked and when it
    /// was explicitly marked unresolved; use [`Self::link`] to distinguish
    /// the two.
    pub fn declaration_entry(&self, occurrence: &Identifier) -> Option<&Rc<SymbolTableEntry>> {
        self.links.get(&ident_key(occurrence)).and_then(Link::entry)
    }

    /// Looks up the declaration entry linked to a raw identifier key.
    pub fn declaration_entry_by_key(&self, key: IdentKey) -> Option<&Rc<SymbolTableEntry>> {
        self.links.get(&key).and_then(Link::entry)
    }

    /// Looks up the raw link (resolved or deliberately unresolved) for an
    /// occurrence.
    pub fn link(&self, occurrence: &Identifier) -> Option<&Link> {
        self.links.get(&ident_key(occurrence))
    }

    /// Determines whether an occurrence has a link at all (resolved or
    /// deliberately unresolved).
    pub fn contains(&self, occurrence: &Identifier) -> bool {
        self.links.contains_key(&ident_key(occurrence))
    }

    /// Iterates every resolved entry in insertion order.
    ///
    /// Distinct occurrences resolving to the same declaration repeat that
    /// declaration's entry; callers that want distinct *declarations* (e.g.
    /// the Renamer assigning one canonical name per declaration) should
    /// dedupe by `Rc::ptr_eq`.
    pub fn ordered_symbols(&self) -> impl Iterator<Item = &Rc<SymbolTableEntry>> {
        self.links.values().filter_map(Link::entry)
    }

    /// The number of linked occurrences (resolved or not).
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the table has no links at all.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::Span;
    use parity_mast::node::IdentifierKind;
    use parity_mast::Node;
    use std::rc::Rc as StdRc;

    use super::*;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name, IdentifierKind::Blanket, Span::new(0, name.len()))
    }

    fn dummy_decl() -> NodeRef {
        StdRc::new(Node::Block(parity_mast::node::Block { statements: Vec::new() }))
    }

    #[test]
    fn links_are_keyed_by_occurrence_identity_not_name() {
        let mut table = SymbolTable::new();
        let a = ident("x");
        let b = ident("x");
        let entry = SymbolTableEntry::new(&a, dummy_decl(), false);
        table.add_link(&a, entry);
        assert!(table.contains(&a));
        assert!(!table.contains(&b));
    }

    #[test]
    fn ordered_symbols_preserves_insertion_order() {
        let mut table = SymbolTable::new();
        let names = ["a", "b", "c"];
        let idents: Vec<Identifier> = names.iter().map(|n| ident(n)).collect();
        for id in &idents {
            let entry = SymbolTableEntry::new(id, dummy_decl(), false);
            table.add_link(id, entry);
        }
        let seen: Vec<String> = table.ordered_symbols().map(|e| e.name.clone()).collect();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }
}

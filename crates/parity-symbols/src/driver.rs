//! The generic symbolication driver (spec 4.C).
//!
//! A single driver walks the forest and calls out to a per-language
//! [`LanguageHooks`] implementation at each step; the driver owns the scope
//! stack and symbol table so that the two language implementations never
//! duplicate that bookkeeping. The walk itself is [`parity_mast::walk`] —
//! the same pre/post visitor contract the Renamer and Checker build on —
//! rather than a hand-rolled recursion.

use std::rc::Rc;

use parity_mast::visitor::walk;
use parity_mast::visitor::Visitor;
use parity_mast::MastError;
use parity_mast::NodeRef;

use crate::entry::SymbolTableEntry;
use crate::error::SymbolError;
use crate::scope::ScopeManager;
use crate::SymbolTable;

/// The mutable state a [`LanguageHooks`] callback is given access to,
/// distinct from the per-language hook state itself.
#[derive(Debug)]
pub struct Cx<'a> {
    /// The active scope stack, package-scope table, and `this`-scope stack.
    pub scopes: &'a mut ScopeManager,
    /// The symbol table being built.
    pub table: &'a mut SymbolTable,
}

/// The per-language dispatch interface the generic driver defers to (spec
/// 4.C).
///
/// Every method is called once per node, for every node in the forest, in
/// the fixed order the driver imposes; a hook that has nothing to do for a
/// given node kind simply returns without touching `cx`. This mirrors the
/// spec's description exactly ("Each step is called by a driver in a fixed
/// pre-order sequence ... then recurse into children, then
/// postProcessDeclaration → processScope(onEnter=false)") rather than
/// having the driver pre-filter which hook applies to which node kind —
/// that filtering is each hook's own business.
pub trait LanguageHooks {
    /// Determines whether a declaration introduced in a scope of the given
    /// privacy is itself private, under the language's visibility rule
    /// (spec 3.2). `enclosing_private` is the innermost scope's privacy;
    /// most declarations simply inherit it, but some (Go-like struct
    /// fields) override it.
    fn is_declaration_private(&self, node: &NodeRef, enclosing_private: bool) -> Result<bool, SymbolError>;

    /// Registers any declaration(s) this node directly introduces into the
    /// current scope.
    ///
    /// Returns the entries created as *inactive* (spec 3.2, 4.C): the
    /// driver activates them once this node's subtree has been fully
    /// walked, by calling [`Self::post_process_declaration`].
    fn process_declaration(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<Vec<Rc<SymbolTableEntry>>, SymbolError>;

    /// Pushes (`on_enter = true`) or pops (`on_enter = false`) a scope for
    /// a scope-introducing node (spec 4.C's "Scopes created" list).
    fn process_scope(&mut self, cx: &mut Cx<'_>, node: &NodeRef, on_enter: bool) -> Result<(), SymbolError>;

    /// Resolves identifier *use* positions this node is responsible for
    /// (e.g. an access path's base identifier).
    fn process_use(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<(), SymbolError>;

    /// The catch-all step: anything not handled by the other hooks,
    /// including the pre-registration pass the driver runs over every
    /// `Root` before the main walk (spec 4.C driver algorithm step 1).
    fn process_other(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<(), SymbolError>;

    /// Runs after this node's subtree has been fully walked; activates any
    /// entries this node created inactive.
    fn post_process_declaration(
        &mut self,
        cx: &mut Cx<'_>,
        node: &NodeRef,
        pending: &[Rc<SymbolTableEntry>],
    ) -> Result<(), SymbolError>;

    /// Runs once, after every root in the forest has been walked (spec
    /// 4.C driver algorithm step 3): amends entries that needed all
    /// declarations to be visible before they could be finalized (Go-like
    /// keyed-constructor field resolution, Java-like "truly constant"
    /// determination).
    fn post_symbolication_fixup(&mut self, cx: &mut Cx<'_>) -> Result<(), SymbolError>;
}

/// Drives a [`LanguageHooks`] implementation over a forest of `Root`s,
/// producing the resulting [`SymbolTable`].
#[derive(Debug)]
pub struct Symbolicator<H> {
    scopes: ScopeManager,
    table: SymbolTable,
    hooks: H,
}

/// Adapts a [`LanguageHooks`] implementation to [`parity_mast::Visitor`],
/// stashing the pending-entries list per stack frame so `post` can hand it
/// back to [`LanguageHooks::post_process_declaration`].
struct HookVisitor<'a, H> {
    scopes: &'a mut ScopeManager,
    table: &'a mut SymbolTable,
    hooks: &'a mut H,
    pending_stack: Vec<Vec<Rc<SymbolTableEntry>>>,
    error: Option<SymbolError>,
}

impl<H: LanguageHooks> Visitor for HookVisitor<'_, H> {
    fn pre(&mut self, node: &NodeRef) -> Result<bool, MastError> {
        if self.error.is_some() {
            return Ok(false);
        }
        match self.run_pre(node) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.error = Some(err);
                Ok(false)
            }
        }
    }

    fn post(&mut self, node: &NodeRef) -> Result<(), MastError> {
        if self.error.is_some() {
            return Ok(());
        }
        if let Err(err) = self.run_post(node) {
            self.error = Some(err);
        }
        Ok(())
    }
}

impl<H: LanguageHooks> HookVisitor<'_, H> {
    fn run_pre(&mut self, node: &NodeRef) -> Result<(), SymbolError> {
        let pending = {
            let mut cx = Cx {
                scopes: self.scopes,
                table: self.table,
            };
            self.hooks.process_declaration(&mut cx, node)?
        };
        self.pending_stack.push(pending);

        let mut cx = Cx {
            scopes: self.scopes,
            table: self.table,
        };
        self.hooks.process_scope(&mut cx, node, true)?;
        self.hooks.process_use(&mut cx, node)?;
        self.hooks.process_other(&mut cx, node)?;
        Ok(())
    }

    fn run_post(&mut self, node: &NodeRef) -> Result<(), SymbolError> {
        let pending = self.pending_stack.pop().unwrap_or_default();
        let mut cx = Cx {
            scopes: self.scopes,
            table: self.table,
        };
        self.hooks.post_process_declaration(&mut cx, node, &pending)?;
        self.hooks.process_scope(&mut cx, node, false)?;
        Ok(())
    }
}

impl<H: LanguageHooks> Symbolicator<H> {
    /// Creates a driver around a fresh scope manager and symbol table.
    pub fn new(hooks: H) -> Self {
        Self {
            scopes: ScopeManager::new(),
            table: SymbolTable::new(),
            hooks,
        }
    }

    /// Symbolicates every root in `roots`, returning the finished table.
    ///
    /// Roots are typically every file of one analysis side (base, or
    /// last) for a single language family; passing every file of a
    /// Go-like package together is what makes package-level cross-file
    /// visibility (spec 4.C) work, since the pre-registration pass below
    /// runs over all of them before any file's normal walk begins.
    pub fn run(mut self, roots: &[NodeRef]) -> Result<SymbolTable, SymbolError> {
        for root in roots {
            let mut cx = Cx {
                scopes: &mut self.scopes,
                table: &mut self.table,
            };
            self.hooks.process_other(&mut cx, root)?;
        }

        for root in roots {
            // Every root gets its own file-level base scope so that a
            // declaration visited before any language-specific scope has
            // been pushed (e.g. the first top-level declaration right
            // after a package clause whose own scope has already been
            // popped) always has a scope to ask about privacy.
            self.scopes.push(false);
            let mut visitor = HookVisitor {
                scopes: &mut self.scopes,
                table: &mut self.table,
                hooks: &mut self.hooks,
                pending_stack: Vec::new(),
                error: None,
            };
            walk(root, &mut visitor)?;
            self.scopes.pop();
            if let Some(err) = visitor.error {
                return Err(err);
            }
        }

        let mut cx = Cx {
            scopes: &mut self.scopes,
            table: &mut self.table,
        };
        self.hooks.post_symbolication_fixup(&mut cx)?;

        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use parity_mast::node::{Block, Root};
    use parity_mast::Node;

    use super::*;

    /// Records, in order, every driver call it receives, through a shared
    /// log that outlives the hooks themselves — `Symbolicator::run` takes
    /// `self` by value, so a test needs a handle independent of the
    /// `Symbolicator` to inspect call order once `run` returns.
    #[derive(Default)]
    struct RecordingHooks {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl LanguageHooks for RecordingHooks {
        fn is_declaration_private(&self, _node: &NodeRef, enclosing_private: bool) -> Result<bool, SymbolError> {
            Ok(enclosing_private)
        }

        fn process_declaration(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<Vec<Rc<SymbolTableEntry>>, SymbolError> {
            self.calls.borrow_mut().push("process_declaration");
            Ok(Vec::new())
        }

        fn process_scope(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef, on_enter: bool) -> Result<(), SymbolError> {
            self.calls.borrow_mut().push(if on_enter { "process_scope(enter)" } else { "process_scope(exit)" });
            Ok(())
        }

        fn process_use(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<(), SymbolError> {
            self.calls.borrow_mut().push("process_use");
            Ok(())
        }

        fn process_other(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<(), SymbolError> {
            self.calls.borrow_mut().push("process_other");
            Ok(())
        }

        fn post_process_declaration(
            &mut self,
            _cx: &mut Cx<'_>,
            _node: &NodeRef,
            _pending: &[Rc<SymbolTableEntry>],
        ) -> Result<(), SymbolError> {
            self.calls.borrow_mut().push("post_process_declaration");
            Ok(())
        }

        fn post_symbolication_fixup(&mut self, _cx: &mut Cx<'_>) -> Result<(), SymbolError> {
            self.calls.borrow_mut().push("post_symbolication_fixup");
            Ok(())
        }
    }

    fn leaf_root() -> NodeRef {
        Rc::new(Node::Root(Root {
            declarations: vec![Rc::new(Node::Block(Block { statements: Vec::new() }))],
        }))
    }

    #[test]
    fn run_calls_process_other_over_every_root_before_any_walk_then_fixup_once_at_the_end() {
        let roots = vec![leaf_root(), leaf_root()];
        let log = Rc::new(RefCell::new(Vec::new()));
        let hooks = RecordingHooks { calls: log.clone() };

        Symbolicator::new(hooks).run(&roots).unwrap();

        let calls = log.borrow();
        // One `process_other` per root up front (the pre-registration pass,
        // spec 4.C driver step 1), before either root's walk produces any
        // `process_declaration`/`process_scope`/`process_use` call; then one
        // `post_symbolication_fixup` at the very end (step 3), after both
        // roots have been fully walked.
        assert_eq!(calls[0], "process_other");
        assert_eq!(calls[1], "process_other");
        assert_eq!(*calls.last().unwrap(), "post_symbolication_fixup");
        assert_eq!(calls.iter().filter(|c| **c == "post_symbolication_fixup").count(), 1);
        assert_eq!(calls.iter().filter(|c| **c == "process_other").count(), 2);
    }

    #[test]
    fn walk_visits_declaration_scope_use_and_other_in_the_documented_order_then_unwinds_child_first() {
        let root = leaf_root();
        let mut scopes = ScopeManager::new();
        scopes.push(false);
        let mut table = SymbolTable::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = RecordingHooks { calls: log.clone() };
        {
            let mut visitor = HookVisitor {
                scopes: &mut scopes,
                table: &mut table,
                hooks: &mut hooks,
                pending_stack: Vec::new(),
                error: None,
            };
            parity_mast::visitor::walk(&root, &mut visitor).unwrap();
            assert!(visitor.error.is_none());
        }
        // `pre` on the root: declaration, scope(enter), use, other; then the
        // same for its one child (the empty block); `post` then unwinds
        // child-first: post_process_declaration, scope(exit), twice.
        assert_eq!(
            log.borrow().as_slice(),
            &[
                "process_declaration",
                "process_scope(enter)",
                "process_use",
                "process_other",
                "process_declaration",
                "process_scope(enter)",
                "process_use",
                "process_other",
                "post_process_declaration",
                "process_scope(exit)",
                "post_process_declaration",
                "process_scope(exit)",
            ]
        );
    }

    /// A hook error aborts the whole pass rather than partially succeeding
    /// (spec 4.C's "the symbolicator never partially succeeds").
    #[test]
    fn a_hook_error_short_circuits_the_whole_run() {
        struct FailingHooks;
        impl LanguageHooks for FailingHooks {
            fn is_declaration_private(&self, _node: &NodeRef, enclosing_private: bool) -> Result<bool, SymbolError> {
                Ok(enclosing_private)
            }
            fn process_declaration(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<Vec<Rc<SymbolTableEntry>>, SymbolError> {
                Err(SymbolError::UnexpectedDeclarationForPrivacy)
            }
            fn process_scope(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef, _on_enter: bool) -> Result<(), SymbolError> {
                Ok(())
            }
            fn process_use(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<(), SymbolError> {
                Ok(())
            }
            fn process_other(&mut self, _cx: &mut Cx<'_>, _node: &NodeRef) -> Result<(), SymbolError> {
                Ok(())
            }
            fn post_process_declaration(
                &mut self,
                _cx: &mut Cx<'_>,
                _node: &NodeRef,
                _pending: &[Rc<SymbolTableEntry>],
            ) -> Result<(), SymbolError> {
                Ok(())
            }
            fn post_symbolication_fixup(&mut self, _cx: &mut Cx<'_>) -> Result<(), SymbolError> {
                Ok(())
            }
        }

        let roots = vec![leaf_root()];
        let err = Symbolicator::new(FailingHooks).run(&roots).unwrap_err();
        assert!(matches!(err, SymbolError::UnexpectedDeclarationForPrivacy));
    }
}

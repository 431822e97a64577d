//! Symbolication hooks for the Go-like language (spec 4.C).

use std::collections::HashSet;
use std::rc::Rc;

use parity_mast::node::Declaration;
use parity_mast::node::Expression;
use parity_mast::node::IdentifierKind;
use parity_mast::node::Node;
use parity_mast::{ident_key, IdentKey, NodeRef};

use crate::driver::Cx;
use crate::driver::LanguageHooks;
use crate::entry::SymbolTableEntry;
use crate::error::SymbolError;

/// Determines Go-like visibility from a name's first rune: lowercase or `_`
/// is unexported (private); anything else, including an empty name, is
/// exported.
fn is_go_name_private(name: &str) -> bool {
    match name.chars().next() {
        Some(c) => c == '_' || c.is_lowercase(),
        None => true,
    }
}

/// Hooks implementing the Go-like half of the symbolicator.
///
/// Holds the scratch state the generic driver doesn't: the set of
/// identifier occurrences a parent node has already linked and that the
/// generic `Expression::Identifier` case must therefore not re-resolve
/// (spec 9's "do not re-process" set), the entity-creation nodes deferred
/// to `postSymbolicationFixup`, and the privacy computed for a `type`
/// declaration so the struct/interface type it wraps can reuse it when its
/// own scope is pushed one recursion level down.
#[derive(Debug, Default)]
pub struct GoHooks {
    ignore: HashSet<IdentKey>,
    pending_entity_creations: Vec<NodeRef>,
    pending_type_privacy: Option<bool>,
    /// The package of the root currently being walked, so a use that the
    /// scope stack can't see (the package scope is only on the stack for
    /// the brief span of the `package` clause's own subtree) still finds
    /// package-level declarations.
    current_package: Option<String>,
}

impl GoHooks {
    /// Creates a fresh set of Go-like hooks.
    pub fn new() -> Self {
        Self::default()
    }

    fn declare_name(
        &mut self,
        cx: &mut Cx<'_>,
        name: &parity_mast::node::Identifier,
        owner: &NodeRef,
        is_private: bool,
        active: bool,
    ) -> Result<Rc<SymbolTableEntry>, SymbolError> {
        let entry = if active {
            SymbolTableEntry::new(name, owner.clone(), is_private)
        } else {
            SymbolTableEntry::new_inactive(name, owner.clone(), is_private)
        };
        let entry = if name.name != "_" {
            cx.scopes.declare(&name.name, IdentifierKind::Blanket, entry)?
        } else {
            entry
        };
        cx.table.add_link_by_key(ident_key(name), entry.clone());
        Ok(entry)
    }

    fn resolve_use(&mut self, cx: &mut Cx<'_>, id: &parity_mast::node::Identifier) {
        if self.ignore.contains(&ident_key(id)) {
            return;
        }
        if let Some(entry) = cx.scopes.resolve(&id.name, id.kind.get()) {
            cx.table.add_link_by_key(ident_key(id), entry);
            return;
        }
        if let Some(package) = self.current_package.clone() {
            let scope = cx.scopes.package_scope(&package, false);
            let found = scope.borrow().lookup_here_any(&id.name, id.kind.get()).filter(|e| e.is_active.get()).cloned();
            if let Some(entry) = found {
                cx.table.add_link_by_key(ident_key(id), entry);
                return;
            }
        }
        cx.table.mark_unresolved(id);
    }
}

impl LanguageHooks for GoHooks {
    fn is_declaration_private(&self, node: &NodeRef, enclosing_private: bool) -> Result<bool, SymbolError> {
        let Node::Declaration(decl) = node.as_ref() else {
            return Ok(enclosing_private);
        };
        match decl {
            // Public fields may occur in a private struct: the generic
            // inheritance rule is overridden for field declarations.
            Declaration::Field(f) => Ok(f.name.as_ref().map(|n| is_go_name_private(&n.name)).unwrap_or(true)),
            Declaration::Variable(v) => {
                if enclosing_private {
                    return Ok(true);
                }
                Ok(v.names.first().map(|n| is_go_name_private(&n.name)).unwrap_or(true))
            }
            Declaration::Function(f) => {
                if enclosing_private {
                    return Ok(true);
                }
                Ok(is_go_name_private(&f.name.name))
            }
            Declaration::Type(t) => {
                if enclosing_private {
                    return Ok(true);
                }
                Ok(is_go_name_private(&t.name.name))
            }
            _ => Ok(enclosing_private),
        }
    }

    fn process_declaration(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<Vec<Rc<SymbolTableEntry>>, SymbolError> {
        match node.as_ref() {
            Node::Declaration(Declaration::Package(p)) => {
                cx.table.mark_unresolved(&p.name);
                Ok(Vec::new())
            }
            Node::Declaration(Declaration::Import(i)) => {
                if let Some(alias) = &i.alias {
                    let entry = self.declare_name(cx, alias, node, false, true)?;
                    return Ok(vec![entry]);
                }
                Ok(Vec::new())
            }
            Node::Declaration(Declaration::Variable(v)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                let mut pending = Vec::with_capacity(v.names.len());
                for name in &v.names {
                    let entry = self.declare_name(cx, name, node, is_private, false)?;
                    if v.is_const {
                        entry.is_constant.set(true);
                    }
                    pending.push(entry);
                }
                Ok(pending)
            }
            Node::Declaration(Declaration::Function(f)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                let entry = self.declare_name(cx, &f.name, node, is_private, true)?;
                Ok(vec![entry])
            }
            Node::Declaration(Declaration::Type(t)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                let entry = self.declare_name(cx, &t.name, node, is_private, true)?;
                self.pending_type_privacy = Some(is_private);
                Ok(vec![entry])
            }
            Node::Declaration(Declaration::Field(field)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                match &field.name {
                    Some(name) => Ok(vec![self.declare_name(cx, name, node, is_private, true)?]),
                    None => Ok(Vec::new()),
                }
            }
            Node::Declaration(Declaration::Parameter(p)) => match &p.name {
                Some(name) => Ok(vec![self.declare_name(cx, name, node, true, true)?]),
                None => Ok(Vec::new()),
            },
            Node::Declaration(Declaration::EntityCreation(entity)) => {
                if let Some(value) = &entity.value {
                    let mut any_keyed = false;
                    for element in &value.values {
                        if let Node::KeyValuePair(kv) = element.as_ref() {
                            if let Node::Expression(Expression::Identifier(key_id)) = kv.key.as_ref() {
                                any_keyed = true;
                                self.ignore.insert(ident_key(key_id));
                                cx.table.mark_unresolved(key_id);
                            }
                        }
                    }
                    if any_keyed {
                        self.pending_entity_creations.push(node.clone());
                    }
                }
                Ok(Vec::new())
            }
            Node::Statement(parity_mast::node::Statement::Label(label)) => {
                let entry = SymbolTableEntry::new(&label.label, node.clone(), true);
                cx.scopes.declare(&label.label.name, IdentifierKind::Label, entry.clone())?;
                cx.table.add_link_by_key(ident_key(&label.label), entry.clone());
                Ok(vec![entry])
            }
            Node::Expression(Expression::Assignment(a)) if a.is_short_var_decl => {
                let mut pending = Vec::new();
                for left in &a.left {
                    let Node::Expression(Expression::Identifier(id)) = left.as_ref() else {
                        continue;
                    };
                    self.ignore.insert(ident_key(id));
                    if id.name == "_" {
                        let entry = SymbolTableEntry::new_inactive(id, node.clone(), true);
                        cx.table.add_link_by_key(ident_key(id), entry.clone());
                        pending.push(entry);
                        continue;
                    }
                    let existing = cx
                        .scopes
                        .current()
                        .borrow()
                        .lookup_here_any(&id.name, IdentifierKind::Blanket)
                        .cloned();
                    if let Some(existing) = existing {
                        cx.table.add_link_by_key(ident_key(id), existing);
                        continue;
                    }
                    let is_private = is_go_name_private(&id.name);
                    let entry = self.declare_name(cx, id, node, is_private, false)?;
                    pending.push(entry);
                }
                Ok(pending)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn process_scope(&mut self, cx: &mut Cx<'_>, node: &NodeRef, on_enter: bool) -> Result<(), SymbolError> {
        let is_scoping = matches!(
            node.as_ref(),
            Node::Block(_)
                | Node::Statement(parity_mast::node::Statement::If(_))
                | Node::Statement(parity_mast::node::Statement::For(_))
                | Node::Statement(parity_mast::node::Statement::ForRange(_))
                | Node::Statement(parity_mast::node::Statement::Switch(_))
                | Node::SwitchCase(_)
                | Node::CommunicationCase(_)
                | Node::Declaration(Declaration::Function(_))
                | Node::Declaration(Declaration::FunctionLiteral(_))
                | Node::Expression(Expression::StructType(_))
                | Node::Expression(Expression::InterfaceType(_))
                | Node::Declaration(Declaration::Package(_))
        );
        if !is_scoping {
            return Ok(());
        }

        if on_enter {
            let privacy = match node.as_ref() {
                Node::Declaration(Declaration::Package(p)) => {
                    let scope = cx.scopes.package_scope(&p.name.name, false);
                    cx.scopes.push_shared(scope);
                    return Ok(());
                }
                Node::Declaration(Declaration::Function(_)) | Node::Declaration(Declaration::FunctionLiteral(_)) => {
                    cx.scopes.current().borrow().is_private
                }
                Node::Expression(Expression::StructType(_)) | Node::Expression(Expression::InterfaceType(_)) => self
                    .pending_type_privacy
                    .take()
                    .unwrap_or_else(|| cx.scopes.current().borrow().is_private),
                _ => cx.scopes.current().borrow().is_private,
            };
            cx.scopes.push(privacy);
        } else {
            cx.scopes.pop();
        }
        Ok(())
    }

    fn process_use(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<(), SymbolError> {
        match node.as_ref() {
            Node::Expression(Expression::Identifier(id)) => self.resolve_use(cx, id),
            Node::Expression(Expression::AccessPath(path)) => {
                cx.table.mark_unresolved(&path.field);
            }
            Node::Statement(parity_mast::node::Statement::Continue(s)) => {
                if let Some(label) = &s.label {
                    match cx.scopes.resolve(&label.name, IdentifierKind::Label) {
                        Some(entry) => cx.table.add_link_by_key(ident_key(label), entry),
                        None => cx.table.mark_unresolved(label),
                    }
                }
            }
            Node::Statement(parity_mast::node::Statement::Break(s)) => {
                if let Some(label) = &s.label {
                    match cx.scopes.resolve(&label.name, IdentifierKind::Label) {
                        Some(entry) => cx.table.add_link_by_key(ident_key(label), entry),
                        None => cx.table.mark_unresolved(label),
                    }
                }
            }
            Node::Statement(parity_mast::node::Statement::Goto(s)) => match cx.scopes.resolve(&s.label.name, IdentifierKind::Label) {
                Some(entry) => cx.table.add_link_by_key(ident_key(&s.label), entry),
                None => cx.table.mark_unresolved(&s.label),
            },
            _ => {}
        }
        Ok(())
    }

    fn process_other(&mut self, cx: &mut Cx<'_>, node: &NodeRef) -> Result<(), SymbolError> {
        if let Node::Root(root) = node.as_ref() {
            let package_name = root.declarations.iter().find_map(|d| match d.as_ref() {
                Node::Declaration(Declaration::Package(p)) => Some(p.name.name.clone()),
                _ => None,
            });
            self.current_package = package_name.clone();
            let Some(package_name) = package_name else {
                return Ok(());
            };
            let package_scope = cx.scopes.package_scope(&package_name, false);
            for decl in &root.declarations {
                let (name, is_private, active) = match decl.as_ref() {
                    Node::Declaration(Declaration::Function(f)) => (Some(&f.name), self.is_declaration_private(decl, false)?, true),
                    Node::Declaration(Declaration::Type(t)) => (Some(&t.name), self.is_declaration_private(decl, false)?, true),
                    Node::Declaration(Declaration::Variable(v)) => {
                        for name in &v.names {
                            if name.name == "_" {
                                continue;
                            }
                            let is_private = is_go_name_private(&name.name);
                            let entry = SymbolTableEntry::new_inactive(name, decl.clone(), is_private);
                            package_scope.borrow_mut().declare(&name.name, IdentifierKind::Blanket, entry)?;
                        }
                        continue;
                    }
                    _ => continue,
                };
                if let Some(name) = name {
                    let entry = if active {
                        SymbolTableEntry::new(name, decl.clone(), is_private)
                    } else {
                        SymbolTableEntry::new_inactive(name, decl.clone(), is_private)
                    };
                    package_scope.borrow_mut().declare(&name.name, IdentifierKind::Blanket, entry)?;
                }
            }
        }
        Ok(())
    }

    fn post_process_declaration(
        &mut self,
        _cx: &mut Cx<'_>,
        node: &NodeRef,
        pending: &[Rc<SymbolTableEntry>],
    ) -> Result<(), SymbolError> {
        let activates = matches!(
            node.as_ref(),
            Node::Declaration(Declaration::Variable(_)) | Node::Expression(Expression::Assignment(_))
        );
        if activates {
            for entry in pending {
                entry.is_active.set(true);
            }
        }
        Ok(())
    }

    fn post_symbolication_fixup(&mut self, cx: &mut Cx<'_>) -> Result<(), SymbolError> {
        for entity_node in std::mem::take(&mut self.pending_entity_creations) {
            let Node::Declaration(Declaration::EntityCreation(entity)) = entity_node.as_ref() else {
                continue;
            };
            let Some(value) = &entity.value else { continue };

            let struct_fields = resolve_struct_fields(cx, &entity.r#type);
            let Some(struct_fields) = struct_fields else {
                // Not a resolvable struct type (a map constructor, or an
                // unresolvable type): every keyed key stays unresolved.
                continue;
            };

            for element in &value.values {
                let Node::KeyValuePair(kv) = element.as_ref() else { continue };
                let Node::Expression(Expression::Identifier(key_id)) = kv.key.as_ref() else {
                    continue;
                };
                if let Some(field_entry) = struct_fields.iter().find(|f| f.name == key_id.name) {
                    cx.table.add_link_by_key(ident_key(key_id), field_entry.clone());
                }
                // No match: the speculative unresolved link set during the
                // walk already stands, so there is nothing to remove.
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::LanguageFamily;
    use parity_cst::SimpleNode;
    use parity_cst::SimpleNodeBuilder;
    use parity_cst::Span;
    use parity_translate::translate_root;

    use super::*;
    use crate::symbolicate;

    fn leaf(kind: &str, text: &str) -> SimpleNode {
        SimpleNode::leaf(kind, text, Span::new(0, text.len()))
    }

    fn package(name: &str) -> SimpleNode {
        SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
            .field("name", leaf("package_identifier", name))
            .build()
    }

    #[test]
    fn private_names_are_lowercase_or_underscore() {
        assert!(is_go_name_private("x"));
        assert!(is_go_name_private("_ignored"));
        assert!(!is_go_name_private("X"));
        assert!(!is_go_name_private(""));
    }

    #[test]
    fn package_level_forward_reference_resolves() {
        // func g() int { return f() }
        // func f() int { return 1 }
        let call_f = SimpleNodeBuilder::new("call_expression", Span::new(0, 1))
            .field("function", leaf("identifier", "f"))
            .build();
        let g = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "g"))
            .field("result", leaf("type_identifier", "int"))
            .field(
                "body",
                SimpleNodeBuilder::new("block", Span::new(0, 1))
                    .child(SimpleNodeBuilder::new("return_statement", Span::new(0, 1)).child(call_f).build())
                    .build(),
            )
            .build();
        let f = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "f"))
            .field("result", leaf("type_identifier", "int"))
            .field(
                "body",
                SimpleNodeBuilder::new("block", Span::new(0, 1))
                    .child(SimpleNodeBuilder::new("return_statement", Span::new(0, 1)).child(leaf("int_literal", "1")).build())
                    .build(),
            )
            .build();
        let cst = SimpleNodeBuilder::new("source_file", Span::new(0, 1))
            .child(package("p"))
            .child(g)
            .child(f)
            .build();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root]).unwrap();

        let callee = find_call_callee(&root);
        let Node::Expression(Expression::Identifier(id)) = callee.as_ref() else {
            panic!("expected an identifier")
        };
        let entry = table.declaration_entry(id).expect("call to `f` declared later in the file should resolve");
        assert_eq!(entry.name, "f");
    }

    /// Finds the callee expression of the first call encountered, as an
    /// owned clone (inspect's closure cannot hand back a borrow tied to the
    /// tree, since its signature only guarantees the reference for the
    /// duration of one callback).
    fn find_call_callee(root: &NodeRef) -> NodeRef {
        let mut result: Option<NodeRef> = None;
        parity_mast::inspect(root, |n| {
            if result.is_none() {
                if let Node::Expression(Expression::Call(call)) = n.as_ref() {
                    result = Some(call.function.clone());
                }
            }
        })
        .unwrap();
        result.expect("no call expression found")
    }

    #[test]
    fn short_var_decl_blank_identifier_is_linked_but_not_reusable() {
        let assign = SimpleNodeBuilder::new("short_var_declaration", Span::new(0, 1))
            .field("left", leaf("identifier", "_"))
            .field("right", leaf("int_literal", "1"))
            .build();
        let f = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "f"))
            .field(
                "body",
                SimpleNodeBuilder::new("block", Span::new(0, 1)).child(assign).build(),
            )
            .build();
        let cst = SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(package("p")).child(f).build();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        // Translation/symbolication of a short var decl to `_` must not
        // error even though the name can never be looked up again.
        let _table = symbolicate(LanguageFamily::Go, &[root]).unwrap();
    }

    #[test]
    fn const_declaration_marks_entry_constant() {
        let const_spec = SimpleNodeBuilder::new("const_spec", Span::new(0, 1))
            .field("name", leaf("identifier", "k"))
            .field("value", leaf("int_literal", "1"))
            .build();
        let const_decl = SimpleNodeBuilder::new("const_declaration", Span::new(0, 1)).child(const_spec).build();
        let cst = SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(package("p")).child(const_decl).build();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root]).unwrap();

        let Node::Declaration(Declaration::Variable(v)) = find_variable_decl(&root) else {
            panic!("expected a variable declaration")
        };
        let entry = table.declaration_entry(&v.names[0]).unwrap();
        assert!(entry.is_constant.get());
    }

    fn find_variable_decl(root: &NodeRef) -> &Node {
        let Node::Root(r) = root.as_ref() else { panic!("expected root") };
        r.declarations
            .iter()
            .map(|d| d.as_ref())
            .find(|d| matches!(d, Node::Declaration(Declaration::Variable(_))))
            .expect("no variable declaration found")
    }

    #[test]
    fn keyed_struct_literal_field_resolves_to_struct_field_declaration() {
        let field_list = SimpleNodeBuilder::new("field_declaration_list", Span::new(0, 1))
            .child(
                SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
                    .field("name", leaf("field_identifier", "X"))
                    .field("type", leaf("type_identifier", "int"))
                    .build(),
            )
            .build();
        let struct_type = SimpleNodeBuilder::new("struct_type", Span::new(0, 1)).child(field_list).build();
        let type_spec = SimpleNodeBuilder::new("type_spec", Span::new(0, 1))
            .field("name", leaf("type_identifier", "T"))
            .field("type", struct_type)
            .build();
        let type_decl = SimpleNodeBuilder::new("type_declaration", Span::new(0, 1)).child(type_spec).build();

        let keyed = SimpleNodeBuilder::new("keyed_element", Span::new(0, 1))
            .field("key", leaf("identifier", "X"))
            .field("value", leaf("int_literal", "1"))
            .build();
        let literal_value = SimpleNodeBuilder::new("literal_value", Span::new(0, 1)).child(keyed).build();
        let composite = SimpleNodeBuilder::new("composite_literal", Span::new(0, 1))
            .field("type", leaf("type_identifier", "T"))
            .field("body", literal_value)
            .build();
        let f = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "f"))
            .field(
                "body",
                SimpleNodeBuilder::new("block", Span::new(0, 1)).child(composite).build(),
            )
            .build();
        let cst = SimpleNodeBuilder::new("source_file", Span::new(0, 1))
            .child(package("p"))
            .child(type_decl)
            .child(f)
            .build();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root]).unwrap();

        let key = find_keyed_key(&root);
        let Node::Expression(Expression::Identifier(id)) = key.as_ref() else {
            panic!("expected an identifier")
        };
        let entry = table.declaration_entry(id).expect("keyed field should resolve");
        assert_eq!(entry.name, "X");
    }

    fn find_keyed_key(root: &NodeRef) -> NodeRef {
        let mut result: Option<NodeRef> = None;
        parity_mast::inspect(root, |n| {
            if result.is_none() {
                if let Node::KeyValuePair(kv) = n.as_ref() {
                    result = Some(kv.key.clone());
                }
            }
        })
        .unwrap();
        result.expect("no keyed element found")
    }
}

/// Follows an `EntityCreationExpression.type` to the struct field entries
/// declared on its `TypeDeclaration`, if it names a resolvable struct type.
fn resolve_struct_fields(cx: &Cx<'_>, r#type: &NodeRef) -> Option<Vec<Rc<SymbolTableEntry>>> {
    let Node::Expression(Expression::Identifier(type_id)) = r#type.as_ref() else {
        return None;
    };
    let type_entry = cx.table.declaration_entry(type_id)?;
    let Node::Declaration(Declaration::Type(type_decl)) = type_entry.declaration_node.as_ref() else {
        return None;
    };
    let Node::Expression(Expression::StructType(struct_type)) = type_decl.r#type.as_ref() else {
        return None;
    };
    let mut fields = Vec::new();
    for field_node in &struct_type.declarations {
        let Node::Declaration(Declaration::Field(field)) = field_node.as_ref() else {
            continue;
        };
        let Some(name) = &field.name else { continue };
        if let Some(entry) = cx.table.declaration_entry(name) {
            fields.push(entry.clone());
        }
    }
    Some(fields)
}

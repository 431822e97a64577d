//! Symbolication hooks for the Java-like language (spec 4.C).

use std::rc::Rc;

use parity_mast::node::Declaration;
use parity_mast::node::Expression;
use parity_mast::node::Identifier;
use parity_mast::node::IdentifierKind;
use parity_mast::node::LangFields;
use parity_mast::node::Node;
use parity_mast::node::Statement;
use parity_mast::set_java_expr_type_kinds;
use parity_mast::{ident_key, NodeRef};

use crate::driver::Cx;
use crate::driver::LanguageHooks;
use crate::entry::SymbolTableEntry;
use crate::error::SymbolError;

const PRIMITIVE_TYPES: &[&str] = &["boolean", "byte", "short", "int", "long", "char", "float", "double", "String"];

fn has_modifier(modifiers: &[NodeRef], keyword: &str) -> bool {
    modifiers
        .iter()
        .any(|m| matches!(m.as_ref(), Node::Expression(Expression::LiteralModifier(s)) if s == keyword))
}

fn is_final(modifiers: &[NodeRef]) -> bool {
    has_modifier(modifiers, "final")
}

fn has_public_or_protected(modifiers: &[NodeRef]) -> bool {
    has_modifier(modifiers, "public") || has_modifier(modifiers, "protected")
}

/// Unwraps a Java-like annotated type down to the type it annotates.
fn strip_annotated(mut r#type: &NodeRef) -> &NodeRef {
    while let Node::Expression(Expression::AnnotatedType(a)) = r#type.as_ref() {
        r#type = &a.r#type;
    }
    r#type
}

fn is_primitive_or_string_type(r#type: &NodeRef) -> bool {
    match strip_annotated(r#type).as_ref() {
        Node::Expression(Expression::Identifier(id)) => PRIMITIVE_TYPES.contains(&id.name.as_str()),
        _ => false,
    }
}

/// Best-effort check of whether `node` is a constant expression: a literal,
/// a unary/binary/parenthesized combination of constant expressions, or a
/// name that already resolves to an entry already known to be constant.
fn is_constant_expr(table: &crate::entry::SymbolTable, node: &NodeRef) -> bool {
    match node.as_ref() {
        Node::Expression(Expression::Int(_))
        | Node::Expression(Expression::Float(_))
        | Node::Expression(Expression::Str(_))
        | Node::Expression(Expression::Character(_))
        | Node::Expression(Expression::Boolean(_))
        | Node::Expression(Expression::Null) => true,
        Node::Expression(Expression::Unary(u)) => is_constant_expr(table, &u.expr),
        Node::Expression(Expression::Binary(b)) => is_constant_expr(table, &b.left) && is_constant_expr(table, &b.right),
        Node::Expression(Expression::Parenthesized(p)) => is_constant_expr(table, &p.expr),
        Node::Expression(Expression::Identifier(id)) => table.declaration_entry(id).map(|e| e.is_constant.get()).unwrap_or(false),
        _ => false,
    }
}

/// A Java-like field's initializer, which the translator folds into the
/// field declaration's [`LangFields::Java`] `class_body` slot rather than a
/// dedicated field (a field group's shared type is translated once; each
/// individual field keeps its own initializer there).
fn field_initializer(f: &parity_mast::node::FieldDeclaration) -> Option<&NodeRef> {
    match &f.lang_fields {
        Some(LangFields::Java(j)) => j.class_body.first(),
        _ => None,
    }
}

fn simple_type_name(r#type: &NodeRef) -> String {
    match strip_annotated(r#type).as_ref() {
        Node::Expression(Expression::Identifier(id)) => id.name.clone(),
        Node::Expression(Expression::AccessPath(path)) => path.field.name.clone(),
        Node::Expression(Expression::GenericType(g)) => simple_type_name(&g.base),
        _ => String::new(),
    }
}

/// A class/interface/enum/annotation-type body, or an anonymous
/// entity-creation body — every node kind the Java-like language opens a
/// `this`-scoped, pre-registered member namespace for.
struct ClassLikeScope {
    members: Vec<NodeRef>,
    class_name: String,
}

/// Hooks implementing the Java-like half of the symbolicator.
#[derive(Debug, Default)]
pub struct JavaHooks {
    current_package: Option<String>,
}

impl JavaHooks {
    /// Creates a fresh set of Java-like hooks.
    pub fn new() -> Self {
        Self::default()
    }

    fn declare_name(
        &mut self,
        cx: &mut Cx<'_>,
        name: &Identifier,
        owner: &NodeRef,
        is_private: bool,
        active: bool,
    ) -> Result<Rc<SymbolTableEntry>, SymbolError> {
        let entry = if active {
            SymbolTableEntry::new(name, owner.clone(), is_private)
        } else {
            SymbolTableEntry::new_inactive(name, owner.clone(), is_private)
        };
        let entry = cx.scopes.declare(&name.name, IdentifierKind::Blanket, entry)?;
        cx.table.add_link_by_key(ident_key(name), entry.clone());
        Ok(entry)
    }

    fn resolve_use(&mut self, cx: &mut Cx<'_>, id: &Identifier) {
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

    fn class_like(node: &NodeRef) -> Option<ClassLikeScope> {
        let (members, name) = match node.as_ref() {
            Node::Declaration(Declaration::Class(c)) => (c.body.clone(), c.name.name.clone()),
            Node::Declaration(Declaration::Interface(i)) => (i.body.clone(), i.name.name.clone()),
            Node::Declaration(Declaration::Enum(e)) => {
                let members = e.constants.iter().cloned().chain(e.body.iter().cloned()).collect();
                (members, e.name.name.clone())
            }
            Node::Declaration(Declaration::AnnotationDecl(a)) => (a.body.clone(), a.name.name.clone()),
            Node::Declaration(Declaration::EnumConstant(ec)) if !ec.class_body.is_empty() => (ec.class_body.clone(), ec.name.name.clone()),
            Node::Declaration(Declaration::EntityCreation(entity)) => {
                let members = match &entity.lang_fields {
                    Some(LangFields::Java(j)) if !j.class_body.is_empty() => j.class_body.clone(),
                    _ => return None,
                };
                (members, simple_type_name(&entity.r#type))
            }
            _ => return None,
        };
        Some(ClassLikeScope { members, class_name: name })
    }

    /// Pre-registers every member declaration a class-like body directly
    /// contains, so a forward reference from one member to a sibling
    /// declared later resolves (spec 4.C).
    fn pre_register_members(&mut self, cx: &mut Cx<'_>, members: &[NodeRef], enclosing_private: bool) -> Result<(), SymbolError> {
        for member in members {
            let (name, is_private) = match member.as_ref() {
                Node::Declaration(Declaration::Field(f)) => {
                    let Some(name) = &f.name else { continue };
                    (name, self.is_declaration_private(member, enclosing_private)?)
                }
                Node::Declaration(Declaration::Function(f)) => (&f.name, self.is_declaration_private(member, enclosing_private)?),
                Node::Declaration(Declaration::Class(c)) => (&c.name, self.is_declaration_private(member, enclosing_private)?),
                Node::Declaration(Declaration::Interface(i)) => (&i.name, self.is_declaration_private(member, enclosing_private)?),
                Node::Declaration(Declaration::Enum(e)) => (&e.name, self.is_declaration_private(member, enclosing_private)?),
                Node::Declaration(Declaration::AnnotationDecl(a)) => (&a.name, self.is_declaration_private(member, enclosing_private)?),
                Node::Declaration(Declaration::EnumConstant(ec)) => (&ec.name, enclosing_private),
                _ => continue,
            };
            self.declare_name(cx, name, member, is_private, true)?;
        }
        Ok(())
    }
}

impl LanguageHooks for JavaHooks {
    fn is_declaration_private(&self, node: &NodeRef, enclosing_private: bool) -> Result<bool, SymbolError> {
        if enclosing_private {
            return Ok(true);
        }
        let Node::Declaration(decl) = node.as_ref() else {
            return Ok(enclosing_private);
        };
        match decl {
            Declaration::Field(f) => Ok(!has_public_or_protected(&f.modifiers)),
            Declaration::Variable(v) => Ok(!has_public_or_protected(&v.modifiers)),
            Declaration::Function(f) => Ok(!has_public_or_protected(&f.modifiers)),
            Declaration::Class(c) => Ok(!has_public_or_protected(&c.modifiers)),
            Declaration::Interface(i) => Ok(!has_public_or_protected(&i.modifiers)),
            Declaration::Enum(e) => Ok(!has_public_or_protected(&e.modifiers)),
            Declaration::AnnotationDecl(a) => Ok(!has_public_or_protected(&a.modifiers)),
            Declaration::Parameter(_) => Ok(true),
            Declaration::EnumConstant(_) => Ok(false),
            // An anonymous class body's own privacy is never computed from
            // modifiers (there is no declaration site to put one on); it
            // simply inherits the enclosing scope, same as any other
            // non-overriding declaration kind below.
            Declaration::EntityCreation(_) => Ok(enclosing_private),
            Declaration::Package(_) | Declaration::Import(_) | Declaration::Module(_) | Declaration::Type(_) => {
                Err(SymbolError::UnexpectedDeclarationForPrivacy)
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
            Node::Declaration(Declaration::Field(field)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                match &field.name {
                    Some(name) => Ok(vec![self.declare_name(cx, name, node, is_private, true)?]),
                    None => Ok(Vec::new()),
                }
            }
            Node::Declaration(Declaration::Variable(v)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                let mut pending = Vec::with_capacity(v.names.len());
                for name in &v.names {
                    pending.push(self.declare_name(cx, name, node, is_private, false)?);
                }
                Ok(pending)
            }
            Node::Declaration(Declaration::Function(f)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                Ok(vec![self.declare_name(cx, &f.name, node, is_private, true)?])
            }
            Node::Declaration(Declaration::Parameter(p)) => match &p.name {
                Some(name) => Ok(vec![self.declare_name(cx, name, node, true, true)?]),
                None => Ok(Vec::new()),
            },
            Node::Declaration(Declaration::Class(c)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                Ok(vec![self.declare_name(cx, &c.name, node, is_private, true)?])
            }
            Node::Declaration(Declaration::Interface(i)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                Ok(vec![self.declare_name(cx, &i.name, node, is_private, true)?])
            }
            Node::Declaration(Declaration::Enum(e)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                Ok(vec![self.declare_name(cx, &e.name, node, is_private, true)?])
            }
            Node::Declaration(Declaration::AnnotationDecl(a)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                Ok(vec![self.declare_name(cx, &a.name, node, is_private, true)?])
            }
            Node::Declaration(Declaration::EnumConstant(ec)) => {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                Ok(vec![self.declare_name(cx, &ec.name, node, enclosing_private, true)?])
            }
            Node::Statement(Statement::Label(label)) => {
                let entry = SymbolTableEntry::new(&label.label, node.clone(), true);
                cx.scopes.declare(&label.label.name, IdentifierKind::Label, entry.clone())?;
                cx.table.add_link_by_key(ident_key(&label.label), entry.clone());
                Ok(vec![entry])
            }
            Node::CatchClause(c) => {
                let entry = self.declare_name(cx, &c.name, node, true, true)?;
                Ok(vec![entry])
            }
            Node::Statement(Statement::EnhancedFor(s)) => {
                let entry = self.declare_name(cx, &s.name, node, true, true)?;
                Ok(vec![entry])
            }
            Node::Expression(Expression::InstanceOf(e)) => {
                if let Some(name) = &e.pattern_name {
                    let entry = self.declare_name(cx, name, node, true, true)?;
                    return Ok(vec![entry]);
                }
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn process_scope(&mut self, cx: &mut Cx<'_>, node: &NodeRef, on_enter: bool) -> Result<(), SymbolError> {
        if let Some(class_like) = Self::class_like(node) {
            if on_enter {
                let enclosing_private = cx.scopes.current().borrow().is_private;
                let is_private = self.is_declaration_private(node, enclosing_private)?;
                let scope = cx.scopes.push(is_private);
                cx.scopes.push_this_scope(&class_like.class_name, scope);
                self.pre_register_members(cx, &class_like.members, is_private)?;
            } else {
                cx.scopes.pop_this_scope();
                cx.scopes.pop();
            }
            return Ok(());
        }

        let is_scoping = matches!(
            node.as_ref(),
            Node::Block(_)
                | Node::Statement(Statement::If(_))
                | Node::Statement(Statement::For(_))
                | Node::Statement(Statement::While(_))
                | Node::Statement(Statement::Do(_))
                | Node::Statement(Statement::EnhancedFor(_))
                | Node::Statement(Statement::Switch(_))
                | Node::Statement(Statement::Synchronized(_))
                | Node::Statement(Statement::Try(_))
                | Node::SwitchCase(_)
                | Node::CatchClause(_)
                | Node::Declaration(Declaration::Function(_))
                | Node::Declaration(Declaration::FunctionLiteral(_))
                | Node::Declaration(Declaration::Module(_))
                | Node::Declaration(Declaration::ClassInitializer(_))
        );
        if !is_scoping {
            return Ok(());
        }
        if on_enter {
            let privacy = cx.scopes.current().borrow().is_private;
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

                if matches!(path.field.name.as_str(), "this" | "super" | "class") {
                    set_java_expr_type_kinds(&path.operand)?;
                    return Ok(());
                }

                let this_scope = match path.operand.as_ref() {
                    Node::Expression(Expression::Identifier(id)) if id.name == "this" => cx.scopes.current_this_scope().cloned(),
                    Node::Expression(Expression::AccessPath(inner)) if inner.field.name == "this" => match inner.operand.as_ref() {
                        Node::Expression(Expression::Identifier(qualifier)) => cx.scopes.this_scope_named(&qualifier.name),
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(scope) = this_scope {
                    let found = scope
                        .borrow()
                        .lookup_here_any(&path.field.name, path.field.kind.get())
                        .filter(|e| e.is_active.get())
                        .cloned();
                    if let Some(entry) = found {
                        cx.table.add_link_by_key(ident_key(&path.field), entry);
                    }
                }
            }
            Node::Statement(Statement::Break(s)) => {
                if let Some(label) = &s.label {
                    match cx.scopes.resolve(&label.name, IdentifierKind::Label) {
                        Some(entry) => cx.table.add_link_by_key(ident_key(label), entry),
                        None => cx.table.mark_unresolved(label),
                    }
                }
            }
            Node::Statement(Statement::Continue(s)) => {
                if let Some(label) = &s.label {
                    match cx.scopes.resolve(&label.name, IdentifierKind::Label) {
                        Some(entry) => cx.table.add_link_by_key(ident_key(label), entry),
                        None => cx.table.mark_unresolved(label),
                    }
                }
            }
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
                let (name, is_private) = match decl.as_ref() {
                    Node::Declaration(Declaration::Class(c)) => (&c.name, self.is_declaration_private(decl, false)?),
                    Node::Declaration(Declaration::Interface(i)) => (&i.name, self.is_declaration_private(decl, false)?),
                    Node::Declaration(Declaration::Enum(e)) => (&e.name, self.is_declaration_private(decl, false)?),
                    Node::Declaration(Declaration::AnnotationDecl(a)) => (&a.name, self.is_declaration_private(decl, false)?),
                    _ => continue,
                };
                let entry = SymbolTableEntry::new(name, decl.clone(), is_private);
                package_scope.borrow_mut().declare(&name.name, IdentifierKind::Blanket, entry)?;
            }
        }
        Ok(())
    }

    fn post_process_declaration(&mut self, _cx: &mut Cx<'_>, node: &NodeRef, pending: &[Rc<SymbolTableEntry>]) -> Result<(), SymbolError> {
        let activates = matches!(node.as_ref(), Node::Declaration(Declaration::Variable(_)));
        if activates {
            for entry in pending {
                entry.is_active.set(true);
            }
        }
        Ok(())
    }

    fn post_symbolication_fixup(&mut self, cx: &mut Cx<'_>) -> Result<(), SymbolError> {
        loop {
            let mut changed = false;
            let entries: Vec<Rc<SymbolTableEntry>> = cx.table.ordered_symbols().cloned().collect();
            for entry in &entries {
                if entry.is_constant.get() {
                    continue;
                }
                let (modifiers, r#type, value) = match entry.declaration_node.as_ref() {
                    Node::Declaration(Declaration::Variable(v)) => (&v.modifiers, v.r#type.as_ref(), v.value.as_ref()),
                    Node::Declaration(Declaration::Field(f)) => (&f.modifiers, Some(&f.r#type), field_initializer(f)),
                    _ => continue,
                };
                let Some(r#type) = r#type else { continue };
                let Some(value) = value else { continue };
                if is_final(modifiers) && is_primitive_or_string_type(r#type) && is_constant_expr(cx.table, value) {
                    entry.is_constant.set(true);
                    changed = true;
                }
            }
            if !changed {
                break;
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

    /// A `modifiers` CST node carrying the given literal keywords, built so
    /// that it translates (via `parity-translate`'s own `translate_modifiers`)
    /// into the same `Expression::LiteralModifier` list this module's
    /// privacy/`final` checks inspect.
    fn modifiers(keywords: &[&str]) -> SimpleNode {
        let mut builder = SimpleNodeBuilder::new("modifiers", Span::new(0, 1));
        for keyword in keywords {
            builder = builder.child(leaf(keyword, keyword));
        }
        builder.build()
    }

    /// Runs a one-field, one-class, one-file program through the real
    /// translator/symbolicator pipeline and hands back the translated
    /// `modifiers` list of that field, the same data `has_public_or_protected`
    /// and `is_final` see in production.
    fn field_modifiers(modifiers_cst: Option<SimpleNode>) -> Vec<NodeRef> {
        let mut field_builder = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1));
        if let Some(m) = modifiers_cst {
            field_builder = field_builder.field("modifiers", m);
        }
        let field = field_builder
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "x"))
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![field]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();
        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let Node::Root(r) = root.as_ref() else { panic!("expected root") };
        let Node::Declaration(Declaration::Class(c)) = r.declarations[0].as_ref() else {
            panic!("expected a class declaration")
        };
        let Node::Declaration(Declaration::Field(f)) = c.body[0].as_ref() else {
            panic!("expected a field declaration")
        };
        f.modifiers.clone()
    }

    #[test]
    fn has_public_or_protected_checks_literal_modifier_keywords() {
        let public = field_modifiers(Some(modifiers(&["public"])));
        let protected = field_modifiers(Some(modifiers(&["protected"])));
        let private_ish = field_modifiers(Some(modifiers(&["final", "static"])));
        let none = field_modifiers(None);

        assert!(has_public_or_protected(&public));
        assert!(has_public_or_protected(&protected));
        assert!(!has_public_or_protected(&private_ish));
        assert!(!has_public_or_protected(&none));
    }

    #[test]
    fn is_final_checks_for_the_final_keyword() {
        let with_final = field_modifiers(Some(modifiers(&["final"])));
        let without = field_modifiers(Some(modifiers(&["static"])));
        assert!(is_final(&with_final));
        assert!(!is_final(&without));
    }

    fn class_with_body(name: &str, members: Vec<SimpleNode>) -> SimpleNode {
        let mut body = SimpleNodeBuilder::new("class_body", Span::new(0, 1));
        for member in members {
            body = body.child(member);
        }
        SimpleNodeBuilder::new("class_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("body", body.build())
            .build()
    }

    fn method(name: &str, body: SimpleNode) -> SimpleNode {
        SimpleNodeBuilder::new("method_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("type", leaf("integral_type", "int"))
            .field("body", body)
            .build()
    }

    fn call_no_args(name: &str) -> SimpleNode {
        SimpleNodeBuilder::new("method_invocation", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .build()
    }

    /// A member declared later in a class body must be visible to a bare
    /// (unqualified) call from an earlier sibling method, since
    /// `pre_register_members` declares every member before the walk visits
    /// any one method's body.
    #[test]
    fn unqualified_call_resolves_to_sibling_declared_later() {
        let g_body = SimpleNodeBuilder::new("block", Span::new(0, 1))
            .child(
                SimpleNodeBuilder::new("return_statement", Span::new(0, 1))
                    .child(call_no_args("other"))
                    .build(),
            )
            .build();
        let other_body = SimpleNodeBuilder::new("block", Span::new(0, 1))
            .child(
                SimpleNodeBuilder::new("return_statement", Span::new(0, 1))
                    .child(leaf("decimal_integer_literal", "1"))
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![method("g", g_body), method("other", other_body)]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();

        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Java, &[root]).unwrap();

        let callee = find_call_callee(&root);
        let Node::Expression(Expression::Identifier(id)) = callee.as_ref() else {
            panic!("expected an identifier")
        };
        let entry = table.declaration_entry(id).expect("call to `other` declared later in the class body should resolve");
        assert_eq!(entry.name, "other");
    }

    /// Owned clone of the first call's callee found anywhere in `root`; see
    /// the identical helper in `go.rs` for why this returns a clone rather
    /// than a borrow.
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
    fn field_without_public_or_protected_modifier_is_private() {
        let field = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "x"))
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![field]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();

        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Java, &[root]).unwrap();

        let entry = table.ordered_symbols().find(|e| e.name == "x").expect("field `x` should be declared");
        assert!(entry.is_private.get());
    }

    #[test]
    fn field_with_public_modifier_is_not_private() {
        let field = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
            .field("modifiers", modifiers(&["public"]))
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "x"))
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![field]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();

        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Java, &[root]).unwrap();

        let entry = table.ordered_symbols().find(|e| e.name == "x").expect("field `x` should be declared");
        assert!(!entry.is_private.get());
    }

    /// `final int X = 1 + 2;` must become truly constant once
    /// `post_symbolication_fixup` runs, since both the modifier and the
    /// type and the initializer qualify.
    #[test]
    fn final_primitive_field_with_constant_initializer_becomes_constant() {
        let value = SimpleNodeBuilder::new("binary_expression", Span::new(0, 1))
            .field("left", leaf("decimal_integer_literal", "1"))
            .child(SimpleNodeBuilder::new("+", Span::new(0, 1)).text("+").anonymous().build())
            .field("right", leaf("decimal_integer_literal", "2"))
            .build();
        let field = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
            .field("modifiers", modifiers(&["final"]))
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "X"))
                    .field("value", value)
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![field]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();

        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Java, &[root]).unwrap();

        let entry = table.ordered_symbols().find(|e| e.name == "X").expect("field `X` should be declared");
        assert!(entry.is_constant.get());
    }

    /// A non-`final` field with the same initializer never becomes
    /// constant, even though the initializer alone would qualify.
    #[test]
    fn non_final_field_is_never_marked_constant() {
        let field = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "y"))
                    .field("value", leaf("decimal_integer_literal", "1"))
                    .build(),
            )
            .build();
        let class = class_with_body("C", vec![field]);
        let cst = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(class).build();

        let root = translate_root(LanguageFamily::Java, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Java, &[root]).unwrap();

        let entry = table.ordered_symbols().find(|e| e.name == "y").expect("field `y` should be declared");
        assert!(!entry.is_constant.get());
    }
}

//! The MAST traversal contract.
//!
//! A single driver function walks the tree and dispatches to trait methods,
//! rather than every caller hand-rolling its own recursion, dispatching
//! node kinds to type-specific callbacks with an enter/exit reason. This
//! contract is simpler than a typical syntax-tree visitor because MAST
//! nodes do not need an up-front `can_cast`/`cast` step (the enum
//! discriminant already tells a visitor what it has).

use crate::error::MastError;
use crate::node::Declaration;
use crate::node::Expression;
use crate::node::Node;
use crate::node::NodeRef;
use crate::node::Statement;

/// A visitor over a MAST forest.
///
/// `pre` runs before a node's children are visited and `post` runs after.
/// Returning `Ok(false)` from `pre` skips the node's children (but still
/// runs `post` for the node itself); returning `Err` aborts the walk
/// immediately and surfaces the error to the walk's caller. Both methods
/// default to a no-op "keep going" so implementors only override what they
/// need.
pub trait Visitor {
    /// Called before a node's children are visited.
    ///
    /// Returning `Ok(false)` skips the node's subtree.
    fn pre(&mut self, node: &NodeRef) -> Result<bool, MastError> {
        let _ = node;
        Ok(true)
    }

    /// Called after a node's children (if visited) have been visited.
    fn post(&mut self, node: &NodeRef) -> Result<(), MastError> {
        let _ = node;
        Ok(())
    }
}

/// Walks a MAST forest in pre-order, depth-first, children-in-declaration-
/// order, driving `visitor`'s callbacks.
pub fn walk(node: &NodeRef, visitor: &mut dyn Visitor) -> Result<(), MastError> {
    if node.is_temp_group() {
        return Err(MastError::TempGroupSurvived);
    }

    let descend = visitor.pre(node)?;
    if descend {
        for child in children(node) {
            walk(&child, visitor)?;
        }
    }
    visitor.post(node)
}

/// Visits every node of a forest in pre-order, calling `f` on each.
///
/// A convenience for read-only inspection passes that don't need `post` or
/// subtree-skipping; `f` itself cannot abort the walk, matching the
/// contract's "inspection never needs to cut a walk short" common case.
pub fn inspect(node: &NodeRef, mut f: impl FnMut(&NodeRef)) -> Result<(), MastError> {
    struct Inspector<'a> {
        f: &'a mut dyn FnMut(&NodeRef),
    }

    impl Visitor for Inspector<'_> {
        fn pre(&mut self, node: &NodeRef) -> Result<bool, MastError> {
            (self.f)(node);
            Ok(true)
        }
    }

    walk(node, &mut Inspector { f: &mut f })
}

/// Gets a node's immediate children, in declaration order.
///
/// This is the single place that knows how to decompose every node shape;
/// every other traversal in the crate is built on top of it.
pub fn children(node: &Node) -> Vec<NodeRef> {
    match node {
        Node::Root(r) => r.declarations.clone(),
        Node::Block(b) => b.statements.clone(),
        Node::TempGroup(g) => g.nodes.clone(),
        Node::SwitchCase(c) => c.values.iter().chain(c.stmts.iter()).cloned().collect(),
        Node::KeyValuePair(kv) => vec![kv.key.clone(), kv.value.clone()],
        Node::Dimension(d) => d.length.iter().cloned().collect(),
        Node::TypeParameter(t) => t.bounds.clone(),
        Node::ModuleDirective(m) => m.targets.clone(),
        Node::CatchClause(c) => c
            .modifiers
            .iter()
            .chain(c.types.iter())
            .cloned()
            .chain(std::iter::once(c.body.clone()))
            .collect(),
        Node::FinallyClause(f) => vec![f.body.clone()],
        Node::CommunicationCase(c) => c.comm.iter().cloned().chain(c.stmts.iter().cloned()).collect(),
        Node::Declaration(d) => declaration_children(d),
        Node::Statement(s) => statement_children(s),
        Node::Expression(e) => expression_children(e),
    }
}

fn opt<T: Clone>(o: &Option<T>) -> Vec<T> {
    o.iter().cloned().collect()
}

fn declaration_children(decl: &Declaration) -> Vec<NodeRef> {
    match decl {
        Declaration::Package(p) => opt(&p.annotation),
        Declaration::Import(_) => Vec::new(),
        Declaration::Parameter(p) => opt(&p.r#type),
        Declaration::Variable(v) => opt(&v.r#type)
            .into_iter()
            .chain(opt(&v.value))
            .chain(v.modifiers.iter().cloned())
            .collect(),
        Declaration::Field(f) => std::iter::once(f.r#type.clone())
            .chain(f.modifiers.iter().cloned())
            .collect(),
        Declaration::Function(f) => f
            .receiver
            .iter()
            .cloned()
            .chain(f.parameters.iter().cloned())
            .chain(f.returns.iter().cloned())
            .chain(f.modifiers.iter().cloned())
            .chain(f.statements.iter().cloned())
            .collect(),
        Declaration::FunctionLiteral(f) => f
            .parameters
            .iter()
            .cloned()
            .chain(f.returns.iter().cloned())
            .chain(std::iter::once(f.statements.clone()))
            .collect(),
        Declaration::EntityCreation(e) => opt(&e.object)
            .into_iter()
            .chain(std::iter::once(e.r#type.clone()))
            .chain(e.value.iter().flat_map(|v| v.values.clone()))
            .collect(),
        Declaration::Annotation(a) => a.arguments.clone(),
        Declaration::Type(t) => vec![t.r#type.clone()],
        Declaration::Module(m) => m.directives.clone(),
        Declaration::Class(c) => c
            .type_parameters
            .iter()
            .cloned()
            .chain(c.modifiers.iter().cloned())
            .chain(c.superclass.iter().cloned())
            .chain(c.interfaces.iter().cloned())
            .chain(c.body.iter().cloned())
            .collect(),
        Declaration::Interface(i) => i
            .modifiers
            .iter()
            .cloned()
            .chain(i.type_parameters.iter().cloned())
            .chain(i.extends.iter().cloned())
            .chain(i.body.iter().cloned())
            .collect(),
        Declaration::Enum(e) => e
            .modifiers
            .iter()
            .cloned()
            .chain(e.interfaces.iter().cloned())
            .chain(e.constants.iter().cloned())
            .chain(e.body.iter().cloned())
            .collect(),
        Declaration::EnumConstant(e) => e.arguments.iter().cloned().chain(e.class_body.iter().cloned()).collect(),
        Declaration::ClassInitializer(c) => vec![c.body.clone()],
        Declaration::AnnotationDecl(a) => a.modifiers.iter().cloned().chain(a.body.iter().cloned()).collect(),
        Declaration::AnnotationElement(a) => std::iter::once(a.r#type.clone())
            .chain(a.modifiers.iter().cloned())
            .chain(opt(&a.default))
            .collect(),
    }
}

fn statement_children(stmt: &Statement) -> Vec<NodeRef> {
    match stmt {
        Statement::Expression(s) => vec![s.expr.clone()],
        Statement::Declaration(s) => vec![s.decl.clone()],
        Statement::Continue(_) | Statement::Break(_) | Statement::Fallthrough(_) | Statement::Goto(_) | Statement::Label(_) => Vec::new(),
        Statement::Return(s) => s.exprs.clone(),
        Statement::If(s) => opt(&s.initializer)
            .into_iter()
            .chain(std::iter::once(s.condition.clone()))
            .chain(opt(&s.consequence))
            .chain(opt(&s.alternative))
            .collect(),
        Statement::Switch(s) => opt(&s.initializer).into_iter().chain(opt(&s.value)).chain(s.cases.iter().cloned()).collect(),
        Statement::For(s) => s
            .initializers
            .iter()
            .cloned()
            .chain(opt(&s.condition))
            .chain(s.updates.iter().cloned())
            .chain(opt(&s.body))
            .collect(),
        Statement::Defer(s) => vec![s.call.clone()],
        Statement::Send(s) => vec![s.channel.clone(), s.value.clone()],
        Statement::Go(s) => vec![s.call.clone()],
        Statement::ForRange(s) => opt(&s.key)
            .into_iter()
            .chain(opt(&s.value))
            .chain(std::iter::once(s.operand.clone()))
            .chain(std::iter::once(s.body.clone()))
            .collect(),
        Statement::Select(s) => s.cases.clone(),
        Statement::Try(s) => s
            .resources
            .iter()
            .cloned()
            .chain(std::iter::once(s.body.clone()))
            .chain(s.catches.iter().cloned())
            .chain(opt(&s.finally_clause))
            .collect(),
        Statement::While(s) => vec![s.condition.clone(), s.body.clone()],
        Statement::Throw(s) => vec![s.expr.clone()],
        Statement::Assert(s) => std::iter::once(s.condition.clone()).chain(opt(&s.message)).collect(),
        Statement::Synchronized(s) => vec![s.expr.clone(), s.body.clone()],
        Statement::Do(s) => vec![s.body.clone(), s.condition.clone()],
        Statement::EnhancedFor(s) => s
            .modifiers
            .iter()
            .cloned()
            .chain(opt(&s.r#type))
            .chain(std::iter::once(s.operand.clone()))
            .chain(std::iter::once(s.body.clone()))
            .collect(),
    }
}

fn expression_children(expr: &Expression) -> Vec<NodeRef> {
    match expr {
        Expression::Identifier(_)
        | Expression::Null
        | Expression::Boolean(_)
        | Expression::Int(_)
        | Expression::Float(_)
        | Expression::Str(_)
        | Expression::Character(_)
        | Expression::ImaginaryLiteral(_)
        | Expression::LiteralModifier(_) => Vec::new(),
        Expression::Unary(e) => vec![e.expr.clone()],
        Expression::Binary(e) => vec![e.left.clone(), e.right.clone()],
        Expression::Update(e) => vec![e.operand.clone()],
        Expression::Parenthesized(e) => vec![e.expr.clone()],
        Expression::Index(e) => vec![e.operand.clone(), e.index.clone()],
        Expression::AccessPath(e) => std::iter::once(e.operand.clone()).chain(e.annotations.iter().cloned()).collect(),
        Expression::Call(e) => std::iter::once(e.function.clone()).chain(e.arguments.iter().cloned()).collect(),
        Expression::Cast(e) => e.types.iter().cloned().chain(std::iter::once(e.operand.clone())).collect(),
        Expression::Assignment(e) => e.left.iter().cloned().chain(e.right.iter().cloned()).collect(),
        Expression::LiteralValue(e) => e.values.clone(),
        Expression::ChannelType(e) => vec![e.element.clone()],
        Expression::MapType(e) => vec![e.key.clone(), e.value.clone()],
        Expression::SliceExpression(e) => std::iter::once(e.operand.clone())
            .chain(opt(&e.low))
            .chain(opt(&e.high))
            .chain(opt(&e.max))
            .collect(),
        Expression::EllipsisExpression(e) => opt(&e.expr),
        Expression::PointerType(e) => vec![e.base.clone()],
        Expression::ArrayType(e) => opt(&e.length).into_iter().chain(std::iter::once(e.element.clone())).collect(),
        Expression::ParenthesizedType(e) => vec![e.r#type.clone()],
        Expression::FunctionType(e) => e.parameters.iter().cloned().chain(e.returns.iter().cloned()).collect(),
        Expression::TypeAssertionExpression(e) => std::iter::once(e.operand.clone()).chain(opt(&e.r#type)).collect(),
        Expression::TypeSwitchHeaderExpression(e) => vec![e.operand.clone()],
        Expression::StructType(e) => e.declarations.clone(),
        Expression::InterfaceType(e) => e.declarations.clone(),
        Expression::Ternary(e) => vec![e.condition.clone(), e.then_branch.clone(), e.else_branch.clone()],
        Expression::AnnotatedType(e) => e.annotations.iter().cloned().chain(std::iter::once(e.r#type.clone())).collect(),
        Expression::GenericType(e) => std::iter::once(e.base.clone()).chain(e.type_arguments.iter().cloned()).collect(),
        Expression::Wildcard(e) => opt(&e.bound),
        Expression::JavaArrayType(e) => std::iter::once(e.element.clone()).chain(e.dimensions.iter().cloned()).collect(),
        Expression::InstanceOf(e) => vec![e.operand.clone(), e.r#type.clone()],
        Expression::MethodReference(e) => vec![e.operand.clone()],
        Expression::ClassLiteral(e) => vec![e.r#type.clone()],
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::node::BinaryExpression;
    use crate::node::Identifier;
    use crate::node::IdentifierKind;
    use parity_cst::Span;

    fn ident(name: &str) -> NodeRef {
        Rc::new(Node::Expression(Expression::Identifier(Identifier::new(
            name,
            IdentifierKind::Blanket,
            Span::new(0, name.len()),
        ))))
    }

    #[test]
    fn walk_visits_every_descendant_pre_order() {
        let tree = Rc::new(Node::Expression(Expression::Binary(BinaryExpression {
            op: "+".into(),
            left: ident("a"),
            right: ident("b"),
        })));

        let mut seen = Vec::new();
        inspect(&tree, |n| {
            if let Node::Expression(Expression::Identifier(id)) = n.as_ref() {
                seen.push(id.name.clone());
            }
        })
        .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn pre_returning_false_skips_subtree() {
        let tree = Rc::new(Node::Expression(Expression::Binary(BinaryExpression {
            op: "+".into(),
            left: ident("a"),
            right: ident("b"),
        })));

        struct StopAtBinary {
            visited_idents: usize,
        }

        impl Visitor for StopAtBinary {
            fn pre(&mut self, node: &NodeRef) -> Result<bool, MastError> {
                match node.as_ref() {
                    Node::Expression(Expression::Identifier(_)) => {
                        self.visited_idents += 1;
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
        }

        let mut v = StopAtBinary { visited_idents: 0 };
        walk(&tree, &mut v).unwrap();
        assert_eq!(v.visited_idents, 0);
    }

    #[test]
    fn temp_group_is_rejected_by_walk() {
        let group = Rc::new(Node::TempGroup(crate::node::TempGroup { nodes: vec![ident("a")] }));
        let err = walk(&group, &mut NoOp).unwrap_err();
        assert!(matches!(err, MastError::TempGroupSurvived));
    }

    struct NoOp;
    impl Visitor for NoOp {}
}

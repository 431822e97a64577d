//! The one place the MAST is mutated after construction.
//!
//! The Symbolicator resolves a Java-like access-path chain left-to-right;
//! when it discovers partway through that the prefix actually names a type
//! (`pkg.Outer.Inner.field`, where `pkg.Outer.Inner` turns out to be a
//! nested type name, not a chain of field reads) it retags every identifier
//! in that prefix from [`IdentifierKind::Blanket`] to [`IdentifierKind::Typ`]
//! in place, rather than rebuilding the chain.

use crate::error::MastError;
use crate::node::Expression;
use crate::node::IdentifierKind;
use crate::node::Node;
use crate::node::NodeRef;

/// Retags every identifier in a pure access-path chain as
/// [`IdentifierKind::Typ`].
///
/// `expr` must be an [`Expression::Identifier`] or a chain of nested
/// [`Expression::AccessPath`] nodes whose eventual base is an identifier
/// (`a`, `a.b`, `a.b.c`, ...). Any other shape reachable before the chain
/// bottoms out is an error: the Symbolicator only calls this once it has
/// already confirmed the chain is pure name syntax.
pub fn set_java_expr_type_kinds(expr: &NodeRef) -> Result<(), MastError> {
    match expr.as_ref() {
        Node::Expression(Expression::Identifier(id)) => {
            id.kind.set(IdentifierKind::Typ);
            Ok(())
        }
        Node::Expression(Expression::AccessPath(path)) => {
            path.field.kind.set(IdentifierKind::Typ);
            set_java_expr_type_kinds(&path.operand)
        }
        _ => Err(MastError::NonIdentifierInTypeContextPrefix),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::node::AccessPathExpression;
    use crate::node::Identifier;
    use parity_cst::Span;

    fn ident(name: &str) -> NodeRef {
        Rc::new(Node::Expression(Expression::Identifier(Identifier::new(
            name,
            IdentifierKind::Blanket,
            Span::new(0, name.len()),
        ))))
    }

    #[test]
    fn retags_every_identifier_in_the_chain() {
        let base = ident("pkg");
        let chain = Rc::new(Node::Expression(Expression::AccessPath(AccessPathExpression {
            operand: base.clone(),
            annotations: Vec::new(),
            field: Identifier::new("Outer", IdentifierKind::Blanket, Span::new(4, 5)),
        })));

        set_java_expr_type_kinds(&chain).unwrap();

        let Node::Expression(Expression::Identifier(base_id)) = base.as_ref() else {
            unreachable!()
        };
        assert_eq!(base_id.kind.get(), IdentifierKind::Typ);
        let Node::Expression(Expression::AccessPath(path)) = chain.as_ref() else {
            unreachable!()
        };
        assert_eq!(path.field.kind.get(), IdentifierKind::Typ);
    }

    #[test]
    fn rejects_a_non_identifier_base() {
        let non_ident = Rc::new(Node::Expression(Expression::Null));
        let err = set_java_expr_type_kinds(&non_ident).unwrap_err();
        assert!(matches!(err, MastError::NonIdentifierInTypeContextPrefix));
    }
}

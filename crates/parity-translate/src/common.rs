//! Helpers shared by every language-specific translator.
//!
//! Operator and literal *text* is never reinterpreted by the translator
//! (spec 4.B: "operator names survive as raw text; literal values survive
//! as raw lexeme text"); these helpers exist only to keep the wrapping and
//! grouping logic — which is identical across language families — in one
//! place.

use std::rc::Rc;

use parity_cst::CstNode;
use parity_mast::node::DeclarationStatement;
use parity_mast::node::Identifier;
use parity_mast::node::IdentifierKind;
use parity_mast::node::ExpressionStatement;
use parity_mast::node::Node;
use parity_mast::node::NodeRef;
use parity_mast::node::Statement;
use parity_mast::node::TempGroup;

/// Builds an [`Identifier`] from a CST leaf, with the given initial kind.
pub(crate) fn ident<N: CstNode>(cst: &N, kind: IdentifierKind) -> Identifier {
    Identifier::new(cst.text(), kind, cst.span())
}

/// Pre-orders a translated node into the statement shape a statement list
/// requires: an expression becomes an [`ExpressionStatement`], a
/// declaration becomes a [`DeclarationStatement`], and anything already a
/// statement (or a [`Node::TempGroup`] of statements) passes through
/// unchanged.
///
/// This is the "Statement lists pre-order any translated expression into an
/// ExpressionStatement, and any translated declaration into a
/// DeclarationStatement, uniformly" rule from spec 4.B.
pub(crate) fn as_statement(node: NodeRef) -> NodeRef {
    match node.as_ref() {
        Node::Expression(_) => Rc::new(Node::Statement(Statement::Expression(ExpressionStatement {
            expr: node.clone(),
        }))),
        Node::Declaration(_) => Rc::new(Node::Statement(Statement::Declaration(DeclarationStatement {
            decl: node.clone(),
        }))),
        _ => node,
    }
}

/// Flattens a freshly-built group of sibling nodes into a single node: the
/// lone member if there is exactly one, otherwise a [`Node::TempGroup`]
/// signaling "this one CST node expanded into several MAST nodes".
///
/// Every call site that builds a `TempGroup` this way is later ungrouped by
/// its caller (a statement list, a declaration list) before the forest is
/// handed downstream; a `TempGroup` surviving past translation is the
/// invariant violation spec 3.1 and 7 call out.
pub(crate) fn group(mut members: Vec<NodeRef>) -> NodeRef {
    if members.len() == 1 {
        members.pop().unwrap()
    } else {
        Rc::new(Node::TempGroup(TempGroup { nodes: members }))
    }
}

/// Expands a (possibly grouped) node into its member nodes, in order.
///
/// A plain node expands to itself; a [`Node::TempGroup`] expands to its
/// members. Used by statement-list and declaration-list builders to
/// ungroup a `TempGroup` emitted by a single CST child (e.g. `int a, b;`)
/// into the flat sequence the data model requires.
pub(crate) fn ungroup(node: NodeRef) -> Vec<NodeRef> {
    match node.as_ref() {
        Node::TempGroup(g) => g.nodes.clone(),
        _ => vec![node],
    }
}

/// Translates a same-line `label: stmt` shape into the flattened
/// `{LabelStatement, stmt}` group the spec requires (4.B: "A label
/// followed by a statement on the same line translates to a group
/// `{LabelStatement, the statement(s)}` to flatten nesting").
pub(crate) fn label_group(label: NodeRef, stmt: NodeRef) -> NodeRef {
    let mut members = vec![label];
    members.extend(ungroup(stmt));
    group(members)
}

//! An owned, in-memory [`CstNode`] implementation.
//!
//! Real CSTs come from a tree-sitter-style parser external to this crate;
//! [`SimpleNode`] exists so that fixtures and tests can construct trees by
//! hand without depending on a concrete grammar.

use std::rc::Rc;

use crate::CstNode;
use crate::Span;

/// The data shared by every clone of a [`SimpleNode`].
#[derive(Debug)]
struct Inner {
    /// The grammar-defined kind of the node.
    kind: String,
    /// Whether the node is named.
    named: bool,
    /// The source text spanned by the node.
    text: String,
    /// The span of the node.
    span: Span,
    /// The node's children, each optionally tagged with a field name.
    children: Vec<(Option<String>, SimpleNode)>,
}

/// A cheaply-cloned, reference-counted CST node for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SimpleNode(Rc<Inner>);

impl SimpleNode {
    /// Starts building a leaf node (a token) with the given kind and text.
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>, span: Span) -> Self {
        SimpleNodeBuilder::new(kind, span).text(text).build()
    }
}

impl CstNode for SimpleNode {
    fn kind(&self) -> &str {
        &self.0.kind
    }

    fn is_named(&self) -> bool {
        self.0.named
    }

    fn text(&self) -> &str {
        &self.0.text
    }

    fn span(&self) -> Span {
        self.0.span
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children
            .iter()
            .filter(|(_, c)| c.is_named())
            .map(|(_, c)| c.clone())
            .collect()
    }

    fn children_with_anonymous(&self) -> Vec<Self> {
        self.0.children.iter().map(|(_, c)| c.clone()).collect()
    }

    fn child_by_field_name(&self, name: &str) -> Option<Self> {
        self.0
            .children
            .iter()
            .find(|(field, _)| field.as_deref() == Some(name))
            .map(|(_, c)| c.clone())
    }

    fn children_by_field_name(&self, name: &str) -> Vec<Self> {
        self.0
            .children
            .iter()
            .filter(|(field, _)| field.as_deref() == Some(name))
            .map(|(_, c)| c.clone())
            .collect()
    }
}

/// A builder for constructing [`SimpleNode`] trees in tests.
#[derive(Debug)]
pub struct SimpleNodeBuilder {
    /// The kind under construction.
    kind: String,
    /// The span under construction.
    span: Span,
    /// Whether the node being built is named; defaults to `true`.
    named: bool,
    /// The text accumulated so far.
    text: String,
    /// The children accumulated so far.
    children: Vec<(Option<String>, SimpleNode)>,
}

impl SimpleNodeBuilder {
    /// Starts building a named node of the given kind.
    pub fn new(kind: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
            named: true,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Marks the node under construction as anonymous (literal syntax).
    pub fn anonymous(mut self) -> Self {
        self.named = false;
        self
    }

    /// Sets the node's source text.
    ///
    /// For an interior node this should be the full text spanned by its
    /// children; for a leaf it is the lexeme.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends an unnamed-field child.
    pub fn child(mut self, child: SimpleNode) -> Self {
        self.children.push((None, child));
        self
    }

    /// Appends a child tagged with the given grammar field name.
    pub fn field(mut self, name: impl Into<String>, child: SimpleNode) -> Self {
        self.children.push((Some(name.into()), child));
        self
    }

    /// Finishes the node.
    pub fn build(self) -> SimpleNode {
        SimpleNode(Rc::new(Inner {
            kind: self.kind,
            named: self.named,
            text: self.text,
            span: self.span,
            children: self.children,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_small_tree_with_fields() {
        let left = SimpleNode::leaf("identifier", "a", Span::new(0, 1));
        let right = SimpleNode::leaf("identifier", "b", Span::new(4, 1));
        let node = SimpleNodeBuilder::new("binary_expression", Span::new(0, 5))
            .text("a && b")
            .field("left", left.clone())
            .field("operator", SimpleNode::leaf("&&", "&&", Span::new(2, 2)))
            .field("right", right.clone())
            .build();

        assert_eq!(node.kind(), "binary_expression");
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.child_by_field_name("left").unwrap().text(), "a");
        assert_eq!(node.child_by_field_name("right").unwrap().text(), "b");
        assert!(node.child_by_field_name("missing").is_none());
    }
}

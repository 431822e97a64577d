//! The Java-like checker layer (spec 4.E layers 2+3): adds modifier
//! addition, const tightening, constant inlining, constant-rename
//! equivalence, and the Java-like logging-elision policy on top of
//! [`crate::generic`]. See [`crate::go::GoChecker`]'s doc comment for why
//! this is one struct rather than three stacked layers.

use parity_mast::node::*;
use parity_mast::{Node, NodeRef};
use parity_symbols::SymbolTable;

use crate::checker::check_opt;
use crate::checker::check_seq;
use crate::checker::const_tightening_ok;
use crate::checker::NodeChecker;
use crate::checker::StmtIgnored;
use crate::error::CheckError;
use crate::generic;
use crate::symbolicated;

const LOGGER_LIBRARIES: &[&str] = &["org.slf4j.Logger", "org.apache.logging.log4j.Logger", "java.util.logging.Logger"];
const LOGGER_METHODS: &[&str] = &["trace", "debug", "info", "warn", "warning", "severe", "error", "fatal"];

/// The Java-like structural-equivalence checker.
pub struct JavaChecker<'a> {
    symbols: Option<(&'a SymbolTable, &'a SymbolTable)>,
    logging_on: bool,
    logger_library_matched: bool,
}

impl<'a> JavaChecker<'a> {
    /// Builds a checker for one base/last pair.
    pub fn new(symbols: Option<(&'a SymbolTable, &'a SymbolTable)>, logging_on: bool, base_roots: &[NodeRef], last_roots: &[NodeRef]) -> Self {
        let base_lib = logger_library(base_roots);
        let last_lib = logger_library(last_roots);
        Self {
            symbols,
            logging_on,
            logger_library_matched: matches!((base_lib, last_lib), (Some(x), Some(y)) if x == y),
        }
    }
}

fn logger_library(roots: &[NodeRef]) -> Option<String> {
    for root in roots {
        let Node::Root(r) = root.as_ref() else { continue };
        for decl in &r.declarations {
            if let Node::Declaration(Declaration::Import(imp)) = decl.as_ref() {
                if LOGGER_LIBRARIES.contains(&imp.package.as_str()) {
                    return Some(imp.package.clone());
                }
            }
        }
    }
    None
}

fn has_literal_modifier(modifiers: &[NodeRef], name: &str) -> bool {
    modifiers.iter().any(|m| matches!(m.as_ref(), Node::Expression(Expression::LiteralModifier(s)) if s == name))
}

/// Splits a modifier list into (literal modifier text, non-literal
/// modifier nodes), preserving order within each group.
fn split_modifiers(modifiers: &[NodeRef]) -> (Vec<String>, Vec<NodeRef>) {
    let mut literals = Vec::new();
    let mut other = Vec::new();
    for m in modifiers {
        match m.as_ref() {
            Node::Expression(Expression::LiteralModifier(s)) => literals.push(s.clone()),
            _ => other.push(m.clone()),
        }
    }
    (literals, other)
}

/// Modifier-addition equivalence (spec 4.E relaxation 1): `last` may add
/// literal `final` over `base`; any other literal-modifier change, or any
/// non-literal modifier difference, is rejected.
fn modifiers_equivalent(c: &dyn NodeChecker, base: &[NodeRef], last: &[NodeRef]) -> Result<bool, CheckError> {
    let (base_literals, base_other) = split_modifiers(base);
    let (last_literals, last_other) = split_modifiers(last);
    if !check_seq(c, &base_other, &last_other)? {
        return Ok(false);
    }
    if base_literals.iter().any(|l| !last_literals.contains(l)) {
        return Ok(false);
    }
    let extra_non_final = last_literals.iter().any(|l| !base_literals.contains(l) && l != "final");
    Ok(!extra_non_final)
}

fn is_safe_arg(arg: &NodeRef) -> bool {
    match arg.as_ref() {
        Node::Expression(Expression::Identifier(_)) => true,
        Node::Expression(Expression::Null | Expression::Boolean(_) | Expression::Int(_) | Expression::Float(_) | Expression::Str(_) | Expression::Character(_)) => true,
        Node::Expression(Expression::Unary(u)) => is_safe_arg(&u.expr),
        Node::Expression(Expression::Binary(b)) => is_safe_arg(&b.left) && is_safe_arg(&b.right),
        Node::Expression(Expression::Parenthesized(p)) => is_safe_arg(&p.expr),
        Node::Expression(Expression::Call(call)) => is_safe_format_call(call),
        _ => false,
    }
}

/// `String.format(...)` is safe when every one of its own arguments is
/// safe (spec 4.E Java-like logging elision).
fn is_safe_format_call(call: &Call) -> bool {
    let Node::Expression(Expression::AccessPath(ap)) = call.function.as_ref() else {
        return false;
    };
    let Node::Expression(Expression::Identifier(recv)) = ap.operand.as_ref() else {
        return false;
    };
    if recv.name != "String" || ap.field.name != "format" {
        return false;
    }
    call.arguments.iter().all(is_safe_arg)
}

impl NodeChecker for JavaChecker<'_> {
    fn check(&self, c: &dyn NodeChecker, a: &NodeRef, b: &NodeRef) -> Result<bool, CheckError> {
        match (a.as_ref(), b.as_ref()) {
            (Node::Declaration(Declaration::Variable(x)), Node::Declaration(Declaration::Variable(y))) => {
                if !const_tightening_ok(x.is_const, y.is_const) {
                    return Ok(false);
                }
                Ok(generic::idents_eq(&x.names, &y.names)
                    && check_opt(c, &x.r#type, &y.r#type)?
                    && check_opt(c, &x.value, &y.value)?
                    && modifiers_equivalent(c, &x.modifiers, &y.modifiers)?
                    && generic::lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?)
            }
            (Node::Declaration(Declaration::Field(x)), Node::Declaration(Declaration::Field(y))) => Ok(generic::opt_ident_eq(&x.name, &y.name)
                && c.check(c, &x.r#type, &y.r#type)?
                && modifiers_equivalent(c, &x.modifiers, &y.modifiers)?
                && generic::lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?),
            (Node::Expression(Expression::Identifier(x)), Node::Expression(Expression::Identifier(y))) => {
                if x.name == y.name {
                    return Ok(true);
                }
                if let Some((base_symbols, last_symbols)) = self.symbols {
                    if let Some(result) = symbolicated::private_constant_rename_eq(c, x, y, base_symbols, last_symbols)? {
                        return Ok(result);
                    }
                }
                Ok(false)
            }
            _ if generic::check_node_generic(c, a, b)? => Ok(true),
            _ => {
                if let Some((_, last_symbols)) = self.symbols {
                    return symbolicated::constant_inlined_eq(c, a, b, last_symbols);
                }
                Ok(false)
            }
        }
    }

    fn stmt_ignored(&self, _c: &dyn NodeChecker, stmt: &NodeRef) -> Result<StmtIgnored, CheckError> {
        if !self.logging_on || !self.logger_library_matched {
            return Ok(StmtIgnored::Required);
        }
        let Some((base_symbols, last_symbols)) = self.symbols else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Statement(Statement::Expression(es)) = stmt.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Expression(Expression::Call(call)) = es.expr.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let has_explicit_type_arguments = matches!(&call.lang_fields, Some(LangFields::Java(j)) if !j.type_arguments.is_empty());
        if has_explicit_type_arguments {
            return Ok(StmtIgnored::Required);
        }
        let Node::Expression(Expression::AccessPath(ap)) = call.function.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        if !LOGGER_METHODS.contains(&ap.field.name.as_str()) {
            return Ok(StmtIgnored::Required);
        }
        let Node::Expression(Expression::Identifier(recv)) = ap.operand.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let entry = last_symbols.declaration_entry(recv).or_else(|| base_symbols.declaration_entry(recv));
        let Some(entry) = entry else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Declaration(Declaration::Variable(var)) = entry.declaration_node.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let is_logger_type = matches!(var.r#type.as_deref(), Some(Node::Expression(Expression::Identifier(ty))) if LOGGER_LIBRARIES.iter().any(|lib| lib.ends_with(&format!(".{}", ty.name))));
        if !entry.is_private.get() || !has_literal_modifier(&var.modifiers, "final") || !is_logger_type {
            return Ok(StmtIgnored::Required);
        }
        let unsafe_args: Vec<NodeRef> = call.arguments.iter().filter(|arg| !is_safe_arg(arg)).cloned().collect();
        if unsafe_args.is_empty() {
            Ok(StmtIgnored::Elide)
        } else {
            Ok(StmtIgnored::ConditionalOn(unsafe_args))
        }
    }

    fn decl_ignorable(&self, _c: &dyn NodeChecker, decl: &NodeRef) -> Result<bool, CheckError> {
        let Some((base_symbols, last_symbols)) = self.symbols else {
            return Ok(false);
        };
        let Node::Declaration(Declaration::Variable(v)) = decl.as_ref() else {
            return Ok(false);
        };
        if v.value.is_none() {
            return Ok(false);
        }
        Ok(v.names.iter().any(|name| {
            symbolicated::private_constant_value(last_symbols, name).is_some() || symbolicated::private_constant_value(base_symbols, name).is_some()
        }))
    }
}

#[cfg(test)]
mod tests {
    use parity_cst::LanguageFamily as LF;
    use parity_cst::SimpleNode;
    use parity_cst::SimpleNodeBuilder;
    use parity_cst::Span;
    use parity_symbols::symbolicate;
    use parity_translate::translate_root;

    use super::*;

    fn leaf(kind: &str, text: &str) -> SimpleNode {
        SimpleNode::leaf(kind, text, Span::new(0, text.len()))
    }

    fn modifiers(keywords: &[&str]) -> SimpleNode {
        let mut builder = SimpleNodeBuilder::new("modifiers", Span::new(0, 1));
        for keyword in keywords {
            builder = builder.child(leaf(keyword, keyword));
        }
        builder.build()
    }

    fn logger_decl() -> SimpleNode {
        SimpleNodeBuilder::new("local_variable_declaration", Span::new(0, 1))
            .field("modifiers", modifiers(&["final"]))
            .field("type", leaf("type_identifier", "Logger"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "log"))
                    .field("value", leaf("null_literal", "null"))
                    .build(),
            )
            .build()
    }

    fn call_stmt(receiver: &str, method: &str, args: Vec<SimpleNode>) -> SimpleNode {
        let mut arg_list = SimpleNodeBuilder::new("argument_list", Span::new(0, 1));
        for a in args {
            arg_list = arg_list.child(a);
        }
        let invocation = SimpleNodeBuilder::new("method_invocation", Span::new(0, 1))
            .field("object", leaf("identifier", receiver))
            .field("name", leaf("identifier", method))
            .field("arguments", arg_list.build())
            .build();
        SimpleNodeBuilder::new("expression_statement", Span::new(0, 1)).child(invocation).build()
    }

    fn unqualified_call(name: &str) -> SimpleNode {
        SimpleNodeBuilder::new("method_invocation", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("arguments", SimpleNodeBuilder::new("argument_list", Span::new(0, 1)).build())
            .build()
    }

    fn method(name: &str, stmts: Vec<SimpleNode>) -> SimpleNode {
        let mut block = SimpleNodeBuilder::new("block", Span::new(0, 1));
        for s in stmts {
            block = block.child(s);
        }
        SimpleNodeBuilder::new("method_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("body", block.build())
            .build()
    }

    fn field(modifiers_cst: Option<SimpleNode>) -> SimpleNode {
        let mut builder = SimpleNodeBuilder::new("field_declaration", Span::new(0, 1));
        if let Some(m) = modifiers_cst {
            builder = builder.field("modifiers", m);
        }
        builder
            .field("type", leaf("integral_type", "int"))
            .child(
                SimpleNodeBuilder::new("variable_declarator", Span::new(0, 1))
                    .field("name", leaf("identifier", "x"))
                    .build(),
            )
            .build()
    }

    fn program(with_logger_import: bool, members: Vec<SimpleNode>) -> SimpleNode {
        let mut class_body = SimpleNodeBuilder::new("class_body", Span::new(0, 1));
        for m in members {
            class_body = class_body.child(m);
        }
        let class = SimpleNodeBuilder::new("class_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", "C"))
            .field("body", class_body.build())
            .build();
        let mut builder = SimpleNodeBuilder::new("program", Span::new(0, 1)).child(
            SimpleNodeBuilder::new("package_declaration", Span::new(0, 1)).child(leaf("identifier", "p")).build(),
        );
        if with_logger_import {
            builder = builder.child(leaf("import_declaration", "import org.slf4j.Logger;"));
        }
        builder.child(class).build()
    }

    fn build(cst: &SimpleNode) -> Vec<NodeRef> {
        vec![translate_root(LF::Java, cst).unwrap()]
    }

    /// Scenario 3, approve: a log call added only in `last` with safe
    /// (identifier/literal) arguments is elided entirely.
    #[test]
    fn logger_call_with_only_safe_arguments_is_elided() {
        let base = program(true, vec![method("f", vec![logger_decl()])]);
        let last = program(
            true,
            vec![method("f", vec![logger_decl(), call_stmt("log", "info", vec![leaf("string_literal", "\"hello\"")])])],
        );

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Java, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Java, &last_roots).unwrap();

        let (ok, _) = run(LF::Java, &base_roots, &last_roots, Some((&base_syms, &last_syms)), true).unwrap();
        assert!(ok);
    }

    /// Scenario 3, reject: a log call added only in `last` whose argument is
    /// itself a call (not `String.format`, so not provably side-effect
    /// free) cannot be elided — a one-sided conditional elision always
    /// falls through to a mismatch in `check_statement_list`.
    #[test]
    fn logger_call_with_an_unsafe_argument_is_rejected() {
        let base = program(true, vec![method("f", vec![logger_decl()])]);
        let last = program(
            true,
            vec![method("f", vec![logger_decl(), call_stmt("log", "info", vec![unqualified_call("compute")])])],
        );

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Java, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Java, &last_roots).unwrap();

        let (ok, _) = run(LF::Java, &base_roots, &last_roots, Some((&base_syms, &last_syms)), true).unwrap();
        assert!(!ok);
    }

    /// Without `logging_on`, the same elidable call is not elided and the
    /// lists diverge in length.
    #[test]
    fn logger_call_is_not_elided_when_logging_is_off() {
        let base = program(true, vec![method("f", vec![logger_decl()])]);
        let last = program(
            true,
            vec![method("f", vec![logger_decl(), call_stmt("log", "info", vec![leaf("string_literal", "\"hello\"")])])],
        );

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Java, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Java, &last_roots).unwrap();

        let (ok, _) = run(LF::Java, &base_roots, &last_roots, Some((&base_syms, &last_syms)), false).unwrap();
        assert!(!ok);
    }

    /// Scenario 4, approve: `last` adds `final` to a field `base` lacked.
    #[test]
    fn adding_final_to_a_field_is_approved() {
        let base = program(false, vec![field(None)]);
        let last = program(false, vec![field(Some(modifiers(&["final"])))]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let (ok, _) = run(LF::Java, &base_roots, &last_roots, None, false).unwrap();
        assert!(ok);
    }

    /// Scenario 4, reject: the reverse direction — `base` has `final` and
    /// `last` drops it — is not a relaxation spec 4.E grants.
    #[test]
    fn removing_final_from_a_field_is_rejected() {
        let base = program(false, vec![field(Some(modifiers(&["final"])))]);
        let last = program(false, vec![field(None)]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let (ok, _) = run(LF::Java, &base_roots, &last_roots, None, false).unwrap();
        assert!(!ok);
    }
}

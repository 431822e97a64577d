//! The Go-like checker layer (spec 4.E layers 2+3, collapsed into one
//! struct): adds constant inlining, constant-rename equivalence, const
//! tightening, struct-literal key↔positional equivalence, and the Go-like
//! logging-elision policy on top of [`crate::generic`].
//!
//! The three-layer design the spec describes (generic / language-specific /
//! symbolicated decorator) is realized here as a single struct carrying an
//! optional symbol-table pair rather than three separately stacked trait
//! objects: every relaxation below already checks `self.symbols.is_some()`
//! before engaging, so a `GoChecker` with `symbols: None` *is* "layers 1+2"
//! and one with `Some` *is* "layers 1+2+3" — composing three literal
//! objects added indirection without adding behavior.

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

const LOGGER_PACKAGE: &str = "go.uber.org/zap";
const LOGGER_METHODS: &[&str] = &["Debug", "Info", "Warn", "Error"];

/// The Go-like structural-equivalence checker.
pub struct GoChecker<'a> {
    symbols: Option<(&'a SymbolTable, &'a SymbolTable)>,
    logging_on: bool,
    base_logger_alias: Option<String>,
    last_logger_alias: Option<String>,
}

impl<'a> GoChecker<'a> {
    /// Builds a checker for one base/last pair. `symbols` is `(base, last)`
    /// when both forests were symbolicated; `logging_on` gates the logging
    /// elision policy regardless.
    pub fn new(symbols: Option<(&'a SymbolTable, &'a SymbolTable)>, logging_on: bool, base_roots: &[NodeRef], last_roots: &[NodeRef]) -> Self {
        Self {
            symbols,
            logging_on,
            base_logger_alias: logger_alias(base_roots),
            last_logger_alias: logger_alias(last_roots),
        }
    }

    fn log_import_clean(&self) -> bool {
        self.base_logger_alias.is_some() && self.last_logger_alias.is_some()
    }
}

fn logger_alias(roots: &[NodeRef]) -> Option<String> {
    for root in roots {
        let Node::Root(r) = root.as_ref() else { continue };
        for decl in &r.declarations {
            if let Node::Declaration(Declaration::Import(imp)) = decl.as_ref() {
                if imp.package == LOGGER_PACKAGE {
                    return Some(imp.alias.as_ref().map(|a| a.name.clone()).unwrap_or_else(|| "zap".to_string()));
                }
            }
        }
    }
    None
}

fn is_safe_arg(arg: &NodeRef) -> bool {
    match arg.as_ref() {
        Node::Expression(Expression::Identifier(_)) => true,
        Node::Expression(Expression::Null | Expression::Boolean(_) | Expression::Int(_) | Expression::Float(_) | Expression::Str(_) | Expression::Character(_)) => true,
        Node::Expression(Expression::Unary(u)) if u.op == "&" => matches!(u.expr.as_ref(), Node::Expression(Expression::Identifier(_))),
        Node::Expression(Expression::Call(call)) => is_safe_helper_call(call),
        _ => false,
    }
}

/// "a call that is itself recursively ignorable" (spec 4.E Go-like logging
/// elision): a call into the approved logger package's helper namespace,
/// all of whose own arguments are safe.
fn is_safe_helper_call(call: &Call) -> bool {
    let Node::Expression(Expression::AccessPath(ap)) = call.function.as_ref() else {
        return false;
    };
    let Node::Expression(Expression::Identifier(pkg)) = ap.operand.as_ref() else {
        return false;
    };
    if pkg.name != "zap" {
        return false;
    }
    call.arguments.iter().all(is_safe_arg)
}

impl NodeChecker for GoChecker<'_> {
    fn check(&self, c: &dyn NodeChecker, a: &NodeRef, b: &NodeRef) -> Result<bool, CheckError> {
        match (a.as_ref(), b.as_ref()) {
            (Node::Declaration(Declaration::Variable(x)), Node::Declaration(Declaration::Variable(y))) => {
                if !const_tightening_ok(x.is_const, y.is_const) {
                    return Ok(false);
                }
                Ok(generic::idents_eq(&x.names, &y.names)
                    && check_opt(c, &x.r#type, &y.r#type)?
                    && check_opt(c, &x.value, &y.value)?
                    && check_seq(c, &x.modifiers, &y.modifiers)?
                    && generic::lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?)
            }
            (Node::Declaration(Declaration::EntityCreation(x)), Node::Declaration(Declaration::EntityCreation(y))) => {
                if generic::check_entity_creation(c, x, y)? {
                    return Ok(true);
                }
                if let Some((_, last_symbols)) = self.symbols {
                    if let Some(result) = symbolicated::struct_key_positional_eq(c, x, y, last_symbols)? {
                        return Ok(result);
                    }
                }
                Ok(false)
            }
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
        if !self.logging_on || !self.log_import_clean() {
            return Ok(StmtIgnored::Required);
        }
        let Node::Statement(Statement::Expression(es)) = stmt.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Expression(Expression::Call(call)) = es.expr.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Expression(Expression::AccessPath(ap)) = call.function.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let Node::Expression(Expression::Identifier(recv)) = ap.operand.as_ref() else {
            return Ok(StmtIgnored::Required);
        };
        let recv_is_logger = Some(&recv.name) == self.base_logger_alias.as_ref() || Some(&recv.name) == self.last_logger_alias.as_ref();
        if !recv_is_logger || !LOGGER_METHODS.contains(&ap.field.name.as_str()) {
            return Ok(StmtIgnored::Required);
        }
        if call.arguments.len() < 2 || !matches!(call.arguments[0].as_ref(), Node::Expression(Expression::Str(_))) {
            return Ok(StmtIgnored::Required);
        }
        let unsafe_args: Vec<NodeRef> = call.arguments[1..].iter().filter(|arg| !is_safe_arg(arg)).cloned().collect();
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

    fn go_file(decls: Vec<SimpleNode>) -> SimpleNode {
        let mut builder = SimpleNodeBuilder::new("source_file", Span::new(0, 1)).child(
            SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
                .field("name", leaf("package_identifier", "p"))
                .build(),
        );
        for d in decls {
            builder = builder.child(d);
        }
        builder.build()
    }

    fn build(cst: &SimpleNode) -> Vec<NodeRef> {
        vec![translate_root(LF::Go, cst).unwrap()]
    }

    fn point_struct_decl() -> SimpleNode {
        let field = |name: &str| {
            SimpleNodeBuilder::new("field_declaration", Span::new(0, 1))
                .field("name", leaf("field_identifier", name))
                .field("type", leaf("type_identifier", "int"))
                .build()
        };
        let struct_type = SimpleNodeBuilder::new("struct_type", Span::new(0, 1))
            .child(
                SimpleNodeBuilder::new("field_declaration_list", Span::new(0, 1))
                    .child(field("X"))
                    .child(field("Y"))
                    .build(),
            )
            .build();
        let spec = SimpleNodeBuilder::new("type_spec", Span::new(0, 1))
            .field("name", leaf("type_identifier", "Point"))
            .field("type", struct_type)
            .build();
        SimpleNodeBuilder::new("type_declaration", Span::new(0, 1)).child(spec).build()
    }

    fn positional_literal(values: Vec<SimpleNode>) -> SimpleNode {
        let mut body = SimpleNodeBuilder::new("literal_value", Span::new(0, 1));
        for v in values {
            body = body.child(v);
        }
        SimpleNodeBuilder::new("composite_literal", Span::new(0, 1))
            .field("type", leaf("type_identifier", "Point"))
            .field("body", body.build())
            .build()
    }

    fn keyed_literal(pairs: Vec<(&str, SimpleNode)>) -> SimpleNode {
        let mut body = SimpleNodeBuilder::new("literal_value", Span::new(0, 1));
        for (key, value) in pairs {
            body = body.child(
                SimpleNodeBuilder::new("keyed_element", Span::new(0, 1))
                    .field("key", leaf("identifier", key))
                    .field("value", value)
                    .build(),
            );
        }
        SimpleNodeBuilder::new("composite_literal", Span::new(0, 1))
            .field("type", leaf("type_identifier", "Point"))
            .field("body", body.build())
            .build()
    }

    fn func_returning(name: &str, expr: SimpleNode) -> SimpleNode {
        let ret = SimpleNodeBuilder::new("return_statement", Span::new(0, 1)).child(expr).build();
        SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("result", leaf("type_identifier", "Point"))
            .field("body", SimpleNodeBuilder::new("block", Span::new(0, 1)).child(ret).build())
            .build()
    }

    /// Scenario 5, approve: `base` builds `Point{1, 2}` positionally while
    /// `last` builds the same value keyed in the struct's declared field
    /// order, `Point{X: 1, Y: 2}`.
    #[test]
    fn keyed_struct_literal_in_declared_field_order_approves() {
        let base = go_file(vec![
            point_struct_decl(),
            func_returning("f", positional_literal(vec![leaf("int_literal", "1"), leaf("int_literal", "2")])),
        ]);
        let last = go_file(vec![
            point_struct_decl(),
            func_returning(
                "f",
                keyed_literal(vec![("X", leaf("int_literal", "1")), ("Y", leaf("int_literal", "2"))]),
            ),
        ]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Go, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Go, &last_roots).unwrap();

        let (ok, _) = run(LF::Go, &base_roots, &last_roots, Some((&base_syms, &last_syms)), false).unwrap();
        assert!(ok);
    }

    /// Scenario 5, reject: the same keyed literal with its pairs permuted
    /// out of the struct's declared field order does not match the
    /// positional literal — `struct_key_positional_eq` zips declared fields
    /// against both sides positionally, so a key landing in the wrong slot
    /// is a key/field-name mismatch, not a reordering it can see through.
    #[test]
    fn keyed_struct_literal_out_of_declared_field_order_rejects() {
        let base = go_file(vec![
            point_struct_decl(),
            func_returning("f", positional_literal(vec![leaf("int_literal", "1"), leaf("int_literal", "2")])),
        ]);
        let last = go_file(vec![
            point_struct_decl(),
            func_returning(
                "f",
                keyed_literal(vec![("Y", leaf("int_literal", "2")), ("X", leaf("int_literal", "1"))]),
            ),
        ]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Go, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Go, &last_roots).unwrap();

        let (ok, _) = run(LF::Go, &base_roots, &last_roots, Some((&base_syms, &last_syms)), false).unwrap();
        assert!(!ok);
    }

    fn zap_import(alias: Option<&str>) -> SimpleNode {
        let mut spec = SimpleNodeBuilder::new("import_spec", Span::new(0, 1));
        if let Some(alias) = alias {
            spec = spec.field("name", leaf("package_identifier", alias));
        }
        let spec = spec.field("path", leaf("interpreted_string_literal", "\"go.uber.org/zap\"")).build();
        SimpleNodeBuilder::new("import_declaration", Span::new(0, 1)).child(spec).build()
    }

    fn zap_call(args: Vec<SimpleNode>) -> SimpleNode {
        let mut arg_list = SimpleNodeBuilder::new("argument_list", Span::new(0, 1));
        for a in args {
            arg_list = arg_list.child(a);
        }
        let function = SimpleNodeBuilder::new("selector_expression", Span::new(0, 1))
            .field("operand", leaf("identifier", "zap"))
            .field("field", leaf("field_identifier", "Info"))
            .build();
        SimpleNodeBuilder::new("call_expression", Span::new(0, 1))
            .field("function", function)
            .field("arguments", arg_list.build())
            .build()
    }

    fn unqualified_call(name: &str) -> SimpleNode {
        SimpleNodeBuilder::new("call_expression", Span::new(0, 1))
            .field("function", leaf("identifier", name))
            .field("arguments", SimpleNodeBuilder::new("argument_list", Span::new(0, 1)).build())
            .build()
    }

    fn void_func(name: &str, stmts: Vec<SimpleNode>) -> SimpleNode {
        let mut block = SimpleNodeBuilder::new("block", Span::new(0, 1));
        for s in stmts {
            block = block.child(s);
        }
        SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", leaf("identifier", name))
            .field("body", block.build())
            .build()
    }

    /// Scenario 3 (Go-like), approve: a `zap.Info("msg", x)` call added only
    /// in `last` with a format string plus safe trailing arguments is
    /// elided.
    #[test]
    fn zap_log_call_with_a_safe_argument_is_elided() {
        let base = go_file(vec![zap_import(None), void_func("f", vec![])]);
        let last = go_file(vec![
            zap_import(None),
            void_func("f", vec![zap_call(vec![leaf("interpreted_string_literal", "\"msg\""), leaf("identifier", "x")])]),
        ]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Go, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Go, &last_roots).unwrap();

        let (ok, _) = run(LF::Go, &base_roots, &last_roots, Some((&base_syms, &last_syms)), true).unwrap();
        assert!(ok);
    }

    /// Scenario 3 (Go-like), reject: a trailing argument that is itself an
    /// arbitrary call (not a `zap` helper) cannot be proven side-effect
    /// free, so the one-sided elision falls through.
    #[test]
    fn zap_log_call_with_an_unsafe_argument_is_rejected() {
        let base = go_file(vec![zap_import(None), void_func("f", vec![])]);
        let last = go_file(vec![
            zap_import(None),
            void_func(
                "f",
                vec![zap_call(vec![leaf("interpreted_string_literal", "\"msg\""), unqualified_call("compute")])],
            ),
        ]);

        let base_roots = build(&base);
        let last_roots = build(&last);
        let base_syms = symbolicate(LF::Go, &base_roots).unwrap();
        let last_syms = symbolicate(LF::Go, &last_roots).unwrap();

        let (ok, _) = run(LF::Go, &base_roots, &last_roots, Some((&base_syms, &last_syms)), true).unwrap();
        assert!(!ok);
    }
}

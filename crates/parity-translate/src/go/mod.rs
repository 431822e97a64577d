//! The Go-like translator.
//!
//! Dispatches on the grammar node kinds a tree-sitter-go-shaped CST uses.
//! Node kind strings below follow the public tree-sitter Go grammar
//! vocabulary; any kind this translator does not recognize is reported as
//! [`TranslateError::UnsupportedNodeKind`] rather than silently dropped —
//! the translator is total over the subset of the grammar it models, not a
//! best-effort pass.

use std::rc::Rc;

use parity_cst::CstNode;
use parity_mast::node::*;

use crate::common::as_statement;
use crate::common::group;
use crate::common::ident;
use crate::common::label_group;
use crate::common::ungroup;
use crate::error::TranslateError;

type Result<T> = std::result::Result<T, TranslateError>;

fn unsupported<N: CstNode>(cst: &N) -> TranslateError {
    TranslateError::UnsupportedNodeKind {
        family: "go",
        kind: cst.kind().to_string(),
    }
}

fn missing(node: &'static str, field: &'static str) -> TranslateError {
    TranslateError::MissingChild { node, field }
}

fn node_ref(node: Node) -> NodeRef {
    Rc::new(node)
}

/// Translates a Go-like `source_file` CST node into a MAST [`Root`].
pub fn translate_root<N: CstNode>(cst: &N) -> Result<NodeRef> {
    if cst.kind() != "source_file" {
        return Err(unsupported(cst));
    }
    let mut declarations = Vec::new();
    for child in cst.children() {
        declarations.extend(ungroup(translate_top_level(&child)?));
    }
    Ok(node_ref(Node::Root(Root { declarations })))
}

fn translate_top_level<N: CstNode>(cst: &N) -> Result<NodeRef> {
    match cst.kind() {
        "package_clause" => translate_package_clause(cst),
        "import_declaration" => translate_import_declaration(cst),
        "function_declaration" | "method_declaration" => translate_function_declaration(cst),
        "var_declaration" | "const_declaration" => translate_variable_declaration_group(cst),
        "type_declaration" => translate_type_declaration_group(cst),
        "comment" => Err(unsupported(cst)),
        _ => translate_expr(cst),
    }
}

fn translate_package_clause<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let name_cst = cst
        .child_by_field_name("name")
        .ok_or_else(|| missing("package_clause", "name"))?;
    Ok(node_ref(Node::Declaration(Declaration::Package(PackageDeclaration {
        annotation: None,
        name: ident(&name_cst, IdentifierKind::Blanket),
    }))))
}

fn translate_import_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let specs: Vec<N> = cst
        .children()
        .into_iter()
        .flat_map(|c| {
            if c.kind() == "import_spec_list" {
                c.children()
            } else {
                vec![c]
            }
        })
        .filter(|c| c.kind() == "import_spec")
        .collect();

    let mut out = Vec::new();
    for spec in &specs {
        let path = spec
            .child_by_field_name("path")
            .ok_or_else(|| missing("import_spec", "path"))?;
        let alias = spec.child_by_field_name("name").map(|n| ident(&n, IdentifierKind::Blanket));
        out.push(node_ref(Node::Declaration(Declaration::Import(ImportDeclaration {
            alias,
            package: path.text().trim_matches('"').to_string(),
        }))));
    }
    Ok(group(out))
}

fn translate_parameter_list<N: CstNode>(cst: &N) -> Result<Vec<NodeRef>> {
    let mut out = Vec::new();
    for p in cst.children() {
        match p.kind() {
            "parameter_declaration" => out.push(translate_parameter(&p, false)?),
            "variadic_parameter_declaration" => out.push(translate_parameter(&p, true)?),
            _ => return Err(unsupported(&p)),
        }
    }
    Ok(out)
}

fn translate_parameter<N: CstNode>(cst: &N, is_variadic: bool) -> Result<NodeRef> {
    let ty = cst.child_by_field_name("type");
    let name = cst.child_by_field_name("name");
    Ok(node_ref(Node::Declaration(Declaration::Parameter(ParameterDeclaration {
        is_variadic,
        r#type: ty.map(|t| translate_type(&t)).transpose()?,
        name: name.map(|n| ident(&n, IdentifierKind::Blanket)),
        lang_fields: None,
    }))))
}

fn translate_function_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let is_method = cst.kind() == "method_declaration";
    let name_cst = cst.child_by_field_name("name").ok_or_else(|| missing("function_declaration", "name"))?;
    let parameters = cst
        .child_by_field_name("parameters")
        .map(|p| translate_parameter_list(&p))
        .transpose()?
        .unwrap_or_default();
    let receiver = if is_method {
        cst.child_by_field_name("receiver")
            .map(|r| translate_parameter_list(&r))
            .transpose()?
            .and_then(|mut v| if v.is_empty() { None } else { Some(v.remove(0)) })
    } else {
        None
    };
    let returns = match cst.child_by_field_name("result") {
        Some(r) if r.kind() == "parameter_list" => translate_parameter_list(&r)?,
        Some(r) => vec![translate_type(&r)?],
        None => Vec::new(),
    };
    let statements = cst
        .child_by_field_name("body")
        .map(|b| translate_block(&b))
        .transpose()?;

    Ok(node_ref(Node::Declaration(Declaration::Function(FunctionDeclaration {
        name: ident(&name_cst, if is_method { IdentifierKind::Method } else { IdentifierKind::Function }),
        receiver,
        parameters,
        returns,
        modifiers: Vec::new(),
        statements,
        lang_fields: None,
    }))))
}

fn translate_variable_declaration_group<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let is_const = cst.kind() == "const_declaration";
    let specs: Vec<N> = cst
        .children()
        .into_iter()
        .flat_map(|c| {
            if c.kind() == "var_spec_list" || c.kind() == "const_spec_list" {
                c.children()
            } else {
                vec![c]
            }
        })
        .filter(|c| c.kind() == "var_spec" || c.kind() == "const_spec")
        .collect();

    let mut out = Vec::new();
    for spec in &specs {
        let names: Vec<Identifier> = spec
            .children_by_field_name("name")
            .iter()
            .map(|n| ident(n, IdentifierKind::Blanket))
            .collect();
        let ty = spec.child_by_field_name("type").map(|t| translate_type(&t)).transpose()?;
        let value = spec.child_by_field_name("value").map(|v| translate_expr(&v)).transpose()?;
        out.push(node_ref(Node::Declaration(Declaration::Variable(VariableDeclaration {
            names,
            r#type: ty,
            value,
            is_const,
            modifiers: Vec::new(),
            lang_fields: None,
        }))));
    }
    Ok(group(out))
}

fn translate_type_declaration_group<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let specs: Vec<N> = cst
        .children()
        .into_iter()
        .flat_map(|c| if c.kind() == "type_spec_list" { c.children() } else { vec![c] })
        .filter(|c| c.kind() == "type_spec" || c.kind() == "type_alias")
        .collect();

    let mut out = Vec::new();
    for spec in &specs {
        let is_alias = spec.kind() == "type_alias";
        let name_cst = spec.child_by_field_name("name").ok_or_else(|| missing("type_spec", "name"))?;
        let ty_cst = spec.child_by_field_name("type").ok_or_else(|| missing("type_spec", "type"))?;
        out.push(node_ref(Node::Declaration(Declaration::Type(TypeDeclaration {
            is_alias,
            name: ident(&name_cst, IdentifierKind::Typ),
            r#type: translate_type(&ty_cst)?,
        }))));
    }
    Ok(group(out))
}

fn translate_block<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let mut statements = Vec::new();
    for child in cst.children() {
        statements.extend(ungroup(translate_statement(&child)?));
    }
    Ok(node_ref(Node::Block(Block { statements })))
}

fn translate_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let statement = match cst.kind() {
        "block" => return translate_block(cst),
        "short_var_declaration" => translate_short_var_declaration(cst)?,
        "assignment_statement" => translate_assignment_statement(cst)?,
        "if_statement" => translate_if_statement(cst)?,
        "for_statement" => translate_for_statement(cst)?,
        "return_statement" => translate_return_statement(cst)?,
        "break_statement" => translate_jump(cst, |label| Statement::Break(BreakStatement { label }))?,
        "continue_statement" => translate_jump(cst, |label| Statement::Continue(ContinueStatement { label }))?,
        "fallthrough_statement" => node_ref(Node::Statement(Statement::Fallthrough(FallthroughStatement))),
        "goto_statement" => {
            let label = cst
                .children()
                .into_iter()
                .next()
                .ok_or_else(|| missing("goto_statement", "label"))?;
            node_ref(Node::Statement(Statement::Goto(GotoStatement {
                label: ident(&label, IdentifierKind::Label),
            })))
        }
        "labeled_statement" => return translate_labeled_statement(cst),
        "defer_statement" => {
            let call = cst.children().into_iter().next().ok_or_else(|| missing("defer_statement", "call"))?;
            node_ref(Node::Statement(Statement::Defer(DeferStatement {
                call: translate_expr(&call)?,
            })))
        }
        "go_statement" => {
            let call = cst.children().into_iter().next().ok_or_else(|| missing("go_statement", "call"))?;
            node_ref(Node::Statement(Statement::Go(GoStatement {
                call: translate_expr(&call)?,
            })))
        }
        "send_statement" => {
            let channel = cst
                .child_by_field_name("channel")
                .ok_or_else(|| missing("send_statement", "channel"))?;
            let value = cst
                .child_by_field_name("value")
                .ok_or_else(|| missing("send_statement", "value"))?;
            node_ref(Node::Statement(Statement::Send(SendStatement {
                channel: translate_expr(&channel)?,
                value: translate_expr(&value)?,
            })))
        }
        "expression_switch_statement" | "type_switch_statement" => translate_switch_statement(cst)?,
        "select_statement" => translate_select_statement(cst)?,
        "var_declaration" | "const_declaration" => {
            let g = translate_variable_declaration_group(cst)?;
            return Ok(group(ungroup(g).into_iter().map(as_statement).collect::<Vec<_>>()));
        }
        "type_declaration" => {
            let g = translate_type_declaration_group(cst)?;
            return Ok(group(ungroup(g).into_iter().map(as_statement).collect::<Vec<_>>()));
        }
        "empty_statement" => return Ok(node_ref(Node::Block(Block { statements: Vec::new() }))),
        _ => return Ok(as_statement(translate_expr(cst)?)),
    };
    Ok(statement)
}

fn translate_jump<N: CstNode>(cst: &N, build: impl FnOnce(Option<Identifier>) -> Statement) -> Result<NodeRef> {
    let label = cst.children().into_iter().next().map(|l| ident(&l, IdentifierKind::Label));
    Ok(node_ref(Node::Statement(build(label))))
}

fn translate_labeled_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let label_cst = cst
        .child_by_field_name("label")
        .ok_or_else(|| missing("labeled_statement", "label"))?;
    // A labeled_statement has exactly two named children: the label and the
    // statement it labels, in that order.
    let stmt_cst = cst
        .children()
        .into_iter()
        .nth(1)
        .ok_or_else(|| missing("labeled_statement", "statement"))?;
    let label = node_ref(Node::Statement(Statement::Label(LabelStatement {
        label: ident(&label_cst, IdentifierKind::Label),
    })));
    let stmt = translate_statement(&stmt_cst)?;
    Ok(label_group(label, stmt))
}

fn translate_short_var_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let left = cst
        .child_by_field_name("left")
        .ok_or_else(|| missing("short_var_declaration", "left"))?;
    let right = cst
        .child_by_field_name("right")
        .ok_or_else(|| missing("short_var_declaration", "right"))?;
    Ok(node_ref(Node::Expression(Expression::Assignment(Assignment {
        is_short_var_decl: true,
        left: translate_expr_list(&left)?,
        right: translate_expr_list(&right)?,
    }))))
}

fn translate_assignment_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let left = cst
        .child_by_field_name("left")
        .ok_or_else(|| missing("assignment_statement", "left"))?;
    let right = cst
        .child_by_field_name("right")
        .ok_or_else(|| missing("assignment_statement", "right"))?;
    Ok(node_ref(Node::Expression(Expression::Assignment(Assignment {
        is_short_var_decl: false,
        left: translate_expr_list(&left)?,
        right: translate_expr_list(&right)?,
    }))))
}

fn translate_expr_list<N: CstNode>(cst: &N) -> Result<Vec<NodeRef>> {
    if cst.kind() == "expression_list" {
        cst.children().iter().map(translate_expr).collect()
    } else {
        Ok(vec![translate_expr(cst)?])
    }
}

fn translate_if_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let initializer = cst
        .child_by_field_name("initializer")
        .map(|i| translate_statement(&i))
        .transpose()?;
    let condition = cst
        .child_by_field_name("condition")
        .ok_or_else(|| missing("if_statement", "condition"))?;
    let consequence = cst
        .child_by_field_name("consequence")
        .map(|b| translate_block(&b))
        .transpose()?
        .and_then(|b| match b.as_ref() {
            Node::Block(blk) if blk.statements.is_empty() => None,
            _ => Some(b),
        });
    let alternative = cst
        .child_by_field_name("alternative")
        .map(|a| if a.kind() == "if_statement" { translate_if_statement(&a) } else { translate_block(&a) })
        .transpose()?;

    Ok(node_ref(Node::Statement(Statement::If(IfStatement {
        initializer,
        condition: translate_expr(&condition)?,
        consequence,
        alternative,
    }))))
}

fn translate_for_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let body = cst
        .child_by_field_name("body")
        .map(|b| translate_block(&b))
        .transpose()?;

    if let Some(range) = cst.children().into_iter().find(|c| c.kind() == "range_clause") {
        let key = range.child_by_field_name("left").map(|l| translate_expr(&l)).transpose()?;
        let operand = range
            .child_by_field_name("right")
            .ok_or_else(|| missing("range_clause", "right"))?;
        return Ok(node_ref(Node::Statement(Statement::ForRange(ForRangeStatement {
            key: key.clone(),
            value: None,
            is_decl: range.text().contains(":="),
            operand: translate_expr(&operand)?,
            body: body.ok_or_else(|| missing("for_statement", "body"))?,
        }))));
    }

    let clause = cst.children().into_iter().find(|c| c.kind() == "for_clause");
    let (initializers, condition, updates) = if let Some(clause) = clause {
        let init = clause
            .child_by_field_name("initializer")
            .map(|i| translate_statement(&i))
            .transpose()?
            .map(|s| vec![s])
            .unwrap_or_default();
        let cond = clause.child_by_field_name("condition").map(|c| translate_expr(&c)).transpose()?;
        let upd = clause
            .child_by_field_name("update")
            .map(|u| translate_statement(&u))
            .transpose()?
            .map(|s| vec![s])
            .unwrap_or_default();
        (init, cond, upd)
    } else if let Some(cond) = cst.children().into_iter().find(|c| !matches!(c.kind(), "block")) {
        (Vec::new(), Some(translate_expr(&cond)?), Vec::new())
    } else {
        (Vec::new(), None, Vec::new())
    };

    Ok(node_ref(Node::Statement(Statement::For(ForStatement {
        initializers,
        condition,
        updates,
        body,
    }))))
}

fn translate_return_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let exprs = cst
        .children()
        .into_iter()
        .map(|c| translate_expr(&c))
        .collect::<Result<Vec<_>>>()?;
    Ok(node_ref(Node::Statement(Statement::Return(ReturnStatement { exprs }))))
}

fn translate_switch_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let initializer = cst
        .child_by_field_name("initializer")
        .map(|i| translate_statement(&i))
        .transpose()?;
    let value = cst.child_by_field_name("value").map(|v| translate_expr(&v)).transpose()?;

    let mut cases = Vec::new();
    for c in cst.children() {
        if c.kind() != "expression_case" && c.kind() != "default_case" && c.kind() != "type_case" {
            continue;
        }
        let values = c
            .children_by_field_name("value")
            .iter()
            .map(translate_expr)
            .collect::<Result<Vec<_>>>()?;
        let mut stmts = Vec::new();
        for s in c.children_by_field_name("body") {
            stmts.extend(ungroup(translate_statement(&s)?));
        }
        cases.push(node_ref(Node::SwitchCase(SwitchCase { values, stmts })));
    }

    Ok(node_ref(Node::Statement(Statement::Switch(SwitchStatement {
        initializer,
        value,
        cases,
    }))))
}

fn translate_select_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let mut cases = Vec::new();
    for c in cst.children() {
        if c.kind() != "communication_case" && c.kind() != "default_case" {
            continue;
        }
        let comm = c
            .child_by_field_name("communication")
            .map(|comm| translate_statement(&comm))
            .transpose()?;
        let mut stmts = Vec::new();
        for s in c.children_by_field_name("body") {
            stmts.extend(ungroup(translate_statement(&s)?));
        }
        cases.push(node_ref(Node::CommunicationCase(CommunicationCase { comm, stmts })));
    }
    Ok(node_ref(Node::Statement(Statement::Select(SelectStatement { cases }))))
}

fn translate_expr<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let expr = match cst.kind() {
        "identifier" | "package_identifier" | "field_identifier" | "type_identifier" => {
            Expression::Identifier(ident(cst, IdentifierKind::Blanket))
        }
        "int_literal" => Expression::Int(cst.text().to_string()),
        "float_literal" => Expression::Float(cst.text().to_string()),
        "imaginary_literal" => Expression::ImaginaryLiteral(cst.text().to_string()),
        "rune_literal" => Expression::Character(cst.text().to_string()),
        "interpreted_string_literal" => Expression::Str(StringLiteral {
            value: cst.text().to_string(),
            is_raw: false,
        }),
        "raw_string_literal" => Expression::Str(StringLiteral {
            value: cst.text().to_string(),
            is_raw: true,
        }),
        "true" => Expression::Boolean(true),
        "false" => Expression::Boolean(false),
        "nil" => Expression::Null,
        "unary_expression" => {
            let op = cst.child_by_field_name("operator").ok_or_else(|| missing("unary_expression", "operator"))?;
            let operand = cst.child_by_field_name("operand").ok_or_else(|| missing("unary_expression", "operand"))?;
            Expression::Unary(UnaryExpression {
                op: op.text().to_string(),
                expr: translate_expr(&operand)?,
            })
        }
        "binary_expression" => {
            let op = cst.child_by_field_name("operator").ok_or_else(|| missing("binary_expression", "operator"))?;
            let left = cst.child_by_field_name("left").ok_or_else(|| missing("binary_expression", "left"))?;
            let right = cst.child_by_field_name("right").ok_or_else(|| missing("binary_expression", "right"))?;
            Expression::Binary(BinaryExpression {
                op: op.text().to_string(),
                left: translate_expr(&left)?,
                right: translate_expr(&right)?,
            })
        }
        "inc_statement" | "dec_statement" => {
            let operand = cst.children().into_iter().next().ok_or_else(|| missing("update", "operand"))?;
            Expression::Update(UpdateExpression {
                op_side: UpdateSide::After,
                op: if cst.kind() == "inc_statement" { "++".into() } else { "--".into() },
                operand: translate_expr(&operand)?,
            })
        }
        "parenthesized_expression" => {
            let inner = cst.children().into_iter().next().ok_or_else(|| missing("parenthesized_expression", "expr"))?;
            Expression::Parenthesized(ParenthesizedExpression {
                expr: translate_expr(&inner)?,
            })
        }
        "index_expression" => {
            let operand = cst.child_by_field_name("operand").ok_or_else(|| missing("index_expression", "operand"))?;
            let index = cst.child_by_field_name("index").ok_or_else(|| missing("index_expression", "index"))?;
            Expression::Index(IndexExpression {
                operand: translate_expr(&operand)?,
                index: translate_expr(&index)?,
            })
        }
        "slice_expression" => {
            let operand = cst.child_by_field_name("operand").ok_or_else(|| missing("slice_expression", "operand"))?;
            Expression::SliceExpression(SliceExpression {
                operand: translate_expr(&operand)?,
                low: cst.child_by_field_name("start").map(|e| translate_expr(&e)).transpose()?,
                high: cst.child_by_field_name("end").map(|e| translate_expr(&e)).transpose()?,
                max: cst.child_by_field_name("capacity").map(|e| translate_expr(&e)).transpose()?,
            })
        }
        "selector_expression" => {
            let operand = cst.child_by_field_name("operand").ok_or_else(|| missing("selector_expression", "operand"))?;
            let field = cst.child_by_field_name("field").ok_or_else(|| missing("selector_expression", "field"))?;
            Expression::AccessPath(AccessPathExpression {
                operand: translate_expr(&operand)?,
                annotations: Vec::new(),
                field: ident(&field, IdentifierKind::Blanket),
            })
        }
        "call_expression" => {
            let function = cst.child_by_field_name("function").ok_or_else(|| missing("call_expression", "function"))?;
            let arguments = cst
                .child_by_field_name("arguments")
                .map(|a| a.children().iter().map(translate_expr).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            let function = translate_expr(&function)?;
            mark_callee(&function);
            Expression::Call(Call {
                function,
                arguments,
                lang_fields: None,
            })
        }
        "type_assertion_expression" => {
            let operand = cst.child_by_field_name("operand").ok_or_else(|| missing("type_assertion_expression", "operand"))?;
            Expression::TypeAssertionExpression(TypeAssertionExpression {
                operand: translate_expr(&operand)?,
                r#type: cst.child_by_field_name("type").map(|t| translate_type(&t)).transpose()?,
            })
        }
        "type_switch_guard" => {
            let operand = cst.children().into_iter().next().ok_or_else(|| missing("type_switch_guard", "operand"))?;
            Expression::TypeSwitchHeaderExpression(TypeSwitchHeaderExpression {
                operand: translate_expr(&operand)?,
            })
        }
        "composite_literal" => return translate_composite_literal(cst),
        "func_literal" => return translate_func_literal(cst),
        "variadic_argument" => {
            let inner = cst.children().into_iter().next();
            Expression::EllipsisExpression(EllipsisExpression {
                expr: inner.map(|i| translate_expr(&i)).transpose()?,
            })
        }
        "pointer_type" | "array_type" | "slice_type" | "map_type" | "channel_type" | "struct_type" | "interface_type"
        | "function_type" | "qualified_type" | "parenthesized_type" => return translate_type(cst),
        _ => return Err(unsupported(cst)),
    };
    Ok(node_ref(Node::Expression(expr)))
}

/// Narrows a call's callee identifier kind to `Method`/`Function` in place
/// (spec 4.B: "callees of calls get Method or Function").
fn mark_callee(function: &NodeRef) {
    match function.as_ref() {
        Node::Expression(Expression::Identifier(id)) => id.kind.set(IdentifierKind::Function),
        Node::Expression(Expression::AccessPath(path)) => path.field.kind.set(IdentifierKind::Method),
        _ => {}
    }
}

fn translate_composite_literal<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("composite_literal", "type"))?;
    let body = cst.child_by_field_name("body").ok_or_else(|| missing("composite_literal", "body"))?;

    let mut values = Vec::new();
    for el in body.children() {
        if el.kind() == "keyed_element" {
            let key = el.child_by_field_name("key").ok_or_else(|| missing("keyed_element", "key"))?;
            let value = el.child_by_field_name("value").ok_or_else(|| missing("keyed_element", "value"))?;
            values.push(node_ref(Node::KeyValuePair(KeyValuePair {
                key: translate_expr(&key)?,
                value: translate_expr(&value)?,
            })));
        } else {
            values.push(translate_expr(&el)?);
        }
    }

    Ok(node_ref(Node::Declaration(Declaration::EntityCreation(EntityCreationExpression {
        object: None,
        r#type: translate_type(&ty)?,
        value: Some(LiteralValue { values }),
        lang_fields: Some(LangFields::Go(GoLangFields::default())),
    }))))
}

fn translate_func_literal<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let parameters = cst
        .child_by_field_name("parameters")
        .map(|p| translate_parameter_list(&p))
        .transpose()?
        .unwrap_or_default();
    let returns = match cst.child_by_field_name("result") {
        Some(r) if r.kind() == "parameter_list" => translate_parameter_list(&r)?,
        Some(r) => vec![translate_type(&r)?],
        None => Vec::new(),
    };
    let body = cst.child_by_field_name("body").ok_or_else(|| missing("func_literal", "body"))?;
    Ok(node_ref(Node::Declaration(Declaration::FunctionLiteral(FunctionLiteral {
        parameters,
        returns,
        statements: translate_block(&body)?,
    }))))
}

fn translate_type<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let expr = match cst.kind() {
        "identifier" | "type_identifier" | "package_identifier" => {
            Expression::Identifier(ident(cst, IdentifierKind::Typ))
        }
        "qualified_type" => {
            let package = cst.child_by_field_name("package").ok_or_else(|| missing("qualified_type", "package"))?;
            let name = cst.child_by_field_name("name").ok_or_else(|| missing("qualified_type", "name"))?;
            Expression::AccessPath(AccessPathExpression {
                operand: translate_type(&package)?,
                annotations: Vec::new(),
                field: ident(&name, IdentifierKind::Typ),
            })
        }
        "pointer_type" => {
            let base = cst.children().into_iter().next().ok_or_else(|| missing("pointer_type", "base"))?;
            Expression::PointerType(PointerType { base: translate_type(&base)? })
        }
        "array_type" => {
            let length = cst.child_by_field_name("length").map(|l| translate_expr(&l)).transpose()?;
            let element = cst.child_by_field_name("element").ok_or_else(|| missing("array_type", "element"))?;
            Expression::ArrayType(ArrayType {
                length,
                element: translate_type(&element)?,
            })
        }
        "slice_type" => {
            let element = cst.child_by_field_name("element").ok_or_else(|| missing("slice_type", "element"))?;
            Expression::ArrayType(ArrayType {
                length: None,
                element: translate_type(&element)?,
            })
        }
        "map_type" => {
            let key = cst.child_by_field_name("key").ok_or_else(|| missing("map_type", "key"))?;
            let value = cst.child_by_field_name("value").ok_or_else(|| missing("map_type", "value"))?;
            Expression::MapType(MapType {
                key: translate_type(&key)?,
                value: translate_type(&value)?,
            })
        }
        "channel_type" => {
            let value = cst.child_by_field_name("value").ok_or_else(|| missing("channel_type", "value"))?;
            let text = cst.text();
            let direction = if text.starts_with("<-chan") {
                ChannelDirection::Receive
            } else if text.contains("chan<-") {
                ChannelDirection::Send
            } else {
                ChannelDirection::SendReceive
            };
            Expression::ChannelType(ChannelType {
                direction,
                element: translate_type(&value)?,
            })
        }
        "struct_type" => {
            let mut declarations = Vec::new();
            if let Some(list) = cst.children().into_iter().find(|c| c.kind() == "field_declaration_list") {
                for f in list.children() {
                    declarations.push(translate_field_declaration(&f)?);
                }
            }
            Expression::StructType(StructType { declarations })
        }
        "interface_type" => {
            let mut declarations = Vec::new();
            for m in cst.children() {
                match m.kind() {
                    "method_elem" => {
                        let name = m.child_by_field_name("name").ok_or_else(|| missing("method_elem", "name"))?;
                        let parameters = m
                            .child_by_field_name("parameters")
                            .map(|p| translate_parameter_list(&p))
                            .transpose()?
                            .unwrap_or_default();
                        let returns = match m.child_by_field_name("result") {
                            Some(r) if r.kind() == "parameter_list" => translate_parameter_list(&r)?,
                            Some(r) => vec![translate_type(&r)?],
                            None => Vec::new(),
                        };
                        declarations.push(node_ref(Node::Declaration(Declaration::Function(FunctionDeclaration {
                            name: ident(&name, IdentifierKind::Method),
                            receiver: None,
                            parameters,
                            returns,
                            modifiers: Vec::new(),
                            statements: None,
                            lang_fields: None,
                        }))));
                    }
                    "type_elem" => {
                        for ty in m.children() {
                            declarations.push(translate_type(&ty)?);
                        }
                    }
                    _ => {}
                }
            }
            Expression::InterfaceType(InterfaceType { declarations })
        }
        "function_type" => {
            let parameters = cst
                .child_by_field_name("parameters")
                .map(|p| translate_parameter_list(&p))
                .transpose()?
                .unwrap_or_default();
            let returns = match cst.child_by_field_name("result") {
                Some(r) if r.kind() == "parameter_list" => translate_parameter_list(&r)?,
                Some(r) => vec![translate_type(&r)?],
                None => Vec::new(),
            };
            Expression::FunctionType(FunctionType { parameters, returns })
        }
        "parenthesized_type" => {
            let inner = cst.children().into_iter().next().ok_or_else(|| missing("parenthesized_type", "type"))?;
            Expression::ParenthesizedType(ParenthesizedType {
                r#type: translate_type(&inner)?,
            })
        }
        _ => return Err(unsupported(cst)),
    };
    Ok(node_ref(Node::Expression(expr)))
}

fn translate_field_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let name = cst.child_by_field_name("name");
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("field_declaration", "type"))?;
    Ok(node_ref(Node::Declaration(Declaration::Field(FieldDeclaration {
        name: name.map(|n| ident(&n, IdentifierKind::Blanket)),
        r#type: translate_type(&ty)?,
        modifiers: Vec::new(),
        lang_fields: None,
    }))))
}

#[cfg(test)]
mod tests {
    use parity_cst::Span;
    use parity_cst::SimpleNode;
    use parity_cst::SimpleNodeBuilder;

    use super::*;

    fn leaf(kind: &str, text: &str) -> SimpleNode {
        SimpleNode::leaf(kind, text, Span::new(0, text.len()))
    }

    #[test]
    fn translates_package_clause() {
        let cst = SimpleNodeBuilder::new("package_clause", Span::new(0, 10))
            .field("name", leaf("package_identifier", "main"))
            .build();
        let node = translate_package_clause(&cst).unwrap();
        match node.as_ref() {
            Node::Declaration(Declaration::Package(p)) => assert_eq!(p.name.name, "main"),
            _ => panic!("expected a package declaration"),
        }
    }

    #[test]
    fn if_statement_with_empty_body_has_no_consequence() {
        let empty_block = SimpleNodeBuilder::new("block", Span::new(0, 2)).build();
        let cond = leaf("identifier", "ok");
        let cst = SimpleNodeBuilder::new("if_statement", Span::new(0, 20))
            .field("condition", cond)
            .field("consequence", empty_block)
            .build();

        let node = translate_if_statement(&cst).unwrap();
        match node.as_ref() {
            Node::Statement(Statement::If(s)) => assert!(s.consequence.is_none()),
            _ => panic!("expected an if statement"),
        }
    }

    #[test]
    fn return_with_no_arguments_yields_empty_exprs() {
        let cst = SimpleNodeBuilder::new("return_statement", Span::new(0, 6)).build();
        let node = translate_return_statement(&cst).unwrap();
        match node.as_ref() {
            Node::Statement(Statement::Return(r)) => assert!(r.exprs.is_empty()),
            _ => panic!("expected a return statement"),
        }
    }

    #[test]
    fn unrecognized_kind_is_an_error() {
        let cst = leaf("frobnicate_statement", "???");
        let err = translate_statement(&cst).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedNodeKind { .. }));
    }
}

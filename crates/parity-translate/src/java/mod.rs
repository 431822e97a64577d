//! The Java-like translator.
//!
//! Dispatches on the grammar node kinds a tree-sitter-java-shaped CST uses,
//! the same way [`crate::go`] dispatches on tree-sitter-go's vocabulary.

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
        family: "java",
        kind: cst.kind().to_string(),
    }
}

fn missing(node: &'static str, field: &'static str) -> TranslateError {
    TranslateError::MissingChild { node, field }
}

fn node_ref(node: Node) -> NodeRef {
    Rc::new(node)
}

/// Translates a Java-like `program` CST node into a MAST [`Root`].
pub fn translate_root<N: CstNode>(cst: &N) -> Result<NodeRef> {
    if cst.kind() != "program" {
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
        "package_declaration" => translate_package_declaration(cst),
        "import_declaration" => translate_import_declaration(cst),
        "class_declaration" => translate_class_declaration(cst),
        "interface_declaration" => translate_interface_declaration(cst),
        "enum_declaration" => translate_enum_declaration(cst),
        "annotation_type_declaration" => translate_annotation_type_declaration(cst),
        "module_declaration" => translate_module_declaration(cst),
        "line_comment" | "block_comment" => Err(unsupported(cst)),
        _ => translate_expr(cst),
    }
}

/// Collects the literal modifiers (keyword modifiers, e.g. `final`,
/// `public`) and non-literal modifiers (annotations) of a `modifiers` CST
/// node, keeping them in separate lists the way the Checker needs them
/// (spec 4.E relaxation 1: literal and non-literal modifiers are compared
/// by different rules).
fn translate_modifiers<N: CstNode>(modifiers_cst: Option<N>) -> Result<Vec<NodeRef>> {
    let Some(modifiers_cst) = modifiers_cst else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for m in modifiers_cst.children_with_anonymous() {
        if m.kind() == "marker_annotation" || m.kind() == "annotation" {
            out.push(translate_annotation(&m)?);
        } else if m.is_named() {
            out.push(node_ref(Node::Expression(Expression::LiteralModifier(m.kind().to_string()))));
        } else {
            out.push(node_ref(Node::Expression(Expression::LiteralModifier(m.text().to_string()))));
        }
    }
    Ok(out)
}

fn translate_annotation<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("annotation", "name"))?;
    let mut arguments = Vec::new();
    if let Some(args) = cst.child_by_field_name("arguments") {
        for a in args.children() {
            arguments.push(translate_annotation_argument(&a)?);
        }
    }
    Ok(node_ref(Node::Declaration(Declaration::Annotation(Annotation {
        name: ident(&name, IdentifierKind::Typ),
        arguments,
    }))))
}

fn translate_annotation_argument<N: CstNode>(cst: &N) -> Result<NodeRef> {
    if cst.kind() == "element_value_pair" {
        let key = cst.child_by_field_name("key").ok_or_else(|| missing("element_value_pair", "key"))?;
        let value = cst.child_by_field_name("value").ok_or_else(|| missing("element_value_pair", "value"))?;
        Ok(node_ref(Node::KeyValuePair(KeyValuePair {
            key: node_ref(Node::Expression(Expression::Identifier(ident(&key, IdentifierKind::Blanket)))),
            value: translate_expr(&value)?,
        })))
    } else {
        translate_expr(cst)
    }
}

fn translate_package_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let annotation = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "annotation" || c.kind() == "marker_annotation")
        .map(|a| translate_annotation(&a))
        .transpose()?;
    let name = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "scoped_identifier" || c.kind() == "identifier")
        .ok_or_else(|| missing("package_declaration", "name"))?;
    Ok(node_ref(Node::Declaration(Declaration::Package(PackageDeclaration {
        annotation,
        name: ident(&name, IdentifierKind::Blanket),
    }))))
}

fn translate_import_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    Ok(node_ref(Node::Declaration(Declaration::Import(ImportDeclaration {
        alias: None,
        package: cst
            .text()
            .trim_start_matches("import")
            .trim_start()
            .trim_start_matches("static")
            .trim()
            .trim_end_matches(';')
            .trim()
            .to_string(),
    }))))
}

fn translate_class_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("class_declaration", "name"))?;
    let type_parameters = translate_type_parameters(cst.child_by_field_name("type_parameters"))?;
    let superclass = cst
        .child_by_field_name("superclass")
        .map(|s| translate_type(&first_type_child(&s)?))
        .transpose()?;
    let interfaces = translate_type_list(cst.child_by_field_name("interfaces"))?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("class_declaration", "body"))?;
    let body = translate_class_body(&body_cst)?;

    Ok(node_ref(Node::Declaration(Declaration::Class(ClassDeclaration {
        modifiers,
        name: ident(&name, IdentifierKind::Typ),
        type_parameters,
        superclass,
        interfaces,
        body,
    }))))
}

fn first_type_child<N: CstNode>(cst: &N) -> Result<N> {
    cst.children().into_iter().next().ok_or_else(|| missing("superclass", "type"))
}

fn translate_type_parameters<N: CstNode>(cst: Option<N>) -> Result<Vec<NodeRef>> {
    let Some(cst) = cst else { return Ok(Vec::new()) };
    cst.children()
        .into_iter()
        .filter(|c| c.kind() == "type_parameter")
        .map(|p| {
            let name = p.child_by_field_name("name").ok_or_else(|| missing("type_parameter", "name"))?;
            let bounds = p
                .child_by_field_name("bound")
                .map(|b| b.children().iter().map(translate_type).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(node_ref(Node::TypeParameter(TypeParameter {
                name: ident(&name, IdentifierKind::Typ),
                bounds,
            })))
        })
        .collect()
}

fn translate_type_list<N: CstNode>(cst: Option<N>) -> Result<Vec<NodeRef>> {
    let Some(cst) = cst else { return Ok(Vec::new()) };
    let list = cst.children().into_iter().find(|c| c.kind() == "type_list").unwrap_or_else(|| cst.clone());
    list.children().iter().map(translate_type).collect()
}

fn translate_class_body<N: CstNode>(cst: &N) -> Result<Vec<NodeRef>> {
    let mut out = Vec::new();
    for member in cst.children() {
        out.extend(ungroup(translate_class_member(&member)?));
    }
    Ok(out)
}

fn translate_class_member<N: CstNode>(cst: &N) -> Result<NodeRef> {
    match cst.kind() {
        "field_declaration" => translate_field_declaration_group(cst),
        "method_declaration" | "constructor_declaration" => translate_method_declaration(cst),
        "class_declaration" => translate_class_declaration(cst),
        "interface_declaration" => translate_interface_declaration(cst),
        "enum_declaration" => translate_enum_declaration(cst),
        "annotation_type_declaration" => translate_annotation_type_declaration(cst),
        "static_initializer" => {
            let body = cst.children().into_iter().next().ok_or_else(|| missing("static_initializer", "body"))?;
            Ok(node_ref(Node::Declaration(Declaration::ClassInitializer(ClassInitializer {
                is_static: true,
                body: translate_block(&body)?,
            }))))
        }
        "block" => Ok(node_ref(Node::Declaration(Declaration::ClassInitializer(ClassInitializer {
            is_static: false,
            body: translate_block(cst)?,
        })))),
        _ => Err(unsupported(cst)),
    }
}

fn translate_field_declaration_group<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("field_declaration", "type"))?;
    let declarators: Vec<N> = cst.children().into_iter().filter(|c| c.kind() == "variable_declarator").collect();

    let mut out = Vec::new();
    for d in &declarators {
        let name = d.child_by_field_name("name").ok_or_else(|| missing("variable_declarator", "name"))?;
        let value = d.child_by_field_name("value").map(|v| translate_expr(&v)).transpose()?;
        let declared_type = wrap_with_declarator_dimensions(&ty, d)?;
        out.push(node_ref(Node::Declaration(Declaration::Field(FieldDeclaration {
            name: Some(ident(&name, IdentifierKind::Blanket)),
            r#type: declared_type,
            modifiers: modifiers.clone(),
            lang_fields: value.map(|v| LangFields::Java(JavaLangFields {
                type_arguments: Vec::new(),
                dimensions: Vec::new(),
                throws: Vec::new(),
                class_body: vec![v],
            })),
        }))));
    }
    Ok(group(out))
}

fn wrap_with_declarator_dimensions<N: CstNode>(ty: &N, declarator: &N) -> Result<NodeRef> {
    let base = translate_type(ty)?;
    let dims: Vec<N> = declarator.children().into_iter().filter(|c| c.kind() == "dimensions").collect();
    if dims.is_empty() {
        return Ok(base);
    }
    let mut dimensions = Vec::new();
    for d in &dims {
        for _ in d.children_with_anonymous() {
            dimensions.push(node_ref(Node::Dimension(Dimension { length: None })));
        }
    }
    Ok(node_ref(Node::Expression(Expression::JavaArrayType(JavaArrayType {
        element: base,
        dimensions,
    }))))
}

fn translate_method_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("method_declaration", "name"))?;
    let parameters = cst
        .child_by_field_name("parameters")
        .map(|p| translate_formal_parameters(&p))
        .transpose()?
        .unwrap_or_default();
    let returns = cst
        .child_by_field_name("type")
        .map(|t| translate_type(&t))
        .transpose()?
        .into_iter()
        .collect();
    let throws = cst
        .child_by_field_name("throws")
        .map(|t| t.children().iter().map(translate_type).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    let type_arguments = translate_type_parameters(cst.child_by_field_name("type_parameters"))?;
    let statements = cst.child_by_field_name("body").map(|b| translate_block(&b)).transpose()?;

    Ok(node_ref(Node::Declaration(Declaration::Function(FunctionDeclaration {
        name: ident(&name, IdentifierKind::Method),
        receiver: None,
        parameters,
        returns,
        modifiers,
        statements,
        lang_fields: Some(LangFields::Java(JavaLangFields {
            type_arguments,
            dimensions: Vec::new(),
            throws,
            class_body: Vec::new(),
        })),
    }))))
}

fn translate_formal_parameters<N: CstNode>(cst: &N) -> Result<Vec<NodeRef>> {
    cst.children()
        .into_iter()
        .map(|p| match p.kind() {
            "formal_parameter" => translate_formal_parameter(&p, false),
            "spread_parameter" => translate_formal_parameter(&p, true),
            _ => Err(unsupported(&p)),
        })
        .collect()
}

fn translate_formal_parameter<N: CstNode>(cst: &N, is_variadic: bool) -> Result<NodeRef> {
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("formal_parameter", "type"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("formal_parameter", "name"))?;
    Ok(node_ref(Node::Declaration(Declaration::Parameter(ParameterDeclaration {
        is_variadic,
        r#type: Some(translate_type(&ty)?),
        name: Some(ident(&name, IdentifierKind::Blanket)),
        lang_fields: None,
    }))))
}

fn translate_interface_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("interface_declaration", "name"))?;
    let type_parameters = translate_type_parameters(cst.child_by_field_name("type_parameters"))?;
    let extends = translate_type_list(cst.child_by_field_name("extends_interfaces") )?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("interface_declaration", "body"))?;
    let body = translate_class_body(&body_cst)?;

    Ok(node_ref(Node::Declaration(Declaration::Interface(InterfaceDeclaration {
        modifiers,
        name: ident(&name, IdentifierKind::Typ),
        type_parameters,
        extends,
        body,
    }))))
}

fn translate_enum_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("enum_declaration", "name"))?;
    let interfaces = translate_type_list(cst.child_by_field_name("interfaces"))?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("enum_declaration", "body"))?;

    let mut constants = Vec::new();
    let mut body = Vec::new();
    for member in body_cst.children() {
        match member.kind() {
            "enum_constant" => constants.push(translate_enum_constant(&member)?),
            "enum_body_declarations" => {
                for d in member.children() {
                    body.extend(ungroup(translate_class_member(&d)?));
                }
            }
            _ => body.extend(ungroup(translate_class_member(&member)?)),
        }
    }

    Ok(node_ref(Node::Declaration(Declaration::Enum(EnumDeclaration {
        modifiers,
        name: ident(&name, IdentifierKind::Typ),
        interfaces,
        constants,
        body,
    }))))
}

fn translate_enum_constant<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("enum_constant", "name"))?;
    let arguments = cst
        .child_by_field_name("arguments")
        .map(|a| a.children().iter().map(translate_expr).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    let class_body = cst
        .child_by_field_name("body")
        .map(|b| translate_class_body(&b))
        .transpose()?
        .unwrap_or_default();

    Ok(node_ref(Node::Declaration(Declaration::EnumConstant(EnumConstantDeclaration {
        name: ident(&name, IdentifierKind::Blanket),
        arguments,
        class_body,
    }))))
}

fn translate_annotation_type_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("annotation_type_declaration", "name"))?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("annotation_type_declaration", "body"))?;
    let mut body = Vec::new();
    for element in body_cst.children() {
        if element.kind() != "annotation_type_element_declaration" {
            body.extend(ungroup(translate_class_member(&element)?));
            continue;
        }
        let el_modifiers = translate_modifiers(element.child_by_field_name("modifiers"))?;
        let el_type = element.child_by_field_name("type").ok_or_else(|| missing("annotation_type_element_declaration", "type"))?;
        let el_name = element.child_by_field_name("name").ok_or_else(|| missing("annotation_type_element_declaration", "name"))?;
        let default = element
            .child_by_field_name("default_value")
            .map(|d| translate_expr(&d))
            .transpose()?;
        body.push(node_ref(Node::Declaration(Declaration::AnnotationElement(AnnotationElementDeclaration {
            modifiers: el_modifiers,
            r#type: translate_type(&el_type)?,
            name: ident(&el_name, IdentifierKind::Blanket),
            default,
        }))));
    }

    Ok(node_ref(Node::Declaration(Declaration::AnnotationDecl(AnnotationDeclaration {
        modifiers,
        name: ident(&name, IdentifierKind::Typ),
        body,
    }))))
}

fn translate_module_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let is_open = cst.children_with_anonymous().iter().any(|c| c.kind() == "open");
    let name_cst = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "scoped_identifier" || c.kind() == "identifier")
        .ok_or_else(|| missing("module_declaration", "name"))?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("module_declaration", "body"))?;

    let mut directives = Vec::new();
    for d in body_cst.children() {
        let keyword = d.kind().trim_end_matches("_module_directive").to_string();
        let targets = d
            .children()
            .into_iter()
            .filter(|c| c.kind() == "scoped_identifier" || c.kind() == "identifier" || c.kind() == "type_identifier")
            .map(|c| node_ref(Node::Expression(Expression::Identifier(ident(&c, IdentifierKind::Blanket)))))
            .collect();
        directives.push(node_ref(Node::ModuleDirective(ModuleDirective { keyword, targets })));
    }

    Ok(node_ref(Node::Declaration(Declaration::Module(ModuleDeclaration {
        is_open,
        name: name_cst.text().to_string(),
        directives,
    }))))
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
        "local_variable_declaration" => {
            let g = translate_local_variable_declaration(cst)?;
            return Ok(group(ungroup(g).into_iter().map(as_statement).collect::<Vec<_>>()));
        }
        "class_declaration" | "interface_declaration" | "enum_declaration" => {
            return Ok(as_statement(translate_top_level(cst)?))
        }
        "if_statement" => translate_if_statement(cst)?,
        "while_statement" => {
            let condition = cst.child_by_field_name("condition").ok_or_else(|| missing("while_statement", "condition"))?;
            let body = cst.child_by_field_name("body").ok_or_else(|| missing("while_statement", "body"))?;
            node_ref(Node::Statement(Statement::While(WhileStatement {
                condition: translate_parenthesized_condition(&condition)?,
                body: translate_statement(&body)?,
            })))
        }
        "do_statement" => {
            let condition = cst.child_by_field_name("condition").ok_or_else(|| missing("do_statement", "condition"))?;
            let body = cst.child_by_field_name("body").ok_or_else(|| missing("do_statement", "body"))?;
            node_ref(Node::Statement(Statement::Do(DoStatement {
                body: translate_statement(&body)?,
                condition: translate_parenthesized_condition(&condition)?,
            })))
        }
        "for_statement" => translate_for_statement(cst)?,
        "enhanced_for_statement" => translate_enhanced_for_statement(cst)?,
        "try_statement" | "try_with_resources_statement" => translate_try_statement(cst)?,
        "throw_statement" => {
            let expr = cst.children().into_iter().next().ok_or_else(|| missing("throw_statement", "expr"))?;
            node_ref(Node::Statement(Statement::Throw(ThrowStatement { expr: translate_expr(&expr)? })))
        }
        "assert_statement" => {
            let mut children = cst.children().into_iter();
            let condition = children.next().ok_or_else(|| missing("assert_statement", "condition"))?;
            let message = children.next();
            node_ref(Node::Statement(Statement::Assert(AssertStatement {
                condition: translate_expr(&condition)?,
                message: message.map(|m| translate_expr(&m)).transpose()?,
            })))
        }
        "synchronized_statement" => {
            let expr = cst
                .children()
                .into_iter()
                .find(|c| c.kind() != "block")
                .ok_or_else(|| missing("synchronized_statement", "expr"))?;
            let body = cst
                .children()
                .into_iter()
                .find(|c| c.kind() == "block")
                .ok_or_else(|| missing("synchronized_statement", "body"))?;
            node_ref(Node::Statement(Statement::Synchronized(SynchronizedStatement {
                expr: translate_expr(&expr)?,
                body: translate_block(&body)?,
            })))
        }
        "return_statement" => {
            let exprs = cst.children().into_iter().map(|c| translate_expr(&c)).collect::<Result<Vec<_>>>()?;
            node_ref(Node::Statement(Statement::Return(ReturnStatement { exprs })))
        }
        "break_statement" => translate_jump(cst, |label| Statement::Break(BreakStatement { label }))?,
        "continue_statement" => translate_jump(cst, |label| Statement::Continue(ContinueStatement { label }))?,
        "labeled_statement" => return translate_labeled_statement(cst),
        "expression_statement" => {
            let expr = cst.children().into_iter().next().ok_or_else(|| missing("expression_statement", "expr"))?;
            return Ok(as_statement(translate_expr(&expr)?));
        }
        "local_class_declaration" => {
            let inner = cst.children().into_iter().next().ok_or_else(|| missing("local_class_declaration", "class"))?;
            return Ok(as_statement(translate_class_declaration(&inner)?));
        }
        ";" | "empty_statement" => return Ok(node_ref(Node::Block(Block { statements: Vec::new() }))),
        _ => return Ok(as_statement(translate_expr(cst)?)),
    };
    Ok(statement)
}

fn translate_jump<N: CstNode>(cst: &N, build: impl FnOnce(Option<Identifier>) -> Statement) -> Result<NodeRef> {
    let label = cst.children().into_iter().next().map(|l| ident(&l, IdentifierKind::Label));
    Ok(node_ref(Node::Statement(build(label))))
}

fn translate_labeled_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let label_cst = cst.children().into_iter().next().ok_or_else(|| missing("labeled_statement", "label"))?;
    let stmt_cst = cst.children().into_iter().nth(1).ok_or_else(|| missing("labeled_statement", "statement"))?;
    let label = node_ref(Node::Statement(Statement::Label(LabelStatement {
        label: ident(&label_cst, IdentifierKind::Label),
    })));
    let stmt = translate_statement(&stmt_cst)?;
    Ok(label_group(label, stmt))
}

/// A condition expression in Java is always parenthesized in the grammar;
/// the parentheses are stripped since `Parenthesized` wrapping that carries
/// no semantic weight here would just add checker-side noise the language
/// doesn't require preserving the way, say, a Go type assertion shape does.
fn translate_parenthesized_condition<N: CstNode>(cst: &N) -> Result<NodeRef> {
    translate_expr(cst)
}

fn translate_local_variable_declaration<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("local_variable_declaration", "type"))?;
    let declarators: Vec<N> = cst.children().into_iter().filter(|c| c.kind() == "variable_declarator").collect();
    let is_const = modifiers.iter().any(|m| matches!(m.as_ref(), Node::Expression(Expression::LiteralModifier(s)) if s == "final"));

    let mut out = Vec::new();
    for d in &declarators {
        let name = d.child_by_field_name("name").ok_or_else(|| missing("variable_declarator", "name"))?;
        let value = d.child_by_field_name("value").map(|v| translate_expr(&v)).transpose()?;
        out.push(node_ref(Node::Declaration(Declaration::Variable(VariableDeclaration {
            names: vec![ident(&name, IdentifierKind::Blanket)],
            r#type: Some(wrap_with_declarator_dimensions(&ty, d)?),
            value,
            is_const,
            modifiers: modifiers.clone(),
            lang_fields: None,
        }))));
    }
    Ok(group(out))
}

fn translate_if_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let condition = cst.child_by_field_name("condition").ok_or_else(|| missing("if_statement", "condition"))?;
    let consequence = cst
        .child_by_field_name("consequence")
        .map(|c| translate_statement(&c))
        .transpose()?
        .and_then(|b| match b.as_ref() {
            Node::Block(blk) if blk.statements.is_empty() => None,
            _ => Some(b),
        });
    let alternative = cst
        .child_by_field_name("alternative")
        .map(|a| translate_statement(&a))
        .transpose()?;

    Ok(node_ref(Node::Statement(Statement::If(IfStatement {
        initializer: None,
        condition: translate_parenthesized_condition(&condition)?,
        consequence,
        alternative,
    }))))
}

fn translate_for_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let initializers = cst
        .children_by_field_name("init")
        .iter()
        .map(translate_for_clause_item)
        .collect::<Result<Vec<_>>>()?;
    let condition = cst.child_by_field_name("condition").map(|c| translate_expr(&c)).transpose()?;
    let updates = cst
        .children_by_field_name("update")
        .iter()
        .map(translate_expr)
        .collect::<Result<Vec<_>>>()?;
    let body = cst.child_by_field_name("body").map(|b| translate_statement(&b)).transpose()?;

    Ok(node_ref(Node::Statement(Statement::For(ForStatement {
        initializers,
        condition,
        updates,
        body,
    }))))
}

fn translate_for_clause_item<N: CstNode>(cst: &N) -> Result<NodeRef> {
    if cst.kind() == "local_variable_declaration" {
        Ok(as_statement(translate_local_variable_declaration(cst)?))
    } else {
        Ok(as_statement(translate_expr(cst)?))
    }
}

fn translate_enhanced_for_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let modifiers = translate_modifiers(cst.child_by_field_name("modifiers"))?;
    let ty = cst.child_by_field_name("type").map(|t| translate_type(&t)).transpose()?;
    let name = cst.child_by_field_name("name").ok_or_else(|| missing("enhanced_for_statement", "name"))?;
    let operand = cst.child_by_field_name("value").ok_or_else(|| missing("enhanced_for_statement", "value"))?;
    let body = cst.child_by_field_name("body").ok_or_else(|| missing("enhanced_for_statement", "body"))?;

    Ok(node_ref(Node::Statement(Statement::EnhancedFor(EnhancedForStatement {
        modifiers,
        r#type: ty,
        name: ident(&name, IdentifierKind::Blanket),
        operand: translate_expr(&operand)?,
        body: translate_statement(&body)?,
    }))))
}

fn translate_try_statement<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let resources = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "resource_specification")
        .map(|rs| {
            rs.children()
                .into_iter()
                .filter(|c| c.kind() == "resource")
                .map(|r| translate_resource(&r))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("try_statement", "body"))?;
    let body = translate_block(&body_cst)?;

    let catches = cst
        .children()
        .into_iter()
        .filter(|c| c.kind() == "catch_clause")
        .map(|c| translate_catch_clause(&c))
        .collect::<Result<Vec<_>>>()?;

    let finally_clause = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "finally_clause")
        .map(|f| {
            let fb = f.children().into_iter().next().ok_or_else(|| missing("finally_clause", "body"))?;
            Ok::<_, TranslateError>(node_ref(Node::FinallyClause(FinallyClause { body: translate_block(&fb)? })))
        })
        .transpose()?;

    Ok(node_ref(Node::Statement(Statement::Try(TryStatement {
        resources,
        body,
        catches,
        finally_clause,
    }))))
}

fn translate_resource<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let ty = cst.child_by_field_name("type").map(|t| translate_type(&t)).transpose()?;
    let name = cst.child_by_field_name("name");
    let value = cst.child_by_field_name("value").map(|v| translate_expr(&v)).transpose()?;
    match name {
        Some(name) => Ok(node_ref(Node::Declaration(Declaration::Variable(VariableDeclaration {
            names: vec![ident(&name, IdentifierKind::Blanket)],
            r#type: ty,
            value,
            is_const: false,
            modifiers: Vec::new(),
            lang_fields: None,
        })))),
        None => translate_expr(cst),
    }
}

fn translate_catch_clause<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let param = cst.child_by_field_name("parameter").ok_or_else(|| missing("catch_clause", "parameter"))?;
    let modifiers = translate_modifiers(param.child_by_field_name("modifiers"))?;
    let catch_type = param.child_by_field_name("type").ok_or_else(|| missing("catch_formal_parameter", "type"))?;
    let types = if catch_type.kind() == "catch_type" || catch_type.kind() == "union_type" {
        catch_type.children().iter().map(translate_type).collect::<Result<Vec<_>>>()?
    } else {
        vec![translate_type(&catch_type)?]
    };
    let name = param.child_by_field_name("name").ok_or_else(|| missing("catch_formal_parameter", "name"))?;
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("catch_clause", "body"))?;

    Ok(node_ref(Node::CatchClause(CatchClause {
        modifiers,
        types,
        name: ident(&name, IdentifierKind::Blanket),
        body: translate_block(&body_cst)?,
    })))
}

fn translate_expr<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let expr = match cst.kind() {
        "identifier" | "type_identifier" | "this" | "super" => {
            Expression::Identifier(ident(cst, IdentifierKind::Blanket))
        }
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal" | "binary_integer_literal" => {
            Expression::Int(cst.text().to_string())
        }
        "decimal_floating_point_literal" | "hex_floating_point_literal" => Expression::Float(cst.text().to_string()),
        "true" => Expression::Boolean(true),
        "false" => Expression::Boolean(false),
        "null_literal" => Expression::Null,
        "character_literal" => Expression::Character(cst.text().to_string()),
        "string_literal" => Expression::Str(StringLiteral {
            value: cst.text().to_string(),
            is_raw: false,
        }),
        "text_block" => Expression::Str(StringLiteral {
            value: cst.text().to_string(),
            is_raw: true,
        }),
        "unary_expression" => {
            let op = unnamed_operator(cst)?;
            let operand = cst.children().into_iter().next().ok_or_else(|| missing("unary_expression", "operand"))?;
            Expression::Unary(UnaryExpression { op, expr: translate_expr(&operand)? })
        }
        "update_expression" => {
            let op = unnamed_operator(cst)?;
            let operand = cst.children().into_iter().next().ok_or_else(|| missing("update_expression", "operand"))?;
            let is_prefix = cst.text().trim_start().starts_with(op.as_str());
            Expression::Update(UpdateExpression {
                op_side: if is_prefix { UpdateSide::Before } else { UpdateSide::After },
                op,
                operand: translate_expr(&operand)?,
            })
        }
        "binary_expression" => {
            let op = unnamed_operator(cst)?;
            let left = cst.child_by_field_name("left").ok_or_else(|| missing("binary_expression", "left"))?;
            let right = cst.child_by_field_name("right").ok_or_else(|| missing("binary_expression", "right"))?;
            Expression::Binary(BinaryExpression {
                op,
                left: translate_expr(&left)?,
                right: translate_expr(&right)?,
            })
        }
        "assignment_expression" => {
            let left = cst.child_by_field_name("left").ok_or_else(|| missing("assignment_expression", "left"))?;
            let right = cst.child_by_field_name("right").ok_or_else(|| missing("assignment_expression", "right"))?;
            Expression::Assignment(Assignment {
                is_short_var_decl: false,
                left: vec![translate_expr(&left)?],
                right: vec![translate_expr(&right)?],
            })
        }
        "ternary_expression" => {
            let condition = cst.child_by_field_name("condition").ok_or_else(|| missing("ternary_expression", "condition"))?;
            let consequence = cst.child_by_field_name("consequence").ok_or_else(|| missing("ternary_expression", "consequence"))?;
            let alternative = cst.child_by_field_name("alternative").ok_or_else(|| missing("ternary_expression", "alternative"))?;
            Expression::Ternary(TernaryExpression {
                condition: translate_expr(&condition)?,
                then_branch: translate_expr(&consequence)?,
                else_branch: translate_expr(&alternative)?,
            })
        }
        "parenthesized_expression" => {
            let inner = cst.children().into_iter().next().ok_or_else(|| missing("parenthesized_expression", "expr"))?;
            Expression::Parenthesized(ParenthesizedExpression { expr: translate_expr(&inner)? })
        }
        "cast_expression" => {
            let types = cst
                .children_by_field_name("type")
                .iter()
                .map(translate_type)
                .collect::<Result<Vec<_>>>()?;
            let value = cst.child_by_field_name("value").ok_or_else(|| missing("cast_expression", "value"))?;
            Expression::Cast(Cast { types, operand: translate_expr(&value)? })
        }
        "instanceof_expression" => {
            let left = cst.child_by_field_name("left").ok_or_else(|| missing("instanceof_expression", "left"))?;
            let right = cst.child_by_field_name("right").ok_or_else(|| missing("instanceof_expression", "right"))?;
            let name = cst.child_by_field_name("name").map(|n| ident(&n, IdentifierKind::Blanket));
            Expression::InstanceOf(InstanceOfExpression {
                operand: translate_expr(&left)?,
                r#type: translate_type(&right)?,
                pattern_name: name,
            })
        }
        "array_access" => {
            let array = cst.child_by_field_name("array").ok_or_else(|| missing("array_access", "array"))?;
            let index = cst.child_by_field_name("index").ok_or_else(|| missing("array_access", "index"))?;
            Expression::Index(IndexExpression {
                operand: translate_expr(&array)?,
                index: translate_expr(&index)?,
            })
        }
        "field_access" => {
            let object = cst.child_by_field_name("object").ok_or_else(|| missing("field_access", "object"))?;
            let field = cst.child_by_field_name("field").ok_or_else(|| missing("field_access", "field"))?;
            Expression::AccessPath(AccessPathExpression {
                operand: translate_expr(&object)?,
                annotations: Vec::new(),
                field: ident(&field, IdentifierKind::Blanket),
            })
        }
        "method_invocation" => {
            let name = cst.child_by_field_name("name").ok_or_else(|| missing("method_invocation", "name"))?;
            let arguments = cst
                .child_by_field_name("arguments")
                .map(|a| a.children().iter().map(translate_expr).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            let type_arguments = cst
                .child_by_field_name("type_arguments")
                .map(|t| t.children().iter().map(translate_type).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            let function = match cst.child_by_field_name("object") {
                Some(object) => node_ref(Node::Expression(Expression::AccessPath(AccessPathExpression {
                    operand: translate_expr(&object)?,
                    annotations: Vec::new(),
                    field: ident(&name, IdentifierKind::Method),
                }))),
                None => node_ref(Node::Expression(Expression::Identifier(ident(&name, IdentifierKind::Function)))),
            };
            Expression::Call(Call {
                function,
                arguments,
                lang_fields: Some(LangFields::Java(JavaLangFields {
                    type_arguments,
                    dimensions: Vec::new(),
                    throws: Vec::new(),
                    class_body: Vec::new(),
                })),
            })
        }
        "object_creation_expression" => return translate_object_creation(cst),
        "array_creation_expression" => return translate_array_creation(cst),
        "array_initializer" => {
            let values = cst.children().iter().map(translate_expr).collect::<Result<Vec<_>>>()?;
            return Ok(node_ref(Node::Expression(Expression::LiteralValue(LiteralValue { values }))));
        }
        "lambda_expression" => return translate_lambda(cst),
        "method_reference" => {
            let operand_cst = cst
                .children()
                .into_iter()
                .next()
                .ok_or_else(|| missing("method_reference", "operand"))?;
            let name_cst = cst.children().into_iter().nth(1).ok_or_else(|| missing("method_reference", "name"))?;
            let operand = if operand_cst.kind() == "type_identifier" || operand_cst.kind() == "generic_type" {
                translate_type(&operand_cst)?
            } else {
                translate_expr(&operand_cst)?
            };
            Expression::MethodReference(MethodReference {
                operand,
                name: ident(&name_cst, IdentifierKind::Method),
            })
        }
        "class_literal" => {
            let ty = cst.children().into_iter().next().ok_or_else(|| missing("class_literal", "type"))?;
            Expression::ClassLiteral(ClassLiteral { r#type: translate_type(&ty)? })
        }
        "generic_type" | "scoped_type_identifier" | "array_type" | "wildcard" | "annotated_type" | "boolean_type"
        | "integral_type" | "floating_point_type" | "void_type" => return translate_type(cst),
        _ => return Err(unsupported(cst)),
    };
    Ok(node_ref(Node::Expression(expr)))
}

/// Extracts the infix/prefix/postfix operator token of an expression whose
/// grammar exposes the operator only as an anonymous sibling (not a named
/// field), by taking the lone unnamed child.
fn unnamed_operator<N: CstNode>(cst: &N) -> Result<String> {
    cst.children_with_anonymous()
        .into_iter()
        .find(|c| !c.is_named())
        .map(|c| c.text().to_string())
        .ok_or_else(|| missing("operator_expression", "operator"))
}

fn translate_object_creation<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let object = cst.child_by_field_name("object").map(|o| translate_expr(&o)).transpose()?;
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("object_creation_expression", "type"))?;
    let arguments = cst
        .child_by_field_name("arguments")
        .map(|a| a.children().iter().map(translate_expr).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    let class_body = cst
        .child_by_field_name("body")
        .map(|b| translate_class_body(&b))
        .transpose()?
        .unwrap_or_default();

    Ok(node_ref(Node::Declaration(Declaration::EntityCreation(EntityCreationExpression {
        object,
        r#type: translate_type(&ty)?,
        value: Some(LiteralValue { values: arguments }),
        lang_fields: Some(LangFields::Java(JavaLangFields {
            type_arguments: Vec::new(),
            dimensions: Vec::new(),
            throws: Vec::new(),
            class_body,
        })),
    }))))
}

fn translate_array_creation<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let ty = cst.child_by_field_name("type").ok_or_else(|| missing("array_creation_expression", "type"))?;
    let dimensions = cst
        .children()
        .into_iter()
        .filter(|c| c.kind() == "dimensions_expr")
        .map(|d| {
            let len = d.children().into_iter().next();
            Ok::<_, TranslateError>(node_ref(Node::Dimension(Dimension {
                length: len.map(|l| translate_expr(&l)).transpose()?,
            })))
        })
        .collect::<Result<Vec<_>>>()?;
    let value = cst
        .children()
        .into_iter()
        .find(|c| c.kind() == "array_initializer")
        .map(|v| {
            let values = v.children().iter().map(translate_expr).collect::<Result<Vec<_>>>()?;
            Ok::<_, TranslateError>(LiteralValue { values })
        })
        .transpose()?;

    Ok(node_ref(Node::Declaration(Declaration::EntityCreation(EntityCreationExpression {
        object: None,
        r#type: translate_type(&ty)?,
        value,
        lang_fields: Some(LangFields::Java(JavaLangFields {
            type_arguments: Vec::new(),
            dimensions,
            throws: Vec::new(),
            class_body: Vec::new(),
        })),
    }))))
}

fn translate_lambda<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let params_cst = cst.child_by_field_name("parameters").ok_or_else(|| missing("lambda_expression", "parameters"))?;
    let parameters = match params_cst.kind() {
        "formal_parameters" => translate_formal_parameters(&params_cst)?,
        "inferred_parameters" => params_cst
            .children()
            .iter()
            .map(|p| {
                node_ref(Node::Declaration(Declaration::Parameter(ParameterDeclaration {
                    is_variadic: false,
                    r#type: None,
                    name: Some(ident(p, IdentifierKind::Blanket)),
                    lang_fields: None,
                })))
            })
            .collect(),
        _ => vec![node_ref(Node::Declaration(Declaration::Parameter(ParameterDeclaration {
            is_variadic: false,
            r#type: None,
            name: Some(ident(&params_cst, IdentifierKind::Blanket)),
            lang_fields: None,
        })))],
    };
    let body_cst = cst.child_by_field_name("body").ok_or_else(|| missing("lambda_expression", "body"))?;
    let statements = if body_cst.kind() == "block" {
        translate_block(&body_cst)?
    } else {
        node_ref(Node::Block(Block {
            statements: vec![as_statement(translate_expr(&body_cst)?)],
        }))
    };

    Ok(node_ref(Node::Declaration(Declaration::FunctionLiteral(FunctionLiteral {
        parameters,
        returns: Vec::new(),
        statements,
    }))))
}

fn translate_type<N: CstNode>(cst: &N) -> Result<NodeRef> {
    let expr = match cst.kind() {
        "identifier" | "type_identifier" | "boolean_type" | "integral_type" | "floating_point_type" | "void_type" => {
            Expression::Identifier(ident(cst, IdentifierKind::Typ))
        }
        "scoped_type_identifier" => {
            let children = cst.children();
            let (prefix, field) = children.split_at(children.len() - 1);
            let mut base = translate_type(&prefix[0])?;
            for seg in &prefix[1..] {
                base = node_ref(Node::Expression(Expression::AccessPath(AccessPathExpression {
                    operand: base,
                    annotations: Vec::new(),
                    field: ident(seg, IdentifierKind::Typ),
                })));
            }
            Expression::AccessPath(AccessPathExpression {
                operand: base,
                annotations: Vec::new(),
                field: ident(&field[0], IdentifierKind::Typ),
            })
        }
        "generic_type" => {
            let base = cst.children().into_iter().next().ok_or_else(|| missing("generic_type", "base"))?;
            let args = cst
                .children()
                .into_iter()
                .find(|c| c.kind() == "type_arguments")
                .map(|a| a.children().iter().map(translate_type).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Expression::GenericType(GenericType {
                base: translate_type(&base)?,
                type_arguments: args,
            })
        }
        "array_type" => {
            let element = cst.child_by_field_name("element").ok_or_else(|| missing("array_type", "element"))?;
            let dims_cst = cst.child_by_field_name("dimensions").ok_or_else(|| missing("array_type", "dimensions"))?;
            let dimensions = dims_cst
                .children_with_anonymous()
                .iter()
                .filter(|c| c.kind() == "[" || c.kind() == "dimension")
                .map(|_| node_ref(Node::Dimension(Dimension { length: None })))
                .collect();
            Expression::JavaArrayType(JavaArrayType {
                element: translate_type(&element)?,
                dimensions,
            })
        }
        "wildcard" => {
            let bound_cst = cst.children().into_iter().next();
            let text = cst.text();
            let (kind, bound) = if text.contains("super") {
                (WildcardKind::Super, bound_cst)
            } else if text.contains("extends") {
                (WildcardKind::Extends, bound_cst)
            } else {
                (WildcardKind::Unbounded, None)
            };
            Expression::Wildcard(Wildcard {
                kind,
                bound: bound.map(|b| translate_type(&b)).transpose()?,
            })
        }
        "annotated_type" => {
            let annotations = cst
                .children()
                .into_iter()
                .filter(|c| c.kind() == "annotation" || c.kind() == "marker_annotation")
                .map(|a| translate_annotation(&a))
                .collect::<Result<Vec<_>>>()?;
            let inner = cst
                .children()
                .into_iter()
                .find(|c| c.kind() != "annotation" && c.kind() != "marker_annotation")
                .ok_or_else(|| missing("annotated_type", "type"))?;
            Expression::AnnotatedType(AnnotatedType {
                annotations,
                r#type: translate_type(&inner)?,
            })
        }
        _ => return Err(unsupported(cst)),
    };
    Ok(node_ref(Node::Expression(expr)))
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
    fn translates_a_final_modifier() {
        let modifiers = SimpleNodeBuilder::new("modifiers", Span::new(0, 5))
            .child(leaf("final", "final"))
            .build();
        let out = translate_modifiers(Some(modifiers)).unwrap();
        assert_eq!(out.len(), 1);
        match out[0].as_ref() {
            Node::Expression(Expression::LiteralModifier(m)) => assert_eq!(m, "final"),
            _ => panic!("expected a literal modifier"),
        }
    }

    #[test]
    fn if_statement_with_empty_consequence_has_no_consequence() {
        let empty_block = SimpleNodeBuilder::new("block", Span::new(0, 2)).build();
        let cst = SimpleNodeBuilder::new("if_statement", Span::new(0, 10))
            .field("condition", leaf("identifier", "ok"))
            .field("consequence", empty_block)
            .build();
        let node = translate_if_statement(&cst).unwrap();
        match node.as_ref() {
            Node::Statement(Statement::If(s)) => assert!(s.consequence.is_none()),
            _ => panic!("expected an if statement"),
        }
    }

    #[test]
    fn unrecognized_kind_is_an_error() {
        let cst = leaf("frobnicate_expression", "???");
        let err = translate_expr(&cst).unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedNodeKind { .. }));
    }
}

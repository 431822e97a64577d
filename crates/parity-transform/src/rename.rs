//! The private-identifier renamer (spec 4.D).
//!
//! The Renamer never mutates the forest it is given — `Identifier.kind` is
//! the only field the rest of the pipeline ever touches in place, and
//! renaming isn't that (spec 3.1, 5: "the renamer returns a fresh forest and
//! the original is dropped once checking begins"). So this builds a brand
//! new tree bottom-up, matching every [`Node`] shape, substituting a
//! canonical name wherever an [`Identifier`] occurrence resolves to a
//! private declaration and cloning everything else untouched.

use std::collections::HashMap;
use std::rc::Rc;

use parity_mast::node::*;
use parity_mast::{MastError, Node, NodeRef};
use parity_symbols::SymbolTable;

use crate::error::TransformError;

/// Prefix for a renamed private identifier's canonical name.
///
/// Starts with `_`, so a renamed Go-like identifier is still classified
/// private by [`is_go_name_private`](parity_symbols) after re-symbolication
/// — required for [`rename`]'s idempotency (spec 8: `rename(rename(F)) =
/// rename(F)`), since re-running assigns the same canonical names only if
/// privacy and declaration order are both unaffected by the first pass.
const CANONICAL_PREFIX: &str = "_v";

/// Rewrites every private identifier occurrence in `roots` to a canonical,
/// positional name drawn from `table`'s insertion order (spec 4.D).
///
/// An occurrence whose entry is absent from `table`, or present but not
/// private, is preserved verbatim. The result is a wholly new forest; `roots`
/// is untouched, satisfying the "pure function over MAST" contract.
pub fn rename(roots: &[NodeRef], table: &SymbolTable) -> Result<Vec<NodeRef>, TransformError> {
    let names = canonical_names(table);
    roots.iter().map(|root| rename_node(root, &names, table)).collect()
}

/// Assigns one canonical name per distinct private declaration, in the
/// symbol table's insertion order (spec 4.D: "positional names from the
/// symbol table's ordered iteration"). Distinct occurrences resolving to the
/// same declaration share a canonical name, matching the one-entry-per-
/// declaration model.
fn canonical_names(table: &SymbolTable) -> HashMap<usize, String> {
    let mut names = HashMap::new();
    let mut next = 0usize;
    for entry in table.ordered_symbols() {
        if !entry.is_private.get() {
            continue;
        }
        let key = Rc::as_ptr(entry) as usize;
        names.entry(key).or_insert_with(|| {
            let name = format!("{CANONICAL_PREFIX}{next}");
            next += 1;
            name
        });
    }
    names
}

fn rename_identifier(id: &Identifier, names: &HashMap<usize, String>, table: &SymbolTable) -> Identifier {
    let canonical = table.declaration_entry(id).and_then(|entry| {
        if entry.is_private.get() {
            names.get(&(Rc::as_ptr(entry) as usize)).cloned()
        } else {
            None
        }
    });
    match canonical {
        Some(name) => Identifier::new(name, id.kind.get(), id.span),
        None => id.clone(),
    }
}

fn rename_opt(o: &Option<NodeRef>, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Option<NodeRef>, TransformError> {
    o.as_ref().map(|n| rename_node(n, names, table)).transpose()
}

fn rename_vec(v: &[NodeRef], names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Vec<NodeRef>, TransformError> {
    v.iter().map(|n| rename_node(n, names, table)).collect()
}

fn rename_lang_fields(lf: &Option<LangFields>, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Option<LangFields>, TransformError> {
    let Some(lf) = lf else { return Ok(None) };
    let out = match lf {
        LangFields::Go(g) => LangFields::Go(GoLangFields {
            type_arguments: rename_vec(&g.type_arguments, names, table)?,
        }),
        LangFields::Java(j) => LangFields::Java(JavaLangFields {
            type_arguments: rename_vec(&j.type_arguments, names, table)?,
            dimensions: rename_vec(&j.dimensions, names, table)?,
            throws: rename_vec(&j.throws, names, table)?,
            class_body: rename_vec(&j.class_body, names, table)?,
        }),
    };
    Ok(Some(out))
}

fn rename_literal_value(v: &LiteralValue, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<LiteralValue, TransformError> {
    Ok(LiteralValue {
        values: rename_vec(&v.values, names, table)?,
    })
}

/// Rebuilds a single node, substituting canonical names for every private
/// identifier occurrence reachable from it.
fn rename_node(node: &NodeRef, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<NodeRef, TransformError> {
    let renamed = match node.as_ref() {
        Node::Root(r) => Node::Root(Root {
            declarations: rename_vec(&r.declarations, names, table)?,
        }),
        Node::Block(b) => Node::Block(Block {
            statements: rename_vec(&b.statements, names, table)?,
        }),
        Node::TempGroup(_) => return Err(MastError::TempGroupSurvived.into()),
        Node::SwitchCase(c) => Node::SwitchCase(SwitchCase {
            values: rename_vec(&c.values, names, table)?,
            stmts: rename_vec(&c.stmts, names, table)?,
        }),
        Node::KeyValuePair(kv) => Node::KeyValuePair(KeyValuePair {
            key: rename_node(&kv.key, names, table)?,
            value: rename_node(&kv.value, names, table)?,
        }),
        Node::Dimension(d) => Node::Dimension(Dimension {
            length: rename_opt(&d.length, names, table)?,
        }),
        Node::TypeParameter(t) => Node::TypeParameter(TypeParameter {
            name: rename_identifier(&t.name, names, table),
            bounds: rename_vec(&t.bounds, names, table)?,
        }),
        Node::ModuleDirective(m) => Node::ModuleDirective(ModuleDirective {
            keyword: m.keyword.clone(),
            targets: rename_vec(&m.targets, names, table)?,
        }),
        Node::CatchClause(c) => Node::CatchClause(CatchClause {
            modifiers: rename_vec(&c.modifiers, names, table)?,
            types: rename_vec(&c.types, names, table)?,
            name: rename_identifier(&c.name, names, table),
            body: rename_node(&c.body, names, table)?,
        }),
        Node::FinallyClause(f) => Node::FinallyClause(FinallyClause {
            body: rename_node(&f.body, names, table)?,
        }),
        Node::CommunicationCase(c) => Node::CommunicationCase(CommunicationCase {
            comm: rename_opt(&c.comm, names, table)?,
            stmts: rename_vec(&c.stmts, names, table)?,
        }),
        Node::Declaration(d) => Node::Declaration(rename_declaration(d, names, table)?),
        Node::Statement(s) => Node::Statement(rename_statement(s, names, table)?),
        Node::Expression(e) => Node::Expression(rename_expression(e, names, table)?),
    };
    Ok(Rc::new(renamed))
}

fn rename_declaration(decl: &Declaration, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Declaration, TransformError> {
    Ok(match decl {
        Declaration::Package(p) => Declaration::Package(PackageDeclaration {
            annotation: rename_opt(&p.annotation, names, table)?,
            name: rename_identifier(&p.name, names, table),
        }),
        Declaration::Import(i) => Declaration::Import(ImportDeclaration {
            alias: i.alias.as_ref().map(|a| rename_identifier(a, names, table)),
            package: i.package.clone(),
        }),
        Declaration::Parameter(p) => Declaration::Parameter(ParameterDeclaration {
            is_variadic: p.is_variadic,
            r#type: rename_opt(&p.r#type, names, table)?,
            name: p.name.as_ref().map(|n| rename_identifier(n, names, table)),
            lang_fields: rename_lang_fields(&p.lang_fields, names, table)?,
        }),
        Declaration::Variable(v) => Declaration::Variable(VariableDeclaration {
            names: v.names.iter().map(|n| rename_identifier(n, names, table)).collect(),
            r#type: rename_opt(&v.r#type, names, table)?,
            value: rename_opt(&v.value, names, table)?,
            is_const: v.is_const,
            modifiers: rename_vec(&v.modifiers, names, table)?,
            lang_fields: rename_lang_fields(&v.lang_fields, names, table)?,
        }),
        Declaration::Field(f) => Declaration::Field(FieldDeclaration {
            name: f.name.as_ref().map(|n| rename_identifier(n, names, table)),
            r#type: rename_node(&f.r#type, names, table)?,
            modifiers: rename_vec(&f.modifiers, names, table)?,
            lang_fields: rename_lang_fields(&f.lang_fields, names, table)?,
        }),
        Declaration::Function(f) => Declaration::Function(FunctionDeclaration {
            name: rename_identifier(&f.name, names, table),
            receiver: rename_opt(&f.receiver, names, table)?,
            parameters: rename_vec(&f.parameters, names, table)?,
            returns: rename_vec(&f.returns, names, table)?,
            modifiers: rename_vec(&f.modifiers, names, table)?,
            statements: rename_opt(&f.statements, names, table)?,
            lang_fields: rename_lang_fields(&f.lang_fields, names, table)?,
        }),
        Declaration::FunctionLiteral(f) => Declaration::FunctionLiteral(FunctionLiteral {
            parameters: rename_vec(&f.parameters, names, table)?,
            returns: rename_vec(&f.returns, names, table)?,
            statements: rename_node(&f.statements, names, table)?,
        }),
        Declaration::EntityCreation(e) => Declaration::EntityCreation(EntityCreationExpression {
            object: rename_opt(&e.object, names, table)?,
            r#type: rename_node(&e.r#type, names, table)?,
            value: e.value.as_ref().map(|v| rename_literal_value(v, names, table)).transpose()?,
            lang_fields: rename_lang_fields(&e.lang_fields, names, table)?,
        }),
        Declaration::Annotation(a) => Declaration::Annotation(Annotation {
            name: rename_identifier(&a.name, names, table),
            arguments: rename_vec(&a.arguments, names, table)?,
        }),
        Declaration::Type(t) => Declaration::Type(TypeDeclaration {
            is_alias: t.is_alias,
            name: rename_identifier(&t.name, names, table),
            r#type: rename_node(&t.r#type, names, table)?,
        }),
        Declaration::Module(m) => Declaration::Module(ModuleDeclaration {
            is_open: m.is_open,
            name: m.name.clone(),
            directives: rename_vec(&m.directives, names, table)?,
        }),
        Declaration::Class(c) => Declaration::Class(ClassDeclaration {
            modifiers: rename_vec(&c.modifiers, names, table)?,
            name: rename_identifier(&c.name, names, table),
            type_parameters: rename_vec(&c.type_parameters, names, table)?,
            superclass: rename_opt(&c.superclass, names, table)?,
            interfaces: rename_vec(&c.interfaces, names, table)?,
            body: rename_vec(&c.body, names, table)?,
        }),
        Declaration::Interface(i) => Declaration::Interface(InterfaceDeclaration {
            modifiers: rename_vec(&i.modifiers, names, table)?,
            name: rename_identifier(&i.name, names, table),
            type_parameters: rename_vec(&i.type_parameters, names, table)?,
            extends: rename_vec(&i.extends, names, table)?,
            body: rename_vec(&i.body, names, table)?,
        }),
        Declaration::Enum(e) => Declaration::Enum(EnumDeclaration {
            modifiers: rename_vec(&e.modifiers, names, table)?,
            name: rename_identifier(&e.name, names, table),
            interfaces: rename_vec(&e.interfaces, names, table)?,
            constants: rename_vec(&e.constants, names, table)?,
            body: rename_vec(&e.body, names, table)?,
        }),
        Declaration::EnumConstant(e) => Declaration::EnumConstant(EnumConstantDeclaration {
            name: rename_identifier(&e.name, names, table),
            arguments: rename_vec(&e.arguments, names, table)?,
            class_body: rename_vec(&e.class_body, names, table)?,
        }),
        Declaration::ClassInitializer(c) => Declaration::ClassInitializer(ClassInitializer {
            is_static: c.is_static,
            body: rename_node(&c.body, names, table)?,
        }),
        Declaration::AnnotationDecl(a) => Declaration::AnnotationDecl(AnnotationDeclaration {
            modifiers: rename_vec(&a.modifiers, names, table)?,
            name: rename_identifier(&a.name, names, table),
            body: rename_vec(&a.body, names, table)?,
        }),
        Declaration::AnnotationElement(a) => Declaration::AnnotationElement(AnnotationElementDeclaration {
            modifiers: rename_vec(&a.modifiers, names, table)?,
            r#type: rename_node(&a.r#type, names, table)?,
            name: rename_identifier(&a.name, names, table),
            default: rename_opt(&a.default, names, table)?,
        }),
    })
}

fn rename_statement(stmt: &Statement, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Statement, TransformError> {
    Ok(match stmt {
        Statement::Expression(s) => Statement::Expression(ExpressionStatement {
            expr: rename_node(&s.expr, names, table)?,
        }),
        Statement::Declaration(s) => Statement::Declaration(DeclarationStatement {
            decl: rename_node(&s.decl, names, table)?,
        }),
        Statement::Continue(s) => Statement::Continue(ContinueStatement {
            label: s.label.as_ref().map(|l| rename_identifier(l, names, table)),
        }),
        Statement::Break(s) => Statement::Break(BreakStatement {
            label: s.label.as_ref().map(|l| rename_identifier(l, names, table)),
        }),
        Statement::Return(s) => Statement::Return(ReturnStatement {
            exprs: rename_vec(&s.exprs, names, table)?,
        }),
        Statement::If(s) => Statement::If(IfStatement {
            initializer: rename_opt(&s.initializer, names, table)?,
            condition: rename_node(&s.condition, names, table)?,
            consequence: rename_opt(&s.consequence, names, table)?,
            alternative: rename_opt(&s.alternative, names, table)?,
        }),
        Statement::Switch(s) => Statement::Switch(SwitchStatement {
            initializer: rename_opt(&s.initializer, names, table)?,
            value: rename_opt(&s.value, names, table)?,
            cases: rename_vec(&s.cases, names, table)?,
        }),
        Statement::Label(s) => Statement::Label(LabelStatement {
            label: rename_identifier(&s.label, names, table),
        }),
        Statement::For(s) => Statement::For(ForStatement {
            initializers: rename_vec(&s.initializers, names, table)?,
            condition: rename_opt(&s.condition, names, table)?,
            updates: rename_vec(&s.updates, names, table)?,
            body: rename_opt(&s.body, names, table)?,
        }),
        Statement::Defer(s) => Statement::Defer(DeferStatement {
            call: rename_node(&s.call, names, table)?,
        }),
        Statement::Goto(s) => Statement::Goto(GotoStatement {
            label: rename_identifier(&s.label, names, table),
        }),
        Statement::Fallthrough(_) => Statement::Fallthrough(FallthroughStatement),
        Statement::Send(s) => Statement::Send(SendStatement {
            channel: rename_node(&s.channel, names, table)?,
            value: rename_node(&s.value, names, table)?,
        }),
        Statement::Go(s) => Statement::Go(GoStatement {
            call: rename_node(&s.call, names, table)?,
        }),
        Statement::ForRange(s) => Statement::ForRange(ForRangeStatement {
            key: rename_opt(&s.key, names, table)?,
            value: rename_opt(&s.value, names, table)?,
            is_decl: s.is_decl,
            operand: rename_node(&s.operand, names, table)?,
            body: rename_node(&s.body, names, table)?,
        }),
        Statement::Select(s) => Statement::Select(SelectStatement {
            cases: rename_vec(&s.cases, names, table)?,
        }),
        Statement::Try(s) => Statement::Try(TryStatement {
            resources: rename_vec(&s.resources, names, table)?,
            body: rename_node(&s.body, names, table)?,
            catches: rename_vec(&s.catches, names, table)?,
            finally_clause: rename_opt(&s.finally_clause, names, table)?,
        }),
        Statement::While(s) => Statement::While(WhileStatement {
            condition: rename_node(&s.condition, names, table)?,
            body: rename_node(&s.body, names, table)?,
        }),
        Statement::Throw(s) => Statement::Throw(ThrowStatement {
            expr: rename_node(&s.expr, names, table)?,
        }),
        Statement::Assert(s) => Statement::Assert(AssertStatement {
            condition: rename_node(&s.condition, names, table)?,
            message: rename_opt(&s.message, names, table)?,
        }),
        Statement::Synchronized(s) => Statement::Synchronized(SynchronizedStatement {
            expr: rename_node(&s.expr, names, table)?,
            body: rename_node(&s.body, names, table)?,
        }),
        Statement::Do(s) => Statement::Do(DoStatement {
            body: rename_node(&s.body, names, table)?,
            condition: rename_node(&s.condition, names, table)?,
        }),
        Statement::EnhancedFor(s) => Statement::EnhancedFor(EnhancedForStatement {
            modifiers: rename_vec(&s.modifiers, names, table)?,
            r#type: rename_opt(&s.r#type, names, table)?,
            name: rename_identifier(&s.name, names, table),
            operand: rename_node(&s.operand, names, table)?,
            body: rename_node(&s.body, names, table)?,
        }),
    })
}

fn rename_expression(expr: &Expression, names: &HashMap<usize, String>, table: &SymbolTable) -> Result<Expression, TransformError> {
    Ok(match expr {
        Expression::Identifier(id) => Expression::Identifier(rename_identifier(id, names, table)),
        Expression::Null => Expression::Null,
        Expression::Boolean(b) => Expression::Boolean(*b),
        Expression::Int(s) => Expression::Int(s.clone()),
        Expression::Float(s) => Expression::Float(s.clone()),
        Expression::Str(s) => Expression::Str(StringLiteral {
            value: s.value.clone(),
            is_raw: s.is_raw,
        }),
        Expression::Character(s) => Expression::Character(s.clone()),
        Expression::Unary(e) => Expression::Unary(UnaryExpression {
            op: e.op.clone(),
            expr: rename_node(&e.expr, names, table)?,
        }),
        Expression::Binary(e) => Expression::Binary(BinaryExpression {
            op: e.op.clone(),
            left: rename_node(&e.left, names, table)?,
            right: rename_node(&e.right, names, table)?,
        }),
        Expression::Update(e) => Expression::Update(UpdateExpression {
            op_side: e.op_side,
            op: e.op.clone(),
            operand: rename_node(&e.operand, names, table)?,
        }),
        Expression::Parenthesized(e) => Expression::Parenthesized(ParenthesizedExpression {
            expr: rename_node(&e.expr, names, table)?,
        }),
        Expression::Index(e) => Expression::Index(IndexExpression {
            operand: rename_node(&e.operand, names, table)?,
            index: rename_node(&e.index, names, table)?,
        }),
        Expression::AccessPath(e) => Expression::AccessPath(AccessPathExpression {
            operand: rename_node(&e.operand, names, table)?,
            annotations: rename_vec(&e.annotations, names, table)?,
            field: rename_identifier(&e.field, names, table),
        }),
        Expression::Call(e) => Expression::Call(Call {
            function: rename_node(&e.function, names, table)?,
            arguments: rename_vec(&e.arguments, names, table)?,
            lang_fields: rename_lang_fields(&e.lang_fields, names, table)?,
        }),
        Expression::Cast(e) => Expression::Cast(Cast {
            types: rename_vec(&e.types, names, table)?,
            operand: rename_node(&e.operand, names, table)?,
        }),
        Expression::Assignment(e) => Expression::Assignment(Assignment {
            is_short_var_decl: e.is_short_var_decl,
            left: rename_vec(&e.left, names, table)?,
            right: rename_vec(&e.right, names, table)?,
        }),
        Expression::LiteralValue(e) => Expression::LiteralValue(rename_literal_value(e, names, table)?),
        Expression::ChannelType(e) => Expression::ChannelType(ChannelType {
            direction: e.direction,
            element: rename_node(&e.element, names, table)?,
        }),
        Expression::MapType(e) => Expression::MapType(MapType {
            key: rename_node(&e.key, names, table)?,
            value: rename_node(&e.value, names, table)?,
        }),
        Expression::SliceExpression(e) => Expression::SliceExpression(SliceExpression {
            operand: rename_node(&e.operand, names, table)?,
            low: rename_opt(&e.low, names, table)?,
            high: rename_opt(&e.high, names, table)?,
            max: rename_opt(&e.max, names, table)?,
        }),
        Expression::EllipsisExpression(e) => Expression::EllipsisExpression(EllipsisExpression {
            expr: rename_opt(&e.expr, names, table)?,
        }),
        Expression::ImaginaryLiteral(s) => Expression::ImaginaryLiteral(s.clone()),
        Expression::PointerType(e) => Expression::PointerType(PointerType {
            base: rename_node(&e.base, names, table)?,
        }),
        Expression::ArrayType(e) => Expression::ArrayType(ArrayType {
            length: rename_opt(&e.length, names, table)?,
            element: rename_node(&e.element, names, table)?,
        }),
        Expression::ParenthesizedType(e) => Expression::ParenthesizedType(ParenthesizedType {
            r#type: rename_node(&e.r#type, names, table)?,
        }),
        Expression::FunctionType(e) => Expression::FunctionType(FunctionType {
            parameters: rename_vec(&e.parameters, names, table)?,
            returns: rename_vec(&e.returns, names, table)?,
        }),
        Expression::TypeAssertionExpression(e) => Expression::TypeAssertionExpression(TypeAssertionExpression {
            operand: rename_node(&e.operand, names, table)?,
            r#type: rename_opt(&e.r#type, names, table)?,
        }),
        Expression::TypeSwitchHeaderExpression(e) => Expression::TypeSwitchHeaderExpression(TypeSwitchHeaderExpression {
            operand: rename_node(&e.operand, names, table)?,
        }),
        Expression::StructType(e) => Expression::StructType(StructType {
            declarations: rename_vec(&e.declarations, names, table)?,
        }),
        Expression::InterfaceType(e) => Expression::InterfaceType(InterfaceType {
            declarations: rename_vec(&e.declarations, names, table)?,
        }),
        Expression::Ternary(e) => Expression::Ternary(TernaryExpression {
            condition: rename_node(&e.condition, names, table)?,
            then_branch: rename_node(&e.then_branch, names, table)?,
            else_branch: rename_node(&e.else_branch, names, table)?,
        }),
        Expression::AnnotatedType(e) => Expression::AnnotatedType(AnnotatedType {
            annotations: rename_vec(&e.annotations, names, table)?,
            r#type: rename_node(&e.r#type, names, table)?,
        }),
        Expression::GenericType(e) => Expression::GenericType(GenericType {
            base: rename_node(&e.base, names, table)?,
            type_arguments: rename_vec(&e.type_arguments, names, table)?,
        }),
        Expression::Wildcard(e) => Expression::Wildcard(Wildcard {
            kind: e.kind,
            bound: rename_opt(&e.bound, names, table)?,
        }),
        Expression::JavaArrayType(e) => Expression::JavaArrayType(JavaArrayType {
            element: rename_node(&e.element, names, table)?,
            dimensions: rename_vec(&e.dimensions, names, table)?,
        }),
        Expression::InstanceOf(e) => Expression::InstanceOf(InstanceOfExpression {
            operand: rename_node(&e.operand, names, table)?,
            r#type: rename_node(&e.r#type, names, table)?,
            pattern_name: e.pattern_name.as_ref().map(|n| rename_identifier(n, names, table)),
        }),
        Expression::LiteralModifier(s) => Expression::LiteralModifier(s.clone()),
        Expression::MethodReference(e) => Expression::MethodReference(MethodReference {
            operand: rename_node(&e.operand, names, table)?,
            name: rename_identifier(&e.name, names, table),
        }),
        Expression::ClassLiteral(e) => Expression::ClassLiteral(ClassLiteral {
            r#type: rename_node(&e.r#type, names, table)?,
        }),
    })
}

#[cfg(test)]
mod tests {
    use parity_cst::{LanguageFamily, SimpleNode, SimpleNodeBuilder, Span};
    use parity_symbols::symbolicate;
    use parity_translate::translate_root;
    use pretty_assertions::assert_eq;

    use super::*;

    fn names_in(root: &NodeRef) -> Vec<String> {
        let mut seen = Vec::new();
        parity_mast::inspect(root, |n| {
            if let Node::Expression(Expression::Identifier(id)) = n.as_ref() {
                seen.push(id.name.clone());
            }
        })
        .unwrap();
        seen
    }

    /// `package p; var s = 7; func f() int { return s }`, hand-built to
    /// avoid depending on a concrete parser — exactly the scenario spec 8.1
    /// ("private rename") checks.
    fn sample_go_file() -> SimpleNode {
        let package = SimpleNodeBuilder::new("package_clause", Span::new(0, 1))
            .field("name", SimpleNode::leaf("package_identifier", "p", Span::new(0, 1)))
            .build();

        let var_spec = SimpleNodeBuilder::new("var_spec", Span::new(0, 1))
            .field("name", SimpleNode::leaf("identifier", "s", Span::new(0, 1)))
            .field("value", SimpleNode::leaf("int_literal", "7", Span::new(0, 1)))
            .build();
        let var_decl = SimpleNodeBuilder::new("var_declaration", Span::new(0, 1)).child(var_spec).build();

        let ret = SimpleNodeBuilder::new("return_statement", Span::new(0, 1))
            .child(SimpleNode::leaf("identifier", "s", Span::new(0, 1)))
            .build();
        let body = SimpleNodeBuilder::new("block", Span::new(0, 1)).child(ret).build();
        let func = SimpleNodeBuilder::new("function_declaration", Span::new(0, 1))
            .field("name", SimpleNode::leaf("identifier", "f", Span::new(0, 1)))
            .field("result", SimpleNode::leaf("type_identifier", "int", Span::new(0, 1)))
            .field("body", body)
            .build();

        SimpleNodeBuilder::new("source_file", Span::new(0, 1))
            .child(package)
            .child(var_decl)
            .child(func)
            .build()
    }

    #[test]
    fn renames_only_private_occurrences() {
        let cst = sample_go_file();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root.clone()]).unwrap();

        let renamed = rename(&[root.clone()], &table).unwrap();
        let renamed_names = names_in(&renamed[0]);

        // `s` is a private package-level var, used once: both occurrences
        // (declaration and use) must share one canonical name.
        assert_eq!(renamed_names.iter().filter(|n| n.starts_with("_v")).count(), renamed_names.len());
        assert_eq!(renamed_names[0], renamed_names[1]);
    }

    #[test]
    fn rename_is_idempotent() {
        let cst = sample_go_file();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root.clone()]).unwrap();
        let once = rename(&[root], &table).unwrap();

        let table2 = symbolicate(LanguageFamily::Go, &once).unwrap();
        let twice = rename(&once, &table2).unwrap();

        assert_eq!(names_in(&once[0]), names_in(&twice[0]));
    }

    #[test]
    fn original_forest_is_untouched() {
        let cst = sample_go_file();
        let root = translate_root(LanguageFamily::Go, &cst).unwrap();
        let table = symbolicate(LanguageFamily::Go, &[root.clone()]).unwrap();
        let original_names = names_in(&root);

        let _ = rename(&[root.clone()], &table).unwrap();
        assert_eq!(names_in(&root), original_names);
    }
}

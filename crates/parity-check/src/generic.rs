//! Structural equality over the pan-language MAST shapes (spec 4.E layer 1).
//!
//! Two nodes are equivalent iff they are the same variant and every field
//! is equivalent; literal textual fields compare by byte equality and
//! enumeration fields by enumerator equality (spec 4.E "top-level
//! contract"). This module never checks `renamingOn`/`loggingOn` and knows
//! nothing about symbol tables — every relaxation is layered on top of it
//! by [`crate::go::GoChecker`] / [`crate::java::JavaChecker`], which fall
//! back here once their own special cases don't apply.

use parity_mast::node::*;
use parity_mast::{MastError, Node, NodeRef};

use crate::checker::check_declaration_list;
use crate::checker::check_opt;
use crate::checker::check_seq;
use crate::checker::check_statement_list;
use crate::checker::NodeChecker;
use crate::error::CheckError;

pub(crate) fn ident_eq(a: &Identifier, b: &Identifier) -> bool {
    a.name == b.name
}

pub(crate) fn opt_ident_eq(a: &Option<Identifier>, b: &Option<Identifier>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => ident_eq(x, y),
        _ => false,
    }
}

pub(crate) fn idents_eq(a: &[Identifier], b: &[Identifier]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| ident_eq(x, y))
}

pub(crate) fn lang_fields_eq(c: &dyn NodeChecker, a: &Option<LangFields>, b: &Option<LangFields>) -> Result<bool, CheckError> {
    match (a, b) {
        (None, None) => Ok(true),
        (Some(LangFields::Go(x)), Some(LangFields::Go(y))) => check_seq(c, &x.type_arguments, &y.type_arguments),
        (Some(LangFields::Java(x)), Some(LangFields::Java(y))) => Ok(check_seq(c, &x.type_arguments, &y.type_arguments)?
            && check_seq(c, &x.dimensions, &y.dimensions)?
            && check_seq(c, &x.throws, &y.throws)?
            && check_seq(c, &x.class_body, &y.class_body)?),
        _ => Ok(false),
    }
}

fn check_literal_value(c: &dyn NodeChecker, a: &LiteralValue, b: &LiteralValue) -> Result<bool, CheckError> {
    check_seq(c, &a.values, &b.values)
}

/// The generic fallback every language checker delegates to once its own
/// overrides don't apply. Also the sole entry point used when neither side
/// has a symbol table (spec 4.E: "If either symbol table is absent,
/// equivalence is pure structural").
pub fn check_node_generic(c: &dyn NodeChecker, a: &NodeRef, b: &NodeRef) -> Result<bool, CheckError> {
    Ok(match (a.as_ref(), b.as_ref()) {
        // A TempGroup surviving to the checker is the spec 3.1/7 invariant
        // violation; it is never silently treated as unequal.
        (Node::TempGroup(_), _) | (_, Node::TempGroup(_)) => return Err(MastError::TempGroupSurvived.into()),
        (Node::Root(x), Node::Root(y)) => check_declaration_list(c, &x.declarations, &y.declarations)?,
        (Node::Block(x), Node::Block(y)) => check_statement_list(c, &x.statements, &y.statements)?,
        (Node::SwitchCase(x), Node::SwitchCase(y)) => check_seq(c, &x.values, &y.values)? && check_statement_list(c, &x.stmts, &y.stmts)?,
        (Node::KeyValuePair(x), Node::KeyValuePair(y)) => c.check(c, &x.key, &y.key)? && c.check(c, &x.value, &y.value)?,
        (Node::Dimension(x), Node::Dimension(y)) => check_opt(c, &x.length, &y.length)?,
        (Node::TypeParameter(x), Node::TypeParameter(y)) => ident_eq(&x.name, &y.name) && check_seq(c, &x.bounds, &y.bounds)?,
        (Node::ModuleDirective(x), Node::ModuleDirective(y)) => x.keyword == y.keyword && check_seq(c, &x.targets, &y.targets)?,
        (Node::CatchClause(x), Node::CatchClause(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)? && check_seq(c, &x.types, &y.types)? && ident_eq(&x.name, &y.name) && c.check(c, &x.body, &y.body)?
        }
        (Node::FinallyClause(x), Node::FinallyClause(y)) => c.check(c, &x.body, &y.body)?,
        (Node::CommunicationCase(x), Node::CommunicationCase(y)) => check_opt(c, &x.comm, &y.comm)? && check_statement_list(c, &x.stmts, &y.stmts)?,
        (Node::Declaration(x), Node::Declaration(y)) => check_declaration(c, x, y)?,
        (Node::Statement(x), Node::Statement(y)) => check_statement(c, x, y)?,
        (Node::Expression(x), Node::Expression(y)) => check_expression(c, x, y)?,
        _ => false,
    })
}

pub(crate) fn check_declaration(c: &dyn NodeChecker, a: &Declaration, b: &Declaration) -> Result<bool, CheckError> {
    Ok(match (a, b) {
        (Declaration::Package(x), Declaration::Package(y)) => check_opt(c, &x.annotation, &y.annotation)? && ident_eq(&x.name, &y.name),
        (Declaration::Import(x), Declaration::Import(y)) => opt_ident_eq(&x.alias, &y.alias) && x.package == y.package,
        (Declaration::Parameter(x), Declaration::Parameter(y)) => {
            x.is_variadic == y.is_variadic && check_opt(c, &x.r#type, &y.r#type)? && opt_ident_eq(&x.name, &y.name) && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?
        }
        (Declaration::Variable(x), Declaration::Variable(y)) => check_variable_declaration(c, x, y)?,
        (Declaration::Field(x), Declaration::Field(y)) => {
            opt_ident_eq(&x.name, &y.name) && c.check(c, &x.r#type, &y.r#type)? && check_seq(c, &x.modifiers, &y.modifiers)? && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?
        }
        (Declaration::Function(x), Declaration::Function(y)) => {
            ident_eq(&x.name, &y.name)
                && check_opt(c, &x.receiver, &y.receiver)?
                && check_seq(c, &x.parameters, &y.parameters)?
                && check_seq(c, &x.returns, &y.returns)?
                && check_seq(c, &x.modifiers, &y.modifiers)?
                && check_opt(c, &x.statements, &y.statements)?
                && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?
        }
        (Declaration::FunctionLiteral(x), Declaration::FunctionLiteral(y)) => {
            check_seq(c, &x.parameters, &y.parameters)? && check_seq(c, &x.returns, &y.returns)? && c.check(c, &x.statements, &y.statements)?
        }
        (Declaration::EntityCreation(x), Declaration::EntityCreation(y)) => check_entity_creation(c, x, y)?,
        (Declaration::Annotation(x), Declaration::Annotation(y)) => ident_eq(&x.name, &y.name) && check_seq(c, &x.arguments, &y.arguments)?,
        (Declaration::Type(x), Declaration::Type(y)) => x.is_alias == y.is_alias && ident_eq(&x.name, &y.name) && c.check(c, &x.r#type, &y.r#type)?,
        (Declaration::Module(x), Declaration::Module(y)) => x.is_open == y.is_open && x.name == y.name && check_seq(c, &x.directives, &y.directives)?,
        (Declaration::Class(x), Declaration::Class(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)?
                && ident_eq(&x.name, &y.name)
                && check_seq(c, &x.type_parameters, &y.type_parameters)?
                && check_opt(c, &x.superclass, &y.superclass)?
                && check_seq(c, &x.interfaces, &y.interfaces)?
                && check_declaration_list(c, &x.body, &y.body)?
        }
        (Declaration::Interface(x), Declaration::Interface(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)?
                && ident_eq(&x.name, &y.name)
                && check_seq(c, &x.type_parameters, &y.type_parameters)?
                && check_seq(c, &x.extends, &y.extends)?
                && check_declaration_list(c, &x.body, &y.body)?
        }
        (Declaration::Enum(x), Declaration::Enum(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)?
                && ident_eq(&x.name, &y.name)
                && check_seq(c, &x.interfaces, &y.interfaces)?
                && check_seq(c, &x.constants, &y.constants)?
                && check_declaration_list(c, &x.body, &y.body)?
        }
        (Declaration::EnumConstant(x), Declaration::EnumConstant(y)) => {
            ident_eq(&x.name, &y.name) && check_seq(c, &x.arguments, &y.arguments)? && check_declaration_list(c, &x.class_body, &y.class_body)?
        }
        (Declaration::ClassInitializer(x), Declaration::ClassInitializer(y)) => x.is_static == y.is_static && c.check(c, &x.body, &y.body)?,
        (Declaration::AnnotationDecl(x), Declaration::AnnotationDecl(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)? && ident_eq(&x.name, &y.name) && check_declaration_list(c, &x.body, &y.body)?
        }
        (Declaration::AnnotationElement(x), Declaration::AnnotationElement(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)? && c.check(c, &x.r#type, &y.r#type)? && ident_eq(&x.name, &y.name) && check_opt(c, &x.default, &y.default)?
        }
        _ => false,
    })
}

/// The non-relaxed equality for a variable declaration pair: language
/// checkers intercept this shape first to apply const-tightening, modifier
/// addition and constant inlining, falling back here when none of those
/// apply.
pub(crate) fn check_variable_declaration(c: &dyn NodeChecker, x: &VariableDeclaration, y: &VariableDeclaration) -> Result<bool, CheckError> {
    Ok(idents_eq(&x.names, &y.names)
        && check_opt(c, &x.r#type, &y.r#type)?
        && check_opt(c, &x.value, &y.value)?
        && x.is_const == y.is_const
        && check_seq(c, &x.modifiers, &y.modifiers)?
        && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?)
}

pub(crate) fn check_entity_creation(c: &dyn NodeChecker, x: &EntityCreationExpression, y: &EntityCreationExpression) -> Result<bool, CheckError> {
    Ok(check_opt(c, &x.object, &y.object)?
        && c.check(c, &x.r#type, &y.r#type)?
        && match (&x.value, &y.value) {
            (None, None) => true,
            (Some(a), Some(b)) => check_literal_value(c, a, b)?,
            _ => false,
        }
        && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?)
}

fn check_statement(c: &dyn NodeChecker, a: &Statement, b: &Statement) -> Result<bool, CheckError> {
    Ok(match (a, b) {
        (Statement::Expression(x), Statement::Expression(y)) => c.check(c, &x.expr, &y.expr)?,
        (Statement::Declaration(x), Statement::Declaration(y)) => c.check(c, &x.decl, &y.decl)?,
        (Statement::Continue(x), Statement::Continue(y)) => opt_ident_eq(&x.label, &y.label),
        (Statement::Break(x), Statement::Break(y)) => opt_ident_eq(&x.label, &y.label),
        (Statement::Return(x), Statement::Return(y)) => check_seq(c, &x.exprs, &y.exprs)?,
        (Statement::If(x), Statement::If(y)) => {
            check_opt(c, &x.initializer, &y.initializer)?
                && c.check(c, &x.condition, &y.condition)?
                && check_opt(c, &x.consequence, &y.consequence)?
                && check_opt(c, &x.alternative, &y.alternative)?
        }
        (Statement::Switch(x), Statement::Switch(y)) => {
            check_opt(c, &x.initializer, &y.initializer)? && check_opt(c, &x.value, &y.value)? && check_seq(c, &x.cases, &y.cases)?
        }
        (Statement::Label(x), Statement::Label(y)) => ident_eq(&x.label, &y.label),
        (Statement::For(x), Statement::For(y)) => {
            check_seq(c, &x.initializers, &y.initializers)? && check_opt(c, &x.condition, &y.condition)? && check_seq(c, &x.updates, &y.updates)? && check_opt(c, &x.body, &y.body)?
        }
        (Statement::Defer(x), Statement::Defer(y)) => c.check(c, &x.call, &y.call)?,
        (Statement::Goto(x), Statement::Goto(y)) => ident_eq(&x.label, &y.label),
        (Statement::Fallthrough(_), Statement::Fallthrough(_)) => true,
        (Statement::Send(x), Statement::Send(y)) => c.check(c, &x.channel, &y.channel)? && c.check(c, &x.value, &y.value)?,
        (Statement::Go(x), Statement::Go(y)) => c.check(c, &x.call, &y.call)?,
        (Statement::ForRange(x), Statement::ForRange(y)) => {
            check_opt(c, &x.key, &y.key)? && check_opt(c, &x.value, &y.value)? && x.is_decl == y.is_decl && c.check(c, &x.operand, &y.operand)? && c.check(c, &x.body, &y.body)?
        }
        (Statement::Select(x), Statement::Select(y)) => check_seq(c, &x.cases, &y.cases)?,
        (Statement::Try(x), Statement::Try(y)) => {
            check_seq(c, &x.resources, &y.resources)? && c.check(c, &x.body, &y.body)? && check_seq(c, &x.catches, &y.catches)? && check_opt(c, &x.finally_clause, &y.finally_clause)?
        }
        (Statement::While(x), Statement::While(y)) => c.check(c, &x.condition, &y.condition)? && c.check(c, &x.body, &y.body)?,
        (Statement::Throw(x), Statement::Throw(y)) => c.check(c, &x.expr, &y.expr)?,
        (Statement::Assert(x), Statement::Assert(y)) => c.check(c, &x.condition, &y.condition)? && check_opt(c, &x.message, &y.message)?,
        (Statement::Synchronized(x), Statement::Synchronized(y)) => c.check(c, &x.expr, &y.expr)? && c.check(c, &x.body, &y.body)?,
        (Statement::Do(x), Statement::Do(y)) => c.check(c, &x.body, &y.body)? && c.check(c, &x.condition, &y.condition)?,
        (Statement::EnhancedFor(x), Statement::EnhancedFor(y)) => {
            check_seq(c, &x.modifiers, &y.modifiers)? && check_opt(c, &x.r#type, &y.r#type)? && ident_eq(&x.name, &y.name) && c.check(c, &x.operand, &y.operand)? && c.check(c, &x.body, &y.body)?
        }
        _ => false,
    })
}

fn is_literal_expr(e: &Expression) -> bool {
    matches!(
        e,
        Expression::Null
            | Expression::Boolean(_)
            | Expression::Int(_)
            | Expression::Float(_)
            | Expression::Str(_)
            | Expression::Character(_)
            | Expression::ImaginaryLiteral(_)
            | Expression::LiteralModifier(_)
    )
}

fn check_expression(c: &dyn NodeChecker, a: &Expression, b: &Expression) -> Result<bool, CheckError> {
    if is_literal_expr(a) || is_literal_expr(b) {
        return Ok(match (a, b) {
            (Expression::Null, Expression::Null) => true,
            (Expression::Boolean(x), Expression::Boolean(y)) => x == y,
            (Expression::Int(x), Expression::Int(y)) => x == y,
            (Expression::Float(x), Expression::Float(y)) => x == y,
            (Expression::Str(x), Expression::Str(y)) => x.value == y.value && x.is_raw == y.is_raw,
            (Expression::Character(x), Expression::Character(y)) => x == y,
            (Expression::ImaginaryLiteral(x), Expression::ImaginaryLiteral(y)) => x == y,
            (Expression::LiteralModifier(x), Expression::LiteralModifier(y)) => x == y,
            _ => false,
        });
    }
    Ok(match (a, b) {
        (Expression::Identifier(x), Expression::Identifier(y)) => ident_eq(x, y),
        (Expression::Unary(x), Expression::Unary(y)) => x.op == y.op && c.check(c, &x.expr, &y.expr)?,
        (Expression::Binary(x), Expression::Binary(y)) => x.op == y.op && c.check(c, &x.left, &y.left)? && c.check(c, &x.right, &y.right)?,
        (Expression::Update(x), Expression::Update(y)) => matches!((x.op_side, y.op_side), (UpdateSide::Before, UpdateSide::Before) | (UpdateSide::After, UpdateSide::After)) && x.op == y.op && c.check(c, &x.operand, &y.operand)?,
        (Expression::Parenthesized(x), Expression::Parenthesized(y)) => c.check(c, &x.expr, &y.expr)?,
        (Expression::Index(x), Expression::Index(y)) => c.check(c, &x.operand, &y.operand)? && c.check(c, &x.index, &y.index)?,
        (Expression::AccessPath(x), Expression::AccessPath(y)) => {
            c.check(c, &x.operand, &y.operand)? && check_seq(c, &x.annotations, &y.annotations)? && ident_eq(&x.field, &y.field)
        }
        (Expression::Call(x), Expression::Call(y)) => c.check(c, &x.function, &y.function)? && check_seq(c, &x.arguments, &y.arguments)? && lang_fields_eq(c, &x.lang_fields, &y.lang_fields)?,
        (Expression::Cast(x), Expression::Cast(y)) => check_seq(c, &x.types, &y.types)? && c.check(c, &x.operand, &y.operand)?,
        (Expression::Assignment(x), Expression::Assignment(y)) => x.is_short_var_decl == y.is_short_var_decl && check_seq(c, &x.left, &y.left)? && check_seq(c, &x.right, &y.right)?,
        (Expression::LiteralValue(x), Expression::LiteralValue(y)) => check_literal_value(c, x, y)?,
        (Expression::ChannelType(x), Expression::ChannelType(y)) => channel_direction_eq(x.direction, y.direction) && c.check(c, &x.element, &y.element)?,
        (Expression::MapType(x), Expression::MapType(y)) => c.check(c, &x.key, &y.key)? && c.check(c, &x.value, &y.value)?,
        (Expression::SliceExpression(x), Expression::SliceExpression(y)) => {
            c.check(c, &x.operand, &y.operand)? && check_opt(c, &x.low, &y.low)? && check_opt(c, &x.high, &y.high)? && check_opt(c, &x.max, &y.max)?
        }
        (Expression::EllipsisExpression(x), Expression::EllipsisExpression(y)) => check_opt(c, &x.expr, &y.expr)?,
        (Expression::PointerType(x), Expression::PointerType(y)) => c.check(c, &x.base, &y.base)?,
        (Expression::ArrayType(x), Expression::ArrayType(y)) => check_opt(c, &x.length, &y.length)? && c.check(c, &x.element, &y.element)?,
        (Expression::ParenthesizedType(x), Expression::ParenthesizedType(y)) => c.check(c, &x.r#type, &y.r#type)?,
        (Expression::FunctionType(x), Expression::FunctionType(y)) => check_seq(c, &x.parameters, &y.parameters)? && check_seq(c, &x.returns, &y.returns)?,
        (Expression::TypeAssertionExpression(x), Expression::TypeAssertionExpression(y)) => c.check(c, &x.operand, &y.operand)? && check_opt(c, &x.r#type, &y.r#type)?,
        (Expression::TypeSwitchHeaderExpression(x), Expression::TypeSwitchHeaderExpression(y)) => c.check(c, &x.operand, &y.operand)?,
        (Expression::StructType(x), Expression::StructType(y)) => check_declaration_list(c, &x.declarations, &y.declarations)?,
        (Expression::InterfaceType(x), Expression::InterfaceType(y)) => check_declaration_list(c, &x.declarations, &y.declarations)?,
        (Expression::Ternary(x), Expression::Ternary(y)) => c.check(c, &x.condition, &y.condition)? && c.check(c, &x.then_branch, &y.then_branch)? && c.check(c, &x.else_branch, &y.else_branch)?,
        (Expression::AnnotatedType(x), Expression::AnnotatedType(y)) => check_seq(c, &x.annotations, &y.annotations)? && c.check(c, &x.r#type, &y.r#type)?,
        (Expression::GenericType(x), Expression::GenericType(y)) => c.check(c, &x.base, &y.base)? && check_seq(c, &x.type_arguments, &y.type_arguments)?,
        (Expression::Wildcard(x), Expression::Wildcard(y)) => wildcard_kind_eq(x.kind, y.kind) && check_opt(c, &x.bound, &y.bound)?,
        (Expression::JavaArrayType(x), Expression::JavaArrayType(y)) => c.check(c, &x.element, &y.element)? && check_seq(c, &x.dimensions, &y.dimensions)?,
        (Expression::InstanceOf(x), Expression::InstanceOf(y)) => c.check(c, &x.operand, &y.operand)? && c.check(c, &x.r#type, &y.r#type)? && opt_ident_eq(&x.pattern_name, &y.pattern_name),
        (Expression::MethodReference(x), Expression::MethodReference(y)) => c.check(c, &x.operand, &y.operand)? && ident_eq(&x.name, &y.name),
        (Expression::ClassLiteral(x), Expression::ClassLiteral(y)) => c.check(c, &x.r#type, &y.r#type)?,
        _ => false,
    })
}

fn channel_direction_eq(a: ChannelDirection, b: ChannelDirection) -> bool {
    matches!(
        (a, b),
        (ChannelDirection::Send, ChannelDirection::Send) | (ChannelDirection::Receive, ChannelDirection::Receive) | (ChannelDirection::SendReceive, ChannelDirection::SendReceive)
    )
}

fn wildcard_kind_eq(a: WildcardKind, b: WildcardKind) -> bool {
    matches!(
        (a, b),
        (WildcardKind::Unbounded, WildcardKind::Unbounded) | (WildcardKind::Extends, WildcardKind::Extends) | (WildcardKind::Super, WildcardKind::Super)
    )
}

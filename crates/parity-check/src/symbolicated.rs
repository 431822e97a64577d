//! Relaxations 2, 3, 4, and 6 (spec 4.E): the ones that need a symbol table
//! to decide whether an identifier names a private constant, or to find a
//! struct type's declared field order.
//!
//! These are plain functions rather than another [`NodeChecker`] layer —
//! each one answers a narrow question ("does `last` bind to an inlinable
//! private constant?") and the language checkers call into them from their
//! own `check` override, the same way [`crate::generic`] is called as a
//! fallback. A dedicated trait layer would only add indirection for no
//! extra reuse, since both Go and Java call the same functions.

use parity_mast::node::*;
use parity_mast::{Node, NodeRef};
use parity_symbols::SymbolTable;

use crate::checker::NodeChecker;
use crate::error::CheckError;

/// The bound value of a private constant `id` resolves to, if `id` is
/// private, constant, and its declaration carries an initializer.
pub(crate) fn private_constant_value<'a>(symbols: &'a SymbolTable, id: &Identifier) -> Option<&'a NodeRef> {
    let entry = symbols.declaration_entry(id)?;
    if !entry.is_private.get() || !entry.is_constant.get() {
        return None;
    }
    match entry.declaration_node.as_ref() {
        Node::Declaration(Declaration::Variable(v)) => v.value.as_ref(),
        _ => None,
    }
}

/// Whether `id` resolves to a constant declaration, and if so whether that
/// declaration is private.
fn constant_privacy(symbols: &SymbolTable, id: &Identifier) -> Option<bool> {
    let entry = symbols.declaration_entry(id)?;
    entry.is_constant.get().then(|| entry.is_private.get())
}

/// Constant inlining (spec 4.E relaxation 3): `last` is an identifier
/// resolving to a private constant: compare `base` directly against the
/// constant's bound value.
pub(crate) fn constant_inlined_eq(c: &dyn NodeChecker, base: &NodeRef, last: &NodeRef, last_symbols: &SymbolTable) -> Result<bool, CheckError> {
    let Node::Expression(Expression::Identifier(id)) = last.as_ref() else {
        return Ok(false);
    };
    let Some(value) = private_constant_value(last_symbols, id) else {
        return Ok(false);
    };
    c.check(c, base, value)
}

/// Private-constant rename equivalence (spec 4.E relaxation 4): both sides
/// are identifiers resolving to private constants with bound values; names
/// are irrelevant, only the bound values and matching privacy matter.
///
/// Returns `None` when the rule doesn't apply (at least one side isn't a
/// constant reference with a known value) so the caller can fall through to
/// ordinary structural comparison.
pub(crate) fn private_constant_rename_eq(
    c: &dyn NodeChecker,
    base_id: &Identifier,
    last_id: &Identifier,
    base_symbols: &SymbolTable,
    last_symbols: &SymbolTable,
) -> Result<Option<bool>, CheckError> {
    let (Some(base_private), Some(last_private)) = (constant_privacy(base_symbols, base_id), constant_privacy(last_symbols, last_id)) else {
        return Ok(None);
    };
    if base_private != last_private {
        return Ok(Some(false));
    }
    let (Some(base_value), Some(last_value)) = (private_constant_value(base_symbols, base_id), private_constant_value(last_symbols, last_id)) else {
        return Ok(None);
    };
    Ok(Some(c.check(c, base_value, last_value)?))
}

/// Struct constructor key↔positional equivalence (spec 4.E relaxation 6,
/// Go-like only). `base` uses a positional literal, `last` uses key-value
/// pairs; the field order is read off the struct type `last`'s type
/// identifier resolves to via `last_symbols`.
///
/// Returns `None` when the shapes don't match this relaxation's
/// precondition (not a positional/keyed pair, the type doesn't resolve to
/// a struct, or either side is a map/type-parameter-free constructor) so
/// the caller falls back to ordinary structural comparison.
pub(crate) fn struct_key_positional_eq(
    c: &dyn NodeChecker,
    base: &EntityCreationExpression,
    last: &EntityCreationExpression,
    last_symbols: &SymbolTable,
) -> Result<Option<bool>, CheckError> {
    let (Some(base_value), Some(last_value)) = (&base.value, &last.value) else {
        return Ok(None);
    };
    if base_value.values.is_empty() || last_value.values.is_empty() {
        return Ok(None);
    }
    let base_positional = base_value.values.iter().all(|v| !matches!(v.as_ref(), Node::KeyValuePair(_)));
    let last_keyed = last_value.values.iter().all(|v| matches!(v.as_ref(), Node::KeyValuePair(_)));
    if !(base_positional && last_keyed) {
        return Ok(None);
    }

    let Node::Expression(Expression::Identifier(type_id)) = last.r#type.as_ref() else {
        return Ok(None);
    };
    let Some(entry) = last_symbols.declaration_entry(type_id) else {
        return Ok(None);
    };
    let Node::Declaration(Declaration::Type(type_decl)) = entry.declaration_node.as_ref() else {
        return Ok(None);
    };
    let Node::Expression(Expression::StructType(struct_type)) = type_decl.r#type.as_ref() else {
        return Ok(None);
    };

    if base_value.values.len() != struct_type.declarations.len() || last_value.values.len() != struct_type.declarations.len() {
        return Ok(Some(false));
    }

    for ((field_decl, positional), keyed) in struct_type.declarations.iter().zip(base_value.values.iter()).zip(last_value.values.iter()) {
        let Node::Declaration(Declaration::Field(field)) = field_decl.as_ref() else {
            return Ok(Some(false));
        };
        // An unnamed embedded field is the spec 9 open question; reject
        // pessimistically rather than guess a positional mapping for it.
        let Some(field_name) = &field.name else {
            return Ok(Some(false));
        };
        let Node::KeyValuePair(kv) = keyed.as_ref() else {
            return Ok(Some(false));
        };
        let Node::Expression(Expression::Identifier(key_id)) = kv.key.as_ref() else {
            return Ok(Some(false));
        };
        if key_id.name != field_name.name {
            return Ok(Some(false));
        }
        if !c.check(c, positional, &kv.value)? {
            return Ok(Some(false));
        }
    }
    Ok(Some(true))
}

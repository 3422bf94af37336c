//! Expressions on a single field.

use crate::Operation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An operation with an optional operand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expression {
    op: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl Expression {
    /// Creates an expression with an operand.
    pub fn new(op: Operation, value: impl Into<Value>) -> Self {
        Self {
            op,
            value: Some(value.into()),
        }
    }

    /// Creates an expression without operand.
    #[must_use]
    pub const fn unary(op: Operation) -> Self {
        Self { op, value: None }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(Operation::Eq, value)
    }

    pub fn contains(value: impl Into<Value>) -> Self {
        Self::new(Operation::Contains, value)
    }

    pub fn starts_with(prefix: impl Into<Value>) -> Self {
        Self::new(Operation::StartsWith, prefix)
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new(Operation::Gt, value)
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new(Operation::Gte, value)
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new(Operation::Lt, value)
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new(Operation::Lte, value)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(Operation::RegEx, pattern.into())
    }

    /// Inclusive range; stored as a two-element array `[low, high]`.
    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(Operation::Between, Value::Array(vec![low.into(), high.into()]))
    }

    /// The operation.
    #[must_use]
    pub const fn op(&self) -> Operation {
        self.op
    }

    /// The operand, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The `(low, high)` bounds of a `Between` expression.
    ///
    /// `None` for other operations or when the operand is not a
    /// two-element array.
    #[must_use]
    pub fn range(&self) -> Option<(&Value, &Value)> {
        if self.op != Operation::Between {
            return None;
        }
        match self.value.as_ref()? {
            Value::Array(items) if items.len() == 2 => Some((&items[0], &items[1])),
            _ => None,
        }
    }
}

/// An expression bound to a named field (column, attribute, JSON key...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExpression {
    name: String,
    expression: Expression,
}

impl FieldExpression {
    pub fn new(name: impl Into<String>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }

    /// Name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expression applied to the field.
    #[must_use]
    pub const fn expression(&self) -> &Expression {
        &self.expression
    }
}

//! Evaluation of filter trees against JSON documents.

use daokit_core::{DaoError, DaoResult};
use daokit_filter::{Expression, FieldExpression, Filter, Operation};
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// A test applied to the value of one field.
#[derive(Debug)]
enum Test {
    Eq(Value),
    Contains(Value),
    StartsWith(String),
    Compare(Operation, Value),
    Matches(Regex),
    Between(Value, Value),
}

#[derive(Debug)]
struct FieldMatcher {
    path: Vec<String>,
    test: Test,
}

/// A [`Filter`] validated and prepared for repeated evaluation.
///
/// A document matches when every field expression matches, every `and`
/// sub-filter matches, at least one `or` sub-filter matches (if any are
/// present) and no `not` sub-filter matches. An empty filter matches
/// everything. Field names may address nested objects with dots
/// (`address.city`); a missing field never matches.
#[derive(Debug)]
pub(crate) struct Matcher {
    fields: Vec<FieldMatcher>,
    and: Vec<Matcher>,
    or: Vec<Matcher>,
    not: Vec<Matcher>,
}

impl Matcher {
    /// Compiles `filter`, rejecting undefined operations, missing operands
    /// and invalid patterns.
    pub fn compile(filter: &Filter) -> DaoResult<Self> {
        Ok(Self {
            fields: filter
                .fields()
                .iter()
                .map(FieldMatcher::compile)
                .collect::<DaoResult<_>>()?,
            and: compile_all(filter.and_filters())?,
            or: compile_all(filter.or_filters())?,
            not: compile_all(filter.not_filters())?,
        })
    }

    /// Compiles an optional filter; `None` matches everything.
    pub fn compile_optional(filter: Option<&Filter>) -> DaoResult<Self> {
        match filter {
            Some(filter) => Self::compile(filter),
            None => Self::compile(&Filter::new()),
        }
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.fields.iter().all(|field| field.matches(document))
            && self.and.iter().all(|m| m.matches(document))
            && (self.or.is_empty() || self.or.iter().any(|m| m.matches(document)))
            && !self.not.iter().any(|m| m.matches(document))
    }
}

fn compile_all(filters: &[Filter]) -> DaoResult<Vec<Matcher>> {
    filters.iter().map(Matcher::compile).collect()
}

impl FieldMatcher {
    fn compile(field: &FieldExpression) -> DaoResult<Self> {
        let expression = field.expression();
        let test = match expression.op() {
            Operation::Undefined => {
                return Err(DaoError::validation(format!(
                    "field '{}' has an undefined operation",
                    field.name()
                )))
            }
            Operation::Eq => Test::Eq(operand(field.name(), expression)?.clone()),
            Operation::Contains => Test::Contains(operand(field.name(), expression)?.clone()),
            Operation::StartsWith => {
                let prefix = operand(field.name(), expression)?
                    .as_str()
                    .ok_or_else(|| {
                        DaoError::validation(format!(
                            "starts_with on '{}' needs a string operand",
                            field.name()
                        ))
                    })?;
                Test::StartsWith(prefix.to_string())
            }
            op @ (Operation::Gt | Operation::Gte | Operation::Lt | Operation::Lte) => {
                Test::Compare(op, operand(field.name(), expression)?.clone())
            }
            Operation::RegEx => {
                let pattern = operand(field.name(), expression)?.as_str().ok_or_else(|| {
                    DaoError::validation(format!(
                        "regex on '{}' needs a string pattern",
                        field.name()
                    ))
                })?;
                let regex = Regex::new(pattern).map_err(|e| {
                    DaoError::validation(format!("invalid pattern for '{}': {e}", field.name()))
                })?;
                Test::Matches(regex)
            }
            Operation::Between => {
                let (low, high) = expression.range().ok_or_else(|| {
                    DaoError::validation(format!(
                        "between on '{}' needs a two-element operand",
                        field.name()
                    ))
                })?;
                Test::Between(low.clone(), high.clone())
            }
        };

        Ok(Self {
            path: field.name().split('.').map(str::to_string).collect(),
            test,
        })
    }

    fn matches(&self, document: &Value) -> bool {
        let Some(value) = lookup(document, &self.path) else {
            return false;
        };

        match &self.test {
            Test::Eq(expected) => json_eq(value, expected),
            Test::Contains(needle) => match (value, needle) {
                (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
                (Value::Array(items), needle) => items.iter().any(|item| json_eq(item, needle)),
                _ => false,
            },
            Test::StartsWith(prefix) => value.as_str().is_some_and(|s| s.starts_with(prefix.as_str())),
            Test::Compare(op, operand) => compare(value, operand).is_some_and(|ordering| match op {
                Operation::Gt => ordering == Ordering::Greater,
                Operation::Gte => ordering != Ordering::Less,
                Operation::Lt => ordering == Ordering::Less,
                Operation::Lte => ordering != Ordering::Greater,
                _ => false,
            }),
            Test::Matches(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
            Test::Between(low, high) => {
                compare(value, low).is_some_and(|o| o != Ordering::Less)
                    && compare(value, high).is_some_and(|o| o != Ordering::Greater)
            }
        }
    }
}

fn operand<'a>(name: &str, expression: &'a Expression) -> DaoResult<&'a Value> {
    expression.value().ok_or_else(|| {
        DaoError::validation(format!(
            "operation {} on '{name}' needs a value",
            expression.op()
        ))
    })
}

fn lookup<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, segment| current.get(segment.as_str()))
}

/// Equality that treats `1` and `1.0` as equal.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare(left, right) == Some(Ordering::Equal),
        _ => left == right,
    }
}

/// Orders two values of the same kind. Numbers, strings and booleans are
/// comparable; anything else is not.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (as_integer(l), as_integer(r)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Exact integer value of `n`, covering the whole `i64` and `u64` ranges.
fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

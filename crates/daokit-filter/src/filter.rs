//! Composable filter trees.

use crate::{Expression, FieldExpression};
use serde::{Deserialize, Serialize};

/// A recursive AND/OR/NOT composition of field expressions.
///
/// A filter owns its sub-filters. Every builder call appends: calling
/// [`Filter::and`] twice keeps the filters of both calls, in call order, and
/// the same holds for `or`, `not` and `add_field`. The tree carries no
/// evaluation semantics; DAO implementations translate it into their native
/// predicate language.
///
/// ```
/// use daokit_filter::{Expression, FieldExpression, Filter};
///
/// let filter = Filter::new()
///     .and([
///         Filter::new().or([
///             Filter::new()
///                 .add_field([FieldExpression::new("id", Expression::eq("USR1"))])
///                 .add_field([FieldExpression::new("name", Expression::contains("John"))]),
///             Filter::new().field("name", Expression::eq("John")),
///         ]),
///         Filter::new().field("status", Expression::eq("active")),
///     ]);
///
/// assert_eq!(filter.and_filters().len(), 2);
/// assert_eq!(filter.and_filters()[0].or_filters()[0].fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    and: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    or: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    not: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldExpression>,
}

impl Filter {
    /// An empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends filters to be joined by AND.
    #[must_use]
    pub fn and(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.and.extend(filters);
        self
    }

    /// Appends filters to be joined by OR.
    #[must_use]
    pub fn or(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.or.extend(filters);
        self
    }

    /// Appends filters to be negated.
    #[must_use]
    pub fn not(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.not.extend(filters);
        self
    }

    /// Appends field expressions.
    #[must_use]
    pub fn add_field(mut self, fields: impl IntoIterator<Item = FieldExpression>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Appends a single field expression.
    #[must_use]
    pub fn field(self, name: impl Into<String>, expression: Expression) -> Self {
        self.add_field([FieldExpression::new(name, expression)])
    }

    /// AND sub-filters, in insertion order. Empty when none were added.
    #[must_use]
    pub fn and_filters(&self) -> &[Filter] {
        &self.and
    }

    /// OR sub-filters, in insertion order. Empty when none were added.
    #[must_use]
    pub fn or_filters(&self) -> &[Filter] {
        &self.or
    }

    /// NOT sub-filters, in insertion order. Empty when none were added.
    #[must_use]
    pub fn not_filters(&self) -> &[Filter] {
        &self.not
    }

    /// Field expressions, in insertion order. Empty when none were added.
    #[must_use]
    pub fn fields(&self) -> &[FieldExpression] {
        &self.fields
    }

    /// Returns true if nothing was added at this node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty() && self.fields.is_empty()
    }

    /// Depth of the tree; an empty or flat filter has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .and
            .iter()
            .chain(&self.or)
            .chain(&self.not)
            .map(Filter::depth)
            .max()
            .unwrap_or(0)
    }
}

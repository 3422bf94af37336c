//! # Daokit Filter
//!
//! Storage-independent query predicates: an [`Operation`] with an optional
//! operand forms an [`Expression`], an expression bound to a field name
//! forms a [`FieldExpression`], and [`Filter`] composes field expressions
//! into AND/OR/NOT trees.

mod expression;
mod filter;
mod operation;

pub use expression::{Expression, FieldExpression};
pub use filter::Filter;
pub use operation::Operation;

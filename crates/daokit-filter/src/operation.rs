//! Field operations and their integer codes.

use daokit_core::{DaoError, DaoResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Operation applied to a field by an [`Expression`](crate::Expression).
///
/// The set is closed; every operation has a stable integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// No operation specified.
    #[default]
    Undefined,
    /// Equals.
    Eq,
    /// Contains a value (substring or element).
    Contains,
    /// Starts with a prefix. Usually used on string fields.
    StartsWith,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Matches a regular expression.
    RegEx,
    /// Inside an inclusive range; the value is a two-element array.
    Between,
}

static BY_CODE: OnceLock<HashMap<i64, Operation>> = OnceLock::new();

fn by_code() -> &'static HashMap<i64, Operation> {
    BY_CODE.get_or_init(|| Operation::ALL.iter().map(|op| (op.code(), *op)).collect())
}

impl Operation {
    /// Every operation, in code order.
    pub const ALL: [Self; 10] = [
        Self::Undefined,
        Self::Eq,
        Self::Contains,
        Self::StartsWith,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::RegEx,
        Self::Between,
    ];

    /// Integer code of this operation.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Undefined => 0,
            Self::Eq => 1,
            Self::Contains => 2,
            Self::StartsWith => 3,
            Self::Gt => 4,
            Self::Gte => 5,
            Self::Lt => 6,
            Self::Lte => 7,
            Self::RegEx => 8,
            Self::Between => 9,
        }
    }

    /// Converts an integer code back into an operation.
    ///
    /// Fails with [`DaoError::UnknownOperation`] for codes outside the
    /// enumeration.
    pub fn from_code(code: i64) -> DaoResult<Self> {
        by_code()
            .get(&code)
            .copied()
            .ok_or(DaoError::UnknownOperation(code))
    }

    /// Short symbolic name, e.g. `"gte"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Eq => "eq",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::RegEx => "reg_ex",
            Self::Between => "between",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operation> for i64 {
    fn from(op: Operation) -> Self {
        op.code()
    }
}

impl TryFrom<i64> for Operation {
    type Error = DaoError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

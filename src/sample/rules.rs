//! Declarative exclusion rules
//!
//! A rule names a column and a predicate; rows matching the predicate are
//! left out of a sample. Stored values are raw text, so numeric predicates
//! compare the value cast to an integer.

use std::fmt;

use serde::Serialize;

/// Condition that excludes a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// Value is missing or only whitespace
    Blank,
    /// Value equals the code
    Equals(i64),
    /// Value is the code or above
    AtLeast(i64),
}

/// Excludes rows whose `column` matches `predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionRule {
    pub column: String,
    pub predicate: Predicate,
}

impl ExclusionRule {
    pub fn new(column: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            column: column.into(),
            predicate,
        }
    }

    pub fn blank(column: impl Into<String>) -> Self {
        Self::new(column, Predicate::Blank)
    }

    pub fn equals(column: impl Into<String>, code: i64) -> Self {
        Self::new(column, Predicate::Equals(code))
    }

    pub fn at_least(column: impl Into<String>, code: i64) -> Self {
        Self::new(column, Predicate::AtLeast(code))
    }

    /// Registry clean-up list: unknown birth year, unknown age, unknown
    /// sequence, unknown grade, unknown tumor size, unknown node count.
    pub fn registry_defaults() -> Vec<Self> {
        vec![
            Self::blank("YR_BRTH"),
            Self::equals("AGE_DX", 999),
            Self::equals("SEQ_NUM", 88),
            Self::equals("GRADE", 9),
            Self::equals("EOD10_SZ", 999),
            Self::at_least("EOD10_PN", 95),
        ]
    }

    /// SQL condition a row must satisfy to be kept.
    ///
    /// `column` is interpolated; callers check it against the table catalog
    /// first.
    pub fn keep_condition(&self) -> String {
        let column = &self.column;
        match self.predicate {
            Predicate::Blank => format!("({column} IS NOT NULL AND TRIM({column}) != '')"),
            Predicate::Equals(code) => format!("CAST({column} AS INTEGER) != {code}"),
            Predicate::AtLeast(code) => format!("CAST({column} AS INTEGER) < {code}"),
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predicate {
            Predicate::Blank => write!(f, "{} is blank", self.column),
            Predicate::Equals(code) => write!(f, "{} = {}", self.column, code),
            Predicate::AtLeast(code) => write!(f, "{} >= {}", self.column, code),
        }
    }
}

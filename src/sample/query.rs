//! Sampled read queries against a loaded table

use serde::Serialize;
use tracing::warn;

use super::errors::{SampleError, SampleResult};
use super::rules::ExclusionRule;
use crate::observability::{log_event, Event};
use crate::schema::validate_table_name;
use crate::storage::StoreGateway;

pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY RANDOM()] LIMIT n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    pub table: String,
    /// Columns to return; empty means every column of the table
    pub columns: Vec<String>,
    pub limit: usize,
    pub random: bool,
    pub rules: Vec<ExclusionRule>,
}

/// Rows returned by a sample, plus the rules that could not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Rules naming columns the table does not have
    pub skipped_rules: Vec<String>,
}

/// Rendered statement and the rules left out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    pub sql: String,
    pub skipped_rules: Vec<ExclusionRule>,
}

impl SampleQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            limit: DEFAULT_SAMPLE_LIMIT,
            random: false,
            rules: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn randomized(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    pub fn excluding(mut self, rules: Vec<ExclusionRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Renders the statement against the table's actual columns.
    ///
    /// Every interpolated name is checked against `available`, which comes
    /// from the store catalog.
    pub fn plan(&self, available: &[String]) -> SampleResult<SamplePlan> {
        validate_table_name(&self.table)?;
        if self.limit == 0 {
            return Err(SampleError::InvalidLimit);
        }
        if available.is_empty() {
            return Err(SampleError::UnknownTable(self.table.clone()));
        }

        let selected: Vec<&str> = if self.columns.is_empty() {
            available.iter().map(String::as_str).collect()
        } else {
            for column in &self.columns {
                if !available.contains(column) {
                    return Err(SampleError::UnknownColumn {
                        table: self.table.clone(),
                        column: column.clone(),
                    });
                }
            }
            self.columns.iter().map(String::as_str).collect()
        };

        let (applied, skipped): (Vec<_>, Vec<_>) = self
            .rules
            .iter()
            .cloned()
            .partition(|rule| available.contains(&rule.column));

        let mut sql = format!("SELECT {} FROM {}", selected.join(", "), self.table);
        if !applied.is_empty() {
            let conditions: Vec<String> = applied.iter().map(ExclusionRule::keep_condition).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if self.random {
            sql.push_str(" ORDER BY RANDOM()");
        }
        sql.push_str(" LIMIT ?1");

        Ok(SamplePlan {
            sql,
            skipped_rules: skipped,
        })
    }

    /// Runs the sample against an open store.
    pub fn execute(&self, gateway: &StoreGateway) -> SampleResult<SampleOutput> {
        let available = gateway.table_columns(&self.table)?;
        let plan = self.plan(&available)?;
        for rule in &plan.skipped_rules {
            warn!(table = %self.table, rule = %rule, "exclusion rule skipped, column not in table");
        }

        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        let result = gateway.query(&plan.sql, &[&limit])?;

        log_event(
            Event::SampleExecuted,
            &[
                ("table", &self.table),
                ("rows", &result.rows.len().to_string()),
                ("rules", &(self.rules.len() - plan.skipped_rules.len()).to_string()),
                ("random", if self.random { "true" } else { "false" }),
            ],
        );

        Ok(SampleOutput {
            columns: result.columns,
            rows: result.rows,
            skipped_rules: plan.skipped_rules.iter().map(ToString::to_string).collect(),
        })
    }
}

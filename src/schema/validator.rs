//! Identifier allow-list for column and table names
//!
//! Column and table names are spliced into SQL text unquoted, so every name
//! must pass these checks before a statement is rendered:
//! - column names: `[A-Z_][A-Z0-9_]*`
//! - table names: `[A-Za-z_][A-Za-z0-9_]*`
//! - neither may be an SQL keyword from the deny-list
//! - `SOURCE` is reserved for the provenance column

use super::errors::{SchemaError, SchemaResult};

/// Name of the synthetic provenance column.
pub const SOURCE_COLUMN: &str = "SOURCE";

/// Keywords that would change the meaning of a rendered statement.
const RESERVED_KEYWORDS: &[&str] = &[
    "ABORT", "ALL", "ALTER", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT",
    "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "FOREIGN", "FROM",
    "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER",
    "OUTER", "PRIMARY", "REFERENCES", "REPLACE", "RIGHT", "ROLLBACK", "SELECT", "SET", "TABLE",
    "THEN", "TO", "TRANSACTION", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "VIEW", "WHEN",
    "WHERE", "WITH",
];

/// Validates a field name for use as an unquoted column.
pub fn validate_column_name(name: &str) -> SchemaResult<()> {
    check_shape(name, |c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')?;

    if name == SOURCE_COLUMN || is_keyword(name) {
        return Err(SchemaError::ReservedIdentifier(name.to_string()));
    }

    Ok(())
}

/// Validates a table name for use as an unquoted identifier.
pub fn validate_table_name(name: &str) -> SchemaResult<()> {
    check_shape(name, |c| c.is_ascii_alphanumeric() || c == '_')?;

    if is_keyword(name) {
        return Err(SchemaError::ReservedIdentifier(name.to_string()));
    }

    Ok(())
}

fn check_shape(name: &str, allowed: impl Fn(char) -> bool) -> SchemaResult<()> {
    let invalid = |reason| SchemaError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    };

    let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
    if first.is_ascii_digit() {
        return Err(invalid("name starts with a digit"));
    }
    if !name.chars().all(allowed) {
        return Err(invalid("contains a disallowed character"));
    }

    Ok(())
}

fn is_keyword(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_KEYWORDS.contains(&upper.as_str())
}

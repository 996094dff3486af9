//! Table creation from a column layout
//!
//! Columns are untyped: the store keeps every value as the raw text cut from
//! the record. Interpretation of numbers and dates is left to readers.

use tracing::{info, warn};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use super::validator::{validate_table_name, SOURCE_COLUMN};
use crate::storage::StoreGateway;

/// Renders and issues the statements for one table and one schema.
#[derive(Debug, Clone)]
pub struct SchemaBuilder<'a> {
    table: &'a str,
    schema: &'a Schema,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder, validating the table name.
    pub fn new(table: &'a str, schema: &'a Schema) -> SchemaResult<Self> {
        validate_table_name(table)?;
        Ok(Self { table, schema })
    }

    /// Target table name.
    pub fn table(&self) -> &str {
        self.table
    }

    /// `SOURCE` followed by the field names, comma separated.
    fn column_list(&self) -> String {
        std::iter::once(SOURCE_COLUMN)
            .chain(self.schema.column_names())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `CREATE TABLE <table>(SOURCE, F1, F2, ...)`
    pub fn create_table_sql(&self) -> String {
        format!("CREATE TABLE {}({})", self.table, self.column_list())
    }

    /// Insert statement for one row, one placeholder per column.
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.schema.len() + 1].join(", ");
        format!(
            "INSERT INTO {}({}) VALUES ({})",
            self.table,
            self.column_list(),
            placeholders
        )
    }

    /// Column names the table will carry, provenance first.
    pub fn expected_columns(&self) -> Vec<String> {
        std::iter::once(SOURCE_COLUMN)
            .chain(self.schema.column_names())
            .map(str::to_string)
            .collect()
    }

    /// Creates the table. Fails if it already exists.
    pub fn create_table(&self, gateway: &mut StoreGateway) -> SchemaResult<()> {
        let exists = gateway
            .table_exists(self.table)
            .map_err(|e| self.store_error(e))?;
        if exists {
            return Err(SchemaError::TableExists(self.table.to_string()));
        }

        gateway
            .execute(&self.create_table_sql())
            .map_err(|e| self.store_error(e))?;

        info!(
            table = self.table,
            columns = self.schema.len() + 1,
            "table created"
        );
        Ok(())
    }

    /// Creates the table unless it exists. Returns whether it was created.
    ///
    /// An existing table is reused as-is; differing columns are reported but
    /// not reconciled.
    pub fn ensure_table(&self, gateway: &mut StoreGateway) -> SchemaResult<bool> {
        let existing = gateway
            .table_columns(self.table)
            .map_err(|e| self.store_error(e))?;
        if existing.is_empty() {
            self.create_table(gateway)?;
            return Ok(true);
        }

        let expected = self.expected_columns();
        if existing != expected {
            warn!(
                table = self.table,
                existing = existing.len(),
                expected = expected.len(),
                "existing table columns differ from dictionary layout"
            );
        }
        Ok(false)
    }

    fn store_error(&self, source: crate::storage::StoreError) -> SchemaError {
        SchemaError::Store {
            table: self.table.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;
    use crate::storage::StoreOptions;
    use tempfile::TempDir;

    fn schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::new(0, "AGE_DX", 3),
            FieldDescriptor::new(3, "YEAR", 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_table_sql() {
        let schema = schema();
        let builder = SchemaBuilder::new("seer", &schema).unwrap();
        assert_eq!(
            builder.create_table_sql(),
            "CREATE TABLE seer(SOURCE, AGE_DX, YEAR)"
        );
    }

    #[test]
    fn test_insert_sql_placeholders() {
        let schema = schema();
        let builder = SchemaBuilder::new("seer", &schema).unwrap();
        assert_eq!(
            builder.insert_sql(),
            "INSERT INTO seer(SOURCE, AGE_DX, YEAR) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let schema = schema();
        assert!(SchemaBuilder::new("seer; DROP", &schema).is_err());
    }

    #[test]
    fn test_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        let mut gateway = StoreGateway::initialize(
            &dir.path().join("seer.db"),
            true,
            &StoreOptions::default(),
        )
        .unwrap();
        let schema = schema();
        let builder = SchemaBuilder::new("seer", &schema).unwrap();

        builder.create_table(&mut gateway).unwrap();
        let err = builder.create_table(&mut gateway).unwrap_err();
        assert!(matches!(err, SchemaError::TableExists(name) if name == "seer"));
    }

    #[test]
    fn test_ensure_table_reuses_existing() {
        let dir = TempDir::new().unwrap();
        let mut gateway = StoreGateway::initialize(
            &dir.path().join("seer.db"),
            true,
            &StoreOptions::default(),
        )
        .unwrap();
        let schema = schema();
        let builder = SchemaBuilder::new("seer", &schema).unwrap();

        assert!(builder.ensure_table(&mut gateway).unwrap());
        assert!(!builder.ensure_table(&mut gateway).unwrap());
        assert_eq!(
            gateway.table_columns("seer").unwrap(),
            builder.expected_columns()
        );
    }

    #[test]
    fn test_ensure_table_keeps_mismatched_table() {
        let dir = TempDir::new().unwrap();
        let mut gateway = StoreGateway::initialize(
            &dir.path().join("seer.db"),
            true,
            &StoreOptions::default(),
        )
        .unwrap();
        gateway.execute("CREATE TABLE seer(SOURCE, AGE_DX)").unwrap();
        let schema = schema();
        let builder = SchemaBuilder::new("seer", &schema).unwrap();

        assert!(!builder.ensure_table(&mut gateway).unwrap());
        assert_eq!(gateway.table_columns("seer").unwrap(), vec!["SOURCE", "AGE_DX"]);
    }
}

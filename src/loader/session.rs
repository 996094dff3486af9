//! Load session
//!
//! Everything a load needs, built up front and immutable afterwards:
//! validated configuration, the schema parsed from the dictionary and the
//! insert statement rendered from it. Each pipeline stage receives the
//! session explicitly.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::LoadConfig;
use super::errors::{LoadError, LoadResult};
use crate::dictionary::DictionaryParser;
use crate::observability::{log_event, Event, ObservationScope};
use crate::schema::{Schema, SchemaBuilder};

/// Immutable state of one load
#[derive(Debug, Clone)]
pub struct LoadSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    config: LoadConfig,
    schema: Schema,
    insert_sql: String,
}

impl LoadSession {
    /// Validates `config` and parses its dictionary.
    ///
    /// Fails before anything touches the store: bad options, unreadable or
    /// empty dictionary, invalid or duplicate column names.
    pub fn prepare(config: LoadConfig) -> LoadResult<Self> {
        config.validate()?;
        log_event(Event::ConfigLoaded, &[("path", &config.path)]);

        let dictionary_path = config.dictionary_path();
        let scope = ObservationScope::with_subject(
            "DICTIONARY_PARSE",
            dictionary_path.display().to_string(),
        );
        let parsed: LoadResult<Schema> = DictionaryParser::new()
            .parse_file(&dictionary_path)
            .map_err(LoadError::from)
            .and_then(|fields| Ok(Schema::new(fields)?));
        let schema = match parsed {
            Ok(schema) => {
                scope.complete_with_rows(schema.len() as u64);
                schema
            }
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        log_event(
            Event::DictionaryLoaded,
            &[
                ("fields", &schema.len().to_string()),
                ("record_width", &schema.record_width().to_string()),
            ],
        );

        Self::from_schema(config, schema)
    }

    /// Builds a session around an already known schema.
    pub fn from_schema(config: LoadConfig, schema: Schema) -> LoadResult<Self> {
        config.validate()?;
        let insert_sql = SchemaBuilder::new(&config.table, &schema)?.insert_sql();

        Ok(Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            config,
            schema,
            insert_sql,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.config.table
    }

    /// Insert statement for one row, provenance first
    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    /// Table builder bound to this session's table and schema
    pub fn schema_builder(&self) -> LoadResult<SchemaBuilder<'_>> {
        Ok(SchemaBuilder::new(&self.config.table, &self.schema)?)
    }
}

//! Row batch awaiting one commit
//!
//! - Rows are kept in accumulation order
//! - Size is bounded by the configured batch size
//! - The batch remembers which global rows and which sources it holds, so a
//!   failed commit can name exactly what was not stored

use super::decoder::Row;

/// A bounded set of decoded rows committed in one transaction.
#[derive(Debug)]
pub struct Batch {
    rows: Vec<Row>,
    capacity: usize,
    /// 1-based ordinal (within the load) of the first row
    first_row: u64,
    /// Distinct provenance values, in first-seen order
    sources: Vec<String>,
}

impl Batch {
    /// Create an empty batch holding up to `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
            first_row: 0,
            sources: Vec::new(),
        }
    }

    /// Append a row. `ordinal` is the row's 1-based position in the load.
    pub fn push(&mut self, row: Row, ordinal: u64) {
        if self.rows.is_empty() {
            self.first_row = ordinal;
        }
        if self.sources.last().map(String::as_str) != Some(row.source()) {
            self.sources.push(row.source().to_string());
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the batch reached its configured size.
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    /// First and last row ordinals, if any rows are held.
    pub fn span(&self) -> Option<(u64, u64)> {
        if self.rows.is_empty() {
            return None;
        }
        Some((self.first_row, self.first_row + self.rows.len() as u64 - 1))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Clear the batch for reuse, keeping its allocation.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.sources.clear();
        self.first_row = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RecordDecoder;
    use crate::schema::{FieldDescriptor, Schema};

    fn rows(source: &str, count: usize) -> Vec<Row> {
        let schema = Schema::new(vec![FieldDescriptor::new(0, "AGE_DX", 3)]).unwrap();
        let decoder = RecordDecoder::new(&schema);
        (0..count).map(|_| decoder.decode(source, b"045")).collect()
    }

    #[test]
    fn test_fills_to_capacity() {
        let mut batch = Batch::with_capacity(3);
        for (i, row) in rows("breast", 3).into_iter().enumerate() {
            assert!(!batch.is_full());
            batch.push(row, i as u64 + 1);
        }
        assert!(batch.is_full());
        assert_eq!(batch.span(), Some((1, 3)));
    }

    #[test]
    fn test_span_tracks_global_ordinals() {
        let mut batch = Batch::with_capacity(10);
        for (i, row) in rows("breast", 2).into_iter().enumerate() {
            batch.push(row, 5001 + i as u64);
        }
        assert_eq!(batch.span(), Some((5001, 5002)));
    }

    #[test]
    fn test_sources_across_files() {
        let mut batch = Batch::with_capacity(10);
        let mut ordinal = 0;
        for row in rows("breast", 2).into_iter().chain(rows("respir", 2)) {
            ordinal += 1;
            batch.push(row, ordinal);
        }
        assert_eq!(batch.sources(), ["breast", "respir"]);
    }

    #[test]
    fn test_clear_resets() {
        let mut batch = Batch::with_capacity(2);
        for (i, row) in rows("breast", 2).into_iter().enumerate() {
            batch.push(row, i as u64 + 1);
        }
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.span(), None);
        assert!(batch.sources().is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(Batch::with_capacity(0).capacity(), 1);
    }
}

//! Columnar Table
//!
//! This module implements the in-memory table that the ingestion pipeline
//! materializes and the query layer serves from.
//!
//! ## Layout
//! Column-oriented: one `Vec<String>` or `Vec<i64>` per projected field, in
//! projection order. Row `i` is the `i`-th element of every column.
//!
//! Invariant: all column lengths are equal to the table's row count. The
//! builder is the only writer; a finished `Table` is never mutated — every
//! query operation (`filter_eq`, `sort_desc`, `slice`, ...) returns a new
//! table or an owned value, so a table behind an `Arc` can be shared across
//! concurrent request handlers without locking.
//!
//! ## Why Columnar?
//! The serving layer filters on one column (`subreddit`, `author`, `score`)
//! and sorts on one column at a time. Scanning a single contiguous `Vec` is
//! cache-friendly, and the snapshot format can compress each column as one
//! block.

use serde_json::json;
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{Comment, DataType, Field};

/// A single projected value on its way into a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Str(String),
    Int(i64),
}

/// Backing storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Str(Vec<String>),
    Int(Vec<i64>),
}

impl ColumnValues {
    fn new(dtype: DataType) -> Self {
        match dtype {
            DataType::Str => ColumnValues::Str(Vec::new()),
            DataType::Int => ColumnValues::Int(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Str(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    field: Field,
    values: ColumnValues,
}

/// An ordered, immutable, columnar collection of projected records.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

/// Incrementally builds a [`Table`] without knowing the row count up front.
///
/// Appends are amortized O(1) per cell (plain `Vec` growth), so building is
/// linear in the number of rows.
pub struct TableBuilder {
    columns: Vec<Column>,
    rows: usize,
}

impl TableBuilder {
    pub fn new(fields: &[Field]) -> Self {
        let columns = fields
            .iter()
            .map(|&field| Column {
                field,
                values: ColumnValues::new(field.data_type()),
            })
            .collect();
        Self { columns, rows: 0 }
    }

    /// Append one row. Cells must match the builder's fields in order and
    /// type; the projection stage guarantees this.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::MalformedRecord(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, cell) in self.columns.iter_mut().zip(row) {
            match (&mut column.values, cell) {
                (ColumnValues::Str(values), Cell::Str(value)) => values.push(value),
                (ColumnValues::Int(values), Cell::Int(value)) => values.push(value),
                (ColumnValues::Str(_), Cell::Int(_)) => {
                    return Err(Error::ColumnType {
                        field: column.field.name(),
                        expected: "string",
                    })
                }
                (ColumnValues::Int(_), Cell::Str(_)) => {
                    return Err(Error::ColumnType {
                        field: column.field.name(),
                        expected: "integer",
                    })
                }
            }
        }
        self.rows += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> Table {
        Table {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

impl Table {
    /// Build a table directly from column storage. Used by the snapshot
    /// reader; validates the equal-lengths invariant.
    pub fn from_columns(columns: Vec<(Field, ColumnValues)>) -> Result<Table> {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        for (field, values) in &columns {
            if values.len() != rows {
                return Err(Error::InvalidSnapshot(format!(
                    "column {} has {} values, expected {}",
                    field,
                    values.len(),
                    rows
                )));
            }
            let matches = matches!(
                (field.data_type(), values),
                (DataType::Str, ColumnValues::Str(_)) | (DataType::Int, ColumnValues::Int(_))
            );
            if !matches {
                return Err(Error::ColumnType {
                    field: field.name(),
                    expected: match field.data_type() {
                        DataType::Str => "string",
                        DataType::Int => "integer",
                    },
                });
            }
        }
        Ok(Table {
            columns: columns
                .into_iter()
                .map(|(field, values)| Column { field, values })
                .collect(),
            rows,
        })
    }

    /// Build a full-schema table from already-projected comments. This is
    /// the sample-data path; the streaming pipeline uses [`TableBuilder`].
    ///
    /// Infallible: a [`Comment`] always carries all 8 fields with the right
    /// types, so the columns are built directly instead of going through the
    /// type-checked row path.
    pub fn from_comments(comments: Vec<Comment>) -> Table {
        let rows = comments.len();
        let mut ids = Vec::with_capacity(rows);
        let mut authors = Vec::with_capacity(rows);
        let mut created = Vec::with_capacity(rows);
        let mut subreddits = Vec::with_capacity(rows);
        let mut parent_ids = Vec::with_capacity(rows);
        let mut link_ids = Vec::with_capacity(rows);
        let mut scores = Vec::with_capacity(rows);
        let mut bodies = Vec::with_capacity(rows);
        for c in comments {
            ids.push(c.id);
            authors.push(c.author);
            created.push(c.created_utc);
            subreddits.push(c.subreddit);
            parent_ids.push(c.parent_id);
            link_ids.push(c.link_id);
            scores.push(c.score);
            bodies.push(c.body);
        }

        let columns = vec![
            (Field::Id, ColumnValues::Str(ids)),
            (Field::Author, ColumnValues::Str(authors)),
            (Field::CreatedUtc, ColumnValues::Int(created)),
            (Field::Subreddit, ColumnValues::Str(subreddits)),
            (Field::ParentId, ColumnValues::Str(parent_ids)),
            (Field::LinkId, ColumnValues::Str(link_ids)),
            (Field::Score, ColumnValues::Int(scores)),
            (Field::Body, ColumnValues::Str(bodies)),
        ];
        Table {
            columns: columns
                .into_iter()
                .map(|(field, values)| Column { field, values })
                .collect(),
            rows,
        }
    }

    pub fn empty(fields: &[Field]) -> Table {
        TableBuilder::new(fields).finish()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The projected fields, in column order.
    pub fn fields(&self) -> Vec<Field> {
        self.columns.iter().map(|c| c.field).collect()
    }

    /// Iterate columns as `(field, values)` pairs. Used by the snapshot
    /// writer.
    pub fn columns(&self) -> impl Iterator<Item = (Field, &ColumnValues)> {
        self.columns.iter().map(|c| (c.field, &c.values))
    }

    fn column(&self, field: Field) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .ok_or_else(|| Error::UnknownColumn(field.name().to_string()))
    }

    /// String values of a column.
    pub fn str_values(&self, field: Field) -> Result<&[String]> {
        match &self.column(field)?.values {
            ColumnValues::Str(values) => Ok(values),
            ColumnValues::Int(_) => Err(Error::ColumnType {
                field: field.name(),
                expected: "string",
            }),
        }
    }

    /// Integer values of a column.
    pub fn int_values(&self, field: Field) -> Result<&[i64]> {
        match &self.column(field)?.values {
            ColumnValues::Int(values) => Ok(values),
            ColumnValues::Str(_) => Err(Error::ColumnType {
                field: field.name(),
                expected: "integer",
            }),
        }
    }

    /// Rows where the string column equals `value`.
    pub fn filter_eq(&self, field: Field, value: &str) -> Result<Table> {
        let values = self.str_values(field)?;
        let keep: Vec<usize> = (0..self.rows).filter(|&i| values[i] == value).collect();
        Ok(self.select(&keep))
    }

    /// Rows where the integer column is >= `min`.
    pub fn filter_at_least(&self, field: Field, min: i64) -> Result<Table> {
        let values = self.int_values(field)?;
        let keep: Vec<usize> = (0..self.rows).filter(|&i| values[i] >= min).collect();
        Ok(self.select(&keep))
    }

    /// Rows reordered by `field`, descending. Stable: equal keys keep their
    /// relative order.
    pub fn sort_desc(&self, field: Field) -> Result<Table> {
        let mut order: Vec<usize> = (0..self.rows).collect();
        match &self.column(field)?.values {
            ColumnValues::Int(values) => {
                order.sort_by(|&a, &b| values[b].cmp(&values[a]));
            }
            ColumnValues::Str(values) => {
                order.sort_by(|&a, &b| values[b].cmp(&values[a]));
            }
        }
        Ok(self.select(&order))
    }

    /// Up to `limit` rows starting at `offset`. Out-of-range offsets yield
    /// an empty table.
    pub fn slice(&self, offset: usize, limit: usize) -> Table {
        let start = offset.min(self.rows);
        let end = offset.saturating_add(limit).min(self.rows);
        let keep: Vec<usize> = (start..end).collect();
        self.select(&keep)
    }

    /// Sorted distinct values of a string column.
    pub fn distinct(&self, field: Field) -> Result<Vec<String>> {
        let values = self.str_values(field)?;
        let set: BTreeSet<&String> = values.iter().collect();
        Ok(set.into_iter().cloned().collect())
    }

    /// One row as a field-name-keyed JSON object, for serving. `None` when
    /// `idx` is out of range.
    pub fn row_object(&self, idx: usize) -> Option<serde_json::Value> {
        if idx >= self.rows {
            return None;
        }
        let mut object = serde_json::Map::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = match &column.values {
                ColumnValues::Str(values) => json!(values[idx]),
                ColumnValues::Int(values) => json!(values[idx]),
            };
            object.insert(column.field.name().to_string(), value);
        }
        Some(serde_json::Value::Object(object))
    }

    /// All rows as JSON objects, in order.
    pub fn row_objects(&self) -> Vec<serde_json::Value> {
        (0..self.rows).filter_map(|i| self.row_object(i)).collect()
    }

    fn select(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                field: column.field,
                values: match &column.values {
                    ColumnValues::Str(values) => {
                        ColumnValues::Str(indices.iter().map(|&i| values[i].clone()).collect())
                    }
                    ColumnValues::Int(values) => {
                        ColumnValues::Int(indices.iter().map(|&i| values[i]).collect())
                    }
                },
            })
            .collect();
        Table {
            columns,
            rows: indices.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, author: &str, subreddit: &str, score: i64, ts: i64) -> Comment {
        Comment {
            id: id.to_string(),
            author: author.to_string(),
            created_utc: ts,
            subreddit: subreddit.to_string(),
            parent_id: "t3_post".to_string(),
            link_id: "t3_post".to_string(),
            score,
            body: format!("body of {id}"),
        }
    }

    fn sample_table() -> Table {
        Table::from_comments(vec![
            comment("a", "alice", "politics", 10, 100),
            comment("b", "bob", "news", -3, 200),
            comment("c", "alice", "politics", 42, 300),
            comment("d", "carol", "worldnews", 10, 400),
        ])
    }

    #[test]
    fn test_builder_equal_column_lengths() {
        let table = sample_table();
        assert_eq!(table.row_count(), 4);
        for (_, values) in table.columns() {
            assert_eq!(values.len(), 4);
        }
    }

    #[test]
    fn test_empty_table_ops() {
        let table = Table::empty(&Field::DEFAULT);
        assert!(table.is_empty());
        assert_eq!(table.filter_eq(Field::Author, "x").unwrap().row_count(), 0);
        assert_eq!(table.sort_desc(Field::Score).unwrap().row_count(), 0);
        assert_eq!(table.slice(0, 10).row_count(), 0);
        assert!(table.distinct(Field::Subreddit).unwrap().is_empty());
    }

    #[test]
    fn test_filter_eq() {
        let table = sample_table();
        let filtered = table.filter_eq(Field::Author, "alice").unwrap();
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(filtered.str_values(Field::Id).unwrap(), &["a", "c"]);
        // original untouched
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_filter_eq_wrong_type() {
        let table = sample_table();
        assert!(matches!(
            table.filter_eq(Field::Score, "10"),
            Err(Error::ColumnType { .. })
        ));
    }

    #[test]
    fn test_filter_at_least() {
        let table = sample_table();
        let filtered = table.filter_at_least(Field::Score, 10).unwrap();
        assert_eq!(filtered.str_values(Field::Id).unwrap(), &["a", "c", "d"]);
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let table = sample_table();
        let sorted = table.sort_desc(Field::Score).unwrap();
        // scores 42, 10, 10, -3 — the two 10s keep insertion order (a before d)
        assert_eq!(sorted.str_values(Field::Id).unwrap(), &["c", "a", "d", "b"]);
    }

    #[test]
    fn test_slice() {
        let table = sample_table();
        let page = table.slice(1, 2);
        assert_eq!(page.str_values(Field::Id).unwrap(), &["b", "c"]);
        assert_eq!(table.slice(3, 10).row_count(), 1);
        assert_eq!(table.slice(100, 10).row_count(), 0);
        assert_eq!(table.slice(0, 0).row_count(), 0);
    }

    #[test]
    fn test_distinct_sorted() {
        let table = sample_table();
        assert_eq!(
            table.distinct(Field::Subreddit).unwrap(),
            vec!["news", "politics", "worldnews"]
        );
    }

    #[test]
    fn test_row_object() {
        let table = sample_table();
        let row = table.row_object(0).unwrap();
        assert_eq!(row["id"], "a");
        assert_eq!(row["score"], 10);
        assert_eq!(row["created_utc"], 100);
    }

    #[test]
    fn test_row_object_out_of_range() {
        let table = sample_table();
        assert!(table.row_object(4).is_none());
        assert!(Table::empty(&Field::DEFAULT).row_object(0).is_none());
    }

    #[test]
    fn test_from_comments_keeps_every_row() {
        let table = Table::from_comments(
            (0..10)
                .map(|i| comment(&format!("c{i}"), "alice", "politics", i, 100 + i))
                .collect(),
        );
        assert_eq!(table.row_count(), 10);
        assert_eq!(table.fields(), Field::DEFAULT.to_vec());
        for (_, values) in table.columns() {
            assert_eq!(values.len(), 10);
        }
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let result = Table::from_columns(vec![
            (Field::Id, ColumnValues::Str(vec!["a".to_string()])),
            (Field::Score, ColumnValues::Int(vec![1, 2])),
        ]);
        assert!(matches!(result, Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_from_columns_rejects_type_mismatch() {
        let result = Table::from_columns(vec![(Field::Score, ColumnValues::Str(vec![]))]);
        assert!(matches!(result, Err(Error::ColumnType { .. })));
    }

    #[test]
    fn test_push_row_arity_mismatch() {
        let mut builder = TableBuilder::new(&[Field::Id, Field::Score]);
        let result = builder.push_row(vec![Cell::Str("a".to_string())]);
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_projected_subset_table() {
        let mut builder = TableBuilder::new(&[Field::Id, Field::Score]);
        builder
            .push_row(vec![Cell::Str("a".to_string()), Cell::Int(5)])
            .unwrap();
        let table = builder.finish();
        assert_eq!(table.fields(), vec![Field::Id, Field::Score]);
        assert!(matches!(
            table.str_values(Field::Body),
            Err(Error::UnknownColumn(_))
        ));
    }
}

//! Columnar Materializer
//!
//! The terminal consumer of the lazy pipeline. Pulling rows from the
//! filter/project stage drives the whole upstream chain one record at a
//! time, so the pipeline's in-flight state is a single record regardless of
//! archive size; only the output table grows.
//!
//! No knowledge of the total record count is needed, and zero matching
//! records is a valid outcome (an empty table, not an error).

use observatory_core::{Field, Result, Table, TableBuilder};

use crate::project::Row;

/// Realize the projected-row sequence into a [`Table`].
pub fn materialize<I>(rows: I, fields: &[Field]) -> Result<Table>
where
    I: Iterator<Item = Result<Row>>,
{
    let mut builder = TableBuilder::new(fields);
    for row in rows {
        builder.push_row(row?)?;
    }
    Ok(builder.finish())
}

//! Filter/Project Stage
//!
//! Applies the row predicate to each decoded record and, for records that
//! pass, narrows them to the requested fields in the requested order.
//!
//! Filtering happens on the full raw record, before projection, so a
//! predicate may reference fields the projection drops.
//!
//! This stage sees every decoded record exactly once, so it also owns the
//! [`ProgressTracker`]: processed is incremented per record, matched per
//! projected row.

use observatory_core::table::Cell;
use observatory_core::{Error, Field, Result, TimeWindow, TOP_LEVEL_PREFIX};

use crate::decode::RawRecord;
use crate::progress::ProgressTracker;

/// One projected record: cells aligned with the projection's field order.
pub type Row = Vec<Cell>;

/// Lazy filter + projection over decoded records.
pub struct FilterProject<'a, I, P> {
    records: I,
    predicate: P,
    fields: &'a [Field],
    tracker: ProgressTracker<'a>,
    done: bool,
}

impl<'a, I, P> FilterProject<'a, I, P>
where
    I: Iterator<Item = Result<RawRecord>>,
    P: Fn(&RawRecord) -> Result<bool>,
{
    pub fn new(records: I, predicate: P, fields: &'a [Field], tracker: ProgressTracker<'a>) -> Self {
        Self {
            records,
            predicate,
            fields,
            tracker,
            done: false,
        }
    }
}

impl<I, P> Iterator for FilterProject<'_, I, P>
where
    I: Iterator<Item = Result<RawRecord>>,
    P: Fn(&RawRecord) -> Result<bool>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.records.next() {
                None => {
                    self.done = true;
                    self.tracker.finish();
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(record)) => {
                    self.tracker.record_processed();
                    match (self.predicate)(&record) {
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                        Ok(false) => continue,
                        Ok(true) => match project(&record, self.fields) {
                            Ok(row) => {
                                self.tracker.record_matched();
                                return Some(Ok(row));
                            }
                            Err(e) => {
                                // A passing record that cannot be projected is
                                // treated like a malformed line: skipped, not
                                // counted as matched.
                                tracing::debug!(error = %e, "skipping unprojectable record");
                            }
                        },
                    }
                }
            }
        }
    }
}

/// Narrow `record` to `fields`, in order.
pub fn project(record: &RawRecord, fields: &[Field]) -> Result<Row> {
    fields.iter().map(|&field| extract(record, field)).collect()
}

fn extract(record: &RawRecord, field: Field) -> Result<Cell> {
    let value = record.get(field.name()).ok_or_else(|| {
        Error::MalformedRecord(format!("field {} absent from record", field.name()))
    })?;
    match field.data_type() {
        observatory_core::DataType::Str => value
            .as_str()
            .map(|s| Cell::Str(s.to_string()))
            .ok_or_else(|| {
                Error::MalformedRecord(format!("field {} is not a string", field.name()))
            }),
        observatory_core::DataType::Int => json_i64(value).map(Cell::Int).ok_or_else(|| {
            Error::MalformedRecord(format!("field {} is not an integer", field.name()))
        }),
    }
}

// Dumps are inconsistent about numeric encoding: `created_utc` shows up as an
// integer, a float, or a decimal string depending on the export era.
fn json_i64(value: &serde_json::Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        return Some(f as i64);
    }
    value.as_str().and_then(|s| s.parse::<i64>().ok())
}

/// The canonical predicate: top-level comment inside the configured window.
///
/// Matches iff `parent_id` carries the top-level-post prefix and
/// `created_utc` (Unix seconds, UTC) falls in `[window.start, window.end)`.
///
/// Unlike general predicates, which must return `Ok(false)` on missing
/// fields, this one fails with [`Error::MissingField`]: `parent_id` and
/// `created_utc` are guaranteed by the archive's schema, so their absence is
/// a schema violation worth surfacing, not a record to quietly drop.
pub fn top_level_in_window(window: TimeWindow) -> impl Fn(&RawRecord) -> Result<bool> {
    move |record| {
        let parent_id = record
            .get("parent_id")
            .and_then(|v| v.as_str())
            .ok_or(Error::MissingField("parent_id"))?;
        let created_utc = record
            .get("created_utc")
            .and_then(json_i64)
            .ok_or(Error::MissingField("created_utc"))?;
        Ok(parent_id.starts_with(TOP_LEVEL_PREFIX) && window.contains(created_utc))
    }
}

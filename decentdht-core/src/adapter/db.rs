//! Workload driver contract

use std::collections::{HashMap, HashSet};

use super::Status;
use crate::document::FieldValue;
use crate::error::AdapterResult;

/// Field name -> value, as exchanged with the workload driver
pub type Record = HashMap<String, FieldValue>;

/// Operations a workload driver issues against a store.
///
/// A driver owns one client per worker and calls it from that worker only.
/// `table` names are accepted for compatibility and may be ignored.
pub trait Db {
    /// Prepare the client; called once before any operation
    fn init(&mut self) -> AdapterResult<()>;

    /// Release the client; called once after the last operation
    fn cleanup(&mut self) -> AdapterResult<()>;

    /// Read one record, restricted to `fields` when given, into `result`
    fn read(
        &mut self,
        table: &str,
        key: &str,
        fields: Option<&HashSet<String>>,
        result: &mut Record,
    ) -> Status;

    /// Read up to `record_count` records starting at `start_key`
    fn scan(
        &mut self,
        table: &str,
        start_key: &str,
        record_count: usize,
        fields: Option<&HashSet<String>>,
        result: &mut Vec<Record>,
    ) -> Status;

    /// Overwrite the record under `key` with `values`
    fn update(&mut self, table: &str, key: &str, values: &Record) -> Status;

    /// Store a new record under `key`
    fn insert(&mut self, table: &str, key: &str, values: &Record) -> Status;

    /// Remove the record under `key`
    fn delete(&mut self, table: &str, key: &str) -> Status;
}

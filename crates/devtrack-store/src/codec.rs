//! CSV codec between blob bytes and in-memory snapshots.
//!
//! The header row is the source of truth for the schema. Serialization is
//! driven by the schema, never by any particular record's field set: a field
//! a record lacks writes as empty, a field outside the schema never writes
//! at all.

use devtrack_core::{Record, Schema, Snapshot};

use crate::error::{Error, Result};

/// Decodes UTF-8 CSV bytes (header row first) into a snapshot.
///
/// Empty cells load as absent values.
pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| Error::read_failed_with("reading CSV header row", e))?;
    let schema = Schema::new(headers.iter().map(str::to_string).collect());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| Error::read_failed_with("reading CSV data row", e))?;
        let mut record = Record::new();
        for (column, value) in schema.columns().iter().zip(row.iter()) {
            record.set(column.clone(), Some(value.to_string()));
        }
        records.push(record);
    }

    Ok(Snapshot::new(schema, records))
}

/// Encodes a snapshot as UTF-8 CSV bytes with the schema as header row.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(snapshot.schema.columns())
        .map_err(|e| Error::write_failed_with("writing CSV header row", e))?;

    for record in &snapshot.records {
        let row: Vec<&str> = snapshot
            .schema
            .columns()
            .iter()
            .map(|column| record.get(column).unwrap_or(""))
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| Error::write_failed_with("writing CSV data row", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::write_failed_with("flushing CSV output", e))
}

//! CSV export and import of the calculation grid.
//!
//! Exported files look like this:
//!
//! ```text
//! Label,A,B,Total
//! Revenue,1000,2000,3000
//! Costs,500,,500
//! Total,1500,2000,3500
//! ```
//!
//! Importing reads the same layout back. The `Total` column and the footer
//! record are only dropped when the header ends with `Total`, so plain CSV
//! files with a label column followed by value columns import as is. Value
//! columns keep their letters when every header is one (`A`, `B`, ...);
//! otherwise they are taken by position.

use super::persistence::{PersistenceError, PersistenceResult};
use crate::domain::{format_cell_value, parse_cell_input, Grid, Snapshot, SnapshotRow};
use std::fs::File;
use std::io::{Read, Write};

const LABEL_HEADER: &str = "Label";
const TOTAL_HEADER: &str = "Total";

pub struct CsvExporter;

impl CsvExporter {
    /// Writes the grid, its row totals and its column totals to `filename`.
    pub fn export_to_csv(grid: &Grid, filename: &str) -> PersistenceResult<String> {
        let result = File::create(filename)
            .map_err(PersistenceError::from)
            .and_then(|file| Self::write_csv(grid, file));

        match result {
            Ok(()) => {
                tracing::info!(filename, rows = grid.row_count(), "exported csv");
                Ok(filename.to_string())
            }
            Err(e) => {
                tracing::warn!(filename, error = %e, "csv export failed");
                Err(e)
            }
        }
    }

    /// Reads a CSV file into a snapshot ready to be imported into a grid.
    pub fn import_from_csv(filename: &str) -> PersistenceResult<Snapshot> {
        let result = File::open(filename)
            .map_err(PersistenceError::from)
            .and_then(Self::read_csv);

        match &result {
            Ok(snapshot) => tracing::info!(filename, rows = snapshot.len(), "imported csv"),
            Err(e) => tracing::warn!(filename, error = %e, "csv import failed"),
        }
        result
    }

    pub fn write_csv<W: Write>(grid: &Grid, writer: W) -> PersistenceResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![LABEL_HEADER.to_string()];
        header.extend(grid.column_headers());
        header.push(TOTAL_HEADER.to_string());
        csv_writer.write_record(&header)?;

        for row in grid.rows() {
            let mut record = vec![row.label.clone()];
            record.extend(row.cells.iter().map(|cell| format_cell_value(cell.value)));
            record.push(format_cell_value(Some(row.total())));
            csv_writer.write_record(&record)?;
        }

        let mut footer = vec![TOTAL_HEADER.to_string()];
        footer.extend(
            grid.column_sums()
                .iter()
                .map(|column| format_cell_value(Some(column.sum))),
        );
        footer.push(format_cell_value(Some(grid.grand_total())));
        csv_writer.write_record(&footer)?;

        csv_writer.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> PersistenceResult<Snapshot> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(PersistenceError::Format("missing header row".to_string()));
        }

        let exported_by_us = headers.len() > 1
            && headers.get(headers.len() - 1).map(str::trim) == Some(TOTAL_HEADER);
        let value_columns = if exported_by_us {
            headers.len() - 2
        } else {
            headers.len() - 1
        };

        // Letter headers are honored only when every value column has one;
        // anything else maps columns by position.
        let value_headers: Vec<&str> = headers
            .iter()
            .skip(1)
            .take(value_columns)
            .map(str::trim)
            .collect();
        let indexes: Option<Vec<usize>> = value_headers
            .iter()
            .map(|header| Grid::column_index(header))
            .collect();
        let letters: Vec<String> = match indexes {
            Some(indexes) => indexes.into_iter().map(Grid::column_label).collect(),
            None => (0..value_headers.len()).map(Grid::column_label).collect(),
        };

        let mut records = csv_reader
            .records()
            .collect::<Result<Vec<_>, csv::Error>>()?;
        if exported_by_us
            && records
                .last()
                .and_then(|record| record.get(0))
                .map(str::trim)
                == Some(TOTAL_HEADER)
        {
            records.pop();
        }

        let mut snapshot = Snapshot::new();
        for (position, record) in records.iter().enumerate() {
            let label = record.get(0).map(str::trim).unwrap_or_default();
            let label = if label.is_empty() {
                format!("Row {}", position + 1)
            } else {
                label.to_string()
            };

            let values: SnapshotRow = letters
                .iter()
                .enumerate()
                .map(|(column, letter)| {
                    let value = record.get(column + 1).and_then(parse_cell_input);
                    (letter.clone(), value)
                })
                .collect();
            snapshot.insert_unique(label, values);
        }

        Ok(snapshot)
    }
}

//! Tabular data sources
//!
//! Reads rows of a spreadsheet or CSV file into ordered column→value
//! records. The engine only ever sees `Record`s; which file format they
//! came from is decided here, by extension.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexMap;

use crate::error::{PdfPopError, Result};

/// One row of input data: an ordered mapping of column name to the cell's
/// stringified value. Empty cells are empty strings, never absent keys.
pub type Record = IndexMap<String, String>;

/// Spreadsheet extensions handled by calamine.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Read all records from a tabular data file.
///
/// The first row is the header row. Unrecognized extensions fail with
/// [`PdfPopError::UnsupportedDataFormat`].
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(PdfPopError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_workbook(path)
    } else if ext == "csv" {
        read_csv(path)
    } else {
        Err(PdfPopError::UnsupportedDataFormat(ext))
    }
}

fn read_workbook(path: &Path) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(idx).map(cell_text).unwrap_or_default();
            record.insert(header.clone(), value);
        }
        if record.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Whole-valued floats read back as integers, not "42.0".
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR:{e:?}"),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(idx).unwrap_or_default();
            record.insert(header.to_string(), value.to_string());
        }
        if record.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

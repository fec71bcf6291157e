// 📄 CSV Decode - delimited text -> grid of cells
//
// No header handling here: the whole file becomes a grid and the normalizer
// finds the header row itself, since exports often start with banner lines.

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::transaction::CellValue;

/// Decode CSV text into rows of cells. Ragged rows are kept as they are.
pub fn read_csv_grid<R: Read>(reader: R) -> Result<Vec<Vec<CellValue>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in rdr.records() {
        let record = record?;
        grid.push(record.iter().map(CellValue::from).collect());
    }

    debug!(rows = grid.len(), "decoded csv grid");
    Ok(grid)
}

pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<CellValue>>> {
    let file = File::open(path.as_ref())?;
    read_csv_grid(file)
}

// ============================================================================
// TESTS
// ============================================================================

use super::{parse_count, whole_count, FormatError, Result, TallyBuilder};
use crate::model::VoteTally;
use calamine::{open_workbook_auto, DataType, Range, Reader};
use std::path::Path;

/// Read the first sheet of an Excel or OpenDocument workbook.
pub fn read_tally(path: &Path, dropped_columns: &[String]) -> Result<VoteTally> {
    let spreadsheet_error = |message: String| FormatError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FormatError::EmptySheet(path.to_path_buf()))?;
    let sheet = match workbook.worksheet_range(&first_sheet) {
        Some(Ok(sheet)) => sheet,
        Some(Err(e)) => return Err(spreadsheet_error(e.to_string())),
        None => return Err(FormatError::EmptySheet(path.to_path_buf())),
    };

    tally_range(&sheet, dropped_columns)
        .and_then(|tally| tally.ok_or_else(|| FormatError::EmptySheet(path.to_path_buf())))
}

fn cell_count(cell: &DataType) -> Option<u64> {
    match cell {
        DataType::Empty => Some(0),
        DataType::Int(value) if *value >= 0 => Some(*value as u64),
        DataType::Float(value) => whole_count(*value),
        DataType::String(value) => parse_count(value),
        _ => None,
    }
}

/// Sum a sheet whose first row holds the headers. `None` for an empty sheet.
pub fn tally_range(sheet: &Range<DataType>, dropped_columns: &[String]) -> Result<Option<VoteTally>> {
    let mut rows = sheet.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => return Ok(None),
    };

    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    let mut builder = TallyBuilder::from_headers(&headers, dropped_columns)?;

    for (index, row) in rows.enumerate() {
        let row_number = index + 2;
        for (column, cell) in row.iter().enumerate() {
            let party = match builder.party_at(column) {
                Some(party) => party,
                None => continue,
            };
            let votes = cell_count(cell).ok_or_else(|| FormatError::InvalidCell {
                row: row_number,
                column: party.to_string(),
                value: cell.to_string(),
            })?;
            builder.add(column, votes)?;
        }
    }

    Ok(Some(builder.finish()))
}

use super::{parse_count, FormatError, Result, TallyBuilder};
use crate::model::VoteTally;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_tally(path: &Path, dropped_columns: &[String]) -> Result<VoteTally> {
    let file = File::open(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };
    read_tally_from(file, delimiter, dropped_columns)
}

/// Sum every data row of a delimited file into per-party totals.
pub fn read_tally_from<R: Read>(
    input: R,
    delimiter: u8,
    dropped_columns: &[String],
) -> Result<VoteTally> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let mut builder = TallyBuilder::from_headers(headers.iter(), dropped_columns)?;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let row = index + 2;
        for (column, value) in record.iter().enumerate() {
            let party = match builder.party_at(column) {
                Some(party) => party,
                None => continue,
            };
            let votes = parse_count(value).ok_or_else(|| FormatError::InvalidCell {
                row,
                column: party.to_string(),
                value: value.to_string(),
            })?;
            builder.add(column, votes)?;
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dropped() -> Vec<String> {
        crate::read_metadata::DEFAULT_DROPPED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn sums_polling_stations() {
        let data = "\
סמל ועדה,שם ישוב,סמל ישוב,בזב,מצביעים,פסולים,כשרים,מחל,פה,שס,Unnamed: 10
25,ירושלים,3000,800,600,5,595,300,200,95,
25,ירושלים,3000,700,500,2,498,100,300,98,
";
        let tally = read_tally_from(data.as_bytes(), b',', &dropped()).unwrap();
        assert_eq!(tally.len(), 3);
        assert_eq!(tally.get("מחל"), Some(400));
        assert_eq!(tally.get("פה"), Some(500));
        assert_eq!(tally.get("שס"), Some(193));
        assert_eq!(tally.total(), Some(1093));
    }

    #[test]
    fn blank_cells_count_as_zero() {
        let data = "A,B\n10,\n,4\n";
        let tally = read_tally_from(data.as_bytes(), b',', &[]).unwrap();
        assert_eq!(tally.get("A"), Some(10));
        assert_eq!(tally.get("B"), Some(4));
    }

    #[test]
    fn bad_cell_names_row_and_party() {
        let data = "A,B\n10,3\n5,x\n";
        let err = read_tally_from(data.as_bytes(), b',', &[]).unwrap_err();
        match err {
            FormatError::InvalidCell { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "B");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn column_sum_past_u64_is_an_error() {
        let data = "A,B\n18446744073709551615,1\n1,1\n";
        let err = read_tally_from(data.as_bytes(), b',', &[]).unwrap_err();
        match err {
            FormatError::CountOverflow { column } => assert_eq!(column, "A"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn reads_tab_separated_file() {
        let dir = std::env::temp_dir().join(format!("mandates-tsv-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("votes.tsv");
        fs::write(&path, "A\tB\n1\t2\n3\t4\n").unwrap();

        let tally = read_tally(&path, &[]).unwrap();
        assert_eq!(tally.get("A"), Some(4));
        assert_eq!(tally.get("B"), Some(6));

        fs::remove_dir_all(&dir).unwrap();
    }
}

// Primitives for reading CSV files.

use std::io;

use crate::rcv::{
    io_common::{candidate_columns, read_rank_str},
    *,
};

pub fn read_csv_ranking(path: &str, first_col: usize) -> RcvResult<ParsedTable> {
    let rdr = csv_builder()
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_records(rdr, path, first_col)
}

/// Same as [`read_csv_ranking`], from any source of CSV data.
pub fn read_csv_from<R: io::Read>(
    input: R,
    first_col: usize,
    source_name: &str,
) -> RcvResult<ParsedTable> {
    read_records(csv_builder().from_reader(input), source_name, first_col)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // The header is read as a normal line, and lines may have missing trailing cells.
    builder.has_headers(false).flexible(true);
    builder
}

fn read_records<R: io::Read>(
    rdr: csv::Reader<R>,
    source_name: &str,
    first_col: usize,
) -> RcvResult<ParsedTable> {
    let mut records = rdr.into_records();
    let header_record = records
        .next()
        .context(EmptyInputSnafu { path: source_name })?
        .context(CsvLineParseSnafu { lineno: 1_usize })?;
    let header: Vec<Option<String>> = header_record.iter().map(|s| Some(s.to_string())).collect();
    let columns = candidate_columns(&header, first_col);
    debug!("read_csv_ranking: {}: columns: {:?}", source_name, columns);

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let mut ranks: Vec<(String, f64)> = Vec::new();
        for (col, name) in columns.iter() {
            let cell = line.get(*col).unwrap_or("");
            if let Some(rank) = read_rank_str(cell, lineno, name)? {
                ranks.push((name.clone(), rank));
            }
        }
        debug!("read_csv_ranking: lineno: {:?} ranks: {:?}", lineno, ranks);
        ballots.push(ParsedBallot { lineno, ranks });
    }
    Ok(ParsedTable {
        candidates: columns.into_iter().map(|(_, name)| name).collect(),
        ballots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_form_export() {
        let data = "timestamp,Alice,Bob,Charlie\n\
                    2022-11-01,1,2,\n\
                    2022-11-01,,1,1\n\
                    2022-11-02,,,\n\
                    2022-11-02,2.5\n";
        let table = read_csv_from(data.as_bytes(), 1, "test").unwrap();
        assert_eq!(table.candidates, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(table.ballots.len(), 4);
        assert_eq!(
            table.ballots[0].ranks,
            vec![("Alice".to_string(), 1.0), ("Bob".to_string(), 2.0)]
        );
        assert_eq!(
            table.ballots[1].ranks,
            vec![("Bob".to_string(), 1.0), ("Charlie".to_string(), 1.0)]
        );
        // An empty line is a ballot without preferences.
        assert!(table.ballots[2].ranks.is_empty());
        assert_eq!(table.ballots[3].ranks, vec![("Alice".to_string(), 2.5)]);
        assert_eq!(table.ballots[3].lineno, 5);
    }

    #[test]
    fn first_column_index() {
        let data = "A,B,C\n1,2,3\n";
        let table = read_csv_from(data.as_bytes(), 0, "test").unwrap();
        assert_eq!(table.candidates, vec!["A", "B", "C"]);
        let table = read_csv_from(data.as_bytes(), 2, "test").unwrap();
        assert_eq!(table.candidates, vec!["C"]);
        assert_eq!(table.ballots[0].ranks, vec![("C".to_string(), 3.0)]);
    }

    #[test]
    fn bad_cell() {
        let data = "id,A,B\n1,1,2\n2,x,1\n";
        let res = read_csv_from(data.as_bytes(), 1, "test");
        match res {
            Err(RcvError::WrongCellType {
                lineno,
                column,
                content,
            }) => {
                assert_eq!(lineno, 3);
                assert_eq!(column, "A");
                assert_eq!(content, "x");
            }
            x => panic!("unexpected result: {:?}", x),
        }
    }

    #[test]
    fn empty_file() {
        let res = read_csv_from("".as_bytes(), 1, "test");
        assert!(matches!(res, Err(RcvError::EmptyInput { .. })));
    }
}

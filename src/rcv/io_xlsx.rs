// Primitives for reading Excel files, as exported by Microsoft Forms or Google Forms.

use calamine::DataType;

use crate::rcv::{
    io_common::{candidate_columns, read_rank_str},
    *,
};

pub fn read_xlsx_ranking(
    path: &str,
    first_col: usize,
    worksheet_name: Option<&str>,
) -> RcvResult<ParsedTable> {
    let wrange = get_range(path, worksheet_name)?;
    read_range(&wrange, path, first_col)
}

pub fn read_range(
    wrange: &calamine::Range<DataType>,
    path: &str,
    first_col: usize,
) -> RcvResult<ParsedTable> {
    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyInputSnafu { path })?;
    let header: Vec<Option<String>> = header_row.iter().map(header_name).collect();
    let columns = candidate_columns(&header, first_col);
    debug!("read_xlsx_ranking: header: {:?} columns: {:?}", header_row, columns);

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // Numbered as in Excel: the header is line 1.
        let lineno = idx + 2;
        debug!("read_xlsx_ranking: lineno: {:?} row: {:?}", lineno, row);
        let mut ranks: Vec<(String, f64)> = Vec::new();
        for (col, name) in columns.iter() {
            let rank = match row.get(*col) {
                None | Some(DataType::Empty) => None,
                Some(DataType::Float(f)) if f.is_finite() => Some(*f),
                Some(DataType::Int(i)) => Some(*i as f64),
                Some(DataType::String(s)) => read_rank_str(s, lineno, name)?,
                Some(cell) => {
                    return WrongCellTypeSnafu {
                        lineno,
                        column: name,
                        content: format!("{:?}", cell),
                    }
                    .fail();
                }
            };
            if let Some(rank) = rank {
                ranks.push((name.clone(), rank));
            }
        }
        ballots.push(ParsedBallot { lineno, ranks });
    }
    Ok(ParsedTable {
        candidates: columns.into_iter().map(|(_, name)| name).collect(),
        ballots,
    })
}

fn header_name(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> RcvResult<calamine::Range<DataType>> {
    debug!(
        "read_xlsx_ranking: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyInputSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

use std::path::Path;

use crate::rcv::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Finds the columns holding candidates: all the columns with a name, starting at `first_col`.
pub fn candidate_columns(header: &[Option<String>], first_col: usize) -> Vec<(usize, String)> {
    header
        .iter()
        .enumerate()
        .skip(first_col)
        .filter_map(|(idx, name)| match name {
            Some(s) if !s.trim().is_empty() => Some((idx, s.trim().to_string())),
            _ => None,
        })
        .collect()
}

/// Reads a rank written as text. Blank cells are not ranked.
pub fn read_rank_str(s: &str, lineno: usize, column: &str) -> RcvResult<Option<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(Some(x)),
        _ => WrongCellTypeSnafu {
            lineno,
            column,
            content: s,
        }
        .fail(),
    }
}

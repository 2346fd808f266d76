use std::collections::HashMap;

use crate::model::{CellValue, Frame};

/// Build a [`Frame`] from a raw grid: row 0 is the header, the rest are records.
///
/// Blank header cells are named `COL<i>` (zero-based column index). Cells past
/// the end of a short row read as `Empty`; cells past the header width are
/// dropped. An empty grid gives an empty frame. Header names are not
/// deduplicated: columns sharing a name, including a literal `COL<i>` that
/// clashes with a generated one, merge and the right-most value wins.
pub fn to_frame(raw: &[Vec<CellValue>]) -> Frame {
    let Some((header_row, data)) = raw.split_first() else {
        return Frame::default();
    };

    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_trimmed_string();
            if name.is_empty() {
                format!("COL{i}")
            } else {
                match cell {
                    CellValue::Text(s) => s.clone(),
                    _ => name,
                }
            }
        })
        .collect();

    let rows = data
        .iter()
        .map(|row| {
            let mut record = HashMap::with_capacity(header.len());
            for (i, name) in header.iter().enumerate() {
                let value = row.get(i).cloned().unwrap_or(CellValue::Empty);
                record.insert(name.clone(), value);
            }
            record
        })
        .collect();

    Frame { header, rows }
}

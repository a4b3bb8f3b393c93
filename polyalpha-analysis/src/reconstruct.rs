//! Reassembles decoded columns into plaintext order

/// Interleaves `columns` row by row: the first character of every column, then the
/// second, and so on, for as many rows as the first column has.
pub fn interleave<S: AsRef<str>>(columns: &[S]) -> String {
    let columns: Vec<Vec<char>> = columns
        .iter()
        .map(|column| column.as_ref().chars().collect())
        .collect();

    let rows = columns.first().map_or(0, Vec::len);
    let mut plaintext = String::with_capacity(columns.iter().map(Vec::len).sum());

    for position in 0..rows {
        // Columns are equal length by construction; a short one simply contributes nothing.
        plaintext.extend(columns.iter().filter_map(|column| column.get(position)));
    }

    plaintext
}

//! Columnar decomposition of the ciphertext

use crate::coincidence::letter_counts;
use crate::error::{AnalysisError, Result};
use crate::language::Alphabet;

/// Ciphertext laid out in rows of `key_length` characters.
///
/// A trailing partial row is dropped, not padded; `dropped()` reports how many
/// characters were lost that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherMatrix {
    rows: Vec<Vec<char>>,
    dropped: usize,
}

impl CipherMatrix {
    pub fn new(cipher: &str, key_length: usize) -> Result<Self> {
        if key_length == 0 {
            return Err(AnalysisError::InvalidKeyLength {
                key_length,
                alphabet_size: 0,
            });
        }

        let characters: Vec<char> = cipher.chars().collect();
        let chunks = characters.chunks_exact(key_length);
        let dropped = chunks.remainder().len();
        let rows = chunks.map(<[char]>::to_vec).collect();

        Ok(Self { rows, dropped })
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Characters of the trailing partial row that were discarded
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vertical slices of the matrix, one per key position.
    ///
    /// The column count is the width of the first row; an empty matrix has no columns.
    pub fn columns(&self) -> Vec<String> {
        let width = self.rows.first().map_or(0, Vec::len);

        (0..width)
            .map(|position| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(position))
                    .collect()
            })
            .collect()
    }
}

/// The letter occurring most often in `column`.
///
/// Ties go to the letter that comes first in alphabet order.
pub fn most_frequent_letter(column: &str, alphabet: &Alphabet) -> char {
    let frequencies = letter_counts(column, alphabet);

    let mut best = 0;
    for (index, &count) in frequencies.iter().enumerate() {
        if count > frequencies[best] {
            best = index;
        }
    }

    alphabet.letters()[best]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_matrix_drops_partial_row() {
        let matrix = CipherMatrix::new("ABCDEFGH", 3).unwrap();

        assert_eq!(
            matrix.rows(),
            &[vec!['A', 'B', 'C'], vec!['D', 'E', 'F']]
        );
        assert_eq!(matrix.dropped(), 2);
        assert_eq!(matrix.columns(), vec!["AD", "BE", "CF"]);
    }

    #[test]
    fn test_matrix_exact_fit() {
        let matrix = CipherMatrix::new("ABCDEF", 2).unwrap();

        assert_eq!(matrix.dropped(), 0);
        assert_eq!(matrix.columns(), vec!["ACE", "BDF"]);
    }

    #[test]
    fn test_single_row_matrix() {
        let matrix = CipherMatrix::new("XAZ", 3).unwrap();
        let alphabet = Language::portuguese().alphabet;

        let columns = matrix.columns();
        assert_eq!(columns, vec!["X", "A", "Z"]);

        let letters: Vec<char> = columns
            .iter()
            .map(|column| most_frequent_letter(column, &alphabet))
            .collect();
        assert_eq!(letters, vec!['X', 'A', 'Z']);
    }

    #[test]
    fn test_short_cipher_has_no_columns() {
        let matrix = CipherMatrix::new("AB", 3).unwrap();

        assert!(matrix.is_empty());
        assert_eq!(matrix.dropped(), 2);
        assert!(matrix.columns().is_empty());
    }

    #[test]
    fn test_zero_key_length_is_rejected() {
        assert!(matches!(
            CipherMatrix::new("ABC", 0),
            Err(AnalysisError::InvalidKeyLength { key_length: 0, .. })
        ));
    }

    #[test]
    fn test_most_frequent_letter() {
        let alphabet = Language::portuguese().alphabet;

        assert_eq!(most_frequent_letter("ZZAZB", &alphabet), 'Z');
    }

    #[test]
    fn test_most_frequent_tie_uses_alphabet_order() {
        let alphabet = Language::portuguese().alphabet;

        assert_eq!(most_frequent_letter("ZZEE", &alphabet), 'E');
        assert_eq!(most_frequent_letter("XMXM", &alphabet), 'M');
        // Nothing from the alphabet: every count is zero
        assert_eq!(most_frequent_letter("KWY", &alphabet), 'A');
    }
}

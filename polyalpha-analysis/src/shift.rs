//! Shift computation and application in frequency-rank space

use crate::error::Result;
use crate::language::FrequencyTable;

/// Distance in rank between the observed ciphertext letter and the assumed plaintext letter.
///
/// This is a magnitude; `apply_shift` always rotates backwards.
pub fn shift(observed: char, assumed: char, table: &FrequencyTable) -> Result<usize> {
    let observed_rank = table.rank(observed)?;
    let assumed_rank = table.rank(assumed)?;

    Ok(observed_rank.abs_diff(assumed_rank))
}

/// Moves `letter` back by `shift` ranks, wrapping from rank 0 to the last rank.
pub fn apply_shift(letter: char, shift: usize, table: &FrequencyTable) -> Result<char> {
    let size = table.len();
    let rank = table.rank(letter)?;
    let shifted = (rank + size - shift % size) % size;

    Ok(table.letters_by_rank()[shifted])
}

/// Decodes a whole column with the shift between its observed and assumed letters.
pub fn decode_column(
    column: &str,
    observed: char,
    assumed: char,
    table: &FrequencyTable,
) -> Result<String> {
    let amount = shift(observed, assumed, table)?;

    column
        .chars()
        .map(|letter| apply_shift(letter, amount, table))
        .collect()
}

/// Encrypts `text` by moving each letter forward in rank by the cycling `shifts`.
///
/// Decoding a column of the result with its own shift restores the text as long
/// as the column's dominant letter did not wrap past the last rank.
pub fn encipher(text: &str, shifts: &[usize], table: &FrequencyTable) -> Result<String> {
    if shifts.is_empty() {
        return Ok(text.to_string());
    }

    let size = table.len();

    text.chars()
        .zip(shifts.iter().cycle())
        .map(|(letter, &amount)| {
            let rank = table.rank(letter)?;
            Ok(table.letters_by_rank()[(rank + amount) % size])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::language::Language;

    fn table() -> FrequencyTable {
        Language::portuguese().frequencies
    }

    #[test]
    fn test_shift_is_a_magnitude() {
        let table = table();
        // A is rank 0, S is rank 3
        assert_eq!(shift('S', 'A', &table).unwrap(), 3);
        assert_eq!(shift('A', 'S', &table).unwrap(), 3);
        assert_eq!(shift('E', 'E', &table).unwrap(), 0);
    }

    #[test]
    fn test_apply_shift_moves_backwards() {
        let table = table();
        assert_eq!(apply_shift('S', 3, &table).unwrap(), 'A');
        assert_eq!(apply_shift('O', 1, &table).unwrap(), 'E');
        assert_eq!(apply_shift('A', 0, &table).unwrap(), 'A');
    }

    #[test]
    fn test_apply_shift_wraps_to_last_rank() {
        let table = table();
        assert_eq!(apply_shift('A', 1, &table).unwrap(), 'X');
        assert_eq!(apply_shift('E', 3, &table).unwrap(), 'J');
    }

    #[test]
    fn test_shift_and_complement_are_inverse() {
        let table = table();
        let size = table.len();

        for &letter in table.letters_by_rank() {
            for s in 0..size {
                let there = apply_shift(letter, s, &table).unwrap();
                let back = apply_shift(there, size - s, &table).unwrap();
                assert_eq!(back, letter, "letter {} shift {}", letter, s);
            }
        }
    }

    #[test]
    fn test_unknown_letter() {
        let table = table();
        assert_eq!(
            shift('K', 'A', &table),
            Err(AnalysisError::UnknownLetter('K'))
        );
        assert_eq!(
            apply_shift('W', 2, &table),
            Err(AnalysisError::UnknownLetter('W'))
        );
        assert_eq!(
            decode_column("AAY", 'A', 'E', &table),
            Err(AnalysisError::UnknownLetter('Y'))
        );
    }

    #[test]
    fn test_decode_column() {
        let table = table();
        // Observed O (rank 2) assumed A (rank 0): every letter moves back 2 ranks
        assert_eq!(decode_column("OSR", 'O', 'A', &table).unwrap(), "AEO");
    }

    #[test]
    fn test_encipher_then_decode() {
        let table = table();
        let cipher = encipher("AEAE", &[2, 5], &table).unwrap();

        assert_eq!(cipher, "ONON");
        assert_eq!(decode_column("OO", 'O', 'A', &table).unwrap(), "AA");
        assert_eq!(decode_column("NN", 'N', 'E', &table).unwrap(), "EE");
    }
}

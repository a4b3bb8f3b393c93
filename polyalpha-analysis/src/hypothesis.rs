//! Rank assignment hypotheses and the operator seam that chooses one
//!
//! For every column the analysis knows which letter is most frequent in the
//! ciphertext, but not which plaintext letter it stands for. A rank assignment
//! supplies that guess, one letter per column. Where it comes from (a fixed
//! command-line value, an interactive prompt) is up to the [`RankSource`].

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::language::FrequencyTable;

/// Letters the prompt offers by default: the two most frequent Portuguese letters.
pub const DEFAULT_CANDIDATES: [char; 2] = ['E', 'A'];

/// Above this many hypotheses the prompt stops listing them and only accepts letters.
pub const MAX_LISTED_HYPOTHESES: usize = 512;

/// Provides the assumed plaintext letter of every column.
pub trait RankSource {
    /// Chooses one letter per column given each column's most frequent ciphertext letter.
    fn select(&mut self, most_frequent: &[char]) -> Result<Vec<char>>;
}

/// A rank assignment known ahead of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAssignment {
    letters: Vec<char>,
}

impl FixedAssignment {
    pub fn new(letters: impl IntoIterator<Item = char>) -> Self {
        Self {
            letters: letters.into_iter().collect(),
        }
    }

    /// Parses `"ASA"` or `"a,s,a"` style input
    pub fn parse(input: &str) -> Self {
        Self::new(parse_letters(input))
    }
}

impl RankSource for FixedAssignment {
    fn select(&mut self, most_frequent: &[char]) -> Result<Vec<char>> {
        if self.letters.len() != most_frequent.len() {
            return Err(AnalysisError::InvalidAssignment {
                expected: most_frequent.len(),
                found: self.letters.len(),
            });
        }

        Ok(self.letters.clone())
    }
}

/// Number of hypotheses of `length` letters over `candidates` letters.
///
/// `None` if the count does not fit in a `usize`.
pub fn hypothesis_count(candidates: usize, length: usize) -> Option<usize> {
    u32::try_from(length)
        .ok()
        .and_then(|length| candidates.checked_pow(length))
}

/// Every string of `length` letters drawn from `candidates`.
///
/// Hypotheses come in counting order: the first candidate is digit 0 and the
/// leftmost position is the most significant. With candidates `E`,`A` and
/// length 3 the sequence is `EEE, EEA, EAE, EAA, AEE, ...`.
pub fn enumerate_hypotheses(
    candidates: &[char],
    length: usize,
) -> impl Iterator<Item = String> + '_ {
    let base = candidates.len();
    let total = if base == 0 {
        0
    } else {
        hypothesis_count(base, length).unwrap_or(usize::MAX)
    };

    (0..total).map(move |mut value| {
        let mut digits = vec![candidates[0]; length];
        for slot in digits.iter_mut().rev() {
            *slot = candidates[value % base];
            value /= base;
        }
        digits.into_iter().collect()
    })
}

/// Interactive rank source: lists the hypotheses and reads the operator's choice.
///
/// The operator answers with either the index of a listed hypothesis or the
/// letters themselves. End of input, an empty line, or an answer that is neither
/// rejects the selection.
pub struct PromptSource<'a, R, W> {
    input: R,
    output: W,
    candidates: Vec<char>,
    table: &'a FrequencyTable,
}

impl<'a, R: BufRead, W: Write> PromptSource<'a, R, W> {
    pub fn new(input: R, output: W, candidates: Vec<char>, table: &'a FrequencyTable) -> Self {
        Self {
            input,
            output,
            candidates,
            table,
        }
    }

    fn write_prompt(&mut self, length: usize) -> std::io::Result<Option<usize>> {
        let count = hypothesis_count(self.candidates.len(), length)
            .filter(|&count| count <= MAX_LISTED_HYPOTHESES && !self.candidates.is_empty());

        writeln!(
            self.output,
            "Choose the most frequent letters order to calculate the shift for each column"
        )?;

        if let Some(count) = count {
            for (index, hypothesis) in enumerate_hypotheses(&self.candidates, length).enumerate() {
                writeln!(self.output, "  [{:>3}] {}", index, hypothesis)?;
            }
            write!(self.output, "Index (0-{}) or {} letters: ", count - 1, length)?;
        } else {
            write!(self.output, "Enter {} letters: ", length)?;
        }

        self.output.flush()?;
        Ok(count)
    }

    fn interpret(&self, answer: &str, length: usize, listed: Option<usize>) -> Result<Vec<char>> {
        if let (Ok(index), Some(count)) = (answer.parse::<usize>(), listed) {
            if index >= count {
                return Err(AnalysisError::OperatorInputRejected(format!(
                    "Index {} is not between 0 and {}",
                    index,
                    count - 1
                )));
            }

            return enumerate_hypotheses(&self.candidates, length)
                .nth(index)
                .map(|hypothesis| hypothesis.chars().collect())
                .ok_or_else(|| {
                    AnalysisError::OperatorInputRejected(format!("No hypothesis {}", index))
                });
        }

        let letters = parse_letters(answer);
        if letters.len() != length {
            return Err(AnalysisError::OperatorInputRejected(format!(
                "Expected {} letters, got {}",
                length,
                letters.len()
            )));
        }

        for &letter in &letters {
            self.table
                .rank(letter)
                .map_err(|_| AnalysisError::OperatorInputRejected(format!(
                    "'{}' is not a letter of the language",
                    letter
                )))?;
        }

        Ok(letters)
    }
}

impl<R: BufRead, W: Write> RankSource for PromptSource<'_, R, W> {
    fn select(&mut self, most_frequent: &[char]) -> Result<Vec<char>> {
        let length = most_frequent.len();
        let rejected = |e: std::io::Error| AnalysisError::OperatorInputRejected(e.to_string());

        let listed = self.write_prompt(length).map_err(rejected)?;

        let mut answer = String::new();
        let read = self.input.read_line(&mut answer).map_err(rejected)?;
        if read == 0 {
            return Err(AnalysisError::OperatorInputRejected(
                "Input closed before a selection was made".to_string(),
            ));
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AnalysisError::OperatorInputRejected(
                "No selection made".to_string(),
            ));
        }

        let letters = self.interpret(answer, length, listed)?;
        let selection: String = letters.iter().collect();
        debug!(%selection, "operator selected rank assignment");

        Ok(letters)
    }
}

fn parse_letters(input: &str) -> Vec<char> {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .flat_map(char::to_uppercase)
        .collect()
}

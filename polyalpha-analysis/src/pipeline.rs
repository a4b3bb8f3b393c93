//! Drives the analysis from ciphertext to plaintext

use std::fmt;

use tracing::{debug, info, warn};

use crate::coincidence::CoincidenceEstimator;
use crate::columns::{most_frequent_letter, CipherMatrix};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::hypothesis::RankSource;
use crate::key_length::find_key_length;
use crate::language::Language;
use crate::reconstruct::interleave;
use crate::shift::{decode_column, shift};

/// Where an analysis currently stands.
///
/// `Done` and `KeyLengthNotFound` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    KeyLengthKnown,
    ColumnsAnalyzed,
    RankAssigned,
    Decoded,
    Done,
    KeyLengthNotFound,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::KeyLengthKnown => "KeyLengthKnown",
            Stage::ColumnsAnalyzed => "ColumnsAnalyzed",
            Stage::RankAssigned => "RankAssigned",
            Stage::Decoded => "Decoded",
            Stage::Done => "Done",
            Stage::KeyLengthNotFound => "KeyLengthNotFound",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything learned by a completed analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub key_length: usize,
    /// Most frequent ciphertext letter of each column
    pub most_frequent: Vec<char>,
    /// Assumed plaintext letter of each column
    pub assignment: Vec<char>,
    /// Backward rank shift applied to each column
    pub shifts: Vec<usize>,
    pub plaintext: String,
    /// Trailing ciphertext characters that did not fill a whole row
    pub dropped: usize,
}

/// Step-by-step cryptanalysis of one ciphertext.
///
/// Steps must run in order:
/// `find_key_length` (or `assume_key_length`), `analyze_columns`, `assign_ranks`,
/// `decode`, `reconstruct`. Calling a step out of order fails with `InvalidStage`.
/// A failed rank assignment leaves the analysis where it was, so the operator can
/// try again.
#[derive(Debug, Clone)]
pub struct Cryptanalysis<'a> {
    language: &'a Language,
    config: AnalysisConfig,
    cipher: &'a str,
    stage: Stage,
    key_length: usize,
    columns: Vec<String>,
    most_frequent: Vec<char>,
    dropped: usize,
    assignment: Vec<char>,
    shifts: Vec<usize>,
    decoded: Vec<String>,
}

impl<'a> Cryptanalysis<'a> {
    pub fn new(language: &'a Language, config: AnalysisConfig, cipher: &'a str) -> Self {
        Self {
            language,
            config,
            cipher,
            stage: Stage::Idle,
            key_length: 0,
            columns: Vec::new(),
            most_frequent: Vec::new(),
            dropped: 0,
            assignment: Vec::new(),
            shifts: Vec::new(),
            decoded: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn key_length(&self) -> Option<usize> {
        (self.key_length > 0).then_some(self.key_length)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn most_frequent(&self) -> &[char] {
        &self.most_frequent
    }

    /// Searches for the key length with the index of coincidence.
    pub fn find_key_length(&mut self) -> Result<usize> {
        self.expect_stage(Stage::Idle)?;

        let estimator = CoincidenceEstimator::new(self.language, &self.config);
        match find_key_length(self.cipher, &estimator, &self.config) {
            Ok(key_length) => {
                info!(key_length, "key length found");
                self.key_length = key_length;
                self.stage = Stage::KeyLengthKnown;
                Ok(key_length)
            }
            Err(e @ AnalysisError::KeyLengthNotFound { .. }) => {
                warn!("{}", e);
                self.stage = Stage::KeyLengthNotFound;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Skips the search and uses a key length known from elsewhere.
    pub fn assume_key_length(&mut self, key_length: usize) -> Result<()> {
        self.expect_stage(Stage::Idle)?;

        let alphabet_size = self.language.alphabet.len();
        if key_length == 0 || key_length >= alphabet_size {
            return Err(AnalysisError::InvalidKeyLength {
                key_length,
                alphabet_size,
            });
        }

        debug!(key_length, "using supplied key length");
        self.key_length = key_length;
        self.stage = Stage::KeyLengthKnown;
        Ok(())
    }

    /// Splits the ciphertext into columns and finds each column's most frequent letter.
    pub fn analyze_columns(&mut self) -> Result<&[char]> {
        self.expect_stage(Stage::KeyLengthKnown)?;
        info!(key_length = self.key_length, "trying to find letters");

        let matrix = CipherMatrix::new(self.cipher, self.key_length)?;
        if matrix.is_empty() {
            return Err(AnalysisError::EmptyText {
                length: self.cipher.chars().count(),
            });
        }
        if matrix.dropped() > 0 {
            warn!(
                dropped = matrix.dropped(),
                "trailing ciphertext does not fill a row and is ignored"
            );
        }

        let columns = matrix.columns();
        let most_frequent = columns
            .iter()
            .map(|column| most_frequent_letter(column, &self.language.alphabet))
            .collect();

        self.columns = columns;
        self.most_frequent = most_frequent;
        self.dropped = matrix.dropped();
        self.stage = Stage::ColumnsAnalyzed;

        Ok(&self.most_frequent)
    }

    /// Asks `source` for the assumed plaintext letter of every column.
    pub fn assign_ranks(&mut self, source: &mut dyn RankSource) -> Result<()> {
        self.expect_stage(Stage::ColumnsAnalyzed)?;

        let assignment = source.select(&self.most_frequent)?;
        if assignment.len() != self.key_length {
            return Err(AnalysisError::InvalidAssignment {
                expected: self.key_length,
                found: assignment.len(),
            });
        }
        for &letter in &assignment {
            self.language.frequencies.rank(letter)?;
        }

        let observed: String = self.most_frequent.iter().collect();
        let assumed: String = assignment.iter().collect();
        debug!(%observed, %assumed, "rank assignment accepted");
        self.assignment = assignment;
        self.stage = Stage::RankAssigned;
        Ok(())
    }

    /// Shifts every column back by the distance between its observed and assumed letter.
    pub fn decode(&mut self) -> Result<&[String]> {
        self.expect_stage(Stage::RankAssigned)?;

        let table = &self.language.frequencies;
        let mut shifts = Vec::with_capacity(self.key_length);
        let mut decoded = Vec::with_capacity(self.key_length);

        for ((column, &observed), &assumed) in self
            .columns
            .iter()
            .zip(&self.most_frequent)
            .zip(&self.assignment)
        {
            shifts.push(shift(observed, assumed, table)?);
            decoded.push(decode_column(column, observed, assumed, table)?);
        }

        debug!(?shifts, "columns decoded");
        self.shifts = shifts;
        self.decoded = decoded;
        self.stage = Stage::Decoded;

        Ok(&self.decoded)
    }

    /// Interleaves the decoded columns into the plaintext.
    pub fn reconstruct(&mut self) -> Result<Recovery> {
        self.expect_stage(Stage::Decoded)?;

        let recovery = Recovery {
            key_length: self.key_length,
            most_frequent: self.most_frequent.clone(),
            assignment: self.assignment.clone(),
            shifts: self.shifts.clone(),
            plaintext: interleave(&self.decoded),
            dropped: self.dropped,
        };

        self.stage = Stage::Done;
        Ok(recovery)
    }

    /// Runs every remaining step, taking the rank assignment from `source`.
    pub fn run(mut self, source: &mut dyn RankSource) -> Result<Recovery> {
        if self.stage == Stage::Idle {
            self.find_key_length()?;
        }
        self.analyze_columns()?;
        self.assign_ranks(source)?;
        self.decode()?;
        self.reconstruct()
    }

    fn expect_stage(&self, expected: Stage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(AnalysisError::InvalidStage {
                expected: expected.name(),
                found: self.stage.name(),
            })
        }
    }
}

//! Language resources: alphabet, frequency ranking and expected index of coincidence

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AnalysisError, Result};

/// Expected index of coincidence of Portuguese text
pub const PORTUGUESE_COINCIDENCE_INDEX: f64 = 0.072723;

/// Portuguese alphabet without K, W and Y
pub const PORTUGUESE_ALPHABET: &str = "ABCDEFGHIJLMNOPQRSTUVXZ";

/// Portuguese letters in descending order of expected frequency
pub const PORTUGUESE_FREQUENCY_ORDER: &str = "AEOSRINDMUTCLPVGHQBFZJX";

/// Ordered set of the letters of a language.
///
/// The order is fixed at construction and is used for tie-breaking whenever
/// letters are compared by count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    /// Create an alphabet from its letters in canonical order.
    ///
    /// Letters are uppercased; duplicates and whitespace are rejected.
    pub fn new(letters: &str) -> Result<Self> {
        let mut seen: Vec<char> = Vec::new();

        for c in letters.chars() {
            if c.is_whitespace() {
                return Err(AnalysisError::InvalidLanguage(
                    "Alphabet cannot contain whitespace".to_string(),
                ));
            }

            let upper = normalize_letter(c);
            if seen.contains(&upper) {
                return Err(AnalysisError::InvalidLanguage(format!(
                    "Letter '{}' appears more than once in the alphabet",
                    upper
                )));
            }
            seen.push(upper);
        }

        if seen.len() < 2 {
            return Err(AnalysisError::InvalidLanguage(
                "Alphabet needs at least 2 letters".to_string(),
            ));
        }

        Ok(Self { letters: seen })
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// Position of `letter` in alphabet order
    pub fn position(&self, letter: char) -> Option<usize> {
        self.letters.iter().position(|&c| c == letter)
    }

    /// Uppercase `text` and drop whitespace.
    ///
    /// Any other character is kept: it never matches an alphabet letter but still
    /// counts toward the text length.
    pub fn normalize(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(normalize_letter)
            .collect()
    }
}

/// Bijective mapping between letters and their frequency rank (0 = most frequent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    by_rank: Vec<char>,
    ranks: HashMap<char, usize>,
}

impl FrequencyTable {
    /// Build the table from the letters of `alphabet` listed in descending frequency.
    pub fn new(alphabet: &Alphabet, frequency_order: &str) -> Result<Self> {
        let by_rank: Vec<char> = frequency_order
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(normalize_letter)
            .collect();

        let mut ranks = HashMap::with_capacity(by_rank.len());
        for (rank, &letter) in by_rank.iter().enumerate() {
            if !alphabet.contains(letter) {
                return Err(AnalysisError::InvalidLanguage(format!(
                    "Ranked letter '{}' is not in the alphabet",
                    letter
                )));
            }
            if ranks.insert(letter, rank).is_some() {
                return Err(AnalysisError::InvalidLanguage(format!(
                    "Letter '{}' is ranked more than once",
                    letter
                )));
            }
        }

        if by_rank.len() != alphabet.len() {
            return Err(AnalysisError::InvalidLanguage(format!(
                "Frequency order ranks {} letters but the alphabet has {}",
                by_rank.len(),
                alphabet.len()
            )));
        }

        Ok(Self { by_rank, ranks })
    }

    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }

    /// Frequency rank of `letter`
    pub fn rank(&self, letter: char) -> Result<usize> {
        self.ranks
            .get(&letter)
            .copied()
            .ok_or(AnalysisError::UnknownLetter(letter))
    }

    /// Letter holding `rank`, if the rank exists
    pub fn letter_at(&self, rank: usize) -> Option<char> {
        self.by_rank.get(rank).copied()
    }

    pub fn letters_by_rank(&self) -> &[char] {
        &self.by_rank
    }
}

/// Everything the analysis needs to know about the plaintext language.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub name: String,
    pub alphabet: Alphabet,
    pub frequencies: FrequencyTable,
    pub coincidence_index: f64,
}

/// On-disk form of a language definition.
///
/// ```toml
/// name = "portuguese"
/// alphabet = "ABCDEFGHIJLMNOPQRSTUVXZ"
/// frequency_order = "AEOSRINDMUTCLPVGHQBFZJX"
/// coincidence_index = 0.072723
/// ```
#[derive(Debug, Deserialize)]
struct LanguageDefinition {
    name: String,
    alphabet: String,
    frequency_order: String,
    coincidence_index: f64,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        alphabet: &str,
        frequency_order: &str,
        coincidence_index: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&coincidence_index) {
            return Err(AnalysisError::InvalidLanguage(format!(
                "Index of coincidence {} is outside [0, 1]",
                coincidence_index
            )));
        }

        let alphabet = Alphabet::new(alphabet)?;
        let frequencies = FrequencyTable::new(&alphabet, frequency_order)?;

        Ok(Self {
            name: name.into(),
            alphabet,
            frequencies,
            coincidence_index,
        })
    }

    /// Built-in Portuguese resources
    pub fn portuguese() -> Self {
        let alphabet = Alphabet {
            letters: PORTUGUESE_ALPHABET.chars().collect(),
        };
        let by_rank: Vec<char> = PORTUGUESE_FREQUENCY_ORDER.chars().collect();
        let ranks = by_rank
            .iter()
            .enumerate()
            .map(|(rank, &letter)| (letter, rank))
            .collect();

        Self {
            name: "portuguese".to_string(),
            alphabet,
            frequencies: FrequencyTable { by_rank, ranks },
            coincidence_index: PORTUGUESE_COINCIDENCE_INDEX,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let definition: LanguageDefinition = toml::from_str(source)
            .map_err(|e| AnalysisError::InvalidLanguage(e.to_string()))?;

        Self::new(
            definition.name,
            &definition.alphabet,
            &definition.frequency_order,
            definition.coincidence_index,
        )
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidLanguage(format!("Cannot read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&source)
    }
}

fn normalize_letter(c: char) -> char {
    // Letters whose uppercase form is not a single char are kept as-is.
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

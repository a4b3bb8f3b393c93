//! Index of coincidence estimation

use tracing::trace;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::language::{Alphabet, Language};

/// Measures indices of coincidence and compares them to a language's natural index.
#[derive(Debug, Clone, Copy)]
pub struct CoincidenceEstimator<'a> {
    language: &'a Language,
    tolerance: f64,
}

impl<'a> CoincidenceEstimator<'a> {
    pub fn new(language: &'a Language, config: &AnalysisConfig) -> Self {
        Self {
            language,
            tolerance: config.tolerance,
        }
    }

    pub fn language(&self) -> &'a Language {
        self.language
    }

    /// Index of coincidence of `text` over this language's alphabet
    pub fn coincidence_index(&self, text: &str) -> Result<f64> {
        coincidence_index(text, &self.language.alphabet)
    }

    /// Whether `index` lies within the tolerance of the language index
    pub fn is_natural_index(&self, index: f64) -> bool {
        (index - self.language.coincidence_index).abs() <= self.tolerance
    }

    /// Index of `text`, and whether it looks like natural language
    pub fn measure(&self, text: &str) -> Result<(f64, bool)> {
        let index = self.coincidence_index(text)?;
        Ok((index, self.is_natural_index(index)))
    }
}

/// Calculates the Index of Coincidence (IC) of `text`, rounded to 6 decimal digits.
///
/// Characters outside the alphabet never match but still count toward the length.
///
/// # Errors
///
/// `EmptyText` when `text` has fewer than 2 characters.
pub fn coincidence_index(text: &str, alphabet: &Alphabet) -> Result<f64> {
    let length = text.chars().count();
    if length < 2 {
        return Err(AnalysisError::EmptyText { length });
    }

    let frequencies = letter_counts(text, alphabet);

    let numerator: u64 = frequencies
        .iter()
        .map(|&freq| freq * freq.saturating_sub(1))
        .sum();
    let denominator = (length as u64) * (length as u64 - 1);

    let index = round6(numerator as f64 / denominator as f64);
    trace!(length, index, "coincidence index");

    Ok(index)
}

/// Counts each alphabet letter in `text`, in alphabet order
pub fn letter_counts(text: &str, alphabet: &Alphabet) -> Vec<u64> {
    let mut frequencies = vec![0u64; alphabet.len()];

    for c in text.chars() {
        if let Some(index) = alphabet.position(c) {
            frequencies[index] += 1;
        }
    }

    frequencies
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

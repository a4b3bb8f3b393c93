//! Tunable analysis parameters

use crate::error::{AnalysisError, Result};

/// Default maximum distance from the language index that still counts as natural
pub const DEFAULT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Accepted distance between a measured index and the language index
    pub tolerance: f64,

    /// Largest key length to try. `None` (or anything too large) means the
    /// search stops just below the alphabet size.
    pub max_key_length: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_key_length: None,
        }
    }
}

impl AnalysisConfig {
    /// Builds a config, rejecting a NaN, infinite or negative tolerance.
    pub fn new(tolerance: f64, max_key_length: Option<usize>) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AnalysisError::InvalidTolerance(tolerance));
        }

        Ok(Self {
            tolerance,
            max_key_length,
        })
    }

    /// Exclusive upper bound for the key length search over an alphabet of `alphabet_size` letters
    pub fn key_length_bound(&self, alphabet_size: usize) -> usize {
        match self.max_key_length {
            Some(max) => max.saturating_add(1).min(alphabet_size),
            None => alphabet_size,
        }
    }
}

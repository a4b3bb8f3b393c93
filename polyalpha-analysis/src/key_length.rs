//! Key length search using the index of coincidence

use tracing::{debug, info};

use crate::coincidence::CoincidenceEstimator;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Finds the smallest key length whose interleaved stream reads like natural language.
///
/// Candidates are tried in ascending order and the first match wins:
///
/// 1. the whole text,
/// 2. the even and the odd positions,
/// 3. every `m`-th character from position 0, for `m = 3, 4, ...`
///
/// The search stops below the alphabet size, or earlier if `config.max_key_length`
/// is set. Streams shorter than 2 characters are skipped.
///
/// # Errors
///
/// * `EmptyText` when `cipher` itself has fewer than 2 characters.
/// * `KeyLengthNotFound` when no candidate produced a natural index.
pub fn find_key_length(
    cipher: &str,
    estimator: &CoincidenceEstimator<'_>,
    config: &AnalysisConfig,
) -> Result<usize> {
    let bound = config.key_length_bound(estimator.language().alphabet.len());

    if bound > 1 {
        let (index, natural) = estimator.measure(cipher)?;
        debug!(key_length = 1, index, "calculating coincidence index");
        if natural {
            info!(key_length = 1, index, "found a good index");
            return Ok(1);
        }
    }

    if bound > 2 {
        let evens = every_nth(cipher, 2, 0);
        let odds = every_nth(cipher, 2, 1);

        for stream in [&evens, &odds] {
            if let Some(index) = natural_index_of(stream, estimator)? {
                info!(key_length = 2, index, "found a good index");
                return Ok(2);
            }
        }
    }

    for key_length in 3..bound {
        let stream = every_nth(cipher, key_length, 0);

        if let Some(index) = natural_index_of(&stream, estimator)? {
            info!(key_length, index, "found a good index");
            return Ok(key_length);
        }
    }

    Err(AnalysisError::KeyLengthNotFound { max_tested: bound })
}

/// Characters at positions `offset`, `offset + step`, `offset + 2 * step`, ...
pub fn every_nth(text: &str, step: usize, offset: usize) -> String {
    text.chars().skip(offset).step_by(step.max(1)).collect()
}

fn natural_index_of(stream: &str, estimator: &CoincidenceEstimator<'_>) -> Result<Option<f64>> {
    let length = stream.chars().count();
    if length < 2 {
        debug!(length, "stream too short for a coincidence index, skipping");
        return Ok(None);
    }

    let (index, natural) = estimator.measure(stream)?;
    debug!(length, index, "calculating coincidence index");

    Ok(natural.then_some(index))
}

//! # Polyalphabetic Analysis Library
//!
//! Recovers the plaintext of a Vigenère-family cipher without the key, using only
//! the ciphertext and the expected letter frequencies of the plaintext language.
//!
//! ## Pipeline
//!
//! 1. **Key length**: the index of coincidence of interleaved streams is compared
//!    against the language's natural index; the smallest matching length wins.
//! 2. **Columns**: the ciphertext is laid out in rows of the key length and every
//!    column's most frequent letter is found.
//! 3. **Rank assignment**: a [`RankSource`] guesses which plaintext letter each
//!    column's most frequent letter stands for.
//! 4. **Decoding**: each column is rotated back in frequency-rank space and the
//!    columns are interleaved into plaintext.
//!
//! ## Usage
//!
//! ```rust
//! use polyalpha_analysis::{AnalysisConfig, Cryptanalysis, FixedAssignment, Language};
//!
//! let language = Language::portuguese();
//! let mut analysis = Cryptanalysis::new(&language, AnalysisConfig::default(), "OSOS");
//! analysis.assume_key_length(2)?;
//!
//! let recovery = analysis.run(&mut FixedAssignment::parse("AE"))?;
//! assert_eq!(recovery.plaintext, "AEAE");
//! # Ok::<(), polyalpha_analysis::AnalysisError>(())
//! ```

pub mod coincidence;
pub mod columns;
pub mod config;
pub mod error;
pub mod hypothesis;
pub mod key_length;
pub mod language;
pub mod pipeline;
pub mod reconstruct;
pub mod shift;

pub use coincidence::{coincidence_index, CoincidenceEstimator};
pub use columns::{most_frequent_letter, CipherMatrix};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use hypothesis::{enumerate_hypotheses, FixedAssignment, PromptSource, RankSource};
pub use key_length::find_key_length;
pub use language::{Alphabet, FrequencyTable, Language};
pub use pipeline::{Cryptanalysis, Recovery, Stage};
pub use reconstruct::interleave;
pub use shift::{apply_shift, decode_column, encipher, shift};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

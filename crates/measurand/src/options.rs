//! Grammar configuration shared by every spec parser.

use crate::errors::SpecError;

/// Widest word the engine can address.
pub const MAX_WORD_SIZE: u32 = 64;

/// How spec text is interpreted. These options never affect decode arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecOptions {
    word_size: u32,
    one_based: bool,
}

impl SpecOptions {
    /// Creates options for words of `word_size` bits. Fails unless `1 <= word_size <= 64`.
    pub fn new(word_size: u32, one_based: bool) -> Result<Self, SpecError> {
        if word_size == 0 || word_size > MAX_WORD_SIZE {
            return Err(SpecError::invalid(
                &word_size.to_string(),
                format!("word size must be between 1 and {MAX_WORD_SIZE} bits"),
            ));
        }

        Ok(Self {
            word_size,
            one_based,
        })
    }

    /// Bits per word.
    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    /// Whether word and bit numbers in spec text start at 1.
    pub fn one_based(&self) -> bool {
        self.one_based
    }

    /// Maps a user-facing word or bit number to its 0-based index.
    pub(crate) fn to_index(&self, spec: &str, n: usize) -> Result<usize, SpecError> {
        if !self.one_based {
            return Ok(n);
        }

        n.checked_sub(1)
            .ok_or_else(|| SpecError::invalid(spec, "numbering is one-based but 0 was given"))
    }
}

impl Default for SpecOptions {
    fn default() -> Self {
        Self {
            word_size: 8,
            one_based: true,
        }
    }
}

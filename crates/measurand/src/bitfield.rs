//! A [`BitField`] selects a contiguous run of bits from one word of every row.

use crate::{
    batch::WordSource,
    bits::{low_mask, mask_and_shift, reverse_bits_n},
    errors::{BuildError, SpecError},
    options::{MAX_WORD_SIZE, SpecOptions},
    spec,
};

/// One contiguous bit selection within one word.
///
/// Built only through [`BitField::new`] or [`BitField::from_spec`], which
/// validate the selection against the word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    word: usize,
    mask: Option<u64>,
    shift: u32,
    reverse: bool,
    word_size: u32,
    size: u32,
}

impl BitField {
    /// Selects bits `lo..=hi` (0-based, either order) of word `word`, or the whole
    /// word when `bits` is `None`.
    pub fn new(
        word: usize,
        bits: Option<(u32, u32)>,
        reverse: bool,
        word_size: u32,
    ) -> Result<Self, SpecError> {
        if word_size == 0 || word_size > MAX_WORD_SIZE {
            return Err(SpecError::invalid(
                &word_size.to_string(),
                format!("word size must be between 1 and {MAX_WORD_SIZE} bits"),
            ));
        }

        let (mask, shift, size) = match bits {
            Some((a, b)) => {
                if a.max(b) >= word_size {
                    return Err(SpecError::invalid(
                        &format!("{}:{}-{}", word, a, b),
                        format!("bit range exceeds a {word_size}-bit word"),
                    ));
                }
                let (mask, shift) = mask_and_shift(a, b);
                (Some(mask), shift, mask.count_ones())
            }
            None => (None, 0, word_size),
        };

        Ok(Self {
            word,
            mask,
            shift,
            reverse,
            word_size,
            size,
        })
    }

    /// Parses a bit-field spec such as `3:1-4R`.
    pub fn from_spec(spec: &str, options: &SpecOptions) -> Result<Self, SpecError> {
        let parts = spec::parse_bitfield(spec, options)?;
        Self::new(parts.word, parts.bits, parts.reverse, options.word_size())
    }

    /// 0-based word index.
    pub fn word(&self) -> usize {
        self.word
    }

    pub fn mask(&self) -> Option<u64> {
        self.mask
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    /// Number of bits this field contributes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Extracts this field from a single word value.
    #[inline]
    pub fn extract_word(&self, word: u64) -> u64 {
        let mask = self.mask.unwrap_or_else(|| low_mask(self.word_size));
        let value = (word & mask) >> self.shift;

        if self.reverse {
            reverse_bits_n(value, self.size)
        } else {
            value
        }
    }

    /// Extracts this field from every row of `source`.
    pub fn extract(&self, source: &dyn WordSource) -> Result<Vec<u64>, BuildError> {
        let column = source.word_column(self.word)?;
        Ok(column.iter().map(|&w| self.extract_word(w)).collect())
    }
}

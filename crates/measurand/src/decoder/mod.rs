//! Numeric reinterpretation of composed records.
//!
//! A [`Decoder`] turns the raw unsigned value of a [`crate::record::Record`]
//! into a number under one binary encoding. Decoders are stateless and are
//! looked up by key from a fixed table:
//!
//! | Key | Decoder | Bits |
//! |---|---|---|
//! | `u` | [`Decoder::Unsigned`] | any |
//! | `1c` | [`Decoder::OnesComplement`] | any |
//! | `2c` | [`Decoder::TwosComplement`] | any |
//! | `ieee16` / `ieee32` / `ieee64` | IEEE 754 binary16/32/64 | 16 / 32 / 64 |
//! | `1750a32` / `1750a48` | MIL-STD-1750A | 32 / 48 |
//! | `ti32` / `ti40` | TI TMS320 | 32 / 40 |
//! | `ibm32` / `ibm64` | IBM hexadecimal | 32 / 64 |
//! | `dec32` / `dec64` / `dec64g` | DEC VAX F / D / G | 32 / 64 / 64 |

pub mod float;

use std::fmt;

use crate::{
    bits::{REGISTER_BITS, low_mask, sign_bit, sign_extend},
    column::Column,
    errors::{BuildError, SpecError},
};

/// A binary number encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoder {
    Unsigned,
    OnesComplement,
    TwosComplement,
    Ieee16,
    Ieee32,
    Ieee64,
    MilStd1750A32,
    MilStd1750A48,
    Ti32,
    Ti40,
    Ibm32,
    Ibm64,
    Dec32,
    Dec64,
    Dec64G,
}

/// Key → decoder table. Keys are lowercase; lookups are case-insensitive.
const REGISTRY: &[(&str, Decoder)] = &[
    ("u", Decoder::Unsigned),
    ("1c", Decoder::OnesComplement),
    ("2c", Decoder::TwosComplement),
    ("ieee16", Decoder::Ieee16),
    ("ieee32", Decoder::Ieee32),
    ("ieee64", Decoder::Ieee64),
    ("1750a32", Decoder::MilStd1750A32),
    ("1750a48", Decoder::MilStd1750A48),
    ("ti32", Decoder::Ti32),
    ("ti40", Decoder::Ti40),
    ("ibm32", Decoder::Ibm32),
    ("ibm64", Decoder::Ibm64),
    ("dec32", Decoder::Dec32),
    ("dec64", Decoder::Dec64),
    ("dec64g", Decoder::Dec64G),
];

impl Decoder {
    /// Every registered decoder, in table order.
    pub fn all() -> impl Iterator<Item = Decoder> {
        REGISTRY.iter().map(|&(_, decoder)| decoder)
    }

    /// Looks up a decoder by key, ignoring case and surrounding whitespace.
    pub fn from_key(key: &str) -> Result<Self, SpecError> {
        let wanted = key.trim();
        REGISTRY
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
            .map(|&(_, decoder)| decoder)
            .ok_or_else(|| SpecError::UnknownDecoderKey(key.to_string()))
    }

    /// The registry key of this decoder.
    pub fn key(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(_, decoder)| decoder == self)
            .map_or("", |&(key, _)| key)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Decoder::Unsigned => "Unsigned",
            Decoder::OnesComplement => "OnesComplement",
            Decoder::TwosComplement => "TwosComplement",
            Decoder::Ieee16 => "IEEE16",
            Decoder::Ieee32 => "IEEE32",
            Decoder::Ieee64 => "IEEE64",
            Decoder::MilStd1750A32 => "MilStd1750A32",
            Decoder::MilStd1750A48 => "MilStd1750A48",
            Decoder::Ti32 => "TI32",
            Decoder::Ti40 => "TI40",
            Decoder::Ibm32 => "IBM32",
            Decoder::Ibm64 => "IBM64",
            Decoder::Dec32 => "DEC32",
            Decoder::Dec64 => "DEC64",
            Decoder::Dec64G => "DEC64G",
        }
    }

    /// Field width this decoder requires, or `None` if it accepts any width.
    pub fn nominal_bits(&self) -> Option<u32> {
        match self {
            Decoder::Unsigned | Decoder::OnesComplement | Decoder::TwosComplement => None,
            Decoder::Ieee16 => Some(16),
            Decoder::Ieee32
            | Decoder::MilStd1750A32
            | Decoder::Ti32
            | Decoder::Ibm32
            | Decoder::Dec32 => Some(32),
            Decoder::Ti40 => Some(40),
            Decoder::MilStd1750A48 => Some(48),
            Decoder::Ieee64 | Decoder::Ibm64 | Decoder::Dec64 | Decoder::Dec64G => Some(64),
        }
    }

    /// Checks that a `bits`-wide field can be decoded. Widths outside `1..=64`
    /// are rejected by every decoder.
    pub fn check_width(&self, bits: u32) -> Result<(), BuildError> {
        let expected = match self.nominal_bits() {
            Some(expected) => expected,
            None if (1..=REGISTER_BITS).contains(&bits) => return Ok(()),
            None => REGISTER_BITS,
        };

        if bits != expected {
            return Err(BuildError::InvalidFieldWidth {
                decoder: self.name(),
                expected,
                received: bits,
            });
        }
        Ok(())
    }

    /// Decodes one `bits`-wide raw value. The width is not checked; integer
    /// decoders clamp it to `0..=64`.
    pub fn decode_value(&self, raw: u64, bits: u32) -> f64 {
        match self {
            Decoder::Unsigned => raw as f64,
            Decoder::OnesComplement => {
                if sign_bit(raw, bits) {
                    -((raw ^ low_mask(bits)) as f64)
                } else {
                    raw as f64
                }
            }
            Decoder::TwosComplement => sign_extend(raw, bits) as f64,
            Decoder::Ieee16 => float::ieee16(raw),
            Decoder::Ieee32 => float::ieee32(raw),
            Decoder::Ieee64 => float::ieee64(raw),
            Decoder::MilStd1750A32 => float::milstd1750a32(raw),
            Decoder::MilStd1750A48 => float::milstd1750a48(raw),
            Decoder::Ti32 => float::ti32(raw),
            Decoder::Ti40 => float::ti40(raw),
            Decoder::Ibm32 => float::ibm32(raw),
            Decoder::Ibm64 => float::ibm64(raw),
            Decoder::Dec32 => float::dec32(raw),
            Decoder::Dec64 => float::dec64(raw),
            Decoder::Dec64G => float::dec64g(raw),
        }
    }

    /// Decodes a column of `bits`-wide raw values.
    ///
    /// [`Decoder::Unsigned`] returns the column unchanged; every other decoder
    /// produces an `F64` column. Fixed-width decoders fail with
    /// [`BuildError::InvalidFieldWidth`] before touching any value.
    pub fn decode(&self, raw: Column, bits: u32) -> Result<Column, BuildError> {
        self.check_width(bits)?;

        if raw.is_float() {
            return Err(BuildError::TypeMismatch(format!(
                "{} decodes unsigned records, found f64",
                self.name()
            )));
        }

        if *self == Decoder::Unsigned {
            return Ok(raw);
        }

        let values = raw
            .to_u64()?
            .into_iter()
            .map(|value| self.decode_value(value, bits))
            .collect();

        Ok(Column::F64(values))
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Decoder {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decoder::from_key(s)
    }
}

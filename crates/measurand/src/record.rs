//! A [`Record`] composes one or more [`BitField`]s into a single unsigned value.

use crate::{
    batch::WordSource,
    bitfield::BitField,
    column::{Column, Width},
    errors::{BuildError, SpecError},
    options::SpecOptions,
    spec,
};

/// Ordered bit-fields forming one raw unsigned integer.
///
/// The first field supplies the most significant bits and the last field the
/// least significant bits, so `1+2` over words `[0x01, 0x02]` yields `0x0102`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<BitField>,
    size: u32,
    width: Width,
}

impl Record {
    /// Composes `fields` in declared order. Fails when there are none or when the
    /// total size exceeds 64 bits.
    pub fn new(fields: Vec<BitField>) -> Result<Self, SpecError> {
        if fields.is_empty() {
            return Err(SpecError::invalid("", "a record needs at least one bit-field"));
        }

        let size = fields.iter().map(BitField::size).sum();
        let width = Width::for_bits(size)?;

        Ok(Self {
            fields,
            size,
            width,
        })
    }

    /// Parses a record spec such as `1-4` or `1:1-4+2:5-8R`.
    pub fn from_spec(spec: &str, options: &SpecOptions) -> Result<Self, SpecError> {
        let fields = spec::split_record(spec)?
            .iter()
            .map(|field| BitField::from_spec(field, options))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(fields)
    }

    pub fn fields(&self) -> &[BitField] {
        &self.fields
    }

    /// Total bits across all fields.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Smallest native container holding [`Record::size`] bits.
    pub fn width(&self) -> Width {
        self.width
    }

    /// Composes the record for every row of `source`.
    pub fn compose(&self, source: &dyn WordSource) -> Result<Vec<u64>, BuildError> {
        let mut composed = vec![0u64; source.rows()];
        let mut offset = 0;

        for field in self.fields.iter().rev() {
            let part = field.extract(source)?;
            for (acc, value) in composed.iter_mut().zip(part) {
                *acc += value << offset;
            }
            offset += field.size();
        }

        Ok(composed)
    }

    /// Composes the record into a column of [`Record::width`].
    pub fn build(&self, source: &dyn WordSource) -> Result<Column, BuildError> {
        Ok(Column::from_u64(self.compose(source)?, self.width))
    }
}

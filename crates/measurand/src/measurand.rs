//! [`Measurand`]: a record, an optional decoder and an optional converter,
//! built together over a batch.

use std::any::Any;

use tracing::{debug, trace};

use crate::{
    batch::Batch,
    column::Column,
    decoder::Decoder,
    errors::{BuildError, SpecError},
    euc::Converter,
    options::SpecOptions,
    record::Record,
    spec,
};

/// A fully configured decoding pipeline for one engineering value.
///
/// ```
/// use measurand::{Column, DenseBatch, Measurand, SpecOptions};
///
/// let m = Measurand::from_spec("1+2;2c;EUC[0.5]", &SpecOptions::default()).unwrap();
/// let batch = DenseBatch::from_rows(&[vec![0xFF, 0xFE]]).unwrap();
/// assert_eq!(m.build(&batch).unwrap(), Column::F64(vec![-1.0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Measurand {
    record: Record,
    decoder: Option<Decoder>,
    converter: Option<Converter>,
}

impl Measurand {
    pub fn new(record: Record, decoder: Option<Decoder>, converter: Option<Converter>) -> Self {
        Self {
            record,
            decoder,
            converter,
        }
    }

    /// Parses `<record>[;<decoder>[;<euc>]]`.
    pub fn from_spec(spec: &str, options: &SpecOptions) -> Result<Self, SpecError> {
        let parts = spec::split_measurand(spec)?;

        let record = Record::from_spec(parts.record, options)?;
        let decoder = parts.decoder.map(Decoder::from_key).transpose()?;
        let converter = parts.euc.map(Converter::from_spec).transpose()?;

        debug!(
            spec,
            size = record.size(),
            fields = record.fields().len(),
            decoder = decoder.map(|d| d.key()),
            "parsed measurand"
        );

        Ok(Self::new(record, decoder, converter))
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn decoder(&self) -> Option<Decoder> {
        self.decoder
    }

    pub fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }

    /// Bits in the composed record.
    pub fn size(&self) -> u32 {
        self.record.size()
    }

    /// Builds one output value per row of `batch`.
    ///
    /// The record is composed first, then decoded, then converted; a missing
    /// decoder or converter passes values through.
    pub fn build<'a>(&self, batch: impl Into<Batch<'a>>) -> Result<Column, BuildError> {
        let batch = batch.into();
        let source = batch.source();
        trace!(rows = source.rows(), size = self.size(), "building measurand");

        let mut column = self.record.build(source)?;

        if let Some(decoder) = &self.decoder {
            column = decoder.decode(column, self.record.size())?;
        }

        if let Some(converter) = &self.converter {
            column = converter.apply(column);
        }

        Ok(column)
    }

    /// Builds from a type-erased batch. Fails with [`BuildError::TypeMismatch`]
    /// unless `batch` is a [`crate::DenseBatch`] or [`crate::ColumnarBatch`].
    pub fn build_any(&self, batch: &dyn Any) -> Result<Column, BuildError> {
        self.build(Batch::from_any(batch)?)
    }
}

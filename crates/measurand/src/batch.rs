//! Batch containers the pipeline reads telemetry words from.
//!
//! Two interchangeable backends are supported:
//!
//! - [`DenseBatch`]: a rectangular row-major matrix of words, one row per
//!   telemetry record and one column per word index.
//! - [`ColumnarBatch`]: a table holding one typed [`Column`] per word index.
//!
//! Record and measurand logic only ever sees the narrow [`WordSource`]
//! capability, so both backends produce bit-identical results. [`Batch`] is the
//! single place that distinguishes them.

use std::{any::Any, borrow::Cow};

use crate::{
    column::{Column, Width},
    errors::BuildError,
};

/// Read access to word columns of a batch.
pub trait WordSource {
    /// Number of telemetry rows.
    fn rows(&self) -> usize;

    /// Number of addressable words per row.
    fn words(&self) -> usize;

    /// Every row's value of word `word` (0-based), widened to `u64`.
    fn word_column(&self, word: usize) -> Result<Cow<'_, [u64]>, BuildError>;
}

fn out_of_range(word: usize, words: usize) -> BuildError {
    BuildError::WordOutOfRange { word, words }
}

/// Row-major matrix of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseBatch {
    words: usize,
    data: Vec<u64>,
}

impl DenseBatch {
    /// Wraps row-major `data` with `words` words per row.
    pub fn new(words: usize, data: Vec<u64>) -> Result<Self, BuildError> {
        if words == 0 && !data.is_empty() {
            return Err(BuildError::Shape("a batch with data needs at least one word".to_string()));
        }

        if words != 0 && data.len() % words != 0 {
            return Err(BuildError::Shape(format!(
                "{} values do not divide into rows of {} words",
                data.len(),
                words
            )));
        }

        Ok(Self { words, data })
    }

    /// Builds a batch from equally long rows.
    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self, BuildError> {
        let words = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(words * rows.len());

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != words {
                return Err(BuildError::Shape(format!(
                    "row {} has {} words, expected {}",
                    i,
                    row.len(),
                    words
                )));
            }
            data.extend_from_slice(row);
        }

        Self::new(words, data)
    }

    pub fn get(&self, row: usize, word: usize) -> Option<u64> {
        if word >= self.words {
            return None;
        }
        self.data.get(row * self.words + word).copied()
    }

    /// Row `row` as a slice of words.
    pub fn row(&self, row: usize) -> Option<&[u64]> {
        let start = row.checked_mul(self.words)?;
        self.data.get(start..start + self.words)
    }
}

impl WordSource for DenseBatch {
    fn rows(&self) -> usize {
        if self.words == 0 {
            0
        } else {
            self.data.len() / self.words
        }
    }

    fn words(&self) -> usize {
        self.words
    }

    fn word_column(&self, word: usize) -> Result<Cow<'_, [u64]>, BuildError> {
        if word >= self.words {
            return Err(out_of_range(word, self.words));
        }

        let column = self
            .data
            .iter()
            .skip(word)
            .step_by(self.words)
            .copied()
            .collect::<Vec<_>>();

        Ok(Cow::Owned(column))
    }
}

/// Table with one typed column per word.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnarBatch {
    rows: usize,
    columns: Vec<Column>,
}

impl ColumnarBatch {
    /// Wraps `columns`, one per word index. All columns must be the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self, BuildError> {
        let rows = columns.first().map_or(0, Column::len);

        if let Some((i, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(BuildError::Shape(format!(
                "column {} has {} rows, expected {}",
                i,
                column.len(),
                rows
            )));
        }

        Ok(Self { rows, columns })
    }

    pub fn column(&self, word: usize) -> Option<&Column> {
        self.columns.get(word)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl WordSource for ColumnarBatch {
    fn rows(&self) -> usize {
        self.rows
    }

    fn words(&self) -> usize {
        self.columns.len()
    }

    fn word_column(&self, word: usize) -> Result<Cow<'_, [u64]>, BuildError> {
        let column = self
            .columns
            .get(word)
            .ok_or_else(|| out_of_range(word, self.columns.len()))?;

        match column {
            Column::U64(values) => Ok(Cow::Borrowed(values.as_slice())),
            Column::F64(_) => Err(BuildError::TypeMismatch(format!(
                "word column {word} holds f64 values, not unsigned words"
            ))),
            other => Ok(Cow::Owned(other.to_u64()?)),
        }
    }
}

impl From<&DenseBatch> for ColumnarBatch {
    /// Splits a dense batch into columns, each in the narrowest unsigned container
    /// that holds every value of that word.
    fn from(dense: &DenseBatch) -> Self {
        let columns = (0..dense.words)
            .map(|word| {
                let values = dense
                    .data
                    .iter()
                    .skip(word)
                    .step_by(dense.words)
                    .copied()
                    .collect::<Vec<_>>();
                let max_bits = values
                    .iter()
                    .map(|v| u64::BITS - v.leading_zeros())
                    .max()
                    .unwrap_or(0);
                // at most 64 significant bits, so a width always exists
                let width = Width::for_bits(max_bits).unwrap_or(Width::W64);
                Column::from_u64(values, width)
            })
            .collect();

        Self {
            rows: dense.rows(),
            columns,
        }
    }
}

impl TryFrom<&ColumnarBatch> for DenseBatch {
    type Error = BuildError;

    fn try_from(table: &ColumnarBatch) -> Result<Self, Self::Error> {
        let words = table.columns.len();
        let columns = (0..words)
            .map(|word| table.word_column(word))
            .collect::<Result<Vec<_>, _>>()?;

        let mut data = Vec::with_capacity(words * table.rows);
        for row in 0..table.rows {
            data.extend(columns.iter().map(|column| column[row]));
        }

        DenseBatch::new(words, data)
    }
}

/// A borrowed batch of either supported backend.
#[derive(Debug, Clone, Copy)]
pub enum Batch<'a> {
    Dense(&'a DenseBatch),
    Columnar(&'a ColumnarBatch),
}

impl<'a> Batch<'a> {
    /// Recognises a type-erased container. Anything other than a [`DenseBatch`] or
    /// [`ColumnarBatch`] fails with [`BuildError::TypeMismatch`].
    pub fn from_any(value: &'a dyn Any) -> Result<Self, BuildError> {
        if let Some(dense) = value.downcast_ref::<DenseBatch>() {
            Ok(Batch::Dense(dense))
        } else if let Some(table) = value.downcast_ref::<ColumnarBatch>() {
            Ok(Batch::Columnar(table))
        } else {
            Err(BuildError::TypeMismatch(
                "batch must be a DenseBatch or a ColumnarBatch".to_string(),
            ))
        }
    }

    /// The capability view used by the pipeline.
    pub fn source(&self) -> &'a dyn WordSource {
        match *self {
            Batch::Dense(dense) => dense,
            Batch::Columnar(table) => table,
        }
    }
}

impl<'a> From<&'a DenseBatch> for Batch<'a> {
    fn from(value: &'a DenseBatch) -> Self {
        Batch::Dense(value)
    }
}

impl<'a> From<&'a ColumnarBatch> for Batch<'a> {
    fn from(value: &'a ColumnarBatch) -> Self {
        Batch::Columnar(value)
    }
}

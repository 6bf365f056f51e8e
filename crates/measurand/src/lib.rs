//! # measurand
//!
//! Decodes engineering values out of batches of fixed-width telemetry words,
//! driven by compact text specs.
//!
//! A measurand spec has up to three `;`-separated segments:
//!
//! - a **record**: bit-fields joined by `+`, most significant first
//!   (`1-4`, `3:1-4+4:5-8R`);
//! - an optional **decoder** key (`u`, `1c`, `2c`, `ieee32`, `1750a48`, ...);
//! - an optional **EUC** conversion (`EUC[<data_bias>,<scale>,<scaled_bias>]`).
//!
//! Batches come as a row-major [DenseBatch] or a [ColumnarBatch]; both
//! produce identical results.
//!
//! ## Example
//!
//! ```
//! use measurand::{Catalog, Column, DenseBatch, SpecOptions};
//!
//! let catalog = Catalog::compile(
//!     &[("counter", "1+2"), ("altitude", "3-6;ieee32;EUC[0,0.5]")],
//!     &SpecOptions::default(),
//! )
//! .unwrap();
//!
//! let batch = DenseBatch::from_rows(&[vec![0x01, 0x02, 0x41, 0x20, 0x00, 0x00]]).unwrap();
//! let columns = catalog.build(&batch).unwrap();
//!
//! assert_eq!(columns["counter"], Column::U16(vec![0x0102]));
//! assert_eq!(columns["altitude"], Column::F64(vec![5.0]));
//! ```

pub mod batch;
pub mod bitfield;
pub mod bits;
pub mod catalog;
pub mod column;
pub mod decoder;
pub mod errors;
pub mod euc;
pub mod expr;
pub mod measurand;
pub mod options;
pub mod record;
pub mod spec;

#[cfg(feature = "serde")]
pub mod serde;

pub use batch::{Batch, ColumnarBatch, DenseBatch, WordSource};
pub use bitfield::BitField;
pub use catalog::Catalog;
pub use column::{Column, Width};
pub use decoder::Decoder;
pub use errors::{BuildError, SpecError};
pub use euc::Converter;
pub use measurand::Measurand;
pub use options::SpecOptions;
pub use record::Record;

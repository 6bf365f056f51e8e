//! End-to-end builds over both batch backends.
//!
//! The fixture batch holds 256 words per row, word `i` (one-based) carrying
//! `i mod 2^word_size`, so every spec has a known expected value.

use measurand::{
    BuildError, Catalog, Column, ColumnarBatch, Decoder, DenseBatch, Measurand, SpecError,
    SpecOptions,
};

const ROWS: usize = 4;

fn fixture(word_size: u32) -> DenseBatch {
    let mask = if word_size == 64 { u64::MAX } else { (1 << word_size) - 1 };
    let row = (1..=256u64).map(|w| w & mask).collect::<Vec<_>>();
    DenseBatch::from_rows(&vec![row; ROWS]).unwrap()
}

/// Builds `spec` over both backends, checks they agree, and returns the column.
fn build(spec: &str, word_size: u32) -> Column {
    let options = SpecOptions::new(word_size, true).unwrap();
    let measurand = Measurand::from_spec(spec, &options).unwrap();
    let dense = fixture(word_size);
    let table = ColumnarBatch::from(&dense);

    let from_dense = measurand.build(&dense).unwrap();
    let from_table = measurand.build(&table).unwrap();
    assert_eq!(from_dense, from_table, "{spec}: backends disagree");
    from_dense
}

fn build_words(spec: &str, word_size: u32, words: &[u64]) -> Column {
    let options = SpecOptions::new(word_size, true).unwrap();
    let dense = DenseBatch::from_rows(&[words]).unwrap();
    let table = ColumnarBatch::from(&dense);
    let measurand = Measurand::from_spec(spec, &options).unwrap();

    let from_dense = measurand.build(&dense).unwrap();
    assert_eq!(from_dense, measurand.build(&table).unwrap(), "{spec}: backends disagree");
    from_dense
}

#[test]
fn test_single_fields() {
    assert_eq!(build("128", 8), Column::U8(vec![128; ROWS]));
    assert_eq!(build("1R", 8), Column::U8(vec![128; ROWS]));
    assert_eq!(build("170:1-4R", 8), Column::U8(vec![0x5; ROWS]));
    assert_eq!(build("170:8", 8), Column::U8(vec![1; ROWS]));
    assert_eq!(build("[170:4-1]", 8), Column::U8(vec![0xA; ROWS]));
}

#[test]
fn test_records() {
    assert_eq!(build("1-4", 8), Column::U32(vec![0x01020304; ROWS]));
    assert_eq!(build("4-1", 8), Column::U32(vec![0x04030201; ROWS]));
    // the text after a leading range repeats for every word
    assert_eq!(build("1-2+7", 8), Column::U32(vec![0x01070207; ROWS]));
    assert_eq!(build("1-3", 12), Column::U64(vec![0x001002003; ROWS]));
    assert_eq!(build("1-4", 16), Column::U64(vec![0x0001_0002_0003_0004; ROWS]));
    assert_eq!(build("255:1-4+255:5-8", 8), Column::U8(vec![0xFF; ROWS]));
}

#[test]
fn test_zero_based() {
    let options = SpecOptions::new(8, false).unwrap();
    let measurand = Measurand::from_spec("0-1", &options).unwrap();
    assert_eq!(
        measurand.build(&fixture(8)).unwrap(),
        Column::U16(vec![0x0102; ROWS])
    );
}

#[test]
fn test_integer_decoders() {
    assert_eq!(build("128;1c", 8), Column::F64(vec![-127.0; ROWS]));
    assert_eq!(build("255;1c", 8), Column::F64(vec![0.0; ROWS]));
    assert_eq!(build("128;2c", 8), Column::F64(vec![-128.0; ROWS]));
    assert_eq!(build("255;2c", 8), Column::F64(vec![-1.0; ROWS]));
    assert_eq!(build("255+255;2c", 8), Column::F64(vec![-1.0; ROWS]));
    assert_eq!(build("1;u", 8), Column::U8(vec![1; ROWS]));
}

#[test]
fn test_float_decoders() {
    assert_eq!(
        build_words("1-4;ieee32", 8, &[0x3F, 0x80, 0x00, 0x00]),
        Column::F64(vec![1.0])
    );
    assert_eq!(
        build_words("1+2;ieee16", 8, &[0xC0, 0x00]),
        Column::F64(vec![-2.0])
    );
    assert_eq!(
        build_words("1-2;1750a32", 16, &[0x4000, 0x0001]),
        Column::F64(vec![1.0])
    );
    assert_eq!(
        build_words("1-3;1750a48", 16, &[0x8000, 0x00FF, 0x0000]),
        Column::F64(vec![-0.5])
    );
    assert_eq!(
        build_words("1-4;ibm32", 8, &[0xC2, 0x76, 0xA0, 0x00]),
        Column::F64(vec![-118.625])
    );
    assert_eq!(
        build_words("1-5;ti40", 8, &[0x00, 0x40, 0x00, 0x00, 0x00]),
        Column::F64(vec![1.5])
    );
    assert_eq!(
        build_words("1-2;dec32", 16, &[0x4080, 0x0000]),
        Column::F64(vec![1.0])
    );
}

#[test]
fn test_conversion() {
    // (v + data_bias) * scale_factor + scaled_bias
    assert_eq!(build("10;u;EUC[2]", 8), Column::F64(vec![20.0; ROWS]));
    assert_eq!(build("10;2c;EUC[1,2,3]", 8), Column::F64(vec![25.0; ROWS]));
    assert_eq!(build("255;2c;EUC[-1,2^3]", 8), Column::F64(vec![-16.0; ROWS]));
    assert_eq!(build("10;;[-32,5/9]", 8), Column::F64(vec![(10.0 - 32.0) * (5.0 / 9.0); ROWS]));
}

#[test]
fn test_width_mismatch() {
    let measurand = Measurand::from_spec("1+2;ieee32", &SpecOptions::default()).unwrap();
    let err = measurand.build(&fixture(8)).unwrap_err();
    assert_eq!(
        err,
        BuildError::InvalidFieldWidth {
            decoder: "IEEE32",
            expected: 32,
            received: 16
        }
    );
    assert_eq!(err.to_string(), "IEEE32 expects a field of 32 bits but was given 16");
}

#[test]
fn test_word_out_of_range() {
    let measurand = Measurand::from_spec("257", &SpecOptions::default()).unwrap();
    assert_eq!(
        measurand.build(&fixture(8)).unwrap_err(),
        BuildError::WordOutOfRange {
            word: 256,
            words: 256
        }
    );
}

#[test]
fn test_float_word_column() {
    let table = ColumnarBatch::new(vec![Column::F64(vec![1.0]), Column::U8(vec![2])]).unwrap();
    let measurand = Measurand::from_spec("2", &SpecOptions::default()).unwrap();
    assert_eq!(measurand.build(&table).unwrap(), Column::U8(vec![2]));

    let measurand = Measurand::from_spec("1+2", &SpecOptions::default()).unwrap();
    assert!(matches!(
        measurand.build(&table).unwrap_err(),
        BuildError::TypeMismatch(_)
    ));
}

#[test]
fn test_unknown_container() {
    let measurand = Measurand::from_spec("1", &SpecOptions::default()).unwrap();
    let rows = vec![vec![1u64, 2, 3]];
    assert!(matches!(
        measurand.build_any(&rows).unwrap_err(),
        BuildError::TypeMismatch(_)
    ));
    assert_eq!(
        measurand.build_any(&fixture(8)).unwrap(),
        Column::U8(vec![1; ROWS])
    );
}

#[test]
fn test_decoder_equality() {
    assert_eq!(Decoder::from_key("ieee32").unwrap(), Decoder::from_key("IEEE32").unwrap());
    assert_ne!(Decoder::from_key("ieee32").unwrap(), Decoder::from_key("ieee64").unwrap());
    assert_eq!(
        Decoder::from_key("float80").unwrap_err(),
        SpecError::UnknownDecoderKey("float80".to_string())
    );
}

#[test]
fn test_empty_batch() {
    let dense = DenseBatch::new(4, vec![]).unwrap();
    let measurand = Measurand::from_spec("1-4;ieee32;EUC[2]", &SpecOptions::default()).unwrap();
    assert_eq!(measurand.build(&dense).unwrap(), Column::F64(vec![]));
}

#[test]
fn test_catalog_over_fixture() {
    let catalog = Catalog::compile(
        &[
            ("counter", "1-2"),
            ("status", "170:1-4R"),
            ("temperature", "128;2c;EUC[0,0.5,20]"),
        ],
        &SpecOptions::default(),
    )
    .unwrap();

    let dense = fixture(8);
    let columns = catalog.build(&dense).unwrap();
    assert_eq!(columns, catalog.build(&ColumnarBatch::from(&dense)).unwrap());

    assert_eq!(columns["counter"], Column::U16(vec![0x0102; ROWS]));
    assert_eq!(columns["status"], Column::U8(vec![0x5; ROWS]));
    assert_eq!(columns["temperature"], Column::F64(vec![-44.0; ROWS]));
}

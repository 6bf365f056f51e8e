//! Parsers for the textual mini-languages that describe measurands.
//!
//! | Construct | Grammar |
//! |---|---|
//! | Bit-field | `[<word>][:<bit-or-range>][R]`, optionally bracketed |
//! | Range shorthand | `<a>-<b><rest>` expands to `a<rest>+...+b<rest>` |
//! | Record | bit-fields joined by `+` |
//! | Measurand | `<record>[;<decoder>[;<euc>]]` |
//!
//! Decoder keys are resolved by [crate::decoder::Decoder::from_key] and EUC
//! text by [crate::euc::Converter::from_spec].

use std::sync::LazyLock;

use regex::Regex;

use crate::{bits::REGISTER_BITS, errors::SpecError, options::SpecOptions};

static RE_BITFIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<word>\d+)(?::(?P<lo>\d+)(?:-(?P<hi>\d+))?)?(?P<reverse>R)?$")
        .expect("bit-field pattern is valid")
});

static RE_WORD_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<a>\d+)-(?P<b>\d+)(?P<rest>.*)$").expect("word range pattern is valid")
});

/// A bit-field spec reduced to 0-based numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitFieldParts {
    pub word: usize,
    /// Inclusive `(lo, hi)` bit range, `lo <= hi`. `None` selects the whole word.
    pub bits: Option<(u32, u32)>,
    pub reverse: bool,
}

/// The three `;`-separated segments of a measurand spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurandParts<'a> {
    pub record: &'a str,
    pub decoder: Option<&'a str>,
    pub euc: Option<&'a str>,
}

fn parse_number<T: std::str::FromStr>(spec: &str, text: &str) -> Result<T, SpecError> {
    text.parse()
        .map_err(|_| SpecError::invalid(spec, format!("{text:?} is out of range")))
}

/// Strips one pair of enclosing square brackets, if present.
pub(crate) fn strip_brackets(text: &str) -> &str {
    text.strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text)
}

/// Parses one bit-field spec such as `12`, `3:1-4`, `[2:8-5R]`.
pub fn parse_bitfield(spec: &str, options: &SpecOptions) -> Result<BitFieldParts, SpecError> {
    let text = strip_brackets(spec.trim());
    let caps = RE_BITFIELD
        .captures(text)
        .ok_or_else(|| SpecError::invalid(spec, "expected [<word>][:<bit-or-range>][R]"))?;

    let word = options.to_index(spec, parse_number(spec, &caps["word"])?)?;

    let bits = match caps.name("lo") {
        Some(lo) => {
            let a: u32 = parse_number(spec, lo.as_str())?;
            let b: u32 = match caps.name("hi") {
                Some(hi) => parse_number(spec, hi.as_str())?,
                None => a,
            };
            let (lo, hi) = if b < a { (b, a) } else { (a, b) };
            let lo = options.to_index(spec, lo as usize)? as u32;
            let hi = options.to_index(spec, hi as usize)? as u32;

            if hi >= options.word_size() {
                return Err(SpecError::invalid(
                    spec,
                    format!("bit {} is outside a {}-bit word", hi, options.word_size()),
                ));
            }
            Some((lo, hi))
        }
        None => None,
    };

    Ok(BitFieldParts {
        word,
        bits,
        reverse: caps.name("reverse").is_some(),
    })
}

/// Expands a word-range list such as `1-4` or `8-5` into its members, inclusive.
/// Ranges of more than [REGISTER_BITS] words can never fit a record and are
/// rejected before anything is allocated.
pub fn expand_list(spec: &str) -> Result<Vec<usize>, SpecError> {
    let parse = |text: &str| -> Result<usize, SpecError> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SpecError::invalid(spec, "range bounds must be integers"));
        }
        parse_number(spec, text)
    };

    match spec.split_once('-') {
        Some((a, b)) => {
            let (a, b) = (parse(a)?, parse(b)?);
            if a.abs_diff(b) >= REGISTER_BITS as usize {
                return Err(SpecError::invalid(
                    spec,
                    format!("a range of more than {REGISTER_BITS} words cannot fit a record"),
                ));
            }

            if a <= b {
                Ok((a..=b).collect())
            } else {
                Ok((b..=a).rev().collect())
            }
        }
        None => Ok(vec![parse(spec)?]),
    }
}

/// Expands a leading word range, repeating everything after it for each word:
/// `1-4:2-9` becomes `1:2-9+2:2-9+3:2-9+4:2-9` and `1-2+5` becomes `1+5+2+5`.
/// Text without a leading range is returned unchanged.
pub fn expand_word_range(spec: &str) -> Result<String, SpecError> {
    let Some(caps) = RE_WORD_RANGE.captures(spec) else {
        return Ok(spec.to_string());
    };

    let rest = &caps["rest"];
    let words = expand_list(&format!("{}-{}", &caps["a"], &caps["b"]))?;

    Ok(words
        .iter()
        .map(|word| format!("{word}{rest}"))
        .collect::<Vec<_>>()
        .join("+"))
}

/// Splits a record spec into bit-field specs after expanding a leading word range.
pub fn split_record(spec: &str) -> Result<Vec<String>, SpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(SpecError::invalid(spec, "a record needs at least one bit-field"));
    }

    expand_word_range(spec)?
        .split('+')
        .map(|term| {
            let term = term.trim();
            if term.is_empty() {
                Err(SpecError::invalid(spec, "empty bit-field between '+'"))
            } else {
                Ok(term.to_string())
            }
        })
        .collect()
}

/// Splits `<record>[;<decoder>[;<euc>]]`. Empty optional segments count as absent.
pub fn split_measurand(spec: &str) -> Result<MeasurandParts<'_>, SpecError> {
    let mut parts = spec.split(';').map(str::trim);
    let record = parts.next().unwrap_or_default();
    let decoder = parts.next().filter(|s| !s.is_empty());
    let euc = parts.next().filter(|s| !s.is_empty());

    if parts.next().is_some() {
        return Err(SpecError::invalid(
            spec,
            "expected at most three ';'-separated segments",
        ));
    }

    Ok(MeasurandParts {
        record,
        decoder,
        euc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_based() -> SpecOptions {
        SpecOptions::new(8, false).unwrap()
    }

    #[test]
    fn test_parse_whole_word() {
        let parts = parse_bitfield("12", &SpecOptions::default()).unwrap();
        assert_eq!(
            parts,
            BitFieldParts {
                word: 11,
                bits: None,
                reverse: false
            }
        );

        let parts = parse_bitfield("0", &zero_based()).unwrap();
        assert_eq!(parts.word, 0);
    }

    #[test]
    fn test_parse_single_bit() {
        let parts = parse_bitfield("3:8", &SpecOptions::default()).unwrap();
        assert_eq!(parts.word, 2);
        assert_eq!(parts.bits, Some((7, 7)));

        let parts = parse_bitfield("3:7", &zero_based()).unwrap();
        assert_eq!(parts.word, 3);
        assert_eq!(parts.bits, Some((7, 7)));
    }

    #[test]
    fn test_parse_range_either_order() {
        let a = parse_bitfield("1:1-4", &SpecOptions::default()).unwrap();
        let b = parse_bitfield("1:4-1", &SpecOptions::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bits, Some((0, 3)));
    }

    #[test]
    fn test_parse_reverse_and_brackets() {
        let parts = parse_bitfield("[2:5-8R]", &SpecOptions::default()).unwrap();
        assert_eq!(parts.word, 1);
        assert_eq!(parts.bits, Some((4, 7)));
        assert!(parts.reverse);

        assert!(parse_bitfield("2r", &SpecOptions::default()).unwrap().reverse);
    }

    #[test]
    fn test_parse_invalid() {
        for spec in ["1:not-valid", "1=2", "a", "", ":3", "1:2-", "R"] {
            assert!(
                matches!(
                    parse_bitfield(spec, &SpecOptions::default()),
                    Err(SpecError::InvalidSpec { .. })
                ),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_out_of_word() {
        assert!(parse_bitfield("1:9", &SpecOptions::default()).is_err());
        assert!(parse_bitfield("1:0", &SpecOptions::default()).is_err());
        assert!(parse_bitfield("0", &SpecOptions::default()).is_err());
        assert!(parse_bitfield("1:9-12", &SpecOptions::new(12, true).unwrap()).is_ok());
    }

    #[test]
    fn test_expand_list() {
        assert_eq!(expand_list("7").unwrap(), vec![7]);
        assert_eq!(expand_list("1-8").unwrap(), (1..=8).collect::<Vec<_>>());
        assert_eq!(expand_list("0-7").unwrap(), (0..=7).collect::<Vec<_>>());
        assert_eq!(expand_list("8-1").unwrap(), vec![8, 7, 6, 5, 4, 3, 2, 1]);
        assert!(expand_list("1.23").is_err());
        assert!(expand_list("1:1-n").is_err());
        assert_eq!(expand_list("1-64").unwrap().len(), 64);
    }

    #[test]
    fn test_expand_list_bounded() {
        for spec in ["1-65", "65-1", "1-4000000000", "0-18446744073709551615"] {
            assert!(
                matches!(expand_list(spec), Err(SpecError::InvalidSpec { .. })),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_expand_word_range() {
        assert_eq!(expand_word_range("1-4").unwrap(), "1+2+3+4");
        assert_eq!(expand_word_range("4-1").unwrap(), "4+3+2+1");
        assert_eq!(expand_word_range("1-2R").unwrap(), "1R+2R");
        assert_eq!(
            expand_word_range("1-4:2-9").unwrap(),
            "1:2-9+2:2-9+3:2-9+4:2-9"
        );
        assert_eq!(expand_word_range("1:1-4").unwrap(), "1:1-4");
        assert_eq!(expand_word_range("1-2+5").unwrap(), "1+5+2+5");
    }

    #[test]
    fn test_split_record() {
        assert_eq!(split_record("1+2").unwrap(), vec!["1", "2"]);
        assert_eq!(split_record("1-2+5").unwrap(), vec!["1", "5", "2", "5"]);
        assert_eq!(split_record(" 4-3:1-4 ").unwrap(), vec!["4:1-4", "3:1-4"]);
        assert_eq!(
            split_record("1:1-4+2:5-8R").unwrap(),
            vec!["1:1-4", "2:5-8R"]
        );
        assert!(split_record("").is_err());
        assert!(split_record("1++2").is_err());
        assert!(split_record("1-2++5").is_err());
        assert!(split_record("1-4000000000").is_err());
    }

    #[test]
    fn test_split_measurand() {
        let parts = split_measurand("1-4;ieee32;EUC[2]").unwrap();
        assert_eq!(parts.record, "1-4");
        assert_eq!(parts.decoder, Some("ieee32"));
        assert_eq!(parts.euc, Some("EUC[2]"));

        let parts = split_measurand("1").unwrap();
        assert_eq!(parts.decoder, None);
        assert_eq!(parts.euc, None);

        let parts = split_measurand("1+2;;2").unwrap();
        assert_eq!(parts.decoder, None);
        assert_eq!(parts.euc, Some("2"));

        assert!(split_measurand("1;u;2;extra").is_err());
    }
}

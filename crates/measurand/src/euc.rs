//! Engineering unit conversion (EUC) of decoded values.
//!
//! A [`Converter`] is either affine or an arbitrary scalar function:
//!
//! - **Affine**: `(value + data_bias) * scale_factor + scaled_bias`. Absent terms
//!   are skipped; with every term absent the column passes through untouched.
//! - **Function**: `f(value)` applied to every row after promotion to `f64`.
//!
//! ## Spec text
//!
//! An optional `EUC` keyword, optional enclosing brackets, then one to three
//! comma-separated coefficients. Each coefficient is a decimal literal or an
//! expression over literals using `+ - * / ^`:
//!
//! | Text | data_bias | scale_factor | scaled_bias |
//! |---|---|---|---|
//! | `EUC[0.5]` | | 0.5 | |
//! | `[-32,5/9]` | -32 | 0.5556 | |
//! | `10,2^-4,-40` | 10 | 0.0625 | -40 |

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{column::Column, errors::SpecError, expr, spec::strip_brackets};

/// Scalar function applied by [`Converter::Function`].
pub type ConvertFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Maps decoded values to engineering units.
#[derive(Clone)]
pub enum Converter {
    Affine {
        data_bias: Option<f64>,
        scale_factor: Option<f64>,
        scaled_bias: Option<f64>,
    },
    Function(ConvertFn),
}

impl Converter {
    /// Creates an affine converter.
    pub fn affine(
        data_bias: Option<f64>,
        scale_factor: Option<f64>,
        scaled_bias: Option<f64>,
    ) -> Self {
        Converter::Affine {
            data_bias,
            scale_factor,
            scaled_bias,
        }
    }

    /// Creates a converter applying `f` to every value.
    pub fn function(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Converter::Function(Arc::new(f))
    }

    /// Parses EUC text such as `EUC[1,0.5,-10]`.
    pub fn from_spec(spec: &str) -> Result<Self, SpecError> {
        let mut text = spec.trim();
        if text.get(..3).is_some_and(|keyword| keyword.eq_ignore_ascii_case("euc")) {
            text = &text[3..];
        }
        let text = strip_brackets(text.trim());

        if text.to_ascii_uppercase().contains("PV") {
            return Err(SpecError::invalid(
                spec,
                "functional EUC expressions cannot be written as text",
            ));
        }

        let terms = text
            .split(',')
            .map(expr::evaluate)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| match err {
                SpecError::InvalidSpec { reason, .. } => SpecError::invalid(spec, reason),
                other => other,
            })?;

        let converter = match terms.as_slice() {
            [scale_factor] => Self::affine(None, Some(*scale_factor), None),
            [data_bias, scale_factor] => Self::affine(Some(*data_bias), Some(*scale_factor), None),
            [data_bias, scale_factor, scaled_bias] => {
                Self::affine(Some(*data_bias), Some(*scale_factor), Some(*scaled_bias))
            }
            _ => {
                return Err(SpecError::invalid(spec, "expected 1 to 3 coefficients"));
            }
        };

        debug!(spec, ?converter, "parsed EUC");
        Ok(converter)
    }

    /// True for an affine converter with every term absent.
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Converter::Affine {
                data_bias: None,
                scale_factor: None,
                scaled_bias: None,
            }
        )
    }

    /// Converts every value of `input`.
    pub fn apply(&self, input: Column) -> Column {
        match self {
            _ if self.is_identity() => input,
            Converter::Affine {
                data_bias,
                scale_factor,
                scaled_bias,
            } => {
                let mut values = input.into_f64();

                if let Some(bias) = data_bias {
                    values.iter_mut().for_each(|v| *v += bias);
                }
                if let Some(scale) = scale_factor {
                    values.iter_mut().for_each(|v| *v *= scale);
                }
                if let Some(bias) = scaled_bias {
                    values.iter_mut().for_each(|v| *v += bias);
                }

                Column::F64(values)
            }
            Converter::Function(f) => {
                Column::F64(input.into_f64().into_iter().map(|v| f(v)).collect())
            }
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::affine(None, None, None)
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Converter::Affine {
                    data_bias: a0,
                    scale_factor: a1,
                    scaled_bias: a2,
                },
                Converter::Affine {
                    data_bias: b0,
                    scale_factor: b1,
                    scaled_bias: b2,
                },
            ) => a0 == b0 && a1 == b1 && a2 == b2,
            (Converter::Function(a), Converter::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Affine {
                data_bias,
                scale_factor,
                scaled_bias,
            } => f
                .debug_struct("Affine")
                .field("data_bias", data_bias)
                .field("scale_factor", scale_factor)
                .field("scaled_bias", scaled_bias)
                .finish(),
            Converter::Function(_) => f.write_str("Function(..)"),
        }
    }
}

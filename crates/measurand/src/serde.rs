//! JSON-deserializable measurand definitions.
//!
//! These types describe measurands as they are written in configuration files,
//! keeping the spec text as-is, and convert into compiled [`Measurand`] and
//! [`Catalog`] values with `TryFrom`.
//!
//! ```json
//! {
//!   "word_size": 16,
//!   "measurands": [
//!     { "name": "bus_voltage", "spec": "3;2c;EUC[0.01]" },
//!     { "name": "mode", "spec": "4:1-3", "word_size": 8 }
//!   ]
//! }
//! ```

use ::serde::{Deserialize, Serialize};

use crate::{catalog::Catalog, errors::SpecError, measurand::Measurand, options::SpecOptions};

/// A single named measurand.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MeasurandDef {
    /// Key of the built column.
    pub name: String,
    /// `<record>[;<decoder>[;<euc>]]` text.
    pub spec: String,
    /// Overrides the surrounding word size; defaults to 8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_size: Option<u32>,
    /// Overrides the surrounding numbering base; defaults to one-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_based: Option<bool>,
}

/// A catalog of measurands sharing default spec options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_based: Option<bool>,
    pub measurands: Vec<MeasurandDef>,
}

fn resolve(
    word_size: Option<u32>,
    one_based: Option<bool>,
    base: SpecOptions,
) -> Result<SpecOptions, SpecError> {
    SpecOptions::new(
        word_size.unwrap_or(base.word_size()),
        one_based.unwrap_or(base.one_based()),
    )
}

impl MeasurandDef {
    fn compile(&self, base: SpecOptions) -> Result<Measurand, SpecError> {
        let options = resolve(self.word_size, self.one_based, base)?;
        Measurand::from_spec(&self.spec, &options)
    }
}

impl CatalogDef {
    /// Options applied to measurands that do not override them.
    pub fn options(&self) -> Result<SpecOptions, SpecError> {
        resolve(self.word_size, self.one_based, SpecOptions::default())
    }
}

impl TryFrom<&MeasurandDef> for Measurand {
    type Error = SpecError;

    fn try_from(def: &MeasurandDef) -> Result<Self, Self::Error> {
        def.compile(SpecOptions::default())
    }
}

impl TryFrom<&CatalogDef> for Catalog {
    type Error = SpecError;

    fn try_from(def: &CatalogDef) -> Result<Self, Self::Error> {
        let base = def.options()?;
        let measurands = def
            .measurands
            .iter()
            .map(|m| Ok((m.name.clone(), m.compile(base)?)))
            .collect::<Result<Vec<_>, SpecError>>()?;

        Catalog::from_measurands(measurands)
    }
}

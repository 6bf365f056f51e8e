//! Catalog: a compiled set of named measurands built together over one batch.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::{
    batch::Batch,
    column::Column,
    errors::{BuildError, SpecError},
    measurand::Measurand,
    options::SpecOptions,
};

/// Named [Measurand]s in definition order. Use [Catalog::compile] to build from
/// `(name, spec)` pairs, then [Catalog::build] to decode a batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    measurands: Vec<(String, Measurand)>,
}

impl Catalog {
    /// Compiles `(name, spec)` pairs with shared `options`. Fails on the first
    /// invalid spec, an empty name, or a repeated name.
    pub fn compile<N, S>(entries: &[(N, S)], options: &SpecOptions) -> Result<Self, SpecError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let measurands = entries
            .iter()
            .map(|(name, spec)| {
                Measurand::from_spec(spec.as_ref(), options)
                    .map(|measurand| (name.as_ref().to_string(), measurand))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_measurands(measurands)
    }

    /// Wraps already compiled measurands. Names must be non-empty and unique.
    pub fn from_measurands(measurands: Vec<(String, Measurand)>) -> Result<Self, SpecError> {
        let mut seen = HashSet::with_capacity(measurands.len());

        for (name, _) in &measurands {
            if name.trim().is_empty() {
                return Err(SpecError::invalid(name, "measurand names must not be empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(SpecError::invalid(name, "measurand name is defined twice"));
            }
        }

        debug!(measurands = measurands.len(), "compiled catalog");
        Ok(Self { measurands })
    }

    pub fn get(&self, name: &str) -> Option<&Measurand> {
        self.measurands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, measurand)| measurand)
    }

    pub fn len(&self) -> usize {
        self.measurands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurands.is_empty()
    }

    /// Measurands in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Measurand)> {
        self.measurands.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// Builds every measurand over `batch`. Returns a map of names to columns, or
    /// the first error encountered.
    pub fn build<'a>(
        &self,
        batch: impl Into<Batch<'a>>,
    ) -> Result<BTreeMap<String, Column>, BuildError> {
        let batch = batch.into();
        let mut map = BTreeMap::new();

        for (name, measurand) in &self.measurands {
            trace!(name = name.as_str(), "building catalog entry");
            map.insert(name.clone(), measurand.build(batch)?);
        }

        Ok(map)
    }
}

//! Typed columns: the unit of data flowing through every build stage.

use crate::errors::{BuildError, SpecError};

/// Native unsigned container widths a composed record can be held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Smallest container holding `bits` bits. Fails above 64.
    pub fn for_bits(bits: u32) -> Result<Self, SpecError> {
        match bits {
            0..=8 => Ok(Width::W8),
            9..=16 => Ok(Width::W16),
            17..=32 => Ok(Width::W32),
            33..=64 => Ok(Width::W64),
            _ => Err(SpecError::UnsupportedContainerWidth(bits)),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }
}

/// One value per batch row.
///
/// Unsigned variants hold words or composed records; `F64` holds anything that
/// has been through a decoder or converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F64(Vec<f64>),
}

impl Column {
    /// Narrows `values` into a column of the given width. Values are truncated to fit.
    pub fn from_u64(values: Vec<u64>, width: Width) -> Self {
        match width {
            Width::W8 => Column::U8(values.into_iter().map(|v| v as u8).collect()),
            Width::W16 => Column::U16(values.into_iter().map(|v| v as u16).collect()),
            Width::W32 => Column::U32(values.into_iter().map(|v| v as u32).collect()),
            Width::W64 => Column::U64(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::U8(v) => v.len(),
            Column::U16(v) => v.len(),
            Column::U32(v) => v.len(),
            Column::U64(v) => v.len(),
            Column::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Container width of an unsigned column, `None` for `F64`.
    pub fn width(&self) -> Option<Width> {
        match self {
            Column::U8(_) => Some(Width::W8),
            Column::U16(_) => Some(Width::W16),
            Column::U32(_) => Some(Width::W32),
            Column::U64(_) => Some(Width::W64),
            Column::F64(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Column::F64(_))
    }

    /// Widens an unsigned column to `u64`. Fails on `F64`.
    pub fn to_u64(&self) -> Result<Vec<u64>, BuildError> {
        match self {
            Column::U8(v) => Ok(v.iter().map(|&x| x as u64).collect()),
            Column::U16(v) => Ok(v.iter().map(|&x| x as u64).collect()),
            Column::U32(v) => Ok(v.iter().map(|&x| x as u64).collect()),
            Column::U64(v) => Ok(v.clone()),
            Column::F64(_) => Err(BuildError::TypeMismatch(
                "expected an unsigned integer column, found f64".to_string(),
            )),
        }
    }

    /// Promotes the column to double precision.
    pub fn into_f64(self) -> Vec<f64> {
        match self {
            Column::U8(v) => v.into_iter().map(f64::from).collect(),
            Column::U16(v) => v.into_iter().map(f64::from).collect(),
            Column::U32(v) => v.into_iter().map(f64::from).collect(),
            Column::U64(v) => v.into_iter().map(|x| x as f64).collect(),
            Column::F64(v) => v,
        }
    }

    /// Reads row `i` as `f64`.
    pub fn get_f64(&self, i: usize) -> Option<f64> {
        match self {
            Column::U8(v) => v.get(i).map(|&x| f64::from(x)),
            Column::U16(v) => v.get(i).map(|&x| f64::from(x)),
            Column::U32(v) => v.get(i).map(|&x| f64::from(x)),
            Column::U64(v) => v.get(i).map(|&x| x as f64),
            Column::F64(v) => v.get(i).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_for_bits() {
        assert_eq!(Width::for_bits(1).unwrap(), Width::W8);
        assert_eq!(Width::for_bits(8).unwrap(), Width::W8);
        assert_eq!(Width::for_bits(9).unwrap(), Width::W16);
        assert_eq!(Width::for_bits(30).unwrap(), Width::W32);
        assert_eq!(Width::for_bits(48).unwrap(), Width::W64);
        assert_eq!(Width::for_bits(64).unwrap(), Width::W64);
        assert_eq!(
            Width::for_bits(69).unwrap_err(),
            SpecError::UnsupportedContainerWidth(69)
        );
    }

    #[test]
    fn test_from_u64_narrows() {
        let column = Column::from_u64(vec![1, 0x0102], Width::W8);
        assert_eq!(column, Column::U8(vec![1, 2]));
        assert_eq!(column.width(), Some(Width::W8));
    }

    #[test]
    fn test_to_u64() {
        assert_eq!(Column::U16(vec![7, 0xFFFF]).to_u64().unwrap(), vec![7, 0xFFFF]);
        assert!(Column::F64(vec![1.0]).to_u64().is_err());
    }

    #[test]
    fn test_into_f64() {
        assert_eq!(Column::U32(vec![3]).into_f64(), vec![3.0]);
        assert_eq!(Column::F64(vec![0.5]).into_f64(), vec![0.5]);
    }
}

//! A resolved physical unit: dimension plus the affine map into SI base units.

use crate::units::dimension::Dimension;
use crate::units::error::UnitError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A physical unit resolved by a [`crate::UnitRegistry`].
///
/// A value `v` in this unit corresponds to `v * scale + offset` in coherent SI
/// base units. The offset is non-zero only for temperature scales such as
/// degrees Celsius and Fahrenheit.
///
/// # Examples
///
/// ```
/// use heatpump_data::UnitRegistry;
///
/// let registry = UnitRegistry::global();
/// let btu_per_hour = registry.unit("BTU/h")?;
/// let kilowatt = registry.unit("kW")?;
///
/// let kw = btu_per_hour.convert(12_000.0, &kilowatt)?;
/// assert!((kw - 3.5168528).abs() < 1e-6);
/// # Ok::<(), heatpump_data::UnitError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    symbol: String,
    dimension: Dimension,
    scale: f64,
    offset: f64,
}

impl Unit {
    pub(crate) fn new(symbol: impl Into<String>, dimension: Dimension, scale: f64, offset: f64) -> Self {
        Self {
            symbol: symbol.into(),
            dimension,
            scale,
            offset,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Factor from this unit to coherent SI units, ignoring any offset.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// `true` for affine units like °C and °F.
    pub fn is_offset(&self) -> bool {
        self.offset != 0.0
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    pub(crate) fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// `None` when the combined dimension overflows.
    pub(crate) fn checked_mul(&self, other: &Unit) -> Option<Unit> {
        Some(Unit::new(
            format!("{}*{}", self.symbol, other.symbol),
            self.dimension.checked_mul(other.dimension)?,
            self.scale * other.scale,
            0.0,
        ))
    }

    /// `None` when the raised dimension overflows.
    pub(crate) fn checked_powi(&self, exponent: i8) -> Option<Unit> {
        Some(Unit::new(
            format!("{}^{}", self.symbol, exponent),
            self.dimension.checked_powi(exponent)?,
            self.scale.powi(i32::from(exponent)),
            0.0,
        ))
    }

    fn check_compatible(&self, to: &Unit) -> Result<(), UnitError> {
        if self.is_compatible(to) {
            Ok(())
        } else {
            Err(UnitError::DimensionalityMismatch {
                from: self.symbol.clone(),
                from_dimension: self.dimension,
                to: to.symbol.clone(),
                to_dimension: to.dimension,
            })
        }
    }

    /// Converts `value` from this unit into `to`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::DimensionalityMismatch`] when the units measure
    /// different physical quantities (e.g. volts and kilowatts).
    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64, UnitError> {
        self.check_compatible(to)?;
        if self == to {
            return Ok(value);
        }
        let si = value * self.scale + self.offset;
        Ok((si - to.offset) / to.scale)
    }

    /// Multiplicative factor `f` such that `value_in_to = value_in_self * f`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::DimensionalityMismatch`] for incompatible units and
    /// [`UnitError::NonMultiplicative`] when either unit carries an offset.
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64, UnitError> {
        self.check_compatible(to)?;
        if self.is_offset() || to.is_offset() {
            return Err(UnitError::NonMultiplicative {
                from: self.symbol.clone(),
                to: to.symbol.clone(),
            });
        }
        if self.scale == to.scale {
            return Ok(1.0);
        }
        Ok(self.scale / to.scale)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

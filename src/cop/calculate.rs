use crate::cop::error::CopError;
use crate::cop::table::{ColumnKey, MeasurementTable};
use crate::units::unit::Unit;
use log::debug;
use polars::prelude::*;

pub const COP_COLUMN: &str = "cop";

/// Computes the coefficient of performance for every row of `table`.
///
/// Heat output values (declared in `heat_unit`) are converted into
/// `energy_unit` and divided element-wise by the energy input values. The
/// returned series is named `cop`, has one value per table row and keeps the
/// table's row order. `NaN` inputs yield `NaN`; null cells stay null.
///
/// # Errors
///
/// * [`CopError::Unit`] wrapping [`crate::UnitError::DimensionalityMismatch`] when
///   the two units cannot be converted into one another. This is checked before
///   any column is read.
/// * [`CopError::Unit`] wrapping [`crate::UnitError::NonMultiplicative`] when
///   either unit carries an offset (°C, °F), since a ratio of affine
///   quantities has no single conversion factor.
/// * [`CopError::MissingColumn`] / [`CopError::NonNumericColumn`] for bad column keys.
///
/// # Examples
///
/// ```
/// use heatpump_data::{calculate_cop, MeasurementTable, UnitRegistry};
///
/// let table = MeasurementTable::from_columns(
///     Some(("dry_bulb_f", vec![47.0])),
///     vec![("capacity", vec![41_800.0]), ("input", vec![3.85])],
/// )?;
/// let registry = UnitRegistry::global();
/// let cop = calculate_cop(
///     &table,
///     "capacity",
///     &registry.unit("BTU/h")?,
///     "input",
///     &registry.unit("kW")?,
/// )?;
/// let value = cop.f64()?.get(0).unwrap();
/// assert!((value - 3.18).abs() < 0.01);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn calculate_cop(
    table: &MeasurementTable,
    heat_column: impl Into<ColumnKey>,
    heat_unit: &Unit,
    energy_column: impl Into<ColumnKey>,
    energy_unit: &Unit,
) -> Result<Series, CopError> {
    let factor = heat_unit.conversion_factor(energy_unit)?;
    debug!(
        "Calculating COP with heat in {} and energy in {} (factor {})",
        heat_unit, energy_unit, factor
    );

    let heat = table.values(heat_column)?;
    let energy = table.values(energy_column)?;

    let heat_in_energy_unit = &heat * factor;
    let cop = &heat_in_energy_unit / &energy;
    Ok(cop.with_name(COP_COLUMN.into()).into_series())
}

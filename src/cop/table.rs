//! Contains the `MeasurementTable`, a thin wrapper around a Polars `DataFrame`
//! holding a manufacturer performance table.

use crate::cop::error::CopError;
use crate::units::unit::Unit;
use polars::prelude::*;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// A possibly multi-level column key, e.g. `("47°F", "Heating Capacity")`.
///
/// Manufacturer spec sheets often group columns under an outdoor condition
/// heading. Each level is joined with [`ColumnKey::SEPARATOR`] to form the flat
/// Polars column name.
///
/// # Examples
///
/// ```
/// use heatpump_data::ColumnKey;
///
/// let key = ColumnKey::from(("47°F", "Heating Capacity"));
/// assert_eq!(key.column_name(), "47°F::Heating Capacity");
/// assert_eq!(ColumnKey::from("COP").column_name(), "COP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey(Vec<String>);

impl ColumnKey {
    pub const SEPARATOR: &'static str = "::";

    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(levels.into_iter().map(Into::into).collect())
    }

    pub fn levels(&self) -> &[String] {
        &self.0
    }

    pub fn column_name(&self) -> String {
        self.0.join(Self::SEPARATOR)
    }
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl From<&str> for ColumnKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for ColumnKey {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&ColumnKey> for ColumnKey {
    fn from(value: &ColumnKey) -> Self {
        value.clone()
    }
}

impl From<(&str, &str)> for ColumnKey {
    fn from(value: (&str, &str)) -> Self {
        Self::new([value.0, value.1])
    }
}

impl From<(&str, &str, &str)> for ColumnKey {
    fn from(value: (&str, &str, &str)) -> Self {
        Self::new([value.0, value.1, value.2])
    }
}

/// An ordered table of measurements, optionally indexed by a key column such as
/// dry-bulb temperature.
///
/// Values are plain numbers; the physical unit of each column is declared by the
/// caller when computing with it (see [`MeasurementTable::cop`]).
///
/// # Examples
///
/// ```
/// use heatpump_data::{MeasurementTable, UnitRegistry};
///
/// let table = MeasurementTable::from_columns(
///     Some(("Dry Bulb (°F)", vec![47.0, 17.0])),
///     vec![
///         (("Heating", "Capacity (BTU/h)"), vec![36_000.0, 22_000.0]),
///         (("Heating", "Input (kW)"), vec![2.9, 2.6]),
///     ],
/// )?;
///
/// let registry = UnitRegistry::global();
/// let cop = table.cop(
///     ("Heating", "Capacity (BTU/h)"),
///     &registry.unit("BTU/h")?,
///     ("Heating", "Input (kW)"),
///     &registry.unit("kW")?,
/// )?;
/// assert_eq!(cop.len(), 2);
/// # Ok::<(), heatpump_data::CopError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    frame: DataFrame,
    index: Option<String>,
}

impl MeasurementTable {
    /// Wraps a `DataFrame` without an index column.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame, index: None }
    }

    /// Wraps a `DataFrame`, designating `index` as the row key.
    ///
    /// # Errors
    ///
    /// [`CopError::MissingColumn`] if the index column does not exist and
    /// [`CopError::DuplicateIndex`] if it holds repeated values.
    pub fn with_index(frame: DataFrame, index: impl Into<ColumnKey>) -> Result<Self, CopError> {
        let index = index.into().column_name();
        let table = Self { frame, index: None };
        let column = table.column(&index)?;
        if column.as_materialized_series().n_unique()? != table.height() {
            return Err(CopError::DuplicateIndex(index));
        }
        Ok(Self {
            index: Some(index),
            ..table
        })
    }

    /// Builds a table from in-memory columns of equal length.
    pub fn from_columns<K, I>(
        index: Option<(I, Vec<f64>)>,
        columns: Vec<(K, Vec<f64>)>,
    ) -> Result<Self, CopError>
    where
        K: Into<ColumnKey>,
        I: Into<ColumnKey>,
    {
        let mut frame_columns = Vec::with_capacity(columns.len() + 1);
        let mut index_name = None;
        if let Some((key, values)) = index {
            let name = key.into().column_name();
            frame_columns.push(Column::from(Series::new(name.as_str().into(), values)));
            index_name = Some(name);
        }
        for (key, values) in columns {
            let name = key.into().column_name();
            frame_columns.push(Column::from(Series::new(name.into(), values)));
        }
        let frame = DataFrame::new(frame_columns)?;

        match index_name {
            Some(name) => Self::with_index(frame, name),
            None => Ok(Self::new(frame)),
        }
    }

    /// Reads a spec sheet from a CSV file with a header row.
    ///
    /// Multi-level headers should already be flattened with
    /// [`ColumnKey::SEPARATOR`], e.g. `47°F::Heating Capacity`.
    pub fn from_csv(path: &Path, index: Option<&str>) -> Result<Self, CopError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| CopError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| CopError::CsvRead(path.to_path_buf(), e))?;
        match index {
            Some(index) => Self::with_index(frame, index),
            None => Ok(Self::new(frame)),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub(crate) fn column(&self, name: &str) -> Result<&Column, CopError> {
        self.frame
            .column(name)
            .map_err(|_| CopError::MissingColumn {
                column: name.to_string(),
                available: self.column_names(),
            })
    }

    /// Returns the values of `key` as `f64`, casting integer columns.
    pub fn values(&self, key: impl Into<ColumnKey>) -> Result<Float64Chunked, CopError> {
        let name = key.into().column_name();
        let column = self.column(&name)?;
        let is_numeric = matches!(
            column.dtype(),
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::Int8
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
                | DataType::UInt8
        );
        if !is_numeric {
            return Err(CopError::NonNumericColumn {
                column: name,
                dtype: column.dtype().to_string(),
            });
        }
        let cast = column.cast(&DataType::Float64)?;
        Ok(cast.f64()?.clone())
    }

    /// Coefficient of performance per row. See [`crate::calculate_cop`].
    pub fn cop(
        &self,
        heat_column: impl Into<ColumnKey>,
        heat_unit: &Unit,
        energy_column: impl Into<ColumnKey>,
        energy_unit: &Unit,
    ) -> Result<Series, CopError> {
        crate::cop::calculate::calculate_cop(self, heat_column, heat_unit, energy_column, energy_unit)
    }

    /// Like [`MeasurementTable::cop`], returned next to the index column (if any)
    /// as a two-column `DataFrame`.
    pub fn cop_frame(
        &self,
        heat_column: impl Into<ColumnKey>,
        heat_unit: &Unit,
        energy_column: impl Into<ColumnKey>,
        energy_unit: &Unit,
    ) -> Result<DataFrame, CopError> {
        let cop = self.cop(heat_column, heat_unit, energy_column, energy_unit)?;
        let mut columns = Vec::with_capacity(2);
        if let Some(index) = &self.index {
            columns.push(self.column(index)?.clone());
        }
        columns.push(Column::from(cop));
        Ok(DataFrame::new(columns)?)
    }
}

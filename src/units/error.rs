use crate::units::dimension::Dimension;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Invalid unit expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Offset unit '{0}' cannot be combined with other units or raised to a power")]
    OffsetUnitInCompound(String),

    #[error("Cannot convert from '{from}' ({from_dimension}) to '{to}' ({to_dimension})")]
    DimensionalityMismatch {
        from: String,
        from_dimension: Dimension,
        to: String,
        to_dimension: Dimension,
    },

    // Conversions involving °C/°F are affine, not a plain scale factor.
    #[error("No multiplicative conversion factor exists between '{from}' and '{to}'")]
    NonMultiplicative { from: String, to: String },
}

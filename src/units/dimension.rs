//! Physical dimensions expressed as exponents over the seven SI base quantities.

use std::fmt;
use std::fmt::{Display, Formatter};

const BASE_NAMES: [&str; 7] = [
    "length",
    "mass",
    "time",
    "current",
    "temperature",
    "substance",
    "luminosity",
];

/// Exponents of length, mass, time, current, temperature, amount of substance
/// and luminous intensity, in that order.
///
/// # Examples
///
/// ```
/// use heatpump_data::Dimension;
///
/// let power = Dimension::MASS * Dimension::LENGTH.powi(2) / Dimension::TIME.powi(3);
/// assert_eq!(power, Dimension::POWER);
/// assert_eq!(power.to_string(), "[length]^2 * [mass] / [time]^3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension(pub [i8; 7]);

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension([0, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: Dimension = Dimension([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Dimension = Dimension([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: Dimension = Dimension([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: Dimension = Dimension([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: Dimension = Dimension([0, 0, 0, 0, 1, 0, 0]);
    pub const SUBSTANCE: Dimension = Dimension([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOSITY: Dimension = Dimension([0, 0, 0, 0, 0, 0, 1]);

    pub const ENERGY: Dimension = Dimension([2, 1, -2, 0, 0, 0, 0]);
    pub const POWER: Dimension = Dimension([2, 1, -3, 0, 0, 0, 0]);
    pub const VOLTAGE: Dimension = Dimension([2, 1, -3, -1, 0, 0, 0]);

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    /// Raises every exponent by `exponent`, saturating at the `i8` bounds.
    /// Use [`Dimension::checked_powi`] for untrusted input.
    pub fn powi(self, exponent: i8) -> Dimension {
        Dimension(self.0.map(|e| e.saturating_mul(exponent)))
    }

    /// `None` when an exponent leaves the `i8` range.
    pub fn checked_powi(self, exponent: i8) -> Option<Dimension> {
        let mut out = self.0;
        for e in out.iter_mut() {
            *e = e.checked_mul(exponent)?;
        }
        Some(Dimension(out))
    }

    /// `None` when an exponent leaves the `i8` range.
    pub fn checked_mul(self, rhs: Dimension) -> Option<Dimension> {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0) {
            *e = e.checked_add(r)?;
        }
        Some(Dimension(out))
    }

    pub fn checked_div(self, rhs: Dimension) -> Option<Dimension> {
        let mut inverse = rhs.0;
        for e in inverse.iter_mut() {
            *e = e.checked_neg()?;
        }
        self.checked_mul(Dimension(inverse))
    }
}

impl std::ops::Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Dimension) -> Dimension {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0) {
            *e = e.saturating_add(r);
        }
        Dimension(out)
    }
}

impl std::ops::Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.powi(-1)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }

        let render = |exponent: i8, name: &str| {
            if exponent == 1 {
                format!("[{name}]")
            } else {
                format!("[{name}]^{exponent}")
            }
        };

        let numerator: Vec<String> = BASE_NAMES
            .iter()
            .zip(self.0)
            .filter(|(_, e)| *e > 0)
            .map(|(name, e)| render(e, name))
            .collect();
        let denominator: Vec<String> = BASE_NAMES
            .iter()
            .zip(self.0)
            .filter(|(_, e)| *e < 0)
            .map(|(name, e)| render(-e, name))
            .collect();

        let numerator = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(" * ")
        };
        if denominator.is_empty() {
            write!(f, "{numerator}")
        } else {
            write!(f, "{numerator} / {}", denominator.join(" / "))
        }
    }
}

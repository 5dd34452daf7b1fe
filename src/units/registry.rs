//! The process-wide unit registry and unit expression parsing.

use crate::units::dimension::Dimension;
use crate::units::error::UnitError;
use crate::units::unit::Unit;
use log::debug;
use std::collections::HashMap;
use std::sync::OnceLock;
use uom::si::f64::{
    Energy, Length, Mass, Power, Pressure, TemperatureInterval, ThermodynamicTemperature, Time,
    Volume,
};
use uom::si::{
    energy, length, mass, power, pressure, temperature_interval, thermodynamic_temperature, time,
    volume,
};

/// International Table BTU in joules.
fn btu_in_joules() -> f64 {
    Energy::new::<energy::btu_it>(1.0).get::<energy::joule>()
}

static GLOBAL_REGISTRY: OnceLock<UnitRegistry> = OnceLock::new();

const PREFIXES: &[(&str, f64)] = &[
    ("yotta", 1e24),
    ("zetta", 1e21),
    ("exa", 1e18),
    ("peta", 1e15),
    ("tera", 1e12),
    ("giga", 1e9),
    ("mega", 1e6),
    ("kilo", 1e3),
    ("hecto", 1e2),
    ("deca", 1e1),
    ("deci", 1e-1),
    ("centi", 1e-2),
    ("milli", 1e-3),
    ("micro", 1e-6),
    ("nano", 1e-9),
    ("pico", 1e-12),
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("da", 1e1),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
];

#[derive(Debug, Clone)]
struct UnitEntry {
    unit: Unit,
    prefixable: bool,
}

/// An immutable table of named units, their aliases and the SI prefixes.
///
/// Use [`UnitRegistry::global`] for the shared instance; it is built on first
/// use and never mutated afterwards. Pass it by reference wherever units are
/// resolved.
///
/// # Examples
///
/// ```
/// use heatpump_data::{Dimension, UnitRegistry};
///
/// let registry = UnitRegistry::global();
/// assert_eq!(registry.unit("BTU per hour")?.dimension(), Dimension::POWER);
/// assert_eq!(registry.unit("kilowatt")?.scale(), 1000.0);
/// assert!(registry.unit("degree Celsius")?.is_offset());
/// # Ok::<(), heatpump_data::UnitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<String, UnitEntry>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Builds a fresh registry with the default definitions.
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
        };
        registry.load_defaults();
        registry
    }

    /// The lazily-initialised, process-wide registry.
    pub fn global() -> &'static UnitRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            debug!("Initialising global unit registry");
            UnitRegistry::new()
        })
    }

    fn define(
        &mut self,
        names: &[&str],
        dimension: Dimension,
        scale: f64,
        offset: f64,
        prefixable: bool,
    ) {
        let Some(canonical) = names.first() else {
            return;
        };
        let unit = Unit::new(*canonical, dimension, scale, offset);
        for name in names {
            self.units.insert(
                (*name).to_string(),
                UnitEntry {
                    unit: unit.clone().with_symbol(*name),
                    prefixable,
                },
            );
        }
    }

    fn load_defaults(&mut self) {
        let pressure = Dimension::MASS / Dimension::LENGTH / Dimension::TIME.powi(2);
        let btu = btu_in_joules();
        let btu_per_hour = btu / Time::new::<time::hour>(1.0).get::<time::second>();

        self.define(&["dimensionless", "1"], Dimension::DIMENSIONLESS, 1.0, 0.0, false);
        self.define(&["percent", "%"], Dimension::DIMENSIONLESS, 0.01, 0.0, false);

        // length
        let meters = |v: Length| v.get::<length::meter>();
        self.define(&["m", "meter", "metre"], Dimension::LENGTH, 1.0, 0.0, true);
        self.define(
            &["ft", "foot", "feet"],
            Dimension::LENGTH,
            meters(Length::new::<length::foot>(1.0)),
            0.0,
            false,
        );
        self.define(
            &["in", "inch"],
            Dimension::LENGTH,
            meters(Length::new::<length::inch>(1.0)),
            0.0,
            false,
        );
        self.define(
            &["mi", "mile"],
            Dimension::LENGTH,
            meters(Length::new::<length::mile>(1.0)),
            0.0,
            false,
        );

        // mass, in kilograms so that "kg" is the coherent unit
        let kilograms = |v: Mass| v.get::<mass::kilogram>();
        self.define(
            &["g", "gram"],
            Dimension::MASS,
            kilograms(Mass::new::<mass::gram>(1.0)),
            0.0,
            true,
        );
        self.define(
            &["lb", "lbs", "pound"],
            Dimension::MASS,
            kilograms(Mass::new::<mass::pound>(1.0)),
            0.0,
            false,
        );

        // time
        let seconds = |v: Time| v.get::<time::second>();
        self.define(&["s", "sec", "second"], Dimension::TIME, 1.0, 0.0, true);
        self.define(
            &["min", "minute"],
            Dimension::TIME,
            seconds(Time::new::<time::minute>(1.0)),
            0.0,
            false,
        );
        self.define(
            &["h", "hr", "hour"],
            Dimension::TIME,
            seconds(Time::new::<time::hour>(1.0)),
            0.0,
            false,
        );
        self.define(
            &["day"],
            Dimension::TIME,
            seconds(Time::new::<time::day>(1.0)),
            0.0,
            false,
        );

        // electrical
        self.define(&["A", "ampere", "amp"], Dimension::CURRENT, 1.0, 0.0, true);
        self.define(&["V", "volt"], Dimension::VOLTAGE, 1.0, 0.0, true);
        self.define(
            &["ohm", "Ω"],
            Dimension::VOLTAGE / Dimension::CURRENT,
            1.0,
            0.0,
            true,
        );
        self.define(&["Hz", "hertz"], Dimension::TIME.powi(-1), 1.0, 0.0, true);

        // temperature: scale from the interval, offset from the absolute zero point
        let degree = |interval: TemperatureInterval, zero: ThermodynamicTemperature| {
            (
                interval.get::<temperature_interval::kelvin>(),
                zero.get::<thermodynamic_temperature::kelvin>(),
            )
        };
        let (celsius_scale, celsius_offset) = degree(
            TemperatureInterval::new::<temperature_interval::degree_celsius>(1.0),
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_celsius>(0.0),
        );
        let (fahrenheit_scale, fahrenheit_offset) = degree(
            TemperatureInterval::new::<temperature_interval::degree_fahrenheit>(1.0),
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_fahrenheit>(0.0),
        );
        let (rankine_scale, _) = degree(
            TemperatureInterval::new::<temperature_interval::degree_rankine>(1.0),
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_rankine>(0.0),
        );
        self.define(&["K", "kelvin"], Dimension::TEMPERATURE, 1.0, 0.0, true);
        self.define(
            &["degC", "°C", "celsius", "degree_Celsius", "degree_celsius"],
            Dimension::TEMPERATURE,
            celsius_scale,
            celsius_offset,
            false,
        );
        self.define(
            &["degF", "°F", "fahrenheit", "degree_Fahrenheit", "degree_fahrenheit"],
            Dimension::TEMPERATURE,
            fahrenheit_scale,
            fahrenheit_offset,
            false,
        );
        self.define(&["degR", "°R", "rankine"], Dimension::TEMPERATURE, rankine_scale, 0.0, false);
        self.define(
            &["delta_degC", "Δ°C"],
            Dimension::TEMPERATURE,
            celsius_scale,
            0.0,
            false,
        );
        self.define(
            &["delta_degF", "Δ°F"],
            Dimension::TEMPERATURE,
            fahrenheit_scale,
            0.0,
            false,
        );

        self.define(&["mol", "mole"], Dimension::SUBSTANCE, 1.0, 0.0, true);
        self.define(&["cd", "candela"], Dimension::LUMINOSITY, 1.0, 0.0, true);

        // energy
        let joules = |v: Energy| v.get::<energy::joule>();
        self.define(&["J", "joule"], Dimension::ENERGY, 1.0, 0.0, true);
        self.define(
            &["Wh", "watt_hour"],
            Dimension::ENERGY,
            joules(Energy::new::<energy::watt_hour>(1.0)),
            0.0,
            true,
        );
        self.define(
            &["cal", "calorie"],
            Dimension::ENERGY,
            joules(Energy::new::<energy::calorie>(1.0)),
            0.0,
            true,
        );
        // kBtu and MBtu are common on spec sheets
        self.define(
            &["BTU", "Btu", "btu", "british_thermal_unit"],
            Dimension::ENERGY,
            btu,
            0.0,
            true,
        );
        self.define(&["therm"], Dimension::ENERGY, 1e5 * btu, 0.0, false);

        // power
        self.define(&["W", "watt"], Dimension::POWER, 1.0, 0.0, true);
        self.define(
            &["hp", "horsepower"],
            Dimension::POWER,
            Power::new::<power::horsepower>(1.0).get::<power::watt>(),
            0.0,
            false,
        );
        self.define(&["BTUh", "Btuh", "BTUH"], Dimension::POWER, btu_per_hour, 0.0, true);
        self.define(&["MBH"], Dimension::POWER, 1e3 * btu_per_hour, 0.0, false);
        self.define(
            &["TR", "ton_of_refrigeration", "refrigeration_ton"],
            Dimension::POWER,
            12_000.0 * btu_per_hour,
            0.0,
            false,
        );

        // pressure and volume
        let pascals = |v: Pressure| v.get::<pressure::pascal>();
        let cubic_meters = |v: Volume| v.get::<volume::cubic_meter>();
        self.define(&["Pa", "pascal"], pressure, 1.0, 0.0, true);
        self.define(
            &["bar"],
            pressure,
            pascals(Pressure::new::<pressure::bar>(1.0)),
            0.0,
            true,
        );
        self.define(
            &["psi"],
            pressure,
            pascals(Pressure::new::<pressure::pound_force_per_square_inch>(1.0)),
            0.0,
            false,
        );
        self.define(
            &["L", "l", "liter", "litre"],
            Dimension::LENGTH.powi(3),
            cubic_meters(Volume::new::<volume::liter>(1.0)),
            0.0,
            true,
        );
        self.define(
            &["gal", "gallon"],
            Dimension::LENGTH.powi(3),
            cubic_meters(Volume::new::<volume::gallon>(1.0)),
            0.0,
            false,
        );
    }

    /// Looks up a single registered name, trying SI prefixes when there is no
    /// exact match.
    fn lookup(&self, name: &str) -> Option<Unit> {
        if let Some(entry) = self.units.get(name) {
            return Some(entry.unit.clone());
        }
        PREFIXES.iter().find_map(|(prefix, factor)| {
            let rest = name.strip_prefix(prefix)?;
            let entry = self.units.get(rest).filter(|e| e.prefixable)?;
            Some(Unit::new(
                name,
                entry.unit.dimension(),
                factor * entry.unit.scale(),
                0.0,
            ))
        })
    }

    /// Parses a unit expression such as `"kW"`, `"BTU/h"`, `"BTU per hour"`,
    /// `"J/s"`, `"m^2"` or `"degC"`.
    ///
    /// Factors are joined with `*`, `·` or `/` (left associative) and may carry an
    /// integer exponent written `^n` or `**n`. Words separated by spaces inside a
    /// factor are joined with underscores, so `"degree Celsius"` resolves to
    /// `degree_Celsius`.
    ///
    /// # Errors
    ///
    /// [`UnitError::UnknownUnit`] for names the registry does not know,
    /// [`UnitError::InvalidExpression`] for malformed input and
    /// [`UnitError::OffsetUnitInCompound`] when °C/°F appear inside a compound.
    pub fn unit(&self, expression: &str) -> Result<Unit, UnitError> {
        let trimmed = expression.trim();
        let invalid = |reason: &str| UnitError::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };
        if trimmed.is_empty() {
            return Err(invalid("empty expression"));
        }

        let normalized = trimmed.replace("**", "^").replace(" per ", "/");
        let factors = split_factors(&normalized);

        let mut result: Option<Unit> = None;
        let factor_count = factors.len();
        for (op, raw) in factors {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(invalid("missing unit between operators"));
            }
            let (name, exponent) = split_exponent(raw).ok_or_else(|| invalid("bad exponent"))?;
            let name = name.split_whitespace().collect::<Vec<_>>().join("_");
            let base = self
                .lookup(&name)
                .ok_or_else(|| UnitError::UnknownUnit(name.clone()))?;

            if base.is_offset() {
                if factor_count > 1 || exponent != 1 || op == Op::Div {
                    return Err(UnitError::OffsetUnitInCompound(name));
                }
                return Ok(base.with_symbol(trimmed));
            }

            let overflow = || invalid("exponent out of range");
            let signed = match op {
                Op::Div => exponent.checked_neg().ok_or_else(overflow)?,
                Op::Mul => exponent,
            };
            let factor = if signed == 1 {
                base
            } else {
                base.checked_powi(signed).ok_or_else(overflow)?
            };
            result = Some(match result {
                Some(acc) => acc.checked_mul(&factor).ok_or_else(overflow)?,
                None => factor,
            });
        }

        result
            .map(|unit| unit.with_symbol(trimmed))
            .ok_or_else(|| invalid("no units found"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Mul,
    Div,
}

fn split_factors(expression: &str) -> Vec<(Op, &str)> {
    let mut factors = Vec::new();
    let mut op = Op::Mul;
    let mut start = 0;
    for (i, c) in expression.char_indices() {
        let next_op = match c {
            '*' | '·' => Op::Mul,
            '/' => Op::Div,
            _ => continue,
        };
        factors.push((op, &expression[start..i]));
        op = next_op;
        start = i + c.len_utf8();
    }
    factors.push((op, &expression[start..]));
    factors
}

fn split_exponent(factor: &str) -> Option<(&str, i8)> {
    if let Some((name, exponent)) = factor.split_once('^') {
        return Some((name.trim(), exponent.trim().parse().ok()?));
    }
    if let Some(name) = factor.strip_suffix('²') {
        return Some((name, 2));
    }
    if let Some(name) = factor.strip_suffix('³') {
        return Some((name, 3));
    }
    Some((factor, 1))
}

/// Converts a temperature between two scales using the global registry.
///
/// # Examples
///
/// ```
/// use heatpump_data::convert_temperature;
///
/// let celsius = convert_temperature(47.0, "degF", "degC")?;
/// assert!((celsius - 8.3333).abs() < 1e-3);
/// # Ok::<(), heatpump_data::UnitError>(())
/// ```
pub fn convert_temperature(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let registry = UnitRegistry::global();
    let from = registry.unit(from)?;
    let to = registry.unit(to)?;
    if from.dimension() != Dimension::TEMPERATURE {
        return Err(UnitError::DimensionalityMismatch {
            from: from.symbol().to_string(),
            from_dimension: from.dimension(),
            to: to.symbol().to_string(),
            to_dimension: to.dimension(),
        });
    }
    from.convert(value, &to)
}

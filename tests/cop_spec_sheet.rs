use heatpump_data::{
    calculate_cop, ColumnKey, CopError, MeasurementTable, UnitError, UnitRegistry, COP_COLUMN,
};
use std::path::Path;

const INDEX: &str = "Dry Bulb (°F)";

fn spec_sheet() -> Result<MeasurementTable, CopError> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/daikin_heating.csv");
    MeasurementTable::from_csv(&path, Some(INDEX))
}

#[test]
fn test_spec_sheet_matches_published_cop() -> Result<(), Box<dyn std::error::Error>> {
    let table = spec_sheet()?;
    let registry = UnitRegistry::global();

    let cop = calculate_cop(
        &table,
        ("Heating", "Capacity"),
        &registry.unit("BTU/h")?,
        ("Heating", "Input"),
        &registry.unit("kW")?,
    )?;
    let published = table.values(ColumnKey::from(("Heating", "COP")))?;

    assert_eq!(cop.len(), table.height());
    for (computed, expected) in cop.f64()?.into_iter().zip(&published) {
        let (computed, expected) = (computed.unwrap(), expected.unwrap());
        assert!(
            (computed - expected).abs() / expected < 0.01,
            "computed {computed}, published {expected}"
        );
    }
    Ok(())
}

#[test]
fn test_cop_frame_keeps_dry_bulb_order() -> Result<(), Box<dyn std::error::Error>> {
    let table = spec_sheet()?;
    let registry = UnitRegistry::global();

    let frame = table.cop_frame(
        ("Heating", "Capacity"),
        &registry.unit("BTU per hour")?,
        ("Heating", "Input"),
        &registry.unit("kilowatt")?,
    )?;

    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, [INDEX, COP_COLUMN]);
    let dry_bulb: Vec<Option<i64>> = frame.column(INDEX)?.i64()?.into_iter().collect();
    assert_eq!(
        dry_bulb,
        [62, 47, 35, 17, 5, -4, -13].map(Some).to_vec()
    );
    Ok(())
}

#[test]
fn test_volts_are_not_a_heat_unit() -> Result<(), Box<dyn std::error::Error>> {
    let table = spec_sheet()?;
    let registry = UnitRegistry::global();

    let result = calculate_cop(
        &table,
        ("Heating", "Capacity"),
        &registry.unit("V")?,
        ("Heating", "Input"),
        &registry.unit("kW")?,
    );
    assert!(matches!(
        result,
        Err(CopError::Unit(UnitError::DimensionalityMismatch { .. }))
    ));
    Ok(())
}

#[test]
fn test_unknown_column_lists_available_ones() -> Result<(), Box<dyn std::error::Error>> {
    let table = spec_sheet()?;
    let registry = UnitRegistry::global();
    let watt = registry.unit("W")?;

    match calculate_cop(&table, ("Cooling", "Capacity"), &watt, ("Heating", "Input"), &watt) {
        Err(CopError::MissingColumn { column, available }) => {
            assert_eq!(column, "Cooling::Capacity");
            assert!(available.contains(&"Heating::Capacity".to_string()));
        }
        other => panic!("expected a missing column error, got {other:?}"),
    }
    Ok(())
}

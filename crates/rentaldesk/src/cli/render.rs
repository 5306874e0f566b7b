//! Rendering of records for the terminal.

use std::io::Write;

use serde_json::json;

use super::OutputFormat;
use crate::car::{AvailableCar, RentedCar, DATE_FORMAT};
use crate::error::Result;
use crate::store::Schema;

const RENTED_COLUMNS: [&str; 6] = ["CAR", "TYPE", "PLATE", "RENTER", "FROM", "UNTIL"];
const AVAILABLE_COLUMNS: [&str; 4] = ["CAR", "TYPE", "PLATE", "STATUS"];

/// Write both collections.
///
/// Tables leave out the type column when `schema` has none.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_listing(
    out: &mut impl Write,
    rented: &[RentedCar],
    available: &[AvailableCar],
    schema: &Schema,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let listing = json!({ "rented": rented, "available": available });
            writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        }
        OutputFormat::Plain | OutputFormat::Table => {
            writeln!(out, "Rented cars:")?;
            write_rented(out, rented, schema, format)?;
            writeln!(out)?;
            writeln!(out, "Available cars:")?;
            let available: Vec<&AvailableCar> = available.iter().collect();
            write_available(out, &available, schema, format)?;
        }
    }
    Ok(())
}

/// Write the rented collection.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_rented(
    out: &mut impl Write,
    cars: &[RentedCar],
    schema: &Schema,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(cars)?)?,
        OutputFormat::Plain => {
            for car in cars {
                writeln!(out, "{car}")?;
            }
        }
        OutputFormat::Table => {
            let rows = cars
                .iter()
                .map(|car| {
                    vec![
                        car.car_name.clone(),
                        car.car_type.clone().unwrap_or_default(),
                        car.plate_number.clone(),
                        car.renter_name.clone(),
                        car.start_date.format(DATE_FORMAT).to_string(),
                        car.end_date.format(DATE_FORMAT).to_string(),
                    ]
                })
                .collect::<Vec<_>>();
            write_table(out, &RENTED_COLUMNS, &rows, schema)?;
        }
    }
    Ok(())
}

/// Write a set of pool cars.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_available(
    out: &mut impl Write,
    cars: &[&AvailableCar],
    schema: &Schema,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(cars)?)?,
        OutputFormat::Plain => {
            for car in cars {
                writeln!(out, "{car}")?;
            }
        }
        OutputFormat::Table => {
            let rows = cars
                .iter()
                .map(|car| {
                    vec![
                        car.car_name.clone(),
                        car.car_type.clone().unwrap_or_default(),
                        car.plate_number.clone(),
                        car.status.to_string(),
                    ]
                })
                .collect::<Vec<_>>();
            write_table(out, &AVAILABLE_COLUMNS, &rows, schema)?;
        }
    }
    Ok(())
}

/// Column index of TYPE in both tables.
const TYPE_COLUMN: usize = 1;

fn write_table(
    out: &mut impl Write,
    headers: &[&str],
    rows: &[Vec<String>],
    schema: &Schema,
) -> Result<()> {
    let mut header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    let mut rows = rows.to_vec();
    if !schema.car_type_column {
        header.remove(TYPE_COLUMN);
        for row in &mut rows {
            row.remove(TYPE_COLUMN);
        }
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

//! Positional mapping between data file rows and records.

use chrono::NaiveDate;
use csv::StringRecord;

use super::schema::Schema;
use crate::car::{AvailableCar, CarStatus, RentedCar, DATE_FORMAT};

/// A record that is stored as one delimited row.
///
/// Parse failures are reported as a plain reason string; the store decides
/// whether a bad row is skipped or aborts the load.
pub(crate) trait Row: Sized {
    /// Header row for this record kind.
    fn header(schema: &Schema) -> Vec<&'static str>;

    /// Build a record from a row.
    fn from_row(row: &StringRecord, schema: &Schema) -> Result<Self, String>;

    /// Render the record as a row, in header order.
    fn to_row(&self, schema: &Schema) -> Vec<String>;

    /// The plate number, used for uniqueness checks.
    fn plate(&self) -> &str;
}

/// Identity columns shared by both layouts.
struct Identity<'a> {
    car_name: &'a str,
    car_type: Option<&'a str>,
    plate_number: &'a str,
}

fn check_width(row: &StringRecord, expected: usize) -> Result<(), String> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} columns, found {}", row.len()))
    }
}

fn read_identity<'a>(row: &'a StringRecord, schema: &Schema) -> Result<Identity<'a>, String> {
    let car_type = if schema.car_type_column {
        Some(&row[1]).filter(|t| !t.is_empty())
    } else {
        None
    };
    let plate_number = &row[schema.after_identity() - 1];
    if plate_number.is_empty() {
        return Err("empty plate number".to_string());
    }
    Ok(Identity {
        car_name: &row[0],
        car_type,
        plate_number,
    })
}

fn write_identity(
    schema: &Schema,
    car_name: &str,
    car_type: Option<&String>,
    plate_number: &str,
) -> Vec<String> {
    let mut out = vec![car_name.to_string()];
    if schema.car_type_column {
        out.push(car_type.cloned().unwrap_or_default());
    }
    out.push(plate_number.to_string());
    out
}

fn parse_date(field: &str, what: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(field, DATE_FORMAT)
        .map_err(|err| format!("invalid {what} {field:?}: {err}"))
}

impl Row for RentedCar {
    fn header(schema: &Schema) -> Vec<&'static str> {
        schema.rented_header()
    }

    fn from_row(row: &StringRecord, schema: &Schema) -> Result<Self, String> {
        check_width(row, schema.rented_width())?;
        let identity = read_identity(row, schema)?;
        let at = schema.after_identity();

        let start_date = parse_date(&row[at + 1], "start date")?;
        let end_date = parse_date(&row[at + 2], "end date")?;
        if end_date < start_date {
            return Err(format!("end date {end_date} is before start date {start_date}"));
        }

        Ok(Self {
            car_name: identity.car_name.to_string(),
            car_type: identity.car_type.map(str::to_string),
            plate_number: identity.plate_number.to_string(),
            renter_name: row[at].to_string(),
            start_date,
            end_date,
        })
    }

    fn to_row(&self, schema: &Schema) -> Vec<String> {
        let mut out = write_identity(
            schema,
            &self.car_name,
            self.car_type.as_ref(),
            &self.plate_number,
        );
        out.push(self.renter_name.clone());
        out.push(self.start_date.format(DATE_FORMAT).to_string());
        out.push(self.end_date.format(DATE_FORMAT).to_string());
        out
    }

    fn plate(&self) -> &str {
        &self.plate_number
    }
}

impl Row for AvailableCar {
    fn header(schema: &Schema) -> Vec<&'static str> {
        schema.available_header()
    }

    fn from_row(row: &StringRecord, schema: &Schema) -> Result<Self, String> {
        check_width(row, schema.available_width())?;
        let identity = read_identity(row, schema)?;

        Ok(Self {
            car_name: identity.car_name.to_string(),
            car_type: identity.car_type.map(str::to_string),
            plate_number: identity.plate_number.to_string(),
            status: CarStatus::parse(&row[schema.after_identity()]),
        })
    }

    fn to_row(&self, schema: &Schema) -> Vec<String> {
        let mut out = write_identity(
            schema,
            &self.car_name,
            self.car_type.as_ref(),
            &self.plate_number,
        );
        out.push(self.status.label().to_string());
        out
    }

    fn plate(&self) -> &str {
        &self.plate_number
    }
}

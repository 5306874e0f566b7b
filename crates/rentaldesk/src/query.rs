//! Lookups and replacement selection over the record collections.
//!
//! Everything here preserves collection order, which is the order the
//! records were loaded in.

use tracing::warn;

use crate::car::{AvailableCar, RentedCar};
use crate::store::Schema;

/// Find a rented car by plate.
#[must_use]
pub fn find_rented<'a>(rented: &'a [RentedCar], plate: &str) -> Option<&'a RentedCar> {
    rented.iter().find(|car| car.plate_number == plate)
}

/// Find a car in the pool by plate.
#[must_use]
pub fn find_available<'a>(available: &'a [AvailableCar], plate: &str) -> Option<&'a AvailableCar> {
    available.iter().find(|car| car.plate_number == plate)
}

/// Check whether a pool car may replace a car of the given type.
///
/// Damaged cars never qualify. The type only matters when the schema tracks
/// it and a type is given.
#[must_use]
pub fn is_eligible(car: &AvailableCar, car_type: Option<&str>, schema: &Schema) -> bool {
    if car.status.is_damaged() {
        return false;
    }
    match car_type {
        Some(wanted) if schema.matches_type() => car.car_type.as_deref() == Some(wanted),
        _ => true,
    }
}

/// Cars that may replace a car of the given type, in collection order.
#[must_use]
pub fn eligible_replacements<'a>(
    available: &'a [AvailableCar],
    car_type: Option<&str>,
    schema: &Schema,
) -> Vec<&'a AvailableCar> {
    available
        .iter()
        .filter(|car| is_eligible(car, car_type, schema))
        .collect()
}

/// Remove and return the first car that may replace a car of the given type.
///
/// Returns `None`, and logs a warning, when nothing qualifies.
pub fn take_next_replacement(
    available: &mut Vec<AvailableCar>,
    car_type: Option<&str>,
    schema: &Schema,
) -> Option<AvailableCar> {
    let Some(index) = available
        .iter()
        .position(|car| is_eligible(car, car_type, schema))
    else {
        warn!("No replacement car available");
        return None;
    };
    Some(available.remove(index))
}

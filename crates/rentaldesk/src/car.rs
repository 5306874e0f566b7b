//! Core record types for rentaldesk.
//!
//! This module defines the two kinds of records the desk keeps: cars that
//! are out with a renter and cars sitting in the pool.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status label for a car that can be handed out.
pub const STATUS_AVAILABLE: &str = "Tersedia";

/// Status label for a car that is damaged or at the mechanic.
pub const STATUS_DAMAGED: &str = "Rusak/Mekanik";

/// Date format used in the data files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The status of a car in the available pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CarStatus {
    /// Ready to be handed out.
    Available,
    /// Damaged or out of service; never offered as a replacement.
    Damaged,
    /// Any other free-text status, kept verbatim.
    Other(String),
}

impl CarStatus {
    /// Parse a status label. Known labels match case-insensitively.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case(STATUS_AVAILABLE) {
            Self::Available
        } else if label.eq_ignore_ascii_case(STATUS_DAMAGED) {
            Self::Damaged
        } else {
            Self::Other(label.to_string())
        }
    }

    /// The label written to the data file.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Available => STATUS_AVAILABLE,
            Self::Damaged => STATUS_DAMAGED,
            Self::Other(label) => label,
        }
    }

    /// Check if this status marks the car as damaged.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        matches!(self, Self::Damaged)
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for CarStatus {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<CarStatus> for String {
    fn from(status: CarStatus) -> Self {
        status.label().to_string()
    }
}

/// The identity of a physical car: what moves during a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarIdentity {
    /// Make and model, e.g. "Toyota Avanza".
    pub car_name: String,
    /// Vehicle class, when the deployment tracks it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    /// Registration plate.
    pub plate_number: String,
}

impl fmt::Display for CarIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.car_name, self.plate_number)
    }
}

/// A car currently assigned to a renter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentedCar {
    /// Make and model.
    pub car_name: String,
    /// Vehicle class, when tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    /// Registration plate; unique within the rented set.
    pub plate_number: String,
    /// Who has the car.
    pub renter_name: String,
    /// First day of the rental.
    pub start_date: NaiveDate,
    /// Day the car is due back.
    pub end_date: NaiveDate,
}

impl RentedCar {
    /// The identity fields of this record.
    #[must_use]
    pub fn identity(&self) -> CarIdentity {
        CarIdentity {
            car_name: self.car_name.clone(),
            car_type: self.car_type.clone(),
            plate_number: self.plate_number.clone(),
        }
    }

    /// Overwrite the identity fields, leaving renter and dates untouched.
    pub fn assign_identity(&mut self, identity: CarIdentity) {
        self.car_name = identity.car_name;
        self.car_type = identity.car_type;
        self.plate_number = identity.plate_number;
    }
}

impl fmt::Display for RentedCar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} from {} to {}",
            self.car_name,
            self.plate_number,
            self.renter_name,
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT),
        )?;
        if let Some(car_type) = &self.car_type {
            write!(f, " - type: {car_type}")?;
        }
        Ok(())
    }
}

/// A car in the pool, eligible or not for handing out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableCar {
    /// Make and model.
    pub car_name: String,
    /// Vehicle class, when tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    /// Registration plate; unique within the available set.
    pub plate_number: String,
    /// Whether the car can be handed out.
    pub status: CarStatus,
}

impl AvailableCar {
    /// Create a pool entry from a car identity.
    #[must_use]
    pub fn from_identity(identity: CarIdentity, status: CarStatus) -> Self {
        Self {
            car_name: identity.car_name,
            car_type: identity.car_type,
            plate_number: identity.plate_number,
            status,
        }
    }

    /// The identity fields of this record.
    #[must_use]
    pub fn identity(&self) -> CarIdentity {
        CarIdentity {
            car_name: self.car_name.clone(),
            car_type: self.car_type.clone(),
            plate_number: self.plate_number.clone(),
        }
    }
}

impl fmt::Display for AvailableCar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - status: {}",
            self.car_name, self.plate_number, self.status
        )?;
        if let Some(car_type) = &self.car_type {
            write!(f, " - type: {car_type}")?;
        }
        Ok(())
    }
}

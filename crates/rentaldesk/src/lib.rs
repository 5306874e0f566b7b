//! `rentaldesk` - Record keeping for a car rental desk
//!
//! This library tracks which cars are out with renters and which are in the
//! pool, swaps a rented car for a pool car of the same type, and keeps both
//! collections in sync with two delimited data files.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod car;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;

pub use car::{AvailableCar, CarIdentity, CarStatus, RentedCar};
pub use config::Config;
pub use desk::{Desk, Replacement};
pub use error::{Collection, Error, Result};
pub use logging::init_logging;
pub use store::{LoadWarning, Loaded, RecordStore, Schema};

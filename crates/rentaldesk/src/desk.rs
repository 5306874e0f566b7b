//! The rental desk: in-memory collections plus the operations that change them.
//!
//! Every mutation validates first and only then touches state, so a rejected
//! operation leaves both collections exactly as they were. Successful
//! replacements rewrite both data files, rented first. The two writes are not
//! atomic as a pair.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::car::{AvailableCar, CarIdentity, CarStatus, RentedCar};
use crate::error::{Collection, Error, Result};
use crate::query;
use crate::store::{LoadWarning, RecordStore};

/// Outcome of a successful replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    /// The car taken back from the renter, now marked damaged.
    pub old: CarIdentity,
    /// The car handed out in its place.
    pub new: CarIdentity,
    /// Who is driving the new car.
    pub renter_name: String,
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car {} has been replaced with {} for {}",
            self.old, self.new, self.renter_name
        )
    }
}

/// The rented and available collections, backed by a [`RecordStore`].
#[derive(Debug)]
pub struct Desk {
    store: RecordStore,
    rented: Vec<RentedCar>,
    available: Vec<AvailableCar>,
    persist_returns: bool,
}

impl Desk {
    /// Wrap collections that are already in memory.
    #[must_use]
    pub fn new(store: RecordStore, rented: Vec<RentedCar>, available: Vec<AvailableCar>) -> Self {
        Self {
            store,
            rented,
            available,
            persist_returns: false,
        }
    }

    /// Load both collections from the store.
    ///
    /// Returns the desk together with every non-fatal problem found while
    /// loading. A plate that shows up in both files stays rented and is left
    /// out of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if a data file cannot be read, or if a row is
    /// malformed and the store is in strict mode.
    pub fn open(store: RecordStore) -> Result<(Self, Vec<LoadWarning>)> {
        let rented = store.load_rented()?;
        let available = store.load_available()?;

        let mut warnings = rented.warnings;
        warnings.extend(available.warnings);

        let rented_plates: HashSet<&str> = rented
            .records
            .iter()
            .map(|car| car.plate_number.as_str())
            .collect();
        let mut pool = available.records;
        pool.retain(|car| {
            if rented_plates.contains(car.plate_number.as_str()) {
                warn!(
                    "Plate {} is both rented and available, keeping the rental",
                    car.plate_number
                );
                warnings.push(LoadWarning::CrossCollectionDuplicate {
                    plate: car.plate_number.clone(),
                });
                false
            } else {
                true
            }
        });

        Ok((Self::new(store, rented.records, pool), warnings))
    }

    /// Write the pool to disk after every return.
    #[must_use]
    pub fn with_persist_returns(mut self, persist: bool) -> Self {
        self.persist_returns = persist;
        self
    }

    /// Cars currently out with renters.
    #[must_use]
    pub fn rented(&self) -> &[RentedCar] {
        &self.rented
    }

    /// Cars in the pool, damaged ones included.
    #[must_use]
    pub fn available(&self) -> &[AvailableCar] {
        &self.available
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Cars that may replace the rented car with the given plate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no rented car has that plate.
    pub fn eligible_replacements_for(&self, rented_plate: &str) -> Result<Vec<&AvailableCar>> {
        let rented = query::find_rented(&self.rented, rented_plate)
            .ok_or_else(|| Error::not_found(rented_plate, Collection::Rented))?;
        Ok(query::eligible_replacements(
            &self.available,
            rented.car_type.as_deref(),
            self.store.schema(),
        ))
    }

    /// Swap a rented car for a car from the pool.
    ///
    /// The replacement leaves the pool, the old car goes back into it marked
    /// damaged, and the rental keeps its renter and dates under the new
    /// car's identity. Both files are rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either plate is unknown,
    /// [`Error::InvalidState`] if the replacement is damaged and
    /// [`Error::TypeMismatch`] if the types differ while types are tracked.
    /// Nothing changes in those cases. Write failures are returned after the
    /// in-memory swap has happened.
    pub fn replace(&mut self, rented_plate: &str, replacement_plate: &str) -> Result<Replacement> {
        let rented_idx = self.rented_index(rented_plate)?;
        let replacement_idx = self
            .available
            .iter()
            .position(|car| car.plate_number == replacement_plate)
            .ok_or_else(|| Error::not_found(replacement_plate, Collection::Available))?;

        let candidate = &self.available[replacement_idx];
        if candidate.status.is_damaged() {
            return Err(Error::InvalidState {
                plate: candidate.plate_number.clone(),
                status: candidate.status.to_string(),
            });
        }
        self.check_type(&self.rented[rented_idx], candidate)?;

        let replacement = self.available.remove(replacement_idx);
        self.swap_in(rented_idx, replacement)
    }

    /// Swap a rented car for the first eligible car in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the rented plate is unknown and
    /// [`Error::NoReplacementAvailable`] if nothing in the pool qualifies.
    pub fn replace_with_next(&mut self, rented_plate: &str) -> Result<Replacement> {
        let rented_idx = self.rented_index(rented_plate)?;
        let replacement = query::take_next_replacement(
            &mut self.available,
            self.rented[rented_idx].car_type.as_deref(),
            self.store.schema(),
        )
        .ok_or_else(|| Error::NoReplacementAvailable {
            plate: rented_plate.to_string(),
        })?;
        self.swap_in(rented_idx, replacement)
    }

    /// Put a car back into the pool as available.
    ///
    /// The entry is accepted as given; plates are not checked against either
    /// collection. Returns whether the pool was written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if returns are persisted and the write fails.
    pub fn return_car(
        &mut self,
        car_name: &str,
        plate_number: &str,
        car_type: Option<&str>,
    ) -> Result<bool> {
        self.available.push(AvailableCar {
            car_name: car_name.to_string(),
            car_type: car_type.map(str::to_string),
            plate_number: plate_number.to_string(),
            status: CarStatus::Available,
        });
        info!("Returned {} ({}) to the pool", car_name, plate_number);

        if self.persist_returns {
            self.store.save_available(&self.available)?;
            Ok(true)
        } else {
            debug!("Return of {} kept in memory only", plate_number);
            Ok(false)
        }
    }

    /// Rewrite both data files from memory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.store.save_rented(&self.rented)?;
        self.store.save_available(&self.available)
    }

    fn rented_index(&self, plate: &str) -> Result<usize> {
        self.rented
            .iter()
            .position(|car| car.plate_number == plate)
            .ok_or_else(|| Error::not_found(plate, Collection::Rented))
    }

    fn check_type(&self, rented: &RentedCar, candidate: &AvailableCar) -> Result<()> {
        let rented_type = rented.car_type.as_deref();
        if query::is_eligible(candidate, rented_type, self.store.schema()) {
            return Ok(());
        }
        Err(Error::TypeMismatch {
            rented_plate: rented.plate_number.clone(),
            rented_type: rented_type.unwrap_or_default().to_string(),
            replacement_plate: candidate.plate_number.clone(),
            replacement_type: candidate
                .car_type
                .clone()
                .unwrap_or_else(|| "car of unknown type".to_string()),
        })
    }

    fn swap_in(&mut self, rented_idx: usize, replacement: AvailableCar) -> Result<Replacement> {
        let new = replacement.identity();
        let rented = &mut self.rented[rented_idx];
        let old = rented.identity();
        let renter_name = rented.renter_name.clone();
        rented.assign_identity(new.clone());

        // A returned entry for the same plate would shadow the damaged one on reload
        self.available
            .retain(|car| car.plate_number != old.plate_number);
        self.available
            .push(AvailableCar::from_identity(old.clone(), CarStatus::Damaged));

        self.save()?;

        let outcome = Replacement {
            old,
            new,
            renter_name,
        };
        info!("{}", outcome);
        Ok(outcome)
    }
}

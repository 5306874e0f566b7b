//! Column layout of the rental data files.
//!
//! Deployments differ in whether they keep a car type column and whether the
//! available file is filtered down to ready cars at load time. Both are
//! captured here instead of in separate code paths.

use serde::{Deserialize, Serialize};

/// Header for the car name column.
pub const HEADER_CAR_NAME: &str = "Jenis Mobil";
/// Header for the car type column.
pub const HEADER_CAR_TYPE: &str = "Tipe Mobil";
/// Header for the plate number column.
pub const HEADER_PLATE: &str = "Nomor Polisi";
/// Header for the renter column.
pub const HEADER_RENTER: &str = "Penyewa";
/// Header for the rental start date column.
pub const HEADER_START: &str = "Tanggal Sewa";
/// Header for the rental end date column.
pub const HEADER_END: &str = "Tanggal Kembali";
/// Header for the status column.
pub const HEADER_STATUS: &str = "Status";

/// Layout and load behaviour of the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    /// Both files carry a car type column after the car name.
    /// Replacement candidates are matched on type only when this is set.
    pub car_type_column: bool,
    /// Drop every available row whose status is not "Tersedia" at load.
    pub available_only_at_load: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            car_type_column: true,
            available_only_at_load: false,
        }
    }
}

impl Schema {
    /// Check if replacements must share the rented car's type.
    #[must_use]
    pub fn matches_type(&self) -> bool {
        self.car_type_column
    }

    /// Header row of the rented file.
    #[must_use]
    pub fn rented_header(&self) -> Vec<&'static str> {
        let mut header = vec![HEADER_CAR_NAME];
        if self.car_type_column {
            header.push(HEADER_CAR_TYPE);
        }
        header.extend([HEADER_PLATE, HEADER_RENTER, HEADER_START, HEADER_END]);
        header
    }

    /// Header row of the available file.
    #[must_use]
    pub fn available_header(&self) -> Vec<&'static str> {
        let mut header = vec![HEADER_CAR_NAME];
        if self.car_type_column {
            header.push(HEADER_CAR_TYPE);
        }
        header.extend([HEADER_PLATE, HEADER_STATUS]);
        header
    }

    /// Number of columns in a rented row.
    #[must_use]
    pub fn rented_width(&self) -> usize {
        self.rented_header().len()
    }

    /// Number of columns in an available row.
    #[must_use]
    pub fn available_width(&self) -> usize {
        self.available_header().len()
    }

    /// Index of the first column after the identity columns.
    pub(crate) fn after_identity(&self) -> usize {
        if self.car_type_column {
            3
        } else {
            2
        }
    }
}

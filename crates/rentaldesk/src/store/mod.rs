//! Storage layer for rentaldesk.
//!
//! This module loads and saves the two record collections from delimited
//! text files. Every save rewrites the whole file; nothing is appended.

mod row;
pub mod schema;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::car::{AvailableCar, CarStatus, RentedCar};
use crate::config::Config;
use crate::error::{Error, Result};

use row::Row;
pub use schema::Schema;

/// A non-fatal problem found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The data file does not exist; the collection starts empty.
    FileMissing {
        /// Path that was looked for.
        path: PathBuf,
    },
    /// A malformed row was left out.
    RowSkipped {
        /// Data file the row came from.
        path: PathBuf,
        /// One-based line number.
        line: u64,
        /// What was wrong with it.
        reason: String,
    },
    /// An available row was left out because its plate is already rented.
    CrossCollectionDuplicate {
        /// The plate found in both files.
        plate: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMissing { path } => {
                write!(f, "{} not found, starting with no records", path.display())
            }
            Self::RowSkipped { path, line, reason } => {
                write!(f, "{}:{line}: skipped row: {reason}", path.display())
            }
            Self::CrossCollectionDuplicate { plate } => {
                write!(f, "{plate} is both rented and available, keeping the rental")
            }
        }
    }
}

/// Records read from one data file, plus whatever was wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// Records in file order.
    pub records: Vec<T>,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<LoadWarning>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// File-backed store for the rented and available collections.
#[derive(Debug, Clone)]
pub struct RecordStore {
    rented_path: PathBuf,
    available_path: PathBuf,
    schema: Schema,
    strict_rows: bool,
}

impl RecordStore {
    /// Create a store over the given files.
    ///
    /// Nothing is read until one of the load methods is called.
    #[must_use]
    pub fn new(
        rented_path: impl Into<PathBuf>,
        available_path: impl Into<PathBuf>,
        schema: Schema,
    ) -> Self {
        Self {
            rented_path: rented_path.into(),
            available_path: available_path.into(),
            schema,
            strict_rows: false,
        }
    }

    /// Create a store from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rented_path(), config.available_path(), config.schema)
            .with_strict_rows(config.storage.strict_rows)
    }

    /// Abort loading on the first malformed row instead of skipping it.
    #[must_use]
    pub fn with_strict_rows(mut self, strict: bool) -> Self {
        self.strict_rows = strict;
        self
    }

    /// Path of the rented file.
    #[must_use]
    pub fn rented_path(&self) -> &Path {
        &self.rented_path
    }

    /// Path of the available file.
    #[must_use]
    pub fn available_path(&self) -> &Path {
        &self.available_path
    }

    /// The column layout in use.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Load the cars currently out with renters.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or if a row is malformed
    /// and strict rows are enabled. A missing file is not an error.
    pub fn load_rented(&self) -> Result<Loaded<RentedCar>> {
        let loaded = self.load(&self.rented_path)?;
        info!(
            "Loaded {} rented cars from {}",
            loaded.records.len(),
            self.rented_path.display()
        );
        Ok(loaded)
    }

    /// Load the cars in the pool.
    ///
    /// When the schema asks for it, only cars marked available are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or if a row is malformed
    /// and strict rows are enabled. A missing file is not an error.
    pub fn load_available(&self) -> Result<Loaded<AvailableCar>> {
        let mut loaded: Loaded<AvailableCar> = self.load(&self.available_path)?;

        if self.schema.available_only_at_load {
            let before = loaded.records.len();
            loaded
                .records
                .retain(|car| car.status == CarStatus::Available);
            let dropped = before - loaded.records.len();
            if dropped > 0 {
                debug!("Dropped {} cars not marked available", dropped);
            }
        }

        info!(
            "Loaded {} available cars from {}",
            loaded.records.len(),
            self.available_path.display()
        );
        Ok(loaded)
    }

    /// Rewrite the rented file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_rented(&self, cars: &[RentedCar]) -> Result<()> {
        self.save(&self.rented_path, cars)
    }

    /// Rewrite the available file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_available(&self, cars: &[AvailableCar]) -> Result<()> {
        self.save(&self.available_path, cars)
    }

    fn load<T: Row>(&self, path: &Path) -> Result<Loaded<T>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Data file {} not found, starting empty", path.display());
                return Ok(Loaded {
                    records: Vec::new(),
                    warnings: vec![LoadWarning::FileMissing {
                        path: path.to_path_buf(),
                    }],
                });
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut loaded = Loaded::default();
        let mut plates = HashSet::new();

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    // Errors tied to a record (bad UTF-8) reject that row only
                    let Some(line) = err.position().map(csv::Position::line) else {
                        return Err(err.into());
                    };
                    self.reject_row(path, line, unreadable_reason(&err), &mut loaded)?;
                    continue;
                }
            };
            let line = row.position().map_or(0, csv::Position::line);

            let parsed = T::from_row(&row, &self.schema).and_then(|record| {
                if plates.insert(record.plate().to_string()) {
                    Ok(record)
                } else {
                    Err(format!("duplicate plate number {}", record.plate()))
                }
            });

            match parsed {
                Ok(record) => loaded.records.push(record),
                Err(reason) => self.reject_row(path, line, reason, &mut loaded)?,
            }
        }

        Ok(loaded)
    }

    /// Skip a malformed row with a warning, or fail the load in strict mode.
    fn reject_row<T>(
        &self,
        path: &Path,
        line: u64,
        reason: String,
        loaded: &mut Loaded<T>,
    ) -> Result<()> {
        if self.strict_rows {
            return Err(Error::parse(path, line, reason));
        }
        warn!("{}:{}: skipping row: {}", path.display(), line, reason);
        loaded.warnings.push(LoadWarning::RowSkipped {
            path: path.to_path_buf(),
            line,
            reason,
        });
        Ok(())
    }

    fn save<T: Row>(&self, path: &Path, records: &[T]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let persist_err = |source: io::Error| Error::Persist {
            path: path.to_path_buf(),
            source,
        };

        let tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
        let mut writer = csv::Writer::from_writer(tmp);
        writer.write_record(T::header(&self.schema))?;
        for record in records {
            writer.write_record(record.to_row(&self.schema))?;
        }
        let tmp = writer
            .into_inner()
            .map_err(|err| persist_err(err.into_error()))?;
        tmp.persist(path).map_err(|err| persist_err(err.error))?;

        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }
}

fn unreadable_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Utf8 { err, .. } => {
            format!("invalid UTF-8 in column {}", err.field() + 1)
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    const RENTED_CSV: &str = "\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Penyewa,Tanggal Sewa,Tanggal Kembali
Avanza,MPV,B 1 AA,Budi,2024-01-01,2024-01-05
Jazz,Hatchback,B 2 BB,Sari,2024-02-10,2024-02-12
";

    const AVAILABLE_CSV: &str = "\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Status
Xenia,MPV,D 3 CC,Tersedia
Brio,Hatchback,D 4 DD,Rusak/Mekanik
Ertiga,MPV,D 5 EE,tersedia
";

    fn store_in(dir: &TempDir) -> RecordStore {
        RecordStore::new(
            dir.path().join("mobil_dipakai.csv"),
            dir.path().join("mobil_tersedia.csv"),
            Schema::default(),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_rented() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.rented_path(), RENTED_CSV).unwrap();

        let loaded = store.load_rented().unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].plate_number, "B 1 AA");
        assert_eq!(loaded.records[1].renter_name, "Sari");
        assert_eq!(loaded.records[1].start_date, date("2024-02-10"));
    }

    #[test]
    fn test_load_available_keeps_all_by_default() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.available_path(), AVAILABLE_CSV).unwrap();

        let loaded = store.load_available().unwrap();
        assert_eq!(loaded.records.len(), 3);
        assert_eq!(loaded.records[1].status, CarStatus::Damaged);
        assert_eq!(loaded.records[2].status, CarStatus::Available);
    }

    #[test]
    fn test_load_available_only_at_load() {
        let dir = tempdir().unwrap();
        let schema = Schema {
            available_only_at_load: true,
            ..Schema::default()
        };
        let store = RecordStore::new(
            dir.path().join("r.csv"),
            dir.path().join("a.csv"),
            schema,
        );
        std::fs::write(store.available_path(), AVAILABLE_CSV).unwrap();

        let loaded = store.load_available().unwrap();
        let plates: Vec<_> = loaded.records.iter().map(|c| c.plate_number.as_str()).collect();
        assert_eq!(plates, vec!["D 3 CC", "D 5 EE"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let loaded = store.load_rented().unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::FileMissing {
                path: store.rented_path().to_path_buf()
            }]
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.rented_path(),
            "\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Penyewa,Tanggal Sewa,Tanggal Kembali
Avanza,MPV,B 1 AA,Budi,2024-01-01,2024-01-05
Jazz,Hatchback,B 2 BB,Sari,someday,2024-02-12
Ayla,City,B 3 CC
Avanza,MPV,B 1 AA,Tono,2024-03-01,2024-03-02
",
        )
        .unwrap();

        let loaded = store.load_rented().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.warnings.len(), 3);

        let lines: Vec<u64> = loaded
            .warnings
            .iter()
            .map(|w| match w {
                LoadWarning::RowSkipped { line, .. } => *line,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(loaded.warnings[2].to_string().contains("duplicate plate"));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let mut bytes = b"\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Penyewa,Tanggal Sewa,Tanggal Kembali
Avanza,MPV,B 1 AA,Budi,2024-01-01,2024-01-05
Jazz,Hatchback,B 2 BB,"
            .to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.extend_from_slice(
            b",2024-02-10,2024-02-12
Ayla,City,B 3 CC,Tono,2024-03-01,2024-03-02
",
        );
        std::fs::write(store.rented_path(), bytes).unwrap();

        let loaded = store.load_rented().unwrap();
        let plates: Vec<_> = loaded.records.iter().map(|c| c.plate_number.as_str()).collect();
        assert_eq!(plates, vec!["B 1 AA", "B 3 CC"]);
        assert_eq!(loaded.warnings.len(), 1);
        match &loaded.warnings[0] {
            LoadWarning::RowSkipped { line, reason, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(reason, "invalid UTF-8 in column 4");
            }
            other => panic!("unexpected warning {other:?}"),
        }

        let err = store.with_strict_rows(true).load_rented().unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_strict_rows_abort() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir).with_strict_rows(true);
        std::fs::write(
            store.rented_path(),
            "\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Penyewa,Tanggal Sewa,Tanggal Kembali
Jazz,Hatchback,B 2 BB,Sari,2024-13-40,2024-02-12
",
        )
        .unwrap();

        let err = store.load_rented().unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.rented_path(), RENTED_CSV).unwrap();
        std::fs::write(store.available_path(), AVAILABLE_CSV).unwrap();

        let rented = store.load_rented().unwrap().records;
        let available = store.load_available().unwrap().records;

        let copy = RecordStore::new(
            dir.path().join("copy_rented.csv"),
            dir.path().join("copy_available.csv"),
            Schema::default(),
        );
        copy.save_rented(&rented).unwrap();
        copy.save_available(&available).unwrap();

        assert_eq!(copy.load_rented().unwrap().records, rented);
        assert_eq!(copy.load_available().unwrap().records, available);
    }

    #[test]
    fn test_save_writes_header_and_canonical_dates() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let cars = vec![RentedCar {
            car_name: "Avanza".to_string(),
            car_type: Some("MPV".to_string()),
            plate_number: "B 1 AA".to_string(),
            renter_name: "Budi, Jr.".to_string(),
            start_date: date("2024-01-01"),
            end_date: date("2024-01-05"),
        }];

        store.save_rented(&cars).unwrap();

        let written = std::fs::read_to_string(store.rented_path()).unwrap();
        assert_eq!(
            written,
            "\
Jenis Mobil,Tipe Mobil,Nomor Polisi,Penyewa,Tanggal Sewa,Tanggal Kembali
Avanza,MPV,B 1 AA,\"Budi, Jr.\",2024-01-01,2024-01-05
"
        );
    }

    #[test]
    fn test_save_replaces_whole_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.available_path(), AVAILABLE_CSV).unwrap();

        store.save_available(&[]).unwrap();

        let written = std::fs::read_to_string(store.available_path()).unwrap();
        assert_eq!(written, "Jenis Mobil,Tipe Mobil,Nomor Polisi,Status\n");
    }

    #[test]
    fn test_save_without_type_column() {
        let dir = tempdir().unwrap();
        let schema = Schema {
            car_type_column: false,
            ..Schema::default()
        };
        let store = RecordStore::new(
            dir.path().join("r.csv"),
            dir.path().join("a.csv"),
            schema,
        );
        let cars = vec![AvailableCar {
            car_name: "Brio".to_string(),
            car_type: Some("City".to_string()),
            plate_number: "D 9 ZZ".to_string(),
            status: CarStatus::Available,
        }];

        store.save_available(&cars).unwrap();

        let written = std::fs::read_to_string(store.available_path()).unwrap();
        assert_eq!(written, "Jenis Mobil,Nomor Polisi,Status\nBrio,D 9 ZZ,Tersedia\n");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(
            dir.path().join("nested/data/r.csv"),
            dir.path().join("nested/data/a.csv"),
            Schema::default(),
        );

        store.save_rented(&[]).unwrap();
        assert!(store.rented_path().exists());
    }

    #[test]
    fn test_load_warning_display() {
        let warning = LoadWarning::RowSkipped {
            path: PathBuf::from("mobil_dipakai.csv"),
            line: 4,
            reason: "expected 6 columns, found 3".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "mobil_dipakai.csv:4: skipped row: expected 6 columns, found 3"
        );
    }
}

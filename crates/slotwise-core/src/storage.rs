// Rust guideline compliant 2026-10-12

//! Storage module for JSONL file operations.
//!
//! Each file holds one record per line. Loading reads line by line and skips
//! malformed lines; saving rewrites the whole file through a temp file and an
//! atomic rename, so readers never observe a half-written collection.

use crate::models::{Booking, Provider, Service, Slot};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A record that can be persisted in a JSONL collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Unique identifier within the collection.
    fn id(&self) -> &str;

    /// Validates the record before it is written or after it is read.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem found.
    fn validate(&self) -> Result<()>;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn validate(&self) -> Result<()> {
                    <$ty>::validate(self)
                }
            }
        )*
    };
}

impl_record!(Provider, Service, Slot, Booking);

/// Storage engine for one JSONL collection.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Path to the JSONL file.
    path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path cannot be empty",
            )));
        }
        Ok(Self { path })
    }

    /// Returns a reference to the JSONL file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all records, one JSON document per line.
    ///
    /// A missing file is an empty collection. Blank lines are ignored and a
    /// malformed line is skipped with a warning; records after it still load.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or read
    /// - A well-formed record fails validation
    pub fn load_all<T: Record>(&self) -> Result<Vec<T>> {
        use std::fs::File;
        use std::io::{BufRead, BufReader};

        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(trimmed) {
                Ok(record) => {
                    record.validate()?;
                    records.push(record);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "skipping malformed JSON line"
                    );
                }
            }
        }

        Ok(records)
    }

    /// Loads a single record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for `entity` if no record carries the id.
    pub fn load_by_id<T: Record>(&self, entity: &'static str, id: &str) -> Result<T> {
        self.load_all::<T>()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| Error::not_found(entity, id))
    }

    /// Inserts or replaces a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the file cannot be written.
    pub fn upsert<T: Record>(&self, record: &T) -> Result<()> {
        record.validate()?;
        let mut records = self.load_all::<T>()?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(pos) => records[pos] = record.clone(),
            None => records.push(record.clone()),
        }
        self.save_all(&records)
    }

    /// Writes the whole collection atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any record is invalid or the file cannot be written.
    pub fn save_all<T: Record>(&self, records: &[T]) -> Result<()> {
        use std::fs::File;
        use std::io::Write;

        for record in records {
            record.validate()?;
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&temp_path)?;
            for record in records {
                let json = serde_json::to_string(record)?;
                file.write_all(json.as_bytes())?;
                file.write_all(b"\n")?;
            }
            file.sync_all()?;
        }

        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// Runs `f` while holding an exclusive lock on `lock_path`.
///
/// The call blocks until the lock is available, so it serializes both
/// threads and processes. The lock is released when `f` returns, whether
/// or not it succeeded.
///
/// # Errors
///
/// Returns `Unavailable` if the lock file cannot be opened or locked, or the
/// error returned by `f`.
pub fn with_file_lock<F, T>(lock_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    use fs2::FileExt;
    use std::fs::OpenOptions;

    let unavailable = |e: std::io::Error| {
        tracing::warn!(path = %lock_path.display(), error = %e, "failed to acquire lock");
        Error::Unavailable(format!("Failed to acquire lock {}: {}", lock_path.display(), e))
    };

    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent).map_err(unavailable)?;
    }
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)
        .map_err(unavailable)?;
    lock_file.lock_exclusive().map_err(unavailable)?;

    let result = f();

    let _ = lock_file.unlock();
    result
}

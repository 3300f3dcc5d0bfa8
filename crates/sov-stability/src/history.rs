// history.rs — Durable JSONL time series of stability measurements.
//
// Each sample is appended as one line. The file is opened per append so a
// scheduler invoking the monitor once a day holds no handle in between.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::StabilityError;
use crate::measurement::StabilityMeasurement;

/// Append-only measurement history.
#[derive(Debug, Clone)]
pub struct MeasurementHistory {
    path: PathBuf,
}

impl MeasurementHistory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one measurement.
    pub fn record(&self, measurement: &StabilityMeasurement) -> Result<(), StabilityError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StabilityError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StabilityError::IoError {
                path: self.path.clone(),
                source,
            })?;

        let json = serde_json::to_string(measurement)?;
        writeln!(file, "{}", json).map_err(|source| StabilityError::IoError {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// All measurements, oldest first by timestamp. Missing file ⇒ empty.
    pub fn load(&self) -> Result<Vec<StabilityMeasurement>, StabilityError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path).map_err(|source| StabilityError::IoError {
            path: self.path.clone(),
            source,
        })?;

        let mut measurements = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| StabilityError::IoError {
                path: self.path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StabilityMeasurement>(&line) {
                Ok(m) => measurements.push(m),
                Err(e) => tracing::warn!("skipping malformed stability measurement: {}", e),
            }
        }

        // Out-of-order appends are tolerated; analysis depends on time order.
        measurements.sort_by_key(|m| m.timestamp);
        Ok(measurements)
    }

    /// All measurements, newest first.
    pub fn load_newest_first(&self) -> Result<Vec<StabilityMeasurement>, StabilityError> {
        let mut measurements = self.load()?;
        measurements.reverse();
        Ok(measurements)
    }
}

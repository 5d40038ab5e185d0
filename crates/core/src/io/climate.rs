//! Ambient climate log
//!
//! The station records one temperature/pressure/humidity reading per photo in
//! `climate_log.csv`. The analysis never uses these values; they are joined to
//! report rows by image file name and passed through as-is.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One climate log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    #[serde(with = "log_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius
    pub temperature: f64,
    /// Hectopascal
    pub pressure: f64,
    /// Percent relative humidity
    pub humidity: f64,
    /// Photo taken with this reading (file name, possibly with a directory)
    pub image_path: String,
}

impl ClimateReading {
    /// Build a reading from raw sensor units (pressure in pascal), rounded to
    /// two decimals the way the station logs them.
    pub fn from_sensor(
        timestamp: NaiveDateTime,
        temperature_c: f64,
        pressure_pa: f64,
        humidity_rh: f64,
        image_path: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            temperature: round2(temperature_c),
            pressure: round2(pressure_pa / 100.0),
            humidity: round2(humidity_rh),
            image_path: image_path.into(),
        }
    }

    /// File-name part of `image_path`, used as the join key.
    pub fn image_name(&self) -> &str {
        Path::new(&self.image_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.image_path)
    }
}

/// Append a reading, writing the header first if the log is new or empty.
pub fn append_reading(path: &Path, reading: &ClimateReading) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    wtr.serialize(reading)?;
    wtr.flush()?;
    Ok(())
}

/// Read every reading in the log.
pub fn read_climate_log(path: &Path) -> Result<Vec<ClimateReading>> {
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    rdr.deserialize()
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Readings keyed by image file name. The latest reading wins on duplicates.
#[derive(Debug, Clone, Default)]
pub struct ClimateIndex {
    by_image: HashMap<String, ClimateReading>,
}

impl ClimateIndex {
    pub fn new(readings: Vec<ClimateReading>) -> Self {
        let mut by_image: HashMap<String, ClimateReading> = HashMap::new();
        for r in readings {
            let key = r.image_name().to_string();
            match by_image.get(&key) {
                Some(existing) if existing.timestamp > r.timestamp => {}
                _ => {
                    by_image.insert(key, r);
                }
            }
        }
        Self { by_image }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(read_climate_log(path)?))
    }

    pub fn lookup(&self, image_id: &str) -> Option<&ClimateReading> {
        self.by_image.get(image_id)
    }

    pub fn len(&self) -> usize {
        self.by_image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_image.is_empty()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

mod log_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&text, FORMAT).map_err(serde::de::Error::custom)
    }
}

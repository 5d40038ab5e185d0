//! Vegetation report and forecast tables (CSV)

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::write_atomic;
use crate::record::MetricRecord;

/// One row of the vegetation report.
///
/// Header: `Image,Area,Health,Height,Density,GrowthRate,Anomaly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub image: String,
    pub area: u64,
    pub health: f64,
    pub height: u32,
    pub density: f64,
    pub growth_rate: i64,
    /// 1 when flagged, else 0
    pub anomaly: u8,
}

impl ReportRow {
    pub fn record(&self) -> MetricRecord {
        MetricRecord {
            image_id: self.image.clone(),
            area: self.area,
            health: self.health,
            height: self.height,
            density: self.density,
        }
    }

    pub fn is_anomaly(&self) -> bool {
        self.anomaly != 0
    }
}

/// One row of the forecast table. `Observed` is empty past the last record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastRow {
    pub index: usize,
    pub predicted: f64,
    pub observed: Option<u64>,
}

/// Write the report table, replacing any previous one atomically.
///
/// `growth` must be index-aligned with `records`; `anomalies` holds indices
/// into `records`.
pub fn write_report(
    path: &Path,
    records: &[MetricRecord],
    growth: &[i64],
    anomalies: &[usize],
) -> Result<()> {
    if growth.len() != records.len() {
        return Err(Error::InvalidParameter {
            name: "growth",
            value: growth.len().to_string(),
            reason: format!("expected {} entries, one per record", records.len()),
        });
    }
    if let Some(&bad) = anomalies.iter().find(|&&i| i >= records.len()) {
        return Err(Error::InvalidParameter {
            name: "anomalies",
            value: bad.to_string(),
            reason: format!("index outside table of {} rows", records.len()),
        });
    }

    let rows = records.iter().zip(growth).enumerate().map(|(i, (r, &g))| ReportRow {
        image: r.image_id.clone(),
        area: r.area,
        health: r.health,
        height: r.height,
        density: r.density,
        growth_rate: g,
        anomaly: u8::from(anomalies.contains(&i)),
    });
    write_rows(path, rows)
}

/// Read a report table written by [`write_report`].
pub fn read_report(path: &Path) -> Result<Vec<ReportRow>> {
    read_rows(path)
}

/// Write the forecast table: one row per fitted index, with the observed
/// area alongside where one exists.
pub fn write_forecast(path: &Path, predicted: &[f64], observed: &[u64]) -> Result<()> {
    let rows = predicted.iter().enumerate().map(|(i, &p)| ForecastRow {
        index: i,
        predicted: p,
        observed: observed.get(i).copied(),
    });
    write_rows(path, rows)
}

/// Read a forecast table written by [`write_forecast`].
pub fn read_forecast(path: &Path) -> Result<Vec<ForecastRow>> {
    read_rows(path)
}

fn write_rows<T, I>(path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    write_atomic(path, |file| {
        let mut wtr = csv::Writer::from_writer(file);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    rdr.deserialize()
        .map(|row| row.map_err(Error::from))
        .collect()
}

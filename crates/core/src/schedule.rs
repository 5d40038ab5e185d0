//! Daily capture schedule
//!
//! Turns the station config into the list of wall-clock slots at which a
//! photo should be taken. The polling loop that fires captures is not part of
//! this crate; it only needs [`capture_times`] and [`due_capture`].

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// First slot of the day when photos are spread evenly.
const SPREAD_START_MINUTES: u32 = 6 * 60;
const MINUTES_PER_DAY: u32 = 24 * 60;
const MAX_PHOTOS_PER_DAY: i64 = 48;

/// Capture schedule section of the station config.
///
/// Keys missing from a config file are absent, not defaulted: a file that only
/// sets `photo_hour` schedules that hour. [`Default`] is the schedule used
/// when no file can be loaded at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Used only when neither `photo_times` nor `photo_hour` yields a slot
    #[serde(default = "one_per_day")]
    pub photos_per_day: i64,
    /// Explicit "HH:MM" slots; invalid entries are ignored
    #[serde(default)]
    pub photo_times: Option<Vec<String>>,
    /// Legacy single slot
    #[serde(default)]
    pub photo_hour: Option<i64>,
    #[serde(default)]
    pub photo_minute: Option<i64>,
}

fn enabled_by_default() -> bool {
    true
}

fn one_per_day() -> i64 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            photos_per_day: 1,
            photo_times: Some(vec!["08:00".to_string()]),
            photo_hour: Some(8),
            photo_minute: Some(0),
        }
    }
}

/// Today's capture slots, sorted and deduplicated.
///
/// Precedence: valid `photo_times` entries, then the legacy
/// `photo_hour`/`photo_minute` pair, then `photos_per_day` spread evenly
/// from 06:00.
pub fn capture_times(cfg: &ScheduleConfig) -> Vec<NaiveTime> {
    if let Some(times) = &cfg.photo_times {
        let mut slots: Vec<NaiveTime> = times.iter().filter_map(|t| parse_slot(t)).collect();
        if !slots.is_empty() {
            slots.sort();
            slots.dedup();
            return slots;
        }
    }

    if let Some(hour) = cfg.photo_hour
        && let Some(slot) = slot_from_parts(hour, cfg.photo_minute.unwrap_or(0))
    {
        return vec![slot];
    }

    let n = cfg.photos_per_day.clamp(1, MAX_PHOTOS_PER_DAY) as u32;
    let interval = MINUTES_PER_DAY / n;
    let mut slots: Vec<NaiveTime> = (0..n)
        .filter_map(|i| {
            let m = (SPREAD_START_MINUTES + i * interval) % MINUTES_PER_DAY;
            NaiveTime::from_hms_opt(m / 60, m % 60, 0)
        })
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

/// The slot that matches `now` to the minute and has not run yet today.
pub fn due_capture(
    cfg: &ScheduleConfig,
    now: NaiveDateTime,
    done: &HashSet<(NaiveDate, NaiveTime)>,
) -> Option<NaiveTime> {
    if !cfg.enabled {
        return None;
    }
    let today = now.date();
    capture_times(cfg).into_iter().find(|slot| {
        slot.hour() == now.hour()
            && slot.minute() == now.minute()
            && !done.contains(&(today, *slot))
    })
}

fn parse_slot(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if !text.contains(':') {
        return None;
    }
    let mut parts = text.split(':');
    let hour = parts.next()?.trim().parse().ok()?;
    let minute = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    slot_from_parts(hour, minute)
}

fn slot_from_parts(hour: i64, minute: i64) -> Option<NaiveTime> {
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return None;
    }
    NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
}

//! Capture-order derivation
//!
//! Time-series metrics are only meaningful if samples are processed in the
//! order they were taken. The strategy is explicit: the default parses a
//! timestamp out of every identifier and fails the whole batch if any one
//! cannot be parsed. Plain lexical order is available, but only on request.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::sample::{CaptureKey, ImageSource};

/// How capture order is derived for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingStrategy {
    /// Parse a date/time token from each identifier. Missing or malformed
    /// tokens abort the batch.
    #[default]
    FilenameDate,
    /// Use each file's last-modified time.
    FileModified,
    /// Sort by identifier. Only correct when names sort chronologically.
    Lexical,
    /// Keep the order the caller supplied.
    Explicit,
}

impl FromStr for OrderingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "date" | "filename" | "name-date" => Ok(Self::FilenameDate),
            "mtime" | "modified" => Ok(Self::FileModified),
            "lexical" | "name" => Ok(Self::Lexical),
            "explicit" | "given" => Ok(Self::Explicit),
            _ => Err(Error::InvalidParameter {
                name: "order",
                value: s.to_string(),
                reason: "expected date, mtime, lexical or explicit".into(),
            }),
        }
    }
}

/// A sample paired with the key it was ordered by.
#[derive(Debug, Clone)]
pub struct OrderedSample<S> {
    /// `None` under the lexical and explicit strategies
    pub key: Option<CaptureKey>,
    pub source: S,
}

/// Order a batch of samples by the given strategy.
///
/// Ties on the capture key are broken by identifier. Duplicate identifiers
/// are rejected since every downstream table is keyed by them.
pub fn order_samples<S: ImageSource>(
    samples: Vec<S>,
    strategy: OrderingStrategy,
) -> Result<Vec<OrderedSample<S>>> {
    let mut seen = HashSet::with_capacity(samples.len());
    for s in &samples {
        if !seen.insert(s.id().to_string()) {
            return Err(Error::ordering(s.id(), "duplicate identifier in batch"));
        }
    }

    let mut ordered = samples
        .into_iter()
        .map(|source| -> Result<OrderedSample<S>> {
            let key = match strategy {
                OrderingStrategy::FilenameDate => Some(parse_capture_time(source.id())?),
                OrderingStrategy::FileModified => Some(
                    source
                        .modified()
                        .ok_or_else(|| Error::ordering(source.id(), "no modification time"))?,
                ),
                OrderingStrategy::Lexical | OrderingStrategy::Explicit => None,
            };
            Ok(OrderedSample { key, source })
        })
        .collect::<Result<Vec<_>>>()?;

    if strategy != OrderingStrategy::Explicit {
        ordered.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.source.id().cmp(b.source.id())));
    }

    Ok(ordered)
}

/// Extract a capture timestamp embedded in an identifier.
///
/// Recognised tokens, first match wins:
/// - `YYYYMMDD_HHMMSS` (station camera naming, e.g. `20250314_081500.jpg`)
/// - `YYYY-MM-DD` optionally followed by `_HH-MM-SS`, `THH:MM:SS` or ` HH:MM:SS`
///
/// A bare date maps to midnight. Tokens that look right but are not a valid
/// calendar date or clock time are an error, never skipped.
pub fn parse_capture_time(id: &str) -> Result<CaptureKey> {
    let b = id.as_bytes();

    if let Some(i) = find_token(b, "dddddddd_dddddd") {
        return NaiveDateTime::parse_from_str(&id[i..i + 15], "%Y%m%d_%H%M%S")
            .map_err(|e| Error::ordering(id, format!("malformed timestamp '{}': {e}", &id[i..i + 15])));
    }

    if let Some(i) = find_token(b, "dddd-dd-dd") {
        let date = NaiveDate::parse_from_str(&id[i..i + 10], "%Y-%m-%d")
            .map_err(|e| Error::ordering(id, format!("malformed date '{}': {e}", &id[i..i + 10])))?;

        let rest = &b[i + 10..];
        let time = if matches_at(rest, "?dd?dd?dd") && matches!(rest[0], b'_' | b'T' | b' ') {
            let hms = &id[i + 11..i + 19];
            let normalized: String = hms.chars().map(|c| if c == '-' { ':' } else { c }).collect();
            NaiveTime::parse_from_str(&normalized, "%H:%M:%S")
                .map_err(|e| Error::ordering(id, format!("malformed time '{hms}': {e}")))?
        } else {
            NaiveTime::MIN
        };
        return Ok(date.and_time(time));
    }

    Err(Error::ordering(id, "no YYYY-MM-DD or YYYYMMDD_HHMMSS token"))
}

/// Find `pattern` in `b`, where `d` matches an ASCII digit and any other byte
/// matches itself. The match must not be flanked by further digits.
fn find_token(b: &[u8], pattern: &str) -> Option<usize> {
    let n = pattern.len();
    if b.len() < n {
        return None;
    }
    (0..=b.len() - n).find(|&i| {
        matches_at(&b[i..], pattern)
            && (i == 0 || !b[i - 1].is_ascii_digit())
            && b.get(i + n).is_none_or(|c| !c.is_ascii_digit())
    })
}

/// `?` matches `_`, `-`, `:`, `T` or a space.
fn matches_at(b: &[u8], pattern: &str) -> bool {
    b.len() >= pattern.len()
        && pattern.bytes().zip(b).all(|(p, &c)| match p {
            b'd' => c.is_ascii_digit(),
            b'?' => matches!(c, b'_' | b'-' | b':' | b'T' | b' '),
            other => other == c,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::RgbBands;
    use crate::sample::MemorySample;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> CaptureKey {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, ss)
            .unwrap()
    }

    fn sample(id: &str) -> MemorySample {
        MemorySample::new(id, RgbBands::filled(1, 1, [0, 0, 0]))
    }

    fn ids<S: ImageSource>(ordered: &[OrderedSample<S>]) -> Vec<&str> {
        ordered.iter().map(|o| o.source.id()).collect()
    }

    #[test]
    fn test_parse_camera_naming() {
        assert_eq!(
            parse_capture_time("20250314_081500.jpg").unwrap(),
            at(2025, 3, 14, 8, 15, 0)
        );
    }

    #[test]
    fn test_parse_dashed_date() {
        assert_eq!(
            parse_capture_time("plant_2024-06-01.jpg").unwrap(),
            at(2024, 6, 1, 0, 0, 0)
        );
        assert_eq!(
            parse_capture_time("2024-06-01_13-45-10.jpg").unwrap(),
            at(2024, 6, 1, 13, 45, 10)
        );
        assert_eq!(
            parse_capture_time("2024-06-01T07:05:00.png").unwrap(),
            at(2024, 6, 1, 7, 5, 0)
        );
    }

    #[test]
    fn test_missing_token_is_error() {
        let err = parse_capture_time("IMG_0042.jpg").unwrap_err();
        assert!(matches!(err, Error::Ordering { ref id, .. } if id == "IMG_0042.jpg"));
    }

    #[test]
    fn test_malformed_token_is_error() {
        assert!(matches!(
            parse_capture_time("2024-13-45.jpg"),
            Err(Error::Ordering { .. })
        ));
        assert!(matches!(
            parse_capture_time("20240230_120000.jpg"),
            Err(Error::Ordering { .. })
        ));
        assert!(matches!(
            parse_capture_time("2024-06-01_25-00-00.jpg"),
            Err(Error::Ordering { .. })
        ));
    }

    #[test]
    fn test_longer_digit_runs_do_not_match() {
        assert!(parse_capture_time("120240601_0800001.jpg").is_err());
    }

    #[test]
    fn test_date_order_beats_lexical_order() {
        // By name this batch would run 2024..., a_..., b_...
        let batch = vec![
            sample("b_2024-06-03.jpg"),
            sample("a_2024-06-05.jpg"),
            sample("20240604_090000.jpg"),
        ];
        let ordered = order_samples(batch, OrderingStrategy::FilenameDate).unwrap();
        assert_eq!(
            ids(&ordered),
            vec!["b_2024-06-03.jpg", "20240604_090000.jpg", "a_2024-06-05.jpg"]
        );
    }

    #[test]
    fn test_ties_broken_by_identifier() {
        let batch = vec![sample("z_2024-06-01.jpg"), sample("a_2024-06-01.jpg")];
        let ordered = order_samples(batch, OrderingStrategy::FilenameDate).unwrap();
        assert_eq!(ids(&ordered), vec!["a_2024-06-01.jpg", "z_2024-06-01.jpg"]);
    }

    #[test]
    fn test_one_bad_name_fails_whole_batch() {
        let batch = vec![sample("2024-06-01.jpg"), sample("holiday.jpg")];
        assert!(matches!(
            order_samples(batch, OrderingStrategy::FilenameDate),
            Err(Error::Ordering { .. })
        ));
    }

    #[test]
    fn test_lexical_and_explicit() {
        let batch = vec![sample("b.jpg"), sample("c.jpg"), sample("a.jpg")];
        let lexical = order_samples(batch.clone(), OrderingStrategy::Lexical).unwrap();
        assert_eq!(ids(&lexical), vec!["a.jpg", "b.jpg", "c.jpg"]);

        let explicit = order_samples(batch, OrderingStrategy::Explicit).unwrap();
        assert_eq!(ids(&explicit), vec!["b.jpg", "c.jpg", "a.jpg"]);
    }

    #[test]
    fn test_mtime_requires_metadata() {
        let batch = vec![sample("a.jpg")];
        assert!(order_samples(batch, OrderingStrategy::FileModified).is_err());
    }

    #[test]
    fn test_duplicate_identifiers_rejected() {
        let batch = vec![sample("2024-06-01.jpg"), sample("2024-06-01.jpg")];
        assert!(order_samples(batch, OrderingStrategy::Lexical).is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("date".parse::<OrderingStrategy>().unwrap(), OrderingStrategy::FilenameDate);
        assert_eq!("MTIME".parse::<OrderingStrategy>().unwrap(), OrderingStrategy::FileModified);
        assert!("random".parse::<OrderingStrategy>().is_err());
    }
}

// src/model.rs
//
// Canonical shapes shared by every source.
//
// - DrawResult:  one lottery's outcome for one run. Failure is a value here:
//                a record with `error` set and best-effort (often empty) fields.
// - RunSnapshot: all records of one run, keyed by calendar date.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Static identity of a lottery, declared by its extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LotteryMeta {
    pub id: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub name: &'static str,
    pub currency: &'static str,
}

/// Marker used for lotteries drawn nationally rather than by a state/province.
pub const NATIONAL: &str = "NATIONAL";

/// Auxiliary per-source value (multiplier codes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self { Scalar::Str(s!(v)) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jackpot {
    pub amount: Option<u64>,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub id: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub draw_date: Option<NaiveDate>,
    /// Winning numbers; a bonus ball, when the game has one, is last.
    #[serde(default)]
    pub numbers: Vec<u32>,
    #[serde(default)]
    pub extra: BTreeMap<String, Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jackpot: Option<Jackpot>,
    #[serde(default)]
    pub source: String,
    #[serde(with = "utc_z")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DrawResult {
    /// Empty-but-valid record for `meta`, stamped now. Extractors fill it in.
    pub fn new(meta: &LotteryMeta, source: &str) -> Self {
        Self {
            id: s!(meta.id),
            country: s!(meta.country),
            region: s!(meta.region),
            name: s!(meta.name),
            draw_date: None,
            numbers: Vec::new(),
            extra: BTreeMap::new(),
            jackpot: None,
            source: s!(source),
            updated_at: now_utc(),
            error: None,
        }
    }

    /// Best-effort record for a failed extraction. The jackpot keeps its
    /// currency with no amount so consumers see the same shape either way.
    pub fn degraded(meta: &LotteryMeta, source: &str, error: impl ToString) -> Self {
        let mut r = Self::new(meta, source);
        r.jackpot = Some(Jackpot { amount: None, currency: s!(meta.currency) });
        r.error = Some(error.to_string());
        r
    }

    /// Bare record for an extractor that escaped its own boundary.
    pub fn minimal_error(id: &str, error: impl ToString) -> Self {
        Self {
            id: s!(id),
            country: s!(),
            region: s!(),
            name: s!(),
            draw_date: None,
            numbers: Vec::new(),
            extra: BTreeMap::new(),
            jackpot: None,
            source: s!(),
            updated_at: now_utc(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool { self.error.is_none() }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub date: NaiveDate,
    #[serde(with = "utc_z")]
    pub updated_at: DateTime<Utc>,
    pub lotteries: Vec<DrawResult>,
}

impl RunSnapshot {
    /// Snapshot dated by the UTC calendar day of `updated_at`.
    pub fn new(updated_at: DateTime<Utc>, lotteries: Vec<DrawResult>) -> Self {
        Self { date: updated_at.date_naive(), updated_at, lotteries }
    }
}

/// Current UTC time truncated to whole seconds.
pub fn now_utc() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

/// `2026-01-05T12:30:00Z`: whole seconds, trailing `Z`.
pub mod utc_z {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: LotteryMeta = LotteryMeta {
        id: "powerball",
        country: "US",
        region: NATIONAL,
        name: "Powerball",
        currency: "USD",
    };

    #[test]
    fn degraded_record_shape() {
        let r = DrawResult::degraded(&META, "https://example.test/pb", "winning numbers row not found");
        assert_eq!(r.id, "powerball");
        assert_eq!(r.source, "https://example.test/pb");
        assert!(r.numbers.is_empty());
        assert!(r.draw_date.is_none());
        assert_eq!(r.jackpot, Some(Jackpot { amount: None, currency: s!("USD") }));
        assert!(!r.is_ok());
    }

    #[test]
    fn json_field_names_and_timestamp() {
        let mut r = DrawResult::new(&META, "src");
        r.updated_at = DateTime::parse_from_rfc3339("2026-01-06T04:05:06Z").unwrap().with_timezone(&Utc);
        r.draw_date = NaiveDate::from_ymd_opt(2026, 1, 5);
        r.numbers = vec![4, 18, 24, 51, 56, 14];
        r.extra.insert(s!("powerplay"), Scalar::from("2"));

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["updated_at"], "2026-01-06T04:05:06Z");
        assert_eq!(v["draw_date"], "2026-01-05");
        assert_eq!(v["extra"]["powerplay"], "2");
        assert_eq!(v["region"], "NATIONAL");
        assert!(v.get("error").is_none());
        assert!(v.get("jackpot").is_none());

        let back: DrawResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn snapshot_date_follows_utc_day() {
        let ts = DateTime::parse_from_rfc3339("2026-01-06T23:59:59Z").unwrap().with_timezone(&Utc);
        let snap = RunSnapshot::new(ts, Vec::new());
        assert_eq!(snap.date.to_string(), "2026-01-06");
    }
}

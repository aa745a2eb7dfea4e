// src/specs/megamillions.rs
//! Mega Millions from the official site's `.asmx` "latest draw" service.
//!
//! The service is JSON-ish rather than JSON:
//! - sometimes the body is the object itself, sometimes it is wrapped in
//!   XML or junk, so we fall back to the outermost `{...}`;
//! - ASP.NET likes `{"d": "<json as a string>"}`, which needs a second parse;
//! - the drawing sits under `Drawing`, under `d`, or at the root.
//!
//! Drawing fields: `PlayDate` (ISO, optional time), `N1`..`N5`, `MBall`,
//! `Megaplier`. Jackpot may be a number or money text, nested under
//! `Jackpot` or flat as `NextJackpot`.

use serde_json::{Map, Value};

use crate::core::fields::{parse_calendar_date, parse_money_to_integer, ISO};
use crate::core::Fetch;
use crate::error::ExtractError;
use crate::model::{DrawResult, Jackpot, LotteryMeta, Scalar, NATIONAL};

use super::Extractor;

pub const SOURCE_URL: &str = "https://www.megamillions.com/cmspages/utilservice.asmx/GetLatestDrawData";

pub const META: LotteryMeta = LotteryMeta {
    id: "megamillions",
    country: "US",
    region: NATIONAL,
    name: "Mega Millions",
    currency: "USD",
};

const BALL_KEYS: [&str; 5] = ["N1", "N2", "N3", "N4", "N5"];
const JACKPOT_KEYS: [&str; 4] = ["NextPrizePool", "NextJackpot", "Jackpot", "Amount"];

pub struct MegaMillionsService {
    url: String,
}

impl MegaMillionsService {
    pub fn new() -> Self { Self { url: s!(SOURCE_URL) } }
}

impl Default for MegaMillionsService {
    fn default() -> Self { Self::new() }
}

impl Extractor for MegaMillionsService {
    fn meta(&self) -> &LotteryMeta { &META }
    fn source_url(&self) -> &str { &self.url }

    fn extract(&self, http: &dyn Fetch) -> Result<DrawResult, ExtractError> {
        let body = http.get_text(&self.url)?;
        parse_payload(&body, &self.url)
    }
}

/// Best effort at getting one JSON object out of the body.
pub fn lenient_json(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(v) = serde_json::from_str::<Value>(text) {
        return Some(v);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// `{"d": "{...}"}` → the inner object; anything else passes through.
fn unwrap_d(payload: Value) -> Value {
    if let Some(Value::String(inner)) = payload.get("d") {
        if let Some(v) = lenient_json(inner) {
            return v;
        }
    }
    payload
}

fn as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn money(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => parse_money_to_integer(s),
        _ => None,
    }
}

fn find_jackpot(root: &Map<String, Value>) -> Option<u64> {
    match root.get("Jackpot") {
        Some(Value::Object(jp)) => JACKPOT_KEYS.iter().find_map(|k| jp.get(*k).and_then(money)),
        Some(other) => money(other),
        None => root.get("NextJackpot").and_then(money),
    }
}

/// Split out for unit tests.
pub fn parse_payload(body: &str, source: &str) -> Result<DrawResult, ExtractError> {
    let payload = lenient_json(body).ok_or_else(|| ExtractError::missing("JSON object in service response"))?;
    let payload = unwrap_d(payload);
    let root = payload
        .as_object()
        .ok_or_else(|| ExtractError::missing("JSON object in service response"))?;

    // `Drawing`, then an object-valued `d`, then the root itself.
    let inner_d = match root.get("d") {
        Some(Value::Object(d)) => Some(d),
        _ => None,
    };
    let drawing = match (root.get("Drawing"), inner_d) {
        (Some(Value::Object(d)), _) => d,
        (_, Some(d)) => d.get("Drawing").and_then(Value::as_object).unwrap_or(d),
        _ => root,
    };

    let mut numbers = Vec::with_capacity(6);
    for key in BALL_KEYS.iter().chain(std::iter::once(&"MBall")) {
        let v = drawing.get(*key).ok_or_else(|| ExtractError::missing(format!("drawing field {key}")))?;
        let n = as_int(v)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ExtractError::parse("ball", v.to_string()))?;
        numbers.push(n);
    }

    let mut out = DrawResult::new(&META, source);
    out.numbers = numbers;
    out.draw_date = drawing
        .get("PlayDate")
        .and_then(Value::as_str)
        .and_then(|d| parse_calendar_date(&d.replace('Z', ""), &[ISO]));

    if let Some(m) = drawing.get("Megaplier").and_then(as_int).filter(|m| *m > 0) {
        out.extra.insert(s!("megaplier"), Scalar::Int(m));
    }
    let amount = find_jackpot(root).or_else(|| inner_d.and_then(find_jackpot));
    out.jackpot = Some(Jackpot { amount, currency: s!(META.currency) });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn plain_object_with_nested_jackpot() {
        let body = r#"{
            "Drawing": {"PlayDate": "2026-01-02T00:00:00", "N1": 6, "N2": 13, "N3": 34,
                        "N4": 43, "N5": 52, "MBall": 4, "Megaplier": 3},
            "Jackpot": {"NextPrizePool": 165000000, "CurrentCashValue": 75400000}
        }"#;
        let r = parse_payload(body, SOURCE_URL).unwrap();
        assert_eq!(r.numbers, vec![6, 13, 34, 43, 52, 4]);
        assert_eq!(r.draw_date, NaiveDate::from_ymd_opt(2026, 1, 2));
        assert_eq!(r.extra.get("megaplier"), Some(&Scalar::Int(3)));
        assert_eq!(r.jackpot.unwrap().amount, Some(165_000_000));
    }

    #[test]
    fn xml_wrapped_d_string_payload() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
            <string xmlns="http://tempuri.org/">{"d":"{\"Drawing\":{\"PlayDate\":\"2026-01-06T00:00:00\",\"N1\":\"1\",\"N2\":\"9\",\"N3\":\"20\",\"N4\":\"31\",\"N5\":\"70\",\"MBall\":\"24\"},\"NextJackpot\":\"$1.2 Billion\"}"}</string>"#;
        let r = parse_payload(body, SOURCE_URL).unwrap();
        assert_eq!(r.numbers, vec![1, 9, 20, 31, 70, 24]);
        assert_eq!(r.draw_date, NaiveDate::from_ymd_opt(2026, 1, 6));
        assert_eq!(r.jackpot.unwrap().amount, Some(1_200_000_000));
        assert!(r.extra.is_empty());
    }

    #[test]
    fn object_valued_d_holds_the_drawing() {
        let body = r#"{"d": {"PlayDate": "2026-01-09T00:00:00", "N1": 6, "N2": 13, "N3": 34,
                             "N4": 43, "N5": 52, "MBall": 4, "Megaplier": 2,
                             "NextJackpot": "$86 Million"}}"#;
        let r = parse_payload(body, SOURCE_URL).unwrap();
        assert_eq!(r.numbers, vec![6, 13, 34, 43, 52, 4]);
        assert_eq!(r.draw_date, NaiveDate::from_ymd_opt(2026, 1, 9));
        assert_eq!(r.extra.get("megaplier"), Some(&Scalar::Int(2)));
        assert_eq!(r.jackpot.unwrap().amount, Some(86_000_000));
    }

    #[test]
    fn missing_ball_is_a_shape_error() {
        let body = r#"{"Drawing": {"N1": 6, "N2": 13, "N3": 34, "N4": 43, "MBall": 4}}"#;
        let err = parse_payload(body, SOURCE_URL).unwrap_err();
        assert!(err.to_string().contains("N5"));
    }

    #[test]
    fn not_json_at_all() {
        assert!(parse_payload("<html>blocked</html>", SOURCE_URL).is_err());
        assert!(lenient_json("} nope {").is_none());
    }
}

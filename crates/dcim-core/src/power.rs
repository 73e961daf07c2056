// ── Power readings ──
//
// Batch validation for ingested readings, synthetic series for feeds
// without recorded data, and a cancellable server-sent-events stream of
// simulated live readings.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;

/// Three-phase line factor (√3) used to derive current from power.
const SQRT_3: f64 = 1.732;
/// Energy accrued over one five-minute interval, per kW.
const ENERGY_PER_KW: f64 = 0.0833;

/// A reading as submitted for ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerReadingInput {
    pub feed_id: String,
    pub voltage_v: f64,
    pub current_a: f64,
    pub power_kw: f64,
    #[serde(default)]
    pub power_factor: Option<f64>,
    #[serde(default)]
    pub energy_kwh: Option<f64>,
}

/// A reading as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerReading {
    pub feed_id: String,
    /// RFC 3339, second precision, UTC.
    pub time: String,
    pub voltage_v: f64,
    pub current_a: f64,
    pub power_kw: f64,
    pub power_factor: f64,
    pub energy_kwh: f64,
}

/// A power feed eligible for live simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub id: String,
    pub rated_kw: f64,
    #[serde(default)]
    pub feed_type: String,
}

/// Check a batch before ingestion and return how many readings it holds.
///
/// An empty batch is valid and ingests nothing.
pub fn validate_batch(batch: &[PowerReadingInput]) -> Result<usize, CoreError> {
    for (index, reading) in batch.iter().enumerate() {
        if reading.feed_id.trim().is_empty() {
            return Err(CoreError::Validation {
                message: format!("reading {index}: feedId is required"),
            });
        }
        let fields = [
            ("voltageV", Some(reading.voltage_v)),
            ("currentA", Some(reading.current_a)),
            ("powerKw", Some(reading.power_kw)),
            ("powerFactor", reading.power_factor),
            ("energyKwh", reading.energy_kwh),
        ];
        if let Some((name, _)) = fields
            .iter()
            .find(|(_, value)| value.is_some_and(|v| !v.is_finite()))
        {
            return Err(CoreError::Validation {
                message: format!("reading {index}: {name} must be a finite number"),
            });
        }
    }
    Ok(batch.len())
}

/// Step between synthetic readings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum MockInterval {
    #[default]
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    Hour,
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    Day,
}

impl MockInterval {
    /// Parse a request parameter; anything unrecognized means five minutes.
    pub fn lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn step(self) -> TimeDelta {
        match self {
            Self::FiveMinutes => TimeDelta::minutes(5),
            Self::Hour => TimeDelta::hours(1),
            Self::Day => TimeDelta::days(1),
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn simulated<R: Rng + ?Sized>(
    feed_id: &str,
    at: DateTime<Utc>,
    power_kw: f64,
    rng: &mut R,
) -> PowerReading {
    let voltage_v = 208.0 + rng.random::<f64>() * 4.0;
    PowerReading {
        feed_id: feed_id.to_owned(),
        time: timestamp(at),
        voltage_v,
        current_a: (power_kw * 1000.0) / (voltage_v * SQRT_3),
        power_kw,
        power_factor: 0.9 + rng.random::<f64>() * 0.05,
        energy_kwh: power_kw * ENERGY_PER_KW,
    }
}

/// One synthetic reading per `interval` step from `start` to `end`
/// inclusive. Empty when `start` is after `end`.
pub fn mock_series<R: Rng + ?Sized>(
    feed_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: MockInterval,
    rng: &mut R,
) -> Vec<PowerReading> {
    let step = interval.step();
    let mut series = Vec::new();
    let mut at = start;
    while at <= end {
        let power_kw = 5.0 + rng.random::<f64>() * 5.0;
        series.push(simulated(feed_id, at, power_kw, rng));
        at += step;
    }
    series
}

/// One live reading per feed, loaded at 50–95% of its rating.
pub fn simulate_feeds<R: Rng + ?Sized>(
    feeds: &[FeedConfig],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PowerReading> {
    feeds
        .iter()
        .map(|feed| {
            let power_kw = feed.rated_kw * (0.5 + rng.random::<f64>() * 0.45);
            simulated(&feed.id, now, power_kw, rng)
        })
        .collect()
}

/// Frame a batch as one server-sent event.
pub fn sse_frame(readings: &[PowerReading]) -> Result<String, CoreError> {
    Ok(format!("data: {}\n\n", serde_json::to_string(readings)?))
}

/// Emit one frame of simulated readings immediately, then one every
/// `period`, until `cancel` fires or `limit` frames have been sent.
///
/// Returns the number of frames emitted. An `emit` error stops the stream.
pub async fn stream_readings<R, F>(
    feeds: &[FeedConfig],
    period: Duration,
    limit: Option<usize>,
    cancel: CancellationToken,
    mut rng: R,
    mut emit: F,
) -> Result<usize, CoreError>
where
    R: Rng,
    F: FnMut(String) -> Result<(), CoreError>,
{
    if period.is_zero() {
        return Err(CoreError::Validation {
            message: "stream interval must be greater than zero".into(),
        });
    }

    info!(feeds = feeds.len(), ?period, "streaming simulated readings");
    let mut interval = tokio::time::interval(period);
    let mut sent = 0usize;

    loop {
        if limit.is_some_and(|max| sent >= max) {
            break;
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let readings = simulate_feeds(feeds, Utc::now(), &mut rng);
                emit(sse_frame(&readings)?)?;
                sent += 1;
                debug!(frame = sent, readings = readings.len(), "readings frame sent");
            }
        }
    }

    Ok(sent)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn input(feed_id: &str) -> PowerReadingInput {
        PowerReadingInput {
            feed_id: feed_id.into(),
            voltage_v: 230.0,
            current_a: 12.5,
            power_kw: 2.8,
            power_factor: None,
            energy_kwh: Some(0.2),
        }
    }

    #[test]
    fn empty_batch_ingests_nothing() {
        assert_eq!(validate_batch(&[]).unwrap(), 0);
    }

    #[test]
    fn valid_batch_reports_its_size() {
        assert_eq!(validate_batch(&[input("F1"), input("F2")]).unwrap(), 2);
    }

    #[test]
    fn batch_rejects_blank_feed_and_non_finite_values() {
        let err = validate_batch(&[input("F1"), input(" ")]).unwrap_err();
        assert!(err.to_string().contains("reading 1: feedId is required"));

        let mut bad = input("F1");
        bad.power_factor = Some(f64::NAN);
        let err = validate_batch(&[bad]).unwrap_err();
        assert!(err.to_string().contains("powerFactor"));
    }

    #[test]
    fn input_uses_camel_case_keys() {
        let parsed: Vec<PowerReadingInput> = serde_json::from_str(
            r#"[{"feedId":"F1","voltageV":230,"currentA":10,"powerKw":2.3}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0].feed_id, "F1");
        assert!(parsed[0].power_factor.is_none());
    }

    #[test]
    fn interval_parsing_falls_back_to_five_minutes() {
        assert_eq!(MockInterval::lenient("1h"), MockInterval::Hour);
        assert_eq!(MockInterval::lenient("1d"), MockInterval::Day);
        assert_eq!(MockInterval::lenient("15m"), MockInterval::FiveMinutes);
        assert_eq!(MockInterval::Hour.to_string(), "1h");
    }

    #[test]
    fn mock_series_covers_window_inclusively() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + TimeDelta::hours(1);
        let series = mock_series("F1", start, end, MockInterval::FiveMinutes, &mut rng);

        assert_eq!(series.len(), 13);
        assert_eq!(series[0].time, "2024-01-01T00:00:00Z");
        assert_eq!(series[12].time, "2024-01-01T01:00:00Z");
        for r in &series {
            assert!((5.0..10.0).contains(&r.power_kw));
            assert!((208.0..212.0).contains(&r.voltage_v));
            assert!((0.9..0.95).contains(&r.power_factor));
            let expected_current = r.power_kw * 1000.0 / (r.voltage_v * SQRT_3);
            assert!((r.current_a - expected_current).abs() < 1e-9);
        }
    }

    #[test]
    fn mock_series_is_empty_for_inverted_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let start = end + TimeDelta::minutes(1);
        assert!(mock_series("F1", start, end, MockInterval::Hour, &mut rng).is_empty());
    }

    #[test]
    fn simulated_feeds_stay_within_rating() {
        let mut rng = StdRng::seed_from_u64(3);
        let feeds = vec![FeedConfig {
            id: "F9".into(),
            rated_kw: 20.0,
            feed_type: "primary".into(),
        }];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let readings = simulate_feeds(&feeds, now, &mut rng);
        assert_eq!(readings.len(), 1);
        assert!((10.0..19.0).contains(&readings[0].power_kw));
        assert_eq!(readings[0].time, "2024-06-01T12:00:00Z");
    }

    #[test]
    fn sse_frame_wraps_json_array() {
        let frame = sse_frame(&[]).unwrap();
        assert_eq!(frame, "data: []\n\n");
    }

    fn feeds() -> Vec<FeedConfig> {
        vec![FeedConfig {
            id: "F1".into(),
            rated_kw: 10.0,
            feed_type: "primary".into(),
        }]
    }

    #[tokio::test(start_paused = true)]
    async fn stream_stops_at_limit() {
        let mut frames = Vec::new();
        let sent = stream_readings(
            &feeds(),
            Duration::from_secs(5),
            Some(3),
            CancellationToken::new(),
            StdRng::seed_from_u64(11),
            |frame| {
                frames.push(frame);
                Ok(())
            },
        )
        .await
        .unwrap();

        assert_eq!(sent, 3);
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.starts_with("data: [{\"feedId\":\"F1\"")));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_stream_sends_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let sent = stream_readings(
            &feeds(),
            Duration::from_secs(5),
            None,
            cancel,
            StdRng::seed_from_u64(11),
            |_| Ok(()),
        )
        .await
        .unwrap();
        assert_eq!(sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn emit_failure_ends_the_stream() {
        let result = stream_readings(
            &feeds(),
            Duration::from_secs(1),
            None,
            CancellationToken::new(),
            StdRng::seed_from_u64(11),
            |_| Err(CoreError::Internal("client went away".into())),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Internal(_))));
    }

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let result = stream_readings(
            &feeds(),
            Duration::ZERO,
            Some(1),
            CancellationToken::new(),
            StdRng::seed_from_u64(11),
            |_| Ok(()),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }
}

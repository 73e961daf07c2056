//! Power-reading command handlers.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;
use tracing::info;

use dcim_core::CoreError;
use dcim_core::power::{
    FeedConfig, MockInterval, PowerReading, PowerReadingInput, mock_series, stream_readings,
    validate_batch,
};

use crate::cli::{GlobalOpts, ReadingsArgs, ReadingsCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::{output, source};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Feed")]
    feed: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Voltage (V)")]
    voltage: String,
    #[tabled(rename = "Current (A)")]
    current: String,
    #[tabled(rename = "Power (kW)")]
    power: String,
    #[tabled(rename = "PF")]
    power_factor: String,
    #[tabled(rename = "Energy (kWh)")]
    energy: String,
}

impl From<&PowerReading> for ReadingRow {
    fn from(r: &PowerReading) -> Self {
        Self {
            feed: r.feed_id.clone(),
            time: r.time.clone(),
            voltage: format!("{:.1}", r.voltage_v),
            current: format!("{:.2}", r.current_a),
            power: format!("{:.2}", r.power_kw),
            power_factor: format!("{:.3}", r.power_factor),
            energy: format!("{:.3}", r.energy_kwh),
        }
    }
}

#[derive(Serialize)]
struct BatchSummary {
    valid: bool,
    readings: usize,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ReadingsArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ReadingsCommand::Validate { file } => validate(&file, config, global),
        ReadingsCommand::Mock {
            feed,
            from,
            to,
            interval,
            seed,
        } => {
            let to = util::parse_optional_timestamp("to", to.as_deref())?.unwrap_or_else(Utc::now);
            let from = match from {
                Some(value) => util::parse_timestamp("from", &value)?,
                None => window_start(config, to)?,
            };
            let interval = interval
                .as_deref()
                .map_or_else(|| config.mock_interval(), MockInterval::lenient);

            let series = mock_series(&feed, from, to, interval, &mut rng(seed));
            info!(feed = %feed, %interval, readings = series.len(), "mock series generated");

            let format = config::output_format(global, config);
            let out = output::render_list(format, &series, |r| ReadingRow::from(r), |r| r.time.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        ReadingsCommand::Stream {
            feeds,
            every,
            count,
            seed,
        } => {
            let text = source::read_input(Some(feeds.as_path()))?;
            let feeds: Vec<FeedConfig> = serde_json::from_str(&text)?;
            let period =
                Duration::from_secs(every.unwrap_or(config.readings.stream_interval_secs));

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_signal.cancel();
                }
            });

            let mut stdout = std::io::stdout();
            let sent = stream_readings(&feeds, period, count, cancel, rng(seed), |frame| {
                stdout
                    .write_all(frame.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| CoreError::Internal(format!("failed to write frame: {e}")))
            })
            .await?;
            info!(frames = sent, "stream stopped");
            Ok(())
        }
    }
}

fn validate(file: &Path, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let text = source::read_input(Some(file))?;
    let batch: Vec<PowerReadingInput> = serde_json::from_str(&text)?;
    let readings = validate_batch(&batch)?;

    let summary = BatchSummary {
        valid: true,
        readings,
    };
    let format = config::output_format(global, config);
    let out = output::render_single(
        format,
        &summary,
        |s| Ok(format!("{} reading(s) valid", s.readings)),
        |s| s.readings.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Start of the default look-back window ending at `to`.
fn window_start(config: &Config, to: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
    let minutes = config.readings.window_minutes;
    i64::try_from(minutes)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .and_then(|window| to.checked_sub_signed(window))
        .ok_or_else(|| CliError::Validation {
            field: "readings.window_minutes".into(),
            reason: format!("{minutes} minutes is out of range"),
        })
}

fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

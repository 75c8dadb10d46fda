//! Reduces the upstream forecast timeline to one sample per local calendar day.
//!
//! For every local date present, the sample whose local time is closest to
//! 12:00 wins. When two samples are equally far from noon (one before, one
//! after) the earlier one is kept. Days are never dropped for lacking an
//! exact-noon sample.
//!
//! A five-day timeline fetched mid-day touches six dates, with a partial day
//! at one end. When the series must be shortened, days are removed from
//! whichever end has the pick furthest from noon, so partial edge days go
//! first and fully covered days are kept.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};

use crate::{
    client::{ForecastItemRaw, ForecastRaw, MainRaw, WeatherRaw, WindRaw},
    error::FetchError,
    model::{ForecastEntry, ForecastSeries},
};

const NOON_SECS: i64 = 12 * 60 * 60;

/// Validate the timeline and build the per-day series, at most `max_days` days.
pub fn daily_series(raw: &ForecastRaw, max_days: usize) -> Result<ForecastSeries, FetchError> {
    if raw.list.is_empty() {
        return Err(FetchError::MalformedResponse("forecast timeline is empty".into()));
    }

    let offset = utc_offset(raw.city.timezone)?;

    let mut samples = Vec::with_capacity(raw.list.len());
    for item in &raw.list {
        samples.push(Sample::from_raw(item, offset)?);
    }

    let days = trim_edges(select_nearest_noon(&samples), max_days);
    Ok(days.into_iter().map(Sample::to_entry).collect())
}

/// Convert an optional shift-in-seconds into an offset, UTC when absent.
pub(crate) fn utc_offset(shift_secs: Option<i32>) -> Result<FixedOffset, FetchError> {
    let shift = shift_secs.unwrap_or(0);
    FixedOffset::east_opt(shift).ok_or_else(|| {
        FetchError::MalformedResponse(format!("timezone shift {shift} out of range"))
    })
}

pub(crate) fn local_time(
    ts: i64,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| FetchError::MalformedResponse(format!("timestamp {ts} out of range")))
}

/// Checks shared by current and forecast samples.
pub(crate) fn checked_fields(
    main: &MainRaw,
    weather: &[WeatherRaw],
    wind: &WindRaw,
) -> Result<(f64, u8, f64, String), FetchError> {
    if !main.temp.is_finite() {
        return Err(FetchError::MalformedResponse("temperature is not a number".into()));
    }
    let humidity = u8::try_from(main.humidity).ok().filter(|h| *h <= 100).ok_or_else(|| {
        FetchError::MalformedResponse(format!("humidity {} out of range", main.humidity))
    })?;
    if !wind.speed.is_finite() || wind.speed < 0.0 {
        let detail = format!("wind speed {} out of range", wind.speed);
        return Err(FetchError::MalformedResponse(detail));
    }
    let description = weather
        .first()
        .map(|w| w.description.clone())
        .ok_or_else(|| FetchError::MalformedResponse("missing weather description".into()))?;

    Ok((main.temp, humidity, wind.speed, description))
}

#[derive(Debug, Clone)]
struct Sample {
    ts: i64,
    local: DateTime<FixedOffset>,
    temperature_c: f64,
    humidity_pct: u8,
    wind_speed_mps: f64,
    description: String,
}

impl Sample {
    fn from_raw(item: &ForecastItemRaw, offset: FixedOffset) -> Result<Self, FetchError> {
        let local = local_time(item.dt, offset)?;
        let (temperature_c, humidity_pct, wind_speed_mps, description) =
            checked_fields(&item.main, &item.weather, &item.wind)?;

        Ok(Self { ts: item.dt, local, temperature_c, humidity_pct, wind_speed_mps, description })
    }

    fn date(&self) -> NaiveDate {
        self.local.date_naive()
    }

    fn distance_from_noon(&self) -> i64 {
        (i64::from(self.local.num_seconds_from_midnight()) - NOON_SECS).abs()
    }

    fn to_entry(&self) -> ForecastEntry {
        ForecastEntry {
            date: self.date(),
            date_label: self.local.format("%a, %b %-d").to_string(),
            temperature_c: self.temperature_c,
            wind_speed_mps: self.wind_speed_mps,
            humidity_pct: self.humidity_pct,
            description: self.description.clone(),
        }
    }
}

/// One sample per date in ascending date order. Input order does not matter.
fn select_nearest_noon(samples: &[Sample]) -> Vec<&Sample> {
    let mut best: BTreeMap<NaiveDate, &Sample> = BTreeMap::new();

    for sample in samples {
        best.entry(sample.date())
            .and_modify(|current| {
                let key = (sample.distance_from_noon(), sample.ts);
                if key < (current.distance_from_noon(), current.ts) {
                    *current = sample;
                }
            })
            .or_insert(sample);
    }

    best.into_values().collect()
}

/// Drop edge days until at most `max_days` remain. The end whose pick is
/// further from noon goes first; on a tie the earlier day is dropped.
fn trim_edges(mut days: Vec<&Sample>, max_days: usize) -> Vec<&Sample> {
    let mut start = 0;
    while days.len() - start > max_days {
        let (first, last) = (days[start], days[days.len() - 1]);
        if last.distance_from_noon() > first.distance_from_noon() {
            days.pop();
        } else {
            start += 1;
        }
    }
    days.split_off(start)
}

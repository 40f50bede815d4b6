//! Weather widget service.
//!
//! Conditions are synthesized, not fetched: a deterministic seed built from
//! the rounded coordinates and the date drives a seeded RNG, so the same
//! place on the same day always shows the same weather and the panel works
//! with no provider at all. Only the one-sentence description consults a
//! text-generation model, and a canned sentence stands in when it can't.

use chrono::{Datelike, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

use omniboard_core::{
    traits::InferenceBackend,
    types::{ForecastDay, GenerationParams, WeatherReport},
};

/// Forecast horizon in days, today excluded.
const FORECAST_DAYS: u32 = 5;

/// Synthesized conditions for one day.
#[derive(Debug, Clone, PartialEq)]
struct DayConditions {
    temp_c: f64,
    high_c: f64,
    low_c: f64,
    humidity_pct: u8,
    wind_kph: f64,
    icon: &'static str,
}

pub struct WeatherService {
    backend: Arc<dyn InferenceBackend>,
    model: String,
    params: GenerationParams,
}

impl WeatherService {
    pub fn new(backend: Arc<dyn InferenceBackend>, model: String) -> Self {
        Self {
            backend,
            model,
            params: GenerationParams {
                max_new_tokens: 40,
                temperature: 0.7,
                top_p: 0.9,
                repetition_penalty: 1.3,
            },
        }
    }

    /// Conditions plus forecast for one location. Total.
    pub async fn report(&self, latitude: f64, longitude: f64) -> WeatherReport {
        let today = Utc::now().date_naive();
        let current = synthesize(latitude, longitude, today);

        let forecast = (1..=FORECAST_DAYS)
            .filter_map(|offset| {
                let date = today.checked_add_days(chrono::Days::new(offset.into()))?;
                let day = synthesize(latitude, longitude, date);
                Some(ForecastDay {
                    date: date.to_string(),
                    high_c: day.high_c,
                    low_c: day.low_c,
                    icon: day.icon.to_string(),
                })
            })
            .collect();

        let description = self.describe(&current).await;

        WeatherReport {
            latitude,
            longitude,
            temperature_c: current.temp_c,
            humidity_pct: current.humidity_pct,
            wind_kph: current.wind_kph,
            description,
            icon: current.icon.to_string(),
            forecast,
        }
    }

    async fn describe(&self, conditions: &DayConditions) -> String {
        let prompt = format!(
            "In one short, friendly sentence, describe this weather for a dashboard: \
             {:.0}°C, {}% humidity, wind {:.0} km/h, {}.",
            conditions.temp_c,
            conditions.humidity_pct,
            conditions.wind_kph,
            sky_words(conditions.icon)
        );

        match self
            .backend
            .text_generation(&self.model, &prompt, &self.params)
            .await
        {
            Ok(raw) => {
                let line = raw
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .unwrap_or("")
                    .trim_matches('"')
                    .to_string();
                if line.is_empty() {
                    canned_description(conditions)
                } else {
                    line
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "weather description model unavailable");
                canned_description(conditions)
            }
        }
    }
}

fn canned_description(conditions: &DayConditions) -> String {
    format!(
        "{} with temperatures around {:.0}°C and winds near {:.0} km/h.",
        capitalize(sky_words(conditions.icon)),
        conditions.temp_c,
        conditions.wind_kph
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn sky_words(icon: &str) -> &'static str {
    match icon {
        "01d" => "clear skies",
        "02d" => "a few clouds",
        "03d" => "scattered clouds",
        "04d" => "overcast skies",
        "09d" => "showers",
        "10d" => "steady rain",
        "13d" => "snow",
        _ => "changeable skies",
    }
}

/// Deterministic seed from rounded coordinates and date. Two decimal places
/// keep nearby queries on the same seed without making whole cities share
/// one.
fn stable_seed(latitude: f64, longitude: f64, date: NaiveDate) -> u64 {
    let lat = (latitude * 100.0).round() as i64 as u64;
    let lon = (longitude * 100.0).round() as i64 as u64;
    let day = date.num_days_from_ce() as u64;

    let mut seed = 0xcbf2_9ce4_8422_2325u64;
    for part in [lat, lon, day] {
        seed ^= part;
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    seed
}

/// Synthesize one day of weather: a latitude baseline, a seasonal swing that
/// flips with the hemisphere, and seeded jitter on top.
fn synthesize(latitude: f64, longitude: f64, date: NaiveDate) -> DayConditions {
    let mut rng = StdRng::seed_from_u64(stable_seed(latitude, longitude, date));

    let base = 28.0 - latitude.abs() * 0.5;
    let swing = 4.0 + (latitude.abs() / 90.0) * 14.0;
    // Warm peak mid-July in the north, mid-January in the south.
    let peak_day = if latitude >= 0.0 { 196.0 } else { 15.0 };
    let seasonal = swing
        * (std::f64::consts::TAU * (date.ordinal() as f64 - peak_day) / 365.0).cos();

    let temp_c = round1(base + seasonal + rng.gen_range(-4.0..4.0));
    let humidity_pct: u8 = rng.gen_range(40..=95);
    let wind_kph = round1(rng.gen_range(3.0..32.0));

    let icon = if temp_c <= 0.0 && humidity_pct > 70 {
        "13d"
    } else if humidity_pct > 85 {
        "10d"
    } else if humidity_pct > 75 {
        "09d"
    } else {
        match rng.gen_range(0..4) {
            0 => "01d",
            1 => "02d",
            2 => "03d",
            _ => "04d",
        }
    };

    DayConditions {
        temp_c,
        high_c: round1(temp_c + rng.gen_range(2.0..5.0)),
        low_c: round1(temp_c - rng.gen_range(3.0..7.0)),
        humidity_pct,
        wind_kph,
        icon,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

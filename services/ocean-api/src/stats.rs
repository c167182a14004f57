//! Synthetic zone statistics.
//!
//! The statistics endpoint serves plausible demo series rather than
//! measurements: a slow sinusoid with per-day jitter in tenths. Nothing
//! here touches the store or upstream.

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

/// One generated value series per requested day range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSeries {
    pub dates: Vec<String>,
    pub temperature: Vec<f64>,
    pub salinite: Vec<f64>,
    pub chlorophylle: Vec<f64>,
}

/// Generate one sample per day from `start` to `end` inclusive.
///
/// The caller seeds the generator, so tests can pin the jitter.
pub fn generate_series(start: NaiveDate, end: NaiveDate, rng: &mut StdRng) -> StatsSeries {
    let mut series = StatsSeries {
        dates: Vec::new(),
        temperature: Vec::new(),
        salinite: Vec::new(),
        chlorophylle: Vec::new(),
    };

    for day in start.iter_days().take_while(|day| *day <= end) {
        let ts = day.and_time(NaiveTime::MIN).and_utc().timestamp();

        series.dates.push(day.to_string());
        series
            .temperature
            .push(15.0 + (ts as f64 / 100_000.0).sin() * 5.0 + tenths(rng, 10));
        series.salinite.push(35.0 + tenths(rng, 5));
        series.chlorophylle.push(2.0 + tenths(rng, 10));
    }

    series
}

// Uniform jitter in steps of a tenth, inclusive on both ends
fn tenths(rng: &mut StdRng, range: i32) -> f64 {
    rng.gen_range(-range..=range) as f64 / 10.0
}

//! Phase age sources.
//!
//! The classifier only needs `phase(date) -> days since new moon`. [`PhaseSource`]
//! keeps that seam open so tests can drive it with synthetic ages, while
//! [`MeeusPhase`] is the astronomical implementation used by the CLI.

use chrono::{Datelike, NaiveDate};

/// Length of the phase-age scale: one full elongation turn maps to 28 units,
/// so every quarter of the cycle spans seven whole-day buckets.
pub const PHASE_SCALE: f64 = 28.0;

/// Half the width of a one-unit bucket in degrees (`360 / 28 / 2`). Shifting the
/// elongation by this much centres each even bucket on its exact epoch.
const BUCKET_CENTRE_DEGREES: f64 = 6.43;

/// Julian day of 0001-01-01T00:00 UT minus one, so that adding
/// `num_days_from_ce()` lands on midnight of the date.
const JD_CE_OFFSET: f64 = 1_721_424.5;

/// Julian day of J2000.0.
const J2000: f64 = 2_451_545.0;

/// Computes the phase age (days since the last new moon) for a date.
pub trait PhaseSource {
    fn phase_age(&self, date: NaiveDate) -> f64;
}

impl<F> PhaseSource for F
where
    F: Fn(NaiveDate) -> f64,
{
    fn phase_age(&self, date: NaiveDate) -> f64 {
        self(date)
    }
}

/// Moon age from the Sun–Moon elongation at 00:00 UT, on a `[0, 28)` scale.
///
/// The elongation is shifted by half a bucket before scaling, so bucket 0 covers
/// elongations `[-6.43°, 6.43°)` and the day whose midnight is nearest to the
/// exact new moon (likewise quarter and full) lands in the even bucket.
///
/// Uses the truncated series from Meeus, *Astronomical Algorithms*, ch. 47/49:
/// mean elongation, solar and lunar mean anomalies, and the four largest periodic
/// terms. Accurate to roughly a degree of elongation (a couple of hours of age),
/// which is well inside the day granularity the classifier works at.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeeusPhase;

impl PhaseSource for MeeusPhase {
    fn phase_age(&self, date: NaiveDate) -> f64 {
        let elongation = elongation_degrees(julian_day(date));
        let age = (elongation + BUCKET_CENTRE_DEGREES) / 360.0 * PHASE_SCALE;
        if age >= PHASE_SCALE { age - PHASE_SCALE } else { age }
    }
}

/// Julian day at 00:00 UT of `date`.
pub fn julian_day(date: NaiveDate) -> f64 {
    JD_CE_OFFSET + f64::from(date.num_days_from_ce())
}

/// Sun–Moon elongation in `[0, 360)`.
fn elongation_degrees(jd: f64) -> f64 {
    // Polynomial ΔT approximation, in days.
    let delta_t = (jd - 2_382_148.0).powi(2) / (41_048_480.0 * 86_400.0);
    let t = (jd + delta_t - J2000) / 36_525.0;
    let t2 = t * t;
    let t3 = t2 * t;

    let d = normalize(297.85 + 445_267.111_5 * t - 0.001_630_0 * t2 + t3 / 545_868.0);
    let m = normalize(357.53 + 35_999.050_3 * t);
    let m1 = normalize(134.96 + 477_198.867_6 * t + 0.008_997_0 * t2 + t3 / 69_699.0);

    let elongation = d + 6.29 * m1.to_radians().sin() - 2.10 * m.to_radians().sin()
        + 1.27 * (2.0 * d - m1).to_radians().sin()
        + 0.66 * (2.0 * d).to_radians().sin();
    normalize(elongation)
}

fn normalize(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

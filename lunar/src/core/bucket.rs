//! History-free interval classification of a phase age.

use crate::core::types::PhaseCode;

/// Coarse phase code for `age` from its whole-day part alone.
///
/// Each even bucket is exactly one day wide (`[7, 8)`, `[14, 15)`, ...), so a
/// day-by-day sweep can land in one twice or skip it. [`crate::core::classifier`]
/// corrects both cases using the previous day's bucket.
pub fn raw_bucket(age: f64) -> PhaseCode {
    // Saturating cast: negative ages clamp to 0, NaN maps to 0.
    let day = age.floor() as i64;
    let bucket = match day {
        i64::MIN..=0 => 0,
        1..=6 => 1,
        7 => 2,
        8..=13 => 3,
        14 => 4,
        15..=20 => 5,
        21 => 6,
        _ => 7,
    };
    PhaseCode::wrapping(bucket)
}

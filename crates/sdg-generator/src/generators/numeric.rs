//! Numeric value generators.

use rand::Rng;
use serde_json::{json, Number, Value};

/// HTTP status codes drawn by STATUS_CODE.
pub const STATUS_CODES: [u16; 8] = [200, 201, 204, 400, 401, 403, 404, 500];

/// Generate a random integer in the given range (inclusive).
pub fn generate_integer<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    Value::from(rng.random_range(min..=max))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    float_value(rng.random_range(min..=max))
}

/// Generate `{gte, lte}` integers within `[min, max]` with `gte <= lte`.
pub fn generate_integer_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    let upper = rng.random_range(min..=max);
    let lower = rng.random_range(min..=upper);
    json!({ "gte": lower, "lte": upper })
}

/// Generate `{gte, lte}` floats rounded to 2 decimals with `gte <= lte`.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    let upper = rng.random_range(min..=max);
    let lower = rng.random_range(min..=upper);
    json!({ "gte": float_value(round2(lower)), "lte": float_value(round2(upper)) })
}

/// Generate an `"<amount> <code>"` string with a 2-decimal amount.
pub fn generate_currency<R: Rng>(rng: &mut R, min: f64, max: f64, code: &str) -> Value {
    let amount = rng.random_range(min..=max);
    Value::String(format!("{amount:.2} {code}"))
}

/// Pick an HTTP status code.
pub fn generate_status_code<R: Rng>(rng: &mut R) -> Value {
    Value::from(STATUS_CODES[rng.random_range(0..STATUS_CODES.len())])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn float_value(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

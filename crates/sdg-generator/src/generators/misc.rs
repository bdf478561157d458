//! Geo point and UUID generators.

use crate::generators::numeric::float_value;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

/// Generate `{lat, lon}` uniformly within valid coordinates.
pub fn generate_geo_point<R: Rng>(rng: &mut R) -> Value {
    let lat = round6(rng.random_range(-90.0..=90.0));
    let lon = round6(rng.random_range(-180.0..=180.0));
    json!({ "lat": float_value(lat), "lon": float_value(lon) })
}

/// Generate a random UUID v4 string using the provided RNG.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Value {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Value::String(Uuid::from_bytes(bytes).to_string())
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

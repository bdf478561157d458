//! Generator registry.
//!
//! Every [`GeneratorKind`] has one generation function. Hydration resolves a
//! leaf's raw params into [`ResolvedParams`] once; [`generate_value`] then
//! dispatches on the resolved variant for every document.

pub mod misc;
pub mod network;
pub mod numeric;
pub mod text;
pub mod timestamp;

use crate::error::GenerationError;
use crate::hydrate::HydratedBlueprint;
use rand::Rng;
use sdg_core::GeneratorKind;
use serde_json::Value;

pub use network::IpVersion;
pub use timestamp::DateParams;

/// Default bounds per kind.
pub const DEFAULT_INTEGER_RANGE: (i64, i64) = (0, 100);
pub const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 100.0);
pub const DEFAULT_INTEGER_RANGE_BOUNDS: (i64, i64) = (0, 10_000);
pub const DEFAULT_FLOAT_RANGE_BOUNDS: (f64, f64) = (0.0, 1_000.0);
pub const DEFAULT_CURRENCY_RANGE: (f64, f64) = (0.0, 1_000.0);
pub const DEFAULT_CURRENCY_CODE: &str = "USD";
/// NESTED draws its object count from this range when `num_of_objs` is unset.
pub const DEFAULT_NESTED_OBJECTS: (usize, usize) = (1, 5);

/// Parameters of a bound generator, resolved at hydration time.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedParams {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Boolean,
    Date(DateParams),
    IpAddress(IpVersion),
    Keyword { choices: Option<Vec<Value>> },
    Text { must_include: Vec<String>, single_token: bool },
    Object { fields: HydratedBlueprint },
    Nested { fields: HydratedBlueprint, num_of_objs: Option<usize> },
    GeoPoint,
    StatusCode,
    Currency { min: f64, max: f64, code: String },
    IntegerRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    IpRange { version: IpVersion, use_cidr: bool },
    DateRange(DateParams),
    Uuid,
    Timestamp(DateParams),
    RandomChoice { elements: Vec<Value> },
}

impl ResolvedParams {
    /// Kind these params belong to.
    pub fn kind(&self) -> GeneratorKind {
        match self {
            ResolvedParams::Integer { .. } => GeneratorKind::Integer,
            ResolvedParams::Float { .. } => GeneratorKind::Float,
            ResolvedParams::Boolean => GeneratorKind::Boolean,
            ResolvedParams::Date(_) => GeneratorKind::Date,
            ResolvedParams::IpAddress(_) => GeneratorKind::IpAddress,
            ResolvedParams::Keyword { .. } => GeneratorKind::Keyword,
            ResolvedParams::Text { .. } => GeneratorKind::Text,
            ResolvedParams::Object { .. } => GeneratorKind::Object,
            ResolvedParams::Nested { .. } => GeneratorKind::Nested,
            ResolvedParams::GeoPoint => GeneratorKind::GeoPoint,
            ResolvedParams::StatusCode => GeneratorKind::StatusCode,
            ResolvedParams::Currency { .. } => GeneratorKind::Currency,
            ResolvedParams::IntegerRange { .. } => GeneratorKind::IntegerRange,
            ResolvedParams::FloatRange { .. } => GeneratorKind::FloatRange,
            ResolvedParams::IpRange { .. } => GeneratorKind::IpRange,
            ResolvedParams::DateRange(_) => GeneratorKind::DateRange,
            ResolvedParams::Uuid => GeneratorKind::Uuid,
            ResolvedParams::Timestamp(_) => GeneratorKind::Timestamp,
            ResolvedParams::RandomChoice { .. } => GeneratorKind::RandomChoice,
        }
    }
}

/// Generate one value for a bound generator.
pub fn generate_value<R: Rng>(params: &ResolvedParams, rng: &mut R) -> Result<Value, GenerationError> {
    let value = match params {
        ResolvedParams::Integer { min, max } => numeric::generate_integer(rng, *min, *max),

        ResolvedParams::Float { min, max } => numeric::generate_float(rng, *min, *max),

        ResolvedParams::Boolean => Value::Bool(rng.random_bool(0.5)),

        ResolvedParams::Date(date) => timestamp::generate_date(rng, date)?,

        ResolvedParams::IpAddress(version) => network::generate_ip(rng, *version),

        ResolvedParams::Keyword { choices } => text::generate_keyword(rng, choices.as_deref())?,

        ResolvedParams::Text {
            must_include,
            single_token,
        } => text::generate_text(rng, must_include, *single_token),

        ResolvedParams::Object { fields } => fields.generate(rng)?,

        ResolvedParams::Nested {
            fields,
            num_of_objs,
        } => {
            let count = num_of_objs.unwrap_or_else(|| {
                let (min, max) = DEFAULT_NESTED_OBJECTS;
                rng.random_range(min..=max)
            });
            let objects = (0..count)
                .map(|_| fields.generate(rng))
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(objects)
        }

        ResolvedParams::GeoPoint => misc::generate_geo_point(rng),

        ResolvedParams::StatusCode => numeric::generate_status_code(rng),

        ResolvedParams::Currency { min, max, code } => {
            numeric::generate_currency(rng, *min, *max, code)
        }

        ResolvedParams::IntegerRange { min, max } => {
            numeric::generate_integer_range(rng, *min, *max)
        }

        ResolvedParams::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        ResolvedParams::IpRange { version, use_cidr } => {
            network::generate_ip_range(rng, *version, *use_cidr)
        }

        ResolvedParams::DateRange(date) => timestamp::generate_date_range(rng, date)?,

        ResolvedParams::Uuid => misc::generate_uuid_v4(rng),

        ResolvedParams::Timestamp(date) => timestamp::generate_timestamp(rng, date)?,

        ResolvedParams::RandomChoice { elements } => text::generate_random_choice(rng, elements)?,
    };
    Ok(value)
}

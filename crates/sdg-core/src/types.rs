//! Generator kinds and the engine-type lookup table.
//!
//! `GeneratorKind` is the closed catalog of value generators a blueprint leaf
//! may name. Mapping documents declare engine field types (`long`, `text`,
//! `ip`, ...); [`kind_for_engine_type`] translates those into a kind.
//!
//! # Identifiers
//!
//! Kinds are written in SCREAMING_SNAKE_CASE inside template placeholders:
//!
//! ```text
//! {{INTEGER(min=1,max=5)}}
//! {{IP_ADDRESS(format=ipv6)}}
//! ```
//!
//! Parsing is case-insensitive and also accepts the `generate_` prefix used by
//! older configuration files (`generate_integer`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A generator kind known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneratorKind {
    Integer,
    Float,
    Boolean,
    Date,
    IpAddress,
    Keyword,
    Text,
    Object,
    Nested,
    GeoPoint,
    StatusCode,
    Currency,
    IntegerRange,
    FloatRange,
    IpRange,
    DateRange,
    Uuid,
    Timestamp,
    RandomChoice,
}

impl GeneratorKind {
    /// Every kind in the catalog.
    pub const ALL: [GeneratorKind; 19] = [
        GeneratorKind::Integer,
        GeneratorKind::Float,
        GeneratorKind::Boolean,
        GeneratorKind::Date,
        GeneratorKind::IpAddress,
        GeneratorKind::Keyword,
        GeneratorKind::Text,
        GeneratorKind::Object,
        GeneratorKind::Nested,
        GeneratorKind::GeoPoint,
        GeneratorKind::StatusCode,
        GeneratorKind::Currency,
        GeneratorKind::IntegerRange,
        GeneratorKind::FloatRange,
        GeneratorKind::IpRange,
        GeneratorKind::DateRange,
        GeneratorKind::Uuid,
        GeneratorKind::Timestamp,
        GeneratorKind::RandomChoice,
    ];

    /// The identifier used in templates and serialized blueprints.
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::Integer => "INTEGER",
            GeneratorKind::Float => "FLOAT",
            GeneratorKind::Boolean => "BOOLEAN",
            GeneratorKind::Date => "DATE",
            GeneratorKind::IpAddress => "IP_ADDRESS",
            GeneratorKind::Keyword => "KEYWORD",
            GeneratorKind::Text => "TEXT",
            GeneratorKind::Object => "OBJECT",
            GeneratorKind::Nested => "NESTED",
            GeneratorKind::GeoPoint => "GEO_POINT",
            GeneratorKind::StatusCode => "STATUS_CODE",
            GeneratorKind::Currency => "CURRENCY",
            GeneratorKind::IntegerRange => "INTEGER_RANGE",
            GeneratorKind::FloatRange => "FLOAT_RANGE",
            GeneratorKind::IpRange => "IP_RANGE",
            GeneratorKind::DateRange => "DATE_RANGE",
            GeneratorKind::Uuid => "UUID",
            GeneratorKind::Timestamp => "TIMESTAMP",
            GeneratorKind::RandomChoice => "RANDOM_CHOICE",
        }
    }

    /// Whether this kind carries a nested `fields` blueprint.
    pub fn is_composite(&self) -> bool {
        matches!(self, GeneratorKind::Object | GeneratorKind::Nested)
    }

    /// Parameter names this kind accepts.
    ///
    /// `min_value`/`max_value` are accepted as aliases of `min`/`max`.
    pub fn accepted_params(&self) -> &'static [&'static str] {
        match self {
            GeneratorKind::Integer
            | GeneratorKind::Float
            | GeneratorKind::IntegerRange
            | GeneratorKind::FloatRange => &["min", "max", "min_value", "max_value"],
            GeneratorKind::Currency => &["min", "max", "min_value", "max_value", "currency"],
            GeneratorKind::Date | GeneratorKind::DateRange => &["start_date", "end_date", "format"],
            GeneratorKind::IpAddress => &["format"],
            GeneratorKind::IpRange => &["format", "use_cidr"],
            GeneratorKind::Keyword => &["choices"],
            GeneratorKind::Text => &["must_include", "analyzer"],
            GeneratorKind::Nested => &["num_of_objs"],
            GeneratorKind::RandomChoice => &["elements"],
            GeneratorKind::Object
            | GeneratorKind::Boolean
            | GeneratorKind::GeoPoint
            | GeneratorKind::StatusCode
            | GeneratorKind::Uuid
            | GeneratorKind::Timestamp => &[],
        }
    }

    /// Engine type emitted when a blueprint is written back as a mapping.
    pub fn canonical_engine_type(&self) -> &'static str {
        match self {
            GeneratorKind::Integer => "long",
            GeneratorKind::Float => "double",
            GeneratorKind::Boolean => "boolean",
            GeneratorKind::Date | GeneratorKind::Timestamp => "date",
            GeneratorKind::IpAddress => "ip",
            GeneratorKind::Keyword
            | GeneratorKind::Uuid
            | GeneratorKind::RandomChoice
            | GeneratorKind::Currency => "keyword",
            GeneratorKind::Text => "match_only_text",
            GeneratorKind::Object => "object",
            GeneratorKind::Nested => "nested",
            GeneratorKind::GeoPoint => "geo_point",
            GeneratorKind::StatusCode => "integer",
            GeneratorKind::IntegerRange => "long_range",
            GeneratorKind::FloatRange => "double_range",
            GeneratorKind::IpRange => "ip_range",
            GeneratorKind::DateRange => "date_range",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a generator identifier is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown generator kind: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for GeneratorKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let name = lowered.strip_prefix("generate_").unwrap_or(&lowered);

        match name {
            "integer" | "long" | "short" | "byte" => Ok(GeneratorKind::Integer),
            "float" | "double" => Ok(GeneratorKind::Float),
            "boolean" => Ok(GeneratorKind::Boolean),
            "date" => Ok(GeneratorKind::Date),
            "ip_address" | "ip" => Ok(GeneratorKind::IpAddress),
            "keyword" => Ok(GeneratorKind::Keyword),
            "text" => Ok(GeneratorKind::Text),
            "object" => Ok(GeneratorKind::Object),
            "nested" => Ok(GeneratorKind::Nested),
            "geo_point" | "geopoint" => Ok(GeneratorKind::GeoPoint),
            "status_code" => Ok(GeneratorKind::StatusCode),
            "currency" => Ok(GeneratorKind::Currency),
            "integer_range" => Ok(GeneratorKind::IntegerRange),
            "float_range" => Ok(GeneratorKind::FloatRange),
            "ip_range" => Ok(GeneratorKind::IpRange),
            "date_range" => Ok(GeneratorKind::DateRange),
            "uuid" => Ok(GeneratorKind::Uuid),
            "timestamp" => Ok(GeneratorKind::Timestamp),
            "random_choice" => Ok(GeneratorKind::RandomChoice),
            _ => Err(UnknownKind(trimmed.to_string())),
        }
    }
}

impl Serialize for GeneratorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for GeneratorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Translate an engine field type into the generator kind that produces it.
///
/// Returns `None` for field types the generator cannot synthesize.
pub fn kind_for_engine_type(engine_type: &str) -> Option<GeneratorKind> {
    let kind = match engine_type {
        "text" | "keyword" | "wildcard" | "constant_keyword" => GeneratorKind::Keyword,
        "match_only_text" => GeneratorKind::Text,
        "long" | "integer" | "short" | "byte" | "unsigned_long" => GeneratorKind::Integer,
        "double" | "float" | "half_float" | "scaled_float" => GeneratorKind::Float,
        "date" | "date_nanos" => GeneratorKind::Date,
        "boolean" => GeneratorKind::Boolean,
        "nested" => GeneratorKind::Nested,
        "object" => GeneratorKind::Object,
        "ip" => GeneratorKind::IpAddress,
        "geo_point" => GeneratorKind::GeoPoint,
        "integer_range" | "long_range" => GeneratorKind::IntegerRange,
        "float_range" | "double_range" => GeneratorKind::FloatRange,
        "ip_range" => GeneratorKind::IpRange,
        "date_range" => GeneratorKind::DateRange,
        _ => return None,
    };
    Some(kind)
}

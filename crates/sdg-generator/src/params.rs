//! Resolution of raw blueprint params into typed generator params.

use crate::error::HydrationError;
use crate::generators::{
    DateParams, IpVersion, ResolvedParams, DEFAULT_CURRENCY_CODE, DEFAULT_CURRENCY_RANGE,
    DEFAULT_FLOAT_RANGE, DEFAULT_FLOAT_RANGE_BOUNDS, DEFAULT_INTEGER_RANGE,
    DEFAULT_INTEGER_RANGE_BOUNDS,
};
use chrono::NaiveDateTime;
use sdg_core::config::parse_datetime;
use sdg_core::{DateFormat, GeneratorKind};
use serde_json::{Map, Value};

/// Typed accessors over one leaf's raw params.
struct ParamReader<'a> {
    kind: GeneratorKind,
    params: &'a Map<String, Value>,
}

impl<'a> ParamReader<'a> {
    fn new(kind: GeneratorKind, params: &'a Map<String, Value>) -> Result<Self, HydrationError> {
        let accepted = kind.accepted_params();
        if let Some(name) = params.keys().find(|k| !accepted.contains(&k.as_str())) {
            return Err(HydrationError::invalid(kind, name, "not accepted by this generator"));
        }
        Ok(Self { kind, params })
    }

    /// First present value among `names` (a name and its aliases).
    fn get(&self, names: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        names
            .iter()
            .find_map(|name| self.params.get(*name).map(|v| (*name, v)))
    }

    fn i64(&self, names: &[&'static str], default: i64) -> Result<i64, HydrationError> {
        match self.get(names) {
            None => Ok(default),
            Some((name, value)) => value.as_i64().ok_or_else(|| {
                HydrationError::invalid(self.kind, name, format!("expected an integer, got {value}"))
            }),
        }
    }

    fn f64(&self, names: &[&'static str], default: f64) -> Result<f64, HydrationError> {
        match self.get(names) {
            None => Ok(default),
            Some((name, value)) => value
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    HydrationError::invalid(self.kind, name, format!("expected a number, got {value}"))
                }),
        }
    }

    fn bool(&self, name: &'static str) -> Result<bool, HydrationError> {
        match self.params.get(name) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => Err(HydrationError::invalid(
                self.kind,
                name,
                format!("expected a boolean, got {other}"),
            )),
        }
    }

    fn str(&self, name: &'static str) -> Result<Option<&'a str>, HydrationError> {
        match self.params.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(HydrationError::invalid(
                self.kind,
                name,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// A list given either as a JSON array or a `|`-delimited string.
    fn list(&self, name: &'static str) -> Result<Option<Vec<Value>>, HydrationError> {
        match self.params.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.clone())),
            Some(Value::String(s)) => Ok(Some(
                s.split('|')
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            )),
            Some(other) => Err(HydrationError::invalid(
                self.kind,
                name,
                format!("expected a list or a '|'-separated string, got {other}"),
            )),
        }
    }

    fn int_bounds(&self, default: (i64, i64)) -> Result<(i64, i64), HydrationError> {
        let min = self.i64(&["min", "min_value"], default.0)?;
        let max = self.i64(&["max", "max_value"], default.1.max(min))?;
        if min > max {
            return Err(HydrationError::invalid(
                self.kind,
                "min",
                format!("min {min} is greater than max {max}"),
            ));
        }
        Ok((min, max))
    }

    fn float_bounds(&self, default: (f64, f64)) -> Result<(f64, f64), HydrationError> {
        let min = self.f64(&["min", "min_value"], default.0)?;
        let max = self.f64(&["max", "max_value"], default.1.max(min))?;
        if min > max {
            return Err(HydrationError::invalid(
                self.kind,
                "min",
                format!("min {min} is greater than max {max}"),
            ));
        }
        if !(max - min).is_finite() {
            return Err(HydrationError::invalid(self.kind, "max", "range is too wide"));
        }
        Ok((min, max))
    }

    fn date(&self, name: &'static str, default: NaiveDateTime) -> Result<NaiveDateTime, HydrationError> {
        match self.str(name)? {
            None => Ok(default),
            Some(raw) => parse_datetime(raw).map_err(|e| HydrationError::invalid(self.kind, name, e.to_string())),
        }
    }

    fn date_params(&self) -> Result<DateParams, HydrationError> {
        let start = self.date("start_date", DateParams::default_start())?;
        let end = self.date("end_date", DateParams::default_end().max(start))?;
        if start > end {
            return Err(HydrationError::invalid(
                self.kind,
                "start_date",
                format!("{start} is after end_date {end}"),
            ));
        }
        let formats = match self.str("format")? {
            None => Vec::new(),
            Some(raw) => DateFormat::parse_alternatives(raw).map_err(HydrationError::UnsupportedFormat)?,
        };
        Ok(DateParams { start, end, formats })
    }

    fn ip_version(&self) -> Result<IpVersion, HydrationError> {
        match self.str("format")? {
            None => Ok(IpVersion::default()),
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| HydrationError::invalid(self.kind, "format", reason)),
        }
    }
}

/// Resolve the params of a non-composite leaf.
pub(crate) fn resolve_leaf(
    kind: GeneratorKind,
    params: &Map<String, Value>,
) -> Result<ResolvedParams, HydrationError> {
    let reader = ParamReader::new(kind, params)?;

    let resolved = match kind {
        GeneratorKind::Integer => {
            let (min, max) = reader.int_bounds(DEFAULT_INTEGER_RANGE)?;
            ResolvedParams::Integer { min, max }
        }
        GeneratorKind::Float => {
            let (min, max) = reader.float_bounds(DEFAULT_FLOAT_RANGE)?;
            ResolvedParams::Float { min, max }
        }
        GeneratorKind::Boolean => ResolvedParams::Boolean,
        GeneratorKind::Date => ResolvedParams::Date(reader.date_params()?),
        GeneratorKind::IpAddress => ResolvedParams::IpAddress(reader.ip_version()?),
        GeneratorKind::Keyword => ResolvedParams::Keyword {
            choices: reader.list("choices")?,
        },
        GeneratorKind::Text => {
            let must_include = reader
                .list("must_include")?
                .unwrap_or_default()
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
            let single_token = reader
                .str("analyzer")?
                .is_some_and(|a| a.eq_ignore_ascii_case("keyword"));
            ResolvedParams::Text {
                must_include,
                single_token,
            }
        }
        GeneratorKind::GeoPoint => ResolvedParams::GeoPoint,
        GeneratorKind::StatusCode => ResolvedParams::StatusCode,
        GeneratorKind::Currency => {
            let (min, max) = reader.float_bounds(DEFAULT_CURRENCY_RANGE)?;
            let code = reader.str("currency")?.unwrap_or(DEFAULT_CURRENCY_CODE).to_string();
            ResolvedParams::Currency { min, max, code }
        }
        GeneratorKind::IntegerRange => {
            let (min, max) = reader.int_bounds(DEFAULT_INTEGER_RANGE_BOUNDS)?;
            ResolvedParams::IntegerRange { min, max }
        }
        GeneratorKind::FloatRange => {
            let (min, max) = reader.float_bounds(DEFAULT_FLOAT_RANGE_BOUNDS)?;
            ResolvedParams::FloatRange { min, max }
        }
        GeneratorKind::IpRange => ResolvedParams::IpRange {
            version: reader.ip_version()?,
            use_cidr: reader.bool("use_cidr")?,
        },
        GeneratorKind::DateRange => ResolvedParams::DateRange(reader.date_params()?),
        GeneratorKind::Uuid => ResolvedParams::Uuid,
        GeneratorKind::Timestamp => ResolvedParams::Timestamp(reader.date_params()?),
        GeneratorKind::RandomChoice => ResolvedParams::RandomChoice {
            elements: reader
                .list("elements")?
                .ok_or_else(|| HydrationError::invalid(kind, "elements", "is required"))?,
        },
        GeneratorKind::Object | GeneratorKind::Nested => {
            return Err(HydrationError::MissingFields(kind));
        }
    };
    Ok(resolved)
}

/// Resolve `num_of_objs` for NESTED.
pub(crate) fn resolve_num_of_objs(params: &Map<String, Value>) -> Result<Option<usize>, HydrationError> {
    let reader = ParamReader::new(GeneratorKind::Nested, params)?;
    match reader.get(&["num_of_objs"]) {
        None => Ok(None),
        Some((name, value)) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| {
                HydrationError::invalid(
                    GeneratorKind::Nested,
                    name,
                    format!("expected a non-negative integer, got {value}"),
                )
            }),
    }
}

/// Check that an OBJECT leaf carries no params.
pub(crate) fn check_object_params(params: &Map<String, Value>) -> Result<(), HydrationError> {
    ParamReader::new(GeneratorKind::Object, params).map(|_| ())
}

//! IP address generators.

use rand::Rng;
use serde_json::{json, Value};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Largest distance between the bounds of a generated IP range.
const MAX_RANGE_SPAN: u32 = 1000;

/// Address family for IP generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpVersion {
    #[default]
    V4,
    V6,
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "ipv4"),
            IpVersion::V6 => write!(f, "ipv6"),
        }
    }
}

impl FromStr for IpVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ipv4" => Ok(IpVersion::V4),
            "ipv6" => Ok(IpVersion::V6),
            _ => Err(format!("expected ipv4 or ipv6, got '{s}'")),
        }
    }
}

/// Generate a random address string.
pub fn generate_ip<R: Rng>(rng: &mut R, version: IpVersion) -> Value {
    let address = match version {
        IpVersion::V4 => Ipv4Addr::from(rng.random::<u32>()).to_string(),
        IpVersion::V6 => Ipv6Addr::from(rng.random::<u128>()).to_string(),
    };
    Value::String(address)
}

/// Generate an IP range.
///
/// Without `use_cidr` the result is `{gte, lte}` where `gte` trails `lte` by
/// 1 to 1000 addresses (clamped at zero). With `use_cidr` it is a single
/// network in CIDR notation (`/24` for IPv4, `/64` for IPv6).
pub fn generate_ip_range<R: Rng>(rng: &mut R, version: IpVersion, use_cidr: bool) -> Value {
    let span = rng.random_range(1..=MAX_RANGE_SPAN);
    match version {
        IpVersion::V4 => {
            let upper = rng.random::<u32>();
            if use_cidr {
                return Value::String(format!("{}/24", Ipv4Addr::from(upper & 0xFFFF_FF00)));
            }
            let lower = upper.saturating_sub(span);
            json!({
                "gte": Ipv4Addr::from(lower).to_string(),
                "lte": Ipv4Addr::from(upper).to_string(),
            })
        }
        IpVersion::V6 => {
            let upper = rng.random::<u128>();
            if use_cidr {
                let network = upper & !u128::from(u64::MAX);
                return Value::String(format!("{}/64", Ipv6Addr::from(network)));
            }
            let lower = upper.saturating_sub(u128::from(span));
            json!({
                "gte": Ipv6Addr::from(lower).to_string(),
                "lte": Ipv6Addr::from(upper).to_string(),
            })
        }
    }
}

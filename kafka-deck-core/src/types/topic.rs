//! Topic, partition and topic configuration types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Topic row shown in the topics panel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub partitions: usize,
    pub replicas: usize,
    pub in_sync_replicas: usize,
    /// Under-replicated partitions
    pub urp: usize,
    pub cleanup_policy: CleanupPolicy,
    pub message_count: i64,
    pub is_internal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Partition {
    pub id: i32,
    pub message_count: i64,
    pub start_offset: i64,
    pub end_offset: i64,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub in_sync_replicas: Vec<i32>,
}

/// `cleanup.policy` topic setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CleanupPolicy {
    #[default]
    Delete,
    Compact,
    CompactDelete,
}

impl CleanupPolicy {
    pub const fn options() -> &'static [CleanupPolicy] {
        &[
            CleanupPolicy::Delete,
            CleanupPolicy::Compact,
            CleanupPolicy::CompactDelete,
        ]
    }

    /// Broker config value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Compact => "compact",
            Self::CompactDelete => "compact,delete",
        }
    }

    /// Label for selectors
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delete => "Delete",
            Self::Compact => "Compact",
            Self::CompactDelete => "Compact-Delete",
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupPolicy {
    type Err = CoreError;

    /// Unknown values fall back to `delete`, matching broker defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "compact" => Self::Compact,
            "compact,delete" | "delete,compact" => Self::CompactDelete,
            "delete" => Self::Delete,
            other => {
                log::debug!("unknown cleanup.policy '{other}', treating as delete");
                Self::Delete
            }
        })
    }
}

/// Creation / alteration parameters of a topic
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i32,
    pub cleanup_policy: CleanupPolicy,
    pub min_in_sync_replicas: i32,
    pub retention_ms: i64,
}

/// Parse a retention period into milliseconds.
///
/// Accepts `""` (0), `<n>d` for days, or a duration such as `168h`, `1h30m`, `90s`, `500ms`.
pub fn parse_retention(input: &str) -> CoreResult<i64> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(0);
    }

    if let Some(days) = s.strip_suffix('d') {
        let days: i64 = days
            .parse()
            .map_err(|e| CoreError::ValidationError(format!("invalid days format: {e}")))?;
        return days
            .checked_mul(MILLIS_PER_DAY)
            .ok_or_else(|| CoreError::ValidationError(format!("retention out of range: {s}")));
    }

    parse_duration_millis(s)
}

/// `[-]<number><unit>...` with units `ns us µs ms s m h`.
///
/// Summed in integer nanoseconds so large inputs fail instead of losing precision.
fn parse_duration_millis(s: &str) -> CoreResult<i64> {
    let invalid = || CoreError::ValidationError(format!("invalid duration: {s}"));
    let out_of_range = || CoreError::ValidationError(format!("retention out of range: {s}"));

    let (negative, mut rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: i64 = 0;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (whole, frac) = rest[..num_end].split_once('.').unwrap_or((&rest[..num_end], ""));
        if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
            return Err(invalid());
        }
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale: i64 = match &rest[..unit_end] {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_end..];

        // `whole` is all digits, so a parse failure can only be overflow
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(out_of_range)?;
        let mut place = scale;
        for digit in frac.bytes() {
            place /= 10;
            nanos = nanos
                .checked_add(i64::from(digit - b'0') * place)
                .ok_or_else(out_of_range)?;
        }
        total_nanos = total_nanos.checked_add(nanos).ok_or_else(out_of_range)?;
    }

    let millis = total_nanos / 1_000_000;
    Ok(if negative { -millis } else { millis })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_days() {
        assert_eq!(parse_retention("7d").unwrap(), 7 * MILLIS_PER_DAY);
        assert_eq!(parse_retention(" 1d ").unwrap(), MILLIS_PER_DAY);
    }

    #[test]
    fn retention_durations() {
        assert_eq!(parse_retention("168h").unwrap(), 7 * MILLIS_PER_DAY);
        assert_eq!(parse_retention("1h30m").unwrap(), 90 * 60 * 1000);
        assert_eq!(parse_retention("500ms").unwrap(), 500);
        assert_eq!(parse_retention("1.5s").unwrap(), 1500);
    }

    #[test]
    fn retention_sums_exactly() {
        assert_eq!(parse_retention("2562047h").unwrap(), 2_562_047 * 3_600_000);
        assert_eq!(parse_retention("0.001s").unwrap(), 1);
        assert_eq!(parse_retention("-1h").unwrap(), -3_600_000);
    }

    #[test]
    fn retention_overflow_is_rejected() {
        let err = parse_retention("2562048h").unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref msg) if msg.contains("out of range")));
        assert!(parse_retention("99999999999999999999s").is_err());
        assert!(parse_retention("2000000h2000000h").is_err());
        assert!(parse_retention("1..5s").is_err());
    }

    #[test]
    fn retention_empty_is_zero() {
        assert_eq!(parse_retention("").unwrap(), 0);
    }

    #[test]
    fn retention_rejects_garbage() {
        assert!(parse_retention("forever").is_err());
        assert!(parse_retention("xd").is_err());
        assert!(parse_retention("10").is_err());
        assert!(parse_retention("10y").is_err());
    }

    #[test]
    fn cleanup_policy_config_values() {
        assert_eq!(CleanupPolicy::CompactDelete.as_str(), "compact,delete");
        assert_eq!("compact".parse::<CleanupPolicy>().unwrap(), CleanupPolicy::Compact);
        assert_eq!("anything".parse::<CleanupPolicy>().unwrap(), CleanupPolicy::Delete);
    }
}

//! Domain types: network type, usage query, permission status.

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── NetworkType ──────────────────────────────────────────────────────

/// The active network class, mapped from the native integer code.
///
/// The native layer reports `0` for mobile and `1` for Wi-Fi. Any other
/// code is rejected rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum NetworkType {
    #[serde(rename = "MOBILE")]
    #[strum(serialize = "MOBILE")]
    Mobile,
    #[serde(rename = "WIFI")]
    #[strum(serialize = "WIFI")]
    Wifi,
}

impl NetworkType {
    /// Map a native network-type code to a [`NetworkType`].
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(Self::Mobile),
            1 => Ok(Self::Wifi),
            code => Err(Error::UnknownNetworkType { code }),
        }
    }

    /// The native integer code for this network class.
    pub fn code(self) -> i32 {
        match self {
            Self::Mobile => 0,
            Self::Wifi => 1,
        }
    }
}

// ── UsageQuery ───────────────────────────────────────────────────────

/// A validated half-open question: "how many bytes moved between
/// `start_ms` and `end_ms`?" Both bounds are Unix-epoch milliseconds.
///
/// Constructed per call and discarded; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageQuery {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl UsageQuery {
    /// Validate and build a query over `[start_ms, end_ms]`.
    ///
    /// Checks run in the order the original binding applied them:
    /// presence first, then range. A bound of exactly `0` is rejected as
    /// missing -- a known limitation inherited from the upstream falsy
    /// check, kept so that callers relying on the rejection keep getting
    /// it. A legitimate epoch-zero query is therefore unrepresentable.
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self, Error> {
        if start_ms == 0 {
            return Err(Error::MissingArgument { name: "startTime" });
        }
        if end_ms == 0 {
            return Err(Error::MissingArgument { name: "endTime" });
        }
        if start_ms > end_ms {
            return Err(Error::InvalidRange { start_ms, end_ms });
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Build a query from stringly-typed bounds, as they arrive at the
    /// CLI or any other text boundary.
    ///
    /// Empty strings are missing arguments; non-numeric strings are
    /// [`Error::InvalidArgumentType`]; everything else goes through
    /// [`UsageQuery::new`].
    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        let start_ms = Self::parse_bound(start, "startTime")?;
        let end_ms = Self::parse_bound(end, "endTime")?;
        Self::new(start_ms, end_ms)
    }

    fn parse_bound(value: &str, name: &'static str) -> Result<i64, Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingArgument { name });
        }
        trimmed.parse::<i64>().map_err(|_| Error::InvalidArgumentType {
            name,
            value: value.to_string(),
        })
    }

    /// The bounds serialized as decimal strings, which is the calling
    /// convention the native counter APIs expect.
    pub fn native_args(&self) -> (String, String) {
        (self.start_ms.to_string(), self.end_ms.to_string())
    }
}

// ── PermissionStatus ─────────────────────────────────────────────────

/// Per-capability grant status reported by the platform permission
/// system.
///
/// The wire values mirror the platform's lowercase status strings. An
/// unrecognized string parses to no status at all, which callers must
/// treat as not granted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PermissionStatus {
    Unavailable,
    Denied,
    Limited,
    Granted,
    Blocked,
}

impl PermissionStatus {
    /// `true` iff this status equals the single "granted" sentinel.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn network_type_maps_known_codes() {
        assert_eq!(NetworkType::from_code(0).unwrap(), NetworkType::Mobile);
        assert_eq!(NetworkType::from_code(1).unwrap(), NetworkType::Wifi);
    }

    #[test]
    fn network_type_rejects_unknown_codes() {
        for code in [-1, 2, 9, 17, i32::MAX] {
            let err = NetworkType::from_code(code).unwrap_err();
            assert!(
                matches!(err, Error::UnknownNetworkType { code: c } if c == code),
                "code {code} should be unknown, got: {err:?}"
            );
        }
    }

    #[test]
    fn network_type_round_trips_code() {
        assert_eq!(NetworkType::Mobile.code(), 0);
        assert_eq!(NetworkType::Wifi.code(), 1);
        assert_eq!(NetworkType::Wifi.to_string(), "WIFI");
        assert_eq!(NetworkType::Mobile.to_string(), "MOBILE");
    }

    #[test]
    fn query_rejects_zero_bound_as_missing() {
        // Epoch zero is indistinguishable from "missing" -- the inherited
        // falsy-check limitation.
        let err = UsageQuery::new(0, 1000).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { name: "startTime" }));

        let err = UsageQuery::new(1, 0).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { name: "endTime" }));

        assert!(UsageQuery::new(1, 1000).is_ok());
    }

    #[test]
    fn query_rejects_inverted_range() {
        let err = UsageQuery::new(2000, 1000).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRange {
                start_ms: 2000,
                end_ms: 1000,
            }
        ));
    }

    #[test]
    fn query_accepts_equal_bounds() {
        let q = UsageQuery::new(1000, 1000).unwrap();
        assert_eq!(q.start_ms, 1000);
        assert_eq!(q.end_ms, 1000);
    }

    #[test]
    fn query_parse_flags_non_numeric_bounds() {
        let err = UsageQuery::parse("yesterday", "1000").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgumentType {
                name: "startTime",
                ..
            }
        ));

        let err = UsageQuery::parse("100", "").unwrap_err();
        assert!(matches!(err, Error::MissingArgument { name: "endTime" }));

        let q = UsageQuery::parse(" 100 ", "200").unwrap();
        assert_eq!(q, UsageQuery::new(100, 200).unwrap());
    }

    #[test]
    fn native_args_are_decimal_strings() {
        let q = UsageQuery::new(100, 200).unwrap();
        assert_eq!(q.native_args(), ("100".to_string(), "200".to_string()));
    }

    #[test]
    fn permission_status_parses_wire_strings() {
        assert_eq!(
            PermissionStatus::from_str("granted").unwrap(),
            PermissionStatus::Granted
        );
        assert_eq!(
            PermissionStatus::from_str("blocked").unwrap(),
            PermissionStatus::Blocked
        );
        assert!(PermissionStatus::from_str("maybe-later").is_err());
    }

    #[test]
    fn only_granted_is_granted() {
        assert!(PermissionStatus::Granted.is_granted());
        for status in [
            PermissionStatus::Unavailable,
            PermissionStatus::Denied,
            PermissionStatus::Limited,
            PermissionStatus::Blocked,
        ] {
            assert!(!status.is_granted(), "{status} must not count as granted");
        }
    }
}

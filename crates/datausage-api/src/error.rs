use thiserror::Error;

/// Top-level error type for the `datausage-api` crate.
///
/// Covers every failure mode across the query, event, and permission
/// surfaces: linkage to the native module, caller-supplied argument
/// validation, native-layer rejections, and malformed counter replies.
/// The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Linkage ─────────────────────────────────────────────────────
    /// The native data-usage module is absent or was never attached.
    ///
    /// Raised at every entry point before any native call is attempted.
    /// Not recoverable by this layer.
    #[error(
        "The native data-usage module is not linked. \
         Attach a platform bridge before issuing queries."
    )]
    NotLinked,

    // ── Network type ────────────────────────────────────────────────
    /// The native layer returned a network-type code outside the known set.
    #[error("Unknown network type (code {code})")]
    UnknownNetworkType { code: i32 },

    // ── Query validation ────────────────────────────────────────────
    /// A required query argument was absent.
    ///
    /// A timestamp of `0` trips this check too -- see
    /// [`UsageQuery::new`](crate::model::UsageQuery::new) for why that
    /// quirk is kept.
    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    /// A query argument could not be read as a timestamp.
    #[error("Invalid value for {name}: '{value}' is not a numeric timestamp")]
    InvalidArgumentType { name: &'static str, value: String },

    /// `start` was greater than `end`.
    #[error("Invalid time range: start {start_ms} is after end {end_ms}")]
    InvalidRange { start_ms: i64, end_ms: i64 },

    // ── Native layer ────────────────────────────────────────────────
    /// The native layer rejected a call. The message is passed through
    /// verbatim; the original cause is not otherwise inspected.
    #[error("Native call failed: {message}")]
    Native { message: String },

    /// The native layer replied with a counter value that is not a
    /// decimal integer.
    #[error("Native layer returned a non-numeric counter: '{raw}'")]
    Counter { raw: String },
}

impl Error {
    /// Returns `true` if this error indicates the native module is missing
    /// and no call on this client can succeed.
    pub fn is_linkage(&self) -> bool {
        matches!(self, Self::NotLinked)
    }

    /// Returns `true` if this is a local precondition failure raised
    /// before any native round trip was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::InvalidArgumentType { .. }
                | Self::InvalidRange { .. }
        )
    }

    /// Returns `true` if the native layer itself failed or misbehaved.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. } | Self::Counter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_predicate_covers_precondition_variants() {
        assert!(Error::MissingArgument { name: "startTime" }.is_validation());
        assert!(
            Error::InvalidArgumentType {
                name: "endTime",
                value: "soon".into(),
            }
            .is_validation()
        );
        assert!(
            Error::InvalidRange {
                start_ms: 2000,
                end_ms: 1000,
            }
            .is_validation()
        );
        assert!(!Error::NotLinked.is_validation());
    }

    #[test]
    fn native_predicate_covers_remote_variants() {
        assert!(Error::Native { message: "boom".into() }.is_native());
        assert!(Error::Counter { raw: "NaN".into() }.is_native());
        assert!(!Error::UnknownNetworkType { code: 7 }.is_native());
    }

    #[test]
    fn messages_carry_context() {
        let err = Error::InvalidRange {
            start_ms: 2000,
            end_ms: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Invalid time range: start 2000 is after end 1000"
        );

        let err = Error::UnknownNetworkType { code: 9 };
        assert_eq!(err.to_string(), "Unknown network type (code 9)");
    }
}

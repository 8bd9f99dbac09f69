//! CLI error types with miette diagnostics.
//!
//! Maps `datausage_api::Error` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const LINKAGE: i32 = 3;
    pub const NATIVE: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("The native data-usage module is not linked")]
    #[diagnostic(
        code(datausage::not_linked),
        help("Attach a platform bridge before issuing queries.")
    )]
    NotLinked,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(datausage::validation))]
    Validation { field: String, reason: String },

    #[error("The native layer reported an unknown network type (code {code})")]
    #[diagnostic(
        code(datausage::unknown_network_type),
        help("The platform returned a code outside the known set (0 mobile, 1 wifi).")
    )]
    UnknownNetworkType { code: i32 },

    #[error("Native call failed: {message}")]
    #[diagnostic(code(datausage::native))]
    Native { message: String },

    #[error("No events arrived within {seconds}s")]
    #[diagnostic(
        code(datausage::watch_timeout),
        help("The event source went quiet; re-run `datausage watch`.")
    )]
    WatchTimeout { seconds: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotLinked => exit_code::LINKAGE,
            Self::UnknownNetworkType { .. } | Self::Native { .. } => exit_code::NATIVE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── api Error → CliError mapping ─────────────────────────────────────

impl From<datausage_api::Error> for CliError {
    fn from(err: datausage_api::Error) -> Self {
        use datausage_api::Error;

        match err {
            Error::NotLinked => Self::NotLinked,

            Error::MissingArgument { name } => Self::Validation {
                field: name.into(),
                reason: "required argument is missing (a timestamp of 0 counts as missing)".into(),
            },

            Error::InvalidArgumentType { name, value } => Self::Validation {
                field: name.into(),
                reason: format!("'{value}' is not a numeric timestamp"),
            },

            Error::InvalidRange { start_ms, end_ms } => Self::Validation {
                field: "start".into(),
                reason: format!("start {start_ms} is after end {end_ms}"),
            },

            Error::UnknownNetworkType { code } => Self::UnknownNetworkType { code },

            Error::Native { message } => Self::Native { message },

            Error::Counter { raw } => Self::Native {
                message: format!("non-numeric counter reply '{raw}'"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_partition_the_taxonomy() {
        assert_eq!(CliError::NotLinked.exit_code(), exit_code::LINKAGE);
        assert_eq!(
            CliError::Validation {
                field: "start".into(),
                reason: "bad".into(),
            }
            .exit_code(),
            exit_code::USAGE
        );
        assert_eq!(
            CliError::Native {
                message: "boom".into(),
            }
            .exit_code(),
            exit_code::NATIVE
        );
    }

    #[test]
    fn api_errors_map_to_diagnostics() {
        let err: CliError = datausage_api::Error::InvalidRange {
            start_ms: 2000,
            end_ms: 1000,
        }
        .into();
        assert!(matches!(err, CliError::Validation { .. }));

        let err: CliError = datausage_api::Error::NotLinked.into();
        assert!(matches!(err, CliError::NotLinked));
    }
}

use std::path::PathBuf;

use figaro_ledger::{KeyError, LedgerError};

use crate::validators::ValidationError;

/// Errors surfaced to the top-level boundary in `main`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Malformed command line, rendered by clap. Help and version requests land here too.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Returned when a value passed syntax checks but failed semantic resolution.
    #[error("Invalid value for '--{option}': {source}")]
    Validation {
        option: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("Network error: {0}")]
    Network(#[source] LedgerError),

    /// Returned when the ledger accepted the call but the contract refused it.
    #[error("Contract rejected the request: {0}")]
    Contract(#[source] LedgerError),

    #[error(transparent)]
    Ledger(LedgerError),

    #[error("Option '--{id}' is missing or is not {expected}")]
    Option {
        id: &'static str,
        expected: &'static str,
    },

    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from terminal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<LedgerError> for CliError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Network { .. }
            | LedgerError::HttpStatus { .. }
            | LedgerError::TaskJoin(_)
            | LedgerError::Rpc { .. } => Self::Network(err),
            LedgerError::Contract { .. } => Self::Contract(err),
            other => Self::Ledger(other),
        }
    }
}

impl CliError {
    /// Usage error in clap's format for a value the parser could not demand.
    pub(crate) fn missing_option(id: &str) -> Self {
        Self::Usage(clap::Error::raw(
            clap::error::ErrorKind::MissingRequiredArgument,
            format!(
                "the following required arguments were not provided:\n  --{id} <{}>\n",
                id.to_uppercase()
            ),
        ))
    }
}

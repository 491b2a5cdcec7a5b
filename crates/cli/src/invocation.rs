use std::fmt;
use std::path::{Path, PathBuf};

use figaro_contracts::{Amount, ContractQuery, Coordinate, LocationRect};
use figaro_ledger::{ConfirmationKey, SigningIdentity};

use crate::error::CliError;

/// Key bytes waiting for asynchronous derivation.
#[derive(Clone, PartialEq, Eq)]
pub enum PendingKey {
    Signing(Vec<u8>),
    Confirmation(Vec<u8>),
}

impl fmt::Debug for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing(_) => f.write_str("Signing(..)"),
            Self::Confirmation(_) => f.write_str("Confirmation(..)"),
        }
    }
}

/// Validated value of one option or positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Amount(Amount),
    Integer(i64),
    Text(String),
    Point(Coordinate),
    Rect(LocationRect),
    PublicKey(String),
    Query(ContractQuery),
    Path(PathBuf),
    Flag(bool),
    Pending(PendingKey),
    Identity(SigningIdentity),
    Confirmation(ConfirmationKey),
}

impl OptionValue {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Option values keyed by descriptor id, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(&'static str, OptionValue)>,
}

impl OptionMap {
    /// Inserts or replaces the value for `id`, keeping the original position.
    pub fn insert(&mut self, id: &'static str, value: OptionValue) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((id, value)),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OptionValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut OptionValue)> {
        self.entries.iter_mut().map(|(key, value)| (*key, value))
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or not text.
    pub fn text(&self, id: &'static str) -> Result<&str, CliError> {
        self.maybe_text(id)?.ok_or(CliError::Option {
            id,
            expected: "text",
        })
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is present but not text.
    pub fn maybe_text(&self, id: &'static str) -> Result<Option<&str>, CliError> {
        match self.get(id) {
            None => Ok(None),
            Some(OptionValue::Text(text) | OptionValue::PublicKey(text)) => Ok(Some(text)),
            Some(_) => Err(CliError::Option {
                id,
                expected: "text",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or not an amount.
    pub fn amount(&self, id: &'static str) -> Result<&Amount, CliError> {
        match self.get(id) {
            Some(OptionValue::Amount(amount)) => Ok(amount),
            _ => Err(CliError::Option {
                id,
                expected: "an amount",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is present but not an integer.
    pub fn maybe_integer(&self, id: &'static str) -> Result<Option<i64>, CliError> {
        match self.get(id) {
            None => Ok(None),
            Some(OptionValue::Integer(value)) => Ok(Some(*value)),
            Some(_) => Err(CliError::Option {
                id,
                expected: "an integer",
            }),
        }
    }

    /// Integer option that must fit an unsigned ledger id.
    ///
    /// # Errors
    /// Returns [`CliError::Option`] if `id` is present but negative or not an integer.
    pub fn maybe_id(&self, id: &'static str) -> Result<Option<u64>, CliError> {
        self.maybe_integer(id)?
            .map(|value| {
                u64::try_from(value).map_err(|_| CliError::Option {
                    id,
                    expected: "a non-negative integer",
                })
            })
            .transpose()
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or not an exact location.
    pub fn point(&self, id: &'static str) -> Result<Coordinate, CliError> {
        match self.get(id) {
            Some(OptionValue::Point(point)) => Ok(*point),
            _ => Err(CliError::Option {
                id,
                expected: "an exact location",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or not a rough location.
    pub fn rect(&self, id: &'static str) -> Result<LocationRect, CliError> {
        match self.get(id) {
            Some(OptionValue::Rect(rect)) => Ok(*rect),
            _ => Err(CliError::Option {
                id,
                expected: "a rough location",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or not a contract query.
    pub fn query(&self, id: &'static str) -> Result<ContractQuery, CliError> {
        match self.get(id) {
            Some(OptionValue::Query(query)) => Ok(*query),
            _ => Err(CliError::Option {
                id,
                expected: "a contract query",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is present but not a path.
    pub fn maybe_path(&self, id: &'static str) -> Result<Option<&Path>, CliError> {
        match self.get(id) {
            None => Ok(None),
            Some(OptionValue::Path(path)) => Ok(Some(path)),
            Some(_) => Err(CliError::Option {
                id,
                expected: "a path",
            }),
        }
    }

    /// Resolved signing identity. Pending secrets count as missing.
    ///
    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or still pending.
    pub fn identity(&self, id: &'static str) -> Result<&SigningIdentity, CliError> {
        match self.get(id) {
            Some(OptionValue::Identity(identity)) => Ok(identity),
            _ => Err(CliError::Option {
                id,
                expected: "a resolved signing key",
            }),
        }
    }

    /// # Errors
    /// Returns [`CliError::Option`] if `id` is absent or still pending.
    pub fn confirmation(&self, id: &'static str) -> Result<&ConfirmationKey, CliError> {
        match self.get(id) {
            Some(OptionValue::Confirmation(key)) => Ok(key),
            _ => Err(CliError::Option {
                id,
                expected: "a resolved confirmation key",
            }),
        }
    }

    /// Boolean switch, `false` when absent.
    #[must_use]
    pub fn flag(&self, id: &str) -> bool {
        matches!(self.get(id), Some(OptionValue::Flag(true)))
    }
}

/// One parsed command line: which command to run and with what.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub group: String,
    pub command: String,
    pub options: OptionMap,
    pub arguments: Vec<OptionValue>,
}

impl Invocation {
    /// `true` once no option or argument awaits derivation.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.options.iter().any(|(_, value)| value.is_pending())
            && !self.arguments.iter().any(OptionValue::is_pending)
    }
}

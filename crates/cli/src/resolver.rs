//! Two-phase command resolution: synchronous parsing against the registry,
//! then sequential derivation of pending keys.

use std::ffi::OsString;

use clap::ArgMatches;
use clap::error::ErrorKind;
use figaro_ledger::{KeyDeriver, KeyError};
use tracing::debug;

use crate::error::CliError;
use crate::invocation::{Invocation, OptionMap, OptionValue, PendingKey};
use crate::registry::{JSON_FLAG, Registry};
use crate::validators::ValidationError;

/// Matches `argv` against the registry and runs every validator.
///
/// No network or key derivation happens here; secret keys stay pending.
///
/// # Errors
/// Returns [`CliError::Usage`] for unknown or missing groups, commands and
/// flags, for missing required values and for validator failures.
pub fn parse_invocation<I, T>(registry: &Registry, argv: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = registry.to_command().try_get_matches_from(argv)?;

    let (group, group_matches) = matches
        .subcommand()
        .ok_or_else(|| missing_subcommand("command group"))?;
    let (command, leaf) = group_matches
        .subcommand()
        .ok_or_else(|| missing_subcommand("command"))?;

    let descriptor = registry
        .find(group, command)
        .ok_or_else(|| missing_subcommand("registered command"))?;

    let mut options = OptionMap::default();
    for option in &descriptor.options {
        let id = option.descriptor.id;
        if let Some(value) = matched_value(leaf, id)? {
            options.insert(id, value);
        }
    }

    let json = leaf
        .try_get_one::<bool>(JSON_FLAG)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);
    options.insert(JSON_FLAG, OptionValue::Flag(json));

    let mut arguments = Vec::with_capacity(descriptor.arguments.len());
    for argument in &descriptor.arguments {
        if let Some(value) = matched_value(leaf, argument.id)? {
            arguments.push(value);
        }
    }

    debug!(group, command, options = ?options.ids(), "Parsed invocation");

    Ok(Invocation {
        group: group.to_owned(),
        command: command.to_owned(),
        options,
        arguments,
    })
}

fn matched_value(matches: &ArgMatches, id: &'static str) -> Result<Option<OptionValue>, CliError> {
    matches
        .try_get_one::<OptionValue>(id)
        .map(|value| value.cloned())
        .map_err(|_| CliError::Option {
            id,
            expected: "a validated value",
        })
}

fn missing_subcommand(what: &str) -> CliError {
    CliError::Usage(clap::Error::raw(
        ErrorKind::MissingSubcommand,
        format!("a {what} is required\n"),
    ))
}

/// Replaces every pending value in declaration order, options before arguments.
///
/// Stops at the first failure; later pending values are never derived.
///
/// # Errors
/// Returns [`CliError::Validation`] naming the option whose key is unusable.
pub async fn resolve(
    mut invocation: Invocation,
    deriver: &dyn KeyDeriver,
) -> Result<Invocation, CliError> {
    for (id, value) in invocation.options.iter_mut() {
        let OptionValue::Pending(pending) = value else {
            continue;
        };

        *value = resolve_pending(id, pending, deriver).await?;
    }

    for value in &mut invocation.arguments {
        let OptionValue::Pending(pending) = value else {
            continue;
        };

        *value = resolve_pending("argument", pending, deriver).await?;
    }

    Ok(invocation)
}

async fn resolve_pending(
    id: &'static str,
    pending: &PendingKey,
    deriver: &dyn KeyDeriver,
) -> Result<OptionValue, CliError> {
    let resolved = match pending {
        PendingKey::Signing(secret) => deriver
            .signing_identity(secret)
            .await
            .map(OptionValue::Identity),
        PendingKey::Confirmation(secret) => deriver
            .confirmation_key(secret)
            .await
            .map(OptionValue::Confirmation),
    };

    resolved.map_err(|err| CliError::Validation {
        option: id,
        source: ValidationError::new(match err {
            KeyError::InvalidSecret(reason) => reason,
            other => other.to_string(),
        }),
    })
}

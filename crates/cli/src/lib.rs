#![warn(clippy::all, clippy::pedantic)]

//! Operator CLI for the figaro delivery escrow: parses one command line,
//! resolves its keys, runs the bound operation and presents the result.

use std::ffi::OsString;
use std::path::Path;

use figaro_ledger::{RpcConnector, Secp256k1Deriver};

pub mod commands;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod modules;
pub mod orchestrator;
pub mod registry;
pub mod resolver;
pub mod validators;

#[cfg(test)]
mod testing;

use commands::Context;
use error::CliError;
use modules::presenter::{Presenter, TerminalPresenter};
use modules::prompt::MaskedPrompt;
use modules::settings::Settings;
use registry::JSON_FLAG;

/// Runs one invocation end to end against the configured ledger.
///
/// # Errors
/// Returns the first usage, resolution, ledger or output failure.
pub async fn run<I, T>(argv: I, settings: &Settings, data_dir: &Path) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = resolver::parse_invocation(&registry::registry(), argv)?;
    let invocation =
        resolver::resolve(invocation, &Secp256k1Deriver::new(&settings.address_prefix)).await?;

    let connector = RpcConnector::new(&settings.api_url, &settings.gas_price, &settings.units.fee);
    let ctx = Context {
        settings,
        data_dir,
        connector: &connector,
        prompt: &MaskedPrompt,
    };

    let Some(report) = dispatch::dispatch(&invocation, &ctx).await? else {
        return Ok(());
    };

    TerminalPresenter::new(invocation.options.flag(JSON_FLAG), settings.logging).present(&report)
}

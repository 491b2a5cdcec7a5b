use std::path::Path;

use figaro_contracts::ExecuteMsg;
use figaro_ledger::{Connector, Ledger, TransactionOutcome};

use crate::error::CliError;
use crate::invocation::Invocation;
use crate::modules::presenter::Report;
use crate::modules::prompt::SecretPrompt;
use crate::modules::settings::Settings;

pub mod common;
pub mod courier;
pub mod sender;

/// Option ids shared by several commands.
pub(crate) const SECRET: &str = "secret";
pub(crate) const CONTRACT: &str = "contract";
pub(crate) const CONTRACT_CODE_ID: &str = "contract-code-id";

/// Collaborators available to every operation.
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub data_dir: &'a Path,
    pub connector: &'a dyn Connector,
    pub prompt: &'a dyn SecretPrompt,
}

/// Opens a ledger client for the invocation's signing identity.
pub(crate) async fn connect(
    ctx: &Context<'_>,
    invocation: &Invocation,
) -> Result<Box<dyn Ledger>, CliError> {
    let identity = invocation.options.identity(SECRET)?;

    Ok(ctx.connector.connect(identity).await?)
}

pub(crate) fn transaction_report(
    banner: &str,
    contract: &str,
    outcome: &TransactionOutcome,
) -> Report {
    Report::new(banner)
        .field("Contract Address", contract)
        .field("Transaction Hash", outcome.transaction_hash.as_str())
        .field("Gas Used", outcome.gas_used)
        .field("Logs", outcome.logs.clone())
}

/// Sends one escrow message to `--contract` signed by `--secret`.
pub(crate) async fn execute_on_contract(
    ctx: &Context<'_>,
    invocation: &Invocation,
    msg: ExecuteMsg,
    banner: &str,
) -> Result<Report, CliError> {
    let contract = invocation.options.text(CONTRACT)?;
    let ledger = connect(ctx, invocation).await?;

    let outcome = ledger
        .execute(contract, &serde_json::to_value(&msg)?)
        .await?;

    Ok(transaction_report(banner, contract, &outcome))
}

/// Either party withdraws from the delivery.
pub(crate) async fn cancel_delivery(
    ctx: &Context<'_>,
    invocation: &Invocation,
) -> Result<Report, CliError> {
    execute_on_contract(ctx, invocation, ExecuteMsg::CancelDelivery {}, "Delivery cancelled").await
}

use figaro_contracts::{ExecuteMsg, INSTANTIATE_LABEL, InstantiateMsg, LocationPair, PaymentKind};

use super::{
    CONTRACT, CONTRACT_CODE_ID, Context, cancel_delivery, connect, execute_on_contract,
    transaction_report,
};
use crate::error::CliError;
use crate::invocation::Invocation;
use crate::modules::presenter::Report;
use crate::orchestrator::pay_to_contract;

/// Creates a delivery request from the uploaded escrow code.
pub async fn instantiate(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let options = &invocation.options;

    let code_id = options
        .maybe_id(CONTRACT_CODE_ID)?
        .ok_or_else(|| CliError::missing_option(CONTRACT_CODE_ID))?;

    let from = options.rect("location-from")?;
    let to = options.rect("location-to")?;
    let msg = InstantiateMsg {
        location: LocationPair {
            from: from.to_contract_string(),
            to: to.to_contract_string(),
        },
        confirm_public_key: options.text("confirm-public")?.to_owned(),
        deposit_amount: options.amount("deposit")?.clone(),
        payment_amount: options.amount("payment")?.clone(),
        token_address: options.text("token")?.to_owned(),
    };

    let ledger = connect(ctx, invocation).await?;
    let created = ledger
        .instantiate(code_id, &serde_json::to_value(&msg)?, INSTANTIATE_LABEL)
        .await?;

    Ok(Report::new("Delivery request created")
        .field("Contract Address", created.contract_address.as_str())
        .field("Transaction Hash", created.transaction.transaction_hash.as_str())
        .field("Gas Used", created.transaction.gas_used))
}

/// The sender pays for shipping through the token allowance flow.
pub async fn make_payment(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let contract = invocation.options.text(CONTRACT)?;
    let ledger = connect(ctx, invocation).await?;

    let outcome = pay_to_contract(ledger.as_ref(), contract, PaymentKind::Payment).await?;

    Ok(transaction_report("Payment made", contract, &outcome))
}

pub async fn set_details(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let options = &invocation.options;

    let msg = ExecuteMsg::SetDetails {
        comment: options.text("comment")?.to_owned(),
        location: LocationPair {
            from: options.point("location-from")?.to_contract_string(),
            to: options.point("location-to")?.to_contract_string(),
        },
    };

    execute_on_contract(ctx, invocation, msg, "Delivery details set").await
}

pub async fn approve_parcel_issued(
    ctx: &Context<'_>,
    invocation: &Invocation,
) -> Result<Report, CliError> {
    execute_on_contract(ctx, invocation, ExecuteMsg::ParcelIssued {}, "Parcel issue approved").await
}

pub async fn cancel(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    cancel_delivery(ctx, invocation).await
}

//! Grant-then-act funding of the escrow contract.

use figaro_contracts::{ContractQuery, Cw20ExecuteMsg, Funds, PaymentKind, TokenInfo};
use figaro_ledger::{Ledger, LedgerError, TransactionOutcome};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::CliError;

/// Moves the required deposit or payment from the signer into `contract`.
///
/// 1. Reads `token_info` and `funds` from the escrow.
/// 2. Grants the escrow an allowance for exactly the required amount on the token.
/// 3. Calls the escrow action that pulls the funds.
///
/// The steps are not atomic. A failed third step leaves the allowance in place.
///
/// # Errors
/// Returns the first failing step's error. Later steps are not attempted.
pub async fn pay_to_contract(
    ledger: &dyn Ledger,
    contract: &str,
    kind: PaymentKind,
) -> Result<TransactionOutcome, CliError> {
    let token: TokenInfo = query_as(ledger, contract, ContractQuery::TokenInfo).await?;
    let funds: Funds = query_as(ledger, contract, ContractQuery::Funds).await?;
    let amount = funds.required(kind).clone();

    info!(
        payer = ledger.sender(),
        token = token.address(),
        spender = contract,
        %amount,
        "Increasing allowance for {kind}"
    );

    let allowance = Cw20ExecuteMsg::IncreaseAllowance {
        spender: contract.to_owned(),
        amount: amount.clone(),
    };
    ledger
        .execute(token.address(), &serde_json::to_value(&allowance)?)
        .await?;

    let action = serde_json::to_value(kind.action())?;
    match ledger.execute(contract, &action).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            warn!(
                token = token.address(),
                spender = contract,
                %amount,
                "The {kind} failed after the allowance was granted; the allowance stays in place"
            );
            Err(err.into())
        }
    }
}

/// Runs a named escrow query and decodes its answer.
pub(crate) async fn query_as<T: DeserializeOwned>(
    ledger: &dyn Ledger,
    contract: &str,
    query: ContractQuery,
) -> Result<T, CliError> {
    let answer = ledger.query_smart(contract, &query.to_msg()).await?;

    serde_json::from_value(answer)
        .map_err(|e| LedgerError::Decode(format!("{query} answer: {e}")).into())
}

use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode};
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any, Coin, Denom};
use serde_json::Value;

use crate::error::LedgerError;
use crate::keys::SigningIdentity;

/// Account state needed to sign the next transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    pub account_number: u64,
    pub sequence: u64,
}

pub fn execute_msg(
    sender: &AccountId,
    contract: &str,
    msg: &Value,
) -> Result<Any, LedgerError> {
    MsgExecuteContract {
        sender: sender.clone(),
        contract: parse_account(contract)?,
        msg: serde_json::to_vec(msg)?,
        funds: Vec::new(),
    }
    .to_any()
    .map_err(|e| LedgerError::Transaction(e.to_string()))
}

pub fn instantiate_msg(
    sender: &AccountId,
    code_id: u64,
    msg: &Value,
    label: &str,
) -> Result<Any, LedgerError> {
    MsgInstantiateContract {
        sender: sender.clone(),
        admin: None,
        code_id,
        label: Some(label.to_owned()),
        msg: serde_json::to_vec(msg)?,
        funds: Vec::new(),
    }
    .to_any()
    .map_err(|e| LedgerError::Transaction(e.to_string()))
}

pub fn store_code_msg(sender: &AccountId, wasm: Vec<u8>) -> Result<Any, LedgerError> {
    MsgStoreCode {
        sender: sender.clone(),
        wasm_byte_code: wasm,
        instantiate_permission: None,
    }
    .to_any()
    .map_err(|e| LedgerError::Transaction(e.to_string()))
}

/// Builds and signs a single-signer `SIGN_MODE_DIRECT` transaction.
pub fn sign(
    identity: &SigningIdentity,
    chain_id: &chain::Id,
    account: AccountState,
    msgs: Vec<Any>,
    gas: u64,
    fee_amount: u128,
    fee_denom: &Denom,
) -> Result<Vec<u8>, LedgerError> {
    let body = tx::Body::new(msgs, "", 0u32);

    let fee = Fee::from_amount_and_gas(
        Coin {
            denom: fee_denom.clone(),
            amount: fee_amount,
        },
        gas,
    );
    let auth_info =
        SignerInfo::single_direct(Some(identity.public_key()), account.sequence).auth_info(fee);

    let signing_key = identity.signing_key()?;

    SignDoc::new(&body, &auth_info, chain_id, account.account_number)
        .and_then(|doc| doc.sign(&signing_key))
        .and_then(|raw| raw.to_bytes())
        .map_err(|e| LedgerError::Transaction(e.to_string()))
}

pub fn parse_account(address: &str) -> Result<AccountId, LedgerError> {
    address
        .parse()
        .map_err(|e: cosmrs::ErrorReport| LedgerError::Transaction(format!("{address}: {e}")))
}

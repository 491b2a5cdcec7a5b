use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::LedgerError;
use crate::keys::SigningIdentity;

/// Result of a committed transaction, handed to the presenter as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionOutcome {
    pub transaction_hash: String,
    pub gas_used: u64,
    pub logs: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstantiateOutcome {
    pub contract_address: String,
    pub transaction: TransactionOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub code_id: u64,
    pub transaction: TransactionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub denom: String,
    pub amount: String,
}

/// Signing client bound to one identity for the lifetime of an invocation.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Bech32 address of the identity paying for transactions.
    fn sender(&self) -> &str;

    /// Runs a smart query against a contract and returns its JSON answer.
    async fn query_smart(&self, contract: &str, query: &Value) -> Result<Value, LedgerError>;

    /// Signs, broadcasts and waits for an execute message.
    async fn execute(&self, contract: &str, msg: &Value) -> Result<TransactionOutcome, LedgerError>;

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
    ) -> Result<InstantiateOutcome, LedgerError>;

    async fn upload(&self, wasm: Vec<u8>) -> Result<UploadOutcome, LedgerError>;

    /// Addresses of every contract instantiated from `code_id`.
    async fn contracts_by_code(&self, code_id: u64) -> Result<Vec<String>, LedgerError>;

    async fn balance(&self, address: &str, denom: &str) -> Result<Balance, LedgerError>;
}

/// Opens a fresh [`Ledger`] for an identity.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, identity: &SigningIdentity) -> Result<Box<dyn Ledger>, LedgerError>;
}

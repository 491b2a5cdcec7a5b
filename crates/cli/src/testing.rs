//! Recording doubles for the ledger and terminal collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use figaro_ledger::{
    Balance, Connector, InstantiateOutcome, Ledger, LedgerError, SigningIdentity,
    TransactionOutcome, UploadOutcome,
};
use serde_json::{Value, json};

use crate::error::CliError;
use crate::modules::prompt::SecretPrompt;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query { contract: String, query: Value },
    Execute { contract: String, msg: Value },
    Instantiate { code_id: u64, msg: Value, label: String },
    Upload { size: usize },
    ContractsByCode(u64),
    Balance { address: String, denom: String },
}

impl Call {
    pub fn query(contract: &str, query: Value) -> Self {
        Self::Query {
            contract: contract.to_owned(),
            query,
        }
    }

    pub fn execute(contract: &str, msg: Value) -> Self {
        Self::Execute {
            contract: contract.to_owned(),
            msg,
        }
    }
}

fn rejected(reason: &str) -> LedgerError {
    LedgerError::Contract {
        code: 5,
        codespace: "wasm".to_owned(),
        log: reason.to_owned(),
    }
}

/// In-memory ledger answering canned queries and recording every call.
#[derive(Debug, Default)]
pub struct RecordingLedger {
    calls: Mutex<Vec<Call>>,
    answers: HashMap<(String, String), Value>,
    failing: Vec<String>,
    contracts: Vec<String>,
    executed: AtomicUsize,
}

impl RecordingLedger {
    pub const SENDER: &'static str = "wasm1sender";

    #[must_use]
    pub fn with_query(mut self, contract: &str, name: &str, answer: Value) -> Self {
        self.answers
            .insert((contract.to_owned(), name.to_owned()), answer);
        self
    }

    #[must_use]
    pub fn failing_execute(mut self, contract: &str) -> Self {
        self.failing.push(contract.to_owned());
        self
    }

    #[must_use]
    pub fn with_contracts(mut self, contracts: &[&str]) -> Self {
        self.contracts = contracts.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn executed_contracts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute { contract, .. } => Some(contract),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock").push(call);
    }

    fn outcome(&self) -> TransactionOutcome {
        let n = self.executed.fetch_add(1, Ordering::SeqCst) + 1;
        TransactionOutcome {
            transaction_hash: format!("TX{n}"),
            gas_used: 1000 * n as u64,
            logs: json!([{"msg_index": 0}]),
        }
    }
}

#[async_trait]
impl Ledger for RecordingLedger {
    fn sender(&self) -> &str {
        Self::SENDER
    }

    async fn query_smart(&self, contract: &str, query: &Value) -> Result<Value, LedgerError> {
        self.record(Call::query(contract, query.clone()));

        let name = query
            .as_object()
            .and_then(|o| o.keys().next())
            .cloned()
            .unwrap_or_default();
        self.answers
            .get(&(contract.to_owned(), name))
            .cloned()
            .ok_or_else(|| rejected("unknown query"))
    }

    async fn execute(&self, contract: &str, msg: &Value) -> Result<TransactionOutcome, LedgerError> {
        self.record(Call::execute(contract, msg.clone()));

        if self.failing.iter().any(|c| c == contract) {
            return Err(rejected("execution rejected"));
        }
        Ok(self.outcome())
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
    ) -> Result<InstantiateOutcome, LedgerError> {
        self.record(Call::Instantiate {
            code_id,
            msg: msg.clone(),
            label: label.to_owned(),
        });
        Ok(InstantiateOutcome {
            contract_address: "wasm1created".to_owned(),
            transaction: self.outcome(),
        })
    }

    async fn upload(&self, wasm: Vec<u8>) -> Result<UploadOutcome, LedgerError> {
        self.record(Call::Upload { size: wasm.len() });
        Ok(UploadOutcome {
            code_id: 42,
            transaction: self.outcome(),
        })
    }

    async fn contracts_by_code(&self, code_id: u64) -> Result<Vec<String>, LedgerError> {
        self.record(Call::ContractsByCode(code_id));
        Ok(self.contracts.clone())
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<Balance, LedgerError> {
        self.record(Call::Balance {
            address: address.to_owned(),
            denom: denom.to_owned(),
        });
        Ok(Balance {
            denom: denom.to_owned(),
            amount: if denom == "ustake" { "1000" } else { "25" }.to_owned(),
        })
    }
}

/// Forwards trait calls to a shared [`RecordingLedger`].
struct SharedLedger(Arc<RecordingLedger>);

#[async_trait]
impl Ledger for SharedLedger {
    fn sender(&self) -> &str {
        self.0.sender()
    }

    async fn query_smart(&self, contract: &str, query: &Value) -> Result<Value, LedgerError> {
        self.0.query_smart(contract, query).await
    }

    async fn execute(&self, contract: &str, msg: &Value) -> Result<TransactionOutcome, LedgerError> {
        self.0.execute(contract, msg).await
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
    ) -> Result<InstantiateOutcome, LedgerError> {
        self.0.instantiate(code_id, msg, label).await
    }

    async fn upload(&self, wasm: Vec<u8>) -> Result<UploadOutcome, LedgerError> {
        self.0.upload(wasm).await
    }

    async fn contracts_by_code(&self, code_id: u64) -> Result<Vec<String>, LedgerError> {
        self.0.contracts_by_code(code_id).await
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<Balance, LedgerError> {
        self.0.balance(address, denom).await
    }
}

/// Connector handing out the same recording ledger on every connect.
pub struct RecordingConnector {
    pub ledger: Arc<RecordingLedger>,
    connected: Mutex<Vec<String>>,
}

impl RecordingConnector {
    pub fn new(ledger: RecordingLedger) -> Self {
        Self {
            ledger: Arc::new(ledger),
            connected: Mutex::new(Vec::new()),
        }
    }

    /// Addresses of the identities that connected.
    pub fn connections(&self) -> Vec<String> {
        self.connected.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, identity: &SigningIdentity) -> Result<Box<dyn Ledger>, LedgerError> {
        self.connected
            .lock()
            .expect("lock")
            .push(identity.address());
        Ok(Box::new(SharedLedger(Arc::clone(&self.ledger))))
    }
}

/// Prompt returning a fixed answer.
pub struct StaticPrompt(pub &'static str);

impl SecretPrompt for StaticPrompt {
    fn read_secret(&self, _prompt: &str) -> Result<String, CliError> {
        Ok(self.0.to_owned())
    }
}

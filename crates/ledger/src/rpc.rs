//! Tendermint JSON-RPC client for a CosmWasm chain.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cosmrs::proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use cosmrs::proto::cosmos::bank::v1beta1::{QueryBalanceRequest, QueryBalanceResponse};
use cosmrs::proto::cosmos::base::query::v1beta1::PageRequest;
use cosmrs::proto::cosmos::tx::v1beta1::{SimulateRequest, SimulateResponse};
use cosmrs::proto::cosmwasm::wasm::v1::{
    QueryContractsByCodeRequest, QueryContractsByCodeResponse, QuerySmartContractStateRequest,
    QuerySmartContractStateResponse,
};
use cosmrs::tendermint::chain;
use cosmrs::{Any, Denom};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::client::{
    Balance, Connector, InstantiateOutcome, Ledger, TransactionOutcome, UploadOutcome,
};
use crate::error::LedgerError;
use crate::keys::SigningIdentity;
use crate::tx::{self, AccountState};

/// Margin applied on top of simulated gas.
pub const GAS_ADJUSTMENT: f64 = 1.3;

const CONTRACTS_PAGE_LIMIT: u64 = 100;

/// Price of one gas unit in the fee denomination.
#[derive(Debug, Clone, PartialEq)]
pub struct GasPrice {
    amount: f64,
    denom: Denom,
}

impl GasPrice {
    /// # Errors
    /// Returns error if `amount` is not a non-negative finite number or the denom is malformed.
    pub fn parse(amount: &str, denom: &str) -> Result<Self, LedgerError> {
        let value = amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| LedgerError::InvalidGasPrice(amount.to_owned()))?;

        let denom = denom
            .parse()
            .map_err(|_| LedgerError::InvalidGasPrice(format!("{amount}{denom}")))?;

        Ok(Self {
            amount: value,
            denom,
        })
    }

    #[must_use]
    pub const fn denom(&self) -> &Denom {
        &self.denom
    }

    /// Fee for `gas` units, rounded up.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn fee_for(&self, gas: u64) -> u128 {
        (gas as f64 * self.amount).ceil() as u128
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn adjusted_gas(simulated: u64) -> u64 {
    (simulated as f64 * GAS_ADJUSTMENT).ceil() as u64
}

/// Opens an [`RpcClient`] against one node.
#[derive(Debug, Clone)]
pub struct RpcConnector {
    url: String,
    gas_price: String,
    fee_denom: String,
}

impl RpcConnector {
    #[must_use]
    pub fn new(url: &str, gas_price: &str, fee_denom: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            gas_price: gas_price.to_owned(),
            fee_denom: fee_denom.to_owned(),
        }
    }
}

#[async_trait]
impl Connector for RpcConnector {
    async fn connect(&self, identity: &SigningIdentity) -> Result<Box<dyn Ledger>, LedgerError> {
        let gas_price = GasPrice::parse(&self.gas_price, &self.fee_denom)?;

        let status = rpc_call(&self.url, "status", json!({})).await?;
        let chain_id = status
            .pointer("/node_info/network")
            .and_then(Value::as_str)
            .ok_or_else(|| LedgerError::UnexpectedResponse {
                context: "status".to_owned(),
                detail: "missing node_info.network".to_owned(),
            })?
            .parse::<chain::Id>()
            .map_err(|e| LedgerError::Decode(e.to_string()))?;

        info!(url = %self.url, %chain_id, sender = %identity.address(), "Connected to ledger");

        Ok(Box::new(RpcClient {
            url: self.url.clone(),
            chain_id,
            identity: identity.clone(),
            sender: identity.address(),
            gas_price,
        }))
    }
}

/// Signing client for one identity on one chain.
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    chain_id: chain::Id,
    identity: SigningIdentity,
    sender: String,
    gas_price: GasPrice,
}

impl RpcClient {
    async fn abci_query<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, LedgerError>
    where
        Req: prost::Message,
        Resp: prost::Message + Default,
    {
        let params = json!({
            "path": path,
            "data": hex::encode(request.encode_to_vec()),
            "prove": false,
        });

        let result: AbciQueryResult =
            decode_result(rpc_call(&self.url, "abci_query", params).await?)?;
        let response = result.response;

        if response.code != 0 {
            return Err(LedgerError::Contract {
                code: response.code,
                codespace: response.codespace,
                log: response.log,
            });
        }

        let value = match response.value {
            Some(encoded) => STANDARD.decode(encoded)?,
            None => Vec::new(),
        };

        Ok(Resp::decode(value.as_slice())?)
    }

    async fn account(&self) -> Result<AccountState, LedgerError> {
        let response: QueryAccountResponse = self
            .abci_query(
                "/cosmos.auth.v1beta1.Query/Account",
                &QueryAccountRequest {
                    address: self.sender.clone(),
                },
            )
            .await?;

        let any = response
            .account
            .ok_or_else(|| LedgerError::UnexpectedResponse {
                context: "account".to_owned(),
                detail: format!("no account for {}", self.sender),
            })?;
        let account = <BaseAccount as prost::Message>::decode(any.value.as_slice())?;

        Ok(AccountState {
            account_number: account.account_number,
            sequence: account.sequence,
        })
    }

    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<u64, LedgerError> {
        #[allow(deprecated)]
        let request = SimulateRequest { tx: None, tx_bytes };

        let response: SimulateResponse = self
            .abci_query("/cosmos.tx.v1beta1.Service/Simulate", &request)
            .await?;

        response
            .gas_info
            .map(|info| info.gas_used)
            .ok_or_else(|| LedgerError::UnexpectedResponse {
                context: "simulate".to_owned(),
                detail: "missing gas_info".to_owned(),
            })
    }

    /// Simulates, signs with the adjusted fee and waits for the block commit.
    async fn submit(&self, msgs: Vec<Any>) -> Result<CommittedTx, LedgerError> {
        let account = self.account().await?;
        let denom = self.gas_price.denom();

        let probe = tx::sign(
            &self.identity,
            &self.chain_id,
            account,
            msgs.clone(),
            0,
            0,
            denom,
        )?;
        let gas = adjusted_gas(self.simulate(probe).await?);
        let fee = self.gas_price.fee_for(gas);

        debug!(gas, fee = %fee, sequence = account.sequence, "Signing transaction");

        let signed = tx::sign(&self.identity, &self.chain_id, account, msgs, gas, fee, denom)?;
        let params = json!({ "tx": STANDARD.encode(signed) });

        let committed: CommittedTx =
            decode_result(rpc_call(&self.url, "broadcast_tx_commit", params).await?)?;
        committed.ensure_success()?;

        info!(
            hash = %committed.hash,
            gas_used = committed.tx_result.gas_used,
            "Transaction committed"
        );

        Ok(committed)
    }
}

#[async_trait]
impl Ledger for RpcClient {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn query_smart(&self, contract: &str, query: &Value) -> Result<Value, LedgerError> {
        let response: QuerySmartContractStateResponse = self
            .abci_query(
                "/cosmwasm.wasm.v1.Query/SmartContractState",
                &QuerySmartContractStateRequest {
                    address: contract.to_owned(),
                    query_data: serde_json::to_vec(query)?,
                },
            )
            .await?;

        Ok(serde_json::from_slice(&response.data)?)
    }

    async fn execute(&self, contract: &str, msg: &Value) -> Result<TransactionOutcome, LedgerError> {
        let any = tx::execute_msg(self.identity.account_id(), contract, msg)?;

        Ok(self.submit(vec![any]).await?.into_outcome())
    }

    async fn instantiate(
        &self,
        code_id: u64,
        msg: &Value,
        label: &str,
    ) -> Result<InstantiateOutcome, LedgerError> {
        let any = tx::instantiate_msg(self.identity.account_id(), code_id, msg, label)?;
        let committed = self.submit(vec![any]).await?;

        let contract_address = committed
            .attribute("instantiate", "_contract_address")
            .ok_or_else(|| LedgerError::UnexpectedResponse {
                context: "instantiate".to_owned(),
                detail: "no _contract_address attribute".to_owned(),
            })?
            .to_owned();

        Ok(InstantiateOutcome {
            contract_address,
            transaction: committed.into_outcome(),
        })
    }

    async fn upload(&self, wasm: Vec<u8>) -> Result<UploadOutcome, LedgerError> {
        let any = tx::store_code_msg(self.identity.account_id(), wasm)?;
        let committed = self.submit(vec![any]).await?;

        let code_id = committed
            .attribute("store_code", "code_id")
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| LedgerError::UnexpectedResponse {
                context: "store_code".to_owned(),
                detail: "no numeric code_id attribute".to_owned(),
            })?;

        Ok(UploadOutcome {
            code_id,
            transaction: committed.into_outcome(),
        })
    }

    async fn contracts_by_code(&self, code_id: u64) -> Result<Vec<String>, LedgerError> {
        let mut contracts = Vec::new();
        let mut key = Vec::new();

        loop {
            let response: QueryContractsByCodeResponse = self
                .abci_query(
                    "/cosmwasm.wasm.v1.Query/ContractsByCode",
                    &QueryContractsByCodeRequest {
                        code_id,
                        pagination: Some(PageRequest {
                            key,
                            offset: 0,
                            limit: CONTRACTS_PAGE_LIMIT,
                            count_total: false,
                            reverse: false,
                        }),
                    },
                )
                .await?;

            contracts.extend(response.contracts);

            match response.pagination {
                Some(page) if !page.next_key.is_empty() => key = page.next_key,
                _ => break,
            }
        }

        Ok(contracts)
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<Balance, LedgerError> {
        let response: QueryBalanceResponse = self
            .abci_query(
                "/cosmos.bank.v1beta1.Query/Balance",
                &QueryBalanceRequest {
                    address: address.to_owned(),
                    denom: denom.to_owned(),
                },
            )
            .await?;

        Ok(response.balance.map_or_else(
            || Balance {
                denom: denom.to_owned(),
                amount: "0".to_owned(),
            },
            |coin| Balance {
                denom: coin.denom,
                amount: coin.amount,
            },
        ))
    }
}

/// Posts one JSON-RPC request and returns its `result`.
async fn rpc_call(url: &str, method: &str, params: Value) -> Result<Value, LedgerError> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });

    debug!(url, method, "RPC request");

    let target = url.to_owned();
    let response = tokio::task::spawn_blocking(move || {
        minreq::post(&target)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string())
            .send()
    })
    .await
    .map_err(|e| LedgerError::TaskJoin(e.to_string()))?
    .map_err(|source| LedgerError::Network {
        url: url.to_owned(),
        source,
    })?;

    let text = response
        .as_str()
        .map_err(|source| LedgerError::Network {
            url: url.to_owned(),
            source,
        })?
        .to_owned();

    if !(200..300).contains(&response.status_code) {
        return Err(LedgerError::HttpStatus {
            url: url.to_owned(),
            status: response.status_code,
            body: text,
        });
    }

    parse_envelope(&text)
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

fn parse_envelope(text: &str) -> Result<Value, LedgerError> {
    let envelope: RpcEnvelope = serde_json::from_str(text)?;

    if let Some(error) = envelope.error {
        let message = match error.data {
            Some(data) if !data.is_empty() => format!("{}: {data}", error.message),
            _ => error.message,
        };
        return Err(LedgerError::Rpc {
            code: error.code,
            message,
        });
    }

    envelope.result.ok_or_else(|| LedgerError::UnexpectedResponse {
        context: "JSON-RPC".to_owned(),
        detail: "neither result nor error present".to_owned(),
    })
}

fn decode_result<T: DeserializeOwned>(result: Value) -> Result<T, LedgerError> {
    Ok(serde_json::from_value(result)?)
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciQueryResponse,
}

#[derive(Debug, Deserialize)]
struct AbciQueryResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    value: Option<String>,
}

/// `broadcast_tx_commit` result.
#[derive(Debug, Deserialize)]
struct CommittedTx {
    #[serde(default)]
    check_tx: TxResult,
    #[serde(alias = "deliver_tx")]
    tx_result: TxResult,
    hash: String,
}

#[derive(Debug, Default, Deserialize)]
struct TxResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    codespace: String,
    #[serde(default, deserialize_with = "number_or_string")]
    gas_used: u64,
    #[serde(default)]
    events: Vec<TxEvent>,
}

impl TxResult {
    fn ensure_success(&self) -> Result<(), LedgerError> {
        if self.code == 0 {
            return Ok(());
        }

        Err(LedgerError::Contract {
            code: self.code,
            codespace: self.codespace.clone(),
            log: self.log.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct TxEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attributes: Vec<TxAttribute>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct TxAttribute {
    key: String,
    #[serde(default)]
    value: String,
}

impl CommittedTx {
    fn ensure_success(&self) -> Result<(), LedgerError> {
        self.check_tx.ensure_success()?;
        self.tx_result.ensure_success()
    }

    fn attribute(&self, event: &str, key: &str) -> Option<&str> {
        self.tx_result
            .events
            .iter()
            .filter(|e| e.kind == event)
            .flat_map(|e| e.attributes.iter())
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Structured log when the node still emits one, the event list otherwise.
    fn logs(&self) -> Value {
        match serde_json::from_str::<Value>(&self.tx_result.log) {
            Ok(logs @ Value::Array(_)) => logs,
            _ => serde_json::to_value(&self.tx_result.events).unwrap_or(Value::Null),
        }
    }

    fn into_outcome(self) -> TransactionOutcome {
        TransactionOutcome {
            logs: self.logs(),
            gas_used: self.tx_result.gas_used,
            transaction_hash: self.hash,
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

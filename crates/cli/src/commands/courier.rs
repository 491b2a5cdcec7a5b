use figaro_contracts::{ContractQuery, ExecuteMsg, Funds, PaymentKind, TokenInfo};
use figaro_ledger::Ledger;
use serde_json::{Value, json};
use tracing::info;

use super::{
    CONTRACT, CONTRACT_CODE_ID, Context, cancel_delivery, connect, execute_on_contract,
    transaction_report,
};
use crate::error::CliError;
use crate::invocation::Invocation;
use crate::modules::presenter::Report;
use crate::orchestrator::{pay_to_contract, query_as};

const NOT_APPLIED: &str = "Not applied";

/// Delivery request as shown to couriers.
#[derive(Debug, Clone, PartialEq)]
struct DeliveryRequest {
    address: String,
    status: Value,
    locations: Value,
    courier: Value,
    funds: Funds,
    token: TokenInfo,
}

impl DeliveryRequest {
    async fn fetch(ledger: &dyn Ledger, address: &str) -> Result<Self, CliError> {
        let token: TokenInfo = query_as(ledger, address, ContractQuery::TokenInfo).await?;
        let locations = query_as(ledger, address, ContractQuery::Locations).await?;
        let courier = query_as(ledger, address, ContractQuery::Courier).await?;
        let status = query_as(ledger, address, ContractQuery::Status).await?;
        let funds: Funds = query_as(ledger, address, ContractQuery::Funds).await?;

        Ok(Self {
            address: address.to_owned(),
            status,
            locations,
            courier,
            funds,
            token,
        })
    }

    fn status_label(&self) -> String {
        match &self.status {
            Value::String(status) => status.clone(),
            other => other.to_string(),
        }
    }

    /// Whether no courier has applied yet: the escrow answers null, `""` or `[]`.
    fn unassigned(&self) -> bool {
        match &self.courier {
            Value::Null => true,
            Value::String(courier) => courier.is_empty(),
            Value::Array(couriers) => couriers.is_empty(),
            _ => false,
        }
    }

    fn courier_label(&self) -> Value {
        if self.unassigned() {
            Value::from(NOT_APPLIED)
        } else {
            self.courier.clone()
        }
    }

    /// Rough pickup and drop-off areas, the only ones a courier sees before acceptance.
    fn locations_label(&self) -> Value {
        let rough = self.locations.get("rough").unwrap_or(&self.locations);
        match (rough.get("from"), rough.get("to")) {
            (Some(from), Some(to)) => Value::from(format!("from: {from}, to: {to}")),
            _ => self.locations.clone(),
        }
    }

    fn token_label(&self) -> String {
        let name = self
            .token
            .info()
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("-");
        format!("name: {name}, address: {}", self.token.address())
    }

    fn token_json(&self) -> Value {
        let mut token = serde_json::Map::new();
        token.insert("address".to_owned(), Value::from(self.token.address()));
        if let Value::Object(info) = self.token.info() {
            for (key, value) in info {
                token.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        Value::Object(token)
    }

    fn to_json(&self) -> Value {
        json!({
            "address": self.address,
            "status": self.status,
            "locations": self.locations,
            "courier": self.courier,
            "funds": {
                "deposit": self.funds.deposit.as_str(),
                "payment": self.funds.payment.as_str(),
            },
            "token": self.token_json(),
        })
    }
}

/// Lists every escrow instantiated from `--contract-code-id`.
pub async fn requests_list(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let code_id = invocation
        .options
        .maybe_id(CONTRACT_CODE_ID)?
        .ok_or_else(|| CliError::missing_option(CONTRACT_CODE_ID))?;

    let ledger = connect(ctx, invocation).await?;
    let addresses = ledger.contracts_by_code(code_id).await?;
    info!(code_id, count = addresses.len(), "Fetching delivery requests");

    let mut requests = Vec::with_capacity(addresses.len());
    for address in &addresses {
        requests.push(DeliveryRequest::fetch(ledger.as_ref(), address).await?);
    }

    let banner = format!("Delivery requests for code {code_id}: {}", requests.len());
    let listing = Value::Array(requests.iter().map(DeliveryRequest::to_json).collect());

    let report = requests
        .iter()
        .fold(Report::new(banner), |report, request| {
            report
                .section(format!("[{}] {}", request.status_label(), request.address))
                .field("Locations", request.locations_label())
                .field("Courier", request.courier_label())
                .field(
                    "Funds",
                    format!(
                        "deposit: {}, payment: {}",
                        request.funds.deposit, request.funds.payment
                    ),
                )
                .field("Token", request.token_label())
        })
        .with_listing(listing);

    Ok(report)
}

pub async fn accept_request(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    execute_on_contract(ctx, invocation, ExecuteMsg::AcceptApplication {}, "Request accepted").await
}

/// The courier locks the collateral through the token allowance flow.
pub async fn make_deposit(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let contract = invocation.options.text(CONTRACT)?;
    let ledger = connect(ctx, invocation).await?;

    let outcome = pay_to_contract(ledger.as_ref(), contract, PaymentKind::Deposit).await?;

    Ok(transaction_report("Deposit made", contract, &outcome))
}

/// Signs the contract address with the confirmation key and submits it.
pub async fn confirm_delivery(
    ctx: &Context<'_>,
    invocation: &Invocation,
) -> Result<Report, CliError> {
    let contract = invocation.options.text(CONTRACT)?;
    let sign = invocation
        .options
        .confirmation("confirm-private")?
        .sign_contract(contract)?;

    execute_on_contract(
        ctx,
        invocation,
        ExecuteMsg::ConfirmDelivery { sign },
        "Delivery confirmed",
    )
    .await
}

pub async fn cancel(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    cancel_delivery(ctx, invocation).await
}

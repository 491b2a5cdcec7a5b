//! JSON messages understood by the escrow contract and the cw20 token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::Amount;

/// Label attached to every escrow instance on the ledger.
pub const INSTANTIATE_LABEL: &str = "delivery-request";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationPair {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstantiateMsg {
    pub location: LocationPair,
    pub confirm_public_key: String,
    pub deposit_amount: Amount,
    pub payment_amount: Amount,
    pub token_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SetDetails {
        comment: String,
        location: LocationPair,
    },
    ParcelIssued {},
    AcceptApplication {},
    MakeDepositForShipping {},
    MakePayForShipping {},
    ConfirmDelivery {
        sign: String,
    },
    CancelDelivery {},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    IncreaseAllowance { spender: String, amount: Amount },
}

/// Read-only queries exposed by the escrow contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractQuery {
    TokenInfo,
    Status,
    Courier,
    Funds,
    Locations,
}

impl ContractQuery {
    pub const NAMES: [&'static str; 5] = ["token_info", "status", "courier", "funds", "locations"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TokenInfo => "token_info",
            Self::Status => "status",
            Self::Courier => "courier",
            Self::Funds => "funds",
            Self::Locations => "locations",
        }
    }

    /// Query body `{"<name>": {}}`.
    #[must_use]
    pub fn to_msg(self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.as_str().to_owned(), Value::Object(serde_json::Map::new()));
        Value::Object(body)
    }
}

impl fmt::Display for ContractQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractQuery {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "token_info" => Ok(Self::TokenInfo),
            "status" => Ok(Self::Status),
            "courier" => Ok(Self::Courier),
            "funds" => Ok(Self::Funds),
            "locations" => Ok(Self::Locations),
            other => Err(other.to_owned()),
        }
    }
}

/// `token_info` answer: the cw20 address followed by the token's own info.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenInfo(pub String, pub Value);

impl TokenInfo {
    #[must_use]
    pub fn address(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub const fn info(&self) -> &Value {
        &self.1
    }
}

/// `funds` answer: amounts each party has to move into the escrow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Funds {
    pub deposit: Amount,
    pub payment: Amount,
}

impl Funds {
    #[must_use]
    pub const fn required(&self, kind: PaymentKind) -> &Amount {
        match kind {
            PaymentKind::Deposit => &self.deposit,
            PaymentKind::Payment => &self.payment,
        }
    }
}

/// Which side of the escrow a paying action funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    /// Courier collateral.
    Deposit,
    /// Sender's payment for shipping.
    Payment,
}

impl PaymentKind {
    #[must_use]
    pub const fn action(self) -> ExecuteMsg {
        match self {
            Self::Deposit => ExecuteMsg::MakeDepositForShipping {},
            Self::Payment => ExecuteMsg::MakePayForShipping {},
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deposit => "deposit",
            Self::Payment => "payment",
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn execute_messages_are_externally_tagged() {
        let msg = ExecuteMsg::SetDetails {
            comment: "fragile".to_owned(),
            location: LocationPair {
                from: "[1,2]".to_owned(),
                to: "[3,4]".to_owned(),
            },
        };

        assert_eq!(
            serde_json::to_value(&msg).expect("json"),
            json!({"set_details": {"comment": "fragile", "location": {"from": "[1,2]", "to": "[3,4]"}}})
        );
        assert_eq!(
            serde_json::to_value(ExecuteMsg::ParcelIssued {}).expect("json"),
            json!({"parcel_issued": {}})
        );
    }

    #[test]
    fn payment_kinds_map_to_escrow_actions() {
        assert_eq!(
            serde_json::to_value(PaymentKind::Deposit.action()).expect("json"),
            json!({"make_deposit_for_shipping": {}})
        );
        assert_eq!(
            serde_json::to_value(PaymentKind::Payment.action()).expect("json"),
            json!({"make_pay_for_shipping": {}})
        );
    }

    #[test]
    fn allowance_amount_is_a_string() {
        let msg = Cw20ExecuteMsg::IncreaseAllowance {
            spender: "wasm1escrow".to_owned(),
            amount: "10".parse().expect("amount"),
        };

        assert_eq!(
            serde_json::to_value(&msg).expect("json"),
            json!({"increase_allowance": {"spender": "wasm1escrow", "amount": "10"}})
        );
    }

    #[test]
    fn query_names_round_trip() {
        for name in ContractQuery::NAMES {
            let query: ContractQuery = name.parse().expect("known query");
            let mut expected = serde_json::Map::new();
            expected.insert(name.to_owned(), json!({}));
            assert_eq!(query.to_msg(), Value::Object(expected));
        }
        assert!("balance".parse::<ContractQuery>().is_err());
    }

    #[test]
    fn decodes_token_info_and_funds() {
        let token: TokenInfo =
            serde_json::from_value(json!(["wasm1token", {"name": "Figaro"}])).expect("token");
        assert_eq!(token.address(), "wasm1token");
        assert_eq!(token.info()["name"], "Figaro");

        let funds: Funds =
            serde_json::from_value(json!({"deposit": "10", "payment": "5"})).expect("funds");
        assert_eq!(funds.required(PaymentKind::Payment).as_str(), "5");
    }
}

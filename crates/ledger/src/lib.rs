#![warn(clippy::all, clippy::pedantic)]

//! Ledger access for the figaro CLI: a Tendermint JSON-RPC client that signs
//! CosmWasm transactions, plus the secp256k1 key handling around it.

mod client;
mod error;
pub mod keys;
mod rpc;
mod tx;

pub use client::{Balance, Connector, InstantiateOutcome, Ledger, TransactionOutcome, UploadOutcome};
pub use error::{KeyError, LedgerError};
pub use keys::{ConfirmationKey, DerivedKeys, KeyDeriver, Secp256k1Deriver, SigningIdentity};
pub use rpc::{GasPrice, RpcClient, RpcConnector};

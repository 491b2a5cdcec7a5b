#![warn(clippy::all, clippy::pedantic)]

//! Message types and domain values for the figaro delivery escrow contract
//! and the cw20 token it pulls funds from.

mod amount;
mod error;
mod location;
pub mod msg;

pub use amount::Amount;
pub use error::{AmountError, LocationError};
pub use location::{Coordinate, LocationRect};
pub use msg::{
    ContractQuery, Cw20ExecuteMsg, ExecuteMsg, Funds, INSTANTIATE_LABEL, InstantiateMsg, LocationPair,
    PaymentKind, TokenInfo,
};

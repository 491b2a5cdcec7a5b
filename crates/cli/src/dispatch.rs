//! Routing of resolved invocations to their operations.

use tracing::warn;

use crate::commands::{Context, common, courier, sender};
use crate::error::CliError;
use crate::invocation::Invocation;
use crate::modules::presenter::Report;

/// Every command with an implementation behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SenderInstantiate,
    SenderMakePayment,
    SenderSetDetails,
    SenderApproveParcelIssued,
    SenderCancelDelivery,
    CourierRequestsList,
    CourierAcceptRequest,
    CourierMakeDeposit,
    CourierConfirmDelivery,
    CourierCancelDelivery,
    CommonMnemonicToHex,
    CommonBalance,
    CommonUploadContract,
    CommonInfo,
}

impl Operation {
    #[must_use]
    pub fn lookup(group: &str, command: &str) -> Option<Self> {
        let operation = match (group, command) {
            ("sender", "instantiate") => Self::SenderInstantiate,
            ("sender", "make_payment") => Self::SenderMakePayment,
            ("sender", "set_details") => Self::SenderSetDetails,
            ("sender", "approve_parcel_issued") => Self::SenderApproveParcelIssued,
            ("sender", "cancel_delivery") => Self::SenderCancelDelivery,
            ("courier", "requests_list") => Self::CourierRequestsList,
            ("courier", "accept_request") => Self::CourierAcceptRequest,
            ("courier", "make_deposit") => Self::CourierMakeDeposit,
            ("courier", "confirm_delivery") => Self::CourierConfirmDelivery,
            ("courier", "cancel_delivery") => Self::CourierCancelDelivery,
            ("common", "mnemonic_to_hex") => Self::CommonMnemonicToHex,
            ("common", "balance") => Self::CommonBalance,
            ("common", "upload_contract") => Self::CommonUploadContract,
            ("common", "info") => Self::CommonInfo,
            _ => return None,
        };

        Some(operation)
    }

    async fn run(self, ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
        match self {
            Self::SenderInstantiate => sender::instantiate(ctx, invocation).await,
            Self::SenderMakePayment => sender::make_payment(ctx, invocation).await,
            Self::SenderSetDetails => sender::set_details(ctx, invocation).await,
            Self::SenderApproveParcelIssued => sender::approve_parcel_issued(ctx, invocation).await,
            Self::SenderCancelDelivery => sender::cancel(ctx, invocation).await,
            Self::CourierRequestsList => courier::requests_list(ctx, invocation).await,
            Self::CourierAcceptRequest => courier::accept_request(ctx, invocation).await,
            Self::CourierMakeDeposit => courier::make_deposit(ctx, invocation).await,
            Self::CourierConfirmDelivery => courier::confirm_delivery(ctx, invocation).await,
            Self::CourierCancelDelivery => courier::cancel(ctx, invocation).await,
            Self::CommonMnemonicToHex => common::mnemonic_to_hex(ctx),
            Self::CommonBalance => common::balance(ctx, invocation).await,
            Self::CommonUploadContract => common::upload_contract(ctx, invocation).await,
            Self::CommonInfo => common::info(ctx, invocation).await,
        }
    }
}

/// Runs the operation behind `invocation`.
///
/// A registered command with no operation is not an error: it logs a warning
/// and returns `Ok(None)` so nothing is presented.
///
/// # Errors
/// Returns the operation's error unchanged.
pub async fn dispatch(
    invocation: &Invocation,
    ctx: &Context<'_>,
) -> Result<Option<Report>, CliError> {
    let Some(operation) = Operation::lookup(&invocation.group, &invocation.command) else {
        warn!(
            group = %invocation.group,
            command = %invocation.command,
            options = ?invocation.options.ids(),
            arguments = ?invocation.arguments,
            "No operation is bound to this command"
        );
        return Ok(None);
    };

    operation.run(ctx, invocation).await.map(Some)
}

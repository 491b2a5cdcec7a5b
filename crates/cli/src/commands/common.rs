use std::path::PathBuf;

use figaro_ledger::keys::keys_from_mnemonic;
use tracing::info;

use super::{CONTRACT, SECRET, Context, connect};
use crate::error::CliError;
use crate::invocation::Invocation;
use crate::modules::presenter::Report;

/// File looked up in the data directory when `--wasm` is absent.
pub const DEFAULT_WASM: &str = "figaro.wasm";

/// Prompts for a BIP-39 phrase and prints the derived secp256k1 key pair.
pub fn mnemonic_to_hex(ctx: &Context<'_>) -> Result<Report, CliError> {
    let phrase = ctx.prompt.read_secret("Mnemonic: ")?;
    let keys = keys_from_mnemonic(&phrase)?;

    Ok(Report::new("Keys derived from mnemonic")
        .field("Private Key", keys.private_key)
        .field("Public Key", keys.public_key))
}

pub async fn balance(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let options = &invocation.options;
    let requested = options.maybe_text("address")?;

    let ledger = connect(ctx, invocation).await?;
    let address = requested.unwrap_or_else(|| ledger.sender()).to_owned();

    let stake = ledger.balance(&address, &ctx.settings.units.stake).await?;
    let fee = ledger.balance(&address, &ctx.settings.units.fee).await?;

    let shown = match requested {
        None if !ctx.settings.display.bech32 => options.identity(SECRET)?.address_hex(),
        _ => address,
    };

    Ok(Report::new("Account balance")
        .field("Address", shown)
        .field("Balance Stake", format!("{} {}", stake.amount, stake.denom))
        .field("Balance Fee", format!("{} {}", fee.amount, fee.denom)))
}

/// Stores the escrow wasm on chain. The file is read before any network access.
pub async fn upload_contract(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let path = invocation
        .options
        .maybe_path("wasm")?
        .map_or_else(|| ctx.data_dir.join(DEFAULT_WASM), PathBuf::from);

    let wasm = tokio::fs::read(&path).await.map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), size = wasm.len(), "Uploading contract code");

    let ledger = connect(ctx, invocation).await?;
    let uploaded = ledger.upload(wasm).await?;

    Ok(Report::new("Contract uploaded")
        .field("Code Id", uploaded.code_id)
        .field("Transaction Hash", uploaded.transaction.transaction_hash.as_str())
        .field("Gas Used", uploaded.transaction.gas_used))
}

/// Runs one read-only escrow query.
pub async fn info(ctx: &Context<'_>, invocation: &Invocation) -> Result<Report, CliError> {
    let options = &invocation.options;
    let contract = options.text(CONTRACT)?;
    let query = options.query("query")?;

    let ledger = connect(ctx, invocation).await?;
    let answer = ledger.query_smart(contract, &query.to_msg()).await?;

    Ok(Report::new("Contract query")
        .field("Contract", contract)
        .field("Query", query.to_string())
        .field("Result", answer))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;
    use crate::commands::fixtures::{SECRET_HEX, context, invocation};
    use crate::modules::settings::Settings;
    use crate::testing::{Call, RecordingConnector, RecordingLedger, StaticPrompt};

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn mnemonic_to_hex_reads_the_prompt() {
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt(PHRASE);
        let ctx = context(&settings, &connector, &prompt);

        let report = mnemonic_to_hex(&ctx).expect("derived");

        let expected = keys_from_mnemonic(PHRASE).expect("valid phrase");
        assert_eq!(report.get("Private Key"), Some(&json!(expected.private_key)));
        assert_eq!(report.get("Public Key"), Some(&json!(expected.public_key)));
        assert!(connector.connections().is_empty());
    }

    #[test]
    fn mnemonic_with_bad_checksum_fails() {
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("abandon abandon abandon");
        let ctx = context(&settings, &connector, &prompt);

        let err = mnemonic_to_hex(&ctx).expect_err("rejected");

        assert!(matches!(err, CliError::Key(_)));
    }

    #[tokio::test]
    async fn balance_defaults_to_the_signer() {
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&["common", "balance", "--secret", SECRET_HEX]).await;
        let report = balance(&ctx, &args).await.expect("balance");

        assert_eq!(
            connector.ledger.calls(),
            [
                Call::Balance {
                    address: RecordingLedger::SENDER.to_owned(),
                    denom: "ustake".to_owned()
                },
                Call::Balance {
                    address: RecordingLedger::SENDER.to_owned(),
                    denom: "ufee".to_owned()
                },
            ]
        );
        assert_eq!(report.get("Address"), Some(&json!(RecordingLedger::SENDER)));
        assert_eq!(report.get("Balance Stake"), Some(&json!("1000 ustake")));
        assert_eq!(report.get("Balance Fee"), Some(&json!("25 ufee")));
    }

    #[tokio::test]
    async fn balance_shows_hex_address_when_bech32_is_off() {
        let mut settings = Settings::default();
        settings.display.bech32 = false;
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&["common", "balance", "--secret", SECRET_HEX]).await;
        let report = balance(&ctx, &args).await.expect("balance");

        let identity = args.options.identity(SECRET).expect("identity");
        assert_eq!(report.get("Address"), Some(&json!(identity.address_hex())));
    }

    #[tokio::test]
    async fn balance_of_another_account() {
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&[
            "common",
            "balance",
            "--secret",
            SECRET_HEX,
            "--address",
            "wasm1other",
        ])
        .await;
        let report = balance(&ctx, &args).await.expect("balance");

        assert_eq!(report.get("Address"), Some(&json!("wasm1other")));
        assert!(connector.ledger.calls().iter().all(|call| matches!(
            call,
            Call::Balance { address, .. } if address == "wasm1other"
        )));
    }

    #[tokio::test]
    async fn upload_reads_wasm_from_the_given_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let wasm = dir.path().join("escrow.wasm");
        std::fs::write(&wasm, b"\0asm\x01\0\0\0").expect("write wasm");
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&[
            "common",
            "upload_contract",
            "--secret",
            SECRET_HEX,
            "--wasm",
            wasm.to_str().expect("utf-8 path"),
        ])
        .await;
        let report = upload_contract(&ctx, &args).await.expect("uploaded");

        assert_eq!(connector.ledger.calls(), [Call::Upload { size: 8 }]);
        assert_eq!(report.get("Code Id"), Some(&json!(42)));
    }

    #[tokio::test]
    async fn missing_wasm_fails_before_connecting() {
        let settings = Settings::default();
        let connector = RecordingConnector::new(RecordingLedger::default());
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&["common", "upload_contract", "--secret", SECRET_HEX]).await;
        let err = upload_contract(&ctx, &args).await.expect_err("no wasm");

        match err {
            CliError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/figaro").join(DEFAULT_WASM));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(connector.connections().is_empty());
    }

    #[tokio::test]
    async fn info_runs_the_named_query() {
        let settings = Settings::default();
        let ledger =
            RecordingLedger::default().with_query("wasm1escrow", "status", json!("accepted"));
        let connector = RecordingConnector::new(ledger);
        let prompt = StaticPrompt("");
        let ctx = context(&settings, &connector, &prompt);

        let args = invocation(&[
            "common",
            "info",
            "--contract",
            "wasm1escrow",
            "--secret",
            SECRET_HEX,
            "--query",
            "status",
        ])
        .await;
        let report = info(&ctx, &args).await.expect("queried");

        assert_eq!(
            connector.ledger.calls(),
            [Call::query("wasm1escrow", json!({"status": {}}))]
        );
        assert_eq!(report.get("Query"), Some(&json!("status")));
        assert_eq!(report.get("Result"), Some(&json!("accepted")));
    }
}

/// Errors that occur when talking to the ledger node or building transactions.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Returned when the HTTP request to the node fails or times out.
    #[error("HTTP request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: minreq::Error,
    },

    /// Returned when the node answers with a non-success HTTP status.
    #[error("HTTP request to {url} failed with status {status}: {body}")]
    HttpStatus { url: String, status: i32, body: String },

    /// Returned when a tokio task join fails.
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Returned when the node answers with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Returned when the ledger processed the call but the contract or module rejected it.
    #[error("Rejected with code {code} ({codespace}): {log}")]
    Contract {
        code: u32,
        codespace: String,
        log: String,
    },

    #[error("Failed to decode ledger response: {0}")]
    Decode(String),

    #[error("Failed to build transaction: {0}")]
    Transaction(String),

    #[error("Invalid gas price '{0}'")]
    InvalidGasPrice(String),

    /// Returned when a successful answer lacks data the caller relies on.
    #[error("Unexpected response from {context}: {detail}")]
    UnexpectedResponse { context: String, detail: String },

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl From<prost::DecodeError> for LedgerError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for LedgerError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Errors that occur while deriving or using secp256k1 keys.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid secp256k1 secret key: {0}")]
    InvalidSecret(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Cannot derive address with prefix '{prefix}': {reason}")]
    Address { prefix: String, reason: String },
}

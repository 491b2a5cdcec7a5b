//! secp256k1 key material: the transaction signing identity, the delivery
//! confirmation key and BIP-39 mnemonic derivation.

use std::fmt;

use async_trait::async_trait;
use bip32::{DerivationPath, Language, Mnemonic, XPrv};
use cosmrs::AccountId;
use cosmrs::crypto::PublicKey;
use cosmrs::crypto::secp256k1::SigningKey;
use k256::ecdsa::Signature;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use sha2::{Digest, Sha256};

use crate::error::KeyError;

/// Cosmos HD path used by `mnemonic_to_hex`.
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

const SECRET_KEY_REJECTED: &str = "Accepted only 'Secp256k1' hex secret key";

/// Key pair that pays for and authorizes ledger transactions.
///
/// Lives only for one invocation; `Debug` never prints the secret.
#[derive(Clone)]
pub struct SigningIdentity {
    secret: [u8; 32],
    public_key: PublicKey,
    address: AccountId,
}

impl SigningIdentity {
    /// Derives the identity for a raw 32-byte secret.
    ///
    /// # Errors
    /// Returns error if the bytes are not a valid secp256k1 scalar or the
    /// prefix is not a valid bech32 human readable part.
    pub fn from_secret(secret: &[u8], prefix: &str) -> Result<Self, KeyError> {
        let secret: [u8; 32] = secret
            .try_into()
            .map_err(|_| KeyError::InvalidSecret(SECRET_KEY_REJECTED.to_owned()))?;

        let signing_key = SigningKey::from_slice(&secret)
            .map_err(|_| KeyError::InvalidSecret(SECRET_KEY_REJECTED.to_owned()))?;
        let public_key = signing_key.public_key();

        let address = public_key
            .account_id(prefix)
            .map_err(|e| KeyError::Address {
                prefix: prefix.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            secret,
            public_key,
            address,
        })
    }

    /// Bech32 account address.
    #[must_use]
    pub fn address(&self) -> String {
        self.address.to_string()
    }

    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.address
    }

    /// Raw 20-byte account id as lowercase hex.
    #[must_use]
    pub fn address_hex(&self) -> String {
        hex::encode(self.address.to_bytes())
    }

    #[must_use]
    pub const fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Compressed SEC1 public key as lowercase hex.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> Result<SigningKey, KeyError> {
        SigningKey::from_slice(&self.secret).map_err(|e| KeyError::Signing(e.to_string()))
    }
}

impl PartialEq for SigningIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address.as_ref())
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Key the courier uses to prove delivery. Distinct from the signing identity.
#[derive(Clone)]
pub struct ConfirmationKey {
    key: k256::ecdsa::SigningKey,
}

impl ConfirmationKey {
    /// # Errors
    /// Returns error unless the bytes are exactly 32 and a valid secp256k1 scalar.
    pub fn from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        let secret: [u8; 32] = secret
            .try_into()
            .map_err(|_| KeyError::InvalidSecret(SECRET_KEY_REJECTED.to_owned()))?;

        let key = k256::ecdsa::SigningKey::from_slice(&secret)
            .map_err(|_| KeyError::InvalidSecret(SECRET_KEY_REJECTED.to_owned()))?;

        Ok(Self { key })
    }

    /// Signs SHA-256 of the contract address and returns `r‖s` (64 bytes) as hex.
    ///
    /// # Errors
    /// Returns error if ECDSA signing fails.
    pub fn sign_contract(&self, contract: &str) -> Result<String, KeyError> {
        let digest = Sha256::digest(contract.as_bytes());

        let signature: Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        Ok(hex::encode(signature.to_bytes()))
    }

    #[must_use]
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_encoded_point(true).as_bytes())
    }
}

impl PartialEq for ConfirmationKey {
    fn eq(&self, other: &Self) -> bool {
        self.key.verifying_key() == other.key.verifying_key()
    }
}

impl fmt::Debug for ConfirmationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationKey")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Keys derived from a mnemonic, `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedKeys {
    pub private_key: String,
    pub public_key: String,
}

/// Derives the key pair at [`COSMOS_HD_PATH`] from an English BIP-39 phrase.
///
/// Surrounding whitespace, repeated spaces and letter case are ignored.
///
/// # Errors
/// Returns error if the phrase fails the BIP-39 checksum or derivation fails.
pub fn keys_from_mnemonic(phrase: &str) -> Result<DerivedKeys, KeyError> {
    let normalized = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    let mnemonic = Mnemonic::new(normalized, Language::English)
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;
    let seed = mnemonic.to_seed("");

    let path: DerivationPath = COSMOS_HD_PATH
        .parse()
        .map_err(|e: bip32::Error| KeyError::Derivation(e.to_string()))?;
    let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)
        .map_err(|e| KeyError::Derivation(e.to_string()))?;

    let private_key = xprv.private_key();
    let public_key = private_key.verifying_key().to_encoded_point(true);

    Ok(DerivedKeys {
        private_key: format!("0x{}", hex::encode(private_key.to_bytes())),
        public_key: format!("0x{}", hex::encode(public_key.as_bytes())),
    })
}

/// Turns decoded secret bytes into usable keys.
#[async_trait]
pub trait KeyDeriver: Send + Sync {
    async fn signing_identity(&self, secret: &[u8]) -> Result<SigningIdentity, KeyError>;

    async fn confirmation_key(&self, secret: &[u8]) -> Result<ConfirmationKey, KeyError>;
}

/// [`KeyDeriver`] producing bech32 addresses with a fixed prefix.
#[derive(Debug, Clone)]
pub struct Secp256k1Deriver {
    prefix: String,
}

impl Secp256k1Deriver {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl KeyDeriver for Secp256k1Deriver {
    async fn signing_identity(&self, secret: &[u8]) -> Result<SigningIdentity, KeyError> {
        SigningIdentity::from_secret(secret, &self.prefix)
    }

    async fn confirmation_key(&self, secret: &[u8]) -> Result<ConfirmationKey, KeyError> {
        ConfirmationKey::from_secret(secret)
    }
}

//! Validators turning one raw command-line string into a typed [`OptionValue`].

use std::path::PathBuf;

use figaro_contracts::{Amount, ContractQuery, Coordinate, LocationRect};

use crate::invocation::{OptionValue, PendingKey};

/// Compressed secp256k1 public key length.
pub const PUBLIC_KEY_LEN: usize = 33;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Domain validator attached to an option or argument descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Amount,
    Integer,
    Address,
    ExactLocation,
    RoughLocation,
    PublicKey,
    SecretKey,
    ConfirmationKey,
    Comment,
    ContractQuery,
    Path,
    Text,
}

impl Validator {
    /// # Errors
    /// Returns error describing why `raw` is not acceptable for this validator.
    pub fn validate(self, raw: &str) -> Result<OptionValue, ValidationError> {
        Ok(match self {
            Self::Amount => OptionValue::Amount(amount(raw)?),
            Self::Integer => OptionValue::Integer(integer(raw)?),
            Self::Address => OptionValue::Text(address(raw)?),
            Self::ExactLocation => OptionValue::Point(exact_location(raw)?),
            Self::RoughLocation => OptionValue::Rect(rough_location(raw)?),
            Self::PublicKey => OptionValue::PublicKey(public_key(raw)?),
            Self::SecretKey => OptionValue::Pending(PendingKey::Signing(secret_key(raw)?)),
            Self::ConfirmationKey => {
                OptionValue::Pending(PendingKey::Confirmation(secret_key(raw)?))
            }
            Self::Comment | Self::Text => OptionValue::Text(raw.to_owned()),
            Self::ContractQuery => OptionValue::Query(contract_query(raw)?),
            Self::Path => OptionValue::Path(PathBuf::from(raw)),
        })
    }

    /// Whether values may begin with `-`: negative numbers and free text.
    #[must_use]
    pub const fn allows_leading_hyphen(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::ExactLocation
                | Self::RoughLocation
                | Self::Comment
                | Self::Text
        )
    }
}

/// # Errors
/// Returns error unless `raw` is a non-empty string of decimal digits.
pub fn amount(raw: &str) -> Result<Amount, ValidationError> {
    raw.parse().map_err(|e| ValidationError::new(format!("{e}")))
}

/// # Errors
/// Returns error unless `raw` is a signed 64-bit integer.
pub fn integer(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::new(format!("'{raw}' is not an integer")))
}

/// # Errors
/// Returns error if `raw` is blank.
pub fn address(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("Address must not be empty"));
    }

    Ok(trimmed.to_owned())
}

/// # Errors
/// Returns error unless `raw` is `lng,lat` inside the valid degree ranges.
pub fn exact_location(raw: &str) -> Result<Coordinate, ValidationError> {
    raw.parse().map_err(|e| ValidationError::new(format!("{e}")))
}

/// # Errors
/// Returns error unless `raw` is two exact locations joined by `|`.
pub fn rough_location(raw: &str) -> Result<LocationRect, ValidationError> {
    raw.parse().map_err(|e| ValidationError::new(format!("{e}")))
}

/// Normalizes a compressed public key to lowercase hex without prefix.
///
/// # Errors
/// Returns error if `raw` is not hex or does not decode to exactly 33 bytes.
pub fn public_key(raw: &str) -> Result<String, ValidationError> {
    let bytes = decode_hex(raw)?;
    if bytes.len() != PUBLIC_KEY_LEN {
        return Err(ValidationError::new(format!(
            "Public key must be {PUBLIC_KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(hex::encode(bytes))
}

/// Decodes secret key bytes. Scalar validity is checked on resolution.
///
/// # Errors
/// Returns error if `raw` is not hex.
pub fn secret_key(raw: &str) -> Result<Vec<u8>, ValidationError> {
    decode_hex(raw).map_err(|_| ValidationError::new("Accepted only 'Secp256k1' hex secret key"))
}

/// # Errors
/// Returns error if `raw` names no known contract query.
pub fn contract_query(raw: &str) -> Result<ContractQuery, ValidationError> {
    raw.parse().map_err(|name| {
        ValidationError::new(format!(
            "Unknown query '{name}', expected one of: {}",
            ContractQuery::NAMES.join(", ")
        ))
    })
}

/// # Errors
/// Returns error if `raw`, with an optional `0x` prefix, is not even-length hex.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, ValidationError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    hex::decode(digits).map_err(|e| ValidationError::new(format!("Invalid hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPRESSED_KEY: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn amount_is_arbitrary_precision() {
        assert_eq!(amount("123").expect("valid").as_str(), "123");
        assert_eq!(
            amount("340282366920938463463374607431768211456000")
                .expect("valid")
                .as_str(),
            "340282366920938463463374607431768211456000"
        );

        for raw in ["12.5", "abc", "", "-1"] {
            assert!(amount(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn integer_accepts_signed_values() {
        assert_eq!(integer("42"), Ok(42));
        assert_eq!(integer("-7"), Ok(-7));
        assert!(integer("4.2").is_err());
        assert!(integer("seven").is_err());
    }

    #[test]
    fn address_must_not_be_blank() {
        assert_eq!(address(" wasm1abc ").expect("valid"), "wasm1abc");
        assert!(address("   ").is_err());
    }

    #[test]
    fn exact_location_reports_range_errors() {
        assert_eq!(
            exact_location("45,100").expect_err("latitude").reason,
            "Latitude must be between -90 and 90 degrees inclusive."
        );
        assert_eq!(
            exact_location("200,45").expect_err("longitude").reason,
            "Longitude must be between -180 and 180 degrees inclusive."
        );

        let point = exact_location("12.5,-7.25").expect("valid");
        assert_eq!((point.lng(), point.lat()), (12.5, -7.25));
    }

    #[test]
    fn rough_location_needs_pipe_separator() {
        let rect = rough_location("1,1|2,2").expect("valid");
        assert_eq!((rect.from.lng(), rect.from.lat()), (1.0, 1.0));
        assert_eq!((rect.to.lng(), rect.to.lat()), (2.0, 2.0));

        assert!(rough_location("1,1/2,2").is_err());
    }

    #[test]
    fn public_key_normalizes_to_lowercase() {
        assert_eq!(public_key(COMPRESSED_KEY).expect("valid"), COMPRESSED_KEY);
        assert_eq!(
            public_key(&format!("0x{}", COMPRESSED_KEY.to_uppercase())).expect("valid"),
            COMPRESSED_KEY
        );
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        let err = public_key(&COMPRESSED_KEY[2..]).expect_err("32 bytes");
        assert_eq!(err.reason, "Public key must be 33 bytes, got 32");
        assert!(public_key("zz").is_err());
    }

    #[test]
    fn secret_key_is_deferred() {
        let value = Validator::SecretKey.validate(&"11".repeat(32)).expect("hex");
        assert_eq!(value, OptionValue::Pending(PendingKey::Signing(vec![0x11; 32])));

        assert_eq!(
            secret_key("not hex").expect_err("not hex").reason,
            "Accepted only 'Secp256k1' hex secret key"
        );
    }

    #[test]
    fn contract_query_lists_choices() {
        assert_eq!(contract_query("funds"), Ok(ContractQuery::Funds));
        assert!(
            contract_query("balance")
                .expect_err("unknown")
                .reason
                .contains("token_info, status, courier, funds, locations")
        );
    }

    #[test]
    fn hyphen_values_for_numbers_and_free_text() {
        assert!(Validator::ExactLocation.allows_leading_hyphen());
        assert!(Validator::Integer.allows_leading_hyphen());
        assert!(Validator::Comment.allows_leading_hyphen());
        assert!(Validator::Text.allows_leading_hyphen());
        assert!(!Validator::SecretKey.allows_leading_hyphen());
        assert!(!Validator::Address.allows_leading_hyphen());
    }
}

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Non-negative integer amount in the ledger's minor unit.
///
/// Held as canonical decimal digits so any precision survives the trip to
/// the contract, which expects `Uint128` values encoded as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount(String);

impl Amount {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError(raw.to_owned()));
        }

        let digits = raw.trim_start_matches('0');
        let canonical = if digits.is_empty() { "0" } else { digits };

        Ok(Self(canonical.to_owned()))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer as a string or number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
                Ok(Amount::from(u128::from(value)))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_beyond_native_integer_width() {
        let raw = "340282366920938463463374607431768211456000";
        let amount: Amount = raw.parse().expect("digits");
        assert_eq!(amount.as_str(), raw);
    }

    #[test]
    fn strips_leading_zeros() {
        assert_eq!("000123".parse::<Amount>().expect("digits").as_str(), "123");
        assert!("0000".parse::<Amount>().expect("digits").is_zero());
    }

    #[test]
    fn rejects_fractions_signs_and_text() {
        for raw in ["12.5", "abc", "-1", "+1", "", "1e3"] {
            assert!(raw.parse::<Amount>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn serializes_as_json_string() {
        let amount: Amount = "42".parse().expect("digits");
        assert_eq!(serde_json::to_string(&amount).expect("json"), "\"42\"");
    }

    #[test]
    fn deserializes_string_or_number() {
        let from_str: Amount = serde_json::from_str("\"7\"").expect("string");
        let from_num: Amount = serde_json::from_str("7").expect("number");
        assert_eq!(from_str, from_num);
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CommonError;

pub const ADDRESS_LENGTH: usize = 20;

/// Token quantities in base units (18 decimal places).
pub type Amount = u128;

// --- NewTypes ---

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// The null account. Mints originate here and burns end here.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Build an address from exactly [`ADDRESS_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CommonError> {
        let arr: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            CommonError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Address(arr))
    }

    /// Last 20 bytes of a keccak256 digest.
    fn from_hash(hash: &keccak_hash::H256) -> Self {
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&hash.0[32 - ADDRESS_LENGTH..]);
        Address(arr)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Deterministic identity for a human-readable label.
    pub fn from_label(label: &str) -> Self {
        Self::from_hash(&keccak_hash::keccak(label.as_bytes()))
    }

    /// Address of the component created by `deployer` at the given deployment nonce.
    pub fn contract_address(deployer: &Address, nonce: u64) -> Self {
        let mut preimage = Vec::with_capacity(ADDRESS_LENGTH + 8);
        preimage.extend_from_slice(&deployer.0);
        preimage.extend_from_slice(&nonce.to_be_bytes());
        Self::from_hash(&keccak_hash::keccak(&preimage))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes =
            hex::decode(digits).map_err(|e| CommonError::InvalidAddress(format!("{}: {}", s, e)))?;
        Self::from_slice(&bytes).map_err(|_| {
            CommonError::InvalidAddress(format!(
                "{}: expected {} bytes, got {}",
                s,
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_and_parse() {
        let addr = Address::from_label("alice");
        let rendered = addr.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 2 + ADDRESS_LENGTH * 2);

        let parsed: Address = rendered.parse().unwrap();
        assert_eq!(parsed, addr);

        let unprefixed: Address = rendered.trim_start_matches("0x").parse().unwrap();
        assert_eq!(unprefixed, addr);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not-hex".parse::<Address>().is_err());
    }

    #[test]
    fn test_from_slice_requires_exact_length() {
        let addr = Address::from_label("carol");
        assert_eq!(Address::from_slice(&addr.0).unwrap(), addr);

        assert!(matches!(
            Address::from_slice(&[1u8; 19]),
            Err(CommonError::InvalidAddress(_))
        ));
        assert!(matches!(
            Address::from_slice(&[1u8; 32]),
            Err(CommonError::InvalidAddress(_))
        ));
        assert!(Address::from_slice(&[]).is_err());
    }

    #[test]
    fn test_labels_and_contract_addresses_are_distinct() {
        let deployer = Address::from_label("deployer");
        assert_ne!(deployer, Address::from_label("user1"));
        assert_eq!(deployer, Address::from_label("deployer"));

        let first = Address::contract_address(&deployer, 0);
        let second = Address::contract_address(&deployer, 1);
        assert_ne!(first, second);
        assert!(!first.is_zero());
    }

    #[test]
    fn test_address_serde_roundtrip() {
        let addr = Address::from_label("bob");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}

//! Serialization helpers for the THORNode API
//!
//! THORNode encodes amounts as decimal strings, so `U256` values are
//! (de)serialized through strings rather than the hex encoding alloy uses by
//! default

/// A module for serializing and deserializing U256 as decimal strings
pub mod u256_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize a U256 to a decimal string
    pub fn serialize<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    /// Deserialize a decimal string to a U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let s = String::deserialize(d)?;
        U256::from_str_radix(s.trim(), 10).map_err(|_| D::Error::custom("Invalid U256 value"))
    }
}

/// A module for serializing and deserializing an optional U256 as a decimal
/// string
pub mod option_u256_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize an optional U256 to a decimal string
    pub fn serialize<S: Serializer>(value: &Option<U256>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_some(&v.to_string()),
            None => s.serialize_none(),
        }
    }

    /// Deserialize an optional decimal string to a U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<U256>, D::Error> {
        let s = Option::<String>::deserialize(d)?;
        s.map(|s| U256::from_str_radix(s.trim(), 10))
            .transpose()
            .map_err(|_| D::Error::custom("Invalid U256 value"))
    }
}

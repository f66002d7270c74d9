//! # Identity Newtypes
//!
//! Each identifier is a distinct type: you cannot pass a [`BindingId`]
//! where a [`PartyId`] is expected.
//!
//! String-based identifiers ([`PartyId`], [`AssetId`], [`BindingId`])
//! validate at construction time and again at deserialization time.
//! [`WagerId`] is UUID-based and always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Longest accepted string identifier, in bytes.
const MAX_IDENTIFIER_LEN: usize = 128;

/// Deserializes as a plain `String`, then routes through the type's `new()`
/// constructor so invalid values are rejected rather than silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

fn validate_identifier(kind: &'static str, value: &str) -> Result<(), ValidationError> {
    let reject = |reason| ValidationError::InvalidIdentifier {
        kind,
        value: value.to_string(),
        reason,
    };
    if value.trim().is_empty() {
        return Err(reject("must not be empty"));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(reject("exceeds 128 bytes"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(reject("must not contain whitespace or control characters"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// A unique identifier for a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WagerId(Uuid);

impl WagerId {
    /// Create a new random wager identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a wager identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WagerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WagerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wager:{}", self.0)
    }
}

impl std::str::FromStr for WagerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("wager:").unwrap_or(s);
        Uuid::from_str(raw).map(Self)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers
// ---------------------------------------------------------------------------

/// A participant address: a wager party, an arbitrator, or the treasury.
///
/// The protocol treats it as an opaque account handle understood by the
/// value-transfer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PartyId(String);

impl PartyId {
    /// Create a party identifier, rejecting empty or whitespace-bearing input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_identifier("party", &id)?;
        Ok(Self(id))
    }

    /// The default treasury account that receives swept funds.
    pub fn treasury() -> Self {
        Self("treasury".to_string())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(PartyId);

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The asset a wager is denominated in (e.g. `"USDC"`).
///
/// Both stakes and the challenge bond of a wager are in the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create an asset identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_identifier("asset", &id)?;
        Ok(Self(id))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(AssetId);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handle into an outcome source: which question a wager is bound to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BindingId(String);

impl BindingId {
    /// Create a binding identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_identifier("binding", &id)?;
        Ok(Self(id))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(BindingId);

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wager_id_display_and_parse() {
        let id = WagerId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("wager:"));
        let parsed: WagerId = shown.parse().unwrap();
        assert_eq!(parsed, id);
        let bare: WagerId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(bare, id);
    }

    #[test]
    fn wager_ids_are_unique() {
        assert_ne!(WagerId::new(), WagerId::new());
    }

    #[test]
    fn party_id_accepts_plain_handles() {
        let p = PartyId::new("alice").unwrap();
        assert_eq!(p.as_str(), "alice");
        assert_eq!(format!("{p}"), "alice");
    }

    #[test]
    fn treasury_is_a_valid_party() {
        assert_eq!(PartyId::new("treasury").unwrap(), PartyId::treasury());
    }

    #[test]
    fn party_id_rejects_empty() {
        assert!(PartyId::new("").is_err());
        assert!(PartyId::new("   ").is_err());
    }

    #[test]
    fn party_id_rejects_whitespace() {
        let err = PartyId::new("al ice").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn party_id_rejects_overlong() {
        assert!(PartyId::new("a".repeat(129)).is_err());
        assert!(PartyId::new("a".repeat(128)).is_ok());
    }

    #[test]
    fn deserialize_rejects_invalid_party() {
        let result: Result<PartyId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
        let ok: PartyId = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(ok.as_str(), "bob");
    }

    #[test]
    fn asset_and_binding_validate() {
        assert!(AssetId::new("USDC").is_ok());
        assert!(AssetId::new("").is_err());
        assert!(BindingId::new("feed:btc-usd-100k").is_ok());
        assert!(BindingId::new("bad binding").is_err());
    }
}

//! # Protocol Configuration
//!
//! One [`ProtocolConfig`] is owned by each [`ResolutionEngine`](crate::ResolutionEngine)
//! from construction. Independent engines (separate deployments, parallel
//! test harnesses) run with different parameters without interfering.
//!
//! Periods serialize as whole seconds:
//!
//! ```yaml
//! challenge_period: 86400
//! minimum_challenge_bond: 1000000
//! claim_window: 7776000
//! source_timeout_period: 2592000
//! max_arbitrator_fee_basis_points: 1000
//! treasury: dao-treasury
//! bond_forfeiture: ToVindicatedParty
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use wager_core::{Amount, PartyId, BASIS_POINTS_DENOMINATOR};

use crate::error::ConfigError;

/// Where a losing challenger's bond goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondForfeiture {
    /// The party whose proposal the arbitrator upheld.
    #[default]
    ToVindicatedParty,
    /// The arbitrator who heard the dispute.
    ToArbitrator,
}

/// Process-wide protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// How long a proposed outcome stays open to challenge.
    #[serde(with = "duration_secs")]
    pub challenge_period: Duration,
    /// Smallest bond a challenge may post.
    pub minimum_challenge_bond: Amount,
    /// How long a winner has to claim after resolution.
    #[serde(with = "duration_secs")]
    pub claim_window: Duration,
    /// Grace after a wager's expected resolution time before a silent
    /// source can be declared timed out.
    #[serde(with = "duration_secs")]
    pub source_timeout_period: Duration,
    /// Upper bound on any wager's arbitrator fee.
    pub max_arbitrator_fee_basis_points: u32,
    /// Receives unclaimed pots.
    pub treasury: PartyId,
    /// Shortest allowed gap between creation and acceptance deadline.
    #[serde(with = "duration_secs")]
    pub min_acceptance_window: Duration,
    /// Longest allowed gap between creation and acceptance deadline.
    #[serde(with = "duration_secs")]
    pub max_acceptance_window: Duration,
    /// Where a losing challenger's bond goes.
    pub bond_forfeiture: BondForfeiture,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            challenge_period: Duration::hours(24),
            minimum_challenge_bond: Amount::new(1),
            claim_window: Duration::days(90),
            source_timeout_period: Duration::days(30),
            max_arbitrator_fee_basis_points: 1_000,
            treasury: PartyId::treasury(),
            min_acceptance_window: Duration::hours(1),
            max_acceptance_window: Duration::days(30),
            bond_forfeiture: BondForfeiture::default(),
        }
    }
}

impl ProtocolConfig {
    /// Parse and validate a YAML document. Absent fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters the protocol cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, d: Duration| {
            if d <= Duration::zero() {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}s", d.num_seconds()),
                })
            } else {
                Ok(())
            }
        };
        positive("challenge_period", self.challenge_period)?;
        positive("claim_window", self.claim_window)?;
        positive("source_timeout_period", self.source_timeout_period)?;
        positive("min_acceptance_window", self.min_acceptance_window)?;
        positive("max_acceptance_window", self.max_acceptance_window)?;

        if self.min_acceptance_window > self.max_acceptance_window {
            return Err(ConfigError::Invalid {
                field: "min_acceptance_window",
                reason: "exceeds max_acceptance_window".to_string(),
            });
        }
        if self.max_arbitrator_fee_basis_points > BASIS_POINTS_DENOMINATOR {
            return Err(ConfigError::Invalid {
                field: "max_arbitrator_fee_basis_points",
                reason: format!(
                    "{} exceeds {BASIS_POINTS_DENOMINATOR}",
                    self.max_arbitrator_fee_basis_points
                ),
            });
        }
        if self.minimum_challenge_bond.is_zero() {
            return Err(ConfigError::Invalid {
                field: "minimum_challenge_bond",
                reason: "a free challenge lets anyone stall resolution".to_string(),
            });
        }
        Ok(())
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("duration {secs}s out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let c = ProtocolConfig::default();
        assert_eq!(c.challenge_period, Duration::hours(24));
        assert_eq!(c.claim_window, Duration::days(90));
        assert_eq!(c.source_timeout_period, Duration::days(30));
        assert_eq!(c.max_arbitrator_fee_basis_points, 1_000);
        assert_eq!(c.min_acceptance_window, Duration::hours(1));
        assert_eq!(c.max_acceptance_window, Duration::days(30));
        assert_eq!(c.bond_forfeiture, BondForfeiture::ToVindicatedParty);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_and_defaults() {
        let c = ProtocolConfig::from_yaml_str(
            "challenge_period: 3600\nminimum_challenge_bond: 500\ntreasury: dao-treasury\nbond_forfeiture: ToArbitrator\n",
        )
        .unwrap();
        assert_eq!(c.challenge_period, Duration::hours(1));
        assert_eq!(c.minimum_challenge_bond, Amount::new(500));
        assert_eq!(c.treasury.as_str(), "dao-treasury");
        assert_eq!(c.bond_forfeiture, BondForfeiture::ToArbitrator);
        assert_eq!(c.claim_window, Duration::days(90));
    }

    #[test]
    fn yaml_roundtrip() {
        let c = ProtocolConfig::default();
        let yaml = serde_yaml::to_string(&c).unwrap();
        assert!(yaml.contains("challenge_period: 86400"));
        assert_eq!(ProtocolConfig::from_yaml_str(&yaml).unwrap(), c);
    }

    #[test]
    fn rejects_zero_period() {
        let err = ProtocolConfig::from_yaml_str("claim_window: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "claim_window",
                ..
            }
        ));
    }

    #[test]
    fn rejects_fee_cap_above_full() {
        let err =
            ProtocolConfig::from_yaml_str("max_arbitrator_fee_basis_points: 10001\n").unwrap_err();
        assert!(err.to_string().contains("max_arbitrator_fee_basis_points"));
    }

    #[test]
    fn rejects_inverted_acceptance_bounds() {
        let c = ProtocolConfig {
            min_acceptance_window: Duration::days(31),
            ..ProtocolConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_bond() {
        assert!(ProtocolConfig::from_yaml_str("minimum_challenge_bond: 0\n").is_err());
    }

    #[test]
    fn rejects_invalid_treasury() {
        assert!(matches!(
            ProtocolConfig::from_yaml_str("treasury: \"\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}

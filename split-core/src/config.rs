//! Configuration for the settlement workspace

use crate::{money::CURRENCY_SCALE, Error, Result, SplitPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest scale `rust_decimal` can represent
const MAX_SCALE: u32 = 28;

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Netting configuration
    pub netting: NettingConfig,

    /// How totals are divided among participants
    pub split: SplitPolicy,

    /// Label shown for members whose profile could not be resolved
    pub unknown_member_nickname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            netting: NettingConfig::default(),
            split: SplitPolicy::default(),
            unknown_member_nickname: "User".to_string(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Residual balances at or below this amount are treated as settled
    pub materiality_threshold: Decimal,

    /// Decimal places of emitted balance amounts
    pub display_scale: u32,

    /// What to do with participants missing from the roster
    pub stale_references: StaleReferencePolicy,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            materiality_threshold: Decimal::new(1, 2), // 0.01
            display_scale: CURRENCY_SCALE,
            stale_references: StaleReferencePolicy::Tolerate,
        }
    }
}

/// Handling of member ids referenced by expenses but absent from the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReferencePolicy {
    /// Accumulate in the ledger, exclude from output, log a warning
    Tolerate,
    /// Fail the computation with an inconsistent reference error
    Reject,
}

impl FromStr for StaleReferencePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tolerate" => Ok(StaleReferencePolicy::Tolerate),
            "reject" => Ok(StaleReferencePolicy::Reject),
            other => Err(Error::Config(format!(
                "Unknown stale reference policy: {}",
                other
            ))),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// `SPLIT_MATERIALITY_THRESHOLD`, `SPLIT_DISPLAY_SCALE`,
    /// `SPLIT_STALE_REFERENCES`, `SPLIT_SPLIT_MODE` (`full_precision` or
    /// `largest_remainder`), `SPLIT_SPLIT_SCALE` (defaults to cents) and
    /// `SPLIT_UNKNOWN_NICKNAME` override the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(threshold) = std::env::var("SPLIT_MATERIALITY_THRESHOLD") {
            config.netting.materiality_threshold = Decimal::from_str(threshold.trim())
                .map_err(|e| Error::Config(format!("Invalid materiality threshold: {}", e)))?;
        }

        if let Ok(scale) = std::env::var("SPLIT_DISPLAY_SCALE") {
            config.netting.display_scale = scale
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid display scale: {}", e)))?;
        }

        if let Ok(policy) = std::env::var("SPLIT_STALE_REFERENCES") {
            config.netting.stale_references = policy.parse()?;
        }

        if let Ok(mode) = std::env::var("SPLIT_SPLIT_MODE") {
            config.split = match mode.trim().to_ascii_lowercase().as_str() {
                "full_precision" => SplitPolicy::FullPrecision,
                "largest_remainder" => {
                    let scale = match std::env::var("SPLIT_SPLIT_SCALE") {
                        Ok(scale) => scale
                            .trim()
                            .parse()
                            .map_err(|e| Error::Config(format!("Invalid split scale: {}", e)))?,
                        Err(_) => CURRENCY_SCALE,
                    };
                    SplitPolicy::LargestRemainder { scale }
                }
                other => return Err(Error::Config(format!("Unknown split mode: {}", other))),
            };
        }

        if let Ok(nickname) = std::env::var("SPLIT_UNKNOWN_NICKNAME") {
            config.unknown_member_nickname = nickname;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.netting.materiality_threshold < Decimal::ZERO {
            return Err(Error::Config(format!(
                "Materiality threshold must not be negative, got {}",
                self.netting.materiality_threshold
            )));
        }

        if self.netting.display_scale > MAX_SCALE {
            return Err(Error::Config(format!(
                "Display scale {} exceeds maximum {}",
                self.netting.display_scale, MAX_SCALE
            )));
        }

        if let SplitPolicy::LargestRemainder { scale } = self.split {
            if scale > MAX_SCALE {
                return Err(Error::Config(format!(
                    "Split scale {} exceeds maximum {}",
                    scale, MAX_SCALE
                )));
            }
        }

        Ok(())
    }
}

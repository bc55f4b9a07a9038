use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Caller-layer policy for the Tesoro SDK.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesoroConfig {
    /// Attempts per issuance when the checkbook cursor compare-and-swap is
    /// lost to a concurrent issuance.
    pub issuance_attempts: u32,
    /// Days past the due date before a check is reported as an expiry
    /// candidate.
    pub expiry_grace_days: u32,
    /// Credit utilization (0..=1) at which an exposure is flagged.
    pub credit_warning_ratio: Decimal,
    /// Post a `haber` movement when a client-linked third-party check is
    /// collected.
    pub post_check_movements: bool,
    /// Default `tracing` filter for the binary.
    pub log_filter: String,
}

impl Default for TesoroConfig {
    fn default() -> Self {
        Self {
            issuance_attempts: 3,
            expiry_grace_days: 0,
            credit_warning_ratio: Decimal::new(8, 1),
            post_check_movements: true,
            log_filter: "info".into(),
        }
    }
}

impl TesoroConfig {
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.issuance_attempts == 0 {
            return Err(SdkError::Config("issuance_attempts must be at least 1".into()));
        }
        if self.credit_warning_ratio <= Decimal::ZERO || self.credit_warning_ratio > Decimal::ONE {
            return Err(SdkError::Config(format!(
                "credit_warning_ratio {} must be in (0, 1]",
                self.credit_warning_ratio
            )));
        }
        Ok(())
    }
}

//! This module defines [`ProverConfig`].

use std::time::Duration;

use besu_light_client::consensus_type::{ConsensusType, UnknownConsensusType};
use serde::Deserialize;

use crate::duration::{parse_duration, DurationError};

/// Errors of an invalid prover configuration
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The consensus type is not supported
    #[error(transparent)]
    ConsensusType(#[from] UnknownConsensusType),

    /// A duration field does not hold a valid duration
    #[error("invalid {field}: {source}")]
    InvalidDuration {
        /// The config field
        field: &'static str,
        /// Reason for error
        source: DurationError,
    },

    /// The config does not deserialize
    #[error("config error at {path}: {message}")]
    Parse {
        /// Path of the failing field
        path: String,
        /// Reason for error
        message: String,
    },
}

/// The validated configuration of the prover
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawProverConfig")]
pub struct ProverConfig {
    consensus_type: ConsensusType,
    trusting_period: Duration,
    max_clock_drift: Duration,
}

/// The prover configuration as written by the operator
#[derive(Clone, Debug, Default, Deserialize)]
struct RawProverConfig {
    /// `"qbft"`, `"ibft2"` or empty
    #[serde(default)]
    consensus_type: String,
    /// Empty means zero
    #[serde(default)]
    trusting_period: String,
    /// Empty means zero
    #[serde(default)]
    max_clock_drift: String,
}

impl TryFrom<RawProverConfig> for ProverConfig {
    type Error = ConfigError;

    fn try_from(raw: RawProverConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            consensus_type: raw.consensus_type.parse()?,
            trusting_period: parse_optional_duration("trusting period", &raw.trusting_period)?,
            max_clock_drift: parse_optional_duration("max clock drift", &raw.max_clock_drift)?,
        })
    }
}

fn parse_optional_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    if value.is_empty() {
        return Ok(Duration::ZERO);
    }
    parse_duration(value).map_err(|source| ConfigError::InvalidDuration { field, source })
}

impl ProverConfig {
    /// Create a new config from already validated values
    #[must_use]
    pub const fn new(
        consensus_type: ConsensusType,
        trusting_period: Duration,
        max_clock_drift: Duration,
    ) -> Self {
        Self {
            consensus_type,
            trusting_period,
            max_clock_drift,
        }
    }

    /// Parses and validates the config from its JSON representation.
    /// # Errors
    /// Returns an error naming the failing field if the config is invalid.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let json_string = value.to_string();
        let mut deserializer = serde_json::Deserializer::from_str(&json_string);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    /// The consensus variant of the chain
    #[must_use]
    pub const fn consensus_type(&self) -> ConsensusType {
        self.consensus_type
    }

    /// The trusting period of new clients
    #[must_use]
    pub const fn trusting_period(&self) -> Duration {
        self.trusting_period
    }

    /// The maximum clock drift of new clients
    #[must_use]
    pub const fn max_clock_drift(&self) -> Duration {
        self.max_clock_drift
    }
}

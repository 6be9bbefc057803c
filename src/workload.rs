//! Caller-supplied workload description and its validation

use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

pub const MIN_MEMORY_MB: u32 = 128;
pub const MAX_MEMORY_MB: u32 = 10_240;
pub const MAX_DURATION_SECONDS: f64 = 900.0;
pub const MIN_MONTHLY_INVOCATIONS: u64 = 1;
pub const MAX_MONTHLY_INVOCATIONS: u64 = 1_000_000_000;
pub const MIN_EXCHANGE_RATE: f64 = 100.0;
pub const MAX_EXCHANGE_RATE: f64 = 300.0;

/// Raw workload parameters, as parsed from a request, a config file or flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadInput {
    pub memory_mb: u32,
    pub duration_seconds: f64,
    pub monthly_invocations: u64,
    pub egress_kb_per_request: f64,
    pub internet_transfer_ratio_percent: f64,
    pub exchange_rate: f64,
}

impl Default for WorkloadInput {
    fn default() -> Self {
        Self {
            memory_mb: 128,
            duration_seconds: 1.0,
            monthly_invocations: 1_000_000,
            egress_kb_per_request: 0.0,
            internet_transfer_ratio_percent: 100.0,
            exchange_rate: 150.0,
        }
    }
}

impl WorkloadInput {
    pub fn validate(self) -> Result<WorkloadConfig> {
        WorkloadConfig::try_from(self)
    }
}

/// Data-transfer side of a workload, shared by both cost models
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EgressProfile {
    pub egress_kb_per_request: f64,
    pub internet_transfer_ratio_percent: f64,
}

/// A validated workload
///
/// Only obtainable through validation, so every calculator can rely on the
/// ranges below without re-checking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadConfig {
    memory_mb: u32,
    duration_seconds: f64,
    monthly_invocations: u64,
    egress: EgressProfile,
    exchange_rate: f64,
}

impl WorkloadConfig {
    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn memory_gb(&self) -> f64 {
        self.memory_mb as f64 / 1024.0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn monthly_invocations(&self) -> u64 {
        self.monthly_invocations
    }

    pub fn egress(&self) -> EgressProfile {
        self.egress
    }

    pub fn exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    /// GB-seconds consumed by a single invocation
    pub fn gb_seconds_per_invocation(&self) -> f64 {
        self.memory_gb() * self.duration_seconds
    }

    /// Same workload at a different monthly volume
    pub fn with_invocations(&self, monthly_invocations: u64) -> Result<Self> {
        check_invocations("monthly_invocations", monthly_invocations)?;
        Ok(Self {
            monthly_invocations,
            ..self.clone()
        })
    }

    /// Same workload with a different internet transfer ratio
    pub fn with_transfer_ratio(&self, ratio_percent: f64) -> Result<Self> {
        check_transfer_ratio(ratio_percent)?;
        Ok(Self {
            egress: EgressProfile {
                internet_transfer_ratio_percent: ratio_percent,
                ..self.egress
            },
            ..self.clone()
        })
    }

    pub fn to_input(&self) -> WorkloadInput {
        WorkloadInput {
            memory_mb: self.memory_mb,
            duration_seconds: self.duration_seconds,
            monthly_invocations: self.monthly_invocations,
            egress_kb_per_request: self.egress.egress_kb_per_request,
            internet_transfer_ratio_percent: self.egress.internet_transfer_ratio_percent,
            exchange_rate: self.exchange_rate,
        }
    }
}

impl TryFrom<WorkloadInput> for WorkloadConfig {
    type Error = CostError;

    fn try_from(input: WorkloadInput) -> Result<Self> {
        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&input.memory_mb) {
            return Err(CostError::validation(
                "memory_mb",
                format!("must be between {} and {}", MIN_MEMORY_MB, MAX_MEMORY_MB),
            ));
        }

        let duration = input.duration_seconds;
        if !duration.is_finite() || duration <= 0.0 || duration > MAX_DURATION_SECONDS {
            return Err(CostError::validation(
                "duration_seconds",
                format!("must be greater than 0 and at most {}", MAX_DURATION_SECONDS),
            ));
        }

        check_invocations("monthly_invocations", input.monthly_invocations)?;

        let egress_kb = input.egress_kb_per_request;
        if !egress_kb.is_finite() || egress_kb < 0.0 {
            return Err(CostError::validation(
                "egress_kb_per_request",
                "must be a non-negative number",
            ));
        }

        check_transfer_ratio(input.internet_transfer_ratio_percent)?;

        let rate = input.exchange_rate;
        if !rate.is_finite() || !(MIN_EXCHANGE_RATE..=MAX_EXCHANGE_RATE).contains(&rate) {
            return Err(CostError::validation(
                "exchange_rate",
                format!("must be between {} and {}", MIN_EXCHANGE_RATE, MAX_EXCHANGE_RATE),
            ));
        }

        Ok(Self {
            memory_mb: input.memory_mb,
            duration_seconds: duration,
            monthly_invocations: input.monthly_invocations,
            egress: EgressProfile {
                egress_kb_per_request: egress_kb,
                internet_transfer_ratio_percent: input.internet_transfer_ratio_percent,
            },
            exchange_rate: rate,
        })
    }
}

pub(crate) fn check_invocations(field: &str, value: u64) -> Result<()> {
    if !(MIN_MONTHLY_INVOCATIONS..=MAX_MONTHLY_INVOCATIONS).contains(&value) {
        return Err(CostError::validation(
            field,
            format!(
                "must be between {} and {}",
                MIN_MONTHLY_INVOCATIONS, MAX_MONTHLY_INVOCATIONS
            ),
        ));
    }
    Ok(())
}

fn check_transfer_ratio(ratio: f64) -> Result<()> {
    if !ratio.is_finite() || !(0.0..=100.0).contains(&ratio) {
        return Err(CostError::validation(
            "internet_transfer_ratio_percent",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

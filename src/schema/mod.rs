//! Output validation for structured generation.
//!
//! The model promises JSON shaped like a template, but nothing enforces
//! that promise upstream. This module is the boundary where free text
//! becomes (or fails to become) a typed object. It never repairs output
//! itself; [`RepairPolicy`] tells the pipeline whether to re-prompt.

mod error;


pub use error::SchemaError;

use std::time::Duration;

use serde_json::{Map, Value};

/// Parses `raw` as a JSON object, without key conformance checks.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, SchemaError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|source| SchemaError::Parse {
        raw: raw.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SchemaError::NotAnObject {
            raw: raw.to_string(),
        }),
    }
}

/// Parses `raw` and checks its top-level keys against `template`.
///
/// Conformance is strict in both directions: template keys must all be
/// present and no extra keys are tolerated. Values are not type-checked;
/// the template only fixes the shape.
pub fn validate(raw: &str, template: &Value) -> Result<Map<String, Value>, SchemaError> {
    let object = parse_object(raw)?;

    let template_keys: Vec<&String> = template
        .as_object()
        .map(|o| o.keys().collect())
        .unwrap_or_default();

    let missing: Vec<String> = template_keys
        .iter()
        .filter(|k| !object.contains_key(k.as_str()))
        .map(|k| (*k).clone())
        .collect();
    let unexpected: Vec<String> = object
        .keys()
        .filter(|k| !template_keys.iter().any(|t| t.as_str() == k.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(SchemaError::KeyMismatch {
            raw: raw.to_string(),
            missing,
            unexpected,
        });
    }

    Ok(object)
}

/// Backoff shape between repair attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles with each retry.
    Exponential,
}

/// Bounded re-prompt policy applied when validation fails.
///
/// `retries = 0` (the default) reproduces the reference behavior: one
/// attempt, no repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairPolicy {
    /// Repair attempts after the initial one.
    pub retries: u32,
    /// Delay shape between attempts.
    pub backoff: Backoff,
    /// Base delay unit.
    pub base_delay: Duration,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            backoff: Backoff::Fixed,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RepairPolicy {
    /// A policy with `retries` repair attempts and fixed backoff.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            retries,
            ..Self::default()
        }
    }

    /// Delay before repair attempt `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.base_delay.saturating_mul(factor)
            }
        }
    }
}

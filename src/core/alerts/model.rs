// Alert model types.

use serde::{Deserialize, Serialize};

use crate::core::model::{Position, SafetyConfig};

/// Safety level of the subject relative to the home radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Inside the radius. Never attached to an alert record.
    Safe,
    /// Outside the radius but within twice of it
    Wandering,
    /// Beyond twice the radius
    Critical,
}

impl Severity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Wandering => "Wandering",
            Self::Critical => "Critical",
        }
    }

    pub fn is_breach(&self) -> bool {
        !matches!(self, Self::Safe)
    }
}

/// Two-state headline shown next to the distance readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStatus {
    Safe,
    Alert,
}

impl From<Severity> for SafetyStatus {
    fn from(severity: Severity) -> Self {
        if severity.is_breach() {
            Self::Alert
        } else {
            Self::Safe
        }
    }
}

/// A raised alert. Append-only: never mutated after it lands in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub created_at_millis: i64,
    pub message: String,
    pub location: Position,
    pub severity: Severity,
}

/// Trigger-time context of an alert whose message is still being composed.
///
/// Identity, severity and timestamp are fixed here so that a late enrichment
/// still produces a record describing the original breach.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAlert {
    pub sequence: u64,
    pub id: String,
    pub created_at_millis: i64,
    pub location: Position,
    pub severity: Severity,
    pub distance_meters: f64,
    pub config: SafetyConfig,
}

impl PendingAlert {
    pub fn complete(self, message: String) -> AlertRecord {
        AlertRecord {
            id: self.id,
            created_at_millis: self.created_at_millis,
            message,
            location: self.location,
            severity: self.severity,
        }
    }
}

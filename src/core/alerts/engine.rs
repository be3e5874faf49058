// Alert engine - classifies breaches and enforces the alert cooldown.

use std::time::Duration;

use super::model::PendingAlert;
use super::triggers::classify;
use crate::core::model::{Position, SafetyConfig};

/// Default minimum gap between two alert triggers
pub const DEFAULT_ALERT_COOLDOWN: Duration = Duration::from_secs(60);

/// True iff strictly more than `cooldown_millis` have passed since
/// `last_fired_at_millis`.
pub fn should_fire(now_millis: i64, last_fired_at_millis: i64, cooldown_millis: i64) -> bool {
    now_millis.saturating_sub(last_fired_at_millis) > cooldown_millis
}

/// Alert engine state
#[derive(Debug)]
pub struct AlertEngine {
    cooldown_millis: i64,
    /// `None` until the first alert fires
    last_fired_at: Option<i64>,
    next_sequence: u64,
}

impl AlertEngine {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown_millis: i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX),
            last_fired_at: None,
            next_sequence: 0,
        }
    }

    pub fn last_fired_at(&self) -> Option<i64> {
        self.last_fired_at
    }

    /// Whether an alert may fire at `now_millis`. Does not mark anything.
    pub fn can_fire(&self, now_millis: i64) -> bool {
        match self.last_fired_at {
            Some(last) => should_fire(now_millis, last, self.cooldown_millis),
            None => true,
        }
    }

    /// Evaluate a classified sample. On a breach outside the cooldown the
    /// cooldown is marked immediately and the trigger context is returned.
    pub fn evaluate(
        &mut self,
        position: &Position,
        distance_meters: f64,
        config: &SafetyConfig,
    ) -> Option<PendingAlert> {
        let severity = classify(distance_meters, config.radius_meters);
        if !severity.is_breach() {
            return None;
        }

        let now = position.captured_at_millis;
        if !self.can_fire(now) {
            return None;
        }
        self.last_fired_at = Some(now);

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        Some(PendingAlert {
            sequence,
            id: format!("alert-{}-{}", now, sequence),
            created_at_millis: now,
            location: *position,
            severity,
            distance_meters,
            config: config.clone(),
        })
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_COOLDOWN)
    }
}

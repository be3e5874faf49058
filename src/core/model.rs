use serde::{Deserialize, Serialize};

/// A single location fix. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported horizontal accuracy, when the provider knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
    pub captured_at_millis: i64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, captured_at_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            captured_at_millis,
        }
    }

    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }
}

/// Caregiver-defined geofence. Replaced wholesale by `apply_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    pub home_location: Option<Position>,
    pub radius_meters: f64,
    pub caretaker_phone: String,
    pub caretaker_name: String,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            home_location: None,
            radius_meters: 100.0,
            caretaker_phone: String::new(),
            caretaker_name: "Caretaker".to_string(),
        }
    }
}

/// One event from the location provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorReading {
    Fix(Position),
    /// Provider-side failure (timeout, permission denied, ...). Logged only.
    Error { message: String },
}

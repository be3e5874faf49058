// Recorded-track playback: feeds a saved sequence of sensor readings into a
// monitor as if they were arriving from a live location provider.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use super::model::{SafetyConfig, SensorReading};
use super::monitor::MonitorCommand;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A geofence plus the readings to play against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SafetyConfig,
    pub readings: Vec<SensorReading>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Send `readings` into `feed`, spacing fixes by their capture timestamps
/// divided by `speed`. A non-positive speed sends everything immediately.
pub async fn play(readings: Vec<SensorReading>, speed: f64, feed: mpsc::Sender<MonitorCommand>) {
    let mut last_capture: Option<i64> = None;

    for reading in readings {
        if let SensorReading::Fix(position) = &reading {
            if let (Some(previous), true) = (last_capture, speed > 0.0) {
                let gap_millis = position.captured_at_millis.saturating_sub(previous).max(0);
                let wait = Duration::from_secs_f64(gap_millis as f64 / 1000.0 / speed);
                tokio::time::sleep(wait).await;
            }
            last_capture = Some(position.captured_at_millis);
        }

        if feed.send(reading.into()).await.is_err() {
            log::warn!("Replay stopped: monitor feed closed");
            return;
        }
    }
}

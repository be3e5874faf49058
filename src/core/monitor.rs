// Geofence monitor - owns all tracking state and wires the alert pipeline
// together on every incoming position sample.

use serde::Serialize;
use tokio::sync::mpsc;

use super::alerts::engine::AlertEngine;
use super::alerts::model::{AlertRecord, PendingAlert, SafetyStatus, Severity};
use super::alerts::triggers::classify;
use super::config::{validate, ConfigError, EngineSettings};
use super::enrichment::capabilities::Capabilities;
use super::enrichment::pipeline;
use super::geodesy::distance_meters;
use super::history::History;
use super::model::{Position, SafetyConfig, SensorReading};

/// Everything the UI reads. Only the monitor mutates it.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorState {
    pub current_position: Option<Position>,
    pub history: History,
    pub config: SafetyConfig,
    /// Ordered by trigger time, not by enrichment completion
    pub alerts: Vec<AlertRecord>,
    pub is_tracking: bool,
}

impl MonitorState {
    fn new(history_capacity: usize) -> Self {
        Self {
            current_position: None,
            history: History::with_capacity(history_capacity),
            config: SafetyConfig::default(),
            alerts: Vec::new(),
            is_tracking: false,
        }
    }
}

/// Notifications for a UI or dispatch layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MonitorEvent {
    Status { distance_meters: f64, severity: Severity },
    /// `recipient` is the caretaker phone configured when the alert triggered
    AlertRaised { recipient: String, record: AlertRecord },
    TipUpdated(String),
}

/// What happened to a single position sample
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// Low-accuracy fix while already tracking
    Discarded,
    /// Accepted, but no home location is configured
    NoHome,
    Classified {
        distance_meters: f64,
        severity: Severity,
        /// Id of the alert triggered by this sample, if any
        alert_id: Option<String>,
    },
}

/// Input to [`GeofenceMonitor::run`]
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorCommand {
    Reading(SensorReading),
    ApplyConfig(SafetyConfig),
}

impl From<SensorReading> for MonitorCommand {
    fn from(reading: SensorReading) -> Self {
        MonitorCommand::Reading(reading)
    }
}

enum Completion {
    Alert {
        sequence: u64,
        /// Caretaker phone at trigger time
        recipient: String,
        record: AlertRecord,
    },
    Tip { generation: u64, text: String },
}

pub struct GeofenceMonitor {
    settings: EngineSettings,
    capabilities: Capabilities,
    state: MonitorState,
    engine: AlertEngine,
    distance_from_home: Option<f64>,
    safety_tip: String,
    accepted_samples: u64,
    /// Trigger sequence of each entry in `state.alerts`
    alert_sequences: Vec<u64>,
    tip_generation: u64,
    applied_tip_generation: u64,
    in_flight: usize,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    events: Option<mpsc::UnboundedSender<MonitorEvent>>,
}

impl GeofenceMonitor {
    pub fn new(settings: EngineSettings, capabilities: Capabilities) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            state: MonitorState::new(settings.history_capacity),
            engine: AlertEngine::new(settings.alert_cooldown()),
            settings,
            capabilities,
            distance_from_home: None,
            safety_tip: pipeline::INITIAL_TIP.to_string(),
            accepted_samples: 0,
            alert_sequences: Vec::new(),
            tip_generation: 0,
            applied_tip_generation: 0,
            in_flight: 0,
            completion_tx,
            completion_rx,
            events: None,
        }
    }

    /// Forward status, alert and tip notifications to `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<MonitorEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stop forwarding notifications, closing the events channel.
    pub fn close_events(&mut self) {
        self.events = None;
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Distance measured for the last accepted sample, if a home is set.
    pub fn distance_from_home(&self) -> Option<f64> {
        self.distance_from_home
    }

    pub fn status(&self) -> SafetyStatus {
        match self.distance_from_home {
            Some(distance) if distance > self.state.config.radius_meters => SafetyStatus::Alert,
            _ => SafetyStatus::Safe,
        }
    }

    pub fn safety_tip(&self) -> &str {
        &self.safety_tip
    }

    /// Number of enrichment or tip tasks that have not reported back yet.
    pub fn pending_tasks(&self) -> usize {
        self.in_flight
    }

    /// Replace the geofence configuration wholesale.
    pub fn apply_config(&mut self, config: SafetyConfig) -> Result<(), ConfigError> {
        self.drain_completions();
        validate(&config)?;

        self.distance_from_home = match (config.home_location, self.state.current_position) {
            (Some(home), Some(current)) => Some(distance_meters(&current, &home)),
            _ => None,
        };
        match &config.home_location {
            Some(home) => log::info!(
                "Geofence set: home {:.5}, {:.5}, radius {}m",
                home.latitude,
                home.longitude,
                config.radius_meters
            ),
            None => log::info!("Geofence cleared: no home location"),
        }
        self.state.config = config;
        Ok(())
    }

    /// Process one location fix. Must be called from within a Tokio runtime;
    /// enrichment is spawned onto it.
    pub fn on_position_sample(&mut self, position: Position) -> SampleOutcome {
        self.drain_completions();
        if let (Some(accuracy), Some(_)) = (position.accuracy_meters, self.state.current_position) {
            if accuracy > self.settings.noise_accuracy_meters {
                log::debug!("Discarding noisy fix (accuracy {:.0}m)", accuracy);
                return SampleOutcome::Discarded;
            }
        }

        if !self.state.is_tracking {
            log::info!(
                "Tracking started at {:.5}, {:.5}",
                position.latitude,
                position.longitude
            );
        }
        self.state.current_position = Some(position);
        self.state.history.push(position);
        self.state.is_tracking = true;
        self.accepted_samples += 1;

        if self.settings.tip_interval > 0 && self.accepted_samples % self.settings.tip_interval == 0 {
            self.spawn_tip_refresh();
        }

        let Some(home) = self.state.config.home_location else {
            self.distance_from_home = None;
            return SampleOutcome::NoHome;
        };

        let distance = distance_meters(&position, &home);
        let severity = classify(distance, self.state.config.radius_meters);
        self.distance_from_home = Some(distance);
        self.emit(MonitorEvent::Status {
            distance_meters: distance,
            severity,
        });

        let alert_id = self
            .engine
            .evaluate(&position, distance, &self.state.config)
            .map(|pending| {
                let id = pending.id.clone();
                log::info!(
                    "Geofence breach ({}, {:.0}m): raising {}",
                    pending.severity.display_name(),
                    distance,
                    id
                );
                self.spawn_enrichment(pending);
                id
            });

        SampleOutcome::Classified {
            distance_meters: distance,
            severity,
            alert_id,
        }
    }

    /// Apply every enrichment and tip refresh that has already finished,
    /// without waiting for the ones still running.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply_completion(completion);
        }
    }

    /// Wait until every started enrichment and tip refresh has been applied.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply_completion(completion),
                None => break,
            }
        }
    }

    /// Drive the monitor from a location provider until the feed closes,
    /// then wait for outstanding enrichment. Config changes arrive on the same
    /// feed and take effect for every later reading.
    pub async fn run(&mut self, mut feed: mpsc::Receiver<MonitorCommand>) {
        loop {
            tokio::select! {
                command = feed.recv() => match command {
                    Some(MonitorCommand::Reading(SensorReading::Fix(position))) => {
                        self.on_position_sample(position);
                    }
                    Some(MonitorCommand::Reading(SensorReading::Error { message })) => {
                        log::error!("Location provider error: {}", message);
                    }
                    Some(MonitorCommand::ApplyConfig(config)) => {
                        if let Err(e) = self.apply_config(config) {
                            log::warn!("Ignoring geofence update: {}", e);
                        }
                    }
                    None => break,
                },
                Some(completion) = self.completion_rx.recv(), if self.in_flight > 0 => {
                    self.apply_completion(completion);
                }
            }
        }
        self.settle().await;
    }

    fn spawn_enrichment(&mut self, pending: PendingAlert) {
        let capabilities = self.capabilities.clone();
        let subject_name = self.settings.subject_name.clone();
        let tx = self.completion_tx.clone();
        let sequence = pending.sequence;
        let recipient = pending.config.caretaker_phone.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let record = pipeline::enrich(&capabilities, &subject_name, pending).await;
            let _ = tx.send(Completion::Alert {
                sequence,
                recipient,
                record,
            });
        });
    }

    fn spawn_tip_refresh(&mut self) {
        self.tip_generation += 1;
        let generation = self.tip_generation;
        let recent = self.state.history.recent(self.settings.tip_window);
        let advisor = self.capabilities.advisor.clone();
        let tx = self.completion_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let worker = tokio::spawn(async move { pipeline::safety_tip(advisor.as_ref(), &recent).await });
            let text = match worker.await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Safety tip task failed: {}", e);
                    pipeline::FAILED_TIP_FALLBACK.to_string()
                }
            };
            let _ = tx.send(Completion::Tip { generation, text });
        });
    }

    fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Alert {
                sequence,
                recipient,
                record,
            } => {
                log::info!("[ALERT to {}]: {}", recipient, record.message);
                let index = self.alert_sequences.partition_point(|s| *s < sequence);
                self.alert_sequences.insert(index, sequence);
                self.state.alerts.insert(index, record.clone());
                self.emit(MonitorEvent::AlertRaised { recipient, record });
            }
            Completion::Tip { generation, text } => {
                // An older refresh finishing late must not overwrite a newer tip
                if generation > self.applied_tip_generation {
                    self.applied_tip_generation = generation;
                    self.safety_tip = text.clone();
                    self.emit(MonitorEvent::TipUpdated(text));
                }
            }
        }
    }

    fn emit(&self, event: MonitorEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

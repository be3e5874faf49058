// Geofence alerting.
//
// Architecture:
// - model.rs: Severity levels and alert records
// - triggers.rs: Distance-to-severity classification
// - engine.rs: Cooldown policy and alert triggering

pub mod engine;
pub mod model;
pub mod triggers;

//! Capability contracts consumed by the enrichment pipeline.
//!
//! Backends (reverse geocoders, language models, ...) implement these traits;
//! the engine never depends on a concrete one.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::model::{Position, SafetyConfig};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnrichmentError {
    #[error("capability unavailable")]
    Unavailable,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Everything a composer gets to write an alert message.
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub subject_name: String,
    pub position: Position,
    pub config: SafetyConfig,
    pub distance_meters: f64,
    pub description: String,
}

/// Turns coordinates into an address or landmark description.
#[async_trait]
pub trait LocationDescriber: Send + Sync {
    async fn describe(&self, position: &Position) -> Result<String, EnrichmentError>;
}

/// Writes an SMS-length alert message (soft target under 160 characters).
#[async_trait]
pub trait MessageComposer: Send + Sync {
    async fn compose(&self, request: &CompositionRequest) -> Result<String, EnrichmentError>;
}

/// Produces one caregiving advisory from recent movement.
#[async_trait]
pub trait TipAdvisor: Send + Sync {
    async fn tip(&self, recent: &[Position]) -> Result<String, EnrichmentError>;
}

/// Stand-in backend for running without network access: every call reports
/// `Unavailable`, so the pipeline always takes its fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl LocationDescriber for Offline {
    async fn describe(&self, _position: &Position) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable)
    }
}

#[async_trait]
impl MessageComposer for Offline {
    async fn compose(&self, _request: &CompositionRequest) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable)
    }
}

#[async_trait]
impl TipAdvisor for Offline {
    async fn tip(&self, _recent: &[Position]) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable)
    }
}

/// The set of backends injected into a monitor.
#[derive(Clone)]
pub struct Capabilities {
    pub describer: Arc<dyn LocationDescriber>,
    pub composer: Arc<dyn MessageComposer>,
    pub advisor: Arc<dyn TipAdvisor>,
}

impl Capabilities {
    pub fn new(
        describer: Arc<dyn LocationDescriber>,
        composer: Arc<dyn MessageComposer>,
        advisor: Arc<dyn TipAdvisor>,
    ) -> Self {
        Self {
            describer,
            composer,
            advisor,
        }
    }

    pub fn offline() -> Self {
        Self::new(Arc::new(Offline), Arc::new(Offline), Arc::new(Offline))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::offline()
    }
}

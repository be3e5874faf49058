// Two-stage alert enrichment with deterministic fallbacks.
//
// Nothing in here returns an error: every capability failure is logged and
// replaced by fallback text.

use super::capabilities::{Capabilities, CompositionRequest, LocationDescriber, MessageComposer, TipAdvisor};
use crate::core::alerts::model::{AlertRecord, PendingAlert};
use crate::core::geodesy::{format_coordinates, maps_link};
use crate::core::model::Position;

pub const INITIAL_TIP: &str = "Initializing...";
pub const EMPTY_TIP_FALLBACK: &str = "Ensure the patient has an ID bracelet with contact info.";
pub const FAILED_TIP_FALLBACK: &str = "Keep a recent photo of the patient available at all times.";

pub fn fallback_description(position: &Position) -> String {
    format!("at coordinates {}", format_coordinates(position))
}

pub fn fallback_message(request: &CompositionRequest) -> String {
    format!(
        "ALERT: {} is outside safety zone ({}m away). Location: {}. {}",
        request.subject_name,
        request.distance_meters.round() as i64,
        request.description,
        maps_link(&request.position)
    )
}

fn empty_message_fallback(request: &CompositionRequest) -> String {
    format!(
        "ALERT: {} is {}m from home. Near: {}. Link: {}",
        request.subject_name,
        request.distance_meters.round() as i64,
        request.description,
        maps_link(&request.position)
    )
}

/// Stage one: a human-readable description of `position`.
pub async fn describe_location(describer: &dyn LocationDescriber, position: &Position) -> String {
    match describer.describe(position).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => format!("near coordinates {}", format_coordinates(position)),
        Err(e) => {
            log::warn!("Location lookup failed: {}", e);
            fallback_description(position)
        }
    }
}

/// Stage two: the alert message itself.
pub async fn compose_message(composer: &dyn MessageComposer, request: &CompositionRequest) -> String {
    match composer.compose(request).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => empty_message_fallback(request),
        Err(e) => {
            log::warn!("Message composition failed: {}", e);
            fallback_message(request)
        }
    }
}

/// Run both stages for a triggered alert and build the final record.
///
/// Each stage runs in its own task, so a backend that panics only costs that
/// stage: a crashed composer still gets the description the first stage found.
pub async fn enrich(capabilities: &Capabilities, subject_name: &str, pending: PendingAlert) -> AlertRecord {
    let describer = capabilities.describer.clone();
    let location = pending.location;
    let described = tokio::spawn(async move { describe_location(describer.as_ref(), &location).await });
    let description = match described.await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Location lookup task failed: {}", e);
            fallback_description(&pending.location)
        }
    };

    let request = CompositionRequest {
        subject_name: subject_name.to_string(),
        position: pending.location,
        config: pending.config.clone(),
        distance_meters: pending.distance_meters,
        description,
    };
    let composer = capabilities.composer.clone();
    let staged = request.clone();
    let composed = tokio::spawn(async move { compose_message(composer.as_ref(), &staged).await });
    let message = match composed.await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Message composition task failed: {}", e);
            fallback_message(&request)
        }
    };

    pending.complete(message)
}

pub async fn safety_tip(advisor: &dyn TipAdvisor, recent: &[Position]) -> String {
    match advisor.tip(recent).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => EMPTY_TIP_FALLBACK.to_string(),
        Err(e) => {
            log::warn!("Safety tip refresh failed: {}", e);
            FAILED_TIP_FALLBACK.to_string()
        }
    }
}

// Severity classification for a measured distance from home.

use super::model::Severity;

/// Classify `distance_meters` against the safety radius.
///
/// Both band edges are inclusive on the lower severity: exactly `radius` is
/// SAFE and exactly `2 * radius` is still WANDERING.
pub fn classify(distance_meters: f64, radius_meters: f64) -> Severity {
    if distance_meters <= radius_meters {
        Severity::Safe
    } else if distance_meters <= radius_meters * 2.0 {
        Severity::Wandering
    } else {
        Severity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(50.0, 100.0), Severity::Safe);
        assert_eq!(classify(150.0, 100.0), Severity::Wandering);
        assert_eq!(classify(250.0, 100.0), Severity::Critical);
    }

    #[test]
    fn test_classify_boundaries_inclusive() {
        assert_eq!(classify(100.0, 100.0), Severity::Safe);
        assert_eq!(classify(200.0, 100.0), Severity::Wandering);
        assert_eq!(classify(200.001, 100.0), Severity::Critical);
    }

    #[test]
    fn test_classify_outside_ui_radius_range() {
        assert_eq!(classify(3.0, 2.5), Severity::Wandering);
        assert_eq!(classify(9_000.0, 5_000.0), Severity::Wandering);
        assert_eq!(classify(0.0, 0.5), Severity::Safe);
    }
}

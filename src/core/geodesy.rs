// Great-circle math and display formatting for positions.

use chrono::{Local, TimeZone};

use super::model::Position;

/// Mean Earth radius used for the spherical model
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two positions, in meters.
pub fn distance_meters(a: &Position, b: &Position) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// `"87m"` below one kilometer, `"1.25km"` at or above it.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Local wall-clock time of a millisecond timestamp as `HH:MM:SS`.
pub fn format_time(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

pub fn maps_link(position: &Position) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        position.latitude, position.longitude
    )
}

/// Fixed-precision coordinate pair, e.g. `"51.50073, -0.12463"`.
pub fn format_coordinates(position: &Position) -> String {
    format!("{:.5}, {:.5}", position.latitude, position.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude, 0)
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (at(0.0, 0.0), at(0.001, 0.0)),
            (at(51.5007, -0.1246), at(48.8584, 2.2945)),
            (at(-33.8568, 151.2153), at(35.6586, 139.7454)),
        ];
        for (a, b) in &pairs {
            assert_eq!(distance_meters(a, b), distance_meters(b, a));
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = at(40.7128, -74.0060);
        assert_eq!(distance_meters(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_one_millidegree_latitude() {
        let d = distance_meters(&at(0.0, 0.0), &at(0.001, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_distance_london_paris() {
        let d = distance_meters(&at(51.5007, -0.1246), &at(48.8584, 2.2945));
        assert!((d - 340_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn test_format_distance_units() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(111.19), "111m");
        assert_eq!(format_distance(999.4), "999m");
        assert_eq!(format_distance(1000.0), "1.00km");
        assert_eq!(format_distance(1234.5), "1.23km");
    }

    #[test]
    fn test_maps_link_and_coordinates() {
        let p = at(0.001, -12.5);
        assert_eq!(maps_link(&p), "https://www.google.com/maps?q=0.001,-12.5");
        assert_eq!(format_coordinates(&p), "0.00100, -12.50000");
    }

    #[test]
    fn test_format_time_shape() {
        let formatted = format_time(1_700_000_000_000);
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }
}

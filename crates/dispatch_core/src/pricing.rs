//! Trip metrics: duration, ETA, and fare derivation.

/// Assumed average travel speed in km/h.
pub const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Fixed pickup overhead added to the trip duration, in minutes.
pub const DISPATCH_DELAY_MIN: f64 = 5.0;

/// Fare per kilometre, in currency units.
pub const PER_KM_RATE: f64 = 10.0;

/// Trip duration in minutes for a routed distance.
pub fn duration_minutes(distance_km: f64) -> f64 {
    (distance_km / AVERAGE_SPEED_KMH) * 60.0
}

/// ETA in minutes: trip duration plus the fixed dispatch delay.
pub fn eta_minutes(duration_min: f64) -> f64 {
    duration_min + DISPATCH_DELAY_MIN
}

/// Fare for a routed distance.
pub fn fare(distance_km: f64) -> f64 {
    distance_km * PER_KM_RATE
}

/// Round to two decimal places, the precision every quoted figure carries.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_scales_with_distance() {
        assert_eq!(duration_minutes(40.0), 60.0);
        assert_eq!(duration_minutes(10.0), 15.0);
        assert_eq!(duration_minutes(0.0), 0.0);
    }

    #[test]
    fn eta_adds_dispatch_delay() {
        assert_eq!(eta_minutes(15.0), 20.0);
    }

    #[test]
    fn fare_is_linear_in_distance() {
        assert_eq!(fare(3.5), 35.0);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(5.678), 5.68);
        assert_eq!(round2(12.3449), 12.34);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }
}

//! pm2.5 concentration to US EPA air quality index.

use crate::types::{AqiCategory, AqiResult};

/// Compute the AQI for a pm2.5 concentration (µg/m³).
///
/// The band formulas are applied exactly as published, so the value drops
/// from 251 to 201 across 150.4/150.5. Every other boundary is continuous.
///
/// Negative or NaN input is treated as 0. Use
/// [`AqiReading::from_pm25`](crate::types::AqiReading::from_pm25) when the
/// reading may be missing.
pub fn compute_aqi(pm25: f64) -> AqiResult {
    // NaN.max(0.0) is 0.0
    let c = pm25.max(0.0);

    let (value, category) = if c <= 12.0 {
        (c * 50.0 / 12.0, AqiCategory::Good)
    } else if c <= 35.4 {
        ((c - 12.1) * 50.0 / 23.3 + 51.0, AqiCategory::Moderate)
    } else if c <= 55.4 {
        ((c - 35.5) * 50.0 / 19.9 + 101.0, AqiCategory::UnhealthyForSensitive)
    } else if c <= 150.4 {
        ((c - 55.5) * 100.0 / 94.9 + 151.0, AqiCategory::Unhealthy)
    } else if c <= 250.4 {
        ((c - 150.5) * 100.0 / 99.9 + 201.0, AqiCategory::VeryUnhealthy)
    } else {
        (301.0, AqiCategory::Hazardous)
    };

    AqiResult {
        value: value.round() as u16,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aqi(pm25: f64) -> (u16, AqiCategory) {
        let r = compute_aqi(pm25);
        (r.value, r.category)
    }

    #[test]
    fn test_fixed_points() {
        assert_eq!(aqi(0.0), (0, AqiCategory::Good));
        assert_eq!(aqi(12.0), (50, AqiCategory::Good));
        assert_eq!(aqi(35.4), (101, AqiCategory::Moderate));
        assert_eq!(aqi(55.4), (151, AqiCategory::UnhealthyForSensitive));
        assert_eq!(aqi(150.4), (251, AqiCategory::Unhealthy));
        assert_eq!(aqi(250.4), (301, AqiCategory::VeryUnhealthy));
        assert_eq!(aqi(500.0), (301, AqiCategory::Hazardous));
    }

    #[test]
    fn test_band_interiors() {
        assert_eq!(aqi(6.0), (25, AqiCategory::Good));
        assert_eq!(aqi(20.0), (68, AqiCategory::Moderate));
        assert_eq!(aqi(45.0), (125, AqiCategory::UnhealthyForSensitive));
        assert_eq!(aqi(100.0), (198, AqiCategory::Unhealthy));
        assert_eq!(aqi(200.0), (251, AqiCategory::VeryUnhealthy));
    }

    #[test]
    fn test_continuity_at_boundaries() {
        for (below, above) in [(12.0, 12.1), (35.4, 35.5), (55.4, 55.5), (250.4, 250.5)] {
            let (lo, _) = aqi(below);
            let (hi, _) = aqi(above);
            assert!(hi.abs_diff(lo) <= 1, "jump at {below}/{above}: {lo} -> {hi}");
        }
    }

    #[test]
    fn test_published_discontinuity_at_150() {
        assert_eq!(aqi(150.4).0, 251);
        assert_eq!(aqi(150.5), (201, AqiCategory::VeryUnhealthy));
    }

    #[test]
    fn test_monotonic_within_bands() {
        let mut previous = aqi(0.0);
        let mut c = 0.0;
        while c <= 300.0 {
            let current = aqi(c);
            if current.1 == previous.1 {
                assert!(current.0 >= previous.0, "decrease at {c}");
            }
            previous = current;
            c += 0.1;
        }
    }

    #[test]
    fn test_negative_and_nan_clamp_to_zero() {
        assert_eq!(aqi(-5.0), (0, AqiCategory::Good));
        assert_eq!(aqi(f64::NAN), (0, AqiCategory::Good));
    }
}

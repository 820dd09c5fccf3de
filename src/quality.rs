use serde::Serialize;

/// The four always-present probe values a pond status is judged on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub ph: f64,
    pub ammonia: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterStatus {
    Good,
    Moderate,
    Poor,
}

impl WaterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterStatus::Good => "good",
            WaterStatus::Moderate => "moderate",
            WaterStatus::Poor => "poor",
        }
    }
}

/// Maps a reading to a status tier.
///
/// Poor conditions are checked first and short-circuit; moderate is only
/// considered when nothing tripped poor.
pub fn classify(reading: &Reading) -> WaterStatus {
    if reading.dissolved_oxygen < 4.0
        || reading.temperature < 18.0
        || reading.temperature > 32.0
        || reading.ph < 6.5
        || reading.ph > 8.5
        || reading.ammonia > 0.5
    {
        return WaterStatus::Poor;
    }

    if reading.dissolved_oxygen < 5.0
        || reading.temperature < 20.0
        || reading.temperature > 30.0
        || reading.ph < 7.0
        || reading.ph > 8.0
        || reading.ammonia > 0.3
    {
        return WaterStatus::Moderate;
    }

    WaterStatus::Good
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, dissolved_oxygen: f64, ph: f64, ammonia: f64) -> Reading {
        Reading {
            temperature,
            dissolved_oxygen,
            ph,
            ammonia,
        }
    }

    #[test]
    fn low_oxygen_is_poor_regardless_of_other_fields() {
        assert_eq!(classify(&reading(25.0, 3.0, 7.5, 0.2)), WaterStatus::Poor);
    }

    #[test]
    fn everything_in_range_is_good() {
        assert_eq!(classify(&reading(25.0, 6.0, 7.5, 0.2)), WaterStatus::Good);
    }

    #[test]
    fn moderate_band_fires_only_when_no_poor_condition() {
        // DO in the 4.0..5.0 band, all else comfortable.
        assert_eq!(classify(&reading(25.0, 4.5, 7.5, 0.2)), WaterStatus::Moderate);
        // Same DO band, but ammonia trips poor first.
        assert_eq!(classify(&reading(25.0, 4.5, 7.5, 0.6)), WaterStatus::Poor);
    }

    #[test]
    fn boundary_values_stay_good() {
        // Thresholds are strict comparisons; exact boundary values do not trip.
        assert_eq!(classify(&reading(20.0, 5.0, 7.0, 0.3)), WaterStatus::Good);
    }

    #[test]
    fn classify_is_pure() {
        let r = reading(19.0, 4.2, 8.3, 0.35);
        assert_eq!(classify(&r), classify(&r));
    }
}

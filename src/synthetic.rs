//! Synthetic water-quality and feeding data.
//!
//! Stands in for real sensor input on cold start and whenever a requested
//! time range has no persisted rows. Values are random but plausible:
//! species-dependent baselines, deterministic time-of-day structure on top,
//! and physical clamps after jitter. Reproducible in distribution only;
//! tests assert bounds, never exact values.

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;

/// Baseline parameter profile for a cultured species.
///
/// Only two are modeled: a warm, high-pH profile (shrimp) and a moderate
/// one (fish). Every species name maps onto one of them explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeciesProfile {
    ShrimpLike,
    FishLike,
}

impl SpeciesProfile {
    pub fn for_species(species: &str) -> Self {
        match species {
            "南美白对虾" | "对虾" | "罗氏沼虾" | "小龙虾" => SpeciesProfile::ShrimpLike,
            // Finfish and anything unrecognized share the moderate profile.
            _ => SpeciesProfile::FishLike,
        }
    }
}

/// Where the pre-modifier baseline values come from.
#[derive(Clone, Copy, Debug)]
pub enum Baseline {
    Species(SpeciesProfile),
    /// Species-agnostic baseline used by the 24h dashboard fallback.
    Neutral,
}

impl Baseline {
    fn draw<R: Rng>(&self, rng: &mut R) -> BaseReading {
        match self {
            Baseline::Species(SpeciesProfile::ShrimpLike) => BaseReading {
                temperature: 28.0 + rng.gen_range(-2.0..2.0),
                dissolved_oxygen: 6.5 + rng.gen_range(-1.0..1.0),
                ph: 8.0 + rng.gen_range(-0.3..0.3),
                ammonia: 0.15 + rng.gen_range(-0.05..0.1),
            },
            Baseline::Species(SpeciesProfile::FishLike) => BaseReading {
                temperature: 24.0 + rng.gen_range(-2.0..2.0),
                dissolved_oxygen: 7.0 + rng.gen_range(-1.0..1.5),
                ph: 7.5 + rng.gen_range(-0.5..0.5),
                ammonia: 0.2 + rng.gen_range(-0.1..0.2),
            },
            Baseline::Neutral => BaseReading {
                temperature: 25.0 + rng.gen_range(-2.0..2.0),
                dissolved_oxygen: 6.0 + rng.gen_range(-1.5..1.5),
                ph: 7.5 + rng.gen_range(-0.5..0.5),
                ammonia: 0.2 + rng.gen_range(-0.1..0.2),
            },
        }
    }
}

struct BaseReading {
    temperature: f64,
    dissolved_oxygen: f64,
    ph: f64,
    ammonia: f64,
}

/// Clamp bounds and modifier switches for one generation call site.
///
/// The trend API and export paths clamp pH to 6.5..9.0; the 24h dashboard
/// fallback historically clamps to 6.5..8.5. Both are kept as named
/// presets rather than unified.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorPreset {
    pub ph_min: f64,
    pub ph_max: f64,
    pub night_do_drop: (f64, f64),
    pub feeding_ammonia_bump: bool,
    pub anomaly_probability: f64,
}

pub const STANDARD: GeneratorPreset = GeneratorPreset {
    ph_min: 6.5,
    ph_max: 9.0,
    night_do_drop: (0.8, 1.8),
    feeding_ammonia_bump: true,
    anomaly_probability: 0.02,
};

pub const DASHBOARD_24H: GeneratorPreset = GeneratorPreset {
    ph_min: 6.5,
    ph_max: 8.5,
    night_do_drop: (0.5, 1.5),
    feeding_ammonia_bump: false,
    anomaly_probability: 0.0,
};

/// Anomaly probability for the per-day (>7 day window) series, which has
/// no hour-of-day structure to make individual samples stand out.
const DAILY_ANOMALY_PROBABILITY: f64 = 0.05;

/// A fully populated generated sample. Mirrors the persisted row minus ids.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SyntheticSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub ph: f64,
    pub ammonia: f64,
    pub turbidity: f64,
    pub conductivity: f64,
    pub water_level: f64,
    pub cod: f64,
    pub heavy_metals: f64,
    pub residual_chlorine: f64,
    pub total_phosphorus: f64,
    pub total_nitrogen: f64,
    pub coliform: f64,
    pub algae: f64,
    pub biotoxicity: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (value * f).round() / f
}

/// Builds one sample at `time`. `structural` enables the hour-of-day
/// modifiers; the per-day series turns them off because every sample sits
/// at a fixed hour.
fn build_sample<R: Rng>(
    time: NaiveDateTime,
    baseline: Baseline,
    preset: &GeneratorPreset,
    structural: bool,
    anomaly_probability: f64,
    rng: &mut R,
) -> SyntheticSample {
    let mut base = baseline.draw(rng);
    let hour = time.hour();

    if structural {
        // Order matters: night DO depression, afternoon warming, then the
        // post-feeding ammonia bump around the usual feeding hours.
        if hour <= 6 {
            let (lo, hi) = preset.night_do_drop;
            base.dissolved_oxygen -= rng.gen_range(lo..hi);
        }
        if (12..=15).contains(&hour) {
            base.temperature += rng.gen_range(1.0..3.0);
        }
        if preset.feeding_ammonia_bump && matches!(hour, 9 | 10 | 18 | 19) {
            base.ammonia += rng.gen_range(0.1..0.3);
        }
    }

    // Rare anomaly: either a sharp DO drop or a pH spike, never both.
    if anomaly_probability > 0.0 && rng.gen_bool(anomaly_probability) {
        if rng.gen_bool(0.5) {
            base.dissolved_oxygen -= rng.gen_range(1.5..2.5);
        } else {
            base.ph += rng.gen_range(0.8..1.2);
        }
    }

    SyntheticSample {
        timestamp: time,
        temperature: round_to(base.temperature, 1),
        dissolved_oxygen: round_to(base.dissolved_oxygen.max(3.0), 1),
        ph: round_to(base.ph.clamp(preset.ph_min, preset.ph_max), 1),
        ammonia: round_to(base.ammonia.max(0.0), 2),
        turbidity: round_to(rng.gen_range(5.0..25.0), 1),
        conductivity: round_to(rng.gen_range(300.0..800.0), 0),
        water_level: round_to(rng.gen_range(1.5..2.5), 2),
        cod: round_to(rng.gen_range(10.0..30.0), 1),
        heavy_metals: round_to(rng.gen_range(0.01..0.1), 3),
        residual_chlorine: round_to(rng.gen_range(0.1..0.5), 2),
        total_phosphorus: round_to(rng.gen_range(0.1..0.5), 2),
        total_nitrogen: round_to(rng.gen_range(0.5..2.0), 2),
        coliform: round_to(rng.gen_range(100.0..1000.0), 0),
        algae: round_to(rng.gen_range(1000.0..10000.0), 0),
        biotoxicity: round_to(rng.gen_range(5.0..20.0), 1),
    }
}

/// Series for a `days`-long window ending at `now`, oldest first.
///
/// Windows of up to 7 days get one sample per hour with the full
/// hour-of-day structure; longer windows get one sample per day at noon.
pub fn window_series(
    profile: SpeciesProfile,
    now: NaiveDateTime,
    days: i64,
) -> Vec<SyntheticSample> {
    let mut rng = rand::thread_rng();
    let baseline = Baseline::Species(profile);
    let mut series = Vec::new();

    if days <= 7 {
        let hours = days * 24;
        for i in 0..hours {
            let time = now - chrono::Duration::hours(hours - i);
            series.push(build_sample(time, baseline, &STANDARD, true, STANDARD.anomaly_probability, &mut rng));
        }
    } else {
        for i in 0..days {
            let time = (now - chrono::Duration::days(days - i))
                .date()
                .and_hms_opt(12, 0, 0)
                .expect("noon is a valid time");
            series.push(build_sample(time, baseline, &STANDARD, false, DAILY_ANOMALY_PROBABILITY, &mut rng));
        }
    }

    series
}

/// One structured sample at `time`.
pub fn sample_at(
    baseline: Baseline,
    preset: &GeneratorPreset,
    time: NaiveDateTime,
) -> SyntheticSample {
    let mut rng = rand::thread_rng();
    build_sample(time, baseline, preset, true, preset.anomaly_probability, &mut rng)
}

/// The last `hours` hourly samples ending at `now`, newest first.
/// Callers that want chronological order reverse the result.
pub fn recent_hours(
    baseline: Baseline,
    preset: &GeneratorPreset,
    now: NaiveDateTime,
    hours: i64,
) -> Vec<SyntheticSample> {
    let mut rng = rand::thread_rng();
    (0..hours)
        .map(|i| {
            let time = now - chrono::Duration::hours(i);
            build_sample(time, baseline, preset, true, preset.anomaly_probability, &mut rng)
        })
        .collect()
}

/// One ad-hoc reading for "no data at all" fallbacks: uniform draws over
/// the comfortable ranges, no structure.
pub fn spot_reading<R: Rng>(rng: &mut R) -> crate::quality::Reading {
    crate::quality::Reading {
        temperature: round_to(rng.gen_range(20.0..30.0), 1),
        dissolved_oxygen: round_to(rng.gen_range(4.0..8.0), 1),
        ph: round_to(rng.gen_range(6.5..8.5), 1),
        ammonia: round_to(rng.gen_range(0.1..0.5), 2),
    }
}

/// A generated feed event: when, how much (kg), and the feed label.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticFeeding {
    pub time: NaiveDateTime,
    pub amount: f64,
    pub notes: &'static str,
}

/// Feedings for one calendar day. Shrimp ponds feed twice (morning and
/// late afternoon), fish ponds once; mass scales with pond area.
pub fn daily_feedings(
    profile: SpeciesProfile,
    area: f64,
    day: NaiveDateTime,
) -> Vec<SyntheticFeeding> {
    let mut rng = rand::thread_rng();
    let at = |hour| {
        day.date()
            .and_hms_opt(hour, 0, 0)
            .expect("fixed feeding hour is valid")
    };

    match profile {
        SpeciesProfile::ShrimpLike => vec![
            SyntheticFeeding {
                time: at(8),
                amount: round_to(area * rng.gen_range(3.5..4.5), 1),
                notes: "对虾配合饲料",
            },
            SyntheticFeeding {
                time: at(17),
                amount: round_to(area * rng.gen_range(2.5..3.5), 1),
                notes: "对虾配合饲料",
            },
        ],
        SpeciesProfile::FishLike => vec![SyntheticFeeding {
            time: at(9),
            amount: round_to(area * rng.gen_range(4.0..6.0), 1),
            notes: "草鱼配合饲料",
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn assert_physical_bounds(sample: &SyntheticSample, preset: &GeneratorPreset) {
        assert!(
            sample.dissolved_oxygen >= 3.0,
            "DO {} below floor",
            sample.dissolved_oxygen
        );
        assert!(
            sample.ph >= preset.ph_min && sample.ph <= preset.ph_max,
            "pH {} outside {}..{}",
            sample.ph,
            preset.ph_min,
            preset.ph_max
        );
        assert!(sample.ammonia >= 0.0);
        assert!(sample.turbidity >= 5.0 && sample.turbidity <= 25.0);
        assert!(sample.conductivity >= 300.0 && sample.conductivity <= 800.0);
        assert!(sample.water_level >= 1.5 && sample.water_level <= 2.5);
        assert!(sample.biotoxicity >= 5.0 && sample.biotoxicity <= 20.0);
    }

    #[test]
    fn hourly_series_respects_clamps() {
        for profile in [SpeciesProfile::ShrimpLike, SpeciesProfile::FishLike] {
            let series = window_series(profile, noon(), 7);
            assert_eq!(series.len(), 7 * 24);
            for sample in &series {
                assert_physical_bounds(sample, &STANDARD);
            }
        }
    }

    #[test]
    fn long_windows_switch_to_daily_at_noon() {
        let series = window_series(SpeciesProfile::FishLike, noon(), 30);
        assert_eq!(series.len(), 30);
        for sample in &series {
            assert_eq!(sample.timestamp.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        }
        // Oldest first.
        for pair in series.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn hourly_series_is_chronological() {
        let series = window_series(SpeciesProfile::ShrimpLike, noon(), 1);
        for pair in series.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn recent_hours_is_newest_first_and_uses_tighter_dashboard_clamp() {
        let series = recent_hours(Baseline::Neutral, &DASHBOARD_24H, noon(), 24);
        assert_eq!(series.len(), 24);
        for pair in series.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
        for sample in &series {
            assert_physical_bounds(sample, &DASHBOARD_24H);
            assert!(sample.ph <= 8.5);
        }
    }

    #[test]
    fn unknown_species_maps_to_fish_profile() {
        assert_eq!(SpeciesProfile::for_species("南美白对虾"), SpeciesProfile::ShrimpLike);
        assert_eq!(SpeciesProfile::for_species("草鱼"), SpeciesProfile::FishLike);
        assert_eq!(SpeciesProfile::for_species("锦鲤"), SpeciesProfile::FishLike);
        assert_eq!(SpeciesProfile::for_species(""), SpeciesProfile::FishLike);
    }

    #[test]
    fn shrimp_feed_twice_a_day_fish_once() {
        let shrimp = daily_feedings(SpeciesProfile::ShrimpLike, 5.2, noon());
        assert_eq!(shrimp.len(), 2);
        assert_eq!(shrimp[0].time.time(), chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(shrimp[1].time.time(), chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        // Mass scales with area: 5.2 * 3.5..4.5 for the morning feed.
        assert!(shrimp[0].amount >= 5.2 * 3.5 - 0.1 && shrimp[0].amount <= 5.2 * 4.5 + 0.1);

        let fish = daily_feedings(SpeciesProfile::FishLike, 3.8, noon());
        assert_eq!(fish.len(), 1);
        assert!(fish[0].amount >= 3.8 * 4.0 - 0.1 && fish[0].amount <= 3.8 * 6.0 + 0.1);
    }

    #[test]
    fn spot_reading_stays_in_comfort_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let r = spot_reading(&mut rng);
            assert!(r.temperature >= 20.0 && r.temperature <= 30.0);
            assert!(r.dissolved_oxygen >= 4.0 && r.dissolved_oxygen <= 8.0);
            assert!(r.ph >= 6.5 && r.ph <= 8.5);
            assert!(r.ammonia >= 0.1 && r.ammonia <= 0.5);
        }
    }
}

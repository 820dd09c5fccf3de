//! Table-driven alert content for the demo alert feed.
//!
//! Each of the 15 monitored parameters maps to a fixed title, a message
//! template naming the pond and a sampled out-of-range value, and a
//! severity that is fixed or drawn between two levels. This is synthetic
//! content, not detection over persisted samples.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlertKind {
    DissolvedOxygen,
    Temperature,
    Ph,
    Ammonia,
    Turbidity,
    Conductivity,
    WaterLevel,
    Cod,
    HeavyMetals,
    ResidualChlorine,
    TotalPhosphorus,
    TotalNitrogen,
    Coliform,
    Algae,
    Biotoxicity,
}

impl AlertKind {
    pub const ALL: [AlertKind; 15] = [
        AlertKind::DissolvedOxygen,
        AlertKind::Temperature,
        AlertKind::Ph,
        AlertKind::Ammonia,
        AlertKind::Turbidity,
        AlertKind::Conductivity,
        AlertKind::WaterLevel,
        AlertKind::Cod,
        AlertKind::HeavyMetals,
        AlertKind::ResidualChlorine,
        AlertKind::TotalPhosphorus,
        AlertKind::TotalNitrogen,
        AlertKind::Coliform,
        AlertKind::Algae,
        AlertKind::Biotoxicity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AlertKind::DissolvedOxygen => "dissolved_oxygen",
            AlertKind::Temperature => "temperature",
            AlertKind::Ph => "ph",
            AlertKind::Ammonia => "ammonia",
            AlertKind::Turbidity => "turbidity",
            AlertKind::Conductivity => "conductivity",
            AlertKind::WaterLevel => "water_level",
            AlertKind::Cod => "cod",
            AlertKind::HeavyMetals => "heavy_metals",
            AlertKind::ResidualChlorine => "residual_chlorine",
            AlertKind::TotalPhosphorus => "total_phosphorus",
            AlertKind::TotalNitrogen => "total_nitrogen",
            AlertKind::Coliform => "coliform",
            AlertKind::Algae => "algae",
            AlertKind::Biotoxicity => "biotoxicity",
        }
    }
}

/// Sampled alert content: fixed title, templated message, drawn severity.
#[derive(Clone, Debug)]
pub struct AlertContent {
    pub title: &'static str,
    pub message: String,
    pub level: &'static str,
}

pub fn sample_alert<R: Rng>(kind: AlertKind, pond_name: &str, rng: &mut R) -> AlertContent {
    match kind {
        AlertKind::DissolvedOxygen => AlertContent {
            title: "溶解氧过低",
            message: format!(
                "{pond_name}溶解氧值为{:.1}mg/L，低于安全阈值",
                rng.gen_range(2.0..3.4)
            ),
            level: if rng.gen_bool(0.5) { "danger" } else { "warning" },
        },
        AlertKind::Temperature => AlertContent {
            title: "水温异常",
            message: format!(
                "{pond_name}水温为{:.1}°C，超出适宜范围",
                rng.gen_range(15.0..18.0)
            ),
            level: "warning",
        },
        AlertKind::Ph => AlertContent {
            title: "pH值异常",
            message: format!(
                "{pond_name}pH值为{:.1}，超出适宜范围",
                rng.gen_range(6.0..6.5)
            ),
            level: "warning",
        },
        AlertKind::Ammonia => AlertContent {
            title: "氨氮过高",
            message: format!(
                "{pond_name}氨氮浓度为{:.1}mg/L，超过安全阈值",
                rng.gen_range(0.4..0.8)
            ),
            level: if rng.gen_bool(0.6) { "danger" } else { "warning" },
        },
        AlertKind::Turbidity => AlertContent {
            title: "浊度异常",
            message: format!(
                "{pond_name}浊度为{:.1}NTU，超出正常范围",
                rng.gen_range(25.0..40.0)
            ),
            level: "warning",
        },
        AlertKind::Conductivity => AlertContent {
            title: "电导率异常",
            message: format!(
                "{pond_name}电导率为{:.0}μS/cm，超出正常范围",
                rng.gen_range(800.0..1200.0)
            ),
            level: "warning",
        },
        AlertKind::WaterLevel => AlertContent {
            title: "液位异常",
            message: format!(
                "{pond_name}液位为{:.2}m，低于安全水位",
                rng.gen_range(0.8..1.2)
            ),
            level: "danger",
        },
        AlertKind::Cod => AlertContent {
            title: "化学需氧量过高",
            message: format!(
                "{pond_name}化学需氧量为{:.1}mg/L，超过安全阈值",
                rng.gen_range(30.0..50.0)
            ),
            level: if rng.gen_bool(0.7) { "danger" } else { "warning" },
        },
        AlertKind::HeavyMetals => AlertContent {
            title: "重金属含量异常",
            message: format!(
                "{pond_name}重金属含量为{:.3}μg/L，超过安全阈值",
                rng.gen_range(0.1..0.2)
            ),
            level: "danger",
        },
        AlertKind::ResidualChlorine => AlertContent {
            title: "余氯含量异常",
            message: format!(
                "{pond_name}余氯含量为{:.2}mg/L，超出正常范围",
                rng.gen_range(0.5..0.8)
            ),
            level: "warning",
        },
        AlertKind::TotalPhosphorus => AlertContent {
            title: "总磷含量过高",
            message: format!(
                "{pond_name}总磷含量为{:.2}mg/L，超过安全阈值",
                rng.gen_range(0.5..1.0)
            ),
            level: "warning",
        },
        AlertKind::TotalNitrogen => AlertContent {
            title: "总氮含量过高",
            message: format!(
                "{pond_name}总氮含量为{:.2}mg/L，超过安全阈值",
                rng.gen_range(2.0..3.0)
            ),
            level: "warning",
        },
        AlertKind::Coliform => AlertContent {
            title: "总大肠菌群超标",
            message: format!(
                "{pond_name}总大肠菌群数为{:.0}个/L，超过安全标准",
                rng.gen_range(1000.0..2000.0)
            ),
            level: if rng.gen_bool(0.6) { "danger" } else { "warning" },
        },
        AlertKind::Algae => AlertContent {
            title: "藻类密度过高",
            message: format!(
                "{pond_name}藻类密度为{:.0}个/mL，可能引发水华",
                rng.gen_range(10000.0..20000.0)
            ),
            level: "warning",
        },
        AlertKind::Biotoxicity => AlertContent {
            title: "生物毒性异常",
            message: format!(
                "{pond_name}生物毒性为{:.1}%，超过安全阈值",
                rng.gen_range(20.0..30.0)
            ),
            level: "danger",
        },
    }
}

/// Abbreviated title/message pair used by the synthetic history feed,
/// which only distinguishes the four core parameters.
pub fn history_content(kind: AlertKind, pond_name: &str) -> (&'static str, String) {
    match kind {
        AlertKind::DissolvedOxygen => ("溶解氧过低", format!("{pond_name}溶解氧值过低")),
        AlertKind::Temperature => ("水温异常", format!("{pond_name}水温异常")),
        AlertKind::Ph => ("pH值异常", format!("{pond_name}pH值异常")),
        _ => ("氨氮过高", format!("{pond_name}氨氮浓度过高")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_parameter_has_content_naming_the_pond() {
        let mut rng = rand::thread_rng();
        for kind in AlertKind::ALL {
            let alert = sample_alert(kind, "1号塘", &mut rng);
            assert!(!alert.title.is_empty());
            assert!(alert.message.contains("1号塘"), "{:?}: {}", kind, alert.message);
            assert!(matches!(alert.level, "info" | "warning" | "danger"));
        }
    }

    #[test]
    fn fixed_severity_parameters_never_vary() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            assert_eq!(sample_alert(AlertKind::WaterLevel, "p", &mut rng).level, "danger");
            assert_eq!(sample_alert(AlertKind::HeavyMetals, "p", &mut rng).level, "danger");
            assert_eq!(sample_alert(AlertKind::Biotoxicity, "p", &mut rng).level, "danger");
            assert_eq!(sample_alert(AlertKind::Turbidity, "p", &mut rng).level, "warning");
        }
    }

    #[test]
    fn probabilistic_severities_stay_within_their_two_levels() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let level = sample_alert(AlertKind::DissolvedOxygen, "p", &mut rng).level;
            assert!(level == "danger" || level == "warning");
        }
    }

    #[test]
    fn kind_keys_are_unique() {
        let mut keys: Vec<_> = AlertKind::ALL.iter().map(|k| k.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 15);
    }
}

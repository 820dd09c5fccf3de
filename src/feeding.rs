//! Feeding recommendation engine.
//!
//! A multiplicative correction model over pond area, the latest reading
//! and the time since the last feed. Both the amount and the reasoning
//! text are pure functions of their inputs.

use crate::quality::Reading;

/// Base allowance per mu of pond area, in kg.
const BASE_KG_PER_MU: f64 = 2.0;

fn oxygen_factor(dissolved_oxygen: f64) -> f64 {
    if dissolved_oxygen < 4.0 {
        0.7
    } else if dissolved_oxygen > 7.0 {
        1.2
    } else {
        1.0
    }
}

fn temperature_factor(temperature: f64) -> f64 {
    if temperature < 20.0 {
        0.8
    } else if temperature > 28.0 {
        0.9
    } else {
        1.0
    }
}

fn ph_factor(ph: f64) -> f64 {
    if ph < 7.0 || ph > 8.5 {
        0.9
    } else {
        1.0
    }
}

fn ammonia_factor(ammonia: f64) -> f64 {
    if ammonia > 0.4 {
        0.8
    } else {
        1.0
    }
}

fn time_factor(hours_since_last_feeding: Option<f64>) -> f64 {
    match hours_since_last_feeding {
        Some(h) if h < 6.0 => 0.5,
        Some(h) if h > 24.0 => 1.2,
        // No prior record keeps the standard allowance.
        _ => 1.0,
    }
}

/// Recommended feed mass in kg, clamped to 0.5..(area * 5) and rounded
/// to one decimal.
pub fn recommended_amount(
    area: f64,
    reading: &Reading,
    hours_since_last_feeding: Option<f64>,
) -> f64 {
    let base = area * BASE_KG_PER_MU;
    let amount = base
        * oxygen_factor(reading.dissolved_oxygen)
        * temperature_factor(reading.temperature)
        * ph_factor(reading.ph)
        * ammonia_factor(reading.ammonia)
        * time_factor(hours_since_last_feeding);

    // Floor wins over the area cap for very small ponds.
    let clamped = amount.min(area * 5.0).max(0.5);
    (clamped * 10.0).round() / 10.0
}

/// One bullet per factor, stating the measured value and the literal
/// percentage adjustment, then a summary with the final amount. Identical
/// inputs always produce identical text.
pub fn feeding_reasoning(
    pond_name: &str,
    area: f64,
    species: &str,
    reading: &Reading,
    recommended: f64,
    hours_since_last_feeding: Option<f64>,
) -> String {
    let mut reasoning = format!(
        "基于{pond_name}（面积：{area}亩，品种：{species}）的当前水质条件分析：\n\n"
    );

    if reading.dissolved_oxygen < 4.0 {
        reasoning += &format!(
            "• 溶解氧偏低（{}mg/L），鱼类代谢减慢，建议减少投喂量30%\n",
            reading.dissolved_oxygen
        );
    } else if reading.dissolved_oxygen > 7.0 {
        reasoning += &format!(
            "• 溶解氧充足（{}mg/L），鱼类代谢活跃，可适当增加投喂量20%\n",
            reading.dissolved_oxygen
        );
    } else {
        reasoning += &format!(
            "• 溶解氧适宜（{}mg/L），鱼类代谢正常\n",
            reading.dissolved_oxygen
        );
    }

    if reading.temperature < 20.0 {
        reasoning += &format!(
            "• 水温偏低（{}℃），鱼类食欲下降，建议减少投喂量20%\n",
            reading.temperature
        );
    } else if reading.temperature > 28.0 {
        reasoning += &format!(
            "• 水温偏高（{}℃），鱼类应激增加，建议减少投喂量10%\n",
            reading.temperature
        );
    } else {
        reasoning += &format!("• 水温适宜（{}℃），鱼类食欲正常\n", reading.temperature);
    }

    if reading.ph < 7.0 || reading.ph > 8.5 {
        reasoning += &format!(
            "• pH值不适宜（{}），鱼类消化受影响，建议减少投喂量10%\n",
            reading.ph
        );
    } else {
        reasoning += &format!("• pH值适宜（{}），鱼类消化正常\n", reading.ph);
    }

    if reading.ammonia > 0.4 {
        reasoning += &format!(
            "• 氨氮偏高（{}mg/L），水质较差，建议减少投喂量20%\n",
            reading.ammonia
        );
    } else {
        reasoning += &format!("• 氨氮正常（{}mg/L），水质良好\n", reading.ammonia);
    }

    match hours_since_last_feeding {
        Some(h) if h < 6.0 => {
            reasoning += &format!(
                "• 距离上次投喂仅{h:.1}小时，塘内仍有残饵，建议大幅减少投喂量\n"
            );
        }
        Some(h) if h > 24.0 => {
            reasoning += &format!(
                "• 距离上次投喂已超过{h:.1}小时，鱼类可能饥饿，可适当增加投喂量\n"
            );
        }
        Some(h) => {
            reasoning += &format!("• 距离上次投喂{h:.1}小时，投喂间隔适宜\n");
        }
        None => {
            reasoning += "• 无最近投喂记录，按照标准投喂量计算\n";
        }
    }

    reasoning += &format!("\n综合以上因素，推荐投喂量为{recommended}kg。");

    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comfortable_reading() -> Reading {
        Reading {
            temperature: 25.0,
            dissolved_oxygen: 6.5,
            ph: 7.5,
            ammonia: 0.2,
        }
    }

    #[test]
    fn all_neutral_factors_give_base_amount() {
        // area 5.2 -> base 10.4, every factor 1.0, no prior feeding.
        let amount = recommended_amount(5.2, &comfortable_reading(), None);
        assert_eq!(amount, 10.4);
    }

    #[test]
    fn low_oxygen_cuts_thirty_percent() {
        let reading = Reading {
            dissolved_oxygen: 3.5,
            ..comfortable_reading()
        };
        let amount = recommended_amount(5.0, &reading, None);
        assert_eq!(amount, 7.0); // 10.0 * 0.7
    }

    #[test]
    fn recent_feeding_halves_the_amount() {
        let amount = recommended_amount(5.2, &comfortable_reading(), Some(3.0));
        assert_eq!(amount, 5.2); // 10.4 * 0.5
    }

    #[test]
    fn long_gap_raises_the_amount() {
        let amount = recommended_amount(5.0, &comfortable_reading(), Some(30.0));
        assert_eq!(amount, 12.0); // 10.0 * 1.2
    }

    #[test]
    fn never_below_half_a_kilogram() {
        let bad = Reading {
            temperature: 15.0,
            dissolved_oxygen: 3.0,
            ph: 9.0,
            ammonia: 0.8,
        };
        let amount = recommended_amount(0.1, &bad, Some(2.0));
        assert_eq!(amount, 0.5);
    }

    #[test]
    fn stays_inside_clamp_band_across_conditions() {
        let readings = [
            comfortable_reading(),
            Reading { temperature: 15.0, dissolved_oxygen: 3.0, ph: 9.0, ammonia: 0.8 },
            Reading { temperature: 33.0, dissolved_oxygen: 7.5, ph: 6.8, ammonia: 0.1 },
        ];
        for area in [0.1, 0.5, 5.2, 50.0] {
            for reading in &readings {
                for hours in [None, Some(1.0), Some(12.0), Some(48.0)] {
                    let amount = recommended_amount(area, reading, hours);
                    assert!(amount >= 0.5, "area {area}: {amount} below floor");
                    assert!(amount <= area * 5.0 + 0.05, "area {area}: {amount} above cap");
                }
            }
        }
    }

    #[test]
    fn engine_is_pure() {
        let reading = comfortable_reading();
        let a = recommended_amount(4.5, &reading, Some(12.0));
        let b = recommended_amount(4.5, &reading, Some(12.0));
        assert_eq!(a, b);
    }

    #[test]
    fn reasoning_mentions_missing_record_instead_of_a_time_factor() {
        let text = feeding_reasoning("1号塘", 5.2, "南美白对虾", &comfortable_reading(), 10.4, None);
        assert!(text.contains("无最近投喂记录"));
        assert!(text.contains("推荐投喂量为10.4kg"));
    }

    #[test]
    fn reasoning_is_stable_for_identical_inputs() {
        let reading = Reading {
            temperature: 19.0,
            dissolved_oxygen: 3.8,
            ph: 8.7,
            ammonia: 0.45,
        };
        let a = feeding_reasoning("2号塘", 3.8, "草鱼", &reading, 4.4, Some(30.0));
        let b = feeding_reasoning("2号塘", 3.8, "草鱼", &reading, 4.4, Some(30.0));
        assert_eq!(a, b);
        // Every factor bullet carries its literal percentage.
        assert!(a.contains("30%"));
        assert!(a.contains("20%"));
        assert!(a.contains("10%"));
    }
}

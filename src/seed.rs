//! First-run demo data.
//!
//! Populates one demo user, three ponds, a month of telemetry and feeding
//! history, and a handful of persisted alerts. Skipped entirely once any
//! user row exists, so restarts do not duplicate data.

use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::alert_rules::{sample_alert, AlertKind};
use crate::entities::{alert, feeding_record, pond, user, water_quality};
use crate::synthetic::{self, Baseline, SpeciesProfile, STANDARD};

const SEED_DAYS: i64 = 30;

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if user::Entity::find().count(db).await? > 0 {
        tracing::debug!("demo data already present, skipping seed");
        return Ok(());
    }

    let now = Utc::now().naive_utc();
    tracing::info!("seeding demo data");

    let demo_user = user::ActiveModel {
        username: Set("张渔农".to_string()),
        phone: Set(Some("13800138000".to_string())),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let pond_specs = [
        ("1号塘", 5.2, "南美白对虾"),
        ("2号塘", 3.8, "草鱼"),
        ("3号塘", 4.5, "南美白对虾"),
    ];

    let mut ponds = Vec::new();
    for (name, area, species) in pond_specs {
        let p = pond::ActiveModel {
            name: Set(name.to_string()),
            area: Set(area),
            species: Set(species.to_string()),
            user_id: Set(demo_user.id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        ponds.push(p);
    }

    for p in &ponds {
        seed_water_quality(db, p, now).await?;
        seed_feeding_records(db, p, now).await?;
    }
    seed_alerts(db, &ponds, now).await?;

    tracing::info!(ponds = ponds.len(), days = SEED_DAYS, "demo data seeded");
    Ok(())
}

/// One sample per hour over the seed window, written oldest first.
async fn seed_water_quality(
    db: &DatabaseConnection,
    p: &pond::Model,
    now: chrono::NaiveDateTime,
) -> Result<(), DbErr> {
    let profile = SpeciesProfile::for_species(&p.species);
    let mut samples =
        synthetic::recent_hours(Baseline::Species(profile), &STANDARD, now, SEED_DAYS * 24);
    samples.reverse();

    let rows: Vec<water_quality::ActiveModel> = samples
        .into_iter()
        .map(|s| water_quality::ActiveModel {
            pond_id: Set(p.id),
            timestamp: Set(s.timestamp),
            temperature: Set(s.temperature),
            dissolved_oxygen: Set(s.dissolved_oxygen),
            ph: Set(s.ph),
            ammonia: Set(s.ammonia),
            turbidity: Set(Some(s.turbidity)),
            conductivity: Set(Some(s.conductivity)),
            water_level: Set(Some(s.water_level)),
            cod: Set(Some(s.cod)),
            heavy_metals: Set(Some(s.heavy_metals)),
            residual_chlorine: Set(Some(s.residual_chlorine)),
            total_phosphorus: Set(Some(s.total_phosphorus)),
            total_nitrogen: Set(Some(s.total_nitrogen)),
            coliform: Set(Some(s.coliform)),
            algae: Set(Some(s.algae)),
            biotoxicity: Set(Some(s.biotoxicity)),
            ..Default::default()
        })
        .collect();

    // Keeps each statement well under the bind-parameter limit.
    for chunk in rows.chunks(200) {
        water_quality::Entity::insert_many(chunk.to_vec()).exec(db).await?;
    }
    Ok(())
}

async fn seed_feeding_records(
    db: &DatabaseConnection,
    p: &pond::Model,
    now: chrono::NaiveDateTime,
) -> Result<(), DbErr> {
    let profile = SpeciesProfile::for_species(&p.species);
    let mut rows = Vec::new();
    for i in 1..=SEED_DAYS {
        let day = now - chrono::Duration::days(i);
        for feeding in synthetic::daily_feedings(profile, p.area, day) {
            rows.push(feeding_record::ActiveModel {
                pond_id: Set(p.id),
                amount: Set(feeding.amount),
                time: Set(feeding.time),
                notes: Set(Some(feeding.notes.to_string())),
                ..Default::default()
            });
        }
    }
    feeding_record::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// A few persisted alerts per pond at staggered ages; the recent ones stay
/// active, the older ones are already resolved.
async fn seed_alerts(
    db: &DatabaseConnection,
    ponds: &[pond::Model],
    now: chrono::NaiveDateTime,
) -> Result<(), DbErr> {
    let mut rng = rand::thread_rng();
    let kinds = [
        AlertKind::DissolvedOxygen,
        AlertKind::Ammonia,
        AlertKind::Ph,
        AlertKind::Temperature,
        AlertKind::Cod,
    ];
    let hours_ago = [2_i64, 6, 12, 18, 24];

    let mut rows = Vec::new();
    for p in ponds {
        for (kind, hours) in kinds.iter().zip(hours_ago) {
            // Skip some entries so ponds do not all look identical.
            if rng.gen_bool(0.3) {
                continue;
            }
            let content = sample_alert(*kind, &p.name, &mut rng);
            rows.push(alert::ActiveModel {
                pond_id: Set(p.id),
                level: Set(content.level.to_string()),
                title: Set(content.title.to_string()),
                message: Set(content.message),
                timestamp: Set(now - chrono::Duration::hours(hours)),
                status: Set(if hours < 12 { "active" } else { "resolved" }.to_string()),
                ..Default::default()
            });
        }
    }
    if !rows.is_empty() {
        alert::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

//! Per-session cache of generated active alerts.
//!
//! Repeated reads within one session see the same list until it is
//! refreshed or mutated. Every operation runs its whole read-modify-write
//! sequence under the store lock, so concurrent requests from the same
//! session serialize instead of clobbering each other.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::alert_rules::{sample_alert, AlertKind};
use crate::entities::pond;

/// Chance that any given pond contributes an alert when a session list is
/// generated. At least one alert is always forced across all ponds.
const POND_ALERT_PROBABILITY: f64 = 0.8;

#[derive(Clone, Debug, Serialize)]
pub struct ActiveAlert {
    pub id: u32,
    pub pond_id: i32,
    pub pond_name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub message: String,
    pub level: &'static str,
    pub status: String,
    pub timestamp: String,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Default)]
struct SessionAlerts {
    alerts: Vec<ActiveAlert>,
    seen_ids: HashSet<u32>,
}

/// Session-id keyed alert state. One store instance is shared across the
/// whole server; sessions are independent entries.
#[derive(Default)]
pub struct AlertSessionStore {
    sessions: Mutex<HashMap<Uuid, SessionAlerts>>,
}

impl AlertSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session's cached alert list, generating one on first
    /// access.
    pub fn active_alerts(&self, session: Uuid, ponds: &[pond::Model]) -> Vec<ActiveAlert> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session).or_default();
        if entry.alerts.is_empty() {
            entry.alerts = generate_alerts(ponds);
            tracing::debug!(session = %session, count = entry.alerts.len(), "generated session alerts");
        }
        entry.alerts.clone()
    }

    /// Discards the cached list and regenerates it.
    pub fn refresh(&self, session: Uuid, ponds: &[pond::Model]) -> Vec<ActiveAlert> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session).or_default();
        entry.alerts = generate_alerts(ponds);
        entry.alerts.clone()
    }

    /// Marks one alert resolved. Returns false when the id is not in the
    /// session's list; the rest of the list is untouched either way.
    pub fn resolve(&self, session: Uuid, alert_id: u32, ponds: &[pond::Model]) -> bool {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session).or_default();
        if entry.alerts.is_empty() {
            entry.alerts = generate_alerts(ponds);
        }
        match entry.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                alert.status = "resolved".to_string();
                true
            }
            None => {
                tracing::warn!(session = %session, alert_id, "resolve: alert not in session cache");
                false
            }
        }
    }

    /// Marks every cached alert resolved.
    pub fn resolve_all(&self, session: Uuid, ponds: &[pond::Model]) {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session).or_default();
        if entry.alerts.is_empty() {
            entry.alerts = generate_alerts(ponds);
        }
        for alert in &mut entry.alerts {
            alert.status = "resolved".to_string();
        }
    }

    /// Diffs the current alert ids against the ids this session has
    /// already seen, returns the unseen alerts, and replaces the seen set.
    pub fn check_new(&self, session: Uuid, ponds: &[pond::Model]) -> Vec<ActiveAlert> {
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(session).or_default();
        if entry.alerts.is_empty() {
            entry.alerts = generate_alerts(ponds);
        }

        let new_alerts: Vec<ActiveAlert> = entry
            .alerts
            .iter()
            .filter(|a| !entry.seen_ids.contains(&a.id))
            .cloned()
            .collect();
        entry.seen_ids = entry.alerts.iter().map(|a| a.id).collect();
        new_alerts
    }
}

fn generate_alerts(ponds: &[pond::Model]) -> Vec<ActiveAlert> {
    let mut rng = rand::thread_rng();
    let mut alerts = Vec::new();
    let mut has_generated = false;

    for pond in ponds {
        // Random per pond, but never an entirely empty list.
        let should_generate = rng.gen_bool(POND_ALERT_PROBABILITY) || !has_generated;
        if !should_generate {
            continue;
        }
        has_generated = true;

        let kind = *AlertKind::ALL
            .choose(&mut rng)
            .expect("alert kind table is non-empty");
        let content = sample_alert(kind, &pond.name, &mut rng);
        let timestamp = Utc::now().naive_utc() - chrono::Duration::minutes(rng.gen_range(5..60));

        alerts.push(ActiveAlert {
            id: rng.gen_range(1000..10000),
            pond_id: pond.id,
            pond_name: pond.name.clone(),
            kind: kind.key(),
            title: content.title,
            message: content.message,
            level: content.level,
            status: "active".to_string(),
            timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            value: rng.gen_range(2.0..8.0),
            threshold: rng.gen_range(3.0..5.0),
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ponds(n: i32) -> Vec<pond::Model> {
        (1..=n)
            .map(|i| pond::Model {
                id: i,
                name: format!("{i}号塘"),
                area: 4.0 + i as f64,
                species: if i % 2 == 0 { "草鱼" } else { "南美白对虾" }.to_string(),
                user_id: 1,
                created_at: Utc::now().naive_utc(),
            })
            .collect()
    }

    #[test]
    fn repeated_reads_return_the_same_list() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        let first = store.active_alerts(session, &ponds);
        let second = store.active_alerts(session, &ponds);
        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
        let first_ids: Vec<u32> = first.iter().map(|a| a.id).collect();
        let second_ids: Vec<u32> = second.iter().map(|a| a.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn at_least_one_alert_even_with_one_pond() {
        let store = AlertSessionStore::new();
        let ponds = ponds(1);
        for _ in 0..20 {
            let alerts = store.active_alerts(Uuid::new_v4(), &ponds);
            assert!(!alerts.is_empty());
        }
    }

    #[test]
    fn resolve_unknown_id_leaves_other_entries_alone() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        let before = store.active_alerts(session, &ponds);
        // Ids are drawn from 1000..10000, so 0 is never present.
        assert!(!store.resolve(session, 0, &ponds));
        let after = store.active_alerts(session, &ponds);
        assert_eq!(before.len(), after.len());
        assert!(after.iter().all(|a| a.status == "active"));
    }

    #[test]
    fn resolve_marks_only_the_matching_alert() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        let alerts = store.active_alerts(session, &ponds);
        let target = alerts[0].id;
        assert!(store.resolve(session, target, &ponds));

        let after = store.active_alerts(session, &ponds);
        for alert in after {
            if alert.id == target {
                assert_eq!(alert.status, "resolved");
            } else {
                assert_eq!(alert.status, "active");
            }
        }
    }

    #[test]
    fn resolve_all_resolves_everything() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        store.active_alerts(session, &ponds);
        store.resolve_all(session, &ponds);
        let after = store.active_alerts(session, &ponds);
        assert!(after.iter().all(|a| a.status == "resolved"));
    }

    #[test]
    fn check_new_is_empty_on_the_second_call() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        let first = store.check_new(session, &ponds);
        assert!(!first.is_empty());
        let second = store.check_new(session, &ponds);
        assert!(second.is_empty());
    }

    #[test]
    fn refresh_replaces_the_cached_list() {
        let store = AlertSessionStore::new();
        let session = Uuid::new_v4();
        let ponds = ponds(3);

        store.active_alerts(session, &ponds);
        store.resolve_all(session, &ponds);
        let refreshed = store.refresh(session, &ponds);
        assert!(refreshed.iter().all(|a| a.status == "active"));
    }

    #[test]
    fn sessions_are_independent() {
        let store = AlertSessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ponds = ponds(3);

        store.active_alerts(a, &ponds);
        store.resolve_all(a, &ponds);
        let b_alerts = store.active_alerts(b, &ponds);
        assert!(b_alerts.iter().all(|alert| alert.status == "active"));
    }
}

use chrono::{Duration, NaiveDate, Utc};

use crate::errors::MockResult;
use crate::models::{
    ActivityEntry, Agreement, AgreementStatus, DashboardStats, StatusCount, TypeCount,
};
use crate::store::SharedStore;

/// Active agreements ending within this many days count as expiring soon.
pub const EXPIRY_WINDOW_DAYS: i64 = 90;
const RECENT_ACTIVITY_LIMIT: usize = 5;

pub struct DashboardService {
    store: SharedStore,
}

impl DashboardService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn dashboard_stats(&self) -> MockResult<DashboardStats> {
        let store = self.store.read().await;
        Ok(compute_stats(&store.agreements, Utc::now().date_naive()))
    }
}

pub fn compute_stats(agreements: &[Agreement], today: NaiveDate) -> DashboardStats {
    let count = |status: AgreementStatus| {
        agreements.iter().filter(|a| a.status == status).count() as i32
    };
    let horizon = today + Duration::days(EXPIRY_WINDOW_DAYS);

    let expiring_soon = agreements
        .iter()
        .filter(|a| a.status == AgreementStatus::Active)
        .filter(|a| a.end_date.is_some_and(|end| end >= today && end <= horizon))
        .count() as i32;

    let agreements_by_status = AgreementStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: count(status),
        })
        .collect();

    let mut agreements_by_type: Vec<TypeCount> = Vec::new();
    for agreement in agreements {
        match agreements_by_type
            .iter_mut()
            .find(|t| t.agreement_type == agreement.agreement_type)
        {
            Some(entry) => entry.count += 1,
            None => agreements_by_type.push(TypeCount {
                agreement_type: agreement.agreement_type.clone(),
                count: 1,
            }),
        }
    }

    let mut recent: Vec<&Agreement> = agreements.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_activity = recent
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(activity_for)
        .collect();

    DashboardStats {
        total_agreements: agreements.len() as i32,
        active_agreements: count(AgreementStatus::Active),
        pending_approvals: count(AgreementStatus::PendingApproval),
        draft_agreements: count(AgreementStatus::Draft),
        expired_agreements: count(AgreementStatus::Expired),
        terminated_agreements: count(AgreementStatus::Terminated),
        pending_approval_agreements: count(AgreementStatus::PendingApproval),
        expiring_soon,
        total_value: agreements.iter().map(|a| a.total_amount).sum(),
        agreements_by_status,
        agreements_by_type,
        recent_activity,
    }
}

fn activity_for(agreement: &Agreement) -> ActivityEntry {
    let (activity_type, verb) = if agreement.updated_at == agreement.created_at {
        ("AGREEMENT_CREATED", "created")
    } else {
        ("AGREEMENT_UPDATED", "updated")
    };

    ActivityEntry {
        id: format!("ACT-{}", agreement.id),
        activity_type: activity_type.to_string(),
        message: format!(
            "Agreement {} {} for {}",
            agreement.agreement_number, verb, agreement.client_name
        ),
        timestamp: agreement.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_follow_seed_statuses() {
        let store = MockStore::seeded().unwrap();
        let stats = compute_stats(&store.agreements, day(2025, 1, 1));

        assert_eq!(stats.total_agreements, 12);
        assert_eq!(stats.active_agreements, 4);
        assert_eq!(stats.pending_approvals, 3);
        assert_eq!(stats.pending_approval_agreements, 3);
        assert_eq!(stats.draft_agreements, 2);
        assert_eq!(stats.expired_agreements, 1);
        assert_eq!(stats.terminated_agreements, 1);
        assert_eq!(stats.total_value, 36500.0);

        let by_status: i32 = stats.agreements_by_status.iter().map(|s| s.count).sum();
        assert_eq!(by_status, 12);
        let by_type: i32 = stats.agreements_by_type.iter().map(|t| t.count).sum();
        assert_eq!(by_type, 12);
        assert_eq!(stats.agreements_by_type[0].agreement_type, "Investment Management");
        assert_eq!(stats.agreements_by_type[0].count, 5);
    }

    #[test]
    fn expiring_soon_uses_window_from_today() {
        let store = MockStore::seeded().unwrap();

        // AGR008 ends 2026-05-31
        let stats = compute_stats(&store.agreements, day(2026, 4, 1));
        assert_eq!(stats.expiring_soon, 1);

        let stats = compute_stats(&store.agreements, day(2025, 1, 1));
        assert_eq!(stats.expiring_soon, 0);

        let stats = compute_stats(&store.agreements, day(2026, 6, 1));
        assert_eq!(stats.expiring_soon, 0);
    }

    #[test]
    fn recent_activity_lists_latest_updates() {
        let store = MockStore::seeded().unwrap();
        let stats = compute_stats(&store.agreements, day(2025, 1, 1));

        assert_eq!(stats.recent_activity.len(), 5);
        assert_eq!(stats.recent_activity[0].id, "ACT-AGR012");
        assert_eq!(stats.recent_activity[0].activity_type, "AGREEMENT_UPDATED");
        assert_eq!(stats.recent_activity[1].id, "ACT-AGR011");
        assert_eq!(stats.recent_activity[1].activity_type, "AGREEMENT_CREATED");
        assert!(stats
            .recent_activity
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_stats_from_shared_store() {
        let service = DashboardService::new(MockStore::seeded().unwrap().into_shared());
        let stats = service.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_agreements, 12);
    }
}

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AgreementStatus;

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: AgreementStatus,
    pub count: i32,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    pub agreement_type: String,
    pub count: i32,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    pub activity_type: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregates shown on the dashboard, derived from the current agreements.
#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_agreements: i32,
    pub active_agreements: i32,
    pub pending_approvals: i32,
    pub draft_agreements: i32,
    pub expired_agreements: i32,
    pub terminated_agreements: i32,
    pub pending_approval_agreements: i32,
    pub expiring_soon: i32,
    pub total_value: f64,
    pub agreements_by_status: Vec<StatusCount>,
    pub agreements_by_type: Vec<TypeCount>,
    pub recent_activity: Vec<ActivityEntry>,
}

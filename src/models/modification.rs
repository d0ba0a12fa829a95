use async_graphql::{ComplexObject, Context, Enum, Result, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::graphql::context::GraphQLContext;
use crate::models::Agreement;

#[derive(
    Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ModificationRequestType {
    Update,
    Termination,
    Suspension,
    Reactivation,
}

#[derive(
    Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ModificationRequestStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// One field-level edit proposed against an agreement
#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub description: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct ModificationRequest {
    pub id: String,
    pub agreement_id: String,
    pub request_type: ModificationRequestType,
    pub status: ModificationRequestStatus,
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub changes: Vec<ModificationChange>,
    pub comments: Option<String>,
}

#[ComplexObject]
impl ModificationRequest {
    /// The agreement this request targets, as it currently stands
    async fn agreement(&self, ctx: &Context<'_>) -> Result<Option<Agreement>> {
        let context = ctx.data::<GraphQLContext>()?;
        let store = context.store.read().await;

        Ok(store.find_agreement(&self.agreement_id).cloned())
    }
}

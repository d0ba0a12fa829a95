use std::cmp::Ordering;

use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::errors::{MockError, MockResult};

/// Lifecycle state of an agreement
#[derive(
    Enum, Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    Draft,
    PendingApproval,
    Active,
    Suspended,
    Terminated,
    Expired,
}

impl AgreementStatus {
    pub const ALL: [AgreementStatus; 6] = [
        AgreementStatus::Draft,
        AgreementStatus::PendingApproval,
        AgreementStatus::Active,
        AgreementStatus::Suspended,
        AgreementStatus::Terminated,
        AgreementStatus::Expired,
    ];
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementProduct {
    pub id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub description: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementTerm {
    pub id: String,
    pub term_type: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementDocument {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
    pub document_url: String,
}

/// A client agreement together with the values captured by the creation wizard.
#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: String,
    pub agreement_number: String,
    pub client_id: String,
    pub client_name: String,
    pub agreement_type: String,
    pub status: AgreementStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub advisor_name: Option<String>,
    #[serde(default)]
    pub products: Vec<AgreementProduct>,
    #[serde(default)]
    pub terms: Vec<AgreementTerm>,
    #[serde(default)]
    pub documents: Vec<AgreementDocument>,
    #[serde(default)]
    pub selected_accounts: Vec<String>,
    pub selected_policy_id: Option<String>,
    #[serde(default)]
    pub selected_household_members: Vec<String>,
    pub billing_frequency: Option<String>,
    pub billing_start_date: Option<NaiveDate>,
    pub billing_account: Option<String>,
    pub program_type: Option<String>,
    pub fee_type: Option<String>,
    pub current_fee_account: Option<String>,
    pub client_billable_assets: Option<f64>,
    pub total_household_billable_assets: Option<f64>,
    pub program_fee_type: Option<String>,
    pub fee_schedule: Option<String>,
    pub integration_period: Option<String>,
    pub purpose_of_agreement: Option<String>,
    pub client_root: Option<String>,
    pub ia_code: Option<String>,
    pub fee_group: Option<String>,
}

/// A comparable view of one agreement field, used for caller-driven sorting.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.partial_cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.partial_cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Agreement {
    /// Value of the named (camelCase) field for sorting, `None` when the
    /// field is unknown or unset on this record.
    pub fn sort_value(&self, field: &str) -> Option<SortValue> {
        let text = |v: &str| Some(SortValue::Text(v.to_string()));
        let opt_text = |v: &Option<String>| v.as_deref().map(|s| SortValue::Text(s.to_string()));

        match field {
            "id" => text(&self.id),
            "agreementNumber" => text(&self.agreement_number),
            "clientId" => text(&self.client_id),
            "clientName" => text(&self.client_name),
            "agreementType" => text(&self.agreement_type),
            "status" => text(&self.status.to_string()),
            "currency" => text(&self.currency),
            "createdBy" => text(&self.created_by),
            "description" => opt_text(&self.description),
            "modifiedBy" => opt_text(&self.modified_by),
            "advisorName" => opt_text(&self.advisor_name),
            "programType" => opt_text(&self.program_type),
            "startDate" => Some(SortValue::Date(self.start_date)),
            "endDate" => self.end_date.map(SortValue::Date),
            "totalAmount" => Some(SortValue::Number(self.total_amount)),
            "clientBillableAssets" => self.client_billable_assets.map(SortValue::Number),
            "createdAt" => Some(SortValue::Timestamp(self.created_at)),
            "updatedAt" => Some(SortValue::Timestamp(self.updated_at)),
            _ => None,
        }
    }

    /// Overwrites one field from its textual representation, as carried by a
    /// modification request change.
    pub fn apply_change(&mut self, field: &str, new_value: &str) -> MockResult<()> {
        let invalid = |reason: String| {
            MockError::InvalidRequest(format!("cannot apply change to '{}': {}", field, reason))
        };
        let optional = |v: &str| {
            if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            }
        };
        let date = |v: &str| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))
        };
        let number = |v: &str| v.trim().parse::<f64>().map_err(|e| invalid(e.to_string()));

        match field {
            "status" => {
                self.status = new_value
                    .parse::<AgreementStatus>()
                    .map_err(|_| invalid(format!("unknown status '{}'", new_value)))?;
            }
            "agreementType" => self.agreement_type = new_value.to_string(),
            "startDate" => self.start_date = date(new_value)?,
            "endDate" => {
                self.end_date = if new_value.is_empty() {
                    None
                } else {
                    Some(date(new_value)?)
                };
            }
            "totalAmount" => self.total_amount = number(new_value)?,
            "currency" => self.currency = new_value.to_string(),
            "description" => self.description = optional(new_value),
            "comments" => self.comments = optional(new_value),
            "advisorName" => self.advisor_name = optional(new_value),
            "selectedPolicyId" => self.selected_policy_id = optional(new_value),
            "selectedAccounts" => self.selected_accounts = string_list(new_value),
            "selectedHouseholdMembers" => {
                self.selected_household_members = string_list(new_value)
            }
            "billingFrequency" => self.billing_frequency = optional(new_value),
            "billingStartDate" => {
                self.billing_start_date = if new_value.is_empty() {
                    None
                } else {
                    Some(date(new_value)?)
                };
            }
            "billingAccount" => self.billing_account = optional(new_value),
            "programType" => self.program_type = optional(new_value),
            "feeType" => self.fee_type = optional(new_value),
            "currentFeeAccount" => self.current_fee_account = optional(new_value),
            "clientBillableAssets" => self.client_billable_assets = Some(number(new_value)?),
            "totalHouseholdBillableAssets" => {
                self.total_household_billable_assets = Some(number(new_value)?)
            }
            "programFeeType" => self.program_fee_type = optional(new_value),
            "feeSchedule" => self.fee_schedule = optional(new_value),
            "integrationPeriod" => self.integration_period = optional(new_value),
            "purposeOfAgreement" => self.purpose_of_agreement = optional(new_value),
            "feeGroup" => self.fee_group = optional(new_value),
            "products" => {
                self.products =
                    serde_json::from_str(new_value).map_err(|e| invalid(e.to_string()))?;
            }
            "terms" => {
                self.terms = serde_json::from_str(new_value).map_err(|e| invalid(e.to_string()))?;
            }
            _ => return Err(invalid("field is not modifiable".to_string())),
        }

        Ok(())
    }
}

/// Accepts either a JSON array of strings or a comma separated list.
fn string_list(value: &str) -> Vec<String> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(value) {
        return items;
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Agreement {
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        Agreement {
            id: "AGR001".to_string(),
            agreement_number: "WM-2024-001".to_string(),
            client_id: "CLI001".to_string(),
            client_name: "Jane Doe".to_string(),
            agreement_type: "Investment Management".to_string(),
            status: AgreementStatus::Draft,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: None,
            total_amount: 1000.0,
            currency: "CAD".to_string(),
            description: None,
            comments: None,
            created_at: created,
            updated_at: created,
            created_by: "someone@mywealth.com".to_string(),
            modified_by: None,
            advisor_name: None,
            products: vec![],
            terms: vec![],
            documents: vec![],
            selected_accounts: vec![],
            selected_policy_id: None,
            selected_household_members: vec![],
            billing_frequency: None,
            billing_start_date: None,
            billing_account: None,
            program_type: None,
            fee_type: None,
            current_fee_account: None,
            client_billable_assets: None,
            total_household_billable_assets: None,
            program_fee_type: None,
            fee_schedule: None,
            integration_period: None,
            purpose_of_agreement: None,
            client_root: None,
            ia_code: None,
            fee_group: None,
        }
    }

    #[test]
    fn status_round_trips_through_wire_name() {
        assert_eq!(AgreementStatus::PendingApproval.to_string(), "PENDING_APPROVAL");
        assert_eq!(
            "PENDING_APPROVAL".parse::<AgreementStatus>().unwrap(),
            AgreementStatus::PendingApproval
        );
    }

    #[test]
    fn apply_change_updates_typed_fields() {
        let mut agreement = sample();
        agreement.apply_change("status", "ACTIVE").unwrap();
        agreement.apply_change("totalAmount", "2500.50").unwrap();
        agreement.apply_change("endDate", "2025-01-31").unwrap();
        agreement
            .apply_change("selectedAccounts", r#"["ACC001","ACC002"]"#)
            .unwrap();

        assert_eq!(agreement.status, AgreementStatus::Active);
        assert_eq!(agreement.total_amount, 2500.50);
        assert_eq!(agreement.end_date, NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(agreement.selected_accounts, vec!["ACC001", "ACC002"]);
    }

    #[test]
    fn apply_change_rejects_unknown_fields_and_bad_values() {
        let mut agreement = sample();
        assert!(agreement.apply_change("id", "AGR999").is_err());
        assert!(agreement.apply_change("status", "BOGUS").is_err());
        assert!(agreement.apply_change("totalAmount", "lots").is_err());
        assert_eq!(agreement, sample());
    }

    #[test]
    fn sort_values_compare_within_a_type() {
        let agreement = sample();
        let amount = agreement.sort_value("totalAmount").unwrap();
        assert!(amount < SortValue::Number(2000.0));
        assert!(agreement.sort_value("endDate").is_none());
        assert!(agreement.sort_value("notAField").is_none());
    }
}

//! Arguments accepted by the resolvers.

use async_graphql::{Enum, InputObject};
use chrono::NaiveDate;

use crate::models::{AgreementStatus, ModificationRequestStatus, ModificationRequestType};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(rename_items = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct AgreementFiltersInput {
    pub status: Option<Vec<AgreementStatus>>,
    pub agreement_type: Option<Vec<String>>,
    pub client_name: Option<String>,
    /// Inclusive lower bound on `startDate`
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `startDate`
    pub date_to: Option<NaiveDate>,
    /// Matches agreement number, client name or description
    pub search_term: Option<String>,
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct PaginationInput {
    pub page: Option<i32>,
    pub page_size: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl PaginationInput {
    pub fn new(page: i32, page_size: i32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct ModificationRequestFiltersInput {
    pub status: Option<Vec<ModificationRequestStatus>>,
}

#[derive(InputObject, Clone, Debug)]
pub struct AgreementProductInput {
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub description: Option<String>,
}

#[derive(InputObject, Clone, Debug)]
pub struct AgreementTermInput {
    pub term_type: String,
    pub value: String,
    pub description: Option<String>,
}

/// Everything the creation wizard collects. Only the basic information step
/// is mandatory.
#[derive(InputObject, Clone, Debug)]
pub struct CreateAgreementInput {
    pub client_id: String,
    pub agreement_type: String,
    /// `DRAFT` saves a draft; anything else submits for approval
    pub status: Option<AgreementStatus>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub selected_accounts: Option<Vec<String>>,
    pub selected_policy_id: Option<String>,
    pub selected_household_members: Option<Vec<String>>,
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
    pub products: Option<Vec<AgreementProductInput>>,
    pub terms: Option<Vec<AgreementTermInput>>,
    pub comments: Option<String>,
}

impl CreateAgreementInput {
    pub fn new(
        client_id: impl Into<String>,
        agreement_type: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            agreement_type: agreement_type.into(),
            status: None,
            start_date,
            end_date: None,
            selected_accounts: None,
            selected_policy_id: None,
            selected_household_members: None,
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
            products: None,
            terms: None,
            comments: None,
        }
    }
}

/// Fields left out are kept as they are.
#[derive(InputObject, Clone, Debug, Default)]
pub struct UpdateAgreementInput {
    pub agreement_type: Option<String>,
    pub status: Option<AgreementStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub comments: Option<String>,
    pub advisor_name: Option<String>,
    pub selected_accounts: Option<Vec<String>>,
    pub selected_policy_id: Option<String>,
    pub selected_household_members: Option<Vec<String>>,
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
    pub products: Option<Vec<AgreementProductInput>>,
    pub terms: Option<Vec<AgreementTermInput>>,
}

#[derive(InputObject, Clone, Debug)]
pub struct ModificationChangeInput {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub description: Option<String>,
}

#[derive(InputObject, Clone, Debug)]
pub struct CreateModificationRequestInput {
    pub agreement_id: String,
    pub request_type: ModificationRequestType,
    /// `DRAFT` keeps the request unsubmitted
    pub status: Option<ModificationRequestStatus>,
    pub changes: Vec<ModificationChangeInput>,
    pub comments: Option<String>,
}

/// Metadata of an uploaded file; the mock never receives file contents.
#[derive(InputObject, Clone, Debug)]
pub struct DocumentUploadInput {
    pub name: String,
    pub size: Option<i64>,
    pub file_type: Option<String>,
}

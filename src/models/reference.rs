//! Read-only lookup records used by the agreement wizard.

use async_graphql::{Enum, SimpleObject};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    Corporate,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub status: String,
    pub date_of_birth: Option<NaiveDate>,
    pub client_root: Option<String>,
    pub ia_code: Option<String>,
    pub residency: Option<String>,
    pub language: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub client_id: String,
    pub account_number: String,
    pub account_type: String,
    pub currency: String,
    pub balance: f64,
    pub is_eligible: bool,
    pub program_type: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMemberAccount {
    pub id: String,
    pub account_number: String,
    pub account_type: String,
    pub balance: f64,
    pub currency: String,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdMember {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub relation: String,
    pub total_value: f64,
    #[serde(default)]
    pub accounts: Vec<HouseholdMemberAccount>,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: f64,
    pub currency: String,
    pub is_active: bool,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocationPolicy {
    pub id: String,
    pub policy_number: String,
    pub fixed_income: f64,
    pub canadian_equity: f64,
    pub global_equity: f64,
    pub alternative: f64,
    pub code: String,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeeRate {
    pub tier: String,
    pub rate: f64,
}

#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFee {
    pub program_type: String,
    pub fee_type: String,
    pub fee_schedule: String,
    pub min_amount: f64,
    pub billable_assets: f64,
    pub integration_period: String,
    pub purpose: String,
    #[serde(default)]
    pub fee_rates: Vec<FeeRate>,
}

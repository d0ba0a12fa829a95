use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{
    Account, Agreement, AssetAllocationPolicy, Client, HouseholdMember, ModificationRequest,
    Product, ProgramFee,
};

static FIXTURES_YAML: &str = include_str!("../../resources/fixtures.yaml");

/// The bundled seed data, as parsed from `resources/fixtures.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub household_members: Vec<HouseholdMember>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub asset_allocation_policies: Vec<AssetAllocationPolicy>,
    #[serde(default)]
    pub program_fees: Vec<ProgramFee>,
    #[serde(default)]
    pub agreements: Vec<Agreement>,
    #[serde(default)]
    pub modification_requests: Vec<ModificationRequest>,
}

impl Fixtures {
    pub fn bundled() -> Result<Self> {
        Self::from_yaml(FIXTURES_YAML).context("bundled fixtures are malformed")
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let fixtures: Fixtures = serde_yaml::from_str(source)?;
        Ok(fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgreementStatus;

    #[test]
    fn bundled_fixtures_parse() {
        let fixtures = Fixtures::bundled().unwrap();
        assert_eq!(fixtures.agreements.len(), 12);
        assert_eq!(fixtures.modification_requests.len(), 3);
        assert!(!fixtures.clients.is_empty());
        assert!(!fixtures.program_fees.is_empty());
    }

    #[test]
    fn fixture_references_resolve() {
        let fixtures = Fixtures::bundled().unwrap();

        for agreement in &fixtures.agreements {
            assert!(
                fixtures.clients.iter().any(|c| c.id == agreement.client_id),
                "{} references unknown client {}",
                agreement.id,
                agreement.client_id
            );
        }
        for request in &fixtures.modification_requests {
            assert!(fixtures.agreements.iter().any(|a| a.id == request.agreement_id));
        }
    }

    #[test]
    fn fixtures_cover_pending_approvals() {
        let fixtures = Fixtures::bundled().unwrap();
        let pending = fixtures
            .agreements
            .iter()
            .filter(|a| a.status == AgreementStatus::PendingApproval)
            .count();
        assert_eq!(pending, 3);
    }

    #[test]
    fn partial_yaml_defaults_missing_collections() {
        let fixtures = Fixtures::from_yaml("clients: []\n").unwrap();
        assert!(fixtures.agreements.is_empty());
    }
}

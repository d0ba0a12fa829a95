use tracing::debug;

use crate::errors::{MockError, MockResult};
use crate::models::{
    Account, AssetAllocationPolicy, Client, HouseholdMember, Product, ProgramFee,
};
use crate::store::SharedStore;

pub const DEFAULT_CLIENT_LIMIT: usize = 50;

/// Lookups for the read-only reference data the wizard offers as choices.
pub struct ReferenceService {
    store: SharedStore,
}

impl ReferenceService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Clients whose name or email contains `search_term`, at most `limit`.
    pub async fn clients(
        &self,
        search_term: Option<&str>,
        limit: Option<usize>,
    ) -> MockResult<Vec<Client>> {
        let store = self.store.read().await;
        let term = search_term.map(str::to_lowercase).unwrap_or_default();

        Ok(store
            .clients
            .iter()
            .filter(|c| {
                term.is_empty()
                    || c.name.to_lowercase().contains(&term)
                    || c.email.to_lowercase().contains(&term)
            })
            .take(limit.unwrap_or(DEFAULT_CLIENT_LIMIT))
            .cloned()
            .collect())
    }

    pub async fn client(&self, id: &str) -> MockResult<Client> {
        let store = self.store.read().await;
        store
            .find_client(id)
            .cloned()
            .ok_or_else(|| MockError::not_found("Client", id))
    }

    pub async fn client_accounts(&self, client_id: &str) -> MockResult<Vec<Account>> {
        let store = self.store.read().await;
        let accounts: Vec<Account> = store
            .accounts
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect();

        debug!("Found {} accounts for client {}", accounts.len(), client_id);
        Ok(accounts)
    }

    pub async fn household_members(&self, client_id: &str) -> MockResult<Vec<HouseholdMember>> {
        let store = self.store.read().await;
        let members: Vec<HouseholdMember> = store
            .household_members
            .iter()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect();

        debug!(
            "Found {} household members for client {}",
            members.len(),
            client_id
        );
        Ok(members)
    }

    pub async fn products(
        &self,
        category: Option<&str>,
        is_active: Option<bool>,
    ) -> MockResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store
            .products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| is_active.map_or(true, |active| p.is_active == active))
            .cloned()
            .collect())
    }

    pub async fn asset_allocation_policies(&self) -> MockResult<Vec<AssetAllocationPolicy>> {
        Ok(self.store.read().await.asset_allocation_policies.clone())
    }

    /// Every program fee; the program type does not narrow the result.
    pub async fn program_fees(&self, program_type: Option<&str>) -> MockResult<Vec<ProgramFee>> {
        debug!("Fetching program fees for type {:?}", program_type);
        Ok(self.store.read().await.program_fees.clone())
    }
}

//! In-memory fixture store backing every resolver.
//!
//! A [`MockStore`] is owned explicitly: build one per process (or per test),
//! share it between requests as a [`SharedStore`], and call
//! [`MockStore::reset`] to get back to the seed data.

pub mod fixtures;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::models::{
    Account, Agreement, AssetAllocationPolicy, Client, HouseholdMember, ModificationRequest,
    Product, ProgramFee,
};
pub use fixtures::Fixtures;

/// Actor stamped on records created or edited through the mock.
pub const CURRENT_USER: &str = "current.user@mywealth.com";
pub const CURRENT_USER_NAME: &str = "Current User";
/// Actor stamped on approvals and rejections.
pub const APPROVER: &str = "manager@mywealth.com";

pub type SharedStore = Arc<RwLock<MockStore>>;

/// Counters for generated identifiers. They only move forward; a process
/// (or a store) sees each value once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequences {
    agreement: u32,
    modification_request: u32,
    product: u32,
    term: u32,
    document: u32,
}

impl Default for IdSequences {
    fn default() -> Self {
        Self {
            agreement: 13,
            modification_request: 4,
            product: 100,
            term: 100,
            document: 100,
        }
    }
}

fn bump(counter: &mut u32) -> u32 {
    let value = *counter;
    *counter += 1;
    value
}

impl IdSequences {
    pub fn next_agreement(&mut self) -> u32 {
        bump(&mut self.agreement)
    }

    pub fn next_modification_request(&mut self) -> u32 {
        bump(&mut self.modification_request)
    }

    pub fn next_product(&mut self) -> u32 {
        bump(&mut self.product)
    }

    pub fn next_term(&mut self) -> u32 {
        bump(&mut self.term)
    }

    pub fn next_document(&mut self) -> u32 {
        bump(&mut self.document)
    }
}

/// `AGR` + 13 -> `AGR013`
pub fn format_id(prefix: &str, value: u32) -> String {
    format!("{}{:03}", prefix, value)
}

#[derive(Debug, Clone)]
pub struct MockStore {
    pub clients: Vec<Client>,
    pub accounts: Vec<Account>,
    pub household_members: Vec<HouseholdMember>,
    pub products: Vec<Product>,
    pub asset_allocation_policies: Vec<AssetAllocationPolicy>,
    pub program_fees: Vec<ProgramFee>,
    pub agreements: Vec<Agreement>,
    pub modification_requests: Vec<ModificationRequest>,
    pub sequences: IdSequences,
    seed: Fixtures,
}

impl MockStore {
    pub fn new(fixtures: Fixtures) -> Self {
        let mut store = Self {
            clients: Vec::new(),
            accounts: Vec::new(),
            household_members: Vec::new(),
            products: Vec::new(),
            asset_allocation_policies: Vec::new(),
            program_fees: Vec::new(),
            agreements: Vec::new(),
            modification_requests: Vec::new(),
            sequences: IdSequences::default(),
            seed: fixtures,
        };
        store.reset();
        store
    }

    /// Store seeded with the bundled fixtures
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(Fixtures::bundled()?))
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Restore the seed data and restart the identifier sequences
    pub fn reset(&mut self) {
        let seed = self.seed.clone();
        self.clients = seed.clients;
        self.accounts = seed.accounts;
        self.household_members = seed.household_members;
        self.products = seed.products;
        self.asset_allocation_policies = seed.asset_allocation_policies;
        self.program_fees = seed.program_fees;
        self.agreements = seed.agreements;
        self.modification_requests = seed.modification_requests;
        self.sequences = IdSequences::default();
    }

    pub fn find_agreement(&self, id: &str) -> Option<&Agreement> {
        self.agreements.iter().find(|a| a.id == id)
    }

    pub fn find_agreement_mut(&mut self, id: &str) -> Option<&mut Agreement> {
        self.agreements.iter_mut().find(|a| a.id == id)
    }

    pub fn find_client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn find_modification_request(&self, id: &str) -> Option<&ModificationRequest> {
        self.modification_requests.iter().find(|r| r.id == id)
    }

    pub fn find_modification_request_mut(&mut self, id: &str) -> Option<&mut ModificationRequest> {
        self.modification_requests.iter_mut().find(|r| r.id == id)
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new(Fixtures::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_start_after_seed_data() {
        let mut sequences = IdSequences::default();
        assert_eq!(format_id("AGR", sequences.next_agreement()), "AGR013");
        assert_eq!(format_id("AGR", sequences.next_agreement()), "AGR014");
        assert_eq!(format_id("MR", sequences.next_modification_request()), "MR004");
        assert_eq!(format_id("DOC", sequences.next_document()), "DOC100");
    }

    #[test]
    fn reset_restores_seed_and_sequences() {
        let mut store = MockStore::seeded().unwrap();
        store.agreements.clear();
        store.sequences.next_agreement();

        store.reset();

        assert_eq!(store.agreements.len(), 12);
        assert_eq!(store.sequences, IdSequences::default());
    }

    #[test]
    fn lookups_by_id() {
        let store = MockStore::seeded().unwrap();
        assert!(store.find_agreement("AGR001").is_some());
        assert!(store.find_agreement("AGR999").is_none());
        assert!(store.find_client("CLI002").is_some());
        assert!(store.find_modification_request("MR001").is_some());
    }

    #[test]
    fn default_store_is_empty() {
        let store = MockStore::default();
        assert!(store.agreements.is_empty());
        assert!(store.clients.is_empty());
    }
}

use std::sync::Arc;

use crate::services::{
    AgreementService, DashboardService, DocumentService, ModificationService, ReferenceService,
};
use crate::store::SharedStore;

/// Per-schema data handed to every resolver.
#[derive(Clone)]
pub struct GraphQLContext {
    pub store: SharedStore,
    pub agreement_service: Arc<AgreementService>,
    pub modification_service: Arc<ModificationService>,
    pub reference_service: Arc<ReferenceService>,
    pub dashboard_service: Arc<DashboardService>,
    pub document_service: Arc<DocumentService>,
}

impl GraphQLContext {
    pub fn new(store: SharedStore) -> Self {
        Self {
            agreement_service: Arc::new(AgreementService::new(store.clone())),
            modification_service: Arc::new(ModificationService::new(store.clone())),
            reference_service: Arc::new(ReferenceService::new(store.clone())),
            dashboard_service: Arc::new(DashboardService::new(store.clone())),
            document_service: Arc::new(DocumentService::new(store.clone())),
            store,
        }
    }
}

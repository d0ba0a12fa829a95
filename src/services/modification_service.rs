use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{MockError, MockResult};
use crate::models::{
    AgreementStatus, CreateModificationRequestInput, ModificationChange, ModificationRequest,
    ModificationRequestFiltersInput, ModificationRequestStatus, Page, PaginationInput,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use crate::store::{format_id, SharedStore, APPROVER, CURRENT_USER};

const RESOURCE: &str = "Modification request";

/// Drives the draft -> pending -> approved/rejected/cancelled workflow of
/// modification requests. Approval is the only transition that edits the
/// target agreement.
pub struct ModificationService {
    store: SharedStore,
}

impl ModificationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_modification_requests(
        &self,
        filters: Option<ModificationRequestFiltersInput>,
        pagination: Option<PaginationInput>,
    ) -> MockResult<Page<ModificationRequest>> {
        let store = self.store.read().await;

        let statuses = filters.and_then(|f| f.status).unwrap_or_default();
        let requests: Vec<ModificationRequest> = store
            .modification_requests
            .iter()
            .filter(|r| statuses.is_empty() || statuses.contains(&r.status))
            .cloned()
            .collect();

        let pagination = pagination.unwrap_or_default();
        let page = pagination.page.map_or(DEFAULT_PAGE, |p| p.max(1) as usize);
        let page_size = pagination
            .page_size
            .map_or(DEFAULT_PAGE_SIZE, |s| s.max(1) as usize);

        Ok(Page::paginate(requests, page, page_size))
    }

    pub async fn get_modification_request(&self, id: &str) -> MockResult<ModificationRequest> {
        let store = self.store.read().await;
        store
            .find_modification_request(id)
            .cloned()
            .ok_or_else(|| MockError::not_found(RESOURCE, id))
    }

    pub async fn create_modification_request(
        &self,
        input: CreateModificationRequestInput,
    ) -> MockResult<ModificationRequest> {
        let mut store = self.store.write().await;

        if store.find_agreement(&input.agreement_id).is_none() {
            return Err(MockError::not_found("Agreement", &input.agreement_id));
        }

        let is_draft = input.status == Some(ModificationRequestStatus::Draft);
        let now = Utc::now();
        let request = ModificationRequest {
            id: format_id("MR", store.sequences.next_modification_request()),
            agreement_id: input.agreement_id,
            request_type: input.request_type,
            status: if is_draft {
                ModificationRequestStatus::Draft
            } else {
                ModificationRequestStatus::Pending
            },
            requested_by: CURRENT_USER.to_string(),
            requested_at: now,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            changes: input
                .changes
                .into_iter()
                .map(|c| ModificationChange {
                    field: c.field,
                    old_value: c.old_value,
                    new_value: c.new_value,
                    description: c.description,
                })
                .collect(),
            comments: input.comments,
        };

        if !is_draft {
            if let Some(agreement) = store.find_agreement_mut(&request.agreement_id) {
                agreement.status = AgreementStatus::PendingApproval;
                agreement.updated_at = now;
                agreement.modified_by = Some(CURRENT_USER.to_string());
            }
        }

        store.modification_requests.push(request.clone());
        info!(
            "Created modification request {} ({}) for agreement {}",
            request.id, request.status, request.agreement_id
        );

        Ok(request)
    }

    /// Marks the request approved and replays its changes onto the agreement.
    /// A change that does not apply is skipped; the rest still go through.
    pub async fn approve_modification_request(
        &self,
        id: &str,
        comments: Option<String>,
    ) -> MockResult<ModificationRequest> {
        let mut store = self.store.write().await;
        let now = Utc::now();

        let request = store
            .find_modification_request_mut(id)
            .ok_or_else(|| MockError::not_found(RESOURCE, id))?;
        request.status = ModificationRequestStatus::Approved;
        request.approved_by = Some(APPROVER.to_string());
        request.approved_at = Some(now);
        if let Some(comments) = comments.filter(|c| !c.is_empty()) {
            request.comments = Some(comments);
        }
        let approved = request.clone();

        match store.find_agreement_mut(&approved.agreement_id) {
            Some(agreement) => {
                for change in &approved.changes {
                    if let Err(e) = agreement.apply_change(&change.field, &change.new_value) {
                        warn!("Skipping change on {}: {}", agreement.id, e);
                    }
                }
                agreement.updated_at = now;
                agreement.modified_by = Some(APPROVER.to_string());
            }
            None => warn!(
                "Approved request {} targets missing agreement {}",
                approved.id, approved.agreement_id
            ),
        }

        info!("Approved modification request {}", approved.id);
        Ok(approved)
    }

    pub async fn reject_modification_request(
        &self,
        id: &str,
        reason: Option<String>,
    ) -> MockResult<ModificationRequest> {
        let mut store = self.store.write().await;
        let request = store
            .find_modification_request_mut(id)
            .ok_or_else(|| MockError::not_found(RESOURCE, id))?;

        request.status = ModificationRequestStatus::Rejected;
        request.rejected_by = Some(APPROVER.to_string());
        request.rejected_at = Some(Utc::now());
        request.rejection_reason = reason;

        info!("Rejected modification request {}", request.id);
        Ok(request.clone())
    }

    pub async fn cancel_modification_request(&self, id: &str) -> MockResult<ModificationRequest> {
        let mut store = self.store.write().await;
        let request = store
            .find_modification_request_mut(id)
            .ok_or_else(|| MockError::not_found(RESOURCE, id))?;

        request.status = ModificationRequestStatus::Cancelled;

        info!("Cancelled modification request {}", request.id);
        Ok(request.clone())
    }
}

use chrono::Utc;
use tracing::info;

use crate::errors::{MockError, MockResult};
use crate::models::{AgreementDocument, DocumentUploadInput, OperationResult};
use crate::store::{format_id, SharedStore, CURRENT_USER};

const DEFAULT_FILE_TYPE: &str = "application/pdf";
const DEFAULT_FILE_SIZE: i64 = 1024;

pub struct DocumentService {
    store: SharedStore,
}

impl DocumentService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Attaches the described file to the agreement. Only metadata is kept.
    pub async fn upload_document(
        &self,
        agreement_id: &str,
        file: DocumentUploadInput,
    ) -> MockResult<AgreementDocument> {
        let mut store = self.store.write().await;

        if store.find_agreement(agreement_id).is_none() {
            return Err(MockError::not_found("Agreement", agreement_id));
        }
        if file.name.trim().is_empty() {
            return Err(MockError::InvalidRequest(
                "document name must not be empty".to_string(),
            ));
        }

        let document = AgreementDocument {
            id: format_id("DOC", store.sequences.next_document()),
            document_url: format!("/documents/{}/{}", agreement_id, file.name),
            file_name: file.name,
            file_type: file
                .file_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
            file_size: file.size.filter(|&s| s > 0).unwrap_or(DEFAULT_FILE_SIZE),
            uploaded_at: Utc::now(),
            uploaded_by: CURRENT_USER.to_string(),
        };

        if let Some(agreement) = store.find_agreement_mut(agreement_id) {
            agreement.documents.push(document.clone());
        }
        info!("Uploaded document {} to agreement {}", document.id, agreement_id);

        Ok(document)
    }

    /// Removes the first document with this id, whichever agreement holds it.
    pub async fn delete_document(&self, document_id: &str) -> MockResult<OperationResult> {
        let mut store = self.store.write().await;

        for agreement in store.agreements.iter_mut() {
            if let Some(index) = agreement.documents.iter().position(|d| d.id == document_id) {
                agreement.documents.remove(index);
                info!("Deleted document {} from agreement {}", document_id, agreement.id);
                return Ok(OperationResult::ok("Document deleted successfully"));
            }
        }

        Err(MockError::not_found("Document", document_id))
    }
}

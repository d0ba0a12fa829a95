use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::models::{AgreementDocument, DocumentUploadInput, OperationResult};

#[derive(Default)]
pub struct DocumentMutation;

#[Object]
impl DocumentMutation {
    /// Attach a document to an agreement. Only the file metadata is recorded.
    async fn upload_document(
        &self,
        ctx: &Context<'_>,
        agreement_id: ID,
        file: DocumentUploadInput,
    ) -> Result<AgreementDocument> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .document_service
            .upload_document(&agreement_id, file)
            .await
            .to_graphql_result()
    }

    async fn delete_document(
        &self,
        ctx: &Context<'_>,
        document_id: ID,
    ) -> Result<OperationResult> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .document_service
            .delete_document(&document_id)
            .await
            .to_graphql_result()
    }
}
